//! Text verifiers over the raw serialized report

use std::path::Path;

use regex::Regex;

use crate::report::Report;
use crate::verify::Verifier;
use crate::CoreResult;

/// Passes when a literal substring occurs anywhere in the raw report text.
pub struct ReportHasExactString {
    pattern: String,
}

impl ReportHasExactString {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Verifier for ReportHasExactString {
    fn name(&self) -> &'static str {
        "report_has_exact_string"
    }

    fn description(&self) -> String {
        format!("Raw report contains the string '{}'", self.pattern)
    }

    fn evaluate(&self, report: &Report, _storage_dir: &Path) -> CoreResult<bool> {
        Ok(report.raw().contains(&self.pattern))
    }
}

/// Passes when a regular expression matches anywhere in the raw report
/// text. The pattern compiles at construction, so a bad pattern fails the
/// build rather than every evaluation.
pub struct ReportHasPattern {
    pattern: Regex,
}

impl ReportHasPattern {
    pub fn new(pattern: &str) -> CoreResult<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Verifier for ReportHasPattern {
    fn name(&self) -> &'static str {
        "report_has_pattern"
    }

    fn description(&self) -> String {
        format!("Raw report matches the pattern '{}'", self.pattern)
    }

    fn evaluate(&self, report: &Report, _storage_dir: &Path) -> CoreResult<bool> {
        Ok(self.pattern.is_match(report.raw()))
    }
}
