//! Verifier predicates over analysis reports
//!
//! Each verifier is constructed once with its configuration and then asked
//! a single yes/no question about a report. `Ok(bool)` is the verdict;
//! `Err` is reserved for configuration problems (an unattached verifier, a
//! malformed pattern), never for "the data was not there".

pub mod section;
pub mod text;

pub use section::{SectionHasContent, SectionHasMatching};
pub use text::{ReportHasExactString, ReportHasPattern};

use std::path::Path;

use crate::report::Report;
use crate::{CoreError, CoreResult};

/// A stateless pass/fail predicate over a report.
///
/// `storage_dir` points at scratch space for verifiers that need on-disk
/// artifacts; none of the built-ins do, but the uniform signature lets a
/// harness drive any verifier through one call.
pub trait Verifier: Send + Sync {
    /// Stable identifier used in verdicts and logs.
    fn name(&self) -> &'static str;

    /// Human-readable summary of what this verifier asserts.
    fn description(&self) -> String;

    /// Evaluate the predicate against a report.
    fn evaluate(&self, report: &Report, storage_dir: &Path) -> CoreResult<bool>;
}

/// Placeholder for an objective that never had a real verifier assigned.
///
/// Always fails with an error so misconfiguration surfaces as a loud
/// failure instead of a silent pass or fail.
pub struct MissingResultVerifier;

impl MissingResultVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MissingResultVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Verifier for MissingResultVerifier {
    fn name(&self) -> &'static str {
        "missing_result"
    }

    fn description(&self) -> String {
        "No verifier was attached to this objective".to_string()
    }

    fn evaluate(&self, _report: &Report, _storage_dir: &Path) -> CoreResult<bool> {
        Err(CoreError::UnattachedVerifier)
    }
}
