//! Section verifiers: existence and criteria matching

use std::path::Path;

use serde_json::{Map, Value};

use crate::query::{self, matches_expected};
use crate::report::Report;
use crate::verify::Verifier;
use crate::CoreResult;

/// Passes when a report section resolves to something non-empty.
pub struct SectionHasContent {
    path: String,
}

impl SectionHasContent {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Verifier for SectionHasContent {
    fn name(&self) -> &'static str {
        "section_has_content"
    }

    fn description(&self) -> String {
        format!("Report section '{}' is present and non-empty", self.path)
    }

    fn evaluate(&self, report: &Report, _storage_dir: &Path) -> CoreResult<bool> {
        Ok(report.resolve(&self.path).has_content())
    }
}

/// Passes when at least one item under a report section satisfies every
/// criteria entry.
///
/// Criteria entries AND together within a single candidate and OR across
/// candidates: "is there one call whose name is X *and* whose argument is
/// Y", not "is X named somewhere and Y argued somewhere else".
pub struct SectionHasMatching {
    path: String,
    match_criteria: Option<Map<String, Value>>,
    regex_values: bool,
}

impl SectionHasMatching {
    pub fn new(
        path: impl Into<String>,
        match_criteria: Option<Map<String, Value>>,
        regex_values: bool,
    ) -> Self {
        Self {
            path: path.into(),
            match_criteria,
            regex_values,
        }
    }

    /// Whether one candidate satisfies every criteria entry. Every entry is
    /// evaluated, so a malformed regex pattern surfaces even when an
    /// earlier entry already missed.
    fn candidate_matches(
        &self,
        candidate: &Value,
        criteria: &Map<String, Value>,
    ) -> CoreResult<bool> {
        let mut satisfied = 0;
        for (relative_path, expected) in criteria {
            let found = query::resolve(candidate, relative_path);
            if matches_expected(&found, expected, self.regex_values)? {
                satisfied += 1;
            }
        }
        Ok(satisfied == criteria.len())
    }
}

impl Verifier for SectionHasMatching {
    fn name(&self) -> &'static str {
        "section_has_matching"
    }

    fn description(&self) -> String {
        match &self.match_criteria {
            Some(criteria) => format!(
                "Report section '{}' has an item matching {} criteria",
                self.path,
                criteria.len()
            ),
            None => format!("Report section '{}' resolves to at least one item", self.path),
        }
    }

    fn evaluate(&self, report: &Report, _storage_dir: &Path) -> CoreResult<bool> {
        let targets = report.resolve(&self.path).into_targets();
        let criteria = match &self.match_criteria {
            Some(criteria) => criteria,
            // Without criteria this degenerates to "did anything resolve".
            None => return Ok(!targets.is_empty()),
        };
        for candidate in targets {
            if self.candidate_matches(candidate, criteria)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
