//! Check definitions and the batch runner
//!
//! A check file names a list of objectives and the verifier attached to
//! each. Specs deserialize with serde, build into trait objects, and run
//! as a batch that never aborts early: every check gets a verdict, and
//! configuration errors are verdicts too.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::report::Report;
use crate::verify::{
    MissingResultVerifier, ReportHasExactString, ReportHasPattern, SectionHasContent,
    SectionHasMatching, Verifier,
};
use crate::CoreResult;

/// Configurable verifier kinds, tagged by `type` in check files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckKind {
    SectionHasContent {
        path: String,
    },
    SectionHasMatching {
        path: String,
        #[serde(default)]
        criteria: Option<Map<String, Value>>,
        #[serde(default)]
        regex_values: bool,
    },
    ReportHasExactString {
        pattern: String,
    },
    ReportHasPattern {
        pattern: String,
    },
}

/// A named check as written in a check file.
///
/// The `verifier` field may be absent; such a spec builds into the
/// unattached stub, so an objective nobody wired up errors at evaluation
/// instead of silently passing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSpec {
    pub name: String,
    #[serde(default)]
    pub verifier: Option<CheckKind>,
}

impl CheckSpec {
    /// Construct the configured verifier. Patterns compile here, so a bad
    /// pattern fails the build rather than every evaluation.
    pub fn build(&self) -> CoreResult<Box<dyn Verifier>> {
        let kind = match &self.verifier {
            Some(kind) => kind,
            None => return Ok(Box::new(MissingResultVerifier::new())),
        };
        let verifier: Box<dyn Verifier> = match kind {
            CheckKind::SectionHasContent { path } => {
                Box::new(SectionHasContent::new(path.clone()))
            }
            CheckKind::SectionHasMatching {
                path,
                criteria,
                regex_values,
            } => Box::new(SectionHasMatching::new(
                path.clone(),
                criteria.clone(),
                *regex_values,
            )),
            CheckKind::ReportHasExactString { pattern } => {
                Box::new(ReportHasExactString::new(pattern.clone()))
            }
            CheckKind::ReportHasPattern { pattern } => Box::new(ReportHasPattern::new(pattern)?),
        };
        Ok(verifier)
    }
}

/// A loadable list of checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSet {
    pub checks: Vec<CheckSpec>,
}

impl CheckSet {
    /// Parse a check set from JSON text.
    pub fn parse(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a check file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }
}

/// Per-check result category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckOutcome {
    Pass,
    Fail,
    Error,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Pass => write!(f, "PASS"),
            CheckOutcome::Fail => write!(f, "FAIL"),
            CheckOutcome::Error => write!(f, "ERROR"),
        }
    }
}

/// The verdict for one check: its outcome plus a human-readable detail
/// (the verifier's description, or the error message).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckVerdict {
    pub name: String,
    pub outcome: CheckOutcome,
    pub detail: String,
}

/// One batch evaluation of a check set against a report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckRun {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub report_sha256: String,
    pub verdicts: Vec<CheckVerdict>,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
}

impl CheckRun {
    /// Build and evaluate every check in the set. Build failures and
    /// evaluation errors become `Error` verdicts; the batch always runs to
    /// completion.
    pub fn execute(set: &CheckSet, report: &Report, storage_dir: &Path) -> CheckRun {
        let started_at = Utc::now();
        let mut verdicts = Vec::with_capacity(set.checks.len());
        let mut passed = 0;
        let mut failed = 0;
        let mut errors = 0;
        for spec in &set.checks {
            let verdict = evaluate_check(spec, report, storage_dir);
            debug!("check '{}' -> {}", verdict.name, verdict.outcome);
            match verdict.outcome {
                CheckOutcome::Pass => passed += 1,
                CheckOutcome::Fail => failed += 1,
                CheckOutcome::Error => errors += 1,
            }
            verdicts.push(verdict);
        }
        CheckRun {
            id: Uuid::new_v4(),
            started_at,
            completed_at: Utc::now(),
            report_sha256: report.sha256(),
            verdicts,
            passed,
            failed,
            errors,
        }
    }

    /// Whether every verdict in the run is a pass.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

fn evaluate_check(spec: &CheckSpec, report: &Report, storage_dir: &Path) -> CheckVerdict {
    let verifier = match spec.build() {
        Ok(verifier) => verifier,
        Err(err) => {
            return CheckVerdict {
                name: spec.name.clone(),
                outcome: CheckOutcome::Error,
                detail: err.to_string(),
            }
        }
    };
    let outcome = match verifier.evaluate(report, storage_dir) {
        Ok(true) => CheckOutcome::Pass,
        Ok(false) => CheckOutcome::Fail,
        Err(err) => {
            return CheckVerdict {
                name: spec.name.clone(),
                outcome: CheckOutcome::Error,
                detail: err.to_string(),
            }
        }
    };
    CheckVerdict {
        name: spec.name.clone(),
        outcome,
        detail: verifier.description(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_report() -> Report {
        Report::from_value(json!({
            "behavior": {
                "calls": [
                    {"api": "open", "arg": "/etc/passwd"},
                    {"api": "connect", "arg": "10.0.0.5"}
                ]
            },
            "network": {"dns": []}
        }))
    }

    fn sample_checks() -> CheckSet {
        CheckSet::parse(
            r#"{
                "checks": [
                    {
                        "name": "has-calls",
                        "verifier": {"type": "section_has_content", "path": "behavior/calls"}
                    },
                    {
                        "name": "opened-passwd",
                        "verifier": {
                            "type": "section_has_matching",
                            "path": "behavior/calls",
                            "criteria": {"api": "open", "arg": "/etc/passwd"}
                        }
                    },
                    {
                        "name": "dns-activity",
                        "verifier": {"type": "section_has_content", "path": "network/dns"}
                    },
                    {
                        "name": "mentions-connect",
                        "verifier": {"type": "report_has_exact_string", "pattern": "connect"}
                    },
                    {
                        "name": "dotted-quad",
                        "verifier": {
                            "type": "report_has_pattern",
                            "pattern": "\\d+\\.\\d+\\.\\d+\\.\\d+"
                        }
                    },
                    {"name": "unassigned-objective"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_check_files_deserialize_with_defaults() {
        let set = sample_checks();
        assert_eq!(set.checks.len(), 6);
        assert!(set.checks[5].verifier.is_none());
        match &set.checks[1].verifier {
            Some(CheckKind::SectionHasMatching { regex_values, .. }) => {
                assert!(!regex_values);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_tag_is_a_parse_error() {
        let result = CheckSet::parse(
            r#"{"checks": [{"name": "x", "verifier": {"type": "telepathy"}}]}"#,
        );
        assert!(matches!(result, Err(crate::CoreError::Parse(_))));
    }

    #[test]
    fn test_build_compiles_patterns_eagerly() {
        let set = CheckSet::parse(
            r#"{
                "checks": [
                    {"name": "bad", "verifier": {"type": "report_has_pattern", "pattern": "("}}
                ]
            }"#,
        )
        .unwrap();
        assert!(set.checks[0].build().is_err());
    }

    #[test]
    fn test_execute_gives_every_check_a_verdict() {
        let run = CheckRun::execute(&sample_checks(), &sample_report(), Path::new("."));
        assert_eq!(run.verdicts.len(), 6);
        assert_eq!(run.passed, 4);
        assert_eq!(run.failed, 1);
        assert_eq!(run.errors, 1);
        assert!(!run.all_passed());

        let by_name: Vec<(&str, CheckOutcome)> = run
            .verdicts
            .iter()
            .map(|v| (v.name.as_str(), v.outcome))
            .collect();
        assert!(by_name.contains(&("has-calls", CheckOutcome::Pass)));
        assert!(by_name.contains(&("dns-activity", CheckOutcome::Fail)));
        assert!(by_name.contains(&("unassigned-objective", CheckOutcome::Error)));
    }

    #[test]
    fn test_unattached_verdict_carries_the_error_message() {
        let set = CheckSet::parse(r#"{"checks": [{"name": "orphan"}]}"#).unwrap();
        let run = CheckRun::execute(&set, &sample_report(), Path::new("."));
        assert_eq!(run.verdicts[0].outcome, CheckOutcome::Error);
        assert!(run.verdicts[0].detail.contains("No verifier was attached"));
    }

    #[test]
    fn test_all_passed_on_a_clean_run() {
        let set = CheckSet::parse(
            r#"{
                "checks": [
                    {
                        "name": "has-calls",
                        "verifier": {"type": "section_has_content", "path": "behavior/calls"}
                    }
                ]
            }"#,
        )
        .unwrap();
        let run = CheckRun::execute(&set, &sample_report(), Path::new("."));
        assert!(run.all_passed());
        assert_eq!((run.passed, run.failed, run.errors), (1, 0, 0));
        assert!(run.completed_at >= run.started_at);
        assert_eq!(run.report_sha256, sample_report().sha256());
    }

    #[test]
    fn test_runs_serialize_for_machine_output() {
        let run = CheckRun::execute(&sample_checks(), &sample_report(), Path::new("."));
        let rendered = serde_json::to_value(&run).unwrap();
        assert_eq!(rendered["passed"], json!(4));
        assert_eq!(rendered["verdicts"][0]["outcome"], json!("pass"));
        let restored: CheckRun = serde_json::from_value(rendered).unwrap();
        assert_eq!(restored.id, run.id);
    }
}
