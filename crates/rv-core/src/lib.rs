//! Report Verdict Core Engine
//!
//! This crate provides the core engine for verifying sandbox-style analysis
//! reports against expected behaviors: slash-path resolution over nested
//! JSON documents, criteria matching with string/regex equivalence, and a
//! small library of verifier predicates a test harness composes into checks.

pub mod checks;
pub mod query;
pub mod report;
pub mod verify;

use thiserror::Error;

pub use checks::{CheckKind, CheckOutcome, CheckRun, CheckSet, CheckSpec, CheckVerdict};
pub use query::{matches_expected, resolve, text_form, Resolved};
pub use report::Report;
pub use verify::{
    MissingResultVerifier, ReportHasExactString, ReportHasPattern, SectionHasContent,
    SectionHasMatching, Verifier,
};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No verifier was attached to this objective")]
    UnattachedVerifier,

    #[error("Pattern compilation error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
