//! Report wrapper: the parsed document plus the raw text it came from
//!
//! The text verifiers search the serialized form of the report, so the
//! exact input text is retained verbatim rather than re-serialized.

use std::fs;
use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::query::{self, Resolved};
use crate::CoreResult;

/// An analysis report paired with its raw serialized text.
#[derive(Debug, Clone)]
pub struct Report {
    value: Value,
    raw: String,
}

impl Report {
    /// Parse a report from JSON text, retaining the text as supplied.
    pub fn parse(text: &str) -> CoreResult<Self> {
        let value = serde_json::from_str(text)?;
        Ok(Self {
            value,
            raw: text.to_string(),
        })
    }

    /// Read and parse a report file.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Adopt an already-parsed document; the raw form becomes its compact
    /// serialization.
    pub fn from_value(value: Value) -> Self {
        let raw = value.to_string();
        Self { value, raw }
    }

    /// The parsed document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The raw serialized text.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Resolve a slash-delimited path against the document.
    pub fn resolve(&self, path: &str) -> Resolved<'_> {
        query::resolve(&self.value, path)
    }

    /// Hex SHA-256 fingerprint of the raw text.
    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.raw.as_bytes());
        hex::encode(hasher.finalize())
    }
}
