//! Canonical string rendering and expected-value comparison

use regex::Regex;
use serde_json::Value;

use super::Resolved;
use crate::CoreResult;

/// Canonical string form of a value for loose comparison.
///
/// Strings render as themselves, unquoted; everything else renders as
/// compact JSON (`null`, `true`, `5`, `[1,2]`). Numeric `5` and string
/// `"5"` coincide under this rule.
pub fn text_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compare a resolution result against an expected value.
///
/// With `regex_values` the expected value's string form compiles as a
/// pattern and is searched, unanchored, against each candidate's string
/// form; a malformed pattern is the caller's error, not a failed match.
/// Without it, candidates compare by exact string-form equality. Either
/// way one matching candidate is enough.
pub fn matches_expected(
    found: &Resolved<'_>,
    expected: &Value,
    regex_values: bool,
) -> CoreResult<bool> {
    let candidates = found.candidates();
    if regex_values {
        let pattern = Regex::new(&text_form(expected))?;
        Ok(candidates.iter().any(|value| pattern.is_match(&text_form(value))))
    } else {
        let wanted = text_form(expected);
        Ok(candidates.iter().any(|value| text_form(value) == wanted))
    }
}
