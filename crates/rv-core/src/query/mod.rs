//! Slash-path resolution over report documents
//!
//! Sandbox reports are nested and heterogeneously shaped: a "calls" field
//! may hold a single object or a list of objects depending on how many were
//! recorded. Resolution distributes over sequences at the point they are
//! encountered, so one path expression works uniformly across both shapes
//! and across one-to-many relationships (one process, many calls).

pub mod matching;

pub use matching::{matches_expected, text_form};

use serde_json::Value;

/// Outcome of resolving a slash-delimited path against a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// Resolution walked off the document: an absent key, or a scalar hit
    /// while segments remained.
    Missing,
    /// The path ended on a concrete value, which may itself be an array.
    Node(&'a Value),
    /// The path crossed one or more arrays; results are merged in document
    /// order, with list-shaped results spliced in, single values appended,
    /// and null or unresolvable results dropped.
    Flat(Vec<&'a Value>),
}

/// Resolve `path` against `document`, splitting on `/`.
///
/// Segments are consumed left to right. Hitting an array mid-walk
/// re-resolves the remaining segments against every element and merges the
/// non-null results; hitting any other non-mapping value fails the
/// resolution. An empty path is a lookup of the empty-string key, not a
/// special case.
pub fn resolve<'a>(document: &'a Value, path: &str) -> Resolved<'a> {
    let segments: Vec<&str> = path.split('/').collect();
    resolve_segments(document, &segments)
}

fn resolve_segments<'a>(document: &'a Value, segments: &[&str]) -> Resolved<'a> {
    let mut current = document;
    for (idx, segment) in segments.iter().enumerate() {
        match current {
            // An array distributes the rest of the path over its elements.
            Value::Array(items) => {
                let rest = &segments[idx..];
                let mut merged = Vec::new();
                for item in items {
                    match resolve_segments(item, rest) {
                        Resolved::Flat(values) => merged.extend(values),
                        Resolved::Node(Value::Array(inner)) => merged.extend(inner.iter()),
                        // A null leaf is no result, same as an absent key.
                        Resolved::Node(Value::Null) | Resolved::Missing => {}
                        Resolved::Node(value) => merged.push(value),
                    }
                }
                return Resolved::Flat(merged);
            }
            Value::Object(map) => match map.get(*segment) {
                Some(next) => current = next,
                None => return Resolved::Missing,
            },
            _ => return Resolved::Missing,
        }
    }
    Resolved::Node(current)
}

impl<'a> Resolved<'a> {
    /// Whether the resolution found anything non-null and non-empty.
    ///
    /// Missing paths, null, empty arrays, empty objects, and empty strings
    /// all count as "no content". Numbers and booleans always count,
    /// including `0` and `false`.
    pub fn has_content(&self) -> bool {
        match self {
            Resolved::Missing => false,
            Resolved::Node(value) => match value {
                Value::Null => false,
                Value::Array(items) => !items.is_empty(),
                Value::Object(map) => !map.is_empty(),
                Value::String(s) => !s.is_empty(),
                _ => true,
            },
            Resolved::Flat(values) => !values.is_empty(),
        }
    }

    /// Candidate targets for criteria matching.
    ///
    /// Missing and null resolutions yield no targets. A resolved array
    /// yields its elements; any other single value is wrapped.
    pub fn into_targets(self) -> Vec<&'a Value> {
        match self {
            Resolved::Missing | Resolved::Node(Value::Null) => Vec::new(),
            Resolved::Node(Value::Array(items)) => items.iter().collect(),
            Resolved::Node(value) => vec![value],
            Resolved::Flat(values) => values,
        }
    }

    /// Candidate values for expected-value comparison.
    ///
    /// Unlike [`Resolved::into_targets`], an unresolvable path is compared
    /// as the null value, so an expected null matches an absent key.
    /// Nested arrays are not flattened further here, only at the
    /// resolution stage.
    pub fn candidates(&self) -> Vec<&'a Value> {
        static NULL: Value = Value::Null;
        match self {
            Resolved::Missing | Resolved::Node(Value::Null) => vec![&NULL],
            Resolved::Node(Value::Array(items)) => items.iter().collect(),
            Resolved::Node(value) => vec![*value],
            Resolved::Flat(values) => values.clone(),
        }
    }
}
