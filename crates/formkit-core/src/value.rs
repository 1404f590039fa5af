//! # Field Values
//!
//! `FieldValue` is the single slot a user fills for one field. It is a
//! closed tagged union rather than an untyped container: every consumer
//! (validation, derivation, rendering) matches on all four variants.
//!
//! On the wire a value is plain JSON: a string, a number, a boolean, or an
//! array of strings.

use std::borrow::Cow;
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::identity::FieldId;

/// A dynamically typed field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Bool(bool),
    /// A numeric value (number inputs, derived results).
    Number(f64),
    /// Free text, a date (`YYYY-MM-DD`), or a selected choice.
    Text(String),
    /// A set of selected labels.
    Set(BTreeSet<String>),
}

impl FieldValue {
    /// Shorthand for a text value.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// The string form of the value.
    ///
    /// Integral numbers render without a fractional part (`7`, not `7.0`);
    /// sets render as their members joined by `,`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Set(items) => Cow::Owned(items.iter().map(String::as_str).collect::<Vec<_>>().join(",")),
        }
    }

    /// The numeric reading of the value, if it has one.
    ///
    /// Blank text reads as `0`, booleans as `1`/`0`. Non-numeric text, sets,
    /// and infinite or NaN numbers have no numeric reading.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n).filter(|n| n.is_finite()),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
                }
            }
            Self::Set(_) => None,
        }
    }

    /// Empty text or an empty set.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Set(items) => items.is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Whether the value counts as "not filled in" for optional checks:
    /// empty text, zero, `false`. An empty set still counts as present.
    pub fn is_falsy(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(n) => *n == 0.0 || n.is_nan(),
            Self::Bool(b) => !*b,
            Self::Set(_) => false,
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Set(_) => "set",
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Current values of one editing or preview session, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<FieldId, FieldValue>);

impl FormValues {
    /// An empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field's value.
    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    /// Set a field's value, returning the previous one.
    pub fn insert(&mut self, id: FieldId, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(id, value)
    }

    /// Remove a field's value.
    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.0.remove(id)
    }

    /// Whether a value is present for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no values are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(id, value)` pairs in id order.
    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, FieldValue> {
        self.0.iter()
    }
}

impl FromIterator<(FieldId, FieldValue)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (FieldId, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a FormValues {
    type Item = (&'a FieldId, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, FieldId, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
