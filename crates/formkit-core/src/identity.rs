//! # Identifiers
//!
//! Newtypes for form and field identifiers, so a `FieldId` can never be
//! passed where a `FormId` is expected.
//!
//! Field ids are also formula variables. They are restricted to the
//! identifier alphabet used by the formula lexer: an ASCII letter or `_`,
//! followed by ASCII letters, digits, or `_`.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FormkitError;

/// Identifier of a field, unique within one schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldId(String);

impl FieldId {
    /// Validate and wrap a field id.
    ///
    /// # Errors
    ///
    /// Returns [`FormkitError::InvalidIdentifier`] if `id` is empty or not
    /// identifier-shaped.
    pub fn new(id: impl Into<String>) -> Result<Self, FormkitError> {
        let id = id.into();
        if !is_identifier(&id) {
            return Err(FormkitError::InvalidIdentifier(id));
        }
        Ok(Self(id))
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldId {
    type Error = FormkitError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for FieldId {
    type Error = FormkitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldId> for String {
    fn from(id: FieldId) -> Self {
        id.0
    }
}

impl Borrow<str> for FieldId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a form schema within a collection.
///
/// A schema that has never been saved carries the empty id; the collection
/// assigns a fresh one on first save.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(String);

impl FormId {
    /// The id of a schema that has not been saved yet.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Generate a new random form identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Whether this id still needs to be assigned.
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FormId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FormId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `s` is a valid field id / formula variable name.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

/// Whether `c` may begin an identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether `c` may continue an identifier.
pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
