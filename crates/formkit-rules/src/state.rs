//! # Form Validation State
//!
//! Per-field error messages for a whole form. Absent entries are valid
//! fields; an empty state is a valid form. The state is always recomputed
//! from values and is never persisted.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use formkit_core::{FieldId, FormSchema, FormValues};

use crate::validate::validate;

/// Mapping from field id to the message of its first failing rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValidationState(BTreeMap<FieldId, String>);

impl FormValidationState {
    /// A state with no errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field has an error.
    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }

    /// The error recorded for `id`.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    /// Record an error for `id`.
    pub fn insert(&mut self, id: FieldId, message: impl Into<String>) {
        self.0.insert(id, message.into());
    }

    /// Forget the error for `id`, returning it.
    pub fn clear_field(&mut self, id: &str) -> Option<String> {
        self.0.remove(id)
    }

    /// Number of fields with errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`is_valid`](Self::is_valid).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(id, message)` pairs in id order.
    pub fn iter(&self) -> btree_map::Iter<'_, FieldId, String> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FormValidationState {
    type Item = (&'a FieldId, &'a String);
    type IntoIter = btree_map::Iter<'a, FieldId, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validate every field of `schema` against `values`.
pub fn validate_form(schema: &FormSchema, values: &FormValues) -> FormValidationState {
    let mut state = FormValidationState::new();
    for field in &schema.fields {
        if let Some(message) = validate(field, values.get(field.id.as_str())) {
            state.insert(field.id.clone(), message);
        }
    }
    state
}
