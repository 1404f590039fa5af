//! # Form Collection
//!
//! The ordered list of saved form schemas, keyed by schema id. This is the
//! unit the persistence layer loads and saves; it serializes as a plain JSON
//! array of schemas.

use serde::{Deserialize, Serialize};

use crate::identity::FormId;
use crate::schema::FormSchema;

/// Saved form schemas in the order they were first saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormCollection(Vec<FormSchema>);

impl FormCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save `schema` and return its id.
    ///
    /// - An unassigned id gets a fresh unique id and the schema is appended.
    /// - An id already in the collection replaces that entry in place.
    /// - Any other id is appended as-is.
    pub fn save_schema(&mut self, mut schema: FormSchema) -> FormId {
        if schema.id.is_unassigned() {
            schema.id = self.fresh_id();
        }
        let id = schema.id.clone();
        match self.0.iter().position(|s| s.id == id) {
            Some(index) => self.0[index] = schema,
            None => self.0.push(schema),
        }
        id
    }

    /// Remove the schema `id`, returning it if it was present.
    pub fn delete_schema(&mut self, id: &FormId) -> Option<FormSchema> {
        let index = self.0.iter().position(|s| s.id == *id)?;
        Some(self.0.remove(index))
    }

    /// Look up a schema by id.
    pub fn get(&self, id: &FormId) -> Option<&FormSchema> {
        self.0.iter().find(|s| s.id == *id)
    }

    /// Whether a schema with `id` is saved.
    pub fn contains(&self, id: &FormId) -> bool {
        self.get(id).is_some()
    }

    /// Saved schemas in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FormSchema> {
        self.0.iter()
    }

    /// Saved schemas as a slice.
    pub fn as_slice(&self) -> &[FormSchema] {
        &self.0
    }

    /// Number of saved schemas.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn fresh_id(&self) -> FormId {
        loop {
            let id = FormId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

impl From<Vec<FormSchema>> for FormCollection {
    fn from(schemas: Vec<FormSchema>) -> Self {
        Self(schemas)
    }
}

impl<'a> IntoIterator for &'a FormCollection {
    type Item = &'a FormSchema;
    type IntoIter = std::slice::Iter<'a, FormSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
