//! # Form Schema
//!
//! A named, ordered sequence of fields. Field order is display and tab
//! order.
//!
//! ## Editing
//!
//! `add_field`, `update_field`, `delete_field`, `reorder_fields`, and
//! `move_field` address fields by id. Every edit either commits fully or
//! returns a [`SchemaError`] and leaves the schema untouched. An unknown id
//! is always reported as [`SchemaError::FieldNotFound`], never ignored.
//!
//! ## Derivation Integrity
//!
//! A derived field must name a formula and at least one parent; every
//! parent must exist in the schema, differ from the field itself, and be
//! non-derived. Conversely a field that some derived field reads cannot be
//! made derived. Derivation is therefore one level deep and acyclic by
//! construction.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{IntegrityError, SchemaError};
use crate::field::{Field, FieldKind, FieldPatch};
use crate::identity::{FieldId, FormId};
use crate::temporal::Timestamp;

/// One form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    /// Empty until the schema is first saved into a collection.
    pub id: FormId,
    /// Display name.
    pub name: String,
    /// Fields in display order.
    pub fields: Vec<Field>,
    /// When building started.
    pub created_at: Timestamp,
}

impl FormSchema {
    /// Start a new, unsaved schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: FormId::unassigned(),
            name: name.into(),
            fields: Vec::new(),
            created_at: Timestamp::now(),
        }
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id.as_str() == id)
    }

    /// Position of a field in display order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.id.as_str() == id)
    }

    /// Field ids in display order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(|f| f.id.clone()).collect()
    }

    /// Derived fields in display order.
    pub fn derived_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_derived)
    }

    /// Derived fields that read `id`.
    pub fn dependents_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.depends_on(id))
    }

    /// Append a new field of `kind` with builder defaults and return its id.
    ///
    /// The id is `<kind>_<n>` with the smallest `n ≥ 1` not already taken,
    /// so it can be typed into formulas as-is.
    pub fn add_field(&mut self, kind: FieldKind) -> FieldId {
        let id = self.next_field_id(kind);
        self.fields.push(Field::new(id.clone(), kind));
        id
    }

    /// Append a fully specified field.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateField`] if the id is taken, or
    /// [`SchemaError::Integrity`] if the field violates a schema invariant.
    pub fn insert_field(&mut self, field: Field) -> Result<(), SchemaError> {
        if self.field(field.id.as_str()).is_some() {
            return Err(SchemaError::DuplicateField {
                field: field.id.to_string(),
            });
        }
        self.check_field(&field)?;
        self.fields.push(field);
        Ok(())
    }

    /// Apply `patch` to the field `id`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::FieldNotFound`] for an unknown id, or
    /// [`SchemaError::Integrity`] if the patched field would violate a
    /// schema invariant. The schema is unchanged on error.
    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> Result<&Field, SchemaError> {
        let index = self.position(id).ok_or_else(|| SchemaError::FieldNotFound {
            field: id.to_string(),
        })?;
        let mut candidate = self.fields[index].clone();
        patch.apply_to(&mut candidate);
        self.check_field(&candidate)?;
        self.fields[index] = candidate;
        Ok(&self.fields[index])
    }

    /// Remove the field `id` and return it.
    ///
    /// # Errors
    ///
    /// [`SchemaError::FieldNotFound`] for an unknown id, or
    /// [`SchemaError::FieldInUse`] if a derived field reads it.
    pub fn delete_field(&mut self, id: &str) -> Result<Field, SchemaError> {
        let index = self.position(id).ok_or_else(|| SchemaError::FieldNotFound {
            field: id.to_string(),
        })?;
        let dependents: Vec<String> = self.dependents_of(id).map(|f| f.id.to_string()).collect();
        if !dependents.is_empty() {
            return Err(SchemaError::FieldInUse {
                field: id.to_string(),
                dependents,
            });
        }
        Ok(self.fields.remove(index))
    }

    /// Rearrange fields into `order`, which must be a permutation of the
    /// current field ids.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidOrder`] if `order` has a different length,
    /// repeats an id, or names an unknown id.
    pub fn reorder_fields(&mut self, order: &[FieldId]) -> Result<(), SchemaError> {
        if order.len() != self.fields.len() {
            return Err(SchemaError::InvalidOrder {
                reason: format!("expected {} ids, got {}", self.fields.len(), order.len()),
            });
        }
        let mut seen = HashSet::with_capacity(order.len());
        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if !seen.insert(id.as_str()) {
                return Err(SchemaError::InvalidOrder {
                    reason: format!("id {id} appears more than once"),
                });
            }
            let field = self.field(id.as_str()).ok_or_else(|| SchemaError::InvalidOrder {
                reason: format!("unknown id {id}"),
            })?;
            reordered.push(field.clone());
        }
        self.fields = reordered;
        Ok(())
    }

    /// Move the field `id` to position `to`, shifting the fields between.
    ///
    /// # Errors
    ///
    /// [`SchemaError::FieldNotFound`] for an unknown id, or
    /// [`SchemaError::IndexOutOfRange`] if `to` is past the last field.
    pub fn move_field(&mut self, id: &str, to: usize) -> Result<(), SchemaError> {
        let from = self.position(id).ok_or_else(|| SchemaError::FieldNotFound {
            field: id.to_string(),
        })?;
        if to >= self.fields.len() {
            return Err(SchemaError::IndexOutOfRange {
                index: to,
                len: self.fields.len(),
            });
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        Ok(())
    }

    /// Check every field against the schema invariants, including id
    /// uniqueness.
    ///
    /// # Errors
    ///
    /// The first violation found, in field order.
    pub fn check_integrity(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.id.as_str()) {
                return Err(SchemaError::DuplicateField {
                    field: field.id.to_string(),
                });
            }
            self.check_field(field)?;
        }
        Ok(())
    }

    /// Check `candidate` as if it replaced (or joined) the field with the
    /// same id.
    fn check_field(&self, candidate: &Field) -> Result<(), IntegrityError> {
        let id = candidate.id.as_str();

        match (&candidate.choices, candidate.kind.has_choices()) {
            (Some(choices), true) if !choices.is_empty() => {}
            (_, true) => {
                return Err(IntegrityError::MissingChoices {
                    field: id.to_string(),
                    kind: candidate.kind.to_string(),
                })
            }
            (Some(_), false) => {
                return Err(IntegrityError::UnexpectedChoices {
                    field: id.to_string(),
                    kind: candidate.kind.to_string(),
                })
            }
            (None, false) => {}
        }

        if !candidate.kind.accepts(&candidate.default_value) {
            return Err(IntegrityError::DefaultValueMismatch {
                field: id.to_string(),
                kind: candidate.kind.to_string(),
                value: candidate.default_value.to_string(),
            });
        }

        if !candidate.is_derived {
            return Ok(());
        }

        if candidate.formula.as_deref().map_or(true, |f| f.trim().is_empty()) {
            return Err(IntegrityError::MissingFormula {
                field: id.to_string(),
            });
        }
        let parents = match &candidate.parent_field_ids {
            Some(parents) if !parents.is_empty() => parents,
            _ => {
                return Err(IntegrityError::MissingParents {
                    field: id.to_string(),
                })
            }
        };
        for parent in parents {
            if parent.as_str() == id {
                return Err(IntegrityError::SelfReference {
                    field: id.to_string(),
                });
            }
            let parent_field = self
                .fields
                .iter()
                .find(|f| f.id == *parent)
                .ok_or_else(|| IntegrityError::UnknownParent {
                    field: id.to_string(),
                    parent: parent.to_string(),
                })?;
            if parent_field.is_derived {
                return Err(IntegrityError::ChainedDerivation {
                    field: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
        if let Some(dependent) = self
            .dependents_of(id)
            .find(|f| f.id.as_str() != id)
        {
            return Err(IntegrityError::ParentOfDerived {
                field: id.to_string(),
                dependent: dependent.id.to_string(),
            });
        }
        Ok(())
    }

    fn next_field_id(&self, kind: FieldKind) -> FieldId {
        let mut n = 1usize;
        loop {
            let candidate = format!("{}_{n}", kind.as_str());
            if self.field(&candidate).is_none() {
                if let Ok(id) = FieldId::new(candidate) {
                    return id;
                }
            }
            n += 1;
        }
    }
}
