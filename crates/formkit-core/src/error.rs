//! # Error Types
//!
//! Structured errors for the schema model. All errors use `thiserror`.
//!
//! ## Design
//!
//! - Integrity errors name the offending field and, where relevant, the
//!   referenced parent or dependent, so a builder UI can point at both.
//! - Editing errors (`SchemaError`) wrap integrity errors; a rejected edit
//!   never leaves the schema partially modified.

use thiserror::Error;

/// Top-level error type for the formkit model.
#[derive(Error, Debug)]
pub enum FormkitError {
    /// A field id is not identifier-shaped.
    #[error("invalid field id {0:?}: expected a letter or '_' followed by letters, digits, or '_'")]
    InvalidIdentifier(String),

    /// A timestamp string could not be parsed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A field kind name is not recognized.
    #[error("unknown field kind {0:?}")]
    UnknownFieldKind(String),

    /// A validation rule kind name is not recognized.
    #[error("unknown rule kind {0:?}")]
    UnknownRuleKind(String),

    /// A schema edit was rejected.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Error raised by an edit to a form schema's field sequence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// No field with the given id exists in the schema.
    #[error("field not found: {field}")]
    FieldNotFound {
        /// The id that was looked up.
        field: String,
    },

    /// A field with the given id already exists in the schema.
    #[error("duplicate field id: {field}")]
    DuplicateField {
        /// The duplicated id.
        field: String,
    },

    /// The field is a parent of one or more derived fields.
    #[error("field {field} is referenced by derived fields: {}", dependents.join(", "))]
    FieldInUse {
        /// The field that was to be deleted.
        field: String,
        /// Derived fields that list it as a parent.
        dependents: Vec<String>,
    },

    /// A reorder request was not a permutation of the current field ids.
    #[error("invalid field order: {reason}")]
    InvalidOrder {
        /// What was wrong with the requested order.
        reason: String,
    },

    /// A move target lies outside the field sequence.
    #[error("index {index} out of range for {len} fields")]
    IndexOutOfRange {
        /// Requested target index.
        index: usize,
        /// Number of fields in the schema.
        len: usize,
    },

    /// The edited field would violate a schema invariant.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// A violated schema invariant.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegrityError {
    /// A derived field has no formula.
    #[error("derived field {field} has no formula")]
    MissingFormula {
        /// The derived field.
        field: String,
    },

    /// A derived field has no parent fields.
    #[error("derived field {field} has no parent fields")]
    MissingParents {
        /// The derived field.
        field: String,
    },

    /// A derived field lists itself as a parent.
    #[error("derived field {field} cannot reference itself")]
    SelfReference {
        /// The derived field.
        field: String,
    },

    /// A derived field references a parent that is not in the schema.
    #[error("derived field {field} references unknown parent {parent}")]
    UnknownParent {
        /// The derived field.
        field: String,
        /// The missing parent id.
        parent: String,
    },

    /// A derived field references another derived field.
    #[error("derived field {field} cannot depend on derived field {parent}")]
    ChainedDerivation {
        /// The derived field.
        field: String,
        /// The derived parent.
        parent: String,
    },

    /// A field that other derived fields depend on cannot itself become derived.
    #[error("field {field} cannot become derived while {dependent} depends on it")]
    ParentOfDerived {
        /// The field being made derived.
        field: String,
        /// A derived field that lists it as a parent.
        dependent: String,
    },

    /// A select or radio field has no choices.
    #[error("{kind} field {field} requires at least one choice")]
    MissingChoices {
        /// The field.
        field: String,
        /// Its kind.
        kind: String,
    },

    /// A field that is neither select nor radio carries choices.
    #[error("{kind} field {field} does not take choices")]
    UnexpectedChoices {
        /// The field.
        field: String,
        /// Its kind.
        kind: String,
    },

    /// The default value does not fit the field kind.
    #[error("default value {value} does not fit {kind} field {field}")]
    DefaultValueMismatch {
        /// The field.
        field: String,
        /// Its kind.
        kind: String,
        /// The rejected default, rendered as text.
        value: String,
    },
}
