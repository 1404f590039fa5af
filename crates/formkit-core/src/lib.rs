//! # formkit-core — Form Schema Model
//!
//! The leaf crate of the formkit workspace. It defines the data that every
//! other crate operates on: fields, validation rules, form schemas, the
//! saved form collection, and the dynamically typed values users enter.
//!
//! ## Key Design Principles
//!
//! 1. **Identifier-shaped field ids.** `FieldId` is validated at
//!    construction so that every field can be referenced as a bare token in
//!    a derived-field formula.
//!
//! 2. **Tagged values.** `FieldValue` is a closed enum (text, number, bool,
//!    string set). Validation and derivation match on it exhaustively.
//!
//! 3. **Rules carry their bounds.** `RuleKind::MinLength { bound }` makes a
//!    length rule without a bound unrepresentable, while the JSON shape stays
//!    `{ "kind": "minLength", "bound": 3, "message": "..." }`.
//!
//! 4. **Integrity at edit time.** `FormSchema::update_field` rejects
//!    self-referencing, dangling, and chained derivations before they reach
//!    the runtime. Derived fields may only depend on non-derived fields, so
//!    derivation never cycles.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `formkit-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Serialized forms mirror the persisted JSON exactly: camelCase keys,
//!   field order preserved, absent optional attributes omitted.

pub mod collection;
pub mod error;
pub mod field;
pub mod identity;
pub mod schema;
pub mod temporal;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use collection::FormCollection;
pub use error::{FormkitError, IntegrityError, SchemaError};
pub use field::{DerivationPatch, Field, FieldKind, FieldPatch, RuleKind, ValidationRule};
pub use identity::{is_identifier, FieldId, FormId};
pub use schema::FormSchema;
pub use temporal::Timestamp;
pub use value::{FieldValue, FormValues};
