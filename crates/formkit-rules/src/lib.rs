//! # formkit-rules — Validation Engine
//!
//! Evaluates a field's validation rules against a candidate value and
//! collects per-field failures across a whole form.
//!
//! - [`validate`] — rules in declared order, first failure's message wins.
//! - [`validate_form`] — every field of a schema, producing a
//!   [`FormValidationState`] that is empty when the form is valid.
//!
//! Validation failures are ordinary values. Nothing here returns `Err`.

pub mod state;
pub mod validate;

pub use state::{validate_form, FormValidationState};
pub use validate::{check_rule, validate};
