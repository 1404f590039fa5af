//! # Derived Field Resolution
//!
//! A derived field's formula sees only the field's declared parents that
//! exist in the schema. A parent with no value yet reads as `0`; any other
//! value goes through [`FieldValue::as_number`].

use tracing::debug;

use formkit_core::{Field, FieldValue, FormSchema, FormValues};

use crate::error::FormulaError;
use crate::parser::Formula;

/// Evaluate the formula of a derived field against `values`.
///
/// # Errors
///
/// [`FormulaError::Empty`] if the field has no formula, any parse error,
/// [`FormulaError::UndefinedVariable`] for a name that is not a declared
/// parent present in `schema`, [`FormulaError::NonNumericOperand`] for a
/// parent whose value is not numeric, or [`FormulaError::NonFinite`].
pub fn evaluate_derived(
    field: &Field,
    schema: &FormSchema,
    values: &FormValues,
) -> Result<f64, FormulaError> {
    let source = field.formula.as_deref().ok_or(FormulaError::Empty)?;
    let formula = Formula::parse(source)?;

    formula.evaluate(|name| {
        let declared = field
            .parent_field_ids
            .as_ref()
            .is_some_and(|parents| parents.contains(name));
        if !declared || schema.field(name).is_none() {
            return Err(FormulaError::UndefinedVariable {
                name: name.to_string(),
            });
        }
        match values.get(name) {
            None => Ok(0.0),
            Some(value) => value.as_number().ok_or_else(|| FormulaError::NonNumericOperand {
                name: name.to_string(),
            }),
        }
    })
}

/// The value a field should hold given the current `values`.
///
/// Non-derived fields resolve to their default. Derived fields resolve to
/// the formula result, or to their default if evaluation fails.
pub fn resolve(field: &Field, schema: &FormSchema, values: &FormValues) -> FieldValue {
    if !field.is_derived {
        return field.default_value.clone();
    }
    match evaluate_derived(field, schema, values) {
        Ok(result) => FieldValue::Number(result),
        Err(error) => {
            debug!(field = %field.id, %error, "formula failed, using default value");
            field.default_value.clone()
        }
    }
}

/// Recompute every derived field of `schema` in `values` until no value
/// changes, and return how many passes changed something.
///
/// Runs at most one pass per derived field plus a confirming pass, so it
/// terminates even if derivation integrity were violated.
pub fn propagate(schema: &FormSchema, values: &mut FormValues) -> usize {
    let derived: Vec<&Field> = schema.derived_fields().collect();
    let mut changed_passes = 0;

    for _ in 0..=derived.len() {
        let mut changed = false;
        for field in &derived {
            let next = resolve(field, schema, values);
            if values.get(field.id.as_str()) != Some(&next) {
                values.insert(field.id.clone(), next);
                changed = true;
            }
        }
        if !changed {
            break;
        }
        changed_passes += 1;
    }

    changed_passes
}
