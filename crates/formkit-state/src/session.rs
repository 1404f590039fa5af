//! # Form Session State Machine
//!
//! One data-entry session over a schema snapshot.
//!
//! ## States
//!
//! ```text
//! Initializing ──initialize()──▶ Ready ──submit() [valid]──▶ Submitted
//!                                 │  ▲
//!                                 └──┘ set_value(), submit() [invalid]
//! ```
//!
//! `Submitted` is terminal. Editing again requires a new session.
//!
//! ## Values
//!
//! `initialize` fills every field with its resolved value, then runs
//! propagation so derived fields reflect parent defaults. `set_value`
//! rejects writes to derived fields and values the field kind does not
//! accept, then re-runs propagation. Validation errors are computed on
//! `submit`; a successful `set_value` clears the stored error for that
//! field only.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use formkit_core::{FieldValue, FormSchema, FormValues, Timestamp};
use formkit_formula::{propagate, resolve};
use formkit_rules::{validate_form, FormValidationState};

use crate::submission::FormSubmissionData;

// ─── Session State ───────────────────────────────────────────────────

/// Lifecycle state of a [`FormSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Created, values not yet resolved.
    Initializing,
    /// Accepting edits and submit attempts.
    Ready,
    /// A valid submission was produced. Terminal.
    Submitted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "Initializing",
            Self::Ready => "Ready",
            Self::Submitted => "Submitted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Error raised by a session operation. The session is unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while session is {state}")]
    InvalidState {
        /// Current state.
        state: SessionState,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The schema has no field with this id.
    #[error("unknown field {field}")]
    UnknownField {
        /// The requested id.
        field: String,
    },

    /// Derived fields are computed and cannot be set.
    #[error("field {field} is derived and read-only")]
    DerivedField {
        /// The derived field.
        field: String,
    },

    /// The value's type does not fit the field kind.
    #[error("field {field} of kind {kind} does not accept a {found} value")]
    ValueKindMismatch {
        /// The target field.
        field: String,
        /// The field kind.
        kind: String,
        /// Type of the rejected value.
        found: &'static str,
    },

    /// A select or radio value that is not one of the field's choices.
    #[error("{value:?} is not a choice of field {field}")]
    ValueNotInChoices {
        /// The target field.
        field: String,
        /// The rejected value.
        value: String,
    },
}

// ─── Transition Record ───────────────────────────────────────────────

/// Record of one state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionTransition {
    /// State before the transition.
    pub from_state: SessionState,
    /// State after the transition.
    pub to_state: SessionState,
    /// When the transition occurred.
    pub timestamp: Timestamp,
    /// What caused it.
    pub reason: String,
}

/// Result of a submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The form was valid; the session is now `Submitted`.
    Accepted(FormSubmissionData),
    /// The form was invalid; the session stays `Ready`.
    Rejected(FormValidationState),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

// ─── Session ─────────────────────────────────────────────────────────

/// A data-entry session over one schema snapshot.
#[derive(Debug, Clone)]
pub struct FormSession {
    schema: FormSchema,
    values: FormValues,
    errors: FormValidationState,
    state: SessionState,
    transitions: Vec<SessionTransition>,
}

impl FormSession {
    /// A session in `Initializing` with no values.
    pub fn new(schema: FormSchema) -> Self {
        Self {
            schema,
            values: FormValues::new(),
            errors: FormValidationState::new(),
            state: SessionState::Initializing,
            transitions: Vec::new(),
        }
    }

    /// A session that is already initialized and `Ready`.
    pub fn start(schema: FormSchema) -> Self {
        let mut session = Self::new(schema);
        session.fill_initial_values();
        session
    }

    /// Resolve initial values and move to `Ready`.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless the session is `Initializing`.
    pub fn initialize(&mut self) -> Result<&FormValues, SessionError> {
        self.require_state(SessionState::Initializing, "initialize")?;
        self.fill_initial_values();
        Ok(&self.values)
    }

    /// Set a user-entered value and recompute derived fields.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless `Ready`; otherwise
    /// `UnknownField`, `DerivedField`, `ValueKindMismatch`, or
    /// `ValueNotInChoices` for a rejected write.
    pub fn set_value(&mut self, id: &str, value: FieldValue) -> Result<(), SessionError> {
        self.require_state(SessionState::Ready, "set a value")?;

        let field = self
            .schema
            .field(id)
            .ok_or_else(|| SessionError::UnknownField {
                field: id.to_string(),
            })?;
        if field.is_derived {
            return Err(SessionError::DerivedField {
                field: id.to_string(),
            });
        }
        if !field.kind.accepts(&value) {
            return Err(SessionError::ValueKindMismatch {
                field: id.to_string(),
                kind: field.kind.to_string(),
                found: value.type_name(),
            });
        }
        if let (Some(choices), FieldValue::Text(text)) = (&field.choices, &value) {
            if !text.is_empty() && !choices.iter().any(|c| c == text) {
                return Err(SessionError::ValueNotInChoices {
                    field: id.to_string(),
                    value: text.clone(),
                });
            }
        }

        let field_id = field.id.clone();
        self.values.insert(field_id, value);
        self.errors.clear_field(id);
        let passes = propagate(&self.schema, &mut self.values);
        debug!(field = id, passes, "value set");
        Ok(())
    }

    /// Validate the form and, if valid, produce a submission.
    ///
    /// # Errors
    ///
    /// [`SessionError::InvalidState`] unless `Ready`. An invalid form is not
    /// an error; it yields [`SubmitOutcome::Rejected`].
    pub fn submit(&mut self) -> Result<SubmitOutcome, SessionError> {
        self.require_state(SessionState::Ready, "submit")?;

        self.errors = validate_form(&self.schema, &self.values);
        if !self.errors.is_valid() {
            info!(form = %self.schema.name, errors = self.errors.len(), "submission rejected");
            return Ok(SubmitOutcome::Rejected(self.errors.clone()));
        }

        let submission = FormSubmissionData::snapshot(&self.schema, &self.values);
        self.do_transition(SessionState::Submitted, "valid submission");
        info!(form = %self.schema.name, "form submitted");
        Ok(SubmitOutcome::Accepted(submission))
    }

    /// The schema snapshot this session runs over.
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Current values.
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// The value of one field.
    pub fn value(&self, id: &str) -> Option<&FieldValue> {
        self.values.get(id)
    }

    /// Errors from the last submit attempt, minus fields edited since.
    pub fn errors(&self) -> &FormValidationState {
        &self.errors
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Transitions so far, oldest first.
    pub fn transitions(&self) -> &[SessionTransition] {
        &self.transitions
    }

    fn fill_initial_values(&mut self) {
        let empty = FormValues::new();
        let mut values: FormValues = self
            .schema
            .fields
            .iter()
            .map(|field| (field.id.clone(), resolve(field, &self.schema, &empty)))
            .collect();
        propagate(&self.schema, &mut values);
        self.values = values;
        self.errors = FormValidationState::new();
        self.do_transition(SessionState::Ready, "initialized");
    }

    fn require_state(&self, expected: SessionState, operation: &'static str) -> Result<(), SessionError> {
        if self.state != expected {
            return Err(SessionError::InvalidState {
                state: self.state,
                operation,
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: SessionState, reason: &str) {
        self.transitions.push(SessionTransition {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
