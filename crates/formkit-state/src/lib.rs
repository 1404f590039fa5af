//! # formkit-state — Form Runtime
//!
//! Runtime state for building and filling forms.
//!
//! - [`session`]: the per-session state machine
//!   (`Initializing → Ready → Submitted`) that owns form values, applies
//!   edits, re-resolves derived fields, and produces submissions.
//! - [`submission`]: the immutable [`FormSubmissionData`] record.
//! - [`studio`]: [`FormStudio`], the facade a presentation layer drives. It
//!   holds the saved collection, the draft being edited, and the open
//!   preview session, and writes through a [`formkit_store::FormStore`].
//!
//! ## Key Design Principles
//!
//! 1. **Explicit session objects.** Values and validation state live in a
//!    [`FormSession`] owned by the caller. There is no global form state.
//!
//! 2. **Runtime-checked transitions.** Every session operation checks the
//!    current state and fails with [`SessionError::InvalidState`] instead of
//!    silently doing nothing. Transitions are logged with timestamps.
//!
//! 3. **Copy-on-read.** Drafts and previews are clones of saved schemas;
//!    only `save_schema` writes back.
//!
//! ## Crate Policy
//!
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Validation failures are values ([`SubmitOutcome::Rejected`]), never
//!   errors.

pub mod session;
pub mod studio;
pub mod submission;

pub use session::{FormSession, SessionError, SessionState, SessionTransition, SubmitOutcome};
pub use studio::{FormStudio, StudioError};
pub use submission::FormSubmissionData;
