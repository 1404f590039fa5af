//! # Form Studio
//!
//! The object a presentation layer drives. It owns the saved collection,
//! one draft schema being edited, and at most one preview session.
//!
//! ## Ownership
//!
//! The draft and the preview session hold copies. Selecting a saved schema
//! for editing clones it into the draft; nothing reaches the collection
//! until [`FormStudio::save_schema`]. Previewing clones the schema into a
//! fresh [`FormSession`], so later draft edits do not affect an open
//! preview.
//!
//! ## Persistence
//!
//! `save_schema` and `delete_schema` update the in-memory collection first
//! and then write it through the [`FormStore`]. A failed write is returned
//! as [`StudioError::Persistence`] but the in-memory change stands.

use thiserror::Error;
use tracing::{debug, info};

use formkit_core::{
    Field, FieldId, FieldKind, FieldPatch, FieldValue, FormCollection, FormId, FormSchema,
    FormValues, SchemaError,
};
use formkit_rules::FormValidationState;
use formkit_store::{FormStore, StoreError};

use crate::session::{FormSession, SessionError, SubmitOutcome};

/// Error raised by a studio operation.
#[derive(Error, Debug)]
pub enum StudioError {
    /// A schema cannot be saved without a name.
    #[error("form name must not be blank")]
    BlankName,

    /// No saved schema has this id.
    #[error("form not found: {id}")]
    FormNotFound {
        /// The requested id.
        id: String,
    },

    /// A value or submit was requested with no preview open.
    #[error("no form is being previewed")]
    NoActiveSession,

    /// A draft edit was rejected.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A preview operation was rejected.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The collection was updated in memory but could not be stored.
    #[error("form collection not persisted: {0}")]
    Persistence(#[from] StoreError),
}

/// Builder and preview state over a [`FormStore`].
#[derive(Debug)]
pub struct FormStudio<S: FormStore> {
    store: S,
    collection: FormCollection,
    draft: FormSchema,
    preview: Option<FormSession>,
}

impl<S: FormStore> FormStudio<S> {
    /// Load the collection from `store` and start with an empty draft.
    pub fn open(store: S) -> Self {
        let collection = store.load();
        debug!(forms = collection.len(), "studio opened");
        Self {
            store,
            collection,
            draft: FormSchema::new(""),
            preview: None,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Saved schemas.
    pub fn collection(&self) -> &FormCollection {
        &self.collection
    }

    /// The schema being edited.
    pub fn draft(&self) -> &FormSchema {
        &self.draft
    }

    /// The draft's fields in display order.
    pub fn fields(&self) -> &[Field] {
        &self.draft.fields
    }

    /// The open preview session, if any.
    pub fn preview(&self) -> Option<&FormSession> {
        self.preview.as_ref()
    }

    /// Values of the open preview session.
    pub fn values(&self) -> Option<&FormValues> {
        self.preview.as_ref().map(FormSession::values)
    }

    /// Validation errors of the open preview session.
    pub fn errors(&self) -> Option<&FormValidationState> {
        self.preview.as_ref().map(FormSession::errors)
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Draft editing ───────────────────────────────────────────────

    /// Discard the draft and start a new, unsaved one.
    pub fn new_draft(&mut self) -> &FormSchema {
        self.draft = FormSchema::new("");
        &self.draft
    }

    /// Append a field of `kind` to the draft.
    pub fn add_field(&mut self, kind: FieldKind) -> FieldId {
        let id = self.draft.add_field(kind);
        debug!(field = %id, kind = %kind, "field added");
        id
    }

    /// Patch a draft field.
    pub fn update_field(&mut self, id: &str, patch: &FieldPatch) -> Result<&Field, StudioError> {
        Ok(self.draft.update_field(id, patch)?)
    }

    /// Remove a draft field.
    pub fn delete_field(&mut self, id: &str) -> Result<Field, StudioError> {
        Ok(self.draft.delete_field(id)?)
    }

    /// Rearrange draft fields into `order`.
    pub fn reorder_fields(&mut self, order: &[FieldId]) -> Result<(), StudioError> {
        Ok(self.draft.reorder_fields(order)?)
    }

    /// Move one draft field to `to`.
    pub fn move_field(&mut self, id: &str, to: usize) -> Result<(), StudioError> {
        Ok(self.draft.move_field(id, to)?)
    }

    // ── Collection ──────────────────────────────────────────────────

    /// Name the draft, save it into the collection, and persist.
    ///
    /// The first save assigns the draft an id; later saves replace the
    /// saved copy in place. Returns the draft's id.
    ///
    /// # Errors
    ///
    /// [`StudioError::BlankName`] before anything changes, or
    /// [`StudioError::Persistence`] after the collection was updated.
    pub fn save_schema(&mut self, name: &str) -> Result<FormId, StudioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StudioError::BlankName);
        }
        self.draft.name = name.to_string();
        let id = self.collection.save_schema(self.draft.clone());
        self.draft.id = id.clone();
        info!(form = %id, name, fields = self.draft.fields.len(), "form saved");
        self.persist()?;
        Ok(id)
    }

    /// Remove a saved schema and persist. Absent ids are a no-op.
    ///
    /// A draft or preview of the removed schema is discarded.
    pub fn delete_schema(&mut self, id: &FormId) -> Result<Option<FormSchema>, StudioError> {
        let Some(removed) = self.collection.delete_schema(id) else {
            return Ok(None);
        };
        if self.draft.id == *id {
            self.new_draft();
        }
        if self.preview.as_ref().is_some_and(|s| s.schema().id == *id) {
            self.preview = None;
        }
        info!(form = %id, "form deleted");
        self.persist()?;
        Ok(Some(removed))
    }

    /// Copy a saved schema into the draft.
    pub fn select_schema_for_edit(&mut self, id: &FormId) -> Result<&FormSchema, StudioError> {
        let schema = self.saved(id)?.clone();
        self.draft = schema;
        Ok(&self.draft)
    }

    // ── Preview ─────────────────────────────────────────────────────

    /// Open a preview session over a saved schema.
    pub fn select_schema_for_preview(&mut self, id: &FormId) -> Result<&FormSession, StudioError> {
        let schema = self.saved(id)?.clone();
        Ok(&*self.preview.insert(FormSession::start(schema)))
    }

    /// Open a preview session over the current draft.
    pub fn preview_draft(&mut self) -> &FormSession {
        self.preview.insert(FormSession::start(self.draft.clone()))
    }

    /// Close the preview session.
    pub fn close_preview(&mut self) -> Option<FormSession> {
        self.preview.take()
    }

    /// Set a value in the preview session.
    pub fn set_value(&mut self, id: &str, value: FieldValue) -> Result<(), StudioError> {
        Ok(self.session_mut()?.set_value(id, value)?)
    }

    /// Submit the preview session.
    pub fn submit(&mut self) -> Result<SubmitOutcome, StudioError> {
        Ok(self.session_mut()?.submit()?)
    }

    fn session_mut(&mut self) -> Result<&mut FormSession, StudioError> {
        self.preview.as_mut().ok_or(StudioError::NoActiveSession)
    }

    fn saved(&self, id: &FormId) -> Result<&FormSchema, StudioError> {
        self.collection
            .get(id)
            .ok_or_else(|| StudioError::FormNotFound { id: id.to_string() })
    }

    fn persist(&mut self) -> Result<(), StudioError> {
        Ok(self.store.save(&self.collection)?)
    }
}
