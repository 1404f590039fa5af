//! In-memory store.

use formkit_core::FormCollection;

use crate::{decode, encode, FormStore, StoreError};

/// Keeps the serialized record in a string, so loads and saves go through
/// the same encoding as [`JsonFileStore`](crate::JsonFileStore).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    record: Option<String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding `raw` as its record, which need not be valid.
    pub fn with_record(raw: impl Into<String>) -> Self {
        Self {
            record: Some(raw.into()),
        }
    }

    /// The current record, if anything was stored.
    pub fn record(&self) -> Option<&str> {
        self.record.as_deref()
    }
}

impl FormStore for MemoryStore {
    fn load(&self) -> FormCollection {
        match &self.record {
            Some(raw) => decode(raw, "memory"),
            None => FormCollection::new(),
        }
    }

    fn save(&mut self, collection: &FormCollection) -> Result<(), StoreError> {
        self.record = Some(encode(collection)?);
        Ok(())
    }
}
