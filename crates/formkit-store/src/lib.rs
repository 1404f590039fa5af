//! # formkit-store — Persistence Providers
//!
//! Durable storage for the saved form collection.
//!
//! ## Contract
//!
//! A [`FormStore`] holds exactly one serialized [`FormCollection`] under a
//! fixed location. `load` never fails: a missing, unreadable, or corrupt
//! record yields an empty collection and a warning, and a stored schema
//! that fails its integrity check is dropped with a warning. `save`
//! replaces the whole record.
//!
//! ## Record Format
//!
//! The record is the collection serialized as a JSON array of schemas with
//! camelCase keys, exactly as `formkit-core` serializes it.
//!
//! ## Implementations
//!
//! | Type              | Backing                                           |
//! |-------------------|---------------------------------------------------|
//! | [`JsonFileStore`] | one JSON file, replaced atomically via rename     |
//! | [`MemoryStore`]   | an in-process string, for tests and previews      |

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use thiserror::Error;

use formkit_core::{FormCollection, FormSchema};

/// Error raised when the collection cannot be written.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The collection could not be serialized.
    #[error("failed to serialize form collection: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

/// Storage for the saved form collection.
pub trait FormStore: Send + Sync {
    /// Read the stored collection. Absent or corrupt content reads as an
    /// empty collection.
    fn load(&self) -> FormCollection;

    /// Replace the stored collection.
    fn save(&mut self, collection: &FormCollection) -> Result<(), StoreError>;
}

/// Decode a stored record, treating corrupt content as empty.
///
/// Schemas that decode but break a schema invariant (a derivation cycle,
/// a duplicate field id, missing choices) are dropped individually.
pub(crate) fn decode(raw: &str, origin: &str) -> FormCollection {
    let schemas = match serde_json::from_str::<Vec<FormSchema>>(raw) {
        Ok(schemas) => schemas,
        Err(error) => {
            tracing::warn!(%origin, %error, "stored form collection is corrupt, starting empty");
            return FormCollection::new();
        }
    };
    schemas
        .into_iter()
        .filter(|schema| match schema.check_integrity() {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%origin, form = %schema.id, %error, "dropping invalid stored form");
                false
            }
        })
        .collect::<Vec<_>>()
        .into()
}

/// Encode a collection for storage.
pub(crate) fn encode(collection: &FormCollection) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(collection)?)
}
