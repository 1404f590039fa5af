//! # formkit-cli — Command-Line Form Builder
//!
//! Provides the `formkit` command, a terminal presentation layer over
//! [`FormStudio`]. Every invocation loads the saved collection, performs
//! one operation, and writes the collection back.
//!
//! ## Subcommands
//!
//! - `formkit form` — create, list, show, rename, and delete saved forms.
//! - `formkit field` — add, update, delete, move, and reorder fields.
//! - `formkit fill` — preview a form, set values, and submit it.
//!
//! ```bash
//! formkit form new --name "Order"
//! formkit field add 3f2a --kind number --label Price
//! formkit field update 3f2a number_3 --formula "number_1 * number_2" --parents number_1,number_2
//! formkit fill 3f2a --set number_1=2.5 --set number_2=4
//! ```
//!
//! Forms are addressed by id or by any unambiguous id prefix.

pub mod config;
pub mod field;
pub mod fill;
pub mod form;
pub mod input;

use anyhow::{bail, Result};

use formkit_core::{FormCollection, FormId};
use formkit_state::FormStudio;
use formkit_store::JsonFileStore;

use crate::config::CliConfig;

/// Open a studio over the configured store.
pub fn open_studio(config: &CliConfig) -> FormStudio<JsonFileStore> {
    tracing::debug!(store = %config.store_path.display(), "opening form store");
    FormStudio::open(JsonFileStore::new(&config.store_path))
}

/// Find the saved form that `raw` names, by exact id or unique prefix.
pub fn resolve_form_id(collection: &FormCollection, raw: &str) -> Result<FormId> {
    let raw = raw.trim();
    if raw.is_empty() {
        bail!("form id must not be empty");
    }
    let exact = FormId::from(raw);
    if collection.contains(&exact) {
        return Ok(exact);
    }
    let matches: Vec<&FormId> = collection
        .iter()
        .map(|schema| &schema.id)
        .filter(|id| id.as_str().starts_with(raw))
        .collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => bail!("no saved form matches {raw:?}"),
        _ => bail!("{raw:?} matches {} forms; use a longer prefix", matches.len()),
    }
}
