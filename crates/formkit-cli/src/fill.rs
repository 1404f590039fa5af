//! # Fill Subcommand
//!
//! Opens a preview session over a saved form, applies `--set` values in
//! order, and submits. A valid form prints the submission JSON and exits
//! 0; an invalid one prints the per-field errors as JSON and exits 2.

use anyhow::{Context, Result};
use clap::Args;

use formkit_state::SubmitOutcome;

use crate::config::CliConfig;
use crate::input::{parse_assignment, parse_value};
use crate::{open_studio, resolve_form_id};

/// Exit code for a submission rejected by validation.
pub const EXIT_INVALID: u8 = 2;

/// Arguments for the `formkit fill` subcommand.
#[derive(Args, Debug)]
pub struct FillArgs {
    /// Form id or unique id prefix.
    pub form: String,

    /// Field value as `ID=VALUE`; repeat for each field.
    #[arg(long = "set", value_parser = parse_assignment)]
    pub values: Vec<(String, String)>,
}

/// Execute the fill subcommand.
pub fn run_fill(args: &FillArgs, config: &CliConfig) -> Result<u8> {
    let (code, output) = fill(args, config)?;
    println!("{output}");
    Ok(code)
}

/// Run a fill and return the exit code with the JSON to print.
pub fn fill(args: &FillArgs, config: &CliConfig) -> Result<(u8, String)> {
    let mut studio = open_studio(config);
    let form_id = resolve_form_id(studio.collection(), &args.form)?;
    studio.select_schema_for_preview(&form_id)?;

    for (field, raw) in &args.values {
        let kind = studio
            .preview()
            .and_then(|session| session.schema().field(field))
            .map(|f| f.kind)
            .with_context(|| format!("form {form_id} has no field {field}"))?;
        studio
            .set_value(field, parse_value(kind, raw))
            .with_context(|| format!("cannot set {field}"))?;
    }

    match studio.submit()? {
        SubmitOutcome::Accepted(submission) => {
            tracing::info!(form = %form_id, "submission accepted");
            Ok((0, serde_json::to_string_pretty(&submission)?))
        }
        SubmitOutcome::Rejected(errors) => {
            tracing::info!(form = %form_id, errors = errors.len(), "submission rejected");
            Ok((EXIT_INVALID, serde_json::to_string_pretty(&errors)?))
        }
    }
}
