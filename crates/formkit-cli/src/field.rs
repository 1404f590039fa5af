//! # Field Subcommand
//!
//! Edits the fields of a saved form. Each command selects the form into
//! the studio draft, applies one edit, and saves the form under its
//! current name.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::warn;

use formkit_core::{Field, FieldId, FieldKind, FieldPatch, FormId};
use formkit_formula::Formula;
use formkit_state::FormStudio;
use formkit_store::JsonFileStore;

use crate::config::CliConfig;
use crate::input::{parse_kind, parse_rule, parse_value};
use crate::{open_studio, resolve_form_id};

/// Arguments for the `formkit field` subcommand.
#[derive(Args, Debug)]
pub struct FieldArgs {
    #[command(subcommand)]
    pub command: FieldCommand,
}

/// Field subcommands.
#[derive(Subcommand, Debug)]
pub enum FieldCommand {
    /// Append a field with default settings.
    Add {
        /// Form id or unique id prefix.
        form: String,
        /// Field kind: text, number, textarea, select, radio, checkbox, date.
        #[arg(long, value_parser = parse_kind)]
        kind: FieldKind,
        /// Label; defaults to "<Kind> Field".
        #[arg(long)]
        label: Option<String>,
    },

    /// Change a field's settings.
    Update {
        /// Form id or unique id prefix.
        form: String,
        /// Field id.
        field: String,
        #[command(flatten)]
        patch: PatchArgs,
    },

    /// Remove a field.
    Delete {
        /// Form id or unique id prefix.
        form: String,
        /// Field id.
        field: String,
    },

    /// Move a field to a new position (0-based).
    Move {
        /// Form id or unique id prefix.
        form: String,
        /// Field id.
        field: String,
        /// Target position.
        #[arg(long)]
        to: usize,
    },

    /// Put all fields in the given order.
    Reorder {
        /// Form id or unique id prefix.
        form: String,
        /// Every field id, in the new order.
        #[arg(required = true)]
        order: Vec<String>,
    },
}

/// Settings accepted by `field update`.
#[derive(Args, Debug, Default, Clone)]
pub struct PatchArgs {
    /// New label.
    #[arg(long)]
    pub label: Option<String>,

    /// Mark the field as required (true/false).
    #[arg(long)]
    pub required: Option<bool>,

    /// New default value, interpreted for the field's kind.
    #[arg(long)]
    pub default: Option<String>,

    /// New kind.
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<FieldKind>,

    /// Choices for select and radio fields, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub choices: Option<Vec<String>>,

    /// Validation rule `kind[:bound]=message`; repeat to set several.
    /// Replaces the existing rules.
    #[arg(long = "rule")]
    pub rules: Vec<String>,

    /// Remove all validation rules.
    #[arg(long, conflicts_with = "rules")]
    pub clear_rules: bool,

    /// Make the field derived with this formula.
    #[arg(long, requires = "parents", conflicts_with = "plain")]
    pub formula: Option<String>,

    /// Parent field ids the formula reads, comma-separated.
    #[arg(long, value_delimiter = ',', requires = "formula")]
    pub parents: Option<Vec<String>>,

    /// Make a derived field user-entered again.
    #[arg(long)]
    pub plain: bool,
}

/// Execute the field subcommand.
pub fn run_field(args: &FieldArgs, config: &CliConfig) -> Result<u8> {
    let mut studio = open_studio(config);

    match &args.command {
        FieldCommand::Add { form, kind, label } => {
            let form_id = select(&mut studio, form)?;
            let id = studio.add_field(*kind);
            if let Some(label) = label {
                studio.update_field(id.as_str(), &FieldPatch::new().with_label(label.as_str()))?;
            }
            save(&mut studio, &form_id)?;
            println!("OK: added {kind} field {id} to form {form_id}");
        }

        FieldCommand::Update { form, field, patch } => {
            let form_id = select(&mut studio, form)?;
            let current = studio
                .draft()
                .field(field)
                .with_context(|| format!("form {form_id} has no field {field}"))?;
            let patch = build_patch(patch, current)?;
            let updated = studio.update_field(field, &patch)?;
            check_formula(updated);
            save(&mut studio, &form_id)?;
            println!("OK: updated field {field} of form {form_id}");
        }

        FieldCommand::Delete { form, field } => {
            let form_id = select(&mut studio, form)?;
            studio.delete_field(field)?;
            save(&mut studio, &form_id)?;
            println!("OK: deleted field {field} from form {form_id}");
        }

        FieldCommand::Move { form, field, to } => {
            let form_id = select(&mut studio, form)?;
            studio.move_field(field, *to)?;
            save(&mut studio, &form_id)?;
            println!("OK: moved field {field} to position {to}");
        }

        FieldCommand::Reorder { form, order } => {
            let form_id = select(&mut studio, form)?;
            let order = order
                .iter()
                .map(|id| FieldId::new(id.as_str()))
                .collect::<Result<Vec<_>, _>>()?;
            studio.reorder_fields(&order)?;
            save(&mut studio, &form_id)?;
            println!("OK: reordered fields of form {form_id}");
        }
    }

    Ok(0)
}

fn select(studio: &mut FormStudio<JsonFileStore>, raw: &str) -> Result<FormId> {
    let id = resolve_form_id(studio.collection(), raw)?;
    studio.select_schema_for_edit(&id)?;
    Ok(id)
}

fn save(studio: &mut FormStudio<JsonFileStore>, id: &FormId) -> Result<()> {
    let name = studio.draft().name.clone();
    studio
        .save_schema(&name)
        .with_context(|| format!("failed to save form {id}"))?;
    Ok(())
}

/// Translate `field update` flags into a patch for `current`.
pub fn build_patch(args: &PatchArgs, current: &Field) -> Result<FieldPatch> {
    let mut patch = FieldPatch::new();
    if let Some(kind) = args.kind {
        patch = patch.with_kind(kind);
    }
    if let Some(label) = &args.label {
        patch = patch.with_label(label.as_str());
    }
    if let Some(required) = args.required {
        patch = patch.with_required(required);
    }
    if let Some(raw) = &args.default {
        let kind = args.kind.unwrap_or(current.kind);
        patch = patch.with_default(parse_value(kind, raw));
    }
    if let Some(choices) = &args.choices {
        patch = patch.with_choices(choices.iter().map(String::as_str));
    }
    if args.clear_rules {
        patch = patch.with_rules(Vec::new());
    } else if !args.rules.is_empty() {
        let rules = args
            .rules
            .iter()
            .map(|spec| parse_rule(spec))
            .collect::<Result<Vec<_>>>()?;
        patch = patch.with_rules(rules);
    }
    if let (Some(formula), Some(parents)) = (&args.formula, &args.parents) {
        let parents = parents
            .iter()
            .map(|p| FieldId::new(p.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        patch = patch.derived(formula.as_str(), parents);
    } else if args.plain {
        patch = patch.plain();
    }
    Ok(patch)
}

/// Warn about a derived field whose formula will always fall back to the
/// default value.
fn check_formula(field: &Field) {
    let Some(source) = field.formula.as_deref().filter(|_| field.is_derived) else {
        return;
    };
    match Formula::parse(source) {
        Ok(formula) => {
            for name in formula.variables() {
                let declared = field
                    .parent_field_ids
                    .as_ref()
                    .is_some_and(|parents| parents.contains(name));
                if !declared {
                    warn!(field = %field.id, name, "formula reads a name that is not a parent");
                }
            }
        }
        Err(error) => {
            warn!(field = %field.id, %error, "formula does not parse; the field will show its default value");
        }
    }
}
