//! # Form Subcommand
//!
//! Saved-form management.
//!
//! - `new` — Create and save an empty form.
//! - `list` — List saved forms with field counts and creation dates.
//! - `show` — Print one form's fields, or its stored JSON.
//! - `rename` — Change a form's name.
//! - `delete` — Remove a form.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use formkit_core::{Field, FormSchema};

use crate::config::CliConfig;
use crate::{open_studio, resolve_form_id};

/// Arguments for the `formkit form` subcommand.
#[derive(Args, Debug)]
pub struct FormArgs {
    #[command(subcommand)]
    pub command: FormCommand,
}

/// Form subcommands.
#[derive(Subcommand, Debug)]
pub enum FormCommand {
    /// Create a new empty form.
    New {
        /// Form name.
        #[arg(long)]
        name: String,
    },

    /// List saved forms.
    List,

    /// Show a form's fields.
    Show {
        /// Form id or unique id prefix.
        id: String,
        /// Print the stored JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Rename a form.
    Rename {
        /// Form id or unique id prefix.
        id: String,
        /// New name.
        #[arg(long)]
        name: String,
    },

    /// Delete a form.
    Delete {
        /// Form id or unique id prefix.
        id: String,
    },
}

/// Execute the form subcommand.
pub fn run_form(args: &FormArgs, config: &CliConfig) -> Result<u8> {
    match &args.command {
        FormCommand::New { name } => cmd_new(config, name),
        FormCommand::List => cmd_list(config),
        FormCommand::Show { id, json } => cmd_show(config, id, *json),
        FormCommand::Rename { id, name } => cmd_rename(config, id, name),
        FormCommand::Delete { id } => cmd_delete(config, id),
    }
}

fn cmd_new(config: &CliConfig, name: &str) -> Result<u8> {
    let mut studio = open_studio(config);
    studio.new_draft();
    let id = studio.save_schema(name).context("failed to save new form")?;
    println!("OK: created form {id} ({})", studio.draft().name);
    Ok(0)
}

fn cmd_list(config: &CliConfig) -> Result<u8> {
    let studio = open_studio(config);
    let collection = studio.collection();
    if collection.is_empty() {
        println!("No saved forms.");
        return Ok(0);
    }
    println!("{:<36}  {:<6}  {:<10}  NAME", "ID", "FIELDS", "CREATED");
    for schema in collection.iter() {
        println!(
            "{:<36}  {:<6}  {:<10}  {}",
            schema.id,
            schema.fields.len(),
            schema.created_at.to_date_string(),
            schema.name
        );
    }
    Ok(0)
}

fn cmd_show(config: &CliConfig, raw_id: &str, json: bool) -> Result<u8> {
    let studio = open_studio(config);
    let id = resolve_form_id(studio.collection(), raw_id)?;
    let schema = studio
        .collection()
        .get(&id)
        .with_context(|| format!("form {id} disappeared from the collection"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(schema)?);
    } else {
        print!("{}", describe(schema));
    }
    Ok(0)
}

fn cmd_rename(config: &CliConfig, raw_id: &str, name: &str) -> Result<u8> {
    let mut studio = open_studio(config);
    let id = resolve_form_id(studio.collection(), raw_id)?;
    studio.select_schema_for_edit(&id)?;
    studio.save_schema(name).context("failed to rename form")?;
    println!("OK: renamed form {id} to {}", studio.draft().name);
    Ok(0)
}

fn cmd_delete(config: &CliConfig, raw_id: &str) -> Result<u8> {
    let mut studio = open_studio(config);
    let id = resolve_form_id(studio.collection(), raw_id)?;
    if let Some(removed) = studio.delete_schema(&id)? {
        println!("OK: deleted form {id} ({})", removed.name);
    }
    Ok(0)
}

/// Human-readable summary of a schema.
pub fn describe(schema: &FormSchema) -> String {
    let mut out = format!(
        "{} ({})\ncreated {}, {} field(s)\n",
        schema.name,
        schema.id,
        schema.created_at,
        schema.fields.len()
    );
    for (index, field) in schema.fields.iter().enumerate() {
        out.push_str(&format!("{index:>3}. {}\n", describe_field(field)));
    }
    out
}

fn describe_field(field: &Field) -> String {
    let mut line = format!("{} [{}] {:?}", field.id, field.kind, field.label);
    if field.required {
        line.push_str(" required");
    }
    if !field.default_value.is_blank() && !field.is_derived {
        line.push_str(&format!(" default={}", field.default_value));
    }
    if let Some(choices) = &field.choices {
        line.push_str(&format!(" choices={}", choices.join("|")));
    }
    if field.is_derived {
        let formula = field.formula.as_deref().unwrap_or_default();
        let parents: Vec<&str> = field
            .parent_field_ids
            .iter()
            .flatten()
            .map(|p| p.as_str())
            .collect();
        line.push_str(&format!(" = {formula} (from {})", parents.join(", ")));
    }
    if !field.rules.is_empty() {
        let rules: Vec<String> = field
            .rules
            .iter()
            .map(|rule| match rule.kind.bound() {
                Some(bound) => format!("{}:{bound}", rule.kind.as_str()),
                None => rule.kind.as_str().to_string(),
            })
            .collect();
        line.push_str(&format!(" rules={}", rules.join(",")));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use formkit_core::{FieldKind, FieldPatch, FormCollection, ValidationRule};
    use formkit_store::{FormStore, JsonFileStore};

    fn config_in(dir: &tempfile::TempDir) -> CliConfig {
        CliConfig {
            store_path: dir.path().join("forms.json"),
            ..CliConfig::default()
        }
    }

    fn stored(config: &CliConfig) -> FormCollection {
        JsonFileStore::new(&config.store_path).load()
    }

    fn run(config: &CliConfig, command: FormCommand) -> Result<u8> {
        run_form(&FormArgs { command }, config)
    }

    #[test]
    fn new_rename_delete() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        let code = run(&config, FormCommand::New { name: " Survey ".into() }).unwrap();
        assert_eq!(code, 0);
        let collection = stored(&config);
        assert_eq!(collection.len(), 1);
        let schema = collection.iter().next().unwrap();
        assert_eq!(schema.name, "Survey");
        let id = schema.id.to_string();

        run(
            &config,
            FormCommand::Rename {
                id: id[..8].to_string(),
                name: "Feedback".into(),
            },
        )
        .unwrap();
        assert_eq!(stored(&config).iter().next().unwrap().name, "Feedback");

        run(&config, FormCommand::Delete { id }).unwrap();
        assert!(stored(&config).is_empty());
    }

    #[test]
    fn blank_name_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        assert!(run(&config, FormCommand::New { name: "  ".into() }).is_err());
        assert!(!config.store_path.exists());
    }

    #[test]
    fn list_and_show_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        assert_eq!(run(&config, FormCommand::List).unwrap(), 0);
        run(&config, FormCommand::New { name: "Survey".into() }).unwrap();
        let id = stored(&config).iter().next().unwrap().id.to_string();
        assert_eq!(run(&config, FormCommand::List).unwrap(), 0);
        assert_eq!(
            run(&config, FormCommand::Show { id: id.clone(), json: true }).unwrap(),
            0
        );
        assert!(run(&config, FormCommand::Show { id: "zzz".into(), json: false }).is_err());
    }

    #[test]
    fn describe_lists_fields() {
        let mut schema = FormSchema::new("Order");
        let qty = schema.add_field(FieldKind::Number);
        let price = schema.add_field(FieldKind::Number);
        let total = schema.add_field(FieldKind::Number);
        let size = schema.add_field(FieldKind::Radio);
        schema
            .update_field(
                total.as_str(),
                &FieldPatch::new().derived("number_1 * number_2", [qty, price]),
            )
            .unwrap();
        schema
            .update_field(
                size.as_str(),
                &FieldPatch::new()
                    .with_required(true)
                    .with_rules(vec![ValidationRule::required("Pick one")]),
            )
            .unwrap();

        let text = describe(&schema);
        assert!(text.starts_with("Order ("));
        assert!(text.contains("4 field(s)"));
        assert!(text.contains("number_3 [number] \"Number Field\" = number_1 * number_2 (from number_1, number_2)"));
        assert!(text.contains("radio_1 [radio] \"Radio Field\" required choices=Option 1|Option 2 rules=required"));
    }
}
