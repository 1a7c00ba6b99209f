//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Output format for commands that render structured data.
#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Render a collection as a column table or pretty JSON.
pub(crate) fn render_records<T: Serialize>(
    records: &[T],
    format: OutputFormat,
    columns: &[&str],
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(records)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            let header = columns
                .iter()
                .map(|column| format!("{:<20}", column.to_uppercase()))
                .collect::<String>();
            println!("{}", header.trim_end());
            for record in records {
                let value = serde_json::to_value(record)
                    .map_err(|err| CliError::failure(anyhow!("failed to format record: {err}")))?;
                let row = columns
                    .iter()
                    .map(|column| format!("{:<20}", cell_text(value.get(*column))))
                    .collect::<String>();
                println!("{}", row.trim_end());
            }
        }
    }
    Ok(())
}

/// Render a single record as `key: value` lines or pretty JSON.
pub(crate) fn render_record<T: Serialize>(record: &T, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(record)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            let value = serde_json::to_value(record)
                .map_err(|err| CliError::failure(anyhow!("failed to format record: {err}")))?;
            if let Value::Object(fields) = value {
                for (name, field) in fields {
                    if field.is_null() {
                        continue;
                    }
                    println!("{name}: {}", cell_text(Some(&field)));
                }
            }
        }
    }
    Ok(())
}

/// Flatten one JSON field into a table cell. Reference objects collapse to
/// their `login` (or `id`) so user columns stay readable.
pub(crate) fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Object(fields)) => fields
            .get("login")
            .or_else(|| fields.get("id"))
            .map_or_else(|| "-".to_string(), |inner| cell_text(Some(inner))),
        Some(other) => other.to_string(),
    }
}
