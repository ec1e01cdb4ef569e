//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Prints a success message.
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// One row of a field/value table.
#[derive(Debug, Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Outputs a single item.
///
/// Tables list the item's top-level fields; empty and null fields are left
/// out.
pub fn output_single<T: Serialize>(item: &T, format: OutputFormat) -> crate::CliResult<()> {
    match format {
        OutputFormat::Table => {
            let rows = field_rows(&serde_json::to_value(item)?);
            if rows.is_empty() {
                info("Nothing to show.");
            } else {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(item)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn field_rows(value: &serde_json::Value) -> Vec<FieldRow> {
    let serde_json::Value::Object(map) = value else {
        return vec![FieldRow {
            field: "value".to_string(),
            value: value.to_string(),
        }];
    };

    map.iter()
        .filter_map(|(key, val)| {
            let value = match val {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) if s.is_empty() => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some(FieldRow {
                field: key.clone(),
                value,
            })
        })
        .collect()
}
