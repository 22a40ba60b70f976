//! Table export as CSV, TSV or JSON

use anyhow::{Context, Result};
use labdump::DenseTable;
use std::fs;
use std::path::Path;

use crate::cli::OutputFormat;

/// Render a table in the requested format
pub fn format_table(table: &DenseTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(format_delimited(table, ',')),
        OutputFormat::Tsv => Ok(format_delimited(table, '\t')),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(table).context("Failed to serialize table")?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Header row of axis name and y labels, then one line per x label
pub fn format_delimited(table: &DenseTable, sep: char) -> String {
    let mut output = String::new();

    push_field(&mut output, &table.x_axis.name, sep);
    for label in &table.y_axis.labels {
        output.push(sep);
        push_field(&mut output, &label.to_string(), sep);
    }
    output.push('\n');

    for row in table {
        push_field(&mut output, &row.label.to_string(), sep);
        for value in row.values {
            output.push(sep);
            output.push_str(&value.to_string());
        }
        output.push('\n');
    }

    output
}

fn push_field(output: &mut String, field: &str, sep: char) {
    if field.contains(sep) || field.contains('"') || field.contains('\n') {
        output.push('"');
        output.push_str(&field.replace('"', "\"\""));
        output.push('"');
    } else {
        output.push_str(field);
    }
}

/// Write a table to `path`, or stdout when no path is given
pub fn write_table(table: &DenseTable, format: OutputFormat, path: Option<&Path>) -> Result<()> {
    let text = format_table(table, format)?;
    match path {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
