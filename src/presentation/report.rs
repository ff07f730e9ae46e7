use std::str::FromStr;

use crate::domain::ranking::ReportUnit;
use crate::error::{FameError, Result};
use crate::presentation::table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Tabular,
    Pretty,
    Json,
    JsonLines,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = FameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "tabular" => Ok(OutputFormat::Tabular),
            "pretty" => Ok(OutputFormat::Pretty),
            "json" => Ok(OutputFormat::Json),
            "json-lines" => Ok(OutputFormat::JsonLines),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(FameError::UnknownFormat(other.to_string())),
        }
    }
}

pub fn render(units: &[ReportUnit], format: OutputFormat) -> Result<String> {
    let out = match format {
        OutputFormat::Tabular => table::tabular(units),
        OutputFormat::Pretty => format!("{}\n", table::contributors(units)),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(units)?),
        OutputFormat::JsonLines => {
            let mut out = String::new();
            for u in units {
                out.push_str(&serde_json::to_string(u)?);
                out.push('\n');
            }
            out
        }
        OutputFormat::Csv => {
            let mut out = String::from("Name,Lines,Commits,Files\n");
            for u in units {
                out.push_str(&format!(
                    "{},{},{},{}\n",
                    csv_field(&u.name),
                    u.lines,
                    u.commits,
                    u.files
                ));
            }
            out
        }
    };
    Ok(out)
}

/// Quotes a field when it holds a comma, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
