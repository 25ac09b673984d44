//! Output formatting for the CLI

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

mod table;

pub use table::TableFormatter;

/// How command results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Boxed tables (default)
    #[default]
    Table,
    /// Indented `key: value` lines
    Plain,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            "plain" => Ok(Self::Plain),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Table => write!(f, "table"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Format `value` in the requested format. `table` renders the table view.
pub fn render<T, F>(format: OutputFormat, value: &T, table: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(table()),
        OutputFormat::Plain => Ok(plain(&serde_json::to_value(value)?, 0)),
    }
}

/// Print `value` in the requested format
pub fn emit<T, F>(format: OutputFormat, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> String,
{
    println!("{}", render(format, value, table)?);
    Ok(())
}

fn plain(value: &serde_json::Value, depth: usize) -> String {
    use serde_json::Value;

    let pad = "  ".repeat(depth);
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| match v {
                Value::Object(_) | Value::Array(_) => format!("{pad}-\n{}", plain(v, depth + 1)),
                _ => format!("{pad}- {}", plain(v, depth + 1)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                Value::Object(_) | Value::Array(_) => format!("{pad}{k}:\n{}", plain(v, depth + 1)),
                _ => format!("{pad}{k}: {}", plain(v, depth + 1)),
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Color helpers
pub mod colors {
    use colored::*;

    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    pub fn error(s: &str) -> ColoredString {
        s.red()
    }

    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }

    pub fn bold(s: &str) -> ColoredString {
        s.bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        model: String,
        scores: Vec<f64>,
    }

    fn sample() -> Sample {
        Sample {
            model: "InternVL2_5-1B".to_string(),
            scores: vec![0.5, 0.25],
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("plain".parse::<OutputFormat>(), Ok(OutputFormat::Plain));
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Table.to_string(), "table");
    }

    #[test]
    fn test_render_json() {
        let out = render(OutputFormat::Json, &sample(), String::new).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["model"], "InternVL2_5-1B");
    }

    #[test]
    fn test_render_plain() {
        let out = render(OutputFormat::Plain, &sample(), String::new).unwrap();
        assert_eq!(out, "model: InternVL2_5-1B\nscores:\n  - 0.5\n  - 0.25");
    }

    #[test]
    fn test_render_table_uses_closure() {
        let out = render(OutputFormat::Table, &sample(), || "boxed".to_string()).unwrap();
        assert_eq!(out, "boxed");
    }
}
