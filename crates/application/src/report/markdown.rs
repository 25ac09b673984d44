//! Markdown comparison tables.
//!
//! Rendering matches the layout of the historical reports byte for byte so
//! that appended batches line up with earlier ones:
//!
//! ```text
//! | Model Name | t1 | t2 |
//! |  --- |  --- |  --- | 
//! | A | 0.70 | **0.90** |
//! ```

use super::aggregate::Winners;
use serde::Serialize;
use vlm_bench_domain::{ReportError, TestScores};

const HEADER_PREFIX: &str = "| Model Name |";

fn format_cell(score: f64, bold: bool) -> String {
    if bold {
        format!("**{score:.2}**")
    } else {
        format!("{score:.2}")
    }
}

/// Render one table with a row per model and a column per test.
///
/// Missing scores render as `0.00`; the winner of each column is bolded.
pub fn render_table<M, C>(models: &[M], scores: &TestScores, columns: &[C], winners: &Winners) -> String
where
    M: AsRef<str>,
    C: AsRef<str>,
{
    let names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();

    let mut table = format!("| Model Name | {} |\n", names.join(" | "));
    table.push_str(&format!("| {}\n", " --- | ".repeat(names.len() + 1)));

    for model in models {
        let model = model.as_ref();
        let mut row = vec![model.to_string()];
        for column in &names {
            let winner = winners.get(*column).and_then(|w| w.as_deref());
            row.push(format_cell(
                scores.score_or_zero(model, column),
                winner == Some(model),
            ));
        }
        table.push_str(&format!("| {} |\n", row.join(" | ")));
    }

    table
}

/// A table read back from markdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// One model row of a parsed table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub model: String,
    pub values: Vec<f64>,
    /// Columns whose cell was bolded
    pub bold: Vec<String>,
}

fn split_cells(line: &str) -> Vec<&str> {
    let inner = line.trim().trim_start_matches('|');
    let inner = inner.strip_suffix('|').unwrap_or(inner);
    inner.split('|').map(str::trim).collect()
}

fn is_separator(line: &str) -> bool {
    let cells = split_cells(line);
    !cells.is_empty() && cells.iter().all(|c| c.is_empty() || c.chars().all(|ch| ch == '-'))
}

/// Parse every table of a report.
///
/// Lines that do not start with `|` (blank lines, image links) are skipped.
pub fn parse_tables(text: &str) -> Result<Vec<ParsedTable>, ReportError> {
    let mut tables: Vec<ParsedTable> = Vec::new();
    let mut expect_separator = false;

    for (index, line) in text.lines().enumerate() {
        let number = index + 1;
        let line = line.trim_end();
        if !line.starts_with('|') {
            continue;
        }

        if line.starts_with(HEADER_PREFIX) {
            let columns: Vec<String> = split_cells(line)
                .into_iter()
                .skip(1)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            tables.push(ParsedTable {
                columns,
                rows: Vec::new(),
            });
            expect_separator = true;
            continue;
        }

        if expect_separator {
            if !is_separator(line) {
                return Err(ReportError::MalformedTable {
                    line: number,
                    message: "expected separator row after header".to_string(),
                });
            }
            expect_separator = false;
            continue;
        }

        let Some(table) = tables.last_mut() else {
            return Err(ReportError::MalformedTable {
                line: number,
                message: "row before any header".to_string(),
            });
        };

        let cells = split_cells(line);
        if cells.len() != table.columns.len() + 1 {
            return Err(ReportError::MalformedTable {
                line: number,
                message: format!(
                    "expected {} cells, found {}",
                    table.columns.len() + 1,
                    cells.len()
                ),
            });
        }

        let mut values = Vec::with_capacity(table.columns.len());
        let mut bold = Vec::new();
        for (column, cell) in table.columns.iter().zip(&cells[1..]) {
            let stripped = cell.trim_matches('*');
            if stripped.len() != cell.len() {
                bold.push(column.clone());
            }
            let value = stripped.parse::<f64>().map_err(|e| ReportError::MalformedTable {
                line: number,
                message: format!("bad value '{cell}': {e}"),
            })?;
            values.push(value);
        }

        table.rows.push(TableRow {
            model: cells[0].to_string(),
            values,
            bold,
        });
    }

    Ok(tables)
}

/// Parse a text holding exactly one table.
pub fn parse_table(text: &str) -> Result<ParsedTable, ReportError> {
    let mut tables = parse_tables(text)?;
    match tables.len() {
        1 => Ok(tables.remove(0)),
        n => Err(ReportError::MalformedTable {
            line: 0,
            message: format!("expected one table, found {n}"),
        }),
    }
}
