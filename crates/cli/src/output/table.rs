//! Table formatting utilities

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, *};
use vlm_bench_application::Winners;
use vlm_bench_domain::{ScoreTable, TestScores};

/// Table formatter
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new table with default styling
    pub fn new() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a simple table with headers and rows
    pub fn simple<H: ToString>(headers: &[H], rows: Vec<Vec<String>>) -> String {
        let mut table = Self::new();
        table.set_header(headers.iter().map(|h| h.to_string()));
        for row in rows {
            table.add_row(row);
        }
        table.to_string()
    }

    /// Create a key-value table
    pub fn key_value(items: Vec<(&str, String)>) -> String {
        let mut table = Self::new();
        for (key, value) in items {
            table.add_row(vec![Cell::new(key).add_attribute(Attribute::Bold), Cell::new(value)]);
        }
        table.to_string()
    }

    /// An evaluator score table
    pub fn score_table(scores: &ScoreTable) -> String {
        Self::simple(&scores.headers(), scores.rows())
    }

    /// Model x test scores, winners in bold green
    pub fn comparison(models: &[String], scores: &TestScores, columns: &[String], winners: &Winners) -> String {
        let mut table = Self::new();
        table.set_header(std::iter::once("Model Name".to_string()).chain(columns.iter().cloned()));

        for model in models {
            let mut row = vec![Cell::new(model)];
            for column in columns {
                let cell = Cell::new(format!("{:.2}", scores.score_or_zero(model, column)))
                    .set_alignment(CellAlignment::Right);
                let won = winners.get(column).and_then(|w| w.as_deref()) == Some(model.as_str());
                row.push(if won {
                    cell.add_attribute(Attribute::Bold).fg(Color::Green)
                } else {
                    cell
                });
            }
            table.add_row(row);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let out = TableFormatter::simple(
            &["Model", "Params"],
            vec![vec!["InternVL2_5-1B".to_string(), "0.9".to_string()]],
        );
        assert!(out.contains("InternVL2_5-1B"));
        assert!(out.contains("Params"));
    }

    #[test]
    fn test_score_table() {
        let out = TableFormatter::score_table(&ScoreTable::MicroF1 { f1: 0.5 });
        assert!(out.contains("f1"));
        assert!(out.contains("0.5"));
    }

    #[test]
    fn test_comparison_formats_two_decimals() {
        let mut scores = TestScores::new();
        scores.set("A", "MME", 0.875);
        let columns = vec!["MME".to_string(), "HICO".to_string()];
        let winners = vlm_bench_application::best_of_type(&scores, &columns);
        let out = TableFormatter::comparison(&["A".to_string()], &scores, &columns, &winners);
        assert!(out.contains("Model Name"));
        assert!(out.contains("0.00"));
    }
}
