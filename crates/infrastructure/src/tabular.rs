//! Evaluation-file loading and score-table writing.
//!
//! Evaluation files are tabular prediction dumps with at least `answer` and
//! `prediction` columns. They may be xlsx workbooks (first sheet), CSV,
//! TSV, a JSON array of objects or JSON Lines.

use calamine::{open_workbook, Data, Range, RangeDeserializerBuilder, Reader, Xlsx};
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, instrument};
use vlm_bench_domain::{EvaluationError, ScoreTable};

/// Supported evaluation file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// Excel workbook, first sheet with a header row
    Xlsx,
    /// Comma-separated with header
    Csv,
    /// Tab-separated with header
    Tsv,
    /// JSON array of objects
    Json,
    /// One JSON object per line
    Jsonl,
}

impl TabularFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self, EvaluationError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);

        match ext.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            Some("tsv") => Ok(Self::Tsv),
            Some("json") => Ok(Self::Json),
            Some("jsonl") | Some("ndjson") => Ok(Self::Jsonl),
            _ => Err(EvaluationError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            Self::Tsv => b'\t',
            _ => b',',
        }
    }
}

fn io_error(path: &Path, e: impl fmt::Display) -> EvaluationError {
    EvaluationError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn parse_error(path: &Path, row: usize, e: impl fmt::Display) -> EvaluationError {
    EvaluationError::Parse {
        path: path.to_path_buf(),
        row,
        message: e.to_string(),
    }
}

fn first_sheet(path: &Path) -> Result<Range<Data>, EvaluationError> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| io_error(path, e))?;
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| io_error(path, "workbook has no sheets"))?
        .map_err(|e| io_error(path, e))
}

/// Load every row of an evaluation file.
///
/// Columns not present in `T` are ignored; row numbers in errors are
/// 1-based data rows.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, EvaluationError> {
    let format = TabularFormat::from_path(path)?;

    let rows = match format {
        TabularFormat::Xlsx => {
            let range = first_sheet(path)?;
            RangeDeserializerBuilder::new()
                .from_range::<_, T>(&range)
                .map_err(|e| parse_error(path, 0, e))?
                .enumerate()
                .map(|(i, record)| record.map_err(|e| parse_error(path, i + 1, e)))
                .collect::<Result<Vec<T>, _>>()?
        }
        TabularFormat::Csv | TabularFormat::Tsv => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(format.delimiter())
                .flexible(true)
                .from_path(path)
                .map_err(|e| io_error(path, e))?;

            reader
                .deserialize()
                .enumerate()
                .map(|(i, record)| record.map_err(|e| parse_error(path, i + 1, e)))
                .collect::<Result<Vec<T>, _>>()?
        }
        TabularFormat::Json => {
            let file = File::open(path).map_err(|e| io_error(path, e))?;
            serde_json::from_reader(BufReader::new(file)).map_err(|e| parse_error(path, 0, e))?
        }
        TabularFormat::Jsonl => {
            let file = File::open(path).map_err(|e| io_error(path, e))?;
            let mut rows = Vec::new();
            for (i, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|e| io_error(path, e))?;
                if line.trim().is_empty() {
                    continue;
                }
                rows.push(serde_json::from_str(&line).map_err(|e| parse_error(path, i + 1, e))?);
            }
            rows
        }
    };

    debug!(rows = rows.len(), ?format, "Loaded evaluation file");
    Ok(rows)
}

/// Path of the score table written next to an evaluation file.
///
/// The extension is replaced by `suffix`, so `run/M_HICO.tsv` with
/// `_score.csv` becomes `run/M_HICO_score.csv`.
pub fn score_path(eval_file: &Path, suffix: &str) -> PathBuf {
    let stem = eval_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    eval_file.with_file_name(format!("{stem}{suffix}"))
}

/// Write a score table as CSV.
#[instrument(skip(table), fields(path = %path.display()))]
pub fn write_score_table(path: &Path, table: &ScoreTable) -> Result<(), EvaluationError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| io_error(path, e))?;

    writer
        .write_record(table.headers())
        .map_err(|e| io_error(path, e))?;
    for row in table.rows() {
        writer.write_record(&row).map_err(|e| io_error(path, e))?;
    }
    writer.flush().map_err(|e| io_error(path, e))?;

    info!(path = %path.display(), "Wrote score table");
    Ok(())
}

/// Half-open range of file lines, where line 0 is the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl FromStr for LineRange {
    type Err = String;

    /// Accepts `10` (same as `0-10`), `0-10` and `0:10`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(|c| c == '-' || c == ':').collect();
        let parse = |p: &str| {
            p.trim()
                .parse::<usize>()
                .map_err(|_| format!("Invalid line range: {s}"))
        };

        match parts.as_slice() {
            [end] => Ok(Self {
                start: 0,
                end: parse(*end)?,
            }),
            [start, end] => Ok(Self {
                start: parse(*start)?,
                end: parse(*end)?,
            }),
            _ => Err(format!("Invalid line range: {s}")),
        }
    }
}

/// Raw contents of a tabular file: header plus string cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a file for display, keeping lines in `range`.
///
/// Without a range every data line is kept. With a range, line 0 is the
/// header and lines `1..` are data rows; the header is always returned in
/// `headers`.
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn view_file(path: &Path, range: Option<LineRange>) -> Result<TabularView, EvaluationError> {
    let format = TabularFormat::from_path(path)?;

    let (headers, rows) = match format {
        TabularFormat::Xlsx => {
            let range = first_sheet(path)?;
            let mut lines = range
                .rows()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());
            let headers = lines.next().unwrap_or_default();
            (headers, lines.collect())
        }
        TabularFormat::Csv | TabularFormat::Tsv => {
            let mut reader = csv::ReaderBuilder::new()
                .delimiter(format.delimiter())
                .flexible(true)
                .from_path(path)
                .map_err(|e| io_error(path, e))?;
            let headers = reader
                .headers()
                .map_err(|e| io_error(path, e))?
                .iter()
                .map(str::to_string)
                .collect::<Vec<_>>();
            let rows = reader
                .records()
                .enumerate()
                .map(|(i, r)| {
                    r.map(|rec| rec.iter().map(str::to_string).collect())
                        .map_err(|e| parse_error(path, i + 1, e))
                })
                .collect::<Result<Vec<Vec<String>>, _>>()?;
            (headers, rows)
        }
        TabularFormat::Json | TabularFormat::Jsonl => {
            let objects: Vec<serde_json::Map<String, serde_json::Value>> = load_rows(path)?;
            let mut headers: Vec<String> = Vec::new();
            for object in &objects {
                for key in object.keys() {
                    if !headers.contains(key) {
                        headers.push(key.clone());
                    }
                }
            }
            let rows = objects
                .iter()
                .map(|object| {
                    headers
                        .iter()
                        .map(|h| match object.get(h) {
                            Some(serde_json::Value::String(s)) => s.clone(),
                            Some(serde_json::Value::Null) | None => String::new(),
                            Some(other) => other.to_string(),
                        })
                        .collect()
                })
                .collect();
            (headers, rows)
        }
    };

    let rows = match range {
        None => rows,
        Some(range) => {
            // Data row i sits on line i + 1.
            let first = range.start.saturating_sub(1);
            let last = range.end.saturating_sub(1);
            rows.into_iter()
                .enumerate()
                .filter(|(i, _)| *i >= first && *i < last)
                .map(|(_, row)| row)
                .collect()
        }
    };

    Ok(TabularView { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use vlm_bench_domain::{CategoryMetrics, MultiLabelRow};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        answer: String,
        #[serde(default)]
        prediction: String,
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(TabularFormat::from_path(Path::new("a.TSV")).unwrap(), TabularFormat::Tsv);
        assert_eq!(TabularFormat::from_path(Path::new("a.jsonl")).unwrap(), TabularFormat::Jsonl);
        assert_eq!(TabularFormat::from_path(Path::new("a.xlsx")).unwrap(), TabularFormat::Xlsx);
        assert!(matches!(
            TabularFormat::from_path(Path::new("a.xls")),
            Err(EvaluationError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_tsv_with_extra_and_empty_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("M_HICO.tsv");
        std::fs::write(&path, "index\tanswer\tprediction\n0\tAB\tA B\n1\tC\t\n").unwrap();

        let rows: Vec<MultiLabelRow> = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].prediction, "A B");
        assert_eq!(rows[1].prediction, "");
    }

    #[test]
    fn test_load_json_and_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("a.json");
        std::fs::write(&json, r#"[{"answer":"A","prediction":"A"},{"answer":"B"}]"#).unwrap();
        let jsonl = dir.path().join("a.jsonl");
        std::fs::write(&jsonl, "{\"answer\":\"A\",\"prediction\":\"A\"}\n\n{\"answer\":\"B\"}\n")
            .unwrap();

        let a: Vec<Row> = load_rows(&json).unwrap();
        let b: Vec<Row> = load_rows(&jsonl).unwrap();
        assert_eq!(a, b);
        assert_eq!(b[1].prediction, "");
    }

    #[test]
    fn test_parse_error_reports_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jsonl");
        std::fs::write(&path, "{\"answer\":\"A\"}\nnot json\n").unwrap();

        let err = load_rows::<Row>(&path).unwrap_err();
        assert!(matches!(err, EvaluationError::Parse { row: 2, .. }));
    }

    #[test]
    fn test_invalid_workbook_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("M_HICO.xlsx");
        std::fs::write(&path, "answer,prediction\n").unwrap();

        assert!(matches!(
            load_rows::<Row>(&path),
            Err(EvaluationError::Io { .. })
        ));
    }

    #[test]
    fn test_score_path_replaces_extension() {
        assert_eq!(
            score_path(Path::new("out/M/M_HICO.xlsx"), "_score.csv"),
            PathBuf::from("out/M/M_HICO_score.csv")
        );
        assert_eq!(
            score_path(Path::new("M_TempCompass.tsv"), "_acc.csv"),
            PathBuf::from("M_TempCompass_acc.csv")
        );
    }

    #[test]
    fn test_write_per_category_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("score.csv");
        let table = ScoreTable::PerCategory(vec![CategoryMetrics {
            category: "Open door".to_string(),
            f1: 0.5,
            precision: 1.0,
            recall: 0.25,
        }]);

        write_score_table(&path, &table).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "Activity,f1,precision,recall\nOpen door,0.5,1,0.25\n");
    }

    #[test]
    fn test_line_range_parsing() {
        assert_eq!("10".parse::<LineRange>().unwrap(), LineRange { start: 0, end: 10 });
        assert_eq!("2-5".parse::<LineRange>().unwrap(), LineRange { start: 2, end: 5 });
        assert_eq!("2:5".parse::<LineRange>().unwrap(), LineRange { start: 2, end: 5 });
        assert!("1-2-3".parse::<LineRange>().is_err());
        assert!("a".parse::<LineRange>().is_err());
    }

    #[test]
    fn test_view_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "answer,prediction\nA,A\nB,B\nC,C\nD,D\n").unwrap();

        let all = view_file(&path, None).unwrap();
        assert_eq!(all.headers, vec!["answer", "prediction"]);
        assert_eq!(all.rows.len(), 4);

        let some = view_file(&path, Some(LineRange { start: 2, end: 4 })).unwrap();
        assert_eq!(some.rows, vec![vec!["B", "B"], vec!["C", "C"]]);
    }
}
