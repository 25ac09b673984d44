//! Markdown report files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;
use vlm_bench_domain::ReportError;

/// How report text is written to an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Replace the file contents
    Overwrite,
    /// Add to the end of the file
    Append,
}

fn io_error(path: &Path, e: std::io::Error) -> ReportError {
    ReportError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// Write report text, creating the parent directory if needed.
pub fn write_report(path: &Path, text: &str, mode: WriteMode) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(mode == WriteMode::Append)
        .truncate(mode == WriteMode::Overwrite)
        .open(path)
        .map_err(|e| io_error(path, e))?;

    file.write_all(text.as_bytes())
        .map_err(|e| io_error(path, e))?;

    debug!(path = %path.display(), ?mode, bytes = text.len(), "Wrote report text");
    Ok(())
}

/// Markdown image link as appended after the tables
pub fn image_link(caption: &str, file_name: &str) -> String {
    format!("\n\n![{caption}]({file_name})\n")
}

/// Append an image link to a report
pub fn append_image_link(report: &Path, caption: &str, file_name: &str) -> Result<(), ReportError> {
    write_report(report, &image_link(caption, file_name), WriteMode::Append)
}
