//! Filesystem fixtures.
//!
//! Every fixture owns a temporary directory that is removed on drop.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Write `contents` to `dir/name`, creating `dir` if needed.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("Failed to create fixture directory");
    let path = dir.join(name);
    fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Score CSV contents as written by the evaluation toolkit: a header row
/// and one data row whose first numeric cell is the score.
pub fn score_csv(value: f64) -> String {
    format!("split,Overall\nnone,{value}\n")
}

/// An outputs directory with one sub-directory per model
pub struct OutputsFixture {
    dir: TempDir,
}

impl OutputsFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Root of the outputs tree
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Directory of one model
    pub fn model_dir(&self, model: &str) -> PathBuf {
        self.dir.path().join(model)
    }

    /// Write `{model}/{model}_{test}_{suffix}.csv` holding `value`.
    pub fn add_score(&self, model: &str, test: &str, suffix: &str, value: f64) -> PathBuf {
        self.add_file(model, &format!("{model}_{test}_{suffix}.csv"), &score_csv(value))
    }

    /// Write an arbitrary file into a model directory.
    pub fn add_file(&self, model: &str, name: &str, contents: &str) -> PathBuf {
        write_file(&self.model_dir(model), name, contents)
    }

    /// A sibling directory for reports, inside the same temp dir
    pub fn report_dir(&self) -> PathBuf {
        self.dir.path().join("report")
    }
}

impl Default for OutputsFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Multi-label predictions (`answer`, `prediction`) as TSV
pub fn multilabel_tsv(rows: &[(&str, &str)]) -> String {
    let mut out = String::from("index\tanswer\tprediction\n");
    for (i, (answer, prediction)) in rows.iter().enumerate() {
        out.push_str(&format!("{i}\t{answer}\t{prediction}\n"));
    }
    out
}

/// Multiple-choice predictions with per-row candidates as TSV
pub fn candidates_tsv(rows: &[(&str, &str, &str)]) -> String {
    let mut out = String::from("index\tanswer\tcandidates\tprediction\n");
    for (i, (answer, candidates, prediction)) in rows.iter().enumerate() {
        out.push_str(&format!("{i}\t{answer}\t{candidates}\t{prediction}\n"));
    }
    out
}

/// Dimension success/overall counts as CSV
pub fn dimension_csv(rows: &[(&str, f64, f64)]) -> String {
    let mut out = String::from("dim.task_type,success,overall\n");
    for (key, success, overall) in rows {
        out.push_str(&format!("{key},{success},{overall}\n"));
    }
    out
}

/// A data root holding one dataset manifest and its media directory
pub struct DatasetFixture {
    dir: TempDir,
    name: String,
}

impl DatasetFixture {
    /// Manifest `{name}.tsv` listing `videos`; media files are created for
    /// the ones in `present`.
    pub fn new(name: &str, media_dir: &str, videos: &[&str], present: &[&str]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let mut manifest = String::from("index\tvideo\tquestion\tanswer\n");
        for (i, video) in videos.iter().enumerate() {
            manifest.push_str(&format!("{i}\t{video}\tWhat happens?\tA\n"));
        }
        write_file(dir.path(), &format!("{name}.tsv"), &manifest);

        let media = dir.path().join(media_dir);
        fs::create_dir_all(&media).expect("Failed to create media directory");
        for video in present {
            fs::write(media.join(format!("{video}.mp4")), b"\0").expect("Failed to write media file");
        }

        Self {
            dir,
            name: name.to_string(),
        }
    }

    /// Data root
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Manifest file path
    pub fn manifest(&self) -> PathBuf {
        self.dir.path().join(format!("{}.tsv", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_fixture_layout() {
        let outputs = OutputsFixture::new();
        let path = outputs.add_score("M", "MMBench_DEV_EN", "acc", 85.0);
        assert_eq!(path, outputs.path().join("M").join("M_MMBench_DEV_EN_acc.csv"));
        assert_eq!(fs::read_to_string(path).unwrap(), "split,Overall\nnone,85\n");
    }

    #[test]
    fn test_dataset_fixture_media() {
        let fixture = DatasetFixture::new("Virat_MCQ", "videos", &["a", "b"], &["a"]);
        assert!(fixture.manifest().exists());
        assert!(fixture.root().join("videos/a.mp4").exists());
        assert!(!fixture.root().join("videos/b.mp4").exists());
    }
}
