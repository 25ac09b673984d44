//! Dataset manifest verification.
//!
//! A dataset lives under the data root as `{name}.tsv`, optionally with a
//! media directory holding one `{video}.mp4` per manifest row.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use vlm_bench_common::ChecksumVerifier;
use vlm_bench_domain::{DatasetChecksum, DatasetDescriptor, DatasetError};

/// A verified dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDataset {
    pub root: PathBuf,
    pub data_file: PathBuf,
    /// Number of manifest rows
    pub rows: usize,
}

/// Path of the manifest for a dataset
pub fn manifest_path(root: &Path, name: &str) -> PathBuf {
    root.join(format!("{name}.tsv"))
}

/// Verify a dataset before evaluation.
///
/// Fails when the manifest is missing, its checksum differs from the
/// expected one, or (with a media directory) any `video` entry has no
/// `{media_dir}/{video}.mp4`.
#[instrument(skip(checksum), fields(root = %root.display()))]
pub fn prepare_dataset(
    root: &Path,
    name: &str,
    checksum: Option<&DatasetChecksum>,
    media_dir: Option<&Path>,
) -> Result<PreparedDataset, DatasetError> {
    let data_file = manifest_path(root, name);

    if !data_file.is_file() {
        return Err(DatasetError::ManifestNotFound(data_file));
    }

    if let Some(expected) = checksum {
        let verifier = ChecksumVerifier::from(expected.algorithm);
        let actual = verifier
            .compute_file(&data_file)
            .map_err(|e| DatasetError::Io {
                path: data_file.clone(),
                message: format!("{e:#}"),
            })?;
        if !actual.eq_ignore_ascii_case(&expected.value) {
            return Err(DatasetError::ChecksumMismatch {
                path: data_file,
                expected: expected.value.clone(),
                actual,
            });
        }
        debug!("Manifest checksum verified");
    }

    let io_error = |message: String| DatasetError::Io {
        path: data_file.clone(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(&data_file)
        .map_err(|e| io_error(e.to_string()))?;

    let video_column = reader
        .headers()
        .map_err(|e| io_error(e.to_string()))?
        .iter()
        .position(|h| h == "video");

    let mut rows = 0;
    for record in reader.records() {
        let record = record.map_err(|e| io_error(e.to_string()))?;
        rows += 1;

        let Some(media_dir) = media_dir else {
            continue;
        };
        let Some(column) = video_column else {
            return Err(io_error("manifest has no 'video' column".to_string()));
        };
        let video = record.get(column).unwrap_or_default();
        if !media_dir.join(format!("{video}.mp4")).is_file() {
            return Err(DatasetError::MediaNotFound(video.to_string()));
        }
    }

    info!(dataset = %name, rows, "Dataset verified");
    Ok(PreparedDataset {
        root: root.to_path_buf(),
        data_file,
        rows,
    })
}

/// Verify a catalog dataset under `root`
pub fn prepare_descriptor(
    root: &Path,
    descriptor: &DatasetDescriptor,
) -> Result<PreparedDataset, DatasetError> {
    let media_dir = descriptor.media_dir.as_ref().map(|dir| root.join(dir));
    prepare_dataset(
        root,
        &descriptor.name,
        descriptor.checksum.as_ref(),
        media_dir.as_deref(),
    )
}
