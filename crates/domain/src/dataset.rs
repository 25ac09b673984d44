//! Dataset descriptors and the built-in catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Question format of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetKind {
    /// Image multiple-choice
    Mcq,
    /// Video multiple-choice
    VideoMcq,
    /// Mixed multiple-choice and yes/no video questions
    VideoMcqYorN,
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mcq => write!(f, "MCQ"),
            Self::VideoMcq => write!(f, "Video-MCQ"),
            Self::VideoMcqYorN => write!(f, "Video-MCQ/YorN"),
        }
    }
}

/// Checksum algorithms accepted for dataset manifests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
    Md5,
    Sha256,
    Blake3,
}

/// Expected checksum of a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetChecksum {
    pub algorithm: ChecksumAlgorithm,
    /// Lowercase hex digest
    pub value: String,
}

/// A dataset known to the harness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    /// Dataset name, also the manifest base name (`{name}.tsv`)
    pub name: String,
    pub kind: DatasetKind,
    /// Download location of the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<DatasetChecksum>,
    /// Name of the evaluator that scores this dataset
    pub evaluator: String,
    /// Media directory under the data root, for datasets whose manifest references videos
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_dir: Option<String>,
}

/// The datasets with dedicated scoring in this harness
pub fn dataset_catalog() -> Vec<DatasetDescriptor> {
    vec![
        DatasetDescriptor {
            name: "HICO".to_string(),
            kind: DatasetKind::Mcq,
            url: Some(
                "https://huggingface.co/datasets/hoveringgull/hico_tsv/resolve/main/hico.tsv"
                    .to_string(),
            ),
            checksum: Some(DatasetChecksum {
                algorithm: ChecksumAlgorithm::Md5,
                value: "0b672999f634f5d5155b9a86907fa4e6".to_string(),
            }),
            evaluator: "hico".to_string(),
            media_dir: None,
        },
        DatasetDescriptor {
            name: "HICO_Mini".to_string(),
            kind: DatasetKind::Mcq,
            url: Some(
                "https://huggingface.co/datasets/hoveringgull/hico_tsv/resolve/main/hico_mini.tsv"
                    .to_string(),
            ),
            checksum: Some(DatasetChecksum {
                algorithm: ChecksumAlgorithm::Md5,
                value: "7c176883f0c282a5ae438ad9d300f1c2".to_string(),
            }),
            evaluator: "hico".to_string(),
            media_dir: None,
        },
        DatasetDescriptor {
            name: "Virat_MCQ".to_string(),
            kind: DatasetKind::VideoMcq,
            url: None,
            checksum: None,
            evaluator: "virat".to_string(),
            media_dir: Some("videos/virat".to_string()),
        },
        DatasetDescriptor {
            name: "TempCompass_MCQ_YorN".to_string(),
            kind: DatasetKind::VideoMcqYorN,
            url: None,
            checksum: None,
            evaluator: "tempcompass".to_string(),
            media_dir: None,
        },
    ]
}
