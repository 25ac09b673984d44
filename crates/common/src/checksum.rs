//! Checksums for dataset manifests.

use anyhow::{Context, Result};
use md5::Md5;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use vlm_bench_domain::ChecksumAlgorithm;

const READ_CHUNK: usize = 64 * 1024;

/// Checksum verifier supporting multiple algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumVerifier {
    /// MD5 checksums, as published for the HICO manifests
    Md5,
    /// SHA-256 checksums
    Sha256,
    /// BLAKE3 checksums
    Blake3,
}

impl From<ChecksumAlgorithm> for ChecksumVerifier {
    fn from(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Md5 => Self::Md5,
            ChecksumAlgorithm::Sha256 => Self::Sha256,
            ChecksumAlgorithm::Blake3 => Self::Blake3,
        }
    }
}

enum Hasher {
    Md5(Md5),
    Sha256(Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl Hasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Blake3(h) => {
                h.update(data);
            }
        }
    }

    fn finish(self) -> String {
        match self {
            Self::Md5(h) => hex::encode(h.finalize()),
            Self::Sha256(h) => hex::encode(h.finalize()),
            Self::Blake3(h) => hex::encode(h.finalize().as_bytes()),
        }
    }
}

impl ChecksumVerifier {
    fn hasher(&self) -> Hasher {
        match self {
            Self::Md5 => Hasher::Md5(Md5::new()),
            Self::Sha256 => Hasher::Sha256(Sha256::new()),
            Self::Blake3 => Hasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }

    /// Compute a lowercase hex checksum for the given data.
    ///
    /// # Examples
    ///
    /// ```
    /// use vlm_bench_common::ChecksumVerifier;
    ///
    /// let checksum = ChecksumVerifier::Sha256.compute(b"index\tquestion\n");
    /// assert_eq!(checksum.len(), 64);
    /// ```
    pub fn compute(&self, data: &[u8]) -> String {
        let mut hasher = self.hasher();
        hasher.update(data);
        hasher.finish()
    }

    /// Compare data against an expected hex checksum, ignoring case.
    pub fn verify(&self, data: &[u8], expected_checksum: &str) -> bool {
        self.compute(data)
            .eq_ignore_ascii_case(expected_checksum.trim())
    }

    /// Compute a checksum for a file, reading it in chunks.
    pub fn compute_file(&self, path: &Path) -> Result<String> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut hasher = self.hasher();
        let mut buf = vec![0u8; READ_CHUNK];

        loop {
            let read = reader
                .read(&mut buf)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }

        Ok(hasher.finish())
    }

    /// Verify a file against a checksum.
    pub fn verify_file(&self, path: &Path, expected_checksum: &str) -> Result<bool> {
        let actual = self.compute_file(path)?;
        Ok(actual.eq_ignore_ascii_case(expected_checksum.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_digest() {
        assert_eq!(
            ChecksumVerifier::Sha256.compute(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_md5_known_digest() {
        assert_eq!(
            ChecksumVerifier::Md5.compute(b"abc"),
            "900150983cd24fb0d6963f7d28e17f72"
        );
        assert!(!ChecksumVerifier::Md5.verify(b"abd", "900150983cd24fb0d6963f7d28e17f72"));
    }

    #[test]
    fn test_verify_ignores_case() {
        let checksum = ChecksumVerifier::Blake3.compute(b"manifest");
        assert!(ChecksumVerifier::Blake3.verify(b"manifest", &checksum.to_uppercase()));
        assert!(!ChecksumVerifier::Blake3.verify(b"other", &checksum));
    }

    #[test]
    fn test_file_matches_in_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("HICO.tsv");
        let data = "index\tquestion\tanswer\n".repeat(10_000);
        std::fs::write(&path, &data).unwrap();

        for verifier in [
            ChecksumVerifier::Md5,
            ChecksumVerifier::Sha256,
            ChecksumVerifier::Blake3,
        ] {
            let expected = verifier.compute(data.as_bytes());
            assert_eq!(verifier.compute_file(&path).unwrap(), expected);
            assert!(verifier.verify_file(&path, &expected).unwrap());
        }
    }

    #[test]
    fn test_missing_file_errors() {
        let result = ChecksumVerifier::Sha256.compute_file(Path::new("/nonexistent/x.tsv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_algorithm() {
        assert_eq!(
            ChecksumVerifier::from(ChecksumAlgorithm::Blake3),
            ChecksumVerifier::Blake3
        );
        assert_eq!(ChecksumVerifier::from(ChecksumAlgorithm::Md5), ChecksumVerifier::Md5);
    }
}
