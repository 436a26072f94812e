// Parse configuration threaded from the entry point down to the decoder

use crate::FatImgError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bound on subdirectory nesting
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// How the clusters of a file or subdirectory are located
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClusterMode {
    /// Assume clusters follow `first_cluster` in index order. Only correct for
    /// sequentially allocated images; the FAT itself is never read.
    #[default]
    Contiguous,
    /// Follow the 16-bit links stored in the first FAT copy.
    FatChain,
}

/// Sector size used when turning a cluster's sector number into a byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectorBasis {
    /// Always 512 bytes, regardless of the boot sector
    #[default]
    Fixed512,
    /// The boot sector's bytes-per-sector field
    HeaderDerived,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub verbose: bool,
    pub cluster_mode: ClusterMode,
    pub sector_basis: SectorBasis,
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            cluster_mode: ClusterMode::default(),
            sector_basis: SectorBasis::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Load options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, FatImgError> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert!(!options.verbose);
        assert_eq!(options.cluster_mode, ClusterMode::Contiguous);
        assert_eq!(options.sector_basis, SectorBasis::Fixed512);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_partial_json_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"cluster_mode": "fat-chain", "max_depth": 4}}"#).unwrap();

        let options = ParseOptions::from_json_file(file.path()).unwrap();
        assert_eq!(options.cluster_mode, ClusterMode::FatChain);
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.sector_basis, SectorBasis::Fixed512);
        assert!(!options.verbose);
    }

    #[test]
    fn test_malformed_json_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let result = ParseOptions::from_json_file(file.path());
        assert!(matches!(result, Err(FatImgError::SerializationError(_))));
    }
}
