use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FatImgError {
    #[error("Truncated image: {len} bytes at offset {offset:#x} exceed image size {image_len}")]
    TruncatedImage { offset: u64, len: u64, image_len: u64 },

    #[error("Unsupported filesystem variant: {0:?}")]
    UnsupportedVariant(String),

    #[error("Dump target already exists: {}", .0.display())]
    DumpTargetExists(PathBuf),

    #[error("Identifier not found: {0}")]
    IdentifierNotFound(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid cluster: {0}")]
    InvalidCluster(u32),

    #[error("Bad cluster chain: {0}")]
    BadClusterChain(String),

    #[error("Directory nesting exceeds maximum depth of {0}")]
    DirectoryDepthExceeded(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
