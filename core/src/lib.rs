pub mod config;
pub mod error;

pub use config::{ClusterMode, ParseOptions, SectorBasis, DEFAULT_MAX_DEPTH};
pub use error::FatImgError;
