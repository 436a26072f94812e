// Building blocks shared by every FAT variant

pub mod cluster_chain;
pub mod constants;
pub mod field_reader;
pub mod structures;
pub mod timestamps;

pub use cluster_chain::{read_cluster_chain, Fat16Table};
pub use constants::*;
pub use field_reader::{FieldCursor, FieldReader};
pub use structures::{CommonHeader, DirEntry, Fat16Header, FatAttributes};
pub use timestamps::{fat_datetime, FatDate, FatTime};
