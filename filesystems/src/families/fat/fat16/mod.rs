// FAT16 decoding: volume geometry, directory walk and the resulting inventory

pub mod geometry;
pub mod inventory;
pub mod reader;


pub use geometry::{Geometry, Region};
pub use inventory::{EntryRole, FileSummary, Inventory, InventorySummary, WalkedEntry};
pub use reader::{parse_image, Fat16Reader, ParsedImage, Volume};
