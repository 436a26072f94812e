// Filesystem modules are organized in families
pub mod families;

pub mod dump;
pub mod report;
pub mod verify;

#[cfg(test)]
pub mod test_helpers;

pub use families::fat::common::{CommonHeader, DirEntry, Fat16Header, FatAttributes, FieldReader};
pub use families::fat::fat16::{
    parse_image, EntryRole, Fat16Reader, Geometry, Inventory, InventorySummary, ParsedImage, Region, Volume,
};

pub use dump::dump_inventory;
pub use report::render_report;
pub use verify::{parse_completeness_list, verify_completeness, VerificationReport};
