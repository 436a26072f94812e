// Extraction of reconstructed file contents to a host directory

use crate::families::fat::fat16::Inventory;
use fatimg_core::FatImgError;
use log::{debug, info};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

/// Write every recorded file into `target_dir` under its identifier, in
/// identifier order. Existing files are never overwritten: the first
/// collision aborts the dump. Returns the number of files written.
pub fn dump_inventory(inventory: &Inventory, target_dir: &Path) -> Result<usize, FatImgError> {
    let mut written = 0;

    for (identifier, content) in inventory.contents() {
        if identifier.contains(['/', '\\']) || identifier == ".." {
            return Err(FatImgError::InvalidInput(format!(
                "Refusing to dump identifier {:?} outside the target directory",
                identifier
            )));
        }

        let path = target_dir.join(identifier);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(FatImgError::DumpTargetExists(path));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(content)?;

        debug!("Dumped {} ({} bytes)", path.display(), content.len());
        written += 1;
    }

    info!("Dumped {} files to {}", written, target_dir.display());
    Ok(written)
}
