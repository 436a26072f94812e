// Human-readable rendering of decoded headers and directory entries

use crate::families::fat::common::{CommonHeader, DirEntry, Fat16Header, FatDate, FatTime};
use crate::families::fat::fat16::{EntryRole, ParsedImage, Volume};
use std::fmt;

const RULE: &str = "----------------------------------------";

pub struct CommonHeaderReport<'a>(pub &'a CommonHeader);

impl fmt::Display for CommonHeaderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "IMAGE COMMON HEADER INFO\n")?;
        writeln!(f, "Jump Code                     : {:x} (Hex)", h.jump_code_value())?;
        writeln!(f, "OEM Name                      : {}", h.oem_name_str())?;
        writeln!(f, "Bytes Per Sector              : {}", h.bytes_per_sector)?;
        writeln!(f, "Sector Per Cluster            : {}", h.sectors_per_cluster)?;
        writeln!(f, "Sector Reserved               : {}", h.reserved_sectors)?;
        writeln!(f, "FAT Copies Number             : {}", h.num_fats)?;
        writeln!(f, "Maximum Root Directory Entries: {}", h.root_entries)?;
        writeln!(f, "Small 32MB Sector Number      : {}", h.total_sectors_16)?;
        writeln!(f, "Media Descriptor              : {:#x}", h.media_descriptor)?;
        writeln!(f, "Sector Per FAT                : {}", h.sectors_per_fat)?;
        writeln!(f, "Sector Per Track              : {}", h.sectors_per_track)?;
        writeln!(f, "Head Number                   : {}", h.num_heads)?;
        writeln!(f, "Hidden Sector Number          : {}", h.hidden_sectors)?;
        writeln!(f, "Sector Number                 : {}", h.total_sectors_32)
    }
}

pub struct Fat16HeaderReport<'a>(pub &'a Fat16Header);

impl fmt::Display for Fat16HeaderReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "IMAGE FAT16 HEADER INFO\n")?;
        writeln!(f, "Logical Drive Number: {}", h.drive_number)?;
        writeln!(f, "Ext Signature       : {}", h.boot_signature)?;
        writeln!(f, "Serial Number       : {}", h.volume_id)?;
        writeln!(f, "Volume Name         : {}", h.volume_label_str())?;
        writeln!(f, "FAT Name            : {}", h.fs_type_str())?;
        writeln!(f, "Exec Code           : ignored here")?;
        writeln!(f, "Exec Marker         : {:x} (Hex)", h.boot_marker)
    }
}

pub struct DirEntryReport<'a>(pub &'a DirEntry);

impl fmt::Display for DirEntryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "IMAGE FAT16 DIRECTORY ENTRY INFO\n")?;
        writeln!(f, "File Name              : {}", e.name_str())?;
        writeln!(f, "File Extension         : {}", e.ext_str())?;
        writeln!(f, "File Attribute         : {:?}", e.attributes.names())?;
        writeln!(f, "User Attribute         : {:#x}", e.user_attributes)?;
        writeln!(f, "File Time Resolution   : {}", e.time_resolution)?;
        writeln!(f, "File Time Created      : {}", FatTime::from_packed(e.creation_time))?;
        writeln!(f, "File Date Created      : {}", FatDate::from_packed(e.creation_date))?;
        writeln!(f, "File Date Last Accessed: {}", FatDate::from_packed(e.last_access_date))?;
        writeln!(f, "File Access Right Map  : {:#x}", e.access_rights)?;
        writeln!(f, "File Time Last Modified: {}", FatTime::from_packed(e.modified_time))?;
        writeln!(f, "File Date Last Modified: {}", FatDate::from_packed(e.modified_date))?;
        writeln!(f, "File First Cluster     : {}", e.first_cluster)?;
        writeln!(f, "File Size              : {} (bytes)", e.file_size)
    }
}

/// Full report: common header, then for FAT16 volumes the extended header and
/// every walked entry in discovery order
pub fn render_report(parsed: &ParsedImage) -> String {
    let mut out = format!("{}\n", CommonHeaderReport(&parsed.common));

    match &parsed.volume {
        Volume::Fat16 { inventory, .. } => {
            out.push_str(&format!("{}\n", Fat16HeaderReport(&parsed.extended)));
            for walked in inventory.entries() {
                if matches!(walked.role, EntryRole::SelfRef | EntryRole::ParentRef) {
                    out.push_str(&format!("[{:?}]\n", walked.role));
                }
                out.push_str(&format!("{}\n", DirEntryReport(&walked.entry)));
            }
        }
        Volume::Unsupported { fs_type } => {
            out.push_str(&format!("Filesystem type {:?} is not supported, no entries decoded\n", fs_type));
        }
    }

    out
}
