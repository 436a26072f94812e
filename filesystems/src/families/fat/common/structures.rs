// On-disk FAT structures shared by every variant: the common boot sector
// header, the FAT16 extended header and the 32-byte directory entry

use super::constants::*;
use super::field_reader::{field_to_string, trim_padding, FieldReader};
use byteorder::{ByteOrder, LittleEndian};
use fatimg_core::FatImgError;
use std::fmt;

// ============================================================================
// Common boot sector header
// ============================================================================

/// First 36 bytes of the boot sector, identical for FAT16 and FAT32
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonHeader {
    pub jump_code: [u8; 3],          // 0x00: Jump instruction
    pub oem_name: [u8; 8],           // 0x03: OEM name
    pub bytes_per_sector: u16,       // 0x0B
    pub sectors_per_cluster: u8,     // 0x0D
    pub reserved_sectors: u16,       // 0x0E
    pub num_fats: u8,                // 0x10
    pub root_entries: u16,           // 0x11
    pub total_sectors_16: u16,       // 0x13: Small sector count (< 32MB)
    pub media_descriptor: u8,        // 0x15
    pub sectors_per_fat: u16,        // 0x16
    pub sectors_per_track: u16,      // 0x18
    pub num_heads: u16,              // 0x1A
    pub hidden_sectors: u32,         // 0x1C
    pub total_sectors_32: u32,       // 0x20
}

impl CommonHeader {
    /// Decode the header at offset 0. Also returns the offset where the
    /// variant-specific header begins.
    pub fn decode(reader: &FieldReader<'_>) -> Result<(Self, u64), FatImgError> {
        let mut cursor = reader.cursor(BS_JMP_BOOT as u64);

        let header = Self {
            jump_code: cursor.array()?,
            oem_name: cursor.array()?,
            bytes_per_sector: cursor.u16()?,
            sectors_per_cluster: cursor.u8()?,
            reserved_sectors: cursor.u16()?,
            num_fats: cursor.u8()?,
            root_entries: cursor.u16()?,
            total_sectors_16: cursor.u16()?,
            media_descriptor: cursor.u8()?,
            sectors_per_fat: cursor.u16()?,
            sectors_per_track: cursor.u16()?,
            num_heads: cursor.u16()?,
            hidden_sectors: cursor.u32()?,
            total_sectors_32: cursor.u32()?,
        };

        Ok((header, cursor.position()))
    }

    /// Jump code as the little-endian integer the report prints
    pub fn jump_code_value(&self) -> u32 {
        LittleEndian::read_u24(&self.jump_code)
    }

    pub fn oem_name_str(&self) -> String {
        field_to_string(&self.oem_name)
    }

    pub fn to_bytes(&self) -> [u8; COMMON_HEADER_SIZE] {
        let mut buf = [0u8; COMMON_HEADER_SIZE];
        buf[BS_JMP_BOOT..BS_OEM_NAME].copy_from_slice(&self.jump_code);
        buf[BS_OEM_NAME..BPB_BYTES_PER_SEC].copy_from_slice(&self.oem_name);
        LittleEndian::write_u16(&mut buf[BPB_BYTES_PER_SEC..], self.bytes_per_sector);
        buf[BPB_SEC_PER_CLUS] = self.sectors_per_cluster;
        LittleEndian::write_u16(&mut buf[BPB_RSVD_SEC_CNT..], self.reserved_sectors);
        buf[BPB_NUM_FATS] = self.num_fats;
        LittleEndian::write_u16(&mut buf[BPB_ROOT_ENT_CNT..], self.root_entries);
        LittleEndian::write_u16(&mut buf[BPB_TOT_SEC16..], self.total_sectors_16);
        buf[BPB_MEDIA] = self.media_descriptor;
        LittleEndian::write_u16(&mut buf[BPB_FAT_SZ16..], self.sectors_per_fat);
        LittleEndian::write_u16(&mut buf[BPB_SEC_PER_TRK..], self.sectors_per_track);
        LittleEndian::write_u16(&mut buf[BPB_NUM_HEADS..], self.num_heads);
        LittleEndian::write_u32(&mut buf[BPB_HIDD_SEC..], self.hidden_sectors);
        LittleEndian::write_u32(&mut buf[BPB_TOT_SEC32..], self.total_sectors_32);
        buf
    }
}

// ============================================================================
// FAT16 extended header
// ============================================================================

/// Extended boot record that follows the common header on FAT16 volumes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fat16Header {
    pub drive_number: u16,           // BIOS drive number plus the reserved byte
    pub boot_signature: u8,          // Extended boot signature (0x29)
    pub volume_id: u32,              // Volume serial number
    pub volume_label: [u8; VOLUME_LABEL_LEN],
    pub fs_type: [u8; FS_TYPE_LEN],  // "FAT16   "
    pub boot_code: Vec<u8>,          // Opaque, BOOT_CODE_LEN bytes
    pub boot_marker: u16,            // 0xAA55
}

impl Fat16Header {
    /// Decode the extended header starting at `offset`, the end of the
    /// common header
    pub fn decode(reader: &FieldReader<'_>, offset: u64) -> Result<Self, FatImgError> {
        let mut cursor = reader.cursor(offset);

        Ok(Self {
            drive_number: cursor.u16()?,
            boot_signature: cursor.u8()?,
            volume_id: cursor.u32()?,
            volume_label: cursor.array()?,
            fs_type: cursor.array()?,
            boot_code: cursor.bytes(BOOT_CODE_LEN as u64)?.to_vec(),
            boot_marker: cursor.u16()?,
        })
    }

    pub fn fs_type_str(&self) -> String {
        field_to_string(&self.fs_type)
    }

    pub fn volume_label_str(&self) -> String {
        field_to_string(&self.volume_label)
    }

    /// Whether the filesystem type label selects the FAT16 decode path
    pub fn is_fat16(&self) -> bool {
        trim_padding(&self.fs_type) == FAT16_FS_TYPE.as_bytes()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; FAT16_HEADER_SIZE];
        LittleEndian::write_u16(&mut buf[BS16_DRV_NUM..], self.drive_number);
        buf[BS16_BOOT_SIG] = self.boot_signature;
        LittleEndian::write_u32(&mut buf[BS16_VOL_ID..], self.volume_id);
        buf[BS16_VOL_LAB..BS16_FIL_SYS_TYPE].copy_from_slice(&self.volume_label);
        buf[BS16_FIL_SYS_TYPE..BS16_BOOT_CODE].copy_from_slice(&self.fs_type);
        let code_len = self.boot_code.len().min(BOOT_CODE_LEN);
        buf[BS16_BOOT_CODE..BS16_BOOT_CODE + code_len].copy_from_slice(&self.boot_code[..code_len]);
        LittleEndian::write_u16(&mut buf[BS16_BOOT_MARKER..], self.boot_marker);
        buf
    }
}

// ============================================================================
// Directory entries
// ============================================================================

/// FAT directory entry attribute byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FatAttributes(pub u8);

impl FatAttributes {
    pub const READ_ONLY: u8 = 0x01;
    pub const HIDDEN: u8 = 0x02;
    pub const SYSTEM: u8 = 0x04;
    pub const VOLUME_ID: u8 = 0x08;
    pub const DIRECTORY: u8 = 0x10;
    pub const ARCHIVE: u8 = 0x20;

    /// Flag table used when rendering an attribute byte
    pub const NAMES: [(&'static str, u8); 6] = [
        ("READONLY", Self::READ_ONLY),
        ("HIDDEN", Self::HIDDEN),
        ("SYSTEM", Self::SYSTEM),
        ("VOLUME LABEL", Self::VOLUME_ID),
        ("DIRECTORY", Self::DIRECTORY),
        ("ARCHIVE", Self::ARCHIVE),
    ];

    pub fn is_read_only(&self) -> bool { self.0 & Self::READ_ONLY != 0 }
    pub fn is_hidden(&self) -> bool { self.0 & Self::HIDDEN != 0 }
    pub fn is_system(&self) -> bool { self.0 & Self::SYSTEM != 0 }
    pub fn is_volume_id(&self) -> bool { self.0 & Self::VOLUME_ID != 0 }
    pub fn is_directory(&self) -> bool { self.0 & Self::DIRECTORY != 0 }
    pub fn is_archive(&self) -> bool { self.0 & Self::ARCHIVE != 0 }

    /// Names of every flag set in this byte, in flag table order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, bit)| self.0 & bit != 0)
            .map(|(name, _)| *name)
            .collect()
    }
}

/// One decoded 32-byte directory entry. Every decode produces a fresh value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirEntry {
    pub name: [u8; DIR_NAME_LEN],
    pub ext: [u8; DIR_EXT_LEN],
    pub attributes: FatAttributes,
    pub user_attributes: u8,
    pub time_resolution: u8,
    pub creation_time: u16,
    pub creation_date: u16,
    pub last_access_date: u16,
    pub access_rights: u16,
    pub modified_time: u16,
    pub modified_date: u16,
    pub first_cluster: u16,
    pub file_size: u32,
}

static_assertions::const_assert_eq!(
    DIR_NAME_LEN + DIR_EXT_LEN + 3 + 2 * 6 + 2 + 4,
    DIR_ENTRY_SIZE
);

impl DirEntry {
    /// Decode the entry at byte `offset` of a directory region buffer
    pub fn decode(region: &[u8], offset: usize) -> Result<Self, FatImgError> {
        let mut cursor = FieldReader::new(region).cursor(offset as u64);

        Ok(Self {
            name: cursor.array()?,
            ext: cursor.array()?,
            attributes: FatAttributes(cursor.u8()?),
            user_attributes: cursor.u8()?,
            time_resolution: cursor.u8()?,
            creation_time: cursor.u16()?,
            creation_date: cursor.u16()?,
            last_access_date: cursor.u16()?,
            access_rights: cursor.u16()?,
            modified_time: cursor.u16()?,
            modified_date: cursor.u16()?,
            first_cluster: cursor.u16()?,
            file_size: cursor.u32()?,
        })
    }

    /// Name and extension both empty after trimming: no further entries in
    /// this directory region are inspected
    pub fn is_end_of_directory(&self) -> bool {
        trim_padding(&self.name).is_empty() && trim_padding(&self.ext).is_empty()
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    /// Trimmed name as stored on disk
    pub fn name_str(&self) -> String {
        field_to_string(&self.name)
    }

    /// Trimmed extension as stored on disk
    pub fn ext_str(&self) -> String {
        field_to_string(&self.ext)
    }

    /// Lower-cased trimmed name, used for the directory list
    pub fn lower_name(&self) -> String {
        String::from_utf8_lossy(&trim_padding(&self.name).to_ascii_lowercase()).into_owned()
    }

    /// Lower-cased "name.ext" identifier used for the file list. The dot is
    /// always present, so an entry without extension yields "name.".
    pub fn identifier(&self) -> String {
        let ext = trim_padding(&self.ext).to_ascii_lowercase();
        format!("{}.{}", self.lower_name(), String::from_utf8_lossy(&ext))
    }

    pub fn to_bytes(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut buf = [0u8; DIR_ENTRY_SIZE];
        buf[0..8].copy_from_slice(&self.name);
        buf[8..11].copy_from_slice(&self.ext);
        buf[11] = self.attributes.0;
        buf[12] = self.user_attributes;
        buf[13] = self.time_resolution;
        LittleEndian::write_u16(&mut buf[14..], self.creation_time);
        LittleEndian::write_u16(&mut buf[16..], self.creation_date);
        LittleEndian::write_u16(&mut buf[18..], self.last_access_date);
        LittleEndian::write_u16(&mut buf[20..], self.access_rights);
        LittleEndian::write_u16(&mut buf[22..], self.modified_time);
        LittleEndian::write_u16(&mut buf[24..], self.modified_date);
        LittleEndian::write_u16(&mut buf[26..], self.first_cluster);
        LittleEndian::write_u32(&mut buf[28..], self.file_size);
        buf
    }
}

impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ext = self.ext_str();
        if ext.is_empty() {
            write!(f, "{}", self.name_str())
        } else {
            write!(f, "{}.{}", self.name_str(), ext)
        }
    }
}
