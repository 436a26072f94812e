// FAT on-disk layout constants

// Common boot sector offsets
pub const BS_JMP_BOOT: usize = 0x00;
pub const BS_OEM_NAME: usize = 0x03;
pub const BPB_BYTES_PER_SEC: usize = 0x0B;
pub const BPB_SEC_PER_CLUS: usize = 0x0D;
pub const BPB_RSVD_SEC_CNT: usize = 0x0E;
pub const BPB_NUM_FATS: usize = 0x10;
pub const BPB_ROOT_ENT_CNT: usize = 0x11;
pub const BPB_TOT_SEC16: usize = 0x13;
pub const BPB_MEDIA: usize = 0x15;
pub const BPB_FAT_SZ16: usize = 0x16;
pub const BPB_SEC_PER_TRK: usize = 0x18;
pub const BPB_NUM_HEADS: usize = 0x1A;
pub const BPB_HIDD_SEC: usize = 0x1C;
pub const BPB_TOT_SEC32: usize = 0x20;

/// Size of the header shared by every FAT variant
pub const COMMON_HEADER_SIZE: usize = 36;

// FAT16 extended header offsets, relative to the end of the common header
pub const BS16_DRV_NUM: usize = 0x00;
pub const BS16_BOOT_SIG: usize = 0x02;
pub const BS16_VOL_ID: usize = 0x03;
pub const BS16_VOL_LAB: usize = 0x07;
pub const BS16_FIL_SYS_TYPE: usize = 0x12;
pub const BS16_BOOT_CODE: usize = 0x1A;
pub const BS16_BOOT_MARKER: usize = 0x1DA;

pub const VOLUME_LABEL_LEN: usize = 11;
pub const FS_TYPE_LEN: usize = 8;
pub const BOOT_CODE_LEN: usize = 448;

/// Size of the FAT16 extended header, boot code and marker included
pub const FAT16_HEADER_SIZE: usize = BS16_BOOT_MARKER + 2;

/// Filesystem type label selecting the FAT16 decode path
pub const FAT16_FS_TYPE: &str = "FAT16";

/// Sector size assumed by the fixed-basis cluster arithmetic
pub const FAT_SECTOR_SIZE: u64 = 512;

// Directory entry layout
pub const DIR_ENTRY_SIZE: usize = 32;
pub const DIR_NAME_LEN: usize = 8;
pub const DIR_EXT_LEN: usize = 3;

/// Clusters 0 and 1 are reserved; data clusters start here
pub const FIRST_DATA_CLUSTER: u32 = 2;

// FAT16 table entry values
pub const FAT16_ENTRY_SIZE: u64 = 2;
pub const FAT16_FREE: u16 = 0x0000;
pub const FAT16_RESERVED: u16 = 0x0001;
pub const FAT16_BAD: u16 = 0xFFF7;
pub const FAT16_EOC: u16 = 0xFFF8; // End of chain marker (0xFFF8 - 0xFFFF)

static_assertions::const_assert_eq!(BPB_TOT_SEC32 + 4, COMMON_HEADER_SIZE);
static_assertions::const_assert_eq!(COMMON_HEADER_SIZE + FAT16_HEADER_SIZE, 512);
static_assertions::const_assert_eq!(BS16_BOOT_CODE + BOOT_CODE_LEN, BS16_BOOT_MARKER);
