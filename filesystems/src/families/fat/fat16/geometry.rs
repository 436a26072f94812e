// Volume layout derived from the common header

use crate::families::fat::common::{CommonHeader, DIR_ENTRY_SIZE, FAT_SECTOR_SIZE, FIRST_DATA_CLUSTER};
use fatimg_core::{FatImgError, SectorBasis};
use serde::Serialize;

/// Absolute byte range inside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub start: u64,
    pub len: u64,
}

impl Region {
    pub fn end(&self) -> u64 {
        self.start + self.len
    }
}

/// Layout arithmetic for a FAT16 volume. The FAT and root directory are
/// always located with the header's bytes-per-sector; only the data region
/// byte offset depends on the configured `SectorBasis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    bytes_per_sector: u64,
    sectors_per_cluster: u64,
    reserved_sectors: u64,
    num_fats: u64,
    sectors_per_fat: u64,
    root_entries: u64,
    sector_basis: SectorBasis,
}

impl Geometry {
    pub fn new(header: &CommonHeader, sector_basis: SectorBasis) -> Result<Self, FatImgError> {
        if header.bytes_per_sector == 0 {
            return Err(FatImgError::InvalidGeometry("Bytes per sector is 0".to_string()));
        }
        if header.sectors_per_cluster == 0 {
            return Err(FatImgError::InvalidGeometry("Sectors per cluster is 0".to_string()));
        }

        Ok(Self {
            bytes_per_sector: header.bytes_per_sector as u64,
            sectors_per_cluster: header.sectors_per_cluster as u64,
            reserved_sectors: header.reserved_sectors as u64,
            num_fats: header.num_fats as u64,
            sectors_per_fat: header.sectors_per_fat as u64,
            root_entries: header.root_entries as u64,
            sector_basis,
        })
    }

    pub fn bytes_per_sector(&self) -> u64 {
        self.bytes_per_sector
    }

    /// Bytes per cluster: sectors-per-cluster times bytes-per-sector
    pub fn cluster_size(&self) -> u64 {
        self.sectors_per_cluster * self.bytes_per_sector
    }

    /// Sector size used to turn a data sector number into a byte offset
    pub fn data_sector_size(&self) -> u64 {
        match self.sector_basis {
            SectorBasis::Fixed512 => FAT_SECTOR_SIZE,
            SectorBasis::HeaderDerived => self.bytes_per_sector,
        }
    }

    /// First copy of the allocation table
    pub fn fat_region(&self) -> Region {
        Region {
            start: self.reserved_sectors * self.bytes_per_sector,
            len: self.sectors_per_fat * self.bytes_per_sector,
        }
    }

    /// Fixed-size root directory following the FAT copies
    pub fn root_dir_region(&self) -> Region {
        Region {
            start: (self.reserved_sectors + self.num_fats * self.sectors_per_fat) * self.bytes_per_sector,
            len: self.root_entries * DIR_ENTRY_SIZE as u64,
        }
    }

    /// Sectors occupied by the root directory, rounded up
    pub fn root_dir_sectors(&self) -> u64 {
        (self.root_entries * DIR_ENTRY_SIZE as u64).div_ceil(self.bytes_per_sector)
    }

    pub fn first_data_sector(&self) -> u64 {
        self.reserved_sectors + self.num_fats * self.sectors_per_fat + self.root_dir_sectors()
    }

    /// First sector of a data cluster. Clusters 0 and 1 do not exist on disk.
    pub fn cluster_sector(&self, cluster: u32) -> Result<u64, FatImgError> {
        if cluster < FIRST_DATA_CLUSTER {
            return Err(FatImgError::InvalidCluster(cluster));
        }
        Ok(self.first_data_sector() + (cluster - FIRST_DATA_CLUSTER) as u64 * self.sectors_per_cluster)
    }

    /// Byte range of one cluster
    pub fn cluster_to_byte_offset(&self, cluster: u32) -> Result<Region, FatImgError> {
        Ok(Region {
            start: self.cluster_sector(cluster)? * self.data_sector_size(),
            len: self.cluster_size(),
        })
    }

    /// Clusters needed to hold `bytes`
    pub fn clusters_for(&self, bytes: u64) -> u64 {
        bytes.div_ceil(self.cluster_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(bytes_per_sector: u16, sectors_per_cluster: u8, root_entries: u16) -> CommonHeader {
        CommonHeader {
            jump_code: [0xEB, 0x3C, 0x90],
            oem_name: *b"MSDOS5.0",
            bytes_per_sector,
            sectors_per_cluster,
            reserved_sectors: 1,
            num_fats: 2,
            root_entries,
            total_sectors_16: 0,
            media_descriptor: 0xF8,
            sectors_per_fat: 8,
            sectors_per_track: 63,
            num_heads: 255,
            hidden_sectors: 0,
            total_sectors_32: 131072,
        }
    }

    #[test]
    fn test_root_dir_region() {
        let geometry = Geometry::new(&header(512, 32, 512), SectorBasis::Fixed512).unwrap();
        let root = geometry.root_dir_region();
        assert_eq!(root.start, (1 + 2 * 8) * 512);
        assert_eq!(root.len, 512 * 32);
        assert_eq!(geometry.fat_region(), Region { start: 512, len: 8 * 512 });
    }

    #[test]
    fn test_cluster_two_follows_root_directory() {
        let geometry = Geometry::new(&header(512, 32, 512), SectorBasis::Fixed512).unwrap();
        let root = geometry.root_dir_region();
        let cluster2 = geometry.cluster_to_byte_offset(2).unwrap();

        assert_eq!(cluster2.start, root.end().div_ceil(512) * 512);
        assert_eq!(cluster2.start, 25088);
        assert_eq!(cluster2.len, 32 * 512);

        let cluster5 = geometry.cluster_to_byte_offset(5).unwrap();
        assert_eq!(cluster5.start, cluster2.start + 3 * cluster2.len);
    }

    #[test]
    fn test_root_dir_sectors_round_up() {
        // 20 entries = 640 bytes = 2 sectors of 512
        let geometry = Geometry::new(&header(512, 4, 20), SectorBasis::Fixed512).unwrap();
        assert_eq!(geometry.root_dir_sectors(), 2);
        assert_eq!(geometry.first_data_sector(), 1 + 16 + 2);

        let root = geometry.root_dir_region();
        let cluster2 = geometry.cluster_to_byte_offset(2).unwrap();
        assert_eq!(cluster2.start, root.end().div_ceil(512) * 512);
    }

    #[test]
    fn test_sector_basis_only_affects_data_offsets() {
        let h = header(1024, 2, 512);
        let fixed = Geometry::new(&h, SectorBasis::Fixed512).unwrap();
        let derived = Geometry::new(&h, SectorBasis::HeaderDerived).unwrap();

        assert_eq!(fixed.root_dir_region(), derived.root_dir_region());
        assert_eq!(fixed.cluster_size(), 2048);

        // first data sector = 1 + 16 + 16
        assert_eq!(fixed.cluster_to_byte_offset(2).unwrap().start, 33 * 512);
        assert_eq!(derived.cluster_to_byte_offset(2).unwrap().start, 33 * 1024);
        // Only the header-derived basis lands right after the root directory
        assert_eq!(derived.cluster_to_byte_offset(2).unwrap().start, derived.root_dir_region().end());
    }

    #[test]
    fn test_reserved_clusters_rejected() {
        let geometry = Geometry::new(&header(512, 32, 512), SectorBasis::Fixed512).unwrap();
        assert!(matches!(geometry.cluster_to_byte_offset(0), Err(FatImgError::InvalidCluster(0))));
        assert!(matches!(geometry.cluster_to_byte_offset(1), Err(FatImgError::InvalidCluster(1))));
    }

    #[test]
    fn test_zero_geometry_rejected() {
        assert!(matches!(
            Geometry::new(&header(0, 32, 512), SectorBasis::Fixed512),
            Err(FatImgError::InvalidGeometry(_))
        ));
        assert!(matches!(
            Geometry::new(&header(512, 0, 512), SectorBasis::Fixed512),
            Err(FatImgError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_clusters_for() {
        let geometry = Geometry::new(&header(512, 1, 512), SectorBasis::Fixed512).unwrap();
        assert_eq!(geometry.clusters_for(0), 0);
        assert_eq!(geometry.clusters_for(1), 1);
        assert_eq!(geometry.clusters_for(512), 1);
        assert_eq!(geometry.clusters_for(513), 2);
    }
}
