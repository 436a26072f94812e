// Test helpers for building synthetic FAT16 images in memory

use crate::families::fat::common::{
    CommonHeader, DirEntry, Fat16Header, FatAttributes, BOOT_CODE_LEN, DIR_ENTRY_SIZE,
};
use crate::families::fat::fat16::Geometry;
use fatimg_core::SectorBasis;

/// Space-padded 8.3 entry
pub fn entry(name: &str, ext: &str, attributes: u8, first_cluster: u16, file_size: u32) -> DirEntry {
    let mut name_field = [b' '; 8];
    name_field[..name.len()].copy_from_slice(name.as_bytes());
    let mut ext_field = [b' '; 3];
    ext_field[..ext.len()].copy_from_slice(ext.as_bytes());

    DirEntry {
        name: name_field,
        ext: ext_field,
        attributes: FatAttributes(attributes),
        first_cluster,
        file_size,
        ..Default::default()
    }
}

pub fn file_entry(name: &str, ext: &str, first_cluster: u16, file_size: u32) -> DirEntry {
    entry(name, ext, FatAttributes::ARCHIVE, first_cluster, file_size)
}

pub fn dir_entry(name: &str, first_cluster: u16) -> DirEntry {
    entry(name, "", FatAttributes::DIRECTORY, first_cluster, 0)
}

/// Builder for a FAT16 image with 1 reserved sector and 2 FATs of 8 sectors
pub struct ImageBuilder {
    pub common: CommonHeader,
    pub extended: Fat16Header,
    geometry: Geometry,
    image: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(bytes_per_sector: u16, sectors_per_cluster: u8, root_entries: u16) -> Self {
        Self::with_basis(bytes_per_sector, sectors_per_cluster, root_entries, SectorBasis::Fixed512)
    }

    pub fn with_basis(bytes_per_sector: u16, sectors_per_cluster: u8, root_entries: u16, basis: SectorBasis) -> Self {
        let common = CommonHeader {
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
        };
        let extended = Fat16Header {
            drive_number: 0x80,
            boot_signature: 0x29,
            volume_id: 12345678,
            volume_label: *b"NO NAME    ",
            fs_type: *b"FAT16   ",
            boot_code: vec![0; BOOT_CODE_LEN],
            boot_marker: 0xAA55,
        };
        let geometry = Geometry::new(&common, basis).expect("valid test geometry");
        let image = vec![0u8; geometry.root_dir_region().end() as usize];

        let mut builder = Self { common, extended, geometry, image };
        builder.fat_link(0, 0xFFF8);
        builder.fat_link(1, 0xFFFF);
        builder
    }

    /// Geometry used by the single-file example: 512/32/512
    pub fn example() -> Self {
        Self::new(512, 32, 512)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn fs_type(mut self, fs_type: &[u8; 8]) -> Self {
        self.extended.fs_type = *fs_type;
        self
    }

    fn reserve(&mut self, len: u64) {
        if (self.image.len() as u64) < len {
            self.image.resize(len as usize, 0);
        }
    }

    fn write(&mut self, offset: u64, data: &[u8]) {
        let start = offset as usize;
        let end = start + data.len();
        self.reserve(end as u64);
        self.image[start..end].copy_from_slice(data);
    }

    pub fn root_entry(&mut self, index: usize, entry: &DirEntry) -> &mut Self {
        let offset = self.geometry.root_dir_region().start + (index * DIR_ENTRY_SIZE) as u64;
        self.write(offset, &entry.to_bytes());
        self
    }

    /// Entry `index` of the directory stored in `cluster`
    pub fn cluster_entry(&mut self, cluster: u32, index: usize, entry: &DirEntry) -> &mut Self {
        let region = self.geometry.cluster_to_byte_offset(cluster).expect("data cluster");
        self.reserve(region.end());
        self.write(region.start + (index * DIR_ENTRY_SIZE) as u64, &entry.to_bytes());
        self
    }

    /// Write "." and ".." into a subdirectory cluster
    pub fn dot_entries(&mut self, cluster: u32, parent: u16) -> &mut Self {
        self.cluster_entry(cluster, 0, &entry(".", "", FatAttributes::DIRECTORY, cluster as u16, 0));
        self.cluster_entry(cluster, 1, &entry("..", "", FatAttributes::DIRECTORY, parent, 0))
    }

    /// Write data into one cluster, zero padding to the full cluster size
    pub fn cluster_data(&mut self, cluster: u32, data: &[u8]) -> &mut Self {
        let region = self.geometry.cluster_to_byte_offset(cluster).expect("data cluster");
        assert!(data.len() as u64 <= region.len, "data larger than a cluster");
        let mut padded = data.to_vec();
        padded.resize(region.len as usize, 0);
        self.write(region.start, &padded);
        self
    }

    /// Spread data over the given clusters in order
    pub fn clusters_data(&mut self, clusters: &[u32], data: &[u8]) -> &mut Self {
        let size = self.geometry.cluster_size() as usize;
        for (cluster, chunk) in clusters.iter().zip(data.chunks(size)) {
            self.cluster_data(*cluster, chunk);
        }
        self
    }

    /// Set a FAT16 entry in every FAT copy
    pub fn fat_link(&mut self, cluster: u32, value: u16) -> &mut Self {
        let fat = self.geometry.fat_region();
        for copy in 0..self.common.num_fats as u64 {
            let offset = fat.start + copy * fat.len + cluster as u64 * 2;
            self.write(offset, &value.to_le_bytes());
        }
        self
    }

    /// Link `clusters` into one chain terminated by an end-of-chain marker
    pub fn chain(&mut self, clusters: &[u32]) -> &mut Self {
        for pair in clusters.windows(2) {
            self.fat_link(pair[0], pair[1] as u16);
        }
        if let Some(&last) = clusters.last() {
            self.fat_link(last, 0xFFFF);
        }
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut image = self.image.clone();
        image[..36].copy_from_slice(&self.common.to_bytes());
        image[36..512].copy_from_slice(&self.extended.to_bytes());
        image
    }
}
