// FAT16 image reader: header decode, directory walk and file reconstruction

use super::geometry::Geometry;
use super::inventory::{EntryRole, Inventory};
use crate::families::fat::common::{
    read_cluster_chain, CommonHeader, DirEntry, Fat16Header, Fat16Table, FieldReader,
    DIR_ENTRY_SIZE,
};
use fatimg_core::{ClusterMode, FatImgError, ParseOptions};
use log::{debug, info, warn};
use std::borrow::Cow;

/// What the image turned out to contain after header decode
#[derive(Debug, Clone)]
pub enum Volume {
    Fat16 {
        geometry: Geometry,
        inventory: Inventory,
    },
    /// Filesystem type label other than "FAT16". No directory data is read.
    Unsupported { fs_type: String },
}

/// Result of one parse session
#[derive(Debug, Clone)]
pub struct ParsedImage {
    pub common: CommonHeader,
    pub extended: Fat16Header,
    pub volume: Volume,
}

impl ParsedImage {
    pub fn is_fat16(&self) -> bool {
        matches!(self.volume, Volume::Fat16 { .. })
    }

    pub fn inventory(&self) -> Result<&Inventory, FatImgError> {
        match &self.volume {
            Volume::Fat16 { inventory, .. } => Ok(inventory),
            Volume::Unsupported { fs_type } => Err(FatImgError::UnsupportedVariant(fs_type.clone())),
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match &self.volume {
            Volume::Fat16 { geometry, .. } => Some(geometry),
            Volume::Unsupported { .. } => None,
        }
    }
}

/// Decode the boot sector and, for FAT16 volumes, walk the whole directory
/// tree. Any error means the partial walk is discarded.
pub fn parse_image(image: &[u8], options: &ParseOptions) -> Result<ParsedImage, FatImgError> {
    let reader = FieldReader::new(image);

    let (common, fat16_offset) = CommonHeader::decode(&reader)?;
    let extended = Fat16Header::decode(&reader, fat16_offset)?;

    if !extended.is_fat16() {
        let fs_type = extended.fs_type_str();
        info!("Filesystem type {:?} is not FAT16, skipping directory walk", fs_type);
        return Ok(ParsedImage {
            common,
            extended,
            volume: Volume::Unsupported { fs_type },
        });
    }

    let fat16 = Fat16Reader::new(image, &common, options)?;
    let inventory = fat16.walk()?;
    let geometry = fat16.geometry;

    Ok(ParsedImage {
        common,
        extended,
        volume: Volume::Fat16 { geometry, inventory },
    })
}

/// Recursive walker over an in-memory FAT16 image. Never mutates the image.
pub struct Fat16Reader<'a> {
    reader: FieldReader<'a>,
    geometry: Geometry,
    max_depth: usize,
    fat: Option<Fat16Table<'a>>,
}

impl<'a> Fat16Reader<'a> {
    pub fn new(image: &'a [u8], common: &CommonHeader, options: &ParseOptions) -> Result<Self, FatImgError> {
        let reader = FieldReader::new(image);
        let geometry = Geometry::new(common, options.sector_basis)?;

        let fat = match options.cluster_mode {
            ClusterMode::Contiguous => None,
            ClusterMode::FatChain => {
                let region = geometry.fat_region();
                Some(Fat16Table::new(&reader, region.start, region.len)?)
            }
        };

        info!("FAT16 filesystem details:");
        info!("  Bytes per sector: {}", geometry.bytes_per_sector());
        info!("  Cluster size: {}", geometry.cluster_size());
        info!("  Root directory: {:#x} ({} bytes)", geometry.root_dir_region().start, geometry.root_dir_region().len);
        info!("  First data sector: {}", geometry.first_data_sector());
        info!("  Cluster mode: {:?}, sector basis: {:?}", options.cluster_mode, options.sector_basis);

        Ok(Self {
            reader,
            geometry,
            max_depth: options.max_depth,
            fat,
        })
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Enumerate the root directory and everything below it
    pub fn walk(&self) -> Result<Inventory, FatImgError> {
        let mut inventory = Inventory::new();

        let root = self.geometry.root_dir_region();
        debug!("Reading root directory at offset {:#x}, size: {}", root.start, root.len);
        let data = self.reader.slice(root.start, root.len)?;
        self.scan_entries(data, 0, 0, &mut inventory)?;

        info!(
            "Found {} directories and {} files",
            inventory.directory_list().len(),
            inventory.file_list().len()
        );
        Ok(inventory)
    }

    /// Subdirectory: "." and ".." first, then regular entries
    fn walk_subdirectory(&self, dir: &DirEntry, depth: usize, inventory: &mut Inventory) -> Result<(), FatImgError> {
        if depth > self.max_depth {
            return Err(FatImgError::DirectoryDepthExceeded(self.max_depth));
        }

        let data = self.read_directory(dir.first_cluster as u32)?;

        // A cluster too small to hold the next entry ends the directory
        if data.len() < DIR_ENTRY_SIZE {
            return Ok(());
        }
        let dot = DirEntry::decode(&data, 0)?;
        if dot.is_end_of_directory() {
            return Ok(());
        }
        debug!("  {:depth$}. -> cluster {}", "", dot.first_cluster, depth = depth * 2);
        inventory.record_entry(depth, EntryRole::SelfRef, &dot);

        if data.len() < 2 * DIR_ENTRY_SIZE {
            return Ok(());
        }
        let dotdot = DirEntry::decode(&data, DIR_ENTRY_SIZE)?;
        if dotdot.is_end_of_directory() {
            return Ok(());
        }
        debug!("  {:depth$}.. -> cluster {}", "", dotdot.first_cluster, depth = depth * 2);
        inventory.record_entry(depth, EntryRole::ParentRef, &dotdot);

        self.scan_entries(&data, 2 * DIR_ENTRY_SIZE, depth, inventory)
    }

    /// Decode entries from `start` until the end-of-directory sentinel or the
    /// end of the region
    fn scan_entries(&self, data: &[u8], start: usize, depth: usize, inventory: &mut Inventory) -> Result<(), FatImgError> {
        let mut offset = start;

        while offset + DIR_ENTRY_SIZE <= data.len() {
            let entry = DirEntry::decode(data, offset)?;
            if entry.is_end_of_directory() {
                break;
            }

            if entry.is_directory() {
                debug!("  {:depth$}{}/ -> cluster {}", "", entry, entry.first_cluster, depth = depth * 2);
                inventory.add_directory(entry.lower_name());
                inventory.record_entry(depth, EntryRole::Directory, &entry);
                self.walk_subdirectory(&entry, depth + 1, inventory)?;
            } else {
                debug!(
                    "  {:depth$}{} ({} bytes) -> cluster {}",
                    "", entry, entry.file_size, entry.first_cluster, depth = depth * 2
                );
                let content = self.read_file(&entry)?;
                inventory.record_entry(depth, EntryRole::File, &entry);
                inventory.add_file(entry.identifier(), content);
            }

            offset += DIR_ENTRY_SIZE;
        }

        Ok(())
    }

    /// Bytes of a subdirectory. Contiguous mode reads exactly one cluster.
    fn read_directory(&self, first_cluster: u32) -> Result<Cow<'a, [u8]>, FatImgError> {
        match &self.fat {
            None => Ok(Cow::Borrowed(self.read_cluster(first_cluster)?)),
            Some(fat) => {
                let chain = read_cluster_chain(fat, first_cluster, None)?;
                let mut data = Vec::with_capacity(chain.len() * self.geometry.cluster_size() as usize);
                for cluster in chain {
                    data.extend_from_slice(self.read_cluster(cluster)?);
                }
                Ok(Cow::Owned(data))
            }
        }
    }

    fn read_cluster(&self, cluster: u32) -> Result<&'a [u8], FatImgError> {
        let region = self.geometry.cluster_to_byte_offset(cluster)?;
        self.reader.slice(region.start, region.len)
    }

    /// Clusters holding a file's data, in file order
    fn file_clusters(&self, first_cluster: u32, count: u64) -> Result<Vec<u32>, FatImgError> {
        match &self.fat {
            Some(fat) => {
                let limit = usize::try_from(count).unwrap_or(usize::MAX);
                let chain = read_cluster_chain(fat, first_cluster, Some(limit))?;
                if (chain.len() as u64) < count {
                    return Err(FatImgError::BadClusterChain(format!(
                        "Chain from cluster {} ends after {} of {} clusters",
                        first_cluster,
                        chain.len(),
                        count
                    )));
                }
                Ok(chain)
            }
            None => {
                let count = u32::try_from(count).map_err(|_| FatImgError::InvalidCluster(first_cluster))?;
                let last = first_cluster
                    .checked_add(count)
                    .ok_or(FatImgError::InvalidCluster(first_cluster))?;
                Ok((first_cluster..last).collect())
            }
        }
    }

    /// Concatenate the file's clusters and cut the result to its recorded size
    fn read_file(&self, entry: &DirEntry) -> Result<Vec<u8>, FatImgError> {
        let size = entry.file_size as u64;
        if size == 0 {
            if entry.attributes.is_volume_id() {
                warn!("Volume label entry {} recorded as an empty file", entry);
            }
            return Ok(Vec::new());
        }

        let count = self.geometry.clusters_for(size);
        let clusters = self.file_clusters(entry.first_cluster as u32, count)?;

        let mut data = Vec::with_capacity(size.min(self.reader.len()) as usize);
        for cluster in clusters {
            data.extend_from_slice(self.read_cluster(cluster)?);
        }
        data.truncate(size as usize);
        Ok(data)
    }
}
