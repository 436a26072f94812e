// FAT16 cluster chain traversal over the first FAT copy

use super::constants::*;
use super::field_reader::FieldReader;
use byteorder::{ByteOrder, LittleEndian};
use fatimg_core::FatImgError;
use std::collections::HashSet;

/// Read-only view of one FAT16 allocation table
#[derive(Debug, Clone, Copy)]
pub struct Fat16Table<'a> {
    data: &'a [u8],
}

impl<'a> Fat16Table<'a> {
    /// Borrow the table occupying `len` bytes at `offset`
    pub fn new(reader: &FieldReader<'a>, offset: u64, len: u64) -> Result<Self, FatImgError> {
        Ok(Self {
            data: reader.slice(offset, len)?,
        })
    }

    /// Highest cluster index the table has an entry for
    pub fn max_cluster(&self) -> u32 {
        (self.data.len() as u64 / FAT16_ENTRY_SIZE).saturating_sub(1) as u32
    }

    pub fn entry(&self, cluster: u32) -> Result<u16, FatImgError> {
        let offset = cluster as usize * FAT16_ENTRY_SIZE as usize;
        match self.data.get(offset..offset + FAT16_ENTRY_SIZE as usize) {
            Some(bytes) => Ok(LittleEndian::read_u16(bytes)),
            None => Err(FatImgError::InvalidCluster(cluster)),
        }
    }
}

/// Follow the chain from `start_cluster` until an end-of-chain marker, or
/// until `max_clusters` clusters have been collected
pub fn read_cluster_chain(
    table: &Fat16Table<'_>,
    start_cluster: u32,
    max_clusters: Option<usize>,
) -> Result<Vec<u32>, FatImgError> {
    if start_cluster < FIRST_DATA_CLUSTER {
        return Err(FatImgError::InvalidCluster(start_cluster));
    }

    let max = max_clusters.unwrap_or(usize::MAX);
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = start_cluster;
    visited.insert(current);

    while chain.len() < max {
        chain.push(current);
        if chain.len() == max {
            break;
        }

        let next = table.entry(current)?;
        match next {
            n if n >= FAT16_EOC => break,
            FAT16_FREE | FAT16_RESERVED => {
                return Err(FatImgError::BadClusterChain(format!(
                    "Cluster {} links to unallocated cluster value {:#06x}",
                    current, next
                )));
            }
            FAT16_BAD => {
                return Err(FatImgError::BadClusterChain(format!(
                    "Cluster {} links to a bad cluster",
                    current
                )));
            }
            _ => {}
        }

        // Prevent infinite loops
        if !visited.insert(next as u32) {
            return Err(FatImgError::BadClusterChain(format!(
                "Circular cluster chain detected at cluster {}",
                next
            )));
        }
        current = next as u32;
    }

    Ok(chain)
}
