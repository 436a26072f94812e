// Directory/file inventory accumulated by the directory walk

use crate::families::fat::common::{fat_datetime, DirEntry};
use chrono::NaiveDateTime;
use fatimg_core::FatImgError;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Why an entry was visited during the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    /// "." in a subdirectory
    SelfRef,
    /// ".." in a subdirectory
    ParentRef,
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedEntry {
    /// Nesting level, 0 for the root directory
    pub depth: usize,
    pub role: EntryRole,
    pub entry: DirEntry,
}

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    directories: Vec<String>,
    files: Vec<String>,
    contents: BTreeMap<String, Vec<u8>>,
    entries: Vec<WalkedEntry>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_entry(&mut self, depth: usize, role: EntryRole, entry: &DirEntry) {
        self.entries.push(WalkedEntry {
            depth,
            role,
            entry: entry.clone(),
        });
    }

    pub(crate) fn add_directory(&mut self, name: String) {
        self.directories.push(name);
    }

    /// Record a file. A later file with the same identifier replaces the
    /// stored content but both occurrences stay in the file list.
    pub(crate) fn add_file(&mut self, identifier: String, content: Vec<u8>) {
        self.files.push(identifier.clone());
        self.contents.insert(identifier, content);
    }

    /// Directory names in discovery order
    pub fn directory_list(&self) -> &[String] {
        &self.directories
    }

    /// Lower-cased "name.ext" identifiers in discovery order
    pub fn file_list(&self) -> &[String] {
        &self.files
    }

    pub fn content_of(&self, identifier: &str) -> Result<&[u8], FatImgError> {
        self.contents
            .get(identifier)
            .map(Vec::as_slice)
            .ok_or_else(|| FatImgError::IdentifierNotFound(identifier.to_string()))
    }

    /// Reconstructed contents keyed by identifier, in identifier order
    pub fn contents(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.contents.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Every entry visited, "." and ".." included, in discovery order
    pub fn entries(&self) -> &[WalkedEntry] {
        &self.entries
    }

    /// Identifiers from `expected` that were never recorded, in the order
    /// `expected` yields them
    pub fn missing_from<I, S>(&self, expected: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let present: HashSet<&str> = self.files.iter().map(String::as_str).collect();
        expected
            .into_iter()
            .filter(|id| !present.contains(id.as_ref()))
            .map(|id| id.as_ref().to_string())
            .collect()
    }

    /// Serializable listing of the walk result
    pub fn summary(&self) -> InventorySummary {
        let files = self
            .entries
            .iter()
            .filter(|walked| walked.role == EntryRole::File)
            .map(|walked| FileSummary {
                identifier: walked.entry.identifier(),
                size: walked.entry.file_size,
                first_cluster: walked.entry.first_cluster,
                modified: fat_datetime(walked.entry.modified_date, walked.entry.modified_time),
            })
            .collect();

        InventorySummary {
            directories: self.directories.clone(),
            files,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub identifier: String,
    pub size: u32,
    pub first_cluster: u16,
    pub modified: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub directories: Vec<String>,
    pub files: Vec<FileSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_from_keeps_expected_order() {
        let mut inventory = Inventory::new();
        inventory.add_file("readme.txt".to_string(), b"hi".to_vec());

        assert_eq!(inventory.missing_from(["readme.txt", "a.bin"]), vec!["a.bin"]);
        assert_eq!(
            inventory.missing_from(vec!["z.txt".to_string(), "readme.txt".to_string(), "b.txt".to_string()]),
            vec!["z.txt", "b.txt"]
        );
        assert!(inventory.missing_from(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_content_lookup() {
        let mut inventory = Inventory::new();
        inventory.add_file("a.txt".to_string(), b"HELLO".to_vec());

        assert_eq!(inventory.content_of("a.txt").unwrap(), b"HELLO");
        assert!(matches!(
            inventory.content_of("A.TXT"),
            Err(FatImgError::IdentifierNotFound(id)) if id == "A.TXT"
        ));
    }

    #[test]
    fn test_duplicate_identifiers_are_not_merged() {
        let mut inventory = Inventory::new();
        inventory.add_file("dup.txt".to_string(), b"first".to_vec());
        inventory.add_file("dup.txt".to_string(), b"second".to_vec());
        inventory.add_directory("sub".to_string());
        inventory.add_directory("sub".to_string());

        assert_eq!(inventory.file_list(), ["dup.txt", "dup.txt"]);
        assert_eq!(inventory.directory_list(), ["sub", "sub"]);
        assert_eq!(inventory.content_of("dup.txt").unwrap(), b"second");
        assert_eq!(inventory.contents().count(), 1);
    }
}
