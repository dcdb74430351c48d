use std::collections::BTreeMap;

use crate::error::{Result, StuffError};
use crate::resolve::clean_path;

use super::{FileEntry, FileSystem};

/// An in-memory filesystem keyed by virtual path.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    files: BTreeMap<String, FileEntry>,
    /// Total size of all files in the filesystem.
    size: u64,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileSystem for MemFs {
    fn add(&mut self, entry: FileEntry) -> Result<()> {
        if self.files.contains_key(entry.path()) {
            return Err(StuffError::AlreadyExists(entry.path().to_string()));
        }
        self.size += entry.size();
        self.files.insert(entry.path().to_string(), entry);
        Ok(())
    }

    fn put(&mut self, entry: FileEntry) -> Option<FileEntry> {
        self.size += entry.size();
        let old = self.files.insert(entry.path().to_string(), entry);
        if let Some(old) = &old {
            self.size -= old.size();
        }
        old
    }

    fn get(&self, path: &str) -> Result<FileEntry> {
        let path = clean_path("/", path);
        self.files
            .get(&path)
            .cloned()
            .ok_or(StuffError::NotFound(path))
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        let path = clean_path("/", path);
        match self.files.remove(&path) {
            Some(old) => {
                self.size -= old.size();
                Ok(())
            }
            None => Err(StuffError::NotFound(path)),
        }
    }

    fn list(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.files.len()
    }

    fn size(&self) -> u64 {
        self.size
    }
}
