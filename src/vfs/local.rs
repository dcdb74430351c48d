use std::fs;

use crate::error::{Result, StuffError};
use crate::resolve::Resolver;

use super::{FileEntry, FileSystem, MemFs};

/// A filesystem loaded from local files and directories, for running
/// without stuffed assets (dev mode).
///
/// Files are mapped with the same `source[:alias]` specifications and root
/// that stuffing uses, and read into memory up front.
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: String,
    specs: Vec<String>,
    fs: MemFs,
}

impl LocalFs {
    pub fn new<I, S>(root: &str, specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let specs: Vec<String> = specs.into_iter().map(|s| s.as_ref().to_string()).collect();
        let fs = load(root, &specs)?;
        tracing::debug!(root, files = fs.len(), "loaded local filesystem");
        Ok(Self {
            root: root.to_string(),
            specs,
            fs,
        })
    }

    /// Re-reads every mapped file from disk. On failure the current
    /// contents are left untouched.
    ///
    /// Changes made through `add`, `put`, `delete` or `merge` are discarded.
    pub fn reload(&mut self) -> Result<()> {
        self.fs = load(&self.root, &self.specs)?;
        Ok(())
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn specs(&self) -> &[String] {
        &self.specs
    }

    pub fn into_mem(self) -> MemFs {
        self.fs
    }
}

fn load(root: &str, specs: &[String]) -> Result<MemFs> {
    let mut fs = MemFs::new();
    for entry in Resolver::new(root, specs) {
        let entry = entry?;
        let content = fs::read(&entry.source).map_err(|e| StuffError::io(&entry.source, e))?;
        fs.add(FileEntry::new(entry.target, entry.metadata, content))?;
    }
    Ok(fs)
}

impl FileSystem for LocalFs {
    fn add(&mut self, entry: FileEntry) -> Result<()> {
        self.fs.add(entry)
    }

    fn put(&mut self, entry: FileEntry) -> Option<FileEntry> {
        self.fs.put(entry)
    }

    fn get(&self, path: &str) -> Result<FileEntry> {
        self.fs.get(path)
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.fs.delete(path)
    }

    fn list(&self) -> Vec<String> {
        self.fs.list()
    }

    fn len(&self) -> usize {
        self.fs.len()
    }

    fn size(&self) -> u64 {
        self.fs.size()
    }
}
