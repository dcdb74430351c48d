//! # Virtual Filesystem
//!
//! Files recovered from a stuffed binary (or loaded from disk in dev mode)
//! are served through the [`FileSystem`] trait. Two implementations share
//! the contract:
//!
//! - [`MemFs`]: built from an archive or assembled programmatically.
//! - [`LocalFs`]: built by walking real files with the same resolver that
//!   stuffing uses, so paths come out identical in both modes.
//!
//! [`Fs`] is the tagged union of the two, for callers that pick one at
//! runtime (see [`crate::unstuff::Unstuffer::open_or_local`]).
//!
//! Every read hands out an owned copy. No caller ever holds a reference
//! into a filesystem's buffers.

mod file;
mod local;
mod memory;

pub use file::File;
pub use local::LocalFs;
pub use memory::MemFs;

use glob::{MatchOptions, Pattern};

use crate::common::FileMetadata;
use crate::error::{Result, StuffError};
use crate::resolve::clean_path;

/// A single file held by a virtual filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: String,
    metadata: FileMetadata,
    content: Vec<u8>,
}

impl FileEntry {
    /// Creates an entry, normalizing `path` into a virtual path.
    ///
    /// The recorded size always follows `content`.
    pub fn new(path: impl AsRef<str>, mut metadata: FileMetadata, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        metadata.size = content.len() as u64;
        Self {
            path: clean_path("/", path.as_ref()),
            metadata,
            content,
        }
    }

    /// An entry with fresh metadata, for files assembled in memory.
    pub fn from_bytes(path: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self::new(path, FileMetadata::now(content.len() as u64), content)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn size(&self) -> u64 {
        self.metadata.size
    }

    /// A copy of the file's bytes.
    pub fn read_bytes(&self) -> Vec<u8> {
        self.content.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.content
    }
}

/// Glob options matching shell semantics: `*` and `?` never cross `/`.
const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// The capability set shared by every virtual filesystem.
///
/// Reads take `&self` and return owned copies, so any number of readers can
/// share a filesystem. Mutation takes `&mut self`; wrap the filesystem in a
/// lock if it must change while readers are live.
pub trait FileSystem: Send + Sync {
    /// Adds a file. Fails with `AlreadyExists` if its path is taken.
    fn add(&mut self, entry: FileEntry) -> Result<()>;

    /// Inserts or replaces a file in one step, returning the replaced entry.
    fn put(&mut self, entry: FileEntry) -> Option<FileEntry>;

    /// Returns a copy of the file at `path`.
    fn get(&self, path: &str) -> Result<FileEntry>;

    /// Removes the file at `path`.
    fn delete(&mut self, path: &str) -> Result<()>;

    /// Every path in the filesystem.
    fn list(&self) -> Vec<String>;

    /// Number of files.
    fn len(&self) -> usize;

    /// Total size of all files in bytes.
    fn size(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of a file's bytes.
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.get(path)?.into_bytes())
    }

    /// Opens a readable, seekable handle on a copy of the file.
    fn open(&self, path: &str) -> Result<File> {
        Ok(File::new(self.get(path)?))
    }

    /// Paths matching a shell-style pattern, e.g. `/templates/*.html`.
    ///
    /// Character classes are negated with `[!...]`; `^` inside a class is a
    /// literal, so `[^...]` does not negate.
    fn glob(&self, pattern: &str) -> Result<Vec<String>> {
        let pat = Pattern::new(pattern)?;
        Ok(self
            .list()
            .into_iter()
            .filter(|p| pat.matches_with(p, GLOB_OPTIONS))
            .collect())
    }

    /// Reads every file matching `pattern`. Matching nothing is an error,
    /// which is what template loaders want.
    fn read_glob(&self, pattern: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let paths = self.glob(pattern)?;
        if paths.is_empty() {
            return Err(StuffError::NoMatch(pattern.to_string()));
        }
        paths
            .into_iter()
            .map(|p| {
                let b = self.read(&p)?;
                Ok((p, b))
            })
            .collect()
    }

    /// Merges `src` into this filesystem. Files from `src` replace files on
    /// the same path; paths unique to either side are kept.
    fn merge(&mut self, src: &dyn FileSystem) -> Result<()> {
        for path in src.list() {
            let entry = src.get(&path)?;
            if self.put(entry).is_some() {
                tracing::debug!(path = %path, "merge replaced file");
            }
        }
        Ok(())
    }
}

/// Either filesystem variant, chosen at runtime.
#[derive(Debug)]
pub enum Fs {
    Memory(MemFs),
    Local(LocalFs),
}

impl Fs {
    fn inner(&self) -> &dyn FileSystem {
        match self {
            Fs::Memory(fs) => fs,
            Fs::Local(fs) => fs,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn FileSystem {
        match self {
            Fs::Memory(fs) => fs,
            Fs::Local(fs) => fs,
        }
    }

    /// True when the files were read from local disk rather than a stuffed binary.
    pub fn is_local(&self) -> bool {
        matches!(self, Fs::Local(_))
    }
}

impl From<MemFs> for Fs {
    fn from(fs: MemFs) -> Self {
        Fs::Memory(fs)
    }
}

impl From<LocalFs> for Fs {
    fn from(fs: LocalFs) -> Self {
        Fs::Local(fs)
    }
}

impl FileSystem for Fs {
    fn add(&mut self, entry: FileEntry) -> Result<()> {
        self.inner_mut().add(entry)
    }

    fn put(&mut self, entry: FileEntry) -> Option<FileEntry> {
        self.inner_mut().put(entry)
    }

    fn get(&self, path: &str) -> Result<FileEntry> {
        self.inner().get(path)
    }

    fn delete(&mut self, path: &str) -> Result<()> {
        self.inner_mut().delete(path)
    }

    fn list(&self) -> Vec<String> {
        self.inner().list()
    }

    fn len(&self) -> usize {
        self.inner().len()
    }

    fn size(&self) -> u64 {
        self.inner().size()
    }
}
