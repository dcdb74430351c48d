//! Common types shared by the resolver, the archive codec and the filesystems.

use std::fs::Metadata;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default mode for files whose permissions are unknown.
pub const DEFAULT_MODE: u32 = 0o644;

/// Metadata for a single file, either on disk or inside the archive.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub size: u64,
    /// Unix permission bits.
    pub mode: u32,
    /// Modification time in UTC, if known.
    pub modified: Option<NaiveDateTime>,
}

impl FileMetadata {
    pub fn new(size: u64, mode: u32, modified: Option<NaiveDateTime>) -> Self {
        Self { size, mode, modified }
    }

    /// Metadata for a file created in memory right now.
    pub fn now(size: u64) -> Self {
        Self::new(size, DEFAULT_MODE, Some(Utc::now().naive_utc()))
    }
}

impl From<&Metadata> for FileMetadata {
    fn from(meta: &Metadata) -> Self {
        let modified = meta
            .modified()
            .ok()
            .map(|t| DateTime::<Utc>::from(t).naive_utc());
        Self {
            size: meta.len(),
            mode: crate::fsx::unix_mode(meta).unwrap_or(DEFAULT_MODE),
            modified,
        }
    }
}
