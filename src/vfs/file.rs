use std::io::{self, Cursor, Read, Seek, SeekFrom};

use crate::common::FileMetadata;
use crate::error::{Result, StuffError};

use super::FileEntry;

/// A read-only handle on a copy of a virtual file, suitable for handing to
/// an HTTP layer: it reads, seeks and stats, and refuses directory listing.
#[derive(Debug)]
pub struct File {
    path: String,
    metadata: FileMetadata,
    rd: Cursor<Vec<u8>>,
}

impl File {
    pub fn new(entry: FileEntry) -> Self {
        let path = entry.path().to_string();
        let metadata = entry.metadata().clone();
        Self {
            path,
            metadata,
            rd: Cursor::new(entry.into_bytes()),
        }
    }

    /// Virtual path of the file.
    pub fn name(&self) -> &str {
        &self.path
    }

    pub fn stat(&self) -> &FileMetadata {
        &self.metadata
    }

    /// Virtual files are never directories.
    pub fn read_dir(&self) -> Result<Vec<FileMetadata>> {
        Err(StuffError::NotSupported)
    }

    /// There is nothing to release; closing rewinds the reader.
    pub fn close(&mut self) -> io::Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }
}

impl Read for File {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.rd.read(buf)
    }
}

impl Seek for File {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.rd.seek(pos)
    }
}
