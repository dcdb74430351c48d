//! # Binary Unstuffer
//!
//! Recovers the files stuffed onto a binary. The usual entry point for a
//! program reading its own assets is [`Unstuffer::open_or_local`]:
//!
//! ```no_run
//! use stuffbin::{FileSystem, Unstuffer};
//!
//! let exe = std::env::current_exe()?;
//! let fs = Unstuffer::default().open_or_local(&exe, "/", ["static/:/static"])?;
//! let css = fs.read("/static/app.css")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::archive;
use crate::error::{Result, StuffError};
use crate::footer::{FooterCodec, Identifier};
use crate::vfs::{FileSystem, Fs, LocalFs, MemFs};

/// Reads stuffed binaries for one footer tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unstuffer {
    codec: FooterCodec,
}

impl Unstuffer {
    pub fn new(codec: FooterCodec) -> Self {
        Self { codec }
    }

    /// The identifier at the end of `path`.
    pub fn identifier(&self, path: impl AsRef<Path>) -> Result<Identifier> {
        self.codec.decode(path)
    }

    /// The raw archive bytes stuffed onto `path`, without unpacking them.
    pub fn get_stuff(&self, path: impl AsRef<Path>) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let id = self.codec.decode(path)?;
        read_at(path, id.bin_size, id.zip_size).map_err(|e| StuffError::io(path, e))
    }

    /// Unpacks the files stuffed onto `path` into a filesystem.
    ///
    /// An unstuffed binary yields `NoIdentifier`, untouched, so callers can
    /// tell "no assets" apart from a real failure.
    pub fn unstuff(&self, path: impl AsRef<Path>) -> Result<MemFs> {
        let path = path.as_ref();
        let fs = archive::unzip(&self.get_stuff(path)?)?;
        tracing::info!(path = %path.display(), files = fs.len(), "unstuffed binary");
        Ok(fs)
    }

    /// Unstuffs `path`; if it carries no assets, loads them from local disk
    /// with the same root and specifications used to stuff them.
    pub fn open_or_local<I, S>(&self, path: impl AsRef<Path>, root: &str, specs: I) -> Result<Fs>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.unstuff(path) {
            Ok(fs) => Ok(Fs::Memory(fs)),
            Err(StuffError::NoIdentifier) => {
                tracing::info!("binary is not stuffed, falling back to the local filesystem");
                Ok(Fs::Local(LocalFs::new(root, specs)?))
            }
            Err(e) => Err(e),
        }
    }
}

fn read_at(path: &Path, offset: u64, len: u64) -> std::io::Result<Vec<u8>> {
    let mut f = File::open(path)?;
    let file_len = f.metadata()?.len();
    if offset.checked_add(len).map_or(true, |end| end > file_len) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stuffed archive is truncated",
        ));
    }
    f.seek(SeekFrom::Start(offset))?;
    let mut b = vec![0u8; len as usize];
    f.read_exact(&mut b)?;
    Ok(b)
}
