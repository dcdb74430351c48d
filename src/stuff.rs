//! # Binary Stuffer
//!
//! Appends a ZIP of assets plus a footer to a copy of an executable:
//!
//! ```text
//! [original binary][archive][footer: tag | bin_size | zip_size]
//! ```
//!
//! Restuffing an already stuffed binary replaces the old archive and footer
//! instead of stacking a new one on top, so the binary portion never grows.
//! Nothing here is atomic: a failure halfway leaves a partial output file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;

use crate::archive;
use crate::error::{Result, StuffError};
use crate::footer::{FooterCodec, Identifier};
use crate::fsx;

/// Writes and strips stuffed binaries for one footer tag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stuffer {
    codec: FooterCodec,
}

impl Stuffer {
    pub fn new(codec: FooterCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &FooterCodec {
        &self.codec
    }

    /// Zips the files named by `specs` (mounted under `root`) and stuffs
    /// them onto a copy of `input` written to `output`.
    ///
    /// Returns the size of the original binary and of the archive.
    pub fn stuff<I, S>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        root: &str,
        specs: I,
    ) -> Result<(u64, u64)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        let z = archive::zip_files(root, specs)?;

        // Copy the binary and get the handle to append remaining data.
        let (mut out, orig_size) = self.copy_binary(input, output)?;
        out.write_all(&z).map_err(|e| StuffError::io(output, e))?;

        let id = self.codec.identifier(orig_size, z.len() as u64);
        out.write_all(&self.codec.encode(&id))
            .and_then(|_| out.sync_all())
            .map_err(|e| StuffError::io(output, e))?;

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            bin_size = orig_size,
            zip_size = z.len(),
            "stuffed binary"
        );
        Ok((orig_size, z.len() as u64))
    }

    /// Copies `input` to `output` without its archive and footer, undoing
    /// a stuff. Fails with `NoIdentifier` if `input` was never stuffed.
    pub fn strip(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<Identifier> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let id = self.codec.decode(input)?;

        let (out, _) = self.copy_binary(input, output)?;
        out.sync_all().map_err(|e| StuffError::io(output, e))?;

        tracing::info!(input = %input.display(), output = %output.display(), bin_size = id.bin_size, "stripped binary");
        Ok(id)
    }

    /// Copies the binary portion of `input` into a fresh `output` and
    /// returns the open output handle along with the original binary size.
    ///
    /// If `input` is already stuffed only its first `bin_size` bytes are
    /// copied, dropping the previous archive and footer.
    fn copy_binary(&self, input: &Path, output: &Path) -> Result<(File, u64)> {
        if same_file(input, output) {
            return Err(StuffError::SamePath(output.to_path_buf()));
        }

        let from = File::open(input).map_err(|e| StuffError::io(input, e))?;
        let cur_size = from.metadata().map_err(|e| StuffError::io(input, e))?.len();

        let orig_size = match self.codec.decode(input) {
            Ok(old) => {
                tracing::debug!(bin_size = old.bin_size, zip_size = old.zip_size, "input is already stuffed");
                old.bin_size.min(cur_size)
            }
            Err(StuffError::NoIdentifier) => cur_size,
            Err(e) => return Err(e),
        };

        let mut to = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(output)
            .map_err(|e| StuffError::io(output, e))?;
        io::copy(&mut from.take(orig_size), &mut to).map_err(|e| StuffError::io(output, e))?;
        fsx::set_unix_permissions(output, fsx::EXECUTABLE_MODE).map_err(|e| StuffError::io(output, e))?;

        Ok((to, orig_size))
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
