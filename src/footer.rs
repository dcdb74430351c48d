//! # Footer Codec
//!
//! A stuffed binary ends with a fixed 24-byte identifier:
//!
//! ```text
//! [0..8)   tag            8 raw bytes, b"stuffbin" by default
//! [8..16)  bin_size       u64, big-endian: length of the original executable
//! [16..24) zip_size       u64, big-endian: length of the appended archive
//! ```
//!
//! so a stuffed file is laid out as `[binary][archive][footer]` and its total
//! length is always `bin_size + zip_size + 24`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, StuffError};

/// Length of the identifier appended to binaries.
pub const FOOTER_LEN: u64 = 24;

/// Tag written by default.
pub const DEFAULT_TAG: [u8; 8] = *b"stuffbin";

/// The identifier found at the end of a stuffed binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Identifier {
    #[serde(serialize_with = "serialize_tag")]
    pub tag: [u8; 8],
    pub bin_size: u64,
    pub zip_size: u64,
}

fn serialize_tag<S: serde::Serializer>(tag: &[u8; 8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(tag))
}

impl Identifier {
    pub fn new(tag: [u8; 8], bin_size: u64, zip_size: u64) -> Self {
        Self { tag, bin_size, zip_size }
    }

    /// The tag as text, lossily decoded.
    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    /// Length of a file carrying this identifier, or `None` if the sizes
    /// overflow (only possible for a forged footer).
    pub fn total_size(&self) -> Option<u64> {
        self.bin_size.checked_add(self.zip_size)?.checked_add(FOOTER_LEN)
    }
}

/// Encodes and recognises identifiers carrying one particular tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterCodec {
    tag: [u8; 8],
}

impl Default for FooterCodec {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl FooterCodec {
    pub const fn new(tag: [u8; 8]) -> Self {
        Self { tag }
    }

    /// Builds a codec from a textual tag, which must be exactly 8 bytes.
    pub fn with_tag(tag: &str) -> Result<Self> {
        let bytes: [u8; 8] = tag
            .as_bytes()
            .try_into()
            .map_err(|_| StuffError::InvalidTag(tag.to_string()))?;
        Ok(Self::new(bytes))
    }

    pub fn tag(&self) -> [u8; 8] {
        self.tag
    }

    /// A fresh identifier carrying this codec's tag.
    pub fn identifier(&self, bin_size: u64, zip_size: u64) -> Identifier {
        Identifier::new(self.tag, bin_size, zip_size)
    }

    /// Serialises an identifier into its 24-byte wire form.
    ///
    /// The identifier's own tag is written as-is.
    pub fn encode(&self, id: &Identifier) -> [u8; FOOTER_LEN as usize] {
        let mut b = [0u8; FOOTER_LEN as usize];
        b[0..8].copy_from_slice(&id.tag);
        b[8..16].copy_from_slice(&id.bin_size.to_be_bytes());
        b[16..24].copy_from_slice(&id.zip_size.to_be_bytes());
        b
    }

    /// Parses a 24-byte footer, returning `NoIdentifier` on a tag mismatch.
    pub fn parse(&self, buf: &[u8; FOOTER_LEN as usize]) -> Result<Identifier> {
        let (tag, rest) = buf.split_at(8);
        if tag != self.tag {
            return Err(StuffError::NoIdentifier);
        }
        let (bin, zip) = rest.split_at(8);
        let mut bin_size = [0u8; 8];
        let mut zip_size = [0u8; 8];
        bin_size.copy_from_slice(bin);
        zip_size.copy_from_slice(zip);
        Ok(Identifier::new(
            self.tag,
            u64::from_be_bytes(bin_size),
            u64::from_be_bytes(zip_size),
        ))
    }

    /// Reads the identifier from the end of a seekable stream.
    pub fn decode_from<R: Read + Seek>(&self, r: &mut R) -> Result<Identifier> {
        let len = r.seek(SeekFrom::End(0))?;
        if len < FOOTER_LEN {
            return Err(StuffError::NoIdentifier);
        }
        r.seek(SeekFrom::Start(len - FOOTER_LEN))?;
        let mut buf = [0u8; FOOTER_LEN as usize];
        r.read_exact(&mut buf)?;
        self.parse(&buf)
    }

    /// Reads the identifier from the end of the file at `path`.
    pub fn decode(&self, path: impl AsRef<Path>) -> Result<Identifier> {
        let path = path.as_ref();
        let mut f = File::open(path).map_err(|e| StuffError::io(path, e))?;
        self.decode_from(&mut f).map_err(|e| match e {
            StuffError::Io { source, .. } => StuffError::io(path, source),
            other => other,
        })
    }
}
