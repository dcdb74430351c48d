use std::path::{Path, PathBuf};

use thiserror::Error;

/// The primary error type for all operations in the `stuffbin` crate.
#[derive(Debug, Error)]
pub enum StuffError {
    /// The file carries no stuffbin identifier: it was never stuffed, it was
    /// stuffed with a different tag, or it is shorter than the footer.
    ///
    /// This is the signal callers use to fall back to the local filesystem.
    #[error("no ID found in the file")]
    NoIdentifier,

    /// A virtual path is not present in the filesystem.
    #[error("file not found: {0}")]
    NotFound(String),

    /// A virtual path is already present in the filesystem.
    #[error("file already exists: {0}")]
    AlreadyExists(String),

    /// The operation exists on the file handle but cannot be served.
    #[error("this method is not supported")]
    NotSupported,

    /// A `source[:alias]` file specification could not be parsed.
    #[error("invalid alias format '{0}'")]
    InvalidSpec(String),

    /// A footer tag that is not exactly 8 bytes long.
    #[error("invalid tag '{0}': must be exactly 8 bytes")]
    InvalidTag(String),

    /// Input and output of a binary rewrite point at the same file.
    #[error("input and output are the same file: '{}'", .0.display())]
    SamePath(PathBuf),

    /// A glob used to load a set of files matched nothing.
    #[error("pattern {0} matches no files")]
    NoMatch(String),

    /// An I/O error occurred while reading or writing a file.
    /// Includes the path where the error happened.
    #[error("I/O error on path '{}': {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Directory traversal failed while resolving file specifications.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The archive blob is malformed or the codec failed.
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A malformed glob pattern.
    #[error("bad pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl StuffError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        StuffError::Io {
            source,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// True for the "not stuffed" signal.
    pub fn is_no_identifier(&self) -> bool {
        matches!(self, StuffError::NoIdentifier)
    }
}

// Generic IO error conversion that doesn't carry a path
impl From<std::io::Error> for StuffError {
    fn from(err: std::io::Error) -> Self {
        StuffError::Io {
            source: err,
            path: PathBuf::new(),
        }
    }
}

pub type Result<T, E = StuffError> = std::result::Result<T, E>;
