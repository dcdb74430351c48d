//! # stuffbin
//!
//! Compress a set of static files, stuff them onto the end of an already
//! built executable, and read them back at runtime as a virtual filesystem
//! without needing them on disk.
//!
//! ## Key Modules
//!
//! - [`footer`]: the 24-byte identifier that makes a binary self-describing.
//! - [`resolve`]: maps `source[:alias]` file specifications to virtual paths.
//! - [`archive`]: packs resolved files into a ZIP and unpacks it again.
//! - [`stuff`]: appends, replaces and strips the stuffed archive.
//! - [`unstuff`]: recovers a filesystem from a stuffed binary.
//! - [`vfs`]: the in-memory and local-disk filesystems.
//!
//! ## Examples
//!
//! ```no_run
//! use stuffbin::{FileSystem, Stuffer, Unstuffer};
//!
//! // Build step: stuff ./static onto a copy of the binary as /static/...
//! let (bin, zip) = Stuffer::default().stuff("app", "app.stuffed", "/", ["static/:/static"])?;
//!
//! // At runtime: read the files back.
//! let fs = Unstuffer::default().unstuff("app.stuffed")?;
//! for path in fs.glob("/static/*.css")? {
//!     println!("{} ({} bytes)", path, fs.get(&path)?.size());
//! }
//! # Ok::<(), stuffbin::StuffError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod cli_runner;
pub mod common;
pub mod error;
pub mod footer;
pub mod resolve;
pub mod stuff;
pub mod unstuff;
pub mod vfs;

// Cross-platform permission helpers
pub mod fsx;

pub use error::StuffError;
pub use footer::{FooterCodec, Identifier, DEFAULT_TAG, FOOTER_LEN};
pub use resolve::{FileSpec, Resolver, WalkEntry};
pub use stuff::Stuffer;
pub use unstuff::Unstuffer;
pub use vfs::{File, FileEntry, FileSystem, Fs, LocalFs, MemFs};
