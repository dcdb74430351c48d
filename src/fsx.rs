//! Cross-platform permission helpers.
//!
//! On Unix the real mode bits are read and written. On Windows there are no
//! POSIX bits: reads report `None` and writes are no-ops.

use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Permission bits given to stuffed and stripped binaries.
pub const EXECUTABLE_MODE: u32 = 0o755;

#[cfg(unix)]
/// POSIX permission bits of a file.
pub fn unix_mode(meta: &Metadata) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    Some(meta.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
pub fn unix_mode(_meta: &Metadata) -> Option<u32> {
    None
}

#[cfg(unix)]
/// Set POSIX permission bits on Unix.
pub fn set_unix_permissions(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
/// No-op on Windows: POSIX permission bits are not preserved.
pub fn set_unix_permissions(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
