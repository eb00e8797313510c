//! Typed error definitions for fs_util.
//!
//! Every OS failure is carried as `FsUtilError::Io` with the operation name,
//! the path it touched and the untouched `io::Error` as its source, so callers
//! can still match on `kind()` / `raw_os_error()`. The rendered message adds a
//! short platform-aware hint derived from the OS code.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = FsUtilError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FsUtilError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid file name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("not a mount point: {}", .0.display())]
    NotMountPoint(PathBuf),

    #[error("{op} '{}': {source}{}", .path.display(), hint_suffix(.source))]
    Io {
        op: &'static str,
        path: PathBuf,
        source: io::Error,
    },
}

impl FsUtilError {
    /// Wrap an `io::Error` with the operation and path that produced it.
    pub fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FsUtilError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// `io::ErrorKind` of the underlying OS error, `None` for non-I/O variants.
    pub fn kind(&self) -> Option<io::ErrorKind> {
        match self {
            FsUtilError::Io { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Raw OS error code of the underlying error, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            FsUtilError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    /// Path the failing operation was applied to.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsUtilError::Io { path, .. } | FsUtilError::NotMountPoint(path) => Some(path),
            _ => None,
        }
    }
}

/// Returns a closure suitable for `.map_err(...)` that tags an `io::Error`
/// with `op` and `path`.
pub(crate) fn io_err<'a>(op: &'static str, path: &'a Path) -> impl FnOnce(io::Error) -> FsUtilError + 'a {
    move |e| FsUtilError::io(op, path, e)
}

fn hint_suffix(e: &io::Error) -> String {
    match (hint(e), e.raw_os_error()) {
        (Some(h), Some(code)) => format!(" ({h}) [os code: {code}]"),
        (None, Some(code)) => format!(" [os code: {code}]"),
        (Some(h), None) => format!(" ({h})"),
        (None, None) => String::new(),
    }
}

/// Short human hint for common OS error codes, falling back to the error kind.
pub fn hint(e: &io::Error) -> Option<&'static str> {
    if let Some(code) = e.raw_os_error() {
        #[cfg(unix)]
        {
            let h = match code {
                libc::EACCES | libc::EPERM => Some("permission denied; check ownership and mode"),
                libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
                libc::EBUSY => Some("resource busy"),
                libc::ENOENT => Some("path not found"),
                libc::EEXIST => Some("already exists"),
                libc::ENOTDIR => Some("a path component is not a directory"),
                libc::EISDIR => Some("is a directory"),
                libc::ENOTEMPTY => Some("directory not empty"),
                libc::ENOSPC => Some("insufficient space on device"),
                libc::EROFS => Some("read-only filesystem"),
                libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle"),
                libc::ENAMETOOLONG => Some("file name or path too long"),
                libc::EMFILE => Some("process file descriptor limit reached"),
                libc::ENFILE => Some("system-wide file table overflow"),
                _ => None,
            };
            if h.is_some() {
                return h;
            }
        }
        #[cfg(windows)]
        {
            let h = match code {
                5 => Some("access denied"),
                17 => Some("not same device; cross-filesystem rename"),
                32 => Some("sharing violation; file is in use"),
                2 | 3 => Some("path not found"),
                80 | 183 => Some("already exists"),
                112 => Some("insufficient disk space"),
                _ => None,
            };
            if h.is_some() {
                return h;
            }
        }
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and mode"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        io::ErrorKind::InvalidData => Some("content is not valid UTF-8"),
        io::ErrorKind::Unsupported => Some("not supported on this platform"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_variant_keeps_kind_and_path() {
        let e = FsUtilError::io("open", "/nope", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(e.kind(), Some(io::ErrorKind::NotFound));
        assert_eq!(e.path(), Some(Path::new("/nope")));
        let msg = e.to_string();
        assert!(msg.contains("open '/nope'"), "msg was: {msg}");
        assert!(msg.contains("path not found"), "msg was: {msg}");
    }

    #[cfg(unix)]
    #[test]
    fn raw_os_code_survives_wrapping() {
        let e = FsUtilError::io("write", "/tmp/x", io::Error::from_raw_os_error(libc::ENOSPC));
        assert_eq!(e.raw_os_error(), Some(libc::ENOSPC));
        let msg = e.to_string();
        assert!(msg.contains("insufficient space"), "msg was: {msg}");
        assert!(msg.contains("os code"), "msg was: {msg}");
    }

    #[test]
    fn non_io_variants_have_no_kind() {
        let e = FsUtilError::InvalidArgument("block_size must be positive".into());
        assert_eq!(e.kind(), None);
        assert_eq!(e.raw_os_error(), None);
    }
}
