//! Whole-file read and write.
//!
//! `write_file` has two modes:
//! - in place: create/truncate the target, write, flush, optionally fsync, chown;
//! - atomic: do the same against a temp sibling, then rename it over the target
//!   (see `atomic.rs`). Readers never observe a truncated target.
//!
//! Concurrent in-place writers may interleave; concurrent atomic writers race
//! only at rename and the last rename wins.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info};

use super::atomic::write_atomic;
use super::ownership::{self, Ownership};
use crate::errors::{FsUtilError, Result, io_err};

/// How `write_file` behaves. Defaults: in place, fsync on, no explicit owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Explicit owner; unset ids fall back to the caller's defaults.
    pub owner: Ownership,
    pub atomic: bool,
    pub fsync: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            owner: Ownership::default(),
            atomic: false,
            fsync: true,
        }
    }
}

impl WriteOptions {
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn fsync(mut self, fsync: bool) -> Self {
        self.fsync = fsync;
        self
    }

    pub fn owner(mut self, owner: Ownership) -> Self {
        self.owner = owner;
        self
    }
}

/// Write `content` to `path`.
///
/// `defaults` supplies uid/gid for ids not set in `opts.owner`; it is consulted
/// once per call. In atomic mode a failure at any stage leaves the target as it
/// was and removes the temp file before the error is returned.
pub fn write_file(
    path: &Path,
    content: impl AsRef<[u8]>,
    opts: &WriteOptions,
    defaults: &Ownership,
) -> Result<()> {
    let content = content.as_ref();
    let owner = opts.owner.or(defaults);

    if opts.atomic {
        write_atomic(path, content, &owner, opts.fsync)?;
        info!(path = %path.display(), bytes = content.len(), "Wrote file atomically");
    } else {
        write_in_place(path, content, &owner, opts.fsync)?;
        info!(path = %path.display(), bytes = content.len(), "Wrote file");
    }
    Ok(())
}

/// Truncate-and-write sequence shared by both modes.
pub(super) fn write_in_place(path: &Path, content: &[u8], owner: &Ownership, fsync: bool) -> Result<()> {
    let mut f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(io_err("open for write", path))?;
    f.write_all(content).map_err(io_err("write", path))?;
    f.flush().map_err(io_err("flush", path))?;
    if fsync {
        f.sync_all().map_err(io_err("fsync", path))?;
    }
    drop(f);
    debug!(path = %path.display(), bytes = content.len(), fsync, "Wrote content");

    ownership::apply(path, owner)
}

/// Read the entire file as bytes.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(io_err("read", path))
}

/// Read the entire file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes)
        .map_err(|e| FsUtilError::io("decode", path, io::Error::new(io::ErrorKind::InvalidData, e)))
}
