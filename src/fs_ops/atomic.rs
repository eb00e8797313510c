//! Atomic write-then-rename.
//! - Writes to a unique temp sibling (`<target>._tmp_.<pid>_<nanos>_<seq>`), chowns it, fsyncs it.
//! - Renames it over the target; rename is atomic on one filesystem.
//! - Any failure removes the temp file and returns the original error.
//! - On Unix, best-effort fsync of the parent directory after the rename.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::ownership::Ownership;
use super::util::{fsync_dir, tmp_sibling_path};
use super::write::write_in_place;
use crate::errors::{Result, io_err};

pub(super) fn write_atomic(target: &Path, content: &[u8], owner: &Ownership, fsync: bool) -> Result<()> {
    let tmp = tmp_sibling_path(target);

    if let Err(e) = write_in_place(&tmp, content, owner, fsync) {
        discard(&tmp);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp, target) {
        discard(&tmp);
        return Err(io_err("atomic rename", target)(e));
    }
    debug!(tmp = %tmp.display(), target = %target.display(), "Renamed temp over target");

    if fsync && let Some(parent) = target.parent() {
        // Ignore fsync errors to avoid turning a successful rename into a failure.
        let dir = if parent.as_os_str().is_empty() { Path::new(".") } else { parent };
        let _ = fsync_dir(dir);
    }

    Ok(())
}

fn discard(tmp: &Path) {
    match fs::remove_file(tmp) {
        Ok(()) => debug!(tmp = %tmp.display(), "Removed temp file after failed write"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(tmp = %tmp.display(), error = %e, "Failed to remove temp file"),
    }
}
