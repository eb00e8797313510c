use serde::Serialize;
use std::io;
use std::path::Path;

use crate::errors::{FsUtilError, Result, io_err};
use crate::platform;

/// Space or inode usage of one filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Usage {
    pub total: u64,
    /// Includes what is reserved for the super user.
    pub used: u64,
    pub available: u64,
    /// `used / total`, 0.0 for an empty filesystem.
    pub percent: f64,
}

impl Usage {
    fn from_counts(total: u64, available: u64) -> Self {
        let used = total.saturating_sub(available);
        let percent = if total == 0 { 0.0 } else { used as f64 / total as f64 };
        Self {
            total,
            used,
            available,
            percent,
        }
    }
}

pub(crate) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Byte usage of the filesystem `path` lives on.
pub fn get_path_usage(path: &Path) -> Result<Usage> {
    let st = platform::fs_stats(path).map_err(io_err("statvfs", path))?;
    let usage = Usage::from_counts(st.total_bytes, st.avail_bytes);
    tracing::debug!(
        path = %path.display(),
        total = %format_bytes(usage.total),
        available = %format_bytes(usage.available),
        "Space usage"
    );
    Ok(usage)
}

/// Inode usage of the filesystem `path` lives on.
pub fn get_path_inode_usage(path: &Path) -> Result<Usage> {
    let st = platform::fs_stats(path).map_err(io_err("statvfs", path))?;
    match (st.total_inodes, st.avail_inodes) {
        (Some(total), Some(avail)) => Ok(Usage::from_counts(total, avail)),
        _ => Err(FsUtilError::io(
            "statvfs",
            path,
            io::Error::new(io::ErrorKind::Unsupported, "inode counts are not available"),
        )),
    }
}
