//! Platform-specific helpers.
//! This module hides OS differences (Linux/other Unix, macOS, Windows) behind a
//! uniform API: partition tables, filesystem statistics, mount detection and
//! the small permission helpers used for config and log files.

#[cfg(unix)]
mod common_unix;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(all(unix, not(target_os = "macos")))]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use common_unix::{
    fs_stats, is_mount, open_log_file_secure_append, set_dir_mode_0700, set_file_mode_0600,
};
#[cfg(target_os = "macos")]
pub use macos::disk_partitions;
#[cfg(all(unix, not(target_os = "macos")))]
pub use unix::disk_partitions;

#[cfg(not(unix))]
pub use windows::{
    disk_partitions, fs_stats, is_mount, open_log_file_secure_append, set_dir_mode_0700,
    set_file_mode_0600,
};

/// Raw filesystem counters for the volume holding a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsStats {
    /// Size of the filesystem in bytes.
    pub total_bytes: u64,
    /// Bytes available to unprivileged users.
    pub avail_bytes: u64,
    /// Inode counts, when the platform has them.
    pub total_inodes: Option<u64>,
    pub avail_inodes: Option<u64>,
}
