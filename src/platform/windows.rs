//! Windows implementations of platform helpers (best-effort).
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; mode helpers are no-ops.
//! - There is no mount table to enumerate; only byte usage is available.

use std::fs::{File, OpenOptions};
use std::io;
use std::iter::once;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use super::FsStats;
use crate::fs_ops::Partition;

/// Byte counters via GetDiskFreeSpaceExW; inode counts don't exist here.
pub fn fs_stats(path: &Path) -> io::Result<FsStats> {
    use windows_sys::Win32::Storage::FileSystem::GetDiskFreeSpaceExW;
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(once(0)).collect();
    let mut free_avail: u64 = 0;
    let mut total: u64 = 0;
    let mut _total_free: u64 = 0;
    let ok = unsafe {
        GetDiskFreeSpaceExW(
            wide.as_ptr(),
            &mut free_avail as *mut u64,
            &mut total as *mut u64,
            &mut _total_free as *mut u64,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(FsStats {
        total_bytes: total,
        avail_bytes: free_avail,
        total_inodes: None,
        avail_inodes: None,
    })
}

/// Drive roots (`C:\`) and share roots are the only mount points we recognise.
pub fn is_mount(path: &Path) -> bool {
    match dunce::canonicalize(path) {
        Ok(p) => p.parent().is_none(),
        Err(_) => false,
    }
}

pub fn disk_partitions(_all: bool) -> io::Result<Vec<Partition>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "partition enumeration is not supported on this platform",
    ))
}

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// No-op on Windows; POSIX-style directory modes are not applicable.
pub fn set_dir_mode_0700(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// No-op on Windows; POSIX-style file modes are not applicable.
pub fn set_file_mode_0600(_path: &Path) -> io::Result<()> {
    Ok(())
}
