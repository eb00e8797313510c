//! Common Unix helpers shared by macOS and other Unix targets.
//! statvfs-based filesystem counters, mount detection and mode helpers.

use std::ffi::CString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use super::FsStats;

/// Filesystem counters for the volume holding `path` (statvfs).
///
/// Byte counts use `f_frsize`; "available" excludes blocks reserved for root.
pub fn fs_stats(path: &Path) -> io::Result<FsStats> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains null byte"))?;
    let stat = unsafe {
        let mut stat: MaybeUninit<libc::statvfs> = MaybeUninit::uninit();
        if libc::statvfs(c_path.as_ptr(), stat.as_mut_ptr()) != 0 {
            return Err(io::Error::last_os_error());
        }
        stat.assume_init()
    };

    let frsize = stat.f_frsize as u64;
    Ok(FsStats {
        total_bytes: frsize.saturating_mul(stat.f_blocks as u64),
        avail_bytes: frsize.saturating_mul(stat.f_bavail as u64),
        total_inodes: Some(stat.f_files as u64),
        avail_inodes: Some(stat.f_favail as u64),
    })
}

/// True when `path` is a mount point: it lives on a different device than its
/// parent, or is its own parent (`/`). Symlinks and unreadable paths are not.
pub fn is_mount(path: &Path) -> bool {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return false;
    };
    if meta.file_type().is_symlink() {
        return false;
    }
    let Ok(parent) = fs::symlink_metadata(path.join("..")) else {
        return false;
    };
    meta.dev() != parent.dev() || meta.ino() == parent.ino()
}

/// Append handle for the log file. A file we create starts out 0600; an
/// existing file keeps whatever mode its owner gave it.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    let created = OpenOptions::new().append(true).create_new(true).mode(0o600).open(path);
    match created {
        Ok(f) => {
            // umask may have stripped bits we asked for; pin the mode exactly.
            f.set_permissions(fs::Permissions::from_mode(0o600))?;
            Ok(f)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => OpenOptions::new().append(true).open(path),
        Err(e) => Err(e),
    }
}

/// POSIX chmod 0700 for directories.
pub fn set_dir_mode_0700(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

/// POSIX chmod 0600 for files.
pub fn set_file_mode_0600(path: &Path) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}
