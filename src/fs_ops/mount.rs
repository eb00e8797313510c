//! Mount point introspection over the OS partition table.
//!
//! The table is re-read on every call; nothing is cached.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::{FsUtilError, Result, io_err};
use crate::platform;

/// One row of the partition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partition {
    pub device: String,
    pub mountpoint: PathBuf,
    pub fstype: String,
    pub opts: String,
}

fn partitions(all: bool) -> Result<Vec<Partition>> {
    platform::disk_partitions(all).map_err(io_err("read partition table", Path::new("/")))
}

/// Partitions keyed by mount point. `all == false` drops pseudo filesystems
/// (proc, tmpfs, ...). A mount point mounted over keeps its last entry.
pub fn get_disk_partitions(all: bool) -> Result<BTreeMap<PathBuf, Partition>> {
    Ok(partitions(all)?
        .into_iter()
        .map(|p| (p.mountpoint.clone(), p))
        .collect())
}

/// All mount points in table order.
pub fn get_all_mountpoint(all: bool) -> Result<Vec<PathBuf>> {
    Ok(partitions(all)?.into_iter().map(|p| p.mountpoint).collect())
}

/// The mount point `path` resides on. Symlinks are resolved first.
pub fn get_mountpoint(path: &Path) -> Result<PathBuf> {
    let table = get_disk_partitions(true)?;
    mountpoint_in(&table, path)
}

fn mountpoint_in(table: &BTreeMap<PathBuf, Partition>, path: &Path) -> Result<PathBuf> {
    let real = dunce::canonicalize(path).map_err(io_err("resolve path", path))?;
    let mut cur = real.as_path();
    while !table.contains_key(cur) {
        match cur.parent() {
            Some(parent) => cur = parent,
            None => break,
        }
    }
    debug!(path = %path.display(), mountpoint = %cur.display(), "Resolved mount point");
    Ok(cur.to_path_buf())
}

fn partition_for<'a>(table: &'a BTreeMap<PathBuf, Partition>, path: &Path) -> Result<&'a Partition> {
    let mp = mountpoint_in(table, path)?;
    table.get(&mp).ok_or(FsUtilError::NotMountPoint(mp))
}

/// Device (`/dev/sdb1`, ...) holding `path`.
pub fn get_device(path: &Path) -> Result<String> {
    let table = get_disk_partitions(true)?;
    Ok(partition_for(&table, path)?.device.clone())
}

/// Filesystem type of `device`, or `"unknown"` if it isn't mounted.
pub fn get_device_fs(device: &str) -> Result<String> {
    Ok(partitions(true)?
        .into_iter()
        .find(|p| p.device == device)
        .map(|p| p.fstype)
        .unwrap_or_else(|| "unknown".to_string()))
}

/// Filesystem type (`ext4`, `apfs`, ...) of the volume holding `path`.
pub fn get_path_fs(path: &Path) -> Result<String> {
    let table = get_disk_partitions(true)?;
    Ok(partition_for(&table, path)?.fstype.clone())
}

pub fn is_mountpoint(path: &Path) -> bool {
    platform::is_mount(path)
}

/// Fail with `NotMountPoint` unless `path` is a mount point.
pub fn assert_mountpoint(path: &Path) -> Result<()> {
    if is_mountpoint(path) {
        Ok(())
    } else {
        Err(FsUtilError::NotMountPoint(path.to_path_buf()))
    }
}
