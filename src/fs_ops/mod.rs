//! Filesystem operations: modularized.

mod atomic;
mod checksum;
mod dirs;
mod mount;
mod ownership;
mod remove;
mod space;
mod util;
mod write;

pub use checksum::{Algorithm, ChecksumRequest, ChecksumResult, IoLimit, calc_checksums};
pub use dirs::{DirOptions, ls_dirs, ls_files, make_dirs};
pub use mount::{
    Partition, assert_mountpoint, get_all_mountpoint, get_device, get_device_fs, get_disk_partitions,
    get_mountpoint, get_path_fs, is_mountpoint,
};
pub use ownership::Ownership;
pub use remove::{ErrorHandler, OnError, RemoveOp, remove};
pub use space::{Usage, get_path_inode_usage, get_path_usage};
pub use write::{WriteOptions, read_bytes, read_text, write_file};
