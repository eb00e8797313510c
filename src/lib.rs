//! Core library for `fs_util`.
//!
//! Small file-system primitives: whole-file read and (atomic) write, directory
//! creation and listing, policy-driven recursive removal, a throttled
//! multi-algorithm checksum scanner, and mount/usage introspection.
//!
//! Operations return [`errors::Result`]; every OS failure keeps its
//! `io::Error` plus the operation and path that produced it.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;

pub use config::{
    CONFIG_ENV, Config, LogLevel, create_template_config, default_config_path, path_has_symlink_ancestor,
};
pub use errors::{FsUtilError, Result};
pub use fs_ops::{
    Algorithm, ChecksumRequest, ChecksumResult, DirOptions, IoLimit, OnError, Ownership, Partition, RemoveOp,
    Usage, WriteOptions, assert_mountpoint, calc_checksums, get_all_mountpoint, get_device, get_device_fs,
    get_disk_partitions, get_mountpoint, get_path_fs, get_path_inode_usage, get_path_usage, is_mountpoint,
    ls_dirs, ls_files, make_dirs, read_bytes, read_text, remove, write_file,
};
