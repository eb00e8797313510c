//! Config module.
//! Provides configuration types, default paths, XML loading, and validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use xml::{create_template_config, load_config_from_xml_path};

/// Checksum read block when the config names none (32 MiB).
pub const DEFAULT_READ_BLOCK: usize = 32 * 1024 * 1024;
/// Checksum throughput cap when the config names none (32 MiB/s).
pub const DEFAULT_IO_LIMIT: u64 = 32 * 1024 * 1024;
