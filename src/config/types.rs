//! Core configuration types.
//! - Config holds the defaults consumed by the writer, directory creator and checksum scanner.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{DEFAULT_IO_LIMIT, DEFAULT_READ_BLOCK};
use crate::fs_ops::{IoLimit, Ownership};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration.
///
/// Nothing here is global: callers hand `default_owner()` to the writer and
/// directory creator, and `read_block`/`io_limit` seed checksum requests.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Owner applied to written files and created dirs when the call names none
    pub default_uid: Option<u32>,
    pub default_gid: Option<u32>,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Checksum read block in bytes
    pub read_block: usize,
    /// Checksum throughput cap
    pub io_limit: IoLimit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_uid: None,
            default_gid: None,
            log_level: LogLevel::Normal,
            log_file: None,
            read_block: DEFAULT_READ_BLOCK,
            io_limit: IoLimit::BytesPerSec(DEFAULT_IO_LIMIT),
        }
    }
}

impl Config {
    /// Ownership defaults, read fresh from this config on every call.
    pub fn default_owner(&self) -> Ownership {
        Ownership {
            uid: self.default_uid,
            gid: self.default_gid,
        }
    }
}
