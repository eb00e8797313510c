//! CLI definition and parsing.
//! Defines Args (global flags + one subcommand per library operation) and parse().
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - Checksum, usage and mount results are printed as JSON.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::{Algorithm, Ownership};

/// CLI wrapper for the fs_util library.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "File-system utilities: atomic writes, throttled checksums, recursive removal"
)]
pub struct Args {
    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also append logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath, help = "Append logs to this file")]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where fs_util will look for the config file (or FS_UTIL_CONFIG if set), then exit.
    #[arg(long, help = "Print the config file location used by fs_util and exit")]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Explicit owner for created files and directories.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct OwnerArgs {
    /// Owner uid (falls back to the configured default).
    #[arg(long)]
    pub uid: Option<u32>,
    /// Owner gid (falls back to the configured default).
    #[arg(long)]
    pub gid: Option<u32>,
}

impl OwnerArgs {
    pub fn ownership(&self) -> Ownership {
        Ownership {
            uid: self.uid,
            gid: self.gid,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create a directory and any missing parents.
    Mkdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Octal permission bits for new directories (before umask).
        #[arg(long, default_value = "755", value_parser = parse_octal_mode)]
        mode: u32,
        #[command(flatten)]
        owner: OwnerArgs,
    },
    /// List the subdirectory names of a directory, sorted.
    LsDirs {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// List regular files of a directory whose name matches PATTERN, sorted.
    LsFiles {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
        /// Regular expression searched anywhere in the file name.
        #[arg(default_value = ".*")]
        pattern: String,
    },
    /// Print a file's contents.
    Read {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Write content to a file (from --content, or stdin when omitted).
    Write {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        #[arg(long)]
        content: Option<String>,
        /// Write a temp sibling and rename it over the target.
        #[arg(long)]
        atomic: bool,
        /// Skip fsync before returning.
        #[arg(long)]
        no_fsync: bool,
        #[command(flatten)]
        owner: OwnerArgs,
    },
    /// Remove a file, symlink or directory tree.
    Rm {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        /// Log failures and keep going instead of stopping at the first one.
        #[arg(long)]
        ignore_errors: bool,
    },
    /// Compute checksums of a file in one throttled pass.
    Checksum {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
        /// Algorithm to compute (repeatable): sha1, md5, crc32, sha256. Defaults to all.
        #[arg(long = "algo", short = 'a', value_name = "ALGO")]
        algorithms: Vec<Algorithm>,
        /// Read block size in bytes (defaults to the configured value).
        #[arg(long)]
        block_size: Option<usize>,
        /// Throughput cap in bytes per second (defaults to the configured value).
        #[arg(long, conflicts_with = "unlimited")]
        io_limit: Option<u64>,
        /// Read as fast as possible.
        #[arg(long)]
        unlimited: bool,
    },
    /// Show the mount point, device and filesystem type holding PATH.
    Mountpoint {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        /// Fail unless PATH itself is a mount point.
        #[arg(long)]
        check: bool,
    },
    /// List mounted partitions.
    Mounts {
        /// Include pseudo filesystems (proc, tmpfs, ...).
        #[arg(long)]
        all: bool,
    },
    /// Show space (or inode) usage of the filesystem holding PATH.
    Usage {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
        #[arg(long)]
        inodes: bool,
    },
    /// Write a template config file (default location unless PATH is given).
    InitConfig {
        #[arg(value_hint = ValueHint::FilePath)]
        path: Option<PathBuf>,
    },
}

/// Parse a permission mode written in octal (`755`, `0755`, `0o755`).
pub fn parse_octal_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim().trim_start_matches("0o");
    let mode = u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode '{s}': {e}"))?;
    if mode > 0o7777 {
        return Err(format!("mode '{s}' is out of range"));
    }
    Ok(mode)
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octal_modes() {
        assert_eq!(parse_octal_mode("755").unwrap(), 0o755);
        assert_eq!(parse_octal_mode("0700").unwrap(), 0o700);
        assert_eq!(parse_octal_mode("0o644").unwrap(), 0o644);
        assert!(parse_octal_mode("789").is_err());
        assert!(parse_octal_mode("17777").is_err());
    }

    #[test]
    fn debug_beats_log_level() {
        let args = Args::try_parse_from(["fs_util", "--log-level", "quiet", "-d", "ls-dirs", "/"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));
    }

    #[test]
    fn overrides_touch_only_set_fields() {
        let mut cfg = Config::default();
        let args = Args::try_parse_from(["fs_util", "mounts"]).unwrap();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg, Config::default());

        let args =
            Args::try_parse_from(["fs_util", "--log-level", "info", "--log-file", "/tmp/x.log", "mounts"]).unwrap();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Info);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/x.log")));
    }

    #[test]
    fn checksum_algorithms_parse() {
        let args = Args::try_parse_from(["fs_util", "checksum", "f", "-a", "sha1", "--algo", "CRC32"]).unwrap();
        match args.command {
            Some(Command::Checksum { algorithms, .. }) => {
                assert_eq!(algorithms, vec![Algorithm::Sha1, Algorithm::Crc32])
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(Args::try_parse_from(["fs_util", "checksum", "f", "-a", "whirlpool"]).is_err());
    }

    #[test]
    fn io_limit_conflicts_with_unlimited() {
        assert!(Args::try_parse_from(["fs_util", "checksum", "f", "--io-limit", "5", "--unlimited"]).is_err());
    }

    #[test]
    fn owner_flags_flatten() {
        let args = Args::try_parse_from(["fs_util", "mkdir", "d", "--uid", "0", "--mode", "700"]).unwrap();
        match args.command {
            Some(Command::Mkdir { mode, owner, .. }) => {
                assert_eq!(mode, 0o700);
                assert_eq!(owner.ownership(), Ownership { uid: Some(0), gid: None });
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
