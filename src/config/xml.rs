//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - Writes a template on request (`init-config`), through the crate's own atomic writer.
//!
//! Notes:
//! - Unknown XML fields are a hard error to surface misconfigurations early.
//! - Numeric fields are whitespace-trimmed before parsing.

use anyhow::{Context, Result, bail};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
use super::{DEFAULT_IO_LIMIT, DEFAULT_READ_BLOCK};

use crate::config::types::{Config, LogLevel};
use crate::fs_ops::{IoLimit, Ownership, WriteOptions, write_file};
use crate::platform::{set_dir_mode_0700, set_file_mode_0600};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    gid: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default)]
    read_block: Option<String>,
    /// Bytes per second; negative disables throttling.
    #[serde(default)]
    io_limit: Option<String>,
}

fn trimmed(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = trimmed(&parsed.uid) {
        cfg.default_uid = Some(s.parse().with_context(|| format!("invalid uid '{s}'"))?);
    }
    if let Some(s) = trimmed(&parsed.gid) {
        cfg.default_gid = Some(s.parse().with_context(|| format!("invalid gid '{s}'"))?);
    }
    if let Some(s) = trimmed(&parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = trimmed(&parsed.log_file) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = trimmed(&parsed.read_block) {
        cfg.read_block = s.parse().with_context(|| format!("invalid read_block '{s}'"))?;
    }
    if let Some(s) = trimmed(&parsed.io_limit) {
        let n: i64 = s.parse().with_context(|| format!("invalid io_limit '{s}'"))?;
        cfg.io_limit = if n < 0 {
            IoLimit::Unlimited
        } else {
            IoLimit::BytesPerSec(n as u64)
        };
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path (quick_xml).
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    let cfg = xml_to_config(parsed).with_context(|| format!("config xml '{}'", path.display()))?;
    cfg.validate()?;
    debug!(path = %path.display(), "Loaded config");
    Ok(cfg)
}

impl Config {
    /// Load the config used by this process.
    ///
    /// - `$FS_UTIL_CONFIG` set: that file must exist and parse.
    /// - Otherwise the platform default path is used when present, else defaults.
    pub fn load() -> Result<Config> {
        let explicit = env::var_os(CONFIG_ENV).is_some();
        let Some(path) = default_config_path() else {
            return Ok(Config::default());
        };
        if !path.exists() {
            if explicit {
                bail!("{CONFIG_ENV} points at a missing file: {}", path.display());
            }
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Config::default());
        }
        load_config_from_xml_path(&path)
    }
}

/// Write a template config file, creating the parent directory (0700 on Unix).
/// The file goes through the atomic writer and ends up 0600 on Unix.
pub fn create_template_config(path: &Path) -> Result<()> {
    if path_has_symlink_ancestor(path)? {
        bail!(
            "Refusing to create config: ancestor of {} is a symlink",
            path.display()
        );
    }
    if path.exists() {
        bail!("Config already exists: {}", path.display());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
        let _ = set_dir_mode_0700(parent);
    }

    let content = format!(
        "<!--\n  fs_util configuration (XML)\n\n  uid / gid    -> default owner for written files and created dirs (both needed)\n  log_level    -> quiet | normal | info | debug\n  log_file     -> path to log file (optional; stderr still used)\n  read_block   -> checksum read block in bytes\n  io_limit     -> checksum throughput cap in bytes/sec (negative = unlimited, 0 is invalid)\n\n  CLI flags override XML values.\n-->\n<config>\n  <uid></uid>\n  <gid></gid>\n  <log_level>normal</log_level>\n  <log_file></log_file>\n  <read_block>{}</read_block>\n  <io_limit>{}</io_limit>\n</config>\n",
        DEFAULT_READ_BLOCK, DEFAULT_IO_LIMIT
    );

    write_file(
        path,
        content,
        &WriteOptions::default().atomic(true),
        &Ownership::default(),
    )?;
    let _ = set_file_mode_0600(path);

    info!("Created template config at {}", path.display());
    Ok(())
}
