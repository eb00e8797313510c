//! Config validation logic.
//! Rejects settings the checksum scanner would refuse at call time anyway.

use anyhow::{Result, bail};
use tracing::debug;

use super::types::Config;
use crate::fs_ops::IoLimit;

impl Config {
    /// Validate numeric settings.
    pub fn validate(&self) -> Result<()> {
        if self.read_block == 0 {
            bail!("read_block must be a positive number of bytes");
        }
        if self.io_limit == IoLimit::BytesPerSec(0) {
            bail!("io_limit must not be zero; use a negative value to disable throttling");
        }
        if self.default_uid.is_some() != self.default_gid.is_some() {
            debug!(
                uid = ?self.default_uid,
                gid = ?self.default_gid,
                "Only one of uid/gid configured; ownership will not be applied by default"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn zero_read_block_rejected() {
        let cfg = Config {
            read_block: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn unlimited_io_is_valid() {
        let cfg = Config {
            io_limit: IoLimit::Unlimited,
            ..Default::default()
        };
        cfg.validate().unwrap();
    }
}
