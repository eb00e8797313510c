//! File ownership (uid/gid) resolution and application.

use std::path::Path;
use tracing::debug;

use crate::errors::{Result, io_err};

/// Owner ids for a file or directory. Ownership is only applied when both
/// ids are known; a lone uid or gid is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ownership {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

impl Ownership {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self {
            uid: Some(uid),
            gid: Some(gid),
        }
    }

    /// Fill unset ids from `defaults`, field by field.
    pub fn or(self, defaults: &Ownership) -> Ownership {
        Ownership {
            uid: self.uid.or(defaults.uid),
            gid: self.gid.or(defaults.gid),
        }
    }

    /// Both ids, when both are set.
    pub fn pair(&self) -> Option<(u32, u32)> {
        self.uid.zip(self.gid)
    }
}

/// chown `path` when `owner` carries both ids; no-op otherwise.
pub(crate) fn apply(path: &Path, owner: &Ownership) -> Result<()> {
    let Some((uid, gid)) = owner.pair() else {
        return Ok(());
    };
    chown(path, uid, gid).map_err(io_err("chown", path))?;
    debug!(path = %path.display(), uid, gid, "Applied ownership");
    Ok(())
}

#[cfg(unix)]
fn chown(path: &Path, uid: u32, gid: u32) -> std::io::Result<()> {
    std::os::unix::fs::chown(path, Some(uid), Some(gid))
}

#[cfg(not(unix))]
fn chown(_path: &Path, _uid: u32, _gid: u32) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "uid/gid ownership is not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_ids_win_field_by_field() {
        let defaults = Ownership::new(2, 3);
        let explicit = Ownership {
            uid: Some(0),
            gid: None,
        };
        assert_eq!(explicit.or(&defaults), Ownership::new(0, 3));
        assert_eq!(Ownership::default().or(&defaults), defaults);
    }

    #[test]
    fn pair_needs_both() {
        assert_eq!(Ownership::new(1, 1).pair(), Some((1, 1)));
        let half = Ownership {
            uid: Some(1),
            gid: None,
        };
        assert_eq!(half.pair(), None);
    }

    #[test]
    fn apply_without_ids_touches_nothing() {
        // Path doesn't exist; a no-op must not try to stat it.
        apply(Path::new("/definitely/not/here"), &Ownership::default()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn apply_to_current_owner_succeeds() {
        use std::os::unix::fs::MetadataExt;
        let td = tempfile::tempdir().unwrap();
        let p = td.path().join("f");
        std::fs::write(&p, b"x").unwrap();
        let m = std::fs::metadata(&p).unwrap();
        apply(&p, &Ownership::new(m.uid(), m.gid())).unwrap();
    }
}
