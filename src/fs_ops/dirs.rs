//! Directory creation and listing.

use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use super::ownership::{self, Ownership};
use crate::errors::{FsUtilError, Result, io_err};

/// Options for `make_dirs`. Default mode is 0o755 (before umask).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirOptions {
    pub mode: u32,
    pub owner: Ownership,
}

impl Default for DirOptions {
    fn default() -> Self {
        Self {
            mode: 0o755,
            owner: Ownership::default(),
        }
    }
}

impl DirOptions {
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    pub fn owner(mut self, owner: Ownership) -> Self {
        self.owner = owner;
        self
    }
}

/// Create `path` and any missing parents.
///
/// An existing directory is fine; its ownership is (re)applied. If someone else
/// creates the path between our check and our create, the check is repeated
/// once before the conflict is reported. A non-directory at `path` fails with
/// `AlreadyExists`.
pub fn make_dirs(path: &Path, opts: &DirOptions, defaults: &Ownership) -> Result<()> {
    let owner = opts.owner.or(defaults);
    let mut last_err = None;

    for _ in 0..2 {
        if path.is_dir() {
            return ownership::apply(path, &owner);
        }

        match create_dir_all(path, opts.mode) {
            Ok(()) => {
                debug!(path = %path.display(), mode = format!("{:o}", opts.mode), "Created directory");
                return ownership::apply(path, &owner);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "Directory creation raced; re-checking");
                last_err = Some(e);
            }
            Err(e) => return Err(FsUtilError::io("create dir", path, e)),
        }
    }

    let e = last_err.unwrap_or_else(|| io::Error::from(io::ErrorKind::AlreadyExists));
    Err(FsUtilError::io("create dir", path, e))
}

#[cfg(unix)]
fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn create_dir_all(path: &Path, _mode: u32) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(path)
}

/// Entries of `path` kept by `keep`, which sees the real entry path; only
/// the returned names are converted lossily.
fn entry_names(path: &Path, mut keep: impl FnMut(&Path, &str) -> bool) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err("list dir", path))? {
        let entry = entry.map_err(io_err("list dir", path))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if keep(&entry.path(), &name) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Sorted names of the sub-directories of `path` (symlinks to dirs included).
pub fn ls_dirs(path: &Path) -> Result<Vec<String>> {
    entry_names(path, |p, _| p.is_dir())
}

/// Sorted names of the regular files in `path` whose name contains a match
/// for `pattern` (unanchored search; use `^`/`$` to anchor).
pub fn ls_files(path: &Path, pattern: &str) -> Result<Vec<String>> {
    let re = Regex::new(pattern)?;
    entry_names(path, |p, name| re.is_match(name) && p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn creates_nested_dirs() {
        let dir = assert_fs::TempDir::new().unwrap();
        let p = dir.path().join("a").join("b").join("c");
        make_dirs(&p, &DirOptions::default(), &Ownership::default()).unwrap();
        assert!(p.is_dir());
    }

    #[test]
    fn second_call_is_idempotent() {
        let dir = assert_fs::TempDir::new().unwrap();
        let p = dir.path().join("twice");
        make_dirs(&p, &DirOptions::default(), &Ownership::default()).unwrap();
        make_dirs(&p, &DirOptions::default(), &Ownership::default()).unwrap();
        assert!(p.is_dir());
    }

    #[test]
    fn file_in_the_way_fails() {
        let dir = assert_fs::TempDir::new().unwrap();
        let f = dir.child("file");
        f.write_str("a").unwrap();
        let err = make_dirs(f.path(), &DirOptions::default(), &Ownership::default()).unwrap_err();
        assert_eq!(err.kind(), Some(io::ErrorKind::AlreadyExists));
        assert!(f.path().is_file());
    }

    #[cfg(unix)]
    #[test]
    fn mode_is_applied() {
        use std::os::unix::fs::PermissionsExt;
        let dir = assert_fs::TempDir::new().unwrap();
        let p = dir.path().join("private");
        make_dirs(&p, &DirOptions::default().mode(0o700), &Ownership::default()).unwrap();
        let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn ls_files_filters_by_pattern_and_kind() {
        let dir = assert_fs::TempDir::new().unwrap();
        for n in ["foo1", "foo2", "foo21"] {
            dir.child(n).write_str(n).unwrap();
        }
        dir.child("foo_dir/foo").write_str("foo").unwrap();
        dir.child("foo_dir/bar").write_str("bar").unwrap();

        assert_eq!(ls_files(dir.path(), ".*").unwrap(), ["foo1", "foo2", "foo21"]);
        assert_eq!(ls_files(dir.path(), "2$").unwrap(), ["foo2"]);
        assert_eq!(ls_files(&dir.path().join("foo_dir"), "^b").unwrap(), ["bar"]);
    }

    #[test]
    fn ls_files_rejects_bad_pattern() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = ls_files(dir.path(), "(unclosed").unwrap_err();
        assert!(matches!(err, FsUtilError::InvalidPattern(_)));
    }

    #[test]
    fn ls_dirs_sorted_and_dirs_only() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("sub_dir2").create_dir_all().unwrap();
        dir.child("sub_dir1/foo").create_dir_all().unwrap();
        dir.child("test_file").write_str("foo").unwrap();

        assert_eq!(ls_dirs(dir.path()).unwrap(), ["sub_dir1", "sub_dir2"]);
        assert_eq!(ls_dirs(&dir.path().join("sub_dir1")).unwrap(), ["foo"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_listed_not_dropped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let dir = assert_fs::TempDir::new().unwrap();
        fs::create_dir(dir.path().join(OsStr::from_bytes(b"dir_\xff"))).unwrap();
        fs::create_dir(dir.path().join("ok_dir")).unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"file_\xfe")), "x").unwrap();

        assert_eq!(ls_dirs(dir.path()).unwrap(), ["dir_\u{fffd}", "ok_dir"]);
        assert_eq!(ls_files(dir.path(), ".*").unwrap(), ["file_\u{fffd}"]);
    }

    #[test]
    fn listing_missing_dir_is_not_found() {
        let dir = assert_fs::TempDir::new().unwrap();
        let err = ls_dirs(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.kind(), Some(io::ErrorKind::NotFound));
    }
}
