//! Recursive removal with a per-failure error policy.
//!
//! Each path goes through up to four filesystem calls (`RemoveOp`). A failure at
//! any of them is handed to the `OnError` policy on its own; only `Raise` (or a
//! handler returning `Err`) stops the walk. Children are removed before their
//! directory, using an explicit stack so deep trees don't grow the call stack.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::errors::{FsUtilError, Result};

/// The filesystem call that failed during a removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoveOp {
    /// Classifying the path as directory or not (`lstat`).
    IsDir,
    /// Unlinking a file or symlink.
    RemoveFile,
    /// Reading a directory's entries.
    ListDir,
    /// Removing a (by now) empty directory.
    RemoveDir,
}

impl RemoveOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            RemoveOp::IsDir => "is_dir",
            RemoveOp::RemoveFile => "remove_file",
            RemoveOp::ListDir => "list_dir",
            RemoveOp::RemoveDir => "remove_dir",
        }
    }
}

impl fmt::Display for RemoveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback for `OnError::Handler`. Returning `Err` aborts the removal.
pub type ErrorHandler<'a> = dyn FnMut(RemoveOp, &Path, &io::Error) -> Result<()> + 'a;

/// What to do when one step of a removal fails.
#[derive(Default)]
pub enum OnError<'a> {
    /// Return the error immediately; nothing after it is visited.
    #[default]
    Raise,
    /// Swallow the error and carry on.
    Ignore,
    /// Hand the failure to a callback and carry on unless it returns `Err`.
    Handler(&'a mut ErrorHandler<'a>),
}

impl fmt::Debug for OnError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnError::Raise => f.write_str("Raise"),
            OnError::Ignore => f.write_str("Ignore"),
            OnError::Handler(_) => f.write_str("Handler(..)"),
        }
    }
}

impl OnError<'_> {
    fn apply(&mut self, op: RemoveOp, path: &Path, err: io::Error) -> Result<()> {
        match self {
            OnError::Raise => Err(FsUtilError::io(op.as_str(), path, err)),
            OnError::Ignore => {
                warn!(op = %op, path = %path.display(), error = %err, "Ignoring removal error");
                Ok(())
            }
            OnError::Handler(h) => h(op, path, &err),
        }
    }
}

enum Step {
    Visit(PathBuf),
    /// All children were visited; remove the directory itself.
    Finish(PathBuf),
}

/// Delete whatever exists at `path`: nothing, a file, a symlink (not followed)
/// or a whole directory tree.
pub fn remove(path: &Path, mut on_error: OnError<'_>) -> Result<()> {
    let mut stack = vec![Step::Visit(path.to_path_buf())];

    while let Some(step) = stack.pop() {
        match step {
            Step::Visit(p) => visit(p, &mut stack, &mut on_error)?,
            Step::Finish(dir) => match fs::remove_dir(&dir) {
                Ok(()) => debug!(path = %dir.display(), "Removed directory"),
                Err(e) => on_error.apply(RemoveOp::RemoveDir, &dir, e)?,
            },
        }
    }

    info!(path = %path.display(), "Removal finished");
    Ok(())
}

fn visit(p: PathBuf, stack: &mut Vec<Step>, on_error: &mut OnError<'_>) -> Result<()> {
    let is_dir = match fs::symlink_metadata(&p) {
        Ok(meta) => meta.file_type().is_dir(),
        // A missing path is "not a directory"; the unlink below reports it.
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return on_error.apply(RemoveOp::IsDir, &p, e),
    };

    if !is_dir {
        return match fs::remove_file(&p) {
            Ok(()) => {
                debug!(path = %p.display(), "Removed file");
                Ok(())
            }
            Err(e) => on_error.apply(RemoveOp::RemoveFile, &p, e),
        };
    }

    let mut children = Vec::new();
    match fs::read_dir(&p) {
        Ok(entries) => {
            for entry in entries {
                match entry {
                    Ok(entry) => children.push(entry.path()),
                    Err(e) => on_error.apply(RemoveOp::ListDir, &p, e)?,
                }
            }
        }
        Err(e) => on_error.apply(RemoveOp::ListDir, &p, e)?,
    }

    // Finish goes underneath the children so it pops after all of them.
    stack.push(Step::Finish(p));
    stack.extend(children.into_iter().rev().map(Step::Visit));
    Ok(())
}
