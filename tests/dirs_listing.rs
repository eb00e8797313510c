use assert_fs::TempDir;
use assert_fs::prelude::*;

use fs_util::{DirOptions, FsUtilError, Ownership, ls_dirs, ls_files, make_dirs};

#[test]
fn make_dirs_is_idempotent() {
    let td = TempDir::new().unwrap();
    let p = td.child("a").child("b").child("c");
    for _ in 0..3 {
        make_dirs(p.path(), &DirOptions::default(), &Ownership::default()).unwrap();
    }
    assert!(p.path().is_dir());
}

#[test]
fn make_dirs_over_a_file_is_already_exists() {
    let td = TempDir::new().unwrap();
    let f = td.child("plain");
    f.write_str("x").unwrap();
    let err = make_dirs(f.path(), &DirOptions::default(), &Ownership::default()).unwrap_err();
    assert_eq!(err.kind(), Some(std::io::ErrorKind::AlreadyExists));
}

#[cfg(unix)]
#[test]
fn make_dirs_honours_mode() {
    use std::os::unix::fs::PermissionsExt;
    let td = TempDir::new().unwrap();
    let p = td.child("private");
    make_dirs(p.path(), &DirOptions::default().mode(0o700), &Ownership::default()).unwrap();
    let mode = std::fs::metadata(p.path()).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o700);
}

#[test]
fn concurrent_make_dirs_all_succeed() {
    let td = TempDir::new().unwrap();
    let p = td.child("x").child("y").child("z").path().to_path_buf();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let p = p.clone();
            std::thread::spawn(move || make_dirs(&p, &DirOptions::default(), &Ownership::default()))
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }
    assert!(p.is_dir());
}

#[test]
fn listing_splits_dirs_and_files() {
    let td = TempDir::new().unwrap();
    td.child("foo1").write_str("1").unwrap();
    td.child("foo2").write_str("2").unwrap();
    td.child("dir2").create_dir_all().unwrap();
    td.child("b_dir").create_dir_all().unwrap();
    td.child("a_dir").create_dir_all().unwrap();

    assert_eq!(ls_dirs(td.path()).unwrap(), vec!["a_dir", "b_dir", "dir2"]);
    assert_eq!(ls_files(td.path(), "2$").unwrap(), vec!["foo2"]);
    assert_eq!(ls_files(td.path(), "").unwrap(), vec!["foo1", "foo2"]);
    assert_eq!(ls_files(td.path(), "^oo").unwrap(), Vec::<String>::new());
}

#[test]
fn bad_pattern_and_missing_dir() {
    let td = TempDir::new().unwrap();
    assert!(matches!(ls_files(td.path(), "("), Err(FsUtilError::InvalidPattern(_))));

    let err = ls_dirs(td.child("missing").path()).unwrap_err();
    assert_eq!(err.kind(), Some(std::io::ErrorKind::NotFound));
}
