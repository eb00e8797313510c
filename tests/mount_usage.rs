use std::path::{Path, PathBuf};
use tempfile::tempdir;

use fs_util::{
    FsUtilError, assert_mountpoint, get_all_mountpoint, get_disk_partitions, get_mountpoint, get_path_inode_usage,
    get_path_usage, is_mountpoint,
};

#[test]
fn root_is_a_mount_point() {
    let root = if cfg!(windows) { PathBuf::from("C:\\") } else { PathBuf::from("/") };
    assert!(is_mountpoint(&root));
    assert_mountpoint(&root).unwrap();
}

#[test]
fn fresh_subdir_is_not_a_mount_point() {
    let td = tempdir().unwrap();
    let sub = td.path().join("plain");
    std::fs::create_dir(&sub).unwrap();
    assert!(!is_mountpoint(&sub));
    assert!(matches!(assert_mountpoint(&sub), Err(FsUtilError::NotMountPoint(_))));
    assert!(!is_mountpoint(&td.path().join("nope")));
}

#[cfg(unix)]
#[test]
fn symlink_is_never_a_mount_point() {
    let td = tempdir().unwrap();
    let link = td.path().join("root_link");
    std::os::unix::fs::symlink("/", &link).unwrap();
    assert!(!is_mountpoint(&link));
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn partition_table_is_consistent() {
    let all = get_disk_partitions(true).unwrap();
    assert!(all.contains_key(Path::new("/")));
    for (mp, p) in &all {
        assert_eq!(mp, &p.mountpoint);
    }

    let physical = get_disk_partitions(false).unwrap();
    assert!(physical.len() <= all.len());
    assert!(physical.keys().all(|k| all.contains_key(k)));

    let points = get_all_mountpoint(true).unwrap();
    assert!(points.iter().all(|p| all.contains_key(p)));
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
#[test]
fn mountpoint_of_tempdir_is_a_known_mount() {
    let td = tempdir().unwrap();
    let deep = td.path().join("x").join("y");
    std::fs::create_dir_all(&deep).unwrap();

    let mp = get_mountpoint(&deep).unwrap();
    let real = dunce::canonicalize(&deep).unwrap();
    assert!(real.starts_with(&mp));
    assert!(get_disk_partitions(true).unwrap().contains_key(&mp));
}

#[test]
fn usage_numbers_add_up() {
    let td = tempdir().unwrap();
    let u = get_path_usage(td.path()).unwrap();
    assert!(u.total >= u.available);
    assert_eq!(u.used, u.total - u.available);
    assert!((0.0..=1.0).contains(&u.percent));
}

#[cfg(unix)]
#[test]
fn inode_usage_available() {
    let td = tempdir().unwrap();
    let u = get_path_inode_usage(td.path()).unwrap();
    assert!(u.total >= u.available);
}

#[cfg(windows)]
#[test]
fn inode_usage_unsupported_on_windows() {
    let td = tempdir().unwrap();
    let err = get_path_inode_usage(td.path()).unwrap_err();
    assert_eq!(err.kind(), Some(std::io::ErrorKind::Unsupported));
}
