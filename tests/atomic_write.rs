use assert_fs::TempDir;
use assert_fs::prelude::*;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use fs_util::{Ownership, WriteOptions, read_bytes, read_text, write_file};

fn leftovers(dir: &std::path::Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.contains("._tmp_."))
        .collect()
}

#[test]
fn atomic_then_read_returns_content() {
    let td = TempDir::new().unwrap();
    let target = td.child("data.bin");
    let payload: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();

    write_file(target.path(), &payload, &WriteOptions::default().atomic(true), &Ownership::default()).unwrap();

    assert_eq!(read_bytes(target.path()).unwrap(), payload);
    assert!(leftovers(td.path()).is_empty());
}

#[test]
fn in_place_overwrite_truncates() {
    let td = TempDir::new().unwrap();
    let target = td.child("a.txt");
    target.write_str("a much longer original body").unwrap();

    write_file(target.path(), "short", &WriteOptions::default(), &Ownership::default()).unwrap();
    target.assert("short");
}

#[test]
fn empty_content_creates_empty_file() {
    let td = TempDir::new().unwrap();
    let target = td.child("empty");
    write_file(target.path(), b"", &WriteOptions::default().atomic(true), &Ownership::default()).unwrap();
    assert_eq!(read_text(target.path()).unwrap(), "");
}

#[test]
fn missing_parent_fails_without_creating_anything() {
    let td = TempDir::new().unwrap();
    let target = td.child("nope").child("x.txt");
    let err = write_file(target.path(), "x", &WriteOptions::default().atomic(true), &Ownership::default())
        .unwrap_err();
    assert_eq!(err.kind(), Some(std::io::ErrorKind::NotFound));
    assert!(!td.child("nope").path().exists());
}

#[test]
fn readers_never_see_torn_content() {
    let td = TempDir::new().unwrap();
    let target = td.child("shared.txt").path().to_path_buf();
    let a = vec![b'a'; 64 * 1024];
    let b = vec![b'b'; 64 * 1024];
    let opts = WriteOptions::default().atomic(true).fsync(false);
    write_file(&target, &a, &opts, &Ownership::default()).unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let writers: Vec<_> = [a.clone(), b.clone()]
        .into_iter()
        .map(|body| {
            let target = target.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    write_file(&target, &body, &opts, &Ownership::default()).unwrap();
                }
            })
        })
        .collect();

    let reader = {
        let target = target.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut reads = 0;
            while !stop.load(Ordering::Relaxed) {
                let got = fs::read(&target).unwrap();
                assert!(got == a || got == b, "observed torn content of len {}", got.len());
                reads += 1;
            }
            reads
        })
    };

    for w in writers {
        w.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    assert!(reader.join().unwrap() > 0);
    assert!(leftovers(td.path()).is_empty());
}

#[cfg(unix)]
#[test]
fn explicit_current_owner_is_applied() {
    use std::os::unix::fs::MetadataExt;
    let td = TempDir::new().unwrap();
    let target = td.child("owned.txt");
    let meta = fs::metadata(td.path()).unwrap();
    let me = Ownership::new(meta.uid(), meta.gid());

    write_file(target.path(), "x", &WriteOptions::default().atomic(true).owner(me), &Ownership::default())
        .unwrap();
    let got = fs::metadata(target.path()).unwrap();
    assert_eq!((got.uid(), got.gid()), (meta.uid(), meta.gid()));
}
