//! Unix (non-macOS) partition table, read from the kernel's mount table.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::fs_ops::Partition;

const MOUNTS: &str = "/proc/self/mounts";
const MTAB: &str = "/etc/mtab";
const FILESYSTEMS: &str = "/proc/filesystems";

/// Mounted partitions in mount-table order.
///
/// With `all == false` only filesystems backed by a device are kept (types
/// not flagged `nodev` in /proc/filesystems), so tmpfs, proc, sysfs etc. drop out.
pub fn disk_partitions(all: bool) -> io::Result<Vec<Partition>> {
    let table = match fs::read_to_string(MOUNTS) {
        Ok(t) => t,
        Err(_) => fs::read_to_string(MTAB)?,
    };
    let physical = if all { None } else { Some(physical_fstypes()?) };

    let parts = parse_mount_table(&table)
        .into_iter()
        .filter(|p| match &physical {
            None => true,
            Some(types) => !p.device.is_empty() && types.iter().any(|t| *t == p.fstype),
        })
        .collect();
    Ok(parts)
}

fn physical_fstypes() -> io::Result<Vec<String>> {
    let content = fs::read_to_string(FILESYSTEMS)?;
    Ok(parse_filesystems(&content))
}

fn parse_filesystems(content: &str) -> Vec<String> {
    let mut types: Vec<String> = content
        .lines()
        .filter(|l| !l.starts_with("nodev"))
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    // zfs is flagged nodev but is disk-backed
    if content.lines().any(|l| l.trim_start_matches("nodev").trim() == "zfs") {
        types.push("zfs".to_string());
    }
    types
}

fn parse_mount_table(content: &str) -> Vec<Partition> {
    content
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let device = unescape(fields.next()?);
            let mountpoint = unescape(fields.next()?);
            let fstype = unescape(fields.next()?);
            let opts = fields.next().map(unescape).unwrap_or_default();
            Some(Partition {
                device,
                mountpoint: PathBuf::from(mountpoint),
                fstype,
                opts,
            })
        })
        .collect()
}

/// Decode the `\ooo` octal escapes the kernel uses for space, tab, newline and backslash.
fn unescape(field: &str) -> String {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 4 <= bytes.len() {
            let digits = &bytes[i + 1..i + 4];
            if digits.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let v = digits.iter().fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                if let Ok(b) = u8::try_from(v) {
                    out.push(b);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
