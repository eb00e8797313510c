//! macOS partition table via getmntinfo(3).

use std::ffi::CStr;
use std::io;
use std::os::raw::c_char;
use std::path::PathBuf;

use crate::fs_ops::Partition;

const MNT_NOWAIT: libc::c_int = 2;
const MNT_RDONLY: u32 = 0x0000_0001;
const MNT_LOCAL: u32 = 0x0000_1000;

fn c_field(buf: &[c_char]) -> String {
    // SAFETY: the kernel NUL-terminates these fixed-size name buffers.
    unsafe { CStr::from_ptr(buf.as_ptr()) }.to_string_lossy().into_owned()
}

/// Mounted partitions as reported by getmntinfo. With `all == false` only
/// `MNT_LOCAL` filesystems are kept.
pub fn disk_partitions(all: bool) -> io::Result<Vec<Partition>> {
    let mut buf: *mut libc::statfs = std::ptr::null_mut();
    let n = unsafe { libc::getmntinfo(&mut buf, MNT_NOWAIT) };
    if n <= 0 || buf.is_null() {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: getmntinfo returns `n` entries in a buffer it owns; we copy out of it.
    let entries = unsafe { std::slice::from_raw_parts(buf, n as usize) };

    let parts = entries
        .iter()
        .filter(|st| all || st.f_flags & MNT_LOCAL != 0)
        .map(|st| {
            let mut opts = vec![if st.f_flags & MNT_RDONLY != 0 { "ro" } else { "rw" }];
            if st.f_flags & MNT_LOCAL != 0 {
                opts.push("local");
            }
            Partition {
                device: c_field(&st.f_mntfromname),
                mountpoint: PathBuf::from(c_field(&st.f_mntonname)),
                fstype: c_field(&st.f_fstypename),
                opts: opts.join(","),
            }
        })
        .collect();
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_listed() {
        let parts = disk_partitions(true).unwrap();
        assert!(parts.iter().any(|p| p.mountpoint == PathBuf::from("/")));
    }
}
