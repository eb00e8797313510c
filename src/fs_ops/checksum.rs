//! Streaming multi-algorithm checksums with read throttling.
//!
//! The file is read once in `block_size` chunks; every chunk is fed to each
//! requested accumulator, so all digests cover the same bytes. With a
//! `BytesPerSec` limit each block takes at least `block_size / limit` seconds:
//! whatever the read itself didn't use is slept away.

use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{Config, DEFAULT_IO_LIMIT, DEFAULT_READ_BLOCK};
use crate::errors::{FsUtilError, Result, io_err};

/// Supported checksum algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    Sha1,
    Md5,
    Crc32,
    Sha256,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Sha1, Algorithm::Md5, Algorithm::Crc32, Algorithm::Sha256];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Md5 => "md5",
            Algorithm::Crc32 => "crc32",
            Algorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Algorithm::Sha1),
            "md5" => Ok(Algorithm::Md5),
            "crc32" => Ok(Algorithm::Crc32),
            "sha256" => Ok(Algorithm::Sha256),
            _ => Err(format!("unknown checksum algorithm: '{s}'")),
        }
    }
}

/// Read throughput cap for a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoLimit {
    /// Never sleep.
    Unlimited,
    /// Bytes per second; zero is rejected.
    BytesPerSec(u64),
}

impl IoLimit {
    /// Minimum wall time one block of `block_size` bytes may take.
    ///
    /// A zero rate, or a block that would take longer than `Duration` can
    /// hold, is `InvalidArgument`.
    fn min_block_time(&self, block_size: usize) -> Result<Duration> {
        match self {
            IoLimit::Unlimited => Ok(Duration::ZERO),
            IoLimit::BytesPerSec(0) => Err(FsUtilError::InvalidArgument("io_limit should not be zero".into())),
            IoLimit::BytesPerSec(n) => Duration::try_from_secs_f64(block_size as f64 / *n as f64).map_err(|_| {
                FsUtilError::InvalidArgument(format!("io_limit {n} B/s is too low for block_size {block_size}"))
            }),
        }
    }
}

/// One checksum scan: which digests, how big each read is, how fast to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRequest {
    pub algorithms: BTreeSet<Algorithm>,
    pub block_size: usize,
    pub io_limit: IoLimit,
}

impl Default for ChecksumRequest {
    fn default() -> Self {
        Self {
            algorithms: BTreeSet::new(),
            block_size: DEFAULT_READ_BLOCK,
            io_limit: IoLimit::BytesPerSec(DEFAULT_IO_LIMIT),
        }
    }
}

impl ChecksumRequest {
    pub fn new(algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            algorithms: algorithms.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Request seeded with the configured block size and throughput cap.
    pub fn from_config(cfg: &Config, algorithms: impl IntoIterator<Item = Algorithm>) -> Self {
        Self {
            algorithms: algorithms.into_iter().collect(),
            block_size: cfg.read_block,
            io_limit: cfg.io_limit,
        }
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn io_limit(mut self, io_limit: IoLimit) -> Self {
        self.io_limit = io_limit;
        self
    }

    fn wants(&self, alg: Algorithm) -> bool {
        self.algorithms.contains(&alg)
    }
}

/// Lowercase hex digests; `None` for algorithms that weren't requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChecksumResult {
    pub sha1: Option<String>,
    pub md5: Option<String>,
    pub crc32: Option<String>,
    pub sha256: Option<String>,
}

impl ChecksumResult {
    pub fn get(&self, alg: Algorithm) -> Option<&str> {
        match alg {
            Algorithm::Sha1 => self.sha1.as_deref(),
            Algorithm::Md5 => self.md5.as_deref(),
            Algorithm::Crc32 => self.crc32.as_deref(),
            Algorithm::Sha256 => self.sha256.as_deref(),
        }
    }
}

#[derive(Default)]
struct Accumulators {
    sha1: Option<Sha1>,
    md5: Option<md5::Md5>,
    crc32: Option<crc32fast::Hasher>,
    sha256: Option<Sha256>,
}

impl Accumulators {
    fn for_request(req: &ChecksumRequest) -> Self {
        Self {
            sha1: req.wants(Algorithm::Sha1).then(Sha1::new),
            md5: req.wants(Algorithm::Md5).then(md5::Md5::new),
            // seeded at 0
            crc32: req.wants(Algorithm::Crc32).then(crc32fast::Hasher::new),
            sha256: req.wants(Algorithm::Sha256).then(Sha256::new),
        }
    }

    fn update(&mut self, buf: &[u8]) {
        if let Some(h) = self.sha1.as_mut() {
            h.update(buf);
        }
        if let Some(h) = self.md5.as_mut() {
            h.update(buf);
        }
        if let Some(h) = self.crc32.as_mut() {
            h.update(buf);
        }
        if let Some(h) = self.sha256.as_mut() {
            h.update(buf);
        }
    }

    fn finish(self) -> ChecksumResult {
        ChecksumResult {
            sha1: self.sha1.map(|h| hex::encode(h.finalize())),
            md5: self.md5.map(|h| hex::encode(h.finalize())),
            crc32: self.crc32.map(|h| format!("{:08x}", h.finalize())),
            sha256: self.sha256.map(|h| hex::encode(h.finalize())),
        }
    }
}

/// Compute the requested checksums of the file at `path` in one pass.
///
/// With no algorithm requested the result is all-`None` and the file is never
/// opened (nor are the other arguments checked). Otherwise `block_size == 0`
/// and `IoLimit::BytesPerSec(0)` are `InvalidArgument`, as is a limit so low
/// that one block would outlast `Duration`. Read errors are
/// returned as-is; nothing partial is returned.
pub fn calc_checksums(path: &Path, req: &ChecksumRequest) -> Result<ChecksumResult> {
    if req.algorithms.is_empty() {
        return Ok(ChecksumResult::default());
    }
    if req.block_size == 0 {
        return Err(FsUtilError::InvalidArgument("block_size must be positive".into()));
    }

    let min_block_time = req.io_limit.min_block_time(req.block_size)?;
    let mut acc = Accumulators::for_request(req);
    let mut f = File::open(path).map_err(io_err("open for checksum", path))?;
    // Grows with what is actually read, so a huge block_size on a small file stays small.
    let mut buf: Vec<u8> = Vec::new();
    let started = Instant::now();
    let mut total: u64 = 0;

    loop {
        let t0 = Instant::now();
        buf.clear();
        let n = (&mut f)
            .take(req.block_size as u64)
            .read_to_end(&mut buf)
            .map_err(io_err("read for checksum", path))?;
        if n == 0 {
            break;
        }
        let spent = t0.elapsed();
        if let Some(rest) = min_block_time.checked_sub(spent) {
            if !rest.is_zero() {
                thread::sleep(rest);
            }
        }

        acc.update(&buf[..n]);
        total += n as u64;
    }

    debug!(
        path = %path.display(),
        bytes = total,
        elapsed_ms = started.elapsed().as_millis() as u64,
        algorithms = ?req.algorithms,
        "Checksum scan finished"
    );
    Ok(acc.finish())
}
