//! Application orchestrator.
//! Loads/merges config, initializes logging, and dispatches the subcommand to the library.

use anyhow::{Context, Result, bail};
use clap::CommandFactory;
use serde::Serialize;
use std::io::{self, Read, Write};
use std::path::Path;
use tracing::{debug, error, info, warn};

use fs_util::cli::{Args, Command};
use fs_util::output as out;
use fs_util::{
    Algorithm, CONFIG_ENV, ChecksumRequest, Config, DirOptions, FsUtilError, IoLimit, OnError, RemoveOp,
    WriteOptions, assert_mountpoint, calc_checksums, create_template_config, default_config_path, get_device,
    get_disk_partitions, get_mountpoint, get_path_fs, get_path_inode_usage, get_path_usage, ls_dirs, ls_files,
    make_dirs, read_bytes, remove, write_file,
};

use crate::logging::init_tracing;

#[derive(Serialize)]
struct MountInfo<'a> {
    path: &'a Path,
    mountpoint: std::path::PathBuf,
    device: String,
    fstype: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value).context("serialize result")?;
    out::print_user(&s);
    Ok(())
}

fn print_config_location() {
    if let Some(cfg_env) = std::env::var_os(CONFIG_ENV) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}\n",
            Path::new(&cfg_env).display()
        ));
        out::print_info(&format!("To override, unset {CONFIG_ENV} or set it to another file."));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default fs_util config path:\n  {}\n", p.display()));
            if p.exists() {
                out::print_info("A config file already exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run `fs_util init-config` to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(());
    }

    let Some(command) = args.command.clone() else {
        Args::command().print_help()?;
        return Ok(());
    };

    // init-config must work even when the current config is broken
    if let Command::InitConfig { path } = &command {
        let path = match path.clone().or_else(default_config_path) {
            Some(p) => p,
            None => bail!("Could not determine a default config path; pass one explicitly"),
        };
        create_template_config(&path)?;
        out::print_success(&format!("A template fs_util config was written to: {}", path.display()));
        out::print_info(&format!("To use a different location set {CONFIG_ENV}."));
        return Ok(());
    }

    let mut cfg = Config::load().map_err(|e| {
        out::print_error(&format!("Failed to load config: {e:#}"));
        e
    })?;
    args.apply_overrides(&mut cfg);

    // Hold the guard until the command finishes so the file writer is flushed.
    let guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;

    debug!("Starting fs_util: {:?}", args);

    let result = dispatch(&cfg, command);
    if let Err(e) = &result {
        log_failure(e);
    }

    drop(guard);
    result
}

fn log_failure(e: &anyhow::Error) {
    let Some(fe) = e.downcast_ref::<FsUtilError>() else {
        error!(error = ?e, "Command failed");
        return;
    };
    match fe {
        FsUtilError::InvalidArgument(msg) => {
            error!(kind = "invalid_argument", %msg, "Command failed")
        }
        FsUtilError::InvalidPattern(re) => {
            error!(kind = "invalid_pattern", error = %re, "Command failed")
        }
        FsUtilError::NotMountPoint(path) => {
            error!(kind = "not_mount_point", path = %path.display(), "Command failed")
        }
        FsUtilError::Io { op, path, source } => {
            error!(
                kind = "io",
                op = *op,
                path = %path.display(),
                os_error = ?source.raw_os_error(),
                error = %source,
                "Command failed"
            )
        }
    }
}

fn dispatch(cfg: &Config, command: Command) -> Result<()> {
    let defaults = cfg.default_owner();
    match command {
        Command::Mkdir { path, mode, owner } => {
            let opts = DirOptions::default().mode(mode).owner(owner.ownership());
            make_dirs(&path, &opts, &defaults)?;
            info!(path = %path.display(), "Directory ready");
        }
        Command::LsDirs { path } => {
            for name in ls_dirs(&path)? {
                out::print_user(&name);
            }
        }
        Command::LsFiles { path, pattern } => {
            for name in ls_files(&path, &pattern)? {
                out::print_user(&name);
            }
        }
        Command::Read { path } => {
            let bytes = read_bytes(&path)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes).context("write to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
        Command::Write {
            path,
            content,
            atomic,
            no_fsync,
            owner,
        } => {
            let bytes = match content {
                Some(s) => s.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    io::stdin().read_to_end(&mut buf).context("read content from stdin")?;
                    buf
                }
            };
            let opts = WriteOptions::default()
                .atomic(atomic)
                .fsync(!no_fsync)
                .owner(owner.ownership());
            write_file(&path, &bytes, &opts, &defaults)?;
        }
        Command::Rm { path, ignore_errors } => {
            if ignore_errors {
                let mut failures = 0usize;
                let mut note = |op: RemoveOp, p: &Path, e: &io::Error| -> fs_util::Result<()> {
                    warn!(op = %op, path = %p.display(), error = %e, "Removal step failed; continuing");
                    failures += 1;
                    Ok(())
                };
                remove(&path, OnError::Handler(&mut note))?;
                if failures > 0 {
                    out::print_warn(&format!(
                        "{failures} removal step(s) failed under '{}'; see log for details",
                        path.display()
                    ));
                }
            } else {
                remove(&path, OnError::Raise)?;
            }
        }
        Command::Checksum {
            path,
            algorithms,
            block_size,
            io_limit,
            unlimited,
        } => {
            let algorithms = if algorithms.is_empty() {
                Algorithm::ALL.to_vec()
            } else {
                algorithms
            };
            let mut req = ChecksumRequest::from_config(cfg, algorithms);
            if let Some(bs) = block_size {
                req = req.block_size(bs);
            }
            if unlimited {
                req = req.io_limit(IoLimit::Unlimited);
            } else if let Some(limit) = io_limit {
                req = req.io_limit(IoLimit::BytesPerSec(limit));
            }
            print_json(&calc_checksums(&path, &req)?)?;
        }
        Command::Mountpoint { path, check } => {
            if check {
                assert_mountpoint(&path)?;
            }
            let info = MountInfo {
                path: &path,
                mountpoint: get_mountpoint(&path)?,
                device: get_device(&path)?,
                fstype: get_path_fs(&path)?,
            };
            print_json(&info)?;
        }
        Command::Mounts { all } => {
            let parts: Vec<_> = get_disk_partitions(all)?.into_values().collect();
            print_json(&parts)?;
        }
        Command::Usage { path, inodes } => {
            let usage = if inodes {
                get_path_inode_usage(&path)?
            } else {
                get_path_usage(&path)?
            };
            print_json(&usage)?;
        }
        // handled before config load
        Command::InitConfig { .. } => {}
    }
    Ok(())
}
