//! Building and locating the benchmark binary.
//!
//! The sweep measures a separately compiled release executable, so the
//! driver triggers the release build up front. A failed build aborts the
//! whole run before any invocation is issued.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use crate::runner::SweepError;

/// Package and binary names of the benchmark this crate drives.
pub const BENCH_PACKAGE: &str = "mapbench_core";
pub const BENCH_BINARY: &str = "mapbench";

/// Compiles the benchmark binary in release mode.
///
/// Cargo's own output streams through to the terminal.
pub fn build_release() -> Result<(), SweepError> {
    let status = cargo(&["build", "--release", "-p", BENCH_PACKAGE, "--bin", BENCH_BINARY])?;
    if status.success() {
        Ok(())
    } else {
        Err(SweepError::BuildFailed(status))
    }
}

fn cargo(args: &[&str]) -> Result<ExitStatus, SweepError> {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .map_err(SweepError::Cargo)
}

/// Path of the release benchmark binary under `target_root`.
pub fn release_binary_path(target_root: impl AsRef<Path>) -> PathBuf {
    target_root
        .as_ref()
        .join("target")
        .join("release")
        .join(binary_name(BENCH_BINARY))
}

fn binary_name(bin: &str) -> String {
    if cfg!(windows) {
        format!("{bin}.exe")
    } else {
        bin.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_path_points_into_the_target_directory() {
        let path = release_binary_path(".");
        assert!(path.starts_with("./target/release"));
        assert!(path
            .file_name()
            .and_then(|name| name.to_str())
            .expect("binary name is valid unicode")
            .starts_with(BENCH_BINARY));
    }
}
