//! Sequential sweep execution.
//!
//! Runs every invocation of a matrix one child process at a time, in matrix
//! order, streaming raw output to stdout and appending it to an optional
//! results log. The deadline fallback never stops the sweep: a timed-out or
//! failed invocation contributes its sentinel line and the loop moves on to
//! the next cell.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use crate::binary::release_binary_path;
use crate::invoke::{run_invocation, InvocationRecord};
use crate::matrix::{SweepMatrix, DEFAULT_TIMEOUT_SECS};

/// Failures that abort a sweep before or outside the invocation loop.
///
/// Failures of individual invocations are not represented here; those are
/// masked into the sentinel and the sweep continues.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("failed to run cargo: {0}")]
    Cargo(#[source] std::io::Error),

    #[error("release build of the benchmark binary failed ({0})")]
    BuildFailed(ExitStatus),

    #[error("failed to write results log {path}: {source}")]
    ResultsLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Settings for one sweep run.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Benchmark binary to invoke.
    pub binary: PathBuf,
    /// Per-invocation wall-clock deadline.
    pub timeout: Duration,
    /// Echo child output to stdout as it arrives.
    pub echo_output: bool,
    /// Show a progress bar over the invocation sequence.
    pub show_progress: bool,
    /// Write the raw output of every invocation to this file.
    pub results_log: Option<PathBuf>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            binary: release_binary_path("."),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            echo_output: true,
            show_progress: true,
            results_log: None,
        }
    }
}

/// Runs `matrix` to completion and returns one record per invocation.
///
/// Exactly one child process exists at a time; records come back in matrix
/// order. Only results-log IO can fail here.
pub fn run_sweep(
    config: &SweepConfig,
    matrix: &SweepMatrix,
) -> Result<Vec<InvocationRecord>, SweepError> {
    let invocations = matrix.generate();

    let progress = (config.show_progress && !invocations.is_empty()).then(|| {
        let bar = ProgressBar::new(invocations.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
                )
                .unwrap()
                .progress_chars("#>-"),
        );
        bar
    });

    let mut log = match &config.results_log {
        Some(path) => {
            let file = File::create(path).map_err(|source| SweepError::ResultsLog {
                path: path.clone(),
                source,
            })?;
            Some((BufWriter::new(file), path.as_path()))
        }
        None => None,
    };

    let mut records = Vec::with_capacity(invocations.len());
    for invocation in &invocations {
        let record = run_invocation(&config.binary, invocation, config.timeout, config.echo_output);
        if config.echo_output {
            eprintln!("invocation wall time: {:.3}s", record.wall.as_secs_f64());
        }
        if let Some((writer, path)) = log.as_mut() {
            append_output(writer, path, &record.output)?;
        }
        if let Some(bar) = &progress {
            bar.inc(1);
        }
        records.push(record);
    }

    if let Some((writer, path)) = log.as_mut() {
        writer.flush().map_err(|source| SweepError::ResultsLog {
            path: path.to_path_buf(),
            source,
        })?;
    }
    if let Some(bar) = &progress {
        bar.finish_with_message("Completed");
    }

    Ok(records)
}

fn append_output(
    writer: &mut BufWriter<File>,
    path: &Path,
    lines: &[String],
) -> Result<(), SweepError> {
    for line in lines {
        writeln!(writer, "{line}").map_err(|source| SweepError::ResultsLog {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoke::{InvocationStatus, TIMEOUT_SENTINEL};

    fn tiny_matrix() -> SweepMatrix {
        SweepMatrix::contention_default()
            .prior_writes(vec![0])
            .writes_per_second(vec![0])
            .reads_per_second(vec![0])
    }

    fn quiet_config(log: Option<PathBuf>) -> SweepConfig {
        SweepConfig {
            binary: PathBuf::from("target/does-not-exist/mapbench"),
            timeout: Duration::from_secs(1),
            echo_output: false,
            show_progress: false,
            results_log: log,
        }
    }

    #[test]
    fn sweep_survives_every_invocation_failing() {
        let records = run_sweep(&quiet_config(None), &tiny_matrix()).expect("sweep should run");
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|record| record.status == InvocationStatus::TimedOut));
    }

    #[test]
    fn records_come_back_in_matrix_order() {
        let matrix = tiny_matrix();
        let records = run_sweep(&quiet_config(None), &matrix).expect("sweep should run");
        let expected = matrix.generate();
        for (record, invocation) in records.iter().zip(&expected) {
            assert_eq!(&record.invocation, invocation);
        }
    }

    #[test]
    fn results_log_carries_the_sentinel_lines() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let log_path = dir.path().join("results.txt");
        run_sweep(&quiet_config(Some(log_path.clone())), &tiny_matrix())
            .expect("sweep should run");

        let contents = std::fs::read_to_string(&log_path).expect("log should exist");
        let sentinels = contents
            .lines()
            .filter(|line| *line == TIMEOUT_SENTINEL)
            .count();
        assert_eq!(sentinels, 3);
    }
}
