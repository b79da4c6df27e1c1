//! Contention sweep driver for the `mapbench` load test binary.
//!
//! This crate enumerates a fixed matrix of contention workloads, invokes the
//! separately built benchmark binary once per cell under a wall-clock
//! deadline, and post-processes the raw text output into grouped CSV and
//! JSON series.
//!
//! # Quick Start
//!
//! ```no_run
//! use mapbench_sweep::{binary, run_sweep, SweepConfig, SweepMatrix};
//!
//! // Compile the benchmark once up front; a failed build aborts the run.
//! binary::build_release().expect("benchmark build failed");
//!
//! // Full 8x8x8 grid, three variant columns per point.
//! let matrix = SweepMatrix::contention_default();
//! let records = run_sweep(&SweepConfig::default(), &matrix).unwrap();
//! assert_eq!(records.len(), 1536);
//! ```
//!
//! # Architecture
//!
//! - [`matrix`]: sweep point enumeration and command-line generation
//! - [`binary`]: release build of the benchmark executable
//! - [`invoke`]: one timed child process, deadline kill, sentinel output
//! - [`runner`]: the sequential sweep loop with progress and raw logging
//! - [`parse`]: raw output back into records, grouped per sweep point
//! - [`aggregate`]: load-class averages along each swept axis
//! - [`export`]: CSV/JSON writers for all of the above

pub mod aggregate;
pub mod binary;
pub mod export;
pub mod invoke;
pub mod matrix;
pub mod parse;
pub mod runner;

pub use aggregate::{average_along_axis, Axis, AxisAverage, LoadClass};
pub use export::{
    export_class_series, export_grouped_csv, export_records_csv, export_records_json,
};
pub use invoke::{run_invocation, InvocationRecord, InvocationStatus, TIMEOUT_SENTINEL};
pub use matrix::{
    Invocation, MapVariant, SweepMatrix, SweepPoint, VariantColumn, DEFAULT_TIMEOUT_SECS,
    LOAD_MAGNITUDES,
};
pub use parse::{group_records, parse_raw_output, ContentionRecord, GroupedRecord};
pub use runner::{run_sweep, SweepConfig, SweepError};
