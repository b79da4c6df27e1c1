//! Example: full contention sweep of the default benchmark matrix.
//!
//! This example demonstrates the whole pipeline:
//! 1. Build the benchmark binary in release mode (fatal on failure)
//! 2. Run the 8x8x8 grid against all variant columns, one process at a
//!    time, with a 300 second deadline per invocation
//! 3. Capture the raw output to `results0.txt`
//! 4. Parse, group and export CSV/JSON series
//!
//! Expect a long run: heavy cells routinely hit the deadline.

use mapbench_sweep::{
    binary, export_class_series, export_grouped_csv, export_records_csv, export_records_json,
    group_records, parse_raw_output, run_sweep, InvocationStatus, LoadClass, SweepConfig,
    SweepMatrix,
};

const RUN_NAME: &str = "results0";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Starting contention sweep...");

    // A broken benchmark build means nothing below gets invoked.
    binary::build_release()?;

    let matrix = SweepMatrix::contention_default();
    println!(
        "Generated {} invocations over {} sweep points",
        matrix.generate().len(),
        matrix.points().len()
    );

    let log_path = format!("{RUN_NAME}.txt");
    let config = SweepConfig {
        results_log: Some(log_path.clone().into()),
        ..SweepConfig::default()
    };
    let records = run_sweep(&config, &matrix)?;

    let timeouts = records
        .iter()
        .filter(|record| record.status == InvocationStatus::TimedOut)
        .count();
    println!(
        "\nCompleted {} invocations ({timeouts} hit the deadline)",
        records.len()
    );

    println!("Parsing {log_path}...");
    let raw = std::fs::read_to_string(&log_path)?;
    let parsed = parse_raw_output(&raw);
    let grouped = group_records(&parsed);
    println!(
        "Parsed {} contention runs into {} sweep points",
        parsed.len(),
        grouped.len()
    );

    println!("\nExporting results...");
    export_records_csv(&parsed, format!("{RUN_NAME}.csv"))?;
    export_records_json(&parsed, format!("{RUN_NAME}.json"))?;
    export_grouped_csv(&grouped, format!("{RUN_NAME}_grouped.csv"))?;
    for class in LoadClass::standard() {
        export_class_series(&grouped, &class, RUN_NAME)?;
    }
    println!("Exported {RUN_NAME}.csv, {RUN_NAME}.json, {RUN_NAME}_grouped.csv and the per-axis class series");

    println!("\nSweep complete!");
    Ok(())
}
