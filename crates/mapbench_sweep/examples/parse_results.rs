//! Example: re-parse an existing raw sweep log into CSV/JSON series.
//!
//! Useful when a sweep already ran and only the post-processing should be
//! repeated. Pass the run name whose `<name>.txt` log should be parsed:
//!
//! ```text
//! cargo run -p mapbench_sweep --example parse_results -- results0
//! ```

use mapbench_sweep::{
    export_class_series, export_grouped_csv, export_records_csv, export_records_json,
    group_records, parse_raw_output, LoadClass,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let run = match std::env::args().nth(1) {
        Some(run) => run,
        None => {
            eprintln!("pass a run name, for example: parse_results results0");
            std::process::exit(1);
        }
    };

    let raw = std::fs::read_to_string(format!("{run}.txt"))?;
    let records = parse_raw_output(&raw);
    let grouped = group_records(&records);
    println!(
        "Parsed {} contention runs into {} sweep points",
        records.len(),
        grouped.len()
    );

    export_records_csv(&records, format!("{run}.csv"))?;
    export_records_json(&records, format!("{run}.json"))?;
    export_grouped_csv(&grouped, format!("{run}_grouped.csv"))?;
    for class in LoadClass::standard() {
        export_class_series(&grouped, &class, &run)?;
    }
    println!("Exported {run}.csv, {run}.json, {run}_grouped.csv and the per-axis class series");

    Ok(())
}
