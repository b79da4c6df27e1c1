//! Result export.
//!
//! CSV writers for the flat records, the per-point grouped rows and the
//! per-axis class averages, plus a JSON dump of the flat records. Column
//! names follow the grouped layout: one duration column per variant.

use std::fs::File;
use std::path::Path;

use crate::aggregate::{average_along_axis, Axis, AxisAverage, LoadClass};
use crate::matrix::MapVariant;
use crate::parse::{ContentionRecord, GroupedRecord};

/// Export parsed contention records to CSV.
///
/// # Errors
///
/// Returns an error if there is nothing to export or file IO fails.
pub fn export_records_csv(
    records: &[ContentionRecord],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_not_empty(records)?;
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record([
        "map_type",
        "shards",
        "prior_writes",
        "writes_per_second",
        "reads_per_second",
        "duration",
    ])?;
    for record in records {
        wtr.write_record([
            variant_name(record.map).to_string(),
            record.shards.to_string(),
            record.prior_writes.to_string(),
            record.writes_per_second.to_string(),
            record.reads_per_second.to_string(),
            record.duration_secs.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export parsed contention records to JSON.
pub fn export_records_json(
    records: &[ContentionRecord],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_not_empty(records)?;
    serde_json::to_writer_pretty(File::create(path)?, records)?;
    Ok(())
}

/// Export grouped per-point rows to CSV.
pub fn export_grouped_csv(
    grouped: &[GroupedRecord],
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    ensure_not_empty(grouped)?;
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record([
        "prior_writes",
        "writes_per_second",
        "reads_per_second",
        "hashmap_duration",
        "dashmap4_duration",
        "dashmap8_duration",
    ])?;
    for row in grouped {
        wtr.write_record([
            row.prior_writes.to_string(),
            row.writes_per_second.to_string(),
            row.reads_per_second.to_string(),
            optional(row.hashmap_secs),
            optional(row.dashmap4_secs),
            optional(row.dashmap8_secs),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Export one axis-average series to CSV, `x` column named after the axis.
///
/// An empty series still produces a header-only file, so a class that
/// filters everything out leaves a readable artifact.
pub fn export_axis_csv(
    averages: &[AxisAverage],
    axis: Axis,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record([
        axis.name(),
        "hashmap_duration",
        "dashmap4_duration",
        "dashmap8_duration",
    ])?;
    for average in averages {
        wtr.write_record([
            average.x.to_string(),
            optional(average.hashmap_secs),
            optional(average.dashmap4_secs),
            optional(average.dashmap8_secs),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes one axis-average CSV per axis for `class`, named
/// `<prefix>.<axis>.<label>.csv`.
pub fn export_class_series(
    grouped: &[GroupedRecord],
    class: &LoadClass,
    prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    for axis in Axis::ALL {
        let series = average_along_axis(grouped, axis, class);
        let path = format!("{prefix}.{}.{}.csv", axis.name(), class.label);
        export_axis_csv(&series, axis, path)?;
    }
    Ok(())
}

fn variant_name(variant: MapVariant) -> &'static str {
    variant.cli_token()
}

fn optional(value: Option<f64>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn ensure_not_empty<T>(items: &[T]) -> Result<(), Box<dyn std::error::Error>> {
    if items.is_empty() {
        return Err("No results to export".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_records() -> Vec<ContentionRecord> {
        vec![
            ContentionRecord {
                map: MapVariant::Hashmap,
                shards: 1,
                prior_writes: 10,
                writes_per_second: 100,
                reads_per_second: 1000,
                duration_secs: 1.25,
            },
            ContentionRecord {
                map: MapVariant::Dashmap,
                shards: 4,
                prior_writes: 10,
                writes_per_second: 100,
                reads_per_second: 1000,
                duration_secs: 300.0,
            },
        ]
    }

    #[test]
    fn records_csv_round_trips_the_values() {
        let file = NamedTempFile::new().unwrap();
        export_records_csv(&sample_records(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("map_type,shards,prior_writes,writes_per_second,reads_per_second,duration")
        );
        assert_eq!(lines.next(), Some("hashmap,1,10,100,1000,1.25"));
        assert_eq!(lines.next(), Some("dashmap,4,10,100,1000,300"));
    }

    #[test]
    fn grouped_csv_leaves_missing_columns_empty() {
        let grouped = vec![GroupedRecord {
            prior_writes: 10,
            writes_per_second: 100,
            reads_per_second: 1000,
            hashmap_secs: Some(1.25),
            dashmap4_secs: None,
            dashmap8_secs: Some(0.5),
        }];

        let file = NamedTempFile::new().unwrap();
        export_grouped_csv(&grouped, file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("10,100,1000,1.25,,0.5"));
    }

    #[test]
    fn records_json_contains_the_fields() {
        let file = NamedTempFile::new().unwrap();
        export_records_json(&sample_records(), file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert!(contents.contains("duration_secs"));
        assert!(contents.contains("Hashmap"));
    }

    #[test]
    fn empty_records_are_rejected() {
        let file = NamedTempFile::new().unwrap();
        let error = export_records_csv(&[], file.path()).unwrap_err();
        assert_eq!(error.to_string(), "No results to export");
    }

    #[test]
    fn class_series_writes_one_file_per_axis() {
        let grouped = vec![GroupedRecord {
            prior_writes: 10_000,
            writes_per_second: 1_000,
            reads_per_second: 1_000,
            hashmap_secs: Some(1.0),
            dashmap4_secs: Some(2.0),
            dashmap8_secs: Some(3.0),
        }];

        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("run0");
        let prefix = prefix.to_str().unwrap();
        export_class_series(&grouped, &LoadClass::reasonable(), prefix).unwrap();

        for axis in Axis::ALL {
            let path = format!("{prefix}.{}.reasonable_load.csv", axis.name());
            let contents = std::fs::read_to_string(path).unwrap();
            assert!(contents.starts_with(axis.name()));
        }
    }
}
