//! Parsing of raw sweep output.
//!
//! The benchmark binary reports each run as a `running load test:` header
//! line with key=value fields followed by duration lines, and the driver
//! writes the sentinel on its own line whenever a run produced no report.
//! This module turns that text back into per-run records and groups them per
//! sweep point.

use std::collections::HashMap;

use serde::Serialize;

use crate::invoke::TIMEOUT_SENTINEL;
use crate::matrix::{MapVariant, DEFAULT_TIMEOUT_SECS};

/// Header prefix every run report starts with.
const RUN_HEADER: &str = "running load test:";

/// Prefix of the overall duration line of a contention run.
const DURATION_PREFIX: &str = "contention duration:";

/// Duration recorded for a sentinel slot, matching the sweep deadline.
pub const TIMEOUT_DURATION_SECS: f64 = DEFAULT_TIMEOUT_SECS as f64;

/// One parsed contention run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentionRecord {
    pub map: MapVariant,
    pub shards: usize,
    pub prior_writes: u64,
    pub writes_per_second: u64,
    pub reads_per_second: u64,
    pub duration_secs: f64,
}

/// One sweep point with the duration of every variant column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedRecord {
    pub prior_writes: u64,
    pub writes_per_second: u64,
    pub reads_per_second: u64,
    pub hashmap_secs: Option<f64>,
    pub dashmap4_secs: Option<f64>,
    pub dashmap8_secs: Option<f64>,
}

/// Parses a whole raw log into contention records.
///
/// Blocks that cannot be parsed are reported on stderr and skipped; init
/// runs are skipped silently.
pub fn parse_raw_output(text: &str) -> Vec<ContentionRecord> {
    split_runs(text)
        .into_iter()
        .filter_map(|block| match parse_run(&block) {
            Ok(record) => record,
            Err(reason) => {
                eprintln!("failed to parse run block starting '{}': {reason}", block[0]);
                None
            }
        })
        .collect()
}

/// Splits the raw text into blocks, one per run header.
///
/// Lines before the first header end up in a headerless block, which the
/// parser then rejects; blank lines are dropped.
fn split_runs(text: &str) -> Vec<Vec<&str>> {
    let mut blocks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.starts_with(RUN_HEADER) && !current.is_empty() {
            blocks.push(std::mem::take(&mut current));
        }
        if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Parses one block. `Ok(None)` means the block is a non-contention run.
fn parse_run(block: &[&str]) -> Result<Option<ContentionRecord>, String> {
    let header = block
        .first()
        .filter(|line| line.starts_with(RUN_HEADER))
        .ok_or_else(|| "missing run header".to_string())?;

    let fields: HashMap<&str, &str> = header[RUN_HEADER.len()..]
        .split_whitespace()
        .filter_map(|token| token.split_once('='))
        .collect();

    if fields.get("test") != Some(&"contention") {
        return Ok(None);
    }

    let map = match fields.get("map") {
        Some(&"hashmap") => MapVariant::Hashmap,
        Some(&"dashmap") => MapVariant::Dashmap,
        other => return Err(format!("unknown map field {other:?}")),
    };

    Ok(Some(ContentionRecord {
        map,
        shards: field_value(&fields, "shards")?,
        prior_writes: field_value(&fields, "prior_writes")?,
        writes_per_second: field_value(&fields, "writes_per_second")?,
        reads_per_second: field_value(&fields, "reads_per_second")?,
        duration_secs: parse_duration(block)?,
    }))
}

fn field_value<T: std::str::FromStr>(
    fields: &HashMap<&str, &str>,
    name: &str,
) -> Result<T, String> {
    fields
        .get(name)
        .ok_or_else(|| format!("missing field {name}"))?
        .parse()
        .map_err(|_| format!("malformed field {name}"))
}

/// Finds the overall duration of a run block.
///
/// A real report wins over a stray sentinel; a sentinel alone yields the
/// fixed deadline duration.
fn parse_duration(block: &[&str]) -> Result<f64, String> {
    for line in block {
        if let Some(rest) = line.strip_prefix(DURATION_PREFIX) {
            return rest
                .trim()
                .trim_end_matches('s')
                .parse()
                .map_err(|_| format!("malformed duration line '{line}'"));
        }
    }
    if block.iter().any(|line| *line == TIMEOUT_SENTINEL) {
        return Ok(TIMEOUT_DURATION_SECS);
    }
    Err("no duration line or sentinel".to_string())
}

/// Collapses records into one row per sweep point, first-seen order.
///
/// Records from a variant/shard pair outside the standard columns are
/// reported on stderr and dropped.
pub fn group_records(records: &[ContentionRecord]) -> Vec<GroupedRecord> {
    let mut index: HashMap<(u64, u64, u64), usize> = HashMap::new();
    let mut grouped: Vec<GroupedRecord> = Vec::new();

    for record in records {
        let key = (
            record.prior_writes,
            record.writes_per_second,
            record.reads_per_second,
        );
        let slot = *index.entry(key).or_insert_with(|| {
            grouped.push(GroupedRecord {
                prior_writes: record.prior_writes,
                writes_per_second: record.writes_per_second,
                reads_per_second: record.reads_per_second,
                hashmap_secs: None,
                dashmap4_secs: None,
                dashmap8_secs: None,
            });
            grouped.len() - 1
        });
        match (record.map, record.shards) {
            (MapVariant::Hashmap, 1) => grouped[slot].hashmap_secs = Some(record.duration_secs),
            (MapVariant::Dashmap, 4) => grouped[slot].dashmap4_secs = Some(record.duration_secs),
            (MapVariant::Dashmap, 8) => grouped[slot].dashmap8_secs = Some(record.duration_secs),
            (map, shards) => eprintln!("unknown variant column: {map:?} at {shards} shards"),
        }
    }

    grouped
}
