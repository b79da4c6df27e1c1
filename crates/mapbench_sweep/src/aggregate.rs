//! Load-class aggregation of grouped sweep results.
//!
//! A load class bounds each axis to a plausible operating range; averaging
//! one axis while the other two stay inside a class answers how duration
//! scales with that axis under that kind of load.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::parse::GroupedRecord;

/// Swept axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    PriorWrites,
    WritesPerSecond,
    ReadsPerSecond,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::PriorWrites, Axis::WritesPerSecond, Axis::ReadsPerSecond];

    /// Field name used in headers and file names.
    pub fn name(self) -> &'static str {
        match self {
            Axis::PriorWrites => "prior_writes",
            Axis::WritesPerSecond => "writes_per_second",
            Axis::ReadsPerSecond => "reads_per_second",
        }
    }

    fn value(self, row: &GroupedRecord) -> u64 {
        match self {
            Axis::PriorWrites => row.prior_writes,
            Axis::WritesPerSecond => row.writes_per_second,
            Axis::ReadsPerSecond => row.reads_per_second,
        }
    }
}

/// Per-axis bounds describing one kind of load.
#[derive(Debug, Clone)]
pub struct LoadClass {
    pub label: &'static str,
    pub prior_writes: RangeInclusive<u64>,
    pub writes_per_second: RangeInclusive<u64>,
    pub reads_per_second: RangeInclusive<u64>,
}

impl LoadClass {
    /// Load that may be encountered for the most popular entries.
    pub fn reasonable() -> Self {
        Self {
            label: "reasonable_load",
            prior_writes: 1_000..=1_000_000,
            writes_per_second: 1_000..=100_000,
            reads_per_second: 1_000..=1_000_000,
        }
    }

    /// Load typical for somewhat popular entries.
    pub fn light() -> Self {
        Self {
            label: "light_load",
            prior_writes: 10..=1_000,
            writes_per_second: 1..=1_000,
            reads_per_second: 1..=1_000,
        }
    }

    /// Load beyond the typical amount for any entry.
    pub fn heavy() -> Self {
        Self {
            label: "heavy_load",
            prior_writes: 100_000..=u64::MAX,
            writes_per_second: 100_000..=u64::MAX,
            reads_per_second: 100_000..=u64::MAX,
        }
    }

    /// The three classes every sweep is aggregated under.
    pub fn standard() -> Vec<Self> {
        vec![Self::reasonable(), Self::light(), Self::heavy()]
    }

    fn bounds(&self, axis: Axis) -> &RangeInclusive<u64> {
        match axis {
            Axis::PriorWrites => &self.prior_writes,
            Axis::WritesPerSecond => &self.writes_per_second,
            Axis::ReadsPerSecond => &self.reads_per_second,
        }
    }
}

/// One x position on an axis with per-variant average durations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisAverage {
    pub x: u64,
    pub hashmap_secs: Option<f64>,
    pub dashmap4_secs: Option<f64>,
    pub dashmap8_secs: Option<f64>,
}

/// Averages grouped durations along `axis`.
///
/// Only rows whose other two fields fall inside the `class` bounds
/// contribute. Positions appear in first-seen order; a variant with no
/// surviving samples at a position stays `None`.
pub fn average_along_axis(
    grouped: &[GroupedRecord],
    axis: Axis,
    class: &LoadClass,
) -> Vec<AxisAverage> {
    let mut order: Vec<u64> = Vec::new();
    let mut sums: HashMap<u64, ([f64; 3], [usize; 3])> = HashMap::new();

    for row in grouped {
        if !other_axes_within(row, axis, class) {
            continue;
        }
        let x = axis.value(row);
        if !sums.contains_key(&x) {
            order.push(x);
        }
        let (totals, counts) = sums.entry(x).or_default();
        let columns = [row.hashmap_secs, row.dashmap4_secs, row.dashmap8_secs];
        for (slot, value) in columns.into_iter().enumerate() {
            if let Some(value) = value {
                totals[slot] += value;
                counts[slot] += 1;
            }
        }
    }

    order
        .into_iter()
        .map(|x| {
            let (totals, counts) = &sums[&x];
            let mean = |slot: usize| (counts[slot] > 0).then(|| totals[slot] / counts[slot] as f64);
            AxisAverage {
                x,
                hashmap_secs: mean(0),
                dashmap4_secs: mean(1),
                dashmap8_secs: mean(2),
            }
        })
        .collect()
}

fn other_axes_within(row: &GroupedRecord, axis: Axis, class: &LoadClass) -> bool {
    Axis::ALL
        .iter()
        .filter(|&&other| other != axis)
        .all(|&other| class.bounds(other).contains(&other.value(row)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        prior_writes: u64,
        writes_per_second: u64,
        reads_per_second: u64,
        durations: (f64, f64, f64),
    ) -> GroupedRecord {
        GroupedRecord {
            prior_writes,
            writes_per_second,
            reads_per_second,
            hashmap_secs: Some(durations.0),
            dashmap4_secs: Some(durations.1),
            dashmap8_secs: Some(durations.2),
        }
    }

    #[test]
    fn averages_rows_sharing_an_axis_position() {
        let grouped = vec![
            row(10_000, 1_000, 1_000, (1.0, 2.0, 3.0)),
            row(10_000, 10_000, 1_000, (3.0, 4.0, 5.0)),
        ];
        let averages = average_along_axis(&grouped, Axis::PriorWrites, &LoadClass::reasonable());
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].x, 10_000);
        assert_eq!(averages[0].hashmap_secs, Some(2.0));
        assert_eq!(averages[0].dashmap4_secs, Some(3.0));
        assert_eq!(averages[0].dashmap8_secs, Some(4.0));
    }

    #[test]
    fn rows_outside_the_class_are_filtered() {
        let grouped = vec![
            row(10_000, 1_000, 1_000, (1.0, 1.0, 1.0)),
            // write rate above the reasonable bound, must not contribute
            row(10_000, 1_000_000, 1_000, (9.0, 9.0, 9.0)),
        ];
        let averages = average_along_axis(&grouped, Axis::PriorWrites, &LoadClass::reasonable());
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].hashmap_secs, Some(1.0));
    }

    #[test]
    fn the_swept_axis_itself_is_not_bounded() {
        // prior_writes of 0 sits outside every class, but it is the axis
        // being swept, so the row still contributes at x = 0.
        let grouped = vec![row(0, 1_000, 1_000, (1.0, 1.0, 1.0))];
        let averages = average_along_axis(&grouped, Axis::PriorWrites, &LoadClass::reasonable());
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].x, 0);
    }

    #[test]
    fn heavy_class_has_no_upper_bound() {
        let grouped = vec![row(10_000_000, 10_000_000, 100_000, (2.0, 2.0, 2.0))];
        let averages = average_along_axis(&grouped, Axis::ReadsPerSecond, &LoadClass::heavy());
        assert_eq!(averages.len(), 1);
        assert_eq!(averages[0].x, 100_000);
    }

    #[test]
    fn missing_variant_samples_stay_none() {
        let mut only_hashmap = row(10_000, 1_000, 1_000, (1.5, 0.0, 0.0));
        only_hashmap.dashmap4_secs = None;
        only_hashmap.dashmap8_secs = None;
        let averages =
            average_along_axis(&[only_hashmap], Axis::WritesPerSecond, &LoadClass::reasonable());
        assert_eq!(averages[0].hashmap_secs, Some(1.5));
        assert_eq!(averages[0].dashmap4_secs, None);
        assert_eq!(averages[0].dashmap8_secs, None);
    }
}
