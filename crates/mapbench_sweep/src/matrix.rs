//! Sweep matrix definition and invocation generation.
//!
//! A sweep point is one (prior_writes, writes_per_second, reads_per_second)
//! triple. The matrix crosses a list of values per axis with a fixed set of
//! map variant columns and turns every cell into one command line for the
//! benchmark binary.

use serde::{Deserialize, Serialize};

/// Load magnitudes swept on every axis of the default contention matrix.
pub const LOAD_MAGNITUDES: [u64; 8] =
    [0, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000];

/// Per-invocation wall-clock deadline of the default sweep, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Map implementation selector, as spelled on the benchmark command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapVariant {
    Hashmap,
    Dashmap,
}

impl MapVariant {
    /// The positional argument the benchmark binary expects.
    pub fn cli_token(self) -> &'static str {
        match self {
            MapVariant::Hashmap => "hashmap",
            MapVariant::Dashmap => "dashmap",
        }
    }
}

/// One (prior_writes, writes_per_second, reads_per_second) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SweepPoint {
    pub prior_writes: u64,
    pub writes_per_second: u64,
    pub reads_per_second: u64,
}

/// A map variant at a fixed shard count, one column of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantColumn {
    pub variant: MapVariant,
    pub shards: usize,
}

/// One fully determined benchmark invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    pub column: VariantColumn,
    pub point: SweepPoint,
}

impl Invocation {
    /// Argument vector passed to the benchmark binary.
    ///
    /// Sweep parameters are substituted verbatim, in the fixed order `-p`,
    /// `-w`, `-r`, followed by the exact-reads flag.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.column.variant.cli_token().to_string(),
            "-s".to_string(),
            self.column.shards.to_string(),
            "contention".to_string(),
            "-p".to_string(),
            self.point.prior_writes.to_string(),
            "-w".to_string(),
            self.point.writes_per_second.to_string(),
            "-r".to_string(),
            self.point.reads_per_second.to_string(),
            "-e".to_string(),
        ]
    }
}

/// Axes and variant columns of a contention sweep.
///
/// Invocations are generated in a fixed nesting order: prior writes
/// outermost, then write rate, then read rate, then the variant columns for
/// each point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepMatrix {
    prior_writes: Vec<u64>,
    writes_per_second: Vec<u64>,
    reads_per_second: Vec<u64>,
    columns: Vec<VariantColumn>,
}

impl SweepMatrix {
    /// The full contention grid: every axis over [`LOAD_MAGNITUDES`], against
    /// the baseline map at 1 shard and the sharded map at 4 and at 8 shards.
    pub fn contention_default() -> Self {
        Self {
            prior_writes: LOAD_MAGNITUDES.to_vec(),
            writes_per_second: LOAD_MAGNITUDES.to_vec(),
            reads_per_second: LOAD_MAGNITUDES.to_vec(),
            columns: vec![
                VariantColumn {
                    variant: MapVariant::Hashmap,
                    shards: 1,
                },
                VariantColumn {
                    variant: MapVariant::Dashmap,
                    shards: 4,
                },
                VariantColumn {
                    variant: MapVariant::Dashmap,
                    shards: 8,
                },
            ],
        }
    }

    /// Override the prior-writes axis.
    pub fn prior_writes(mut self, values: Vec<u64>) -> Self {
        self.prior_writes = values;
        self
    }

    /// Override the write-rate axis.
    pub fn writes_per_second(mut self, values: Vec<u64>) -> Self {
        self.writes_per_second = values;
        self
    }

    /// Override the read-rate axis.
    pub fn reads_per_second(mut self, values: Vec<u64>) -> Self {
        self.reads_per_second = values;
        self
    }

    /// Override the variant columns.
    pub fn columns(mut self, columns: Vec<VariantColumn>) -> Self {
        self.columns = columns;
        self
    }

    /// All sweep points in iteration order.
    pub fn points(&self) -> Vec<SweepPoint> {
        self.prior_writes
            .iter()
            .flat_map(|&prior_writes| {
                self.writes_per_second.iter().flat_map(move |&writes| {
                    self.reads_per_second.iter().map(move |&reads| SweepPoint {
                        prior_writes,
                        writes_per_second: writes,
                        reads_per_second: reads,
                    })
                })
            })
            .collect()
    }

    /// Every invocation of the sweep, one per point and column.
    pub fn generate(&self) -> Vec<Invocation> {
        self.points()
            .into_iter()
            .flat_map(|point| {
                self.columns
                    .iter()
                    .map(move |&column| Invocation { column, point })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matrix_has_512_points() {
        assert_eq!(SweepMatrix::contention_default().points().len(), 512);
    }

    #[test]
    fn default_matrix_has_1536_invocations() {
        assert_eq!(SweepMatrix::contention_default().generate().len(), 1536);
    }

    #[test]
    fn first_point_runs_all_three_columns_in_order() {
        let invocations = SweepMatrix::contention_default().generate();
        let first: Vec<String> = invocations[..3]
            .iter()
            .map(|invocation| invocation.to_args().join(" "))
            .collect();
        assert_eq!(
            first,
            vec![
                "hashmap -s 1 contention -p 0 -w 0 -r 0 -e",
                "dashmap -s 4 contention -p 0 -w 0 -r 0 -e",
                "dashmap -s 8 contention -p 0 -w 0 -r 0 -e",
            ]
        );
    }

    #[test]
    fn read_rate_is_the_innermost_axis() {
        let points = SweepMatrix::contention_default().points();
        assert_eq!(
            points[1],
            SweepPoint {
                prior_writes: 0,
                writes_per_second: 0,
                reads_per_second: 10,
            }
        );
        assert_eq!(
            points[8],
            SweepPoint {
                prior_writes: 0,
                writes_per_second: 10,
                reads_per_second: 0,
            }
        );
    }

    #[test]
    fn last_invocation_is_the_heaviest_dashmap_cell() {
        let invocations = SweepMatrix::contention_default().generate();
        let last = invocations.last().expect("matrix is not empty");
        assert_eq!(
            last.to_args().join(" "),
            "dashmap -s 8 contention -p 10000000 -w 10000000 -r 10000000 -e"
        );
    }

    #[test]
    fn overridden_axes_shrink_the_grid() {
        let matrix = SweepMatrix::contention_default()
            .prior_writes(vec![0])
            .writes_per_second(vec![10, 100])
            .reads_per_second(vec![1_000]);
        assert_eq!(matrix.points().len(), 2);
        assert_eq!(matrix.generate().len(), 6);
    }
}
