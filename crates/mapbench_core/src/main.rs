use clap::{Parser, Subcommand, ValueEnum};

use mapbench_core::contention::{run_contention, ContentionConfig, ContentionFocus};
use mapbench_core::init::run_init;
use mapbench_core::map::{dashmap_factory, rwlock_hashmap};

// ── CLI definition ─────────────────────────────────────────────────

/// Load test driver for concurrent hash map implementations.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Map implementation to exercise
    #[arg(value_enum)]
    map: MapKind,

    /// DashMap shard count; must be a power of two
    #[arg(short, long)]
    shards: Option<usize>,

    /// Simulated core count; the shard count defaults to the next power of
    /// two of 4 * cores
    #[arg(short, long)]
    cores: Option<usize>,

    #[command(subcommand)]
    test: TestCommand,
}

impl Cli {
    fn dashmap_shards(&self) -> usize {
        if let Some(shards) = self.shards {
            return shards;
        }
        let cores = self.cores.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1)
        });
        (4 * cores).next_power_of_two()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MapKind {
    Hashmap,
    Dashmap,
}

impl MapKind {
    fn name(self) -> &'static str {
        match self {
            MapKind::Hashmap => "hashmap",
            MapKind::Dashmap => "dashmap",
        }
    }
}

#[derive(Clone, Copy, Debug, Subcommand)]
enum TestCommand {
    /// Fill an outer map with many inner maps, timing allocation and drop
    Init {
        /// Inner maps inserted into the outer map
        #[arg(short, long, default_value_t = 10_000_000)]
        entries: u64,

        /// Average items per inner map (normally distributed)
        #[arg(short, long, default_value_t = 0)]
        inner_items: u64,
    },

    /// Run reads and writes against a single map at fixed rates for about
    /// one second
    Contention {
        /// Cap on distinct keys; defaults to prior_writes + writes_per_second
        #[arg(short, long)]
        max_entries: Option<u64>,

        /// Entries written before the timed phase begins
        #[arg(short, long, default_value_t = 0)]
        prior_writes: u64,

        /// Write operations per second (also the total write count)
        #[arg(short, long, default_value_t = 10_000_000)]
        writes_per_second: u64,

        /// Read operations per second (also the total read count)
        #[arg(short, long, default_value_t = 10_000_000)]
        reads_per_second: u64,

        /// Read one exact key per operation instead of scanning all keys
        #[arg(short, long)]
        exact_reads: bool,

        /// Side to wait for; the other side then loops until it finishes
        #[arg(short, long)]
        focus: Option<ContentionFocus>,
    },
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let shards = cli.dashmap_shards();

    match cli.test {
        TestCommand::Init {
            entries,
            inner_items,
        } => {
            println!(
                "running load test: map={} shards={} test=init entries={} inner_items={}",
                cli.map.name(),
                shards,
                entries,
                inner_items
            );
            match cli.map {
                MapKind::Dashmap => run_init(
                    entries,
                    inner_items,
                    dashmap_factory(shards),
                    dashmap_factory(shards),
                ),
                MapKind::Hashmap => run_init(entries, inner_items, rwlock_hashmap, rwlock_hashmap),
            }
        }
        TestCommand::Contention {
            max_entries,
            prior_writes,
            writes_per_second,
            reads_per_second,
            exact_reads,
            focus,
        } => {
            let config = ContentionConfig {
                key_range: max_entries.unwrap_or(prior_writes.saturating_add(writes_per_second)),
                prior_writes,
                writes_per_second,
                reads_per_second,
                exact_reads,
                focus,
            };
            println!(
                "running load test: map={} shards={} test=contention max_entries={} \
                 prior_writes={} writes_per_second={} reads_per_second={} exact_reads={} focus={}",
                cli.map.name(),
                shards,
                config.key_range,
                prior_writes,
                writes_per_second,
                reads_per_second,
                exact_reads,
                focus_name(focus)
            );
            match cli.map {
                MapKind::Dashmap => run_contention(config, dashmap_factory(shards)()),
                MapKind::Hashmap => run_contention(config, rwlock_hashmap()),
            }
        }
    }

    println!("done");
}

fn focus_name(focus: Option<ContentionFocus>) -> &'static str {
    match focus {
        None => "none",
        Some(ContentionFocus::Read) => "read",
        Some(ContentionFocus::Write) => "write",
    }
}
