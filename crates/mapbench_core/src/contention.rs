//! Read/write contention load test.
//!
//! Seeds a map with a number of entries, then runs rate-paced writer and
//! reader threads against it for about one second. One writer and one reader
//! thread are started per available core; each thread sleeps between
//! operations so the whole group holds the requested operations per second.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use clap::ValueEnum;
use rand::Rng;

use crate::map::SharedMap;
use crate::report::{print_duration, unix_timestamp_nanos};

/// Which side of the load the test waits for.
///
/// With a focus selected, the other side loops its quota indefinitely and
/// the test ends as soon as the focused side completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ContentionFocus {
    Read,
    Write,
}

/// Parameters for one contention run.
#[derive(Clone, Copy, Debug)]
pub struct ContentionConfig {
    /// Keys are sampled uniformly from `0..=key_range`.
    pub key_range: u64,
    /// Entries written into the map before the timed phase starts.
    pub prior_writes: u64,
    /// Write operations per second. Also the total write count, so the
    /// timed phase targets about one second.
    pub writes_per_second: u64,
    /// Read operations per second. Also the total read count.
    pub reads_per_second: u64,
    /// If true each read is a single `get`; otherwise it copies all keys.
    pub exact_reads: bool,
    /// Optional side to wait for, looping the other side indefinitely.
    pub focus: Option<ContentionFocus>,
}

/// Nanoseconds between operations for one of `threads` equal-rate threads.
///
/// `None` disables the operation entirely (rate 0).
pub fn gap_nanos(threads: u64, rate_per_second: u64) -> Option<u128> {
    (rate_per_second > 0).then(|| threads as u128 * 1_000_000_000 / rate_per_second as u128)
}

/// Runs the contention load against `map` and prints duration reports.
///
/// Both sides report their own duration as their threads drain; an overall
/// `contention duration:` line follows once the non-focused sides are done.
pub fn run_contention(
    config: ContentionConfig,
    map: impl SharedMap<u64, ()> + Send + Sync + 'static,
) {
    let map = Arc::new(map);
    let threads_each = std::thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1) as u64;
    let write_gap = gap_nanos(threads_each, config.writes_per_second);
    let read_gap = gap_nanos(threads_each, config.reads_per_second);

    // Seed the map before the clock starts.
    let mut rng = rand::thread_rng();
    for _ in 0..config.prior_writes {
        map.insert(rng.gen_range(0..=config.key_range), ());
    }

    let start = SystemTime::now();
    let mut writer_handles = Vec::new();
    let mut reader_handles = Vec::new();
    for _ in 0..threads_each {
        if let Some(gap) = write_gap {
            let map = Arc::clone(&map);
            let ops = config.writes_per_second / threads_each;
            let key_range = config.key_range;
            let run_forever = config.focus == Some(ContentionFocus::Read);
            writer_handles.push(std::thread::spawn(move || {
                let mut rng = rand::thread_rng();
                paced_loop(ops, gap, run_forever, move || {
                    map.insert(rng.gen_range(0..=key_range), ());
                });
            }));
        }
        if let Some(gap) = read_gap {
            let map = Arc::clone(&map);
            let ops = config.reads_per_second / threads_each;
            let key_range = config.key_range;
            let exact_reads = config.exact_reads;
            let run_forever = config.focus == Some(ContentionFocus::Write);
            reader_handles.push(std::thread::spawn(move || {
                let mut rng = rand::thread_rng();
                paced_loop(ops, gap, run_forever, move || {
                    if exact_reads {
                        let _ = map.get(&rng.gen_range(0..=key_range));
                    } else {
                        map.keys();
                    }
                });
            }));
        }
    }

    let write_waiter = std::thread::spawn(move || {
        for handle in writer_handles {
            handle.join().expect("writer thread panicked");
        }
        print_duration(start, "contention (writers)");
    });
    let read_waiter = std::thread::spawn(move || {
        for handle in reader_handles {
            handle.join().expect("reader thread panicked");
        }
        print_duration(start, "contention (readers)");
    });

    if config.focus != Some(ContentionFocus::Read) {
        write_waiter.join().expect("writer waiter panicked");
    }
    if config.focus != Some(ContentionFocus::Write) {
        read_waiter.join().expect("reader waiter panicked");
    }
    print_duration(start, "contention");
}

/// Executes `op` in passes of `ops_per_pass`, pacing each operation `gap`
/// nanoseconds after the previous one. With `run_forever` the passes repeat
/// until the process exits.
fn paced_loop(ops_per_pass: u64, gap: u128, run_forever: bool, mut op: impl FnMut()) {
    let mut next = unix_timestamp_nanos();
    loop {
        for _ in 0..ops_per_pass {
            let now = unix_timestamp_nanos();
            if now < next {
                std::thread::sleep(Duration::from_nanos((next - now) as u64));
            }
            op();
            next += gap;
        }
        if !run_forever {
            break;
        }
    }
}
