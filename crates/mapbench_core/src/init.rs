//! Bulk allocation load test.
//!
//! Fills an outer map with many inner maps, timing the allocation phase and
//! the drop of the whole structure separately. Peak resident memory is
//! sampled once per percent of progress.

use std::io::Write;
use std::time::SystemTime;

use rand_distr::{Distribution, Normal};

use crate::map::SharedMap;
use crate::report::{memory_usage, print_duration};

/// Fills an outer map with `entries` inner maps and reports timing.
///
/// Each inner map receives a normally distributed number of items around
/// `avg_inner_items` (standard deviation of one third of the mean); with an
/// average of zero the inner maps stay empty.
pub fn run_init<Outer, Inner>(
    entries: u64,
    avg_inner_items: u64,
    new_outer: impl Fn() -> Outer,
    new_inner: impl Fn() -> Inner,
) where
    Outer: SharedMap<u64, Inner>,
    Inner: SharedMap<u64, ()>,
{
    let mut rng = rand::thread_rng();
    let inner_sizes = Normal::new(avg_inner_items as f64, avg_inner_items as f64 / 3.0)
        .expect("distribution parameters are finite and non-negative");
    let progress_step = (entries / 100).max(1);

    let drop_start = {
        let start = SystemTime::now();
        let outer = new_outer();
        let mut peak_mem_bytes = 0;
        for i in 0..entries {
            let inner = new_inner();
            if avg_inner_items != 0 {
                for key in 0..(inner_sizes.sample(&mut rng).max(0.0) as u64) {
                    inner.insert(key, ());
                }
            }
            outer.insert(i, inner);
            if i % progress_step == 0 {
                peak_mem_bytes = peak_mem_bytes.max(memory_usage().unwrap_or(0));
                print!(
                    "\rallocated {}%  | {} MB",
                    i / progress_step,
                    peak_mem_bytes / 1_000_000
                );
                let _ = std::io::stdout().flush();
            }
        }
        println!("\rallocated 100%");
        print_duration(start, "init");
        println!("dropping...");
        // `outer` leaves scope here, so the second timer covers its drop.
        SystemTime::now()
    };
    print_duration(drop_start, "drop");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{dashmap_factory, rwlock_hashmap};

    #[test]
    fn init_with_empty_inner_maps_completes() {
        run_init(
            50,
            0,
            dashmap_factory::<u64, _>(4),
            dashmap_factory::<u64, ()>(4),
        );
    }

    #[test]
    fn init_fills_inner_maps_on_average() {
        run_init(20, 6, rwlock_hashmap::<u64, _>, rwlock_hashmap::<u64, ()>);
    }
}
