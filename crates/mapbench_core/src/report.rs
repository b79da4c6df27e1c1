//! Timing and process reporting helpers.
//!
//! Every load test announces itself with a single `running load test:`
//! key=value header line and finishes with one or more
//! `<label> duration: <secs>s` lines. The sweep tooling parses this stream,
//! so changes here must be mirrored in its parser.

use std::time::{SystemTime, UNIX_EPOCH};

/// Prints the elapsed time since `since` as `<label> duration: 1.234s`.
pub fn print_duration(since: SystemTime, label: &str) {
    let elapsed = SystemTime::now().duration_since(since).unwrap_or_default();
    println!("{label} duration: {:.3}s", elapsed.as_secs_f64());
}

/// Nanoseconds since the Unix epoch.
pub fn unix_timestamp_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}

/// Resident memory of the current process in bytes, if available.
pub fn memory_usage() -> Option<u64> {
    sysinfo::System::new_all()
        .process(sysinfo::Pid::from(std::process::id() as usize))
        .map(|process| process.memory())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_timestamp_is_monotonic_enough() {
        let first = unix_timestamp_nanos();
        let second = unix_timestamp_nanos();
        assert!(second >= first);
    }

    #[test]
    fn memory_usage_reports_something() {
        assert!(memory_usage().unwrap_or(0) > 0);
    }
}
