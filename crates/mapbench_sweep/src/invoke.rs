//! Timed execution of a single benchmark invocation.
//!
//! Each child process gets a wall-clock deadline. Stdout is streamed through
//! and captured line by line; stderr passes straight to the terminal. A
//! child that misses the deadline is killed, and a child that fails to spawn
//! or exits with a failure status is reported exactly the same way, as the
//! single sentinel line, so the raw log never distinguishes the causes.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::matrix::Invocation;

/// Literal marker substituted for a timing report when an invocation
/// produces none.
pub const TIMEOUT_SENTINEL: &str = "TIMEOUT";

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How one invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    /// The child exited successfully within the deadline.
    Completed,
    /// The child overran the deadline, failed to spawn, or exited
    /// abnormally; only the sentinel line marks it in the output.
    TimedOut,
}

/// Captured outcome of one invocation.
#[derive(Debug, Clone)]
pub struct InvocationRecord {
    pub invocation: Invocation,
    pub status: InvocationStatus,
    /// Wall-clock time from spawn attempt to exit or kill.
    pub wall: Duration,
    /// Captured stdout lines, sentinel included.
    pub output: Vec<String>,
}

/// Runs one invocation of `binary` under `timeout`.
///
/// Never fails: every way the child can disappoint collapses into the
/// [`InvocationStatus::TimedOut`] outcome with the sentinel appended to the
/// captured output, and the caller is expected to keep sweeping.
pub fn run_invocation(
    binary: &Path,
    invocation: &Invocation,
    timeout: Duration,
    echo: bool,
) -> InvocationRecord {
    let mut command = Command::new(binary);
    command.args(invocation.to_args());

    let mut output = Vec::new();
    let started = Instant::now();
    let status = match run_command(command, timeout, echo, &mut output) {
        Ok(true) => InvocationStatus::Completed,
        Ok(false) | Err(_) => InvocationStatus::TimedOut,
    };
    let wall = started.elapsed();

    if status == InvocationStatus::TimedOut {
        if echo {
            println!("{TIMEOUT_SENTINEL}");
        }
        output.push(TIMEOUT_SENTINEL.to_string());
    }

    InvocationRecord {
        invocation: invocation.clone(),
        status,
        wall,
        output,
    }
}

/// Spawns `command`, capturing stdout into `output` until the child exits or
/// the deadline passes. Returns whether the child finished with a success
/// status inside the deadline.
fn run_command(
    mut command: Command,
    timeout: Duration,
    echo: bool,
    output: &mut Vec<String>,
) -> std::io::Result<bool> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    let stdout = child.stdout.take().expect("stdout was requested as piped");
    let reader = std::thread::spawn(move || {
        let mut lines = Vec::new();
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) => {
                    if echo {
                        println!("{line}");
                    }
                    lines.push(line);
                }
                Err(_) => break,
            }
        }
        lines
    });

    let exit = wait_with_deadline(&mut child, timeout);
    output.extend(reader.join().unwrap_or_default());
    Ok(match exit? {
        Some(status) => status.success(),
        None => false,
    })
}

/// Polls the child until it exits or the deadline passes; on deadline the
/// child is killed and `None` is returned.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SweepMatrix;

    #[cfg(unix)]
    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[cfg(unix)]
    #[test]
    fn clean_exit_captures_output_in_order() {
        let mut output = Vec::new();
        let finished = run_command(
            sh("echo first; echo second"),
            Duration::from_secs(10),
            false,
            &mut output,
        )
        .expect("spawn should succeed");
        assert!(finished);
        assert_eq!(output, vec!["first", "second"]);
    }

    #[cfg(unix)]
    #[test]
    fn failure_status_counts_as_not_finished() {
        let mut output = Vec::new();
        let finished = run_command(sh("exit 3"), Duration::from_secs(10), false, &mut output)
            .expect("spawn should succeed");
        assert!(!finished);
    }

    #[cfg(unix)]
    #[test]
    fn deadline_kills_a_hanging_child() {
        let mut output = Vec::new();
        let started = Instant::now();
        let finished = run_command(
            sh("echo started; sleep 30"),
            Duration::from_millis(200),
            false,
            &mut output,
        )
        .expect("spawn should succeed");
        assert!(!finished);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(output, vec!["started"]);
    }

    #[test]
    fn missing_binary_yields_the_sentinel() {
        let invocation = SweepMatrix::contention_default()
            .generate()
            .into_iter()
            .next()
            .expect("matrix is not empty");
        let record = run_invocation(
            Path::new("target/does-not-exist/mapbench"),
            &invocation,
            Duration::from_secs(1),
            false,
        );
        assert_eq!(record.status, InvocationStatus::TimedOut);
        assert_eq!(
            record.output.last().map(String::as_str),
            Some(TIMEOUT_SENTINEL)
        );
    }
}
