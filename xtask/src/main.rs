use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the map benchmark workspace",
    long_about = "A unified CLI for building the benchmark binary, running\n\
                  contention sweeps, re-parsing results, and CI checks."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full contention sweep (builds the benchmark binary first)
    Sweep,
    /// Run a single benchmark invocation in release mode
    Run {
        /// Arguments passed through to the benchmark binary
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Re-parse an existing raw results log into CSV/JSON series
    Parse {
        /// Run name; `<name>.txt` is read and `<name>*.csv` written
        #[arg(default_value = "results0")]
        run: String,
    },
    /// Run CI checks (fmt, clippy, tests, smoke invocation)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Build the benchmark and run one light contention invocation
    Smoke,
    /// Run check + smoke
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    Command::new("cargo")
        .args(args)
        .status()
        .expect("failed to execute cargo")
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test mapbench_core");
    run_cargo(&["test", "-p", "mapbench_core"]);

    step("Test mapbench_sweep");
    run_cargo(&["test", "-p", "mapbench_sweep"]);
}

fn ci_smoke() {
    step("Run a light contention invocation");
    run_cargo(&[
        "run",
        "--release",
        "-p",
        "mapbench_core",
        "--bin",
        "mapbench",
        "--",
        "hashmap",
        "-s",
        "1",
        "contention",
        "-p",
        "1000",
        "-w",
        "1000",
        "-r",
        "1000",
        "-e",
    ]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep => {
            run_cargo(&[
                "run",
                "--release",
                "-p",
                "mapbench_sweep",
                "--example",
                "contention_sweep",
            ]);
        }
        Commands::Run { args } => {
            let mut cargo_args = vec![
                "run",
                "--release",
                "-p",
                "mapbench_core",
                "--bin",
                "mapbench",
                "--",
            ];
            cargo_args.extend(args.iter().map(String::as_str));
            run_cargo(&cargo_args);
        }
        Commands::Parse { run } => {
            run_cargo(&[
                "run",
                "-p",
                "mapbench_sweep",
                "--example",
                "parse_results",
                "--",
                &run,
            ]);
        }
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Smoke => ci_smoke(),
                CiJob::All => {
                    ci_check();
                    ci_smoke();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
