//! Consolidate a bpftrace output file into a report.
//!
//! Usage:
//!   bpfreport trace.txt
//!   bpfreport --profile kthread --stdout trace.txt
//!
//! Without `--stdout` or `--json` the report overwrites the input file.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use bpfreport::{Config, Consolidator, Outcome, OutputMode, ProfileKind, SyscallNames};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "bpfreport")]
#[command(
    version,
    about = "Consolidate bpftrace map output into a readable report",
    long_about = None
)]
struct Cli {
    /// bpftrace output file; overwritten with the report unless printing
    path: PathBuf,

    /// Report layout (auto, khugepaged, page-alloc, kthread, syscall, generic)
    #[arg(short, long, default_value_t = ProfileKind::Auto)]
    profile: ProfileKind,

    /// Print the report instead of overwriting the input file
    #[arg(long)]
    stdout: bool,

    /// Print the parsed maps as JSON instead of a report
    #[arg(long, conflicts_with = "stdout")]
    json: bool,

    /// Most syscall names kept resolved at once
    #[arg(
        long,
        value_name = "N",
        default_value_t = SyscallNames::<bpfreport::Ausyscall>::DEFAULT_CAPACITY
    )]
    syscall_cache: usize,
}

impl Cli {
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.stdout {
            OutputMode::Stdout
        } else {
            OutputMode::InPlace
        }
    }

    fn config(&self) -> Config {
        Config::default()
            .with_profile(self.profile)
            .with_output(self.output_mode())
            .with_syscall_cache_capacity(self.syscall_cache)
    }
}

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

#[cfg(not(feature = "tracing"))]
const fn init_tracing() {}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    print!("{err}");
                    ExitCode::SUCCESS
                }
                _ => {
                    eprint!("{err}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    init_tracing();

    let mut consolidator = Consolidator::new(cli.config());
    match consolidator.run(&cli.path) {
        Ok(Outcome::Written(path)) => {
            println!("Success: Report written to '{}'.", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Report(report)) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Json(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
