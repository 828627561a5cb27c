//! Print an elapsed time such as `ps -o etime` shows it, in seconds.
//!
//! Usage:
//!   elapsed_secs 2-01:23:45

#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "elapsed_secs")]
#[command(version, about = "Convert [dd-]hh:mm:ss or mm:ss to seconds", long_about = None)]
struct Cli {
    /// Elapsed time, e.g. 2-01:23:45, 01:23:45 or 23:45
    time: String,
}

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

    match bpfreport::parse_elapsed(&cli.time) {
        Ok(seconds) => {
            println!("{seconds}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
