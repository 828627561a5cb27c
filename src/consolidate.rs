//! One run: read a dump, render it, and put the result where it belongs.

use crate::config::{Config, OutputMode};
use crate::dump::TraceDump;
use crate::error::Error;
use crate::names::{Ausyscall, SyscallNames, SyscallResolver};
use crate::report::Report;
use crate::tracing;

use std::fs;
use std::path::{Path, PathBuf};

/// Read a whole bpftrace output file.
///
/// bpftrace prints `comm` strings as raw kernel bytes, so invalid UTF-8 is
/// replaced with U+FFFD instead of failing the whole dump.
///
/// # Errors
///
/// Returns `Error::InputError` if the file is missing or unreadable.
pub fn read_trace(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path).map_err(|err| Error::input(path, &err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Replace the contents of `path` with `report`.
///
/// # Errors
///
/// Returns `Error::OutputError` if the file cannot be written.
pub fn write_report(path: &Path, report: &Report) -> Result<(), Error> {
    fs::write(path, report.to_string()).map_err(|err| Error::output(path, &err))
}

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The report replaced the input file.
    Written(PathBuf),
    /// The report, for printing.
    Report(Report),
    /// The parsed dump as JSON, for printing.
    Json(String),
}

/// Turns bpftrace output files into reports according to a [`Config`].
#[derive(Debug)]
pub struct Consolidator<R = Ausyscall> {
    config: Config,
    syscalls: SyscallNames<R>,
}

impl Consolidator<Ausyscall> {
    /// A consolidator that resolves syscall names with `ausyscall`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_resolver(config, Ausyscall)
    }
}

impl<R: SyscallResolver> Consolidator<R> {
    #[must_use]
    pub fn with_resolver(config: Config, resolver: R) -> Self {
        Self {
            syscalls: SyscallNames::with_capacity(resolver, config.syscall_cache_capacity),
            config,
        }
    }

    /// Render `dump` with the configured profile.
    pub fn render(&mut self, dump: &TraceDump) -> Report {
        let profile = self.config.profile.resolve(dump);
        tracing::debug!(requested = %self.config.profile, chosen = %profile, "rendering report");
        profile.render(dump, &mut self.syscalls)
    }

    /// Render the text of a dump without touching the filesystem.
    pub fn render_str(&mut self, input: &str) -> Report {
        self.render(&TraceDump::parse(input))
    }

    /// Process the file at `path`.
    ///
    /// In [`OutputMode::InPlace`] the file is overwritten only after it was
    /// read and rendered, so a read failure leaves it untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::InputError` when `path` cannot be read and
    /// `Error::OutputError` when the result cannot be written or encoded.
    pub fn run(&mut self, path: &Path) -> Result<Outcome, Error> {
        let _span = tracing::span!(tracing::Level::DEBUG, "Consolidator::run").entered();

        let input = read_trace(path)?;
        let dump = TraceDump::parse(&input);
        if dump.skipped_lines() > 0 {
            tracing::debug!(skipped = dump.skipped_lines(), "lines not recognized");
        }

        match self.config.output {
            OutputMode::InPlace => {
                let report = self.render(&dump);
                write_report(path, &report)?;
                Ok(Outcome::Written(path.to_path_buf()))
            }
            OutputMode::Stdout => Ok(Outcome::Report(self.render(&dump))),
            OutputMode::Json => to_json(&dump).map(Outcome::Json),
        }
    }
}

#[cfg(feature = "serde")]
fn to_json(dump: &TraceDump) -> Result<String, Error> {
    serde_json::to_string_pretty(dump)
        .map_err(|err| Error::OutputError(format!("Could not encode dump: {err}")))
}

#[cfg(not(feature = "serde"))]
fn to_json(_: &TraceDump) -> Result<String, Error> {
    Err(Error::OutputError(
        "JSON output needs the `serde` feature".to_string(),
    ))
}
