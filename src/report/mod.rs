//! Rendering a [`TraceDump`] into report text.
//!
//! Each bpftrace script the reports are written for has a [`Profile`]: a
//! marker type that knows which maps the script emits and how to lay them
//! out. [`ProfileKind`] picks one at runtime, either explicitly or by
//! sniffing the map names in the dump.

mod generic;
mod khugepaged;
mod kthread;
mod numfmt;
mod page_alloc;
mod syscall;

pub use generic::Generic;
pub use khugepaged::Khugepaged;
pub use kthread::Kthread;
pub use numfmt::{thousands, thousands_fixed, thousands_signed};
pub use page_alloc::PageAlloc;
pub use syscall::Syscall;

use crate::dump::{KeyedMap, TraceDump};
use crate::error::Error;
use crate::histogram::{Bucket, Histogram};
use crate::names::{SyscallNames, SyscallResolver};
use crate::size::format_size;

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Width of a full-length histogram bar.
pub const BAR_WIDTH: u64 = 40;
const BAR_GLYPH: char = '█';

/// A report layout for one tracing script's output.
pub trait Profile {
    /// Whether `dump` contains the maps this profile reports on.
    fn detect(dump: &TraceDump) -> bool;

    fn render<R: SyscallResolver>(dump: &TraceDump, syscalls: &mut SyscallNames<R>) -> Report;
}

/// An ordered list of report lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
}

/// Column layout for histogram rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramStyle {
    indent: &'static str,
    label_width: usize,
    count_width: usize,
}

impl HistogramStyle {
    #[must_use]
    pub const fn new(indent: &'static str, label_width: usize, count_width: usize) -> Self {
        Self {
            indent,
            label_width,
            count_width,
        }
    }
}

impl Default for HistogramStyle {
    fn default() -> Self {
        Self::new("    ", 20, 10)
    }
}

/// `[4K, 8K)` style label using size suffixes.
#[must_use]
pub fn size_label(bucket: &Bucket) -> String {
    format!(
        "[{}, {})",
        format_size(bucket.start),
        format_size(bucket.end)
    )
}

/// `[4, 8)` style label with plain integers.
#[must_use]
pub fn plain_label(bucket: &Bucket) -> String {
    format!("[{}, {})", bucket.start, bucket.end)
}

/// Length of the bar for `count` in a histogram whose largest bucket is `max`.
#[must_use]
pub fn bar_len(count: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let len = u128::from(BAR_WIDTH) * u128::from(count) / u128::from(max);
    usize::try_from(len).unwrap_or(0)
}

impl Report {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// A title framed above and below by `width` `=` characters.
    pub fn banner(&mut self, title: &str, width: usize) {
        let rule = "=".repeat(width);
        self.push(rule.clone());
        self.push(title);
        self.push(rule);
    }

    /// A blank line followed by `--- title ---`.
    pub fn section(&mut self, title: &str) {
        self.blank();
        self.push(format!("--- {title} ---"));
    }

    /// One row per non-empty bucket, in ascending range order.
    pub fn histogram<F>(&mut self, hist: &Histogram, style: HistogramStyle, label: F)
    where
        F: Fn(&Bucket) -> String,
    {
        let max = hist.max_count();
        for bucket in hist.buckets().filter(|b| b.count > 0) {
            let bar: String = std::iter::repeat_n(BAR_GLYPH, bar_len(bucket.count, max)).collect();
            self.push(format!(
                "{indent}{label:<label_width$}{count:<count_width$} |{bar}",
                indent = style.indent,
                label = label(&bucket),
                label_width = style.label_width,
                count = thousands(bucket.count),
                count_width = style.count_width,
            ));
        }
    }

    #[must_use]
    pub const fn lines(&self) -> &[String] {
        self.lines.as_slice()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Rows of a keyed map sorted by descending count; ties keep input order.
#[must_use]
pub fn rows_by_count(map: &KeyedMap) -> Vec<(&str, u64)> {
    let mut rows: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    rows.sort_by_key(|&(_, count)| Reverse(count));
    rows
}

/// Which profile to render a dump with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileKind {
    /// Pick from the map names present in the dump.
    #[default]
    Auto,
    Khugepaged,
    PageAlloc,
    Kthread,
    Syscall,
    Generic,
}

impl ProfileKind {
    pub const NAMES: [&'static str; 6] = [
        "auto",
        "khugepaged",
        "page-alloc",
        "kthread",
        "syscall",
        "generic",
    ];

    /// Resolve `Auto` against `dump`; any other kind is returned as is.
    #[must_use]
    pub fn resolve(self, dump: &TraceDump) -> Self {
        if self != Self::Auto {
            return self;
        }
        if Khugepaged::detect(dump) {
            Self::Khugepaged
        } else if PageAlloc::detect(dump) {
            Self::PageAlloc
        } else if Kthread::detect(dump) {
            Self::Kthread
        } else if Syscall::detect(dump) {
            Self::Syscall
        } else {
            Self::Generic
        }
    }

    /// Render `dump` with this profile, resolving `Auto` first.
    pub fn render<R: SyscallResolver>(
        self,
        dump: &TraceDump,
        syscalls: &mut SyscallNames<R>,
    ) -> Report {
        match self.resolve(dump) {
            Self::Khugepaged => Khugepaged::render(dump, syscalls),
            Self::PageAlloc => PageAlloc::render(dump, syscalls),
            Self::Kthread => Kthread::render(dump, syscalls),
            Self::Syscall => Syscall::render(dump, syscalls),
            Self::Auto | Self::Generic => Generic::render(dump, syscalls),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Khugepaged => "khugepaged",
            Self::PageAlloc => "page-alloc",
            Self::Kthread => "kthread",
            Self::Syscall => "syscall",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "khugepaged" => Ok(Self::Khugepaged),
            "page-alloc" | "page_alloc" => Ok(Self::PageAlloc),
            "kthread" => Ok(Self::Kthread),
            "syscall" => Ok(Self::Syscall),
            "generic" => Ok(Self::Generic),
            _ => Err(Error::ParseError(format!(
                "unknown profile '{s}', expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}
