//! Everything parsed out of one bpftrace output file.
//!
//! Lines are fed through a two-state machine. A histogram header moves it to
//! `InHistogram`; bucket rows are then attributed to that histogram until a
//! blank line or an unrelated line moves it back to `Idle`. Nothing that
//! fails to parse is fatal: unknown lines are counted and skipped.

use crate::histogram::Histogram;
use crate::insertion_map::InsertionMap;
use crate::parsers::{self, Line};
use crate::tracing;

use std::str::FromStr;

/// Values of one keyed map (`@name[key]: value`), in first-seen key order.
pub type KeyedMap = InsertionMap<String, u64>;

/// Histogram context while walking the input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    Idle,
    InHistogram { name: String, key: String },
}

/// Scalars, keyed maps, histograms and streamed scan events parsed from a
/// bpftrace dump.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraceDump {
    scalars: InsertionMap<String, u64>,
    keyed: InsertionMap<String, KeyedMap>,
    histograms: InsertionMap<String, InsertionMap<String, Histogram>>,
    scan_events: Vec<u64>,
    #[cfg_attr(feature = "serde", serde(skip))]
    skipped_lines: usize,
}

impl TraceDump {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete dump. Lines that match no known shape are skipped.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let _span = tracing::span!(tracing::Level::DEBUG, "TraceDump::parse").entered();

        let mut dump = Self::new();
        let mut context = Context::Idle;

        for line in input.lines() {
            context = dump.step(context, line);
        }

        tracing::debug!(
            scalars = dump.scalars.len(),
            keyed_maps = dump.keyed.len(),
            histograms = dump.histograms.len(),
            scan_events = dump.scan_events.len(),
            skipped = dump.skipped_lines,
            "parsed trace dump"
        );
        dump
    }

    /// Apply one line and return the next context.
    fn step(&mut self, context: Context, line: &str) -> Context {
        match parsers::classify(line) {
            Line::ScanEvent(value) => {
                self.scan_events.push(value);
                context
            }
            Line::Scalar { name, value } => {
                self.scalars.insert(name.to_string(), value);
                Context::Idle
            }
            Line::Keyed { name, key, value } => {
                self.keyed
                    .entry_or_default(name.to_string())
                    .insert(key.to_string(), value);
                Context::Idle
            }
            Line::Header { name, key } => {
                // register the histogram even if no bucket follows
                self.histograms
                    .entry_or_default(name.to_string())
                    .entry_or_default(key.to_string());
                Context::InHistogram {
                    name: name.to_string(),
                    key: key.to_string(),
                }
            }
            Line::Blank => Context::Idle,
            Line::Other => self.step_other(context, line),
        }
    }

    fn step_other(&mut self, context: Context, line: &str) -> Context {
        let Context::InHistogram { name, key } = context else {
            self.skip(line);
            return Context::Idle;
        };

        if let Some(bucket) = parsers::find_bucket(line) {
            self.histograms
                .entry_or_default(name.clone())
                .entry_or_default(key.clone())
                .record(bucket.start, bucket.end, bucket.count);
            return Context::InHistogram { name, key };
        }

        self.skip(line);
        if parsers::looks_like_bucket(line) {
            // a malformed bucket row does not end the histogram
            Context::InHistogram { name, key }
        } else {
            Context::Idle
        }
    }

    fn skip(&mut self, line: &str) {
        tracing::trace!(line, "skipping unrecognized line");
        self.skipped_lines += 1;
    }

    #[must_use]
    pub fn scalar(&self, name: &str) -> Option<u64> {
        self.scalars.get(name).copied()
    }

    /// A scalar, or 0 when the dump does not contain it.
    #[must_use]
    pub fn scalar_or_zero(&self, name: &str) -> u64 {
        self.scalar(name).unwrap_or(0)
    }

    pub fn scalars(&self) -> impl Iterator<Item = (&str, u64)> {
        self.scalars.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn keyed(&self, name: &str) -> Option<&KeyedMap> {
        self.keyed.get(name)
    }

    pub fn keyed_maps(&self) -> impl Iterator<Item = (&str, &KeyedMap)> {
        self.keyed.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The histogram printed under `@name[key]:`, or under `@name:` when
    /// `key` is `None`.
    #[must_use]
    pub fn histogram(&self, name: &str, key: Option<&str>) -> Option<&Histogram> {
        self.histograms.get(name)?.get(key.unwrap_or(""))
    }

    /// Every histogram recorded under `name`, keyed by its map key (empty for
    /// an unkeyed histogram).
    #[must_use]
    pub fn histograms_named(&self, name: &str) -> Option<&InsertionMap<String, Histogram>> {
        self.histograms.get(name)
    }

    pub fn histograms(&self) -> impl Iterator<Item = (&str, &str, &Histogram)> {
        self.histograms.iter().flat_map(|(name, by_key)| {
            by_key
                .iter()
                .map(move |(key, hist)| (name.as_str(), key.as_str(), hist))
        })
    }

    #[must_use]
    pub fn scan_events(&self) -> &[u64] {
        &self.scan_events
    }

    /// Whether the dump holds a scalar, keyed map or histogram called `name`.
    #[must_use]
    pub fn has_map(&self, name: &str) -> bool {
        self.scalars.contains_key(name)
            || self.keyed.contains_key(name)
            || self.histograms.contains_key(name)
    }

    /// Lines that matched no known shape.
    #[must_use]
    pub const fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }
}

impl FromStr for TraceDump {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
