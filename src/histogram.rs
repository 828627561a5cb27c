//! Bucketed counts as printed by bpftrace's `hist()` and `lhist()`.

use std::collections::BTreeMap;

/// One half-open range `[start, end)` and the number of samples in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[non_exhaustive]
pub struct Bucket {
    pub start: u64,
    pub end: u64,
    pub count: u64,
}

impl Bucket {
    #[must_use]
    pub const fn new(start: u64, end: u64, count: u64) -> Self {
        Self { start, end, count }
    }
}

/// A histogram whose buckets are always held in ascending range order.
///
/// Recording the same range twice adds the counts, so merging histograms is
/// order independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    buckets: BTreeMap<(u64, u64), u64>,
}

impl Histogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a histogram by power-of-two bucketing of raw values.
    ///
    /// Zero lands in `[0, 1)`; any other value `v` lands in
    /// `[2^floor(log2 v), 2^(floor(log2 v) + 1))`.
    pub fn from_log2_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut hist = Self::new();
        for value in values {
            let (start, end) = log2_range(value);
            hist.record(start, end, 1);
        }
        hist
    }

    pub fn record(&mut self, start: u64, end: u64, count: u64) {
        let slot = self.buckets.entry((start, end)).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    pub fn merge(&mut self, other: &Histogram) {
        for bucket in other.buckets() {
            self.record(bucket.start, bucket.end, bucket.count);
        }
    }

    /// Buckets in ascending `(start, end)` order.
    pub fn buckets(&self) -> impl Iterator<Item = Bucket> + '_ {
        self.buckets
            .iter()
            .map(|(&(start, end), &count)| Bucket::new(start, end, count))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets
            .values()
            .fold(0u64, |acc, &count| acc.saturating_add(count))
    }

    /// Largest single bucket count, or 0 for an empty histogram.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.buckets.values().copied().max().unwrap_or(0)
    }
}

fn log2_range(value: u64) -> (u64, u64) {
    if value == 0 {
        return (0, 1);
    }
    let exp = u64::BITS - 1 - value.leading_zeros();
    let start = 1u64 << exp;
    let end = 1u64.checked_shl(exp + 1).unwrap_or(u64::MAX);
    (start, end)
}

#[cfg(feature = "serde")]
impl serde::Serialize for Histogram {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.buckets())
    }
}
