//! Merging per-thread and per-process entries into base-name groups.
//!
//! Worker pools show up under many names (`kworker/u4:0`, `kworker/u8:1`,
//! ...). Cutting each name at the first `/` folds them into one group whose
//! totals and histograms are the bucket-wise sums of its members.

use crate::histogram::Histogram;
use crate::insertion_map::InsertionMap;
use hashbrown::HashSet;
use std::cmp::Reverse;

/// The identifier up to (not including) its first `/`.
///
/// `"kworker/u4:0"` becomes `"kworker"`; a name without `/` is unchanged.
#[must_use]
pub fn base_name(identifier: &str) -> &str {
    identifier
        .split_once('/')
        .map_or(identifier, |(base, _)| base)
}

/// Accumulated data for every raw identifier sharing one base name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    total: u64,
    has_total: bool,
    members: HashSet<String>,
    histogram: Histogram,
}

impl Group {
    /// Sum of every total contributed to this group.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Whether any member contributed a total, even a zero one.
    #[must_use]
    pub const fn has_total(&self) -> bool {
        self.has_total
    }

    /// Number of distinct raw identifiers that contributed anything.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub const fn histogram(&self) -> &Histogram {
        &self.histogram
    }
}

/// Base-name groups in the order their first member was seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Consolidation {
    groups: InsertionMap<String, Group>,
}

impl Consolidation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn group_for(&mut self, identifier: &str) -> &mut Group {
        let group = self
            .groups
            .entry_or_default(base_name(identifier).to_string());
        if !group.members.contains(identifier) {
            group.members.insert(identifier.to_string());
        }
        group
    }

    /// Add `value` to the total of `identifier`'s group.
    pub fn add_total(&mut self, identifier: &str, value: u64) {
        let group = self.group_for(identifier);
        group.total = group.total.saturating_add(value);
        group.has_total = true;
    }

    /// Merge `hist` bucket-wise into `identifier`'s group.
    pub fn add_histogram(&mut self, identifier: &str, hist: &Histogram) {
        self.group_for(identifier).histogram.merge(hist);
    }

    #[must_use]
    pub fn get(&self, base: &str) -> Option<&Group> {
        self.groups.get(base)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Groups sorted by base name.
    #[must_use]
    pub fn sorted_by_name(&self) -> Vec<(&str, &Group)> {
        let mut groups: Vec<_> = self.iter().collect();
        groups.sort_by_key(|&(name, _)| name);
        groups
    }

    /// Groups sorted by descending total; ties keep first-seen order.
    #[must_use]
    pub fn sorted_by_total(&self) -> Vec<(&str, &Group)> {
        let mut groups: Vec<_> = self.iter().collect();
        groups.sort_by_key(|&(_, group)| Reverse(group.total));
        groups
    }
}

impl<'a> FromIterator<(&'a str, u64)> for Consolidation {
    fn from_iter<T: IntoIterator<Item = (&'a str, u64)>>(iter: T) -> Self {
        let mut consolidation = Self::new();
        for (identifier, value) in iter {
            consolidation.add_total(identifier, value);
        }
        consolidation
    }
}
