use super::{
    HistogramStyle, Profile, Report, plain_label, rows_by_count, thousands, thousands_fixed,
    thousands_signed,
};
use crate::dump::TraceDump;
use crate::group::Consolidation;
use crate::histogram::Bucket;
use crate::names::{MIGRATETYPE, SyscallNames, SyscallResolver};
use crate::parsers::key_pair;

const MARKERS: [&str; 7] = [
    "alloc_count",
    "alloc_pages",
    "free_count",
    "alloc_order",
    "free_order",
    "alloc_by_migtype",
    "pages_by_comm",
];

/// Processes listed in each of the top allocator and free-er tables.
const TOP_PROCESSES: usize = 30;

/// Buddy allocator allocations and frees, by order, migratetype and process.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct PageAlloc;

/// `pages` 4 KiB pages in MiB with one decimal.
fn mib(pages: i128) -> String {
    let mib = pages as f64 * 4.0 / 1024.0;
    thousands_fixed(mib, 1)
}

/// `[3, 4)  (8-8 pages)` style label for an allocation order bucket.
fn order_label(bucket: &Bucket) -> String {
    let pages_at = |order: u64| {
        u32::try_from(order)
            .ok()
            .and_then(|order| 1u128.checked_shl(order))
            .map_or_else(|| format!("2^{order}"), |pages| pages.to_string())
    };
    let pages = format!(
        "({}-{} pages)",
        pages_at(bucket.start),
        pages_at(bucket.end.saturating_sub(1))
    );
    format!("{:<15}{pages:<20}", plain_label(bucket))
}

impl PageAlloc {
    fn summary(report: &mut Report, dump: &TraceDump) {
        let alloc_count = dump.scalar_or_zero("alloc_count");
        let alloc_pages = dump.scalar_or_zero("alloc_pages");
        let free_count = dump.scalar_or_zero("free_count");
        let free_pages = dump.scalar_or_zero("free_pages");
        let net_pages = i128::from(alloc_pages) - i128::from(free_pages);

        report.section("Summary");
        report.push(format!(
            "  Total allocations:       {:>12}",
            thousands(alloc_count)
        ));
        report.push(format!(
            "  Total pages allocated:   {:>12}  ({} MiB)",
            thousands(alloc_pages),
            mib(alloc_pages.into())
        ));
        report.push(format!(
            "  Total frees:             {:>12}",
            thousands(free_count)
        ));
        report.push(format!(
            "  Total pages freed:       {:>12}  ({} MiB)",
            thousands(free_pages),
            mib(free_pages.into())
        ));
        report.push(format!(
            "  Net pages:               {:>12}  ({} MiB)",
            thousands_signed(net_pages),
            mib(net_pages)
        ));
        report.push(format!(
            "  Extfrag fallbacks:       {:>12}",
            thousands(dump.scalar_or_zero("extfrag_count"))
        ));
        report.push(format!(
            "  Extfrag ownership steals:{:>12}",
            thousands(dump.scalar_or_zero("extfrag_ownership_change"))
        ));
    }

    fn orders(report: &mut Report, dump: &TraceDump) {
        if let Some(hist) = dump.histogram("alloc_order", None) {
            report.section("Allocation Order Histogram");
            report.histogram(hist, HistogramStyle::new("  ", 0, 12), order_label);
        }
        if let Some(hist) = dump.histogram("free_order", None) {
            report.section("Free Order Histogram");
            report.histogram(hist, HistogramStyle::new("  ", 15, 12), plain_label);
        }
    }

    fn migratetypes(report: &mut Report, dump: &TraceDump) {
        report.section("Allocations by Migratetype");
        report.push(format!(
            "  {:<20} {:>12} {:>12} {:>10}",
            "TYPE", "COUNT", "PAGES", "MiB"
        ));
        report.push(format!("  {}", "-".repeat(56)));

        let Some(by_type) = dump.keyed("alloc_by_migtype") else {
            return;
        };
        let pages_by_type = dump.keyed("pages_by_migtype");
        for (code, count) in rows_by_count(by_type) {
            let pages = pages_by_type
                .and_then(|m| m.get(code))
                .copied()
                .unwrap_or(0);
            report.push(format!(
                "  {:<20} {:>12} {:>12} {:>10}",
                MIGRATETYPE.name(code),
                thousands(count),
                thousands(pages),
                mib(pages.into())
            ));
        }
    }

    fn extfrag(report: &mut Report, dump: &TraceDump) {
        let Some(types) = dump.keyed("extfrag_types").filter(|m| !m.is_empty()) else {
            return;
        };
        report.section("Extfrag Fallback Types (requested -> fallback)");
        report.push(format!(
            "  {:<15} {:<15} {:>10}",
            "REQUESTED", "FALLBACK", "COUNT"
        ));
        report.push(format!("  {}", "-".repeat(42)));
        for (key, count) in rows_by_count(types) {
            // keys that are not a (requested, fallback) pair are left out
            if let Some((requested, fallback)) = key_pair(key) {
                report.push(format!(
                    "  {:<15} {:<15} {:>10}",
                    MIGRATETYPE.name_or_code(requested),
                    MIGRATETYPE.name_or_code(fallback),
                    thousands(count)
                ));
            }
        }
    }

    /// Top processes by pages, consolidated by base name.
    fn top_processes(
        report: &mut Report,
        dump: &TraceDump,
        title: &str,
        count_column: &str,
        pages_map: &str,
        count_map: &str,
    ) {
        report.section(title);
        report.push(format!(
            "  {:<25} {:>12} {:>12} {:>10}",
            "PROCESS", count_column, "PAGES", "MiB"
        ));
        report.push(format!("  {}", "-".repeat(61)));

        let consolidate = |name: &str| -> Consolidation {
            dump.keyed(name)
                .map(|map| map.iter().map(|(comm, v)| (comm.as_str(), *v)).collect())
                .unwrap_or_default()
        };
        let pages = consolidate(pages_map);
        let counts = consolidate(count_map);

        for (base, group) in pages.sorted_by_total().into_iter().take(TOP_PROCESSES) {
            let count = counts.get(base).map_or(0, |g| g.total());
            report.push(format!(
                "  {:<25} {:>12} {:>12} {:>10}",
                base,
                thousands(count),
                thousands(group.total()),
                mib(group.total().into())
            ));
        }
    }
}

impl Profile for PageAlloc {
    fn detect(dump: &TraceDump) -> bool {
        MARKERS.iter().any(|name| dump.has_map(name))
    }

    fn render<R: SyscallResolver>(dump: &TraceDump, _: &mut SyscallNames<R>) -> Report {
        let mut report = Report::new();
        report.banner("BUDDY ALLOCATOR TRACE REPORT", 70);

        Self::summary(&mut report, dump);
        Self::orders(&mut report, dump);
        Self::migratetypes(&mut report, dump);
        Self::extfrag(&mut report, dump);
        Self::top_processes(
            &mut report,
            dump,
            "Top Allocators by Page Count (Consolidated)",
            "ALLOCS",
            "pages_by_comm",
            "alloc_by_comm",
        );
        Self::top_processes(
            &mut report,
            dump,
            "Top Free-ers by Page Count (Consolidated)",
            "FREES",
            "free_pages_by_comm",
            "free_by_comm",
        );

        report
    }
}
