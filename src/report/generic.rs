use super::{HistogramStyle, Profile, Report, rows_by_count, size_label, thousands};
use crate::dump::TraceDump;
use crate::names::{SyscallNames, SyscallResolver};

/// Any bpftrace dump, printed map by map in input order.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Generic;

fn map_title(name: &str, key: &str) -> String {
    if key.is_empty() {
        format!("@{name}")
    } else {
        format!("@{name}[{key}]")
    }
}

impl Profile for Generic {
    /// Every dump can be rendered generically.
    fn detect(_: &TraceDump) -> bool {
        true
    }

    fn render<R: SyscallResolver>(dump: &TraceDump, _: &mut SyscallNames<R>) -> Report {
        let mut report = Report::new();
        report.banner("BPFTRACE MAP REPORT", 70);

        let mut scalars = dump.scalars().peekable();
        if scalars.peek().is_some() {
            report.section("Scalars");
            for (name, value) in scalars {
                report.push(format!(
                    "  {:<30} {:>14}",
                    format!("@{name}"),
                    thousands(value)
                ));
            }
        }

        for (name, map) in dump.keyed_maps() {
            report.section(&format!("@{name}"));
            report.push(format!("  {:<30} {:>14}", "KEY", "COUNT"));
            report.push(format!("  {}", "-".repeat(45)));
            for (key, count) in rows_by_count(map) {
                report.push(format!("  {key:<30} {:>14}", thousands(count)));
            }
        }

        for (name, key, hist) in dump.histograms() {
            report.section(&map_title(name, key));
            report.histogram(hist, HistogramStyle::new("    ", 20, 10), size_label);
        }

        if report.len() == 3 {
            report.blank();
            report.push("  (no maps found)");
        }
        report
    }
}
