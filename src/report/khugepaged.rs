use super::{HistogramStyle, Profile, Report, rows_by_count, size_label, thousands, thousands_fixed};
use crate::dump::TraceDump;
use crate::histogram::Histogram;
use crate::names::{SCAN_STATUS, SyscallNames, SyscallResolver};

use std::borrow::Cow;

const FAULTS_PER_SCAN: &str = "hist_faults_per_scan";
const MARKERS: [&str; 4] = [
    "total_faults",
    "total_scans",
    "scan_status",
    FAULTS_PER_SCAN,
];

/// Page faults of a target process against khugepaged scan activity.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Khugepaged;

impl Khugepaged {
    /// Faults-between-scans histogram: built from streamed scan events when
    /// there are any, else the one bpftrace printed.
    fn faults_per_scan(dump: &TraceDump) -> Option<Cow<'_, Histogram>> {
        if !dump.scan_events().is_empty() {
            let hist = Histogram::from_log2_values(dump.scan_events().iter().copied());
            return Some(Cow::Owned(hist));
        }
        dump.histogram(FAULTS_PER_SCAN, None).map(Cow::Borrowed)
    }
}

impl Profile for Khugepaged {
    fn detect(dump: &TraceDump) -> bool {
        !dump.scan_events().is_empty() || MARKERS.iter().any(|name| dump.has_map(name))
    }

    fn render<R: SyscallResolver>(dump: &TraceDump, _: &mut SyscallNames<R>) -> Report {
        let mut report = Report::new();
        report.banner("PAGE FAULT vs KHUGEPAGED REPORT", 70);

        let total_faults = dump.scalar_or_zero("total_faults");
        let total_scans = dump.scalar_or_zero("total_scans");
        let events = dump.scan_events().len();

        report.section("Summary");
        report.push(format!(
            "  Total page faults (target PID): {:>12}",
            thousands(total_faults)
        ));
        report.push(format!(
            "  Total scans (all procs):        {:>12}",
            thousands(total_scans)
        ));
        if events > 0 {
            report.push(format!(
                "  Scan events recorded:           {:>12}",
                thousands(events as u64)
            ));
        }
        if total_scans > 0 {
            let avg = total_faults as f64 / total_scans as f64;
            report.push(format!(
                "  Avg faults per scan:            {:>12}",
                thousands_fixed(avg, 2)
            ));
        }

        if let Some(status) = dump.keyed("scan_status").filter(|m| !m.is_empty()) {
            report.section("Scan Status (All Processes)");
            report.push(format!("  {:<30} {:>10}", "STATUS", "COUNT"));
            report.push(format!("  {}", "-".repeat(42)));
            for (code, count) in rows_by_count(status) {
                report.push(format!(
                    "  {:<30} {:>10}",
                    SCAN_STATUS.name(code),
                    thousands(count)
                ));
            }
        }

        if let Some(hist) = Self::faults_per_scan(dump).filter(|h| !h.is_empty()) {
            report.section("Faults Between Any Scan");
            report.histogram(&hist, HistogramStyle::new("    ", 20, 10), size_label);
        }

        report
    }
}
