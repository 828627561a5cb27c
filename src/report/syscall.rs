use super::{HistogramStyle, Profile, Report, size_label, thousands, thousands_fixed};
use crate::dump::TraceDump;
use crate::histogram::Histogram;
use crate::names::{SyscallNames, SyscallResolver};
use crate::parsers::numeric_key_pair;
use crate::tracing;

use std::collections::BTreeMap;

/// Total ns per `[nr, tid]`.
const TOTALS: &str = "cns";
/// Latency histogram per `[nr, tid]`.
const LATENCIES: &str = "ns";

#[derive(Debug, Default)]
struct ThreadStats {
    total_ns: u64,
    latency: Histogram,
}

/// Per-thread syscall latency of one traced process.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Syscall;

impl Syscall {
    /// Syscall name -> thread id -> stats, both levels sorted.
    fn collect<R: SyscallResolver>(
        dump: &TraceDump,
        syscalls: &mut SyscallNames<R>,
    ) -> BTreeMap<String, BTreeMap<u64, ThreadStats>> {
        let mut by_name: BTreeMap<String, BTreeMap<u64, ThreadStats>> = BTreeMap::new();

        if let Some(totals) = dump.keyed(TOTALS) {
            for (key, ns) in totals.iter() {
                let Some((nr, tid)) = numeric_key_pair(key) else {
                    tracing::debug!(key = key.as_str(), "ignoring non-numeric @cns key");
                    continue;
                };
                let stats = by_name
                    .entry(syscalls.name(nr))
                    .or_default()
                    .entry(tid)
                    .or_default();
                stats.total_ns = stats.total_ns.saturating_add(*ns);
            }
        }

        if let Some(hists) = dump.histograms_named(LATENCIES) {
            for (key, hist) in hists.iter().filter(|(_, hist)| !hist.is_empty()) {
                let Some((nr, tid)) = numeric_key_pair(key) else {
                    tracing::debug!(key = key.as_str(), "ignoring non-numeric @ns key");
                    continue;
                };
                by_name
                    .entry(syscalls.name(nr))
                    .or_default()
                    .entry(tid)
                    .or_default()
                    .latency
                    .merge(hist);
            }
        }

        by_name
    }
}

impl Profile for Syscall {
    fn detect(dump: &TraceDump) -> bool {
        dump.has_map(TOTALS) || dump.has_map(LATENCIES)
    }

    fn render<R: SyscallResolver>(dump: &TraceDump, syscalls: &mut SyscallNames<R>) -> Report {
        let mut report = Report::new();
        report.push("--- Syscall Latency Report ---");

        for (name, threads) in Self::collect(dump, syscalls) {
            report.blank();
            report.banner(&format!("Syscall: {name}"), 60);

            for (idx, (tid, stats)) in threads.iter().enumerate() {
                if idx > 0 {
                    report.blank();
                }
                let total_ms = stats.total_ns as f64 / 1_000_000.0;

                report.push(format!("\tThread ID: {tid}"));
                report.push(format!(
                    "\t\tTotal Invocations: {}",
                    thousands(stats.latency.total())
                ));
                report.push(format!(
                    "\t\tTotal Time: {} ns ({} ms)",
                    thousands(stats.total_ns),
                    thousands_fixed(total_ms, 3)
                ));

                if !stats.latency.is_empty() {
                    report.push("\t\tLatency Histogram (ns):");
                    report.histogram(
                        &stats.latency,
                        HistogramStyle::new("\t\t\t", 20, 10),
                        size_label,
                    );
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver(nr: u64) -> Option<String> {
        match nr {
            0 => Some("read".to_string()),
            1 => Some("write".to_string()),
            _ => None,
        }
    }

    fn render(input: &str) -> Vec<String> {
        let dump = TraceDump::parse(input);
        let mut names = SyscallNames::new(resolver as fn(u64) -> Option<String>);
        Syscall::render(&dump, &mut names).lines().to_vec()
    }

    #[test]
    fn grouped_by_name_then_thread() {
        let lines = render(
            "@cns[1, 200]: 5000000
@cns[1, 30]: 1500
@cns[0, 30]: 10

@ns[1, 30]:
[512, 1K)              3 |@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@@|
[1K, 2K)               1 |@@@@@@@@@@@@@@@@@                                   |
",
        );
        assert_eq!(
            lines,
            vec![
                "--- Syscall Latency Report ---".to_string(),
                String::new(),
                "=".repeat(60),
                "Syscall: read".to_string(),
                "=".repeat(60),
                "\tThread ID: 30".to_string(),
                "\t\tTotal Invocations: 0".to_string(),
                "\t\tTotal Time: 10 ns (0.000 ms)".to_string(),
                String::new(),
                "=".repeat(60),
                "Syscall: write".to_string(),
                "=".repeat(60),
                "\tThread ID: 30".to_string(),
                "\t\tTotal Invocations: 4".to_string(),
                "\t\tTotal Time: 1,500 ns (0.002 ms)".to_string(),
                "\t\tLatency Histogram (ns):".to_string(),
                format!("\t\t\t{:<20}{:<10} |{}", "[512, 1K)", "3", "█".repeat(40)),
                format!("\t\t\t{:<20}{:<10} |{}", "[1K, 2K)", "1", "█".repeat(13)),
                String::new(),
                "\tThread ID: 200".to_string(),
                "\t\tTotal Invocations: 0".to_string(),
                "\t\tTotal Time: 5,000,000 ns (5.000 ms)".to_string(),
            ]
        );
    }

    #[test]
    fn unresolved_numbers_fall_back() {
        let lines = render("@cns[999, 1]: 7\n");
        assert!(lines.contains(&"Syscall: syscall_999".to_string()));
    }

    #[test]
    fn non_numeric_keys_are_ignored() {
        let lines = render("@cns[open, 1]: 7\n");
        assert_eq!(lines.len(), 1);
    }
}
