use super::{HistogramStyle, Profile, Report, size_label, thousands, thousands_fixed};
use crate::dump::TraceDump;
use crate::group::Consolidation;
use crate::names::{SyscallNames, SyscallResolver};

const TOTAL_RUNTIME: &str = "total_runtime";
const INVOCATIONS: &str = "invocations";

/// On-CPU time of kernel threads, folded into thread groups.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub struct Kthread;

impl Kthread {
    fn consolidate(dump: &TraceDump) -> Consolidation {
        let mut groups = Consolidation::new();
        if let Some(totals) = dump.keyed(TOTAL_RUNTIME) {
            for (thread, ns) in totals.iter() {
                groups.add_total(thread, *ns);
            }
        }
        if let Some(hists) = dump.histograms_named(INVOCATIONS) {
            for (thread, hist) in hists.iter().filter(|(thread, _)| !thread.is_empty()) {
                groups.add_histogram(thread, hist);
            }
        }
        groups
    }
}

impl Profile for Kthread {
    fn detect(dump: &TraceDump) -> bool {
        dump.has_map(TOTAL_RUNTIME) || dump.has_map(INVOCATIONS)
    }

    fn render<R: SyscallResolver>(dump: &TraceDump, _: &mut SyscallNames<R>) -> Report {
        let mut report = Report::new();
        report.push("--- Consolidated Kernel Thread On-CPU Time ---");

        let groups = Self::consolidate(dump);
        // a group needs a runtime entry to be listed; histogram-only threads
        // still count as members of a listed group
        for (base, group) in groups
            .sorted_by_name()
            .into_iter()
            .filter(|(_, group)| group.has_total())
        {
            let total_ns = group.total();
            let total_ms = total_ns as f64 / 1_000_000.0;

            report.blank();
            report.banner(
                &format!(" Thread Group: {base} ({} threads)", group.member_count()),
                40,
            );
            report.push(format!(
                "  Total Combined On-CPU Time: {} ns ({} ms)",
                thousands(total_ns),
                thousands_fixed(total_ms, 3)
            ));

            if !group.histogram().is_empty() {
                report.blank();
                report.push("  Combined On-CPU Duration Histogram:");
                report.histogram(
                    group.histogram(),
                    HistogramStyle::new("    ", 18, 10),
                    size_label,
                );
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> Vec<String> {
        let dump = TraceDump::parse(input);
        let mut names = SyscallNames::new(|_: u64| None::<String>);
        Kthread::render(&dump, &mut names).lines().to_vec()
    }

    #[test]
    fn groups_threads_by_base_name() {
        let lines = render(
            "@total_runtime[kworker/u4:0]: 1000000
@total_runtime[kworker/u4:1]: 2500000
@total_runtime[khugepaged]: 42

@invocations[kworker/u4:0]:
[1K, 2K)               4 |@@@@@@@@                                            |

@invocations[kworker/u4:1]:
[1K, 2K)               4 |@@@@@@@@                                            |
[2K, 4K)               2 |@@@@                                                |
",
        );
        assert_eq!(
            lines,
            vec![
                "--- Consolidated Kernel Thread On-CPU Time ---".to_string(),
                String::new(),
                "=".repeat(40),
                " Thread Group: khugepaged (1 threads)".to_string(),
                "=".repeat(40),
                "  Total Combined On-CPU Time: 42 ns (0.000 ms)".to_string(),
                String::new(),
                "=".repeat(40),
                " Thread Group: kworker (2 threads)".to_string(),
                "=".repeat(40),
                "  Total Combined On-CPU Time: 3,500,000 ns (3.500 ms)".to_string(),
                String::new(),
                "  Combined On-CPU Duration Histogram:".to_string(),
                format!("    {:<18}{:<10} |{}", "[1K, 2K)", "8", "█".repeat(40)),
                format!("    {:<18}{:<10} |{}", "[2K, 4K)", "2", "█".repeat(10)),
            ]
        );
    }

    #[test]
    fn histogram_only_groups_are_not_listed() {
        let lines = render(
            "@invocations[ksoftirqd/0]:
[4, 8)                 1 |@@@@|
",
        );
        assert_eq!(
            lines,
            vec!["--- Consolidated Kernel Thread On-CPU Time ---".to_string()]
        );
    }

    #[test]
    fn histogram_only_threads_join_listed_groups() {
        let lines = render(
            "@total_runtime[kworker/u4:0]: 0

@invocations[kworker/u8:1]:
[4, 8)                 1 |@@@@|
",
        );
        assert!(lines.contains(&" Thread Group: kworker (2 threads)".to_string()));
        assert!(lines.contains(&"  Total Combined On-CPU Time: 0 ns (0.000 ms)".to_string()));
        assert!(lines.contains(&"  Combined On-CPU Duration Histogram:".to_string()));
    }

    #[test]
    fn empty_dump_has_only_title() {
        assert_eq!(render("").len(), 1);
    }
}
