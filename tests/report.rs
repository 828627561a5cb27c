use bpfreport::{Config, Consolidator, ProfileKind, Report, TraceDump};
use insta::assert_snapshot;

fn syscall_name(nr: u64) -> Option<String> {
    let name = match nr {
        0 => "read",
        1 => "write",
        232 => "epoll_wait",
        _ => return None,
    };
    Some(name.to_string())
}

fn render(input: &str, expected: ProfileKind) -> Report {
    let dump = TraceDump::parse(input);
    assert_eq!(ProfileKind::Auto.resolve(&dump), expected);

    let mut consolidator = Consolidator::with_resolver(
        Config::default(),
        syscall_name as fn(u64) -> Option<String>,
    );
    consolidator.render(&dump)
}

#[test]
fn khugepaged_scan_events() {
    let input = include_str!("./fixtures/khugepaged.txt");
    let report = render(input, ProfileKind::Khugepaged);
    assert_snapshot!(report.to_string());
}

#[test]
fn khugepaged_histogram() {
    let input = include_str!("./fixtures/khugepaged_hist.txt");
    let report = render(input, ProfileKind::Khugepaged);
    assert_snapshot!(report.to_string());
}

#[test]
fn page_alloc() {
    let input = include_str!("./fixtures/page_alloc.txt");
    let report = render(input, ProfileKind::PageAlloc);
    assert_snapshot!(report.to_string());
}

#[test]
fn kthread() {
    let input = include_str!("./fixtures/kthread.txt");
    let report = render(input, ProfileKind::Kthread);
    assert_snapshot!(report.to_string());
}

#[test]
fn syscall() {
    let input = include_str!("./fixtures/syscall.txt");
    let report = render(input, ProfileKind::Syscall);
    assert_snapshot!(report.to_string());
}

#[test]
fn generic() {
    let input = include_str!("./fixtures/generic.txt");
    let report = render(input, ProfileKind::Generic);
    assert_snapshot!(report.to_string());
}

#[test]
fn status_summary_example() {
    let report = render(
        "@total_faults: 100\n@scan_status[1]: 5\n@scan_status[0]: 3\n",
        ProfileKind::Khugepaged,
    );
    let lines = report.lines();

    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("  Total page faults (target PID):") && l.ends_with(" 100"))
    );
    let succeed = lines.iter().position(|l| l.contains("SUCCEED")).unwrap();
    let fail = lines
        .iter()
        .position(|l| l.trim_start().starts_with("FAIL"))
        .unwrap();
    assert!(succeed < fail);
}

#[test]
fn histogram_bars_scale_to_largest_bucket() {
    let report = render(
        "@hist_faults_per_scan:\n[4, 8) 10\n[8, 16) 5\n",
        ProfileKind::Khugepaged,
    );
    let rows: Vec<&String> = report
        .lines()
        .iter()
        .filter(|l| l.starts_with("    ["))
        .collect();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("    [4, 8)"));
    assert!(rows[1].starts_with("    [8, 16)"));
    let bar = |row: &str| row.chars().filter(|&c| c == '█').count();
    assert_eq!(bar(rows[0]), 40);
    assert_eq!(bar(rows[1]), 20);
}

#[test]
fn rendering_is_deterministic() {
    let input = include_str!("./fixtures/page_alloc.txt");
    let first = render(input, ProfileKind::PageAlloc);
    let second = render(input, ProfileKind::PageAlloc);
    assert_eq!(first, second);
}

#[test]
fn every_profile_renders_every_fixture() {
    let fixtures = [
        include_str!("./fixtures/khugepaged.txt"),
        include_str!("./fixtures/khugepaged_hist.txt"),
        include_str!("./fixtures/page_alloc.txt"),
        include_str!("./fixtures/kthread.txt"),
        include_str!("./fixtures/syscall.txt"),
        include_str!("./fixtures/generic.txt"),
    ];
    let profiles = ProfileKind::NAMES.map(|name| name.parse::<ProfileKind>().unwrap());

    for input in fixtures {
        for profile in profiles {
            let mut consolidator = Consolidator::with_resolver(
                Config::default().with_profile(profile),
                syscall_name as fn(u64) -> Option<String>,
            );
            let report = consolidator.render_str(input);
            assert!(!report.is_empty(), "{profile} rendered nothing");
        }
    }
}
