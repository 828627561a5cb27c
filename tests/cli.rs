use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

fn bpfreport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bpfreport"))
        .args(args)
        // keep syscall names deterministic and logs quiet
        .env("PATH", "")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn trace_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn overwrites_input_with_report() {
    let file = trace_file("@total_faults: 100\n@scan_status[1]: 5\n@scan_status[0]: 3\n");
    let output = bpfreport(&[path_arg(file.path())]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        format!("Success: Report written to '{}'.\n", file.path().display())
    );

    let report = fs::read_to_string(file.path()).unwrap();
    assert!(report.contains("PAGE FAULT vs KHUGEPAGED REPORT"));
    assert!(report.find("SUCCEED").unwrap() < report.find("FAIL ").unwrap());
}

#[test]
fn missing_file_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    let output = bpfreport(&[path_arg(&missing)]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("File not found at"));
    assert!(!missing.exists());
}

#[test]
fn invalid_utf8_still_reports() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"@total_faults: 100\n@pages_by_comm[bad\xffcomm]: 3\n@scan_status[1]: 5\n")
        .unwrap();
    let output = bpfreport(&[path_arg(file.path())]);

    assert_eq!(output.status.code(), Some(0));
    let report = fs::read_to_string(file.path()).unwrap();
    assert!(report.contains("PAGE FAULT vs KHUGEPAGED REPORT"));
    assert!(report.contains("SUCCEED"));
}

// readable, but procfs rejects the write
#[cfg(target_os = "linux")]
#[test]
fn write_failure_exits_with_error() {
    let output = bpfreport(&["/proc/self/cmdline"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error: Could not write to file '/proc/self/cmdline'"));
}

#[test]
fn wrong_argument_count() {
    assert_eq!(bpfreport(&[]).status.code(), Some(1));

    let file = trace_file("@n: 1\n");
    let output = bpfreport(&[path_arg(file.path()), "extra"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "@n: 1\n");
}

#[test]
fn unknown_flag_and_profile() {
    let file = trace_file("@n: 1\n");
    assert_eq!(
        bpfreport(&["--bogus", path_arg(file.path())]).status.code(),
        Some(1)
    );
    assert_eq!(
        bpfreport(&["--profile", "nope", path_arg(file.path())])
            .status
            .code(),
        Some(1)
    );
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "@n: 1\n");
}

#[test]
fn help_and_version_succeed() {
    let help = bpfreport(&["--help"]);
    assert_eq!(help.status.code(), Some(0));
    let usage = String::from_utf8(help.stdout).unwrap();
    assert!(usage.contains("--profile"));

    assert_eq!(bpfreport(&["--version"]).status.code(), Some(0));
}

#[test]
fn stdout_mode_leaves_file_alone() {
    let input = "@cns[0, 12]: 2048\n@ns[0, 12]:\n[1K, 2K) 2\n";
    let file = trace_file(input);
    let output = bpfreport(&["--stdout", path_arg(file.path())]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("--- Syscall Latency Report ---\n"));
    // no ausyscall on an empty PATH
    assert!(stdout.contains("Syscall: syscall_0"));
    assert_eq!(fs::read_to_string(file.path()).unwrap(), input);
}

#[test]
fn forced_profile() {
    let file = trace_file("@alloc_count: 3\n");
    let output = bpfreport(&["--profile", "generic", "--stdout", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(0));
    assert!(
        String::from_utf8(output.stdout)
            .unwrap()
            .contains("BPFTRACE MAP REPORT")
    );
}

#[cfg(feature = "serde")]
#[test]
fn json_mode() {
    let file = trace_file("@n: 7\n");
    let output = bpfreport(&["--json", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(0));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["scalars"]["n"], 7);
    assert_eq!(fs::read_to_string(file.path()).unwrap(), "@n: 7\n");
}

#[test]
fn stdout_and_json_conflict() {
    let file = trace_file("@n: 7\n");
    let output = bpfreport(&["--json", "--stdout", path_arg(file.path())]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn elapsed_secs() {
    let output = Command::new(env!("CARGO_BIN_EXE_elapsed_secs"))
        .arg("2-01:23:45")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "177825\n");

    let output = Command::new(env!("CARGO_BIN_EXE_elapsed_secs"))
        .arg("1:2:3:4")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}
