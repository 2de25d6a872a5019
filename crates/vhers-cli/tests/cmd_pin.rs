//! Integration tests for `vhers pin batch` and `vhers pin single`.
#![allow(clippy::expect_used)]

use std::collections::HashSet;
use std::io::Write as _;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Path to the compiled `vhers` binary.
fn vhers_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("vhers");
    path
}

fn stdout_lines(out: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&out.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

// ---------------------------------------------------------------------------
// pin batch
// ---------------------------------------------------------------------------

#[test]
fn batch_prints_distinct_default_pins() {
    let out = Command::new(vhers_bin())
        .args(["pin", "batch", "--quantity", "25"])
        .output()
        .expect("run vhers pin batch");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let pins = stdout_lines(&out);
    assert_eq!(pins.len(), 25);
    let distinct: HashSet<&String> = pins.iter().collect();
    assert_eq!(distinct.len(), 25);
    for pin in &pins {
        assert_eq!(pin.len(), 8, "pin: {pin}");
        assert!(
            pin.chars()
                .all(|c| "ABCDEFGHJKLMNPQRSTUVWXYZ23456789".contains(c)),
            "pin: {pin}"
        );
    }
}

#[test]
fn batch_json_lists_pins() {
    let out = Command::new(vhers_bin())
        .args(["pin", "batch", "-n", "3", "--length", "5", "--preset", "lowercase", "-f", "json"])
        .output()
        .expect("run vhers pin batch -f json");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    let pins = value["pins"].as_array().expect("pins array");
    assert_eq!(pins.len(), 3);
    for pin in pins {
        let pin = pin.as_str().expect("string");
        assert_eq!(pin.len(), 5);
        assert!(pin.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}

#[test]
fn batch_zero_quantity_exits_1() {
    let out = Command::new(vhers_bin())
        .args(["pin", "batch", "--quantity", "0"])
        .output()
        .expect("run vhers pin batch");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Quantity must be greater than 0"),
        "stderr: {stderr}"
    );
}

#[test]
fn batch_zero_length_exits_1() {
    let out = Command::new(vhers_bin())
        .args(["pin", "batch", "--quantity", "1", "--length", "0"])
        .output()
        .expect("run vhers pin batch");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("PIN must be of length 1 or greater"),
        "stderr: {stderr}"
    );
}

#[test]
fn batch_larger_than_keyspace_exits_1() {
    let out = Command::new(vhers_bin())
        .args(["pin", "batch", "-n", "5", "--length", "2", "--chars", "AB"])
        .output()
        .expect("run vhers pin batch");
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
}

// ---------------------------------------------------------------------------
// pin single
// ---------------------------------------------------------------------------

#[test]
fn single_avoids_pins_read_from_stdin() {
    let mut child = Command::new(vhers_bin())
        .args(["pin", "single", "--existing", "-", "--length", "1", "--chars", "AB"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn vhers pin single");
    child
        .stdin
        .as_mut()
        .expect("stdin")
        .write_all(b"A\n")
        .expect("write stdin");
    let out = child.wait_with_output().expect("wait");
    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert_eq!(stdout_lines(&out), vec!["B"]);
}

#[test]
fn single_claim_appends_to_existing_file() {
    let mut existing = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(existing, "A").expect("write");
    let out = Command::new(vhers_bin())
        .args(["pin", "single", "--claim", "--length", "1", "--chars", "AB", "--existing"])
        .arg(existing.path())
        .output()
        .expect("run vhers pin single --claim");
    assert!(out.status.success(), "exit code: {:?}", out.status.code());
    let text = std::fs::read_to_string(existing.path()).expect("read back");
    assert_eq!(text, "A\nB\n");
}

#[test]
fn single_on_full_keyspace_exits_1() {
    let mut existing = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(existing, "A\nB").expect("write");
    let out = Command::new(vhers_bin())
        .args(["pin", "single", "--length", "1", "--chars", "AB", "--existing"])
        .arg(existing.path())
        .output()
        .expect("run vhers pin single");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Could not find an unused PIN"), "stderr: {stderr}");
}

#[test]
fn single_with_missing_existing_file_exits_2() {
    let out = Command::new(vhers_bin())
        .args(["pin", "single", "--existing", "/no/such/pins.txt"])
        .output()
        .expect("run vhers pin single");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("file not found"), "stderr: {stderr}");
}

#[test]
fn single_with_empty_alphabet_exits_1() {
    let out = Command::new(vhers_bin())
        .args(["pin", "single", "--chars", ""])
        .output()
        .expect("run vhers pin single");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("Allowed characters must not be empty"),
        "stderr: {stderr}"
    );
}
