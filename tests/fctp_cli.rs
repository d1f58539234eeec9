use std::process::Command;

fn run_fctp(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_fctp"))
        .args(args)
        .output()
        .expect("failed to run fctp");
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
        output.status.code().unwrap_or(1),
    )
}

#[test]
fn test_help() {
    let (out, _, code) = run_fctp(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("Usage"));
}

#[test]
fn test_three_blocks() {
    let (out, _, code) = run_fctp(&["-n", "3", "-p", "1"]);
    assert_eq!(code, 0);
    assert_eq!(out, "0 1 -1\n0 0 -1\n0 -1 -1\n");
}

#[test]
fn test_want_front() {
    let (out, _, code) = run_fctp(&["-n", "3", "-p", "1", "--want", "0,-1,-1"]);
    assert_eq!(code, 0);
    assert_eq!(out, "0 -1 -1\n0 1 -1\n0 0 -1\n");
}

#[test]
fn test_missing_wanted_fails() {
    let (out, err, code) = run_fctp(&["-n", "3", "-p", "1", "--want", "9,9,9"]);
    assert_eq!(code, 1);
    assert!(out.is_empty());
    assert!(err.contains("does not appear"));
}

#[test]
fn test_count() {
    let (out, _, code) = run_fctp(&["-n", "4", "-p", "2", "-c"]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "25");
}
