//! Tests for clearing several files in parallel.

use std::fs;

use tempfile::tempdir;

#[macro_use]
mod prelude;
use prelude::*;

fn with_breakpoints(i: usize) -> (String, String) {
    let clean = format!("value_{i} = {i}\nprint(value)\n");
    let dirty = format!(
        "import pdb; pdb.set_trace()  # breakpoint {i:08x} //\nvalue_{i} = {i}\n_breakpoint()  # {:08x}\nprint(value)\n",
        i + 100
    );
    (clean, dirty)
}

#[test]
fn test_cli_clear_stdin() {
    Command::cargo_bin("pybreakpoints")
        .expect("failed to create command")
        .arg("clear")
        .write_stdin(with_breakpoints(1).1)
        .assert()
        .success()
        .stdout(with_breakpoints(1).0);
}

#[test]
fn test_cli_clear_multiple_files_in_place() {
    let dir = tempdir().expect("failed to create temporary directory");
    let mut files = Vec::new();
    for i in 0..4 {
        let path = write_source(dir.path(), &format!("mod{i}.py"), &with_breakpoints(i).1);
        files.push(path);
    }

    let mut cmd = Command::cargo_bin("pybreakpoints").expect("failed to create command");
    cmd.args(["clear", "--in-place"]);
    for path in &files {
        cmd.arg(path);
    }
    let output = cmd.output().expect("failed to run command");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for (i, path) in files.iter().enumerate() {
        assert!(stdout.contains(&format!("{}: removed 2", path.display())));
        assert_eq!(
            fs::read_to_string(path).expect("failed to read file"),
            with_breakpoints(i).0
        );
    }
}

#[test]
fn test_cli_clear_missing_file_error() {
    let dir = tempdir().expect("failed to create temporary directory");
    let good = write_source(dir.path(), "good.py", &with_breakpoints(7).1);
    let missing = dir.path().join("missing.py");

    let output = Command::cargo_bin("pybreakpoints")
        .expect("failed to create command")
        .arg("clear")
        .arg(&good)
        .arg(&missing)
        .output()
        .expect("failed to run command");

    assert!(!output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), with_breakpoints(7).0);
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing.py"));
}
