//! Integration tests for the `pybreakpoints` command-line interface.
//!
//! These cover reading from standard input, editing files in place, the
//! settings and override flags, and the listing commands.

use std::fs;

use tempfile::tempdir;

#[macro_use]
mod prelude;
use prelude::*;

const CLASSIC_LINE: &str = r"import pdb; pdb\.set_trace\(\)  # breakpoint [a-f0-9]{8} //";

fn cli() -> Command {
    Command::cargo_bin("pybreakpoints").expect("failed to create cargo command for pybreakpoints")
}

#[test]
fn test_cli_version_flag() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("pybreakpoints {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_toggle_from_stdin() {
    cli()
        .args(["toggle", "--line", "2"])
        .write_stdin("x = 1\ny = 2\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(format!("^x = 1\n{CLASSIC_LINE}\ny = 2\n$")).unwrap());
}

#[test]
fn test_cli_tab_size_override() {
    cli()
        .args(["--tab-size", "2", "toggle", "--line", "2"])
        .write_stdin("if x:\n")
        .assert()
        .success()
        .stdout(predicate::str::is_match(format!("^if x:\n  {CLASSIC_LINE}\n$")).unwrap());
}

#[test]
fn test_cli_debugger_override() {
    cli()
        .args(["--debugger", "ipdb", "toggle", "--line", "1"])
        .write_stdin("x = 1\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("import ipdb; ipdb.set_trace()  # breakpoint "));
}

#[rstest]
#[case::zero_line(&["toggle", "--line", "0"])]
#[case::in_place_without_file(&["toggle", "--line", "1", "--in-place"])]
#[case::list_without_files(&["list"])]
#[case::unknown_style(&["--style", "fancy", "toggle", "--line", "1"])]
fn test_cli_rejects_bad_arguments(#[case] args: &[&str]) {
    cli().args(args).write_stdin("x = 1\n").assert().failure();
}

#[test]
fn test_cli_toggle_in_place_round_trip() {
    let dir = tempdir().expect("failed to create temporary directory");
    let path = write_source(dir.path(), "app.py", "def f():\n    return 1\n");

    cli()
        .arg("toggle")
        .arg(&path)
        .args(["--line", "2", "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inserted"));
    let edited = fs::read_to_string(&path).expect("failed to read file");
    assert_eq!(breakpoint_rows(&edited), vec![1]);
    assert!(edited.starts_with("def f():\n    import pdb;"));

    cli()
        .arg("toggle")
        .arg(&path)
        .args(["--line", "2", "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));
    assert_eq!(
        fs::read_to_string(&path).expect("failed to read file"),
        "def f():\n    return 1\n"
    );
}

#[test]
fn test_cli_wraps_line_range() {
    cli()
        .args(["toggle", "--line", "1", "--end-line", "2"])
        .write_stdin("a = 1\nb = 2\nc = 3\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "try:\n    a = 1\n    b = 2\nexcept Exception as exc:\n    import pdb;",
        ))
        .stdout(predicate::str::ends_with("x //\nc = 3\n"));
}

#[test]
fn test_cli_settings_file_selects_helper_style() {
    let dir = tempdir().expect("failed to create temporary directory");
    let settings = write_source(dir.path(), "settings.json", r#"{"style": "helper"}"#);
    let path = write_source(dir.path(), "app.py", "import os\n\nrun()\n");

    cli()
        .arg("--settings")
        .arg(&settings)
        .arg("toggle")
        .arg(&path)
        .args(["--line", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("try:  # breakpoint helper\n"))
        .stdout(predicate::str::contains("_breakpoint()  # "));
}

#[test]
fn test_cli_save_on_toggle_writes_file() {
    let dir = tempdir().expect("failed to create temporary directory");
    let settings = write_source(dir.path(), "settings.json", r#"{"save_on_toggle": true}"#);
    let path = write_source(dir.path(), "app.py", "x = 1\n");

    cli()
        .arg("--settings")
        .arg(&settings)
        .arg("toggle")
        .arg(&path)
        .args(["--line", "1"])
        .assert()
        .success();
    assert_eq!(
        breakpoint_rows(&fs::read_to_string(&path).expect("failed to read file")),
        vec![0]
    );
}

#[test]
fn test_cli_reports_malformed_settings() {
    let dir = tempdir().expect("failed to create temporary directory");
    let settings = write_source(dir.path(), "settings.json", "{not json");
    cli()
        .arg("--settings")
        .arg(&settings)
        .args(["toggle", "--line", "1"])
        .write_stdin("x = 1\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings.json"));
}

#[test]
fn test_cli_skips_non_python_file() {
    let dir = tempdir().expect("failed to create temporary directory");
    let path = write_source(dir.path(), "notes.txt", "x = 1\n");
    cli()
        .arg("toggle")
        .arg(&path)
        .args(["--line", "1"])
        .assert()
        .success()
        .stdout("x = 1\n");
}

#[test]
fn test_cli_list() {
    let dir = tempdir().expect("failed to create temporary directory");
    let path = write_source(
        dir.path(),
        "app.py",
        "import pdb; pdb.set_trace()  # breakpoint 1234abcd //\nx = 1\n",
    );
    cli()
        .arg("list")
        .arg(&path)
        .assert()
        .success()
        .stdout(format!(
            "{}:\n  1: breakpoint 1234abcd //\n  2: x = 1\n",
            path.display()
        ));
}

#[test]
fn test_cli_highlights() {
    let dir = tempdir().expect("failed to create temporary directory");
    let path = write_source(
        dir.path(),
        "app.py",
        "import pdb; pdb.set_trace()  # breakpoint 1234abcd //\nx = 1\n",
    );
    cli()
        .arg("highlights")
        .arg(&path)
        .assert()
        .success()
        .stdout("bp-1234abcd 0 53 invalid circle\n");

    let settings = write_source(dir.path(), "settings.json", r#"{"gutter_icon": "", "highlight": "comment"}"#);
    cli()
        .arg("--settings")
        .arg(&settings)
        .arg("highlights")
        .arg(&path)
        .assert()
        .success()
        .stdout("bp-1234abcd 0 53 comment -\n");
}
