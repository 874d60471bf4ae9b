//! Utility helpers shared across integration tests.
#![allow(dead_code, unused_macros)]

use std::{
    fs,
    path::{Path, PathBuf},
};

/// Build Python source text from lines, each terminated by a newline.
///
/// This keeps multi-line fixtures readable without embedding `\n` in every
/// string literal.
macro_rules! py_source {
    ($($line:expr),+ $(,)?) => {
        [$($line),+]
            .iter()
            .map(|line| format!("{line}\n"))
            .collect::<String>()
    };
}

/// Write `text` to `name` inside `dir` and return the full path.
pub fn write_source(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).expect("failed to write fixture file");
    path
}

/// Zero-based rows of `text` that hold a breakpoint statement.
pub fn breakpoint_rows(text: &str) -> Vec<usize> {
    pybreakpoints::commands::breakpoints(&pybreakpoints::Buffer::new(text))
        .into_iter()
        .map(|(row, _, _)| row)
        .collect()
}
