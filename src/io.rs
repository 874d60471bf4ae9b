//! File helpers for running commands over Python sources on disk.

use std::{fs, path::Path};

use tracing::warn;

use crate::{
    buffer::Buffer,
    commands::{self, Outcome, Selection},
    error::Result,
    settings::Config,
};

fn read_source(path: &Path) -> Result<(String, bool)> {
    let text = fs::read_to_string(path)?;
    let python = commands::is_python(Some(path), &text);
    if !python {
        warn!(path = %path.display(), "not a Python source; skipping");
    }
    Ok((text, python))
}

/// Toggle a breakpoint in the file at `path`, returning the new text.
///
/// The file is rewritten only when `write` is set and the text changed.
/// Files that are not Python sources are returned untouched.
///
/// # Errors
/// Returns an error if reading or writing the file fails or the selection
/// lies outside it.
pub fn toggle_file(
    path: &Path,
    selection: Selection,
    config: &Config,
    write: bool,
) -> Result<(Outcome, String)> {
    let (text, python) = read_source(path)?;
    if !python {
        return Ok((Outcome::Unchanged, text));
    }
    let mut buffer = Buffer::new(text);
    let outcome = commands::toggle(&mut buffer, selection, config)?;
    let text = buffer.into_text();
    if write && outcome != Outcome::Unchanged {
        fs::write(path, &text)?;
    }
    Ok((outcome, text))
}

/// Remove every breakpoint from the file at `path`.
///
/// Returns the number removed and the resulting text; the file is rewritten
/// only when `write` is set and something was removed.
///
/// # Errors
/// Returns an error if reading or writing the file fails.
pub fn clear_file(path: &Path, config: &Config, write: bool) -> Result<(usize, String)> {
    let (text, python) = read_source(path)?;
    if !python {
        return Ok((0, text));
    }
    let mut buffer = Buffer::new(text);
    let removed = commands::clear_all(&mut buffer, config)?;
    let text = buffer.into_text();
    if write && removed > 0 {
        fs::write(path, &text)?;
    }
    Ok((removed, text))
}

/// Load the file at `path` and restore its breakpoint highlights.
///
/// Returns `None` for files that are not Python sources.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn load_buffer(path: &Path, config: &Config) -> Result<Option<Buffer>> {
    let (text, python) = read_source(path)?;
    if !python {
        return Ok(None);
    }
    let mut buffer = Buffer::new(text);
    commands::restore_highlights(&mut buffer, config);
    Ok(Some(buffer))
}
