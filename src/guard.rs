//! Try/except guard blocks around a selection.
//!
//! A guard has no stored identity: it is recognised again by scanning upward
//! from its breakpoint for the `except` line and then the `try:` line at the
//! same indentation.

use tracing::{debug, warn};

use crate::{
    breakpoint::{Breakpoint, Style},
    buffer::{Buffer, Edit, Region},
    classify::{LogicalLine, leading_len},
    error::{Error, Result},
    settings::Config,
};

pub const TRY_LINE: &str = "try:";
pub const EXCEPT_LINE: &str = "except Exception as exc:";

/// Edits that wrap a selection, plus the breakpoint they insert.
#[derive(Debug, Clone)]
pub struct Wrap {
    pub edits: Vec<Edit>,
    pub breakpoint: Breakpoint,
    /// Column of the inserted breakpoint statement.
    pub indent: usize,
}

/// Wrap rows `first..=last` in a guard with a breakpoint in its handler.
///
/// The guard takes the indentation of the first code line in the selection.
/// Returns `Ok(None)` when the selection holds only blank or comment lines.
///
/// # Errors
/// Returns [`Error::RowOutOfRange`] when the selection exceeds the buffer.
pub fn wrap(buffer: &Buffer, first: usize, last: usize, config: &Config) -> Result<Option<Wrap>> {
    let lines = LogicalLine::from_buffer(buffer, config.tab_size);
    let count = lines.len();
    let Some(selected) = lines.get(first..=last) else {
        return Err(Error::RowOutOfRange {
            row: last.max(first),
            count,
        });
    };
    let Some(base) = selected.iter().find(|l| l.is_code()).map(LogicalLine::indent) else {
        debug!(first, last, "selection has no code to wrap");
        return Ok(None);
    };

    let pad = " ".repeat(base);
    let unit = " ".repeat(config.tab_size);
    let breakpoint = Breakpoint::new(Style::Classic, true);
    let indent = base + config.tab_size;
    let statement = breakpoint.render(indent, &config.debugger);

    let mut edits = Vec::with_capacity(selected.len() + 2);
    edits.push(Edit::insert(selected[0].region.start, format!("{pad}{TRY_LINE}\n")));
    edits.extend(selected.iter().map(|l| Edit::insert(l.region.start, unit.clone())));

    let tail = selected[selected.len() - 1].region;
    if tail.end < buffer.text().len() {
        edits.push(Edit::insert(
            tail.end + 1,
            format!("{pad}{EXCEPT_LINE}\n{statement}\n"),
        ));
    } else {
        edits.push(Edit::insert(
            tail.end,
            format!("\n{pad}{EXCEPT_LINE}\n{statement}"),
        ));
    }

    Ok(Some(Wrap {
        edits,
        breakpoint,
        indent,
    }))
}

/// Edits that remove the in-block breakpoint on `row` and undo its guard.
///
/// Scanning upward, the first `except` line is removed, every line above it
/// loses one indent stop, and the `try:` line aligned with the `except` ends
/// the scan and is removed. When either line cannot be found only the
/// breakpoint itself is removed.
///
/// # Errors
/// Returns [`Error::RowOutOfRange`] when `row` does not exist.
pub fn unwind(buffer: &Buffer, row: usize, tab_size: usize) -> Result<Vec<Edit>> {
    let lines = buffer.lines();
    if row >= lines.len() {
        return Err(Error::RowOutOfRange {
            row,
            count: lines.len(),
        });
    }

    let mut except: Option<(usize, &str)> = None;
    let mut outdent = Vec::new();
    let mut try_row = None;
    for r in (0..row).rev() {
        let text = buffer.substr(lines[r]);
        match except {
            None => {
                if text.trim().starts_with(EXCEPT_LINE) {
                    except = Some((r, &text[..leading_len(text)]));
                }
            }
            Some((_, lead)) => {
                if text
                    .strip_prefix(lead)
                    .is_some_and(|rest| rest.starts_with(TRY_LINE))
                {
                    try_row = Some(r);
                    break;
                }
                outdent.push(r);
            }
        }
    }

    let (Some((except_row, _)), Some(try_row)) = (except, try_row) else {
        if except.is_some() {
            warn!(row, "guard has no matching try line; leaving it in place");
        }
        return Ok(vec![Edit::erase(buffer.line_block(row, row)?)]);
    };

    let mut edits = Vec::with_capacity(outdent.len() + 3);
    if except_row + 1 == row {
        edits.push(Edit::erase(buffer.line_block(except_row, row)?));
    } else {
        edits.push(Edit::erase(buffer.line_block(row, row)?));
        edits.push(Edit::erase(buffer.full_line(except_row)?));
    }
    for r in outdent {
        let line = lines[r];
        let n = leading_len(buffer.substr(line)).min(tab_size);
        if n > 0 {
            edits.push(Edit::erase(Region::new(line.start, line.start + n)));
        }
    }
    edits.push(Edit::erase(buffer.full_line(try_row)?));
    debug!(try_row, except_row, row, "unwinding guard block");
    Ok(edits)
}
