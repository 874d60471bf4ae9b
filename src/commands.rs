//! Toggle, goto, clear-all and highlight-restore commands.
//!
//! Each command reads the buffer, computes a list of edits against that
//! snapshot and applies them in one pass, so no offset is reused after the
//! text has changed.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    breakpoint::{Breakpoint, Style},
    buffer::{Buffer, Edit, Highlight, Region},
    classify::LogicalLine,
    error::Result,
    guard,
    indent::infer_indent,
    settings::Config,
    setup::{SETUP_BLOCK, find_setup_block, locate_injection_point},
};

/// Upper bound on removals performed by [`clear_all`].
pub const CLEAR_LIMIT: usize = 999;

/// Lines of context shown for each breakpoint, including its own line.
const GOTO_CONTEXT: usize = 3;

/// What the user has selected, in zero-based rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Cursor(usize),
    Lines { first: usize, last: usize },
}

/// Result of [`toggle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted { uid: String, cursor: usize },
    Wrapped { uid: String, cursor: usize },
    Removed { uid: String },
    Unchanged,
}

/// One entry of the breakpoint listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GotoItem {
    /// Where the cursor lands when the entry is chosen.
    pub offset: usize,
    /// `"<row>: <text>"` for the breakpoint and the code after it.
    pub lines: Vec<String>,
}

/// Insert or remove a breakpoint at the cursor, or wrap a selection.
///
/// A breakpoint on the cursor line, or failing that on the line above it,
/// is removed together with its guard when it sits inside one. Otherwise a new breakpoint is inserted above the
/// cursor line at the inferred indentation. A line selection is wrapped in a
/// guard; helper-style breakpoints have no guard form, so a selection then
/// toggles at its first line.
///
/// # Errors
/// Returns an error when a row lies outside the buffer.
pub fn toggle(buffer: &mut Buffer, selection: Selection, config: &Config) -> Result<Outcome> {
    match selection {
        Selection::Lines { first, last } if config.style == Style::Classic => {
            wrap_selection(buffer, first.min(last), first.max(last), config)
        }
        Selection::Lines { first, last } => toggle_line(buffer, first.min(last), config),
        Selection::Cursor(row) => toggle_line(buffer, row, config),
    }
}

fn toggle_line(buffer: &mut Buffer, row: usize, config: &Config) -> Result<Outcome> {
    for candidate in [Some(row), row.checked_sub(1)].into_iter().flatten() {
        let line = buffer.line(candidate)?;
        if let Some(bp) = Breakpoint::parse(buffer.substr(line)) {
            remove_breakpoint(buffer, candidate, &bp, config)?;
            return Ok(Outcome::Removed { uid: bp.uid });
        }
    }
    insert_breakpoint(buffer, row, config)
}

fn insert_breakpoint(buffer: &mut Buffer, row: usize, config: &Config) -> Result<Outcome> {
    let lines = LogicalLine::from_buffer(buffer, config.tab_size);
    let line_start = buffer.line(row)?.start;
    let Some(indent) = infer_indent(&lines, row, config.tab_size) else {
        return Ok(Outcome::Unchanged);
    };

    let bp = Breakpoint::new(config.style, false);
    let mut edits = Vec::with_capacity(3);
    let mut stale_setup = None;
    if config.style == Style::Helper {
        match find_setup_block(buffer.text()) {
            None => {
                let Some(at) = locate_injection_point(buffer.text()) else {
                    debug!(row, "no place for the setup block; not inserting");
                    return Ok(Outcome::Unchanged);
                };
                edits.push(Edit::insert(at.min(line_start), SETUP_BLOCK));
            }
            Some(setup) if setup.start < line_start && line_start < setup.end => {
                debug!(row, "target lies inside the setup block; not inserting");
                return Ok(Outcome::Unchanged);
            }
            // The call must come after the binding, so the block moves up.
            Some(setup) if setup.start >= line_start => {
                edits.push(Edit::insert(line_start, SETUP_BLOCK));
                stale_setup = Some(Edit::erase_exact(setup, SETUP_BLOCK));
            }
            Some(_) => {}
        }
    }
    edits.push(Edit::insert(
        line_start,
        format!("{}\n", bp.render(indent, &config.debugger)),
    ));
    edits.extend(stale_setup);
    buffer.apply(edits)?;

    let cursor = mark(buffer, &bp, indent, config);
    info!(uid = %bp.uid, row, indent, "inserted breakpoint");
    Ok(Outcome::Inserted { uid: bp.uid, cursor })
}

fn wrap_selection(buffer: &mut Buffer, first: usize, last: usize, config: &Config) -> Result<Outcome> {
    let Some(wrap) = guard::wrap(buffer, first, last, config)? else {
        return Ok(Outcome::Unchanged);
    };
    buffer.apply(wrap.edits)?;
    let cursor = mark(buffer, &wrap.breakpoint, wrap.indent, config);
    info!(uid = %wrap.breakpoint.uid, first, last, "wrapped selection");
    Ok(Outcome::Wrapped {
        uid: wrap.breakpoint.uid,
        cursor,
    })
}

/// Highlight a freshly inserted breakpoint and return the cursor offset.
fn mark(buffer: &mut Buffer, bp: &Breakpoint, indent: usize, config: &Config) -> usize {
    let found = breakpoints(buffer)
        .into_iter()
        .find(|(_, _, other)| other.uid == bp.uid);
    let Some((row, line, _)) = found else {
        return 0;
    };
    let region = buffer.full_line(row).unwrap_or(line);
    buffer.add_region(bp.region_id(), highlight(region, config));
    line.start + indent
}

fn highlight(region: Region, config: &Config) -> Highlight {
    Highlight {
        region,
        scope: config.highlight.clone(),
        icon: config.gutter_icon.clone(),
    }
}

fn remove_breakpoint(buffer: &mut Buffer, row: usize, bp: &Breakpoint, config: &Config) -> Result<()> {
    let mut edits = if bp.in_block {
        guard::unwind(buffer, row, config.tab_size)?
    } else {
        vec![Edit::erase(buffer.line_block(row, row)?)]
    };

    if bp.style == Style::Helper
        && !helper_remains(buffer, row)
        && let Some(setup) = find_setup_block(buffer.text())
    {
        edits = drop_setup_block(buffer, edits, setup);
    }

    buffer.apply(edits)?;
    buffer.erase_region(&bp.region_id());
    info!(uid = %bp.uid, row, "removed breakpoint");
    Ok(())
}

fn helper_remains(buffer: &Buffer, removed_row: usize) -> bool {
    breakpoints(buffer)
        .iter()
        .any(|(row, _, bp)| *row != removed_row && bp.style == Style::Helper)
}

/// Add the removal of the setup block to `edits`.
///
/// The block is erased as a checked literal unless another erase already
/// reaches into it, in which case the two ranges are removed together.
fn drop_setup_block(buffer: &Buffer, mut edits: Vec<Edit>, setup: Region) -> Vec<Edit> {
    let touching = edits
        .iter()
        .position(|e| e.offset < setup.end && setup.start < e.offset + e.delete);
    match touching {
        Some(idx) => {
            let e = &edits[idx];
            let merged = Region::new(e.offset.min(setup.start), (e.offset + e.delete).max(setup.end));
            let expected = buffer.substr(merged).to_string();
            edits[idx] = Edit::erase_exact(merged, expected);
        }
        None => edits.push(Edit::erase_exact(setup, SETUP_BLOCK)),
    }
    edits
}

/// Every breakpoint line as `(row, line region, record)`.
#[must_use]
pub fn breakpoints(buffer: &Buffer) -> Vec<(usize, Region, Breakpoint)> {
    buffer
        .lines()
        .into_iter()
        .enumerate()
        .filter_map(|(row, line)| Breakpoint::parse(buffer.substr(line)).map(|bp| (row, line, bp)))
        .collect()
}

/// List every breakpoint with up to two following code lines.
#[must_use]
pub fn goto_items(buffer: &Buffer) -> Vec<GotoItem> {
    let lines = buffer.lines();
    breakpoints(buffer)
        .into_iter()
        .map(|(row, line, _)| {
            let text = buffer.substr(line);
            let offset = line.start + Breakpoint::match_len(text).unwrap_or(text.len());
            let mut shown = Vec::with_capacity(GOTO_CONTEXT);
            for (r, region) in lines.iter().enumerate().skip(row) {
                let s = buffer.substr(*region);
                if s.trim().is_empty() {
                    continue;
                }
                let s = if r == row { s.trim() } else { s };
                let s = Breakpoint::parse(s).map_or_else(|| s.to_string(), |bp| bp.summary());
                shown.push(format!("{}: {s}", r + 1));
                if shown.len() >= GOTO_CONTEXT {
                    break;
                }
            }
            GotoItem {
                offset,
                lines: shown,
            }
        })
        .collect()
}

/// Remove every breakpoint, returning how many were removed.
///
/// # Errors
/// Returns an error if an edit cannot be applied.
pub fn clear_all(buffer: &mut Buffer, config: &Config) -> Result<usize> {
    let mut removed = 0;
    for _ in 0..CLEAR_LIMIT {
        let Some((row, _, bp)) = breakpoints(buffer).into_iter().next() else {
            break;
        };
        remove_breakpoint(buffer, row, &bp, config)?;
        removed += 1;
    }
    Ok(removed)
}

/// Highlight every breakpoint found in a freshly loaded buffer.
pub fn restore_highlights(buffer: &mut Buffer, config: &Config) -> usize {
    let found = breakpoints(buffer);
    for (_, line, bp) in &found {
        let len = Breakpoint::match_len(buffer.substr(*line)).unwrap_or(line.len());
        let region = Region::new(line.start, line.start + len);
        buffer.add_region(bp.region_id(), highlight(region, config));
    }
    found.len()
}

/// Whether a file should be handled as Python source.
#[must_use]
pub fn is_python(path: Option<&Path>, text: &str) -> bool {
    let by_extension = path
        .and_then(Path::extension)
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e, "py" | "pyw" | "pyi"));
    let by_shebang = text
        .lines()
        .next()
        .is_some_and(|l| l.starts_with("#!") && l.contains("python"));
    by_extension || by_shebang
}
