//! Indentation inference for inserted statements.
//!
//! Given classified lines and a target row, [`infer_indent`] decides at
//! which column a statement inserted *before* the target line has to start.
//! Only the nearest code lines above and below take part; blank and
//! comment-only lines are skipped, but the raw byte distance they span is
//! kept as a proximity signal.

use tracing::debug;

use crate::{
    breakpoint::is_breakpoint_line,
    buffer::Region,
    classify::{LineClass, LogicalLine},
};

/// Distance used when there is no real line below the target.
const NO_NEXT_DISTANCE: isize = 0xff;

/// Which decision produced an indent candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    AfterBlockHeader,
    BeforeBlockHeader,
    BeforeContinuation,
    InsideHeaderLine,
    Nearest,
}

/// Compute the indentation for a statement inserted at `target`.
///
/// Returns `None` when the candidate would sit directly next to an existing
/// breakpoint at the same level.
///
/// # Examples
///
/// ```
/// use pybreakpoints::{Buffer, classify::LogicalLine, indent::infer_indent};
///
/// let buffer = Buffer::new("def f():\n");
/// let lines = LogicalLine::from_buffer(&buffer, 4);
/// assert_eq!(infer_indent(&lines, 1, 4), Some(4));
/// ```
#[must_use]
pub fn infer_indent(lines: &[LogicalLine<'_>], target: usize, tab_size: usize) -> Option<usize> {
    let filtered: Vec<&LogicalLine<'_>> = lines
        .iter()
        .filter(|l| l.row == target || l.is_code())
        .collect();
    let last = filtered.len().checked_sub(1)?;
    let ln = filtered
        .iter()
        .position(|l| l.row == target)
        .unwrap_or_else(|| last.saturating_sub(1));

    let sentinel = LogicalLine {
        row: 0,
        region: Region::default(),
        text: "",
        class: LineClass {
            is_blank: true,
            ..LineClass::default()
        },
    };
    let curr = filtered[ln];
    let prev = if ln == 0 { &sentinel } else { filtered[ln - 1] };
    let next = filtered.get(ln + 1).copied();

    let prev_dist = distance(prev.region.end, curr.region.start);
    let next_dist = match next {
        Some(n) => match distance(curr.region.end, n.region.start) {
            d if d < 0 => NO_NEXT_DISTANCE,
            d => d,
        },
        None => NO_NEXT_DISTANCE,
    };
    let next = next.unwrap_or(curr);
    debug!(prev_dist, next_dist, "line distances");
    debug!(
        prev = prev.indent(),
        curr = curr.indent(),
        next = next.indent(),
        "line indents"
    );

    let (rule, indent) = if prev.class.opens_or_continues {
        let indent = if prev_dist < next_dist {
            prev.indent() + tab_size
        } else {
            curr.indent()
        };
        (Rule::AfterBlockHeader, indent)
    } else if curr.class.opens_block {
        let indent = if prev_dist < next_dist {
            prev.indent()
        } else {
            curr.indent()
        };
        (Rule::BeforeBlockHeader, indent)
    } else if next.class.continues_block {
        let indent = if prev_dist <= next_dist {
            curr.indent()
        } else {
            next.indent()
        };
        (Rule::BeforeContinuation, indent)
    } else if curr.class.opens_or_continues {
        (Rule::InsideHeaderLine, curr.indent() + tab_size)
    } else if !curr.class.is_blank {
        (Rule::Nearest, curr.indent())
    } else if prev_dist <= next_dist {
        (Rule::Nearest, prev.indent())
    } else {
        (Rule::Nearest, next.indent())
    };
    debug!(?rule, indent, "indent candidate");

    let beside_prev = indent == prev.indent() && is_breakpoint_line(prev.text);
    let beside_next =
        indent == next.indent() && is_breakpoint_line(next.text) && curr.class.is_blank;
    if beside_prev || beside_next {
        debug!("candidate sits next to an existing breakpoint");
        return None;
    }
    Some(indent)
}

fn distance(from: usize, to: usize) -> isize {
    if to >= from {
        isize::try_from(to - from).unwrap_or(isize::MAX)
    } else {
        isize::try_from(from - to).map_or(isize::MIN, |d| -d)
    }
}
