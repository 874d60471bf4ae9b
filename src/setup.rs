//! The one-time setup block used by helper-style breakpoints.
//!
//! The block binds `_breakpoint` to a debugger entry point. It is injected
//! after the module's leading imports, located with a tolerant tree-sitter
//! parse; when the file has a syntax error the parse is retried on the text
//! above the error.

use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use crate::buffer::Region;

/// Exact text of the setup block, matched and removed as a literal.
pub const SETUP_BLOCK: &str = "\
try:  # breakpoint helper
    from ipdb import set_trace as _breakpoint
except ImportError:
    from pdb import set_trace as _breakpoint
";

const MAX_ATTEMPTS: usize = 5;

const IMPORT_KINDS: [&str; 3] = [
    "import_statement",
    "import_from_statement",
    "future_import_statement",
];

/// Offset at which the setup block should be inserted.
///
/// Prefers the first statement after the leading imports, then the last
/// leading import, then the first statement. Returns `None` when no
/// statement is found within the retry budget.
///
/// # Examples
///
/// ```
/// use pybreakpoints::setup::locate_injection_point;
///
/// let source = "import os\n\nprint(os.sep)\n";
/// assert_eq!(locate_injection_point(source), Some(11));
/// ```
#[must_use]
pub fn locate_injection_point(source: &str) -> Option<usize> {
    let mut parser = Parser::new();
    if let Err(err) = parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
        warn!(%err, "python grammar unavailable");
        return None;
    }

    let mut window = source;
    for attempt in 1..=MAX_ATTEMPTS {
        match preferred_row(&mut parser, window) {
            Ok(row) => return row.map(|r| line_start(source, r)),
            Err(error_row) => {
                let keep = error_row.saturating_sub(1);
                debug!(attempt, error_row, keep, "syntax error; retrying on shorter prefix");
                window = &source[..line_start(source, keep).min(window.len())];
            }
        }
    }
    debug!("no injection point after {MAX_ATTEMPTS} attempts");
    None
}

/// Parse `text` and pick the preferred row, or report the first error row.
fn preferred_row(parser: &mut Parser, text: &str) -> Result<Option<usize>, usize> {
    let last_row = text.lines().count();
    let Some(tree) = parser.parse(text, None) else {
        return Err(last_row);
    };
    let root = tree.root_node();
    if root.has_error() {
        return Err(first_error_row(root));
    }

    let mut first = None;
    let mut import = None;
    let mut after_imports = None;
    let mut cursor = root.walk();
    for node in root
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
    {
        let row = node.start_position().row;
        if first.is_none() {
            first = Some(row);
        }
        if IMPORT_KINDS.contains(&node.kind()) {
            import = Some(row);
        } else if import.is_some() {
            after_imports = Some(row);
            break;
        }
    }
    Ok(after_imports.or(import).or(first))
}

/// Row of the first error or missing node in document order.
fn first_error_row(root: Node<'_>) -> usize {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_error() || node.is_missing() {
            return node.start_position().row;
        }
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return root.end_position().row;
            }
        }
    }
}

/// Byte offset at which zero-based `row` starts, or the end of `text`.
fn line_start(text: &str, row: usize) -> usize {
    if row == 0 {
        return 0;
    }
    text.match_indices('\n')
        .nth(row - 1)
        .map_or(text.len(), |(idx, _)| idx + 1)
}

/// Location of the setup block literal, if the file contains it.
#[must_use]
pub fn find_setup_block(text: &str) -> Option<Region> {
    text.find(SETUP_BLOCK)
        .map(|start| Region::new(start, start + SETUP_BLOCK.len()))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::after_imports("import os\nimport sys\n\nmain()\n", Some(22))]
    #[case::only_imports("import os\nfrom sys import argv\n", Some(10))]
    #[case::no_imports("x = 1\ny = 2\n", Some(0))]
    #[case::docstring_first("\"\"\"Doc.\"\"\"\nfrom __future__ import annotations\nimport os\nrun()\n", Some(56))]
    #[case::leading_comment("# header\nimport os\nrun()\n", Some(19))]
    #[case::empty("", None)]
    #[case::comments_only("# nothing here\n", None)]
    fn picks_preferred_statement(#[case] source: &str, #[case] expected: Option<usize>) {
        assert_eq!(locate_injection_point(source), expected);
    }

    #[test]
    fn recovers_from_syntax_error_below_prefix() {
        let source = "import os\nimport sys\nvalue = os.getcwd()\nprint(value)\ndef broken(:\n    pass\n";
        assert_eq!(locate_injection_point(source), Some(21));
    }

    #[test]
    fn gives_up_when_nothing_parses() {
        assert_eq!(locate_injection_point("def broken(:\n    pass\n"), None);
    }

    #[test]
    fn line_start_clamps_to_end() {
        assert_eq!(line_start("a\nb\n", 0), 0);
        assert_eq!(line_start("a\nb\n", 1), 2);
        assert_eq!(line_start("a\nb\n", 2), 4);
        assert_eq!(line_start("a\nb\n", 9), 4);
    }

    #[test]
    fn finds_literal_block() {
        let text = format!("import os\n{SETUP_BLOCK}run()\n");
        let region = find_setup_block(&text).unwrap();
        assert_eq!(region.start, 10);
        assert_eq!(&text[region.start..region.end], SETUP_BLOCK);
        assert!(find_setup_block("import os\n").is_none());
    }
}
