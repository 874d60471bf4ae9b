//! Breakpoint statements: recognising, rendering and identifying them.
//!
//! Two statement styles exist. [`Style::Classic`] lines are self-contained
//! debugger imports that may carry a block marker when they live inside a
//! try/except guard. [`Style::Helper`] lines call a `_breakpoint` name bound
//! once per file by the setup block (see [`crate::setup`]).

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

static CLASSIC_RE: LazyLock<Regex> = lazy_regex!(
    r"^[\t ]*import [\w.; ]+set_trace\(\)  # breakpoint ([a-f0-9]{8})([a-z]?) //",
    "valid classic breakpoint regex",
);

static HELPER_RE: LazyLock<Regex> = lazy_regex!(
    r"^[\t ]*_breakpoint\(\)  # ([a-f0-9]{8})",
    "valid helper breakpoint regex",
);

/// Suffix letter marking a classic breakpoint that sits inside a guard block.
const BLOCK_MARK: &str = "x";

/// Which statement grammar a breakpoint uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// `import pdb; pdb.set_trace()  # breakpoint <uid> //`
    #[default]
    Classic,
    /// `_breakpoint()  # <uid>` backed by a one-time setup block.
    Helper,
}

/// A breakpoint statement identified by its uid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub uid: String,
    pub in_block: bool,
    pub style: Style,
}

impl Breakpoint {
    /// Create a breakpoint with a fresh random uid.
    #[must_use]
    pub fn new(style: Style, in_block: bool) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self {
            uid: id[id.len() - 8..].to_string(),
            in_block,
            style,
        }
    }

    /// Recognise a breakpoint statement at the start of `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pybreakpoints::{Breakpoint, Style};
    ///
    /// let bp = Breakpoint::parse("    import pdb; pdb.set_trace()  # breakpoint 0badc0de x //")
    ///     .map(|bp| bp.uid);
    /// assert_eq!(bp, None);
    /// let bp = Breakpoint::parse("    import pdb; pdb.set_trace()  # breakpoint 0badc0dex //").unwrap();
    /// assert_eq!(bp.uid, "0badc0de");
    /// assert!(bp.in_block);
    /// assert_eq!(bp.style, Style::Classic);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if let Some(cap) = CLASSIC_RE.captures(text) {
            return Some(Self {
                uid: cap[1].to_string(),
                in_block: &cap[2] == BLOCK_MARK,
                style: Style::Classic,
            });
        }
        HELPER_RE.captures(text).map(|cap| Self {
            uid: cap[1].to_string(),
            in_block: false,
            style: Style::Helper,
        })
    }

    /// Byte length of the recognised statement at the start of `text`.
    #[must_use]
    pub fn match_len(text: &str) -> Option<usize> {
        CLASSIC_RE
            .find(text)
            .or_else(|| HELPER_RE.find(text))
            .map(|m| m.end())
    }

    /// Render the statement at `indent` columns, without a newline.
    #[must_use]
    pub fn render(&self, indent: usize, debugger: &str) -> String {
        let pad = " ".repeat(indent);
        match self.style {
            Style::Classic => {
                let mark = if self.in_block { BLOCK_MARK } else { "" };
                format!(
                    "{pad}import {debugger}; {debugger}.set_trace()  # breakpoint {uid}{mark} //",
                    uid = self.uid
                )
            }
            Style::Helper => format!("{pad}_breakpoint()  # {uid}", uid = self.uid),
        }
    }

    /// Name of the highlight region tracking this breakpoint.
    #[must_use]
    pub fn region_id(&self) -> String { format!("bp-{}", self.uid) }

    /// Short label used in breakpoint listings.
    #[must_use]
    pub fn summary(&self) -> String {
        match self.style {
            Style::Classic => {
                let mark = if self.in_block { BLOCK_MARK } else { "" };
                format!("breakpoint {}{mark} //", self.uid)
            }
            Style::Helper => format!("breakpoint {}", self.uid),
        }
    }
}

/// Whether `text` starts with a breakpoint statement of either style.
#[must_use]
pub fn is_breakpoint_line(text: &str) -> bool {
    CLASSIC_RE.is_match(text) || HELPER_RE.is_match(text)
}
