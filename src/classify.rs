//! Lexical line classification.
//!
//! Block structure is recognised from leading keywords only; nothing here
//! parses expressions, so the classifier keeps working next to syntax errors.
//! The keyword sets are plain data so another indentation-sensitive dialect
//! can be described with a different [`Keywords`] value.

use std::sync::LazyLock;

use regex::Regex;

use crate::buffer::{Buffer, Region};

/// Keyword sets that drive block detection for one language.
#[derive(Debug, Clone, Copy)]
pub struct Keywords {
    /// Keywords that open a new indented block.
    pub openers: &'static [&'static str],
    /// Keywords that continue a preceding block at the same indent.
    pub continuers: &'static [&'static str],
    /// Line-comment marker.
    pub comment: &'static str,
}

pub const PYTHON: Keywords = Keywords {
    openers: &["class", "def", "if", "for", "try", "while", "with"],
    continuers: &["elif", "else", "except", "finally"],
    comment: "#",
};

/// Compiled matchers for a [`Keywords`] value.
#[derive(Debug)]
pub struct Classifier {
    opens: Regex,
    continues: Regex,
    opens_or_continues: Regex,
    comment: &'static str,
}

// The keyword must be followed by a colon or a space so that identifiers
// such as `ifconfig` or `tryhard` are not mistaken for block keywords.
fn keyword_regex(words: &[&str]) -> Regex {
    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"^[\t ]*({alternation})[: ]")).expect("valid keyword regex")
}

impl Classifier {
    /// # Panics
    /// Panics if a keyword produces an invalid pattern, which escaping rules
    /// out.
    #[must_use]
    pub fn new(keywords: &Keywords) -> Self {
        let all: Vec<&str> = keywords
            .openers
            .iter()
            .chain(keywords.continuers)
            .copied()
            .collect();
        Self {
            opens: keyword_regex(keywords.openers),
            continues: keyword_regex(keywords.continuers),
            opens_or_continues: keyword_regex(&all),
            comment: keywords.comment,
        }
    }

    /// Classify one line of raw text.
    #[must_use]
    pub fn classify(&self, text: &str, tab_size: usize) -> LineClass {
        let stripped = text.trim();
        LineClass {
            is_blank: stripped.is_empty(),
            is_comment: stripped.starts_with(self.comment),
            indent_width: indent_width(text, tab_size),
            leading_len: leading_len(text),
            opens_block: self.opens.is_match(text),
            continues_block: self.continues.is_match(text),
            opens_or_continues: self.opens_or_continues.is_match(text),
        }
    }
}

pub static PYTHON_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(|| Classifier::new(&PYTHON));

/// Derived properties of a single line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "each flag is an independent lexical property"
)]
pub struct LineClass {
    pub is_blank: bool,
    pub is_comment: bool,
    /// Leading whitespace in columns, a tab counting as `tab_size`.
    pub indent_width: usize,
    /// Leading whitespace in bytes, for offset arithmetic.
    pub leading_len: usize,
    pub opens_block: bool,
    pub continues_block: bool,
    pub opens_or_continues: bool,
}

/// Indentation width in columns.
///
/// # Examples
///
/// ```
/// use pybreakpoints::classify::indent_width;
/// assert_eq!(indent_width("\t  x", 4), 6);
/// assert_eq!(indent_width("   ", 4), 3);
/// ```
#[must_use]
pub fn indent_width(text: &str, tab_size: usize) -> usize {
    text.chars()
        .take_while(|c| c.is_whitespace())
        .fold(0, |acc, ch| acc + if ch == '\t' { tab_size } else { 1 })
}

/// Byte length of the leading whitespace.
#[must_use]
pub fn leading_len(text: &str) -> usize { text.len() - text.trim_start().len() }

/// A buffer line with its offsets and classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub row: usize,
    pub region: Region,
    pub text: &'a str,
    pub class: LineClass,
}

impl<'a> LogicalLine<'a> {
    #[must_use]
    pub fn new(row: usize, region: Region, text: &'a str, tab_size: usize) -> Self {
        Self {
            row,
            region,
            text,
            class: PYTHON_CLASSIFIER.classify(text, tab_size),
        }
    }

    /// Classify every line of `buffer`.
    #[must_use]
    pub fn from_buffer(buffer: &'a Buffer, tab_size: usize) -> Vec<Self> {
        buffer
            .lines()
            .into_iter()
            .enumerate()
            .map(|(row, region)| Self::new(row, region, buffer.substr(region), tab_size))
            .collect()
    }

    /// Neither blank nor comment-only.
    #[must_use]
    pub fn is_code(&self) -> bool { !self.class.is_blank && !self.class.is_comment }

    #[must_use]
    pub fn indent(&self) -> usize { self.class.indent_width }
}
