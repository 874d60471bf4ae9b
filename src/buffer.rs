//! In-memory stand-in for the host editor's text buffer.
//!
//! Lines are enumerated as half-open byte ranges, edits are collected against
//! a snapshot and applied in one pass that remaps every later offset, and
//! named highlight regions follow the text they cover.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{Error, Result};

/// Half-open byte range `[start, end)` into a [`Buffer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self { Self { start, end } }

    #[must_use]
    pub fn len(self) -> usize { self.end - self.start }

    #[must_use]
    pub fn is_empty(self) -> bool { self.start == self.end }
}

/// A persisted, coloured region as the host editor would draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub region: Region,
    pub scope: String,
    pub icon: Option<String>,
}

/// One splice against a buffer snapshot.
///
/// `offset` and `delete` refer to the snapshot the edit was computed from.
/// When `expect` is set, the deleted text must still read exactly `expect`
/// once the edit has been remapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub offset: usize,
    pub delete: usize,
    pub insert: String,
    pub expect: Option<String>,
}

impl Edit {
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            offset,
            delete: 0,
            insert: text.into(),
            expect: None,
        }
    }

    #[must_use]
    pub fn erase(region: Region) -> Self {
        Self {
            offset: region.start,
            delete: region.len(),
            insert: String::new(),
            expect: None,
        }
    }

    /// Erase `region`, verifying at apply time that it still holds `expected`.
    #[must_use]
    pub fn erase_exact(region: Region, expected: impl Into<String>) -> Self {
        Self {
            expect: Some(expected.into()),
            ..Self::erase(region)
        }
    }

    fn end(&self) -> usize { self.offset + self.delete }
}

/// Text plus the named highlight regions the host keeps alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Buffer {
    text: String,
    regions: BTreeMap<String, Highlight>,
}

impl Buffer {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            regions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn into_text(self) -> String { self.text }

    #[must_use]
    pub fn substr(&self, region: Region) -> &str { &self.text[region.start..region.end] }

    /// Every physical line, excluding its newline.
    ///
    /// A trailing newline produces a final empty line and an empty buffer has
    /// exactly one empty line.
    #[must_use]
    pub fn lines(&self) -> Vec<Region> {
        let mut out = Vec::new();
        let mut start = 0;
        for (idx, _) in self.text.match_indices('\n') {
            out.push(Region::new(start, idx));
            start = idx + 1;
        }
        out.push(Region::new(start, self.text.len()));
        out
    }

    /// Line `row` without its newline.
    ///
    /// # Errors
    /// Returns [`Error::RowOutOfRange`] when `row` does not exist.
    pub fn line(&self, row: usize) -> Result<Region> {
        let lines = self.lines();
        lines.get(row).copied().ok_or(Error::RowOutOfRange {
            row,
            count: lines.len(),
        })
    }

    /// Line `row` including its newline when it has one.
    ///
    /// # Errors
    /// Returns [`Error::RowOutOfRange`] when `row` does not exist.
    pub fn full_line(&self, row: usize) -> Result<Region> {
        let line = self.line(row)?;
        if line.end < self.text.len() {
            Ok(Region::new(line.start, line.end + 1))
        } else {
            Ok(line)
        }
    }

    /// Range that removes rows `first..=last` as whole lines.
    ///
    /// When the last row is not newline-terminated the newline before `first`
    /// is taken instead, so the removal leaves no stray line break behind.
    ///
    /// # Errors
    /// Returns [`Error::RowOutOfRange`] when either row does not exist.
    pub fn line_block(&self, first: usize, last: usize) -> Result<Region> {
        let lines = self.lines();
        let count = lines.len();
        let top = *lines
            .get(first)
            .ok_or(Error::RowOutOfRange { row: first, count })?;
        let bottom = *lines
            .get(last)
            .ok_or(Error::RowOutOfRange { row: last, count })?;
        if bottom.end < self.text.len() {
            Ok(Region::new(top.start, bottom.end + 1))
        } else if first > 0 {
            Ok(Region::new(lines[first - 1].end, bottom.end))
        } else {
            Ok(Region::new(top.start, bottom.end))
        }
    }

    /// Zero-based row containing `offset`.
    #[must_use]
    pub fn row_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.text.len());
        self.text.as_bytes()[..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
    }

    /// Apply edits computed against the current text.
    ///
    /// Edits are ordered stably by offset, so several insertions at the same
    /// offset land in the order given. Overlapping deletions are merged; any
    /// other overlap is rejected before the text is touched.
    ///
    /// # Errors
    /// Returns [`Error::OverlappingEdits`] or [`Error::EditOutOfBounds`] when
    /// the edit list cannot be applied to this snapshot.
    pub fn apply(&mut self, mut edits: Vec<Edit>) -> Result<()> {
        edits.sort_by_key(|e| e.offset);
        let edits = coalesce(edits)?;
        if let Some(bad) = edits
            .iter()
            .find(|e| e.end() > self.text.len() || !self.on_boundaries(e))
        {
            return Err(Error::EditOutOfBounds {
                offset: bad.offset,
                len: self.text.len(),
            });
        }

        let mut grown = 0;
        let mut shrunk = 0;
        for edit in edits {
            let start = edit.offset + grown - shrunk;
            let end = start + edit.delete;
            if let Some(expected) = edit.expect.as_deref() {
                let actual = &self.text[start..end];
                debug_assert_eq!(actual, expected, "stale edit at offset {start}");
                if actual != expected {
                    warn!(offset = start, "skipping edit whose target text moved");
                    continue;
                }
            }
            self.text.replace_range(start..end, &edit.insert);
            self.shift_regions(start, end, edit.insert.len());
            grown += edit.insert.len();
            shrunk += edit.delete;
        }
        Ok(())
    }

    fn on_boundaries(&self, edit: &Edit) -> bool {
        self.text.is_char_boundary(edit.offset) && self.text.is_char_boundary(edit.end())
    }

    fn shift_regions(&mut self, start: usize, end: usize, inserted: usize) {
        let map_start = |p: usize| {
            if p < start {
                p
            } else if p >= end {
                p - (end - start) + inserted
            } else {
                start
            }
        };
        let map_end = |p: usize| {
            if p <= start {
                p
            } else if p >= end {
                p - (end - start) + inserted
            } else {
                start
            }
        };
        for hl in self.regions.values_mut() {
            let new_start = map_start(hl.region.start);
            let new_end = map_end(hl.region.end).max(new_start);
            hl.region = Region::new(new_start, new_end);
        }
    }

    pub fn add_region(&mut self, id: impl Into<String>, highlight: Highlight) {
        self.regions.insert(id.into(), highlight);
    }

    pub fn erase_region(&mut self, id: &str) -> Option<Highlight> { self.regions.remove(id) }

    #[must_use]
    pub fn region(&self, id: &str) -> Option<&Highlight> { self.regions.get(id) }

    pub fn regions(&self) -> impl Iterator<Item = (&str, &Highlight)> {
        self.regions.iter().map(|(id, hl)| (id.as_str(), hl))
    }
}

fn coalesce(edits: Vec<Edit>) -> Result<Vec<Edit>> {
    let mut out: Vec<Edit> = Vec::with_capacity(edits.len());
    for edit in edits {
        if let Some(prev) = out.last_mut()
            && edit.offset < prev.end()
        {
            let both_plain_deletes = prev.insert.is_empty()
                && edit.insert.is_empty()
                && prev.expect.is_none()
                && edit.expect.is_none();
            if !both_plain_deletes {
                return Err(Error::OverlappingEdits(edit.offset));
            }
            prev.delete = prev.delete.max(edit.end() - prev.offset);
            continue;
        }
        out.push(edit);
    }
    Ok(out)
}
