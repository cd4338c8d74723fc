//! Caret-relative insertion and formula placeholder navigation.

use std::ops::Range;

use super::splice::{SpliceError, splice};

/// Placeholder slot used by formula templates (`\frac{\square}{\square}`).
pub const PLACEHOLDER: &str = "\\square";

/// Buffer and caret after an insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    pub text: String,
    /// Caret right after the inserted text
    pub caret: usize,
    /// First placeholder inside the inserted text, selected for typing
    pub selection: Option<Range<usize>>,
}

/// Insert `text` at `caret`.
pub fn insert_at_caret(buffer: &str, caret: usize, text: &str) -> Result<Insertion, SpliceError> {
    replace_selection(buffer, caret..caret, text)
}

/// Replace the selected range with `text` (insert when the range is empty).
pub fn replace_selection(
    buffer: &str,
    selection: Range<usize>,
    text: &str,
) -> Result<Insertion, SpliceError> {
    let start = selection.start;
    let spliced = splice(buffer, start, selection.end, text)?;
    let placeholder = text
        .find(PLACEHOLDER)
        .map(|idx| start + idx..start + idx + PLACEHOLDER.len());
    Ok(Insertion {
        text: spliced,
        caret: start + text.len(),
        selection: placeholder,
    })
}

/// Next placeholder at or after `from`.
pub fn next_placeholder(buffer: &str, from: usize) -> Option<Range<usize>> {
    let from = from.min(buffer.len());
    buffer
        .get(from..)?
        .find(PLACEHOLDER)
        .map(|idx| from + idx..from + idx + PLACEHOLDER.len())
}

/// Last placeholder that starts before `before`.
pub fn prev_placeholder(buffer: &str, before: usize) -> Option<Range<usize>> {
    let mut limit = (before.saturating_sub(1) + PLACEHOLDER.len()).min(buffer.len());
    while !buffer.is_char_boundary(limit) {
        limit -= 1;
    }
    buffer
        .get(..limit)?
        .rfind(PLACEHOLDER)
        .filter(|idx| *idx < before)
        .map(|idx| idx..idx + PLACEHOLDER.len())
}
