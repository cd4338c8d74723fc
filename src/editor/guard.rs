//! Protection of expressions against partial edits in the raw source.
//!
//! Deleting a single character of `$\frac{a}{b}$` leaves a broken formula,
//! so keystrokes that land inside an expression are redirected: typing
//! opens the formula editor, deletion removes the whole expression.

use std::ops::Range;

use crate::document::{Document, EditRequest, Token};

/// Keystroke classes the guard distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKey {
    /// A printable character without Ctrl/Alt/Meta
    Char(char),
    Backspace,
    Delete,
    /// Anything else (navigation, shortcuts)
    Other,
}

impl GuardKey {
    const fn is_deletion(self) -> bool {
        matches!(self, Self::Backspace | Self::Delete)
    }
}

/// What the host should do with the keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Let the keystroke through unchanged
    Allow,
    /// Open the formula editor on this expression instead
    Activate(EditRequest),
    /// Replace the buffer and move the caret
    Replace { text: String, caret: usize },
}

/// Decide how a keystroke at `selection` interacts with expressions.
///
/// An empty selection is a caret. A caret sitting exactly on an
/// expression's boundary is not inside it.
pub fn guard_key(doc: &Document, selection: Range<usize>, key: GuardKey) -> GuardOutcome {
    let source = doc.source();
    let (start, end) = (selection.start, selection.end);

    let inside = doc.math_containing(start);
    if let Some(token) = inside {
        if matches!(key, GuardKey::Char(_)) {
            return token
                .edit_request()
                .map_or(GuardOutcome::Allow, GuardOutcome::Activate);
        }
        if key.is_deletion() {
            return delete_range(source, token.range());
        }
    }

    if !key.is_deletion() {
        return GuardOutcome::Allow;
    }

    let touched: Vec<&Token> = doc
        .tokens()
        .iter()
        .filter(|t| t.is_math() && !(end <= t.start() || start >= t.end()))
        .collect();
    if touched.is_empty() {
        return GuardOutcome::Allow;
    }
    let expanded_start = touched.iter().map(|t| t.start()).fold(start, usize::min);
    let expanded_end = touched.iter().map(|t| t.end()).fold(end, usize::max);
    delete_range(source, expanded_start..expanded_end)
}

fn delete_range(source: &str, range: Range<usize>) -> GuardOutcome {
    let mut text = String::with_capacity(source.len());
    text.push_str(&source[..range.start]);
    text.push_str(&source[range.end..]);
    GuardOutcome::Replace {
        text,
        caret: range.start,
    }
}
