//! Resolving a possibly stale edit request against the current buffer.
//!
//! The formula editor is asynchronous relative to typing: the user opens
//! it on one expression, keeps typing elsewhere, and only then confirms.
//! Recorded offsets are therefore a hint, tried first, with a search by
//! content as fallback. When the expression text is gone the edit is a
//! no-op.
//!
//! Duplicate expressions resolve to the first occurrence once the recorded
//! range has drifted.

use std::ops::Range;

use tracing::debug;

use crate::document::{DELIMITER, EditRequest};

use super::splice::splice;

/// Strategy that found the expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// The recorded range still holds the expression
    Direct,
    /// First occurrence found by search
    Search,
    /// Fallback `replacen` of the first occurrence; Search finds it first
    Replace,
}

/// Current range of an edit target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub range: Range<usize>,
    pub tier: Tier,
}

/// Result of applying an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Buffer after the edit (unchanged when nothing was found)
    pub text: String,
    /// Tier that resolved the target, `None` for a no-op
    pub tier: Option<Tier>,
}

impl EditOutcome {
    pub const fn applied(&self) -> bool {
        self.tier.is_some()
    }
}

/// Resolve the current range of `req` in `buffer` by index (tiers 1 and 2).
pub fn locate(buffer: &str, req: &EditRequest) -> Option<Located> {
    if recorded_range_matches(buffer, req) {
        return Some(Located {
            range: req.range(),
            tier: Tier::Direct,
        });
    }
    if req.full_match.is_empty() {
        return None;
    }
    buffer.find(&req.full_match).map(|index| Located {
        range: index..index + req.full_match.len(),
        tier: Tier::Search,
    })
}

/// Replace the expression described by `req` with `replacement`.
pub fn apply_edit(buffer: &str, req: &EditRequest, replacement: &str) -> EditOutcome {
    if let Some(located) = locate(buffer, req)
        && let Ok(text) = splice(buffer, located.range.start, located.range.end, replacement)
    {
        debug!(tier = ?located.tier, start = located.range.start, "expression edit resolved");
        return EditOutcome {
            text,
            tier: Some(located.tier),
        };
    }

    // Unreachable while Search uses the same needle; kept as the final tier.
    if !req.full_match.is_empty() {
        let text = buffer.replacen(&req.full_match, replacement, 1);
        if text != buffer {
            debug!(tier = ?Tier::Replace, "expression edit resolved");
            return EditOutcome {
                text,
                tier: Some(Tier::Replace),
            };
        }
    }

    debug!(full_match = %req.full_match, "expression no longer in buffer, edit dropped");
    EditOutcome {
        text: buffer.to_string(),
        tier: None,
    }
}

/// Delete the expression described by `req`.
pub fn remove_expression(buffer: &str, req: &EditRequest) -> EditOutcome {
    apply_edit(buffer, req, "")
}

/// Wrap a picked formula in delimiters unless it already starts with one.
pub fn wrap_formula(latex: &str) -> String {
    if latex.starts_with(DELIMITER) {
        latex.to_string()
    } else {
        format!("{DELIMITER}{latex}{DELIMITER}")
    }
}

fn recorded_range_matches(buffer: &str, req: &EditRequest) -> bool {
    req.start < req.end && buffer.get(req.range()) == Some(req.full_match.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(buffer: &str, full_match: &str, nth: usize) -> EditRequest {
        let start = buffer
            .match_indices(full_match)
            .nth(nth)
            .map(|(i, _)| i)
            .unwrap();
        EditRequest::new(full_match, start, start + full_match.len())
    }

    #[test]
    fn test_direct_tier_when_range_still_valid() {
        let buffer = "a $x$ b $x$";
        let req = request(buffer, "$x$", 1);
        let outcome = apply_edit(buffer, &req, "$y$");
        assert_eq!(outcome.tier, Some(Tier::Direct));
        assert_eq!(outcome.text, "a $x$ b $y$");
    }

    #[test]
    fn test_search_tier_after_drift() {
        let req = EditRequest::new("$x$", 2, 5);
        let drifted = "prefix a $x$ b";
        let outcome = apply_edit(drifted, &req, "$y$");
        assert_eq!(outcome.tier, Some(Tier::Search));
        assert_eq!(outcome.text, "prefix a $y$ b");
    }

    #[test]
    fn test_missing_expression_is_noop() {
        let req = EditRequest::new("$x$", 2, 5);
        let outcome = apply_edit("a $z$ b", &req, "$y$");
        assert!(!outcome.applied());
        assert_eq!(outcome.text, "a $z$ b");
    }

    #[test]
    fn test_out_of_bounds_range_falls_back_to_search() {
        let req = EditRequest::new("$x$", 40, 43);
        let located = locate("$x$", &req).unwrap();
        assert_eq!(located.tier, Tier::Search);
        assert_eq!(located.range, 0..3);
    }

    #[test]
    fn test_range_inside_multibyte_char_falls_back() {
        let req = EditRequest::new("$x$", 1, 4);
        let located = locate("ñ$x$", &req).unwrap();
        assert_eq!(located.range, 2..5);
        assert_eq!(located.tier, Tier::Search);
    }

    #[test]
    fn test_duplicates_resolve_to_first_occurrence_after_drift() {
        let req = EditRequest::new("$x$", 0, 3);
        let outcome = apply_edit("zz $x$ $x$", &req, "$y$");
        assert_eq!(outcome.text, "zz $y$ $x$");
    }

    #[test]
    fn test_empty_full_match_is_noop() {
        let req = EditRequest::new("", 0, 0);
        let outcome = apply_edit("abc", &req, "$y$");
        assert!(!outcome.applied());
        assert_eq!(outcome.text, "abc");
    }

    #[test]
    fn test_edit_is_idempotent_once_applied() {
        let buffer = "a $x$";
        let req = request(buffer, "$x$", 0);
        let once = apply_edit(buffer, &req, "$y$");
        let twice = apply_edit(&once.text, &req, "$y$");
        assert_eq!(twice.text, "a $y$");
        assert!(!twice.applied());
    }

    #[test]
    fn test_remove_expression() {
        let buffer = "a $x$ b";
        let req = request(buffer, "$x$", 0);
        assert_eq!(remove_expression(buffer, &req).text, "a  b");
    }

    #[test]
    fn test_wrap_formula() {
        assert_eq!(wrap_formula("x^2"), "$x^2$");
        assert_eq!(wrap_formula("$x^2$"), "$x^2$");
    }

    #[test]
    fn test_end_to_end_second_expression() {
        let buffer = "Calcula $x^2$ y $y^2$";
        let req = EditRequest::new("$y^2$", 16, 21);
        let outcome = apply_edit(buffer, &req, "$y^3$");
        assert_eq!(outcome.text, "Calcula $x^2$ y $y^3$");
        assert_eq!(outcome.tier, Some(Tier::Direct));
    }
}
