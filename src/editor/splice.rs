use thiserror::Error;

/// Reasons a splice range is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpliceError {
    #[error("splice range {start}..{end} is inverted")]
    Inverted { start: usize, end: usize },
    #[error("splice end {end} exceeds buffer length {len}")]
    OutOfBounds { end: usize, len: usize },
    #[error("splice offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Replace `buffer[start..end]` with `replacement`.
///
/// Requires `start <= end <= buffer.len()` with both offsets on
/// character boundaries.
pub fn splice(
    buffer: &str,
    start: usize,
    end: usize,
    replacement: &str,
) -> Result<String, SpliceError> {
    check_range(buffer, start, end)?;
    let mut out = String::with_capacity(buffer.len() - (end - start) + replacement.len());
    out.push_str(&buffer[..start]);
    out.push_str(replacement);
    out.push_str(&buffer[end..]);
    Ok(out)
}

pub(crate) fn check_range(buffer: &str, start: usize, end: usize) -> Result<(), SpliceError> {
    if start > end {
        return Err(SpliceError::Inverted { start, end });
    }
    if end > buffer.len() {
        return Err(SpliceError::OutOfBounds {
            end,
            len: buffer.len(),
        });
    }
    for offset in [start, end] {
        if !buffer.is_char_boundary(offset) {
            return Err(SpliceError::NotCharBoundary { offset });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splice_replaces_range() {
        assert_eq!(splice("hello world", 6, 11, "there").unwrap(), "hello there");
    }

    #[test]
    fn test_splice_empty_range_inserts() {
        assert_eq!(splice("abcd", 2, 2, "XY").unwrap(), "abXYcd");
    }

    #[test]
    fn test_splice_empty_replacement_deletes() {
        assert_eq!(splice("a $x$ b", 2, 5, "").unwrap(), "a  b");
    }

    #[test]
    fn test_splice_at_end() {
        assert_eq!(splice("ab", 2, 2, "c").unwrap(), "abc");
    }

    #[test]
    fn test_splice_rejects_inverted_range() {
        assert_eq!(
            splice("abc", 2, 1, ""),
            Err(SpliceError::Inverted { start: 2, end: 1 })
        );
    }

    #[test]
    fn test_splice_rejects_out_of_bounds() {
        assert_eq!(
            splice("abc", 1, 9, ""),
            Err(SpliceError::OutOfBounds { end: 9, len: 3 })
        );
    }

    #[test]
    fn test_splice_rejects_split_char() {
        assert_eq!(
            splice("ñ", 1, 1, "x"),
            Err(SpliceError::NotCharBoundary { offset: 1 })
        );
    }
}
