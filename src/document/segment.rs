//! Line segmentation and bullet classification.
//!
//! Offsets are computed once, here, against the original buffer. Every
//! token handed out keeps absolute offsets, including the text token that
//! is re-cut after a bullet marker.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Bullet, Line, Token, TokenKind};

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)([-*•]|[0-9]+\.)\s+").expect("bullet pattern is valid")
});

/// Split `tokens` (produced from `source`) into lines.
///
/// A math expression that contains a newline is kept whole on the line
/// where it starts.
pub fn segment_lines(source: &str, tokens: &[Token]) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut line_start = 0;

    for token in tokens {
        match token.kind() {
            TokenKind::Math { .. } => current.push(token.clone()),
            TokenKind::Text => {
                let mut piece_start = token.start();
                for part in token.raw().split_inclusive('\n') {
                    let Some(body) = part.strip_suffix('\n') else {
                        current.push(Token::text(part, piece_start));
                        piece_start += part.len();
                        continue;
                    };
                    if !body.is_empty() {
                        current.push(Token::text(body, piece_start));
                    }
                    let line_end = piece_start + body.len();
                    lines.push(finish_line(
                        source,
                        std::mem::take(&mut current),
                        line_start,
                        line_end,
                    ));
                    // The newline itself counts toward the next line's base.
                    line_start = line_end + 1;
                    piece_start = line_start;
                }
            }
        }
    }

    lines.push(finish_line(source, current, line_start, source.len()));
    lines
}

/// Classify a line's leading text as a bullet and strip the marker.
fn finish_line(source: &str, tokens: Vec<Token>, start: usize, end: usize) -> Line {
    let Some((bullet, content_start)) = classify_bullet(source, &tokens, start) else {
        return Line::new(tokens, None, start, end, start);
    };

    let content_tokens = tokens
        .into_iter()
        .filter_map(|token| {
            if token.end() <= content_start {
                None
            } else if token.start() < content_start {
                token.text_from(content_start)
            } else {
                Some(token)
            }
        })
        .collect();

    Line::new(content_tokens, Some(bullet), start, end, content_start)
}

fn classify_bullet(source: &str, tokens: &[Token], line_start: usize) -> Option<(Bullet, usize)> {
    let first = tokens.first()?;
    if first.is_math() || first.start() != line_start {
        return None;
    }
    let caps = BULLET_RE.captures(first.raw())?;
    let matched = caps.get(0)?;
    let bullet = Bullet {
        indent: caps.get(1).map_or("", |m| m.as_str()).to_string(),
        marker: caps.get(2)?.as_str().to_string(),
    };
    let content_start = line_start + matched.end();
    debug_assert!(source.is_char_boundary(content_start));
    Some((bullet, content_start))
}
