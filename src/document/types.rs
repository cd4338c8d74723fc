//! Core document types.

use std::ops::Range;

use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Delimiter that opens and closes an inline math expression.
pub const DELIMITER: char = '$';

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Literal text, rendered verbatim
    Text,
    /// A delimited math expression
    Math {
        /// `$$…$$` display math (only produced when display math is enabled)
        display: bool,
    },
}

/// A classified, offset-tagged run of the buffer.
///
/// Offsets are byte offsets into the buffer at the moment of tokenization,
/// `end` exclusive. For math tokens `raw` includes the delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    kind: TokenKind,
    raw: String,
    start: usize,
    end: usize,
}

impl Token {
    pub fn text(raw: &str, start: usize) -> Self {
        Self {
            kind: TokenKind::Text,
            raw: raw.to_string(),
            start,
            end: start + raw.len(),
        }
    }

    pub fn math(raw: &str, start: usize, display: bool) -> Self {
        Self {
            kind: TokenKind::Math { display },
            raw: raw.to_string(),
            start,
            end: start + raw.len(),
        }
    }

    pub const fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub const fn is_math(&self) -> bool {
        matches!(self.kind, TokenKind::Math { .. })
    }

    pub const fn is_display(&self) -> bool {
        matches!(self.kind, TokenKind::Math { display: true })
    }

    /// Interior of a math token (delimiters stripped). Text tokens return
    /// their raw content.
    pub fn body(&self) -> &str {
        match self.kind {
            TokenKind::Text => &self.raw,
            TokenKind::Math { display } => {
                let width = if display { 2 } else { 1 };
                &self.raw[width..self.raw.len() - width]
            }
        }
    }

    /// Snapshot of this expression for a later in-place edit.
    ///
    /// Returns `None` for text tokens.
    pub fn edit_request(&self) -> Option<EditRequest> {
        if !self.is_math() {
            return None;
        }
        Some(EditRequest {
            body: self.body().to_string(),
            full_match: self.raw.clone(),
            start: self.start,
            end: self.end,
        })
    }

    /// Cut a text token to the part starting at absolute offset `at`.
    ///
    /// Returns `None` when nothing remains.
    pub(crate) fn text_from(&self, at: usize) -> Option<Self> {
        debug_assert!(matches!(self.kind, TokenKind::Text));
        if at >= self.end {
            return None;
        }
        let local = at.saturating_sub(self.start);
        Some(Self::text(&self.raw[local..], self.start + local))
    }
}

/// Bullet marker found at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bullet {
    /// The matched marker (`-`, `*`, `•`, or `N.`)
    pub marker: String,
    /// Leading whitespace before the marker
    pub indent: String,
}

impl Bullet {
    /// Numbered list markers end in a dot (`1.`, `12.`).
    pub fn is_numbered(&self) -> bool {
        self.marker.ends_with('.')
    }
}

/// One source line with its tokens and bullet classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    tokens: Vec<Token>,
    bullet: Option<Bullet>,
    start: usize,
    end: usize,
    content_start: usize,
}

impl Line {
    pub(crate) const fn new(
        tokens: Vec<Token>,
        bullet: Option<Bullet>,
        start: usize,
        end: usize,
        content_start: usize,
    ) -> Self {
        Self {
            tokens,
            bullet,
            start,
            end,
            content_start,
        }
    }

    /// Tokens of the line's content (after any bullet marker).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub const fn is_bullet(&self) -> bool {
        self.bullet.is_some()
    }

    pub const fn bullet(&self) -> Option<&Bullet> {
        self.bullet.as_ref()
    }

    pub fn marker(&self) -> Option<&str> {
        self.bullet.as_ref().map(|b| b.marker.as_str())
    }

    /// Absolute offset of the first character of the line.
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Absolute offset of the end of the line, excluding its newline.
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Absolute offset where the content begins, after any bullet marker
    /// and its trailing whitespace.
    pub const fn content_start(&self) -> usize {
        self.content_start
    }

    /// Concatenated raw text of the content tokens.
    pub fn content(&self) -> String {
        self.tokens.iter().map(Token::raw).collect()
    }
}

/// Snapshot of one math token captured when the user activates it.
///
/// `full_match` is the delimited substring (`$x^2$`) and `body` its
/// interior. At capture time `buffer[start..end] == full_match`; by the
/// time the edit is applied the buffer may have drifted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditRequest {
    pub body: String,
    pub full_match: String,
    pub start: usize,
    pub end: usize,
}

impl EditRequest {
    pub fn new(full_match: &str, start: usize, end: usize) -> Self {
        let body = full_match
            .strip_prefix(DELIMITER)
            .and_then(|s| s.strip_suffix(DELIMITER))
            .unwrap_or(full_match);
        Self {
            body: body.to_string(),
            full_match: full_match.to_string(),
            start,
            end,
        }
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A display-ready span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSpan {
    /// Bullet glyph for list lines
    Marker { glyph: String },
    /// Literal text, whitespace preserved
    Text { text: String },
    /// A math expression and the edit request it emits when activated
    Math {
        latex: String,
        display: bool,
        request: EditRequest,
    },
}

impl RenderSpan {
    /// Text shown for the span in a plain-text preview.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Marker { glyph } => glyph,
            Self::Text { text } => text,
            Self::Math { latex, .. } => latex,
        }
    }

    /// Terminal column width of the span as rendered.
    ///
    /// Math spans are drawn with a one-column pad on each side.
    pub fn width(&self) -> usize {
        match self {
            Self::Marker { glyph } => glyph.width() + 1,
            Self::Text { text } => text.width(),
            Self::Math { latex, .. } => latex.width() + 2,
        }
    }
}

/// One rendered line of spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedLine {
    spans: Vec<RenderSpan>,
    source_range: Range<usize>,
}

impl RenderedLine {
    pub const fn new(spans: Vec<RenderSpan>, source_range: Range<usize>) -> Self {
        Self {
            spans,
            source_range,
        }
    }

    pub fn spans(&self) -> &[RenderSpan] {
        &self.spans
    }

    /// Range of the source line in the buffer.
    pub fn source_range(&self) -> Range<usize> {
        self.source_range.clone()
    }

    /// Plain text preview of the line.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for span in &self.spans {
            match span {
                RenderSpan::Marker { glyph } => {
                    out.push_str(glyph);
                    out.push(' ');
                }
                RenderSpan::Text { text } => out.push_str(text),
                RenderSpan::Math { latex, .. } => {
                    out.push('[');
                    out.push_str(latex);
                    out.push(']');
                }
            }
        }
        out
    }

    /// Math spans of the line, in order.
    pub fn math_requests(&self) -> impl Iterator<Item = &EditRequest> {
        self.spans.iter().filter_map(|span| match span {
            RenderSpan::Math { request, .. } => Some(request),
            _ => None,
        })
    }

    /// Edit request of the math span drawn at display column `col`.
    pub fn math_at_column(&self, col: usize) -> Option<&EditRequest> {
        let mut x = 0;
        for span in &self.spans {
            let width = span.width();
            if col >= x && col < x + width {
                return match span {
                    RenderSpan::Math { request, .. } => Some(request),
                    _ => None,
                };
            }
            x += width;
        }
        None
    }
}
