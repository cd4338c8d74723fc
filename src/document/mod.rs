//! Math-annotated text parsing and rendering.
//!
//! This module handles:
//! - Scanning text for `$…$` expressions
//! - Splitting tokens into lines and classifying bullet lines
//! - Assembling lines into text, marker and math spans for display
//!
//! Nothing here is incremental. A [`Document`] is a pure function of its
//! source and is rebuilt whenever the buffer changes.

mod render;
mod segment;
mod tokenizer;
mod types;

pub use render::{BULLET_GLYPH, assemble, display_latex};
pub use segment::segment_lines;
pub use tokenizer::{TokenizerOptions, has_math, tokenize};
pub use types::{
    Bullet, DELIMITER, EditRequest, Line, RenderSpan, RenderedLine, Token, TokenKind,
};

use serde::Serialize;

/// Tokens, lines and rendered spans derived from one buffer snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Source text the document was built from
    source: String,
    /// Ordered tokens partitioning the source
    tokens: Vec<Token>,
    /// Segmented lines
    lines: Vec<Line>,
    /// Display spans per line
    #[serde(skip)]
    rendered: Vec<RenderedLine>,
}

impl Document {
    /// Build a document with default tokenizer options.
    ///
    /// # Example
    ///
    /// ```
    /// use mathtext::document::Document;
    ///
    /// let doc = Document::parse("Calcula $x^2$\n- $y$");
    /// assert_eq!(doc.line_count(), 2);
    /// assert_eq!(doc.math_requests().count(), 2);
    /// ```
    pub fn parse(source: &str) -> Self {
        Self::parse_with_options(source, &TokenizerOptions::default())
    }

    pub fn parse_with_options(source: &str, options: &TokenizerOptions) -> Self {
        let _scope = crate::perf::scope("document.parse");
        let tokens = tokenize(source, options);
        let lines = segment_lines(source, &tokens);
        let rendered = assemble(&lines);
        crate::perf::log_event(
            "document.parse",
            format!(
                "bytes={} tokens={} lines={}",
                source.len(),
                tokens.len(),
                lines.len()
            ),
        );
        Self {
            source: source.to_string(),
            tokens,
            lines,
            rendered,
        }
    }

    /// Create an empty document.
    pub fn empty() -> Self {
        Self::parse("")
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn rendered(&self) -> &[RenderedLine] {
        &self.rendered
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_math(&self) -> bool {
        self.tokens.iter().any(Token::is_math)
    }

    /// Edit requests for every expression, in buffer order.
    pub fn math_requests(&self) -> impl Iterator<Item = EditRequest> + '_ {
        self.tokens.iter().filter_map(Token::edit_request)
    }

    /// Expression whose range strictly contains `offset`.
    pub fn math_containing(&self, offset: usize) -> Option<&Token> {
        self.tokens
            .iter()
            .find(|t| t.is_math() && offset > t.start() && offset < t.end())
    }

    /// Index of the rendered line holding byte `offset`.
    pub fn line_index_at(&self, offset: usize) -> usize {
        self.lines
            .iter()
            .rposition(|line| line.start() <= offset)
            .unwrap_or(0)
    }

    /// Plain text preview, one line per source line.
    pub fn preview(&self) -> String {
        self.rendered
            .iter()
            .map(RenderedLine::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_has_one_empty_line() {
        let doc = Document::empty();
        assert_eq!(doc.line_count(), 1);
        assert!(doc.tokens().is_empty());
        assert!(!doc.has_math());
    }

    #[test]
    fn test_math_requests_in_order() {
        let doc = Document::parse("Calcula $x^2$ y $y^2$");
        let requests: Vec<_> = doc.math_requests().collect();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].full_match, "$y^2$");
        assert_eq!(requests[1].range(), 16..21);
    }

    #[test]
    fn test_math_containing_is_strict() {
        let doc = Document::parse("a $xy$ b");
        assert!(doc.math_containing(2).is_none());
        assert!(doc.math_containing(3).is_some());
        assert!(doc.math_containing(5).is_some());
        assert!(doc.math_containing(6).is_none());
    }

    #[test]
    fn test_line_index_at() {
        let doc = Document::parse("uno\ndos\ntres");
        assert_eq!(doc.line_index_at(0), 0);
        assert_eq!(doc.line_index_at(4), 1);
        assert_eq!(doc.line_index_at(3), 0);
        assert_eq!(doc.line_index_at(100), 2);
    }

    #[test]
    fn test_preview_joins_lines() {
        let doc = Document::parse("Pregunta $a$\n- $b$");
        assert_eq!(doc.preview(), "Pregunta [a]\n• [b]");
    }

    #[test]
    fn test_document_serializes_tokens_and_lines() {
        let doc = Document::parse("a$b$");
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["tokens"][1]["raw"], "$b$");
        assert_eq!(json["lines"][0]["start"], 0);
    }
}
