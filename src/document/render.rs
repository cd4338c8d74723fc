//! Assembly of segmented lines into display spans.

use super::types::{Line, RenderSpan, RenderedLine, TokenKind};

/// Glyph drawn for unordered list markers.
pub const BULLET_GLYPH: &str = "•";

/// Convert segmented lines into display-ready spans.
pub fn assemble(lines: &[Line]) -> Vec<RenderedLine> {
    lines.iter().map(assemble_line).collect()
}

fn assemble_line(line: &Line) -> RenderedLine {
    let mut spans = Vec::with_capacity(line.tokens().len() + 2);

    if let Some(bullet) = line.bullet() {
        if !bullet.indent.is_empty() {
            spans.push(RenderSpan::Text {
                text: bullet.indent.clone(),
            });
        }
        let glyph = if bullet.is_numbered() {
            bullet.marker.clone()
        } else {
            BULLET_GLYPH.to_string()
        };
        spans.push(RenderSpan::Marker { glyph });
    }

    let last = line.tokens().len().saturating_sub(1);
    for (idx, token) in line.tokens().iter().enumerate() {
        match token.kind() {
            TokenKind::Text => {
                let mut text = token.raw();
                if idx == last {
                    text = text.strip_suffix('\r').unwrap_or(text);
                }
                if !text.is_empty() {
                    spans.push(RenderSpan::Text {
                        text: text.to_string(),
                    });
                }
            }
            TokenKind::Math { display } => {
                let Some(request) = token.edit_request() else {
                    continue;
                };
                spans.push(RenderSpan::Math {
                    latex: display_latex(token.body()),
                    display,
                    request,
                });
            }
        }
    }

    RenderedLine::new(spans, line.start()..line.end())
}

/// Source handed to the math renderer: trimmed, with the multiplication
/// and division signs typed from a keyboard mapped to their commands.
pub fn display_latex(body: &str) -> String {
    body.trim().replace('×', "\\times").replace('÷', "\\div")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, EditRequest};

    fn render(source: &str) -> Vec<RenderedLine> {
        Document::parse(source).rendered().to_vec()
    }

    #[test]
    fn test_plain_line_is_single_text_span() {
        let lines = render("hola mundo");
        assert_eq!(
            lines[0].spans(),
            &[RenderSpan::Text {
                text: "hola mundo".to_string()
            }]
        );
    }

    #[test]
    fn test_bullet_line_starts_with_marker_glyph() {
        let lines = render("- hola");
        assert_eq!(
            lines[0].spans()[0],
            RenderSpan::Marker {
                glyph: BULLET_GLYPH.to_string()
            }
        );
        assert_eq!(lines[0].spans()[1].display_text(), "hola");
    }

    #[test]
    fn test_numbered_bullet_keeps_number() {
        let lines = render("12. doce");
        assert_eq!(lines[0].spans()[0].display_text(), "12.");
    }

    #[test]
    fn test_indented_bullet_keeps_indent() {
        let lines = render("   - sub");
        assert_eq!(lines[0].spans()[0].display_text(), "   ");
        assert_eq!(lines[0].plain_text(), "   • sub");
    }

    #[test]
    fn test_math_span_carries_absolute_request() {
        let lines = render("a\n- $x$ y $z^2$");
        let requests: Vec<_> = lines[1].math_requests().cloned().collect();
        assert_eq!(
            requests,
            vec![EditRequest::new("$x$", 4, 7), EditRequest::new("$z^2$", 10, 15)]
        );
    }

    #[test]
    fn test_whitespace_is_preserved_in_text() {
        let lines = render("a   $x$   b");
        assert_eq!(lines[0].spans()[0].display_text(), "a   ");
        assert_eq!(lines[0].spans()[2].display_text(), "   b");
    }

    #[test]
    fn test_carriage_return_dropped_from_display() {
        let lines = render("uno\r\ndos");
        assert_eq!(lines[0].plain_text(), "uno");
        assert_eq!(lines[0].source_range(), 0..4);
    }

    #[test]
    fn test_display_latex_maps_operators() {
        assert_eq!(display_latex(" 2×3÷4 "), "2\\times3\\div4");
    }

    #[test]
    fn test_plain_text_brackets_math() {
        let lines = render("Calcula $x^2$");
        assert_eq!(lines[0].plain_text(), "Calcula [x^2]");
    }
}
