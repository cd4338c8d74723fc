use std::ops::Range;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::Model;
use crate::document::{EditRequest, RenderSpan, RenderedLine};

use super::{pane_layout, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let layout = pane_layout(frame.area());
    render_preview(model, frame, layout.preview);
    render_source(model, frame, layout.source);
    status::render_message_line(model, frame, layout.message);
    status::render_status_bar(model, frame, layout.status);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let selected = model.selected_request();
    let rendered = model.document.rendered();
    let content: Vec<Line> = model
        .preview_viewport
        .visible_range()
        .filter_map(|idx| rendered.get(idx))
        .map(|line| preview_line(line, selected.as_ref()))
        .collect();

    let block = Block::default().title("Preview").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Convert one rendered line into styled spans.
///
/// Column positions match [`RenderedLine::math_at_column`], so a click on
/// a drawn formula maps back to its request.
pub fn preview_line(line: &RenderedLine, selected: Option<&EditRequest>) -> Line<'static> {
    let spans: Vec<Span<'static>> = line
        .spans()
        .iter()
        .map(|span| match span {
            RenderSpan::Marker { glyph } => Span::styled(format!("{glyph} "), style::marker_style()),
            RenderSpan::Text { text } => Span::raw(text.clone()),
            RenderSpan::Math {
                latex,
                display,
                request,
            } => {
                let is_selected = selected.is_some_and(|s| s.start == request.start);
                let math_style = if *display {
                    style::display_math_style(is_selected)
                } else {
                    style::math_style(is_selected)
                };
                Span::styled(format!(" {latex} "), math_style)
            }
        })
        .collect();
    Line::from(spans)
}

fn render_source(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = &model.buffer;
    let total_lines = buf.line_count();
    let gutter_width = line_number_width(total_lines);
    let selection = buf.selection();
    let caret = buf.caret();
    let selected_start = model.selected_request().map(|r| r.start);

    let math: Vec<(Range<usize>, bool)> = model
        .document
        .tokens()
        .iter()
        .filter(|t| t.is_math())
        .map(|t| (t.range(), Some(t.start()) == selected_start))
        .collect();

    let mut content: Vec<Line> = Vec::new();
    for line_idx in model.source_viewport.visible_range() {
        let line_text = buf.line_at(line_idx).unwrap_or_default();
        let line_start = buf.line_start(line_idx);
        let line_num = format!("{:>width$} ", line_idx + 1, width = gutter_width as usize);

        let mut spans = vec![Span::styled(line_num, style::gutter_style())];
        let mut run = String::new();
        let mut run_style = Style::default();
        for (i, ch) in line_text.char_indices() {
            let offset = line_start + i;
            let ch_style = if selection.contains(&offset) {
                style::selection_style()
            } else if offset == caret && selection.is_empty() {
                style::caret_style()
            } else if let Some((_, is_selected)) = math.iter().find(|(r, _)| r.contains(&offset)) {
                style::source_math_style(*is_selected)
            } else {
                Style::default()
            };
            if ch_style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = ch_style;
            run.push(ch);
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        if caret == line_start + line_text.len() && selection.is_empty() {
            spans.push(Span::styled(" ", style::caret_style()));
        }
        content.push(Line::from(spans));
    }

    let block = Block::default().title("Source").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Columns taken by the line number gutter, including its separator.
pub const fn source_gutter_width(total_lines: usize) -> u16 {
    line_number_width(total_lines) + 1
}
