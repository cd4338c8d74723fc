use std::path::PathBuf;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;

use super::*;
use crate::app::{Message, Model, update};
use crate::document::{Document, TokenizerOptions};

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn create_model(text: &str) -> Model {
    Model::new(
        PathBuf::from("quiz.txt"),
        text,
        TokenizerOptions::default(),
        (80, 24),
    )
}

fn draw(model: &Model) -> Buffer {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal.backend().buffer().clone()
}

fn row_text(buffer: &Buffer, row: u16) -> String {
    (0..buffer.area.width)
        .map(|col| buffer[(col, row)].symbol())
        .collect()
}

fn find_row(buffer: &Buffer, needle: &str) -> Option<u16> {
    (0..buffer.area.height).find(|&row| row_text(buffer, row).contains(needle))
}

#[test]
fn test_pane_layout_stacks_preview_source_and_footer() {
    let layout = pane_layout(Rect::new(0, 0, 80, 24));
    assert_eq!(layout.preview.y, 0);
    assert_eq!(layout.source.y, layout.preview.y + layout.preview.height);
    assert_eq!(layout.message.y, 22);
    assert_eq!(layout.status.y, 23);
    assert_eq!(layout.preview_inner().x, 1);
    assert_eq!(
        layout.source_inner().height,
        layout.source.height.saturating_sub(2)
    );
}

#[test]
fn test_preview_renders_bullets_and_formulas() {
    let model = create_model("Calcula $x^2$\n- $y$");
    let buffer = draw(&model);
    let preview_row = find_row(&buffer, "Calcula  x^2").expect("formula rendered");
    let bullet_row = find_row(&buffer, "•  y").expect("bullet rendered");
    assert!(preview_row < bullet_row);
    assert!(preview_row < model.layout().source.y);
}

#[test]
fn test_source_pane_shows_raw_text_with_line_numbers() {
    let model = create_model("Calcula $x^2$\n- $y$");
    let buffer = draw(&model);
    let row = find_row(&buffer, "1 Calcula $x^2$").expect("raw source rendered");
    assert!(row > model.layout().source.y);
    assert!(find_row(&buffer, "2 - $y$").is_some());
}

#[test]
fn test_selected_expression_is_reversed_in_preview() {
    let model = create_model("a $q$ b");
    let model = update(model, Message::NextExpression);
    let buffer = draw(&model);
    let row = find_row(&buffer, " q ").unwrap();
    let col = (0..buffer.area.width)
        .find(|&c| buffer[(c, row)].symbol() == "q")
        .unwrap();
    assert!(buffer[(col, row)].modifier.contains(Modifier::REVERSED));
}

#[test]
fn test_status_bar_reports_modified_and_expressions() {
    let model = create_model("a $x$");
    let model = update(model, Message::MoveEnd);
    let model = update(model, Message::InsertChar('!'));
    let buffer = draw(&model);
    let status = row_text(&buffer, 23);
    assert!(status.contains("quiz.txt [modified]"), "status: {status}");
    assert!(status.contains("1 expr"), "status: {status}");
    assert!(status.contains("100%"), "status: {status}");
}

#[test]
fn test_prompt_line_shows_formula_being_edited() {
    let model = create_model("Calcula $x^2$");
    let req = model.document.math_requests().next().unwrap();
    let model = update(model, Message::ActivateExpression(req));
    let buffer = draw(&model);
    let message = row_text(&buffer, 22);
    assert!(message.contains("Edit formula: $x^2"), "message: {message}");
}

#[test]
fn test_preview_line_width_matches_click_columns() {
    let doc = Document::parse("  - total $a+b$ pesos");
    let rendered = &doc.rendered()[0];
    let line = preview_line(rendered, None);
    let span_width: usize = rendered.spans().iter().map(|s| s.width()).sum();
    assert_eq!(line.width(), span_width);

    let text = line
        .spans
        .iter()
        .map(|s| s.content.as_ref())
        .collect::<String>();
    let col = text[..text.find("a+b").unwrap()].chars().count();
    assert_eq!(
        rendered.math_at_column(col).map(|r| r.full_match.as_str()),
        Some("$a+b$")
    );
}

#[test]
fn test_line_number_width() {
    assert_eq!(line_number_width(9), 1);
    assert_eq!(line_number_width(10), 2);
    assert_eq!(source_gutter_width(150), 4);
}
