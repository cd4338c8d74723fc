use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model.file_path.file_name().map_or_else(
        || "untitled".to_string(),
        |s| s.to_string_lossy().to_string(),
    );
    let dirty_indicator = if model.is_dirty() { " [modified]" } else { "" };
    let cursor = model.buffer.cursor();
    let count = model.expression_count();
    let expr_info = match model.selected_expression {
        Some(idx) if count > 0 => format!("  expr {}/{}", idx + 1, count),
        _ => format!("  {count} expr"),
    };
    let mode = if model.placeholder_mode {
        "  Tab:next slot"
    } else {
        "  Tab:select  Ctrl+E:edit  Ctrl+F:insert  Ctrl+D:delete"
    };

    let status = format!(
        " {filename}{dirty_indicator}  Ln {}, Col {}  {}%{expr_info}{mode}  Ctrl+S:save  Ctrl+Q:quit",
        cursor.line + 1,
        cursor.col + 1,
        model.preview_viewport.scroll_percent()
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

/// Prompt while open, otherwise the active toast.
pub fn render_message_line(model: &Model, frame: &mut Frame, area: Rect) {
    if let Some(prompt) = &model.prompt {
        let label = if model.pending_edit.is_some() {
            "Edit formula"
        } else {
            "Insert formula"
        };
        let line = Line::from(vec![
            Span::styled(format!(" {label}: $"), Style::default().fg(Color::White)),
            Span::raw(prompt.input.clone()),
            Span::styled(" ", super::style::caret_style()),
            Span::styled("$  Enter:apply  Esc:cancel", Style::default().fg(Color::White)),
        ]);
        let bar = Paragraph::new(line).style(Style::default().bg(Color::Blue).fg(Color::White));
        frame.render_widget(bar, area);
        return;
    }

    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
