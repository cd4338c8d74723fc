use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if model.prompt.is_some() {
            return match key.code {
                KeyCode::Esc => Some(Message::PromptCancel),
                KeyCode::Enter => Some(Message::PromptConfirm),
                KeyCode::Backspace => Some(Message::PromptBackspace),
                KeyCode::Char('q') if ctrl => Some(Message::Quit),
                KeyCode::Char(c) if !ctrl && !alt => Some(Message::PromptInput(c)),
                _ => None,
            };
        }

        if ctrl {
            return match key.code {
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('f') => Some(Message::OpenInsertPrompt),
                KeyCode::Char('e') => model
                    .request_at_caret()
                    .or_else(|| model.selected_request())
                    .map(Message::ActivateExpression),
                KeyCode::Char('d') => model.selected_request().map(Message::DeleteExpression),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Tab => Some(Message::NextExpression),
            KeyCode::BackTab => Some(Message::PrevExpression),
            KeyCode::Esc => Some(Message::PromptCancel),
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),
            KeyCode::PageUp => Some(Message::PagePreviewUp),
            KeyCode::PageDown => Some(Message::PagePreviewDown),
            KeyCode::Char(c) if !alt => Some(Message::InsertChar(c)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        let layout = model.layout();
        let preview = layout.preview_inner();
        let source = layout.source_inner();

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if point_in_rect(mouse.column, mouse.row, preview) {
                    return expression_at(model, preview, mouse.column, mouse.row)
                        .map(Message::ActivateExpression);
                }
                if point_in_rect(mouse.column, mouse.row, source) {
                    let line = model.source_viewport.offset() + usize::from(mouse.row - source.y);
                    let gutter = crate::ui::source_gutter_width(model.buffer.line_count());
                    let col = mouse.column.saturating_sub(source.x + gutter);
                    return Some(Message::MoveTo(line, usize::from(col)));
                }
                None
            }
            MouseEventKind::ScrollUp if point_in_rect(mouse.column, mouse.row, preview) => {
                Some(Message::ScrollPreviewUp(WHEEL_LINES))
            }
            MouseEventKind::ScrollDown if point_in_rect(mouse.column, mouse.row, preview) => {
                Some(Message::ScrollPreviewDown(WHEEL_LINES))
            }
            _ => None,
        }
    }
}

/// Expression drawn at a screen cell of the preview pane.
fn expression_at(
    model: &Model,
    preview: Rect,
    column: u16,
    row: u16,
) -> Option<crate::document::EditRequest> {
    let line = model.preview_viewport.offset() + usize::from(row - preview.y);
    let col = usize::from(column - preview.x);
    model
        .document
        .rendered()
        .get(line)?
        .math_at_column(col)
        .cloned()
}

const fn point_in_rect(col: u16, row: u16, rect: Rect) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}
