use tracing::debug;

use crate::app::model::Prompt;
use crate::app::{Model, ToastLevel};
use crate::document::EditRequest;
use crate::editor::{
    Direction, GuardKey, GuardOutcome, apply_edit, guard_key, insert_at_caret, next_placeholder,
    prev_placeholder, remove_expression, replace_selection, wrap_formula,
};

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Source editing
    /// Type a character at the caret
    InsertChar(char),
    /// Delete before the caret (Backspace)
    DeleteBack,
    /// Delete at the caret (Delete)
    DeleteForward,
    /// Split line at the caret (Enter)
    SplitLine,
    /// Move the caret in a direction
    MoveCursor(Direction),
    /// Move the caret to the beginning of the line (Home)
    MoveHome,
    /// Move the caret to the end of the line (End)
    MoveEnd,
    /// Move the caret to a source line and column, e.g. from a mouse click
    MoveTo(usize, usize),
    /// Replace the whole buffer (external change)
    BufferChanged(String),

    // Expressions
    /// Highlight the next expression, or the next placeholder after an insert
    NextExpression,
    /// Highlight the previous expression, or the previous placeholder
    PrevExpression,
    /// Open the formula prompt on an expression
    ActivateExpression(EditRequest),
    /// Remove an expression from the buffer
    DeleteExpression(EditRequest),
    /// Open the formula prompt to insert at the caret
    OpenInsertPrompt,

    // Prompt
    /// Type into the formula prompt
    PromptInput(char),
    /// Delete the last prompt character
    PromptBackspace,
    /// Apply the prompt (edit or insert)
    PromptConfirm,
    /// Close the prompt and drop the pending edit
    PromptCancel,

    // Preview
    /// Scroll preview up by n lines
    ScrollPreviewUp(usize),
    /// Scroll preview down by n lines
    ScrollPreviewDown(usize),
    /// Scroll preview up one page (PgUp)
    PagePreviewUp,
    /// Scroll preview down one page (PgDn)
    PagePreviewDown,

    // File
    /// Save the buffer to disk
    Save,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. Saving
/// is the one side effect and runs in the event loop after `update`.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save preserves the quit flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }
    if is_caret_motion(&msg) {
        model.placeholder_mode = false;
    }

    match msg {
        Message::InsertChar(ch) => {
            guarded_edit(&mut model, GuardKey::Char(ch), |buf| buf.insert_char(ch));
            model.refresh_document();
        }
        Message::DeleteBack => {
            guarded_edit(&mut model, GuardKey::Backspace, |buf| {
                buf.delete_back();
            });
            model.refresh_document();
        }
        Message::DeleteForward => {
            guarded_edit(&mut model, GuardKey::Delete, |buf| {
                buf.delete_forward();
            });
            model.refresh_document();
        }
        Message::SplitLine => {
            guarded_edit(&mut model, GuardKey::Char('\n'), |buf| buf.split_line());
            model.refresh_document();
        }
        Message::MoveCursor(dir) => {
            model.buffer.move_cursor(dir);
            model.follow_caret();
        }
        Message::MoveHome => {
            model.buffer.move_home();
            model.follow_caret();
        }
        Message::MoveEnd => {
            model.buffer.move_end();
            model.follow_caret();
        }
        Message::MoveTo(line, col) => {
            model.buffer.move_to(line, col);
            model.follow_caret();
        }
        Message::BufferChanged(text) => {
            let caret = model.buffer.caret();
            model.buffer.replace_all(&text, caret);
            model.refresh_document();
        }

        Message::NextExpression => {
            if model.placeholder_mode {
                jump_placeholder(&mut model, true);
            } else {
                cycle_expression(&mut model, true);
            }
        }
        Message::PrevExpression => {
            if model.placeholder_mode {
                jump_placeholder(&mut model, false);
            } else {
                cycle_expression(&mut model, false);
            }
        }
        Message::ActivateExpression(req) => activate(&mut model, req),
        Message::DeleteExpression(req) => {
            let outcome = remove_expression(&model.buffer.text(), &req);
            if outcome.applied() {
                rewrite_buffer(&mut model, outcome.text, req.start);
                model.show_toast(ToastLevel::Info, "Expression deleted");
            } else {
                model.show_toast(ToastLevel::Warning, "Expression no longer in buffer");
            }
        }
        Message::OpenInsertPrompt => {
            model.pending_edit = None;
            model.prompt = Some(Prompt {
                input: String::new(),
            });
        }

        Message::PromptInput(ch) => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.pop();
            }
        }
        Message::PromptConfirm => confirm_prompt(&mut model),
        Message::PromptCancel => {
            model.prompt = None;
            model.pending_edit = None;
            model.placeholder_mode = false;
        }

        Message::ScrollPreviewUp(n) => model.preview_viewport.scroll_up(n),
        Message::ScrollPreviewDown(n) => model.preview_viewport.scroll_down(n),
        Message::PagePreviewUp => model.preview_viewport.page_up(),
        Message::PagePreviewDown => model.preview_viewport.page_down(),

        // Handled as a side effect by the event loop.
        Message::Save => {}

        Message::Resize(width, height) => model.resize(width, height),

        Message::Quit => {
            if model.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }
    model
}

const fn is_caret_motion(msg: &Message) -> bool {
    matches!(
        msg,
        Message::MoveCursor(_)
            | Message::MoveHome
            | Message::MoveEnd
            | Message::MoveTo(..)
            | Message::BufferChanged(_)
    )
}

/// Route a keystroke through the formula guard before it reaches the buffer.
///
/// While filling placeholders the caret sits inside the new formula, so
/// keystrokes go straight to the buffer.
fn guarded_edit(
    model: &mut Model,
    key: GuardKey,
    edit: impl FnOnce(&mut crate::editor::EditorBuffer),
) {
    if model.placeholder_mode {
        edit(&mut model.buffer);
        return;
    }
    match guard_key(&model.document, model.buffer.selection(), key) {
        GuardOutcome::Allow => edit(&mut model.buffer),
        GuardOutcome::Activate(req) => activate(model, req),
        GuardOutcome::Replace { text, caret } => {
            rewrite_buffer(model, text, caret);
            model.show_toast(ToastLevel::Info, "Expression deleted");
        }
    }
}

/// Whole-buffer rewrites take the same `BufferChanged` transition as an
/// external change, then place the caret.
fn rewrite_buffer(model: &mut Model, text: String, caret: usize) {
    *model = update(std::mem::take(model), Message::BufferChanged(text));
    model.buffer.move_to_offset(caret);
    model.follow_caret();
}

fn activate(model: &mut Model, req: EditRequest) {
    debug!(start = req.start, end = req.end, "expression activated");
    model.prompt = Some(Prompt {
        input: req.body.clone(),
    });
    model.selected_expression = model
        .document
        .math_requests()
        .position(|r| r.start == req.start);
    model.pending_edit = Some(req);
    model.placeholder_mode = false;
}

fn cycle_expression(model: &mut Model, forward: bool) {
    let count = model.expression_count();
    if count == 0 {
        model.selected_expression = None;
        return;
    }
    let next = match (model.selected_expression, forward) {
        (None, true) => 0,
        (None, false) => count - 1,
        (Some(idx), true) => (idx + 1) % count,
        (Some(idx), false) => (idx + count - 1) % count,
    };
    model.selected_expression = Some(next);
    if let Some(req) = model.selected_request() {
        let line = model.document.line_index_at(req.start);
        model.preview_viewport.ensure_visible(line);
    }
}

fn jump_placeholder(model: &mut Model, forward: bool) {
    let text = model.buffer.text();
    let selection = model.buffer.selection();
    let target = if forward {
        next_placeholder(&text, selection.end)
    } else {
        prev_placeholder(&text, selection.start)
    };
    match target {
        Some(range) => model.buffer.select(range),
        None if forward => model.placeholder_mode = false,
        None => {}
    }
    model.follow_caret();
}

fn confirm_prompt(model: &mut Model) {
    let Some(prompt) = model.prompt.take() else {
        return;
    };
    let pending = model.pending_edit.take();
    let latex = prompt.input.trim();
    if latex.is_empty() {
        return;
    }
    let formula = wrap_formula(latex);
    let text = model.buffer.text();

    if let Some(req) = pending {
        let outcome = apply_edit(&text, &req, &formula);
        crate::perf::log_event(
            "edit.apply",
            format!("start={} end={} tier={:?}", req.start, req.end, outcome.tier),
        );
        if outcome.applied() {
            let caret = model.buffer.caret();
            rewrite_buffer(model, outcome.text, caret);
        } else {
            model.show_toast(ToastLevel::Warning, "Expression no longer in buffer");
        }
        return;
    }

    let selection = model.buffer.selection();
    let inserted = if selection.is_empty() {
        insert_at_caret(&text, selection.start, &formula)
    } else {
        replace_selection(&text, selection, &formula)
    };
    match inserted {
        Ok(insertion) => {
            model.placeholder_mode = insertion.selection.is_some();
            model.buffer.apply_insertion(&insertion);
            model.refresh_document();
        }
        Err(err) => model.show_toast(ToastLevel::Error, format!("Insert failed: {err}")),
    }
}
