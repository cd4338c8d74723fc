use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;

use crate::document::{Document, EditRequest, TokenizerOptions};
use crate::editor::EditorBuffer;
use crate::ui::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Formula prompt shown in the message line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// LaTeX typed so far, without delimiters
    pub input: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// Raw source being edited
    pub buffer: EditorBuffer,
    /// Tokens, lines and spans derived from `buffer`
    pub document: Document,
    /// Tokenizer switches from config
    pub options: TokenizerOptions,
    /// Path the buffer is saved to
    pub file_path: PathBuf,
    /// Terminal width and height
    pub terminal_size: (u16, u16),
    /// Scroll state of the rendered preview pane
    pub preview_viewport: Viewport,
    /// Scroll state of the raw source pane
    pub source_viewport: Viewport,
    /// Index into the document's expressions, highlighted in both panes
    pub selected_expression: Option<usize>,
    /// Expression the open prompt will replace; `None` while inserting
    pub pending_edit: Option<EditRequest>,
    /// Open formula prompt
    pub prompt: Option<Prompt>,
    /// Tab jumps between `\square` slots of the last inserted formula
    pub placeholder_mode: bool,
    toast: Option<Toast>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("buffer", &self.buffer)
            .field("selected_expression", &self.selected_expression)
            .field("pending_edit", &self.pending_edit)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Model {
    /// Create a model editing `text`, laid out for a terminal of `terminal_size`.
    pub fn new(
        file_path: PathBuf,
        text: &str,
        options: TokenizerOptions,
        terminal_size: (u16, u16),
    ) -> Self {
        let buffer = EditorBuffer::from_text(text);
        let document = Document::parse_with_options(text, &options);
        let mut model = Self {
            terminal_size,
            preview_viewport: Viewport::new(0, 0, document.line_count()),
            source_viewport: Viewport::new(0, 0, buffer.line_count()),
            buffer,
            document,
            options,
            file_path,
            selected_expression: None,
            pending_edit: None,
            prompt: None,
            placeholder_mode: false,
            toast: None,
            should_quit: false,
            quit_confirmed: false,
        };
        model.resize(terminal_size.0, terminal_size.1);
        model
    }

    /// Load `path`, starting with an empty buffer when it does not exist yet.
    pub fn open(path: &Path, options: TokenizerOptions, terminal_size: (u16, u16)) -> Result<Self> {
        let text = if path.exists() {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            String::new()
        };
        Ok(Self::new(path.to_path_buf(), &text, options, terminal_size))
    }

    /// Recompute pane sizes for a terminal of `width` x `height`.
    pub(super) fn resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let layout = self.layout();
        let preview = layout.preview_inner();
        let source = layout.source_inner();
        self.preview_viewport.resize(preview.width, preview.height);
        self.source_viewport.resize(source.width, source.height);
    }

    /// Current screen layout.
    pub fn layout(&self) -> crate::ui::PaneLayout {
        let (width, height) = self.terminal_size;
        crate::ui::pane_layout(Rect::new(0, 0, width, height))
    }

    /// Re-derive the document after the buffer changed.
    pub(super) fn refresh_document(&mut self) {
        let text = self.buffer.text();
        if text != self.document.source() {
            self.document = Document::parse_with_options(&text, &self.options);
            self.preview_viewport
                .set_total_lines(self.document.line_count());
        }
        self.source_viewport.set_total_lines(self.buffer.line_count());
        let count = self.expression_count();
        self.selected_expression = match self.selected_expression {
            Some(_) if count == 0 => None,
            Some(idx) => Some(idx.min(count - 1)),
            None => None,
        };
        self.follow_caret();
    }

    /// Keep the caret visible in the source pane and its line in the preview.
    pub(super) fn follow_caret(&mut self) {
        let caret_line = self.buffer.cursor().line;
        self.source_viewport.ensure_visible(caret_line);
        let rendered_line = self.document.line_index_at(self.buffer.caret());
        self.preview_viewport.ensure_visible(rendered_line);
    }

    pub fn expression_count(&self) -> usize {
        self.document.math_requests().count()
    }

    /// Edit request for the highlighted expression.
    pub fn selected_request(&self) -> Option<EditRequest> {
        self.document
            .math_requests()
            .nth(self.selected_expression?)
    }

    /// Edit request for the expression enclosing the caret, if any.
    pub fn request_at_caret(&self) -> Option<EditRequest> {
        self.document
            .math_containing(self.buffer.caret())
            .and_then(crate::document::Token::edit_request)
    }

    /// Whether the buffer has unsaved changes.
    pub const fn is_dirty(&self) -> bool {
        self.buffer.is_dirty()
    }

    /// Write the buffer to `file_path`.
    pub(super) fn save(&mut self) -> Result<()> {
        std::fs::write(&self.file_path, self.buffer.text())
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;
        self.buffer.mark_clean();
        Ok(())
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self::new(
            PathBuf::new(),
            "",
            TokenizerOptions::default(),
            (80, 24),
        )
    }
}
