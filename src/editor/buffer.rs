use std::ops::Range;

use ropey::Rope;

use super::caret::Insertion;

/// Caret position expressed as line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
}

impl Cursor {
    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Direction for caret movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// The caret and selection are byte offsets into the text, the same unit
/// used by tokens and edit requests.
pub struct EditorBuffer {
    rope: Rope,
    caret: usize,
    /// Selection anchor; the selection spans anchor..caret when set
    anchor: Option<usize>,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            caret: 0,
            anchor: None,
            col_memory: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Caret byte offset.
    pub const fn caret(&self) -> usize {
        self.caret
    }

    /// Caret as line and column.
    pub fn cursor(&self) -> Cursor {
        let line = self.rope.byte_to_line(self.caret);
        Cursor::at(line, self.caret - self.rope.line_to_byte(line))
    }

    /// Selected range, empty when only the caret is set.
    pub fn selection(&self) -> Range<usize> {
        match self.anchor {
            Some(anchor) if anchor < self.caret => anchor..self.caret,
            Some(anchor) => self.caret..anchor,
            None => self.caret..self.caret,
        }
    }

    /// Select `range`, leaving the caret at its end.
    pub fn select(&mut self, range: Range<usize>) {
        let start = self.clamp_offset(range.start);
        let end = self.clamp_offset(range.end);
        self.anchor = (start != end).then_some(start);
        self.set_caret(end);
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Byte offset where `line_idx` starts (buffer length past the end).
    pub fn line_start(&self, line_idx: usize) -> usize {
        if line_idx >= self.rope.len_lines() {
            return self.rope.len_bytes();
        }
        self.rope.line_to_byte(line_idx)
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert a character, replacing the selection if any.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf));
    }

    /// Insert a string, replacing the selection if any.
    pub fn insert_str(&mut self, s: &str) {
        let selection = self.selection();
        if s.is_empty() && selection.is_empty() {
            return;
        }
        self.replace_range(selection.clone(), s);
        self.set_caret(selection.start + s.len());
    }

    /// Split the current line at the caret (Enter key).
    pub fn split_line(&mut self) {
        self.insert_char('\n');
    }

    /// Delete the selection or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let selection = self.selection();
        if !selection.is_empty() {
            self.replace_range(selection.clone(), "");
            self.set_caret(selection.start);
            return true;
        }
        if self.caret == 0 {
            return false;
        }
        let prev = self.prev_boundary(self.caret);
        self.replace_range(prev..self.caret, "");
        self.set_caret(prev);
        true
    }

    /// Delete the selection or the character at the caret (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        let selection = self.selection();
        if !selection.is_empty() {
            self.replace_range(selection.clone(), "");
            self.set_caret(selection.start);
            return true;
        }
        if self.caret >= self.len() {
            return false;
        }
        let next = self.next_boundary(self.caret);
        self.replace_range(self.caret..next, "");
        true
    }

    /// Replace the whole text, placing the caret at `caret`.
    ///
    /// No-op apart from the caret when the text is unchanged.
    pub fn replace_all(&mut self, text: &str, caret: usize) {
        if self.rope != text {
            self.rope = Rope::from_str(text);
            self.dirty = true;
        }
        self.anchor = None;
        let caret = self.clamp_offset(caret);
        self.set_caret(caret);
    }

    /// Apply the result of a caret insertion, selecting its placeholder.
    pub fn apply_insertion(&mut self, insertion: &Insertion) {
        self.replace_all(&insertion.text, insertion.caret);
        if let Some(selection) = insertion.selection.clone() {
            self.select(selection);
        }
    }

    /// Move the caret in the given direction, collapsing any selection.
    pub fn move_cursor(&mut self, direction: Direction) {
        self.anchor = None;
        match direction {
            Direction::Left => {
                let prev = self.prev_boundary(self.caret);
                self.set_caret(prev);
            }
            Direction::Right => {
                let next = self.next_boundary(self.caret);
                self.set_caret(next);
            }
            Direction::Up => self.move_vertical(false),
            Direction::Down => self.move_vertical(true),
        }
    }

    /// Move caret to the beginning of the line (Home).
    pub fn move_home(&mut self) {
        self.anchor = None;
        let line = self.rope.byte_to_line(self.caret);
        self.set_caret(self.rope.line_to_byte(line));
    }

    /// Move caret to the end of the line (End).
    pub fn move_end(&mut self) {
        self.anchor = None;
        let line = self.rope.byte_to_line(self.caret);
        self.set_caret(self.rope.line_to_byte(line) + self.line_len(line));
    }

    /// Move caret to a line and character column (e.g. from a mouse click).
    pub fn move_to(&mut self, line: usize, col: usize) {
        let line = line.min(self.line_count().saturating_sub(1));
        let text = self.line_at(line).unwrap_or_default();
        let byte_col = text.char_indices().nth(col).map_or(text.len(), |(i, _)| i);
        self.move_to_offset(self.line_start(line) + byte_col);
    }

    /// Move caret to a byte offset, clamped to the buffer.
    pub fn move_to_offset(&mut self, offset: usize) {
        self.anchor = None;
        let offset = self.clamp_offset(offset);
        self.set_caret(offset);
    }

    // --- Private helpers ---

    fn replace_range(&mut self, range: Range<usize>, text: &str) {
        let start = self.rope.byte_to_char(range.start);
        let end = self.rope.byte_to_char(range.end);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
        self.anchor = None;
        self.dirty = true;
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = offset;
        let line = self.rope.byte_to_line(offset);
        self.col_memory = offset - self.rope.line_to_byte(line);
    }

    fn move_vertical(&mut self, down: bool) {
        let line = self.rope.byte_to_line(self.caret);
        let target = if down {
            if line + 1 >= self.line_count() {
                return;
            }
            line + 1
        } else {
            if line == 0 {
                return;
            }
            line - 1
        };
        let memory = self.col_memory;
        let text = self.line_at(target).unwrap_or_default();
        let mut col = memory.min(text.len());
        while !text.is_char_boundary(col) {
            col -= 1;
        }
        self.caret = self.rope.line_to_byte(target) + col;
        self.col_memory = memory;
    }

    fn clamp_offset(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.len());
        // byte_to_char floors to the containing char
        offset = self.rope.char_to_byte(self.rope.byte_to_char(offset));
        offset
    }

    fn prev_boundary(&self, offset: usize) -> usize {
        let ch = self.rope.byte_to_char(offset);
        self.rope.char_to_byte(ch.saturating_sub(1))
    }

    fn next_boundary(&self, offset: usize) -> usize {
        let ch = self.rope.byte_to_char(offset);
        self.rope.char_to_byte((ch + 1).min(self.rope.len_chars()))
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("caret", &self.caret)
            .field("anchor", &self.anchor)
            .field("dirty", &self.dirty)
            .finish()
    }
}
