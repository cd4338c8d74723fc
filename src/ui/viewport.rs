//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible window of a pane, either
//! rendered preview lines or raw source lines.

use std::ops::Range;

/// Manages the visible portion of a pane.
///
/// # Example
///
/// ```
/// use mathtext::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 24, 100);
/// assert_eq!(vp.visible_range(), 0..24);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..34);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Range of visible lines, clamped to the content.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll position as a percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll the minimum amount needed to show `line`.
    pub fn ensure_visible(&mut self, line: usize) {
        let height = (self.height as usize).max(1);
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + height {
            self.offset = line + 1 - height;
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the total number of lines (e.g., after an edit).
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_range_with_short_content() {
        let vp = Viewport::new(80, 24, 10);
        assert_eq!(vp.visible_range(), 0..10);
        assert_eq!(vp.scroll_percent(), 100);
    }

    #[test]
    fn test_scroll_down_clamps_to_max() {
        let mut vp = Viewport::new(80, 24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        vp.scroll_up(1000);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_paging() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 10);
        vp.page_up();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_ensure_visible_scrolls_minimally() {
        let mut vp = Viewport::new(80, 5, 100);
        vp.ensure_visible(3);
        assert_eq!(vp.offset(), 0);
        vp.ensure_visible(7);
        assert_eq!(vp.offset(), 3);
        vp.ensure_visible(1);
        assert_eq!(vp.offset(), 1);
    }

    #[test]
    fn test_set_total_lines_clamps_offset() {
        let mut vp = Viewport::new(80, 10, 100);
        vp.scroll_down(80);
        vp.set_total_lines(20);
        assert_eq!(vp.offset(), 10);
    }
}
