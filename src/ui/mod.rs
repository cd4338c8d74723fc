//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::{line_number_width, preview_line, render, source_gutter_width};

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas of the two-pane editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneLayout {
    /// Rendered preview, including its border
    pub preview: Rect,
    /// Raw source, including its border
    pub source: Rect,
    /// Prompt or toast line
    pub message: Rect,
    pub status: Rect,
}

impl PaneLayout {
    /// Area inside the preview border.
    pub const fn preview_inner(&self) -> Rect {
        inner(self.preview)
    }

    /// Area inside the source border.
    pub const fn source_inner(&self) -> Rect {
        inner(self.source)
    }
}

/// Split the terminal into preview, source, message and status areas.
pub fn pane_layout(area: Rect) -> PaneLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(2), Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let panes = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);
    PaneLayout {
        preview: panes[0],
        source: panes[1],
        message: rows[1],
        status: rows[2],
    }
}

const fn inner(area: Rect) -> Rect {
    Rect {
        x: area.x.saturating_add(1),
        y: area.y.saturating_add(1),
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    }
}

#[cfg(test)]
mod tests;
