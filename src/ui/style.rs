//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette, with darker
//! indexed colors on light backgrounds.

use std::sync::{Mutex, OnceLock};

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

static BACKGROUND_OVERRIDE: OnceLock<Mutex<Option<Background>>> = OnceLock::new();

/// Apply the `--theme` choice; `Auto` defers to `COLORFGBG`.
pub fn set_theme(mode: ThemeMode) {
    set_background(match mode {
        ThemeMode::Auto => None,
        ThemeMode::Light => Some(Background::Light),
        ThemeMode::Dark => Some(Background::Dark),
    });
}

pub fn set_background(mode: Option<Background>) {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(mut guard) = lock.lock() {
        *guard = mode;
    }
}

pub fn background() -> Background {
    let lock = BACKGROUND_OVERRIDE.get_or_init(|| Mutex::new(None));
    if let Ok(guard) = lock.lock()
        && let Some(mode) = *guard
    {
        return mode;
    }
    background_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

fn background_from_colorfgbg(colorfgbg: Option<&str>) -> Background {
    let Some(value) = colorfgbg else {
        return Background::Dark;
    };
    let bg_str = value.rsplit(';').next().unwrap_or(value);
    match bg_str.parse::<u8>() {
        Ok(bg) if bg >= 7 => Background::Light,
        _ => Background::Dark,
    }
}

fn pick(light: Color, dark: Color) -> Color {
    match background() {
        Background::Light => light,
        Background::Dark => dark,
    }
}

/// Rendered formula in the preview pane.
pub fn math_style(selected: bool) -> Style {
    let style = Style::default()
        .fg(pick(Color::Indexed(24), Color::Cyan))
        .add_modifier(Modifier::ITALIC);
    if selected {
        style.add_modifier(Modifier::REVERSED)
    } else {
        style
    }
}

/// Display-math formulas stand out a little more.
pub fn display_math_style(selected: bool) -> Style {
    math_style(selected).add_modifier(Modifier::BOLD)
}

/// Bullet glyphs and list numbers.
pub fn marker_style() -> Style {
    Style::default()
        .fg(pick(Color::Indexed(58), Color::Yellow))
        .add_modifier(Modifier::BOLD)
}

/// `$…$` runs in the raw source pane.
pub fn source_math_style(selected: bool) -> Style {
    let style = Style::default().fg(pick(Color::Indexed(90), Color::Magenta));
    if selected {
        style.add_modifier(Modifier::UNDERLINED)
    } else {
        style
    }
}

pub fn caret_style() -> Style {
    Style::default().bg(Color::White).fg(Color::Black)
}

/// Selected text, e.g. a placeholder waiting to be replaced.
pub fn selection_style() -> Style {
    Style::default().bg(Color::Yellow).fg(Color::Black)
}

pub fn gutter_style() -> Style {
    Style::default().fg(Color::DarkGray)
}
