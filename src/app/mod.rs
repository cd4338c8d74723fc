//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, Prompt, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::document::TokenizerOptions;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    options: TokenizerOptions,
}

impl App {
    /// Create a new application editing the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            options: TokenizerOptions::default(),
        }
    }

    /// Set the tokenizer switches used for the preview.
    #[must_use]
    pub const fn with_options(mut self, options: TokenizerOptions) -> Self {
        self.options = options;
        self
    }
}
