// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. quiz::QuizError)
    clippy::module_name_repetitions
)]

//! # Mathtext
//!
//! A math-annotated text engine and terminal editor for quiz questions.
//!
//! Mathtext handles free-form text with inline `$…$` formulas:
//! - Tokenizing text into literal and math tokens with byte offsets
//! - Bullet-aware line segmentation and display spans
//! - Editing one formula in place even after the text around it changed
//! - Identifiers for new questions and options
//!
//! ## Architecture
//!
//! The terminal front end uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`document`]: Tokenizing, line segmentation and span assembly
//! - [`editor`]: Buffer, formula guard, edit locator and caret insertion
//! - [`id`]: Identifier generation
//! - [`quiz`]: Question and option constructors
//! - [`ui`]: Terminal UI components
//! - [`config`]: Persistent flag defaults
//! - [`perf`]: Timing and debug event logging

pub mod app;
pub mod config;
pub mod document;
pub mod editor;
pub mod id;
pub mod perf;
pub mod quiz;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::{Document, EditRequest, TokenizerOptions};
    pub use crate::editor::{EditorBuffer, apply_edit, insert_at_caret};
    pub use crate::id::IdGenerator;
    pub use crate::quiz::{Question, QuestionKind};
    pub use crate::ui::viewport::Viewport;
}
