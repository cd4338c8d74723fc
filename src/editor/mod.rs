//! Editing primitives for the raw source buffer.
//!
//! Offsets are byte offsets throughout, matching token and edit request
//! offsets produced by [`crate::document`].

mod buffer;
mod caret;
mod guard;
mod locate;
mod splice;

pub use buffer::{Cursor, Direction, EditorBuffer};
pub use caret::{
    Insertion, PLACEHOLDER, insert_at_caret, next_placeholder, prev_placeholder, replace_selection,
};
pub use guard::{GuardKey, GuardOutcome, guard_key};
pub use locate::{EditOutcome, Located, Tier, apply_edit, locate, remove_expression, wrap_formula};
pub use splice::{SpliceError, splice};
