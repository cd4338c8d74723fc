use tracing::{info, warn};

use crate::app::{App, Message, Model, ToastLevel};

impl App {
    /// Perform I/O requested by a message after `update` has run.
    pub(super) fn handle_message_side_effects(model: &mut Model, msg: &Message) {
        if *msg != Message::Save {
            return;
        }
        match model.save() {
            Ok(()) => {
                info!(path = %model.file_path.display(), "buffer saved");
                crate::perf::log_event("file.save", model.file_path.display().to_string());
                let name = model.file_path.file_name().map_or_else(
                    || model.file_path.display().to_string(),
                    |n| n.to_string_lossy().to_string(),
                );
                model.show_toast(ToastLevel::Info, format!("Saved {name}"));
            }
            Err(err) => {
                warn!(%err, "save failed");
                model.show_toast(ToastLevel::Error, format!("Save failed: {err:#}"));
            }
        }
    }
}
