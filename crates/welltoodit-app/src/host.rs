//! The surface the application renders into and the browser facilities it
//! borrows (dialogs, downloads, colour-scheme query).

use thiserror::Error;
use welltoodit_core::{ExportArtifact, Theme};

/// Failures of the host surface itself.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Download failed: {0}")]
    Download(String),
}

/// Host-side view and services.
pub trait Host {
    /// Current contents of the text input surface.
    fn input_text(&self) -> String;

    fn set_input_text(&mut self, text: &str);

    fn focus_input(&mut self);

    /// Show formatted word and character counts.
    fn render_counts(&mut self, words: &str, chars: &str);

    fn render_last_save(&mut self, label: &str);

    fn set_save_indicator(&mut self, visible: bool);

    /// Set the theme attribute consumed by styling.
    fn apply_theme(&mut self, theme: Theme);

    fn system_prefers_dark(&self) -> bool;

    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;

    /// Blocking message.
    fn alert(&mut self, message: &str);

    /// Non-blocking error notice.
    fn notify_error(&mut self, message: &str);

    /// Hand `artifact` to the browser's save/download facility.
    fn download(&mut self, artifact: &ExportArtifact) -> Result<(), HostError>;
}
