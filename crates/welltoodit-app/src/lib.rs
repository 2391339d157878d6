//! Welltoodit Application
//!
//! The application context wiring core notepad logic to a host surface,
//! plus the browser entry point.

mod app;
mod event_handler;
mod host;
mod shortcuts;

pub use app::{App, CLEAR_CONFIRMATION, DOWNLOAD_FAILED, SAVE_FAILED};
pub use event_handler::{command_for, AppEvent, Command, EventOutcome};
pub use host::{Host, HostError};
pub use shortcuts::{Action, KeyChord, Shortcut, ShortcutRegistry};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
