//! Welltoodit Core Library
//!
//! Platform-agnostic logic for the Welltoodit notepad: debounced persistence
//! over a key-value store, word/character stats, theme resolution, export,
//! and the scheduler abstraction everything timed runs on.

pub mod config;
pub mod error;
pub mod export;
pub mod persistence;
pub mod relative_time;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod theme;

pub use config::{NotepadConfig, StorageKeys};
pub use error::NoteError;
pub use export::{export_document, export_filename, ExportArtifact, EXPORT_MIME};
pub use persistence::{PersistenceManager, SavedNote};
pub use relative_time::format_last_save;
pub use scheduler::{ManualScheduler, Scheduler, Timer, TimerHandle};
pub use stats::{compute_stats, format_count, is_blank, DocumentStats};
pub use storage::{KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use theme::{Theme, ThemeCoordinator};
