//! Core application state and lifecycle.

use chrono::Local;
use std::rc::Rc;
use welltoodit_core::{
    compute_stats, export_document, format_count, format_last_save, is_blank, DocumentStats,
    KeyValueStore, NoteError, NotepadConfig, PersistenceManager, Scheduler, StorageError, Theme,
    ThemeCoordinator, Timer, TimerHandle,
};

use crate::event_handler::{command_for, AppEvent, Command, EventOutcome};
use crate::host::Host;
use crate::shortcuts::ShortcutRegistry;

pub const CLEAR_CONFIRMATION: &str =
    "Are you sure you want to clear all your notes? This action cannot be undone.";
pub const SAVE_FAILED: &str = "Failed to save note. Storage might be full.";
pub const DOWNLOAD_FAILED: &str = "Download failed. Please try again.";

/// The notepad's application context, constructed once at startup.
///
/// All state is owned here and touched only from the host's single
/// execution context; timers come back in through [`App::handle`].
pub struct App<S: KeyValueStore, T: Scheduler, H: Host> {
    config: NotepadConfig,
    /// The note as last reported by the input surface.
    document: String,
    stats: DocumentStats,
    persistence: PersistenceManager<Rc<S>>,
    theme: ThemeCoordinator<Rc<S>>,
    scheduler: T,
    host: H,
    indicator_timer: Option<TimerHandle>,
    refresh_timer: Option<TimerHandle>,
    /// The stored note could not be read and nothing has been typed since.
    /// The empty document must not be written over it.
    load_failed: bool,
}

impl<S: KeyValueStore, T: Scheduler, H: Host> App<S, T, H> {
    pub fn new(config: NotepadConfig, store: S, scheduler: T, host: H) -> Self {
        let store = Rc::new(store);
        let persistence =
            PersistenceManager::new(store.clone(), &config.keys, config.save_debounce());
        let theme = ThemeCoordinator::new(store, config.keys.theme.clone());

        Self {
            config,
            document: String::new(),
            stats: DocumentStats::default(),
            persistence,
            theme,
            scheduler,
            host,
            indicator_timer: None,
            refresh_timer: None,
            load_failed: false,
        }
    }

    /// Load the saved note, render counts and last-save time, resolve the
    /// theme and start the periodic refresh.
    pub fn start(&mut self) {
        match self.persistence.load_saved() {
            Ok(note) => {
                if let Some(text) = note.text {
                    log::info!("Loaded saved note ({} bytes)", text.len());
                    self.host.set_input_text(&text);
                    self.document = text;
                }
            }
            Err(e) => {
                self.load_failed = true;
                self.report_storage_error("load", e, "Failed to load your saved note.");
            }
        }

        self.update_stats();
        self.render_last_save();

        let theme = self.theme.resolve_initial_theme(self.host.system_prefers_dark());
        self.apply_theme(theme);

        self.arm_refresh();
        ShortcutRegistry::log_all();
        log::info!("Welltoodit initialized");
    }

    /// Dispatch one host event.
    pub fn handle(&mut self, event: AppEvent) -> EventOutcome {
        let Some(command) = command_for(event) else {
            return EventOutcome::Ignored;
        };

        match command {
            Command::Edit(text) => self.edit(text),
            Command::AwaitPaste => {
                self.scheduler.schedule(self.config.paste_settle(), Timer::PasteSettled);
            }
            Command::Clear => self.clear(),
            Command::Download => self.download(),
            Command::SaveNow => self.save_now(),
            Command::ToggleTheme => self.toggle_theme(),
            Command::RefreshLastSave => self.render_last_save(),
            Command::Unload => self.save_now(),
            Command::FollowSystemTheme(prefers_dark) => {
                if let Some(theme) = self.theme.on_system_preference_changed(prefers_dark) {
                    self.host.apply_theme(theme);
                }
            }
            Command::Fire(timer) => self.fire(timer),
        }
        EventOutcome::Handled
    }

    fn fire(&mut self, timer: Timer) {
        match timer {
            Timer::Save => match self.persistence.flush_pending(&mut self.scheduler) {
                Ok(Some(_)) => self.saved(),
                Ok(None) => {}
                Err(e) => self.report_storage_error("save", e, SAVE_FAILED),
            },
            Timer::PasteSettled => {
                let text = self.host.input_text();
                self.edit(text);
            }
            Timer::HideSaveIndicator => {
                self.indicator_timer = None;
                self.host.set_save_indicator(false);
            }
            Timer::RefreshLastSave => {
                self.refresh_timer = None;
                self.render_last_save();
                self.arm_refresh();
            }
        }
    }

    fn edit(&mut self, text: String) {
        self.load_failed = false;
        self.document = text;
        self.update_stats();
        self.persistence.schedule_save(&self.document, &mut self.scheduler);
    }

    fn save_now(&mut self) {
        if self.load_failed {
            log::warn!("Save skipped: the stored note was never loaded");
            return;
        }
        match self.persistence.save_now(&self.document, &mut self.scheduler) {
            Ok(_) => self.saved(),
            Err(e) => self.report_storage_error("save", e, SAVE_FAILED),
        }
    }

    /// Feedback after a successful save.
    fn saved(&mut self) {
        self.host.set_save_indicator(true);
        if let Some(handle) = self.indicator_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.indicator_timer = Some(
            self.scheduler
                .schedule(self.config.save_indicator(), Timer::HideSaveIndicator),
        );
        self.render_last_save();
    }

    fn clear(&mut self) {
        if is_blank(&self.document) {
            return;
        }
        if !self.host.confirm(CLEAR_CONFIRMATION) {
            return;
        }

        self.document.clear();
        self.host.set_input_text("");
        if let Err(e) = self.persistence.clear(&mut self.scheduler) {
            self.report_storage_error("clear", e, "Failed to clear your saved note.");
        }
        self.update_stats();
        self.render_last_save();
        self.host.focus_input();
        log::info!("Note cleared by user");
    }

    fn download(&mut self) {
        let at = self.scheduler.now().with_timezone(&Local).naive_local();
        let artifact = match export_document(&self.document, &self.config.export_prefix, at) {
            Ok(artifact) => artifact,
            Err(NoteError::EmptyDocument) => {
                self.host.alert(&NoteError::EmptyDocument.to_string());
                return;
            }
            Err(NoteError::Storage(e)) => {
                self.report_storage_error("export", e, DOWNLOAD_FAILED);
                return;
            }
        };

        match self.host.download(&artifact) {
            Ok(()) => log::info!("Note downloaded as: {}", artifact.filename),
            Err(e) => {
                log::error!("{}", e);
                self.host.alert(DOWNLOAD_FAILED);
            }
        }
    }

    fn toggle_theme(&mut self) {
        let (theme, persisted) = self.theme.toggle_theme();
        self.host.apply_theme(theme);
        if let Err(e) = persisted {
            self.report_storage_error("theme update", e, "Failed to remember your theme choice.");
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme.apply_theme(theme);
        self.host.apply_theme(theme);
    }

    fn update_stats(&mut self) {
        self.stats = compute_stats(&self.document);
        self.host
            .render_counts(&format_count(self.stats.words), &format_count(self.stats.chars));
    }

    fn render_last_save(&mut self) {
        let label = format_last_save(self.persistence.last_save(), self.scheduler.now());
        self.host.render_last_save(&label);
    }

    fn arm_refresh(&mut self) {
        if let Some(handle) = self.refresh_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.refresh_timer = Some(
            self.scheduler
                .schedule(self.config.last_save_refresh(), Timer::RefreshLastSave),
        );
    }

    fn report_storage_error(&mut self, operation: &str, error: StorageError, message: &str) {
        log::error!("Storage failure during {}: {}", operation, error);
        self.host.notify_error(message);
    }

    /// Current document text.
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn stats(&self) -> DocumentStats {
        self.stats
    }

    pub fn theme(&self) -> Theme {
        self.theme.active()
    }

    pub fn config(&self) -> &NotepadConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut T {
        &mut self.scheduler
    }
}
