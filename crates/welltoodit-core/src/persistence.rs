//! Debounced persistence of the note.
//!
//! The document text and its save timestamp are always written together,
//! text first. If the timestamp write fails after the text succeeded, the
//! stored timestamp is older than the stored text, never newer.

use crate::config::StorageKeys;
use crate::scheduler::{Scheduler, Timer, TimerHandle};
use crate::storage::{KeyValueStore, StorageResult};
use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;

/// What a previous session left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedNote {
    pub text: Option<String>,
    pub last_save: Option<DateTime<Utc>>,
}

impl SavedNote {
    /// No prior note exists.
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
    }
}

#[derive(Debug)]
struct PendingSave {
    handle: TimerHandle,
    text: String,
}

/// Writes the note to a [`KeyValueStore`], debouncing rapid edits.
pub struct PersistenceManager<S: KeyValueStore> {
    /// Storage backend.
    store: S,
    text_key: String,
    last_save_key: String,
    /// Quiet period before a scheduled save fires.
    debounce: Duration,
    /// At most one save waits at any time.
    pending: Option<PendingSave>,
    /// Instant of the last successful save in this session (or loaded).
    last_save: Option<DateTime<Utc>>,
}

impl<S: KeyValueStore> PersistenceManager<S> {
    pub fn new(store: S, keys: &StorageKeys, debounce: Duration) -> Self {
        Self {
            store,
            text_key: keys.text.clone(),
            last_save_key: keys.last_save.clone(),
            debounce,
            pending: None,
            last_save: None,
        }
    }

    /// Schedule a save of `text` after the quiet period, replacing any save
    /// already waiting.
    pub fn schedule_save(&mut self, text: &str, scheduler: &mut impl Scheduler) {
        self.cancel_pending(scheduler);
        let handle = scheduler.schedule(self.debounce, Timer::Save);
        log::debug!("Save scheduled in {:?}", self.debounce);
        self.pending = Some(PendingSave {
            handle,
            text: text.to_string(),
        });
    }

    /// Whether a debounced save is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the waiting save. Called when [`Timer::Save`] fires.
    ///
    /// Returns `Ok(None)` if nothing was pending.
    pub fn flush_pending(
        &mut self,
        scheduler: &mut impl Scheduler,
    ) -> StorageResult<Option<DateTime<Utc>>> {
        match self.pending.take() {
            Some(pending) => self.save_now(&pending.text, scheduler).map(Some),
            None => Ok(None),
        }
    }

    /// Persist `text` and the current instant immediately.
    ///
    /// Supersedes any pending debounced save. On failure the in-memory
    /// last-save instant is left unchanged.
    pub fn save_now(
        &mut self,
        text: &str,
        scheduler: &mut impl Scheduler,
    ) -> StorageResult<DateTime<Utc>> {
        self.cancel_pending(scheduler);

        let now = scheduler.now();
        self.store.set(&self.text_key, text)?;
        self.store
            .set(&self.last_save_key, &now.to_rfc3339_opts(SecondsFormat::Millis, true))?;

        self.last_save = Some(now);
        Ok(now)
    }

    /// Read the persisted note. Absent keys mean "no prior note".
    ///
    /// The timestamp is only consulted when text exists. A timestamp that
    /// cannot be read or parsed is ignored; the text still loads.
    pub fn load_saved(&mut self) -> StorageResult<SavedNote> {
        let Some(text) = self.store.get(&self.text_key)? else {
            self.last_save = None;
            return Ok(SavedNote::default());
        };

        let last_save = match self.store.get(&self.last_save_key) {
            Ok(Some(raw)) => match DateTime::parse_from_rfc3339(&raw) {
                Ok(t) => Some(t.with_timezone(&Utc)),
                Err(e) => {
                    log::warn!("Ignoring unreadable save timestamp '{}': {}", raw, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read save timestamp: {}", e);
                None
            }
        };

        self.last_save = last_save;
        Ok(SavedNote {
            text: Some(text),
            last_save,
        })
    }

    /// Remove the persisted note and timestamp and forget the last save.
    ///
    /// Any pending save is cancelled so cleared content cannot come back.
    /// Both keys are attempted even if the first removal fails.
    pub fn clear(&mut self, scheduler: &mut impl Scheduler) -> StorageResult<()> {
        self.cancel_pending(scheduler);
        self.last_save = None;

        let text = self.store.remove(&self.text_key);
        let stamp = self.store.remove(&self.last_save_key);
        text.and(stamp)
    }

    /// Instant of the last save, `None` for "never".
    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        self.last_save
    }

    /// Get a reference to the storage backend.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn cancel_pending(&mut self, scheduler: &mut impl Scheduler) {
        if let Some(pending) = self.pending.take() {
            scheduler.cancel(pending.handle);
        }
    }
}
