//! Light/dark theme resolution and persistence.
//!
//! An explicit user choice, once persisted, always wins over the system
//! colour-scheme preference. "System" is only a fallback and is never stored.

use crate::storage::{KeyValueStore, StorageResult};
use std::fmt;
use std::str::FromStr;

/// Active colour theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Theme matching the system's `prefers-color-scheme`.
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Resolves, applies and persists the theme.
pub struct ThemeCoordinator<S: KeyValueStore> {
    store: S,
    key: String,
    active: Theme,
    /// An explicit choice was made or loaded this session.
    overridden: bool,
}

impl<S: KeyValueStore> ThemeCoordinator<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            active: Theme::default(),
            overridden: false,
        }
    }

    /// The persisted override, if any. Unreadable or unrecognised values
    /// count as no override.
    pub fn persisted_override(&self) -> Option<Theme> {
        match self.store.get(&self.key) {
            Ok(Some(value)) => match value.parse() {
                Ok(theme) => Some(theme),
                Err(e) => {
                    log::warn!("Ignoring persisted theme: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::error!("Failed to read theme preference: {}", e);
                None
            }
        }
    }

    pub fn has_override(&self) -> bool {
        self.overridden || self.persisted_override().is_some()
    }

    /// Explicit override if one exists, otherwise the system preference.
    pub fn resolve_initial_theme(&mut self, system_prefers_dark: bool) -> Theme {
        match self.persisted_override() {
            Some(theme) => {
                self.overridden = true;
                theme
            }
            None => Theme::from_system(system_prefers_dark),
        }
    }

    /// Make `theme` the active theme. Idempotent.
    pub fn apply_theme(&mut self, theme: Theme) -> Theme {
        if self.active != theme {
            log::info!("Theme switched to: {}", theme);
        }
        self.active = theme;
        theme
    }

    /// Flip the active theme and persist it as an explicit override.
    ///
    /// The flipped theme stays active even if persisting it fails; the error
    /// is returned so the caller can report it.
    pub fn toggle_theme(&mut self) -> (Theme, StorageResult<()>) {
        let theme = self.apply_theme(self.active.toggled());
        self.overridden = true;
        let persisted = self.store.set(&self.key, theme.as_str());
        (theme, persisted)
    }

    /// React to a system colour-scheme change. Returns the newly applied
    /// theme, or `None` when an explicit override suppresses the change.
    pub fn on_system_preference_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        if self.has_override() {
            log::debug!("System theme change ignored, explicit override present");
            return None;
        }
        Some(self.apply_theme(Theme::from_system(prefers_dark)))
    }

    pub fn active(&self) -> Theme {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, StorageError};
    use std::rc::Rc;

    const KEY: &str = "note-theme";

    fn coordinator() -> (Rc<MemoryStore>, ThemeCoordinator<Rc<MemoryStore>>) {
        let store = Rc::new(MemoryStore::new());
        let coordinator = ThemeCoordinator::new(store.clone(), KEY);
        (store, coordinator)
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
        assert!("system".parse::<Theme>().is_err());
        assert_eq!(Theme::Dark.to_string(), "dark");
    }

    #[test]
    fn test_initial_theme_follows_system_without_override() {
        let (_, mut coordinator) = coordinator();
        assert_eq!(coordinator.resolve_initial_theme(true), Theme::Dark);
        assert_eq!(coordinator.resolve_initial_theme(false), Theme::Light);
    }

    #[test]
    fn test_initial_theme_prefers_override() {
        let (store, mut coordinator) = coordinator();
        store.set(KEY, "light").unwrap();
        assert_eq!(coordinator.resolve_initial_theme(true), Theme::Light);
    }

    #[test]
    fn test_unknown_persisted_value_is_not_an_override() {
        let (store, mut coordinator) = coordinator();
        store.set(KEY, "purple").unwrap();
        assert!(!coordinator.has_override());
        assert_eq!(coordinator.resolve_initial_theme(true), Theme::Dark);
    }

    #[test]
    fn test_toggle_persists_override() {
        let (store, mut coordinator) = coordinator();
        coordinator.apply_theme(Theme::Light);

        let (theme, persisted) = coordinator.toggle_theme();
        assert!(persisted.is_ok());
        assert_eq!(theme, Theme::Dark);
        assert_eq!(coordinator.active(), Theme::Dark);
        assert_eq!(store.get(KEY).unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_system_change_applies_without_override() {
        let (_, mut coordinator) = coordinator();
        coordinator.apply_theme(Theme::Light);

        assert_eq!(coordinator.on_system_preference_changed(true), Some(Theme::Dark));
        assert_eq!(coordinator.active(), Theme::Dark);
    }

    #[test]
    fn test_system_change_suppressed_after_toggle() {
        let (_, mut coordinator) = coordinator();
        coordinator.apply_theme(Theme::Light);
        coordinator.toggle_theme();

        assert_eq!(coordinator.on_system_preference_changed(false), None);
        assert_eq!(coordinator.on_system_preference_changed(true), None);
        assert_eq!(coordinator.active(), Theme::Dark);
    }

    #[test]
    fn test_toggle_with_failing_store_still_applies() {
        let store = Rc::new(MemoryStore::with_quota(0));
        let mut coordinator = ThemeCoordinator::new(store, KEY);

        let (theme, persisted) = coordinator.toggle_theme();
        assert_eq!(theme, Theme::Dark);
        assert!(persisted.is_err());
        assert_eq!(coordinator.active(), Theme::Dark);
    }

    /// Store that accepts writes but fails every read.
    struct WriteOnlyStore;

    impl KeyValueStore for WriteOnlyStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Other("read failed".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_toggle_survives_unreadable_store() {
        let mut coordinator = ThemeCoordinator::new(WriteOnlyStore, KEY);
        assert_eq!(coordinator.resolve_initial_theme(false), Theme::Light);
        assert_eq!(coordinator.on_system_preference_changed(true), Some(Theme::Dark));

        coordinator.toggle_theme();
        assert!(coordinator.has_override());
        assert_eq!(coordinator.on_system_preference_changed(true), None);
        assert_eq!(coordinator.active(), Theme::Light);
    }

    #[test]
    fn test_loaded_override_survives_unreadable_store() {
        let (store, mut coordinator) = coordinator();
        store.set(KEY, "dark").unwrap();
        assert_eq!(coordinator.resolve_initial_theme(false), Theme::Dark);

        store.remove(KEY).unwrap();
        assert!(coordinator.has_override());
        assert_eq!(coordinator.on_system_preference_changed(false), None);
    }
}
