//! Notepad configuration.

use serde::Deserialize;
use std::time::Duration;

/// Store keys under which the notepad persists its state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub text: String,
    pub last_save: String,
    pub theme: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            text: "note-text".to_string(),
            last_save: "note-last-save".to_string(),
            theme: "note-theme".to_string(),
        }
    }
}

/// Tunables for the notepad. Every field falls back to its default when
/// missing from a JSON override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NotepadConfig {
    /// Quiet period before a debounced save fires.
    pub save_debounce_ms: u64,
    /// Delay between a paste event and reading the pasted text.
    pub paste_settle_ms: u64,
    /// How long the "saved" indicator stays visible.
    pub save_indicator_ms: u64,
    /// Interval of the last-save relative time refresh.
    pub last_save_refresh_secs: u64,
    pub keys: StorageKeys,
    /// Filename prefix of exported notes.
    pub export_prefix: String,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            save_debounce_ms: 500,
            paste_settle_ms: 10,
            save_indicator_ms: 2000,
            last_save_refresh_secs: 60,
            keys: StorageKeys::default(),
            export_prefix: "welltoodit_note".to_string(),
        }
    }
}

impl NotepadConfig {
    /// Parse a JSON override.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    pub fn paste_settle(&self) -> Duration {
        Duration::from_millis(self.paste_settle_ms)
    }

    pub fn save_indicator(&self) -> Duration {
        Duration::from_millis(self.save_indicator_ms)
    }

    pub fn last_save_refresh(&self) -> Duration {
        Duration::from_secs(self.last_save_refresh_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NotepadConfig::default();
        assert_eq!(config.save_debounce(), Duration::from_millis(500));
        assert_eq!(config.last_save_refresh(), Duration::from_secs(60));
        assert_eq!(config.keys.text, "note-text");
        assert_eq!(config.keys.last_save, "note-last-save");
        assert_eq!(config.keys.theme, "note-theme");
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{"save_debounce_ms": 250, "keys": {"theme": "t"}}"#;
        let config = NotepadConfig::from_json(json).unwrap();
        assert_eq!(config.save_debounce_ms, 250);
        assert_eq!(config.keys.theme, "t");
        assert_eq!(config.keys.text, "note-text");
        assert_eq!(config.export_prefix, "welltoodit_note");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(NotepadConfig::from_json("{not json").is_err());
        assert!(NotepadConfig::from_json(r#"{"save_debounce_ms": "soon"}"#).is_err());
    }
}
