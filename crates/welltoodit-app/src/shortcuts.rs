//! Keyboard shortcut registry and documentation.

/// Operation a shortcut triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Save,
    Clear,
    Download,
    ToggleTheme,
}

/// A key press with its modifier state, as reported by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyChord {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyChord {
    /// Chord with Ctrl held.
    pub fn ctrl(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: true,
            ..Default::default()
        }
    }

    /// Chord with Cmd (meta) held.
    pub fn meta(key: &str) -> Self {
        Self {
            key: key.to_string(),
            meta: true,
            ..Default::default()
        }
    }

    /// Chord without modifiers.
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ..Default::default()
        }
    }
}

/// A keyboard shortcut definition. Every shortcut is bound to Ctrl on
/// Windows/Linux and Cmd on macOS.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub action: Action,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, action: Action, description: &'static str) -> Self {
        Self {
            key,
            action,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        format!("Ctrl+{}", self.key)
    }

    /// Whether `chord` triggers this shortcut. Letter case is ignored so
    /// Caps Lock does not disable shortcuts.
    pub fn matches(&self, chord: &KeyChord) -> bool {
        (chord.ctrl || chord.meta) && chord.key.eq_ignore_ascii_case(self.key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new("S", Action::Save, "Save now"),
            Shortcut::new("N", Action::Clear, "Clear note"),
            Shortcut::new("D", Action::Download, "Download as text file"),
            Shortcut::new("T", Action::ToggleTheme, "Toggle light/dark theme"),
        ]
    }

    /// Find the action bound to `chord`, if any.
    pub fn action_for(chord: &KeyChord) -> Option<Action> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(chord))
            .map(|s| s.action)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        for shortcut in Self::all() {
            log::debug!("  {:8} {}", shortcut.format(), shortcut.description);
        }
    }
}
