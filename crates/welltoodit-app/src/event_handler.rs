//! Maps host events to notepad commands.

use crate::shortcuts::{Action, KeyChord, ShortcutRegistry};
use welltoodit_core::Timer;

/// Everything the host can report to the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The input surface's text changed.
    TextChanged(String),
    /// A paste into the input surface started.
    Paste,
    ClearRequested,
    DownloadRequested,
    SaveRequested,
    ThemeToggleRequested,
    KeyDown(KeyChord),
    VisibilityChanged { visible: bool },
    /// The page is about to unload.
    Unload,
    SystemThemeChanged { prefers_dark: bool },
    /// A scheduled timer is due.
    Timer(Timer),
}

/// The single operation an event resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Edit(String),
    AwaitPaste,
    Clear,
    Download,
    SaveNow,
    ToggleTheme,
    RefreshLastSave,
    Unload,
    FollowSystemTheme(bool),
    Fire(Timer),
}

/// Whether the host should suppress its default handling of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

impl EventOutcome {
    pub fn prevent_default(self) -> bool {
        self == EventOutcome::Handled
    }
}

/// Resolve `event` to its command. `None` means the event is not ours.
pub fn command_for(event: AppEvent) -> Option<Command> {
    let command = match event {
        AppEvent::TextChanged(text) => Command::Edit(text),
        AppEvent::Paste => Command::AwaitPaste,
        AppEvent::ClearRequested => Command::Clear,
        AppEvent::DownloadRequested => Command::Download,
        AppEvent::SaveRequested => Command::SaveNow,
        AppEvent::ThemeToggleRequested => Command::ToggleTheme,
        AppEvent::KeyDown(chord) => match ShortcutRegistry::action_for(&chord)? {
            Action::Save => Command::SaveNow,
            Action::Clear => Command::Clear,
            Action::Download => Command::Download,
            Action::ToggleTheme => Command::ToggleTheme,
        },
        AppEvent::VisibilityChanged { visible: true } => Command::RefreshLastSave,
        AppEvent::VisibilityChanged { visible: false } => return None,
        AppEvent::Unload => Command::Unload,
        AppEvent::SystemThemeChanged { prefers_dark } => Command::FollowSystemTheme(prefers_dark),
        AppEvent::Timer(timer) => Command::Fire(timer),
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_and_chords_share_commands() {
        assert_eq!(
            command_for(AppEvent::ClearRequested),
            command_for(AppEvent::KeyDown(KeyChord::ctrl("n")))
        );
        assert_eq!(
            command_for(AppEvent::DownloadRequested),
            command_for(AppEvent::KeyDown(KeyChord::ctrl("d")))
        );
        assert_eq!(
            command_for(AppEvent::SaveRequested),
            command_for(AppEvent::KeyDown(KeyChord::ctrl("s")))
        );
        assert_eq!(
            command_for(AppEvent::ThemeToggleRequested),
            command_for(AppEvent::KeyDown(KeyChord::meta("t")))
        );
    }

    #[test]
    fn test_text_and_paste() {
        assert_eq!(
            command_for(AppEvent::TextChanged("abc".to_string())),
            Some(Command::Edit("abc".to_string()))
        );
        assert_eq!(command_for(AppEvent::Paste), Some(Command::AwaitPaste));
    }

    #[test]
    fn test_visibility() {
        assert_eq!(
            command_for(AppEvent::VisibilityChanged { visible: true }),
            Some(Command::RefreshLastSave)
        );
        assert_eq!(command_for(AppEvent::VisibilityChanged { visible: false }), None);
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        assert_eq!(command_for(AppEvent::KeyDown(KeyChord::plain("a"))), None);
        assert_eq!(command_for(AppEvent::KeyDown(KeyChord::ctrl("z"))), None);
    }

    #[test]
    fn test_lifecycle_events() {
        assert_eq!(command_for(AppEvent::Unload), Some(Command::Unload));
        assert_eq!(
            command_for(AppEvent::SystemThemeChanged { prefers_dark: true }),
            Some(Command::FollowSystemTheme(true))
        );
        assert_eq!(command_for(AppEvent::Timer(Timer::Save)), Some(Command::Fire(Timer::Save)));
    }

    #[test]
    fn test_outcome() {
        assert!(EventOutcome::Handled.prevent_default());
        assert!(!EventOutcome::Ignored.prevent_default());
    }
}
