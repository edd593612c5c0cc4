//! Keyboard shortcuts.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A key the widget understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    S,
    L,
    R,
    Left,
    Right,
    Question,
    Escape,
    Q,
}

/// Error for key names that map to nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown key: {0}")]
pub struct UnknownKey(String);

impl FromStr for Key {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A bare space survives as itself; everything else is trimmed.
        if s == " " {
            return Ok(Self::Space);
        }
        match s.trim().to_lowercase().as_str() {
            "space" | "spacebar" => Ok(Self::Space),
            "s" => Ok(Self::S),
            "l" => Ok(Self::L),
            "r" => Ok(Self::R),
            "left" | "arrowleft" => Ok(Self::Left),
            "right" | "arrowright" => Ok(Self::Right),
            "?" => Ok(Self::Question),
            "esc" | "escape" => Ok(Self::Escape),
            "q" | "quit" => Ok(Self::Q),
            _ => Err(UnknownKey(s.to_string())),
        }
    }
}

/// What a key press asks the widget to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ToggleRun,
    Lap,
    Reset,
    PrevTheme,
    NextTheme,
    ShowHelp,
    CloseHelp,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ToggleRun => "toggle",
            Self::Lap => "lap",
            Self::Reset => "reset",
            Self::PrevTheme => "prev-theme",
            Self::NextTheme => "next-theme",
            Self::ShowHelp => "show-help",
            Self::CloseHelp => "close-help",
            Self::Quit => "quit",
        };
        write!(f, "{s}")
    }
}

/// Maps a key to an action.
///
/// The help overlay swallows every key except the ones that close it (and
/// quit).
pub const fn action_for(key: Key, help_visible: bool) -> Option<Action> {
    if help_visible {
        return match key {
            Key::Escape | Key::Question => Some(Action::CloseHelp),
            Key::Q => Some(Action::Quit),
            _ => None,
        };
    }
    match key {
        Key::Space | Key::S => Some(Action::ToggleRun),
        Key::L => Some(Action::Lap),
        Key::R => Some(Action::Reset),
        Key::Left => Some(Action::PrevTheme),
        Key::Right => Some(Action::NextTheme),
        Key::Question => Some(Action::ShowHelp),
        Key::Q => Some(Action::Quit),
        Key::Escape => None,
    }
}

/// Help text listing the shortcuts.
pub const HELP: &str = "\
space / s   start, pause, resume
l           record lap
r           reset
left/right  change theme
?           toggle this help
q           quit";
