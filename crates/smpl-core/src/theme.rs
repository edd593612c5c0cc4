//! Color themes and cycling between them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error for theme names or indices that don't exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(String);

/// A color theme, in cycling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Biscay,
    #[default]
    SkyBlue,
    Tangerine,
    Gin,
    Slate,
    Charcoal,
    Frost,
}

impl Theme {
    pub const ALL: [Self; 7] = [
        Self::Biscay,
        Self::SkyBlue,
        Self::Tangerine,
        Self::Gin,
        Self::Slate,
        Self::Charcoal,
        Self::Frost,
    ];

    /// Slug used in storage and on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Biscay => "biscay",
            Self::SkyBlue => "sky-blue",
            Self::Tangerine => "tangerine",
            Self::Gin => "gin",
            Self::Slate => "slate",
            Self::Charcoal => "charcoal",
            Self::Frost => "frost",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Biscay => "Biscay",
            Self::SkyBlue => "Sky Blue",
            Self::Tangerine => "Tangerine",
            Self::Gin => "Gin",
            Self::Slate => "Slate",
            Self::Charcoal => "Charcoal",
            Self::Frost => "Frost",
        }
    }

    /// Position in [`Theme::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, UnknownTheme> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or_else(|| UnknownTheme(index.to_string()))
    }

    /// The following theme, wrapping to the first.
    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The preceding theme, wrapping to the last.
    #[must_use]
    pub const fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.slug() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}
