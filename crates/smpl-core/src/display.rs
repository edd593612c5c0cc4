//! What the widget shows for a given stopwatch state.

use std::fmt;

use serde::Serialize;

use crate::format::format_time;
use crate::stopwatch::{Elapsed, LapRecord, Mode};

/// The two time readouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    /// Current lap, `mm:ss`.
    pub lap: String,
    /// Whole run, `Total: mm:ss`.
    pub total: String,
}

impl DisplayFrame {
    pub fn from_elapsed(elapsed: Elapsed) -> Self {
        Self {
            lap: format_time(elapsed.lap_ms),
            total: format!("Total: {}", format_time(elapsed.total_ms)),
        }
    }

    /// The readouts of an idle stopwatch.
    pub fn zero() -> Self {
        Self::from_elapsed(Elapsed::default())
    }
}

/// One row of the split list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitRow {
    pub number: u32,
    pub lap: String,
    pub total: String,
}

impl From<&LapRecord> for SplitRow {
    fn from(record: &LapRecord) -> Self {
        Self {
            number: record.number(),
            lap: format_time(record.lap_ms()),
            total: format_time(record.total_ms()),
        }
    }
}

/// Split rows, most recent lap first.
pub fn split_rows(laps: &[LapRecord]) -> Vec<SplitRow> {
    laps.iter().rev().map(SplitRow::from).collect()
}

/// Label of the start/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrimaryLabel {
    Start,
    Pause,
    Resume,
}

impl PrimaryLabel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
        }
    }
}

impl fmt::Display for PrimaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Button state for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub primary: PrimaryLabel,
    pub lap_enabled: bool,
    pub stop_enabled: bool,
}

impl Controls {
    pub const fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Idle => Self {
                primary: PrimaryLabel::Start,
                lap_enabled: false,
                stop_enabled: false,
            },
            Mode::Running => Self {
                primary: PrimaryLabel::Pause,
                lap_enabled: true,
                stop_enabled: true,
            },
            Mode::Paused => Self {
                primary: PrimaryLabel::Resume,
                lap_enabled: false,
                stop_enabled: true,
            },
        }
    }
}
