//! Core logic for the smpl stopwatch.
//!
//! This crate contains the fundamental types and logic for:
//! - The stopwatch engine: run/pause/lap/reset over wall-clock samples
//! - Events published to collaborators (haptics, wake lock, rendering)
//! - Display derivation: time frames, split rows and control state
//! - The cooperative refresh loop and the key/theme mappings

pub mod clock;
pub mod display;
pub mod event;
pub mod feedback;
mod format;
pub mod keymap;
pub mod refresh;
mod stopwatch;
pub mod theme;

pub use clock::{Clock, ManualClock, SystemClock};
pub use display::{Controls, DisplayFrame, PrimaryLabel, SplitRow, split_rows};
pub use event::{EventBus, StopwatchEvent, Subscriber};
pub use feedback::{FeedbackBridge, FeedbackError, HapticPattern, Haptics, WakeLock};
pub use format::format_time;
pub use keymap::{Action, Key, UnknownKey, action_for};
pub use refresh::{RefreshLoop, Renderer, TickOutcome, TickScheduler};
pub use stopwatch::{Elapsed, LapRecord, Mode, Stopwatch};
pub use theme::{Theme, UnknownTheme};
