//! Haptic and wake-lock reactions to stopwatch events.
//!
//! The platform side of both is optional. Failures are logged and dropped
//! here so they can never reach the engine.

use thiserror::Error;

use crate::event::{StopwatchEvent, Subscriber};

/// Errors from a feedback collaborator.
#[derive(Debug, Error)]
pub enum FeedbackError {
    /// The platform has no such capability.
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
    /// The capability exists but the call failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A vibration motor or anything standing in for one.
pub trait Haptics {
    /// Plays `pattern`, alternating vibrate/pause durations in milliseconds.
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), FeedbackError>;
}

/// Keeps the display awake while held.
pub trait WakeLock {
    fn acquire(&mut self) -> Result<(), FeedbackError>;
    fn release(&mut self) -> Result<(), FeedbackError>;
    fn is_held(&self) -> bool;
}

/// Vibration patterns per action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    /// Start, resume and pause share the toggle button's cue.
    Toggle,
    Lap,
    Reset,
}

impl HapticPattern {
    #[must_use]
    pub const fn durations(self) -> &'static [u32] {
        match self {
            Self::Toggle => &[15],
            Self::Lap => &[5, 5, 5],
            Self::Reset => &[20],
        }
    }

    pub const fn for_event(event: &StopwatchEvent) -> Self {
        match event {
            StopwatchEvent::Started | StopwatchEvent::Paused => Self::Toggle,
            StopwatchEvent::LapRecorded(_) => Self::Lap,
            StopwatchEvent::Reset => Self::Reset,
        }
    }
}

/// Wake-lock action for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeAction {
    Acquire,
    Release,
    Keep,
}

impl WakeAction {
    pub const fn for_event(event: &StopwatchEvent) -> Self {
        match event {
            StopwatchEvent::Started => Self::Acquire,
            StopwatchEvent::Paused | StopwatchEvent::Reset => Self::Release,
            StopwatchEvent::LapRecorded(_) => Self::Keep,
        }
    }
}

/// Subscriber that turns events into haptic cues and wake-lock changes.
///
/// Either side can be absent (`None`) when disabled or unavailable.
#[derive(Debug)]
pub struct FeedbackBridge<H, W> {
    haptics: Option<H>,
    wake_lock: Option<W>,
}

impl<H: Haptics, W: WakeLock> FeedbackBridge<H, W> {
    pub const fn new(haptics: Option<H>, wake_lock: Option<W>) -> Self {
        Self { haptics, wake_lock }
    }

    pub const fn haptics(&self) -> Option<&H> {
        self.haptics.as_ref()
    }

    pub const fn wake_lock(&self) -> Option<&W> {
        self.wake_lock.as_ref()
    }

    /// Applies the feedback for `event`, swallowing collaborator errors.
    pub fn react(&mut self, event: &StopwatchEvent) {
        if let Some(haptics) = &mut self.haptics {
            let pattern = HapticPattern::for_event(event);
            if let Err(err) = haptics.vibrate(pattern.durations()) {
                tracing::debug!(event = %event, error = %err, "haptic feedback unavailable");
            }
        }

        let Some(lock) = &mut self.wake_lock else {
            return;
        };
        let result = match WakeAction::for_event(event) {
            WakeAction::Acquire => lock.acquire(),
            WakeAction::Release if lock.is_held() => lock.release(),
            WakeAction::Release | WakeAction::Keep => Ok(()),
        };
        match result {
            Ok(()) => tracing::trace!(event = %event, held = lock.is_held(), "wake lock updated"),
            Err(err) => tracing::debug!(event = %event, error = %err, "wake lock error"),
        }
    }
}

impl<H: Haptics, W: WakeLock> Subscriber for FeedbackBridge<H, W> {
    fn on_event(&mut self, event: &StopwatchEvent) {
        self.react(event);
    }
}
