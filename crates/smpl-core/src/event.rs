//! Events the stopwatch publishes to its collaborators.

use std::fmt;

use serde::Serialize;

use crate::stopwatch::LapRecord;

/// A completed stopwatch transition.
///
/// Published after the state change, so subscribers always observe the new
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum StopwatchEvent {
    /// The stopwatch started or resumed.
    Started,
    /// The stopwatch paused.
    Paused,
    /// A lap was appended to the history.
    LapRecorded(LapRecord),
    /// The stopwatch returned to idle.
    Reset,
}

impl StopwatchEvent {
    /// Stable event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Paused => "paused",
            Self::LapRecorded(_) => "lapRecorded",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for StopwatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Something that reacts to stopwatch events.
///
/// Subscribers cannot fail the transition that produced the event; any
/// failure has to be handled inside `on_event`.
pub trait Subscriber {
    fn on_event(&mut self, event: &StopwatchEvent);
}

impl<F> Subscriber for F
where
    F: FnMut(&StopwatchEvent),
{
    fn on_event(&mut self, event: &StopwatchEvent) {
        self(event);
    }
}

/// Ordered list of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a subscriber. Subscribers are notified in the order added.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    /// Delivers `event` to every subscriber.
    pub fn publish(&mut self, event: &StopwatchEvent) {
        tracing::trace!(event = %event, subscribers = self.subscribers.len(), "publishing");
        for subscriber in &mut self.subscribers {
            subscriber.on_event(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
