//! Cooperative display refresh.
//!
//! The loop never blocks. A host drives it by calling [`RefreshLoop::on_tick`]
//! whenever a tick it scheduled comes due; each tick reschedules the next one
//! only while the stopwatch is running, so leaving `Running` ends the loop
//! at the next tick.

use crate::clock::Clock;
use crate::display::{Controls, DisplayFrame, SplitRow};
use crate::stopwatch::Stopwatch;

/// Arranges for `on_tick` to be called once, on a later frame.
pub trait TickScheduler {
    fn schedule_tick(&mut self);
}

/// Output surface for the widget.
pub trait Renderer {
    fn render_frame(&mut self, frame: &DisplayFrame);
    fn render_splits(&mut self, rows: &[SplitRow]);
    fn render_controls(&mut self, controls: &Controls);
}

/// What a tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Rendered (if needed) and scheduled the next tick.
    Continue,
    /// The stopwatch is not running; nothing was scheduled.
    Stopped,
}

#[derive(Debug, Default)]
pub struct RefreshLoop {
    pending: bool,
    last_frame: Option<DisplayFrame>,
}

impl RefreshLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tick is scheduled and not yet delivered.
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Starts the loop if the stopwatch runs and no tick is outstanding.
    pub fn kick<C: Clock>(&mut self, stopwatch: &Stopwatch<C>, scheduler: &mut impl TickScheduler) {
        if stopwatch.is_running() && !self.pending {
            self.pending = true;
            scheduler.schedule_tick();
        }
    }

    /// Handles a due tick.
    pub fn on_tick<C: Clock>(
        &mut self,
        stopwatch: &Stopwatch<C>,
        renderer: &mut impl Renderer,
        scheduler: &mut impl TickScheduler,
    ) -> TickOutcome {
        self.pending = false;
        if !stopwatch.is_running() {
            return TickOutcome::Stopped;
        }

        let frame = DisplayFrame::from_elapsed(stopwatch.query_elapsed());
        self.show(frame, renderer);

        self.pending = true;
        scheduler.schedule_tick();
        TickOutcome::Continue
    }

    /// Renders `frame` unless it matches what is already on screen.
    pub fn show(&mut self, frame: DisplayFrame, renderer: &mut impl Renderer) {
        if self.last_frame.as_ref() == Some(&frame) {
            return;
        }
        renderer.render_frame(&frame);
        self.last_frame = Some(frame);
    }

    /// Forgets the last rendered frame so the next one is always drawn.
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
