//! The stopwatch engine.
//!
//! Every operation samples the clock exactly once and derives all of its
//! arithmetic from that one instant. Operations that do not apply to the
//! current mode are no-ops rather than errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::event::{EventBus, StopwatchEvent, Subscriber};

/// Lifecycle state of the stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Idle,
    Running,
    Paused,
}

impl Mode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Paused => "paused",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One recorded split. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LapRecord {
    number: u32,
    lap_ms: u64,
    total_ms: u64,
}

impl LapRecord {
    /// 1-based position in the lap history.
    pub const fn number(&self) -> u32 {
        self.number
    }

    /// Duration of this lap alone.
    pub const fn lap_ms(&self) -> u64 {
        self.lap_ms
    }

    /// Total elapsed time when the lap was recorded.
    pub const fn total_ms(&self) -> u64 {
        self.total_ms
    }
}

/// Elapsed time of the current lap and of the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Elapsed {
    pub lap_ms: u64,
    pub total_ms: u64,
}

/// A stopwatch with lap history.
///
/// While running, `run_start_ms` and `lap_start_ms` are rebased epochs that
/// already absorb the time banked before the last pause, so elapsed time is
/// a single subtraction. While idle or paused, the banked totals are the
/// elapsed time.
pub struct Stopwatch<C = SystemClock> {
    clock: C,
    mode: Mode,
    run_start_ms: u64,
    lap_start_ms: u64,
    accumulated_total_ms: u64,
    accumulated_lap_ms: u64,
    laps: Vec<LapRecord>,
    bus: EventBus,
}

impl Stopwatch<SystemClock> {
    /// Creates an idle stopwatch on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Stopwatch<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Stopwatch<C> {
    /// Creates an idle stopwatch reading time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            mode: Mode::Idle,
            run_start_ms: 0,
            lap_start_ms: 0,
            accumulated_total_ms: 0,
            accumulated_lap_ms: 0,
            laps: Vec::new(),
            bus: EventBus::new(),
        }
    }

    /// Registers a collaborator for transition events.
    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.bus.subscribe(subscriber);
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    /// Recorded laps, oldest first.
    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn start(&mut self) -> Option<StopwatchEvent> {
        let now = self.clock.now_ms();
        self.start_at(now)
    }

    /// Starts or resumes at `now_ms`. No-op while running.
    pub fn start_at(&mut self, now_ms: u64) -> Option<StopwatchEvent> {
        if self.mode == Mode::Running {
            return None;
        }
        self.run_start_ms = now_ms.saturating_sub(self.accumulated_total_ms);
        self.lap_start_ms = now_ms.saturating_sub(self.accumulated_lap_ms);
        self.mode = Mode::Running;
        tracing::debug!(now_ms, banked_ms = self.accumulated_total_ms, "stopwatch started");
        self.emit(StopwatchEvent::Started)
    }

    pub fn pause(&mut self) -> Option<StopwatchEvent> {
        let now = self.clock.now_ms();
        self.pause_at(now)
    }

    /// Pauses at `now_ms`, banking both clocks. No-op unless running.
    pub fn pause_at(&mut self, now_ms: u64) -> Option<StopwatchEvent> {
        if self.mode != Mode::Running {
            return None;
        }
        let elapsed = self.elapsed_at(now_ms);
        let total_ms = self.floor_total(elapsed.total_ms);
        self.accumulated_total_ms = total_ms;
        self.accumulated_lap_ms = elapsed.lap_ms;
        self.mode = Mode::Paused;
        tracing::debug!(now_ms, total_ms, "stopwatch paused");
        self.emit(StopwatchEvent::Paused)
    }

    pub fn toggle(&mut self) -> Option<StopwatchEvent> {
        let now = self.clock.now_ms();
        self.toggle_at(now)
    }

    /// Pauses when running, starts otherwise.
    pub fn toggle_at(&mut self, now_ms: u64) -> Option<StopwatchEvent> {
        if self.mode == Mode::Running {
            self.pause_at(now_ms)
        } else {
            self.start_at(now_ms)
        }
    }

    pub fn record_lap(&mut self) -> Option<StopwatchEvent> {
        let now = self.clock.now_ms();
        self.record_lap_at(now)
    }

    /// Closes the current lap at `now_ms`. No-op unless running.
    pub fn record_lap_at(&mut self, now_ms: u64) -> Option<StopwatchEvent> {
        if self.mode != Mode::Running {
            return None;
        }
        let elapsed = self.elapsed_at(now_ms);
        let number = u32::try_from(self.laps.len() + 1).unwrap_or(u32::MAX);
        let record = LapRecord {
            number,
            lap_ms: elapsed.lap_ms,
            total_ms: self.floor_total(elapsed.total_ms),
        };
        self.laps.push(record);
        // Rebase so a clock that stepped back resumes from the recorded total.
        self.run_start_ms = now_ms.saturating_sub(record.total_ms);
        self.lap_start_ms = now_ms;
        self.accumulated_lap_ms = 0;
        tracing::debug!(number, lap_ms = record.lap_ms, total_ms = record.total_ms, "lap recorded");
        self.emit(StopwatchEvent::LapRecorded(record))
    }

    pub fn stop(&mut self) -> Option<StopwatchEvent> {
        self.stop_at(self.clock.now_ms())
    }

    /// Returns to idle from any mode, discarding totals and laps.
    pub fn stop_at(&mut self, now_ms: u64) -> Option<StopwatchEvent> {
        tracing::debug!(now_ms, from = %self.mode, laps = self.laps.len(), "stopwatch reset");
        self.mode = Mode::Idle;
        self.run_start_ms = 0;
        self.lap_start_ms = 0;
        self.accumulated_total_ms = 0;
        self.accumulated_lap_ms = 0;
        self.laps.clear();
        self.emit(StopwatchEvent::Reset)
    }

    pub fn query_elapsed(&self) -> Elapsed {
        self.elapsed_at(self.clock.now_ms())
    }

    /// Current lap and total elapsed time at `now_ms`, without mutating.
    ///
    /// A clock that stepped backwards past an epoch yields zero for that
    /// segment instead of wrapping.
    pub fn elapsed_at(&self, now_ms: u64) -> Elapsed {
        match self.mode {
            Mode::Running => Elapsed {
                lap_ms: now_ms.saturating_sub(self.lap_start_ms),
                total_ms: now_ms.saturating_sub(self.run_start_ms),
            },
            Mode::Idle | Mode::Paused => Elapsed {
                lap_ms: self.accumulated_lap_ms,
                total_ms: self.accumulated_total_ms,
            },
        }
    }

    /// Raises `total_ms` to the last recorded lap total, keeping lap totals
    /// non-decreasing when the wall clock steps backwards.
    fn floor_total(&self, total_ms: u64) -> u64 {
        total_ms.max(self.laps.last().map_or(0, LapRecord::total_ms))
    }

    fn emit(&mut self, event: StopwatchEvent) -> Option<StopwatchEvent> {
        self.bus.publish(&event);
        Some(event)
    }
}

impl<C> fmt::Debug for Stopwatch<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stopwatch")
            .field("mode", &self.mode)
            .field("run_start_ms", &self.run_start_ms)
            .field("lap_start_ms", &self.lap_start_ms)
            .field("accumulated_total_ms", &self.accumulated_total_ms)
            .field("accumulated_lap_ms", &self.accumulated_lap_ms)
            .field("laps", &self.laps.len())
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    fn manual() -> (Stopwatch<ManualClock>, ManualClock) {
        let clock = ManualClock::new(0);
        (Stopwatch::with_clock(clock.clone()), clock)
    }

    fn lap(number: u32, lap_ms: u64, total_ms: u64) -> LapRecord {
        LapRecord {
            number,
            lap_ms,
            total_ms,
        }
    }

    #[test]
    fn test_new_stopwatch_is_idle() {
        let (sw, _clock) = manual();
        assert_eq!(sw.mode(), Mode::Idle);
        assert_eq!(sw.query_elapsed(), Elapsed::default());
        assert!(sw.laps().is_empty());
    }

    #[test]
    fn test_lap_scenario() {
        let (mut sw, clock) = manual();
        sw.start();

        clock.set(1500);
        assert_eq!(
            sw.record_lap(),
            Some(StopwatchEvent::LapRecorded(lap(1, 1500, 1500)))
        );

        clock.set(4200);
        sw.record_lap();
        assert_eq!(sw.laps(), &[lap(1, 1500, 1500), lap(2, 2700, 4200)]);
    }

    #[test]
    fn test_pause_gap_is_excluded() {
        let (mut sw, clock) = manual();
        sw.start();
        clock.set(1000);
        sw.pause();
        clock.set(3000);
        sw.start();
        clock.set(3500);
        assert_eq!(sw.query_elapsed().total_ms, 1500);
        assert_eq!(sw.query_elapsed().lap_ms, 1500);
    }

    #[test]
    fn test_paused_time_is_frozen() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(1000);
        sw.pause_at(2000);
        assert_eq!(sw.elapsed_at(2000).total_ms, 1000);
        assert_eq!(sw.elapsed_at(50_000).total_ms, 1000);
    }

    #[test]
    fn test_lap_across_pause_keeps_banked_lap_time() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(0);
        sw.record_lap_at(1000);
        sw.pause_at(1600);
        sw.start_at(10_000);
        sw.record_lap_at(10_400);
        assert_eq!(sw.laps()[1], lap(2, 1000, 2000));
    }

    #[test]
    fn test_query_is_idempotent() {
        let (mut sw, clock) = manual();
        sw.start();
        clock.set(777);
        assert_eq!(sw.query_elapsed(), sw.query_elapsed());
        assert_eq!(sw.elapsed_at(900), sw.elapsed_at(900));
    }

    #[test]
    fn test_stop_resets_everything() {
        let (mut sw, clock) = manual();
        sw.start();
        clock.set(2000);
        sw.record_lap();
        clock.set(2500);
        assert_eq!(sw.stop(), Some(StopwatchEvent::Reset));

        assert_eq!(sw.mode(), Mode::Idle);
        assert!(sw.laps().is_empty());
        clock.set(9000);
        assert_eq!(sw.query_elapsed(), Elapsed::default());
    }

    #[test]
    fn test_stop_from_paused_and_idle() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        assert_eq!(sw.stop_at(0), Some(StopwatchEvent::Reset));
        sw.start_at(0);
        sw.pause_at(500);
        sw.stop_at(600);
        assert_eq!(sw.mode(), Mode::Idle);
        assert_eq!(sw.elapsed_at(600), Elapsed::default());
    }

    #[test]
    fn test_lap_is_noop_unless_running() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        assert_eq!(sw.record_lap_at(100), None);
        assert_eq!(sw.mode(), Mode::Idle);
        assert!(sw.laps().is_empty());

        sw.start_at(0);
        sw.record_lap_at(100);
        sw.pause_at(200);
        assert_eq!(sw.record_lap_at(300), None);
        assert_eq!(sw.mode(), Mode::Paused);
        assert_eq!(sw.laps().len(), 1);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(0);
        assert_eq!(sw.start_at(5000), None);
        assert_eq!(sw.elapsed_at(6000).total_ms, 6000);
    }

    #[test]
    fn test_pause_is_noop_unless_running() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        assert_eq!(sw.pause_at(10), None);
        assert_eq!(sw.mode(), Mode::Idle);

        sw.start_at(0);
        sw.pause_at(10);
        assert_eq!(sw.pause_at(20), None);
        assert_eq!(sw.elapsed_at(30).total_ms, 10);
    }

    #[test]
    fn test_toggle_alternates() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        assert_eq!(sw.toggle_at(0), Some(StopwatchEvent::Started));
        assert_eq!(sw.toggle_at(100), Some(StopwatchEvent::Paused));
        assert_eq!(sw.toggle_at(200), Some(StopwatchEvent::Started));
        assert_eq!(sw.mode(), Mode::Running);
    }

    #[test]
    fn test_mode_transitions_follow_state_machine() {
        // (operation, expected mode afterwards)
        let script: [(&str, Mode); 9] = [
            ("pause", Mode::Idle),
            ("start", Mode::Running),
            ("start", Mode::Running),
            ("pause", Mode::Paused),
            ("pause", Mode::Paused),
            ("start", Mode::Running),
            ("stop", Mode::Idle),
            ("stop", Mode::Idle),
            ("start", Mode::Running),
        ];
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        let mut now = 0;
        for (op, expected) in script {
            let before = sw.mode();
            now += 100;
            match op {
                "start" => sw.start_at(now),
                "pause" => sw.pause_at(now),
                _ => sw.stop_at(now),
            };
            let after = sw.mode();
            assert_eq!(after, expected, "{op} from {before}");
            assert!(
                !(before == Mode::Idle && after == Mode::Paused),
                "idle must never pause"
            );
        }
    }

    #[test]
    fn test_lap_numbers_and_totals_are_ordered() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(0);
        let mut now = 0;
        for step in [10, 0, 250, 3, 1000, 0, 42] {
            now += step;
            sw.record_lap_at(now);
        }
        for (i, record) in sw.laps().iter().enumerate() {
            assert_eq!(record.number() as usize, i + 1);
        }
        assert!(
            sw.laps()
                .windows(2)
                .all(|w| w[0].total_ms() <= w[1].total_ms())
        );
    }

    #[test]
    fn test_backwards_clock_saturates() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(10_000);
        assert_eq!(sw.elapsed_at(9_000), Elapsed::default());
        sw.record_lap_at(9_000);
        assert_eq!(sw.laps()[0], lap(1, 0, 0));
    }

    #[test]
    fn test_backwards_step_between_laps_keeps_totals_ordered() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(1_000_000);
        sw.record_lap_at(1_005_000);
        sw.record_lap_at(1_003_000);
        sw.record_lap_at(1_004_000);

        assert_eq!(
            sw.laps(),
            &[lap(1, 5000, 5000), lap(2, 0, 5000), lap(3, 1000, 6000)]
        );
        assert!(
            sw.laps()
                .windows(2)
                .all(|w| w[0].total_ms() <= w[1].total_ms())
        );
    }

    #[test]
    fn test_pause_after_backwards_step_banks_last_lap_total() {
        let mut sw = Stopwatch::with_clock(ManualClock::new(0));
        sw.start_at(1_000_000);
        sw.record_lap_at(1_005_000);
        // Clock steps back before the run even started.
        sw.pause_at(990_000);
        assert_eq!(sw.elapsed_at(990_000).total_ms, 5000);

        sw.start_at(990_000);
        sw.record_lap_at(991_000);
        assert_eq!(sw.laps()[1].total_ms(), 6000);
    }

    #[test]
    fn test_each_operation_reads_clock_once() {
        let clock = ManualClock::new(0);
        let mut sw = Stopwatch::with_clock(clock.clone());

        let ops: [(&str, fn(&mut Stopwatch<ManualClock>)); 6] = [
            ("start", |sw| {
                sw.start();
            }),
            ("record_lap", |sw| {
                sw.record_lap();
            }),
            ("query_elapsed", |sw| {
                sw.query_elapsed();
            }),
            ("pause", |sw| {
                sw.pause();
            }),
            ("toggle", |sw| {
                sw.toggle();
            }),
            ("stop", |sw| {
                sw.stop();
            }),
        ];
        for (name, op) in ops {
            let before = clock.reads();
            clock.advance(100);
            op(&mut sw);
            assert_eq!(clock.reads() - before, 1, "{name} must sample the clock once");
        }
    }

    #[test]
    fn test_subscribers_see_events_after_transition() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (mut sw, clock) = manual();
        let sink = Rc::clone(&seen);
        sw.subscribe(Box::new(move |event: &StopwatchEvent| {
            sink.borrow_mut().push(event.name());
        }));

        sw.start();
        sw.start();
        clock.set(100);
        sw.record_lap();
        sw.pause();
        sw.record_lap();
        sw.stop();

        assert_eq!(*seen.borrow(), vec!["started", "lapRecorded", "paused", "reset"]);
    }

    #[test]
    fn test_lap_record_serializes_camel_case() {
        let json = serde_json::to_string(&lap(3, 1200, 9800)).unwrap();
        assert_eq!(json, r#"{"number":3,"lapMs":1200,"totalMs":9800}"#);
    }
}
