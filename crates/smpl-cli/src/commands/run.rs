//! Interactive stopwatch session.
//!
//! The main thread owns the stopwatch and is the only thread that touches
//! it. A reader thread forwards stdin lines over a channel; the main loop
//! waits on that channel, using the next scheduled frame as its timeout, so
//! key presses and display ticks interleave without ever overlapping.

use std::io::{BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use smpl_core::keymap::HELP;
use smpl_core::{
    Action, Clock, Controls, DisplayFrame, FeedbackBridge, Key, RefreshLoop, Renderer, Stopwatch,
    StopwatchEvent, Theme, TickOutcome, TickScheduler, action_for, split_rows,
};

use crate::Config;
use crate::terminal::{BellHaptics, InhibitWakeLock, TerminalRenderer};
use crate::theme_store::{LayeredThemeStore, ThemeStore, load_or_default};

/// Whether the session keeps going after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Schedules ticks on a fixed frame interval.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    due: Option<Instant>,
}

impl FrameScheduler {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            due: None,
        }
    }

    /// Time left until the scheduled tick, or `None` when none is scheduled.
    pub fn wait_time(&self) -> Option<Duration> {
        self.due
            .map(|due| due.saturating_duration_since(Instant::now()))
    }

    /// Marks the scheduled tick as delivered.
    pub fn clear(&mut self) {
        self.due = None;
    }
}

impl TickScheduler for FrameScheduler {
    fn schedule_tick(&mut self) {
        if self.due.is_none() {
            self.due = Some(Instant::now() + self.interval);
        }
    }
}

/// The widget: a stopwatch plus what is on screen.
pub struct Session<C: Clock, W: Write> {
    stopwatch: Stopwatch<C>,
    refresh: RefreshLoop,
    renderer: TerminalRenderer<W>,
    store: Box<dyn ThemeStore>,
    theme: Theme,
    help_visible: bool,
}

impl<C: Clock, W: Write> Session<C, W> {
    pub fn new(
        stopwatch: Stopwatch<C>,
        renderer: TerminalRenderer<W>,
        store: Box<dyn ThemeStore>,
    ) -> Self {
        let theme = load_or_default(store.as_ref());
        Self {
            stopwatch,
            refresh: RefreshLoop::new(),
            renderer,
            store,
            theme,
            help_visible: false,
        }
    }

    pub const fn stopwatch(&self) -> &Stopwatch<C> {
        &self.stopwatch
    }

    pub const fn theme(&self) -> Theme {
        self.theme
    }

    pub const fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn into_renderer(self) -> TerminalRenderer<W> {
        self.renderer
    }

    /// Draws the initial screen.
    pub fn open(&mut self) {
        self.renderer.render_theme(self.theme);
        self.refresh.show(DisplayFrame::zero(), &mut self.renderer);
        self.renderer
            .render_controls(&Controls::for_mode(self.stopwatch.mode()));
    }

    /// Handles one line of input naming a key.
    pub fn handle_line(&mut self, line: &str, scheduler: &mut impl TickScheduler) -> Flow {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() && line != " " {
            return Flow::Continue;
        }
        let key: Key = match line.parse() {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring input");
                return Flow::Continue;
            }
        };
        match action_for(key, self.help_visible) {
            Some(action) => self.apply(action, scheduler),
            None => {
                tracing::debug!(?key, help = self.help_visible, "key has no action");
                Flow::Continue
            }
        }
    }

    pub fn apply(&mut self, action: Action, scheduler: &mut impl TickScheduler) -> Flow {
        tracing::debug!(%action, mode = %self.stopwatch.mode(), "applying action");
        match action {
            Action::ToggleRun => {
                if self.stopwatch.toggle() == Some(StopwatchEvent::Started) {
                    self.refresh.kick(&self.stopwatch, scheduler);
                }
                self.show_elapsed();
                self.render_controls();
            }
            Action::Lap => {
                if self.stopwatch.record_lap().is_some() {
                    self.show_elapsed();
                    self.renderer.render_splits(&split_rows(self.stopwatch.laps()));
                }
            }
            Action::Reset => {
                self.stopwatch.stop();
                self.refresh.reset();
                self.refresh.show(DisplayFrame::zero(), &mut self.renderer);
                self.render_controls();
            }
            Action::PrevTheme => self.set_theme(self.theme.prev()),
            Action::NextTheme => self.set_theme(self.theme.next()),
            Action::ShowHelp => {
                self.help_visible = true;
                self.renderer.render_text(HELP);
            }
            Action::CloseHelp => self.help_visible = false,
            Action::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Handles a due display tick.
    pub fn tick(&mut self, scheduler: &mut impl TickScheduler) -> TickOutcome {
        self.refresh
            .on_tick(&self.stopwatch, &mut self.renderer, scheduler)
    }

    fn show_elapsed(&mut self) {
        let frame = DisplayFrame::from_elapsed(self.stopwatch.query_elapsed());
        self.refresh.show(frame, &mut self.renderer);
    }

    fn render_controls(&mut self) {
        self.renderer
            .render_controls(&Controls::for_mode(self.stopwatch.mode()));
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(err) = self.store.save(theme) {
            tracing::warn!(error = %format!("{err:#}"), "failed to save theme");
        }
        self.renderer.render_theme(theme);
    }
}

/// Runs an interactive session on stdin/stdout until `q` or end of input.
pub fn run(config: &Config, json: bool) -> Result<()> {
    let mut stopwatch = Stopwatch::new();
    let haptics = config.haptics.then(|| BellHaptics::new(std::io::stderr()));
    let wake_lock = config.wake_lock.then(InhibitWakeLock::default);
    stopwatch.subscribe(Box::new(FeedbackBridge::new(haptics, wake_lock)));

    let store = LayeredThemeStore::from_config(config);
    let renderer = TerminalRenderer::new(std::io::stdout().lock());
    let mut session = Session::new(stopwatch, renderer, Box::new(store));

    let (tx, rx) = mpsc::channel::<String>();
    std::thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to read input");
                        break;
                    }
                }
            }
        })
        .context("failed to spawn input reader")?;

    let mut frames = FrameScheduler::new(Duration::from_millis(config.frame_interval_ms));
    session.open();

    loop {
        let received = match frames.wait_time() {
            Some(wait) => match rx.recv_timeout(wait) {
                Ok(line) => Some(line),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            },
            None => match rx.recv() {
                Ok(line) => Some(line),
                Err(_) => break,
            },
        };
        match received {
            Some(line) => {
                if session.handle_line(&line, &mut frames) == Flow::Quit {
                    break;
                }
            }
            None => {
                frames.clear();
                session.tick(&mut frames);
            }
        }
    }

    tracing::info!(
        laps = session.stopwatch().laps().len(),
        mode = %session.stopwatch().mode(),
        "session ended"
    );

    if json {
        let laps = serde_json::to_string_pretty(session.stopwatch().laps())
            .context("failed to serialize laps")?;
        let mut out = session.into_renderer().into_inner();
        writeln!(out, "{laps}").context("failed to write laps")?;
    }

    Ok(())
}
