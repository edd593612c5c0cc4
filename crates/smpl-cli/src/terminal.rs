//! Terminal adapters for rendering, haptics and the wake lock.

use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use smpl_core::feedback::{FeedbackError, Haptics, WakeLock};
use smpl_core::{Controls, DisplayFrame, Renderer, SplitRow, Theme};

/// Line-oriented renderer.
///
/// Write errors are logged and otherwise ignored; a broken stdout must not
/// stop the stopwatch.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render_theme(&mut self, theme: Theme) {
        self.line(&format!("theme: {}", theme.display_name()));
    }

    pub fn render_text(&mut self, text: &str) {
        self.line(text);
    }

    fn line(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render_frame(&mut self, frame: &DisplayFrame) {
        self.line(&format!("{}  {}", frame.lap, frame.total));
    }

    fn render_splits(&mut self, rows: &[SplitRow]) {
        if rows.is_empty() {
            return;
        }
        self.line("  #  LAP    TOTAL");
        for row in rows {
            self.line(&format!("{:>3}  {}  {}", row.number, row.lap, row.total));
        }
    }

    fn render_controls(&mut self, controls: &Controls) {
        let flag = |on: bool| if on { "on" } else { "off" };
        self.line(&format!(
            "[{}] lap:{} reset:{}",
            controls.primary,
            flag(controls.lap_enabled),
            flag(controls.stop_enabled)
        ));
    }
}

/// Rings the terminal bell once per vibration pulse.
#[derive(Debug)]
pub struct BellHaptics<W> {
    out: W,
}

impl<W: Write> BellHaptics<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Haptics for BellHaptics<W> {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), FeedbackError> {
        // Patterns alternate pulse and gap; only pulses ring.
        let pulses = pattern.len().div_ceil(2);
        self.out.write_all("\x07".repeat(pulses).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

/// Holds an idle inhibitor process for as long as the lock is held.
///
/// Defaults to `systemd-inhibit` wrapping `cat`, which exits once its stdin
/// is closed on release. A missing binary reports
/// [`FeedbackError::Unsupported`]; an inhibitor that exits within the settle
/// delay (e.g., no logind) reports [`FeedbackError::Io`] and is not held.
#[derive(Debug)]
pub struct InhibitWakeLock {
    program: String,
    args: Vec<String>,
    settle: Duration,
    child: Option<Child>,
}

impl Default for InhibitWakeLock {
    fn default() -> Self {
        Self::with_command(
            "systemd-inhibit",
            [
                "--what=idle:sleep",
                "--who=smpl",
                "--why=stopwatch running",
                "cat",
            ],
        )
    }
}

impl InhibitWakeLock {
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            settle: Duration::from_millis(25),
            child: None,
        }
    }

    /// How long to wait after spawning before checking the inhibitor is alive.
    #[must_use]
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

impl WakeLock for InhibitWakeLock {
    fn acquire(&mut self) -> Result<(), FeedbackError> {
        if self.child.is_some() {
            return Ok(());
        }
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => FeedbackError::Unsupported("wake lock"),
                _ => FeedbackError::Io(e),
            })?;
        if !self.settle.is_zero() {
            std::thread::sleep(self.settle);
        }
        if let Some(status) = child.try_wait()? {
            return Err(FeedbackError::Io(std::io::Error::other(format!(
                "inhibitor exited immediately: {status}"
            ))));
        }
        tracing::debug!(pid = child.id(), "wake lock acquired");
        self.child = Some(child);
        Ok(())
    }

    fn release(&mut self) -> Result<(), FeedbackError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        drop(child.stdin.take());
        // The inhibitor may already have exited on its own.
        if let Err(e) = child.kill() {
            if e.kind() != std::io::ErrorKind::InvalidInput {
                return Err(e.into());
            }
        }
        child.wait()?;
        tracing::debug!("wake lock released");
        Ok(())
    }

    fn is_held(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for InhibitWakeLock {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            tracing::debug!(error = %err, "wake lock release on drop failed");
        }
    }
}
