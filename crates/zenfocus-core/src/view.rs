//! Focus view model.
//!
//! Wraps a [`FocusTimer`] with the values a screen renders (clock text, mode
//! label and color, session counter, progress) and the actions its buttons
//! trigger. The theme lives beside the view, not inside it.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::scheduler::{Scheduler, TickHandle};
use crate::timer::{format_clock, progress_ratio, FocusTimer, TimerMode};

/// Read-only display values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSnapshot {
    pub clock: String,
    pub mode: TimerMode,
    pub mode_label: String,
    pub mode_color: String,
    pub running: bool,
    pub on_break: bool,
    /// Number of the session in progress, 1-based.
    pub session_number: u32,
    pub completed_sessions: u32,
    pub focused_minutes: u64,
    pub progress: f64,
    pub goal: String,
}

#[derive(Debug)]
pub struct FocusView<S: Scheduler> {
    timer: FocusTimer<S>,
}

impl<S: Scheduler> FocusView<S> {
    pub fn new(timer: FocusTimer<S>) -> Self {
        Self { timer }
    }

    pub fn timer(&self) -> &FocusTimer<S> {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut FocusTimer<S> {
        &mut self.timer
    }

    // ── Display ──────────────────────────────────────────────────────

    pub fn clock(&self) -> String {
        format_clock(self.timer.remaining_seconds())
    }

    pub fn mode_label(&self) -> &'static str {
        self.timer.mode().label()
    }

    pub fn mode_color(&self) -> &'static str {
        self.timer.mode().color()
    }

    pub fn session_number(&self) -> u32 {
        self.timer.completed_sessions().saturating_add(1)
    }

    /// Minutes spent in completed focus sessions.
    pub fn focused_minutes(&self) -> u64 {
        let focus_min = self.timer.settings().duration(TimerMode::Focus) / 60;
        u64::from(self.timer.completed_sessions()) * focus_min
    }

    pub fn progress(&self) -> f64 {
        progress_ratio(self.timer.remaining_seconds(), self.timer.total_seconds())
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn on_break(&self) -> bool {
        self.timer.mode().is_break()
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        FocusSnapshot {
            clock: self.clock(),
            mode: self.timer.mode(),
            mode_label: self.mode_label().to_string(),
            mode_color: self.mode_color().to_string(),
            running: self.timer.is_running(),
            on_break: self.on_break(),
            session_number: self.session_number(),
            completed_sessions: self.timer.completed_sessions(),
            focused_minutes: self.focused_minutes(),
            progress: self.progress(),
            goal: self.timer.goal_text().to_string(),
        }
    }

    /// One-line summary: `Focus • 24:59 • Session 1 • Complete project proposal`.
    pub fn status_line(&self) -> String {
        format!(
            "{} \u{2022} {} \u{2022} Session {} \u{2022} {}",
            self.mode_label(),
            self.clock(),
            self.session_number(),
            self.timer.goal_text()
        )
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// The play/pause button.
    pub fn toggle(&mut self) -> Option<Event> {
        self.timer.toggle()
    }

    pub fn reset(&mut self) -> Event {
        self.timer.reset()
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> Event {
        self.timer.change_mode(mode)
    }

    pub fn edit_goal(&mut self, goal: impl Into<String>) -> Event {
        self.timer.set_goal(goal)
    }

    pub fn tick(&mut self, handle: TickHandle) -> Option<Event> {
        self.timer.tick(handle)
    }
}
