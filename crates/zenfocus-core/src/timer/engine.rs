//! Focus timer engine.
//!
//! The engine is a countdown state machine over [`TimerMode`]s. It does not
//! use internal threads: `start` asks the injected [`Scheduler`] for a 1-second
//! tick source, and the caller feeds fired handles back through `tick()`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Idle
//! Running --tick (reaches 0)--> Idle (next mode, full duration)
//! any --reset | change_mode--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = FocusTimer::new(TimerSettings::default(), ManualScheduler::new());
//! timer.start();
//! for handle in timer.scheduler_mut().advance(Duration::from_secs(3)) {
//!     timer.tick(handle); // Returns Some(Event) when the countdown completes
//! }
//! ```

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{ModeDurations, TimerMode};
use crate::events::Event;
use crate::scheduler::{ManualScheduler, Scheduler, TickHandle};

/// Resolution of the countdown.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Goal text shown before the user enters one.
pub const DEFAULT_GOAL: &str = "Complete project proposal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Running,
}

/// Durations and break-escalation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub durations: ModeDurations,
    /// A focus completion that brings the session count to a multiple of this
    /// value is followed by a long break.
    pub long_break_every: u32,
}

impl TimerSettings {
    pub fn duration(&self, mode: TimerMode) -> u64 {
        self.durations.get(mode)
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            durations: ModeDurations::default(),
            long_break_every: 3,
        }
    }
}

/// Session-level timer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    pub remaining_seconds: u64,
    pub running: bool,
    /// Completed focus sessions. Breaks never count.
    pub completed_sessions: u32,
    pub goal_text: String,
}

impl TimerState {
    /// Fresh state: idle in focus mode with the full focus duration.
    pub fn initial(settings: &TimerSettings) -> Self {
        Self {
            mode: TimerMode::Focus,
            remaining_seconds: settings.duration(TimerMode::Focus),
            running: false,
            completed_sessions: 0,
            goal_text: DEFAULT_GOAL.to_string(),
        }
    }

    pub fn run_state(&self) -> RunState {
        if self.running {
            RunState::Running
        } else {
            RunState::Idle
        }
    }
}

/// Mode that follows a completed countdown.
///
/// `completed_sessions` is the count *after* the finished focus session was
/// added, so with `long_break_every = 3` the first long break follows the
/// third focus session.
pub fn next_mode_after(finished: TimerMode, completed_sessions: u32, long_break_every: u32) -> TimerMode {
    match finished {
        TimerMode::Focus => {
            if long_break_every > 0
                && completed_sessions > 0
                && completed_sessions % long_break_every == 0
            {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            }
        }
        TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Focus,
    }
}

/// Core focus timer.
///
/// Owns its scheduler and at most one pending tick source. Every transition
/// that leaves `Running` cancels that source before changing state, and
/// `tick()` ignores handles other than the pending one.
#[derive(Debug)]
pub struct FocusTimer<S: Scheduler> {
    settings: TimerSettings,
    state: TimerState,
    scheduler: S,
    pending: Option<TickHandle>,
}

impl<S: Scheduler> FocusTimer<S> {
    /// Create an idle timer in focus mode.
    pub fn new(settings: TimerSettings, scheduler: S) -> Self {
        Self {
            state: TimerState::initial(&settings),
            settings,
            scheduler,
            pending: None,
        }
    }

    /// Rebuild a timer from a saved state.
    ///
    /// The restored timer is always idle, and `remaining_seconds` is clamped
    /// to the mode's duration.
    pub fn restore(settings: TimerSettings, scheduler: S, mut state: TimerState) -> Self {
        state.running = false;
        state.remaining_seconds = state.remaining_seconds.min(settings.duration(state.mode));
        Self {
            settings,
            state,
            scheduler,
            pending: None,
        }
    }

    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.state.goal_text = goal.into();
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.state.run_state()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn mode(&self) -> TimerMode {
        self.state.mode
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.state.remaining_seconds
    }

    pub fn completed_sessions(&self) -> u32 {
        self.state.completed_sessions
    }

    pub fn goal_text(&self) -> &str {
        &self.state.goal_text
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    /// Full duration of the current mode.
    pub fn total_seconds(&self) -> u64 {
        self.settings.duration(self.state.mode)
    }

    /// Handle of the tick source currently driving the countdown.
    pub fn pending_tick(&self) -> Option<TickHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.run_state(),
            mode: self.state.mode,
            remaining_secs: self.state.remaining_seconds,
            total_secs: self.total_seconds(),
            completed_sessions: self.state.completed_sessions,
            goal: self.state.goal_text.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. No-op when already running or at zero.
    pub fn start(&mut self) -> Option<Event> {
        if self.state.running || self.state.remaining_seconds == 0 {
            return None;
        }
        self.pending = Some(self.scheduler.schedule(TICK_INTERVAL));
        self.state.running = true;
        tracing::debug!(
            mode = %self.state.mode,
            remaining = self.state.remaining_seconds,
            "timer started"
        );
        Some(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Stop counting down, keeping the remaining time. No-op when idle.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.cancel_pending();
        self.state.running = false;
        tracing::debug!(
            mode = %self.state.mode,
            remaining = self.state.remaining_seconds,
            "timer paused"
        );
        Some(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_seconds,
            at: Utc::now(),
        })
    }

    /// Start when idle, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and restore the current mode's full duration.
    pub fn reset(&mut self) -> Event {
        self.cancel_pending();
        self.state.running = false;
        self.state.remaining_seconds = self.total_seconds();
        tracing::debug!(mode = %self.state.mode, "timer reset");
        Event::TimerReset {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_seconds,
            at: Utc::now(),
        }
    }

    /// Switch modes. A running countdown is cancelled and its progress lost.
    pub fn change_mode(&mut self, mode: TimerMode) -> Event {
        let from = self.state.mode;
        self.enter_mode(mode);
        tracing::debug!(%from, to = %mode, "mode changed");
        Event::ModeChanged {
            from,
            to: mode,
            remaining_secs: self.state.remaining_seconds,
            at: Utc::now(),
        }
    }

    pub fn set_goal(&mut self, goal: impl Into<String>) -> Event {
        self.state.goal_text = goal.into();
        Event::GoalUpdated {
            goal: self.state.goal_text.clone(),
            at: Utc::now(),
        }
    }

    /// Deliver one fired tick.
    ///
    /// Returns `Some(Event::SessionCompleted)` when the countdown reaches zero.
    /// Ticks from cancelled sources are ignored.
    pub fn tick(&mut self, handle: TickHandle) -> Option<Event> {
        if !self.state.running || self.pending != Some(handle) {
            tracing::trace!(handle = handle.id(), "stale tick ignored");
            return None;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);
        if self.state.remaining_seconds > 0 {
            return None;
        }

        self.cancel_pending();
        self.state.running = false;
        Some(self.complete())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        let finished = self.state.mode;
        if finished == TimerMode::Focus {
            self.state.completed_sessions = self.state.completed_sessions.saturating_add(1);
        }
        let next = next_mode_after(
            finished,
            self.state.completed_sessions,
            self.settings.long_break_every,
        );
        self.enter_mode(next);

        tracing::info!(
            finished = %finished,
            next = %next,
            completed_sessions = self.state.completed_sessions,
            "countdown completed"
        );
        Event::SessionCompleted {
            mode: finished,
            completed_sessions: self.state.completed_sessions,
            next_mode: next,
            at: Utc::now(),
        }
    }

    fn enter_mode(&mut self, mode: TimerMode) {
        self.cancel_pending();
        self.state.running = false;
        self.state.mode = mode;
        self.state.remaining_seconds = self.settings.duration(mode);
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl FocusTimer<ManualScheduler> {
    /// Advance the simulated clock and deliver every tick that fired.
    pub fn advance(&mut self, by: Duration) -> Vec<Event> {
        let fired = self.scheduler.advance(by);
        fired.into_iter().filter_map(|h| self.tick(h)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual() -> FocusTimer<ManualScheduler> {
        FocusTimer::new(TimerSettings::default(), ManualScheduler::new())
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn starts_idle_in_focus() {
        let timer = manual();
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_seconds(), 1500);
        assert_eq!(timer.run_state(), RunState::Idle);
        assert_eq!(timer.completed_sessions(), 0);
        assert_eq!(timer.goal_text(), DEFAULT_GOAL);
    }

    #[test]
    fn start_pause_start() {
        let mut timer = manual();
        assert!(timer.start().is_some());
        assert!(timer.is_running());

        timer.advance(secs(10));
        assert_eq!(timer.remaining_seconds(), 1490);

        assert!(timer.pause().is_some());
        assert!(!timer.is_running());
        assert_eq!(timer.scheduler().active_count(), 0);

        // Time passing while paused changes nothing.
        timer.advance(secs(60));
        assert_eq!(timer.remaining_seconds(), 1490);

        assert!(timer.start().is_some());
        timer.advance(secs(1));
        assert_eq!(timer.remaining_seconds(), 1489);
    }

    #[test]
    fn start_is_idempotent() {
        let mut timer = manual();
        timer.start();
        let first = timer.pending_tick();
        assert!(timer.start().is_none());
        assert_eq!(timer.pending_tick(), first);
        assert_eq!(timer.scheduler().active_count(), 1);

        timer.advance(secs(1));
        assert_eq!(timer.remaining_seconds(), 1499);
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let mut timer = manual();
        assert!(timer.pause().is_none());
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn start_at_zero_is_noop() {
        let mut state = TimerState::initial(&TimerSettings::default());
        state.remaining_seconds = 0;
        let mut timer = FocusTimer::restore(TimerSettings::default(), ManualScheduler::new(), state);
        let before = timer.state().clone();

        assert!(timer.start().is_none());
        assert_eq!(timer.state(), &before);
        assert_eq!(timer.scheduler().active_count(), 0);
    }

    #[test]
    fn toggle_alternates() {
        let mut timer = manual();
        assert!(matches!(timer.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(timer.toggle(), Some(Event::TimerPaused { .. })));
        assert!(!timer.is_running());
    }

    #[test]
    fn reset_while_running_restores_duration() {
        let mut timer = manual();
        timer.change_mode(TimerMode::ShortBreak);
        timer.start();
        timer.advance(secs(42));
        assert_eq!(timer.remaining_seconds(), 258);

        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_seconds(), 300);
        assert_eq!(timer.scheduler().active_count(), 0);
    }

    #[test]
    fn change_mode_discards_progress() {
        let mut timer = manual();
        timer.start();
        timer.advance(secs(100));

        timer.change_mode(TimerMode::LongBreak);
        assert_eq!(timer.mode(), TimerMode::LongBreak);
        assert_eq!(timer.remaining_seconds(), 900);
        assert!(!timer.is_running());

        timer.change_mode(TimerMode::Focus);
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn stale_tick_after_pause_is_ignored() {
        let mut timer = manual();
        timer.start();
        let old = timer.pending_tick().unwrap();
        timer.pause();

        assert!(timer.tick(old).is_none());
        assert_eq!(timer.remaining_seconds(), 1500);

        timer.start();
        assert!(timer.tick(old).is_none());
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn full_focus_countdown_completes_once() {
        let mut timer = manual();
        timer.start();

        let events = timer.advance(secs(1500));
        assert_eq!(events.len(), 1);
        match &events[0] {
            Event::SessionCompleted {
                mode,
                completed_sessions,
                next_mode,
                ..
            } => {
                assert_eq!(*mode, TimerMode::Focus);
                assert_eq!(*completed_sessions, 1);
                assert_eq!(*next_mode, TimerMode::ShortBreak);
            }
            other => panic!("Expected SessionCompleted, got {other:?}"),
        }

        assert!(!timer.is_running());
        assert_eq!(timer.mode(), TimerMode::ShortBreak);
        assert_eq!(timer.remaining_seconds(), 300);
        assert_eq!(timer.scheduler().active_count(), 0);

        // No auto-start: the break waits for the user.
        assert!(timer.advance(secs(600)).is_empty());
        assert_eq!(timer.remaining_seconds(), 300);
    }

    #[test]
    fn one_second_short_of_duration_does_not_complete() {
        let mut timer = manual();
        timer.start();
        assert!(timer.advance(secs(1499)).is_empty());
        assert_eq!(timer.remaining_seconds(), 1);
        assert!(timer.is_running());
    }

    #[test]
    fn break_completion_keeps_session_count() {
        let mut timer = manual();
        timer.change_mode(TimerMode::ShortBreak);
        timer.start();
        timer.advance(secs(300));
        assert_eq!(timer.completed_sessions(), 0);
        assert_eq!(timer.mode(), TimerMode::Focus);
        assert_eq!(timer.remaining_seconds(), 1500);
    }

    #[test]
    fn escalation_policy() {
        assert_eq!(next_mode_after(TimerMode::Focus, 1, 3), TimerMode::ShortBreak);
        assert_eq!(next_mode_after(TimerMode::Focus, 2, 3), TimerMode::ShortBreak);
        assert_eq!(next_mode_after(TimerMode::Focus, 3, 3), TimerMode::LongBreak);
        assert_eq!(next_mode_after(TimerMode::Focus, 6, 3), TimerMode::LongBreak);
        assert_eq!(next_mode_after(TimerMode::Focus, 0, 3), TimerMode::ShortBreak);
        assert_eq!(next_mode_after(TimerMode::Focus, 4, 0), TimerMode::ShortBreak);
        assert_eq!(next_mode_after(TimerMode::ShortBreak, 3, 3), TimerMode::Focus);
        assert_eq!(next_mode_after(TimerMode::LongBreak, 3, 3), TimerMode::Focus);
    }

    #[test]
    fn goal_update_does_not_touch_countdown() {
        let mut timer = manual();
        timer.start();
        timer.advance(secs(5));
        timer.set_goal("Write release notes");
        assert_eq!(timer.goal_text(), "Write release notes");
        assert!(timer.is_running());
        assert_eq!(timer.remaining_seconds(), 1495);
    }

    #[test]
    fn restore_clamps_remaining_and_idles() {
        let state = TimerState {
            mode: TimerMode::ShortBreak,
            remaining_seconds: 9999,
            running: true,
            completed_sessions: 4,
            goal_text: "Read".into(),
        };
        let timer = FocusTimer::restore(TimerSettings::default(), ManualScheduler::new(), state);
        assert_eq!(timer.remaining_seconds(), 300);
        assert!(!timer.is_running());
        assert_eq!(timer.completed_sessions(), 4);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let timer = manual();
        match timer.snapshot() {
            Event::StateSnapshot {
                state,
                mode,
                remaining_secs,
                total_secs,
                ..
            } => {
                assert_eq!(state, RunState::Idle);
                assert_eq!(mode, TimerMode::Focus);
                assert_eq!(remaining_secs, 1500);
                assert_eq!(total_secs, 1500);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
