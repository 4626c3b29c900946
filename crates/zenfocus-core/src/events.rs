use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{RunState, TimerMode};

/// Every state change of the focus timer produces an Event.
/// Front ends print or render them; nothing in the core persists them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: TimerMode,
        to: TimerMode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A countdown reached zero. The timer is already idle in `next_mode`.
    SessionCompleted {
        mode: TimerMode,
        completed_sessions: u32,
        next_mode: TimerMode,
        at: DateTime<Utc>,
    },
    GoalUpdated {
        goal: String,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: RunState,
        mode: TimerMode,
        remaining_secs: u64,
        total_secs: u64,
        completed_sessions: u32,
        goal: String,
        at: DateTime<Utc>,
    },
}
