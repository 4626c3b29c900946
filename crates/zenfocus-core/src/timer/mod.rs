mod engine;
mod format;
mod mode;

pub use engine::{
    next_mode_after, FocusTimer, RunState, TimerSettings, TimerState, DEFAULT_GOAL, TICK_INTERVAL,
};
pub use format::{format_clock, progress_ratio};
pub use mode::{ModeDurations, TimerMode};
