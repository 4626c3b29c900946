//! # ZenFocus Core Library
//!
//! Core logic for the ZenFocus focus timer. The CLI is a thin layer over the
//! types exported here.
//!
//! ## Architecture
//!
//! - **Timer**: a countdown state machine over three modes (focus, short
//!   break, long break) that counts completed focus sessions and picks the
//!   next break
//! - **Scheduler**: the tick source driving the timer, either a simulated
//!   clock or tokio intervals
//! - **Preferences**: the persisted dark-mode flag behind an injected store
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`FocusTimer`]: core timer state machine
//! - [`FocusView`]: display values and user actions for an embedding view
//! - [`Scheduler`]: tick scheduling seam
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod preferences;
pub mod scheduler;
pub mod storage;
pub mod timer;
pub mod view;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use preferences::{ConfigPreferences, MemoryPreferences, PreferenceStore, Theme};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle, TokioScheduler};
pub use storage::Config;
pub use timer::{
    format_clock, next_mode_after, FocusTimer, ModeDurations, RunState, TimerMode,
    TimerSettings, TimerState,
};
pub use view::{FocusSnapshot, FocusView};
