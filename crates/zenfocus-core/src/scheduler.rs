//! Tick scheduling.
//!
//! The timer never owns a thread or a platform callback. It asks a
//! [`Scheduler`] for a periodic tick source and gets back a [`TickHandle`];
//! whoever drives the timer feeds fired handles back into
//! [`FocusTimer::tick`](crate::FocusTimer::tick).
//!
//! Two implementations exist:
//!
//! - [`ManualScheduler`]: a simulated clock advanced explicitly. Tests use it
//!   to run a full 25-minute session without waiting.
//! - [`TokioScheduler`]: one `tokio::time::interval` task per handle,
//!   delivering fired handles over an mpsc channel.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Identifies one periodic tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of periodic ticks.
pub trait Scheduler {
    /// Begin a tick source that fires every `interval`.
    fn schedule(&mut self, interval: Duration) -> TickHandle;

    /// Stop a tick source. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

// ── Simulated clock ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Periodic {
    interval: Duration,
    next_fire: Duration,
}

/// Scheduler over a simulated clock that only moves on [`advance`](Self::advance).
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    active: BTreeMap<u64, Periodic>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Move the clock forward and return every tick that fired, in firing
    /// order. Sources firing at the same instant are ordered by handle.
    pub fn advance(&mut self, by: Duration) -> Vec<TickHandle> {
        let target = self.now.saturating_add(by);
        let mut fired = Vec::new();

        loop {
            let due = self
                .active
                .iter()
                .filter(|(_, p)| p.next_fire <= target)
                .min_by_key(|(id, p)| (p.next_fire, **id))
                .map(|(id, _)| *id);

            let Some(id) = due else { break };
            if let Some(periodic) = self.active.get_mut(&id) {
                self.now = periodic.next_fire;
                periodic.next_fire = periodic.next_fire.saturating_add(periodic.interval);
                fired.push(TickHandle(id));
            }
        }

        self.now = target;
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        // A zero interval would fire forever within one advance.
        let interval = interval.max(Duration::from_millis(1));
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(
            id,
            Periodic {
                interval,
                next_fire: self.now.saturating_add(interval),
            },
        );
        TickHandle(id)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.active.remove(&handle.0);
    }
}

// ── Tokio ────────────────────────────────────────────────────────────

/// Wall-clock scheduler backed by tokio intervals.
///
/// Must be used from within a tokio runtime. Fired handles arrive on the
/// receiver returned by [`TokioScheduler::new`]; a handle may still be in the
/// channel after it was cancelled, so consumers must ignore stale handles.
#[derive(Debug)]
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<u64, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<TickHandle>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TickHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            tx,
        };
        (scheduler, rx)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, interval: Duration) -> TickHandle {
        let interval = interval.max(Duration::from_millis(1));
        let handle = TickHandle(self.next_id);
        self.next_id += 1;

        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        tracing::trace!(handle = handle.0, ?interval, "tick source scheduled");
        self.tasks.insert(handle.0, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle.0) {
            task.abort();
            tracing::trace!(handle = handle.0, "tick source cancelled");
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}
