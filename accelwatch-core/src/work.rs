//! Rearm timer and deferred work queue
//!
//! The fired handler may not touch device configuration, so the rearm is
//! split in two:
//!
//! ```text
//! fired handler          timer expiry              worker
//!      │                      │                       │
//!  start(now) ──────→ expired(now) ── submit ──→ take() → rearm
//! ```
//!
//! Both pieces are owned by the arbiter; there is one of each per sensor.

use heapless::spsc::Queue;

use crate::time::Timestamp;

/// Work the deferred context can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItem {
    /// Re-register the motion trigger
    Rearm,
}

/// Slots in the work queue (one less than the backing array)
const WORK_QUEUE_SLOTS: usize = 4;

/// Pending deferred work
///
/// Submitting an item that is already pending is a no-op, so a burst of
/// timer expiries still produces a single rearm.
pub struct WorkQueue {
    items: Queue<WorkItem, WORK_QUEUE_SLOTS>,
}

impl WorkQueue {
    /// Empty queue
    pub const fn new() -> Self {
        Self { items: Queue::new() }
    }

    /// Queue `item` unless it is already pending. Returns `true` if queued.
    pub fn submit(&mut self, item: WorkItem) -> bool {
        if self.is_pending(item) {
            return false;
        }
        self.items.enqueue(item).is_ok()
    }

    /// Next pending item
    pub fn take(&mut self) -> Option<WorkItem> {
        self.items.dequeue()
    }

    /// `item` is waiting to run
    pub fn is_pending(&self, item: WorkItem) -> bool {
        self.items.iter().any(|queued| *queued == item)
    }

    /// Nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items waiting
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl Default for WorkQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RearmTimer {
    period_ms: u64,
    deadline: Option<Timestamp>,
}

impl RearmTimer {
    /// Stopped timer with the given period
    pub const fn new(period_ms: u64) -> Self {
        Self { period_ms, deadline: None }
    }

    /// Delay between start and expiry (ms)
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Start (or restart) the timer
    pub fn start(&mut self, now: Timestamp) -> Timestamp {
        let deadline = now.saturating_add(self.period_ms);
        self.deadline = Some(deadline);
        deadline
    }

    /// Running timer's deadline
    pub fn deadline(&self) -> Option<Timestamp> {
        self.deadline
    }

    /// Started and not yet expired
    pub fn is_running(&self) -> bool {
        self.deadline.is_some()
    }

    /// Check for expiry. Returns `true` once per start.
    pub fn expired(&mut self, now: Timestamp) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
