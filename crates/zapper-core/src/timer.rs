//! Virtual-time timer queue.
//!
//! The page context never sleeps. Timers are entries with a due time on a
//! millisecond clock that only moves when the host advances it, which keeps
//! throttling and zap transitions deterministic.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::trace;
use zapper_dom::NodeId;

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// Work carried by a timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTask {
    /// Process the latest pointer position.
    PointerSample { x: f64, y: f64 },
    /// End a zap transition: hide and mark the element.
    FinishZap { element: NodeId },
}

#[derive(Debug)]
struct Scheduled {
    id: TimerId,
    due_ms: u64,
    task: TimerTask,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.id == other.id
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    /// Reversed so the max-heap pops the earliest due, then earliest scheduled.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.id.0.cmp(&self.id.0))
    }
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    heap: BinaryHeap<Scheduled>,
    cancelled: HashSet<TimerId>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, delay_ms: u64, task: TimerTask) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        let due_ms = self.now_ms + delay_ms;
        trace!(timer = id.0, due_ms, ?task, "timer scheduled");
        self.heap.push(Scheduled { id, due_ms, task });
        id
    }

    /// Cancel a timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if !self.is_pending(id) {
            return false;
        }
        self.cancelled.insert(id)
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        !self.cancelled.contains(&id) && self.heap.iter().any(|s| s.id == id)
    }

    /// Number of live timers.
    pub fn len(&self) -> usize {
        self.heap
            .iter()
            .filter(|s| !self.cancelled.contains(&s.id))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pop the earliest live timer due at or before `until`, moving the clock
    /// to its due time. Returns `None` once nothing else is due.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, TimerTask)> {
        while let Some(next) = self.heap.peek() {
            if next.due_ms > until {
                return None;
            }
            let Some(entry) = self.heap.pop() else {
                return None;
            };
            if self.cancelled.remove(&entry.id) {
                continue;
            }
            self.now_ms = self.now_ms.max(entry.due_ms);
            return Some((entry.id, entry.task));
        }
        None
    }

    /// Move the clock forward without firing anything.
    pub fn advance_clock(&mut self, to: u64) {
        self.now_ms = self.now_ms.max(to);
    }
}
