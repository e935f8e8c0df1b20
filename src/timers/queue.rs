//! Cancellable one-shot timers on a virtual millisecond clock.
//!
//! Time only moves when the owner says so: [`TimerQueue::pop_due`] hands
//! back timers one at a time, in `(due, scheduling order)` order, and moves
//! `now` to each timer's due time as it fires. The owner handles one timer
//! to completion before asking for the next, so a handler that cancels or
//! schedules timers sees a consistent queue.
//!
//! Every timer carries the epoch it was scheduled in. Owners bump their
//! epoch on reset and ignore fired timers from older epochs, in addition to
//! cancelling the handles they hold.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// What a timer is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// One countdown second.
    Tick,
    /// Flip a mismatched pair back.
    Rollback,
}

/// Handle to a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// A timer that has come due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredTimer {
    pub handle: TimerHandle,
    pub kind: TimerKind,
    /// Virtual time it fired at.
    pub at_ms: u64,
    /// Owner epoch at scheduling time.
    pub epoch: u64,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    kind: TimerKind,
    epoch: u64,
}

/// Ordered set of pending timers.
#[derive(Clone, Debug, Default)]
pub struct TimerQueue {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<(u64, TimerHandle), Entry>,
    due_by_handle: FxHashMap<TimerHandle, u64>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedule a timer `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, kind: TimerKind, epoch: u64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms);
        self.pending.insert((due, handle), Entry { kind, epoch });
        self.due_by_handle.insert(handle, due);
        handle
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_handle.remove(&handle) {
            Some(due) => self.pending.remove(&(due, handle)).is_some(),
            None => false,
        }
    }

    /// Cancel everything. Returns how many timers were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.due_by_handle.clear();
        dropped
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_handle.contains_key(&handle)
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `until_ms`,
    /// moving `now` to its due time.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<FiredTimer> {
        let (&(due, handle), _) = self.pending.iter().next()?;
        if due > until_ms {
            return None;
        }
        let entry = self.pending.remove(&(due, handle))?;
        self.due_by_handle.remove(&handle);
        self.now_ms = self.now_ms.max(due);
        Some(FiredTimer {
            handle,
            kind: entry.kind,
            at_ms: due,
            epoch: entry.epoch,
        })
    }

    /// Move `now` forward without firing anything.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut q = TimerQueue::new();
        let slow = q.schedule(1000, TimerKind::Tick, 0);
        let fast = q.schedule(500, TimerKind::Rollback, 0);

        let first = q.pop_due(2000).unwrap();
        assert_eq!(first.handle, fast);
        assert_eq!(first.at_ms, 500);
        assert_eq!(q.now_ms(), 500);

        let second = q.pop_due(2000).unwrap();
        assert_eq!(second.handle, slow);
        assert_eq!(q.now_ms(), 1000);
        assert!(q.pop_due(2000).is_none());
    }

    #[test]
    fn test_same_due_keeps_schedule_order() {
        let mut q = TimerQueue::new();
        let a = q.schedule(1000, TimerKind::Rollback, 0);
        let b = q.schedule(1000, TimerKind::Tick, 0);
        assert_eq!(q.pop_due(1000).unwrap().handle, a);
        assert_eq!(q.pop_due(1000).unwrap().handle, b);
    }

    #[test]
    fn test_not_due_yet() {
        let mut q = TimerQueue::new();
        q.schedule(1000, TimerKind::Tick, 0);
        assert!(q.pop_due(999).is_none());
        assert_eq!(q.next_due_ms(), Some(1000));
        assert_eq!(q.now_ms(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut q = TimerQueue::new();
        let h = q.schedule(10, TimerKind::Rollback, 0);
        assert!(q.is_pending(h));
        assert!(q.cancel(h));
        assert!(!q.cancel(h));
        assert!(!q.is_pending(h));
        assert!(q.pop_due(100).is_none());
    }

    #[test]
    fn test_cancel_all() {
        let mut q = TimerQueue::new();
        q.schedule(10, TimerKind::Rollback, 0);
        q.schedule(20, TimerKind::Tick, 0);
        assert_eq!(q.cancel_all(), 2);
        assert!(q.is_empty());
        assert_eq!(q.next_due_ms(), None);
    }

    #[test]
    fn test_schedule_is_relative_to_now() {
        let mut q = TimerQueue::new();
        q.advance_to(5000);
        q.schedule(1000, TimerKind::Tick, 3);
        let fired = q.pop_due(6000).unwrap();
        assert_eq!(fired.at_ms, 6000);
        assert_eq!(fired.epoch, 3);
    }
}
