//! Deferred transitions - a deadline queue with explicit cancellation.
//!
//! Widgets never sleep; they schedule a [`TimerAction`] against their
//! instance and the host pumps [`TimerQueue::tick`] with a monotonic
//! millisecond clock. Cancellation is explicit:
//! - `cancel` by timer handle
//! - `cancel_for` everything an instance owns (run on destroy)
//! - `cancel_matching` a specific pending action (interrupting transitions)
//!
//! A timer whose instance has since been destroyed is dropped by the
//! toolkit, never applied to a stale element.

use crate::types::{InstanceId, TimerId};

/// Follow-up work a widget defers past an animation delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Emit the `shown` event that completes a `show()` transition.
    EmitShown,
    /// Emit the `hidden` event that completes a `hide()` transition.
    EmitHidden,
    /// Toast timeout elapsed; dismiss it.
    AutoDismiss,
    /// Carousel auto-cycle interval elapsed; advance one slide.
    Cycle,
}

#[derive(Clone, Copy, Debug)]
struct TimerEntry {
    id: TimerId,
    instance: InstanceId,
    action: TimerAction,
    deadline: u64,
}

/// Pending timers, owned by the toolkit context.
#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_id: u64,
    now: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The clock value of the last `tick`.
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `action` for `instance` after `delay_ms`.
    ///
    /// A zero delay fires on the next `tick`.
    pub fn schedule(&mut self, instance: InstanceId, action: TimerAction, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            instance,
            action,
            deadline: self.now.saturating_add(delay_ms),
        });
        id
    }

    /// Cancel one timer. Unknown handles are a no-op.
    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Cancel every timer owned by `instance`.
    pub fn cancel_for(&mut self, instance: InstanceId) {
        self.entries.retain(|e| e.instance != instance);
    }

    /// Cancel pending `action` timers for `instance`; reports whether any
    /// were outstanding.
    pub fn cancel_matching(&mut self, instance: InstanceId, action: TimerAction) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !(e.instance == instance && e.action == action));
        self.entries.len() != before
    }

    /// Whether `instance` has a pending `action` timer.
    pub fn has_pending(&self, instance: InstanceId, action: TimerAction) -> bool {
        self.entries.iter().any(|e| e.instance == instance && e.action == action)
    }

    /// Advance the clock and drain due timers in deadline order.
    ///
    /// Ties fire in scheduling order. The clock never moves backwards.
    pub fn tick(&mut self, now_ms: u64) -> Vec<(InstanceId, TimerAction)> {
        if now_ms > self.now {
            self.now = now_ms;
        }
        let now = self.now;
        let mut due: Vec<TimerEntry> = Vec::new();
        self.entries.retain(|e| {
            if e.deadline <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|e| (e.deadline, e.id.0));
        due.into_iter().map(|e| (e.instance, e.action)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: InstanceId = InstanceId(1);
    const B: InstanceId = InstanceId(2);

    #[test]
    fn test_fires_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.schedule(A, TimerAction::EmitShown, 300);
        q.schedule(B, TimerAction::EmitShown, 100);

        assert!(q.tick(50).is_empty());
        assert_eq!(q.tick(150), vec![(B, TimerAction::EmitShown)]);
        assert_eq!(q.tick(400), vec![(A, TimerAction::EmitShown)]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut q = TimerQueue::new();
        q.tick(10);
        q.schedule(A, TimerAction::AutoDismiss, 0);
        assert_eq!(q.tick(10), vec![(A, TimerAction::AutoDismiss)]);
    }

    #[test]
    fn test_cancel_for_instance() {
        let mut q = TimerQueue::new();
        q.schedule(A, TimerAction::EmitShown, 10);
        q.schedule(A, TimerAction::AutoDismiss, 20);
        q.schedule(B, TimerAction::EmitHidden, 10);

        q.cancel_for(A);
        assert_eq!(q.tick(100), vec![(B, TimerAction::EmitHidden)]);
    }

    #[test]
    fn test_cancel_matching_reports_outstanding() {
        let mut q = TimerQueue::new();
        q.schedule(A, TimerAction::EmitHidden, 10);

        assert!(q.cancel_matching(A, TimerAction::EmitHidden));
        assert!(!q.cancel_matching(A, TimerAction::EmitHidden));
        assert!(q.tick(100).is_empty());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let mut q = TimerQueue::new();
        q.tick(500);
        q.schedule(A, TimerAction::Cycle, 100);
        // A host clock going backwards must not re-age deadlines.
        assert!(q.tick(200).is_empty());
        assert_eq!(q.now(), 500);
        assert_eq!(q.tick(600), vec![(A, TimerAction::Cycle)]);
    }
}
