//! Delayed one-shot actions in simulated time
//!
//! Actions are plain data so the whole queue is inspectable and
//! deterministic. There is no cancellation: an action that has become
//! stale must be a no-op when it fires.

use super::scene::NodeId;

/// Slack when comparing the clock to a due time, absorbs float drift from
/// summing frame deltas
const DUE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledAction {
    /// Return to TapToPlay after a game over. `run` is the run that ended;
    /// if another reset happened since, the action does nothing.
    ResetGame { run: u32 },
    /// Make a collected pearl visible again
    ShowNode(NodeId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    due: f64,
    seq: u64,
    action: ScheduledAction,
}

#[derive(Debug, Default, Clone)]
pub struct Scheduler {
    /// Simulated seconds since start
    now: f64,
    /// Sorted by (due, seq)
    pending: Vec<Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue `action` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: ScheduledAction) {
        let due = self.now + f64::from(delay.max(0.0));
        let seq = self.next_seq;
        self.next_seq += 1;

        let idx = self
            .pending
            .iter()
            .position(|p| p.due > due)
            .unwrap_or(self.pending.len());
        self.pending.insert(idx, Pending { due, seq, action });
        log::debug!("Scheduled {:?} at t={:.2}", action, due);
    }

    /// Advance the clock and return every action now due, in firing order
    pub fn advance(&mut self, dt: f32) -> Vec<ScheduledAction> {
        self.now += f64::from(dt.max(0.0));

        let split = self
            .pending
            .iter()
            .position(|p| p.due > self.now + DUE_EPSILON)
            .unwrap_or(self.pending.len());

        self.pending.drain(..split).map(|p| p.action).collect()
    }

    /// Actions still waiting, in firing order
    pub fn pending(&self) -> impl Iterator<Item = &ScheduledAction> {
        self.pending.iter().map(|p| &p.action)
    }
}
