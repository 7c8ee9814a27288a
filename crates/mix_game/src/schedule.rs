use std::time::Duration;

use crate::TransitionKind;

/// A delayed transition keyed to the round it was scheduled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingTransition {
    pub kind: TransitionKind,
    pub due_at: Duration,
    pub round: u64,
}

/// Single-slot deferred task with its own monotonic clock.
///
/// At most one transition is pending; scheduling another supersedes it.
#[derive(Debug, Clone, Default)]
pub struct DeferredTransitions {
    now: Duration,
    pending: Option<PendingTransition>,
}

impl DeferredTransitions {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    /// Returns whatever was pending before, now superseded.
    pub fn schedule(&mut self, kind: TransitionKind, delay: Duration, round: u64) -> Option<PendingTransition> {
        self.pending.replace(PendingTransition {
            kind,
            due_at: self.now + delay,
            round,
        })
    }

    pub fn cancel(&mut self) -> Option<PendingTransition> {
        self.pending.take()
    }

    /// Move the clock forward and hand back the transition if it came due.
    pub fn advance(&mut self, elapsed: Duration) -> Option<PendingTransition> {
        self.now += elapsed;
        match self.pending {
            Some(p) if p.due_at <= self.now => self.pending.take(),
            _ => None,
        }
    }
}
