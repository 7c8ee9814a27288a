use std::collections::VecDeque;

use bevy::prelude::*;

use crate::{MixAction, Outcome, Rejection, TransitionKind};

/// Where a journaled result came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JournalSource {
    Action(MixAction),
    Deferred(TransitionKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JournalEntry {
    pub source: JournalSource,
    pub result: Result<Outcome, Rejection>,
    pub frame: u64,
}

/// FIFO of actions waiting for the reducer plus a bounded history of results.
#[derive(Resource, Debug)]
pub struct ActionQueue {
    incoming: VecDeque<MixAction>,
    journal: VecDeque<JournalEntry>,
    pub(crate) journal_capacity: usize,
}

impl ActionQueue {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            incoming: VecDeque::new(),
            journal: VecDeque::new(),
            journal_capacity: cap,
        }
    }
    pub fn set_journal_capacity(&mut self, cap: usize) {
        self.journal_capacity = cap;
        while self.journal.len() > cap {
            self.journal.pop_front();
        }
    }
    pub fn enqueue(&mut self, action: MixAction) {
        self.incoming.push_back(action);
    }
    pub fn pending(&self) -> usize {
        self.incoming.len()
    }
    pub fn drain(&mut self) -> Vec<MixAction> {
        self.incoming.drain(..).collect()
    }
    pub fn push_journal(&mut self, entry: JournalEntry) {
        if self.journal_capacity == 0 {
            return;
        }
        if self.journal.len() == self.journal_capacity {
            self.journal.pop_front();
        }
        self.journal.push_back(entry);
    }
    pub fn journal(&self) -> impl DoubleEndedIterator<Item = &JournalEntry> {
        self.journal.iter()
    }
    pub fn last_result(&self) -> Option<&Result<Outcome, Rejection>> {
        self.journal.back().map(|e| &e.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(frame: u64) -> JournalEntry {
        JournalEntry {
            source: JournalSource::Action(MixAction::Reset),
            result: Ok(Outcome::Reset),
            frame,
        }
    }

    #[test]
    fn journal_drops_oldest_first() {
        let mut q = ActionQueue::with_capacity(2);
        for f in 0..3 {
            q.push_journal(entry(f));
        }
        let frames: Vec<u64> = q.journal().map(|e| e.frame).collect();
        assert_eq!(frames, vec![1, 2]);
        q.set_journal_capacity(1);
        assert_eq!(q.journal().count(), 1);
        assert_eq!(q.journal().next().map(|e| e.frame), Some(2));
    }

    #[test]
    fn last_result_tracks_newest_entry() {
        let mut q = ActionQueue::with_capacity(4);
        assert!(q.last_result().is_none());
        q.push_journal(entry(0));
        q.push_journal(JournalEntry {
            source: JournalSource::Action(MixAction::Mix),
            result: Err(Rejection::MissingColors { missing: vec![] }),
            frame: 1,
        });
        assert!(matches!(q.last_result(), Some(Err(Rejection::MissingColors { .. }))));
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut q = ActionQueue::with_capacity(0);
        q.push_journal(entry(0));
        assert_eq!(q.journal().count(), 0);
    }

    #[test]
    fn drain_is_fifo() {
        let mut q = ActionQueue::with_capacity(4);
        q.enqueue(MixAction::Mix);
        q.enqueue(MixAction::Reset);
        assert_eq!(q.pending(), 2);
        assert_eq!(q.drain(), vec![MixAction::Mix, MixAction::Reset]);
        assert_eq!(q.pending(), 0);
    }
}
