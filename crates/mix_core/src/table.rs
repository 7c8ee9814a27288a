//! Symmetric partial mapping from color pairs to a result color.
//!
//! Entries are stored directed, both orderings per authored pair, and keep
//! their authored order. That order is observable: [`MixingTable::pairs_producing`]
//! and everything built on it (hints) report the first matching entry.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Color;

/// One directed table entry `(first, second) -> result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixEntry {
    pub first: Color,
    pub second: Color,
    pub result: Color,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("conflicting mix for {first} + {second}: {existing} vs {incoming}")]
    Conflict {
        first: Color,
        second: Color,
        existing: Color,
        incoming: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct MixingTable {
    entries: Vec<MixEntry>,
    index: HashMap<(Color, Color), Color>,
}

impl MixingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from unordered pairs, inserting both orderings of each.
    pub fn symmetric<I>(pairs: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (Color, Color, Color)>,
    {
        let mut table = Self::new();
        for (a, b, result) in pairs {
            table.insert_pair(a, b, result)?;
        }
        Ok(table)
    }

    /// Build from directed entries exactly as given. A one-sided table is
    /// accepted; the resolver's reverse lookup covers the missing ordering.
    pub fn from_directed<I>(entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = MixEntry>,
    {
        let mut table = Self::new();
        for e in entries {
            table.insert_directed(e.first, e.second, e.result)?;
        }
        Ok(table)
    }

    /// Insert `(a, b)` and `(b, a)`. A self pair is stored once.
    pub fn insert_pair(&mut self, a: Color, b: Color, result: Color) -> Result<(), TableError> {
        // check both before touching anything so a conflict leaves the table as it was
        self.check(a, b, result)?;
        self.check(b, a, result)?;
        self.insert_directed(a, b, result)?;
        if a != b {
            self.insert_directed(b, a, result)?;
        }
        Ok(())
    }

    /// Insert a single ordering. Re-inserting an identical entry is a no-op.
    pub fn insert_directed(&mut self, first: Color, second: Color, result: Color) -> Result<(), TableError> {
        self.check(first, second, result)?;
        if self.index.contains_key(&(first, second)) {
            return Ok(());
        }
        self.index.insert((first, second), result);
        self.entries.push(MixEntry { first, second, result });
        Ok(())
    }

    fn check(&self, first: Color, second: Color, incoming: Color) -> Result<(), TableError> {
        match self.index.get(&(first, second)) {
            Some(&existing) if existing != incoming => Err(TableError::Conflict {
                first,
                second,
                existing,
                incoming,
            }),
            _ => Ok(()),
        }
    }

    /// Directed lookup only; see [`crate::resolve`] for the full contract.
    pub fn get(&self, first: Color, second: Color) -> Option<Color> {
        self.index.get(&(first, second)).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &MixEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every result value, in entry order (duplicates included).
    pub fn results(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().map(|e| e.result)
    }

    /// Distinct result colors that are not in `base`, in first-seen order.
    pub fn target_pool(&self, base: &BTreeSet<Color>) -> Vec<Color> {
        let mut seen = BTreeSet::new();
        self.results()
            .filter(|c| !base.contains(c))
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Entries whose result is `color`, in iteration order.
    pub fn pairs_producing(&self, color: Color) -> impl Iterator<Item = &MixEntry> {
        self.entries.iter().filter(move |e| e.result == color)
    }

    /// Entries that involve `color` on either side.
    pub fn entries_with(&self, color: Color) -> impl Iterator<Item = &MixEntry> {
        self.entries
            .iter()
            .filter(move |e| e.first == color || e.second == color)
    }

    /// Directed entries lacking their mirror ordering.
    pub fn asymmetric_entries(&self) -> Vec<MixEntry> {
        self.entries
            .iter()
            .filter(|e| self.get(e.second, e.first) != Some(e.result))
            .copied()
            .collect()
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_entries().is_empty()
    }
}
