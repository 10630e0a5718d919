//! Transposition table keyed by Zobrist hash.
//!
//! Entries live in a hash map with a capacity ceiling. There is no
//! fine-grained eviction: once a store would exceed the ceiling, the whole
//! table is cleared and filling starts over. The table outlives individual
//! searches, so a later request reuses what earlier ones learned.

use std::collections::HashMap;

use tracing::trace;

use crate::game_state::chess_types::Move;

/// Default ceiling, in entries.
pub const DEFAULT_TT_CAPACITY: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least `score` (search failed high).
    Lower,
    /// The true value is at most `score` (search failed low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub clears: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: HashMap<u64, TTEntry>,
    capacity: usize,
    stats: TTStats,
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_TT_CAPACITY)
    }
}

impl TranspositionTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the ceiling. A table already above the new ceiling is cleared.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        if self.entries.len() > self.capacity {
            self.clear();
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = TTStats::default();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn probe(&mut self, key: u64) -> Option<TTEntry> {
        self.stats.probes += 1;
        let hit = self.entries.get(&key).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Store or overwrite the entry for `key`.
    pub fn store(&mut self, key: u64, entry: TTEntry) {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            trace!(entries = self.entries.len(), "transposition table full, clearing");
            self.entries.clear();
            self.stats.clears += 1;
        }
        self.stats.stores += 1;
        self.entries.insert(key, entry);
    }
}
