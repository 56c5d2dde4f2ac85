//! Bounded transposition tables keyed by position and repetition count.
//!
//! Keys pair the position fingerprint (which includes the side to move) with
//! how often that position has already occurred, so a position one step from
//! a threefold draw never shares an entry with its first occurrence.
//!
//! Entries record the depth they were searched to and whether the score is
//! exact or only a bound relative to the alpha-beta window that produced it.
//! A probe only yields a score when the entry is deep enough and its bound
//! settles the caller's window. When the table is full the oldest inserted
//! entry is evicted.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::game_state::board::Board;
use crate::game_state::fingerprint::PositionFingerprint;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true score is at least `score` (search failed high).
    Lower,
    /// The true score is at most `score` (search failed low).
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranspositionKey {
    pub fingerprint: PositionFingerprint,
    pub occurrences: u32,
}

impl TranspositionKey {
    pub fn of(board: &Board) -> Self {
        let fingerprint = board.fingerprint();
        Self {
            fingerprint,
            occurrences: board.occurrences(&fingerprint),
        }
    }

    #[inline]
    fn shard_hash(&self) -> u64 {
        self.fingerprint.hash_key() ^ u64::from(self.occurrences).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTEntry {
    pub depth: u32,
    pub score: f64,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TTEntry {
    /// Score usable at `depth` inside `(alpha, beta)`, if this entry settles it.
    pub fn cutoff_score(&self, depth: u32, alpha: f64, beta: f64) -> Option<f64> {
        if self.depth < depth {
            return None;
        }
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub evictions: u64,
}

#[derive(Debug, Clone)]
pub struct TranspositionTable {
    entries: HashMap<TranspositionKey, TTEntry>,
    order: VecDeque<TranspositionKey>,
    capacity: usize,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            stats: TTStats::default(),
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
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
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    pub fn probe(&mut self, key: &TranspositionKey) -> Option<TTEntry> {
        self.stats.probes += 1;
        let hit = self.entries.get(key).copied();
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Depth-preferred for an existing key; otherwise insert, evicting the
    /// oldest entry once over capacity.
    pub fn store(&mut self, key: TranspositionKey, entry: TTEntry) {
        self.stats.stores += 1;
        if let Some(existing) = self.entries.get_mut(&key) {
            if entry.depth >= existing.depth {
                *existing = entry;
            }
            return;
        }

        self.entries.insert(key, entry);
        self.order.push_back(key);
        while self.entries.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                self.stats.evictions += 1;
            }
        }
    }
}

/// Thread-safe façade: one mutex-guarded table per shard, chosen by hash.
/// Concurrent stores to one key are last-write-wins.
#[derive(Debug)]
pub struct SharedTranspositionTable {
    shards: Vec<Mutex<TranspositionTable>>,
}

impl SharedTranspositionTable {
    pub fn new(total_capacity: usize, shard_count: usize) -> Arc<Self> {
        let shards = shard_count.max(1);
        let per_shard = (total_capacity.max(1) / shards).max(1);
        let shards = (0..shards)
            .map(|_| Mutex::new(TranspositionTable::with_capacity(per_shard)))
            .collect();
        Arc::new(Self { shards })
    }

    #[inline]
    fn shard(&self, key: &TranspositionKey) -> &Mutex<TranspositionTable> {
        &self.shards[(key.shard_hash() % self.shards.len() as u64) as usize]
    }

    pub fn probe(&self, key: &TranspositionKey) -> Option<TTEntry> {
        let Ok(mut guard) = self.shard(key).lock() else {
            return None;
        };
        guard.probe(key)
    }

    pub fn store(&self, key: TranspositionKey, entry: TTEntry) {
        if let Ok(mut guard) = self.shard(&key).lock() {
            guard.store(key, entry);
        }
    }

    pub fn clear(&self) {
        for shard in &self.shards {
            if let Ok(mut guard) = shard.lock() {
                guard.clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|s| s.lock().ok().map(|g| g.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TTStats {
        let mut merged = TTStats::default();
        for shard in &self.shards {
            if let Ok(guard) = shard.lock() {
                let s = guard.stats();
                merged.probes += s.probes;
                merged.hits += s.hits;
                merged.stores += s.stores;
                merged.evictions += s.evictions;
            }
        }
        merged
    }
}
