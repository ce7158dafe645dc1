//! Bounded memo of complete analyses.
//!
//! Entries are keyed by a `Fingerprint` of the exact arrangement, grid shape and
//! move count. Keys live in a ring (`VecDeque`) whose front is the next eviction
//! victim, next to a `HashMap` holding the entries. The ring order is maintained
//! by an `EvictionPolicy`: `Fifo` never reorders, `Lru` moves a key to the back
//! whenever it is read or overwritten.
use crate::analyzer::AnalysisResult;
use crate::engine::{GridShape, PermutationState};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

/// Exact, order-sensitive cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    shape: GridShape,
    placement: Box<[u32]>,
    moves_so_far: u32,
}

impl Fingerprint {
    pub fn new(shape: GridShape, state: &PermutationState, moves_so_far: u32) -> Self {
        Fingerprint {
            shape,
            placement: state.as_slice().into(),
            moves_so_far,
        }
    }
}

impl fmt::Display for Fingerprint {
    /// Formats as `rowsxcols:p0,p1,...#moves`, e.g. `1x3:2,0,1#5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.shape)?;
        for (i, piece) in self.placement.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", piece)?;
        }
        write!(f, "#{}", self.moves_so_far)
    }
}

/// Decides which key leaves the cache when it is full.
///
/// The ring passed to each method holds every cached key; its front is the
/// entry evicted next.
pub trait EvictionPolicy: Send + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Called when `key` is read or overwritten.
    fn on_access(&mut self, order: &mut VecDeque<Fingerprint>, key: &Fingerprint);

    /// Removes and returns the key to evict.
    fn victim(&mut self, order: &mut VecDeque<Fingerprint>) -> Option<Fingerprint> {
        order.pop_front()
    }
}

/// Evicts in insertion order; reads do not refresh an entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fifo;

impl EvictionPolicy for Fifo {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn on_access(&mut self, _order: &mut VecDeque<Fingerprint>, _key: &Fingerprint) {}
}

/// Evicts the least recently read or written entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lru;

impl EvictionPolicy for Lru {
    fn name(&self) -> &'static str {
        "lru"
    }

    fn on_access(&mut self, order: &mut VecDeque<Fingerprint>, key: &Fingerprint) {
        if let Some(pos) = order.iter().position(|k| k == key) {
            if let Some(k) = order.remove(pos) {
                order.push_back(k);
            }
        }
    }
}

/// Configuration-friendly selector for the built-in policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionKind {
    #[default]
    Fifo,
    Lru,
}

impl EvictionKind {
    pub fn into_policy(self) -> Box<dyn EvictionPolicy> {
        match self {
            EvictionKind::Fifo => Box::new(Fifo),
            EvictionKind::Lru => Box::new(Lru),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

#[derive(Debug)]
struct CacheEntry {
    fingerprint: Fingerprint,
    result: Arc<AnalysisResult>,
    // Write counter value when stored; newer writes for the same key replace it.
    inserted: u64,
}

#[derive(Debug)]
pub struct AnalysisCache {
    entries: HashMap<Fingerprint, CacheEntry>,
    order: VecDeque<Fingerprint>,
    capacity: usize,
    policy: Box<dyn EvictionPolicy>,
    writes: u64,
    stats: CacheStats,
}

impl AnalysisCache {
    /// Creates an empty cache. A capacity of zero is treated as one.
    pub fn new(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        let capacity = capacity.max(1);
        AnalysisCache {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            policy,
            writes: 0,
            stats: CacheStats::default(),
        }
    }

    /// Looks up `key`, returning a shared handle to the stored result.
    ///
    /// An entry that no longer matches its key or holds an inconsistent result
    /// is dropped and reported as a miss, so the caller recomputes and
    /// overwrites it.
    pub fn get(&mut self, key: &Fingerprint) -> Option<Arc<AnalysisResult>> {
        let healthy = match self.entries.get(key) {
            None => {
                self.stats.misses += 1;
                return None;
            }
            // The stored fingerprint always equals its map key unless the entry
            // was corrupted in place; either failure is healed as a miss.
            Some(entry) => entry.fingerprint == *key && entry.result.is_consistent(),
        };

        if !healthy {
            warn!("Dropping stale cache entry for {}", key);
            self.remove(key);
            self.stats.misses += 1;
            return None;
        }

        self.stats.hits += 1;
        self.policy.on_access(&mut self.order, key);
        self.entries.get(key).map(|entry| Arc::clone(&entry.result))
    }

    /// Stores `result` under `key`. An existing entry for the same key is
    /// replaced (last writer wins); otherwise the policy's victims are evicted
    /// until there is room.
    pub fn put(&mut self, key: Fingerprint, result: Arc<AnalysisResult>) {
        self.writes += 1;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.result = result;
            entry.inserted = self.writes;
            self.policy.on_access(&mut self.order, &key);
            return;
        }

        while self.entries.len() >= self.capacity {
            match self.policy.victim(&mut self.order) {
                Some(victim) => {
                    self.entries.remove(&victim);
                    self.stats.evictions += 1;
                }
                None => break,
            }
        }

        self.order.push_back(key.clone());
        self.entries.insert(
            key.clone(),
            CacheEntry {
                fingerprint: key,
                result,
                inserted: self.writes,
            },
        );
    }

    /// Whether `key` is cached. Does not count as an access.
    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.entries.contains_key(key)
    }

    /// Write counter value of the most recent store for `key`.
    pub fn inserted_at(&self, key: &Fingerprint) -> Option<u64> {
        self.entries.get(key).map(|entry| entry.inserted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn remove(&mut self, key: &Fingerprint) {
        self.entries.remove(key);
        self.order.retain(|k| k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::SearchStats;
    use crate::stuck::StuckLevel;

    fn result(progress: f64) -> Arc<AnalysisResult> {
        Arc::new(AnalysisResult {
            difficulty: 10.0,
            progress,
            stuck_level: StuckLevel::None,
            hints: Vec::new(),
            next_move: None,
            estimated_seconds: 0.0,
            solution: Vec::new(),
            search: SearchStats::default(),
        })
    }

    fn key(moves: u32) -> Fingerprint {
        Fingerprint::new(GridShape::new(1, 3), &PermutationState::solved(3), moves)
    }

    #[test]
    fn test_fingerprint_is_order_and_move_sensitive() {
        let shape = GridShape::new(1, 3);
        let a = Fingerprint::new(shape, &PermutationState::new(vec![2, 0, 1]).unwrap(), 5);
        let b = Fingerprint::new(shape, &PermutationState::new(vec![1, 2, 0]).unwrap(), 5);
        let c = Fingerprint::new(shape, &PermutationState::new(vec![2, 0, 1]).unwrap(), 6);
        let d = Fingerprint::new(GridShape::new(3, 1), &PermutationState::new(vec![2, 0, 1]).unwrap(), 5);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.to_string(), "1x3:2,0,1#5");
    }

    #[test]
    fn test_hit_returns_shared_value() {
        let mut cache = AnalysisCache::new(4, Box::new(Fifo));
        let stored = result(50.0);
        cache.put(key(1), Arc::clone(&stored));
        let hit = cache.get(&key(1)).unwrap();
        assert!(Arc::ptr_eq(&hit, &stored));
        assert!(cache.get(&key(2)).is_none());
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1, evictions: 0 });
    }

    #[test]
    fn test_fifo_evicts_oldest_and_keeps_capacity() {
        let mut cache = AnalysisCache::new(3, Box::new(Fifo));
        for moves in 0..5 {
            cache.put(key(moves), result(0.0));
        }
        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(&key(0)));
        assert!(!cache.contains(&key(1)));
        assert!(cache.contains(&key(2)) && cache.contains(&key(3)) && cache.contains(&key(4)));
        assert_eq!(cache.stats().evictions, 2);
    }

    #[test]
    fn test_fifo_reads_do_not_promote() {
        let mut cache = AnalysisCache::new(2, Box::new(Fifo));
        cache.put(key(0), result(0.0));
        cache.put(key(1), result(0.0));
        assert!(cache.get(&key(0)).is_some());
        cache.put(key(2), result(0.0));
        assert!(!cache.contains(&key(0)));
        assert!(cache.contains(&key(1)));
    }

    #[test]
    fn test_lru_reads_promote() {
        let mut cache = AnalysisCache::new(2, EvictionKind::Lru.into_policy());
        assert_eq!(cache.policy_name(), "lru");
        cache.put(key(0), result(0.0));
        cache.put(key(1), result(0.0));
        assert!(cache.get(&key(0)).is_some());
        cache.put(key(2), result(0.0));
        assert!(cache.contains(&key(0)));
        assert!(!cache.contains(&key(1)));
    }

    #[test]
    fn test_overwrite_is_last_writer_wins_without_eviction() {
        let mut cache = AnalysisCache::new(2, Box::new(Fifo));
        cache.put(key(0), result(10.0));
        cache.put(key(1), result(0.0));
        cache.put(key(0), result(20.0));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 0);
        assert_eq!(cache.get(&key(0)).unwrap().progress, 20.0);
        assert_eq!(cache.inserted_at(&key(0)), Some(3));
    }

    #[test]
    fn test_stale_entry_is_treated_as_miss() {
        let mut cache = AnalysisCache::new(4, Box::new(Fifo));
        cache.put(key(0), result(0.0));
        cache.put(key(1), result(150.0));
        // Corrupt the stored fingerprint in place.
        if let Some(entry) = cache.entries.get_mut(&key(0)) {
            entry.fingerprint = key(9);
        }
        assert!(cache.get(&key(0)).is_none());
        assert!(cache.get(&key(1)).is_none(), "out-of-range progress is stale");
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
        cache.put(key(0), result(0.0));
        assert!(cache.get(&key(0)).is_some());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut cache = AnalysisCache::new(0, Box::new(Fifo));
        assert_eq!(cache.capacity(), 1);
        cache.put(key(0), result(0.0));
        cache.put(key(1), result(0.0));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&key(1)));
    }

    #[test]
    fn test_clear_keeps_stats() {
        let mut cache = AnalysisCache::new(2, Box::new(Fifo));
        cache.put(key(0), result(0.0));
        cache.get(&key(0));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 1);
    }
}
