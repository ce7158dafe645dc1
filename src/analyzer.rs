//! Single entry point that turns a puzzle snapshot into an `AnalysisResult`.
//!
//! An `Analyzer` owns its search engine, difficulty estimator and a bounded
//! result cache. It is explicitly constructed and may be shared by reference
//! across threads; the cache is the only shared mutable state.
use crate::cache::{AnalysisCache, CacheStats, EvictionKind, Fingerprint};
use crate::difficulty::{DifficultyEstimator, DifficultyWeights};
use crate::engine::{GridShape, Move, PermutationState, PuzzleSnapshot};
use crate::error::AnalysisError;
use crate::hints::{generate_hints, Hint, HintContext};
use crate::solver::{SearchConfig, SearchEngine};
use crate::stuck::{classify, StuckLevel};
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Baseline time a player spends on one swap.
pub const SECONDS_PER_MOVE: f64 = 4.0;
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub search: SearchConfig,
    /// Maximum number of cached analyses. Zero is treated as one.
    pub cache_capacity: usize,
    pub eviction: EvictionKind,
    pub weights: DifficultyWeights,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            search: SearchConfig::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            eviction: EvictionKind::Fifo,
            weights: DifficultyWeights::default(),
        }
    }
}

/// How the move sequence in an `AnalysisResult` was obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub expansions: usize,
    /// Fewest swaps that can solve the analysed arrangement.
    pub lower_bound: usize,
    /// The search stopped on its budget; `solution` is then a partial path.
    pub budget_exhausted: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Difficulty score in `0.0..=100.0`.
    pub difficulty: f64,
    /// Percentage of pieces in their goal slot.
    pub progress: f64,
    pub stuck_level: StuckLevel,
    /// Ranked, critical first.
    pub hints: Vec<Hint>,
    /// First move of a complete solution. `None` when solved or when the
    /// search ran out of budget.
    pub next_move: Option<Move>,
    pub estimated_seconds: f64,
    pub solution: Vec<Move>,
    pub search: SearchStats,
}

impl AnalysisResult {
    pub fn is_solved(&self) -> bool {
        self.progress >= 100.0
    }

    /// Range and cross-field checks every freshly computed result passes.
    pub(crate) fn is_consistent(&self) -> bool {
        let in_percent = |v: f64| (0.0..=100.0).contains(&v);
        in_percent(self.difficulty)
            && in_percent(self.progress)
            && self.estimated_seconds >= 0.0
            && self.hints.iter().all(|h| (0.0..=1.0).contains(&h.confidence))
            && (self.next_move.is_none() || self.next_move == self.solution.first().copied())
    }
}

/// Orchestrates validation, caching, search, scoring and hint generation.
///
/// # Examples
/// ```
/// use swap_analyzer::analyzer::Analyzer;
/// use swap_analyzer::engine::{GridShape, Move, PermutationState};
///
/// let analyzer = Analyzer::default();
/// let shape = GridShape::new(2, 2);
/// let state = PermutationState::solved(4).apply(Move::new(0, 3));
/// let result = analyzer.analyze_state(shape, &state, 1).unwrap();
/// assert_eq!(result.solution, vec![Move::new(0, 3)]);
/// assert_eq!(result.progress, 50.0);
/// ```
#[derive(Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
    engine: SearchEngine,
    estimator: DifficultyEstimator,
    cache: Mutex<AnalysisCache>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer::new(AnalyzerConfig::default())
    }
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Analyzer {
            config,
            engine: SearchEngine::new(config.search),
            estimator: DifficultyEstimator::new(config.weights),
            cache: Mutex::new(AnalysisCache::new(
                config.cache_capacity,
                config.eviction.into_policy(),
            )),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyses the snapshot, reusing a cached result for an identical
    /// arrangement and move count.
    ///
    /// # Errors
    /// Returns an `AnalysisError` if the snapshot does not describe a
    /// permutation of the grid's slots.
    pub fn analyze(&self, snapshot: &PuzzleSnapshot) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let state = snapshot.to_state()?;
        Ok(self.analyze_valid(snapshot.shape, &state, snapshot.moves_so_far))
    }

    /// Like `analyze`, for callers that already hold a `PermutationState`.
    pub fn analyze_state(
        &self,
        shape: GridShape,
        state: &PermutationState,
        moves_so_far: u32,
    ) -> Result<Arc<AnalysisResult>, AnalysisError> {
        let len = shape.validate()?;
        if state.len() != len {
            return Err(AnalysisError::PieceCountMismatch {
                expected: len,
                found: state.len(),
            });
        }
        Ok(self.analyze_valid(shape, state, moves_so_far))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    fn analyze_valid(
        &self,
        shape: GridShape,
        state: &PermutationState,
        moves_so_far: u32,
    ) -> Arc<AnalysisResult> {
        let key = Fingerprint::new(shape, state, moves_so_far);
        if let Some(hit) = self.lock_cache().get(&key) {
            debug!("Cache hit for {}", key);
            return hit;
        }
        debug!("Cache miss for {}", key);

        // Computed without the lock; concurrent misses on one key both compute
        // and the later put wins.
        let result = Arc::new(self.compute(shape, state, moves_so_far));
        self.lock_cache().put(key, Arc::clone(&result));
        result
    }

    fn compute(&self, shape: GridShape, state: &PermutationState, moves_so_far: u32) -> AnalysisResult {
        let n = state.len();
        let correct = state.correct_count();
        let difficulty = self.estimator.estimate(state, shape);
        let outcome = self.engine.search(state, shape);
        let progress = 100.0 * correct as f64 / n as f64;
        let stuck_level = classify(moves_so_far, correct, n);

        let complete = outcome.is_complete();
        let suggested: &[Move] = if complete { &outcome.moves } else { &[] };
        let hints = generate_hints(&HintContext {
            state,
            shape,
            difficulty,
            stuck_level,
            solution: suggested,
            moves_so_far,
            progress,
        });

        let remaining = if complete {
            outcome.moves.len()
        } else {
            outcome.lower_bound
        };
        let estimated_seconds = remaining as f64 * SECONDS_PER_MOVE * (1.0 + difficulty / 100.0);

        AnalysisResult {
            difficulty,
            progress,
            stuck_level,
            hints,
            next_move: suggested.first().copied(),
            estimated_seconds,
            search: SearchStats {
                expansions: outcome.expansions,
                lower_bound: outcome.lower_bound,
                budget_exhausted: outcome.budget_exhausted,
            },
            solution: outcome.moves,
        }
    }

    // The cache only memoises; state left by a panicking holder is still usable.
    fn lock_cache(&self) -> MutexGuard<'_, AnalysisCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
