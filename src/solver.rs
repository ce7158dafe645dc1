use crate::engine::{GridShape, Move, PermutationState};
use crate::heuristics::{cycle_labels, heuristic, min_swaps};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::thread;
use std::time::{Duration, Instant};

/// Limits and neighbour policy for one search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of node expansions before the best partial path is returned.
    pub max_expansions: usize,
    /// Optional wall-clock limit. `None` keeps the search fully deterministic.
    pub time_budget: Option<Duration>,
    /// Every this many expansions the thread yields. Zero never yields.
    /// The deadline is checked on every expansion regardless.
    pub yield_interval: usize,
    /// Only expand swaps of two slots in the same permutation cycle.
    ///
    /// Those are exactly the swaps that lower the closed-form minimum by one, so
    /// every optimal sequence survives the pruning. When disabled the full
    /// `O(N²)` swap neighbourhood is expanded.
    pub prune_with_cycle_bound: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_expansions: 20_000,
            time_budget: None,
            yield_interval: 256,
            prune_with_cycle_bound: true,
        }
    }
}

/// Result of one search invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Swaps to apply in order. Either they solve the puzzle, or (when the
    /// budget ran out) they reach a state strictly closer by heuristic, or the
    /// list is empty.
    pub moves: Vec<Move>,
    /// Number of nodes expanded.
    pub expansions: usize,
    /// Closed-form minimum swap count for the start state.
    pub lower_bound: usize,
    /// `true` if the search stopped on its budget instead of reaching the goal.
    pub budget_exhausted: bool,
}

impl SearchOutcome {
    /// Whether `moves` is a complete solution.
    pub fn is_complete(&self) -> bool {
        !self.budget_exhausted
    }
}

struct SearchNode {
    state: PermutationState,
    g: u32,
    h: u32,
    parent: Option<usize>,
    mv: Option<Move>,
}

// Nodes are pushed in creation order, so the arena index doubles as the
// insertion sequence number.
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    node: usize,
}

// Lowest f first; among equal f the most recently inserted node wins (LIFO),
// which makes ties dive like a depth-first search.
impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.f.cmp(&self.f) {
            Ordering::Equal => self.node.cmp(&other.node),
            ord => ord,
        }
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first (A*-style) search over position swaps.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    config: SearchConfig,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        SearchEngine { config }
    }

    /// Searches for a short swap sequence that sorts `start`.
    ///
    /// Nodes are ordered by `f = g + heuristic`, with ties resolved in favour of
    /// the most recently inserted node. The goal test happens when a node is
    /// taken off the open set. Running out of budget is not an error: the path to
    /// the closest state seen so far is returned, or nothing if no state was
    /// closer than `start`.
    ///
    /// # Examples
    /// ```
    /// use swap_analyzer::engine::{GridShape, PermutationState};
    /// use swap_analyzer::solver::SearchEngine;
    ///
    /// let shape = GridShape::new(2, 2);
    /// let start = PermutationState::new(vec![1, 2, 0, 3]).unwrap();
    /// let outcome = SearchEngine::default().search(&start, shape);
    /// assert_eq!(outcome.moves.len(), 2);
    /// assert!(start.apply_all(&outcome.moves).is_solved());
    /// ```
    pub fn search(&self, start: &PermutationState, shape: GridShape) -> SearchOutcome {
        let lower_bound = min_swaps(start);
        let start_h = heuristic(start, shape);

        if start_h == 0 {
            return SearchOutcome {
                moves: Vec::new(),
                expansions: 0,
                lower_bound,
                budget_exhausted: false,
            };
        }

        let deadline = self.config.time_budget.map(|budget| Instant::now() + budget);
        let len = start.len();

        let mut arena = vec![SearchNode {
            state: start.clone(),
            g: 0,
            h: start_h,
            parent: None,
            mv: None,
        }];
        let mut best_g: HashMap<PermutationState, u32> = HashMap::new();
        best_g.insert(start.clone(), 0);
        let mut open = BinaryHeap::new();
        open.push(OpenEntry { f: start_h, node: 0 });

        let mut best_partial = 0;
        let mut expansions = 0;

        while let Some(entry) = open.pop() {
            let (state, g, h) = {
                let node = &arena[entry.node];
                (node.state.clone(), node.g, node.h)
            };

            // A cheaper route to this state was queued after this entry.
            if best_g.get(&state).is_some_and(|&known| known < g) {
                continue;
            }

            if h == 0 {
                let moves = reconstruct_path(&arena, entry.node);
                debug_assert!(moves.len() >= lower_bound);
                debug!(
                    "Search solved {} pieces in {} moves after {} expansions (lower bound {})",
                    len,
                    moves.len(),
                    expansions,
                    lower_bound
                );
                return SearchOutcome {
                    moves,
                    expansions,
                    lower_bound,
                    budget_exhausted: false,
                };
            }

            // Budget checks come after the goal test, so a goal already on top
            // of the open set is still reported as solved.
            if expansions >= self.config.max_expansions {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
            expansions += 1;

            if self.config.yield_interval > 0 && expansions % self.config.yield_interval == 0 {
                thread::yield_now();
            }

            // Slots outside any non-trivial cycle are already correct and never move.
            let labels = if self.config.prune_with_cycle_bound {
                Some(cycle_labels(&state))
            } else {
                None
            };
            let next_g = g + 1;

            for a in 0..len {
                for b in (a + 1)..len {
                    if let Some(labels) = &labels {
                        match (labels[a], labels[b]) {
                            (Some(x), Some(y)) if x == y => {}
                            _ => continue,
                        }
                    }

                    let mv = Move::new(a, b);
                    // Only the two swapped pieces change their distance.
                    let next_h = swapped_heuristic(&state, shape, h, mv);
                    let next = state.apply(mv);
                    if best_g.get(&next).is_some_and(|&known| known <= next_g) {
                        continue;
                    }
                    best_g.insert(next.clone(), next_g);

                    // The arena index is the insertion order used for tie-breaks.

                    let idx = arena.len();
                    arena.push(SearchNode {
                        state: next,
                        g: next_g,
                        h: next_h,
                        parent: Some(entry.node),
                        mv: Some(mv),
                    });

                    let best = &arena[best_partial];
                    if (next_h, next_g) < (best.h, best.g) {
                        best_partial = idx;
                    }

                    open.push(OpenEntry {
                        f: next_g + next_h,
                        node: idx,
                    });
                }
            }
        }

        // Out of budget: fall back to the closest state seen, if any beat the start.
        let moves = if arena[best_partial].h < start_h {
            reconstruct_path(&arena, best_partial)
        } else {
            Vec::new()
        };
        info!(
            "Search budget exhausted after {} expansions; returning {} partial moves (lower bound {})",
            expansions,
            moves.len(),
            lower_bound
        );
        SearchOutcome {
            moves,
            expansions,
            lower_bound,
            budget_exhausted: true,
        }
    }
}

/// Heuristic of `state.apply(mv)`, derived from the parent's value in constant time.
fn swapped_heuristic(state: &PermutationState, shape: GridShape, h: u32, mv: Move) -> u32 {
    let piece_a = state.piece_at(mv.a) as usize;
    let piece_b = state.piece_at(mv.b) as usize;
    let before = shape.structural_distance(mv.a, piece_a) + shape.structural_distance(mv.b, piece_b);
    let after = shape.structural_distance(mv.a, piece_b) + shape.structural_distance(mv.b, piece_a);
    h + after - before
}

fn reconstruct_path(arena: &[SearchNode], mut idx: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    while let Some(parent) = arena[idx].parent {
        if let Some(mv) = arena[idx].mv {
            moves.push(mv);
        }
        idx = parent;
    }
    moves.reverse();
    moves
}
