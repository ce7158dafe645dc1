//! Difficulty scoring for a piece arrangement.
//!
//! Four structural signals are computed, each normalized to `0..=100`, and
//! combined with fixed weights:
//!
//! | signal       | weight | meaning                                                   |
//! |--------------|--------|-----------------------------------------------------------|
//! | complexity   | 0.30   | piece count relative to a 10x10 puzzle                    |
//! | displacement | 0.25   | total structural distance relative to the reversed grid   |
//! | clustering   | 0.25   | mean pairwise distance among misplaced slots              |
//! | pattern      | 0.20   | bonuses for row swaps, wrong corners/edges, 180° symmetry |
use crate::engine::{GridShape, PermutationState};
use crate::heuristics::total_displacement;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Piece count that maps to a complexity signal of 100 (the 10x10 tier).
pub const REFERENCE_PIECE_COUNT: usize = 100;

const ROW_SWAP_BONUS: f64 = 30.0;
const CORNER_BONUS: f64 = 20.0;
const EDGE_BONUS: f64 = 20.0;
const SYMMETRY_BONUS: f64 = 30.0;

/// Relative weight of each signal in the final score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyWeights {
    pub complexity: f64,
    pub displacement: f64,
    pub clustering: f64,
    pub pattern: f64,
}

impl Default for DifficultyWeights {
    fn default() -> Self {
        DifficultyWeights {
            complexity: 0.30,
            displacement: 0.25,
            clustering: 0.25,
            pattern: 0.20,
        }
    }
}

/// Individual signals (each `0..=100`) and the weighted, clamped score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    pub complexity: f64,
    pub displacement: f64,
    pub clustering: f64,
    pub pattern: f64,
    pub score: f64,
}

/// Coarse label for a difficulty score, used for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DifficultyTier {
    Trivial,
    Easy,
    Medium,
    Hard,
    Expert,
}

impl DifficultyTier {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 10.0 => DifficultyTier::Trivial,
            s if s < 30.0 => DifficultyTier::Easy,
            s if s < 50.0 => DifficultyTier::Medium,
            s if s < 70.0 => DifficultyTier::Hard,
            _ => DifficultyTier::Expert,
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DifficultyTier::Trivial => write!(f, "Trivial"),
            DifficultyTier::Easy => write!(f, "Easy"),
            DifficultyTier::Medium => write!(f, "Medium"),
            DifficultyTier::Hard => write!(f, "Hard"),
            DifficultyTier::Expert => write!(f, "Expert"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DifficultyEstimator {
    weights: DifficultyWeights,
}

impl DifficultyEstimator {
    pub fn new(weights: DifficultyWeights) -> Self {
        DifficultyEstimator { weights }
    }

    pub fn weights(&self) -> &DifficultyWeights {
        &self.weights
    }

    /// Difficulty of `state` in `0..=100`. The solved arrangement scores 0.
    pub fn estimate(&self, state: &PermutationState, shape: GridShape) -> f64 {
        self.breakdown(state, shape).score
    }

    /// Computes every signal along with the final score.
    ///
    /// When no piece is misplaced (or the grid has a single slot) all signals are
    /// zero: a finished puzzle carries no difficulty regardless of its size.
    pub fn breakdown(&self, state: &PermutationState, shape: GridShape) -> DifficultyBreakdown {
        let misplaced = state.misplaced_slots();
        if misplaced.is_empty() || shape.max_distance() == 0 || state.len() != shape.len() {
            return DifficultyBreakdown::default();
        }

        let complexity = complexity_signal(shape);
        let displacement = displacement_signal(state, shape);
        let clustering = clustering_signal(&misplaced, shape);
        let pattern = pattern_signal(state, shape, &misplaced);

        let w = &self.weights;
        let score = (w.complexity * complexity
            + w.displacement * displacement
            + w.clustering * clustering
            + w.pattern * pattern)
            .clamp(0.0, 100.0);

        DifficultyBreakdown {
            complexity,
            displacement,
            clustering,
            pattern,
            score,
        }
    }
}

fn complexity_signal(shape: GridShape) -> f64 {
    (100.0 * shape.len() as f64 / REFERENCE_PIECE_COUNT as f64).min(100.0)
}

// The reversed grid (every slot sent to its 180° image) maximizes the row and
// column components of the displacement independently.
fn displacement_signal(state: &PermutationState, shape: GridShape) -> f64 {
    let max_total: u32 = (0..shape.len())
        .map(|slot| shape.structural_distance(slot, shape.rotate_180(slot)))
        .sum();
    if max_total == 0 {
        return 0.0;
    }
    let total = total_displacement(state, shape);
    (100.0 * total as f64 / max_total as f64).min(100.0)
}

fn clustering_signal(misplaced: &[usize], shape: GridShape) -> f64 {
    if misplaced.len() < 2 {
        return 0.0;
    }
    let mut sum = 0u64;
    let mut pairs = 0u64;
    for (i, &a) in misplaced.iter().enumerate() {
        for &b in &misplaced[i + 1..] {
            sum += shape.structural_distance(a, b) as u64;
            pairs += 1;
        }
    }
    let mean = sum as f64 / pairs as f64;
    (100.0 * mean / shape.max_distance() as f64).min(100.0)
}

fn pattern_signal(state: &PermutationState, shape: GridShape, misplaced: &[usize]) -> f64 {
    let mut bonus = 0.0;

    if has_row_swap(state, shape) {
        bonus += ROW_SWAP_BONUS;
    }

    // Partial credit: the bonus scales with how much of the border is wrong.
    let corners: Vec<usize> = (0..shape.len()).filter(|&s| shape.is_corner(s)).collect();
    let edges: Vec<usize> = (0..shape.len()).filter(|&s| shape.is_edge(s)).collect();
    bonus += CORNER_BONUS * wrong_fraction(state, &corners);
    bonus += EDGE_BONUS * wrong_fraction(state, &edges);

    // Every misplaced slot's mirror image is misplaced too.
    let symmetric = misplaced
        .iter()
        .all(|&slot| state.piece_at(shape.rotate_180(slot)) as usize != shape.rotate_180(slot));
    if symmetric {
        bonus += SYMMETRY_BONUS;
    }

    bonus.min(100.0)
}

fn wrong_fraction(state: &PermutationState, slots: &[usize]) -> f64 {
    if slots.is_empty() {
        return 0.0;
    }
    let wrong = slots
        .iter()
        .filter(|&&slot| state.piece_at(slot) as usize != slot)
        .count();
    wrong as f64 / slots.len() as f64
}

/// Whether two whole rows have traded places.
fn has_row_swap(state: &PermutationState, shape: GridShape) -> bool {
    for r1 in 0..shape.rows {
        for r2 in (r1 + 1)..shape.rows {
            let swapped = (0..shape.cols).all(|c| {
                let upper = shape.slot_at(r1, c);
                let lower = shape.slot_at(r2, c);
                state.piece_at(upper) as usize == lower && state.piece_at(lower) as usize == upper
            });
            if swapped {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Move;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-6,
            "expected {expected}, got {actual}"
        );
    }

    fn border_rotation_3x3() -> PermutationState {
        let ring = [0usize, 1, 2, 5, 8, 7, 6, 3];
        let mut slots = vec![4u32; 9];
        for i in 0..ring.len() {
            slots[ring[(i + 1) % ring.len()]] = ring[i] as u32;
        }
        PermutationState::new(slots).unwrap()
    }

    fn reversed(n: usize) -> PermutationState {
        PermutationState::new((0..n as u32).rev().collect()).unwrap()
    }

    #[test]
    fn test_solved_state_scores_zero() {
        let estimator = DifficultyEstimator::default();
        let shape = GridShape::new(4, 4);
        let breakdown = estimator.breakdown(&PermutationState::solved(16), shape);
        assert_eq!(breakdown, DifficultyBreakdown::default());
        assert_eq!(estimator.estimate(&PermutationState::solved(16), shape), 0.0);
    }

    #[test]
    fn test_border_rotation_breakdown() {
        let shape = GridShape::new(3, 3);
        let breakdown = DifficultyEstimator::default().breakdown(&border_rotation_3x3(), shape);
        assert_close(breakdown.complexity, 9.0);
        // 8 unit steps against the reversed grid's 24.
        assert_close(breakdown.displacement, 100.0 * 8.0 / 24.0);
        // 28 pairs of border slots, total distance 60, max distance 4.
        assert_close(breakdown.clustering, 100.0 * (60.0 / 28.0) / 4.0);
        // All corners wrong, all edges wrong, symmetric error pattern.
        assert_close(breakdown.pattern, 70.0);
        assert!(breakdown.score > 25.0 && breakdown.score < 50.0, "score {}", breakdown.score);
        assert_eq!(DifficultyTier::from_score(breakdown.score), DifficultyTier::Medium);
    }

    #[test]
    fn test_row_swap_pattern() {
        let shape = GridShape::new(3, 3);
        let state = PermutationState::solved(9).apply_all(&[
            Move::new(0, 6),
            Move::new(1, 7),
            Move::new(2, 8),
        ]);
        assert!(has_row_swap(&state, shape));
        let breakdown = DifficultyEstimator::default().breakdown(&state, shape);
        // Row swap 30, corners 20, half the edges 10, symmetric 30.
        assert_close(breakdown.pattern, 90.0);
    }

    #[test]
    fn test_scattered_errors_are_harder_than_a_block() {
        let shape = GridShape::new(4, 4);
        let estimator = DifficultyEstimator::default();
        let block = PermutationState::solved(16).apply_all(&[Move::new(0, 1), Move::new(4, 5)]);
        let scattered =
            PermutationState::solved(16).apply_all(&[Move::new(0, 3), Move::new(12, 15)]);
        let block_b = estimator.breakdown(&block, shape);
        let scattered_b = estimator.breakdown(&scattered, shape);
        assert!(scattered_b.clustering > block_b.clustering);
        assert!(scattered_b.score > block_b.score);
    }

    #[test]
    fn test_reversed_large_grid_is_near_maximum() {
        let shape = GridShape::new(10, 10);
        let breakdown = DifficultyEstimator::default().breakdown(&reversed(100), shape);
        assert_close(breakdown.complexity, 100.0);
        assert_close(breakdown.displacement, 100.0);
        assert!(breakdown.score > 75.0, "score {}", breakdown.score);
        assert!(breakdown.score <= 100.0);
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let estimator = DifficultyEstimator::default();
        for (rows, cols) in [(1, 2), (2, 2), (3, 3), (2, 5), (6, 6)] {
            let shape = GridShape::new(rows, cols);
            for seed in 0..10 {
                let score = estimator.estimate(&PermutationState::random(shape.len(), seed), shape);
                assert!((0.0..=100.0).contains(&score), "{shape} seed {seed}: {score}");
            }
        }
    }

    #[test]
    fn test_custom_weights() {
        let weights = DifficultyWeights {
            complexity: 1.0,
            displacement: 0.0,
            clustering: 0.0,
            pattern: 0.0,
        };
        let shape = GridShape::new(5, 5);
        let state = PermutationState::solved(25).apply(Move::new(0, 24));
        assert_close(DifficultyEstimator::new(weights).estimate(&state, shape), 25.0);
    }

    #[test]
    fn test_single_slot_grid() {
        let shape = GridShape::new(1, 1);
        assert_eq!(
            DifficultyEstimator::default().estimate(&PermutationState::solved(1), shape),
            0.0
        );
    }
}
