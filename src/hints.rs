//! Hint generation and ranking.
//!
//! Hints are derived from the stuck level, the solver's move sequence and the
//! arrangement itself, then ordered by priority (critical first). Hints of the
//! same priority keep the order in which they were produced.
use crate::difficulty::DifficultyTier;
use crate::engine::{GridShape, Move, PermutationState};
use crate::stuck::StuckLevel;
use serde::{Deserialize, Serialize};

/// A misplaced piece at most this far from its goal slot counts as near-correct.
pub const NEAR_CORRECT_DISTANCE: u32 = 1;
/// Warnings need more than this many moves...
pub const WARNING_MOVE_THRESHOLD: u32 = 10;
/// ...while progress is still below this percentage.
pub const WARNING_PROGRESS_THRESHOLD: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    OptimalMove,
    PatternHint,
    StrategyTip,
    Warning,
}

/// Urgency of a hint. Ordered so that `Critical` is the greatest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Animation class the UI layer should attach to the highlighted slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    Pulse,
    Swap,
    Glow,
    Shake,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualHint {
    pub slots: Vec<usize>,
    pub animation: Animation,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub kind: HintKind,
    pub priority: HintPriority,
    pub description: String,
    /// Confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub visual: Option<VisualHint>,
}

impl Hint {
    fn new(kind: HintKind, priority: HintPriority, description: String, confidence: f64) -> Self {
        Hint {
            kind,
            priority,
            description,
            confidence,
            visual: None,
        }
    }

    fn with_visual(mut self, slots: Vec<usize>, animation: Animation) -> Self {
        if !slots.is_empty() {
            self.visual = Some(VisualHint { slots, animation });
        }
        self
    }
}

/// Everything the generator looks at for one analysis.
#[derive(Clone, Copy, Debug)]
pub struct HintContext<'a> {
    pub state: &'a PermutationState,
    pub shape: GridShape,
    pub difficulty: f64,
    pub stuck_level: StuckLevel,
    pub solution: &'a [Move],
    pub moves_so_far: u32,
    /// Percentage of pieces in their goal slot.
    pub progress: f64,
}

/// Produces the ranked hint list for one analysis.
///
/// A solved arrangement gets no hints.
pub fn generate_hints(ctx: &HintContext<'_>) -> Vec<Hint> {
    if ctx.state.is_solved() {
        return Vec::new();
    }

    let mut hints = Vec::new();

    match ctx.stuck_level {
        StuckLevel::Severe => hints.push(border_strategy_tip(ctx)),
        StuckLevel::Moderate => {
            if let Some(hint) = near_correct_pattern_hint(ctx) {
                hints.push(hint);
            }
        }
        StuckLevel::Slight | StuckLevel::None => {}
    }

    if let Some(&mv) = ctx.solution.first() {
        hints.push(optimal_move_hint(ctx.state, mv));
    }

    if ctx.moves_so_far > WARNING_MOVE_THRESHOLD && ctx.progress < WARNING_PROGRESS_THRESHOLD {
        hints.push(Hint::new(
            HintKind::Warning,
            HintPriority::Critical,
            format!(
                "{} moves in and only {:.0}% of pieces are placed; recent swaps may be undoing progress.",
                ctx.moves_so_far, ctx.progress
            ),
            0.7,
        )
        .with_visual(ctx.state.misplaced_slots(), Animation::Shake));
    }

    rank_hints(&mut hints);
    hints
}

/// Sorts hints by priority, critical first, keeping insertion order among equals.
pub fn rank_hints(hints: &mut [Hint]) {
    hints.sort_by(|a, b| b.priority.cmp(&a.priority));
}

fn border_strategy_tip(ctx: &HintContext<'_>) -> Hint {
    let border: Vec<usize> = ctx
        .state
        .misplaced_slots()
        .into_iter()
        .filter(|&slot| ctx.shape.is_border(slot))
        .collect();
    let tier = DifficultyTier::from_score(ctx.difficulty);
    let description = if border.is_empty() {
        format!("{tier} puzzle: the border is complete, so work inwards from the edges.")
    } else {
        format!(
            "{tier} puzzle: place the {} corner and edge pieces first; they have the fewest valid positions.",
            border.len()
        )
    };
    Hint::new(HintKind::StrategyTip, HintPriority::High, description, 0.9)
        .with_visual(border, Animation::Glow)
}

fn near_correct_pattern_hint(ctx: &HintContext<'_>) -> Option<Hint> {
    let near: Vec<usize> = ctx
        .state
        .misplaced_slots()
        .into_iter()
        .filter(|&slot| {
            ctx.shape.structural_distance(slot, ctx.state.piece_at(slot) as usize)
                <= NEAR_CORRECT_DISTANCE
        })
        .collect();
    if near.is_empty() {
        return None;
    }
    let description = format!(
        "{} piece{} {} right next to where {} belong{}.",
        near.len(),
        if near.len() == 1 { "" } else { "s" },
        if near.len() == 1 { "sits" } else { "sit" },
        if near.len() == 1 { "it" } else { "they" },
        if near.len() == 1 { "s" } else { "" },
    );
    Some(
        Hint::new(HintKind::PatternHint, HintPriority::Medium, description, 0.8)
            .with_visual(near, Animation::Pulse),
    )
}

fn optimal_move_hint(state: &PermutationState, mv: Move) -> Hint {
    Hint::new(
        HintKind::OptimalMove,
        HintPriority::High,
        format!(
            "Swap piece {} (slot {}) with piece {} (slot {}).",
            state.piece_at(mv.a),
            mv.a,
            state.piece_at(mv.b),
            mv.b
        ),
        0.95,
    )
    .with_visual(vec![mv.a, mv.b], Animation::Swap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(
        state: &'a PermutationState,
        shape: GridShape,
        stuck_level: StuckLevel,
        solution: &'a [Move],
        moves_so_far: u32,
    ) -> HintContext<'a> {
        HintContext {
            state,
            shape,
            difficulty: 40.0,
            stuck_level,
            solution,
            moves_so_far,
            progress: 100.0 * state.correct_count() as f64 / state.len() as f64,
        }
    }

    #[test]
    fn test_solved_state_has_no_hints() {
        let state = PermutationState::solved(9);
        let ctx = context(&state, GridShape::new(3, 3), StuckLevel::Severe, &[], 50);
        assert!(generate_hints(&ctx).is_empty());
    }

    #[test]
    fn test_optimal_move_names_both_pieces() {
        let state = PermutationState::solved(9).apply(Move::new(2, 6));
        let solution = [Move::new(2, 6)];
        let ctx = context(&state, GridShape::new(3, 3), StuckLevel::None, &solution, 0);
        let hints = generate_hints(&ctx);
        assert_eq!(hints.len(), 1);
        let hint = &hints[0];
        assert_eq!(hint.kind, HintKind::OptimalMove);
        assert_eq!(hint.priority, HintPriority::High);
        assert_eq!(hint.confidence, 0.95);
        assert_eq!(hint.description, "Swap piece 6 (slot 2) with piece 2 (slot 6).");
        assert_eq!(
            hint.visual,
            Some(VisualHint { slots: vec![2, 6], animation: Animation::Swap })
        );
    }

    #[test]
    fn test_severe_points_at_border_pieces() {
        let shape = GridShape::new(3, 3);
        // A corner traded with the centre, plus two edge pieces traded.
        let state = PermutationState::solved(9).apply_all(&[Move::new(0, 4), Move::new(1, 3)]);
        let ctx = context(&state, shape, StuckLevel::Severe, &[], 30);
        let hints = generate_hints(&ctx);
        let tip = hints
            .iter()
            .find(|h| h.kind == HintKind::StrategyTip)
            .expect("severe stuck level emits a strategy tip");
        assert_eq!(tip.priority, HintPriority::High);
        assert_eq!(tip.confidence, 0.9);
        let visual = tip.visual.as_ref().unwrap();
        assert_eq!(visual.slots, vec![0, 1, 3]);
        assert_eq!(visual.animation, Animation::Glow);
    }

    #[test]
    fn test_moderate_points_at_near_correct_pieces() {
        let shape = GridShape::new(3, 3);
        // (0,1) are adjacent; (2,6) are far apart.
        let state = PermutationState::solved(9).apply_all(&[Move::new(0, 1), Move::new(2, 6)]);
        let ctx = context(&state, shape, StuckLevel::Moderate, &[], 5);
        let hints = generate_hints(&ctx);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].kind, HintKind::PatternHint);
        assert_eq!(hints[0].priority, HintPriority::Medium);
        assert_eq!(hints[0].confidence, 0.8);
        assert_eq!(hints[0].visual.as_ref().unwrap().slots, vec![0, 1]);
    }

    #[test]
    fn test_moderate_without_near_pieces_emits_nothing() {
        let shape = GridShape::new(3, 3);
        let state = PermutationState::solved(9).apply(Move::new(0, 8));
        let ctx = context(&state, shape, StuckLevel::Moderate, &[], 5);
        assert!(generate_hints(&ctx).is_empty());
    }

    #[test]
    fn test_warning_requires_many_moves_and_little_progress() {
        let shape = GridShape::new(3, 3);
        let state = PermutationState::new(vec![1, 2, 0, 4, 5, 3, 7, 8, 6]).unwrap();
        let few = context(&state, shape, StuckLevel::None, &[], 10);
        assert!(generate_hints(&few).is_empty());
        let many = context(&state, shape, StuckLevel::None, &[], 11);
        let hints = generate_hints(&many);
        assert_eq!(hints.len(), 1);
        assert_eq!(hints[0].kind, HintKind::Warning);
        assert_eq!(hints[0].priority, HintPriority::Critical);
        assert_eq!(hints[0].confidence, 0.7);
    }

    #[test]
    fn test_ranking_is_by_priority_and_stable() {
        let shape = GridShape::new(3, 3);
        let state = PermutationState::new(vec![1, 2, 0, 4, 5, 3, 7, 8, 6]).unwrap();
        let solution = [Move::new(0, 1)];
        let ctx = context(&state, shape, StuckLevel::Severe, &solution, 40);
        let kinds: Vec<HintKind> = generate_hints(&ctx).iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![HintKind::Warning, HintKind::StrategyTip, HintKind::OptimalMove]
        );
    }

    #[test]
    fn test_rank_hints_orders_all_priorities() {
        let mut hints = vec![
            Hint::new(HintKind::PatternHint, HintPriority::Low, "a".into(), 0.1),
            Hint::new(HintKind::Warning, HintPriority::Critical, "b".into(), 0.1),
            Hint::new(HintKind::PatternHint, HintPriority::Medium, "c".into(), 0.1),
            Hint::new(HintKind::StrategyTip, HintPriority::High, "d".into(), 0.1),
            Hint::new(HintKind::PatternHint, HintPriority::Medium, "e".into(), 0.1),
        ];
        rank_hints(&mut hints);
        let order: Vec<&str> = hints.iter().map(|h| h.description.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "e", "a"]);
    }
}
