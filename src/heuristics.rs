use crate::engine::{GridShape, Move, PermutationState};

/// Penalty charged for a piece whose current slot cannot be located.
///
/// `PermutationState` guarantees every piece is present, so this only matters
/// if a caller hands in a state and a shape of different sizes.
pub const MISSING_PIECE_PENALTY: u32 = 1000;

/// Estimates the remaining distance from `state` to the solved arrangement.
///
/// The estimate is the sum, over all pieces, of the structural distance between
/// the slot a piece occupies and its goal slot. A piece that cannot be located
/// within the grid contributes `MISSING_PIECE_PENALTY` instead.
///
/// The value is zero exactly when every piece is in its goal slot. It is not a
/// strict lower bound on the number of swaps (one swap may move two pieces
/// across the whole grid); `min_swaps` provides that bound.
///
/// # Examples
/// ```
/// use swap_analyzer::engine::{GridShape, PermutationState};
/// use swap_analyzer::heuristics::heuristic;
///
/// let shape = GridShape::new(2, 2);
/// assert_eq!(heuristic(&PermutationState::solved(4), shape), 0);
/// // Pieces 0 and 3 trade opposite corners: each is two steps from home.
/// let state = PermutationState::new(vec![3, 1, 2, 0]).unwrap();
/// assert_eq!(heuristic(&state, shape), 4);
/// ```
pub fn heuristic(state: &PermutationState, shape: GridShape) -> u32 {
    let len = shape.len();
    let mut total = 0;
    for piece in 0..len as u32 {
        total += match state.slot_of(piece) {
            Some(slot) if slot < len => shape.structural_distance(slot, piece as usize),
            _ => MISSING_PIECE_PENALTY,
        };
    }
    total
}

/// Sum of structural distances between every piece and its goal slot.
///
/// Same as `heuristic` for well-formed input, but computed in a single pass over
/// the slots; used by the difficulty estimator.
pub fn total_displacement(state: &PermutationState, shape: GridShape) -> u32 {
    state
        .as_slice()
        .iter()
        .enumerate()
        .map(|(slot, &piece)| shape.structural_distance(slot, piece as usize))
        .sum()
}

/// Splits the arrangement into its permutation cycles.
///
/// Only non-trivial cycles (length two or more) are returned. Each cycle lists
/// slots in the order obtained by repeatedly following "the piece at this slot
/// belongs at slot ...", starting from the cycle's smallest slot; cycles are
/// ordered by that starting slot.
pub fn cycle_decomposition(state: &PermutationState) -> Vec<Vec<usize>> {
    let len = state.len();
    let mut visited = vec![false; len];
    let mut cycles = Vec::new();

    for start in 0..len {
        if visited[start] {
            continue;
        }
        let mut cycle = Vec::new();
        let mut slot = start;
        // Follow each piece to its goal slot until the walk returns to `start`.
        while !visited[slot] {
            visited[slot] = true;
            cycle.push(slot);
            slot = state.piece_at(slot) as usize;
        }
        // A one-slot cycle is a piece already in place.
        if cycle.len() >= 2 {
            cycles.push(cycle);
        }
    }
    cycles
}

/// Labels every slot with the index of the cycle it belongs to.
///
/// Slots that already hold their own piece get `None`. Two slots share a label
/// exactly when swapping them splits their common cycle.
pub fn cycle_labels(state: &PermutationState) -> Vec<Option<usize>> {
    let mut labels = vec![None; state.len()];
    for (idx, cycle) in cycle_decomposition(state).iter().enumerate() {
        for &slot in cycle {
            labels[slot] = Some(idx);
        }
    }
    labels
}

/// Exact minimum number of swaps that sorts `state`.
///
/// A cycle of length `L` needs `L - 1` swaps, and no swap can do better than
/// splitting one cycle in two.
pub fn min_swaps(state: &PermutationState) -> usize {
    cycle_decomposition(state)
        .iter()
        .map(|cycle| cycle.len() - 1)
        .sum()
}

/// Closed-form optimal swap sequence derived from the cycle decomposition.
///
/// Each move sends the piece at a cycle's first slot to its goal slot, fixing
/// one piece per swap and the last two pieces of a cycle together.
pub fn solve_by_cycles(state: &PermutationState) -> Vec<Move> {
    let mut moves = Vec::with_capacity(min_swaps(state));
    for cycle in cycle_decomposition(state) {
        let anchor = cycle[0];
        // The piece parked at `anchor` always belongs at the next cycle slot.
        for &slot in &cycle[1..] {
            moves.push(Move::new(anchor, slot));
        }
    }
    moves
}
