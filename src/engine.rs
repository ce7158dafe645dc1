//! Core value types for the swap-puzzle analysis engine.
//!
//! This module defines the data the rest of the crate operates on:
//! - `GridShape`: the row/column geometry of a puzzle and the structural
//!   (Manhattan) distance between two slots.
//! - `PermutationState`: an immutable mapping from slot to the piece occupying it.
//! - `Move`: a swap of the pieces at two slot positions.
//! - `PieceRecord` / `PuzzleSnapshot`: the caller-facing input shape handed over
//!   by the game layer, validated into a `PermutationState`.
use crate::error::AnalysisError;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Row/column dimensions of a puzzle grid.
///
/// Slots are numbered row-major: slot `r * cols + c` sits at row `r`, column `c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Self {
        GridShape { rows, cols }
    }

    /// Number of slots (and therefore pieces) in the grid.
    ///
    /// Saturates at `usize::MAX` for dimensions whose product overflows; such a
    /// shape never passes `validate`.
    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Checks that the grid has at least one slot and that every slot can be
    /// numbered by a `u32` piece id, returning the slot count.
    ///
    /// # Errors
    /// `EmptyPuzzle` for a zero dimension, `GridTooLarge` when `rows * cols`
    /// overflows or exceeds the piece id range.
    pub fn validate(&self) -> Result<usize, AnalysisError> {
        if self.is_empty() {
            return Err(AnalysisError::EmptyPuzzle);
        }
        self.rows
            .checked_mul(self.cols)
            .filter(|&len| u32::try_from(len).is_ok())
            .ok_or(AnalysisError::GridTooLarge {
                rows: self.rows,
                cols: self.cols,
            })
    }

    /// Returns the `(row, col)` coordinates of `slot`.
    ///
    /// # Panics
    /// Panics if the grid has zero columns.
    pub fn coords(&self, slot: usize) -> (usize, usize) {
        (slot / self.cols, slot % self.cols)
    }

    pub fn slot_at(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Row difference plus column difference between two slots.
    ///
    /// # Examples
    /// ```
    /// use swap_analyzer::engine::GridShape;
    /// let shape = GridShape::new(3, 3);
    /// assert_eq!(shape.structural_distance(0, 8), 4);
    /// assert_eq!(shape.structural_distance(4, 4), 0);
    /// ```
    pub fn structural_distance(&self, a: usize, b: usize) -> u32 {
        let (ra, ca) = self.coords(a);
        let (rb, cb) = self.coords(b);
        (ra.abs_diff(rb) + ca.abs_diff(cb)) as u32
    }

    /// Largest structural distance between any two slots (corner to opposite corner).
    pub fn max_distance(&self) -> u32 {
        (self.rows.saturating_sub(1) + self.cols.saturating_sub(1)) as u32
    }

    pub fn is_corner(&self, slot: usize) -> bool {
        let (r, c) = self.coords(slot);
        (r == 0 || r + 1 == self.rows) && (c == 0 || c + 1 == self.cols)
    }

    pub fn is_border(&self, slot: usize) -> bool {
        let (r, c) = self.coords(slot);
        r == 0 || c == 0 || r + 1 == self.rows || c + 1 == self.cols
    }

    /// A border slot that is not a corner.
    pub fn is_edge(&self, slot: usize) -> bool {
        self.is_border(slot) && !self.is_corner(slot)
    }

    /// The slot reached by rotating the grid 180° about its centre.
    pub fn rotate_180(&self, slot: usize) -> usize {
        self.len() - 1 - slot
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A swap of the pieces sitting at slots `a` and `b`.
///
/// Moves always refer to positions, never to piece values. `Move::new`
/// normalizes the pair so that `a <= b`; a swap is symmetric, so `(3, 1)` and
/// `(1, 3)` denote the same move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub a: usize,
    pub b: usize,
}

impl Move {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Move { a, b }
        } else {
            Move { a: b, b: a }
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swap({}, {})", self.a, self.b)
    }
}

/// An arrangement of pieces: slot `i` holds the piece identified by `slots[i]`.
///
/// Every identifier in `0..len` appears exactly once. The solved arrangement is
/// the identity (slot `i` holds piece `i`). States are never mutated in place;
/// `apply` returns a fresh state, and cloning is cheap because the slot buffer
/// is shared.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PermutationState {
    slots: Arc<[u32]>,
}

impl PermutationState {
    /// Builds a state from slot contents, rejecting anything that is not a
    /// permutation of `0..slots.len()`.
    ///
    /// # Examples
    /// ```
    /// use swap_analyzer::engine::PermutationState;
    /// assert!(PermutationState::new(vec![2, 0, 1]).is_ok());
    /// assert!(PermutationState::new(vec![0, 0, 1]).is_err());
    /// assert!(PermutationState::new(vec![0, 3, 1]).is_err());
    /// ```
    pub fn new(slots: Vec<u32>) -> Result<Self, AnalysisError> {
        if slots.is_empty() {
            return Err(AnalysisError::EmptyPuzzle);
        }
        let len = slots.len();
        let mut seen = vec![false; len];
        for &piece in &slots {
            let idx = piece as usize;
            if idx >= len {
                return Err(AnalysisError::PieceOutOfRange { piece, len });
            }
            if seen[idx] {
                return Err(AnalysisError::DuplicatePiece(piece));
            }
            seen[idx] = true;
        }
        Ok(PermutationState {
            slots: slots.into(),
        })
    }

    /// The identity arrangement with `n` pieces.
    pub fn solved(n: usize) -> Self {
        PermutationState {
            slots: (0..n as u32).collect(),
        }
    }

    /// A uniformly shuffled arrangement of `n` pieces, reproducible from `seed`.
    pub fn random(n: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut slots: Vec<u32> = (0..n as u32).collect();
        slots.shuffle(&mut rng);
        PermutationState {
            slots: slots.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The piece currently at `slot`.
    ///
    /// # Panics
    /// Panics if `slot` is out of range.
    pub fn piece_at(&self, slot: usize) -> u32 {
        self.slots[slot]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.slots
    }

    /// The slot currently holding `piece`, if the piece exists.
    pub fn slot_of(&self, piece: u32) -> Option<usize> {
        self.slots.iter().position(|&p| p == piece)
    }

    /// Inverse mapping: entry `p` is the slot holding piece `p`.
    pub fn positions(&self) -> Vec<usize> {
        let mut positions = vec![0; self.len()];
        for (slot, &piece) in self.slots.iter().enumerate() {
            positions[piece as usize] = slot;
        }
        positions
    }

    pub fn is_solved(&self) -> bool {
        self.slots
            .iter()
            .enumerate()
            .all(|(slot, &piece)| piece as usize == slot)
    }

    /// Number of pieces already sitting in their goal slot.
    pub fn correct_count(&self) -> usize {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(slot, &piece)| piece as usize == slot)
            .count()
    }

    /// Slots whose occupant belongs elsewhere, in ascending order.
    pub fn misplaced_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|&(slot, &piece)| piece as usize != slot)
            .map(|(slot, _)| slot)
            .collect()
    }

    /// Returns the state reached by swapping the pieces at `mv.a` and `mv.b`.
    ///
    /// # Panics
    /// Panics if either slot is out of range.
    pub fn apply(&self, mv: Move) -> PermutationState {
        let mut slots = self.slots.to_vec();
        slots.swap(mv.a, mv.b);
        PermutationState {
            slots: slots.into(),
        }
    }

    /// Applies `moves` in order.
    pub fn apply_all(&self, moves: &[Move]) -> PermutationState {
        let mut slots = self.slots.to_vec();
        for mv in moves {
            slots.swap(mv.a, mv.b);
        }
        PermutationState {
            slots: slots.into(),
        }
    }

    /// Renders the arrangement as a grid for terminal output.
    ///
    /// Pieces in their goal slot get a green background and misplaced pieces a
    /// red one; slots listed in `highlight` are shown in bold yellow instead.
    pub fn to_string_with_highlight(&self, shape: GridShape, highlight: &[usize]) -> String {
        let width = self.len().saturating_sub(1).to_string().len();
        let mut output = String::new();
        for r in 0..shape.rows {
            for c in 0..shape.cols {
                let slot = shape.slot_at(r, c);
                let Some(&piece) = self.slots.get(slot) else {
                    continue;
                };
                let color_code = if highlight.contains(&slot) {
                    "1;43"
                } else if piece as usize == slot {
                    "42"
                } else {
                    "41"
                };
                output.push_str(&format!(
                    "\x1b[{}m {:>width$} \x1b[m",
                    color_code,
                    piece,
                    width = width
                ));
            }
            if r + 1 < shape.rows {
                output.push('\n');
            }
        }
        output
    }
}

impl fmt::Display for PermutationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, piece) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", piece)?;
        }
        write!(f, "]")
    }
}

/// Scrambles the solved arrangement of `n` pieces with `swaps` random swaps.
///
/// Unlike `PermutationState::random`, the number of swaps bounds how far the
/// result is from solved, which makes it useful for producing puzzles of a
/// controlled difficulty. The same `seed` always produces the same state.
pub fn scrambled_state(n: usize, swaps: usize, seed: u64) -> PermutationState {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut slots: Vec<u32> = (0..n as u32).collect();
    if n >= 2 {
        for _ in 0..swaps {
            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n - 1);
            if b >= a {
                b += 1;
            }
            slots.swap(a, b);
        }
    }
    PermutationState {
        slots: slots.into(),
    }
}

/// One piece as reported by the game layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub piece_id: u32,
    pub current_slot: usize,
    pub correct_slot: usize,
}

/// Everything the game layer hands over for one analysis request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub shape: GridShape,
    pub pieces: Vec<PieceRecord>,
    pub moves_so_far: u32,
}

impl PuzzleSnapshot {
    pub fn new(shape: GridShape, pieces: Vec<PieceRecord>, moves_so_far: u32) -> Self {
        PuzzleSnapshot {
            shape,
            pieces,
            moves_so_far,
        }
    }

    /// Builds the snapshot describing `state`, where each piece's identifier is
    /// its goal slot.
    pub fn from_state(
        shape: GridShape,
        state: &PermutationState,
        moves_so_far: u32,
    ) -> Result<Self, AnalysisError> {
        let len = shape.validate()?;
        if state.len() != len {
            return Err(AnalysisError::PieceCountMismatch {
                expected: len,
                found: state.len(),
            });
        }
        let pieces = state
            .as_slice()
            .iter()
            .enumerate()
            .map(|(slot, &piece)| PieceRecord {
                piece_id: piece,
                current_slot: slot,
                correct_slot: piece as usize,
            })
            .collect();
        Ok(PuzzleSnapshot::new(shape, pieces, moves_so_far))
    }

    /// Validates the snapshot and converts it into a `PermutationState`.
    ///
    /// Inside the engine a piece is identified by its goal slot, so the
    /// resulting state holds `correct_slot` at index `current_slot`.
    ///
    /// # Errors
    /// Returns an `AnalysisError` if the grid is empty, the piece count does not
    /// match the grid, or any piece id, current slot or goal slot is duplicated
    /// or out of range.
    pub fn to_state(&self) -> Result<PermutationState, AnalysisError> {
        // Dimensions first: the slot count sizes every buffer below.
        let len = self.shape.validate()?;
        if self.pieces.len() != len {
            return Err(AnalysisError::PieceCountMismatch {
                expected: len,
                found: self.pieces.len(),
            });
        }

        let mut seen_ids = vec![false; len];
        let mut seen_goals = vec![false; len];
        let mut slots: Vec<Option<u32>> = vec![None; len];

        for record in &self.pieces {
            // Piece ids must cover 0..len exactly once.
            let id = record.piece_id as usize;
            if id >= len {
                return Err(AnalysisError::PieceOutOfRange {
                    piece: record.piece_id,
                    len,
                });
            }
            if seen_ids[id] {
                return Err(AnalysisError::DuplicatePiece(record.piece_id));
            }
            seen_ids[id] = true;

            // Each slot holds one piece...
            if record.current_slot >= len {
                return Err(AnalysisError::SlotOutOfRange {
                    slot: record.current_slot,
                    len,
                });
            }
            if slots[record.current_slot].is_some() {
                return Err(AnalysisError::DuplicateSlot(record.current_slot));
            }
            // ...and is the goal of exactly one piece.
            if record.correct_slot >= len {
                return Err(AnalysisError::SlotOutOfRange {
                    slot: record.correct_slot,
                    len,
                });
            }
            if seen_goals[record.correct_slot] {
                return Err(AnalysisError::DuplicateSlot(record.correct_slot));
            }
            seen_goals[record.correct_slot] = true;
            slots[record.current_slot] = Some(record.correct_slot as u32);
        }

        // With `len` distinct current slots all in range, every slot is filled.
        let slots: Vec<u32> = slots.into_iter().flatten().collect();
        PermutationState::new(slots)
    }
}
