//! Error taxonomy for the analysis engine.
//!
//! Invalid caller input is the only condition that aborts an analysis. A search
//! that runs out of budget or a stale cache entry never surfaces here.
use thiserror::Error;

/// Reasons a puzzle snapshot or permutation is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Puzzle has no slots (rows and columns must both be non-zero)")]
    EmptyPuzzle,
    #[error("Grid of {rows}x{cols} slots is too large to number its pieces")]
    GridTooLarge { rows: usize, cols: usize },
    #[error("Invalid piece count, expected {expected} pieces but got {found}")]
    PieceCountMismatch { expected: usize, found: usize },
    #[error("Piece {0} appears more than once")]
    DuplicatePiece(u32),
    #[error("Piece id out of range, expected a value below {len} but got {piece}")]
    PieceOutOfRange { piece: u32, len: usize },
    #[error("Slot out of range, expected a value below {len} but got {slot}")]
    SlotOutOfRange { slot: usize, len: usize },
    #[error("Slot {0} is assigned more than once")]
    DuplicateSlot(usize),
}
