//! # Swap Puzzle Analyzer Library
//!
//! Analysis engine for swap-based jigsaw puzzles: a grid of pieces where the
//! player exchanges two pieces per move until every piece sits in its goal slot.
//!
//! Given a snapshot of the puzzle and the number of moves made so far, the
//! `Analyzer` reports a difficulty score, progress, whether the player seems
//! stuck, ranked hints, the next move of an optimal solution and an estimated
//! time to finish. Results are memoised in a bounded cache.
//!
//! It is used by three binaries:
//! - `puzzle_analyzer`: Analyses a board read from a file and prints the result.
//! - `difficulty_evaluator`: Scores seeded scrambles across several grid sizes.
//! - `swap_player`: Interactive command-line game with on-demand hints.
//!
//! ## Modules
//! - `engine`: Grid geometry (`GridShape`), moves, the immutable
//!   `PermutationState` and the input `PuzzleSnapshot`.
//! - `heuristics`: Structural distance sum and permutation cycle analysis.
//! - `solver`: Budgeted best-first search for a swap sequence.
//! - `difficulty`: Weighted difficulty score.
//! - `stuck`: Stuck-level classifier.
//! - `hints`: Hint generation and ranking.
//! - `cache`: Bounded result cache with pluggable eviction.
//! - `analyzer`: The `Analyzer` entry point tying the above together.
//! - `utils`: Parsing puzzles from text.

pub mod analyzer;
pub mod cache;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod hints;
pub mod solver;
pub mod stuck;
pub mod utils;

pub use analyzer::{AnalysisResult, Analyzer, AnalyzerConfig};
pub use error::AnalysisError;
