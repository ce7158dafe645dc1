use serde::{Deserialize, Serialize};
use std::fmt;

/// How much excess effort, relative to progress, the player has spent.
///
/// Levels are ordered, so `StuckLevel::Severe > StuckLevel::Slight`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StuckLevel {
    #[default]
    None,
    Slight,
    Moderate,
    Severe,
}

impl fmt::Display for StuckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StuckLevel::None => write!(f, "none"),
            StuckLevel::Slight => write!(f, "slight"),
            StuckLevel::Moderate => write!(f, "moderate"),
            StuckLevel::Severe => write!(f, "severe"),
        }
    }
}

/// Moves a player is expected to have spent to reach `correct_pieces` correct pieces.
///
/// Every swap can put at least one piece in place, so one move per correct
/// piece is the expected pace.
pub fn expected_moves(correct_pieces: usize) -> i64 {
    correct_pieces as i64
}

/// Buckets the player's status from the move count and current progress.
///
/// `excess = moves_so_far - expected_moves(correct_pieces)`; with `n` pieces the
/// thresholds are `excess > 2n` severe, `excess > n` moderate, `excess > n/2`
/// slight. The function is pure, so equal inputs always give equal levels, and
/// raising `moves_so_far` alone never lowers the level.
///
/// # Examples
/// ```
/// use swap_analyzer::stuck::{classify, StuckLevel};
/// assert_eq!(classify(3, 2, 9), StuckLevel::None);
/// assert_eq!(classify(10, 2, 9), StuckLevel::Slight);
/// assert_eq!(classify(30, 2, 9), StuckLevel::Severe);
/// ```
pub fn classify(moves_so_far: u32, correct_pieces: usize, n: usize) -> StuckLevel {
    let excess = moves_so_far as i64 - expected_moves(correct_pieces);
    let n = n as i64;
    if excess > 2 * n {
        StuckLevel::Severe
    } else if excess > n {
        StuckLevel::Moderate
    } else if 2 * excess > n {
        // excess > n / 2 without integer truncation.
        StuckLevel::Slight
    } else {
        StuckLevel::None
    }
}
