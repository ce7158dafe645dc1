use crate::engine::{GridShape, PieceRecord, PuzzleSnapshot};

/// Parses rows of whitespace-separated piece ids into a `PuzzleSnapshot`.
///
/// Each string slice is one grid row, starting from the top. A piece's id is
/// the slot it belongs in (row-major, starting at 0), so `"0 1 2"` over
/// `"3 4 5"` is a solved 2x3 puzzle. Blank lines are skipped.
///
/// Only the text is checked here. Whether the ids form a permutation is
/// decided by `PuzzleSnapshot::to_state` when the snapshot is analysed.
///
/// # Returns
/// * `Ok(PuzzleSnapshot)` with one `PieceRecord` per cell.
/// * `Err(String)` if:
///     - No non-blank row is given.
///     - Rows have different numbers of cells.
///     - A cell is not a non-negative integer.
///
/// # Examples
/// ```
/// use swap_analyzer::utils::snapshot_from_str_array;
///
/// let snapshot = snapshot_from_str_array(&["1 0", "2 3"], 4).unwrap();
/// assert_eq!(snapshot.shape.to_string(), "2x2");
/// assert_eq!(snapshot.pieces[0].piece_id, 1);
/// assert_eq!(snapshot.pieces[0].correct_slot, 1);
/// assert_eq!(snapshot.moves_so_far, 4);
///
/// assert!(snapshot_from_str_array(&["1 0", "2"], 0).is_err());
/// assert!(snapshot_from_str_array(&["1 x"], 0).is_err());
/// ```
pub fn snapshot_from_str_array(s: &[&str], moves_so_far: u32) -> Result<PuzzleSnapshot, String> {
    let mut cols = None;
    let mut ids = Vec::new();
    let mut rows = 0;

    for (r, row_str) in s.iter().enumerate() {
        let row: Vec<&str> = row_str.split_whitespace().collect();
        if row.is_empty() {
            continue;
        }
        match cols {
            None => cols = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(format!(
                    "Row {} has {} cells. Expected {} like the first row",
                    r,
                    row.len(),
                    expected
                ));
            }
            Some(_) => {}
        }
        for (c, cell) in row.iter().enumerate() {
            let id = cell
                .parse::<u32>()
                .map_err(|_| format!("Unrecognized piece id '{}' in row {} col {}", cell, r, c))?;
            ids.push(id);
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| "Puzzle has no rows".to_string())?;
    let pieces = ids
        .into_iter()
        .enumerate()
        .map(|(slot, id)| PieceRecord {
            piece_id: id,
            current_slot: slot,
            correct_slot: id as usize,
        })
        .collect();
    Ok(PuzzleSnapshot::new(GridShape::new(rows, cols), pieces, moves_so_far))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_str_array_valid() {
        let snapshot = snapshot_from_str_array(&["3 0 1", "6 4 2", "7 8 5"], 2).unwrap();
        assert_eq!(snapshot.shape, GridShape::new(3, 3));
        assert_eq!(snapshot.pieces.len(), 9);
        assert_eq!(snapshot.pieces[3], PieceRecord { piece_id: 6, current_slot: 3, correct_slot: 6 });
        let state = snapshot.to_state().unwrap();
        assert_eq!(state.as_slice(), &[3, 0, 1, 6, 4, 2, 7, 8, 5]);
    }

    #[test]
    fn test_snapshot_from_str_array_extra_whitespace_and_blank_lines() {
        let snapshot = snapshot_from_str_array(&["", "  1\t0  ", "   ", "2 3"], 0).unwrap();
        assert_eq!(snapshot.shape, GridShape::new(2, 2));
        assert_eq!(snapshot.to_state().unwrap().as_slice(), &[1, 0, 2, 3]);
    }

    #[test]
    fn test_snapshot_from_str_array_ragged_rows() {
        let result = snapshot_from_str_array(&["0 1 2", "3 4"], 0);
        assert!(result.unwrap_err().contains("Row 1 has 2 cells"));
    }

    #[test]
    fn test_snapshot_from_str_array_bad_id() {
        let result = snapshot_from_str_array(&["0 1", "2 -3"], 0);
        assert!(result.unwrap_err().contains("Unrecognized piece id '-3'"));
    }

    #[test]
    fn test_snapshot_from_str_array_empty_input() {
        let rows: [&str; 0] = [];
        assert!(snapshot_from_str_array(&rows, 0).is_err());
        assert!(snapshot_from_str_array(&["", " "], 0).is_err());
    }

    #[test]
    fn test_snapshot_from_str_array_defers_permutation_check() {
        // Parses, but piece 0 is missing and 1 is duplicated.
        let snapshot = snapshot_from_str_array(&["1 1"], 0).unwrap();
        assert!(snapshot.to_state().is_err());
    }
}
