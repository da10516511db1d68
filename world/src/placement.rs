//! Occupancy checks and random entity placement.

use chase_toe_core::{CellCoord, IndexMapping, PlacementError};
use log::trace;
use rand::Rng;

use crate::board::Board;

/// Resolves a flat index in `0..rows * columns` into a cell on the board.
///
/// Returns `None` when the mapping does not land on the board.
pub(crate) fn resolve_index(
    mapping: IndexMapping,
    index: u64,
    rows: u32,
    columns: u32,
) -> Option<CellCoord> {
    if rows == 0 || columns == 0 {
        return None;
    }

    let cell = match mapping {
        IndexMapping::RowMajor => {
            let row = u32::try_from(index / u64::from(columns)).ok()?;
            let column = u32::try_from(index % u64::from(columns)).ok()?;
            CellCoord::new(row, column)
        }
        IndexMapping::DecimalSplit => decimal_split(index, rows, columns)?,
    };

    (cell.row() < rows && cell.column() < columns).then_some(cell)
}

fn decimal_split(index: u64, rows: u32, columns: u32) -> Option<CellCoord> {
    let quotient = (index as f64 * f64::from(columns)) / (f64::from(rows) * f64::from(columns));
    let text = quotient.to_string();
    let (whole, fraction) = text.split_once('.')?;
    let row = whole.parse::<u32>().ok()?;
    let column = fraction.parse::<u32>().ok()?;
    Some(CellCoord::new(row, column))
}

/// Returns the cell behind `index` when it resolves onto a passable cell.
pub(crate) fn is_box_available(
    board: &Board,
    mapping: IndexMapping,
    index: u64,
) -> Option<CellCoord> {
    resolve_index(mapping, index, board.rows(), board.columns())
        .filter(|cell| board.is_passable(*cell))
}

/// Reports whether any tracked entity stands on `cell`.
pub(crate) fn is_box_in_use(cell: CellCoord, occupied: &[CellCoord]) -> bool {
    occupied.iter().any(|entry| *entry == cell)
}

/// Draws random cells until one is passable and unused.
///
/// Fails fast with [`PlacementError::NoFreeCell`] when no such cell exists
/// and with [`PlacementError::RetriesExhausted`] once `max_attempts` draws
/// missed.
pub(crate) fn place_randomly<R: Rng>(
    board: &Board,
    mapping: IndexMapping,
    occupied: &[CellCoord],
    max_attempts: u32,
    rng: &mut R,
) -> Result<CellCoord, PlacementError> {
    if !board
        .passable_cells()
        .any(|cell| !is_box_in_use(cell, occupied))
    {
        return Err(PlacementError::NoFreeCell);
    }

    let draw_bound = u64::from(board.rows()) * u64::from(board.columns());
    for attempt in 1..=max_attempts {
        let index = rng.gen_range(0..draw_bound);
        match is_box_available(board, mapping, index) {
            Some(cell) if !is_box_in_use(cell, occupied) => return Ok(cell),
            Some(cell) => trace!("[Placement] draw {attempt} hit occupied cell {cell:?}"),
            None => trace!("[Placement] draw {attempt} hit unavailable index {index}"),
        }
    }

    Err(PlacementError::RetriesExhausted {
        attempts: max_attempts,
    })
}

/// Validates a fixed placement cell.
pub(crate) fn place_at(
    board: &Board,
    cell: CellCoord,
    occupied: &[CellCoord],
) -> Result<CellCoord, PlacementError> {
    if !board.is_passable(cell) {
        return Err(PlacementError::Unavailable { cell });
    }
    if is_box_in_use(cell, occupied) {
        return Err(PlacementError::Occupied { cell });
    }
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_board(rows: u32, columns: u32) -> Board {
        let cells = vec![true; (rows * columns) as usize];
        Board::from_cells(rows, columns, cells).expect("valid board")
    }

    #[test]
    fn row_major_mapping_uses_div_and_mod() {
        assert_eq!(
            resolve_index(IndexMapping::RowMajor, 67, 10, 10),
            Some(CellCoord::new(6, 7))
        );
        assert_eq!(
            resolve_index(IndexMapping::RowMajor, 60, 10, 10),
            Some(CellCoord::new(6, 0))
        );
        assert_eq!(
            resolve_index(IndexMapping::RowMajor, 7, 3, 4),
            Some(CellCoord::new(1, 3))
        );
        assert_eq!(resolve_index(IndexMapping::RowMajor, 12, 3, 4), None);
    }

    #[test]
    fn decimal_split_reads_fraction_digits_as_column() {
        assert_eq!(
            resolve_index(IndexMapping::DecimalSplit, 67, 10, 10),
            Some(CellCoord::new(6, 7))
        );
        assert_eq!(
            resolve_index(IndexMapping::DecimalSplit, 5, 10, 10),
            Some(CellCoord::new(0, 5))
        );
    }

    #[test]
    fn decimal_split_misses_whole_quotients_and_long_fractions() {
        assert_eq!(resolve_index(IndexMapping::DecimalSplit, 60, 10, 10), None);
        assert_eq!(resolve_index(IndexMapping::DecimalSplit, 0, 10, 10), None);
        // 1 / 3 has sixteen fraction digits, far beyond the board.
        assert_eq!(resolve_index(IndexMapping::DecimalSplit, 1, 3, 3), None);
    }

    #[test]
    fn blocked_cells_are_not_available() {
        let board = Board::from_cells(1, 3, vec![true, false, true]).expect("valid board");

        assert_eq!(
            is_box_available(&board, IndexMapping::RowMajor, 0),
            Some(CellCoord::new(0, 0))
        );
        assert_eq!(is_box_available(&board, IndexMapping::RowMajor, 1), None);
    }

    #[test]
    fn box_in_use_checks_every_occupant() {
        let occupied = [CellCoord::new(1, 1), CellCoord::new(2, 3)];
        assert!(is_box_in_use(CellCoord::new(2, 3), &occupied));
        assert!(!is_box_in_use(CellCoord::new(3, 2), &occupied));
    }

    #[test]
    fn random_placement_avoids_occupied_cells() {
        let board = open_board(2, 2);
        let occupied = [
            CellCoord::new(0, 0),
            CellCoord::new(0, 1),
            CellCoord::new(1, 0),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let cell = place_randomly(&board, IndexMapping::RowMajor, &occupied, 10_000, &mut rng)
            .expect("one free cell");
        assert_eq!(cell, CellCoord::new(1, 1));
    }

    #[test]
    fn random_placement_fails_fast_without_free_cells() {
        let board = Board::from_cells(2, 2, vec![false, true, false, false]).expect("valid");
        let occupied = [CellCoord::new(0, 1)];
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let error = place_randomly(&board, IndexMapping::RowMajor, &occupied, 10_000, &mut rng)
            .expect_err("no free cell");
        assert_eq!(error, PlacementError::NoFreeCell);
    }

    #[test]
    fn unreachable_cells_exhaust_retries() {
        // Decimal split never reaches column zero, the only free cell here.
        let board = Board::from_cells(2, 2, vec![true, false, false, false]).expect("valid");
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let error = place_randomly(&board, IndexMapping::DecimalSplit, &[], 64, &mut rng)
            .expect_err("cell unreachable");
        assert_eq!(error, PlacementError::RetriesExhausted { attempts: 64 });
    }

    #[test]
    fn fixed_placement_rejects_blocked_and_used_cells() {
        let board = Board::from_cells(1, 3, vec![true, false, true]).expect("valid board");
        let occupied = [CellCoord::new(0, 2)];

        assert_eq!(
            place_at(&board, CellCoord::new(0, 1), &occupied),
            Err(PlacementError::Unavailable {
                cell: CellCoord::new(0, 1)
            })
        );
        assert_eq!(
            place_at(&board, CellCoord::new(0, 2), &occupied),
            Err(PlacementError::Occupied {
                cell: CellCoord::new(0, 2)
            })
        );
        assert_eq!(
            place_at(&board, CellCoord::new(0, 0), &occupied),
            Ok(CellCoord::new(0, 0))
        );
    }
}
