//! Board storage and random board generation.

use chase_toe_core::{BoardView, CellCoord, GenerationError};
use log::trace;
use rand::Rng;

/// Passability matrix of the board, stored row-major.
#[derive(Clone, Debug)]
pub(crate) struct Board {
    rows: u32,
    columns: u32,
    cells: Vec<bool>,
}

impl Board {
    /// Wraps a fixed passability matrix after validating its shape.
    pub(crate) fn from_cells(
        rows: u32,
        columns: u32,
        cells: Vec<bool>,
    ) -> Result<Self, GenerationError> {
        if rows == 0 || columns == 0 {
            return Err(GenerationError::EmptyBoard { rows, columns });
        }

        let expected = cell_count(rows, columns);
        if cells.len() != expected {
            return Err(GenerationError::LayoutMismatch {
                expected,
                received: cells.len(),
            });
        }

        Ok(Self {
            rows,
            columns,
            cells,
        })
    }

    /// Draws whole boards until one carries enough blocked cells.
    ///
    /// Each cell draws a uniform value in `0..rows * columns` and is passable
    /// when the value does not exceed `percentage`. Returns the accepted board
    /// together with the number of draws it took.
    pub(crate) fn generate<R: Rng>(
        rows: u32,
        columns: u32,
        percentage: u32,
        max_attempts: u32,
        rng: &mut R,
    ) -> Result<(Self, u32), GenerationError> {
        if percentage > 100 {
            return Err(GenerationError::InvalidPercentage { percentage });
        }
        if rows == 0 || columns == 0 {
            return Err(GenerationError::EmptyBoard { rows, columns });
        }

        let total = cell_count(rows, columns);
        let required = required_blocked(total, percentage);
        let draw_bound = u64::from(rows) * u64::from(columns);
        let threshold = u64::from(percentage);

        for attempt in 1..=max_attempts {
            let cells: Vec<bool> = (0..total)
                .map(|_| rng.gen_range(0..draw_bound) <= threshold)
                .collect();
            let blocked = cells.iter().filter(|passable| !**passable).count();
            if blocked >= required {
                return Ok((
                    Self {
                        rows,
                        columns,
                        cells,
                    },
                    attempt,
                ));
            }
            trace!("[Board] draw {attempt} produced {blocked} blocked cells, need {required}");
        }

        Err(GenerationError::QuotaUnreachable {
            required: u32::try_from(required).unwrap_or(u32::MAX),
            attempts: max_attempts,
        })
    }

    pub(crate) const fn rows(&self) -> u32 {
        self.rows
    }

    pub(crate) const fn columns(&self) -> u32 {
        self.columns
    }

    pub(crate) fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells, self.rows, self.columns)
    }

    pub(crate) fn is_passable(&self, cell: CellCoord) -> bool {
        self.view().is_passable(cell)
    }

    pub(crate) fn blocked_count(&self) -> usize {
        self.view().blocked_count()
    }

    /// Enumerates passable cells in row-major order.
    pub(crate) fn passable_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.view()
            .iter()
            .filter_map(|(cell, passable)| passable.then_some(cell))
    }
}

/// Minimum number of blocked cells a board of `total` cells must carry:
/// `100 - percentage` percent, rounded up.
pub(crate) fn required_blocked(total: usize, percentage: u32) -> usize {
    let share = 100 - usize::try_from(percentage.min(100)).unwrap_or(100);
    (total.saturating_mul(share)).div_ceil(100)
}

fn cell_count(rows: u32, columns: u32) -> usize {
    usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(usize::MAX)
}
