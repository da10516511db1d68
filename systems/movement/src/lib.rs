#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure movement system that discovers the cells a player may reach.

use chase_toe_core::{BoardView, CellCoord, Command, Direction, Event, DEFAULT_MOVE_RANGE};
use log::trace;

/// Pure system that reacts to turn changes by proposing the current move set.
#[derive(Clone, Copy, Debug)]
pub struct Movement {
    range: u32,
}

impl Movement {
    /// Creates a movement system that lets players travel up to `range` cells per axis.
    #[must_use]
    pub const fn new(range: u32) -> Self {
        Self { range }
    }

    /// Maximum number of steps a player may take along one direction.
    #[must_use]
    pub const fn range(&self) -> u32 {
        self.range
    }

    /// Consumes world events and the board view to emit move-set commands.
    pub fn handle(&self, events: &[Event], board: BoardView<'_>, out: &mut Vec<Command>) {
        for event in events {
            if let Event::TurnStarted { player, cell } = event {
                let cells = reachable_cells(board, *cell, self.range);
                trace!(
                    "[Movement] {} cell(s) reachable for player {} from {cell:?}",
                    cells.len(),
                    player.get()
                );
                out.push(Command::MarkValidMoves {
                    player: *player,
                    cells,
                });
            }
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_RANGE)
    }
}

/// Walks up to `range` steps from `origin` in each cardinal direction.
///
/// A walk stops at the board edge or at the first blocked cell; cells behind
/// a blocked cell are never reachable. Players do not block each other. The
/// origin itself is excluded. Cells are returned grouped by direction in
/// [`Direction::ALL`] order, nearest first.
#[must_use]
pub fn reachable_cells(board: BoardView<'_>, origin: CellCoord, range: u32) -> Vec<CellCoord> {
    let (rows, columns) = board.dimensions();
    let mut cells = Vec::new();

    for direction in Direction::ALL {
        let mut cursor = origin;
        for _ in 0..range {
            match cursor.step(direction, rows, columns) {
                Some(next) if board.is_passable(next) => {
                    cells.push(next);
                    cursor = next;
                }
                _ => break,
            }
        }
    }

    cells
}
