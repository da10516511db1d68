//! Game configuration shared by the bootstrap system and adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{PlayerSpec, WeaponSpec, DEFAULT_MOVE_RANGE};

const DEFAULT_ROWS: u32 = 10;
const DEFAULT_COLUMNS: u32 = 10;
const DEFAULT_PERCENTAGE: u32 = 90;
const DEFAULT_HEALTH: u32 = 100;
const DEFAULT_MAX_BOARD_ATTEMPTS: u32 = 1_000;
const DEFAULT_MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

const PASSABLE_GLYPH: char = '.';
const BLOCKED_GLYPH: char = '#';

/// Complete description of a game before it is set up.
///
/// Every field is optional when deserialising; missing fields fall back to
/// the classic 10x10 board with four weapons and two players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows on a generated board.
    pub rows: u32,
    /// Number of columns on a generated board.
    pub columns: u32,
    /// Chance threshold in `0..=100` used by the board generator.
    pub percentage: u32,
    /// Maximum number of steps a player may travel along one axis per turn.
    pub move_range: u32,
    /// Tunables governing placement and pickups.
    pub rules: Rules,
    /// Fixed board drawn with `.` for passable and `#` for blocked cells.
    /// When present it replaces the generated board.
    pub layout: Option<Vec<String>>,
    /// Weapons distributed across the board.
    pub weapons: Vec<WeaponSpec>,
    /// Players taking part in the game, in turn order.
    pub players: Vec<PlayerSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            percentage: DEFAULT_PERCENTAGE,
            move_range: DEFAULT_MOVE_RANGE,
            rules: Rules::default(),
            layout: None,
            weapons: vec![
                WeaponSpec::new("Pistol", "pistol", 10),
                WeaponSpec::new("Shotgun", "shotgun", 20),
                WeaponSpec::new("Machine Gun", "machinegun", 30),
                WeaponSpec::new("Sniper", "sniper", 40),
            ],
            players: vec![
                PlayerSpec::new("Player 1", "playerOne", DEFAULT_HEALTH),
                PlayerSpec::new("Player 2", "playerTwo", DEFAULT_HEALTH),
            ],
        }
    }
}

/// Rules the world applies while placing entities and resolving pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Strategy translating random flat indices into cells.
    pub index_mapping: IndexMapping,
    /// Whether a pickup is allowed on a cell shared with the other player.
    pub pickup_policy: PickupPolicy,
    /// Whole-board draws attempted before board generation gives up.
    pub max_board_attempts: u32,
    /// Random cell draws attempted before a placement gives up.
    pub max_placement_attempts: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            index_mapping: IndexMapping::default(),
            pickup_policy: PickupPolicy::default(),
            max_board_attempts: DEFAULT_MAX_BOARD_ATTEMPTS,
            max_placement_attempts: DEFAULT_MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

/// Strategy translating a flat index in `0..rows * columns` into a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexMapping {
    /// `row = index / columns`, `column = index % columns`.
    #[default]
    RowMajor,
    /// Divides `index * columns` by `rows * columns`; the integer part is the
    /// row and the decimal digits after the separator are the column. Indices
    /// with no decimal digits, or with digits beyond the board, miss.
    DecimalSplit,
}

/// Whether a player may pick up a weapon from a cell the other player stands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupPolicy {
    /// The pickup is skipped while another player shares the cell.
    #[default]
    BlockedByOccupant,
    /// The pickup always happens.
    Unconditional,
}

/// Fixed board parsed from a textual layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Number of rows in the layout.
    pub rows: u32,
    /// Number of columns in the layout.
    pub columns: u32,
    /// Row-major passability flags.
    pub passable: Vec<bool>,
}

/// Reasons a textual layout may fail to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The layout contained no cells.
    #[error("layout is empty")]
    Empty,
    /// A row differed in width from the first row.
    #[error("layout row {row} has {received} cells, expected {expected}")]
    Ragged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        received: usize,
    },
    /// A cell used a glyph other than `.` or `#`.
    #[error("layout cell ({row}, {column}) uses unknown glyph {glyph:?}")]
    UnknownGlyph {
        /// Zero-based row of the cell.
        row: usize,
        /// Zero-based column of the cell.
        column: usize,
        /// Glyph found in the layout.
        glyph: char,
    },
    /// The layout does not fit the coordinate range.
    #[error("layout dimensions exceed the supported range")]
    TooLarge,
}

/// Parses rows of `.` (passable) and `#` (blocked) into a [`Layout`].
///
/// Surrounding whitespace on each row is ignored.
pub fn parse_layout<S: AsRef<str>>(lines: &[S]) -> Result<Layout, LayoutError> {
    let mut passable = Vec::new();
    let mut width: Option<usize> = None;

    for (row, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        let received = line.chars().count();
        match width {
            None => width = Some(received),
            Some(expected) if expected != received => {
                return Err(LayoutError::Ragged {
                    row,
                    expected,
                    received,
                });
            }
            Some(_) => {}
        }

        for (column, glyph) in line.chars().enumerate() {
            match glyph {
                PASSABLE_GLYPH => passable.push(true),
                BLOCKED_GLYPH => passable.push(false),
                glyph => {
                    return Err(LayoutError::UnknownGlyph { row, column, glyph });
                }
            }
        }
    }

    let columns = width.unwrap_or(0);
    if columns == 0 {
        return Err(LayoutError::Empty);
    }

    Ok(Layout {
        rows: u32::try_from(lines.len()).map_err(|_| LayoutError::TooLarge)?,
        columns: u32::try_from(columns).map_err(|_| LayoutError::TooLarge)?,
        passable,
    })
}
