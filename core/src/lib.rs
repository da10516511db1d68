#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tic Tac Chase Toe engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

mod config;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{
    parse_layout, GameConfig, IndexMapping, Layout, LayoutError, PickupPolicy, Rules,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Tic Tac Chase Toe.";

/// Number of players that take part in every game.
pub const PLAYER_COUNT: usize = 2;

/// Default number of steps a player may travel along a single axis per turn.
pub const DEFAULT_MOVE_RANGE: u32 = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Generates a fresh random board, discarding every placed entity.
    GenerateBoard {
        /// Number of rows laid out in the board.
        rows: u32,
        /// Number of columns laid out in the board.
        columns: u32,
        /// Chance threshold in `0..=100`; draws at or below it become passable.
        percentage: u32,
    },
    /// Installs a fixed board, discarding every placed entity.
    LoadBoard {
        /// Number of rows laid out in the board.
        rows: u32,
        /// Number of columns laid out in the board.
        columns: u32,
        /// Row-major passability flags, `rows * columns` entries long.
        passable: Vec<bool>,
    },
    /// Registers a weapon and puts it on the board.
    PlaceWeapon {
        /// Identity and damage of the weapon.
        weapon: WeaponSpec,
    },
    /// Registers a player and puts them on the board.
    PlacePlayer {
        /// Identity and health of the player.
        player: PlayerSpec,
    },
    /// Hands the first turn to player zero once the roster is complete.
    StartGame,
    /// Replaces the set of cells the current player may select.
    MarkValidMoves {
        /// Player the move set was computed for.
        player: PlayerId,
        /// Cells reachable by the player this turn.
        cells: Vec<CellCoord>,
    },
    /// Requests that a player move to the provided cell.
    MovePlayer {
        /// Player attempting to move.
        player: PlayerId,
        /// Destination cell selected by the player.
        to: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new board was installed.
    BoardGenerated {
        /// Number of rows laid out in the board.
        rows: u32,
        /// Number of columns laid out in the board.
        columns: u32,
        /// Number of blocked cells on the board.
        blocked: u32,
        /// Number of whole-board draws needed to satisfy the quota.
        attempts: u32,
    },
    /// Reports that a board could not be produced.
    BoardRejected {
        /// Specific reason the board was rejected.
        reason: GenerationError,
    },
    /// Confirms that a weapon was put on the board.
    WeaponPlaced {
        /// Identifier assigned to the weapon.
        weapon: WeaponId,
        /// Cell the weapon occupies.
        cell: CellCoord,
    },
    /// Confirms that a player was put on the board.
    PlayerPlaced {
        /// Identifier assigned to the player.
        player: PlayerId,
        /// Cell the player occupies.
        cell: CellCoord,
    },
    /// Reports that an entity could not be placed.
    PlacementRejected {
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that the game could not be started.
    GameStartRejected {
        /// Specific reason the start was refused.
        reason: StartError,
    },
    /// Announces that a player received the turn.
    TurnStarted {
        /// Player whose turn began.
        player: PlayerId,
        /// Cell the player occupies at the start of the turn.
        cell: CellCoord,
    },
    /// Confirms that the valid move set of the current player was replaced.
    ValidMovesMarked {
        /// Player the moves belong to.
        player: PlayerId,
        /// Cells the player may select.
        cells: Vec<CellCoord>,
    },
    /// Confirms that a player moved between two cells.
    PlayerMoved {
        /// Player that moved.
        player: PlayerId,
        /// Cell occupied before the move.
        from: CellCoord,
        /// Cell occupied after the move.
        to: CellCoord,
    },
    /// Reports that a move request was ignored.
    MoveRejected {
        /// Player that issued the request.
        player: PlayerId,
        /// Destination that was requested.
        to: CellCoord,
        /// Specific reason the move was ignored.
        reason: MoveError,
    },
    /// Confirms that a player took a weapon from the board.
    WeaponPickedUp {
        /// Player now holding the weapon.
        player: PlayerId,
        /// Weapon that was picked up.
        weapon: WeaponId,
        /// Cell the weapon was lying on.
        cell: CellCoord,
    },
    /// Confirms that a player let go of a weapon, which stays hidden until the player leaves.
    WeaponDropped {
        /// Player that released the weapon.
        player: PlayerId,
        /// Weapon that was released.
        weapon: WeaponId,
        /// Cell the weapon now rests on.
        cell: CellCoord,
    },
    /// Confirms that a previously dropped weapon became visible.
    WeaponRevealed {
        /// Weapon that became visible.
        weapon: WeaponId,
        /// Cell the weapon rests on.
        cell: CellCoord,
    },
    /// Reports that a pickup was skipped because another player shares the cell.
    PickupSkipped {
        /// Player that moved onto the cell.
        player: PlayerId,
        /// Weapon left on the board.
        weapon: WeaponId,
        /// Cell shared by both players.
        cell: CellCoord,
    },
    /// Announces that both players hold a weapon and movement is frozen.
    CombatEngaged,
}

/// Cardinal movement directions available to players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order moves are explored.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Unique identifier assigned to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    /// Creates a new player identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(u32);

impl WeaponId {
    /// Creates a new weapon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single board cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Returns the neighbouring cell in `direction`, if it lies within a
    /// `rows` by `columns` board.
    #[must_use]
    pub fn step(self, direction: Direction, rows: u32, columns: u32) -> Option<CellCoord> {
        let (row, column) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.column),
            Direction::Down => (self.row.checked_add(1)?, self.column),
            Direction::Left => (self.row, self.column.checked_sub(1)?),
            Direction::Right => (self.row, self.column.checked_add(1)?),
        };
        (row < rows && column < columns).then_some(CellCoord::new(row, column))
    }
}

/// Read-only view into the passability matrix of the board.
#[derive(Clone, Copy, Debug)]
pub struct BoardView<'a> {
    cells: &'a [bool],
    rows: u32,
    columns: u32,
}

impl<'a> BoardView<'a> {
    /// Captures a new board view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [bool], rows: u32, columns: u32) -> Self {
        Self {
            cells,
            rows,
            columns,
        }
    }

    /// Reports whether the cell lies on the board.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.row() < self.rows && cell.column() < self.columns
    }

    /// Reports whether the cell can be entered. Cells off the board are never passable.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Provides the `(rows, columns)` dimensions of the board.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.rows, self.columns)
    }

    /// Iterates every cell in row-major order alongside its passability.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, bool)> + 'a {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, passable)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index / columns, index % columns), *passable)
        })
    }

    /// Number of blocked cells on the board.
    #[must_use]
    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|passable| !**passable).count()
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Whether a weapon lying on the board can currently be seen and picked up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// The weapon is fully present on its cell.
    Visible,
    /// The weapon was just dropped and waits for its former holder to leave.
    Hidden,
}

/// Identity and damage of a weapon before it is registered with the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponSpec {
    /// Display name of the weapon.
    pub name: String,
    /// Presentation tag used by front ends to pick artwork.
    pub class_tag: String,
    /// Damage dealt by the weapon.
    pub damage: u32,
    /// Fixed starting cell; a random free cell is drawn when absent.
    #[serde(default)]
    pub start: Option<CellCoord>,
}

impl WeaponSpec {
    /// Creates a weapon description without a fixed starting cell.
    #[must_use]
    pub fn new(name: impl Into<String>, class_tag: impl Into<String>, damage: u32) -> Self {
        Self {
            name: name.into(),
            class_tag: class_tag.into(),
            damage,
            start: None,
        }
    }

    /// Pins the weapon to the provided starting cell.
    #[must_use]
    pub fn at(mut self, cell: CellCoord) -> Self {
        self.start = Some(cell);
        self
    }
}

/// Identity and health of a player before it is registered with the world.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSpec {
    /// Display name of the player.
    pub name: String,
    /// Presentation tag used by front ends to pick artwork and dashboards.
    pub class_tag: String,
    /// Starting health of the player.
    pub health: u32,
    /// Fixed starting cell; a random free cell is drawn when absent.
    #[serde(default)]
    pub start: Option<CellCoord>,
}

impl PlayerSpec {
    /// Creates a player description without a fixed starting cell.
    #[must_use]
    pub fn new(name: impl Into<String>, class_tag: impl Into<String>, health: u32) -> Self {
        Self {
            name: name.into(),
            class_tag: class_tag.into(),
            health,
            start: None,
        }
    }

    /// Pins the player to the provided starting cell.
    #[must_use]
    pub fn at(mut self, cell: CellCoord) -> Self {
        self.start = Some(cell);
        self
    }
}

/// Immutable representation of a single player's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Identifier assigned to the player.
    pub id: PlayerId,
    /// Display name of the player.
    pub name: String,
    /// Presentation tag of the player.
    pub class_tag: String,
    /// Current health of the player.
    pub health: u32,
    /// Cell currently occupied by the player.
    pub cell: CellCoord,
    /// Weapon currently held by the player.
    pub weapon: Option<WeaponId>,
}

/// Immutable representation of a single weapon's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaponSnapshot {
    /// Identifier assigned to the weapon.
    pub id: WeaponId,
    /// Display name of the weapon.
    pub name: String,
    /// Presentation tag of the weapon.
    pub class_tag: String,
    /// Damage dealt by the weapon.
    pub damage: u32,
    /// Cell of the weapon; equals the holder's cell while held.
    pub cell: CellCoord,
    /// Player holding the weapon, if any.
    pub holder: Option<PlayerId>,
    /// Whether the weapon is visible on its cell. Held weapons report visible.
    pub visibility: Visibility,
}

/// Per-player summary consumed by dashboards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    /// Player described by the dashboard.
    pub player: PlayerId,
    /// Display name of the player.
    pub name: String,
    /// Presentation tag of the player.
    pub class_tag: String,
    /// Current health of the player.
    pub health: u32,
    /// Name of the held weapon, if any.
    pub weapon_name: Option<String>,
    /// Damage of the held weapon, zero when unarmed.
    pub weapon_damage: u32,
    /// Indicates whether the player owns the turn.
    pub current: bool,
    /// Indicates whether combat engaged, enabling attack and defend controls.
    pub fight: bool,
}

/// Reasons a board request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GenerationError {
    /// The chance threshold fell outside `0..=100`.
    #[error("percentage must lie within 0..=100 (received {percentage})")]
    InvalidPercentage {
        /// Threshold supplied with the request.
        percentage: u32,
    },
    /// The board would not contain a single cell.
    #[error("board dimensions must be positive (received {rows}x{columns})")]
    EmptyBoard {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// Every draw produced too few blocked cells.
    #[error("no board reached {required} blocked cells within {attempts} attempts")]
    QuotaUnreachable {
        /// Minimum number of blocked cells.
        required: u32,
        /// Number of whole-board draws performed.
        attempts: u32,
    },
    /// A fixed board did not provide one flag per cell.
    #[error("fixed board expects {expected} cells (received {received})")]
    LayoutMismatch {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of flags supplied.
        received: usize,
    },
}

/// Reasons an entity placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// No board has been installed yet.
    #[error("no board has been generated")]
    NoBoard,
    /// The game already started, so the roster is locked.
    #[error("entities cannot be placed once the game started")]
    GameInProgress,
    /// Both player slots are taken.
    #[error("the roster already holds {capacity} players")]
    RosterFull {
        /// Maximum number of players.
        capacity: u32,
    },
    /// Every passable cell is already in use.
    #[error("no passable cell is free")]
    NoFreeCell,
    /// Random draws never hit a free cell.
    #[error("no free cell found within {attempts} draws")]
    RetriesExhausted {
        /// Number of draws performed.
        attempts: u32,
    },
    /// A fixed cell is blocked or off the board.
    #[error("cell ({}, {}) is not available", .cell.row(), .cell.column())]
    Unavailable {
        /// Requested cell.
        cell: CellCoord,
    },
    /// A fixed cell already hosts another entity.
    #[error("cell ({}, {}) is already in use", .cell.row(), .cell.column())]
    Occupied {
        /// Requested cell.
        cell: CellCoord,
    },
}

/// Reasons a move request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum MoveError {
    /// The game has not started yet.
    #[error("the game has not started")]
    GameNotStarted,
    /// Another player owns the turn.
    #[error("player {} does not own the turn", .player.get())]
    NotCurrentPlayer {
        /// Player that issued the request.
        player: PlayerId,
    },
    /// Combat engaged and movement is frozen.
    #[error("movement is frozen while combat is engaged")]
    CombatEngaged,
    /// The destination is not part of the valid move set.
    #[error("cell ({}, {}) is not a valid move", .cell.row(), .cell.column())]
    InvalidTarget {
        /// Requested destination.
        cell: CellCoord,
    },
}

/// Reasons a start request may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum StartError {
    /// No board has been installed yet.
    #[error("no board has been generated")]
    NoBoard,
    /// Fewer than two players were placed.
    #[error("two players are required (placed {placed})")]
    MissingPlayers {
        /// Number of players placed so far.
        placed: u32,
    },
    /// The game already started.
    #[error("the game already started")]
    AlreadyStarted,
}
