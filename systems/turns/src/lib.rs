#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn controller that owns the game and accepts one move at a time.
//!
//! The controller wires the authoritative world to the pure movement system:
//! every event batch produced by the world is fed to the systems until they
//! stop answering with commands. Front ends only ever call
//! [`TurnController::submit_move`].

use chase_toe_core::{
    CellCoord, Command, Event, GameConfig, GenerationError, LayoutError, PlacementError, PlayerId,
    StartError,
};
use chase_toe_system_bootstrap::Bootstrap;
use chase_toe_system_movement::Movement;
use chase_toe_world::{self as world, query, World};
use log::{debug, info};
use thiserror::Error;

/// Reasons a configured game could not be set up.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The configured fixed layout could not be parsed.
    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),
    /// The board could not be generated or loaded.
    #[error("board rejected: {0}")]
    Board(#[from] GenerationError),
    /// A weapon or player could not be placed.
    #[error("placement rejected: {0}")]
    Placement(#[from] PlacementError),
    /// The game refused to start.
    #[error("game could not start: {0}")]
    Start(#[from] StartError),
}

/// Result of submitting a cell selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The current player moved.
    Moved {
        /// Player that moved.
        player: PlayerId,
        /// Cell the player left.
        from: CellCoord,
        /// Cell the player entered.
        to: CellCoord,
    },
    /// The selection was not a valid move for the current player.
    Ignored,
    /// Combat engaged earlier; the board accepts no more moves.
    Frozen,
}

/// Owns the world together with the systems that drive it between turns.
#[derive(Debug)]
pub struct TurnController {
    world: World,
    movement: Movement,
    log: Vec<Event>,
}

impl TurnController {
    /// Sets up a game from `config`, drawing every random value from `seed`.
    ///
    /// On success player one owns the turn and their move set is marked.
    pub fn new(config: &GameConfig, seed: u64) -> Result<Self, SetupError> {
        let commands = Bootstrap.setup_commands(config)?;
        let mut controller = Self {
            world: World::with_rules(seed, config.rules),
            movement: Movement::new(config.move_range),
            log: Vec::new(),
        };

        for command in commands {
            let mut events = Vec::new();
            world::apply(&mut controller.world, command, &mut events);
            if let Some(error) = setup_failure(&events) {
                return Err(error);
            }
            controller.pump(events);
        }

        info!(
            "[Turns] game ready with seed {seed}: {} weapon(s), {} player(s)",
            query::weapons(&controller.world).len(),
            query::players(&controller.world).len()
        );
        Ok(controller)
    }

    /// Moves the current player onto `cell` when it belongs to their move set.
    ///
    /// Any other selection is ignored and leaves the turn unchanged.
    pub fn submit_move(&mut self, cell: CellCoord) -> MoveOutcome {
        if query::combat_engaged(&self.world) {
            return MoveOutcome::Frozen;
        }
        let Some(player) = query::current_player(&self.world) else {
            return MoveOutcome::Ignored;
        };
        if !query::is_valid_move(&self.world, cell) {
            debug!("[Turns] selection {cell:?} is not a valid move");
            return MoveOutcome::Ignored;
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::MovePlayer { player, to: cell },
            &mut events,
        );
        let outcome = events
            .iter()
            .find_map(|event| match event {
                Event::PlayerMoved { player, from, to } => Some(MoveOutcome::Moved {
                    player: *player,
                    from: *from,
                    to: *to,
                }),
                _ => None,
            })
            .unwrap_or(MoveOutcome::Ignored);
        self.pump(events);
        outcome
    }

    /// Read-only access to the game state for queries and presentation.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Player that owns the turn.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        query::current_player(&self.world)
    }

    /// Cells the current player may select.
    #[must_use]
    pub fn valid_moves(&self) -> &[CellCoord] {
        query::valid_moves(&self.world)
    }

    /// Reports whether both players are armed and movement is frozen.
    #[must_use]
    pub fn combat_engaged(&self) -> bool {
        query::combat_engaged(&self.world)
    }

    /// Takes every event recorded since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.log)
    }

    fn pump(&mut self, pending_events: Vec<Event>) {
        let mut events = pending_events;

        loop {
            self.log.extend(events.iter().cloned());
            if events.is_empty() {
                break;
            }

            let Some(board) = query::board_view(&self.world) else {
                break;
            };
            let mut commands = Vec::new();
            self.movement.handle(&events, board, &mut commands);
            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }
}

fn setup_failure(events: &[Event]) -> Option<SetupError> {
    events.iter().find_map(|event| match event {
        Event::BoardRejected { reason } => Some(SetupError::from(*reason)),
        Event::PlacementRejected { reason } => Some(SetupError::from(*reason)),
        Event::GameStartRejected { reason } => Some(SetupError::from(*reason)),
        _ => None,
    })
}
