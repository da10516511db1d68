#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Tic Tac Chase Toe.

mod armory;
mod board;
mod placement;

use chase_toe_core::{
    CellCoord, Command, Event, MoveError, PickupPolicy, PlacementError, PlayerId, PlayerSpec,
    Rules, StartError, WeaponSpec, PLAYER_COUNT, WELCOME_BANNER,
};
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{armory::Armory, board::Board};

/// Represents the authoritative Tic Tac Chase Toe game state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: Rules,
    rng: ChaCha8Rng,
    board: Option<Board>,
    players: Vec<PlayerState>,
    armory: Armory,
    turn: TurnState,
    valid_moves: Vec<CellCoord>,
}

impl World {
    /// Creates an empty world using the default rules.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, Rules::default())
    }

    /// Creates an empty world whose random draws derive from `seed`.
    #[must_use]
    pub fn with_rules(seed: u64, rules: Rules) -> Self {
        Self {
            banner: WELCOME_BANNER,
            rules,
            rng: ChaCha8Rng::seed_from_u64(seed),
            board: None,
            players: Vec::new(),
            armory: Armory::new(),
            turn: TurnState::Setup,
            valid_moves: Vec::new(),
        }
    }

    fn install_board(&mut self, board: Board, attempts: u32, out_events: &mut Vec<Event>) {
        let blocked = u32::try_from(board.blocked_count()).unwrap_or(u32::MAX);
        info!(
            "[World] board {}x{} installed with {blocked} blocked cells after {attempts} draw(s)",
            board.rows(),
            board.columns()
        );
        out_events.push(Event::BoardGenerated {
            rows: board.rows(),
            columns: board.columns(),
            blocked,
            attempts,
        });
        self.board = Some(board);
        self.players.clear();
        self.armory = Armory::new();
        self.turn = TurnState::Setup;
        self.valid_moves.clear();
    }

    fn occupied_cells(&self) -> Vec<CellCoord> {
        let mut cells = self.armory.board_cells();
        cells.extend(self.players.iter().map(|player| player.cell));
        cells
    }

    fn find_cell(&mut self, start: Option<CellCoord>) -> Result<CellCoord, PlacementError> {
        if self.turn != TurnState::Setup {
            return Err(PlacementError::GameInProgress);
        }
        let occupied = self.occupied_cells();
        let board = self.board.as_ref().ok_or(PlacementError::NoBoard)?;
        match start {
            Some(cell) => placement::place_at(board, cell, &occupied),
            None => placement::place_randomly(
                board,
                self.rules.index_mapping,
                &occupied,
                self.rules.max_placement_attempts,
                &mut self.rng,
            ),
        }
    }

    fn place_weapon(&mut self, spec: WeaponSpec, out_events: &mut Vec<Event>) {
        match self.find_cell(spec.start) {
            Ok(cell) => {
                debug!("[World] placing {} at {cell:?}", spec.name);
                let weapon = self.armory.register(spec, cell);
                out_events.push(Event::WeaponPlaced { weapon, cell });
            }
            Err(reason) => {
                debug!("[World] weapon {} rejected: {reason}", spec.name);
                out_events.push(Event::PlacementRejected { reason });
            }
        }
    }

    fn place_player(&mut self, spec: PlayerSpec, out_events: &mut Vec<Event>) {
        if self.players.len() >= PLAYER_COUNT {
            out_events.push(Event::PlacementRejected {
                reason: PlacementError::RosterFull {
                    capacity: u32::try_from(PLAYER_COUNT).unwrap_or(u32::MAX),
                },
            });
            return;
        }

        match self.find_cell(spec.start) {
            Ok(cell) => {
                debug!("[World] placing {} at {cell:?}", spec.name);
                let player = PlayerId::new(u32::try_from(self.players.len()).unwrap_or(u32::MAX));
                self.players.push(PlayerState {
                    id: player,
                    name: spec.name,
                    class_tag: spec.class_tag,
                    health: spec.health,
                    cell,
                });
                out_events.push(Event::PlayerPlaced { player, cell });
            }
            Err(reason) => {
                debug!("[World] player {} rejected: {reason}", spec.name);
                out_events.push(Event::PlacementRejected { reason });
            }
        }
    }

    fn start_game(&mut self, out_events: &mut Vec<Event>) {
        let refusal = if self.board.is_none() {
            Some(StartError::NoBoard)
        } else if self.turn != TurnState::Setup {
            Some(StartError::AlreadyStarted)
        } else if self.players.len() < PLAYER_COUNT {
            Some(StartError::MissingPlayers {
                placed: u32::try_from(self.players.len()).unwrap_or(u32::MAX),
            })
        } else {
            None
        };

        if let Some(reason) = refusal {
            out_events.push(Event::GameStartRejected { reason });
            return;
        }

        self.begin_turn(0, out_events);
    }

    fn begin_turn(&mut self, index: usize, out_events: &mut Vec<Event>) {
        self.turn = TurnState::Playing { current: index };
        self.valid_moves.clear();
        if let Some(player) = self.players.get(index) {
            info!("[World] turn passes to {}", player.name);
            out_events.push(Event::TurnStarted {
                player: player.id,
                cell: player.cell,
            });
        }
    }

    fn current_index(&self) -> Option<usize> {
        match self.turn {
            TurnState::Setup => None,
            TurnState::Playing { current } | TurnState::Frozen { current } => Some(current),
        }
    }

    fn mark_valid_moves(
        &mut self,
        player: PlayerId,
        cells: Vec<CellCoord>,
        out_events: &mut Vec<Event>,
    ) {
        let TurnState::Playing { current } = self.turn else {
            debug!("[World] ignoring move set for {player:?} outside of play");
            return;
        };
        let Some(state) = self.players.get(current).filter(|state| state.id == player) else {
            debug!("[World] ignoring move set for {player:?}, who does not own the turn");
            return;
        };
        let Some(board) = self.board.as_ref() else {
            return;
        };

        let origin = state.cell;
        let mut valid: Vec<CellCoord> = cells
            .into_iter()
            .filter(|cell| *cell != origin && board.is_passable(*cell))
            .collect();
        valid.sort_unstable();
        valid.dedup();

        self.valid_moves.clone_from(&valid);
        out_events.push(Event::ValidMovesMarked {
            player,
            cells: valid,
        });
    }

    fn move_player(&mut self, player: PlayerId, to: CellCoord, out_events: &mut Vec<Event>) {
        let current = match self.turn {
            TurnState::Setup => Err(MoveError::GameNotStarted),
            TurnState::Frozen { .. } => Err(MoveError::CombatEngaged),
            TurnState::Playing { current } => match self.players.get(current) {
                Some(state) if state.id != player => Err(MoveError::NotCurrentPlayer { player }),
                Some(_) if !self.valid_moves.contains(&to) => {
                    Err(MoveError::InvalidTarget { cell: to })
                }
                Some(_) => Ok(current),
                None => Err(MoveError::GameNotStarted),
            },
        };
        let current = match current {
            Ok(current) => current,
            Err(reason) => {
                debug!("[World] move of {player:?} to {to:?} ignored: {reason}");
                out_events.push(Event::MoveRejected { player, to, reason });
                return;
            }
        };

        if let Some((weapon, cell)) = self.armory.complete_drop(player) {
            out_events.push(Event::WeaponRevealed { weapon, cell });
        }

        let from = self.players[current].cell;
        self.players[current].cell = to;
        self.valid_moves.clear();
        out_events.push(Event::PlayerMoved { player, from, to });

        self.resolve_pickup(player, to, out_events);

        let all_armed = self
            .players
            .iter()
            .all(|state| self.armory.weapon_of(state.id).is_some());
        if all_armed {
            info!("[World] both players are armed, combat engaged");
            self.turn = TurnState::Frozen { current };
            out_events.push(Event::CombatEngaged);
            return;
        }

        let next = (current + 1) % self.players.len();
        self.begin_turn(next, out_events);
    }

    fn resolve_pickup(&mut self, player: PlayerId, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(weapon) = self.armory.pickable_at(cell) else {
            return;
        };

        let shared = self
            .players
            .iter()
            .any(|state| state.id != player && state.cell == cell);
        if shared && self.rules.pickup_policy == PickupPolicy::BlockedByOccupant {
            debug!("[World] {player:?} shares {cell:?}, pickup of {weapon:?} skipped");
            out_events.push(Event::PickupSkipped {
                player,
                weapon,
                cell,
            });
            return;
        }

        let Some(swap) = self.armory.pick_up(player, weapon, cell) else {
            return;
        };
        debug!("[World] {player:?} picked up {weapon:?} at {cell:?}");
        out_events.push(Event::WeaponPickedUp {
            player,
            weapon: swap.picked_up,
            cell,
        });
        if let Some(dropped) = swap.dropped {
            out_events.push(Event::WeaponDropped {
                player,
                weapon: dropped,
                cell,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GenerateBoard {
            rows,
            columns,
            percentage,
        } => match Board::generate(
            rows,
            columns,
            percentage,
            world.rules.max_board_attempts,
            &mut world.rng,
        ) {
            Ok((board, attempts)) => world.install_board(board, attempts, out_events),
            Err(reason) => {
                debug!("[World] board generation failed: {reason}");
                out_events.push(Event::BoardRejected { reason });
            }
        },
        Command::LoadBoard {
            rows,
            columns,
            passable,
        } => match Board::from_cells(rows, columns, passable) {
            Ok(board) => world.install_board(board, 1, out_events),
            Err(reason) => out_events.push(Event::BoardRejected { reason }),
        },
        Command::PlaceWeapon { weapon } => world.place_weapon(weapon, out_events),
        Command::PlacePlayer { player } => world.place_player(player, out_events),
        Command::StartGame => world.start_game(out_events),
        Command::MarkValidMoves { player, cells } => {
            world.mark_valid_moves(player, cells, out_events);
        }
        Command::MovePlayer { player, to } => world.move_player(player, to, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use chase_toe_core::{
        BoardView, CellCoord, Dashboard, PlayerId, PlayerSnapshot, Rules, Visibility, WeaponId,
        WeaponSnapshot,
    };

    use super::{placement, TurnState, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> Rules {
        world.rules
    }

    /// Exposes a read-only view of the board, if one was installed.
    #[must_use]
    pub fn board_view(world: &World) -> Option<BoardView<'_>> {
        world.board.as_ref().map(|board| board.view())
    }

    /// Reports whether a player or a weapon lying on the board occupies `cell`.
    #[must_use]
    pub fn is_box_in_use(world: &World, cell: CellCoord) -> bool {
        placement::is_box_in_use(cell, &world.occupied_cells())
    }

    /// Captures the players in turn order.
    #[must_use]
    pub fn players(world: &World) -> Vec<PlayerSnapshot> {
        world
            .players
            .iter()
            .map(|state| PlayerSnapshot {
                id: state.id,
                name: state.name.clone(),
                class_tag: state.class_tag.clone(),
                health: state.health,
                cell: state.cell,
                weapon: world.armory.weapon_of(state.id),
            })
            .collect()
    }

    /// Captures a single player.
    #[must_use]
    pub fn player(world: &World, player: PlayerId) -> Option<PlayerSnapshot> {
        players(world).into_iter().find(|state| state.id == player)
    }

    /// Captures every weapon, resolving held weapons to their holder's cell.
    #[must_use]
    pub fn weapons(world: &World) -> Vec<WeaponSnapshot> {
        world
            .armory
            .iter()
            .filter_map(|state| {
                let holder = world.armory.holder_of(state.id);
                let cell = match holder {
                    Some(holder) => world
                        .players
                        .iter()
                        .find(|player| player.id == holder)
                        .map(|player| player.cell),
                    None => state.cell,
                }?;
                Some(WeaponSnapshot {
                    id: state.id,
                    name: state.name.clone(),
                    class_tag: state.class_tag.clone(),
                    damage: state.damage,
                    cell,
                    holder,
                    visibility: state.visibility,
                })
            })
            .collect()
    }

    /// Captures a single weapon.
    #[must_use]
    pub fn weapon(world: &World, weapon: WeaponId) -> Option<WeaponSnapshot> {
        weapons(world).into_iter().find(|state| state.id == weapon)
    }

    /// Player holding the weapon, if any.
    #[must_use]
    pub fn holder_of(world: &World, weapon: WeaponId) -> Option<PlayerId> {
        world.armory.holder_of(weapon)
    }

    /// Weapon held by the player, if any.
    #[must_use]
    pub fn weapon_of(world: &World, player: PlayerId) -> Option<WeaponId> {
        world.armory.weapon_of(player)
    }

    /// Weapon the player dropped and that is still hidden, if any.
    #[must_use]
    pub fn pending_drop(world: &World, player: PlayerId) -> Option<WeaponId> {
        world.armory.pending_drop(player)
    }

    /// Reports whether the weapon lies hidden on the board.
    #[must_use]
    pub fn is_hidden(world: &World, weapon: WeaponId) -> bool {
        world
            .armory
            .weapon(weapon)
            .is_some_and(|state| state.visibility == Visibility::Hidden)
    }

    /// Player that owns the turn. Stays set once combat freezes movement.
    #[must_use]
    pub fn current_player(world: &World) -> Option<PlayerId> {
        world
            .current_index()
            .and_then(|index| world.players.get(index))
            .map(|state| state.id)
    }

    /// Cells the current player may select this turn.
    #[must_use]
    pub fn valid_moves(world: &World) -> &[CellCoord] {
        &world.valid_moves
    }

    /// Reports whether `cell` belongs to the current move set.
    #[must_use]
    pub fn is_valid_move(world: &World, cell: CellCoord) -> bool {
        world.valid_moves.contains(&cell)
    }

    /// Reports whether the game left the setup phase.
    #[must_use]
    pub fn game_started(world: &World) -> bool {
        world.turn != TurnState::Setup
    }

    /// Reports whether both players are armed and movement is frozen.
    #[must_use]
    pub fn combat_engaged(world: &World) -> bool {
        matches!(world.turn, TurnState::Frozen { .. })
    }

    /// Reports whether either player ran out of health.
    #[must_use]
    pub fn game_over(world: &World) -> bool {
        world.players.len() == super::PLAYER_COUNT
            && world.players.iter().any(|state| state.health == 0)
    }

    /// Player left standing once the game is over.
    #[must_use]
    pub fn winner(world: &World) -> Option<PlayerId> {
        if !game_over(world) {
            return None;
        }
        world
            .players
            .iter()
            .find(|state| state.health > 0)
            .map(|state| state.id)
    }

    /// Summarises a player for dashboard display.
    #[must_use]
    pub fn dashboard(world: &World, player: PlayerId) -> Option<Dashboard> {
        let state = world.players.iter().find(|state| state.id == player)?;
        let weapon = world
            .armory
            .weapon_of(player)
            .and_then(|weapon| world.armory.weapon(weapon));
        Some(Dashboard {
            player,
            name: state.name.clone(),
            class_tag: state.class_tag.clone(),
            health: state.health,
            weapon_name: weapon.map(|weapon| weapon.name.clone()),
            weapon_damage: weapon.map_or(0, |weapon| weapon.damage),
            current: current_player(world) == Some(player),
            fight: combat_engaged(world),
        })
    }

    /// Summarises every player for dashboard display.
    #[must_use]
    pub fn dashboards(world: &World) -> Vec<Dashboard> {
        world
            .players
            .iter()
            .filter_map(|state| dashboard(world, state.id))
            .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnState {
    Setup,
    Playing { current: usize },
    Frozen { current: usize },
}

#[derive(Clone, Debug)]
struct PlayerState {
    id: PlayerId,
    name: String,
    class_tag: String,
    health: u32,
    cell: CellCoord,
}
