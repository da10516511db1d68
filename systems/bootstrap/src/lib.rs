#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a Tic Tac Chase Toe game.

use chase_toe_core::{parse_layout, Command, GameConfig, LayoutError};
use chase_toe_world::{query, World};
use log::debug;

/// Produces data required to greet the players and set up the board.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Translates a configuration into the ordered setup command batch.
    ///
    /// The batch installs the board (the fixed layout when one is configured,
    /// a generated board otherwise), places every weapon, then every player,
    /// and finally starts the game.
    pub fn setup_commands(&self, config: &GameConfig) -> Result<Vec<Command>, LayoutError> {
        let board = match &config.layout {
            Some(lines) => {
                let layout = parse_layout(lines)?;
                debug!(
                    "[Bootstrap] loading fixed {}x{} layout",
                    layout.rows, layout.columns
                );
                Command::LoadBoard {
                    rows: layout.rows,
                    columns: layout.columns,
                    passable: layout.passable,
                }
            }
            None => Command::GenerateBoard {
                rows: config.rows,
                columns: config.columns,
                percentage: config.percentage,
            },
        };

        let mut commands = Vec::with_capacity(config.weapons.len() + config.players.len() + 2);
        commands.push(board);
        commands.extend(
            config
                .weapons
                .iter()
                .cloned()
                .map(|weapon| Command::PlaceWeapon { weapon }),
        );
        commands.extend(
            config
                .players
                .iter()
                .cloned()
                .map(|player| Command::PlacePlayer { player }),
        );
        commands.push(Command::StartGame);
        Ok(commands)
    }
}
