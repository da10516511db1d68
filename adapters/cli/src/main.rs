#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Tic Tac Chase Toe in the terminal.

mod input;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chase_toe_core::{Event, GameConfig};
use chase_toe_rendering::{Presentation, RenderingBackend, Scene, TextBackend};
use chase_toe_system_bootstrap::Bootstrap;
use chase_toe_system_turns::{MoveOutcome, TurnController};
use chase_toe_world::{query, World};
use clap::Parser;
use log::{debug, info};

use crate::input::{parse_selection, Selection};

#[derive(Parser, Debug)]
#[command(author, version, about = "Two-player chase on a grid of cells", long_about = None)]
struct Args {
    /// TOML file describing the board, weapons and players
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of board rows
    #[arg(long)]
    rows: Option<u32>,

    /// Number of board columns
    #[arg(long)]
    columns: Option<u32>,

    /// Passability threshold used when generating the board
    #[arg(long)]
    percentage: Option<u32>,

    /// Seed for every random draw; a fresh one is picked when omitted
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the Tic Tac Chase Toe command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("[Cli] starting with seed {seed}");

    let mut controller = TurnController::new(&config, seed)
        .with_context(|| format!("failed to set up a game with seed {seed}"))?;
    println!("{}", Bootstrap.welcome_banner(controller.world()));

    let stdin = io::stdin();
    let mut backend = TextBackend::new(io::stdout());
    play(&mut controller, stdin.lock(), &mut backend)
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            toml::from_str(&source)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(columns) = args.columns {
        config.columns = columns;
    }
    if let Some(percentage) = args.percentage {
        config.percentage = percentage;
    }
    Ok(config)
}

fn play<R, B>(controller: &mut TurnController, mut input: R, backend: &mut B) -> Result<()>
where
    R: BufRead,
    B: RenderingBackend,
{
    loop {
        backend.present(&presentation(controller.world()))?;
        let events = controller.drain_events();
        report(controller.world(), &events);

        if controller.combat_engaged() {
            println!("Both players are armed. The chase is over.");
            return Ok(());
        }
        if controller.valid_moves().is_empty() {
            println!("The current player is boxed in and cannot move.");
            return Ok(());
        }

        print!("Select a cell as `row column` (q to quit): ");
        io::stdout().flush().context("failed to flush prompt")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("failed to read input")? == 0 {
            return Ok(());
        }

        match parse_selection(&line) {
            Some(Selection::Quit) => return Ok(()),
            Some(Selection::Cell(cell)) => match controller.submit_move(cell) {
                MoveOutcome::Moved { .. } => {}
                MoveOutcome::Ignored => {
                    println!("({}, {}) is not a valid move.", cell.row(), cell.column());
                }
                MoveOutcome::Frozen => return Ok(()),
            },
            None => println!("Could not read `{}`.", line.trim()),
        }
    }
}

fn presentation(world: &World) -> Presentation {
    let players = query::players(world);
    let weapons = query::weapons(world);
    let scene = query::board_view(world).map_or_else(Scene::default, |board| {
        Scene::new(
            board,
            query::valid_moves(world),
            &players,
            &weapons,
            query::dashboards(world),
        )
    });
    Presentation::new("Tic Tac Chase Toe", scene)
}

fn report(world: &World, events: &[Event]) {
    let name = |weapon| query::weapon(world, weapon).map_or_else(String::new, |w| w.name);
    for event in events {
        match event {
            Event::WeaponPickedUp { player, weapon, .. } => {
                println!("Player {} picked up the {}.", player.get() + 1, name(*weapon));
            }
            Event::WeaponDropped { player, weapon, .. } => {
                println!("Player {} dropped the {}.", player.get() + 1, name(*weapon));
            }
            Event::PickupSkipped { player, .. } => {
                println!(
                    "Player {} cannot pick up a weapon from an occupied cell.",
                    player.get() + 1
                );
            }
            other => debug!("[Cli] {other:?}"),
        }
    }
}
