use chase_toe_core::{
    CellCoord, Command, Event, GenerationError, MoveError, PlacementError, PlayerId, PlayerSpec,
    StartError, Visibility, WeaponId, WeaponSpec,
};
use chase_toe_world::{self as world, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events);
    events
}

fn corridor(columns: u32) -> World {
    let mut world = World::new(42);
    let events = run(
        &mut world,
        Command::LoadBoard {
            rows: 1,
            columns,
            passable: vec![true; columns as usize],
        },
    );
    assert!(matches!(events[0], Event::BoardGenerated { .. }));
    world
}

fn place_weapon(world: &mut World, name: &str, damage: u32, column: u32) -> WeaponId {
    let events = run(
        world,
        Command::PlaceWeapon {
            weapon: WeaponSpec::new(name, name.to_lowercase(), damage).at(CellCoord::new(0, column)),
        },
    );
    match events.as_slice() {
        [Event::WeaponPlaced { weapon, .. }] => *weapon,
        other => panic!("unexpected events {other:?}"),
    }
}

fn place_player(world: &mut World, name: &str, column: u32) -> PlayerId {
    let events = run(
        world,
        Command::PlacePlayer {
            player: PlayerSpec::new(name, "player", 100).at(CellCoord::new(0, column)),
        },
    );
    match events.as_slice() {
        [Event::PlayerPlaced { player, .. }] => *player,
        other => panic!("unexpected events {other:?}"),
    }
}

fn step(world: &mut World, player: PlayerId, column: u32) -> Vec<Event> {
    let to = CellCoord::new(0, column);
    let _ = run(
        world,
        Command::MarkValidMoves {
            player,
            cells: vec![to],
        },
    );
    run(world, Command::MovePlayer { player, to })
}

#[test]
fn generated_board_reports_dimensions_and_quota() {
    let mut world = World::new(9);
    let events = run(
        &mut world,
        Command::GenerateBoard {
            rows: 10,
            columns: 10,
            percentage: 90,
        },
    );

    match events.as_slice() {
        [Event::BoardGenerated {
            rows,
            columns,
            blocked,
            attempts,
        }] => {
            assert_eq!((*rows, *columns), (10, 10));
            assert!(*blocked >= 10);
            assert!(*attempts >= 1);
        }
        other => panic!("unexpected events {other:?}"),
    }

    let view = query::board_view(&world).expect("board installed");
    assert_eq!(view.dimensions(), (10, 10));
    assert!(view.blocked_count() >= 10);
    assert_eq!(query::welcome_banner(&world), "Welcome to Tic Tac Chase Toe.");
}

#[test]
fn invalid_percentage_is_rejected() {
    let mut world = World::new(9);
    let events = run(
        &mut world,
        Command::GenerateBoard {
            rows: 10,
            columns: 10,
            percentage: 150,
        },
    );

    assert_eq!(
        events,
        vec![Event::BoardRejected {
            reason: GenerationError::InvalidPercentage { percentage: 150 },
        }]
    );
    assert!(query::board_view(&world).is_none());
}

#[test]
fn random_placements_never_overlap() {
    let mut world = World::new(5);
    let _ = run(
        &mut world,
        Command::GenerateBoard {
            rows: 10,
            columns: 10,
            percentage: 90,
        },
    );
    for damage in [10, 20, 30, 40] {
        let events = run(
            &mut world,
            Command::PlaceWeapon {
                weapon: WeaponSpec::new("Gun", "gun", damage),
            },
        );
        assert!(matches!(events[0], Event::WeaponPlaced { .. }));
    }
    for name in ["Player 1", "Player 2"] {
        let events = run(
            &mut world,
            Command::PlacePlayer {
                player: PlayerSpec::new(name, "player", 100),
            },
        );
        assert!(matches!(events[0], Event::PlayerPlaced { .. }));
    }

    let view = query::board_view(&world).expect("board");
    let mut cells: Vec<CellCoord> = query::weapons(&world)
        .iter()
        .map(|weapon| weapon.cell)
        .chain(query::players(&world).iter().map(|player| player.cell))
        .collect();
    assert!(cells.iter().all(|cell| view.is_passable(*cell)));
    cells.sort_unstable();
    cells.dedup();
    assert_eq!(cells.len(), 6);
    assert!(cells.iter().all(|cell| query::is_box_in_use(&world, *cell)));
}

#[test]
fn placement_requires_a_board_and_free_cell() {
    let mut world = World::new(1);
    let events = run(
        &mut world,
        Command::PlaceWeapon {
            weapon: WeaponSpec::new("Pistol", "pistol", 10),
        },
    );
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            reason: PlacementError::NoBoard,
        }]
    );

    let mut world = corridor(2);
    let _ = place_weapon(&mut world, "Pistol", 10, 0);
    let events = run(
        &mut world,
        Command::PlacePlayer {
            player: PlayerSpec::new("P", "player", 100).at(CellCoord::new(0, 0)),
        },
    );
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            reason: PlacementError::Occupied {
                cell: CellCoord::new(0, 0)
            },
        }]
    );

    let _ = place_player(&mut world, "P", 1);
    let events = run(
        &mut world,
        Command::PlaceWeapon {
            weapon: WeaponSpec::new("Shotgun", "shotgun", 20),
        },
    );
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            reason: PlacementError::NoFreeCell,
        }]
    );
}

#[test]
fn roster_holds_two_players() {
    let mut world = corridor(4);
    let _ = place_player(&mut world, "One", 0);
    let _ = place_player(&mut world, "Two", 1);

    let events = run(
        &mut world,
        Command::PlacePlayer {
            player: PlayerSpec::new("Three", "player", 100),
        },
    );
    assert_eq!(
        events,
        vec![Event::PlacementRejected {
            reason: PlacementError::RosterFull { capacity: 2 },
        }]
    );
}

#[test]
fn start_requires_board_and_both_players() {
    let mut world = World::new(1);
    assert_eq!(
        run(&mut world, Command::StartGame),
        vec![Event::GameStartRejected {
            reason: StartError::NoBoard,
        }]
    );

    let mut world = corridor(4);
    let _ = place_player(&mut world, "One", 0);
    assert_eq!(
        run(&mut world, Command::StartGame),
        vec![Event::GameStartRejected {
            reason: StartError::MissingPlayers { placed: 1 },
        }]
    );

    let second = place_player(&mut world, "Two", 3);
    let events = run(&mut world, Command::StartGame);
    assert_eq!(
        events,
        vec![Event::TurnStarted {
            player: PlayerId::new(0),
            cell: CellCoord::new(0, 0),
        }]
    );
    assert!(query::game_started(&world));
    assert_eq!(query::current_player(&world), Some(PlayerId::new(0)));
    assert_ne!(query::current_player(&world), Some(second));

    assert_eq!(
        run(&mut world, Command::StartGame),
        vec![Event::GameStartRejected {
            reason: StartError::AlreadyStarted,
        }]
    );
}

#[test]
fn moves_are_validated_before_applying() {
    let mut world = corridor(5);
    let first = place_player(&mut world, "One", 0);
    let second = place_player(&mut world, "Two", 4);

    let events = run(
        &mut world,
        Command::MovePlayer {
            player: first,
            to: CellCoord::new(0, 1),
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            player: first,
            to: CellCoord::new(0, 1),
            reason: MoveError::GameNotStarted,
        }]
    );

    let _ = run(&mut world, Command::StartGame);
    let events = run(
        &mut world,
        Command::MovePlayer {
            player: second,
            to: CellCoord::new(0, 3),
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            player: second,
            to: CellCoord::new(0, 3),
            reason: MoveError::NotCurrentPlayer { player: second },
        }]
    );

    let _ = run(
        &mut world,
        Command::MarkValidMoves {
            player: first,
            cells: vec![CellCoord::new(0, 1)],
        },
    );
    let events = run(
        &mut world,
        Command::MovePlayer {
            player: first,
            to: CellCoord::new(0, 2),
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            player: first,
            to: CellCoord::new(0, 2),
            reason: MoveError::InvalidTarget {
                cell: CellCoord::new(0, 2)
            },
        }]
    );
    assert_eq!(
        query::player(&world, first).map(|player| player.cell),
        Some(CellCoord::new(0, 0))
    );
    assert!(query::is_valid_move(&world, CellCoord::new(0, 1)));
}

#[test]
fn turns_alternate_after_each_move() {
    let mut world = corridor(6);
    let first = place_player(&mut world, "One", 0);
    let second = place_player(&mut world, "Two", 5);
    let _ = run(&mut world, Command::StartGame);

    let events = step(&mut world, first, 1);
    assert_eq!(
        events,
        vec![
            Event::PlayerMoved {
                player: first,
                from: CellCoord::new(0, 0),
                to: CellCoord::new(0, 1),
            },
            Event::TurnStarted {
                player: second,
                cell: CellCoord::new(0, 5),
            },
        ]
    );
    assert!(query::valid_moves(&world).is_empty());

    let _ = step(&mut world, second, 4);
    assert_eq!(query::current_player(&world), Some(first));
}

#[test]
fn swapping_hides_the_old_weapon_until_the_holder_moves_again() {
    let mut world = corridor(6);
    let pistol = place_weapon(&mut world, "Pistol", 10, 1);
    let shotgun = place_weapon(&mut world, "Shotgun", 20, 2);
    let first = place_player(&mut world, "One", 0);
    let second = place_player(&mut world, "Two", 5);
    let _ = run(&mut world, Command::StartGame);

    let events = step(&mut world, first, 1);
    assert!(events.contains(&Event::WeaponPickedUp {
        player: first,
        weapon: pistol,
        cell: CellCoord::new(0, 1),
    }));
    assert_eq!(query::holder_of(&world, pistol), Some(first));

    let _ = step(&mut world, second, 4);

    let events = step(&mut world, first, 2);
    assert!(events.contains(&Event::WeaponPickedUp {
        player: first,
        weapon: shotgun,
        cell: CellCoord::new(0, 2),
    }));
    assert!(events.contains(&Event::WeaponDropped {
        player: first,
        weapon: pistol,
        cell: CellCoord::new(0, 2),
    }));
    assert_eq!(query::weapon_of(&world, first), Some(shotgun));
    assert_eq!(query::holder_of(&world, pistol), None);
    assert_eq!(query::pending_drop(&world, first), Some(pistol));
    assert!(query::is_hidden(&world, pistol));

    let dropped = query::weapon(&world, pistol).expect("pistol");
    assert_eq!(dropped.cell, CellCoord::new(0, 2));
    assert_eq!(dropped.visibility, Visibility::Hidden);

    let _ = step(&mut world, second, 3);

    let events = step(&mut world, first, 1);
    assert_eq!(
        events[0],
        Event::WeaponRevealed {
            weapon: pistol,
            cell: CellCoord::new(0, 2),
        }
    );
    assert!(!query::is_hidden(&world, pistol));
    assert_eq!(query::pending_drop(&world, first), None);
    assert_eq!(query::weapon_of(&world, first), Some(shotgun));
}

#[test]
fn combat_freezes_movement_once_both_players_are_armed() {
    let mut world = corridor(6);
    let pistol = place_weapon(&mut world, "Pistol", 10, 1);
    let sniper = place_weapon(&mut world, "Sniper", 40, 4);
    let first = place_player(&mut world, "One", 0);
    let second = place_player(&mut world, "Two", 5);
    let _ = run(&mut world, Command::StartGame);

    let _ = step(&mut world, first, 1);
    let events = step(&mut world, second, 4);
    assert_eq!(events.last(), Some(&Event::CombatEngaged));
    assert!(query::combat_engaged(&world));
    assert_eq!(query::current_player(&world), Some(second));

    let events = run(
        &mut world,
        Command::MovePlayer {
            player: first,
            to: CellCoord::new(0, 2),
        },
    );
    assert_eq!(
        events,
        vec![Event::MoveRejected {
            player: first,
            to: CellCoord::new(0, 2),
            reason: MoveError::CombatEngaged,
        }]
    );

    let boards = query::dashboards(&world);
    assert_eq!(boards.len(), 2);
    assert!(boards.iter().all(|board| board.fight));
    assert_eq!(boards[0].weapon_name.as_deref(), Some("Pistol"));
    assert_eq!(boards[1].weapon_damage, 40);
    assert!(boards[1].current);
    assert_eq!(query::weapon_of(&world, second), Some(sniper));
    assert_eq!(query::holder_of(&world, pistol), Some(first));
}

#[test]
fn game_is_never_over_while_health_is_untouched() {
    let mut world = corridor(4);
    let _ = place_player(&mut world, "One", 0);
    let _ = place_player(&mut world, "Two", 3);
    let _ = run(&mut world, Command::StartGame);

    assert!(!query::game_over(&world));
    assert_eq!(query::winner(&world), None);
    assert!(query::players(&world)
        .iter()
        .all(|player| player.health == 100));
}

#[test]
fn player_without_health_loses_the_game() {
    let mut world = corridor(4);
    let _ = run(
        &mut world,
        Command::PlacePlayer {
            player: PlayerSpec::new("A", "a", 0).at(CellCoord::new(0, 0)),
        },
    );
    let survivor = place_player(&mut world, "B", 3);

    assert!(query::game_over(&world));
    assert_eq!(query::winner(&world), Some(survivor));
    assert_eq!(survivor, PlayerId::new(1));
}

#[test]
fn third_pickup_reveals_the_earlier_drop_before_moving() {
    let mut world = corridor(8);
    let pistol = place_weapon(&mut world, "Pistol", 10, 1);
    let shotgun = place_weapon(&mut world, "Shotgun", 20, 2);
    let sniper = place_weapon(&mut world, "Sniper", 40, 3);
    let first = place_player(&mut world, "One", 0);
    let second = place_player(&mut world, "Two", 7);
    let _ = run(&mut world, Command::StartGame);

    let _ = step(&mut world, first, 1);
    let _ = step(&mut world, second, 6);
    let _ = step(&mut world, first, 2);
    let _ = step(&mut world, second, 5);
    let events = step(&mut world, first, 3);

    assert_eq!(
        events[..4],
        [
            Event::WeaponRevealed {
                weapon: pistol,
                cell: CellCoord::new(0, 2),
            },
            Event::PlayerMoved {
                player: first,
                from: CellCoord::new(0, 2),
                to: CellCoord::new(0, 3),
            },
            Event::WeaponPickedUp {
                player: first,
                weapon: sniper,
                cell: CellCoord::new(0, 3),
            },
            Event::WeaponDropped {
                player: first,
                weapon: shotgun,
                cell: CellCoord::new(0, 3),
            },
        ]
    );
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::WeaponRevealed { .. }))
            .count(),
        1
    );
    assert_eq!(query::pending_drop(&world, first), Some(shotgun));
    assert!(!query::is_hidden(&world, pistol));
}
