#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Tic Tac Chase Toe adapters.

use std::io::Write;

use anyhow::Result as AnyResult;
use chase_toe_core::{
    BoardView, CellCoord, Dashboard, PlayerSnapshot, Visibility, WeaponSnapshot,
};

/// Presentation tag attached to every board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellTag {
    /// The cell cannot be entered.
    Blocked,
    /// The cell is passable but not selectable this turn.
    Empty,
    /// The current player may select the cell.
    Valid,
}

/// Entity drawn on top of a cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Marker {
    /// A player standing on the cell.
    Player {
        /// One-based seat of the player in turn order.
        seat: usize,
        /// Presentation tag of the player.
        class_tag: String,
    },
    /// A weapon lying visibly on the cell.
    Weapon {
        /// Presentation tag of the weapon.
        class_tag: String,
    },
}

/// Scene description combining tagged cells, entity markers and dashboards.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Scene {
    /// Number of rows in the grid.
    pub rows: u32,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Row-major cell tags.
    pub cells: Vec<CellTag>,
    /// Markers attached to cells. Players precede weapons on the same cell.
    pub markers: Vec<(CellCoord, Marker)>,
    /// Per-player dashboards in turn order.
    pub dashboards: Vec<Dashboard>,
}

impl Scene {
    /// Builds a scene from world snapshots.
    ///
    /// Held and hidden weapons carry no marker of their own.
    #[must_use]
    pub fn new(
        board: BoardView<'_>,
        valid_moves: &[CellCoord],
        players: &[PlayerSnapshot],
        weapons: &[WeaponSnapshot],
        dashboards: Vec<Dashboard>,
    ) -> Self {
        let (rows, columns) = board.dimensions();
        let cells = board
            .iter()
            .map(|(cell, passable)| {
                if !passable {
                    CellTag::Blocked
                } else if valid_moves.contains(&cell) {
                    CellTag::Valid
                } else {
                    CellTag::Empty
                }
            })
            .collect();

        let mut markers: Vec<(CellCoord, Marker)> = players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                (
                    player.cell,
                    Marker::Player {
                        seat: index + 1,
                        class_tag: player.class_tag.clone(),
                    },
                )
            })
            .collect();
        markers.extend(
            weapons
                .iter()
                .filter(|weapon| weapon.holder.is_none() && weapon.visibility == Visibility::Visible)
                .map(|weapon| {
                    (
                        weapon.cell,
                        Marker::Weapon {
                            class_tag: weapon.class_tag.clone(),
                        },
                    )
                }),
        );

        Self {
            rows,
            columns,
            cells,
            markers,
            dashboards,
        }
    }

    /// Tag of the provided cell, if it lies on the grid.
    #[must_use]
    pub fn tag(&self, cell: CellCoord) -> Option<CellTag> {
        if cell.row() >= self.rows || cell.column() >= self.columns {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        self.cells.get(row * width + column).copied()
    }

    /// First marker attached to the cell.
    #[must_use]
    pub fn marker(&self, cell: CellCoord) -> Option<&Marker> {
        self.markers
            .iter()
            .find(|(position, _)| *position == cell)
            .map(|(_, marker)| marker)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Title shown above the scene.
    pub title: String,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(title: T, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            title: title.into(),
            scene,
        }
    }
}

/// Rendering backend capable of presenting Tic Tac Chase Toe scenes.
pub trait RenderingBackend {
    /// Presents a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Backend that draws scenes as plain text.
///
/// Blocked cells print as `#`, empty cells as `.`, and valid moves as `*`.
/// Players print as their seat number and weapons as the first letter of
/// their class tag in upper case.
#[derive(Debug)]
pub struct TextBackend<W: Write> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing into `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Releases the underlying writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        self.writer
            .write_all(render_text(presentation).as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Formats the presentation the way [`TextBackend`] prints it.
#[must_use]
pub fn render_text(presentation: &Presentation) -> String {
    let scene = &presentation.scene;
    let mut text = format!("{}\n", presentation.title);

    text.push_str("   ");
    for column in 0..scene.columns {
        text.push_str(&format!("{:>2}", column % 100));
    }
    text.push('\n');

    for row in 0..scene.rows {
        text.push_str(&format!("{:>2} ", row % 100));
        for column in 0..scene.columns {
            let cell = CellCoord::new(row, column);
            text.push(' ');
            text.push(glyph(scene, cell));
        }
        text.push('\n');
    }

    for dashboard in &scene.dashboards {
        text.push_str(&dashboard_line(dashboard));
        text.push('\n');
    }

    if scene.dashboards.iter().any(|dashboard| dashboard.fight) {
        text.push_str("Combat engaged: attack and defend are not available yet.\n");
    }

    text
}

fn glyph(scene: &Scene, cell: CellCoord) -> char {
    match scene.marker(cell) {
        Some(Marker::Player { seat, .. }) => {
            char::from_digit(u32::try_from(*seat % 10).unwrap_or(0), 10).unwrap_or('P')
        }
        Some(Marker::Weapon { class_tag }) => class_tag
            .chars()
            .next()
            .map_or('W', |first| first.to_ascii_uppercase()),
        None => match scene.tag(cell) {
            Some(CellTag::Blocked) => '#',
            Some(CellTag::Valid) => '*',
            Some(CellTag::Empty) | None => '.',
        },
    }
}

fn dashboard_line(dashboard: &Dashboard) -> String {
    let turn = if dashboard.current { ">" } else { " " };
    let weapon = match &dashboard.weapon_name {
        Some(name) => format!("{name} ({})", dashboard.weapon_damage),
        None => "unarmed".to_owned(),
    };
    format!(
        "{turn} {} | health {} | {weapon}",
        dashboard.name, dashboard.health
    )
}
