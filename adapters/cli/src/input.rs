//! Parsing of the lines typed at the move prompt.

use chase_toe_core::CellCoord;

/// Action requested by one line of input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    /// Leave the game.
    Quit,
    /// Move the current player onto the cell.
    Cell(CellCoord),
}

/// Parses `q`/`quit` or a `row column` pair separated by whitespace or a comma.
pub(crate) fn parse_selection(line: &str) -> Option<Selection> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Some(Selection::Quit);
    }

    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let column = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Selection::Cell(CellCoord::new(row, column)))
}
