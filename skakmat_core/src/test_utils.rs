//! Helpers shared by the tests in this crate.

use std::fmt::Debug;

use pretty_assertions::assert_eq;

use crate::board::{Grid, Piece, Square};

/// Asserts two collections hold the same elements, ignoring order.
pub fn assert_in_any_order<T: Eq + Ord + Debug>(
    values: impl IntoIterator<Item = T>,
    expected: impl IntoIterator<Item = T>,
) {
    let mut values = values.into_iter().collect::<Vec<_>>();
    values.sort();

    let mut expected = expected.into_iter().collect::<Vec<_>>();
    expected.sort();

    assert_eq!(values, expected);
}

/// Builds a [`Grid`] from a whitespace-trimmed diagram of FEN piece
/// characters and `.` placeholders, ranks listed 8 down to 1:
///
/// ```text
/// rnbqkbnr
/// pppppppp
/// ........
/// ...
/// ```
///
/// Panics on malformed diagrams; this is test-only code.
pub fn grid_from_diagram(diagram: &str) -> Grid {
    let mut cells = [None; 64];

    let mut squares = (0..8)
        .rev()
        .flat_map(|rank| (0..8).map(move |file| Square::new_unchecked(rank, file)));

    for c in diagram.chars() {
        if c.is_whitespace() {
            continue;
        }

        let square = squares.next().expect("diagram has more than 64 cells");
        if c != '.' {
            let piece = Piece::try_from_fen_char(c)
                .unwrap_or_else(|| panic!("bad diagram character {c:?}"));
            cells[square.index()] = Some(piece);
        }
    }

    assert!(squares.next().is_none(), "diagram has fewer than 64 cells");

    Grid::from_array(cells)
}
