//! Drop simulation: resting a piece on the stack and clearing full rows.
//!
//! Both operations are pure functions of their inputs, which is what lets the planner
//! memoize them freely.

use crate::core::Board;

use super::catalog::Rotation;

/// Result of removing full rows from a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub board: Board,
    pub cleared: usize,
}

/// Drops `rotation` onto `board`, shifted `translation` columns from its spawn column.
///
/// The piece falls straight down until one of its columns would enter the stack, then
/// its rows are merged into the board. The stack grows upward when the piece rests
/// above the current top row. Full rows are left in place; see [`clear`].
///
/// The stack is not capped at the board height. A piece landing on a full-height stack
/// yields more rows than [`Dimensions::height`](crate::core::Dimensions::height) and a
/// negative [`Board::top_surface`]. Such boards are valid results; rating them is left
/// to the heuristics.
///
/// # Panics
///
/// Panics if the translated piece does not fit between the walls or the rotation holds
/// the wildcard piece. Callers enumerate translations with [`Rotation::translations`].
///
/// # Example
///
/// ```
/// use stackplan_engine::{Board, Cell, Dimensions, Rotation, fall};
///
/// let dims = Dimensions::new(10, 20).unwrap();
/// let square = Rotation::from_cells(&[
///     Cell::new(4, 0), Cell::new(5, 0), Cell::new(4, 1), Cell::new(5, 1),
/// ]).unwrap();
///
/// let board = fall(&Board::empty(dims), &square, -3);
/// assert_eq!(board.rows(), &[0b1100_0000, 0b1100_0000]);
/// ```
#[must_use]
pub fn fall(board: &Board, rotation: &Rotation, translation: isize) -> Board {
    let dims = board.dimensions();
    let piece = rotation.piece();
    let width = piece.width();
    let interior = dims.interior_width();

    let left = rotation
        .offset()
        .x
        .checked_add_signed(translation)
        .filter(|&left| left >= crate::core::WALL_WIDTH && left + width <= interior + 1)
        .unwrap_or_else(|| {
            panic!(
                "translation {translation} moves a {width}-wide piece from column {} outside \
                 the {interior}-column interior",
                rotation.offset().x
            )
        });
    let first_column = left - crate::core::WALL_WIDTH;

    // Row (absolute) at which the piece's top row comes to rest, plus one.
    let rest = (0..width)
        .filter_map(|column| {
            let bottom = piece.bottom(column)?;
            Some(board.top_surface(first_column + column) - bottom)
        })
        .min()
        .expect("pieces have at least one occupied column");

    let floor = i32::try_from(dims.height()).unwrap_or(i32::MAX);
    let piece_rows = i32::try_from(piece.row_count()).unwrap_or(i32::MAX);
    // Rows between the floor and the piece's bottom row.
    let lift = usize::try_from(floor + 1 - rest - piece_rows)
        .expect("a resting piece never sinks below the floor");
    debug_assert!(lift <= board.row_count(), "pieces rest on the stack");

    let shift = interior - width - first_column;
    let mut rows: Vec<u32> = board.rows().iter().rev().copied().collect();
    for (i, &piece_row) in piece.rows().iter().rev().enumerate() {
        let bits = piece_row << shift;
        let index = lift + i;
        if let Some(row) = rows.get_mut(index) {
            debug_assert_eq!(*row & bits, 0, "placed piece overlaps the stack");
            *row |= bits;
        } else {
            rows.push(bits);
        }
    }
    rows.reverse();
    Board::from_rows(rows, dims)
}

/// Removes every full row from `board`.
///
/// ```
/// use stackplan_engine::{Board, Dimensions, clear};
///
/// let dims = Dimensions::new(6, 20).unwrap();
/// let board = Board::from_ascii("
///     #...
///     #####
///     .##.
/// ", dims);
/// let outcome = clear(&board);
/// assert_eq!(outcome.cleared, 1);
/// assert_eq!(outcome.board.rows(), &[0b1000, 0b0110]);
/// ```
#[must_use]
pub fn clear(board: &Board) -> ClearOutcome {
    let full = board.dimensions().full_row();
    let rows: Vec<u32> = board
        .rows()
        .iter()
        .copied()
        .filter(|&row| row != full)
        .collect();
    let cleared = board.row_count() - rows.len();
    if cleared == 0 {
        return ClearOutcome {
            board: board.clone(),
            cleared,
        };
    }
    ClearOutcome {
        board: Board::from_rows(rows, board.dimensions()),
        cleared,
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Cell, Dimensions, Piece};

    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(10, 20).unwrap()
    }

    fn rotation(list: &[(usize, usize)]) -> Rotation {
        let cells: Vec<Cell> = list.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        Rotation::from_cells(&cells).unwrap()
    }

    #[test]
    fn test_square_rests_on_floor() {
        let square = rotation(&[(1, 0), (2, 0), (1, 1), (2, 1)]);
        let board = fall(&Board::empty(dims()), &square, 0);
        assert_eq!(board.rows(), &[0b1100_0000, 0b1100_0000]);
        assert_eq!(clear(&board).cleared, 0);
    }

    #[test]
    fn test_piece_lands_on_highest_column() {
        let board = Board::from_ascii(
            r"
            .#......
            ##......
            ",
            dims(),
        );
        // horizontal bar over columns 1-4
        let bar = rotation(&[(1, 0), (2, 0), (3, 0), (4, 0)]);
        let placed = fall(&board, &bar, 0);
        assert_eq!(placed.to_string(), "####....\n.#......\n##......");
    }

    #[test]
    fn test_overhang_leaves_hole() {
        let board = Board::from_ascii("#.......", dims());
        // .#
        // .#
        // ##
        let j = rotation(&[(2, 0), (2, 1), (1, 2), (2, 2)]);
        let placed = fall(&board, &j, 0);
        assert_eq!(placed.to_string(), ".#......\n.#......\n##......\n#.......");
    }

    #[test]
    fn test_piece_interlocks_with_stack() {
        let board = Board::from_ascii(
            r"
            #.......
            ##......
            ",
            dims(),
        );
        // .##
        // ##.
        let s = rotation(&[(2, 0), (3, 0), (1, 1), (2, 1)]);
        let placed = fall(&board, &s, 1);
        assert_eq!(placed.to_string(), "..##....\n###.....\n##......");
    }

    #[test]
    fn test_completing_row_then_clear() {
        let board = Board::from_ascii("######..", dims());
        let square = rotation(&[(4, 0), (5, 0), (4, 1), (5, 1)]);
        let placed = fall(&board, &square, 3);
        assert_eq!(placed.rows(), &[0b0000_0011, 0b1111_1111]);

        let outcome = clear(&placed);
        assert_eq!(outcome.cleared, 1);
        assert_eq!(outcome.board.rows(), &[0b0000_0011]);
        assert_eq!(clear(&outcome.board).board, outcome.board);
    }

    #[test]
    fn test_clear_without_full_rows_keeps_board() {
        let board = Board::from_ascii("#......#", dims());
        let outcome = clear(&board);
        assert_eq!(outcome.cleared, 0);
        assert_eq!(outcome.board, board);
    }

    #[test]
    fn test_stack_top_can_exceed_height() {
        let dims = Dimensions::new(4, 2).unwrap();
        let board = Board::from_ascii("#.\n#.", dims);
        let bar = Rotation::new(Piece::from_cells(&[Cell::new(1, 0), Cell::new(1, 1)]), Cell::new(1, 0));
        let placed = fall(&board, &bar, 0);
        assert_eq!(placed.row_count(), 4);
        assert_eq!(placed.top_surface(0), -2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_translation_past_wall_panics() {
        let square = rotation(&[(1, 0), (2, 0), (1, 1), (2, 1)]);
        let _ = fall(&Board::empty(dims()), &square, 7);
    }

    #[test]
    fn test_every_translation_keeps_cells() {
        let board = Board::from_ascii(
            r"
            #.......
            ##.##...
            ",
            dims(),
        );
        let t = rotation(&[(1, 0), (2, 0), (3, 0), (2, 1)]);
        for translation in t.translations(dims()) {
            let placed = fall(&board, &t, translation);
            assert_eq!(placed.cell_count(), board.cell_count() + 4);
        }
    }
}
