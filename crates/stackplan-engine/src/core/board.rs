use std::{
    cell::OnceCell,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::CellOutOfRangeError;

use super::{
    bit_rows::{self, ColumnHeights},
    dimensions::{Cell, Dimensions},
};

/// The settled stack, packed one `u32` per non-empty row.
///
/// Rows are stored top to bottom and sit on the floor: with `n` stored rows, row `i`
/// is at absolute row `height - n + i`. Within a row the leftmost interior column is
/// the most significant bit (see [`Dimensions::full_row`]).
///
/// Boards are immutable and cheap to clone; clones share storage and the lazily
/// computed column heights. Equality and hashing only look at the rows, so two boards
/// built independently from the same cells are interchangeable.
///
/// # Example
///
/// ```
/// use stackplan_engine::{Board, Cell, Dimensions};
///
/// let dims = Dimensions::new(10, 20).unwrap();
/// let board = Board::from_cells(&[Cell::new(1, 19), Cell::new(2, 19)], dims).unwrap();
/// assert_eq!(board.rows(), &[0b1100_0000]);
/// assert_eq!(board.top_surface(0), 19);
/// assert_eq!(board.top_surface(5), 20);
/// ```
#[derive(Clone)]
pub struct Board {
    inner: Rc<BoardInner>,
}

struct BoardInner {
    rows: Box<[u32]>,
    dims: Dimensions,
    heights: OnceCell<ColumnHeights>,
}

impl Board {
    #[must_use]
    pub fn empty(dims: Dimensions) -> Self {
        Self::from_rows(Vec::new(), dims)
    }

    /// Builds a board from the occupied cells of an engine snapshot.
    ///
    /// Rows without any cell are skipped, so the result always satisfies the
    /// "non-empty rows only" invariant.
    pub fn from_cells(cells: &[Cell], dims: Dimensions) -> Result<Self, CellOutOfRangeError> {
        for &cell in cells {
            dims.check_cell(cell)?;
        }
        let rows = bit_rows::pack_rows(cells, dims.interior_width());
        Ok(Self::from_rows(rows, dims))
    }

    pub(crate) fn from_rows(rows: Vec<u32>, dims: Dimensions) -> Self {
        debug_assert!(
            rows.iter().all(|&row| row != 0 && row <= dims.full_row()),
            "rows must be non-empty and fit the interior width"
        );
        Self {
            inner: Rc::new(BoardInner {
                rows: rows.into_boxed_slice(),
                dims,
                heights: OnceCell::new(),
            }),
        }
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// `#` is an occupied cell, `.` an empty one; every line must have exactly the
    /// interior width. Rows are listed top to bottom and the last one rests on the floor.
    /// Rows without `#` are dropped.
    #[must_use]
    pub fn from_ascii(art: &str, dims: Dimensions) -> Self {
        let width = dims.interior_width();
        let mut rows = Vec::new();
        for (y, line) in art.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                width,
                "Each row must have exactly {width} cells, got {} at row {y}",
                cells.len()
            );
            let row = cells
                .iter()
                .fold(0u32, |acc, &c| (acc << 1) | u32::from(c == '#'));
            if row != 0 {
                rows.push(row);
            }
        }
        Self::from_rows(rows, dims)
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.inner.dims
    }

    #[must_use]
    pub fn rows(&self) -> &[u32] {
        &self.inner.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.inner.rows.len()
    }

    #[must_use]
    pub fn cell_count(&self) -> u32 {
        self.inner.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Occupied absolute rows per interior column, floor first.
    ///
    /// Every column starts with the floor (`height`) followed by the rows where the
    /// column holds a cell, from the bottom up. The last entry is therefore the column's
    /// top surface.
    #[must_use]
    pub fn heights(&self) -> &[Vec<i32>] {
        self.inner.heights.get_or_init(|| {
            let dims = self.inner.dims;
            let floor = i32::try_from(dims.height()).unwrap_or(i32::MAX);
            let offset = floor - i32::try_from(self.row_count()).unwrap_or(i32::MAX);
            bit_rows::column_heights(&self.inner.rows, dims.interior_width(), Some(floor), offset)
        })
    }

    /// Absolute row of the topmost cell in `column`, or the floor if the column is empty.
    #[must_use]
    pub fn top_surface(&self, column: usize) -> i32 {
        *self.heights()[column]
            .last()
            .expect("every column starts with the floor")
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || self.inner.rows == other.inner.rows
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.rows.hash(state);
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("rows", &self.inner.rows)
            .field("dims", &self.inner.dims)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        bit_rows::fmt_rows(f, &self.inner.rows, self.inner.dims.interior_width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(10, 20).unwrap()
    }

    #[test]
    fn test_from_cells_rejects_walls() {
        let err = Board::from_cells(&[Cell::new(0, 19)], dims()).unwrap_err();
        assert_eq!(err.x, 0);
        assert!(Board::from_cells(&[Cell::new(9, 19)], dims()).is_err());
    }

    #[test]
    fn test_empty_board_heights_are_floor() {
        let board = Board::empty(dims());
        assert_eq!(board.row_count(), 0);
        assert_eq!(board.heights().len(), 8);
        for column in 0..8 {
            assert_eq!(board.heights()[column], vec![20]);
            assert_eq!(board.top_surface(column), 20);
        }
    }

    #[test]
    fn test_heights_use_absolute_rows() {
        let board = Board::from_ascii(
            r"
            .#......
            ##.....#
            ",
            dims(),
        );
        assert_eq!(board.heights()[0], vec![20, 19]);
        assert_eq!(board.heights()[1], vec![20, 19, 18]);
        assert_eq!(board.heights()[2], vec![20]);
        assert_eq!(board.heights()[7], vec![20, 19]);
    }

    #[test]
    fn test_heights_keep_holes() {
        let board = Board::from_ascii(
            r"
            #.......
            #.......
            .#......
            ",
            dims(),
        );
        assert_eq!(board.heights()[0], vec![20, 18, 17]);
        assert_eq!(board.top_surface(0), 17);
        assert_eq!(board.top_surface(1), 19);
    }

    #[test]
    fn test_equality_ignores_construction_path() {
        let from_cells =
            Board::from_cells(&[Cell::new(1, 19), Cell::new(8, 19), Cell::new(1, 18)], dims())
                .unwrap();
        let from_ascii = Board::from_ascii(
            r"
            #.......
            #......#
            ",
            dims(),
        );
        assert_eq!(from_cells, from_ascii);
        assert_eq!(from_cells.cell_count(), 3);
    }

    #[test]
    fn test_display_renders_rows() {
        let board = Board::from_ascii(
            r"
            ##......
            #......#
            ",
            dims(),
        );
        assert_eq!(board.to_string(), "##......\n#......#");
    }
}
