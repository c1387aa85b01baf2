use std::{
    cell::OnceCell,
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use super::{
    bit_rows::{self, ColumnHeights},
    dimensions::Cell,
};

/// A falling piece, packed to its own bounding box.
///
/// A piece is identified by its bit pattern only: the same shape observed at two
/// different positions yields equal pieces. The rightmost occupied column is bit 0 of
/// every row and the width is the widest row's bit length.
///
/// The [wildcard](Piece::wildcard) piece has no rows. It stands in for pieces beyond the
/// known lookahead and never has rotations.
///
/// # Example
///
/// ```
/// use stackplan_engine::{Cell, Piece};
///
/// // T piece pointing down, observed near the right wall
/// let cells = [Cell::new(5, 1), Cell::new(6, 1), Cell::new(7, 1), Cell::new(6, 2)];
/// let piece = Piece::from_cells(&cells);
/// assert_eq!(piece.rows(), &[0b111, 0b010]);
/// assert_eq!(piece.width(), 3);
///
/// let shifted = cells.map(|c| Cell::new(c.x - 3, c.y + 4));
/// assert_eq!(Piece::from_cells(&shifted), piece);
/// ```
#[derive(Clone)]
pub struct Piece {
    inner: Rc<PieceInner>,
}

struct PieceInner {
    rows: Box<[u32]>,
    width: usize,
    heights: OnceCell<ColumnHeights>,
}

impl Piece {
    #[must_use]
    pub fn wildcard() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Packs the cells of a piece, discarding its position.
    ///
    /// An empty cell list yields the wildcard piece.
    #[must_use]
    pub fn from_cells(cells: &[Cell]) -> Self {
        let Some(right) = cells.iter().map(|c| c.x).max() else {
            return Self::wildcard();
        };
        Self::from_rows(bit_rows::pack_rows(cells, right))
    }

    pub(crate) fn from_rows(rows: Vec<u32>) -> Self {
        let width = rows
            .iter()
            .map(|row| (u32::BITS - row.leading_zeros()) as usize)
            .max()
            .unwrap_or(0);
        Self {
            inner: Rc::new(PieceInner {
                rows: rows.into_boxed_slice(),
                width,
                heights: OnceCell::new(),
            }),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.inner.rows.is_empty()
    }

    #[must_use]
    pub fn rows(&self) -> &[u32] {
        &self.inner.rows
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.inner.width
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.inner.rows.len()
    }

    #[must_use]
    pub fn cell_count(&self) -> u32 {
        self.inner.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Occupied local rows per column, lowest row (largest index) first.
    #[must_use]
    pub fn heights(&self) -> &[Vec<i32>] {
        self.inner
            .heights
            .get_or_init(|| bit_rows::column_heights(&self.inner.rows, self.inner.width, None, 0))
    }

    /// Local row of the lowest cell in `column`, `None` if the column is empty.
    #[must_use]
    pub fn bottom(&self, column: usize) -> Option<i32> {
        self.heights()[column].first().copied()
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner) || self.inner.rows == other.inner.rows
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.rows.hash(state);
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("Piece(*)");
        }
        write!(f, "Piece({:?})", self.inner.rows)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_wildcard() {
            return f.write_str("*");
        }
        bit_rows::fmt_rows(f, &self.inner.rows, self.inner.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        list.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_wildcard_from_empty_cells() {
        let piece = Piece::from_cells(&[]);
        assert!(piece.is_wildcard());
        assert_eq!(piece, Piece::wildcard());
        assert_eq!(piece.width(), 0);
        assert_eq!(piece.to_string(), "*");
    }

    #[test]
    fn test_vertical_i_piece() {
        let piece = Piece::from_cells(&cells(&[(4, 0), (4, 1), (4, 2), (4, 3)]));
        assert_eq!(piece.rows(), &[1, 1, 1, 1]);
        assert_eq!(piece.width(), 1);
        assert_eq!(piece.bottom(0), Some(3));
    }

    #[test]
    fn test_l_piece_bottoms() {
        // #.
        // #.
        // ##
        let piece = Piece::from_cells(&cells(&[(3, 5), (3, 6), (3, 7), (4, 7)]));
        assert_eq!(piece.rows(), &[0b10, 0b10, 0b11]);
        assert_eq!(piece.heights()[0], vec![2, 1, 0]);
        assert_eq!(piece.heights()[1], vec![2]);
        assert_eq!(piece.bottom(1), Some(2));
    }

    #[test]
    fn test_s_piece_bottoms_differ_per_column() {
        // .##
        // ##.
        let piece = Piece::from_cells(&cells(&[(4, 0), (5, 0), (3, 1), (4, 1)]));
        assert_eq!(piece.rows(), &[0b011, 0b110]);
        assert_eq!(piece.bottom(0), Some(1));
        assert_eq!(piece.bottom(1), Some(1));
        assert_eq!(piece.bottom(2), Some(0));
        assert_eq!(piece.to_string(), ".##\n##.");
    }

    #[test]
    fn test_identity_is_pattern_only() {
        let a = Piece::from_cells(&cells(&[(1, 1), (2, 1), (1, 2), (2, 2)]));
        let b = Piece::from_cells(&cells(&[(6, 10), (7, 10), (6, 11), (7, 11)]));
        assert_eq!(a, b);
        assert_eq!(a.cell_count(), 4);
    }
}
