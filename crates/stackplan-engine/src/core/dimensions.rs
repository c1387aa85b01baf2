use serde::{Deserialize, Serialize};

use crate::{CellOutOfRangeError, DimensionsError};

/// Columns taken by the walls on each side of the playfield.
pub const WALL_WIDTH: usize = 1;

/// Size of the engine's playfield, walls included.
///
/// The engine reports a grid `width` that counts one wall column on each side, so the
/// interior where pieces can rest spans columns `1..=width - 2`. Rows are numbered from
/// the top; `height` is the row index just below the floor.
///
/// Serialized as `[width, height]`, matching the `dimensions` field of engine snapshots.
///
/// # Example
///
/// ```
/// use stackplan_engine::Dimensions;
///
/// let dims = Dimensions::new(10, 30).unwrap();
/// assert_eq!(dims.interior_width(), 8);
/// assert_eq!(dims.full_row(), 0b1111_1111);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[usize; 2]", into = "[usize; 2]")]
pub struct Dimensions {
    width: usize,
    height: usize,
}

impl Dimensions {
    pub fn new(width: usize, height: usize) -> Result<Self, DimensionsError> {
        if width <= 2 * WALL_WIDTH {
            return Err(DimensionsError::TooNarrow { width });
        }
        if width - 2 * WALL_WIDTH > 32 {
            return Err(DimensionsError::TooWide { width });
        }
        if height == 0 {
            return Err(DimensionsError::ZeroHeight);
        }
        Ok(Self { width, height })
    }

    /// Grid width including both walls.
    #[must_use]
    pub const fn width(self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height
    }

    /// Number of columns between the walls.
    #[must_use]
    pub const fn interior_width(self) -> usize {
        self.width - 2 * WALL_WIDTH
    }

    /// Bit mask of a row with every interior column occupied.
    #[must_use]
    pub fn full_row(self) -> u32 {
        let bits = u64::MAX >> (64 - self.interior_width());
        u32::try_from(bits).unwrap_or(u32::MAX)
    }

    /// Checks that `cell` lies in the interior of the playfield.
    pub fn check_cell(self, cell: Cell) -> Result<Cell, CellOutOfRangeError> {
        let in_range = (WALL_WIDTH..=self.interior_width()).contains(&cell.x) && cell.y < self.height;
        if in_range {
            Ok(cell)
        } else {
            Err(CellOutOfRangeError {
                x: cell.x,
                y: cell.y,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl TryFrom<[usize; 2]> for Dimensions {
    type Error = DimensionsError;

    fn try_from([width, height]: [usize; 2]) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<Dimensions> for [usize; 2] {
    fn from(dims: Dimensions) -> Self {
        [dims.width, dims.height]
    }
}

/// A single occupied grid cell in engine coordinates.
///
/// `x` counts columns from the left wall (the first interior column is `1`), `y` counts
/// rows from the top. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Top-left corner of the bounding box around `cells`.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn top_left(cells: &[Cell]) -> Option<Cell> {
        let x = cells.iter().map(|c| c.x).min()?;
        let y = cells.iter().map(|c| c.y).min()?;
        Some(Cell { x, y })
    }
}

impl From<[usize; 2]> for Cell {
    fn from([x, y]: [usize; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for [usize; 2] {
    fn from(cell: Cell) -> Self {
        [cell.x, cell.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert_eq!(
            Dimensions::new(2, 20),
            Err(DimensionsError::TooNarrow { width: 2 })
        );
        assert_eq!(
            Dimensions::new(35, 20),
            Err(DimensionsError::TooWide { width: 35 })
        );
        assert_eq!(Dimensions::new(10, 0), Err(DimensionsError::ZeroHeight));
        assert!(Dimensions::new(34, 20).is_ok());
    }

    #[test]
    fn test_full_row_covers_interior() {
        assert_eq!(Dimensions::new(10, 20).unwrap().full_row(), 0xff);
        assert_eq!(Dimensions::new(34, 20).unwrap().full_row(), u32::MAX);
        assert_eq!(Dimensions::new(3, 20).unwrap().full_row(), 0b1);
    }

    #[test]
    fn test_check_cell_excludes_walls_and_floor() {
        let dims = Dimensions::new(10, 20).unwrap();
        assert!(dims.check_cell(Cell::new(1, 0)).is_ok());
        assert!(dims.check_cell(Cell::new(8, 19)).is_ok());
        assert!(dims.check_cell(Cell::new(0, 5)).is_err());
        assert!(dims.check_cell(Cell::new(9, 5)).is_err());
        assert!(dims.check_cell(Cell::new(3, 20)).is_err());
    }

    #[test]
    fn test_dimensions_serialize_as_pair() {
        let dims: Dimensions = serde_json::from_str("[10, 30]").unwrap();
        assert_eq!(dims.interior_width(), 8);
        assert_eq!(serde_json::to_string(&dims).unwrap(), "[10,30]");
        assert!(serde_json::from_str::<Dimensions>("[1, 30]").is_err());
    }

    #[test]
    fn test_top_left() {
        let cells = [Cell::new(4, 2), Cell::new(3, 3), Cell::new(5, 3)];
        assert_eq!(Cell::top_left(&cells), Some(Cell::new(3, 2)));
        assert_eq!(Cell::top_left(&[]), None);
    }
}
