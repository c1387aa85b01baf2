//! Row packing shared by [`Board`](super::Board) and [`Piece`](super::Piece).
//!
//! A row is a `u32` whose most significant used bit is the leftmost column. For a row of
//! `width` columns, column index `c` (0-based from the left) is bit `width - 1 - c`.

use std::{collections::BTreeMap, fmt};

use super::dimensions::Cell;

/// Occupied row indices per column, highest index (lowest on screen) first.
pub(crate) type ColumnHeights = Box<[Vec<i32>]>;

/// Packs `cells` into rows ordered by ascending `y`, skipping rows without cells.
///
/// Column `x` maps to bit `anchor - x`; callers pass the rightmost column they accept
/// so that every shift is non-negative.
pub(crate) fn pack_rows(cells: &[Cell], anchor: usize) -> Vec<u32> {
    let mut rows = BTreeMap::<usize, u32>::new();
    for cell in cells {
        *rows.entry(cell.y).or_default() |= 1 << (anchor - cell.x);
    }
    rows.into_values().collect()
}

#[inline]
pub(crate) fn is_occupied(row: u32, width: usize, column: usize) -> bool {
    row & (1 << (width - 1 - column)) != 0
}

pub(crate) fn occupied_columns(row: u32, width: usize) -> impl Iterator<Item = usize> {
    (0..width).filter(move |&c| is_occupied(row, width, c))
}

/// Builds the per-column height lists.
///
/// Local row `i` is reported as `i + offset`. When `floor` is given it is placed first
/// in every column, so a column without cells reports only the floor.
pub(crate) fn column_heights(
    rows: &[u32],
    width: usize,
    floor: Option<i32>,
    offset: i32,
) -> ColumnHeights {
    let mut heights = vec![Vec::from_iter(floor); width];
    for (i, &row) in rows.iter().enumerate().rev() {
        let y = i32::try_from(i).unwrap_or(i32::MAX) + offset;
        for column in occupied_columns(row, width) {
            heights[column].push(y);
        }
    }
    heights.into_boxed_slice()
}

pub(crate) fn fmt_rows(f: &mut fmt::Formatter<'_>, rows: &[u32], width: usize) -> fmt::Result {
    for (i, &row) in rows.iter().enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        for column in 0..width {
            let ch = if is_occupied(row, width, column) { '#' } else { '.' };
            write!(f, "{ch}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rows_groups_by_row() {
        let cells = [
            Cell::new(1, 19),
            Cell::new(2, 19),
            Cell::new(2, 18),
            Cell::new(8, 19),
        ];
        assert_eq!(pack_rows(&cells, 8), vec![0b0100_0000, 0b1100_0001]);
    }

    #[test]
    fn test_pack_rows_skips_missing_rows() {
        let cells = [Cell::new(1, 3), Cell::new(1, 7)];
        assert_eq!(pack_rows(&cells, 1), vec![1, 1]);
    }

    #[test]
    fn test_column_heights_with_floor() {
        let rows = [0b010, 0b111];
        let heights = column_heights(&rows, 3, Some(20), 18);
        assert_eq!(&*heights, &[vec![20, 19], vec![20, 19, 18], vec![20, 19]]);
    }

    #[test]
    fn test_column_heights_without_floor() {
        let rows = [0b10, 0b11, 0b10];
        let heights = column_heights(&rows, 2, None, 0);
        assert_eq!(&*heights, &[vec![2, 1, 0], vec![1]]);
    }
}
