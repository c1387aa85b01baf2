use crate::core::Cell;

/// How a piece changed between two consecutive observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Observation {
    /// Every cell kept its column and moved down by the same number of rows.
    ///
    /// No command took effect; only gravity (or nothing) happened.
    GravityOnly { rows_fallen: usize },
    /// The cells changed in a way gravity cannot explain.
    Changed,
}

/// Decides whether `next` is just `prev` pulled down by gravity.
///
/// Any uniform downward shift counts, including zero rows (no change at all) and shifts
/// of several rows in one tick.
///
/// ```
/// use stackplan_engine::{Cell, Observation, classify_observation};
///
/// let before = [Cell::new(4, 1), Cell::new(5, 1), Cell::new(6, 1), Cell::new(5, 2)];
/// let fallen = before.map(|c| Cell::new(c.x, c.y + 1));
/// assert_eq!(
///     classify_observation(&before, &fallen),
///     Observation::GravityOnly { rows_fallen: 1 }
/// );
///
/// let rotated = [Cell::new(5, 1), Cell::new(5, 2), Cell::new(5, 3), Cell::new(4, 2)];
/// assert_eq!(classify_observation(&before, &rotated), Observation::Changed);
/// ```
#[must_use]
pub fn classify_observation(prev: &[Cell], next: &[Cell]) -> Observation {
    if prev.len() != next.len() || prev.is_empty() {
        return Observation::Changed;
    }

    let mut prev = prev.to_vec();
    let mut next = next.to_vec();
    prev.sort_unstable_by_key(|c| (c.y, c.x));
    next.sort_unstable_by_key(|c| (c.y, c.x));

    let Some(rows_fallen) = next[0].y.checked_sub(prev[0].y) else {
        return Observation::Changed;
    };
    let uniform = prev
        .iter()
        .zip(&next)
        .all(|(a, b)| a.x == b.x && b.y.checked_sub(a.y) == Some(rows_fallen));
    if !uniform {
        return Observation::Changed;
    }
    if rows_fallen > 1 {
        log::debug!("piece fell {rows_fallen} rows in a single tick");
    }
    Observation::GravityOnly { rows_fallen }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        list.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    #[test]
    fn test_unchanged_cells_are_gravity_only() {
        let a = cells(&[(4, 1), (5, 1)]);
        assert_eq!(
            classify_observation(&a, &a),
            Observation::GravityOnly { rows_fallen: 0 }
        );
    }

    #[test]
    fn test_order_of_cells_does_not_matter() {
        let a = cells(&[(4, 1), (5, 1), (4, 2)]);
        let b = cells(&[(4, 4), (4, 3), (5, 3)]);
        assert_eq!(
            classify_observation(&a, &b),
            Observation::GravityOnly { rows_fallen: 2 }
        );
    }

    #[test]
    fn test_horizontal_move_is_a_change() {
        let a = cells(&[(4, 1), (5, 1)]);
        let b = cells(&[(5, 1), (6, 1)]);
        assert!(classify_observation(&a, &b).is_changed());
    }

    #[test]
    fn test_upward_move_is_a_change() {
        let a = cells(&[(4, 3), (5, 3)]);
        let b = cells(&[(4, 2), (5, 2)]);
        assert!(classify_observation(&a, &b).is_changed());
    }

    #[test]
    fn test_uneven_fall_is_a_change() {
        let a = cells(&[(4, 1), (4, 2)]);
        let b = cells(&[(4, 2), (4, 4)]);
        assert!(classify_observation(&a, &b).is_changed());
    }

    #[test]
    fn test_different_cell_counts_are_a_change() {
        let a = cells(&[(4, 1), (4, 2)]);
        let b = cells(&[(4, 2)]);
        assert!(classify_observation(&a, &b).is_changed());
        assert!(classify_observation(&[], &[]).is_changed());
    }
}
