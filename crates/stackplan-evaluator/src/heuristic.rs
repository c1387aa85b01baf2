//! Weighted board-quality score.
//!
//! The score is a weighted sum of six terms. Lower is better; every term grows as the
//! board gets worse except the cleared-lines term, which rewards boards with fewer rows
//! than the goal.
//!
//! | term             | measures                                                   |
//! |------------------|------------------------------------------------------------|
//! | holes            | empty cells under each column's top, per column, raised    |
//! | continuity       | occupied rows that differ between neighbouring columns     |
//! | cleared lines    | row count relative to the goal board                       |
//! | max height       | tallest center-weighted column, as distance from the floor |
//! | average height   | mean center-weighted column top, from the floor            |
//! | height variance  | sample variance of the center-weighted column tops         |
//!
//! # Center weighting
//!
//! Column tops are multiplied by a parabola that is `1` at the middle of the board and
//! `center_factor - 1` at both edges. A factor below `2` makes tall stacks at the edges
//! look lower than they are, which steers pieces toward the walls and keeps the center
//! open.
//!
//! Board-only terms are computed lazily, so callers that only need one of them pay for
//! that one.

use std::cell::OnceCell;

use serde::Serialize;
use stackplan_engine::Board;
use stackplan_stats::descriptive::{mean, sample_variance};

use crate::weights::HeuristicWeights;

/// Raw (unweighted) board terms, mostly for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityTerms {
    pub holes: f64,
    pub continuity: f64,
    pub max_height: f64,
    pub avg_height: f64,
    pub height_variance: f64,
}

/// Lazily evaluated board terms under one set of weights.
#[derive(Debug)]
pub struct BoardQuality<'a> {
    board: &'a Board,
    weights: &'a HeuristicWeights,
    weighted_tops: OnceCell<Vec<f64>>,
    holes: OnceCell<f64>,
    continuity: OnceCell<usize>,
}

impl<'a> BoardQuality<'a> {
    #[must_use]
    pub fn new(board: &'a Board, weights: &'a HeuristicWeights) -> Self {
        Self {
            board,
            weights,
            weighted_tops: OnceCell::new(),
            holes: OnceCell::new(),
            continuity: OnceCell::new(),
        }
    }

    fn floor(&self) -> f64 {
        f64::from(u32::try_from(self.board.dimensions().height()).unwrap_or(u32::MAX))
    }

    /// Per column, the empty cells between its top and the floor, raised to the holes
    /// exponent and summed.
    #[must_use]
    pub fn holes(&self) -> f64 {
        *self.holes.get_or_init(|| {
            let exponent = self.weights.holes_exponent();
            self.board
                .heights()
                .iter()
                .map(|column| {
                    let (floor, occupied) = column.split_first().expect("floor is always present");
                    let top = occupied.last().unwrap_or(floor);
                    let span = floor - top;
                    let filled = i32::try_from(occupied.len()).unwrap_or(i32::MAX);
                    f64::from(span - filled).powf(exponent)
                })
                .sum()
        })
    }

    /// Sum over neighbouring columns of the rows occupied in exactly one of them.
    #[must_use]
    pub fn continuity(&self) -> usize {
        *self.continuity.get_or_init(|| {
            self.board
                .heights()
                .windows(2)
                .map(|pair| symmetric_difference_len(&pair[0], &pair[1]))
                .sum()
        })
    }

    /// Column tops (absolute rows) multiplied by the center weight of their column.
    #[must_use]
    pub fn weighted_tops(&self) -> &[f64] {
        self.weighted_tops.get_or_init(|| {
            let columns = self.board.dimensions().interior_width();
            center_weights(columns, self.weights.center_factor())
                .into_iter()
                .enumerate()
                .map(|(column, weight)| f64::from(self.board.top_surface(column)) * weight)
                .collect()
        })
    }

    /// Smallest weighted top, i.e. the tallest column.
    #[must_use]
    pub fn max_height(&self) -> f64 {
        self.weighted_tops()
            .iter()
            .copied()
            .min_by(f64::total_cmp)
            .unwrap_or_else(|| self.floor())
    }

    #[must_use]
    pub fn avg_height(&self) -> f64 {
        mean(self.weighted_tops()).unwrap_or_else(|| self.floor())
    }

    #[must_use]
    pub fn height_variance(&self) -> f64 {
        sample_variance(self.weighted_tops())
    }

    #[must_use]
    pub fn terms(&self) -> QualityTerms {
        QualityTerms {
            holes: self.holes(),
            continuity: usize_as_f64(self.continuity()),
            max_height: self.max_height(),
            avg_height: self.avg_height(),
            height_variance: self.height_variance(),
        }
    }

    /// Weighted sum of every term that depends on the board alone.
    #[must_use]
    pub fn board_score(&self) -> f64 {
        let w = self.weights;
        let terms = self.terms();
        let floor = self.floor();
        terms.holes * w.holes
            + terms.continuity * w.continuity
            + (floor - terms.max_height) * w.max_height
            + (floor - terms.avg_height) * w.avg_height
            + terms.height_variance * w.height_variance
    }

    /// Full score against a goal board with `goal_rows` rows.
    #[must_use]
    pub fn score(&self, goal_rows: usize) -> f64 {
        self.board_score() + cleared_lines_score(self.board.row_count(), goal_rows, self.weights)
    }
}

/// Weighted cleared-lines term.
///
/// A surplus of rows over the goal is raised to the cleared-lines exponent; a deficit
/// (rows cleared) is squared and negated, so clearing several rows at once pays more.
#[must_use]
pub fn cleared_lines_score(rows: usize, goal_rows: usize, weights: &HeuristicWeights) -> f64 {
    let surplus = usize_as_f64(rows) - usize_as_f64(goal_rows);
    let term = if surplus > 0.0 {
        surplus.powf(weights.cleared_lines_exponent())
    } else {
        -(surplus * surplus)
    };
    term * weights.cleared_lines
}

/// Center weights for `columns` columns.
///
/// ```
/// use stackplan_evaluator::heuristic::center_weights;
///
/// assert_eq!(center_weights(3, 1.5), vec![0.5, 1.0, 0.5]);
/// assert_eq!(center_weights(1, 0.0), vec![1.0]);
/// ```
#[must_use]
pub fn center_weights(columns: usize, center_factor: f64) -> Vec<f64> {
    if columns < 2 {
        return vec![1.0; columns];
    }
    let center = usize_as_f64(columns - 1) / 2.0;
    (0..columns)
        .map(|x| {
            let offset = (usize_as_f64(x) - center) / center;
            1.0 - (2.0 - center_factor) * offset * offset
        })
        .collect()
}

/// Size of the symmetric difference of two descending, duplicate-free lists.
fn symmetric_difference_len(a: &[i32], b: &[i32]) -> usize {
    let (mut i, mut j, mut len) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Equal => {
                i += 1;
                j += 1;
            }
            std::cmp::Ordering::Greater => {
                len += 1;
                i += 1;
            }
            std::cmp::Ordering::Less => {
                len += 1;
                j += 1;
            }
        }
    }
    len + (a.len() - i) + (b.len() - j)
}

#[expect(clippy::cast_precision_loss)]
fn usize_as_f64(value: usize) -> f64 {
    value as f64
}

#[cfg(test)]
mod tests {
    use stackplan_engine::Dimensions;

    use super::*;
    use crate::weights::SCALE_ONE;

    fn dims() -> Dimensions {
        Dimensions::new(6, 10).unwrap()
    }

    // #...
    // .#..
    // ##.#
    fn sample_board() -> Board {
        Board::from_ascii(
            r"
            #...
            .#..
            ##.#
            ",
            dims(),
        )
    }

    /// Flat center weighting, linear exponents, every weight zero.
    fn neutral() -> HeuristicWeights {
        HeuristicWeights {
            holes: 0.0,
            max_height: 0.0,
            avg_height: 0.0,
            height_variance: 0.0,
            cleared_lines: 0.0,
            continuity: 0.0,
            center_scale: 2.0 * SCALE_ONE,
            holes_scale: SCALE_ONE,
            cleared_lines_scale: SCALE_ONE,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_sample_board_terms() {
        let board = sample_board();
        let weights = neutral();
        let quality = BoardQuality::new(&board, &weights);
        assert!(close(quality.holes(), 1.0));
        assert_eq!(quality.continuity(), 5);
        assert_eq!(quality.weighted_tops(), &[7.0, 8.0, 10.0, 9.0]);
        assert!(close(quality.max_height(), 7.0));
        assert!(close(quality.avg_height(), 8.5));
        assert!(close(quality.height_variance(), 5.0 / 3.0));
    }

    #[test]
    fn test_holes_exponent_applies_per_column() {
        let board = Board::from_ascii(
            r"
            #.#.
            .#..
            #...
            ",
            dims(),
        );
        let weights = HeuristicWeights {
            holes_scale: 2.0 * SCALE_ONE,
            ..neutral()
        };
        // columns 0 and 1 have one hole each, column 2 has two
        assert!(close(BoardQuality::new(&board, &weights).holes(), 1.0 + 1.0 + 4.0));
    }

    #[test]
    fn test_weighted_score() {
        let board = sample_board();
        let weights = HeuristicWeights {
            holes: 2.0,
            continuity: 3.0,
            max_height: 5.0,
            avg_height: 7.0,
            height_variance: 3.0,
            ..neutral()
        };
        let quality = BoardQuality::new(&board, &weights);
        let expected = 2.0 * 1.0 + 3.0 * 5.0 + 5.0 * (10.0 - 7.0) + 7.0 * (10.0 - 8.5) + 5.0;
        assert!(close(quality.board_score(), expected));
    }

    #[test]
    fn test_empty_board_has_no_holes_or_gaps() {
        let board = Board::empty(dims());
        let weights = HeuristicWeights::default();
        let quality = BoardQuality::new(&board, &weights);
        assert!(close(quality.holes(), 0.0));
        assert_eq!(quality.continuity(), 0);
    }

    #[test]
    fn test_cleared_lines_rewards_fewer_rows() {
        let weights = HeuristicWeights {
            cleared_lines: 1.0,
            cleared_lines_scale: 2.0 * SCALE_ONE,
            ..neutral()
        };
        assert!(close(cleared_lines_score(5, 3, &weights), 4.0));
        assert!(close(cleared_lines_score(3, 3, &weights), 0.0));
        assert!(close(cleared_lines_score(1, 3, &weights), -4.0));
    }

    #[test]
    fn test_center_weights_peak_in_middle() {
        let weights = center_weights(8, 13238.0 / SCALE_ONE);
        assert_eq!(weights.len(), 8);
        assert!(weights[3] > weights[0]);
        assert!(close(weights[0], weights[7]));
        assert!(close(weights[0], 13238.0 / SCALE_ONE - 1.0));
    }

    #[test]
    fn test_symmetric_difference() {
        assert_eq!(symmetric_difference_len(&[10, 9, 7], &[10, 9, 8]), 2);
        assert_eq!(symmetric_difference_len(&[10], &[10, 9, 8]), 2);
        assert_eq!(symmetric_difference_len(&[], &[]), 0);
    }
}
