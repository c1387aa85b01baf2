use std::fmt;

use crate::core::{Board, Piece};

/// Everything the planner knows about one moment of the game.
///
/// The current piece is the one the next action moves; `next_pieces` is the engine's
/// lookahead queue. States are immutable: each placement produces a new state through
/// [`successor`](Self::successor).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TetrisState {
    board: Board,
    piece: Piece,
    next_pieces: Vec<Piece>,
}

impl TetrisState {
    #[must_use]
    pub fn new(board: Board, piece: Piece, next_pieces: Vec<Piece>) -> Self {
        Self {
            board,
            piece,
            next_pieces,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    #[must_use]
    pub fn next_pieces(&self) -> &[Piece] {
        &self.next_pieces
    }

    /// State after the current piece settled into `board`.
    ///
    /// The first lookahead piece becomes current; once the queue is exhausted the
    /// current piece is the wildcard.
    ///
    /// ```
    /// use stackplan_engine::{Board, Cell, Dimensions, Piece, TetrisState};
    ///
    /// let dims = Dimensions::new(10, 20).unwrap();
    /// let bar = Piece::from_cells(&[Cell::new(1, 0), Cell::new(2, 0)]);
    /// let state = TetrisState::new(Board::empty(dims), bar.clone(), vec![bar.clone()]);
    ///
    /// let next = state.successor(Board::empty(dims));
    /// assert_eq!(next.piece(), &bar);
    /// assert!(next.next_pieces().is_empty());
    /// assert!(next.successor(Board::empty(dims)).piece().is_wildcard());
    /// ```
    #[must_use]
    pub fn successor(&self, board: Board) -> Self {
        let (piece, next_pieces) = match self.next_pieces.split_first() {
            Some((first, rest)) => (first.clone(), rest.to_vec()),
            None => (Piece::wildcard(), Vec::new()),
        };
        Self {
            board,
            piece,
            next_pieces,
        }
    }
}

impl fmt::Display for TetrisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "piece:")?;
        writeln!(f, "{}", self.piece)?;
        writeln!(f, "lookahead: {}", self.next_pieces.len())?;
        write!(f, "{}", self.board)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Cell, Dimensions};

    use super::*;

    #[test]
    fn test_successor_shifts_lookahead() {
        let dims = Dimensions::new(10, 20).unwrap();
        let a = Piece::from_cells(&[Cell::new(1, 0)]);
        let b = Piece::from_cells(&[Cell::new(1, 0), Cell::new(2, 0)]);
        let c = Piece::from_cells(&[Cell::new(1, 0), Cell::new(1, 1)]);
        let state = TetrisState::new(Board::empty(dims), a, vec![b.clone(), c.clone()]);

        let board = Board::from_ascii("#.......", dims);
        let next = state.successor(board.clone());
        assert_eq!(next.board(), &board);
        assert_eq!(next.piece(), &b);
        assert_eq!(next.next_pieces(), &[c]);
    }

    #[test]
    fn test_states_compare_by_value() {
        let dims = Dimensions::new(10, 20).unwrap();
        let piece = Piece::from_cells(&[Cell::new(3, 0)]);
        let a = TetrisState::new(Board::from_ascii("##......", dims), piece.clone(), vec![]);
        let b = TetrisState::new(
            Board::from_cells(&[Cell::new(1, 19), Cell::new(2, 19)], dims).unwrap(),
            Piece::from_cells(&[Cell::new(7, 4)]),
            vec![],
        );
        assert_eq!(a, b);
        assert_ne!(a, a.successor(a.board().clone()));
    }
}
