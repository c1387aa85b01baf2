use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    CellOutOfRangeError,
    core::{Board, Cell, Dimensions, Piece},
};

use super::state::TetrisState;

/// Engine frames a planning cycle may take before the piece drifts out of reach.
pub const PLANNING_FRAMES: f64 = 3.0;

/// One state message from the engine.
///
/// The first message of a game carries only `dimensions` (and the score); later ones
/// carry the playfield. `piece` is `null` between a lock and the next spawn.
///
/// ```
/// use stackplan_engine::{Dimensions, Snapshot};
///
/// let snapshot: Snapshot = serde_json::from_str(r#"{
///     "game": [[1, 19], [2, 19]],
///     "piece": [[4, 1], [5, 1], [4, 2], [5, 2]],
///     "next_pieces": [[[4, 1], [5, 1], [6, 1], [7, 1]]],
///     "game_speed": 10
/// }"#).unwrap();
///
/// let state = snapshot.to_state(Dimensions::new(10, 20).unwrap()).unwrap().unwrap();
/// assert_eq!(state.board().rows(), &[0b1100_0000]);
/// assert_eq!(state.next_pieces().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub game: Vec<Cell>,
    #[serde(default)]
    pub piece: Option<Vec<Cell>>,
    #[serde(default)]
    pub next_pieces: Vec<Vec<Cell>>,
    #[serde(default)]
    pub game_speed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
}

impl Snapshot {
    /// Cells of the active piece, empty when none is falling.
    #[must_use]
    pub fn piece_cells(&self) -> &[Cell] {
        self.piece.as_deref().unwrap_or_default()
    }

    /// Builds the planner state, or `None` when no piece is falling.
    ///
    /// Board and piece cells are checked against `dims`; lookahead pieces are reduced to
    /// their pattern and only need to be non-empty.
    pub fn to_state(&self, dims: Dimensions) -> Result<Option<TetrisState>, CellOutOfRangeError> {
        let board = Board::from_cells(&self.game, dims)?;
        let cells = self.piece_cells();
        if cells.is_empty() {
            return Ok(None);
        }
        for &cell in cells {
            dims.check_cell(cell)?;
        }
        let next_pieces = self
            .next_pieces
            .iter()
            .map(|cells| Piece::from_cells(cells))
            .collect();
        Ok(Some(TetrisState::new(
            board,
            Piece::from_cells(cells),
            next_pieces,
        )))
    }

    /// Row of the highest settled cell, or `None` for an empty playfield.
    #[must_use]
    pub fn stack_top(&self) -> Option<usize> {
        self.game.iter().map(|c| c.y).min()
    }

    /// Wall-clock budget for one planning cycle at this game speed.
    ///
    /// A speed of zero means the engine has not reported one yet; planning then gets
    /// one second per frame.
    #[must_use]
    pub fn planning_budget(&self) -> Duration {
        Duration::from_secs_f64(PLANNING_FRAMES / f64::from(self.game_speed.max(1)))
    }
}
