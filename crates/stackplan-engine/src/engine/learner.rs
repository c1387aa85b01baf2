use crate::core::{Cell, Piece};

use super::{
    catalog::{MAX_ROTATIONS, Rotation, RotationCatalog, RotationEntries},
    gravity::{Observation, classify_observation},
};

/// Consecutive gravity-only observations waited out after a rotate command.
///
/// When the limit is reached on an observation where the piece did not move at all,
/// the rotation is taken to have no visible effect, which is how symmetric pieces
/// such as the square look. Reaching it while the piece is still falling aborts.
pub const MAX_GRAVITY_WAITS: usize = 3;

/// What the driver should do after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum LearnStep {
    /// A new orientation was recorded; send the next rotate command.
    Rotate,
    /// The last rotate command has not shown yet. Do not send it again; observe the
    /// next tick, since an engine that queues commands would otherwise skip an
    /// orientation.
    Wait,
    /// The rotation cycle is closed; call [`RotationLearner::finish`].
    Complete,
    /// The piece disappeared, or kept falling without showing the rotation. Nothing
    /// is learned; start again on the next sighting.
    Aborted,
}

/// Learns the rotations of one piece by watching the engine rotate it.
///
/// The learner is a pure state machine: it never talks to the engine. The driver sends
/// one rotate command per [`LearnStep::Rotate`] and passes the cells of every following
/// observation to [`observe`](Self::observe).
///
/// Learning stops when the observed pattern returns to the first one or
/// [`MAX_ROTATIONS`] orientations were recorded.
#[derive(Debug, Clone)]
pub struct RotationLearner {
    key: Piece,
    entries: RotationEntries,
    last_cells: Vec<Cell>,
    waits: usize,
    completed: bool,
}

impl RotationLearner {
    /// Starts learning from the piece's first observation.
    ///
    /// Returns `None` if no piece is visible.
    #[must_use]
    pub fn start(cells: &[Cell]) -> Option<Self> {
        let first = Rotation::from_cells(cells)?;
        let key = first.piece().clone();
        let mut entries = RotationEntries::new();
        entries.push(first);
        Some(Self {
            key,
            entries,
            last_cells: cells.to_vec(),
            waits: 0,
            completed: false,
        })
    }

    /// Pattern the entry is learned for.
    #[must_use]
    pub fn piece(&self) -> &Piece {
        &self.key
    }

    /// Orientations recorded so far, in rotation order.
    #[must_use]
    pub fn rotations(&self) -> &[Rotation] {
        &self.entries
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Feeds the cells observed on the tick after the last command or wait.
    pub fn observe(&mut self, cells: &[Cell]) -> LearnStep {
        if self.completed {
            return LearnStep::Complete;
        }
        let Some(rotation) = Rotation::from_cells(cells) else {
            return LearnStep::Aborted;
        };

        let observation = classify_observation(&self.last_cells, cells);
        self.last_cells = cells.to_vec();
        if let Observation::GravityOnly { rows_fallen } = observation {
            if self.waits < MAX_GRAVITY_WAITS {
                self.waits += 1;
                return LearnStep::Wait;
            }
            // Only a piece at rest can show that the rotation changed nothing.
            if rows_fallen > 0 || *rotation.piece() != self.key {
                log::debug!("rotation never showed after {} waits", self.waits);
                return LearnStep::Aborted;
            }
        }
        self.waits = 0;

        if *rotation.piece() == self.key {
            self.completed = true;
            return LearnStep::Complete;
        }
        self.entries.push(rotation);
        if self.entries.len() == MAX_ROTATIONS {
            self.completed = true;
            return LearnStep::Complete;
        }
        LearnStep::Rotate
    }

    /// Moves the learned entry into `catalog`.
    ///
    /// Returns `false` if the cycle did not complete or the pattern was already known.
    pub fn finish(self, catalog: &mut RotationCatalog) -> bool {
        if !self.completed {
            return false;
        }
        catalog.insert(self.key, self.entries)
    }
}
