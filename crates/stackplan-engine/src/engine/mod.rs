//! Everything that acts on boards and pieces.
//!
//! - [`RotationCatalog`] - Observed rotations per piece pattern
//! - [`RotationLearner`] - Builds one catalog entry from successive observations
//! - [`classify_observation`] - Tells a rotation apart from a gravity tick
//! - [`fall`] / [`clear`] - Drop simulation and line clearing
//! - [`TetrisState`] / [`Action`] - What the planner searches over
//! - [`Snapshot`] - The engine's per-tick state message
//!
//! # Learning Flow
//!
//! 1. A snapshot shows a piece whose pattern is not in the catalog
//! 2. The driver starts a [`RotationLearner`] with the piece's cells
//! 3. For every [`LearnStep::Rotate`] the driver sends one rotate command and feeds
//!    the next observed cells back
//! 4. On [`LearnStep::Wait`] the driver sends nothing and feeds the next observation
//! 5. On [`LearnStep::Complete`] the learner's entries go into the catalog
//!
//! ```
//! use stackplan_engine::{Cell, LearnStep, Piece, RotationCatalog, RotationLearner};
//!
//! let square = [Cell::new(4, 1), Cell::new(5, 1), Cell::new(4, 2), Cell::new(5, 2)];
//! let mut learner = RotationLearner::start(&square).unwrap();
//! let mut catalog = RotationCatalog::new();
//!
//! // The engine rotated the square and nothing visibly changed.
//! let mut step = learner.observe(&square);
//! while step == LearnStep::Wait {
//!     step = learner.observe(&square);
//! }
//! assert_eq!(step, LearnStep::Complete);
//! learner.finish(&mut catalog);
//! assert_eq!(catalog.rotations(&Piece::from_cells(&square)).unwrap().len(), 1);
//! ```

pub use self::{
    action::*, catalog::*, gravity::*, learner::*, simulator::*, snapshot::*, state::*,
};

mod action;
mod catalog;
mod gravity;
mod learner;
mod simulator;
mod snapshot;
mod state;
