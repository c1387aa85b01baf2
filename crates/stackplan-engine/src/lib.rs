//! Board model, rotation learning and drop simulation for the stack planner.
//!
//! - [`core`] holds the bit-packed [`Board`] and [`Piece`] values together with the
//!   [`Dimensions`] of the playfield they live in.
//! - [`engine`] holds everything that acts on those values: the observed
//!   [`RotationCatalog`], the [`RotationLearner`] that fills it, the [`fall`] and
//!   [`clear`] simulator and the [`TetrisState`] the planner searches over.
//!
//! Nothing in this crate performs I/O. Rotation learning is driven from the outside by
//! feeding observed piece cells to a [`RotationLearner`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// An observed cell lies outside the playfield.
///
/// Coordinates come from the engine snapshots; receiving one of these means the
/// snapshot and the configured [`Dimensions`] disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({x}, {y}) lies outside the {width}x{height} playfield interior")]
pub struct CellOutOfRangeError {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum DimensionsError {
    #[display("playfield width {width} leaves no interior columns between the walls")]
    TooNarrow { width: usize },
    #[display("playfield width {width} has more than 32 interior columns")]
    TooWide { width: usize },
    #[display("playfield height must be positive")]
    ZeroHeight,
}
