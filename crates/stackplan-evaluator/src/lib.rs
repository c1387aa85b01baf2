//! Heuristic and transition model for planning falling-block placements.
//!
//! This crate is the problem-specific half of the planner:
//!
//! - [`weights`] - The nine tunable heuristic parameters and their defaults
//! - [`heuristic`] - Lazily computed board-quality terms and the weighted score
//! - [`domain`] - [`TetrisDomain`](domain::TetrisDomain), which implements
//!   [`stackplan_search::Domain`] on top of the engine's catalog and simulator and
//!   memoizes every step
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use stackplan_engine::{Board, CatalogSeedEntry, Cell, Dimensions, Piece, RotationCatalog, TetrisState};
//! use stackplan_evaluator::{domain::TetrisDomain, weights::HeuristicWeights};
//! use stackplan_search::BreadthCaps;
//!
//! let dims = Dimensions::new(6, 20).unwrap();
//! let square = vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(1, 1), Cell::new(2, 1)];
//! let mut catalog = RotationCatalog::new();
//! catalog.seed(&CatalogSeedEntry { rotations: vec![square.clone()] }, dims).unwrap();
//!
//! let piece = Piece::from_cells(&square);
//! let board = Board::from_ascii("##..\n##..", dims);
//! let state = TetrisState::new(board, piece.clone(), vec![piece]);
//!
//! let mut domain = TetrisDomain::new(catalog, dims, HeuristicWeights::default());
//! let outcome = domain.plan(&state, BreadthCaps::default(), Duration::from_secs(1));
//! assert!(outcome.termination.is_solution());
//! assert_eq!(outcome.plan[0].translation, 2);
//! ```

pub mod domain;
pub mod heuristic;
pub mod weights;
