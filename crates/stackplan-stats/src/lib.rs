//! Small statistics helpers shared by the planner crates.
//!
//! - [`descriptive`]: mean and sample variance of a slice
//! - [`running`]: incremental averages for counters gathered while searching
//!
//! # Examples
//!
//! ```
//! use stackplan_stats::descriptive::{mean, sample_variance};
//!
//! let tops = [18.0, 19.0, 20.0];
//! assert_eq!(mean(&tops), Some(19.0));
//! assert_eq!(sample_variance(&tops), 1.0);
//! ```

pub mod descriptive;
pub mod running;
