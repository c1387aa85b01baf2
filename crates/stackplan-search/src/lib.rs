//! Bounded best-first search over a planning [`Domain`].
//!
//! The search is generic: it only sees states, actions and the five operations of the
//! [`Domain`] trait. The falling-block planner plugs its board physics and heuristic in
//! through `stackplan-evaluator`.
//!
//! # Architecture
//!
//! ```text
//! SearchTree (frontier, bounds, statistics)
//!     ↓ expands
//! SearchNode (state, parent link, cost, heuristic)
//!     ↓ asks
//! Domain (actions, result, cost, heuristic, satisfies)
//! ```
//!
//! # Bounds
//!
//! Three limits keep one planning cycle cheap:
//!
//! - [`BreadthCaps`] - after expanding a node at depth `d` the frontier is cut down to
//!   `caps[d]` nodes, and nodes at depth `caps.len()` are never expanded
//! - a wall-clock time cap, checked after every expansion
//! - cycle avoidance: a successor equal to any state on its parent's root path is
//!   dropped
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use stackplan_search::{BreadthCaps, Domain, SearchProblem, SearchTree};
//!
//! /// Count up from a number in steps of one or two.
//! struct Counter;
//!
//! impl Domain for Counter {
//!     type State = u32;
//!     type Action = u32;
//!
//!     fn actions(&mut self, _state: &u32) -> Vec<u32> {
//!         vec![1, 2]
//!     }
//!     fn result(&mut self, state: &u32, action: u32) -> u32 {
//!         state + action
//!     }
//!     fn cost(&mut self, _state: &u32, _action: u32) -> f64 {
//!         1.0
//!     }
//!     fn heuristic(&mut self, state: &u32, goal: &u32) -> f64 {
//!         f64::from(goal.abs_diff(*state))
//!     }
//!     fn satisfies(&self, state: &u32, goal: &u32) -> bool {
//!         state == goal
//!     }
//! }
//!
//! let mut domain = Counter;
//! let problem = SearchProblem::new(&mut domain, 0, 4);
//! let caps = BreadthCaps::new(vec![2, 2, 2]).unwrap();
//! let outcome = SearchTree::new(problem, caps, Duration::from_secs(5)).search();
//!
//! assert!(outcome.termination.is_solution());
//! assert_eq!(outcome.plan, vec![2, 2]);
//! ```

pub use self::{caps::*, node::*, tree::*};

mod caps;
mod node;
mod tree;

/// The problem-specific half of a search.
///
/// Methods take `&mut self` so implementations can memoize freely; the search calls
/// them from a single thread.
pub trait Domain {
    type State: Clone + Eq;
    type Action: Copy;

    /// Actions applicable in `state`. An empty list makes the state a leaf.
    fn actions(&mut self, state: &Self::State) -> Vec<Self::Action>;

    /// State reached by applying `action` in `state`.
    fn result(&mut self, state: &Self::State, action: Self::Action) -> Self::State;

    /// Step cost of applying `action` in `state`.
    ///
    /// The search always calls [`result`](Self::result) for the same pair first.
    fn cost(&mut self, state: &Self::State, action: Self::Action) -> f64;

    /// Estimated remaining cost from `state` to `goal`. Lower is better.
    fn heuristic(&mut self, state: &Self::State, goal: &Self::State) -> f64;

    /// Whether `state` is an acceptable end point for `goal`.
    fn satisfies(&self, state: &Self::State, goal: &Self::State) -> bool;
}

/// A domain together with the start state and the goal to reach.
pub struct SearchProblem<'a, D>
where
    D: Domain,
{
    pub domain: &'a mut D,
    pub initial: D::State,
    pub goal: D::State,
}

impl<'a, D> SearchProblem<'a, D>
where
    D: Domain,
{
    #[must_use]
    pub fn new(domain: &'a mut D, initial: D::State, goal: D::State) -> Self {
        Self {
            domain,
            initial,
            goal,
        }
    }

    #[must_use]
    pub fn goal_test(&self, state: &D::State) -> bool {
        self.domain.satisfies(state, &self.goal)
    }
}
