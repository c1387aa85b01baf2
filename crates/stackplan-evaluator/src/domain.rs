//! The falling-block planning domain.
//!
//! [`TetrisDomain`] connects the engine's physics to the generic search: it enumerates
//! placements from the rotation catalog, simulates them with [`fall`] and [`clear`],
//! prices them and scores the resulting boards.
//!
//! # Caches
//!
//! Every operation the search repeats is memoized in a table owned by the domain. All
//! cached values are pure functions of their keys, so entries are written once and
//! never invalidated; keeping one domain alive across planning cycles keeps the work.
//!
//! | table     | key                                   | value                    |
//! |-----------|---------------------------------------|--------------------------|
//! | fall      | piece, board, action                  | resting board            |
//! | clear     | resting board                         | cleared board and count  |
//! | actions   | piece                                 | legal actions            |
//! | heuristic | board                                 | board-only score         |
//!
//! The cleared-lines term depends on the goal, so it is added on top of the cached
//! board-only score on every call.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::Serialize;
use stackplan_engine::{
    Action, Board, ClearOutcome, Dimensions, Interner, Piece, RotationCatalog, TetrisState,
    clear, fall,
};
use stackplan_search::{BreadthCaps, Domain, SearchOutcome, SearchProblem, SearchTree};

use crate::{
    heuristic::{BoardQuality, cleared_lines_score},
    weights::HeuristicWeights,
};

/// Base cost of placing one piece. Clearing `n` rows subtracts `n²`.
pub const PLACEMENT_COST: f64 = 17.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FallKey {
    piece: Piece,
    board: Board,
    action: Action,
}

/// Entry and hit counts of one memo table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
}

/// Sizes and hit counts of every table the domain keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DomainStats {
    pub fall: CacheStats,
    pub clear: CacheStats,
    pub actions: CacheStats,
    pub heuristic: CacheStats,
    /// Distinct boards produced by `result`.
    pub boards: CacheStats,
}

#[derive(Debug, Clone, Copy, Default)]
struct Hits {
    fall: usize,
    clear: usize,
    actions: usize,
    heuristic: usize,
}

/// Planning domain over [`TetrisState`]s.
#[derive(Debug)]
pub struct TetrisDomain {
    catalog: RotationCatalog,
    dims: Dimensions,
    weights: HeuristicWeights,
    fall_cache: FxHashMap<FallKey, Board>,
    clear_cache: FxHashMap<Board, ClearOutcome>,
    actions_cache: FxHashMap<Piece, Vec<Action>>,
    heuristic_cache: FxHashMap<Board, f64>,
    boards: Interner<Board>,
    hits: Hits,
}

impl TetrisDomain {
    #[must_use]
    pub fn new(catalog: RotationCatalog, dims: Dimensions, weights: HeuristicWeights) -> Self {
        Self {
            catalog,
            dims,
            weights,
            fall_cache: FxHashMap::default(),
            clear_cache: FxHashMap::default(),
            actions_cache: FxHashMap::default(),
            heuristic_cache: FxHashMap::default(),
            boards: Interner::default(),
            hits: Hits::default(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &RotationCatalog {
        &self.catalog
    }

    /// Mutable access for registering newly learned pieces.
    ///
    /// Catalog entries are never changed once added, so cached actions stay valid.
    pub fn catalog_mut(&mut self) -> &mut RotationCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }

    #[must_use]
    pub fn stats(&self) -> DomainStats {
        DomainStats {
            fall: CacheStats {
                entries: self.fall_cache.len(),
                hits: self.hits.fall,
            },
            clear: CacheStats {
                entries: self.clear_cache.len(),
                hits: self.hits.clear,
            },
            actions: CacheStats {
                entries: self.actions_cache.len(),
                hits: self.hits.actions,
            },
            heuristic: CacheStats {
                entries: self.heuristic_cache.len(),
                hits: self.hits.heuristic,
            },
            boards: CacheStats {
                entries: self.boards.len(),
                hits: self.boards.hits(),
            },
        }
    }

    /// Searches for a plan from `state`.
    ///
    /// The goal is the starting state itself: a plan satisfies it once every lookahead
    /// piece is placed on a board with fewer rows than the current one.
    pub fn plan(
        &mut self,
        state: &TetrisState,
        caps: BreadthCaps,
        time_cap: Duration,
    ) -> SearchOutcome<TetrisState, Action> {
        let problem = SearchProblem::new(self, state.clone(), state.clone());
        let outcome = SearchTree::new(problem, caps, time_cap).search();
        log::debug!("domain caches after planning: {:?}", self.stats());
        outcome
    }

    /// Resting board for `action`, memoized.
    fn resting_board(&mut self, state: &TetrisState, action: Action) -> Board {
        let key = FallKey {
            piece: state.piece().clone(),
            board: state.board().clone(),
            action,
        };
        if let Some(board) = self.fall_cache.get(&key) {
            self.hits.fall += 1;
            return board.clone();
        }
        let rotation = self
            .catalog
            .rotations(state.piece())
            .and_then(|rotations| rotations.get(action.rotation))
            .unwrap_or_else(|| {
                panic!(
                    "rotation {} of {:?} is not in the catalog",
                    action.rotation,
                    state.piece()
                )
            });
        let board = fall(state.board(), rotation, action.translation);
        self.fall_cache.insert(key, board.clone());
        board
    }

    fn cleared(&mut self, resting: Board) -> ClearOutcome {
        if let Some(outcome) = self.clear_cache.get(&resting) {
            self.hits.clear += 1;
            return outcome.clone();
        }
        let ClearOutcome { board, cleared } = clear(&resting);
        let outcome = ClearOutcome {
            board: self.boards.intern(board),
            cleared,
        };
        self.clear_cache.insert(resting, outcome.clone());
        outcome
    }
}

impl Domain for TetrisDomain {
    type State = TetrisState;
    type Action = Action;

    /// Every (rotation, translation) pair of the current piece that fits between the
    /// walls; empty when the piece has not been learned.
    fn actions(&mut self, state: &TetrisState) -> Vec<Action> {
        if let Some(actions) = self.actions_cache.get(state.piece()) {
            self.hits.actions += 1;
            return actions.clone();
        }
        let Some(rotations) = self.catalog.rotations(state.piece()) else {
            return Vec::new();
        };
        let dims = self.dims;
        let actions: Vec<Action> = rotations
            .iter()
            .enumerate()
            .flat_map(|(index, rotation)| {
                rotation
                    .translations(dims)
                    .map(move |translation| Action::new(index, translation))
            })
            .collect();
        self.actions_cache
            .insert(state.piece().clone(), actions.clone());
        actions
    }

    fn result(&mut self, state: &TetrisState, action: Action) -> TetrisState {
        let resting = self.resting_board(state, action);
        let outcome = self.cleared(resting);
        state.successor(outcome.board)
    }

    fn cost(&mut self, state: &TetrisState, action: Action) -> f64 {
        let key = FallKey {
            piece: state.piece().clone(),
            board: state.board().clone(),
            action,
        };
        let cleared = self
            .fall_cache
            .get(&key)
            .and_then(|resting| self.clear_cache.get(resting))
            .map(|outcome| outcome.cleared)
            .unwrap_or_else(|| panic!("cost of {action:?} requested before its result"));
        let cleared = f64::from(u32::try_from(cleared).unwrap_or(u32::MAX));
        PLACEMENT_COST - cleared * cleared
    }

    fn heuristic(&mut self, state: &TetrisState, goal: &TetrisState) -> f64 {
        let board = state.board();
        let board_score = if let Some(&score) = self.heuristic_cache.get(board) {
            self.hits.heuristic += 1;
            score
        } else {
            let score = BoardQuality::new(board, &self.weights).board_score();
            self.heuristic_cache.insert(board.clone(), score);
            score
        };
        board_score + cleared_lines_score(board.row_count(), goal.board().row_count(), &self.weights)
    }

    fn satisfies(&self, state: &TetrisState, goal: &TetrisState) -> bool {
        state.next_pieces().len() < goal.next_pieces().len()
            && state.board().row_count() < goal.board().row_count()
    }
}

#[cfg(test)]
mod tests {
    use stackplan_engine::{CatalogSeedEntry, Cell};

    use super::*;

    fn cells(list: &[(usize, usize)]) -> Vec<Cell> {
        list.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn square_cells() -> Vec<Cell> {
        cells(&[(1, 0), (2, 0), (1, 1), (2, 1)])
    }

    fn square() -> Piece {
        Piece::from_cells(&square_cells())
    }

    fn domain(dims: Dimensions) -> TetrisDomain {
        let mut catalog = RotationCatalog::new();
        let entry = CatalogSeedEntry {
            rotations: vec![square_cells()],
        };
        catalog.seed(&entry, dims).unwrap();
        TetrisDomain::new(catalog, dims, HeuristicWeights::default())
    }

    #[test]
    fn test_square_on_empty_board() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let state = TetrisState::new(Board::empty(dims), square(), vec![]);

        let next = domain.result(&state, Action::new(0, 0));
        assert_eq!(next.board().rows(), &[0b1100_0000, 0b1100_0000]);
        assert!(next.piece().is_wildcard());
        assert!((domain.cost(&state, Action::new(0, 0)) - PLACEMENT_COST).abs() < f64::EPSILON);
    }

    #[test]
    fn test_actions_empty_iff_piece_unknown() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let known = TetrisState::new(Board::empty(dims), square(), vec![]);
        let actions = domain.actions(&known);
        assert_eq!(actions.len(), 7);
        assert_eq!(actions[0], Action::new(0, 0));
        assert_eq!(actions[6], Action::new(0, 6));

        let bar = Piece::from_cells(&cells(&[(1, 0), (2, 0), (3, 0)]));
        let unknown = TetrisState::new(Board::empty(dims), bar, vec![]);
        assert!(domain.actions(&unknown).is_empty());
        let wildcard = TetrisState::new(Board::empty(dims), Piece::wildcard(), vec![]);
        assert!(domain.actions(&wildcard).is_empty());

        domain.actions(&known);
        assert_eq!(domain.stats().actions, CacheStats { entries: 1, hits: 1 });
    }

    #[test]
    fn test_clearing_costs_less() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let board = Board::from_ascii("######..", dims);
        let state = TetrisState::new(board, square(), vec![]);

        let clearing = Action::new(0, 6);
        let stacking = Action::new(0, 0);
        let next = domain.result(&state, clearing);
        assert_eq!(next.board().rows(), &[0b0000_0011]);
        domain.result(&state, stacking);

        let clearing_cost = domain.cost(&state, clearing);
        assert!((clearing_cost - (PLACEMENT_COST - 1.0)).abs() < f64::EPSILON);
        assert!(clearing_cost < domain.cost(&state, stacking));
    }

    #[test]
    #[should_panic(expected = "before its result")]
    fn test_cost_before_result_panics() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let state = TetrisState::new(Board::empty(dims), square(), vec![]);
        let _ = domain.cost(&state, Action::new(0, 0));
    }

    #[test]
    fn test_heuristic_is_cached_per_board() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let board = Board::from_ascii(".##.....\n#####...", dims);
        let state = TetrisState::new(board.clone(), square(), vec![]);
        let same_board = TetrisState::new(board, Piece::wildcard(), vec![square()]);

        let first = domain.heuristic(&state, &state);
        let second = domain.heuristic(&same_board, &state);
        assert!((first - second).abs() < f64::EPSILON);
        assert_eq!(domain.stats().heuristic, CacheStats { entries: 1, hits: 1 });
    }

    #[test]
    fn test_heuristic_tracks_goal_rows() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let low = TetrisState::new(Board::from_ascii("#.......", dims), square(), vec![]);
        let high = TetrisState::new(
            Board::from_ascii("#.......\n#.......\n#.......", dims),
            square(),
            vec![],
        );
        assert!(domain.heuristic(&low, &high) < domain.heuristic(&low, &low));
    }

    #[test]
    fn test_repeated_result_hits_caches() {
        let dims = Dimensions::new(10, 20).unwrap();
        let mut domain = domain(dims);
        let state = TetrisState::new(Board::empty(dims), square(), vec![square()]);
        let a = domain.result(&state, Action::new(0, 2));
        let b = domain.result(&state, Action::new(0, 2));
        assert_eq!(a, b);
        let stats = domain.stats();
        assert_eq!(stats.fall, CacheStats { entries: 1, hits: 1 });
        assert_eq!(stats.clear.entries, 1);
        assert_eq!(stats.boards.entries, 1);
    }

    #[test]
    fn test_plan_clears_rows_with_small_caps() {
        // 4-wide interior: two bottom rows are half full, a square on the right
        // completes both.
        let dims = Dimensions::new(6, 20).unwrap();
        let mut domain = domain(dims);
        let board = Board::from_ascii("##..\n##..", dims);
        let state = TetrisState::new(board, square(), vec![square(), square(), square()]);

        let caps = BreadthCaps::new(vec![1, 1]).unwrap();
        let outcome = domain.plan(&state, caps, Duration::from_secs(60));
        assert!(outcome.termination.is_solution());
        assert!(!outcome.plan.is_empty());
        assert!(outcome.plan.len() <= 2);
        assert!(outcome.node.state().board().row_count() < 2);
        assert!(domain.stats().fall.entries > 0);
    }
}
