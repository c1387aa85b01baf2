use std::{
    collections::VecDeque,
    rc::Rc,
    time::{Duration, Instant},
};

use serde::Serialize;
use stackplan_stats::running::RunningMean;

use crate::{BreadthCaps, Domain, SearchNode, SearchProblem};

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A dequeued node satisfied the goal.
    #[display("solution")]
    Solution,
    /// The frontier ran dry or the time cap hit; the best estimate seen was returned.
    #[display("best effort")]
    BestEffort,
}

/// Wall-clock time spent in each domain operation during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub actions: Duration,
    pub result: Duration,
    pub cost_heuristic: Duration,
    pub total: Duration,
}

/// Shape and timing of a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SearchStats {
    /// Nodes left unexpanded: the frontier at termination plus the chosen node.
    pub terminals: usize,
    /// Nodes taken off the frontier without satisfying the goal.
    pub non_terminals: usize,
    pub avg_branching: f64,
    /// Mean depth over the root and every generated node.
    pub avg_depth: f64,
    pub timings: PhaseTimings,
}

/// Result of [`SearchTree::search`].
#[derive(Debug)]
pub struct SearchOutcome<S, A> {
    /// Actions from the initial state to `node`.
    pub plan: Vec<A>,
    pub node: Rc<SearchNode<S, A>>,
    pub termination: Termination,
    pub stats: SearchStats,
}

/// Bounded best-first search.
///
/// The frontier is ordered by path cost, with the A* estimate (cost plus heuristic)
/// breaking ties, and pruned to [`BreadthCaps::cap`] of the expanded node's depth after
/// every expansion. The goal test runs when a node is dequeued.
///
/// When no dequeued node satisfies the goal, the search falls back to the generated
/// node with the lowest A* estimate, or the root if nothing was generated.
pub struct SearchTree<'a, D>
where
    D: Domain,
{
    problem: SearchProblem<'a, D>,
    caps: BreadthCaps,
    time_cap: Duration,
}

impl<'a, D> SearchTree<'a, D>
where
    D: Domain,
{
    #[must_use]
    pub fn new(problem: SearchProblem<'a, D>, caps: BreadthCaps, time_cap: Duration) -> Self {
        Self {
            problem,
            caps,
            time_cap,
        }
    }

    #[must_use]
    pub fn search(self) -> SearchOutcome<D::State, D::Action> {
        let Self {
            problem,
            caps,
            time_cap,
        } = self;
        let mut progress = Progress::start();

        let root = Rc::new(SearchNode::root(problem.initial.clone()));
        let mut best: Option<Rc<SearchNode<D::State, D::Action>>> = None;
        let mut open = VecDeque::from([Rc::clone(&root)]);

        while let Some(node) = open.pop_front() {
            if problem.goal_test(node.state()) {
                return progress.finish(node, open.len(), Termination::Solution);
            }
            progress.non_terminals += 1;
            if node.depth() >= caps.depth_limit() {
                continue;
            }

            let t = Instant::now();
            let actions = problem.domain.actions(node.state());
            progress.timings.actions += t.elapsed();

            let mut children = Vec::with_capacity(actions.len());
            for action in actions {
                let t = Instant::now();
                let state = problem.domain.result(node.state(), action);
                progress.timings.result += t.elapsed();
                if node.on_path(&state) {
                    continue;
                }

                let t = Instant::now();
                let step_cost = problem.domain.cost(node.state(), action);
                let heuristic = problem.domain.heuristic(&state, &problem.goal);
                progress.timings.cost_heuristic += t.elapsed();

                let child = Rc::new(SearchNode::child(&node, state, action, step_cost, heuristic));
                progress.depths.push(depth_as_f64(child.depth()));
                if best.as_ref().is_none_or(|b| child.estimate() < b.estimate()) {
                    best = Some(Rc::clone(&child));
                }
                children.push(child);
            }

            if progress.started.elapsed() > time_cap {
                log::debug!("search hit the {time_cap:?} time cap");
                break;
            }
            open.extend(children);
            open.make_contiguous().sort_by(|a, b| {
                a.cost()
                    .total_cmp(&b.cost())
                    .then_with(|| a.estimate().total_cmp(&b.estimate()))
            });
            open.truncate(caps.cap(node.depth()));
        }

        let node = best.unwrap_or(root);
        progress.finish(node, open.len(), Termination::BestEffort)
    }
}

/// Counters gathered while the search runs.
struct Progress {
    started: Instant,
    timings: PhaseTimings,
    depths: RunningMean,
    non_terminals: usize,
}

impl Progress {
    fn start() -> Self {
        let mut depths = RunningMean::default();
        depths.push(0.0);
        Self {
            started: Instant::now(),
            timings: PhaseTimings::default(),
            depths,
            non_terminals: 0,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn finish<S, A>(
        mut self,
        node: Rc<SearchNode<S, A>>,
        open_len: usize,
        termination: Termination,
    ) -> SearchOutcome<S, A>
    where
        S: Eq,
        A: Copy,
    {
        self.timings.total = self.started.elapsed();
        let terminals = open_len + 1;
        let non_terminals = self.non_terminals;
        let avg_branching = if non_terminals == 0 {
            0.0
        } else {
            (non_terminals + terminals - 1) as f64 / non_terminals as f64
        };
        let stats = SearchStats {
            terminals,
            non_terminals,
            avg_branching,
            avg_depth: self.depths.mean(),
            timings: self.timings,
        };
        log::debug!(
            "search ended with {termination}: {terminals} terminal / {non_terminals} \
             non-terminal nodes, branching {avg_branching:.2}, depth {:.2}, took {:?}",
            stats.avg_depth,
            stats.timings.total,
        );
        SearchOutcome {
            plan: node.plan(),
            node,
            termination,
            stats,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn depth_as_f64(depth: usize) -> f64 {
    depth as f64
}
