use std::rc::Rc;

/// One node of the search tree.
///
/// Nodes are immutable and link to their parent through a shared pointer, so
/// frontier entries that share a prefix share its nodes.
#[derive(Debug)]
pub struct SearchNode<S, A> {
    state: S,
    parent: Option<Rc<SearchNode<S, A>>>,
    depth: usize,
    cost: f64,
    heuristic: f64,
    action: Option<A>,
}

impl<S, A> SearchNode<S, A>
where
    S: Eq,
    A: Copy,
{
    /// Root node: depth, cost and heuristic are zero.
    #[must_use]
    pub fn root(state: S) -> Self {
        Self {
            state,
            parent: None,
            depth: 0,
            cost: 0.0,
            heuristic: 0.0,
            action: None,
        }
    }

    /// Child of `parent` reached by `action`, with `step_cost` added to the path cost.
    #[must_use]
    pub fn child(parent: &Rc<Self>, state: S, action: A, step_cost: f64, heuristic: f64) -> Self {
        Self {
            state,
            parent: Some(Rc::clone(parent)),
            depth: parent.depth + 1,
            cost: parent.cost + step_cost,
            heuristic,
            action: Some(action),
        }
    }

    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Rc<Self>> {
        self.parent.as_ref()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Accumulated path cost from the root.
    #[must_use]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[must_use]
    pub fn heuristic(&self) -> f64 {
        self.heuristic
    }

    /// Action that produced this node, `None` for the root.
    #[must_use]
    pub fn action(&self) -> Option<A> {
        self.action
    }

    /// Path cost plus heuristic, the A* estimate.
    #[must_use]
    pub fn estimate(&self) -> f64 {
        self.cost + self.heuristic
    }

    /// Iterates from this node up to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.parent.as_deref())
    }

    /// Whether `state` appears on the path from the root to this node, inclusive.
    #[must_use]
    pub fn on_path(&self, state: &S) -> bool {
        self.ancestors().any(|node| node.state == *state)
    }

    /// Actions leading from the root to this node.
    #[must_use]
    pub fn plan(&self) -> Vec<A> {
        let mut plan: Vec<A> = self.ancestors().filter_map(|node| node.action).collect();
        plan.reverse();
        plan
    }
}
