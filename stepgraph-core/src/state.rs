//! Run record threaded through the driving loop.

use crate::reference::NodeReference;

/// Mutable record of a run: the caller's state plus where the run is.
///
/// Created by [`Graph::create_initial_state`](crate::Graph::create_initial_state)
/// with `current == last == initial`, which is why the initial node's enter
/// hook does not fire on the first step. Only the graph moves `current` and
/// `last`; callbacks mutate the caller's state through their context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionState<S> {
    pub(crate) state: S,
    pub(crate) current: NodeReference,
    pub(crate) last: NodeReference,
}

impl<S> ExecutionState<S> {
    pub(crate) fn new(state: S, initial: NodeReference) -> Self {
        Self {
            state,
            current: initial,
            last: initial,
        }
    }

    /// Node the next step will run.
    pub fn current(&self) -> NodeReference {
        self.current
    }

    /// Node the previous step ran.
    pub fn last(&self) -> NodeReference {
        self.last
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Ends the run record and hands the caller's state back.
    pub fn into_state(self) -> S {
        self.state
    }
}
