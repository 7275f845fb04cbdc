//! The runnable graph and its driving loop.

use crate::error::GraphError;
use crate::node::NodeDefinition;
use crate::reference::NodeReference;
use crate::state::ExecutionState;
use serde::Serialize;
use std::fmt;

/// Immutable, runnable state machine produced by
/// [`GraphBuilder::build`](crate::GraphBuilder::build).
///
/// A graph holds no run data, so one graph can drive any number of
/// independent states, including from several threads at once.
pub struct Graph<S, I: ?Sized> {
    /// Node definitions; a node's reference index is its position.
    nodes: Vec<NodeDefinition<S, I>>,

    /// Where every run starts.
    initial: NodeReference,
}

impl<S, I: ?Sized> Graph<S, I> {
    pub(crate) fn new(nodes: Vec<NodeDefinition<S, I>>, initial: NodeReference) -> Self {
        Self { nodes, initial }
    }

    /// Reference of the node every run starts at.
    pub fn initial(&self) -> NodeReference {
        self.initial
    }

    /// Node definitions ordered by reference.
    pub fn nodes(&self) -> &[NodeDefinition<S, I>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up the node for a reference.
    pub fn node(&self, reference: NodeReference) -> Result<&NodeDefinition<S, I>, GraphError> {
        self.nodes
            .get(reference.index())
            .ok_or(GraphError::InvalidReference {
                reference,
                node_count: self.nodes.len(),
            })
    }

    /// Wraps a caller state into a run record positioned at the initial node.
    pub fn create_initial_state(&self, state: S) -> ExecutionState<S> {
        ExecutionState::new(state, self.initial)
    }

    /// Returns true when the run record sits on a terminal node.
    pub fn is_finished(&self, exec: &ExecutionState<S>) -> Result<bool, GraphError> {
        Ok(self.node(exec.current)?.terminal)
    }

    /// Performs one transition.
    ///
    /// 1. If the run arrived at the current node from a different node, its
    ///    enter hook fires.
    /// 2. The current node's step function picks the next node.
    /// 3. If the next node differs from the current one, the current node's
    ///    exit hook fires.
    ///
    /// A fresh run record has `last == current`, so the initial node's enter
    /// hook does not fire on the first step. It only fires if a later
    /// transition comes back to the initial node from elsewhere.
    ///
    /// The step function runs even when the current node is terminal; the
    /// `process*` drivers are what stop at terminal nodes.
    ///
    /// Returns [`GraphError::InvalidReference`] if the step function picks a
    /// reference outside the graph. In that case `current` still points at the
    /// node that was stepped.
    pub fn step(&self, input: &I, exec: &mut ExecutionState<S>) -> Result<(), GraphError> {
        let node = self.node(exec.current)?;

        if exec.last != exec.current {
            if let Some(enter) = &node.enter {
                tracing::trace!(node = %node.id, "enter");
                enter(&mut node.context(&mut exec.state, input));
            }
        }

        exec.last = exec.current;
        let next = (node.step)(&mut node.context(&mut exec.state, input));
        self.node(next)?;
        exec.current = next;

        if exec.last != exec.current {
            tracing::trace!(from = %exec.last, to = %exec.current, "transition");
            if let Some(exit) = &node.exit {
                exit(&mut node.context(&mut exec.state, input));
            }
        }

        Ok(())
    }

    /// Drives a fresh run until a terminal node is reached and returns the
    /// final state. Terminal nodes are never stepped, so an initial node that
    /// is terminal returns the state untouched.
    pub fn process(&self, input: &I, state: S) -> Result<S, GraphError> {
        self.process_until(input, state, |_| true)
    }

    /// Like [`process`](Self::process), but also stops as soon as `predicate`
    /// returns false. The predicate is checked before every step, including
    /// the first, so the run may end on a non-terminal node.
    pub fn process_until<P>(&self, input: &I, state: S, mut predicate: P) -> Result<S, GraphError>
    where
        P: FnMut(&S) -> bool,
    {
        let mut exec = self.create_initial_state(state);
        let mut steps: u64 = 0;

        while !self.is_finished(&exec)? && predicate(&exec.state) {
            self.step(input, &mut exec)?;
            steps += 1;
        }

        tracing::trace!(steps, end = %exec.current, "run finished");
        Ok(exec.into_state())
    }

    /// Performs exactly one step on an existing run record and hands it back,
    /// so a caller can drive the machine incrementally.
    pub fn process_step(
        &self,
        input: &I,
        mut exec: ExecutionState<S>,
    ) -> Result<ExecutionState<S>, GraphError> {
        self.step(input, &mut exec)?;
        Ok(exec)
    }

    /// Starts a run from a raw state and performs its first step.
    pub fn process_step_from(&self, input: &I, state: S) -> Result<ExecutionState<S>, GraphError> {
        self.process_step(input, self.create_initial_state(state))
    }

    /// Serializable outline of the graph's nodes.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            initial: self.initial,
            nodes: self
                .nodes
                .iter()
                .map(|node| NodeSummary {
                    reference: node.id,
                    name: None,
                    terminal: node.terminal,
                    initial: node.id == self.initial,
                    enter: node.has_enter(),
                    exit: node.has_exit(),
                })
                .collect(),
        }
    }
}

impl<S, I: ?Sized> Clone for Graph<S, I> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            initial: self.initial,
        }
    }
}

impl<S, I: ?Sized> fmt::Debug for Graph<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.nodes)
            .field("initial", &self.initial)
            .finish()
    }
}

/// Outline of a built graph, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub initial: NodeReference,
    pub nodes: Vec<NodeSummary>,
}

/// Outline of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub reference: NodeReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub terminal: bool,
    /// True for the graph's resolved initial node only.
    pub initial: bool,
    pub enter: bool,
    pub exit: bool,
}

impl GraphSummary {
    /// Attaches a display name to a node. Unknown references are ignored.
    pub fn with_name(mut self, reference: NodeReference, name: impl Into<String>) -> Self {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.reference == reference) {
            node.name = Some(name.into());
        }
        self
    }
}
