//! Node definitions and the per-node builder.

use crate::context::ExecutionContext;
use crate::error::BuildError;
use crate::reference::NodeReference;
use std::fmt;
use std::sync::Arc;

pub(crate) type StepFn<S, I> =
    Arc<dyn Fn(&mut ExecutionContext<'_, S, I>) -> NodeReference + Send + Sync>;

pub(crate) type HookFn<S, I> = Arc<dyn Fn(&mut ExecutionContext<'_, S, I>) + Send + Sync>;

/// Immutable definition of one node in a built graph.
pub struct NodeDefinition<S, I: ?Sized> {
    pub(crate) id: NodeReference,
    pub(crate) enter: Option<HookFn<S, I>>,
    pub(crate) step: StepFn<S, I>,
    pub(crate) exit: Option<HookFn<S, I>>,
    pub(crate) terminal: bool,
    pub(crate) initial: bool,
}

impl<S, I: ?Sized> NodeDefinition<S, I> {
    pub fn id(&self) -> NodeReference {
        self.id
    }

    /// Terminal nodes end the run and are never stepped.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Whether this node was marked initial. The graph's resolved initial node
    /// may differ when several nodes carry the flag.
    pub fn is_initial(&self) -> bool {
        self.initial
    }

    pub fn has_enter(&self) -> bool {
        self.enter.is_some()
    }

    pub fn has_exit(&self) -> bool {
        self.exit.is_some()
    }

    pub(crate) fn context<'a>(&self, state: &'a mut S, input: &'a I) -> ExecutionContext<'a, S, I> {
        ExecutionContext::new(self.id, self.terminal, self.initial, state, input)
    }
}

impl<S, I: ?Sized> Clone for NodeDefinition<S, I> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            enter: self.enter.clone(),
            step: Arc::clone(&self.step),
            exit: self.exit.clone(),
            terminal: self.terminal,
            initial: self.initial,
        }
    }
}

impl<S, I: ?Sized> fmt::Debug for NodeDefinition<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDefinition")
            .field("id", &self.id)
            .field("enter", &self.has_enter())
            .field("exit", &self.has_exit())
            .field("terminal", &self.terminal)
            .field("initial", &self.initial)
            .finish()
    }
}

/// Accumulates the behaviour of one node until the graph is built.
///
/// Every setter overwrites the previous registration (last write wins) and
/// returns the builder so calls can be chained:
///
/// ```
/// # use stepgraph_core::GraphBuilder;
/// let mut builder = GraphBuilder::<Vec<&'static str>, ()>::new();
/// let end = builder.terminal_node();
/// builder.node(|n| {
///     n.initial()
///         .exit(|ctx| ctx.state.push("left start"))
///         .step(move |_| end);
/// });
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.process(&(), Vec::new()).unwrap(), vec!["left start"]);
/// ```
pub struct NodeBuilder<S, I: ?Sized> {
    id: NodeReference,
    enter: Option<HookFn<S, I>>,
    step: Option<StepFn<S, I>>,
    exit: Option<HookFn<S, I>>,
    terminal: bool,
    initial: bool,
}

impl<S, I: ?Sized> NodeBuilder<S, I> {
    pub(crate) fn new(id: NodeReference) -> Self {
        Self {
            id,
            enter: None,
            step: None,
            exit: None,
            terminal: false,
            initial: false,
        }
    }

    /// Reference of the node being defined.
    pub fn id(&self) -> NodeReference {
        self.id
    }

    /// Called when the run arrives at this node from a different node, before
    /// `step`. Not called for self-loops, and not called for the initial node
    /// on the first step of a run (see [`Graph::step`](crate::Graph::step)).
    pub fn enter<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext<'_, S, I>) + Send + Sync + 'static,
    {
        self.enter = Some(Arc::new(hook));
        self
    }

    /// The transition function: returns the node to visit next. Every node
    /// needs one; building a node without it fails.
    pub fn step<F>(&mut self, step: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext<'_, S, I>) -> NodeReference + Send + Sync + 'static,
    {
        self.step = Some(Arc::new(step));
        self
    }

    /// Called after `step` when the run leaves this node for a different one.
    pub fn exit<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&mut ExecutionContext<'_, S, I>) + Send + Sync + 'static,
    {
        self.exit = Some(Arc::new(hook));
        self
    }

    /// Reaching this node ends the run.
    pub fn terminal(&mut self) -> &mut Self {
        self.terminal = true;
        self
    }

    /// Marks the node where runs begin. When several nodes are marked, the
    /// one with the lowest reference wins; when none is, the lowest reference
    /// is used.
    pub fn initial(&mut self) -> &mut Self {
        self.initial = true;
        self
    }

    pub(crate) fn is_initial(&self) -> bool {
        self.initial
    }

    pub(crate) fn build(&self) -> Result<NodeDefinition<S, I>, BuildError> {
        let step = self
            .step
            .clone()
            .ok_or(BuildError::MissingStep { reference: self.id })?;

        Ok(NodeDefinition {
            id: self.id,
            enter: self.enter.clone(),
            step,
            exit: self.exit.clone(),
            terminal: self.terminal,
            initial: self.initial,
        })
    }
}

impl<S, I: ?Sized> fmt::Debug for NodeBuilder<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBuilder")
            .field("id", &self.id)
            .field("enter", &self.enter.is_some())
            .field("step", &self.step.is_some())
            .field("exit", &self.exit.is_some())
            .field("terminal", &self.terminal)
            .field("initial", &self.initial)
            .finish()
    }
}
