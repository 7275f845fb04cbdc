//! Per-invocation view handed to hooks and step functions.

use crate::reference::NodeReference;

/// What a hook or step function sees of the run.
///
/// A context is built fresh for every enter/step/exit call and dropped right
/// after. `state` and `input` are public fields so a callback can borrow them
/// independently (mutating the state while reading the input).
pub struct ExecutionContext<'a, S, I: ?Sized> {
    id: NodeReference,
    terminal: bool,
    initial: bool,
    /// The caller's state for this run.
    pub state: &'a mut S,
    /// The input the run was started with.
    pub input: &'a I,
}

impl<'a, S, I: ?Sized> ExecutionContext<'a, S, I> {
    pub(crate) fn new(
        id: NodeReference,
        terminal: bool,
        initial: bool,
        state: &'a mut S,
        input: &'a I,
    ) -> Self {
        Self {
            id,
            terminal,
            initial,
            state,
            input,
        }
    }

    /// Reference of the node being invoked. Returning it from a step
    /// function is a self-loop.
    pub fn id(&self) -> NodeReference {
        self.id
    }

    /// Whether the node being invoked is terminal.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Whether the node being invoked is the graph's initial node.
    pub fn is_initial(&self) -> bool {
        self.initial
    }
}
