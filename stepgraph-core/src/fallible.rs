//! States that carry a domain error.
//!
//! The engine has no notion of "rejecting" input. Machines that need one keep
//! an error slot in their state, route to a terminal node when something goes
//! wrong, and let the caller turn the slot into an `Err` once the run is over:
//!
//! ```
//! use stepgraph_core::{FallibleState, GraphBuilder, RunError};
//!
//! #[derive(Default)]
//! struct Digits {
//!     pos: usize,
//!     error: Option<String>,
//! }
//!
//! impl FallibleState for Digits {
//!     type Error = String;
//!     fn error(&self) -> Option<&String> { self.error.as_ref() }
//!     fn set_error(&mut self, error: String) { self.error = Some(error); }
//!     fn take_error(&mut self) -> Option<String> { self.error.take() }
//!     fn create_error(&self, message: String) -> String {
//!         format!("{} at {}", message, self.pos)
//!     }
//! }
//!
//! let mut builder = GraphBuilder::<Digits, str>::new();
//! let end = builder.new_reference();
//! builder.node(|n| {
//!     n.step(move |ctx| match ctx.input.as_bytes().get(ctx.state.pos) {
//!         None => end,
//!         Some(b) if b.is_ascii_digit() => {
//!             ctx.state.pos += 1;
//!             ctx.id()
//!         }
//!         Some(_) => ctx.fail(end, "not a digit"),
//!     });
//! });
//! builder.define_terminal_node(end, |_| {});
//! let graph = builder.build().unwrap();
//!
//! assert!(graph.process_or_raise("123", Digits::default()).is_ok());
//! match graph.process_or_raise("12x", Digits::default()) {
//!     Err(RunError::Failed(message)) => assert_eq!(message, "not a digit at 2"),
//!     _ => panic!("expected failure"),
//! }
//! ```

use crate::context::ExecutionContext;
use crate::error::RunError;
use crate::graph::Graph;
use crate::reference::NodeReference;

/// A state with a slot for the error that ended its run.
pub trait FallibleState {
    type Error;

    /// The stored error, if the run failed.
    fn error(&self) -> Option<&Self::Error>;

    fn set_error(&mut self, error: Self::Error);

    fn take_error(&mut self) -> Option<Self::Error>;

    /// Builds a typed error from a message. Implementations may enrich it
    /// with state, such as the current input position.
    fn create_error(&self, message: String) -> Self::Error;

    fn has_failed(&self) -> bool {
        self.error().is_some()
    }
}

impl<'a, S: FallibleState, I: ?Sized> ExecutionContext<'a, S, I> {
    /// Stores an error built from `message` and returns `terminal`, so a step
    /// function can end with `return ctx.fail(end, "...")`.
    pub fn fail(&mut self, terminal: NodeReference, message: impl Into<String>) -> NodeReference {
        let error = self.state.create_error(message.into());
        self.fail_with(terminal, error)
    }

    /// Stores a ready-made error and returns `terminal`.
    pub fn fail_with(&mut self, terminal: NodeReference, error: S::Error) -> NodeReference {
        tracing::debug!(node = %self.id(), %terminal, "run failed");
        self.state.set_error(error);
        terminal
    }
}

impl<S: FallibleState, I: ?Sized> Graph<S, I> {
    /// Runs [`process`](Graph::process) and returns the stored error, if any,
    /// as `Err(RunError::Failed)`.
    pub fn process_or_raise(&self, input: &I, state: S) -> Result<S, RunError<S::Error>> {
        let state = self.process(input, state)?;
        raise(state)
    }

    /// Runs [`process_until`](Graph::process_until) and returns the stored
    /// error, if any, as `Err(RunError::Failed)`.
    pub fn process_until_or_raise<P>(
        &self,
        input: &I,
        state: S,
        predicate: P,
    ) -> Result<S, RunError<S::Error>>
    where
        P: FnMut(&S) -> bool,
    {
        let state = self.process_until(input, state, predicate)?;
        raise(state)
    }
}

fn raise<S: FallibleState>(mut state: S) -> Result<S, RunError<S::Error>> {
    match state.take_error() {
        Some(error) => Err(RunError::Failed(error)),
        None => Ok(state),
    }
}
