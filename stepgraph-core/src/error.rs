//! Core error types.

use crate::reference::NodeReference;
use thiserror::Error;

/// Configuration errors surfaced by [`GraphBuilder::build`](crate::GraphBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("graph has no nodes")]
    Empty,

    #[error("node {reference} has no step function")]
    MissingStep { reference: NodeReference },

    #[error("node {reference} was referenced but never defined")]
    UndefinedNode { reference: NodeReference },

    #[error("the uninitialized reference cannot identify a node")]
    UninitializedReference,
}

/// Errors raised while driving a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("invalid node reference {reference}: graph has {node_count} nodes")]
    InvalidReference {
        reference: NodeReference,
        node_count: usize,
    },
}

/// Outcome of a run whose state carries a domain error.
///
/// Returned by [`Graph::process_or_raise`](crate::Graph::process_or_raise) and
/// [`Graph::process_until_or_raise`](crate::Graph::process_until_or_raise).
#[derive(Debug, Error)]
pub enum RunError<E> {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("{0}")]
    Failed(E),
}

impl BuildError {
    /// Returns a stable error code for display.
    pub fn error_code(&self) -> &'static str {
        match self {
            BuildError::Empty => "EMPTY_GRAPH",
            BuildError::MissingStep { .. } => "MISSING_STEP",
            BuildError::UndefinedNode { .. } => "UNDEFINED_NODE",
            BuildError::UninitializedReference => "UNINITIALIZED_REFERENCE",
        }
    }
}

impl GraphError {
    /// Returns a stable error code for display.
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::InvalidReference { .. } => "INVALID_REFERENCE",
        }
    }
}

impl<E> RunError<E> {
    /// Returns the domain error, if the run failed through the state's error slot.
    pub fn into_failure(self) -> Option<E> {
        match self {
            RunError::Failed(e) => Some(e),
            RunError::Graph(_) => None,
        }
    }
}
