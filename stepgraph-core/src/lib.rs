//! # stepgraph-core
//!
//! Finite-state-machine engine for stepgraph.
//!
//! This crate provides:
//! - Node identity allocation and the node/graph builders
//! - The driving loop (enter/step/exit hooks, termination)
//! - A convention for states that carry a domain error
//! - A character-stepping helper for text-processing machines
//!
//! ```
//! use stepgraph_core::GraphBuilder;
//!
//! let mut builder = GraphBuilder::<u32, str>::new();
//! let done = builder.new_reference();
//! builder.node(|n| {
//!     n.initial().step(move |ctx| {
//!         *ctx.state += 1;
//!         if *ctx.state >= 3 { done } else { ctx.id() }
//!     });
//! });
//! builder.define_terminal_node(done, |_| {});
//!
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.process("", 0).unwrap(), 3);
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod fallible;
pub mod graph;
pub mod node;
pub mod reference;
pub mod state;
pub mod text;

pub use builder::{graph, GraphBuilder};
pub use context::ExecutionContext;
pub use error::{BuildError, GraphError, RunError};
pub use fallible::FallibleState;
pub use graph::{Graph, GraphSummary, NodeSummary};
pub use node::{NodeBuilder, NodeDefinition};
pub use reference::NodeReference;
pub use state::ExecutionState;
pub use text::TextCursor;
