//! Graph builder.
//!
//! References are minted up front with [`GraphBuilder::new_reference`] so step
//! functions can jump to nodes whose bodies are defined later:
//!
//! ```
//! use stepgraph_core::GraphBuilder;
//!
//! let mut builder = GraphBuilder::<Vec<usize>, ()>::new();
//! let ping = builder.new_reference();
//! let pong = builder.new_reference();
//! let done = builder.new_reference();
//!
//! builder.define_node(ping, |n| {
//!     n.step(move |ctx| {
//!         let id = ctx.id().index();
//!         ctx.state.push(id);
//!         if ctx.state.len() >= 4 { done } else { pong }
//!     });
//! });
//! builder.define_node(pong, |n| {
//!     n.step(move |ctx| {
//!         let id = ctx.id().index();
//!         ctx.state.push(id);
//!         ping
//!     });
//! });
//! builder.define_terminal_node(done, |_| {});
//!
//! let graph = builder.build().unwrap();
//! assert_eq!(graph.process(&(), Vec::new()).unwrap(), vec![0, 1, 0, 1, 0]);
//! ```

use crate::error::BuildError;
use crate::graph::Graph;
use crate::node::NodeBuilder;
use crate::reference::NodeReference;
use std::collections::BTreeMap;
use std::fmt;

/// Accumulates node definitions and finalizes them into a [`Graph`].
pub struct GraphBuilder<S, I: ?Sized> {
    /// Node builders keyed (and therefore ordered) by reference.
    nodes: BTreeMap<NodeReference, NodeBuilder<S, I>>,

    /// Index handed out by the next call to `new_reference`.
    next_index: usize,
}

impl<S, I: ?Sized> GraphBuilder<S, I> {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_index: 0,
        }
    }

    /// Mints a fresh reference. Indices increase monotonically.
    pub fn new_reference(&mut self) -> NodeReference {
        let reference = NodeReference::new(self.next_index);
        self.next_index += 1;
        reference
    }

    /// Mints a reference and defines a node for it.
    pub fn node<F>(&mut self, configure: F) -> NodeReference
    where
        F: FnOnce(&mut NodeBuilder<S, I>),
    {
        let reference = self.new_reference();
        self.define_node(reference, configure)
    }

    /// Defines the node for `reference`, replacing any earlier definition.
    pub fn define_node<F>(&mut self, reference: NodeReference, configure: F) -> NodeReference
    where
        F: FnOnce(&mut NodeBuilder<S, I>),
    {
        let mut node = NodeBuilder::new(reference);
        configure(&mut node);

        if self.nodes.insert(reference, node).is_some() {
            tracing::debug!(%reference, "node redefined");
        }

        // References minted elsewhere must not be handed out again.
        if !reference.is_uninitialized() && reference.index() >= self.next_index {
            self.next_index = reference.index() + 1;
        }

        reference
    }

    /// Mints a reference and defines a terminal node with no behaviour.
    pub fn terminal_node(&mut self) -> NodeReference {
        let reference = self.new_reference();
        self.define_terminal_node(reference, |_| {})
    }

    /// Defines a terminal node for `reference`. The node gets a self-looping
    /// step before `configure` runs, so `configure` only needs to attach
    /// hooks.
    pub fn define_terminal_node<F>(&mut self, reference: NodeReference, configure: F) -> NodeReference
    where
        F: FnOnce(&mut NodeBuilder<S, I>),
    {
        self.define_node(reference, |node| {
            node.terminal().step(|ctx| ctx.id());
            configure(node);
        })
    }

    /// Number of nodes defined so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finalizes the accumulated nodes into an immutable graph.
    ///
    /// Nodes are ordered by reference. Every reference minted by this builder
    /// must have a definition, so node indices are contiguous from zero. The
    /// initial node is the lowest reference marked initial, or reference 0
    /// when none is marked.
    ///
    /// The builder is left untouched; building again yields an identical graph.
    pub fn build(&self) -> Result<Graph<S, I>, BuildError> {
        if self.nodes.is_empty() {
            return Err(BuildError::Empty);
        }

        let mut nodes = Vec::with_capacity(self.nodes.len());
        for (position, (reference, node)) in self.nodes.iter().enumerate() {
            if reference.is_uninitialized() {
                return Err(BuildError::UninitializedReference);
            }
            if reference.index() != position {
                return Err(BuildError::UndefinedNode {
                    reference: NodeReference::new(position),
                });
            }
            nodes.push(node.build()?);
        }

        if nodes.len() < self.next_index {
            return Err(BuildError::UndefinedNode {
                reference: NodeReference::new(nodes.len()),
            });
        }

        let mut marked = self
            .nodes
            .values()
            .filter(|node| node.is_initial())
            .map(NodeBuilder::id);
        let initial = marked.next().unwrap_or(nodes[0].id);
        let extra = marked.count();
        if extra > 0 {
            tracing::warn!(
                %initial,
                ignored = extra,
                "several nodes marked initial, using the lowest reference"
            );
        }

        tracing::debug!(nodes = nodes.len(), %initial, "graph built");

        Ok(Graph::new(nodes, initial))
    }
}

impl<S, I: ?Sized> Default for GraphBuilder<S, I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, I: ?Sized> fmt::Debug for GraphBuilder<S, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphBuilder")
            .field("nodes", &self.nodes.values().collect::<Vec<_>>())
            .field("next_index", &self.next_index)
            .finish()
    }
}

/// Creates a builder, lets `configure` declare the nodes, and builds the graph.
pub fn graph<S, I: ?Sized, F>(configure: F) -> Result<Graph<S, I>, BuildError>
where
    F: FnOnce(&mut GraphBuilder<S, I>),
{
    let mut builder = GraphBuilder::new();
    configure(&mut builder);
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_to(target: NodeReference) -> impl Fn(&mut crate::ExecutionContext<'_, (), ()>) -> NodeReference {
        move |_| target
    }

    #[test]
    fn test_references_are_sequential() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let a = builder.new_reference();
        let b = builder.new_reference();
        let c = builder.node(|n| {
            n.step(|ctx| ctx.id());
        });

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn test_build_orders_by_reference() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let first = builder.new_reference();
        let second = builder.new_reference();

        // Declared out of order.
        builder.define_terminal_node(second, |_| {});
        builder.define_node(first, |n| {
            n.step(advance_to(second));
        });

        let graph = builder.build().unwrap();
        let ids: Vec<_> = graph.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(ids, vec![first, second]);
        assert_eq!(graph.initial(), first);
    }

    #[test]
    fn test_build_empty_graph() {
        let builder = GraphBuilder::<(), ()>::new();
        assert_eq!(builder.build().unwrap_err(), BuildError::Empty);
    }

    #[test]
    fn test_build_missing_step() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let r = builder.node(|n| {
            n.initial();
        });

        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::MissingStep { reference: r }
        );
    }

    #[test]
    fn test_build_undefined_forward_reference() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let start = builder.new_reference();
        let forgotten = builder.new_reference();
        builder.define_node(start, |n| {
            n.step(advance_to(forgotten));
        });

        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::UndefinedNode {
                reference: forgotten
            }
        );
    }

    #[test]
    fn test_build_gap_below_defined_node() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let gap = builder.new_reference();
        builder.terminal_node();

        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::UndefinedNode { reference: gap }
        );
    }

    #[test]
    fn test_build_rejects_uninitialized_reference() {
        let mut builder = GraphBuilder::<(), ()>::new();
        builder.terminal_node();
        builder.define_terminal_node(NodeReference::UNINITIALIZED, |_| {});

        assert_eq!(
            builder.build().unwrap_err(),
            BuildError::UninitializedReference
        );
    }

    #[test]
    fn test_initial_defaults_to_lowest_reference() {
        let graph = graph::<(), (), _>(|g| {
            g.terminal_node();
            g.terminal_node();
        })
        .unwrap();

        assert_eq!(graph.initial().index(), 0);
    }

    #[test]
    fn test_first_marked_initial_wins() {
        let mut builder = GraphBuilder::<(), ()>::new();
        builder.terminal_node();
        let second = builder.define_terminal_node(builder_ref(1), |n| {
            n.initial();
        });
        builder.define_terminal_node(builder_ref(2), |n| {
            n.initial();
        });

        let graph = builder.build().unwrap();
        assert_eq!(graph.initial(), second);
    }

    #[test]
    fn test_redefinition_replaces_node() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let r = builder.node(|n| {
            n.step(|ctx| ctx.id());
        });
        builder.define_terminal_node(r, |_| {});

        let graph = builder.build().unwrap();
        assert_eq!(graph.len(), 1);
        assert!(graph.nodes()[0].is_terminal());
    }

    #[test]
    fn test_terminal_node_keeps_hooks() {
        let mut builder = GraphBuilder::<(), ()>::new();
        let r = builder.define_terminal_node(builder_ref(0), |n| {
            n.enter(|_| {}).exit(|_| {});
        });

        let graph = builder.build().unwrap();
        let node = &graph.nodes()[r.index()];
        assert!(node.is_terminal());
        assert!(node.has_enter());
        assert!(node.has_exit());
    }

    #[test]
    fn test_caller_reference_advances_counter() {
        let mut builder = GraphBuilder::<(), ()>::new();
        builder.define_terminal_node(builder_ref(3), |_| {});
        assert_eq!(builder.new_reference().index(), 4);
    }

    fn builder_ref(index: usize) -> NodeReference {
        NodeReference::new(index)
    }
}
