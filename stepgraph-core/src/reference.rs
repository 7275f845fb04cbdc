//! Node identity.

use serde::Serialize;
use std::fmt;

/// Opaque, totally ordered identifier for a node.
///
/// References are minted by [`GraphBuilder::new_reference`](crate::GraphBuilder::new_reference)
/// and are plain `Copy` values, so step closures capture them by value when
/// they need to jump to a node that has not been defined yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeReference(usize);

impl NodeReference {
    /// Placeholder that never identifies a node of a built graph.
    pub const UNINITIALIZED: NodeReference = NodeReference(usize::MAX);

    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in the built graph.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Returns true for the [`UNINITIALIZED`](Self::UNINITIALIZED) placeholder.
    pub fn is_uninitialized(&self) -> bool {
        *self == Self::UNINITIALIZED
    }
}

impl Default for NodeReference {
    fn default() -> Self {
        Self::UNINITIALIZED
    }
}

impl fmt::Display for NodeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_uninitialized() {
            f.write_str("#uninitialized")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_by_index() {
        let a = NodeReference::new(1);
        let b = NodeReference::new(4);
        assert!(a < b);
        assert_eq!(a, NodeReference::new(1));
        assert_eq!(b.index(), 4);

        let mut refs = vec![b, NodeReference::new(0), a];
        refs.sort();
        assert_eq!(
            refs.iter().map(NodeReference::index).collect::<Vec<_>>(),
            vec![0, 1, 4]
        );
    }

    #[test]
    fn test_uninitialized_default() {
        let r = NodeReference::default();
        assert!(r.is_uninitialized());
        assert!(!NodeReference::new(0).is_uninitialized());
        assert_eq!(r.to_string(), "#uninitialized");
        assert_eq!(NodeReference::new(7).to_string(), "#7");
    }
}
