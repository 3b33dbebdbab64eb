//! Edge type and related structures.
//!
//! Edges are the parent → child links of the thought tree. Each edge has:
//! - An identifier derived from its endpoints
//! - Source and target node IDs
//! - An emphasis flag marking the link to the best-ranked child

use std::fmt;

use serde::{Serialize, Serializer};

use super::node::{NodeId, ThoughtNode};

/// Stable edge identifier.
///
/// Derived from the (parent, child) pair, so the same link always has the
/// same id. Rendered as `e{parent}-{child}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId {
    /// Parent end.
    pub source: NodeId,
    /// Child end.
    pub target: NodeId,
}

impl EdgeId {
    /// Create the id for the link `source → target`.
    #[inline]
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}-{}", self.source, self.target)
    }
}

impl Serialize for EdgeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A parent → child link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThoughtEdge {
    /// Identifier derived from the endpoints.
    pub id: EdgeId,
    /// True iff the target is ranked 1 among its siblings.
    pub emphasis: bool,
}

impl ThoughtEdge {
    /// Link a parent to a freshly created child.
    pub fn link(parent: NodeId, child: &ThoughtNode) -> Self {
        Self {
            id: EdgeId::new(parent, child.id),
            emphasis: child.is_best(),
        }
    }

    /// Source (parent) node.
    #[inline]
    pub fn source(&self) -> NodeId {
        self.id.source
    }

    /// Target (child) node.
    #[inline]
    pub fn target(&self) -> NodeId {
        self.id.target
    }
}
