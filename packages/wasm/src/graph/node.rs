//! Node type and related structures.
//!
//! Nodes are the thoughts in the tree. Each node has:
//! - A stable unique identifier (unique within one run)
//! - Position (x, y) in graph space
//! - Label, optional thought text, score and rank
//! - Level (depth from the root) and the id of its parent

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable node identifier.
///
/// Rendered as a decimal string at the JS boundary (`"1"`, `"2"`, ...).
/// It wraps a u32 for efficient storage and WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(NodeId)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A point in graph space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A thought in the tree.
///
/// Everything except `position` is fixed at creation; the engine only ever
/// appends new nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct ThoughtNode {
    /// Identifier, unique within the run.
    pub id: NodeId,
    /// Placement in graph space.
    pub position: Position,
    /// Display label, e.g. `Root.2.1`.
    pub label: String,
    /// Generated thought text. `None` for the root.
    pub thought: Option<String>,
    /// Evaluator score. `None` for the root.
    pub score: Option<f64>,
    /// Dense rank among the siblings generated with it, 1 = best.
    pub rank: Option<u32>,
    /// Depth from the root (root = 0).
    pub level: u32,
    /// Owning node, set for every non-root node.
    pub parent: Option<NodeId>,
}

impl ThoughtNode {
    /// Create a root node (level 0, no parent, unscored).
    pub fn root(id: NodeId, label: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            position,
            label: label.into(),
            thought: None,
            score: None,
            rank: None,
            level: 0,
            parent: None,
        }
    }

    /// Check whether this is the root of its run.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Check whether this node was ranked best among its siblings.
    #[inline]
    pub fn is_best(&self) -> bool {
        self.rank == Some(1)
    }
}
