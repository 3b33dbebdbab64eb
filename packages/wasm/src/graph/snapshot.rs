//! Serializable views of the store, shaped for the JS renderer.
//!
//! Nodes follow the `{ id, position, data }` layout flow-chart renderers
//! expect; ids are strings.

use serde::Serialize;

use super::edge::{EdgeId, ThoughtEdge};
use super::node::{NodeId, Position, ThoughtNode};
use super::store::GraphStore;

/// Display payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Display label.
    pub label: String,
    /// Generated thought text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    /// Evaluator score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Rank among siblings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    /// Depth from the root.
    pub level: u32,
    /// Owning node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
}

/// A node as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    /// Node id.
    pub id: NodeId,
    /// Placement.
    pub position: Position,
    /// Display payload.
    pub data: NodeData,
}

impl From<&ThoughtNode> for NodeView {
    fn from(node: &ThoughtNode) -> Self {
        Self {
            id: node.id,
            position: node.position,
            data: NodeData {
                label: node.label.clone(),
                thought: node.thought.clone(),
                score: node.score,
                rank: node.rank,
                level: node.level,
                parent_id: node.parent,
            },
        }
    }
}

/// An edge as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeView {
    /// `e{source}-{target}`.
    pub id: EdgeId,
    /// Parent id.
    pub source: NodeId,
    /// Child id.
    pub target: NodeId,
    /// Link to the best-ranked child.
    pub emphasis: bool,
}

impl From<&ThoughtEdge> for EdgeView {
    fn from(edge: &ThoughtEdge) -> Self {
        Self {
            id: edge.id,
            source: edge.source(),
            target: edge.target(),
            emphasis: edge.emphasis,
        }
    }
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    /// Store revision the snapshot was taken at.
    pub revision: u64,
    /// Nodes in insertion order.
    pub nodes: Vec<NodeView>,
    /// Edges in insertion order.
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    /// Capture the current contents of a store.
    pub fn capture(store: &GraphStore) -> Self {
        Self {
            revision: store.revision(),
            nodes: store.nodes().map(NodeView::from).collect(),
            edges: store.edges().map(EdgeView::from).collect(),
        }
    }
}
