//! Graph data structures and operations.
//!
//! This module provides the thought tree's storage using petgraph's
//! StableGraph, the node/edge types, the id allocator, and the serializable
//! snapshots handed to the renderer.

mod edge;
mod ids;
mod node;
mod snapshot;
mod store;

pub use edge::{EdgeId, ThoughtEdge};
pub use ids::{IdAllocator, FIRST_NODE_ID};
pub use node::{NodeId, Position, ThoughtNode};
pub use snapshot::{EdgeView, GraphSnapshot, NodeData, NodeView};
pub use store::GraphStore;
