//! GraphStore - the thought tree's node and edge collections.
//!
//! The store keeps the tree topology in petgraph's StableGraph, with the
//! thought payloads as node weights, and maintains a spatial index over node
//! positions for hit testing. Every visible mutation bumps a revision counter
//! so the renderer can tell whether its last snapshot is still current.

use log::warn;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};
use std::collections::{HashMap, HashSet};

use super::edge::ThoughtEdge;
use super::node::{NodeId, Position, ThoughtNode};
use crate::error::{ExplorerError, Result};
use crate::spatial::SpatialIndex;

/// The mutable node/edge collections of one run.
///
/// Nodes are only ever appended (in batches, see [`GraphStore::append`]) or
/// dropped all at once by [`GraphStore::reset_with_root`]. Node and edge
/// iteration follow insertion order.
pub struct GraphStore {
    /// The underlying graph structure.
    graph: StableGraph<ThoughtNode, ThoughtEdge, Directed>,

    /// Map from stable NodeId to petgraph NodeIndex
    node_id_to_index: HashMap<NodeId, NodeIndex>,

    /// Spatial index for hit testing
    spatial: SpatialIndex,

    /// Bumped once per visible update
    revision: u64,
}

impl GraphStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            graph: StableGraph::new(),
            node_id_to_index: HashMap::new(),
            spatial: SpatialIndex::new(),
            revision: 0,
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Drop every node and edge and seed the store with a new root.
    pub fn reset_with_root(&mut self, root: ThoughtNode) {
        self.graph.clear();
        self.node_id_to_index.clear();
        self.spatial.clear();
        self.insert_node(root);
        self.revision += 1;
    }

    /// Append a generation of nodes and their edges as one update.
    ///
    /// The whole batch is validated first: node ids must be fresh, every
    /// parent and every edge endpoint must already be in the store or earlier
    /// in the batch. On error the store is left untouched.
    pub fn append(&mut self, nodes: Vec<ThoughtNode>, edges: Vec<ThoughtEdge>) -> Result<()> {
        let mut incoming: HashSet<NodeId> = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if self.contains(node.id) || !incoming.insert(node.id) {
                return Err(ExplorerError::InvalidArgument(format!(
                    "node {} already exists",
                    node.id
                )));
            }
            match node.parent {
                Some(parent) if !self.contains(parent) && !incoming.contains(&parent) => {
                    return Err(ExplorerError::StaleReference(parent));
                }
                None => {
                    return Err(ExplorerError::InvalidArgument(format!(
                        "node {} has no parent; a run has exactly one root",
                        node.id
                    )));
                }
                _ => {}
            }
        }
        for edge in &edges {
            for end in [edge.source(), edge.target()] {
                if !self.contains(end) && !incoming.contains(&end) {
                    return Err(ExplorerError::StaleReference(end));
                }
            }
        }

        self.node_id_to_index.reserve(nodes.len());
        for node in nodes {
            self.insert_node(node);
        }
        for edge in edges {
            let source = self.node_id_to_index[&edge.source()];
            let target = self.node_id_to_index[&edge.target()];
            self.graph.add_edge(source, target, edge);
        }

        self.revision += 1;
        Ok(())
    }

    /// Set a node's position (user drag).
    ///
    /// Returns false, leaving the node where it was, for unknown ids and
    /// non-finite coordinates.
    pub fn set_node_position(&mut self, id: NodeId, position: Position) -> bool {
        if !position.is_finite() {
            warn!("ignoring non-finite position ({}, {}) for {id}", position.x, position.y);
            return false;
        }
        let Some(&index) = self.node_id_to_index.get(&id) else {
            return false;
        };
        let Some(node) = self.graph.node_weight_mut(index) else {
            return false;
        };
        if !self.spatial.relocate(id, node.position, position) {
            warn!("spatial index has no entry for {id}, position unchanged");
            return false;
        }
        node.position = position;
        self.revision += 1;
        true
    }

    fn insert_node(&mut self, node: ThoughtNode) {
        let id = node.id;
        let position = node.position;
        let index = self.graph.add_node(node);
        self.node_id_to_index.insert(id, index);
        self.spatial.insert(id, position);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Check whether a node belongs to the current run.
    pub fn contains(&self, id: NodeId) -> bool {
        self.node_id_to_index.contains_key(&id)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&ThoughtNode> {
        self.node_id_to_index
            .get(&id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    /// The root of the current run, if the store has been seeded.
    pub fn root(&self) -> Option<&ThoughtNode> {
        self.nodes().find(|node| node.is_root())
    }

    /// Get the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Current revision; changes whenever nodes, edges or positions change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ThoughtNode> {
        self.graph
            .node_indices()
            .filter_map(|index| self.graph.node_weight(index))
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &ThoughtEdge> {
        self.graph
            .edge_indices()
            .filter_map(|index| self.graph.edge_weight(index))
    }

    /// Children of a node, oldest first. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> Vec<&ThoughtNode> {
        let Some(&index) = self.node_id_to_index.get(&id) else {
            return Vec::new();
        };
        let mut children: Vec<&ThoughtNode> = self
            .graph
            .neighbors_directed(index, Direction::Outgoing)
            .filter_map(|child| self.graph.node_weight(child))
            .collect();
        children.sort_by_key(|node| node.id);
        children
    }

    /// The chain of nodes from the root down to `id` (inclusive).
    ///
    /// Empty for unknown ids.
    pub fn path_to(&self, id: NodeId) -> Vec<&ThoughtNode> {
        let mut path = Vec::new();
        let mut cursor = self.node(id);
        while let Some(node) = cursor {
            path.push(node);
            cursor = node.parent.and_then(|parent| self.node(parent));
        }
        path.reverse();
        path
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the nearest node within a maximum distance.
    pub fn node_at(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeId> {
        self.spatial.nearest_within(x, y, max_distance)
    }

    /// Find all nodes in a rectangle.
    pub fn nodes_in_rect(&self, min: Position, max: Position) -> Vec<NodeId> {
        self.spatial.in_rect(min, max)
    }

    /// Get the bounding box of all nodes as (min, max) corners.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        let mut nodes = self.nodes();
        let first = nodes.next()?.position;
        let (min, max) = nodes.fold((first, first), |(min, max), node| {
            let p = node.position;
            (
                Position::new(min.x.min(p.x), min.y.min(p.y)),
                Position::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });
        Some((min, max))
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> ThoughtNode {
        ThoughtNode::root(NodeId(1), "Root", Position::new(0.0, 0.0))
    }

    fn child(id: u32, parent: u32, rank: u32, x: f64) -> ThoughtNode {
        ThoughtNode {
            id: NodeId(id),
            position: Position::new(x, 150.0),
            label: format!("Root.{rank}"),
            thought: None,
            score: Some(1.0 / rank as f64),
            rank: Some(rank),
            level: 1,
            parent: Some(NodeId(parent)),
        }
    }

    fn seeded() -> GraphStore {
        let mut store = GraphStore::new();
        store.reset_with_root(root());
        store
    }

    #[test]
    fn test_reset_with_root() {
        let mut store = seeded();
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.root().map(|n| n.id), Some(NodeId(1)));

        let batch = vec![child(2, 1, 1, -10.0)];
        let edges = vec![ThoughtEdge::link(NodeId(1), &batch[0])];
        store.append(batch, edges).unwrap();

        store.reset_with_root(ThoughtNode::root(NodeId(1), "Again", Position::default()));
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert!(!store.contains(NodeId(2)));
        assert_eq!(store.node(NodeId(1)).map(|n| n.label.as_str()), Some("Again"));
    }

    #[test]
    fn test_append_generation() {
        let mut store = seeded();
        let nodes = vec![child(2, 1, 2, -10.0), child(3, 1, 1, 10.0)];
        let edges = nodes.iter().map(|n| ThoughtEdge::link(NodeId(1), n)).collect();
        let before = store.revision();

        store.append(nodes, edges).unwrap();
        assert_eq!(store.node_count(), 3);
        assert_eq!(store.edge_count(), 2);
        assert_eq!(store.revision(), before + 1);

        let emphasized: Vec<_> = store.edges().filter(|e| e.emphasis).collect();
        assert_eq!(emphasized.len(), 1);
        assert_eq!(emphasized[0].target(), NodeId(3));
    }

    #[test]
    fn test_append_rejects_unknown_parent_without_mutation() {
        let mut store = seeded();
        let nodes = vec![child(2, 1, 1, 0.0), child(3, 99, 2, 0.0)];
        let before = store.revision();

        let err = store.append(nodes, Vec::new()).unwrap_err();
        assert_eq!(err, ExplorerError::StaleReference(NodeId(99)));
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.revision(), before);
    }

    #[test]
    fn test_append_rejects_duplicate_ids() {
        let mut store = seeded();
        let err = store.append(vec![child(1, 1, 1, 0.0)], Vec::new()).unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidArgument(_)));

        let err = store
            .append(vec![child(2, 1, 1, 0.0), child(2, 1, 2, 0.0)], Vec::new())
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidArgument(_)));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_append_rejects_second_root() {
        let mut store = seeded();
        let stray = ThoughtNode::root(NodeId(5), "Stray", Position::default());
        assert!(store.append(vec![stray], Vec::new()).is_err());
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_children_and_path() {
        let mut store = seeded();
        let first = vec![child(2, 1, 1, -10.0), child(3, 1, 2, 10.0)];
        let edges = first.iter().map(|n| ThoughtEdge::link(NodeId(1), n)).collect();
        store.append(first, edges).unwrap();

        let mut grandchild = child(4, 2, 1, -10.0);
        grandchild.level = 2;
        let edge = ThoughtEdge::link(NodeId(2), &grandchild);
        store.append(vec![grandchild], vec![edge]).unwrap();

        let children: Vec<_> = store.children(NodeId(1)).iter().map(|n| n.id).collect();
        assert_eq!(children, vec![NodeId(2), NodeId(3)]);
        assert!(store.children(NodeId(4)).is_empty());
        assert!(store.children(NodeId(42)).is_empty());

        let path: Vec<_> = store.path_to(NodeId(4)).iter().map(|n| n.id).collect();
        assert_eq!(path, vec![NodeId(1), NodeId(2), NodeId(4)]);
        assert!(store.path_to(NodeId(42)).is_empty());
    }

    #[test]
    fn test_set_position_moves_hit_target() {
        let mut store = seeded();
        assert_eq!(store.node_at(1.0, 1.0, 5.0), Some(NodeId(1)));

        assert!(store.set_node_position(NodeId(1), Position::new(300.0, 300.0)));
        assert_eq!(store.node_at(1.0, 1.0, 5.0), None);
        assert_eq!(store.node_at(301.0, 299.0, 5.0), Some(NodeId(1)));
        assert!(!store.set_node_position(NodeId(9), Position::default()));
    }

    #[test]
    fn test_non_finite_drag_keeps_node_hittable() {
        let mut store = seeded();
        let before = store.revision();

        assert!(!store.set_node_position(NodeId(1), Position::new(f64::NAN, 0.0)));
        assert!(!store.set_node_position(NodeId(1), Position::new(0.0, f64::INFINITY)));
        assert_eq!(store.node(NodeId(1)).map(|n| n.position), Some(Position::new(0.0, 0.0)));
        assert_eq!(store.revision(), before);

        assert!(store.set_node_position(NodeId(1), Position::new(50.0, 50.0)));
        assert_eq!(store.node_at(50.0, 50.0, 5.0), Some(NodeId(1)));
        let corner = Position::new(50.0, 50.0);
        assert_eq!(store.bounds(), Some((corner, corner)));
    }

    #[test]
    fn test_bounds() {
        let mut store = GraphStore::new();
        assert_eq!(store.bounds(), None);

        store.reset_with_root(root());
        let nodes = vec![child(2, 1, 1, -120.0), child(3, 1, 2, 80.0)];
        store.append(nodes, Vec::new()).unwrap();

        let (min, max) = store.bounds().unwrap();
        assert_eq!(min, Position::new(-120.0, 0.0));
        assert_eq!(max, Position::new(80.0, 150.0));

        let in_rect = store.nodes_in_rect(Position::new(-200.0, 100.0), Position::new(0.0, 200.0));
        assert_eq!(in_rect, vec![NodeId(2)]);
    }
}
