//! ExpansionEngine - one generate → evaluate → place → link step.

use log::debug;

use crate::error::{ExplorerError, Result};
use crate::graph::{GraphStore, IdAllocator, NodeId, ThoughtEdge, ThoughtNode};
use crate::layout::LayoutPlacer;
use crate::thought::{check_ranks, ThoughtEvaluator, ThoughtGenerator};

/// The nodes and edges one expansion appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    /// Node that was expanded.
    pub parent: NodeId,
    /// Level of the new children.
    pub child_level: u32,
    /// New children, in left-to-right placement order.
    pub nodes: Vec<ThoughtNode>,
    /// One edge per child.
    pub edges: Vec<ThoughtEdge>,
}

impl Expansion {
    /// The rank-1 child.
    pub fn best(&self) -> Option<&ThoughtNode> {
        self.nodes.iter().find(|node| node.is_best())
    }
}

/// Orchestrates expansion steps against a store.
///
/// Generation and evaluation are delegated to the pluggable `G` and `E`.
/// Children are placed in the order the evaluator returns them, which need
/// not be rank order.
pub struct ExpansionEngine<G, E> {
    generator: G,
    evaluator: E,
    placer: LayoutPlacer,
    breadth: usize,
}

impl<G: ThoughtGenerator, E: ThoughtEvaluator> ExpansionEngine<G, E> {
    /// Create an engine producing `breadth` children per step.
    pub fn new(generator: G, evaluator: E, placer: LayoutPlacer, breadth: usize) -> Self {
        Self {
            generator,
            evaluator,
            placer,
            breadth,
        }
    }

    /// Apply new breadth and layout settings for subsequent steps.
    pub fn reconfigure(&mut self, breadth: usize, placer: LayoutPlacer) {
        self.breadth = breadth;
        self.placer = placer;
    }

    /// Expand `parent`, appending a full generation of children to `store`.
    ///
    /// Either the whole generation becomes visible in one store update or,
    /// on error, neither the store nor `ids` is touched.
    pub fn expand(
        &mut self,
        store: &mut GraphStore,
        ids: &mut IdAllocator,
        parent: NodeId,
    ) -> Result<Expansion> {
        let parent_node = store
            .node(parent)
            .ok_or(ExplorerError::StaleReference(parent))?;
        let label = parent_node.label.clone();
        let origin = parent_node.position;
        let child_level = parent_node.level + 1;

        let candidates = self.generator.generate(&label, self.breadth)?;
        let thoughts = self.evaluator.evaluate(candidates)?;
        check_ranks(&thoughts, self.breadth)?;
        let positions = self.placer.place(origin, parent_node.level, thoughts.len());

        let mut next_ids = ids.clone();
        let nodes: Vec<ThoughtNode> = thoughts
            .into_iter()
            .zip(positions)
            .map(|(thought, position)| ThoughtNode {
                id: next_ids.next(),
                position,
                label: thought.label,
                thought: Some(thought.text),
                score: Some(thought.score),
                rank: Some(thought.rank),
                level: child_level,
                parent: Some(parent),
            })
            .collect();
        let edges: Vec<ThoughtEdge> = nodes
            .iter()
            .map(|node| ThoughtEdge::link(parent, node))
            .collect();

        store.append(nodes.clone(), edges.clone())?;
        *ids = next_ids;

        debug!(
            "expanded {parent} ({label}) into {} children at level {child_level}",
            nodes.len()
        );
        Ok(Expansion {
            parent,
            child_level,
            nodes,
            edges,
        })
    }
}
