//! ThoughtExplorer - the session object behind the renderer.
//!
//! Owns the store, the id allocator, the expansion engine, the auto-solve
//! controller and the current [`RunId`]. The renderer talks to it through
//! two entry points, [`ThoughtExplorer::on_node_activated`] and
//! [`ThoughtExplorer::on_prompt_submitted`], plus [`ThoughtExplorer::tick`]
//! to let scheduled auto-solve steps run.
//!
//! All mutation goes through `&mut self`, so expansions, resets and ticks are
//! serialized and each expansion is applied as one unit.

use log::{debug, info, warn};

use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::expand::{Expansion, ExpansionEngine};
use crate::graph::{
    GraphSnapshot, GraphStore, IdAllocator, NodeId, Position, ThoughtNode, FIRST_NODE_ID,
};
use crate::layout::LayoutPlacer;
use crate::schedule::{AutoSolveController, AutoSolvePhase, RunId, ScheduledExpansion};
use crate::thought::{MockEvaluator, MockGenerator, ThoughtEvaluator, ThoughtGenerator};

/// Explorer wired to the placeholder generator and evaluator.
pub type MockExplorer = ThoughtExplorer<MockGenerator, MockEvaluator>;

/// One interactive tree-of-thoughts session.
pub struct ThoughtExplorer<G, E> {
    config: ExplorerConfig,
    store: GraphStore,
    ids: IdAllocator,
    engine: ExpansionEngine<G, E>,
    auto_solve: AutoSolveController,
    run: RunId,
}

impl MockExplorer {
    /// Create a session using the placeholders, scoring from `seed`.
    pub fn with_mock(config: ExplorerConfig, seed: u64) -> Self {
        Self::new(config, MockGenerator, MockEvaluator::seeded(seed))
    }
}

impl<G: ThoughtGenerator, E: ThoughtEvaluator> ThoughtExplorer<G, E> {
    /// Create a session and its first root. Nothing is scheduled yet.
    pub fn new(config: ExplorerConfig, generator: G, evaluator: E) -> Self {
        let config = config.sanitized();
        let engine = ExpansionEngine::new(
            generator,
            evaluator,
            LayoutPlacer::new(config.layout),
            config.breadth,
        );
        let mut explorer = Self {
            auto_solve: AutoSolveController::new(&config),
            config,
            store: GraphStore::new(),
            ids: IdAllocator::new(),
            engine,
            run: RunId::default(),
        };
        explorer.start_run();
        explorer
    }

    // =========================================================================
    // Entry Points
    // =========================================================================

    /// Reset the tree to a single root labelled with `prompt` and apply
    /// `config`. With auto-solve on, the root is scheduled for expansion.
    ///
    /// Returns the new root's id.
    pub fn on_prompt_submitted(
        &mut self,
        prompt: &str,
        config: ExplorerConfig,
        now_ms: f64,
    ) -> NodeId {
        let config = ExplorerConfig {
            prompt_text: prompt.to_string(),
            ..config
        }
        .sanitized();

        self.engine
            .reconfigure(config.breadth, LayoutPlacer::new(config.layout));
        self.auto_solve.reconfigure(&config);
        self.config = config;

        let root = self.start_run();
        info!(
            "{}: new root {root} \"{}\" (breadth {}, auto-solve {}, max depth {})",
            self.run,
            self.config.root_label(),
            self.config.breadth,
            self.config.auto_solve,
            self.config.max_depth
        );
        if self.auto_solve.is_enabled() {
            self.auto_solve.schedule(self.run, root, now_ms);
        }
        root
    }

    /// Expand `id` (a user click). Unknown ids yield `StaleReference` and
    /// leave the tree unchanged.
    pub fn on_node_activated(&mut self, id: NodeId, now_ms: f64) -> Result<Expansion> {
        debug!("{}: node {id} activated", self.run);
        self.expand_and_decide(id, now_ms)
    }

    /// Run every scheduled expansion due at `now_ms`, including ones that
    /// become due as a result. Stale tasks are discarded.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Expansion> {
        let mut done = Vec::new();
        while let Some(task) = self.auto_solve.pop_due(now_ms) {
            match self.run_scheduled(task, now_ms) {
                Ok(expansion) => done.push(expansion),
                Err(err) if err.is_stale() => debug!("auto-solve: discarded, {err}"),
                Err(err) => warn!("auto-solve: expansion of {} failed: {err}", task.target),
            }
        }
        done
    }

    /// When the next scheduled expansion becomes due.
    pub fn next_due_at(&self) -> Option<f64> {
        self.auto_solve.next_due_at()
    }

    fn run_scheduled(&mut self, task: ScheduledExpansion, now_ms: f64) -> Result<Expansion> {
        task.ensure_run(self.run)?;
        self.expand_and_decide(task.target, now_ms)
    }

    fn expand_and_decide(&mut self, id: NodeId, now_ms: f64) -> Result<Expansion> {
        let expansion = self.engine.expand(&mut self.store, &mut self.ids, id)?;
        let best = expansion.best().map(|node| node.id);
        self.auto_solve
            .after_expansion(self.run, expansion.child_level, best, now_ms);
        Ok(expansion)
    }

    /// Clear the store, reset ids, cancel pending work and seed a new root,
    /// all as one step.
    fn start_run(&mut self) -> NodeId {
        self.run = self.run.next();
        self.auto_solve.cancel_all();
        self.ids.reset(FIRST_NODE_ID);
        let root_id = self.ids.next();
        let root = ThoughtNode::root(root_id, self.config.root_label(), Position::default());
        self.store.reset_with_root(root);
        root_id
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Configuration of the current run.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Identity of the current run.
    pub fn run(&self) -> RunId {
        self.run
    }

    /// The node/edge collections.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Root of the current run.
    pub fn root(&self) -> Option<&ThoughtNode> {
        self.store.root()
    }

    /// Current auto-solve phase.
    pub fn auto_solve_phase(&self) -> AutoSolvePhase {
        self.auto_solve.phase()
    }

    /// Serializable view for the renderer.
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::capture(&self.store)
    }

    /// Ancestry chain root..=id.
    pub fn path_to(&self, id: NodeId) -> Vec<&ThoughtNode> {
        self.store.path_to(id)
    }

    /// Follow the newest rank-1 child from the root down to a leaf.
    pub fn best_path(&self) -> Vec<&ThoughtNode> {
        let mut path = Vec::new();
        let mut cursor = self.store.root();
        while let Some(node) = cursor {
            path.push(node);
            cursor = self
                .store
                .children(node.id)
                .into_iter()
                .filter(|child| child.is_best())
                .max_by_key(|child| child.id);
        }
        path
    }

    /// Nearest node to a click within `max_distance`.
    pub fn node_at(&self, x: f64, y: f64, max_distance: f64) -> Option<NodeId> {
        self.store.node_at(x, y, max_distance)
    }

    /// Nodes inside the rectangle spanned by two corners, for viewport culling.
    pub fn nodes_in_rect(&self, min: Position, max: Position) -> Vec<NodeId> {
        self.store.nodes_in_rect(min, max)
    }

    /// Bounding box of the tree.
    pub fn bounds(&self) -> Option<(Position, Position)> {
        self.store.bounds()
    }

    /// Move a node after a user drag. Returns false for unknown ids and
    /// non-finite coordinates.
    pub fn set_node_position(&mut self, id: NodeId, position: Position) -> bool {
        self.store.set_node_position(id, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;

    fn config(breadth: usize, auto_solve: bool, max_depth: u32) -> ExplorerConfig {
        ExplorerConfig {
            breadth,
            auto_solve,
            max_depth,
            auto_solve_delay_ms: 100.0,
            ..ExplorerConfig::default()
        }
    }

    #[test]
    fn test_new_session_has_single_root() {
        let explorer = MockExplorer::with_mock(ExplorerConfig::default(), 1);
        let root = explorer.root().unwrap();
        assert_eq!(root.id, NodeId(1));
        assert_eq!(root.label, "Root");
        assert_eq!(root.position, Position::new(0.0, 0.0));
        assert_eq!(explorer.store().node_count(), 1);
        assert_eq!(explorer.store().edge_count(), 0);
        assert_eq!(explorer.run(), RunId(1));
        assert_eq!(explorer.auto_solve_phase(), AutoSolvePhase::Idle);
        assert_eq!(explorer.next_due_at(), None);
    }

    #[test]
    fn test_wide_breadth_is_honoured() {
        let mut explorer = MockExplorer::with_mock(config(100, false, 3), 6);
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        assert_eq!(out.nodes.len(), 100);
        assert_eq!(explorer.store().node_count(), 101);

        let mut ranks: Vec<_> = out.nodes.iter().filter_map(|n| n.rank).collect();
        ranks.sort();
        assert_eq!(ranks, (1..=100).collect::<Vec<u32>>());
    }

    #[test]
    fn test_prompt_applies_new_policy_and_drops_old_tasks() {
        let mut explorer = MockExplorer::with_mock(config(2, false, 3), 9);
        explorer.on_prompt_submitted("first", config(2, true, 3), 0.0);
        assert!(explorer.next_due_at().is_some());

        explorer.on_prompt_submitted("second", config(4, false, 2), 50.0);
        assert_eq!(explorer.config().breadth, 4);
        assert!(!explorer.config().auto_solve);
        assert_eq!(explorer.auto_solve_phase(), AutoSolvePhase::Idle);
        assert!(explorer.tick(1_000.0).is_empty());

        let out = explorer.on_node_activated(NodeId(1), 1_000.0).unwrap();
        assert_eq!(out.nodes.len(), 4);
        assert_eq!(explorer.next_due_at(), None);
    }

    #[test]
    fn test_nodes_in_rect_covers_one_generation() {
        let mut explorer = MockExplorer::with_mock(config(3, false, 3), 2);
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();

        let mut found = explorer.nodes_in_rect(
            Position::new(-1_000.0, 100.0),
            Position::new(1_000.0, 200.0),
        );
        found.sort();
        let mut expected: Vec<_> = out.nodes.iter().map(|n| n.id).collect();
        expected.sort();
        assert_eq!(found, expected);
        assert!(explorer
            .nodes_in_rect(Position::new(-10.0, -10.0), Position::new(10.0, 10.0))
            .contains(&NodeId(1)));
    }

    #[test]
    fn test_activation_expands() {
        let mut explorer = MockExplorer::with_mock(config(3, false, 3), 1);
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        assert_eq!(out.nodes.len(), 3);
        assert_eq!(explorer.store().node_count(), 4);
        assert_eq!(explorer.next_due_at(), None);
        assert_eq!(explorer.auto_solve_phase(), AutoSolvePhase::Done);
    }

    #[test]
    fn test_activating_unknown_node_is_a_noop() {
        let mut explorer = MockExplorer::with_mock(config(3, true, 3), 1);
        let revision = explorer.store().revision();
        let err = explorer.on_node_activated(NodeId(50), 0.0).unwrap_err();
        assert_eq!(err, ExplorerError::StaleReference(NodeId(50)));
        assert_eq!(explorer.store().revision(), revision);
        assert_eq!(explorer.next_due_at(), None);
    }

    #[test]
    fn test_prompt_submission_resets_everything() {
        let mut explorer = MockExplorer::with_mock(config(2, false, 3), 1);
        explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        explorer.on_node_activated(NodeId(2), 0.0).unwrap();
        assert_eq!(explorer.store().node_count(), 5);

        let root = explorer.on_prompt_submitted("Make 24", config(2, false, 3), 10.0);
        assert_eq!(root, NodeId(1));
        assert_eq!(explorer.run(), RunId(2));
        assert_eq!(explorer.store().node_count(), 1);
        assert_eq!(explorer.store().edge_count(), 0);
        assert_eq!(explorer.root().map(|n| n.label.as_str()), Some("Make 24"));

        // Fresh allocator: the next generation starts at 2 again.
        let out = explorer.on_node_activated(root, 20.0).unwrap();
        let mut ids: Vec<_> = out.nodes.iter().map(|n| n.id).collect();
        ids.sort();
        assert_eq!(ids, vec![NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_prompt_submission_applies_new_breadth() {
        let mut explorer = MockExplorer::with_mock(config(3, false, 3), 1);
        explorer.on_prompt_submitted("", config(5, false, 3), 0.0);
        assert_eq!(explorer.root().map(|n| n.label.as_str()), Some("Root"));
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        assert_eq!(out.nodes.len(), 5);
    }

    #[test]
    fn test_auto_solve_waits_for_delay() {
        let mut explorer = MockExplorer::with_mock(config(2, false, 3), 1);
        explorer.on_prompt_submitted("", config(2, true, 3), 1_000.0);
        assert_eq!(explorer.next_due_at(), Some(1_100.0));
        assert!(matches!(
            explorer.auto_solve_phase(),
            AutoSolvePhase::Scheduled { target: NodeId(1), .. }
        ));

        assert!(explorer.tick(1_099.0).is_empty());
        assert_eq!(explorer.store().node_count(), 1);

        let fired = explorer.tick(1_100.0);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].parent, NodeId(1));
        assert_eq!(explorer.store().node_count(), 3);

        let best = fired[0].best().unwrap().id;
        assert_eq!(explorer.next_due_at(), Some(1_200.0));
        assert!(matches!(
            explorer.auto_solve_phase(),
            AutoSolvePhase::Scheduled { target, .. } if target == best
        ));
    }

    #[test]
    fn test_reset_cancels_pending_auto_solve() {
        let mut explorer = MockExplorer::with_mock(config(2, false, 3), 1);
        explorer.on_prompt_submitted("first", config(2, true, 3), 0.0);
        explorer.tick(100.0);
        assert_eq!(explorer.store().node_count(), 3);
        assert!(explorer.next_due_at().is_some());

        explorer.on_prompt_submitted("second", config(2, false, 3), 150.0);
        assert_eq!(explorer.next_due_at(), None);
        assert!(explorer.tick(10_000.0).is_empty());
        assert_eq!(explorer.store().node_count(), 1);
        assert_eq!(explorer.root().map(|n| n.label.as_str()), Some("second"));
    }

    #[test]
    fn test_stale_task_from_previous_run_is_discarded() {
        let mut explorer = MockExplorer::with_mock(config(2, true, 3), 1);
        // A task that survived a reset: same node id, older run.
        let stale = ScheduledExpansion {
            run: RunId(0),
            target: NodeId(1),
            due_at_ms: 0.0,
        };
        let err = explorer.run_scheduled(stale, 0.0).unwrap_err();
        assert!(matches!(err, ExplorerError::SchedulingRace { .. }));
        assert_eq!(explorer.store().node_count(), 1);
        assert_eq!(explorer.next_due_at(), None);
    }

    #[test]
    fn test_manual_expansion_with_auto_solve_schedules_best_child() {
        let mut explorer = MockExplorer::with_mock(config(3, true, 3), 4);
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        let best = out.best().unwrap().id;
        assert!(matches!(
            explorer.auto_solve_phase(),
            AutoSolvePhase::Scheduled { target, .. } if target == best
        ));
    }

    #[test]
    fn test_best_path_follows_rank_one() {
        let mut explorer = MockExplorer::with_mock(config(3, false, 3), 9);
        let first = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        let best = first.best().unwrap().id;
        let second = explorer.on_node_activated(best, 0.0).unwrap();
        let best_grandchild = second.best().unwrap().id;

        let path: Vec<_> = explorer.best_path().iter().map(|n| n.id).collect();
        assert_eq!(path, vec![NodeId(1), best, best_grandchild]);

        let ancestry: Vec<_> = explorer.path_to(best_grandchild).iter().map(|n| n.id).collect();
        assert_eq!(ancestry, path);
    }

    #[test]
    fn test_drag_and_hit_test() {
        let mut explorer = MockExplorer::with_mock(config(1, false, 3), 1);
        let out = explorer.on_node_activated(NodeId(1), 0.0).unwrap();
        let child = out.nodes[0].id;

        assert_eq!(explorer.node_at(0.0, 148.0, 10.0), Some(child));
        assert!(explorer.set_node_position(child, Position::new(400.0, 400.0)));
        assert_eq!(explorer.node_at(401.0, 400.0, 10.0), Some(child));
        assert_eq!(
            explorer.bounds(),
            Some((Position::new(0.0, 0.0), Position::new(400.0, 400.0)))
        );
    }
}
