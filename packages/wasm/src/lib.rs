//! Thought Tree - WASM Module
//!
//! This module provides the tree-of-thoughts expansion engine behind the
//! Thought Tree explorer. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the JS side renders the node and
//! edge lists and forwards clicks and prompt submissions back in.
//!
//! # Architecture
//!
//! - `graph`: Node/edge types and the store (petgraph's StableGraph)
//! - `spatial`: R-tree spatial index for hit testing
//! - `thought`: Pluggable generator/evaluator traits and placeholders
//! - `layout`: Child placement for each new generation
//! - `expand`: One generate → evaluate → place → link step
//! - `schedule`: Auto-solve policy and its run-keyed task queue
//! - `explorer`: The session tying everything together

use log::{warn, Level};
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod expand;
pub mod explorer;
pub mod graph;
pub mod layout;
pub mod schedule;
pub mod spatial;
pub mod thought;

use config::{ExplorerConfig, RawConfig};
use explorer::MockExplorer;
use graph::{NodeId, Position, ThoughtNode};
use schedule::AutoSolvePhase;

/// Initialize the WASM module: console logging and panic forwarding.
#[wasm_bindgen(start)]
pub fn init() {
    let _ = console_log::init_with_level(Level::Debug);
    console_error_panic_hook::set_once();
}

/// Main entry point for the explorer.
///
/// This struct wraps a [`MockExplorer`] session and provides the public API
/// exposed to JavaScript. Times come from `Date.now()`.
#[wasm_bindgen]
pub struct ThoughtTreeWasm {
    explorer: MockExplorer,
}

#[wasm_bindgen]
impl ThoughtTreeWasm {
    /// Create a session from a form config object (`undefined` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Self {
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        Self {
            explorer: MockExplorer::with_mock(parse_config(config), seed),
        }
    }

    // =========================================================================
    // Entry Points
    // =========================================================================

    /// Reset the tree to a new root. Returns the root id.
    #[wasm_bindgen(js_name = onPromptSubmitted)]
    pub fn on_prompt_submitted(&mut self, prompt: &str, config: JsValue) -> String {
        self.explorer
            .on_prompt_submitted(prompt, parse_config(config), js_sys::Date::now())
            .to_string()
    }

    /// Expand a node. Returns false (and changes nothing) for unknown ids.
    #[wasm_bindgen(js_name = onNodeActivated)]
    pub fn on_node_activated(&mut self, node_id: &str) -> bool {
        let Ok(id) = node_id.parse::<NodeId>() else {
            warn!("ignoring activation of malformed node id {node_id:?}");
            return false;
        };
        match self.explorer.on_node_activated(id, js_sys::Date::now()) {
            Ok(_) => true,
            Err(err) => {
                warn!("activation of {id} ignored: {err}");
                false
            }
        }
    }

    /// Run due auto-solve steps. Returns how many expansions happened.
    ///
    /// Call from a timer or the render loop; see `nextDueAt`.
    pub fn tick(&mut self) -> u32 {
        self.explorer.tick(js_sys::Date::now()).len() as u32
    }

    /// `Date.now()` time at which the next auto-solve step is due.
    #[wasm_bindgen(js_name = nextDueAt)]
    pub fn next_due_at(&self) -> Option<f64> {
        self.explorer.next_due_at()
    }

    /// `"idle"`, `"scheduled"` or `"done"`.
    #[wasm_bindgen(js_name = autoSolvePhase)]
    pub fn auto_solve_phase(&self) -> String {
        match self.explorer.auto_solve_phase() {
            AutoSolvePhase::Idle => "idle",
            AutoSolvePhase::Scheduled { .. } => "scheduled",
            AutoSolvePhase::Done => "done",
        }
        .to_string()
    }

    // =========================================================================
    // Graph Access
    // =========================================================================

    /// Node list, `[{ id, position: {x, y}, data: {...} }, ...]`.
    pub fn nodes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.snapshot().nodes)
    }

    /// Edge list, `[{ id, source, target, emphasis }, ...]`.
    pub fn edges(&self) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.snapshot().edges)
    }

    /// Nodes, edges and revision in one object.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.explorer.snapshot())
    }

    /// Changes whenever nodes, edges or positions change.
    pub fn revision(&self) -> f64 {
        self.explorer.store().revision() as f64
    }

    /// Get the number of nodes in the tree.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.explorer.store().node_count() as u32
    }

    /// Get the number of edges in the tree.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.explorer.store().edge_count() as u32
    }

    /// Ids from the root down to `node_id`; empty for unknown ids.
    #[wasm_bindgen(js_name = pathTo)]
    pub fn path_to(&self, node_id: &str) -> Vec<String> {
        node_id
            .parse::<NodeId>()
            .map(|id| ids_of(&self.explorer.path_to(id)))
            .unwrap_or_default()
    }

    /// Ids along the rank-1 chain from the root.
    #[wasm_bindgen(js_name = bestPath)]
    pub fn best_path(&self) -> Vec<String> {
        ids_of(&self.explorer.best_path())
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the node under a click, within `max_distance`.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&self, x: f64, y: f64, max_distance: f64) -> Option<String> {
        self.explorer
            .node_at(x, y, max_distance)
            .map(|id| id.to_string())
    }

    /// Ids of the nodes inside a viewport rectangle.
    #[wasm_bindgen(js_name = nodesInRect)]
    pub fn nodes_in_rect(&self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Vec<String> {
        self.explorer
            .nodes_in_rect(Position::new(min_x, min_y), Position::new(max_x, max_y))
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    /// Set a node's position after a drag.
    #[wasm_bindgen(js_name = setNodePosition)]
    pub fn set_node_position(&mut self, node_id: &str, x: f64, y: f64) -> bool {
        node_id
            .parse::<NodeId>()
            .map(|id| self.explorer.set_node_position(id, Position::new(x, y)))
            .unwrap_or(false)
    }

    /// Get the bounding box of all nodes.
    ///
    /// Returns [min_x, min_y, max_x, max_y].
    #[wasm_bindgen(js_name = getBounds)]
    pub fn get_bounds(&self) -> Option<Vec<f64>> {
        self.explorer
            .bounds()
            .map(|(min, max)| vec![min.x, min.y, max.x, max.y])
    }
}

/// Read a JS form config; anything unreadable means "all defaults".
fn parse_config(config: JsValue) -> ExplorerConfig {
    if config.is_undefined() || config.is_null() {
        return ExplorerConfig::default();
    }
    match serde_wasm_bindgen::from_value::<RawConfig>(config) {
        Ok(raw) => raw.into(),
        Err(err) => {
            warn!("unreadable config, using defaults: {err}");
            ExplorerConfig::default()
        }
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

fn ids_of(nodes: &[&ThoughtNode]) -> Vec<String> {
    nodes.iter().map(|node| node.id.to_string()).collect()
}
