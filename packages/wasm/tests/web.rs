//! Browser tests for the JS-facing API. Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use thought_tree_wasm::ThoughtTreeWasm;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn form(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

#[wasm_bindgen_test]
fn new_session_has_single_root() {
    let tree = ThoughtTreeWasm::new(JsValue::UNDEFINED);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.edge_count(), 0);
    assert_eq!(tree.best_path(), vec!["1".to_string()]);
}

#[wasm_bindgen_test]
fn activation_appends_one_generation() {
    let mut tree = ThoughtTreeWasm::new(form(r#"{"breadth": 3, "autoSolve": false}"#));
    let before = tree.revision();

    assert!(tree.on_node_activated("1"));
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.edge_count(), 3);
    assert!(tree.revision() > before);

    assert!(!tree.on_node_activated("99"));
    assert!(!tree.on_node_activated("not-an-id"));
    assert_eq!(tree.node_count(), 4);
}

#[wasm_bindgen_test]
fn prompt_submission_resets_and_coerces_config() {
    let mut tree = ThoughtTreeWasm::new(JsValue::UNDEFINED);
    tree.on_node_activated("1");

    let root = tree.on_prompt_submitted("Make 24", form(r#"{"breadth": "0", "autoSolve": false}"#));
    assert_eq!(root, "1");
    assert_eq!(tree.node_count(), 1);

    // Breadth "0" was coerced to one child.
    assert!(tree.on_node_activated("1"));
    assert_eq!(tree.node_count(), 2);
}

#[wasm_bindgen_test]
fn auto_solve_schedules_next_step() {
    let mut tree = ThoughtTreeWasm::new(JsValue::UNDEFINED);
    tree.on_prompt_submitted(
        "",
        form(r#"{"breadth": 2, "autoSolve": true, "maxDepth": 2, "autoSolveDelayMs": 60000}"#),
    );
    assert_eq!(tree.auto_solve_phase(), "scheduled");
    assert!(tree.next_due_at().is_some());
    assert_eq!(tree.tick(), 0);
}

#[wasm_bindgen_test]
fn snapshot_serializes_to_plain_objects() {
    let mut tree = ThoughtTreeWasm::new(JsValue::UNDEFINED);
    tree.on_node_activated("1");

    let nodes = tree.nodes().unwrap();
    let nodes = js_sys::Array::from(&nodes);
    assert_eq!(nodes.length(), 4);

    let root = nodes.get(0);
    let id = js_sys::Reflect::get(&root, &JsValue::from_str("id")).unwrap();
    assert_eq!(id.as_string().as_deref(), Some("1"));
    let data = js_sys::Reflect::get(&root, &JsValue::from_str("data")).unwrap();
    let label = js_sys::Reflect::get(&data, &JsValue::from_str("label")).unwrap();
    assert_eq!(label.as_string().as_deref(), Some("Root"));

    let bounds = tree.get_bounds().unwrap();
    assert_eq!(bounds.len(), 4);
    let visible = tree.nodes_in_rect(bounds[0], bounds[1], bounds[2], bounds[3]);
    assert_eq!(visible.len(), 4);
}

#[wasm_bindgen_test]
fn non_finite_drag_is_rejected() {
    let mut tree = ThoughtTreeWasm::new(JsValue::UNDEFINED);
    assert!(!tree.set_node_position("1", f64::NAN, 0.0));
    assert!(tree.set_node_position("1", 50.0, 50.0));
    assert_eq!(tree.node_at(50.0, 50.0, 5.0).as_deref(), Some("1"));
}
