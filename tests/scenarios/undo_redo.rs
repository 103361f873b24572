/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use crate::harness::{TestHarness, chain_document};
use euclid::default::Point3D;
use skillgraph::config::EditorConfig;
use skillgraph::{GraphIntent, NodePatch, RelationshipKind, SkillGraphEditor};

#[test]
fn undo_then_redo_restores_each_step() {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    let start = harness.editor.graph().clone();

    harness
        .editor
        .add_relationship("a", "b", RelationshipKind::Requires);
    let linked = harness.editor.graph().clone();
    harness.editor.update_node_id("b", "bee");
    let renamed = harness.editor.graph().clone();

    assert!(harness.editor.undo());
    assert_eq!(harness.editor.graph(), &linked);
    assert!(harness.editor.undo());
    assert_eq!(harness.editor.graph(), &start);
    assert!(!harness.editor.undo());

    assert!(harness.editor.redo());
    assert!(harness.editor.redo());
    assert_eq!(harness.editor.graph(), &renamed);
    assert!(!harness.editor.redo());
}

#[test]
fn new_edit_discards_redo() {
    let mut harness = TestHarness::with_nodes(&["a"]);
    harness
        .editor
        .update_node("a", &NodePatch::default().display_name("One"));
    harness.editor.undo();
    assert!(harness.editor.can_redo());

    harness
        .editor
        .update_node("a", &NodePatch::default().display_name("Two"));

    assert!(!harness.editor.can_redo());
    assert_eq!(harness.node("a").display_name, "Two");
}

#[test]
fn rejected_operations_leave_history_alone() {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    harness.editor.update_node_id("a", "b");
    harness.editor.update_node_id("ghost", "c");
    harness.editor.remove_node("ghost");
    harness
        .editor
        .remove_relationship("a", "b", RelationshipKind::Conflicts);
    harness.editor.update_change("a", 0, &Default::default());
    assert_eq!(harness.editor.undo_len(), 0);
}

#[test]
fn history_is_capped() {
    let config = EditorConfig {
        max_undo_steps: 3,
        ..EditorConfig::default()
    };
    let mut editor = SkillGraphEditor::new_in_memory(config);
    for _ in 0..5 {
        editor.add_node();
    }
    assert_eq!(editor.undo_len(), 3);
    while editor.undo() {}
    assert_eq!(editor.graph().node_count(), 2);
}

#[test]
fn import_is_one_undo_step() {
    let mut harness = TestHarness::with_nodes(&["old"]);
    harness.import(chain_document());
    assert_eq!(harness.ids(), vec!["root", "mid", "leaf"]);

    harness.editor.apply_intents([GraphIntent::Undo]);
    assert_eq!(harness.ids(), vec!["old"]);
}

#[test]
fn undo_drops_vanished_ids_from_selection() {
    let mut harness = TestHarness::with_nodes(&["a"]);
    let added = harness.editor.add_node();
    harness.editor.select_node(Some("a"), true);
    assert_eq!(harness.selected(), vec![added.clone(), "a".to_string()]);

    harness.editor.undo();

    assert_eq!(harness.selected(), vec!["a".to_string()]);
    harness.assert_transient_state_consistent();
}

#[test]
fn add_move_undo_redo_round_trips_position() {
    let mut harness = TestHarness::new();
    let id = harness.editor.add_node();
    assert_eq!(harness.node(&id).position, Point3D::new(0.0, 2.0, 0.0));

    harness
        .editor
        .update_node(&id, &NodePatch::default().x(10.0).y(10.0).z(10.0));
    assert_eq!(harness.node(&id).position, Point3D::new(10.0, 10.0, 10.0));

    assert!(harness.editor.undo());
    assert_eq!(harness.node(&id).position, Point3D::new(0.0, 2.0, 0.0));

    assert!(harness.editor.redo());
    assert_eq!(harness.node(&id).position, Point3D::new(10.0, 10.0, 10.0));
}

#[test]
fn long_edit_chain_undoes_back_to_start() {
    let mut harness = TestHarness::with_nodes(&["a"]);
    let start = harness.editor.graph().clone();

    for step in 0..200_i64 {
        harness
            .editor
            .update_node("a", &NodePatch::default().cost(step + 2));
    }
    assert_eq!(harness.editor.undo_len(), 200);

    for _ in 0..200 {
        assert!(harness.editor.undo());
    }
    assert!(!harness.editor.can_undo());
    assert_eq!(harness.editor.graph(), &start);
    assert_eq!(harness.node("a").cost, 1);
}
