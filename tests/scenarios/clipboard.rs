/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point3D;

use crate::harness::{TestHarness, chain_document};
use skillgraph::config::EditorConfig;
use skillgraph::selection::SelectionUpdateMode;
use skillgraph::{GraphIntent, SkillGraphEditor};

#[test]
fn paste_duplicates_selection_with_internal_links() {
    let mut harness = TestHarness::new();
    harness.import(chain_document());
    harness
        .editor
        .update_selection(
            vec!["mid".into(), "leaf".into()],
            SelectionUpdateMode::Replace,
        );
    harness.editor.apply_intents([GraphIntent::CopySelection, GraphIntent::Paste]);

    let pasted = harness.selected();
    assert_eq!(pasted.len(), 2);
    assert_eq!(harness.ids().len(), 5);

    let mid_copy = harness.node(&pasted[0]);
    let leaf_copy = harness.node(&pasted[1]);
    assert_eq!(mid_copy.display_name, "Mid");
    assert_eq!(mid_copy.requires, vec!["root".to_string()]);
    assert_eq!(leaf_copy.requires, vec![mid_copy.id.clone()]);
    assert_eq!(leaf_copy.conflicts, vec!["root".to_string()]);
    assert_eq!(leaf_copy.position, Point3D::new(5.0, 0.0, 1.0));
}

#[test]
fn paste_twice_yields_distinct_ids() {
    let mut harness = TestHarness::with_nodes(&["a"]);
    harness.editor.select_node(Some("a"), false);
    assert_eq!(harness.editor.copy_selection(), 1);

    let first = harness.editor.paste();
    let second = harness.editor.paste();

    assert_ne!(first, second);
    assert_eq!(harness.ids().len(), 3);
    assert_eq!(harness.editor.undo_len(), 2);
}

#[test]
fn paste_offset_comes_from_config() {
    let config = EditorConfig {
        paste_offset: [0.0, 5.0, 0.0],
        ..EditorConfig::default()
    };
    let mut editor = SkillGraphEditor::new_in_memory(config);
    let id = editor.add_node();
    editor.copy_selection();

    let pasted = editor.paste();

    assert_eq!(
        editor.position_of(&pasted[0]),
        Some(Point3D::new(0.0, 7.0, 0.0))
    );
    assert_eq!(editor.position_of(&id), Some(Point3D::new(0.0, 2.0, 0.0)));
}

#[test]
fn empty_clipboard_paste_is_a_noop() {
    let mut harness = TestHarness::with_nodes(&["a"]);
    assert!(harness.editor.paste().is_empty());
    assert_eq!(harness.editor.undo_len(), 0);
}
