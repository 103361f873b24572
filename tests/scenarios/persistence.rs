/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use tempfile::TempDir;

use crate::harness::chain_document;
use skillgraph::config::EditorConfig;
use skillgraph::persistence::GraphStore;
use skillgraph::persistence::types::{PersistedDocument, STORAGE_VERSION};
use skillgraph::{CanvasAxis, EditorOption, RelationshipKind, SkillGraphEditor};

fn open(dir: &TempDir) -> SkillGraphEditor {
    let config = EditorConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..EditorConfig::default()
    };
    SkillGraphEditor::new(config)
}

#[test]
fn document_and_options_survive_restart() {
    let dir = TempDir::new().unwrap();
    {
        let mut editor = open(&dir);
        editor.import_graph(&chain_document()).unwrap();
        editor.add_relationship("root", "leaf", RelationshipKind::OrRequires);
        editor.toggle_option(EditorOption::CanvasMode);
        editor.set_canvas_axis(CanvasAxis::XY);
    }

    let editor = open(&dir);
    let ids: Vec<&str> = editor.graph().ids().collect();
    assert_eq!(ids, vec!["root", "mid", "leaf"]);
    assert_eq!(editor.get_node("root").unwrap().or_requires, vec!["leaf"]);
    assert!(editor.options().canvas_mode);
    assert_eq!(editor.options().canvas_axis, CanvasAxis::XY);
    assert!(!editor.can_undo());
}

#[test]
fn undo_is_persisted_too() {
    let dir = TempDir::new().unwrap();
    {
        let mut editor = open(&dir);
        editor.add_node();
        editor.add_node();
        editor.undo();
    }
    assert_eq!(open(&dir).graph().node_count(), 1);
}

#[test]
fn reset_clears_storage() {
    let dir = TempDir::new().unwrap();
    {
        let mut editor = open(&dir);
        editor.add_node();
        editor.reset();
    }
    assert!(open(&dir).graph().is_empty());
}

#[test]
fn stored_record_carries_current_version() {
    let dir = TempDir::new().unwrap();
    {
        let mut editor = open(&dir);
        editor.add_node();
    }
    let store = GraphStore::open(dir.path().to_path_buf()).unwrap();
    let document: PersistedDocument = store.load_document().unwrap().unwrap();
    assert_eq!(document.version, STORAGE_VERSION);
    assert_eq!(document.state.nodes.len(), 1);
}

#[test]
fn export_import_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let mut source = SkillGraphEditor::new_for_testing();
    source.import_graph(&chain_document()).unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, source.export_json()).unwrap();

    let mut target = SkillGraphEditor::new_for_testing();
    target
        .import_json(&std::fs::read_to_string(&path).unwrap())
        .unwrap();

    assert_eq!(target.graph(), source.graph());
}
