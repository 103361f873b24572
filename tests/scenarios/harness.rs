/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use serde_json::{Value, json};
use skillgraph::{SkillGraphEditor, SkillNode};

pub(crate) struct TestHarness {
    pub(crate) editor: SkillGraphEditor,
}

impl TestHarness {
    pub(crate) fn new() -> Self {
        Self {
            editor: SkillGraphEditor::new_for_testing(),
        }
    }

    /// Editor holding `ids` at the origin, nothing selected, no history.
    pub(crate) fn with_nodes(ids: &[&str]) -> Self {
        let mut harness = Self::new();
        harness
            .editor
            .add_nodes(ids.iter().map(|id| SkillNode::new(*id)).collect());
        harness.editor.select_node(None, false);
        harness.editor.clear_history();
        harness
    }

    pub(crate) fn import(&mut self, data: Value) {
        self.editor.import_graph(&data).expect("import");
    }

    pub(crate) fn ids(&self) -> Vec<String> {
        self.editor.graph().ids().map(str::to_string).collect()
    }

    pub(crate) fn selected(&self) -> Vec<String> {
        self.editor.selection().ids().to_vec()
    }

    pub(crate) fn node(&self, id: &str) -> &SkillNode {
        self.editor.get_node(id).expect("node exists")
    }

    /// Every selected id and the picking source exist in the document.
    pub(crate) fn assert_transient_state_consistent(&self) {
        let graph = self.editor.graph();
        for id in self.editor.selection().ids() {
            assert!(graph.contains(id), "selection holds missing node '{id}'");
        }
        if let Some(picking) = self.editor.interaction().picking() {
            assert!(
                graph.contains(&picking.source_id),
                "picking source '{}' is missing",
                picking.source_id
            );
        }
    }
}

pub(crate) fn chain_document() -> Value {
    json!({
        "root": {"displayName": "Root", "x": 0, "y": 0, "z": 0},
        "mid": {"displayName": "Mid", "x": 2, "requires": ["root"]},
        "leaf": {"displayName": "Leaf", "x": 4, "requires": ["mid"], "conflicts": ["root"]}
    })
}
