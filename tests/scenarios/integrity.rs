/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;

use euclid::default::Point3D;
use proptest::prelude::*;

use crate::harness::{TestHarness, chain_document};
use skillgraph::RelationshipKind;

#[derive(Debug, Clone)]
enum Op {
    Add,
    Remove(usize),
    Rename(usize, u8),
    Link(usize, usize, usize),
    Unlink(usize, usize, usize),
    Select(usize, bool),
    RemoveSelected,
    Pick(usize, usize, usize),
    Drag(usize, i8, i8),
    Copy,
    Paste,
    Undo,
    Redo,
}

const KINDS: [RelationshipKind; 3] = [
    RelationshipKind::Requires,
    RelationshipKind::OrRequires,
    RelationshipKind::Conflicts,
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Add),
        1 => any::<usize>().prop_map(Op::Remove),
        1 => (any::<usize>(), 0_u8..4).prop_map(|(i, s)| Op::Rename(i, s)),
        3 => (any::<usize>(), any::<usize>(), 0_usize..3).prop_map(|(a, b, k)| Op::Link(a, b, k)),
        1 => (any::<usize>(), any::<usize>(), 0_usize..3).prop_map(|(a, b, k)| Op::Unlink(a, b, k)),
        2 => (any::<usize>(), any::<bool>()).prop_map(|(i, m)| Op::Select(i, m)),
        1 => Just(Op::RemoveSelected),
        1 => (any::<usize>(), any::<usize>(), 0_usize..3).prop_map(|(a, b, k)| Op::Pick(a, b, k)),
        1 => (any::<usize>(), -3_i8..3, -3_i8..3).prop_map(|(i, x, z)| Op::Drag(i, x, z)),
        1 => Just(Op::Copy),
        1 => Just(Op::Paste),
        1 => Just(Op::Undo),
        1 => Just(Op::Redo),
    ]
}

/// Resolve an index against the current document so generated edges always
/// point at live nodes.
fn pick_id(harness: &TestHarness, index: usize) -> Option<String> {
    let ids = harness.ids();
    if ids.is_empty() {
        None
    } else {
        Some(ids[index % ids.len()].clone())
    }
}

fn apply(harness: &mut TestHarness, op: &Op) {
    match op {
        Op::Add => {
            harness.editor.add_node();
        },
        Op::Remove(i) => {
            if let Some(id) = pick_id(harness, *i) {
                harness.editor.remove_node(&id);
            }
        },
        Op::Rename(i, suffix) => {
            if let Some(id) = pick_id(harness, *i) {
                harness.editor.update_node_id(&id, &format!("renamed_{suffix}"));
            }
        },
        Op::Link(a, b, k) | Op::Unlink(a, b, k) | Op::Pick(a, b, k) => {
            let (Some(source), Some(target)) = (pick_id(harness, *a), pick_id(harness, *b)) else {
                return;
            };
            let kind = KINDS[*k];
            match op {
                Op::Link(..) => {
                    harness.editor.add_relationship(&source, &target, kind);
                },
                Op::Unlink(..) => {
                    harness.editor.remove_relationship(&source, &target, kind);
                },
                _ => {
                    harness.editor.start_picking(&source, kind);
                    harness.editor.handle_node_click(&target, false);
                },
            }
        },
        Op::Select(i, multi) => {
            if let Some(id) = pick_id(harness, *i) {
                harness.editor.select_node(Some(&id), *multi);
            }
        },
        Op::RemoveSelected => {
            harness.editor.remove_selected();
        },
        Op::Drag(i, x, z) => {
            if let Some(id) = pick_id(harness, *i) {
                harness.editor.select_node(Some(&id), false);
                harness
                    .editor
                    .commit_drag(Point3D::new(f64::from(*x), 0.0, f64::from(*z)));
            }
        },
        Op::Copy => {
            harness.editor.copy_selection();
        },
        Op::Paste => {
            harness.editor.paste();
        },
        Op::Undo => {
            harness.editor.undo();
        },
        Op::Redo => {
            harness.editor.redo();
        },
    }
}

fn assert_integrity(harness: &TestHarness) -> Result<(), TestCaseError> {
    let graph = harness.editor.graph();
    let ids = harness.ids();
    let unique: HashSet<&String> = ids.iter().collect();
    prop_assert_eq!(unique.len(), ids.len(), "duplicate ids in {:?}", ids);
    prop_assert!(
        graph.dangling_references().is_empty(),
        "dangling references: {:?}",
        graph.dangling_references()
    );
    for id in harness.editor.selection().ids() {
        prop_assert!(graph.contains(id), "selection holds missing node '{}'", id);
    }
    if let Some(picking) = harness.editor.interaction().picking() {
        prop_assert!(graph.contains(&picking.source_id));
    }
    Ok(())
}

proptest! {
    #[test]
    fn proptest_operations_preserve_referential_integrity(
        ops in prop::collection::vec(op_strategy(), 0..60)
    ) {
        let mut harness = TestHarness::new();
        for op in &ops {
            apply(&mut harness, op);
            assert_integrity(&harness)?;
        }

        let finished = harness.editor.graph().clone();
        while harness.editor.undo() {
            assert_integrity(&harness)?;
        }
        prop_assert!(harness.editor.graph().is_empty());
        while harness.editor.redo() {}
        prop_assert_eq!(harness.editor.graph(), &finished);
    }
}

#[test]
fn removing_a_node_strips_every_reference() {
    let mut harness = TestHarness::new();
    harness.import(chain_document());

    harness.editor.remove_node("root");

    assert_eq!(harness.ids(), vec!["mid", "leaf"]);
    assert!(harness.node("mid").requires.is_empty());
    assert!(harness.node("leaf").conflicts.is_empty());
    assert_eq!(harness.node("leaf").requires, vec!["mid"]);
}

#[test]
fn renaming_rewrites_references_in_place() {
    let mut harness = TestHarness::new();
    harness.import(chain_document());

    assert!(harness.editor.update_node_id("root", "base"));

    assert_eq!(harness.ids(), vec!["base", "mid", "leaf"]);
    assert_eq!(harness.node("mid").requires, vec!["base"]);
    assert_eq!(harness.node("leaf").conflicts, vec!["base"]);
}

#[test]
fn imported_dangling_references_survive_untouched() {
    let mut harness = TestHarness::new();
    harness.import(serde_json::json!({"a": {"requires": ["missing"]}}));

    let dangling = harness.editor.graph().dangling_references();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].to, "missing");
    assert!(harness.editor.graph().resolved_edges().is_empty());
}
