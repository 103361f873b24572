/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::time::{Duration, Instant};

use euclid::default::Point3D;
use rstest::rstest;

use crate::harness::TestHarness;
use skillgraph::app::NodeClickOutcome;
use skillgraph::stack::StackKey;
use skillgraph::{CanvasAxis, GraphIntent, NodePatch, RelationshipKind};

#[rstest]
#[case(RelationshipKind::Requires)]
#[case(RelationshipKind::OrRequires)]
#[case(RelationshipKind::Conflicts)]
fn picking_links_with_requested_kind(#[case] kind: RelationshipKind) {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    harness.editor.apply_intents([
        GraphIntent::StartPicking {
            source_id: "a".into(),
            kind,
        },
        GraphIntent::NodeClicked {
            id: "b".into(),
            multi_select: false,
        },
    ]);

    assert_eq!(harness.node("a").relationship(kind), ["b".to_string()]);
    assert!(!harness.editor.interaction().is_picking());
    assert_eq!(harness.editor.undo_len(), 1);
}

#[test]
fn picking_follows_source_rename() {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    harness
        .editor
        .start_picking("a", RelationshipKind::Requires);
    harness.editor.update_node_id("a", "alpha");

    assert_eq!(
        harness.editor.handle_node_click("b", false),
        NodeClickOutcome::Linked
    );
    assert_eq!(harness.node("alpha").requires, vec!["b".to_string()]);
}

#[rstest]
#[case(CanvasAxis::XZ, Point3D::new(0.0, 7.0, 0.0), 2)]
#[case(CanvasAxis::XY, Point3D::new(0.0, 0.0, 7.0), 2)]
#[case(CanvasAxis::XY, Point3D::new(0.0, 7.0, 0.0), 1)]
fn stacks_follow_canvas_axis(
    #[case] axis: CanvasAxis,
    #[case] moved_to: Point3D<f64>,
    #[case] expected_members: usize,
) {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    harness.editor.set_canvas_axis(axis);
    harness
        .editor
        .update_node("b", &NodePatch::position(moved_to));

    let members = harness.editor.stack_at(Point3D::origin());
    assert_eq!(members.len(), expected_members);
}

#[test]
fn hover_clear_respects_configured_delay() {
    let mut harness = TestHarness::with_nodes(&["a", "b"]);
    let key = StackKey::of(Point3D::origin(), CanvasAxis::XZ);
    let start = Instant::now();

    harness.editor.set_hovered_stack(Some(key));
    harness.editor.schedule_hover_clear(start);
    assert!(!harness.editor.poll_hover_clear(start + Duration::from_millis(100)));
    assert_eq!(harness.editor.interaction().hovered_stack(), Some(key));

    assert!(harness.editor.poll_hover_clear(start + Duration::from_millis(300)));
    assert_eq!(harness.editor.interaction().hovered_stack(), None);
}

#[test]
fn drag_of_group_is_single_undo_step() {
    let mut harness = TestHarness::with_nodes(&["a", "b", "c"]);
    harness.editor.apply_intents([
        GraphIntent::SelectAll,
        GraphIntent::SetDragging { dragging: true },
        GraphIntent::CommitDrag {
            target: Point3D::new(1.5, 0.0, -2.25),
        },
    ]);

    for id in ["a", "b", "c"] {
        assert_eq!(harness.node(id).position, Point3D::new(1.5, 0.0, -2.25));
    }
    assert!(!harness.editor.interaction().is_dragging());
    assert_eq!(harness.editor.undo_len(), 1);
}

#[test]
fn focus_trigger_is_monotonic() {
    let mut harness = TestHarness::new();
    let first = harness.editor.trigger_focus();
    let second = harness.editor.trigger_focus();
    assert!(second > first);
}
