/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Overlap ("stack") queries over the current document.
//!
//! Everything here is derived and read-only. Results may feed transient
//! interaction state (hovered stack, selection cycling) but never write node
//! positions.

use euclid::default::{Point3D, Vector3D};
use std::f64::consts::TAU;

use crate::graph::SkillGraph;
use crate::options::CanvasAxis;
use crate::selection::SelectionState;

/// Default coincidence tolerance on each in-plane axis.
pub const DEFAULT_STACK_TOLERANCE: f64 = 0.1;

/// In-plane coordinates identifying a cluster of overlapping nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackKey {
    pub a: f64,
    pub b: f64,
}

impl StackKey {
    pub fn of(position: Point3D<f64>, axis: CanvasAxis) -> Self {
        let (a, b) = axis.project(position);
        Self { a, b }
    }

    /// Whether `position` falls within `tolerance` of this key on both
    /// in-plane axes.
    pub fn matches(&self, position: Point3D<f64>, axis: CanvasAxis, tolerance: f64) -> bool {
        let (a, b) = axis.project(position);
        (a - self.a).abs() <= tolerance && (b - self.b).abs() <= tolerance
    }
}

/// A cluster of two or more coinciding nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    /// Key of the first member.
    pub key: StackKey,
    /// Member ids in document order.
    pub members: Vec<String>,
}

/// Ids of nodes sitting on `key`, in document order.
pub fn nodes_in_stack(
    graph: &SkillGraph,
    key: StackKey,
    axis: CanvasAxis,
    tolerance: f64,
) -> Vec<String> {
    graph
        .nodes()
        .iter()
        .filter(|node| key.matches(node.position, axis, tolerance))
        .map(|node| node.id.clone())
        .collect()
}

/// Every stack with more than one member, in order of first appearance.
///
/// Each node joins the first stack whose key it matches.
pub fn find_stacks(graph: &SkillGraph, axis: CanvasAxis, tolerance: f64) -> Vec<Stack> {
    let mut stacks: Vec<Stack> = Vec::new();
    for node in graph.nodes() {
        match stacks
            .iter_mut()
            .find(|stack| stack.key.matches(node.position, axis, tolerance))
        {
            Some(stack) => stack.members.push(node.id.clone()),
            None => stacks.push(Stack {
                key: StackKey::of(node.position, axis),
                members: vec![node.id.clone()],
            }),
        }
    }
    stacks.retain(|stack| stack.members.len() > 1);
    stacks
}

/// Next node to select when clicking a location where `hits` overlap.
///
/// Hits are deduplicated keeping first appearance. If the primary selection
/// is one of them, the member after it is returned (wrapping); otherwise the
/// first hit.
pub fn cycle_stack_selection(hits: &[String], selection: &SelectionState) -> Option<String> {
    let mut ordered: Vec<&str> = Vec::with_capacity(hits.len());
    for hit in hits {
        if !ordered.contains(&hit.as_str()) {
            ordered.push(hit.as_str());
        }
    }
    let first = *ordered.first()?;
    let next = selection
        .primary()
        .and_then(|primary| ordered.iter().position(|hit| *hit == primary))
        .map(|index| ordered[(index + 1) % ordered.len()])
        .unwrap_or(first);
    Some(next.to_string())
}

/// Presentation-only offsets spreading `members` on an in-plane circle of
/// `spread` radius. A single member gets no offset.
pub fn fan_out_offsets(
    members: &[String],
    axis: CanvasAxis,
    spread: f64,
) -> Vec<(String, Vector3D<f64>)> {
    if members.len() < 2 {
        return members
            .iter()
            .map(|id| (id.clone(), Vector3D::zero()))
            .collect();
    }
    let step = TAU / members.len() as f64;
    members
        .iter()
        .enumerate()
        .map(|(index, id)| {
            let angle = step * index as f64;
            (
                id.clone(),
                axis.lift(spread * angle.cos(), spread * angle.sin()),
            )
        })
        .collect()
}
