/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Copy/paste of node sets.
//!
//! Pasted copies get fresh ids. References between copied nodes are
//! remapped to the copies; references leaving the copied set keep their
//! original targets while those still exist.

use euclid::default::Vector3D;
use std::collections::{HashMap, HashSet};

use crate::graph::{RelationshipKind, SkillGraph, SkillNode};

/// Default shift applied to pasted nodes.
pub const DEFAULT_PASTE_OFFSET: [f64; 3] = [1.0, 0.0, 1.0];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeClipboard {
    nodes: Vec<SkillNode>,
}

impl NodeClipboard {
    /// Snapshot the nodes named by `ids`, in document order. Unknown ids are
    /// skipped.
    pub fn copy_from<'a>(graph: &SkillGraph, ids: impl IntoIterator<Item = &'a str>) -> Self {
        let wanted: HashSet<&str> = ids.into_iter().collect();
        let mut seen = HashSet::new();
        let nodes = graph
            .nodes()
            .iter()
            .rev()
            .filter(|node| wanted.contains(node.id.as_str()) && seen.insert(node.id.as_str()))
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        Self { nodes }
    }

    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Fresh copies ready for `add_nodes`: ids unique against `graph` and
    /// each other, positions shifted by `offset`. References to nodes deleted
    /// since the copy are dropped.
    pub(crate) fn instantiate(&self, graph: &SkillGraph, offset: Vector3D<f64>) -> Vec<SkillNode> {
        let mut reserved = HashSet::new();
        let mut remap = HashMap::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let fresh = graph.generate_node_id_excluding(&reserved);
            reserved.insert(fresh.clone());
            remap.insert(node.id.clone(), fresh);
        }

        let copies: Vec<SkillNode> = self
            .nodes
            .iter()
            .map(|node| {
                let mut copy = node.clone();
                if let Some(fresh) = remap.get(&node.id) {
                    copy.id.clone_from(fresh);
                }
                copy.position += offset;
                for kind in RelationshipKind::ALL {
                    let list = copy.relationship_mut(kind);
                    list.retain(|target| remap.contains_key(target) || graph.contains(target));
                    for target in list.iter_mut() {
                        if let Some(fresh) = remap.get(target.as_str()) {
                            target.clone_from(fresh);
                        }
                    }
                }
                copy
            })
            .collect();
        log::debug!("Instantiated {} clipboard node(s)", copies.len());
        copies
    }
}
