/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Skill graph document model.
//!
//! Core structures:
//! - `SkillGraph`: ordered node list, the authoritative document
//! - `SkillNode`: a skill vertex with position, visuals, and gameplay metadata
//! - `RelationshipKind`: which of the three edge lists an id reference lives in
//!
//! Edges are not entities: each node carries three ordered lists of target
//! ids. Boundary: direct mutation methods are `pub(crate)` so every write
//! goes through `SkillGraphEditor`, which is where the rename/remove
//! cascades and history capture live.

use euclid::default::Point3D;
use std::collections::HashSet;
use uuid::Uuid;

pub mod change;
pub mod patch;

pub use change::{Change, ChangeKind, ChangePatch, StatModifierType};
pub use patch::{NodePatch, color_from_rgb_picker, parse_argb};

/// Position given to nodes created through `add_node`.
pub const NEW_NODE_POSITION: (f64, f64, f64) = (0.0, 2.0, 0.0);
pub const DEFAULT_COST: i64 = 1;
pub const DEFAULT_RADIUS: f64 = 0.5;
/// Fully opaque white, `AARRGGBB`.
pub const DEFAULT_COLOR: &str = "FFFFFFFF";
pub const NEW_NODE_DISPLAY_NAME: &str = "New Skill";

pub const DEFAULT_ACTIVATED_ITEM: &str = "minecraft:iron_block";
pub const DEFAULT_DEACTIVATED_ITEM: &str = "minecraft:redstone_block";
pub const DEFAULT_ACTIVATABLE_ITEM: &str = "minecraft:netherrack";

const GENERATED_ID_PREFIX: &str = "node_";
const GENERATED_ID_ATTEMPTS: usize = 16;

/// Item reference attached to a node. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub id: String,
    pub count: i64,
}

impl ItemRef {
    pub fn new(id: impl Into<String>, count: i64) -> Self {
        Self {
            id: id.into(),
            count,
        }
    }

    pub fn default_activated() -> Self {
        Self::new(DEFAULT_ACTIVATED_ITEM, 1)
    }

    pub fn default_deactivated() -> Self {
        Self::new(DEFAULT_DEACTIVATED_ITEM, 1)
    }

    pub fn default_activatable() -> Self {
        Self::new(DEFAULT_ACTIVATABLE_ITEM, 1)
    }
}

/// Typed, directed reference list a node holds toward other node ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipKind {
    /// Hard requirement (AND).
    Requires,
    /// Alternative requirement (OR).
    OrRequires,
    /// Mutual exclusion.
    Conflicts,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 3] = [
        RelationshipKind::Requires,
        RelationshipKind::OrRequires,
        RelationshipKind::Conflicts,
    ];

    /// Field name used by the interchange format.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipKind::Requires => "requires",
            RelationshipKind::OrRequires => "orRequires",
            RelationshipKind::Conflicts => "conflicts",
        }
    }

    /// Accepts interchange names plus the snake_case spelling used on the CLI.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "requires" => Some(RelationshipKind::Requires),
            "orRequires" | "or_requires" | "or-requires" => Some(RelationshipKind::OrRequires),
            "conflicts" => Some(RelationshipKind::Conflicts),
            _ => None,
        }
    }
}

/// A skill vertex in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillNode {
    /// Stable identity; the join key for every edge reference.
    pub id: String,

    /// Free-text label.
    pub display_name: String,

    /// Free-text description shown in the property sidebar.
    pub description: String,

    /// World-space position.
    pub position: Point3D<f64>,

    pub cost: i64,

    /// Sphere radius, also used for overlap checks by presentation.
    pub radius: f64,

    /// `AARRGGBB` hex string. Stored as given.
    pub color: String,

    pub requires: Vec<String>,
    pub or_requires: Vec<String>,
    pub conflicts: Vec<String>,

    pub activated_item: Option<ItemRef>,
    pub deactivated_item: Option<ItemRef>,
    pub activatable_item: Option<ItemRef>,

    /// Rewards applied on activation, addressed by position.
    pub changes: Vec<Change>,
}

impl SkillNode {
    /// Node with import defaults: origin position, display name equal to id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            description: String::new(),
            position: Point3D::origin(),
            cost: DEFAULT_COST,
            radius: DEFAULT_RADIUS,
            color: DEFAULT_COLOR.to_string(),
            requires: Vec::new(),
            or_requires: Vec::new(),
            conflicts: Vec::new(),
            activated_item: Some(ItemRef::default_activated()),
            deactivated_item: Some(ItemRef::default_deactivated()),
            activatable_item: Some(ItemRef::default_activatable()),
            changes: Vec::new(),
        }
    }

    /// Node as created by the "add node" gesture.
    pub fn new_placeholder(id: impl Into<String>) -> Self {
        let (x, y, z) = NEW_NODE_POSITION;
        Self {
            display_name: NEW_NODE_DISPLAY_NAME.to_string(),
            position: Point3D::new(x, y, z),
            ..Self::new(id)
        }
    }

    pub fn relationship(&self, kind: RelationshipKind) -> &[String] {
        match kind {
            RelationshipKind::Requires => &self.requires,
            RelationshipKind::OrRequires => &self.or_requires,
            RelationshipKind::Conflicts => &self.conflicts,
        }
    }

    pub(crate) fn relationship_mut(&mut self, kind: RelationshipKind) -> &mut Vec<String> {
        match kind {
            RelationshipKind::Requires => &mut self.requires,
            RelationshipKind::OrRequires => &mut self.or_requires,
            RelationshipKind::Conflicts => &mut self.conflicts,
        }
    }

    /// All outgoing references in list order: requires, orRequires, conflicts.
    pub fn relationships(&self) -> impl Iterator<Item = (RelationshipKind, &str)> + '_ {
        RelationshipKind::ALL.into_iter().flat_map(move |kind| {
            self.relationship(kind)
                .iter()
                .map(move |target| (kind, target.as_str()))
        })
    }

    pub fn references(&self, target: &str) -> bool {
        self.relationships().any(|(_, id)| id == target)
    }

    fn rewrite_references(&mut self, old_id: &str, new_id: &str) {
        for kind in RelationshipKind::ALL {
            for target in self.relationship_mut(kind).iter_mut() {
                if target == old_id {
                    *target = new_id.to_string();
                }
            }
        }
    }

    fn strip_references(&mut self, target: &str) -> bool {
        let mut changed = false;
        for kind in RelationshipKind::ALL {
            let list = self.relationship_mut(kind);
            let before = list.len();
            list.retain(|candidate| candidate != target);
            changed |= list.len() != before;
        }
        changed
    }
}

/// Read-only view of one edge-list entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeView<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub kind: RelationshipKind,
}

/// Why a rename was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameError {
    /// Another node already uses the requested id.
    Collision(String),
    /// No node has the source id. Stricter than a silent no-op: callers can
    /// tell a stale rename from a successful one.
    NotFound(String),
    /// The requested id is empty.
    Empty,
}

impl std::fmt::Display for RenameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameError::Collision(id) => write!(f, "Node id '{id}' is already in use"),
            RenameError::NotFound(id) => write!(f, "No node with id '{id}'"),
            RenameError::Empty => write!(f, "Node id must not be empty"),
        }
    }
}

impl std::error::Error for RenameError {}

/// The skill graph document: nodes in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillGraph {
    nodes: Vec<SkillNode>,
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_nodes(nodes: Vec<SkillNode>) -> Self {
        Self { nodes }
    }

    /// Nodes in document order.
    pub fn nodes(&self) -> &[SkillNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node. With duplicate ids the last one wins.
    pub fn get_node(&self, id: &str) -> Option<&SkillNode> {
        self.nodes.iter().rev().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Authoritative world position for placement.
    pub fn position_of(&self, id: &str) -> Option<Point3D<f64>> {
        self.get_node(id).map(|node| node.position)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|node| node.id.as_str())
    }

    /// Every edge-list entry, dangling or not.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.relationships().map(move |(kind, to)| EdgeView {
                from: node.id.as_str(),
                to,
                kind,
            })
        })
    }

    /// Edges whose target currently exists. Presentation draws these only.
    pub fn resolved_edges(&self) -> Vec<EdgeView<'_>> {
        let ids: HashSet<&str> = self.ids().collect();
        self.edges().filter(|edge| ids.contains(edge.to)).collect()
    }

    /// Edges whose target is absent.
    pub fn dangling_references(&self) -> Vec<EdgeView<'_>> {
        let ids: HashSet<&str> = self.ids().collect();
        self.edges().filter(|edge| !ids.contains(edge.to)).collect()
    }

    pub fn edge_count(&self, kind: RelationshipKind) -> usize {
        self.nodes
            .iter()
            .map(|node| node.relationship(kind).len())
            .sum()
    }

    /// Generate an id not used by this graph.
    pub fn generate_node_id(&self) -> String {
        self.generate_node_id_excluding(&HashSet::new())
    }

    /// Generate an id not used by this graph nor present in `reserved`.
    pub fn generate_node_id_excluding(&self, reserved: &HashSet<String>) -> String {
        let taken = |candidate: &str| self.contains(candidate) || reserved.contains(candidate);
        for _ in 0..GENERATED_ID_ATTEMPTS {
            let uuid = Uuid::new_v4().simple().to_string();
            let candidate = format!("{GENERATED_ID_PREFIX}{}", &uuid[..8]);
            if !taken(&candidate) {
                return candidate;
            }
        }
        // Short ids kept colliding; fall back to the full UUID.
        loop {
            let candidate = format!("{GENERATED_ID_PREFIX}{}", Uuid::new_v4().simple());
            if !taken(&candidate) {
                return candidate;
            }
        }
    }

    pub(crate) fn push_node(&mut self, node: SkillNode) {
        self.nodes.push(node);
    }

    pub(crate) fn extend_nodes(&mut self, nodes: impl IntoIterator<Item = SkillNode>) {
        self.nodes.extend(nodes);
    }

    /// Shallow-merge `patch` into every node with `id`. Returns whether any
    /// field actually changed.
    pub(crate) fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == id) {
            changed |= patch.apply_to(node);
        }
        changed
    }

    /// Change a node's id and rewrite every reference to it.
    pub(crate) fn rename_node(&mut self, old_id: &str, new_id: &str) -> Result<(), RenameError> {
        if new_id.is_empty() {
            return Err(RenameError::Empty);
        }
        if !self.contains(old_id) {
            return Err(RenameError::NotFound(old_id.to_string()));
        }
        if old_id == new_id {
            return Ok(());
        }
        if self.contains(new_id) {
            return Err(RenameError::Collision(new_id.to_string()));
        }
        for node in &mut self.nodes {
            if node.id == old_id {
                node.id = new_id.to_string();
            }
            node.rewrite_references(old_id, new_id);
        }
        Ok(())
    }

    /// Delete the node and strip its id from every remaining edge list.
    /// Returns false when nothing changed.
    pub(crate) fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| node.id != id);
        let mut changed = self.nodes.len() != before;
        for node in &mut self.nodes {
            changed |= node.strip_references(id);
        }
        changed
    }

    /// Append `target` to the source's list unless already present.
    pub(crate) fn add_relationship(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationshipKind,
    ) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == source) {
            let list = node.relationship_mut(kind);
            if !list.iter().any(|existing| existing == target) {
                list.push(target.to_string());
                changed = true;
            }
        }
        changed
    }

    pub(crate) fn remove_relationship(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationshipKind,
    ) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == source) {
            let list = node.relationship_mut(kind);
            let before = list.len();
            list.retain(|existing| existing != target);
            changed |= list.len() != before;
        }
        changed
    }

    pub(crate) fn add_change(&mut self, node_id: &str, kind: &ChangeKind) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == node_id) {
            node.changes.push(Change::with_defaults(kind));
            changed = true;
        }
        changed
    }

    /// Out-of-range indices are ignored.
    pub(crate) fn update_change(&mut self, node_id: &str, index: usize, patch: &ChangePatch) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == node_id) {
            if let Some(change) = node.changes.get_mut(index) {
                changed |= patch.apply_to(change);
            }
        }
        changed
    }

    /// Later changes shift down by one. Out-of-range indices are ignored.
    pub(crate) fn remove_change(&mut self, node_id: &str, index: usize) -> bool {
        let mut changed = false;
        for node in self.nodes.iter_mut().filter(|node| node.id == node_id) {
            if index < node.changes.len() {
                node.changes.remove(index);
                changed = true;
            }
        }
        changed
    }
}
