/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Serializable records shared by the storage snapshot and the interchange
//! format.
//!
//! Every field is optional on the way in; absent fields are default-filled
//! when converting to the model. Unknown fields are ignored.

use euclid::default::Point3D;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::change::{
    DEFAULT_GRANT_ID, DEFAULT_GRANT_LEVEL, DEFAULT_STAT_TYPE, DEFAULT_STAT_VALUE, SPELL_CHANGE,
    STAT_CHANGE,
};
use crate::graph::{
    Change, DEFAULT_COLOR, DEFAULT_COST, DEFAULT_RADIUS, ItemRef, SkillNode, StatModifierType,
};
use crate::options::{CanvasAxis, EditorOptions};

/// Storage record name.
pub const STORAGE_NAME: &str = "skillgraph-storage";
/// Current storage schema version.
pub const STORAGE_VERSION: u32 = 8;

/// Integer field that may arrive as a float (`3.0`) from loosely typed
/// producers.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientInt {
    Int(i64),
    Float(f64),
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<LenientInt>::deserialize(deserializer)?.map(|raw| match raw {
            LenientInt::Int(value) => value,
            LenientInt::Float(value) => value.round() as i64,
        }),
    )
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`).
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub count: Option<i64>,
}

impl ItemRecord {
    fn from_item(item: &ItemRef) -> Self {
        Self {
            id: Some(item.id.clone()),
            count: Some(item.count),
        }
    }

    fn into_item(self, fallback: ItemRef) -> ItemRef {
        ItemRef {
            id: self.id.unwrap_or(fallback.id),
            count: self.count.unwrap_or(fallback.count),
        }
    }
}

/// One entry of a node's `changes` list. `type` selects the variant;
/// fields of the other variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stat_modifier_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_data: Option<String>,
}

impl ChangeRecord {
    pub fn from_change(change: &Change) -> Self {
        match change {
            Change::Stat {
                stat_type,
                modifier,
                value,
            } => Self {
                change_type: Some(STAT_CHANGE.to_string()),
                stat_type: Some(stat_type.clone()),
                stat_modifier_type: Some(modifier.as_str().to_string()),
                value: Some(*value),
                ..Self::default()
            },
            Change::Grant {
                change_type,
                id,
                level,
                source_data,
            } => Self {
                change_type: Some(change_type.clone()),
                id: Some(id.clone()),
                level: Some(*level),
                source_data: Some(source_data.clone()),
                ..Self::default()
            },
        }
    }

    /// Missing `type` reads as a spell grant.
    pub fn into_change(self) -> Change {
        let change_type = self
            .change_type
            .unwrap_or_else(|| SPELL_CHANGE.to_string());
        if change_type == STAT_CHANGE {
            let modifier = match self.stat_modifier_type.as_deref() {
                None => StatModifierType::default(),
                Some(raw) => StatModifierType::from_name(raw).unwrap_or_else(|| {
                    warn!("Unknown stat modifier '{raw}', using ADDITIVE");
                    StatModifierType::default()
                }),
            };
            Change::Stat {
                stat_type: self
                    .stat_type
                    .unwrap_or_else(|| DEFAULT_STAT_TYPE.to_string()),
                modifier,
                value: self.value.unwrap_or(DEFAULT_STAT_VALUE),
            }
        } else {
            Change::Grant {
                change_type,
                id: self.id.unwrap_or_else(|| DEFAULT_GRANT_ID.to_string()),
                level: self.level.unwrap_or(DEFAULT_GRANT_LEVEL),
                source_data: self.source_data.unwrap_or_default(),
            }
        }
    }
}

/// A node as it appears on disk and in interchange JSON.
///
/// `id` is carried in storage; in interchange the map key is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub cost: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub or_requires: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<Vec<ChangeRecord>>,
    /// `null` clears the item; absence means the default item.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub activated_item: Option<Option<ItemRecord>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub deactivated_item: Option<Option<ItemRecord>>,
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub activatable_item: Option<Option<ItemRecord>>,
}

fn item_field(
    field: Option<Option<ItemRecord>>,
    fallback: fn() -> ItemRef,
) -> Option<ItemRef> {
    match field {
        None => Some(fallback()),
        Some(None) => None,
        Some(Some(record)) => Some(record.into_item(fallback())),
    }
}

impl NodeRecord {
    /// Fully populated record for `node`.
    pub fn from_node(node: &SkillNode) -> Self {
        Self {
            id: Some(node.id.clone()),
            display_name: Some(node.display_name.clone()),
            description: Some(node.description.clone()),
            x: Some(node.position.x),
            y: Some(node.position.y),
            z: Some(node.position.z),
            cost: Some(node.cost),
            radius: Some(node.radius),
            color: Some(node.color.clone()),
            requires: Some(node.requires.clone()),
            or_requires: Some(node.or_requires.clone()),
            conflicts: Some(node.conflicts.clone()),
            changes: Some(node.changes.iter().map(ChangeRecord::from_change).collect()),
            activated_item: Some(node.activated_item.as_ref().map(ItemRecord::from_item)),
            deactivated_item: Some(node.deactivated_item.as_ref().map(ItemRecord::from_item)),
            activatable_item: Some(node.activatable_item.as_ref().map(ItemRecord::from_item)),
        }
    }

    /// Build a node with `id`, default-filling absent fields.
    ///
    /// An empty display name falls back to the id, an empty color to opaque
    /// white, and a non-positive radius to the default radius.
    pub fn into_node(self, id: String) -> SkillNode {
        let display_name = self
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.clone());
        let radius = self
            .radius
            .filter(|radius| radius.is_finite() && *radius > 0.0)
            .unwrap_or(DEFAULT_RADIUS);
        SkillNode {
            display_name,
            description: self.description.unwrap_or_default(),
            position: Point3D::new(
                self.x.unwrap_or(0.0),
                self.y.unwrap_or(0.0),
                self.z.unwrap_or(0.0),
            ),
            cost: self.cost.unwrap_or(DEFAULT_COST),
            radius,
            color: self
                .color
                .filter(|color| !color.is_empty())
                .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            requires: self.requires.unwrap_or_default(),
            or_requires: self.or_requires.unwrap_or_default(),
            conflicts: self.conflicts.unwrap_or_default(),
            activated_item: item_field(self.activated_item, ItemRef::default_activated),
            deactivated_item: item_field(self.deactivated_item, ItemRef::default_deactivated),
            activatable_item: item_field(self.activatable_item, ItemRef::default_activatable),
            changes: self
                .changes
                .unwrap_or_default()
                .into_iter()
                .map(ChangeRecord::into_change)
                .collect(),
            id,
        }
    }
}

/// Persisted presentation options. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedOptions {
    pub snap: bool,
    pub glow: bool,
    pub show_names: bool,
    pub show_selected_lines_only: bool,
    pub canvas_mode: bool,
    pub canvas_axis: String,
}

impl Default for PersistedOptions {
    fn default() -> Self {
        Self::from_options(&EditorOptions::default())
    }
}

impl PersistedOptions {
    pub fn from_options(options: &EditorOptions) -> Self {
        Self {
            snap: options.snap,
            glow: options.glow,
            show_names: options.show_names,
            show_selected_lines_only: options.show_selected_lines_only,
            canvas_mode: options.canvas_mode,
            canvas_axis: options.canvas_axis.as_str().to_string(),
        }
    }

    pub fn to_options(&self) -> EditorOptions {
        let canvas_axis = CanvasAxis::from_name(&self.canvas_axis).unwrap_or_else(|| {
            warn!("Unknown canvas axis '{}', using XZ", self.canvas_axis);
            CanvasAxis::default()
        });
        EditorOptions {
            snap: self.snap,
            glow: self.glow,
            show_names: self.show_names,
            show_selected_lines_only: self.show_selected_lines_only,
            canvas_mode: self.canvas_mode,
            canvas_axis,
        }
    }
}

/// Persisted document state: nodes and options only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub nodes: Vec<NodeRecord>,
    pub options: PersistedOptions,
}

/// Versioned storage envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub state: PersistedState,
}

impl PersistedDocument {
    pub fn new(nodes: &[SkillNode], options: &EditorOptions) -> Self {
        Self {
            version: STORAGE_VERSION,
            state: PersistedState {
                nodes: nodes.iter().map(NodeRecord::from_node).collect(),
                options: PersistedOptions::from_options(options),
            },
        }
    }

    /// Nodes in stored order. Records without an id are dropped.
    pub fn into_nodes(self) -> Vec<SkillNode> {
        self.state
            .nodes
            .into_iter()
            .filter_map(|mut record| match record.id.take() {
                Some(id) if !id.is_empty() => Some(record.into_node(id)),
                _ => {
                    warn!("Dropping stored node record without an id");
                    None
                },
            })
            .collect()
    }
}
