/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use euclid::default::Point3D;

use super::{ItemRef, SkillNode};

/// Partial node fields merged by `update_node`.
///
/// There is no `id` field: renames go through
/// `update_node_id`, which cascades to edge lists and selection. Edge lists
/// and changes have their own operations too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub cost: Option<i64>,
    pub radius: Option<f64>,
    pub color: Option<String>,
    /// `Some(None)` clears the reference.
    pub activated_item: Option<Option<ItemRef>>,
    pub deactivated_item: Option<Option<ItemRef>>,
    pub activatable_item: Option<Option<ItemRef>>,
}

impl NodePatch {
    pub fn position(point: Point3D<f64>) -> Self {
        Self {
            x: Some(point.x),
            y: Some(point.y),
            z: Some(point.z),
            ..Self::default()
        }
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    pub fn y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    pub fn z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn cost(mut self, cost: i64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn activated_item(mut self, item: Option<ItemRef>) -> Self {
        self.activated_item = Some(item);
        self
    }

    pub fn deactivated_item(mut self, item: Option<ItemRef>) -> Self {
        self.deactivated_item = Some(item);
        self
    }

    pub fn activatable_item(mut self, item: Option<ItemRef>) -> Self {
        self.activatable_item = Some(item);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns whether any field changed.
    pub(crate) fn apply_to(&self, node: &mut SkillNode) -> bool {
        let before = node.clone();
        if let Some(name) = &self.display_name {
            node.display_name.clone_from(name);
        }
        if let Some(description) = &self.description {
            node.description.clone_from(description);
        }
        if let Some(x) = self.x {
            node.position.x = x;
        }
        if let Some(y) = self.y {
            node.position.y = y;
        }
        if let Some(z) = self.z {
            node.position.z = z;
        }
        if let Some(cost) = self.cost {
            node.cost = cost;
        }
        if let Some(radius) = self.radius {
            node.radius = radius;
        }
        if let Some(color) = &self.color {
            node.color.clone_from(color);
        }
        if let Some(item) = &self.activated_item {
            node.activated_item.clone_from(item);
        }
        if let Some(item) = &self.deactivated_item {
            node.deactivated_item.clone_from(item);
        }
        if let Some(item) = &self.activatable_item {
            node.activatable_item.clone_from(item);
        }
        *node != before
    }
}

/// Parse an `AARRGGBB` (or `RRGGBB`) color into alpha and RGB, tolerating
/// `0x` and `#` prefixes.
pub fn parse_argb(color: &str) -> Option<(u8, u32)> {
    let hex = color.trim().trim_start_matches("0x").trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        8 => {
            let alpha = u8::from_str_radix(&hex[..2], 16).ok()?;
            let rgb = u32::from_str_radix(&hex[2..], 16).ok()?;
            Some((alpha, rgb))
        },
        6 => Some((0xFF, u32::from_str_radix(hex, 16).ok()?)),
        _ => None,
    }
}

/// Convert a `#rrggbb` picker value into a fully opaque `FFRRGGBB` color.
pub fn color_from_rgb_picker(picker: &str) -> String {
    format!("FF{}", picker.trim_start_matches('#').to_ascii_uppercase())
}
