/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Presentation toggles persisted alongside the graph.
//!
//! Options are stored with the document but never enter undo history.

use euclid::default::{Point3D, Vector3D};

/// Plane used by canvas (flat) mode. The remaining axis is "up".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasAxis {
    #[default]
    XZ,
    XY,
    YZ,
}

impl CanvasAxis {
    pub fn as_str(self) -> &'static str {
        match self {
            CanvasAxis::XZ => "XZ",
            CanvasAxis::XY => "XY",
            CanvasAxis::YZ => "YZ",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "XZ" => Some(CanvasAxis::XZ),
            "XY" => Some(CanvasAxis::XY),
            "YZ" => Some(CanvasAxis::YZ),
            _ => None,
        }
    }

    /// The two in-plane coordinates of `point`.
    pub fn project(self, point: Point3D<f64>) -> (f64, f64) {
        match self {
            CanvasAxis::XZ => (point.x, point.z),
            CanvasAxis::XY => (point.x, point.y),
            CanvasAxis::YZ => (point.y, point.z),
        }
    }

    /// Lift an in-plane offset back into world space (up component zero).
    pub fn lift(self, a: f64, b: f64) -> Vector3D<f64> {
        match self {
            CanvasAxis::XZ => Vector3D::new(a, 0.0, b),
            CanvasAxis::XY => Vector3D::new(a, b, 0.0),
            CanvasAxis::YZ => Vector3D::new(0.0, a, b),
        }
    }
}

/// Boolean presentation toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorOption {
    /// Snap drag targets to the unit grid.
    Snap,
    Glow,
    ShowNames,
    ShowSelectedLinesOnly,
    CanvasMode,
}

impl EditorOption {
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "snap" => Some(EditorOption::Snap),
            "glow" => Some(EditorOption::Glow),
            "showNames" | "show_names" => Some(EditorOption::ShowNames),
            "showSelectedLinesOnly" | "show_selected_lines_only" => {
                Some(EditorOption::ShowSelectedLinesOnly)
            },
            "canvasMode" | "canvas_mode" => Some(EditorOption::CanvasMode),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub snap: bool,
    pub glow: bool,
    pub show_names: bool,
    pub show_selected_lines_only: bool,
    pub canvas_mode: bool,
    pub canvas_axis: CanvasAxis,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            snap: false,
            glow: true,
            show_names: true,
            show_selected_lines_only: false,
            canvas_mode: false,
            canvas_axis: CanvasAxis::XZ,
        }
    }
}

impl EditorOptions {
    pub fn get(&self, option: EditorOption) -> bool {
        match option {
            EditorOption::Snap => self.snap,
            EditorOption::Glow => self.glow,
            EditorOption::ShowNames => self.show_names,
            EditorOption::ShowSelectedLinesOnly => self.show_selected_lines_only,
            EditorOption::CanvasMode => self.canvas_mode,
        }
    }

    pub fn toggle(&mut self, option: EditorOption) {
        let flag = match option {
            EditorOption::Snap => &mut self.snap,
            EditorOption::Glow => &mut self.glow,
            EditorOption::ShowNames => &mut self.show_names,
            EditorOption::ShowSelectedLinesOnly => &mut self.show_selected_lines_only,
            EditorOption::CanvasMode => &mut self.canvas_mode,
        };
        *flag = !*flag;
    }
}
