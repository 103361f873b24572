/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Skill graph editing engine.
//!
//! The crate owns the authoritative skill graph document and every write to
//! it. Presentation layers (3D scene, sidebar forms, file pickers) read
//! snapshots from [`SkillGraphEditor`] and send [`GraphIntent`]s back.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod graph;
pub mod history;
pub mod interaction;
pub mod interchange;
pub mod options;
pub mod persistence;
pub mod selection;
pub mod stack;

pub use app::{GraphIntent, SkillGraphEditor};
pub use graph::{
    Change, ChangeKind, ChangePatch, ItemRef, NodePatch, RelationshipKind, RenameError,
    SkillGraph, SkillNode, StatModifierType,
};
pub use options::{CanvasAxis, EditorOption, EditorOptions};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
