/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Skill graph editor state.
//!
//! `SkillGraphEditor` owns the document, options, selection, interaction
//! state, undo history, clipboard and store. Every document write goes
//! through one of its operations, which keep edge lists, selection and
//! picking consistent, record history and autosave.

use euclid::default::{Point3D, Vector3D};
use log::{debug, info, warn};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Instant;

use crate::clipboard::NodeClipboard;
use crate::config::EditorConfig;
use crate::graph::{
    ChangeKind, ChangePatch, NodePatch, RelationshipKind, RenameError, SkillGraph, SkillNode,
};
use crate::history::UndoHistory;
use crate::interaction::InteractionState;
use crate::interchange::{self, ImportError};
use crate::options::{CanvasAxis, EditorOption, EditorOptions};
use crate::persistence::types::PersistedDocument;
use crate::persistence::{GraphStore, GraphStoreError};
use crate::selection::{SelectionState, SelectionUpdateMode};
use crate::stack::{self, Stack, StackKey};

/// Grid step used when snapping drag targets.
pub const SNAP_GRID: f64 = 1.0;

/// Radius of the presentation fan-out for a hovered stack.
pub const DEFAULT_FAN_OUT_SPREAD: f64 = 1.0;

/// Editor-level requests, applied in order by [`SkillGraphEditor::apply_intents`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphIntent {
    AddNode,
    RemoveNode {
        id: String,
    },
    RemoveSelectedNodes,
    UpdateNode {
        id: String,
        patch: NodePatch,
    },
    RenameNode {
        old_id: String,
        new_id: String,
    },
    SelectNode {
        /// `None` clears the selection.
        id: Option<String>,
        multi_select: bool,
    },
    UpdateSelection {
        ids: Vec<String>,
        mode: SelectionUpdateMode,
    },
    SelectAll,
    AddRelationship {
        source_id: String,
        target_id: String,
        kind: RelationshipKind,
    },
    RemoveRelationship {
        source_id: String,
        target_id: String,
        kind: RelationshipKind,
    },
    AddChange {
        node_id: String,
        kind: ChangeKind,
    },
    UpdateChange {
        node_id: String,
        index: usize,
        patch: ChangePatch,
    },
    RemoveChange {
        node_id: String,
        index: usize,
    },
    Undo,
    Redo,
    ToggleOption {
        option: EditorOption,
    },
    SetCanvasAxis {
        axis: CanvasAxis,
    },
    StartPicking {
        source_id: String,
        kind: RelationshipKind,
    },
    StopPicking,
    NodeClicked {
        id: String,
        multi_select: bool,
    },
    SetDragging {
        dragging: bool,
    },
    CommitDrag {
        target: Point3D<f64>,
    },
    SetHoveredStack {
        key: Option<StackKey>,
    },
    TriggerFocus,
    CopySelection,
    Paste,
}

/// What a node click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClickOutcome {
    /// Picking mode created (or already had) the edge and ended.
    Linked,
    /// Picking mode ignored a click on its own source and stays active.
    SelfLinkRejected,
    Selected,
    /// The clicked id is not in the document.
    Ignored,
}

/// The state-owning editor service.
pub struct SkillGraphEditor {
    graph: SkillGraph,
    options: EditorOptions,
    selection: SelectionState,
    interaction: InteractionState,
    history: UndoHistory,
    clipboard: NodeClipboard,
    persistence: Option<GraphStore>,
    config: EditorConfig,
    /// Document as it was when the open gesture batch started.
    batch_origin: Option<SkillGraph>,
}

impl SkillGraphEditor {
    /// Open the editor on the configured data directory, recovering the
    /// stored document. Falls back to an unsaved in-memory editor when no
    /// store can be opened.
    pub fn new(config: EditorConfig) -> Self {
        match config.resolved_data_dir() {
            Some(dir) => Self::new_from_dir(dir, config),
            None => {
                warn!("No data directory available; changes will not be saved");
                Self::new_in_memory(config)
            },
        }
    }

    /// Open the editor using a specific persistence directory.
    pub fn new_from_dir(data_dir: PathBuf, config: EditorConfig) -> Self {
        let mut editor = Self::new_in_memory(config);
        match GraphStore::open(data_dir) {
            Ok(store) => {
                if let Some((graph, options)) = store.recover() {
                    editor.graph = graph;
                    editor.options = options;
                }
                editor.persistence = Some(store);
            },
            Err(e) => warn!("Failed to open graph store: {e}"),
        }
        editor
    }

    /// Editor without storage.
    pub fn new_in_memory(config: EditorConfig) -> Self {
        Self {
            graph: SkillGraph::new(),
            options: EditorOptions::default(),
            selection: SelectionState::new(),
            interaction: InteractionState::new(),
            history: UndoHistory::new(config.max_undo_steps),
            clipboard: NodeClipboard::default(),
            persistence: None,
            config,
            batch_origin: None,
        }
    }

    pub fn new_for_testing() -> Self {
        Self::new_in_memory(EditorConfig::default())
    }

    // --- Read access ---

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn nodes(&self) -> &[SkillNode] {
        self.graph.nodes()
    }

    pub fn get_node(&self, id: &str) -> Option<&SkillNode> {
        self.graph.get_node(id)
    }

    pub fn position_of(&self, id: &str) -> Option<Point3D<f64>> {
        self.graph.position_of(id)
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn clipboard(&self) -> &NodeClipboard {
        &self.clipboard
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn has_persistence(&self) -> bool {
        self.persistence.is_some()
    }

    pub fn undo_len(&self) -> usize {
        self.history.past_len()
    }

    pub fn redo_len(&self) -> usize {
        self.history.future_len()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Document mutations ---

    /// Append a placeholder node with a fresh id and select only it.
    pub fn add_node(&mut self) -> String {
        let id = self.graph.generate_node_id();
        let node = SkillNode::new_placeholder(id.clone());
        self.commit(|graph| {
            graph.push_node(node);
            true
        });
        self.selection.select(&id, false);
        id
    }

    /// Append pre-built nodes and select exactly them. Ids are not
    /// deduplicated; lookups of a duplicated id return the last node.
    pub fn add_nodes(&mut self, nodes: Vec<SkillNode>) -> Vec<String> {
        if nodes.is_empty() {
            return Vec::new();
        }
        let ids: Vec<String> = nodes.iter().map(|node| node.id.clone()).collect();
        self.commit(|graph| {
            graph.extend_nodes(nodes);
            true
        });
        self.selection
            .update_many(ids.clone(), SelectionUpdateMode::Replace);
        ids
    }

    /// Shallow-merge `patch` into the node. Absent ids are a no-op.
    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        self.commit(|graph| graph.update_node(id, patch))
    }

    /// Rename a node, cascading to edge lists, selection and picking.
    /// Returns false (and changes nothing) on collision, unknown id or empty
    /// id.
    pub fn update_node_id(&mut self, old_id: &str, new_id: &str) -> bool {
        self.try_update_node_id(old_id, new_id).is_ok()
    }

    pub fn try_update_node_id(&mut self, old_id: &str, new_id: &str) -> Result<(), RenameError> {
        let before = self.history_checkpoint();
        if let Err(e) = self.graph.rename_node(old_id, new_id) {
            warn!("Rejected rename of '{old_id}': {e}");
            return Err(e);
        }
        if old_id == new_id {
            return Ok(());
        }
        self.selection.rename(old_id, new_id);
        self.interaction.rename_node(old_id, new_id);
        self.finish_commit(before);
        Ok(())
    }

    /// Delete the node and every reference to it. Absent ids are a no-op.
    pub fn remove_node(&mut self, id: &str) -> bool {
        self.commit(|graph| graph.remove_node(id))
    }

    /// Delete every selected node as one undo step.
    pub fn remove_selected(&mut self) -> bool {
        let ids = self.selection.ids().to_vec();
        if ids.is_empty() {
            return false;
        }
        self.batch(|editor| {
            for id in &ids {
                editor.remove_node(id);
            }
        })
    }

    /// Append `target_id` to the source's edge list unless present.
    pub fn add_relationship(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: RelationshipKind,
    ) -> bool {
        self.commit(|graph| graph.add_relationship(source_id, target_id, kind))
    }

    pub fn remove_relationship(
        &mut self,
        source_id: &str,
        target_id: &str,
        kind: RelationshipKind,
    ) -> bool {
        self.commit(|graph| graph.remove_relationship(source_id, target_id, kind))
    }

    pub fn add_change(&mut self, node_id: &str, kind: &ChangeKind) -> bool {
        self.commit(|graph| graph.add_change(node_id, kind))
    }

    /// Out-of-range indices are ignored.
    pub fn update_change(&mut self, node_id: &str, index: usize, patch: &ChangePatch) -> bool {
        self.commit(|graph| graph.update_change(node_id, index, patch))
    }

    pub fn remove_change(&mut self, node_id: &str, index: usize) -> bool {
        self.commit(|graph| graph.remove_change(node_id, index))
    }

    /// Replace the whole node list from interchange data. On error the
    /// document is untouched. Selection keeps only ids that survive.
    pub fn import_graph(&mut self, data: &Value) -> Result<(), ImportError> {
        let nodes = interchange::nodes_from_value(data)?;
        let imported = SkillGraph::from_nodes(nodes);
        info!("Importing {} node(s)", imported.node_count());
        self.commit(|graph| {
            if *graph == imported {
                return false;
            }
            *graph = imported;
            true
        });
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let data: Value =
            serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;
        self.import_graph(&data)
    }

    /// Apply edits from the raw JSON view.
    pub fn apply_raw_json(&mut self, text: &str) -> Result<(), ImportError> {
        self.import_json(text).inspect_err(|e| warn!("Raw JSON not applied: {e}"))
    }

    pub fn export_value(&self) -> Value {
        interchange::export_value(&self.graph)
    }

    pub fn export_json(&self) -> String {
        interchange::export_json(&self.graph)
    }

    // --- History ---

    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.graph) else {
            return false;
        };
        self.graph = previous;
        self.sync_transient_state();
        self.autosave();
        debug!(
            "Undo; {} step(s) left, {} redoable",
            self.history.past_len(),
            self.history.future_len()
        );
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.graph) else {
            return false;
        };
        self.graph = next;
        self.sync_transient_state();
        self.autosave();
        debug!(
            "Redo; {} step(s) left, {} undoable",
            self.history.future_len(),
            self.history.past_len()
        );
        true
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Empty document, default options, idle interaction, no history.
    pub fn reset(&mut self) {
        self.graph = SkillGraph::new();
        self.options = EditorOptions::default();
        self.selection.clear();
        self.interaction.reset();
        self.history.clear();
        self.clipboard = NodeClipboard::default();
        self.batch_origin = None;
        if let Some(store) = &mut self.persistence {
            if let Err(e) = store.clear_all() {
                warn!("Failed to clear persisted graph data: {e}");
            }
        }
    }

    // --- Options ---

    /// Options are persisted but never enter history.
    pub fn toggle_option(&mut self, option: EditorOption) {
        self.options.toggle(option);
        self.autosave();
    }

    pub fn set_canvas_axis(&mut self, axis: CanvasAxis) {
        if self.options.canvas_axis != axis {
            self.options.canvas_axis = axis;
            self.autosave();
        }
    }

    // --- Selection & interaction ---

    /// `None` clears. Unknown ids are ignored.
    pub fn select_node(&mut self, id: Option<&str>, multi_select: bool) {
        match id {
            None => self.selection.clear(),
            Some(id) if self.graph.contains(id) => self.selection.select(id, multi_select),
            Some(id) => debug!("Ignoring selection of unknown node '{id}'"),
        }
    }

    pub fn update_selection(&mut self, ids: Vec<String>, mode: SelectionUpdateMode) {
        let ids = ids
            .into_iter()
            .filter(|id| self.graph.contains(id))
            .collect();
        self.selection.update_many(ids, mode);
    }

    pub fn select_all(&mut self) {
        let ids = self.graph.ids().map(str::to_string).collect();
        self.selection.update_many(ids, SelectionUpdateMode::Replace);
    }

    /// Enter picking mode. Returns false when the source does not exist.
    pub fn start_picking(&mut self, source_id: &str, kind: RelationshipKind) -> bool {
        if !self.graph.contains(source_id) {
            return false;
        }
        self.interaction.start_picking(source_id, kind);
        true
    }

    pub fn stop_picking(&mut self) {
        self.interaction.stop_picking();
    }

    /// Route a node click: in picking mode it links the source to `id`,
    /// otherwise it selects.
    pub fn handle_node_click(&mut self, id: &str, multi_select: bool) -> NodeClickOutcome {
        if !self.graph.contains(id) {
            return NodeClickOutcome::Ignored;
        }
        let Some(picking) = self.interaction.picking().cloned() else {
            self.selection.select(id, multi_select);
            return NodeClickOutcome::Selected;
        };
        if picking.source_id == id {
            debug!("Ignoring self-link pick on '{id}'");
            return NodeClickOutcome::SelfLinkRejected;
        }
        self.add_relationship(&picking.source_id, id, picking.kind);
        self.interaction.stop_picking();
        NodeClickOutcome::Linked
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.interaction.set_dragging(dragging);
    }

    /// End a drag: move the primary node to `target` and every other
    /// selected node by the same delta, as one undo step. Positions are
    /// rounded to two decimals; with snap on, `target` is first snapped to
    /// the grid.
    pub fn commit_drag(&mut self, target: Point3D<f64>) -> bool {
        self.interaction.set_dragging(false);
        let Some(origin) = self
            .selection
            .primary()
            .and_then(|primary| self.graph.position_of(primary))
        else {
            return false;
        };

        let target = if self.options.snap {
            snap_to_grid(target, SNAP_GRID)
        } else {
            target
        };
        let delta: Vector3D<f64> = round_point(target) - origin;
        let moves: Vec<(String, Point3D<f64>)> = self
            .selection
            .ids()
            .iter()
            .filter_map(|id| {
                let position = self.graph.position_of(id)?;
                Some((id.clone(), round_point(position + delta)))
            })
            .collect();

        self.batch(|editor| {
            for (id, position) in &moves {
                editor.update_node(id, &NodePatch::position(*position));
            }
        })
    }

    pub fn set_hovered_stack(&mut self, key: Option<StackKey>) {
        self.interaction.set_hovered_stack(key);
    }

    /// Clear the hovered stack after the configured delay unless a new
    /// hover arrives first.
    pub fn schedule_hover_clear(&mut self, now: Instant) {
        let delay = self.config.hover_clear_delay();
        self.interaction.schedule_hover_clear(now, delay);
    }

    pub fn poll_hover_clear(&mut self, now: Instant) -> bool {
        self.interaction.poll_hover_clear(now)
    }

    pub fn trigger_focus(&mut self) -> u64 {
        self.interaction.trigger_focus()
    }

    /// Overlapping node clusters on the current canvas plane.
    pub fn stacks(&self) -> Vec<Stack> {
        stack::find_stacks(
            &self.graph,
            self.options.canvas_axis,
            self.config.stack_tolerance,
        )
    }

    /// Ids sharing the stack key of `position`.
    pub fn stack_at(&self, position: Point3D<f64>) -> Vec<String> {
        let axis = self.options.canvas_axis;
        stack::nodes_in_stack(
            &self.graph,
            StackKey::of(position, axis),
            axis,
            self.config.stack_tolerance,
        )
    }

    /// Select the next member of an overlapping hit set. Returns the newly
    /// selected id.
    pub fn cycle_stack_selection(&mut self, hits: &[String]) -> Option<String> {
        let existing: Vec<String> = hits
            .iter()
            .filter(|id| self.graph.contains(id))
            .cloned()
            .collect();
        let next = stack::cycle_stack_selection(&existing, &self.selection)?;
        self.selection.select(&next, false);
        Some(next)
    }

    /// Derived offsets for the hovered stack. Positions in the document are
    /// never touched.
    pub fn hovered_fan_out(&self, spread: f64) -> Vec<(String, Vector3D<f64>)> {
        let Some(key) = self.interaction.hovered_stack() else {
            return Vec::new();
        };
        let axis = self.options.canvas_axis;
        let members = stack::nodes_in_stack(&self.graph, key, axis, self.config.stack_tolerance);
        stack::fan_out_offsets(&members, axis, spread)
    }

    // --- Clipboard ---

    pub fn copy_selection(&mut self) -> usize {
        self.clipboard = NodeClipboard::copy_from(
            &self.graph,
            self.selection.ids().iter().map(String::as_str),
        );
        self.clipboard.len()
    }

    /// Paste clipboard copies with fresh ids, shifted by the configured
    /// offset, and select them.
    pub fn paste(&mut self) -> Vec<String> {
        let copies = self
            .clipboard
            .instantiate(&self.graph, self.config.paste_offset());
        debug!("Pasting {} node(s)", copies.len());
        self.add_nodes(copies)
    }

    // --- Intents ---

    pub fn apply_intents<I>(&mut self, intents: I)
    where
        I: IntoIterator<Item = GraphIntent>,
    {
        for intent in intents {
            self.apply_intent(intent);
        }
    }

    fn apply_intent(&mut self, intent: GraphIntent) {
        match intent {
            GraphIntent::AddNode => {
                self.add_node();
            },
            GraphIntent::RemoveNode { id } => {
                self.remove_node(&id);
            },
            GraphIntent::RemoveSelectedNodes => {
                self.remove_selected();
            },
            GraphIntent::UpdateNode { id, patch } => {
                self.update_node(&id, &patch);
            },
            GraphIntent::RenameNode { old_id, new_id } => {
                let _ = self.try_update_node_id(&old_id, &new_id);
            },
            GraphIntent::SelectNode { id, multi_select } => {
                self.select_node(id.as_deref(), multi_select)
            },
            GraphIntent::UpdateSelection { ids, mode } => self.update_selection(ids, mode),
            GraphIntent::SelectAll => self.select_all(),
            GraphIntent::AddRelationship {
                source_id,
                target_id,
                kind,
            } => {
                self.add_relationship(&source_id, &target_id, kind);
            },
            GraphIntent::RemoveRelationship {
                source_id,
                target_id,
                kind,
            } => {
                self.remove_relationship(&source_id, &target_id, kind);
            },
            GraphIntent::AddChange { node_id, kind } => {
                self.add_change(&node_id, &kind);
            },
            GraphIntent::UpdateChange {
                node_id,
                index,
                patch,
            } => {
                self.update_change(&node_id, index, &patch);
            },
            GraphIntent::RemoveChange { node_id, index } => {
                self.remove_change(&node_id, index);
            },
            GraphIntent::Undo => {
                let _ = self.undo();
            },
            GraphIntent::Redo => {
                let _ = self.redo();
            },
            GraphIntent::ToggleOption { option } => self.toggle_option(option),
            GraphIntent::SetCanvasAxis { axis } => self.set_canvas_axis(axis),
            GraphIntent::StartPicking { source_id, kind } => {
                self.start_picking(&source_id, kind);
            },
            GraphIntent::StopPicking => self.stop_picking(),
            GraphIntent::NodeClicked { id, multi_select } => {
                self.handle_node_click(&id, multi_select);
            },
            GraphIntent::SetDragging { dragging } => self.set_dragging(dragging),
            GraphIntent::CommitDrag { target } => {
                self.commit_drag(target);
            },
            GraphIntent::SetHoveredStack { key } => self.set_hovered_stack(key),
            GraphIntent::TriggerFocus => {
                self.trigger_focus();
            },
            GraphIntent::CopySelection => {
                self.copy_selection();
            },
            GraphIntent::Paste => {
                self.paste();
            },
        }
    }

    // --- Persistence ---

    /// Write the current document now, reporting failures.
    pub fn persist(&mut self) -> Result<(), GraphStoreError> {
        let Some(store) = &mut self.persistence else {
            return Ok(());
        };
        let document = PersistedDocument::new(self.graph.nodes(), &self.options);
        store.save_document(&document)
    }

    fn autosave(&mut self) {
        if !self.config.autosave || self.batch_origin.is_some() {
            return;
        }
        if let Some(store) = &mut self.persistence {
            store.take_snapshot(&self.graph, &self.options);
        }
    }

    // --- Commit plumbing ---

    /// Pre-mutation copy for history; `None` while a batch owns the entry.
    fn history_checkpoint(&self) -> Option<SkillGraph> {
        self.batch_origin.is_none().then(|| self.graph.clone())
    }

    fn commit(&mut self, mutate: impl FnOnce(&mut SkillGraph) -> bool) -> bool {
        let before = self.history_checkpoint();
        if !mutate(&mut self.graph) {
            return false;
        }
        self.finish_commit(before);
        true
    }

    fn finish_commit(&mut self, before: Option<SkillGraph>) {
        if let Some(before) = before {
            self.history.record(before);
        }
        self.sync_transient_state();
        self.autosave();
    }

    /// Run several mutations as one history entry and one save.
    fn batch(&mut self, apply: impl FnOnce(&mut Self)) -> bool {
        if self.batch_origin.is_some() {
            apply(self);
            return false;
        }
        self.batch_origin = Some(self.graph.clone());
        apply(self);
        let Some(origin) = self.batch_origin.take() else {
            return false;
        };
        if origin == self.graph {
            return false;
        }
        self.history.record(origin);
        self.autosave();
        true
    }

    /// Drop selection and picking references to nodes that no longer exist.
    fn sync_transient_state(&mut self) {
        let graph = &self.graph;
        self.selection.retain_existing(|id| graph.contains(id));
        self.interaction.retain_existing(|id| graph.contains(id));
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_point(point: Point3D<f64>) -> Point3D<f64> {
    Point3D::new(round2(point.x), round2(point.y), round2(point.z))
}

fn snap_to_grid(point: Point3D<f64>, step: f64) -> Point3D<f64> {
    Point3D::new(
        (point.x / step).round() * step,
        (point.y / step).round() * step,
        (point.z / step).round() * step,
    )
}
