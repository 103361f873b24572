/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Transient gesture state. Never persisted, never part of undo history.

use std::time::{Duration, Instant};

use crate::graph::RelationshipKind;
use crate::stack::StackKey;

/// Active edge-picking gesture: the next node click links `source_id` to the
/// clicked node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickingMode {
    pub source_id: String,
    pub kind: RelationshipKind,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionState {
    picking: Option<PickingMode>,
    is_dragging: bool,
    hovered_stack: Option<StackKey>,
    /// Fire-once signal: consumers react to a change, not the value.
    focus_trigger: u64,
    /// At most one pending clear; rescheduling replaces it.
    hover_clear_due: Option<Instant>,
}

impl InteractionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn picking(&self) -> Option<&PickingMode> {
        self.picking.as_ref()
    }

    pub fn is_picking(&self) -> bool {
        self.picking.is_some()
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    pub fn hovered_stack(&self) -> Option<StackKey> {
        self.hovered_stack
    }

    pub fn focus_trigger(&self) -> u64 {
        self.focus_trigger
    }

    pub fn has_pending_hover_clear(&self) -> bool {
        self.hover_clear_due.is_some()
    }

    pub(crate) fn start_picking(&mut self, source_id: &str, kind: RelationshipKind) {
        self.picking = Some(PickingMode {
            source_id: source_id.to_string(),
            kind,
        });
    }

    pub(crate) fn stop_picking(&mut self) -> Option<PickingMode> {
        self.picking.take()
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.is_dragging = dragging;
    }

    /// A new hover supersedes any pending clear.
    pub(crate) fn set_hovered_stack(&mut self, key: Option<StackKey>) {
        self.hover_clear_due = None;
        self.hovered_stack = key;
    }

    pub(crate) fn schedule_hover_clear(&mut self, now: Instant, delay: Duration) {
        self.hover_clear_due = Some(now + delay);
    }

    /// Apply a due hover clear. Returns true when the hovered stack was
    /// cleared by this call.
    pub(crate) fn poll_hover_clear(&mut self, now: Instant) -> bool {
        match self.hover_clear_due {
            Some(due) if now >= due => {
                self.hover_clear_due = None;
                self.hovered_stack.take().is_some()
            },
            _ => false,
        }
    }

    pub(crate) fn trigger_focus(&mut self) -> u64 {
        self.focus_trigger = self.focus_trigger.wrapping_add(1);
        self.focus_trigger
    }

    /// Keep picking consistent with a node rename.
    pub(crate) fn rename_node(&mut self, old_id: &str, new_id: &str) {
        if let Some(picking) = &mut self.picking {
            if picking.source_id == old_id {
                picking.source_id = new_id.to_string();
            }
        }
    }

    /// Leave picking mode if its source no longer exists.
    pub(crate) fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        if self
            .picking
            .as_ref()
            .is_some_and(|picking| !exists(&picking.source_id))
        {
            log::debug!("Picking source vanished; leaving picking mode");
            self.picking = None;
        }
    }

    /// Back to idle. Focus trigger keeps counting.
    pub(crate) fn reset(&mut self) {
        let focus_trigger = self.focus_trigger;
        *self = Self {
            focus_trigger,
            ..Self::default()
        };
    }
}
