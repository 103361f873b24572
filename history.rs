/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Linear undo/redo over whole-document snapshots.
//!
//! Entries are full clones of the node list. Selection, interaction state
//! and options are never captured, so a jump can only change nodes; callers
//! re-filter selection against the restored set.

use crate::graph::SkillGraph;

/// Default history cap. `0` keeps every step so any chain of edits can be
/// undone back to its start.
pub const MAX_UNDO_STEPS: usize = 0;

#[derive(Debug, Clone)]
pub struct UndoHistory {
    past: Vec<SkillGraph>,
    future: Vec<SkillGraph>,
    /// `0` disables the cap.
    max_steps: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(MAX_UNDO_STEPS)
    }
}

impl UndoHistory {
    pub fn new(max_steps: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            max_steps,
        }
    }

    /// Record the state that existed before a committed mutation.
    pub fn record(&mut self, previous: SkillGraph) {
        self.past.push(previous);
        self.future.clear();
        self.trim();
    }

    /// Step back. Returns the state to restore, having stashed `current`
    /// for redo.
    pub fn undo(&mut self, current: &SkillGraph) -> Option<SkillGraph> {
        let previous = self.past.pop()?;
        self.future.push(current.clone());
        Some(previous)
    }

    pub fn redo(&mut self, current: &SkillGraph) -> Option<SkillGraph> {
        let next = self.future.pop()?;
        self.past.push(current.clone());
        self.trim();
        Some(next)
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    pub fn past_len(&self) -> usize {
        self.past.len()
    }

    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    fn trim(&mut self) {
        if self.max_steps > 0 && self.past.len() > self.max_steps {
            let excess = self.past.len() - self.max_steps;
            self.past.drain(0..excess);
        }
    }
}
