/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::HashSet;

/// How a bulk selection update combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionUpdateMode {
    Replace,
    Add,
    Toggle,
}

/// Canonical node-selection state.
///
/// Holds node ids only (never nodes). Order is selection order; the last
/// entry is the primary used by single-target gestures. The revision counter
/// lets consumers detect changes without diffing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    members: HashSet<String>,
    order: Vec<String>,
    revision: u64,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Monotonic revision incremented whenever the selection changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Primary selected node (most recently selected).
    pub fn primary(&self) -> Option<&str> {
        self.order.last().map(String::as_str)
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.contains(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// `multi` toggles membership; otherwise the selection becomes exactly `{id}`.
    pub fn select(&mut self, id: &str, multi: bool) {
        if multi {
            if self.members.remove(id) {
                self.order.retain(|existing| existing != id);
            } else {
                self.members.insert(id.to_string());
                self.order.push(id.to_string());
            }
            self.bump();
            return;
        }

        if self.order.len() == 1 && self.members.contains(id) {
            return;
        }
        self.members.clear();
        self.order.clear();
        self.members.insert(id.to_string());
        self.order.push(id.to_string());
        self.bump();
    }

    pub fn clear(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.members.clear();
        self.order.clear();
        self.bump();
    }

    pub fn update_many(&mut self, ids: Vec<String>, mode: SelectionUpdateMode) {
        match mode {
            SelectionUpdateMode::Replace => {
                self.members.clear();
                self.order.clear();
                for id in ids {
                    if self.members.insert(id.clone()) {
                        self.order.push(id);
                    }
                }
                self.bump();
            },
            SelectionUpdateMode::Add => {
                let mut changed = false;
                for id in ids {
                    if self.members.insert(id.clone()) {
                        self.order.push(id);
                        changed = true;
                    }
                }
                if changed {
                    self.bump();
                }
            },
            SelectionUpdateMode::Toggle => {
                let mut changed = false;
                for id in ids {
                    if self.members.remove(&id) {
                        self.order.retain(|existing| *existing != id);
                    } else {
                        self.members.insert(id.clone());
                        self.order.push(id);
                    }
                    changed = true;
                }
                if changed {
                    self.bump();
                }
            },
        }
    }

    /// Swap `old_id` for `new_id` in place, keeping its position.
    pub(crate) fn rename(&mut self, old_id: &str, new_id: &str) {
        if !self.members.remove(old_id) {
            return;
        }
        if self.members.insert(new_id.to_string()) {
            for entry in &mut self.order {
                if entry == old_id {
                    *entry = new_id.to_string();
                }
            }
        } else {
            self.order.retain(|existing| existing != old_id);
        }
        self.bump();
    }

    /// Drop every id for which `exists` is false.
    pub(crate) fn retain_existing(&mut self, exists: impl Fn(&str) -> bool) {
        let before = self.order.len();
        self.order.retain(|id| exists(id));
        if self.order.len() != before {
            self.members = self.order.iter().cloned().collect();
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selection: &SelectionState) -> Vec<&str> {
        selection.ids().iter().map(String::as_str).collect()
    }

    #[test]
    fn test_single_select_replaces() {
        let mut selection = SelectionState::new();
        selection.select("a", false);
        selection.select("b", false);
        assert_eq!(ids(&selection), vec!["b"]);
        assert_eq!(selection.primary(), Some("b"));
    }

    #[test]
    fn test_single_select_same_node_keeps_selection() {
        let mut selection = SelectionState::new();
        selection.select("a", false);
        let revision = selection.revision();
        selection.select("a", false);
        assert_eq!(ids(&selection), vec!["a"]);
        assert_eq!(selection.revision(), revision);
    }

    #[test]
    fn test_multi_select_toggles_and_preserves_order() {
        let mut selection = SelectionState::new();
        selection.select("a", false);
        selection.select("b", true);
        selection.select("c", true);
        assert_eq!(ids(&selection), vec!["a", "b", "c"]);
        assert_eq!(selection.primary(), Some("c"));

        selection.select("b", true);
        assert_eq!(ids(&selection), vec!["a", "c"]);

        selection.select("c", true);
        assert_eq!(selection.primary(), Some("a"));
    }

    #[test]
    fn test_clear_bumps_revision_only_when_non_empty() {
        let mut selection = SelectionState::new();
        selection.clear();
        assert_eq!(selection.revision(), 0);
        selection.select("a", false);
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.revision(), 2);
    }

    #[test]
    fn test_update_many_modes() {
        let mut selection = SelectionState::new();
        selection.update_many(
            vec!["a".into(), "b".into(), "a".into()],
            SelectionUpdateMode::Replace,
        );
        assert_eq!(ids(&selection), vec!["a", "b"]);

        selection.update_many(vec!["b".into(), "c".into()], SelectionUpdateMode::Add);
        assert_eq!(ids(&selection), vec!["a", "b", "c"]);

        selection.update_many(vec!["a".into(), "d".into()], SelectionUpdateMode::Toggle);
        assert_eq!(ids(&selection), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut selection = SelectionState::new();
        selection.update_many(
            vec!["a".into(), "b".into(), "c".into()],
            SelectionUpdateMode::Replace,
        );
        selection.rename("b", "z");
        assert_eq!(ids(&selection), vec!["a", "z", "c"]);
        assert!(selection.contains("z"));
        assert!(!selection.contains("b"));
    }

    #[test]
    fn test_retain_existing() {
        let mut selection = SelectionState::new();
        selection.update_many(
            vec!["a".into(), "b".into(), "c".into()],
            SelectionUpdateMode::Replace,
        );
        selection.retain_existing(|id| id != "b");
        assert_eq!(ids(&selection), vec!["a", "c"]);
        assert!(!selection.contains("b"));
    }
}
