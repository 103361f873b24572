/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Reward annotations attached to a skill node.

pub const STAT_CHANGE: &str = "STAT_CHANGE";
pub const SPELL_CHANGE: &str = "SPELL_CHANGE";

pub const DEFAULT_STAT_TYPE: &str = "HEALTH";
pub const DEFAULT_STAT_VALUE: f64 = 10.0;
pub const DEFAULT_GRANT_ID: &str = "fireball";
pub const DEFAULT_GRANT_LEVEL: i64 = 1;

/// How a stat change combines with the base value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatModifierType {
    #[default]
    Additive,
    AdditiveMultiplier,
    CompoundMultiplier,
    Setter,
}

impl StatModifierType {
    pub const ALL: [StatModifierType; 4] = [
        StatModifierType::Additive,
        StatModifierType::AdditiveMultiplier,
        StatModifierType::CompoundMultiplier,
        StatModifierType::Setter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StatModifierType::Additive => "ADDITIVE",
            StatModifierType::AdditiveMultiplier => "ADDITIVE_MULTIPLIER",
            StatModifierType::CompoundMultiplier => "COMPOUND_MULTIPLIER",
            StatModifierType::Setter => "SETTER",
        }
    }

    pub fn from_name(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == raw)
    }
}

/// Discriminant of a [`Change`]. Anything that is not a stat change is a
/// grant (spell or ability) and keeps its original type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Stat,
    Grant(String),
}

impl ChangeKind {
    pub fn spell() -> Self {
        ChangeKind::Grant(SPELL_CHANGE.to_string())
    }

    pub fn from_type_name(raw: &str) -> Self {
        if raw == STAT_CHANGE {
            ChangeKind::Stat
        } else {
            ChangeKind::Grant(raw.to_string())
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ChangeKind::Stat => STAT_CHANGE,
            ChangeKind::Grant(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Stat {
        stat_type: String,
        modifier: StatModifierType,
        value: f64,
    },
    Grant {
        /// Type name carried in the `type` field, usually `SPELL_CHANGE`.
        change_type: String,
        id: String,
        level: i64,
        source_data: String,
    },
}

impl Change {
    /// New change of `kind` populated with editor defaults.
    pub fn with_defaults(kind: &ChangeKind) -> Self {
        match kind {
            ChangeKind::Stat => Change::Stat {
                stat_type: DEFAULT_STAT_TYPE.to_string(),
                modifier: StatModifierType::Additive,
                value: DEFAULT_STAT_VALUE,
            },
            ChangeKind::Grant(change_type) => Change::Grant {
                change_type: change_type.clone(),
                id: DEFAULT_GRANT_ID.to_string(),
                level: DEFAULT_GRANT_LEVEL,
                source_data: String::new(),
            },
        }
    }

    pub fn kind(&self) -> ChangeKind {
        match self {
            Change::Stat { .. } => ChangeKind::Stat,
            Change::Grant { change_type, .. } => ChangeKind::Grant(change_type.clone()),
        }
    }

    /// One-line summary shown under a selected node's name.
    pub fn label(&self) -> String {
        match self {
            Change::Stat {
                stat_type,
                modifier,
                value,
            } => {
                let sign = if *modifier == StatModifierType::Additive {
                    "+"
                } else {
                    ""
                };
                format!("{stat_type}: {sign}{value}")
            },
            Change::Grant { id, level, .. } => format!("{id} (Lvl {level})"),
        }
    }
}

/// Partial change fields for `update_change`. Fields that do not belong to
/// the target's variant are ignored; the discriminant cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangePatch {
    pub stat_type: Option<String>,
    pub modifier: Option<StatModifierType>,
    pub value: Option<f64>,
    pub id: Option<String>,
    pub level: Option<i64>,
    pub source_data: Option<String>,
}

impl ChangePatch {
    pub fn stat_type(mut self, stat_type: impl Into<String>) -> Self {
        self.stat_type = Some(stat_type.into());
        self
    }

    pub fn modifier(mut self, modifier: StatModifierType) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn source_data(mut self, source_data: impl Into<String>) -> Self {
        self.source_data = Some(source_data.into());
        self
    }

    /// Returns whether any field changed.
    pub(crate) fn apply_to(&self, change: &mut Change) -> bool {
        let before = change.clone();
        match change {
            Change::Stat {
                stat_type,
                modifier,
                value,
            } => {
                if let Some(new_stat_type) = &self.stat_type {
                    stat_type.clone_from(new_stat_type);
                }
                if let Some(new_modifier) = self.modifier {
                    *modifier = new_modifier;
                }
                if let Some(new_value) = self.value {
                    *value = new_value;
                }
            },
            Change::Grant {
                id,
                level,
                source_data,
                ..
            } => {
                if let Some(new_id) = &self.id {
                    id.clone_from(new_id);
                }
                if let Some(new_level) = self.level {
                    *level = new_level;
                }
                if let Some(new_source_data) = &self.source_data {
                    source_data.clone_from(new_source_data);
                }
            },
        }
        *change != before
    }
}
