/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Editor configuration loaded from TOML.

use euclid::default::Vector3D;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clipboard::DEFAULT_PASTE_OFFSET;
use crate::history::MAX_UNDO_STEPS;
use crate::persistence::GraphStore;
use crate::stack::DEFAULT_STACK_TOLERANCE;

pub const DEFAULT_HOVER_CLEAR_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Storage directory. `None` uses the platform config directory.
    pub data_dir: Option<PathBuf>,
    /// Undo depth; `0` (the default) keeps every step.
    pub max_undo_steps: usize,
    /// Persist after every committed mutation.
    pub autosave: bool,
    pub log_filter: Option<String>,
    pub paste_offset: [f64; 3],
    pub stack_tolerance: f64,
    pub hover_clear_delay_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            max_undo_steps: MAX_UNDO_STEPS,
            autosave: true,
            log_filter: None,
            paste_offset: DEFAULT_PASTE_OFFSET,
            stack_tolerance: DEFAULT_STACK_TOLERANCE,
            hover_clear_delay_ms: DEFAULT_HOVER_CLEAR_DELAY_MS,
        }
    }
}

impl EditorConfig {
    /// Load config from file. A missing file yields defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            },
            Err(e) => return Err(ConfigError::Io(format!("{}: {e}", path.display()))),
        };
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolved storage directory.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(GraphStore::default_data_dir)
    }

    pub fn paste_offset(&self) -> Vector3D<f64> {
        let [x, y, z] = self.paste_offset;
        Vector3D::new(x, y, z)
    }

    pub fn hover_clear_delay(&self) -> Duration {
        Duration::from_millis(self.hover_clear_delay_ms)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config IO error: {e}"),
            ConfigError::Parse(e) => write!(f, "Config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
