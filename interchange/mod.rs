/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Interchange JSON: an object mapping node id to node record.
//!
//! Export writes every field (including the id) so a round trip is
//! lossless. Import accepts any subset of fields and default-fills the rest.
//! Parsing is all-or-nothing: callers never see a partial node list.

use serde_json::{Map, Value};

use crate::graph::{SkillGraph, SkillNode};
use crate::persistence::types::NodeRecord;

/// Why interchange input was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Text is not valid JSON.
    Parse(String),
    /// Top-level value is not an object.
    NotAnObject,
    /// A record could not be read as a node.
    InvalidRecord { id: String, message: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Parse(e) => write!(f, "Invalid JSON: {e}"),
            ImportError::NotAnObject => write!(f, "Expected an object mapping node ids to records"),
            ImportError::InvalidRecord { id, message } => {
                write!(f, "Invalid record for node '{id}': {message}")
            },
        }
    }
}

impl std::error::Error for ImportError {}

/// Export `graph` as an id → record object, in document order.
pub fn export_value(graph: &SkillGraph) -> Value {
    let mut map = Map::with_capacity(graph.node_count());
    for node in graph.nodes() {
        match serde_json::to_value(NodeRecord::from_node(node)) {
            Ok(record) => {
                map.insert(node.id.clone(), record);
            },
            Err(e) => log::warn!("Skipping node '{}' during export: {e}", node.id),
        }
    }
    Value::Object(map)
}

/// Pretty-printed export, as shown by the raw JSON view.
pub fn export_json(graph: &SkillGraph) -> String {
    let value = export_value(graph);
    serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
        log::warn!("Failed to format export: {e}");
        String::from("{}")
    })
}

/// Build nodes from an already-parsed interchange value. Record order is
/// preserved; a `null` record reads as an empty one.
pub fn nodes_from_value(data: &Value) -> Result<Vec<SkillNode>, ImportError> {
    let Value::Object(records) = data else {
        return Err(ImportError::NotAnObject);
    };

    let mut nodes = Vec::with_capacity(records.len());
    for (id, raw) in records {
        let record = match raw {
            Value::Null => NodeRecord::default(),
            Value::Object(_) => {
                serde_json::from_value::<NodeRecord>(raw.clone()).map_err(|e| {
                    ImportError::InvalidRecord {
                        id: id.clone(),
                        message: e.to_string(),
                    }
                })?
            },
            _ => {
                return Err(ImportError::InvalidRecord {
                    id: id.clone(),
                    message: "expected an object".to_string(),
                });
            },
        };
        nodes.push(record.into_node(id.clone()));
    }
    Ok(nodes)
}

/// Parse interchange text into nodes.
pub fn parse_interchange(text: &str) -> Result<Vec<SkillNode>, ImportError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ImportError::Parse(e.to_string()))?;
    nodes_from_value(&value)
}
