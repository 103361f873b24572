/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Document persistence using redb.
//!
//! Architecture:
//! - One versioned JSON record (`{version, state: {nodes, options}}`) under a
//!   fixed key, rewritten after every committed change
//! - Older versions are default-filled on load; newer versions load
//!   best-effort
//! - Undo history is never stored

pub mod types;

use log::{info, warn};
use redb::{ReadableDatabase, ReadableTable};
use std::path::{Path, PathBuf};

use crate::graph::SkillGraph;
use crate::options::EditorOptions;
use types::{PersistedDocument, STORAGE_NAME, STORAGE_VERSION};

const DOCUMENT_TABLE: redb::TableDefinition<&str, &[u8]> = redb::TableDefinition::new("documents");
const DATABASE_FILE: &str = "skillgraph.redb";

/// Persistent document store backed by a single redb file.
pub struct GraphStore {
    db: redb::Database,
    path: PathBuf,
}

impl GraphStore {
    /// Open or create a store in the given directory.
    pub fn open(base_dir: PathBuf) -> Result<Self, GraphStoreError> {
        std::fs::create_dir_all(&base_dir)
            .map_err(|e| GraphStoreError::Io(format!("Failed to create dir: {e}")))?;

        let path = base_dir.join(DATABASE_FILE);
        let db = redb::Database::create(&path).map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        info!("Opened graph store at {}", path.display());
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current document, replacing the previous record.
    pub fn save_document(&mut self, document: &PersistedDocument) -> Result<(), GraphStoreError> {
        let bytes = serde_json::to_vec(document)
            .map_err(|e| GraphStoreError::Serialization(format!("{e}")))?;

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(DOCUMENT_TABLE)
                .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
            table
                .insert(STORAGE_NAME, bytes.as_slice())
                .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        Ok(())
    }

    /// Snapshot `graph` and `options`. Failures are logged, not returned.
    pub fn take_snapshot(&mut self, graph: &SkillGraph, options: &EditorOptions) {
        let document = PersistedDocument::new(graph.nodes(), options);
        if let Err(e) = self.save_document(&document) {
            warn!("Failed to write document snapshot: {e}");
        }
    }

    /// Read and migrate the stored record, if any.
    pub fn load_document(&self) -> Result<Option<PersistedDocument>, GraphStoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        let table = match read_txn.open_table(DOCUMENT_TABLE) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(GraphStoreError::Redb(format!("{e}"))),
        };
        let Some(entry) = table
            .get(STORAGE_NAME)
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?
        else {
            return Ok(None);
        };
        let document = decode_document(entry.value())?;
        Ok(Some(migrate_document(document)))
    }

    /// Recover the stored document. A missing or unreadable record yields
    /// `None`; unreadable records are logged.
    pub fn recover(&self) -> Option<(SkillGraph, EditorOptions)> {
        match self.load_document() {
            Ok(Some(document)) => {
                let options = document.state.options.to_options();
                let graph = SkillGraph::from_nodes(document.into_nodes());
                info!("Recovered {} node(s) from storage", graph.node_count());
                Some((graph, options))
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to recover stored document: {e}");
                None
            },
        }
    }

    /// Remove the stored record.
    pub fn clear_all(&mut self) -> Result<(), GraphStoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        {
            let mut table = write_txn
                .open_table(DOCUMENT_TABLE)
                .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
            table
                .remove(STORAGE_NAME)
                .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        }
        write_txn
            .commit()
            .map_err(|e| GraphStoreError::Redb(format!("{e}")))?;
        Ok(())
    }

    /// Default storage directory for graph data, when the platform has one.
    pub fn default_data_dir() -> Option<PathBuf> {
        let mut dir = dirs::config_dir()?;
        dir.push("skillgraph");
        dir.push("graphs");
        Some(dir)
    }
}

/// Parse a stored record. A record that does not fit the current shape is
/// reported as unsupported when it claims a newer version.
pub fn decode_document(bytes: &[u8]) -> Result<PersistedDocument, GraphStoreError> {
    let raw: serde_json::Value = serde_json::from_slice(bytes)
        .map_err(|e| GraphStoreError::Serialization(format!("{e}")))?;
    let version = raw
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .map(|version| u32::try_from(version).unwrap_or(u32::MAX))
        .unwrap_or(0);
    serde_json::from_value(raw).map_err(|e| {
        if version > STORAGE_VERSION {
            GraphStoreError::UnsupportedVersion(version)
        } else {
            GraphStoreError::Serialization(format!("{e}"))
        }
    })
}

/// Bring a record to the current version. Missing fields were already
/// default-filled during deserialization.
pub fn migrate_document(mut document: PersistedDocument) -> PersistedDocument {
    if document.version < STORAGE_VERSION {
        info!(
            "Migrating stored document from version {} to {STORAGE_VERSION}",
            document.version
        );
        document.version = STORAGE_VERSION;
    } else if document.version > STORAGE_VERSION {
        warn!(
            "Stored document version {} is newer than {STORAGE_VERSION}; loading best-effort",
            document.version
        );
    }
    document
}

/// Errors from the graph store
#[derive(Debug)]
pub enum GraphStoreError {
    Io(String),
    Redb(String),
    Serialization(String),
    UnsupportedVersion(u32),
}

impl std::fmt::Display for GraphStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphStoreError::Io(e) => write!(f, "IO error: {e}"),
            GraphStoreError::Redb(e) => write!(f, "Redb error: {e}"),
            GraphStoreError::Serialization(e) => write!(f, "Serialization error: {e}"),
            GraphStoreError::UnsupportedVersion(version) => {
                write!(f, "Unsupported storage version: {version}")
            },
        }
    }
}

impl std::error::Error for GraphStoreError {}
