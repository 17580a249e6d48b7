//! Persisted document manifest for change detection.
//!
//! The manifest is the only durable state the pipeline owns: a JSON map of
//! document id to content hash, rewritten after each document commits. A
//! missing or corrupt file is treated as an empty manifest (full re-index),
//! never as a fatal error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// One manifest row, keyed by document id in the persisted map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// SHA-256 of the raw document bytes, hex encoded
    pub hash: String,
    /// When the document last finished indexing
    pub indexed_at: DateTime<Utc>,
}

/// Durable doc_id → hash mapping with synchronous commits.
#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    entries: BTreeMap<String, ManifestEntry>,
}

impl ManifestStore {
    /// Load the manifest at `path`, tolerating absence and corruption.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "corrupt manifest, re-indexing everything");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "unreadable manifest, re-indexing everything");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// Number of committed documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no document has committed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by document id.
    pub fn get(&self, doc_id: &str) -> Option<&ManifestEntry> {
        self.entries.get(doc_id)
    }

    /// True when `hash` matches the committed hash for `doc_id`.
    pub fn is_unchanged(&self, doc_id: &str, hash: &str) -> bool {
        self.entries
            .get(doc_id)
            .map(|entry| entry.hash == hash)
            .unwrap_or(false)
    }

    /// Record `doc_id` as fully indexed and persist synchronously.
    ///
    /// Callers must only invoke this after every vector of the document has
    /// been upserted; committing earlier risks silently skipping unwritten
    /// chunks on the next run.
    pub fn commit(&mut self, doc_id: &str, hash: &str) -> Result<()> {
        self.entries.insert(
            doc_id.to_string(),
            ManifestEntry {
                hash: hash.to_string(),
                indexed_at: Utc::now(),
            },
        );
        self.persist()
    }

    // Write-temp-then-rename so a crash mid-write never truncates the
    // previous manifest.
    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::manifest(format!("replacing {}: {e}", self.path.display())))
    }
}

/// Hex-encoded SHA-256 of the raw document bytes.
///
/// Any difference, including whitespace or re-extraction noise, triggers a
/// full re-index of the document; no partial diffing is attempted.
pub fn content_hash(raw: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw);
    hex::encode(hasher.finalize())
}
