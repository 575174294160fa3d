//! Durable submission store.
//!
//! The store holds three kinds of records:
//!
//! - **processed ids**: the idempotency ledger. Once inserted an id is
//!   never removed, so duplicate deliveries are permanent no-ops.
//! - **pending snippets**: per-author accumulation, at most two entries at
//!   rest; insertion order is significant (first two become R and G).
//! - **archive**: append-only log of successfully generated triples.
//!
//! [`MemoryStore`] keeps everything in process memory (tests, one-shot
//! runs); [`JsonStore`] persists the same state to a JSON file after every
//! mutation.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;

/// An author's successfully generated triple, recorded write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    /// Author handle.
    pub author: String,
    /// Snippet used for the red channel.
    pub red: String,
    /// Snippet used for the green channel.
    pub green: String,
    /// Snippet used for the blue channel.
    pub blue: String,
}

/// Durable key-value operations the state machine relies on.
///
/// Implementations provide their own atomicity per operation; the bot
/// never assumes in-process locking protects the store from other
/// clients.
pub trait SubmissionStore: Send + Sync {
    /// Whether a message id has already been claimed.
    fn is_processed(&self, id: &str) -> Result<bool, StoreError>;

    /// Claim a message id. Claiming is permanent.
    fn mark_processed(&self, id: &str) -> Result<(), StoreError>;

    /// The author's pending snippets, oldest first.
    fn pending(&self, author: &str) -> Result<Vec<String>, StoreError>;

    /// Append a snippet to the author's pending record.
    fn push_pending(&self, author: &str, text: &str) -> Result<(), StoreError>;

    /// Drop the author's pending record.
    fn clear_pending(&self, author: &str) -> Result<(), StoreError>;

    /// Append an archive entry.
    fn record_archive(&self, entry: &ArchiveEntry) -> Result<(), StoreError>;
}

/// Serialized store state, shared by both backends.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    /// Claimed message ids.
    #[serde(default)]
    processed: BTreeSet<String>,

    /// Pending snippets per author, oldest first.
    #[serde(default)]
    pending: BTreeMap<String, Vec<String>>,

    /// Successfully generated triples.
    #[serde(default)]
    archive: Vec<ArchiveEntry>,
}

/// In-memory store backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of archived triples. Mostly useful in tests.
    pub fn archive_len(&self) -> usize {
        self.state().archive.len()
    }

    /// The archived triples, oldest first.
    pub fn archived(&self) -> Vec<ArchiveEntry> {
        self.state().archive.clone()
    }
}

impl SubmissionStore for MemoryStore {
    fn is_processed(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.state().processed.contains(id))
    }

    fn mark_processed(&self, id: &str) -> Result<(), StoreError> {
        self.state().processed.insert(id.to_string());
        Ok(())
    }

    fn pending(&self, author: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.state().pending.get(author).cloned().unwrap_or_default())
    }

    fn push_pending(&self, author: &str, text: &str) -> Result<(), StoreError> {
        self.state()
            .pending
            .entry(author.to_string())
            .or_default()
            .push(text.to_string());
        Ok(())
    }

    fn clear_pending(&self, author: &str) -> Result<(), StoreError> {
        self.state().pending.remove(author);
        Ok(())
    }

    fn record_archive(&self, entry: &ArchiveEntry) -> Result<(), StoreError> {
        self.state().archive.push(entry.clone());
        Ok(())
    }
}

/// JSON-file store backend.
///
/// The whole state is rewritten after every mutation; reads are served
/// from memory. Good enough for a single bot instance polling every
/// couple of minutes.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonStore {
    /// Open a store file, creating an empty state when the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            StoreState::default()
        };
        debug!(path = %path.display(), "opened submission store");
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SubmissionStore for JsonStore {
    fn is_processed(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.state().processed.contains(id))
    }

    fn mark_processed(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state();
        state.processed.insert(id.to_string());
        self.persist(&state)
    }

    fn pending(&self, author: &str) -> Result<Vec<String>, StoreError> {
        Ok(self.state().pending.get(author).cloned().unwrap_or_default())
    }

    fn push_pending(&self, author: &str, text: &str) -> Result<(), StoreError> {
        let mut state = self.state();
        state
            .pending
            .entry(author.to_string())
            .or_default()
            .push(text.to_string());
        self.persist(&state)
    }

    fn clear_pending(&self, author: &str) -> Result<(), StoreError> {
        let mut state = self.state();
        state.pending.remove(author);
        self.persist(&state)
    }

    fn record_archive(&self, entry: &ArchiveEntry) -> Result<(), StoreError> {
        let mut state = self.state();
        state.archive.push(entry.clone());
        self.persist(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_dedup_ledger() {
        let store = MemoryStore::new();
        assert!(!store.is_processed("100").unwrap());
        store.mark_processed("100").unwrap();
        assert!(store.is_processed("100").unwrap());
    }

    #[test]
    fn test_memory_store_pending_order() {
        let store = MemoryStore::new();
        store.push_pending("ada", "(i)").unwrap();
        store.push_pending("ada", "(j)").unwrap();
        assert_eq!(store.pending("ada").unwrap(), vec!["(i)", "(j)"]);
        store.clear_pending("ada").unwrap();
        assert!(store.pending("ada").unwrap().is_empty());
    }

    #[test]
    fn test_memory_store_pending_is_per_author() {
        let store = MemoryStore::new();
        store.push_pending("ada", "(i)").unwrap();
        assert!(store.pending("grace").unwrap().is_empty());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonStore::open(&path).unwrap();
        store.mark_processed("42").unwrap();
        store.push_pending("ada", "(+ i j)").unwrap();
        store
            .record_archive(&ArchiveEntry {
                author: "ada".to_string(),
                red: "i".to_string(),
                green: "j".to_string(),
                blue: "(+ i j)".to_string(),
            })
            .unwrap();
        drop(store);

        let reopened = JsonStore::open(&path).unwrap();
        assert!(reopened.is_processed("42").unwrap());
        assert_eq!(reopened.pending("ada").unwrap(), vec!["(+ i j)"]);
        assert!(!reopened.is_processed("43").unwrap());
    }

    #[test]
    fn test_json_store_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested/data/store.json");
        let store = JsonStore::open(&path).unwrap();
        store.mark_processed("1").unwrap();
        assert!(path.exists());
    }
}
