//! The user's list of rated movies.
//!
//! `WatchedList` is the only writer of its storage slot. It is loaded once
//! at startup and every mutation writes the whole list back.

use tracing::{debug, info};

use crate::error::PopcornError;
use crate::models::{WatchedEntry, WatchedSummary};
use crate::storage::Storage;

/// Outcome of [`WatchedList::add_or_update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchedUpdate {
    /// New entry appended.
    Added,
    /// Existing entry replaced with a different rating.
    Replaced,
    /// Same rating resubmitted, nothing changed.
    Unchanged,
    /// Rating outside `1..=10`, nothing changed.
    Rejected,
}

pub struct WatchedList {
    storage: Storage,
    key: String,
    entries: Vec<WatchedEntry>,
}

impl WatchedList {
    /// Load the list stored under `key`.
    pub fn load(storage: Storage, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = storage.load_watched(&key);
        debug!(key = %key, count = entries.len(), "Loaded watched list");
        Self {
            storage,
            key,
            entries,
        }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WatchedEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(&self.entries)
    }

    /// Add a new rating or replace an existing one with a different rating.
    ///
    /// The list only changes once the new snapshot has been written.
    pub fn add_or_update(&mut self, entry: WatchedEntry) -> Result<WatchedUpdate, PopcornError> {
        if !entry.has_valid_rating() {
            debug!(id = %entry.id, rating = entry.user_rating, "Rejected rating");
            return Ok(WatchedUpdate::Rejected);
        }

        let mut next = self.entries.clone();
        let outcome = match next.iter().position(|e| e.id == entry.id) {
            None => {
                next.push(entry.clone());
                WatchedUpdate::Added
            }
            Some(idx) if next[idx].user_rating != entry.user_rating => {
                next[idx] = entry.clone();
                WatchedUpdate::Replaced
            }
            Some(_) => return Ok(WatchedUpdate::Unchanged),
        };

        self.commit(next)?;
        info!(
            id = %entry.id,
            rating = entry.user_rating,
            outcome = ?outcome,
            "Watched list updated"
        );
        Ok(outcome)
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool, PopcornError> {
        let Some(idx) = self.entries.iter().position(|e| e.id == id) else {
            return Ok(false);
        };
        let mut next = self.entries.clone();
        next.remove(idx);

        self.commit(next)?;
        info!(id, "Removed from watched list");
        Ok(true)
    }

    fn commit(&mut self, next: Vec<WatchedEntry>) -> Result<(), PopcornError> {
        self.storage.save_watched(&self.key, &next)?;
        self.entries = next;
        Ok(())
    }
}
