use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::records::ReviewStatus;

/// Review decisions taken from this machine, keyed by image file path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewState {
    pub version: u32,
    #[serde(default)]
    pub completed: HashMap<String, ReviewEntry>,
    #[serde(default)]
    pub flagged: HashMap<String, FlagEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub reviewed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    pub status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagEntry {
    pub flagged_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewState {
    /// Format version written by this build
    pub const VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::VERSION,
            completed: HashMap::new(),
            flagged: HashMap::new(),
        }
    }

    pub fn is_completed(&self, file_path: &str) -> bool {
        self.completed.contains_key(file_path)
    }

    pub fn is_flagged(&self, file_path: &str) -> bool {
        self.flagged.contains_key(file_path)
    }

    /// Record a finished review. Clears any pending flag for the path.
    pub fn complete(
        &mut self,
        file_path: String,
        reviewed_by: Option<String>,
        status: ReviewStatus,
        note: Option<String>,
    ) {
        self.flagged.remove(&file_path);
        self.completed.insert(
            file_path,
            ReviewEntry {
                reviewed_at: Utc::now(),
                reviewed_by,
                status,
                note,
            },
        );
    }

    /// Send a path (back) to the review queue. Clears any completion.
    pub fn flag(&mut self, file_path: String, reason: Option<String>) {
        self.completed.remove(&file_path);
        self.flagged.insert(
            file_path,
            FlagEntry {
                flagged_at: Utc::now(),
                reason,
            },
        );
    }

    /// Paths that are both completed and flagged, sorted. Only a hand-edited
    /// file can contain these.
    pub fn conflicts(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .completed
            .keys()
            .filter(|path| self.flagged.contains_key(*path))
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    /// Keep only the most recent decision for a conflicting path. A tie goes
    /// to the completion.
    pub fn resolve(&mut self, file_path: &str) {
        let (Some(done), Some(flag)) = (self.completed.get(file_path), self.flagged.get(file_path))
        else {
            return;
        };
        if flag.flagged_at > done.reviewed_at {
            self.completed.remove(file_path);
        } else {
            self.flagged.remove(file_path);
        }
    }
}
