use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::types::ReviewState;
use crate::records::{AccessibilityRecord, QueueRecord, ReviewStatus, ReviewedRecord, SourceRecord};

/// Pending review work: queue-source records plus dataset records flagged
/// locally, without anything already completed locally.
///
/// Queue-source order comes first, then flagged dataset records in dataset
/// order. A path appears at most once.
pub fn review_queue(
    queue: Vec<SourceRecord>,
    dataset: &[SourceRecord],
    state: &ReviewState,
) -> Vec<QueueRecord> {
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    for item in queue {
        if state.is_completed(item.file_path()) || !seen.insert(item.file_path().to_string()) {
            continue;
        }
        pending.push(match item {
            SourceRecord::QueuePending(q) => q,
            other => QueueRecord::from(other.into_record()),
        });
    }

    for item in dataset {
        let path = item.file_path();
        let Some(flag) = state.flagged.get(path) else {
            continue;
        };
        if !seen.insert(path.to_string()) {
            continue;
        }
        let mut queued = QueueRecord::from(item.record().clone());
        queued.review_reason = flag.reason.clone();
        pending.push(queued);
    }

    pending
}

/// The given paths that no dataset record has, in argument order. Flagging
/// such a path never surfaces it in the review queue.
pub fn unknown_paths<'a>(paths: &'a [String], dataset: &[SourceRecord]) -> Vec<&'a str> {
    let known: HashSet<&str> = dataset.iter().map(|item| item.file_path()).collect();
    paths
        .iter()
        .map(String::as_str)
        .filter(|path| !known.contains(path))
        .collect()
}

/// Reviewed-source records merged with local completions, newest first.
///
/// A local completion overrides the source's review fields for the same
/// path. Its accessibility labels come from the reviewed source, else the
/// dataset, else the record is bare.
pub fn reviewed_list(
    reviewed: Vec<SourceRecord>,
    dataset: &[SourceRecord],
    state: &ReviewState,
) -> Vec<ReviewedRecord> {
    let mut by_path: HashMap<String, ReviewedRecord> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for item in reviewed {
        let entry = match item {
            SourceRecord::Reviewed(r) => r,
            other => ReviewedRecord::from(other.into_record()),
        };
        let path = entry.record.file_path.clone();
        if by_path.insert(path.clone(), entry).is_none() {
            order.push(path);
        }
    }

    let dataset_by_path: HashMap<&str, &AccessibilityRecord> = dataset
        .iter()
        .map(|item| (item.file_path(), item.record()))
        .collect();

    let mut completed: Vec<_> = state.completed.iter().collect();
    completed.sort_by(|a, b| a.0.cmp(b.0));
    for (path, done) in completed {
        let entry = by_path.entry(path.clone()).or_insert_with(|| {
            order.push(path.clone());
            let record = dataset_by_path
                .get(path.as_str())
                .map(|r| (*r).clone())
                .unwrap_or_else(|| AccessibilityRecord::new(path.clone()));
            ReviewedRecord::from(record)
        });
        entry.reviewed_at = Some(done.reviewed_at);
        entry.reviewed_by = done.reviewed_by.clone();
        entry.status = Some(done.status);
    }

    let mut list: Vec<ReviewedRecord> = order
        .into_iter()
        .filter_map(|path| by_path.remove(&path))
        .collect();
    // Stable: undated entries keep source order at the end
    list.sort_by(|a, b| match (a.reviewed_at, b.reviewed_at) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    list
}

/// Criteria for the reviewed list. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewedFilter {
    /// Only reviews newer than this; undated reviews never match
    pub since: Option<Duration>,
    pub reviewer: Option<String>,
    pub status: Option<ReviewStatus>,
    pub search: Option<String>,
}

impl ReviewedFilter {
    pub fn matches(&self, item: &ReviewedRecord, now: DateTime<Utc>) -> bool {
        if let Some(since) = self.since {
            let Some(reviewed_at) = item.reviewed_at else {
                return false;
            };
            let cutoff = chrono::Duration::from_std(since)
                .ok()
                .and_then(|d| now.checked_sub_signed(d))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            if reviewed_at < cutoff {
                return false;
            }
        }

        if let Some(reviewer) = &self.reviewer {
            if item.reviewed_by.as_deref() != Some(reviewer.as_str()) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if item.status != Some(status) {
                return false;
            }
        }

        if let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            if !item
                .record
                .file_path
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, items: Vec<ReviewedRecord>, now: DateTime<Utc>) -> Vec<ReviewedRecord> {
        items
            .into_iter()
            .filter(|item| self.matches(item, now))
            .collect()
    }
}

impl From<AccessibilityRecord> for QueueRecord {
    fn from(record: AccessibilityRecord) -> Self {
        QueueRecord {
            record,
            review_reason: None,
            priority: None,
            batch: None,
            confidence: None,
        }
    }
}

impl From<AccessibilityRecord> for ReviewedRecord {
    fn from(record: AccessibilityRecord) -> Self {
        ReviewedRecord {
            record,
            reviewed_at: None,
            reviewed_by: None,
            status: None,
            category: None,
        }
    }
}
