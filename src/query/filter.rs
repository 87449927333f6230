use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::records::{AccessibilityRecord, ChairType, WidthClass};
use crate::scoring::{calculate_score, Grade, ScoringConfig};

/// File name fragments that mark an image as needing relabeling
const RELABEL_PATTERNS: [&str; 4] = ["test", "sample", "temp", "draft"];

/// Score bucket selected by the `min_score` filter.
///
/// 90, 75 and 50 select scores at or above the value. 25 selects scores
/// strictly below 25. The lowest bucket reads as "under 25" in the review
/// queue, so the asymmetry is kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MinScore {
    AtLeast90,
    AtLeast75,
    AtLeast50,
    Below25,
}

impl MinScore {
    pub fn from_value(value: i32) -> Result<Self> {
        match value {
            90 => Ok(MinScore::AtLeast90),
            75 => Ok(MinScore::AtLeast75),
            50 => Ok(MinScore::AtLeast50),
            25 => Ok(MinScore::Below25),
            other => bail!("Unsupported min score {} (expected 90, 75, 50 or 25)", other),
        }
    }

    pub fn value(&self) -> i32 {
        match self {
            MinScore::AtLeast90 => 90,
            MinScore::AtLeast75 => 75,
            MinScore::AtLeast50 => 50,
            MinScore::Below25 => 25,
        }
    }

    pub fn matches(&self, score: i32) -> bool {
        match self {
            MinScore::Below25 => score < 25,
            other => score >= other.value(),
        }
    }
}

impl fmt::Display for MinScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinScore::Below25 => write!(f, "<{}", self.value()),
            other => write!(f, ">={}", other.value()),
        }
    }
}

impl FromStr for MinScore {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i32 = s
            .trim()
            .parse()
            .map_err(|_| format!("min score must be a number, got '{}'", s))?;
        MinScore::from_value(value).map_err(|e| e.to_string())
    }
}

/// List query criteria. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub has_step: Option<bool>,
    pub width_class: Option<WidthClass>,
    pub chair_type: Option<ChairType>,
    pub min_score: Option<MinScore>,
    pub search: Option<String>,
    pub needs_relabeling: Option<bool>,
}

impl RecordFilter {
    pub fn is_empty(&self) -> bool {
        self.has_step.is_none()
            && self.width_class.is_none()
            && self.chair_type.is_none()
            && self.min_score.is_none()
            && self.search_term().is_none()
            && self.needs_relabeling.is_none()
    }

    /// Search text, ignoring a blank query
    fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }

    /// True when the record satisfies every criterion that is set
    pub fn matches(&self, record: &AccessibilityRecord, scoring: &ScoringConfig) -> bool {
        if let Some(wanted) = self.has_step {
            if record.has_step() != wanted {
                return false;
            }
        }

        if let Some(width) = self.width_class {
            if !record.has_width(width) {
                return false;
            }
        }

        if let Some(chair_type) = self.chair_type {
            match &record.chair {
                Some(chair) if chair.has(chair_type) => {}
                _ => return false,
            }
        }

        if let Some(term) = self.search_term() {
            if !record.file_path.to_lowercase().contains(&term) {
                return false;
            }
        }

        if let Some(min_score) = self.min_score {
            let score = calculate_score(record, scoring).score;
            if !min_score.matches(score) {
                return false;
            }
        }

        if let Some(wanted) = self.needs_relabeling {
            if needs_relabeling(record, scoring) != wanted {
                return false;
            }
        }

        true
    }

    /// Matching items in their original order
    pub fn apply<'a, T: AsRef<AccessibilityRecord>>(
        &self,
        items: &'a [T],
        scoring: &ScoringConfig,
    ) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.matches(item.as_ref(), scoring))
            .collect()
    }
}

/// Heuristic for images whose labels should be redone: a placeholder-looking
/// file name, a D grade, or a step combined with contradictory width labels.
pub fn needs_relabeling(record: &AccessibilityRecord, scoring: &ScoringConfig) -> bool {
    let path = record.file_path.to_lowercase();
    if RELABEL_PATTERNS.iter().any(|p| path.contains(p)) {
        return true;
    }

    if calculate_score(record, scoring).grade == Grade::D {
        return true;
    }

    record.has_step()
        && record.has_width(WidthClass::Narrow)
        && record.has_width(WidthClass::NotPassable)
}
