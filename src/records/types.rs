use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::images::ImageNamespace;

/// Passage-width category observed in a store image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidthClass {
    Wide,
    Normal,
    Narrow,
    NotPassable,
    /// Label not known to this version; never matches a filter, never penalized
    #[serde(other)]
    Other,
}

impl WidthClass {
    /// Known categories in display order
    pub const KNOWN: [WidthClass; 4] = [
        WidthClass::Wide,
        WidthClass::Normal,
        WidthClass::Narrow,
        WidthClass::NotPassable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidthClass::Wide => "wide",
            WidthClass::Normal => "normal",
            WidthClass::Narrow => "narrow",
            WidthClass::NotPassable => "not_passable",
            WidthClass::Other => "other",
        }
    }
}

impl fmt::Display for WidthClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidthClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wide" => Ok(WidthClass::Wide),
            "normal" => Ok(WidthClass::Normal),
            "narrow" => Ok(WidthClass::Narrow),
            "not_passable" | "not-passable" => Ok(WidthClass::NotPassable),
            other => Err(format!(
                "unknown width class '{}' (expected wide, normal, narrow, not_passable)",
                other
            )),
        }
    }
}

/// Seating accommodation flags. Absent flags read as false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChairFlags {
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_movable_chair: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_high_movable_chair: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_fixed_chair: bool,
    #[serde(default, deserialize_with = "null_as_false")]
    pub has_floor_chair: bool,
}

impl ChairFlags {
    pub fn has(&self, chair_type: ChairType) -> bool {
        match chair_type {
            ChairType::Movable => self.has_movable_chair,
            ChairType::HighMovable => self.has_high_movable_chair,
            ChairType::Fixed => self.has_fixed_chair,
            ChairType::Floor => self.has_floor_chair,
        }
    }

    /// Chair types present on this record, in display order
    pub fn types(&self) -> Vec<ChairType> {
        ChairType::ALL.into_iter().filter(|t| self.has(*t)).collect()
    }
}

/// Chair type used by filters and statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChairType {
    Movable,
    HighMovable,
    Fixed,
    Floor,
}

impl ChairType {
    pub const ALL: [ChairType; 4] = [
        ChairType::Movable,
        ChairType::HighMovable,
        ChairType::Fixed,
        ChairType::Floor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChairType::Movable => "movable",
            ChairType::HighMovable => "high_movable",
            ChairType::Fixed => "fixed",
            ChairType::Floor => "floor",
        }
    }
}

impl fmt::Display for ChairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChairType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movable" => Ok(ChairType::Movable),
            "high_movable" | "high-movable" => Ok(ChairType::HighMovable),
            "fixed" => Ok(ChairType::Fixed),
            "floor" => Ok(ChairType::Floor),
            other => Err(format!(
                "unknown chair type '{}' (expected movable, high_movable, fixed, floor)",
                other
            )),
        }
    }
}

/// The common view every data source is normalized to before scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityRecord {
    pub file_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_step: Option<bool>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub width_class: Vec<WidthClass>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chair: Option<ChairFlags>,
}

impl AccessibilityRecord {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            has_step: None,
            width_class: Vec::new(),
            chair: None,
        }
    }

    /// Absent `has_step` counts as no step
    pub fn has_step(&self) -> bool {
        self.has_step.unwrap_or(false)
    }

    pub fn has_width(&self, width: WidthClass) -> bool {
        self.width_class.contains(&width)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<WidthClass>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<WidthClass>>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Review timestamps come from several tools. RFC 3339 is preferred; a naive
/// date-time or a bare date is read as UTC. Anything else is dropped with a
/// warning and the record is kept undated.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match &value {
        None | Some(serde_json::Value::Null) => return Ok(None),
        Some(serde_json::Value::String(text)) => parse_timestamp(text),
        Some(_) => None,
    };
    if parsed.is_none() {
        warn!(value = %value.unwrap_or_default(), "ignoring unreadable reviewed_at");
    }
    Ok(parsed)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Outcome a reviewer assigned to an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[serde(alias = "정상", alias = "normal")]
    Approved,
    #[serde(alias = "보류")]
    OnHold,
    #[serde(alias = "폐기")]
    Discarded,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::OnHold => "on_hold",
            ReviewStatus::Discarded => "discarded",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "approved" | "normal" | "정상" => Ok(ReviewStatus::Approved),
            "on_hold" | "on-hold" | "보류" => Ok(ReviewStatus::OnHold),
            "discarded" | "폐기" => Ok(ReviewStatus::Discarded),
            other => Err(format!(
                "unknown review status '{}' (expected approved, on_hold, discarded)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
    #[serde(other)]
    Unspecified,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Unspecified => "-",
        }
    }
}

/// A record that went through human review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewedRecord {
    #[serde(flatten)]
    pub record: AccessibilityRecord,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A record waiting in the review queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRecord {
    #[serde(flatten)]
    pub record: AccessibilityRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Which shape the lines of a data file have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Raw,
    Reviewed,
    QueuePending,
}

/// A record as read from one of the data sources.
///
/// Each variant carries only the fields its source provides; `record()` gives
/// the normalized view used for scoring and filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SourceRecord {
    Raw(AccessibilityRecord),
    Reviewed(ReviewedRecord),
    QueuePending(QueueRecord),
}

impl SourceRecord {
    pub fn record(&self) -> &AccessibilityRecord {
        match self {
            SourceRecord::Raw(r) => r,
            SourceRecord::Reviewed(r) => &r.record,
            SourceRecord::QueuePending(r) => &r.record,
        }
    }

    pub fn into_record(self) -> AccessibilityRecord {
        match self {
            SourceRecord::Raw(r) => r,
            SourceRecord::Reviewed(r) => r.record,
            SourceRecord::QueuePending(r) => r.record,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.record().file_path
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            SourceRecord::Raw(_) => RecordKind::Raw,
            SourceRecord::Reviewed(_) => RecordKind::Reviewed,
            SourceRecord::QueuePending(_) => RecordKind::QueuePending,
        }
    }

    /// Folder namespace the image for this record is served from
    pub fn namespace(&self) -> ImageNamespace {
        match self {
            SourceRecord::Raw(_) => ImageNamespace::Collection,
            SourceRecord::Reviewed(_) => ImageNamespace::Reviewed,
            SourceRecord::QueuePending(_) => ImageNamespace::ReviewQueue,
        }
    }
}

impl AsRef<AccessibilityRecord> for SourceRecord {
    fn as_ref(&self) -> &AccessibilityRecord {
        self.record()
    }
}

impl AsRef<AccessibilityRecord> for QueueRecord {
    fn as_ref(&self) -> &AccessibilityRecord {
        &self.record
    }
}

impl AsRef<AccessibilityRecord> for ReviewedRecord {
    fn as_ref(&self) -> &AccessibilityRecord {
        &self.record
    }
}

impl AsRef<AccessibilityRecord> for AccessibilityRecord {
    fn as_ref(&self) -> &AccessibilityRecord {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults_for_missing_fields() {
        let record: AccessibilityRecord =
            serde_json::from_str(r#"{"file_path":"a.webp"}"#).unwrap();
        assert_eq!(record.has_step, None);
        assert!(!record.has_step());
        assert!(record.width_class.is_empty());
        assert!(record.chair.is_none());
    }

    #[test]
    fn test_null_width_class_is_empty() {
        let record: AccessibilityRecord =
            serde_json::from_str(r#"{"file_path":"a.webp","width_class":null}"#).unwrap();
        assert!(record.width_class.is_empty());
    }

    #[test]
    fn test_unknown_width_label_is_other() {
        let record: AccessibilityRecord =
            serde_json::from_str(r#"{"file_path":"a.webp","width_class":["wide","huge"]}"#)
                .unwrap();
        assert_eq!(record.width_class, vec![WidthClass::Wide, WidthClass::Other]);
    }

    #[test]
    fn test_partial_chair_flags() {
        let record: AccessibilityRecord = serde_json::from_str(
            r#"{"file_path":"a.webp","chair":{"has_fixed_chair":true}}"#,
        )
        .unwrap();
        let chair = record.chair.unwrap();
        assert!(chair.has(ChairType::Fixed));
        assert!(!chair.has(ChairType::Movable));
        assert_eq!(chair.types(), vec![ChairType::Fixed]);
    }

    #[test]
    fn test_width_class_from_str() {
        assert_eq!("not_passable".parse::<WidthClass>(), Ok(WidthClass::NotPassable));
        assert_eq!("Narrow".parse::<WidthClass>(), Ok(WidthClass::Narrow));
        assert!("other".parse::<WidthClass>().is_err());
    }

    #[test]
    fn test_chair_type_from_str() {
        assert_eq!("high_movable".parse::<ChairType>(), Ok(ChairType::HighMovable));
        assert!("sofa".parse::<ChairType>().is_err());
    }

    #[test]
    fn test_review_status_korean_aliases() {
        let reviewed: ReviewedRecord = serde_json::from_str(
            r#"{"file_path":"a.webp","status":"보류","reviewed_by":"admin"}"#,
        )
        .unwrap();
        assert_eq!(reviewed.status, Some(ReviewStatus::OnHold));
        assert_eq!("폐기".parse::<ReviewStatus>(), Ok(ReviewStatus::Discarded));
    }

    #[test]
    fn test_queue_record_keeps_own_fields() {
        let queued: QueueRecord = serde_json::from_str(
            r#"{"file_path":"batch_01/x.webp","has_step":true,"priority":"urgent","confidence":0.4,"batch":"batch_01"}"#,
        )
        .unwrap();
        assert_eq!(queued.record.has_step, Some(true));
        assert_eq!(queued.priority, Some(Priority::Unspecified));
        assert_eq!(queued.confidence, Some(0.4));
        assert_eq!(queued.batch.as_deref(), Some("batch_01"));
    }

    #[test]
    fn test_source_record_namespace() {
        let raw = SourceRecord::Raw(AccessibilityRecord::new("a.webp"));
        assert_eq!(raw.namespace(), ImageNamespace::Collection);
        assert_eq!(raw.kind(), RecordKind::Raw);
        assert_eq!(raw.file_path(), "a.webp");
    }

    #[test]
    fn test_source_record_serializes_with_tag() {
        let raw = SourceRecord::Raw(AccessibilityRecord::new("a.webp"));
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["source"], "raw");
        assert_eq!(json["file_path"], "a.webp");
    }
}
