pub mod loader;
pub mod types;

pub use loader::{parse_jsonl, parse_line};
pub use types::{
    AccessibilityRecord, ChairFlags, ChairType, Priority, QueueRecord, RecordKind, ReviewStatus,
    ReviewedRecord, SourceRecord, WidthClass,
};
