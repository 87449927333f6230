use super::types::{RecordKind, SourceRecord};
use tracing::{debug, warn};

/// Parse one JSONL line into the record shape of `kind`
pub fn parse_line(line: &str, kind: RecordKind) -> serde_json::Result<SourceRecord> {
    Ok(match kind {
        RecordKind::Raw => SourceRecord::Raw(serde_json::from_str(line)?),
        RecordKind::Reviewed => SourceRecord::Reviewed(serde_json::from_str(line)?),
        RecordKind::QueuePending => SourceRecord::QueuePending(serde_json::from_str(line)?),
    })
}

/// Parse newline-delimited JSON records.
///
/// Blank lines are ignored. A line that fails to parse is logged with its
/// 1-based line number and skipped; the rest of the content still loads.
pub fn parse_jsonl(content: &str, kind: RecordKind) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    let mut skipped = 0usize;

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line, kind) {
            Ok(record) => records.push(record),
            Err(e) => {
                skipped += 1;
                warn!(line = idx + 1, error = %e, "skipping malformed record");
            }
        }
    }

    debug!(loaded = records.len(), skipped, "parsed JSONL records");
    records
}
