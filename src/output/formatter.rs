use chrono::Duration;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::collections::{Batch, BatchInfo};
use crate::records::{
    AccessibilityRecord, ChairType, Priority, QueueRecord, ReviewedRecord, SourceRecord, WidthClass,
};
use crate::scoring::{Grade, Recommendation, ScoreResult};
use crate::stats::{Statistics, Summary};

const NO_RECORDS: &str = "No records found.";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// A record with its calculated score for display
pub struct ScoredRecord<'a> {
    pub record: &'a AccessibilityRecord,
    pub result: ScoreResult,
    /// Extra trailing column (queue reason, review status)
    pub tag: Option<String>,
}

/// JSON shape of a listed item: the item's own fields plus score and grade
#[derive(Serialize)]
pub struct ScoredJson<'a, T: Serialize> {
    #[serde(flatten)]
    pub item: &'a T,
    pub score: i32,
    pub grade: Grade,
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Shorten a path from the left so the file name stays visible
fn truncate_path(path: &str, max_width: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_width {
        path.to_string()
    } else if max_width > 3 {
        let tail: String = chars[chars.len() - (max_width - 3)..].iter().collect();
        format!("...{}", tail)
    } else {
        chars[chars.len() - max_width..].iter().collect()
    }
}

pub fn format_grade(grade: Grade, use_colors: bool) -> String {
    if !use_colors {
        return grade.to_string();
    }
    match grade {
        Grade::S => grade.green().bold().to_string(),
        Grade::A => grade.green().to_string(),
        Grade::B => grade.yellow().to_string(),
        Grade::C => grade.magenta().to_string(),
        Grade::D => grade.red().bold().to_string(),
    }
}

fn format_widths(record: &AccessibilityRecord) -> String {
    if record.width_class.is_empty() {
        "-".to_string()
    } else {
        record
            .width_class
            .iter()
            .map(|w| w.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn format_chairs(record: &AccessibilityRecord) -> String {
    let types = record.chair.map(|c| c.types()).unwrap_or_default();
    if types.is_empty() {
        "-".to_string()
    } else {
        types
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Format records as a table with columns: Index, Score, Grade, Step, Path, Tag
/// No headers. `first_index` is the 1-based position of the first row, so
/// later pages keep counting.
pub fn format_scored_table(rows: &[ScoredRecord], first_index: usize, use_colors: bool) -> String {
    if rows.is_empty() {
        return NO_RECORDS.to_string();
    }

    let term_width = get_terminal_width();
    let last_index = first_index.saturating_add(rows.len() - 1);
    let index_width = last_index.to_string().len() + 1;
    let separator = "  ";

    rows.iter()
        .enumerate()
        .map(|(offset, row)| {
            let index_str = format!(
                "{:>width$}.",
                first_index.saturating_add(offset),
                width = index_width - 1
            );
            let score_str = format!("{:>4}", row.result.score);
            let step_str = if row.record.has_step() { "step" } else { "    " };
            let tag = row.tag.as_deref().unwrap_or("");

            // index, score, grade, step, separators and tag are fixed
            let fixed_width = index_width + 1 + 4 + 2 + 1 + 4 + separator.len() * 2 + tag.chars().count();
            let path = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_path(&row.record.file_path, width - fixed_width)
                }
                Some(_) => truncate_path(&row.record.file_path, 20),
                None => row.record.file_path.clone(),
            };

            let line = if use_colors {
                format!(
                    "{} {} {} {}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    format_grade(row.result.grade, true),
                    step_str.yellow(),
                    separator,
                    path
                )
            } else {
                format!(
                    "{} {} {} {}{}{}",
                    index_str,
                    score_str,
                    row.result.grade,
                    step_str,
                    separator,
                    path
                )
            };

            if tag.is_empty() {
                line
            } else if use_colors {
                format!("{}{}{}", line, separator, tag.dimmed())
            } else {
                format!("{}{}{}", line, separator, tag)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format records as tab-separated values for scripting
/// Columns: score, grade, has_step, widths, chairs, file_path, tag (no headers, no colors)
pub fn format_tsv(rows: &[ScoredRecord]) -> String {
    rows.iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                row.result.score,
                row.result.grade,
                row.record.has_step(),
                format_widths(row.record),
                format_chairs(row.record),
                row.record.file_path,
                row.tag.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// "Showing 21-40 of 57" footer for paged listings
pub fn format_page_footer(total: usize, skip: usize, shown: usize) -> String {
    if shown == 0 {
        format!("Showing 0 of {}", total)
    } else {
        format!(
            "Showing {}-{} of {}",
            skip.saturating_add(1),
            skip.saturating_add(shown),
            total
        )
    }
}

/// Tag column for a review-queue entry, e.g. "[high] low confidence (0.42)"
pub fn format_queue_tag(item: &QueueRecord) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(priority) = item.priority {
        parts.push(format!("[{}]", priority.as_str()));
    }
    if let Some(reason) = &item.review_reason {
        parts.push(reason.clone());
    }
    if let Some(confidence) = item.confidence {
        parts.push(format!("({:.2})", confidence));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Tag column for a reviewed entry, e.g. "approved by kim 3d ago"
pub fn format_reviewed_tag(item: &ReviewedRecord, now: chrono::DateTime<chrono::Utc>) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(status) = item.status {
        parts.push(status.to_string());
    }
    if let Some(by) = &item.reviewed_by {
        parts.push(format!("by {}", by));
    }
    if let Some(at) = item.reviewed_at {
        let age = format_age(now - at);
        if age == "now" {
            parts.push(age);
        } else {
            parts.push(format!("{} ago", age));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Multi-line detail view: labels, score breakdown, recommendations, image URL
pub fn format_detail(
    item: &SourceRecord,
    result: &ScoreResult,
    recommendations: &[Recommendation],
    image_url: &str,
    use_colors: bool,
) -> String {
    let record = item.record();
    let mut lines = Vec::new();

    if use_colors {
        lines.push(format!("{}", record.file_path.bold()));
    } else {
        lines.push(record.file_path.clone());
    }
    lines.push(format!(
        "  Score: {} ({})",
        result.score,
        format_grade(result.grade, use_colors)
    ));
    let step = match record.has_step {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    };
    lines.push(format!("  Step: {}", step));
    lines.push(format!("  Width: {}", format_widths(record)));
    lines.push(format!("  Chairs: {}", format_chairs(record)));

    match item {
        SourceRecord::Raw(_) => {}
        SourceRecord::Reviewed(r) => {
            if let Some(status) = r.status {
                lines.push(format!("  Status: {}", status));
            }
            if let Some(by) = &r.reviewed_by {
                lines.push(format!("  Reviewed by: {}", by));
            }
            if let Some(at) = r.reviewed_at {
                lines.push(format!("  Reviewed at: {}", at.format("%Y-%m-%d %H:%M UTC")));
            }
            if let Some(category) = &r.category {
                lines.push(format!("  Category: {}", category));
            }
        }
        SourceRecord::QueuePending(q) => {
            if let Some(tag) = format_queue_tag(q) {
                lines.push(format!("  Queue: {}", tag));
            }
            if let Some(batch) = &q.batch {
                lines.push(format!("  Batch: {}", batch));
            }
        }
    }

    lines.push(format!("  Image: {}", image_url));

    lines.push(String::new());
    lines.push(format!("  Breakdown (base {}):", result.breakdown.base_score));
    if result.breakdown.deductions.is_empty() {
        lines.push("    no deductions".to_string());
    }
    for d in &result.breakdown.deductions {
        lines.push(format!(
            "    {:<8} {:<28} {} -> {}",
            d.label, d.description, d.before, d.after
        ));
    }

    if !recommendations.is_empty() {
        lines.push(String::new());
        lines.push("  Recommendations:".to_string());
        for rec in recommendations {
            let priority = if use_colors && rec.priority == Priority::High {
                rec.priority.as_str().red().to_string()
            } else {
                rec.priority.as_str().to_string()
            };
            lines.push(format!("    [{}] {}: {}", priority, rec.title, rec.description));
        }
    }

    lines.join("\n")
}

pub fn format_summary(summary: &Summary, use_colors: bool) -> String {
    let mut lines = vec![
        format!("Images:        {}", summary.total_images),
        format!(
            "Step free:     {} ({}%)",
            summary.step_free_count, summary.step_free_percentage
        ),
        format!(
            "Average score: {} ({})",
            summary.average_score,
            format_grade(summary.average_grade, use_colors)
        ),
        String::new(),
        "Grades:".to_string(),
    ];
    for grade in Grade::ALL {
        lines.push(format!(
            "  {}  {}",
            format_grade(grade, use_colors),
            summary.grade_distribution.get(grade)
        ));
    }
    lines.push("Width:".to_string());
    for width in WidthClass::KNOWN {
        lines.push(format!(
            "  {:<13}{}",
            width.as_str(),
            summary.width_distribution.get(width)
        ));
    }
    lines.push("Chairs:".to_string());
    for chair in ChairType::ALL {
        lines.push(format!(
            "  {:<13}{}",
            chair.as_str(),
            summary.chair_types.get(chair)
        ));
    }
    lines.join("\n")
}

pub fn format_statistics(stats: &Statistics) -> String {
    let mut lines = vec![
        format!("total_images\t{}", stats.total_images),
        format!("has_step.true\t{}", stats.has_step.with_step),
        format!("has_step.false\t{}", stats.has_step.step_free),
    ];
    for width in WidthClass::KNOWN {
        lines.push(format!("width_class.{}\t{}", width.as_str(), stats.width_class.get(width)));
    }
    for chair in ChairType::ALL {
        lines.push(format!("chair_types.{}\t{}", chair.as_str(), stats.chair_types.get(chair)));
    }
    for grade in Grade::ALL {
        lines.push(format!("grade.{}\t{}", grade, stats.grade_distribution.get(grade)));
    }
    lines.push(format!("average_score\t{}", stats.average_score));
    lines.push(format!("step_free_percentage\t{}", stats.step_free_percentage));
    lines.join("\n")
}

pub fn format_batches(batches: &[BatchInfo]) -> String {
    if batches.is_empty() {
        return "No batches found.".to_string();
    }
    batches
        .iter()
        .map(|b| format!("{}\t{}", b.name, b.image_count))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One image per line, as image URLs when `urls` are given
pub fn format_batch(batch: &Batch, urls: Option<&[String]>) -> String {
    if batch.images.is_empty() {
        return format!("{}: no images", batch.name);
    }
    match urls {
        Some(urls) => urls.join("\n"),
        None => batch.images.join("\n"),
    }
}

/// Format a duration into a human-readable age string
/// "2h" for hours, "3d" for days, "1w" for weeks
pub fn format_age(duration: Duration) -> String {
    let hours = duration.num_hours();
    let days = duration.num_days();
    let weeks = days / 7;

    if weeks >= 1 {
        format!("{}w", weeks)
    } else if days >= 1 {
        format!("{}d", days)
    } else if hours >= 1 {
        format!("{}h", hours)
    } else {
        let minutes = duration.num_minutes();
        if minutes >= 1 {
            format!("{}m", minutes)
        } else {
            "now".to_string()
        }
    }
}
