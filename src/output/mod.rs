pub mod formatter;

pub use formatter::{
    format_age, format_batch, format_batches, format_detail, format_grade, format_page_footer,
    format_queue_tag, format_reviewed_tag, format_scored_table, format_statistics, format_summary,
    format_tsv, should_use_colors, ScoredJson, ScoredRecord,
};
