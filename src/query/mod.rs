pub mod filter;
pub mod page;

pub use filter::{needs_relabeling, MinScore, RecordFilter};
pub use page::{paginate, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

use crate::records::AccessibilityRecord;
use crate::scoring::ScoringConfig;

/// Filter `items` and cut one page out of the result, keeping source order
pub fn run_query<'a, T: AsRef<AccessibilityRecord>>(
    items: &'a [T],
    filter: &RecordFilter,
    request: PageRequest,
    scoring: &ScoringConfig,
) -> Page<&'a T> {
    paginate(filter.apply(items, scoring), request)
}
