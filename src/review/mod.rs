pub mod assemble;
pub mod storage;
pub mod types;

pub use assemble::{review_queue, reviewed_list, unknown_paths, ReviewedFilter};
pub use storage::{load_review_state, save_review_state};
pub use types::{FlagEntry, ReviewEntry, ReviewState};
