pub mod config;
pub mod engine;
pub mod grade;
pub mod recommend;
pub mod validation;

pub use config::*;
pub use engine::{calculate_score, Deduction, ScoreBreakdown, ScoreResult};
pub use grade::Grade;
pub use recommend::{recommend, Recommendation};
pub use validation::validate_scoring;
