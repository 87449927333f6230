use serde::Serialize;

use super::config::ScoringConfig;
use super::grade::Grade;
use crate::records::{AccessibilityRecord, WidthClass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deduction {
    pub label: String,       // e.g. "Step", "Passage", "Chairs"
    pub description: String, // e.g. "not_passable -> -40"
    pub before: i32,         // Score before this deduction
    pub after: i32,          // Score after this deduction
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base_score: i32,
    pub deductions: Vec<Deduction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: i32,
    pub grade: Grade,
    pub breakdown: ScoreBreakdown,
}

/// Compute the accessibility score and grade of a record.
///
/// Missing attributes never cost points. The result is not clamped.
pub fn calculate_score(record: &AccessibilityRecord, config: &ScoringConfig) -> ScoreResult {
    let base_score = config.base_score();
    let mut score = base_score;
    let mut deductions = Vec::new();

    if record.has_step() {
        let before = score;
        score -= config.step_penalty();
        deductions.push(Deduction {
            label: "Step".to_string(),
            description: format!("step at entrance -> -{}", config.step_penalty()),
            before,
            after: score,
        });
    }

    if let Some((width, penalty)) = width_penalty(&record.width_class, config) {
        if penalty != 0 {
            let before = score;
            score -= penalty;
            deductions.push(Deduction {
                label: "Passage".to_string(),
                description: format!("{} -> -{}", width, penalty),
                before,
                after: score,
            });
        }
    }

    if let Some(chair) = &record.chair {
        if !chair.has_movable_chair {
            let before = score;
            score -= config.no_movable_chair_penalty();
            deductions.push(Deduction {
                label: "Chairs".to_string(),
                description: format!(
                    "no movable chair -> -{}",
                    config.no_movable_chair_penalty()
                ),
                before,
                after: score,
            });
        }
    }

    ScoreResult {
        score,
        grade: config.grades().grade(score as f64),
        breakdown: ScoreBreakdown {
            base_score,
            deductions,
        },
    }
}

/// First matching width category in precedence order, with its penalty
fn width_penalty(widths: &[WidthClass], config: &ScoringConfig) -> Option<(WidthClass, i32)> {
    let penalties = config.width();
    [
        (WidthClass::NotPassable, penalties.not_passable()),
        (WidthClass::Narrow, penalties.narrow()),
        (WidthClass::Normal, penalties.normal()),
        (WidthClass::Wide, penalties.wide()),
    ]
    .into_iter()
    .find(|(width, _)| widths.contains(width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ChairFlags;
    use crate::scoring::WidthPenalties;

    fn sample_record(
        has_step: Option<bool>,
        widths: &[WidthClass],
        movable: Option<bool>,
    ) -> AccessibilityRecord {
        AccessibilityRecord {
            file_path: "store.webp".to_string(),
            has_step,
            width_class: widths.to_vec(),
            chair: movable.map(|m| ChairFlags {
                has_movable_chair: m,
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_fully_accessible_record() {
        let record = sample_record(Some(false), &[WidthClass::Wide], Some(true));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, Grade::S);
        assert!(result.breakdown.deductions.is_empty());
    }

    #[test]
    fn test_step_narrow_no_movable_chair() {
        let record = sample_record(Some(true), &[WidthClass::Narrow], Some(false));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 40); // 100 - 30 - 20 - 10
        assert_eq!(result.grade, Grade::D);
        assert_eq!(result.breakdown.deductions.len(), 3);
    }

    #[test]
    fn test_step_not_passable_no_movable_chair() {
        let record = sample_record(Some(true), &[WidthClass::NotPassable], Some(false));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 20); // 100 - 30 - 40 - 10
        assert_eq!(result.grade, Grade::D);
    }

    #[test]
    fn test_missing_fields_cost_nothing() {
        let record = sample_record(None, &[], None);
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, Grade::S);
    }

    #[test]
    fn test_width_precedence_first_match_wins() {
        // not_passable outranks narrow even when both are present
        let record = sample_record(None, &[WidthClass::Narrow, WidthClass::NotPassable], None);
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 60);

        // narrow outranks normal
        let record = sample_record(None, &[WidthClass::Normal, WidthClass::Narrow], None);
        assert_eq!(calculate_score(&record, &ScoringConfig::default()).score, 80);

        // normal applies even alongside wide
        let record = sample_record(None, &[WidthClass::Wide, WidthClass::Normal], None);
        assert_eq!(calculate_score(&record, &ScoringConfig::default()).score, 90);
    }

    #[test]
    fn test_width_applied_once() {
        let record = sample_record(
            None,
            &[WidthClass::Narrow, WidthClass::Narrow, WidthClass::Normal],
            None,
        );
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 80);
        assert_eq!(result.breakdown.deductions.len(), 1);
    }

    #[test]
    fn test_unknown_width_costs_nothing() {
        let record = sample_record(None, &[WidthClass::Other], None);
        assert_eq!(calculate_score(&record, &ScoringConfig::default()).score, 100);
    }

    #[test]
    fn test_chair_present_without_movable() {
        let record = AccessibilityRecord {
            chair: Some(ChairFlags {
                has_fixed_chair: true,
                has_high_movable_chair: true,
                ..Default::default()
            }),
            ..AccessibilityRecord::new("cafe.webp")
        };
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 90);
        assert_eq!(result.grade, Grade::S);
    }

    #[test]
    fn test_normal_width_grades_s_and_a() {
        let record = sample_record(Some(false), &[WidthClass::Normal], Some(true));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 90);
        assert_eq!(result.grade, Grade::S);

        let record = sample_record(Some(false), &[WidthClass::Normal], Some(false));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 80);
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn test_step_only_grades_b() {
        let record = sample_record(Some(true), &[WidthClass::Wide], Some(true));
        let result = calculate_score(&record, &ScoringConfig::default());
        assert_eq!(result.score, 70);
        assert_eq!(result.grade, Grade::B);
    }

    #[test]
    fn test_score_is_not_clamped() {
        let config = ScoringConfig {
            step_penalty: Some(80),
            ..ScoringConfig::default()
        };
        let record = sample_record(Some(true), &[WidthClass::NotPassable], Some(false));
        let result = calculate_score(&record, &config);
        assert_eq!(result.score, -30);
        assert_eq!(result.grade, Grade::D);
    }

    #[test]
    fn test_custom_width_penalties() {
        let config = ScoringConfig {
            width: Some(WidthPenalties {
                wide: Some(5),
                ..WidthPenalties::default()
            }),
            ..ScoringConfig::default()
        };
        let record = sample_record(None, &[WidthClass::Wide], None);
        let result = calculate_score(&record, &config);
        assert_eq!(result.score, 95);
        assert_eq!(result.breakdown.deductions[0].description, "wide -> -5");
    }

    #[test]
    fn test_breakdown_tracks_before_and_after() {
        let record = sample_record(Some(true), &[WidthClass::Normal], Some(false));
        let result = calculate_score(&record, &ScoringConfig::default());
        let steps: Vec<(i32, i32)> = result
            .breakdown
            .deductions
            .iter()
            .map(|d| (d.before, d.after))
            .collect();
        assert_eq!(steps, vec![(100, 70), (70, 60), (60, 50)]);
        assert_eq!(result.breakdown.base_score, 100);
    }
}
