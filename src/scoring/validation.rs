use super::config::ScoringConfig;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(base) = config.base_score {
        if base < 0 {
            errors.push("scoring.base_score: must be non-negative".to_string());
        }
    }

    let mut penalties = vec![
        ("scoring.step_penalty", config.step_penalty),
        (
            "scoring.no_movable_chair_penalty",
            config.no_movable_chair_penalty,
        ),
    ];
    if let Some(ref width) = config.width {
        penalties.extend([
            ("scoring.width.not_passable", width.not_passable),
            ("scoring.width.narrow", width.narrow),
            ("scoring.width.normal", width.normal),
            ("scoring.width.wide", width.wide),
        ]);
    }
    for (key, value) in penalties {
        if let Some(v) = value {
            if v < 0 {
                errors.push(format!("{}: must be non-negative, got {}", key, v));
            }
        }
    }

    // Thresholds must strictly descend S > A > B > C
    if config.grades.is_some() {
        let levels = config.grades().levels();
        for pair in levels.windows(2) {
            let (high, high_grade) = pair[0];
            let (low, low_grade) = pair[1];
            if high <= low {
                errors.push(format!(
                    "scoring.grades: {} threshold ({}) must be greater than {} threshold ({})",
                    high_grade, high, low_grade, low
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{GradeThresholds, WidthPenalties};

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_negative_penalties_rejected() {
        let config = ScoringConfig {
            step_penalty: Some(-5),
            width: Some(WidthPenalties {
                narrow: Some(-1),
                ..WidthPenalties::default()
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("scoring.step_penalty"));
        assert!(errors[1].contains("scoring.width.narrow"));
    }

    #[test]
    fn test_negative_base_score_rejected() {
        let config = ScoringConfig {
            base_score: Some(-1),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("base_score"));
    }

    #[test]
    fn test_thresholds_must_descend() {
        let config = ScoringConfig {
            grades: Some(GradeThresholds {
                s: Some(80),
                a: Some(80),
                b: Some(90),
                c: Some(60),
            }),
            ..ScoringConfig::default()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("S threshold (80)"));
        assert!(errors[1].contains("A threshold (80)"));
    }

    #[test]
    fn test_all_errors_reported() {
        let config = ScoringConfig {
            base_score: Some(-10),
            step_penalty: Some(-1),
            no_movable_chair_penalty: Some(-1),
            width: None,
            grades: None,
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
