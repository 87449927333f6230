use serde::{Deserialize, Serialize};

use super::grade::Grade;

/// Main scoring configuration.
///
/// Defines how accessibility scores are calculated. Every field is optional;
/// missing values fall back to the standard deduction table.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   base_score: 100
///   step_penalty: 30
///   no_movable_chair_penalty: 10
///   width:
///     not_passable: 40
///     narrow: 20
///     normal: 10
///   grades: { s: 90, a: 80, b: 70, c: 60 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Score before deductions (default: 100)
    #[serde(default)]
    pub base_score: Option<i32>,

    /// Deducted when the entrance has a step (default: 30)
    #[serde(default)]
    pub step_penalty: Option<i32>,

    /// Passage width deductions, first matching category wins
    #[serde(default)]
    pub width: Option<WidthPenalties>,

    /// Deducted when chair info exists but no movable chair (default: 10)
    #[serde(default)]
    pub no_movable_chair_penalty: Option<i32>,

    /// Grade thresholds
    #[serde(default)]
    pub grades: Option<GradeThresholds>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_score: Some(100),
            step_penalty: Some(30),
            width: Some(WidthPenalties::default()),
            no_movable_chair_penalty: Some(10),
            grades: Some(GradeThresholds::default()),
        }
    }
}

impl ScoringConfig {
    pub fn base_score(&self) -> i32 {
        self.base_score.unwrap_or(100)
    }

    pub fn step_penalty(&self) -> i32 {
        self.step_penalty.unwrap_or(30)
    }

    pub fn no_movable_chair_penalty(&self) -> i32 {
        self.no_movable_chair_penalty.unwrap_or(10)
    }

    pub fn width(&self) -> WidthPenalties {
        self.width.clone().unwrap_or_default()
    }

    pub fn grades(&self) -> GradeThresholds {
        self.grades.clone().unwrap_or_default()
    }
}

/// Width deductions checked in the order not_passable, narrow, normal, wide.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WidthPenalties {
    #[serde(default)]
    pub not_passable: Option<i32>,
    #[serde(default)]
    pub narrow: Option<i32>,
    #[serde(default)]
    pub normal: Option<i32>,
    #[serde(default)]
    pub wide: Option<i32>,
}

impl Default for WidthPenalties {
    fn default() -> Self {
        Self {
            not_passable: Some(40),
            narrow: Some(20),
            normal: Some(10),
            wide: Some(0),
        }
    }
}

impl WidthPenalties {
    pub fn not_passable(&self) -> i32 {
        self.not_passable.unwrap_or(40)
    }

    pub fn narrow(&self) -> i32 {
        self.narrow.unwrap_or(20)
    }

    pub fn normal(&self) -> i32 {
        self.normal.unwrap_or(10)
    }

    pub fn wide(&self) -> i32 {
        self.wide.unwrap_or(0)
    }
}

/// Minimum score for each grade; anything below `c` is a D.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GradeThresholds {
    #[serde(default)]
    pub s: Option<i32>,
    #[serde(default)]
    pub a: Option<i32>,
    #[serde(default)]
    pub b: Option<i32>,
    #[serde(default)]
    pub c: Option<i32>,
}

impl Default for GradeThresholds {
    fn default() -> Self {
        Self {
            s: Some(90),
            a: Some(80),
            b: Some(70),
            c: Some(60),
        }
    }
}

impl GradeThresholds {
    /// Ordered (threshold, grade) pairs, highest first
    pub fn levels(&self) -> [(i32, Grade); 4] {
        [
            (self.s.unwrap_or(90), Grade::S),
            (self.a.unwrap_or(80), Grade::A),
            (self.b.unwrap_or(70), Grade::B),
            (self.c.unwrap_or(60), Grade::C),
        ]
    }

    /// Map a score (or an average score) to its grade
    pub fn grade(&self, score: f64) -> Grade {
        self.levels()
            .into_iter()
            .find(|(threshold, _)| score >= *threshold as f64)
            .map(|(_, grade)| grade)
            .unwrap_or(Grade::D)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.base_score, Some(100));
        assert_eq!(config.step_penalty, Some(30));
        assert_eq!(config.no_movable_chair_penalty, Some(10));
        assert_eq!(config.width().not_passable(), 40);
        assert_eq!(config.width().narrow(), 20);
        assert_eq!(config.width().normal(), 10);
        assert_eq!(config.width().wide(), 0);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
step_penalty: 50
width:
  narrow: 25
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.step_penalty(), 50);
        assert_eq!(config.base_score(), 100);
        assert_eq!(config.width().narrow(), 25);
        assert_eq!(config.width().not_passable(), 40);
        assert!(config.grades.is_none());
        assert_eq!(config.grades().grade(85.0), Grade::A);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let yaml = "{}";
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert!(config.base_score.is_none());
        assert!(config.step_penalty.is_none());
        assert!(config.width.is_none());
        assert_eq!(config.step_penalty(), 30);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "stair_penalty: 10";
        let result: Result<ScoringConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_grade_thresholds() {
        let thresholds = GradeThresholds {
            s: Some(95),
            a: Some(85),
            b: Some(75),
            c: Some(65),
        };
        assert_eq!(thresholds.grade(94.0), Grade::A);
        assert_eq!(thresholds.grade(65.0), Grade::C);
        assert_eq!(thresholds.grade(64.9), Grade::D);
    }
}
