use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter bucket derived from an accessibility score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::S, Grade::A, Grade::B, Grade::C, Grade::D];

    /// Grade for a score under the default thresholds (90/80/70/60)
    pub fn from_score(score: f64) -> Grade {
        super::GradeThresholds::default().grade(score)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100.0), Grade::S);
        assert_eq!(Grade::from_score(90.0), Grade::S);
        assert_eq!(Grade::from_score(89.9), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::A);
        assert_eq!(Grade::from_score(79.0), Grade::B);
        assert_eq!(Grade::from_score(70.0), Grade::B);
        assert_eq!(Grade::from_score(69.0), Grade::C);
        assert_eq!(Grade::from_score(60.0), Grade::C);
        assert_eq!(Grade::from_score(59.9), Grade::D);
        assert_eq!(Grade::from_score(0.0), Grade::D);
        assert_eq!(Grade::from_score(-15.0), Grade::D);
    }

    #[test]
    fn test_grade_is_deterministic() {
        for score in -20..=110 {
            let first = Grade::from_score(score as f64);
            let second = Grade::from_score(score as f64);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_grade_monotonic_in_score() {
        let mut previous = Grade::from_score(-50.0);
        for score in -49..=120 {
            let current = Grade::from_score(score as f64);
            // Higher score never yields a worse grade (S sorts first)
            assert!(current <= previous);
            previous = current;
        }
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::B).unwrap(), "\"B\"");
    }
}
