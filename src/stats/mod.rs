use serde::Serialize;

use crate::records::{AccessibilityRecord, ChairType, WidthClass};
use crate::scoring::{calculate_score, Grade, ScoringConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StepCounts {
    #[serde(rename = "true")]
    pub with_step: usize,
    #[serde(rename = "false")]
    pub step_free: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidthCounts {
    pub wide: usize,
    pub normal: usize,
    pub narrow: usize,
    pub not_passable: usize,
}

impl WidthCounts {
    pub fn get(&self, width: WidthClass) -> usize {
        match width {
            WidthClass::Wide => self.wide,
            WidthClass::Normal => self.normal,
            WidthClass::Narrow => self.narrow,
            WidthClass::NotPassable => self.not_passable,
            WidthClass::Other => 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChairCounts {
    pub movable: usize,
    pub high_movable: usize,
    pub fixed: usize,
    pub floor: usize,
}

impl ChairCounts {
    pub fn get(&self, chair_type: ChairType) -> usize {
        match chair_type {
            ChairType::Movable => self.movable,
            ChairType::HighMovable => self.high_movable,
            ChairType::Fixed => self.fixed,
            ChairType::Floor => self.floor,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeCounts {
    #[serde(rename = "S")]
    pub s: usize,
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
    #[serde(rename = "D")]
    pub d: usize,
}

impl GradeCounts {
    pub fn get(&self, grade: Grade) -> usize {
        match grade {
            Grade::S => self.s,
            Grade::A => self.a,
            Grade::B => self.b,
            Grade::C => self.c,
            Grade::D => self.d,
        }
    }

    fn bump(&mut self, grade: Grade) {
        match grade {
            Grade::S => self.s += 1,
            Grade::A => self.a += 1,
            Grade::B => self.b += 1,
            Grade::C => self.c += 1,
            Grade::D => self.d += 1,
        }
    }
}

/// Aggregate counts over a record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_images: usize,
    pub has_step: StepCounts,
    pub width_class: WidthCounts,
    pub chair_types: ChairCounts,
    pub grade_distribution: GradeCounts,
    pub average_score: f64,
    pub step_free_percentage: f64,
}

/// Dashboard headline numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_images: usize,
    pub step_free_count: usize,
    pub step_free_percentage: f64,
    pub average_score: f64,
    pub average_grade: Grade,
    pub grade_distribution: GradeCounts,
    pub width_distribution: WidthCounts,
    pub chair_types: ChairCounts,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn compute_statistics<T: AsRef<AccessibilityRecord>>(
    items: &[T],
    scoring: &ScoringConfig,
) -> Statistics {
    let mut has_step = StepCounts::default();
    let mut width_class = WidthCounts::default();
    let mut chair_types = ChairCounts::default();
    let mut grade_distribution = GradeCounts::default();
    let mut total_score: i64 = 0;

    for item in items {
        let record = item.as_ref();

        if record.has_step() {
            has_step.with_step += 1;
        } else {
            has_step.step_free += 1;
        }

        // A record counts once per category it carries
        for width in &record.width_class {
            match width {
                WidthClass::Wide => width_class.wide += 1,
                WidthClass::Normal => width_class.normal += 1,
                WidthClass::Narrow => width_class.narrow += 1,
                WidthClass::NotPassable => width_class.not_passable += 1,
                WidthClass::Other => {}
            }
        }

        if let Some(chair) = &record.chair {
            chair_types.movable += chair.has_movable_chair as usize;
            chair_types.high_movable += chair.has_high_movable_chair as usize;
            chair_types.fixed += chair.has_fixed_chair as usize;
            chair_types.floor += chair.has_floor_chair as usize;
        }

        let result = calculate_score(record, scoring);
        grade_distribution.bump(result.grade);
        total_score += result.score as i64;
    }

    let total = items.len();
    let (average_score, step_free_percentage) = if total > 0 {
        (
            round1(total_score as f64 / total as f64),
            round1(has_step.step_free as f64 / total as f64 * 100.0),
        )
    } else {
        (0.0, 0.0)
    };

    Statistics {
        total_images: total,
        has_step,
        width_class,
        chair_types,
        grade_distribution,
        average_score,
        step_free_percentage,
    }
}

pub fn summarize<T: AsRef<AccessibilityRecord>>(items: &[T], scoring: &ScoringConfig) -> Summary {
    let stats = compute_statistics(items, scoring);
    Summary {
        total_images: stats.total_images,
        step_free_count: stats.has_step.step_free,
        step_free_percentage: stats.step_free_percentage,
        average_score: stats.average_score,
        average_grade: scoring.grades().grade(stats.average_score),
        grade_distribution: stats.grade_distribution,
        width_distribution: stats.width_class,
        chair_types: stats.chair_types,
    }
}
