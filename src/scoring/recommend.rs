use serde::Serialize;

use crate::records::{AccessibilityRecord, Priority, WidthClass};

/// An improvement suggested for a store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// Improvements suggested by the detail view, most urgent first
pub fn recommend(record: &AccessibilityRecord) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if record.has_step() {
        recommendations.push(Recommendation {
            priority: Priority::High,
            category: "step",
            title: "Install a ramp",
            description: "A ramp lets wheelchair users get past the step at the entrance.",
        });
    }

    if record.has_width(WidthClass::Narrow) || record.has_width(WidthClass::NotPassable) {
        recommendations.push(Recommendation {
            priority: Priority::High,
            category: "passage",
            title: "Widen the passage",
            description: "Keep at least 0.9 m of clear width along the main passage.",
        });
    }

    // Missing chair info counts as no movable chair here
    let has_movable = record.chair.map(|c| c.has_movable_chair).unwrap_or(false);
    if !has_movable {
        recommendations.push(Recommendation {
            priority: Priority::Medium,
            category: "chairs",
            title: "Provide movable chairs",
            description: "Movable chairs leave room for wheelchairs and suit more body types.",
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ChairFlags;

    #[test]
    fn test_accessible_store_has_no_recommendations() {
        let record = AccessibilityRecord {
            has_step: Some(false),
            width_class: vec![WidthClass::Wide],
            chair: Some(ChairFlags {
                has_movable_chair: true,
                ..Default::default()
            }),
            ..AccessibilityRecord::new("a.webp")
        };
        assert!(recommend(&record).is_empty());
    }

    #[test]
    fn test_all_recommendations() {
        let record = AccessibilityRecord {
            has_step: Some(true),
            width_class: vec![WidthClass::NotPassable],
            chair: Some(ChairFlags::default()),
            ..AccessibilityRecord::new("a.webp")
        };
        let recs = recommend(&record);
        let categories: Vec<_> = recs.iter().map(|r| r.category).collect();
        assert_eq!(categories, vec!["step", "passage", "chairs"]);
        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[2].priority, Priority::Medium);
    }

    #[test]
    fn test_missing_chair_recommends_movable() {
        let record = AccessibilityRecord::new("a.webp");
        let recs = recommend(&record);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].category, "chairs");
    }

    #[test]
    fn test_normal_width_not_flagged() {
        let record = AccessibilityRecord {
            width_class: vec![WidthClass::Normal],
            chair: Some(ChairFlags {
                has_movable_chair: true,
                ..Default::default()
            }),
            ..AccessibilityRecord::new("a.webp")
        };
        assert!(recommend(&record).is_empty());
    }
}
