use serde::{Deserialize, Serialize};
use validator::Validate;

use super::lenient;

/// Active training plan, either generated or edited by hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    #[validate(length(min = 1, message = "Plan title is required"))]
    pub title: String,
    #[serde(default)]
    pub goal: String,
    #[validate(length(min = 1, message = "Plan must contain at least one day"))]
    #[validate(nested)]
    pub days: Vec<DailyPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    #[validate(length(min = 1, message = "Day label is required"))]
    pub day: String,
    #[serde(default)]
    pub focus: String,
    #[serde(default)]
    pub exercises: Vec<String>,
    /// Minutes
    #[serde(default, deserialize_with = "lenient::non_negative_u32")]
    pub duration: u32,
    #[serde(default)]
    pub notes: String,
}

impl WorkoutPlan {
    /// Total planned minutes across the week, saturating at `u32::MAX`
    pub fn total_minutes(&self) -> u32 {
        self.days
            .iter()
            .fold(0u32, |total, d| total.saturating_add(d.duration))
    }

    /// Days that contain at least one exercise
    pub fn training_days(&self) -> usize {
        self.days.iter().filter(|d| !d.exercises.is_empty()).count()
    }
}
