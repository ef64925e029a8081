//! Structured outputs of the generative backend.
//!
//! These are opaque once parsed. Decoding enforces field presence and
//! `Validate` enforces non-empty text and the 0-100 score ranges.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AiAdvice {
    #[validate(length(min = 1, message = "Advice summary is required"))]
    pub summary: String,
    #[validate(length(min = 1, message = "At least one tip is required"))]
    pub tips: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrainingReport {
    #[validate(length(min = 1, message = "Report summary is required"))]
    pub summary: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Consistency score must be between 0 and 100"))]
    pub consistency_score: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Intensity score must be between 0 and 100"))]
    pub intensity_score: f64,
    #[validate(range(min = 0.0, max = 100.0, message = "Progress score must be between 0 and 100"))]
    pub progress_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[validate(length(min = 1, message = "At least one next step is required"))]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInsight {
    #[validate(length(min = 1, message = "Exercise name is required"))]
    pub exercise: String,
    #[validate(length(min = 1, message = "Insight summary is required"))]
    pub summary: String,
    #[validate(range(min = 0.0, max = 100.0, message = "Progress score must be between 0 and 100"))]
    pub progress_score: f64,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub tips: Vec<String>,
}
