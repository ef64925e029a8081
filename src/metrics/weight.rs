use serde::Serialize;

use crate::models::lenient::sanitize;
use crate::models::{Goal, WeightSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Down,
    Flat,
    Up,
}

/// Change of the current weight against the earliest recorded sample
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightTrend {
    pub baseline: f64,
    pub current: f64,
    pub delta: f64,
}

impl WeightTrend {
    fn rounded_delta(&self) -> f64 {
        let rounded = (self.delta * 10.0).round() / 10.0;
        // avoid rendering "-0.0"
        if rounded == 0.0 {
            0.0
        } else {
            rounded
        }
    }

    /// Delta with an explicit sign and one decimal, e.g. `+1.5`, `-3.0`, `0.0`
    pub fn signed_delta(&self) -> String {
        let delta = self.rounded_delta();
        if delta > 0.0 {
            format!("+{:.1}", delta)
        } else {
            format!("{:.1}", delta)
        }
    }

    pub fn direction(&self) -> TrendDirection {
        let delta = self.rounded_delta();
        if delta > 0.0 {
            TrendDirection::Up
        } else if delta < 0.0 {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }

    /// Whether the change points the way the goal wants.
    /// Muscle gain favors holding or gaining; every other goal favors holding or losing.
    pub fn is_favorable_for(&self, goal: Goal) -> bool {
        match goal {
            Goal::MuscleGain => self.rounded_delta() >= 0.0,
            _ => self.rounded_delta() <= 0.0,
        }
    }
}

/// Compute the weight trend from an unordered history and the current weight.
///
/// The baseline is the earliest sample by date; with no history it is the
/// current weight, giving a zero delta.
pub fn weight_trend(history: &[WeightSample], current: f64) -> WeightTrend {
    let current = sanitize(current);

    let mut sorted: Vec<&WeightSample> = history.iter().collect();
    sorted.sort_by_key(|sample| sample.date);

    let baseline = sorted
        .first()
        .map(|sample| sanitize(sample.weight))
        .unwrap_or(current);

    WeightTrend {
        baseline,
        current,
        delta: current - baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(y: i32, m: u32, d: u32, weight: f64) -> WeightSample {
        WeightSample::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), weight)
    }

    #[test]
    fn test_loss_against_earliest_sample() {
        let history = vec![sample(2024, 1, 1, 80.0), sample(2024, 2, 1, 78.0)];
        let trend = weight_trend(&history, 77.0);

        assert_eq!(trend.baseline, 80.0);
        assert_eq!(trend.delta, -3.0);
        assert_eq!(trend.signed_delta(), "-3.0");
        assert_eq!(trend.direction(), TrendDirection::Down);
        assert!(trend.is_favorable_for(Goal::WeightLoss));
        assert!(!trend.is_favorable_for(Goal::MuscleGain));
    }

    #[test]
    fn test_history_order_is_irrelevant() {
        let history = vec![
            sample(2024, 3, 1, 76.0),
            sample(2024, 1, 1, 80.0),
            sample(2024, 2, 1, 78.0),
        ];
        assert_eq!(weight_trend(&history, 77.0).baseline, 80.0);
    }

    #[test]
    fn test_empty_history_gives_zero_delta() {
        let trend = weight_trend(&[], 72.4);

        assert_eq!(trend.baseline, 72.4);
        assert_eq!(trend.delta, 0.0);
        assert_eq!(trend.signed_delta(), "0.0");
        assert_eq!(trend.direction(), TrendDirection::Flat);
    }

    #[test]
    fn test_gain_has_plus_sign() {
        let trend = weight_trend(&[sample(2024, 1, 1, 70.0)], 71.46);

        assert_eq!(trend.signed_delta(), "+1.5");
        assert!(trend.is_favorable_for(Goal::MuscleGain));
        assert!(!trend.is_favorable_for(Goal::Endurance));
    }

    #[test]
    fn test_tiny_loss_renders_without_negative_zero() {
        let trend = weight_trend(&[sample(2024, 1, 1, 70.0)], 69.98);
        assert_eq!(trend.signed_delta(), "0.0");
        assert_eq!(trend.direction(), TrendDirection::Flat);
        // a delta that displays as 0.0 is favorable for every goal
        assert!(trend.is_favorable_for(Goal::MuscleGain));
        assert!(trend.is_favorable_for(Goal::WeightLoss));
    }

    #[test]
    fn test_malformed_current_weight_is_zero() {
        let trend = weight_trend(&[], f64::NAN);
        assert_eq!(trend.current, 0.0);
        assert_eq!(trend.delta, 0.0);
    }
}
