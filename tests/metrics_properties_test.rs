use std::collections::HashSet;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fit_tracker::metrics::{add_log_in, estimate_calories, weight_trend, EstimateInput};
use fit_tracker::models::{
    CardioCategory, CardioSet, ExerciseKind, ExerciseLog, StrengthSet, WeightSample, WorkoutLog,
};
use fit_tracker::stable_key;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn kind() -> impl Strategy<Value = ExerciseKind> {
    prop_oneof![Just(ExerciseKind::Strength), Just(ExerciseKind::Cardio)]
}

fn exercises() -> impl Strategy<Value = Vec<ExerciseLog>> {
    let strength = (0usize..6).prop_map(|sets| {
        ExerciseLog::strength("Squat", vec![StrengthSet::new(100.0, 5); sets])
    });
    let cardio = (1.0f64..40.0, 0.0f64..15.0).prop_map(|(minutes, speed)| {
        ExerciseLog::cardio(
            "Run",
            Some(CardioCategory::Running),
            vec![CardioSet::minutes(minutes).with_speed(speed)],
        )
    });
    prop::collection::vec(prop_oneof![strength, cardio], 0..4)
}

proptest! {
    #[test]
    fn estimate_grows_with_duration(
        duration in 0.0f64..300.0,
        extra in 0.0f64..120.0,
        weight in 30.0f64..150.0,
        tab in kind(),
        logged in exercises(),
    ) {
        let shorter = EstimateInput::new(duration, weight, tab).with_exercises(logged.clone());
        let longer = EstimateInput::new(duration + extra, weight, tab).with_exercises(logged);
        prop_assert!(estimate_calories(&longer) >= estimate_calories(&shorter));
    }

    #[test]
    fn estimate_grows_with_weight(
        duration in 0.0f64..300.0,
        weight in 30.0f64..150.0,
        extra in 0.0f64..50.0,
        tab in kind(),
        logged in exercises(),
    ) {
        let lighter = EstimateInput::new(duration, weight, tab).with_exercises(logged.clone());
        let heavier = EstimateInput::new(duration, weight + extra, tab).with_exercises(logged);
        prop_assert!(estimate_calories(&heavier) >= estimate_calories(&lighter));
    }

    #[test]
    fn estimate_survives_garbage(duration in any::<f64>(), weight in any::<f64>(), tab in kind()) {
        // non-finite and negative inputs count as zero
        let estimate = estimate_calories(&EstimateInput::new(duration, weight, tab));
        if !(duration.is_finite() && duration > 0.0 && weight.is_finite() && weight > 0.0) {
            prop_assert_eq!(estimate, 0);
        }
    }

    #[test]
    fn one_log_per_day_and_totals_preserved(
        entries in prop::collection::vec((0i64..10, 0u32..24, 0u32..120, 0u32..800), 1..30)
    ) {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let mut logs: Vec<WorkoutLog> = Vec::new();

        for (day, hour, duration, calories) in &entries {
            let date = start + Duration::days(*day) + Duration::hours(i64::from(*hour));
            add_log_in(&mut logs, WorkoutLog::new("Session", *duration, *calories).with_date(date), &Utc);
        }

        let days: HashSet<NaiveDate> = logs.iter().map(|l| l.day_in(&Utc)).collect();
        prop_assert_eq!(days.len(), logs.len());

        let expected_days: HashSet<i64> = entries.iter().map(|e| e.0).collect();
        prop_assert_eq!(logs.len(), expected_days.len());

        let duration: u32 = entries.iter().map(|e| e.2).sum();
        let calories: u32 = entries.iter().map(|e| e.3).sum();
        prop_assert_eq!(logs.iter().map(|l| l.duration).sum::<u32>(), duration);
        prop_assert_eq!(logs.iter().map(|l| l.calories).sum::<u32>(), calories);
    }

    #[test]
    fn key_ignores_field_order(fields in prop::collection::btree_map("[a-z]{1,8}", any::<i32>(), 1..8)) {
        let forward: Map<String, Value> = fields.iter().map(|(k, v)| (k.clone(), Value::from(*v))).collect();
        let backward: Map<String, Value> = fields.iter().rev().map(|(k, v)| (k.clone(), Value::from(*v))).collect();

        prop_assert_eq!(
            stable_key("report", &Value::Object(forward)),
            stable_key("report", &Value::Object(backward))
        );
    }

    #[test]
    fn trend_measured_from_earliest_sample(
        weights in prop::collection::vec(40.0f64..150.0, 1..12),
        current in 40.0f64..150.0,
    ) {
        let first_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        // shuffle the dates by reversing, so the earliest sample sits last
        let history: Vec<WeightSample> = weights
            .iter()
            .enumerate()
            .rev()
            .map(|(i, w)| WeightSample::new(first_day + Duration::days(i as i64), *w))
            .collect();

        let trend = weight_trend(&history, current);
        prop_assert_eq!(trend.baseline, weights[0]);
        prop_assert!((trend.delta - (current - weights[0])).abs() < 1e-9);
    }
}
