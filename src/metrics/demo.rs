//! Simulated workout history for trying the tracker without real data.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use super::calories::{estimate_calories, EstimateInput};
use super::merge::add_log_in;
use crate::models::{CardioCategory, CardioSet, ExerciseKind, ExerciseLog, StrengthSet, WorkoutLog};

const STRENGTH_LIFTS: &[&str] = &["Squat", "Bench Press", "Deadlift", "Overhead Press", "Barbell Row"];
const CARDIO_OPTIONS: &[(&str, CardioCategory)] = &[
    ("Treadmill Run", CardioCategory::Running),
    ("Incline Walk", CardioCategory::InclineWalk),
    ("Stairmaster", CardioCategory::Stairmaster),
    ("Spin Bike", CardioCategory::Cycling),
    ("Rowing Machine", CardioCategory::Rowing),
];

fn strength_session<R: Rng>(rng: &mut R) -> (String, Vec<ExerciseLog>) {
    let lifts: Vec<&&str> = STRENGTH_LIFTS.choose_multiple(rng, 3).collect();
    let exercises = lifts
        .into_iter()
        .map(|name| {
            let weight = f64::from(rng.gen_range(8..=24)) * 5.0;
            let sets = (0..rng.gen_range(3..=5))
                .map(|_| StrengthSet::new(weight, rng.gen_range(5..=10)))
                .collect();
            ExerciseLog::strength(*name, sets)
        })
        .collect();
    ("Strength".to_string(), exercises)
}

fn cardio_session<R: Rng>(rng: &mut R) -> (String, Vec<ExerciseLog>) {
    let (name, category) = CARDIO_OPTIONS[rng.gen_range(0..CARDIO_OPTIONS.len())];
    let set = CardioSet::minutes(f64::from(rng.gen_range(20..=40)));
    let set = match category {
        CardioCategory::Running => set.with_speed(f64::from(rng.gen_range(8..=12))),
        CardioCategory::InclineWalk => set.with_incline(f64::from(rng.gen_range(5..=15))),
        CardioCategory::Stairmaster => set.with_level(f64::from(rng.gen_range(4..=10))),
        CardioCategory::Cycling => set.with_resistance(f64::from(rng.gen_range(4..=12))),
        _ => set,
    };
    (name.to_string(), vec![ExerciseLog::cardio(name, Some(category), vec![set])])
}

/// Generate roughly four sessions a week over the `days` days ending at `today`,
/// most recent first, with calories estimated for `weight` kg.
pub fn demo_history<R: Rng>(rng: &mut R, today: NaiveDate, days: u32, weight: f64) -> Vec<WorkoutLog> {
    let mut logs = Vec::new();

    for offset in (0..days).rev() {
        if !rng.gen_bool(4.0 / 7.0) {
            continue;
        }

        let kind = if rng.gen_bool(0.5) {
            ExerciseKind::Strength
        } else {
            ExerciseKind::Cardio
        };
        let (title, exercises) = match kind {
            ExerciseKind::Strength => strength_session(rng),
            ExerciseKind::Cardio => cardio_session(rng),
        };

        let duration = rng.gen_range(30..=75);
        let input = EstimateInput::new(f64::from(duration), weight, kind).with_exercises(exercises.clone());
        let calories = estimate_calories(&input);

        let day = today - Duration::days(i64::from(offset));
        let Some(start) = day.and_hms_opt(rng.gen_range(6..=20), 0, 0) else {
            continue;
        };

        let log = WorkoutLog::new(title, duration, calories)
            .with_date(Utc.from_utc_datetime(&start))
            .with_exercises(exercises);
        add_log_in(&mut logs, log, &Utc);
    }

    logs
}
