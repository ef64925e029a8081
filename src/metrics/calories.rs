use std::time::Duration;

use tokio::sync::watch;

use crate::debounce::{Debouncer, ScheduledCall};
use crate::models::lenient::sanitize;
use crate::models::{CardioCategory, CardioSet, ExerciseKind, ExerciseLog};

/// MET used when nothing is logged yet and the cardio tab is selected
pub const CARDIO_TAB_MET: f64 = 8.0;
/// MET for strength work, both as a tab default and per set
pub const STRENGTH_MET: f64 = 4.5;
/// MET charged for time not covered by logged exercises
pub const REST_MET: f64 = 2.5;
/// Active minutes assumed per strength set
pub const MINUTES_PER_STRENGTH_SET: f64 = 1.5;

const MIN_MET: f64 = 1.0;

/// Inputs of the calorie estimate for the log being edited
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimateInput {
    /// Total session length in minutes
    pub duration: f64,
    /// Body weight in kg
    pub weight: f64,
    /// Tab selected in the editor; decides the MET when no exercise is logged
    pub tab: ExerciseKind,
    pub exercises: Vec<ExerciseLog>,
}

impl EstimateInput {
    pub fn new(duration: f64, weight: f64, tab: ExerciseKind) -> Self {
        Self {
            duration,
            weight,
            tab,
            exercises: Vec::new(),
        }
    }

    pub fn with_exercises(mut self, exercises: Vec<ExerciseLog>) -> Self {
        self.exercises = exercises;
        self
    }
}

fn tab_met(tab: ExerciseKind) -> f64 {
    match tab {
        ExerciseKind::Cardio => CARDIO_TAB_MET,
        ExerciseKind::Strength => STRENGTH_MET,
    }
}

fn base_met(category: CardioCategory) -> f64 {
    match category {
        CardioCategory::Running => 8.0,
        CardioCategory::InclineWalk => 3.5,
        CardioCategory::Stairmaster => 6.0,
        CardioCategory::Cycling => 6.8,
        CardioCategory::Elliptical => 5.0,
        CardioCategory::Rowing => 7.0,
        CardioCategory::Swimming => 7.0,
        CardioCategory::Other => 6.0,
    }
}

/// MET for one cardio set, adjusted by the machine's intensity settings
pub fn cardio_met(category: CardioCategory, set: &CardioSet) -> f64 {
    let param = |value: Option<f64>| sanitize(value.unwrap_or(0.0));

    let met = match category {
        CardioCategory::Running => base_met(category) + (param(set.speed) - 8.0) * 0.5,
        CardioCategory::InclineWalk => base_met(category) + param(set.incline) * 0.4,
        CardioCategory::Stairmaster => base_met(category) + param(set.level) * 0.3,
        CardioCategory::Cycling | CardioCategory::Elliptical => {
            base_met(category) + param(set.resistance) * 0.25
        }
        _ => base_met(category),
    };

    met.max(MIN_MET)
}

fn kcal(met: f64, weight: f64, minutes: f64) -> f64 {
    met * weight * minutes / 60.0
}

/// Active minutes and calories for one logged exercise
fn exercise_load(exercise: &ExerciseLog, weight: f64) -> (f64, f64) {
    match exercise {
        ExerciseLog::Strength { sets, .. } => {
            let minutes = sets.len() as f64 * MINUTES_PER_STRENGTH_SET;
            (minutes, kcal(STRENGTH_MET, weight, minutes))
        }
        ExerciseLog::Cardio { category, sets, .. } => {
            let category = category.unwrap_or(CardioCategory::Other);
            sets.iter().fold((0.0, 0.0), |(minutes, calories), set| {
                let set_minutes = sanitize(set.duration);
                (
                    minutes + set_minutes,
                    calories + kcal(cardio_met(category, set), weight, set_minutes),
                )
            })
        }
    }
}

/// Estimate calories burned for a session.
///
/// With no exercises logged this is a single-MET estimate driven by the
/// selected tab. Otherwise logged exercises are charged at their own MET and
/// the remaining session time at the rest MET.
pub fn estimate_calories(input: &EstimateInput) -> u32 {
    let duration = sanitize(input.duration);
    let weight = sanitize(input.weight);

    if input.exercises.is_empty() {
        return kcal(tab_met(input.tab), weight, duration).round() as u32;
    }

    let (active_minutes, active_calories) = input
        .exercises
        .iter()
        .map(|exercise| exercise_load(exercise, weight))
        .fold((0.0, 0.0), |(m, c), (em, ec)| (m + em, c + ec));

    let rest_minutes = (duration - active_minutes).max(0.0);
    let total = active_calories + kcal(REST_MET, weight, rest_minutes);

    total.round() as u32
}

/// Live calorie field of the log editor.
///
/// Every input change reschedules a debounced estimate. Once the user types a
/// value by hand the field stops estimating for the rest of the edit.
pub struct CalorieField {
    debouncer: Debouncer<EstimateInput, u32>,
    manual: Option<u32>,
    pending: Option<ScheduledCall>,
}

impl CalorieField {
    pub fn new(delay: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(delay, |input: EstimateInput| estimate_calories(&input)),
            manual: None,
            pending: None,
        }
    }

    /// Feed the latest inputs. Must be called inside a tokio runtime.
    pub fn input_changed(&mut self, input: EstimateInput) {
        if self.manual.is_some() {
            return;
        }
        self.pending = Some(self.debouncer.call(input));
    }

    /// The user typed a calorie value; estimates are off from now on
    pub fn set_manual(&mut self, calories: u32) {
        self.manual = Some(calories);
        self.debouncer.cancel();
        self.pending = None;
    }

    pub fn is_manual(&self) -> bool {
        self.manual.is_some()
    }

    /// Manual value if set, otherwise the most recent completed estimate
    pub fn value(&self) -> Option<u32> {
        self.manual.or_else(|| self.debouncer.latest())
    }

    /// Receive every completed estimate
    pub fn subscribe(&self) -> watch::Receiver<Option<u32>> {
        self.debouncer.subscribe()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|call| !call.is_finished())
    }
}
