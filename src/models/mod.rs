pub mod coaching;
pub mod lenient;
pub mod plan;
pub mod profile;
pub mod workout;

pub use coaching::{AiAdvice, ExerciseInsight, TrainingReport};
pub use plan::{DailyPlan, WorkoutPlan};
pub use profile::{FitnessLevel, Goal, UserProfile, WeightSample};
pub use workout::{CardioCategory, CardioSet, ExerciseKind, ExerciseLog, StrengthSet, WorkoutLog};
