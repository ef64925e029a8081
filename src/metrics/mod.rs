//! Pure derived-state calculations: calorie estimates, same-day log merging
//! and weight trends. No I/O, and malformed numbers count as zero.

pub mod calories;
pub mod demo;
pub mod merge;
pub mod weight;

pub use calories::{estimate_calories, CalorieField, EstimateInput};
pub use demo::demo_history;
pub use merge::{add_log, add_log_in, merge_logs, MergeOutcome};
pub use weight::{weight_trend, TrendDirection, WeightTrend};
