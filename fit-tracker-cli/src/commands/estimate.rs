use anyhow::Result;
use clap::Args;
use fit_tracker::metrics::{estimate_calories, EstimateInput};
use fit_tracker::models::ExerciseKind;

use super::exercise_parser::parse_exercise;
use crate::session::Session;

#[derive(Args)]
pub struct EstimateArgs {
    /// Session length in minutes
    #[arg(short, long)]
    duration: f64,

    /// Body weight in kg; defaults to the configured weight
    #[arg(short, long)]
    weight: Option<f64>,

    /// strength or cardio
    #[arg(long, default_value = "strength")]
    tab: ExerciseKind,

    /// Exercise spec, repeatable (same format as `log add`)
    #[arg(short, long = "exercise")]
    exercises: Vec<String>,
}

/// Offline calorie estimate, no login needed
pub async fn estimate(session: &Session, args: EstimateArgs) -> Result<()> {
    let exercises = args
        .exercises
        .iter()
        .map(|spec| parse_exercise(spec))
        .collect::<Result<Vec<_>>>()?;

    let weight = args
        .weight
        .unwrap_or(session.config.estimator.default_weight_kg);
    let input = EstimateInput::new(args.duration, weight, args.tab).with_exercises(exercises);

    println!("{} kcal", estimate_calories(&input));
    Ok(())
}
