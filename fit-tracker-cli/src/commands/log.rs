use std::time::Duration;

use anyhow::{bail, Result};
use clap::Args;
use chrono::Local;
use colored::Colorize;
use dialoguer::Input;
use fit_tracker::metrics::{
    demo_history, estimate_calories, CalorieField, EstimateInput, MergeOutcome,
};
use fit_tracker::models::{ExerciseKind, ExerciseLog, WorkoutLog};

use super::exercise_parser::parse_exercise;
use crate::session::Session;
use crate::ui;

#[derive(Args)]
pub struct LogAddArgs {
    /// Session title (prompted when omitted)
    #[arg(short, long)]
    title: Option<String>,

    /// Session length in minutes (prompted when omitted)
    #[arg(short, long)]
    duration: Option<u32>,

    /// Calories burned; estimated from the session when omitted
    #[arg(short, long)]
    calories: Option<u32>,

    #[arg(short, long, default_value = "")]
    notes: String,

    /// Exercise spec, repeatable: `Squat:strength:100x5,100x5` or `Run:cardio:running:30@10`
    #[arg(short, long = "exercise")]
    exercises: Vec<String>,

    /// strength or cardio; decides the estimate when no exercise is given
    #[arg(long)]
    tab: Option<ExerciseKind>,
}

/// Tab implied by the logged exercises when none is chosen
fn implied_tab(exercises: &[ExerciseLog]) -> ExerciseKind {
    if !exercises.is_empty() && exercises.iter().all(|e| e.kind() == ExerciseKind::Cardio) {
        ExerciseKind::Cardio
    } else {
        ExerciseKind::Strength
    }
}

/// Resolve the calorie value the way the log editor does: a typed value wins,
/// otherwise the debounced estimate for the final inputs.
async fn resolve_calories(input: EstimateInput, manual: Option<u32>, delay: Duration) -> u32 {
    let mut field = CalorieField::new(delay);
    let mut updates = field.subscribe();

    field.input_changed(input.clone());
    if let Some(calories) = manual {
        field.set_manual(calories);
    } else {
        let wait = delay + Duration::from_secs(1);
        if tokio::time::timeout(wait, updates.changed()).await.is_err() {
            tracing::warn!("Calorie estimate did not settle, computing directly");
        }
    }

    field.value().unwrap_or_else(|| estimate_calories(&input))
}

pub async fn add(session: &mut Session, args: LogAddArgs) -> Result<()> {
    session.require_login()?;

    let title = match args.title {
        Some(title) => title,
        None => Input::new().with_prompt("Title").interact_text()?,
    };
    let duration = match args.duration {
        Some(duration) => duration,
        None => Input::new()
            .with_prompt("Duration (minutes)")
            .interact_text()?,
    };
    if title.trim().is_empty() {
        bail!("A workout needs a title");
    }

    let exercises = args
        .exercises
        .iter()
        .map(|spec| parse_exercise(spec))
        .collect::<Result<Vec<_>>>()?;

    let profile = match session.client().get_profile().await {
        Ok(profile) => profile,
        Err(e) => return Err(session.fail(e)),
    };
    let weight = profile
        .map(|p| p.weight)
        .filter(|w| *w > 0.0)
        .unwrap_or(session.config.estimator.default_weight_kg);

    let tab = args.tab.unwrap_or_else(|| implied_tab(&exercises));
    let input = EstimateInput::new(f64::from(duration), weight, tab).with_exercises(exercises.clone());
    let calories = resolve_calories(input, args.calories, session.config.estimator.debounce()).await;

    let incoming = WorkoutLog::new(title, duration, calories)
        .with_notes(args.notes)
        .with_exercises(exercises);

    let mut logs = match session.client().get_logs().await {
        Ok(logs) => logs,
        Err(e) => return Err(session.fail(e)),
    };

    let outcome = match session.client().record_log(&mut logs, incoming).await {
        Ok(outcome) => outcome,
        Err(e) => return Err(session.fail(e)),
    };
    let index = match outcome {
        MergeOutcome::Merged(index) => index,
        MergeOutcome::Inserted => 0,
    };
    let saved = &logs[index];

    match outcome {
        MergeOutcome::Merged(_) => ui::success(format!(
            "Merged into today's workout: {} min, {} kcal in total",
            saved.duration, saved.calories
        )),
        MergeOutcome::Inserted => ui::success(format!(
            "Logged {}: {} min, {} kcal",
            saved.title, saved.duration, saved.calories
        )),
    }

    Ok(())
}

/// Fill the history with simulated sessions for the last `days` days
pub async fn demo(session: &mut Session, days: u32) -> Result<()> {
    session.require_login()?;

    let profile = match session.client().get_profile().await {
        Ok(profile) => profile,
        Err(e) => return Err(session.fail(e)),
    };
    let weight = profile
        .map(|p| p.weight)
        .filter(|w| *w > 0.0)
        .unwrap_or(session.config.estimator.default_weight_kg);

    let generated = demo_history(
        &mut rand::thread_rng(),
        Local::now().date_naive(),
        days,
        weight,
    );

    let mut posted = 0;
    for log in generated.iter().rev() {
        if let Err(e) = session.client().add_log(log).await {
            return Err(session.fail(e));
        }
        posted += 1;
    }

    ui::success(format!("Added {} simulated workouts", posted));
    Ok(())
}

pub async fn list(session: &mut Session, limit: usize) -> Result<()> {
    session.require_login()?;

    let logs = match session.client().get_logs().await {
        Ok(logs) => logs,
        Err(e) => return Err(session.fail(e)),
    };

    if logs.is_empty() {
        ui::info("No workouts logged yet.");
        return Ok(());
    }

    ui::heading("Recent Workouts");
    for log in logs.iter().take(limit) {
        println!(
            "{}  {:<24} {:>4} min {:>5} kcal  {} sets",
            log.local_day().to_string().green(),
            log.title,
            log.duration,
            log.calories,
            log.set_count()
        );
        for exercise in &log.exercises {
            println!("            {} ({})", exercise.name(), exercise.kind());
        }
        if !log.notes.is_empty() {
            println!("            {}", log.notes.dimmed());
        }
    }

    Ok(())
}
