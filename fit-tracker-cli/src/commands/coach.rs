//! AI coaching commands. Results are reused for the rest of the login session
//! until the inputs they were generated from change.

use anyhow::{anyhow, Result};
use colored::Colorize;
use fit_tracker::ai::{AdviceRequest, GenerationRequest, InsightRequest, PlanRequest, ReportRequest};
use fit_tracker::models::{UserProfile, WorkoutLog, WorkoutPlan};
use fit_tracker::{Flight, FlightGuard};

use crate::session::Session;
use crate::ui;

async fn load_profile(session: &mut Session) -> Result<UserProfile> {
    match session.client().get_profile().await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(anyhow!(
            "Coaching needs a profile. Create one with `fit-tracker profile set`."
        )),
        Err(e) => Err(session.fail(e)),
    }
}

async fn load_logs(session: &mut Session) -> Result<Vec<WorkoutLog>> {
    match session.client().get_logs().await {
        Ok(logs) => Ok(logs),
        Err(e) => Err(session.fail(e)),
    }
}

/// Run a request through the session cache with a spinner
async fn generate<R>(session: &mut Session, request: &R, message: &str) -> Result<R::Output>
where
    R: GenerationRequest + Sync,
{
    let service = session.ai_service()?;
    let guard = FlightGuard::new();

    let flight = ui::with_spinner(message, service.request(request, &guard)).await;
    match flight {
        Ok(Flight::Fetched(value)) => Ok(value),
        Ok(Flight::Held(value)) | Ok(Flight::Cached(value)) => {
            tracing::debug!("Reused cached {} result", request.kind());
            Ok(value)
        }
        Ok(Flight::Skipped) => Err(anyhow!("A {} request is already running", request.kind())),
        Err(e) => {
            tracing::debug!("{} request failed: {}", request.kind(), e);
            Err(session.fail(e))
        }
    }
}

fn print_plan(plan: &WorkoutPlan) {
    ui::heading(&plan.title);
    if !plan.goal.is_empty() {
        println!("Goal: {}", plan.goal);
    }
    println!(
        "{} training days, {} minutes per week",
        plan.training_days(),
        plan.total_minutes()
    );
    println!();

    for day in &plan.days {
        if day.exercises.is_empty() {
            println!("{} {}", day.day.bold(), "rest".dimmed());
            continue;
        }
        println!("{} {} ({} min)", day.day.bold(), day.focus.cyan(), day.duration);
        ui::bullet_list(&day.exercises);
        if !day.notes.is_empty() {
            println!("  {}", day.notes.dimmed());
        }
    }
}

pub async fn generate_plan(session: &mut Session) -> Result<()> {
    session.require_login()?;
    let profile = load_profile(session).await?;

    let plan = generate(session, &PlanRequest::new(&profile), "Designing your plan...").await?;

    if let Err(e) = session.client().save_plan(&plan).await {
        return Err(session.fail(e));
    }

    print_plan(&plan);
    println!();
    ui::success("Plan saved");
    Ok(())
}

pub async fn show_plan(session: &mut Session) -> Result<()> {
    session.require_login()?;

    match session.client().get_plan().await {
        Ok(Some(plan)) => print_plan(&plan),
        Ok(None) => ui::info("No active plan. Generate one with `fit-tracker plan generate`."),
        Err(e) => return Err(session.fail(e)),
    }
    Ok(())
}

pub async fn advice(session: &mut Session) -> Result<()> {
    session.require_login()?;
    let profile = load_profile(session).await?;
    let logs = load_logs(session).await?;

    let advice = generate(
        session,
        &AdviceRequest::new(&profile, &logs),
        "Asking your coach...",
    )
    .await?;

    ui::heading("Coach's Advice");
    println!("{}", advice.summary);
    println!();
    ui::bullet_list(&advice.tips);
    for warning in &advice.warnings {
        ui::warning(warning);
    }
    Ok(())
}

pub async fn report(session: &mut Session) -> Result<()> {
    session.require_login()?;
    let profile = load_profile(session).await?;
    let logs = load_logs(session).await?;

    if logs.is_empty() {
        ui::info("Log a few workouts first, then ask for a report.");
        return Ok(());
    }

    let report = generate(
        session,
        &ReportRequest::new(&profile, &logs),
        "Analyzing your training...",
    )
    .await?;

    ui::heading("Training Report");
    println!("{}", report.summary);
    println!();
    ui::score("Consistency", report.consistency_score);
    ui::score("Intensity", report.intensity_score);
    ui::score("Progress", report.progress_score);

    if !report.strengths.is_empty() {
        println!();
        println!("{}", "Strengths".bold());
        ui::bullet_list(&report.strengths);
    }
    if !report.improvements.is_empty() {
        println!();
        println!("{}", "To improve".bold());
        ui::bullet_list(&report.improvements);
    }
    println!();
    println!("{}", "Next steps".bold());
    ui::bullet_list(&report.next_steps);
    Ok(())
}

pub async fn insight(session: &mut Session, exercise: &str) -> Result<()> {
    session.require_login()?;
    let logs = load_logs(session).await?;

    let request = InsightRequest::new(exercise, &logs);
    if request.session_count() == 0 {
        ui::info(format!("No logged sessions include {}.", exercise));
        return Ok(());
    }

    let insight = generate(session, &request, "Reviewing your sessions...").await?;

    ui::heading(format!("Insight: {}", insight.exercise));
    println!("{}", insight.summary);
    println!();
    ui::score("Progress", insight.progress_score);
    if !insight.recommendation.is_empty() {
        println!();
        println!("{} {}", "Recommendation:".bold(), insight.recommendation);
    }
    ui::bullet_list(&insight.tips);
    Ok(())
}
