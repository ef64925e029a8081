use anyhow::{bail, Result};
use colored::Colorize;
use fit_tracker::metrics::{weight_trend, TrendDirection};

use crate::session::Session;
use crate::ui;

pub async fn add_weight(session: &mut Session, kg: f64) -> Result<()> {
    session.require_login()?;

    if !kg.is_finite() || kg <= 0.0 {
        bail!("Weight must be a positive number of kilograms");
    }

    if let Err(e) = session.client().add_weight(kg).await {
        return Err(session.fail(e));
    }

    ui::success(format!("Recorded {:.1} kg", kg));
    Ok(())
}

pub async fn show_trend(session: &mut Session) -> Result<()> {
    session.require_login()?;

    let profile = match session.client().get_profile().await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            ui::info("No profile yet. Create one with `fit-tracker profile set`.");
            return Ok(());
        }
        Err(e) => return Err(session.fail(e)),
    };

    let trend = weight_trend(&profile.weight_history, profile.weight);
    let delta = format!("{} kg", trend.signed_delta());
    let delta = if trend.is_favorable_for(profile.goal) {
        delta.green()
    } else {
        delta.red()
    };
    let arrow = match trend.direction() {
        TrendDirection::Up => "↑",
        TrendDirection::Down => "↓",
        TrendDirection::Flat => "→",
    };

    ui::heading("Weight Trend");
    println!("  Start:   {:.1} kg", trend.baseline);
    println!("  Current: {:.1} kg", trend.current);
    println!("  Change:  {} {}", arrow, delta);
    println!("  Goal:    {}", profile.goal);

    let mut history = profile.weight_history.clone();
    history.sort_by_key(|sample| sample.date);
    if !history.is_empty() {
        println!();
        for sample in history.iter().rev().take(10) {
            println!("  {}  {:.1} kg", sample.date, sample.weight);
        }
    }

    Ok(())
}
