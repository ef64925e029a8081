use anyhow::Result;
use chrono::Local;
use clap::Args;
use colored::Colorize;
use fit_tracker::models::{FitnessLevel, Goal, UserProfile};

use crate::session::Session;
use crate::ui;

#[derive(Args)]
pub struct ProfileSetArgs {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    age: Option<u32>,

    /// Body weight in kg
    #[arg(long)]
    weight: Option<f64>,

    /// Height in cm
    #[arg(long)]
    height: Option<f64>,

    /// weight-loss, muscle-gain, endurance, flexibility or general-health
    #[arg(long)]
    goal: Option<Goal>,

    /// beginner, intermediate or advanced
    #[arg(long)]
    level: Option<FitnessLevel>,
}

impl ProfileSetArgs {
    fn apply(self, profile: &mut UserProfile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(age) = self.age {
            profile.age = age;
        }
        if let Some(weight) = self.weight {
            profile.weight = weight.max(0.0);
        }
        if let Some(height) = self.height {
            profile.height = height.max(0.0);
        }
        if let Some(goal) = self.goal {
            profile.goal = goal;
        }
        if let Some(level) = self.level {
            profile.fitness_level = level;
        }
    }
}

pub async fn show_profile(session: &mut Session) -> Result<()> {
    session.require_login()?;

    let profile = match session.client().get_profile().await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            ui::info("No profile yet. Create one with `fit-tracker profile set`.");
            return Ok(());
        }
        Err(e) => return Err(session.fail(e)),
    };

    ui::heading(format!("Profile: {}", profile.name));
    println!("  Age:           {}", profile.age);
    println!("  Weight:        {:.1} kg", profile.weight);
    println!("  Height:        {:.0} cm", profile.height);
    if let Some(bmi) = profile.bmi() {
        println!("  BMI:           {:.1}", bmi);
    }
    println!("  Goal:          {}", profile.goal.to_string().cyan());
    println!("  Fitness level: {}", profile.fitness_level);

    Ok(())
}

pub async fn set_profile(session: &mut Session, args: ProfileSetArgs) -> Result<()> {
    session.require_login()?;

    let mut profile = match session.client().get_profile().await {
        Ok(Some(profile)) => profile,
        Ok(None) => UserProfile::new(session.config.auth.username.clone(), 0, 0.0, 0.0),
        Err(e) => return Err(session.fail(e)),
    };

    let previous_weight = profile.weight;
    args.apply(&mut profile);

    // a changed weight also lands in the history the trend is computed from
    if profile.weight > 0.0 && profile.weight != previous_weight {
        profile.record_weight(profile.weight, Local::now().date_naive());
    }

    if let Err(e) = session.client().save_profile(&profile).await {
        return Err(session.fail(e));
    }

    ui::success(format!("Profile saved for {}", profile.name));
    Ok(())
}
