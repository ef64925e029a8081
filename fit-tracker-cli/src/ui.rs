//! Terminal output helpers shared by the commands.

use std::future::Future;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn info(message: impl AsRef<str>) {
    println!("{} {}", "info:".blue().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "warning:".yellow().bold(), message.as_ref());
}

pub fn heading(title: impl AsRef<str>) {
    println!("{}", title.as_ref().bold());
    println!("{}", "────────────────────────────────".dimmed());
}

/// Run `task` behind a spinner that disappears when it finishes
pub async fn with_spinner<F, T>(message: impl Into<String>, task: F) -> T
where
    F: Future<Output = T>,
{
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = task.await;
    spinner.finish_and_clear();
    result
}

pub fn bullet_list(items: &[String]) {
    for item in items {
        println!("  • {}", item);
    }
}

/// Render a 0-100 score with a color band
pub fn score(label: &str, value: f64) {
    let text = format!("{:>5.1}", value);
    let colored = if value >= 70.0 {
        text.green()
    } else if value >= 40.0 {
        text.yellow()
    } else {
        text.red()
    };
    println!("  {:<14} {}", label, colored);
}
