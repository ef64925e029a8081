//! Request kinds for generated content.
//!
//! Key payloads stay small: counts and last dates discriminate stale results
//! without hashing whole histories.

use std::fmt::Write;

use serde_json::{json, Value};

use super::GenerationRequest;
use crate::models::{
    AiAdvice, ExerciseInsight, ExerciseLog, TrainingReport, UserProfile, WorkoutLog, WorkoutPlan,
};

/// Sessions included verbatim in a prompt
const PROMPT_HISTORY_LIMIT: usize = 10;

fn last_date(logs: &[WorkoutLog]) -> Value {
    logs.iter()
        .map(|log| log.date)
        .max()
        .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
        .unwrap_or(Value::Null)
}

fn total_minutes(logs: &[WorkoutLog]) -> u64 {
    logs.iter().map(|log| u64::from(log.duration)).sum()
}

fn describe_profile(profile: &UserProfile) -> String {
    format!(
        "Athlete: age {}, weight {:.1} kg, height {:.0} cm, goal {}, fitness level {}.",
        profile.age, profile.weight, profile.height, profile.goal, profile.fitness_level
    )
}

fn describe_exercise(exercise: &ExerciseLog) -> String {
    match exercise {
        ExerciseLog::Strength { name, sets } => {
            let sets: Vec<String> = sets
                .iter()
                .map(|s| format!("{}x{:.1}kg", s.reps, s.weight))
                .collect();
            format!("{} [{}]", name, sets.join(", "))
        }
        ExerciseLog::Cardio { name, sets, .. } => {
            let minutes: f64 = sets.iter().map(|s| s.duration).sum();
            format!("{} ({:.0} min)", name, minutes)
        }
    }
}

/// Most recent sessions first, one line each
fn describe_history(logs: &[WorkoutLog]) -> String {
    let mut recent: Vec<&WorkoutLog> = logs.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));

    let mut out = String::new();
    for log in recent.into_iter().take(PROMPT_HISTORY_LIMIT) {
        let _ = write!(
            out,
            "- {}: {} ({} min, {} kcal)",
            log.date.format("%Y-%m-%d"),
            log.title,
            log.duration,
            log.calories
        );
        if !log.exercises.is_empty() {
            let exercises: Vec<String> = log.exercises.iter().map(describe_exercise).collect();
            let _ = write!(out, ": {}", exercises.join("; "));
        }
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str("No workouts logged yet.\n");
    }
    out
}

fn string_array() -> Value {
    json!({"type": "ARRAY", "items": {"type": "STRING"}})
}

/// Weekly training plan for a profile
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest<'a> {
    profile: &'a UserProfile,
}

impl<'a> PlanRequest<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self { profile }
    }
}

impl GenerationRequest for PlanRequest<'_> {
    type Output = WorkoutPlan;

    fn kind(&self) -> &'static str {
        "plan"
    }

    fn key_payload(&self) -> Value {
        json!({
            "goal": self.profile.goal,
            "level": self.profile.fitness_level,
            "age": self.profile.age,
            "weight": self.profile.weight,
        })
    }

    fn prompt(&self) -> String {
        format!(
            "You are a personal trainer. Design a seven day training plan.\n{}\n\
             Give every day a label, a focus, a list of exercises, a duration in minutes \
             and short notes. Rest days have no exercises.",
            describe_profile(self.profile)
        )
    }

    fn schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "title": {"type": "STRING"},
                "goal": {"type": "STRING"},
                "days": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "day": {"type": "STRING"},
                            "focus": {"type": "STRING"},
                            "exercises": string_array(),
                            "duration": {"type": "INTEGER"},
                            "notes": {"type": "STRING"}
                        },
                        "required": ["day", "focus", "exercises", "duration"]
                    }
                }
            },
            "required": ["title", "days"]
        })
    }
}

/// Short coaching advice from recent history
#[derive(Debug, Clone, Copy)]
pub struct AdviceRequest<'a> {
    profile: &'a UserProfile,
    logs: &'a [WorkoutLog],
}

impl<'a> AdviceRequest<'a> {
    pub fn new(profile: &'a UserProfile, logs: &'a [WorkoutLog]) -> Self {
        Self { profile, logs }
    }
}

impl GenerationRequest for AdviceRequest<'_> {
    type Output = AiAdvice;

    fn kind(&self) -> &'static str {
        "advice"
    }

    fn key_payload(&self) -> Value {
        json!({
            "logCount": self.logs.len(),
            "lastDate": last_date(self.logs),
            "totalMinutes": total_minutes(self.logs),
            "goal": self.profile.goal,
            "level": self.profile.fitness_level,
            "weight": self.profile.weight,
        })
    }

    fn prompt(&self) -> String {
        format!(
            "You are a supportive fitness coach. Give a one paragraph summary, \
             three to five practical tips and any safety warnings.\n{}\nRecent workouts:\n{}",
            describe_profile(self.profile),
            describe_history(self.logs)
        )
    }

    fn schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": {"type": "STRING"},
                "tips": string_array(),
                "warnings": string_array()
            },
            "required": ["summary", "tips"]
        })
    }
}

/// Scored training report over the whole history
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest<'a> {
    profile: &'a UserProfile,
    logs: &'a [WorkoutLog],
}

impl<'a> ReportRequest<'a> {
    pub fn new(profile: &'a UserProfile, logs: &'a [WorkoutLog]) -> Self {
        Self { profile, logs }
    }
}

impl GenerationRequest for ReportRequest<'_> {
    type Output = TrainingReport;

    fn kind(&self) -> &'static str {
        "report"
    }

    fn key_payload(&self) -> Value {
        json!({
            "logCount": self.logs.len(),
            "lastDate": last_date(self.logs),
            "totalMinutes": total_minutes(self.logs),
            "age": self.profile.age,
            "goal": self.profile.goal,
        })
    }

    fn prompt(&self) -> String {
        format!(
            "You are a performance analyst. Review this training history and score \
             consistency, intensity and progress from 0 to 100. List strengths, \
             improvements and next steps.\n{}\n{} workouts, {} minutes in total.\n\
             Recent workouts:\n{}",
            describe_profile(self.profile),
            self.logs.len(),
            total_minutes(self.logs),
            describe_history(self.logs)
        )
    }

    fn schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": {"type": "STRING"},
                "consistencyScore": {"type": "NUMBER"},
                "intensityScore": {"type": "NUMBER"},
                "progressScore": {"type": "NUMBER"},
                "strengths": string_array(),
                "improvements": string_array(),
                "nextSteps": string_array()
            },
            "required": [
                "summary",
                "consistencyScore",
                "intensityScore",
                "progressScore",
                "nextSteps"
            ]
        })
    }
}

/// Progress insight for one named exercise
#[derive(Debug, Clone)]
pub struct InsightRequest<'a> {
    exercise: &'a str,
    sessions: Vec<&'a WorkoutLog>,
}

impl<'a> InsightRequest<'a> {
    /// Keeps only the sessions that contain `exercise` (case-insensitive)
    pub fn new(exercise: &'a str, logs: &'a [WorkoutLog]) -> Self {
        let sessions = logs
            .iter()
            .filter(|log| {
                log.exercises
                    .iter()
                    .any(|e| e.name().eq_ignore_ascii_case(exercise.trim()))
            })
            .collect();
        Self { exercise, sessions }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn history(&self) -> String {
        let mut sessions = self.sessions.clone();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));

        let mut out = String::new();
        for log in sessions.into_iter().take(PROMPT_HISTORY_LIMIT) {
            for exercise in log
                .exercises
                .iter()
                .filter(|e| e.name().eq_ignore_ascii_case(self.exercise.trim()))
            {
                let _ = writeln!(
                    out,
                    "- {}: {}",
                    log.date.format("%Y-%m-%d"),
                    describe_exercise(exercise)
                );
            }
        }
        if out.is_empty() {
            out.push_str("No sessions recorded for this exercise.\n");
        }
        out
    }
}

impl GenerationRequest for InsightRequest<'_> {
    type Output = ExerciseInsight;

    fn kind(&self) -> &'static str {
        "insight"
    }

    fn key_payload(&self) -> Value {
        let last = self
            .sessions
            .iter()
            .map(|log| log.date)
            .max()
            .map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
            .unwrap_or(Value::Null);

        json!({
            "exercise": self.exercise.trim().to_lowercase(),
            "sessionCount": self.sessions.len(),
            "lastDate": last,
        })
    }

    fn prompt(&self) -> String {
        format!(
            "You are a strength and conditioning coach. Assess progress on {} from \
             these sessions, score it from 0 to 100 and give one recommendation \
             with a few tips.\n{}",
            self.exercise.trim(),
            self.history()
        )
    }

    fn schema(&self) -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "exercise": {"type": "STRING"},
                "summary": {"type": "STRING"},
                "progressScore": {"type": "NUMBER"},
                "recommendation": {"type": "STRING"},
                "tips": string_array()
            },
            "required": ["exercise", "summary", "progressScore"]
        })
    }
}
