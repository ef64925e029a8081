use chrono::{Local, TimeZone};

use crate::models::WorkoutLog;

const NOTES_SEPARATOR: &str = " | ";

/// What happened when a log was added to the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Folded into the existing log at this index
    Merged(usize),
    /// Inserted as a new entry at the head
    Inserted,
}

/// Fold `incoming` into `existing`, which is assumed to be on the same day.
///
/// Durations and calories add up, exercises are appended after the existing
/// ones, notes are joined. Identity, title and date stay with `existing`.
pub fn merge_logs(existing: &WorkoutLog, incoming: &WorkoutLog) -> WorkoutLog {
    let notes = if incoming.notes.is_empty() {
        existing.notes.clone()
    } else if existing.notes.is_empty() {
        incoming.notes.clone()
    } else {
        format!("{}{}{}", existing.notes, NOTES_SEPARATOR, incoming.notes)
    };

    let mut exercises = existing.exercises.clone();
    exercises.extend(incoming.exercises.iter().cloned());

    WorkoutLog {
        id: existing.id.clone(),
        date: existing.date,
        title: existing.title.clone(),
        duration: existing.duration.saturating_add(incoming.duration),
        calories: existing.calories.saturating_add(incoming.calories),
        notes,
        exercises,
    }
}

/// Add a log to a most-recent-first list, keeping one log per calendar day in `tz`
pub fn add_log_in<Tz: TimeZone>(
    logs: &mut Vec<WorkoutLog>,
    incoming: WorkoutLog,
    tz: &Tz,
) -> MergeOutcome {
    let day = incoming.day_in(tz);

    match logs.iter().position(|log| log.day_in(tz) == day) {
        Some(index) => {
            tracing::debug!("Merging log {} into existing log for {}", incoming.id, day);
            logs[index] = merge_logs(&logs[index], &incoming);
            MergeOutcome::Merged(index)
        }
        None => {
            logs.insert(0, incoming);
            MergeOutcome::Inserted
        }
    }
}

/// [`add_log_in`] using the local time zone
pub fn add_log(logs: &mut Vec<WorkoutLog>, incoming: WorkoutLog) -> MergeOutcome {
    add_log_in(logs, incoming, &Local)
}
