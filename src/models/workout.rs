use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::lenient;

/// One training session. At most one log exists per calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub title: String,
    /// Minutes
    #[serde(default, deserialize_with = "lenient::non_negative_u32")]
    pub duration: u32,
    /// Kilocalories
    #[serde(default, deserialize_with = "lenient::non_negative_u32")]
    pub calories: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseLog>,
}

impl WorkoutLog {
    /// Create a new log dated now with a generated ID
    pub fn new(title: impl Into<String>, duration: u32, calories: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: Utc::now(),
            title: title.into(),
            duration,
            calories,
            notes: String::new(),
            exercises: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<ExerciseLog>) -> Self {
        self.exercises = exercises;
        self
    }

    /// Calendar day of the log in the given time zone
    pub fn day_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.date.with_timezone(tz).date_naive()
    }

    /// Calendar day of the log in the local time zone
    pub fn local_day(&self) -> NaiveDate {
        self.day_in(&Local)
    }

    /// Total number of sets across all exercises
    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(ExerciseLog::set_count).sum()
    }
}

/// Exercise-type tab selected while editing a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    #[default]
    Strength,
    Cardio,
}

impl std::fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExerciseKind::Strength => write!(f, "strength"),
            ExerciseKind::Cardio => write!(f, "cardio"),
        }
    }
}

impl std::str::FromStr for ExerciseKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strength" => Ok(ExerciseKind::Strength),
            "cardio" => Ok(ExerciseKind::Cardio),
            _ => Err(anyhow::anyhow!("Invalid exercise type: {}", s)),
        }
    }
}

/// An exercise within a workout, tagged by variant on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExerciseLog {
    Strength {
        name: String,
        #[serde(default)]
        sets: Vec<StrengthSet>,
    },
    Cardio {
        name: String,
        #[serde(default)]
        category: Option<CardioCategory>,
        #[serde(default)]
        sets: Vec<CardioSet>,
    },
}

impl ExerciseLog {
    pub fn strength(name: impl Into<String>, sets: Vec<StrengthSet>) -> Self {
        ExerciseLog::Strength {
            name: name.into(),
            sets,
        }
    }

    pub fn cardio(
        name: impl Into<String>,
        category: Option<CardioCategory>,
        sets: Vec<CardioSet>,
    ) -> Self {
        ExerciseLog::Cardio {
            name: name.into(),
            category,
            sets,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ExerciseLog::Strength { name, .. } | ExerciseLog::Cardio { name, .. } => name,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        match self {
            ExerciseLog::Strength { .. } => ExerciseKind::Strength,
            ExerciseLog::Cardio { .. } => ExerciseKind::Cardio,
        }
    }

    pub fn set_count(&self) -> usize {
        match self {
            ExerciseLog::Strength { sets, .. } => sets.len(),
            ExerciseLog::Cardio { sets, .. } => sets.len(),
        }
    }
}

/// Weight in kg (0 means bodyweight) and repetitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthSet {
    #[serde(default, deserialize_with = "lenient::non_negative_f64")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient::non_negative_u32")]
    pub reps: u32,
}

impl StrengthSet {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }
}

/// Duration in minutes plus whichever intensity parameters the machine exposes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CardioSet {
    #[serde(default, deserialize_with = "lenient::non_negative_f64")]
    pub duration: f64,
    /// km/h
    #[serde(default, deserialize_with = "lenient::optional_f64", skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Percent grade
    #[serde(default, deserialize_with = "lenient::optional_f64", skip_serializing_if = "Option::is_none")]
    pub incline: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64", skip_serializing_if = "Option::is_none")]
    pub level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_f64", skip_serializing_if = "Option::is_none")]
    pub resistance: Option<f64>,
}

impl CardioSet {
    pub fn minutes(duration: f64) -> Self {
        Self {
            duration,
            ..Default::default()
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_incline(mut self, incline: f64) -> Self {
        self.incline = Some(incline);
        self
    }

    pub fn with_level(mut self, level: f64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = Some(resistance);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardioCategory {
    Running,
    InclineWalk,
    Stairmaster,
    Cycling,
    Elliptical,
    Rowing,
    Swimming,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for CardioCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CardioCategory::Running => "running",
            CardioCategory::InclineWalk => "incline-walk",
            CardioCategory::Stairmaster => "stairmaster",
            CardioCategory::Cycling => "cycling",
            CardioCategory::Elliptical => "elliptical",
            CardioCategory::Rowing => "rowing",
            CardioCategory::Swimming => "swimming",
            CardioCategory::Other => "other",
        };
        write!(f, "{}", label)
    }
}

impl std::str::FromStr for CardioCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "running" | "run" => Ok(CardioCategory::Running),
            "incline-walk" | "incline" => Ok(CardioCategory::InclineWalk),
            "stairmaster" | "stairs" => Ok(CardioCategory::Stairmaster),
            "cycling" | "bike" => Ok(CardioCategory::Cycling),
            "elliptical" => Ok(CardioCategory::Elliptical),
            "rowing" | "row" => Ok(CardioCategory::Rowing),
            "swimming" | "swim" => Ok(CardioCategory::Swimming),
            "other" => Ok(CardioCategory::Other),
            _ => Err(anyhow::anyhow!("Invalid cardio category: {}", s)),
        }
    }
}
