use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::lenient;

/// User profile as stored by the data backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::non_negative_u32")]
    pub age: u32,
    /// kg
    #[serde(default, deserialize_with = "lenient::non_negative_f64")]
    pub weight: f64,
    /// cm
    #[serde(default, deserialize_with = "lenient::non_negative_f64")]
    pub height: f64,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub fitness_level: FitnessLevel,
    /// Samples in arbitrary order; sort before use
    #[serde(default)]
    pub weight_history: Vec<WeightSample>,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, age: u32, weight: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            age,
            weight,
            height,
            goal: Goal::default(),
            fitness_level: FitnessLevel::default(),
            weight_history: Vec::new(),
        }
    }

    /// Local mirror of `POST /weight`: append a sample and update the current weight
    pub fn record_weight(&mut self, weight: f64, date: NaiveDate) {
        let weight = lenient::sanitize(weight);
        self.weight_history.push(WeightSample { date, weight });
        self.weight = weight;
    }

    /// Body mass index, `None` when height is unknown
    pub fn bmi(&self) -> Option<f64> {
        if self.height <= 0.0 || self.weight <= 0.0 {
            return None;
        }
        let meters = self.height / 100.0;
        Some(self.weight / (meters * meters))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::non_negative_f64")]
    pub weight: f64,
}

impl WeightSample {
    pub fn new(date: NaiveDate, weight: f64) -> Self {
        Self { date, weight }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    Endurance,
    Flexibility,
    #[default]
    GeneralHealth,
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Goal::WeightLoss => write!(f, "weight-loss"),
            Goal::MuscleGain => write!(f, "muscle-gain"),
            Goal::Endurance => write!(f, "endurance"),
            Goal::Flexibility => write!(f, "flexibility"),
            Goal::GeneralHealth => write!(f, "general-health"),
        }
    }
}

impl std::str::FromStr for Goal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "weight-loss" => Ok(Goal::WeightLoss),
            "muscle-gain" => Ok(Goal::MuscleGain),
            "endurance" => Ok(Goal::Endurance),
            "flexibility" => Ok(Goal::Flexibility),
            "general-health" => Ok(Goal::GeneralHealth),
            _ => Err(anyhow::anyhow!("Invalid goal: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitnessLevel::Beginner => write!(f, "beginner"),
            FitnessLevel::Intermediate => write!(f, "intermediate"),
            FitnessLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for FitnessLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "beginner" => Ok(FitnessLevel::Beginner),
            "intermediate" => Ok(FitnessLevel::Intermediate),
            "advanced" => Ok(FitnessLevel::Advanced),
            _ => Err(anyhow::anyhow!("Invalid fitness level: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_wire_format() {
        let json = r#"{
            "name": "Sam",
            "age": "31",
            "weight": 78.5,
            "height": 180,
            "goal": "muscle-gain",
            "fitnessLevel": "intermediate",
            "weightHistory": [{"date": "2024-02-01", "weight": 79}, {"date": "2024-01-01", "weight": "80"}]
        }"#;

        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.age, 31);
        assert_eq!(profile.goal, Goal::MuscleGain);
        assert_eq!(profile.fitness_level, FitnessLevel::Intermediate);
        assert_eq!(profile.weight_history.len(), 2);
        assert_eq!(profile.weight_history[1].weight, 80.0);
    }

    #[test]
    fn test_profile_defaults() {
        let profile: UserProfile = serde_json::from_str(r#"{"name": "Ana"}"#).unwrap();
        assert_eq!(profile.goal, Goal::GeneralHealth);
        assert_eq!(profile.fitness_level, FitnessLevel::Beginner);
        assert_eq!(profile.weight, 0.0);
        assert!(profile.weight_history.is_empty());
    }

    #[test]
    fn test_record_weight() {
        let mut profile = UserProfile::new("Sam", 31, 80.0, 180.0);
        profile.record_weight(79.2, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        assert_eq!(profile.weight, 79.2);
        assert_eq!(profile.weight_history.len(), 1);
    }

    #[test]
    fn test_bmi() {
        let profile = UserProfile::new("Sam", 31, 81.0, 180.0);
        let bmi = profile.bmi().unwrap();
        assert!((bmi - 25.0).abs() < 0.01);

        let unknown = UserProfile::new("Ana", 28, 60.0, 0.0);
        assert!(unknown.bmi().is_none());
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!("weight_loss".parse::<Goal>().unwrap(), Goal::WeightLoss);
        assert_eq!(Goal::GeneralHealth.to_string(), "general-health");
        assert!("get-swole".parse::<Goal>().is_err());
    }
}
