use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a one-rep-max value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneRmSource {
    /// Entered by the user or coach
    Manual,
    /// Derived from a completed set
    Estimated,
    /// Accepted from a progression recommendation
    AiSuggested,
}

impl std::fmt::Display for OneRmSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OneRmSource::Manual => write!(f, "manual"),
            OneRmSource::Estimated => write!(f, "estimated"),
            OneRmSource::AiSuggested => write!(f, "ai_suggested"),
        }
    }
}

impl std::str::FromStr for OneRmSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "manual" => Ok(OneRmSource::Manual),
            "estimated" => Ok(OneRmSource::Estimated),
            "ai_suggested" | "suggested" => Ok(OneRmSource::AiSuggested),
            _ => Err(format!("Unknown 1RM source: {}", s)),
        }
    }
}

/// Single point in a one-rep-max history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRmHistoryEntry {
    /// When the value was recorded
    pub date: DateTime<Utc>,

    /// One-rep-max value in kilograms
    pub value: f64,

    /// How the value was obtained
    pub source: OneRmSource,

    /// Session that produced the value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// One-rep-max tracking for a single athlete and exercise
///
/// `current_one_rm` always mirrors the value of the last `history` entry.
/// Use the functions in [`crate::records`] to build and amend records so the
/// two never drift apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneRmRecord {
    /// Exercise this record tracks
    pub exercise_id: String,

    /// Current best estimate in kilograms
    pub current_one_rm: Option<f64>,

    /// Source of `current_one_rm`
    pub source: OneRmSource,

    /// Timestamp of the most recent change
    pub last_update: DateTime<Utc>,

    /// Sessions in which this exercise was the explicit strength focus
    #[serde(default)]
    pub strength_focus_sessions: u32,

    /// Chronological, append-only history
    pub history: Vec<OneRmHistoryEntry>,
}

/// A single set as logged by the session layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Weight actually lifted in kilograms
    #[serde(default)]
    pub actual_weight: Option<f64>,

    /// Planned weight in kilograms
    #[serde(default)]
    pub target_weight: Option<f64>,

    /// Repetitions actually performed
    #[serde(default)]
    pub actual_reps: Option<u32>,

    /// Planned repetitions
    #[serde(default)]
    pub target_reps: Option<u32>,

    /// Whether the set was completed
    #[serde(default)]
    pub is_completed: bool,

    /// Rate of perceived exertion (0-10)
    #[serde(default)]
    pub rpe: Option<f64>,

    /// Intensity rating (0-10); takes precedence over `rpe`
    #[serde(default)]
    pub intensity: Option<f64>,
}

impl SetEntry {
    /// Completed set with actual weight and reps
    pub fn completed(weight: f64, reps: u32) -> Self {
        SetEntry {
            actual_weight: Some(weight),
            actual_reps: Some(reps),
            is_completed: true,
            ..Default::default()
        }
    }

    /// Builder-style intensity setter
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Builder-style RPE setter
    pub fn with_rpe(mut self, rpe: f64) -> Self {
        self.rpe = Some(rpe);
        self
    }

    /// Weight lifted, preferring the actual value over the planned one
    pub fn weight(&self) -> Option<f64> {
        self.actual_weight.or(self.target_weight)
    }

    /// Reps performed, preferring the actual value over the planned one
    pub fn reps(&self) -> Option<u32> {
        self.actual_reps.or(self.target_reps)
    }

    /// Intensity of the set: `intensity` when present, otherwise `rpe`
    ///
    /// Non-finite ratings are treated as absent. No default is substituted
    /// here; callers decide what a missing rating means.
    pub fn effective_intensity(&self) -> Option<f64> {
        self.intensity
            .or(self.rpe)
            .filter(|value| value.is_finite())
    }
}

/// Exercise metadata relevant to load estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,

    /// Bodyweight movement (pull-ups, dips); external weight is added load
    #[serde(default)]
    pub is_bodyweight: bool,
}

impl Exercise {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Exercise {
            id: id.into(),
            name: name.into(),
            is_bodyweight: false,
        }
    }

    pub fn bodyweight(id: impl Into<String>, name: impl Into<String>) -> Self {
        Exercise {
            is_bodyweight: true,
            ..Self::new(id, name)
        }
    }
}

/// Athlete data consumed by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: String,
    pub name: String,

    /// Current bodyweight in kilograms
    #[serde(default)]
    pub current_weight_kg: Option<f64>,

    /// One-rep-max records keyed by exercise ID
    #[serde(default)]
    pub one_rm_records: HashMap<String, OneRmRecord>,
}

impl Athlete {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Athlete {
            id: id.into(),
            name: name.into(),
            current_weight_kg: None,
            one_rm_records: HashMap::new(),
        }
    }

    /// Record for an exercise, if one exists
    pub fn one_rm_record(&self, exercise_id: &str) -> Option<&OneRmRecord> {
        self.one_rm_records.get(exercise_id)
    }
}

/// A training session for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSession {
    pub id: String,
    pub date: NaiveDate,
    pub exercise_id: String,

    /// Exercise was the explicit strength target of this session
    #[serde(default)]
    pub strength_focus: bool,

    #[serde(default)]
    pub sets: Vec<SetEntry>,
}

impl TrainingSession {
    /// Tonnage of completed sets (weight × reps)
    pub fn volume(&self) -> f64 {
        self.sets
            .iter()
            .filter(|set| set.is_completed)
            .filter_map(|set| match (set.weight(), set.reps()) {
                (Some(weight), Some(reps)) if weight > 0.0 && weight.is_finite() => {
                    Some(weight * reps as f64)
                }
                _ => None,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_intensity_precedence() {
        let set = SetEntry::completed(100.0, 5).with_rpe(7.0).with_intensity(8.5);
        assert_eq!(set.effective_intensity(), Some(8.5));

        let set = SetEntry::completed(100.0, 5).with_rpe(7.0);
        assert_eq!(set.effective_intensity(), Some(7.0));

        let set = SetEntry::completed(100.0, 5);
        assert_eq!(set.effective_intensity(), None);

        let set = SetEntry::completed(100.0, 5).with_intensity(f64::NAN);
        assert_eq!(set.effective_intensity(), None);
    }

    #[test]
    fn test_actual_values_take_precedence() {
        let set = SetEntry {
            actual_weight: Some(90.0),
            target_weight: Some(100.0),
            actual_reps: None,
            target_reps: Some(5),
            is_completed: true,
            ..Default::default()
        };
        assert_eq!(set.weight(), Some(90.0));
        assert_eq!(set.reps(), Some(5));
    }

    #[test]
    fn test_session_volume_ignores_incomplete_sets() {
        let mut skipped = SetEntry::completed(200.0, 5);
        skipped.is_completed = false;

        let session = TrainingSession {
            id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            exercise_id: "squat".to_string(),
            strength_focus: true,
            sets: vec![SetEntry::completed(100.0, 5), SetEntry::completed(100.0, 3), skipped],
        };
        assert_eq!(session.volume(), 800.0);
    }

    #[test]
    fn test_source_serialization() {
        let json = serde_json::to_string(&OneRmSource::AiSuggested).unwrap();
        assert_eq!(json, "\"ai_suggested\"");
        assert_eq!("estimated".parse::<OneRmSource>().unwrap(), OneRmSource::Estimated);
        assert!("guess".parse::<OneRmSource>().is_err());
    }
}
