//! One-rep-max progression recommendations
//!
//! Interprets a window of recent sets against an athlete's current record and
//! proposes one of four actions. Rules are evaluated in order and the first
//! match wins:
//!
//! 1. No qualifying sets: `keep` with zero confidence
//! 2. No current 1RM: `set_initial` from the best set estimate
//! 3. Exercise never the strength focus of a session: `keep`
//! 4. Best estimate more than 5% above the current max: `increase`
//! 5. Near-maximal effort with clear underperformance: `decrease`
//! 6. Otherwise: `keep`
//!
//! A recommendation is advisory only. Nothing here touches a record; see
//! [`crate::records::apply_recommendation`] for the confirmation path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::estimation::{
    estimate_one_rm, get_effective_load, get_recommended_increment, MAX_ESTIMATION_REPS,
    PLATE_STEP_KG,
};
use crate::models::{Athlete, Exercise, SetEntry};

/// Action proposed by a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationAction {
    SetInitial,
    Increase,
    Decrease,
    Keep,
}

impl std::fmt::Display for RecommendationAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommendationAction::SetInitial => write!(f, "set_initial"),
            RecommendationAction::Increase => write!(f, "increase"),
            RecommendationAction::Decrease => write!(f, "decrease"),
            RecommendationAction::Keep => write!(f, "keep"),
        }
    }
}

/// Proposed 1RM change with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub exercise_id: String,

    /// Proposed one-rep max in kilograms
    pub suggested_one_rm: f64,

    /// One-rep max on record when the recommendation was made
    pub current_one_rm: Option<f64>,

    pub action: RecommendationAction,

    /// Coach-facing explanation citing the numbers behind the decision
    pub rationale: String,

    /// Confidence in the recommendation (0.0-1.0)
    pub confidence: f64,

    /// Number of sets that qualified for estimation
    pub based_on_sets: usize,

    /// Mean intensity of qualifying sets that reported one
    pub average_intensity: Option<f64>,
}

/// Thresholds for the progression rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Highest rep count that still participates in estimation
    pub max_estimation_reps: u32,

    /// Qualifying sets needed for the high-confidence initial estimate
    pub min_sets_for_confidence: usize,

    /// Strength-focus sessions required before increase/decrease
    pub min_strength_focus_sessions: u32,

    /// Best estimate ratio above which an increase is suggested
    pub increase_ratio: f64,

    /// Best estimate ratio below which a decrease may be suggested
    pub decrease_ratio: f64,

    /// Mean intensity at which an increase is high-confidence
    pub high_confidence_intensity: f64,

    /// Mean intensity required before suggesting a decrease
    pub decrease_intensity: f64,

    /// Fraction of the current max removed on decrease
    pub decrease_fraction: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            max_estimation_reps: MAX_ESTIMATION_REPS,
            min_sets_for_confidence: 3,
            min_strength_focus_sessions: 1,
            increase_ratio: 1.05,
            decrease_ratio: 0.95,
            high_confidence_intensity: 7.0,
            decrease_intensity: 9.0,
            decrease_fraction: 0.05,
        }
    }
}

/// A set reduced to what the rules need
#[derive(Debug, Clone, Copy)]
struct QualifyingSet {
    estimate: f64,
    intensity: Option<f64>,
}

/// Stateless progression analyzer
#[derive(Debug, Clone, Default)]
pub struct ProgressionAnalyzer {
    config: ProgressionConfig,
}

impl ProgressionAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProgressionConfig) -> Self {
        ProgressionAnalyzer { config }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    fn qualifying_sets(
        &self,
        sets: &[SetEntry],
        is_bodyweight: bool,
        athlete_weight_kg: Option<f64>,
    ) -> Vec<QualifyingSet> {
        sets.iter()
            .filter(|set| set.is_completed)
            .filter_map(|set| {
                let weight = set.weight()?;
                let reps = set.reps()?;
                if reps == 0 || reps > self.config.max_estimation_reps {
                    return None;
                }
                let load = get_effective_load(weight, is_bodyweight, athlete_weight_kg);
                let estimate = estimate_one_rm(load, reps);
                if estimate <= 0.0 {
                    return None;
                }
                Some(QualifyingSet {
                    estimate,
                    intensity: set.effective_intensity(),
                })
            })
            .collect()
    }

    /// Analyze recent sets for one exercise
    ///
    /// `exercise` supplies the bodyweight flag; without it the exercise is
    /// treated as externally loaded.
    pub fn analyze(
        &self,
        athlete: &Athlete,
        exercise_id: &str,
        exercise: Option<&Exercise>,
        sets: &[SetEntry],
    ) -> Recommendation {
        let is_bodyweight = exercise.map(|e| e.is_bodyweight).unwrap_or(false);
        let qualifying = self.qualifying_sets(sets, is_bodyweight, athlete.current_weight_kg);
        let record = athlete.one_rm_record(exercise_id);
        let current = record
            .and_then(|r| r.current_one_rm)
            .filter(|value| *value > 0.0);

        let sample_size = qualifying.len();
        let mean_intensity = average_intensity_of(&qualifying);

        // Rule 1
        if qualifying.is_empty() {
            debug!(exercise_id, "No qualifying sets for progression");
            return Recommendation {
                exercise_id: exercise_id.to_string(),
                suggested_one_rm: current.unwrap_or(0.0),
                current_one_rm: current,
                action: RecommendationAction::Keep,
                rationale: format!(
                    "No completed sets with weight and 1-{} reps to estimate from.",
                    self.config.max_estimation_reps
                ),
                confidence: 0.0,
                based_on_sets: 0,
                average_intensity: None,
            };
        }

        let best = qualifying
            .iter()
            .map(|set| set.estimate)
            .fold(0.0_f64, f64::max);
        let intensity_text = describe_intensity(mean_intensity);

        let build = |suggested: f64, action: RecommendationAction, confidence: f64, rationale: String| {
            debug!(exercise_id, %action, suggested, confidence, best, "Progression decision");
            Recommendation {
                exercise_id: exercise_id.to_string(),
                suggested_one_rm: suggested,
                current_one_rm: current,
                action,
                rationale,
                confidence: confidence.clamp(0.0, 1.0),
                based_on_sets: sample_size,
                average_intensity: mean_intensity,
            }
        };

        // Rule 2
        let current = match current {
            Some(value) => value,
            None => {
                let confidence = if sample_size >= self.config.min_sets_for_confidence {
                    0.8
                } else {
                    0.6
                };
                return build(
                    best,
                    RecommendationAction::SetInitial,
                    confidence,
                    format!(
                        "No 1RM on record. Best estimate {:.1} kg from {} set(s), mean intensity {}.",
                        best, sample_size, intensity_text
                    ),
                );
            }
        };

        // Rule 3
        let focus_sessions = record.map(|r| r.strength_focus_sessions).unwrap_or(0);
        if focus_sessions < self.config.min_strength_focus_sessions {
            return build(
                current,
                RecommendationAction::Keep,
                0.5,
                format!(
                    "Keeping {:.1} kg: progression needs at least {} strength-focus session(s) for this lift \
                     (found {}). Best estimate {:.1} kg from {} set(s), mean intensity {}.",
                    current,
                    self.config.min_strength_focus_sessions,
                    focus_sessions,
                    best,
                    sample_size,
                    intensity_text
                ),
            );
        }

        // Rule 4
        if best > current * self.config.increase_ratio {
            let increment = get_recommended_increment(current);
            let confidence = match mean_intensity {
                Some(intensity) if intensity >= self.config.high_confidence_intensity => 0.85,
                _ => 0.7,
            };
            return build(
                current + increment,
                RecommendationAction::Increase,
                confidence,
                format!(
                    "Best estimate {:.1} kg exceeds current 1RM {:.1} kg by {:.1}%. \
                     Increase by {:.1} kg. Based on {} set(s), mean intensity {}.",
                    best,
                    current,
                    (best / current - 1.0) * 100.0,
                    increment,
                    sample_size,
                    intensity_text
                ),
            );
        }

        // Rule 5
        let near_maximal = matches!(
            mean_intensity,
            Some(intensity) if intensity >= self.config.decrease_intensity
        );
        if near_maximal && best < current * self.config.decrease_ratio {
            let decrement =
                (current * self.config.decrease_fraction / PLATE_STEP_KG).round() * PLATE_STEP_KG;
            return build(
                (current - decrement).max(0.0),
                RecommendationAction::Decrease,
                0.6,
                format!(
                    "Best estimate {:.1} kg is {:.1}% below current 1RM {:.1} kg at mean intensity {}. \
                     Decrease by {:.1} kg. Based on {} set(s).",
                    best,
                    (1.0 - best / current) * 100.0,
                    current,
                    intensity_text,
                    decrement,
                    sample_size
                ),
            );
        }

        // Rule 6
        build(
            current,
            RecommendationAction::Keep,
            0.75,
            format!(
                "Best estimate {:.1} kg is consistent with current 1RM {:.1} kg. \
                 Based on {} set(s), mean intensity {}.",
                best, current, sample_size, intensity_text
            ),
        )
    }
}

fn average_intensity_of(sets: &[QualifyingSet]) -> Option<f64> {
    let values: Vec<f64> = sets.iter().filter_map(|set| set.intensity).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn describe_intensity(intensity: Option<f64>) -> String {
    match intensity {
        Some(value) => format!("{:.1}/10", value),
        None => "not reported".to_string(),
    }
}

/// Analyze with the default thresholds
pub fn analyze_one_rm_progression(
    athlete: &Athlete,
    exercise_id: &str,
    exercise: Option<&Exercise>,
    sets: &[SetEntry],
) -> Recommendation {
    ProgressionAnalyzer::new().analyze(athlete, exercise_id, exercise, sets)
}
