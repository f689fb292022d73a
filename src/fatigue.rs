//! Overtraining risk scoring
//!
//! Four independent signals contribute to an additive 0-100 score:
//!
//! | Signal | Moderate | Severe |
//! |---|---|---|
//! | Volume spike (last week vs prior mean) | >1.25× → +15 | >1.5× → +30 |
//! | Mean intensity | >7.5 → +10 | >8.5 → +25 |
//! | Sessions per week | >5 → +15 | >6 → +25 |
//! | Intensity above personal baseline | | >+1.5 → +20 |
//!
//! The score maps to a [`RiskLevel`] through fixed thresholds. Signals whose
//! inputs are missing are skipped rather than treated as errors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::TrainingSession;

/// Longest history window, in weeks, that [`FatigueInput::from_sessions`] builds
pub const MAX_WINDOW_WEEKS: usize = 520;

/// Overtraining risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,      // <30
    Moderate, // 30-50
    High,     // 50-70
    Critical, // >=70
}

impl RiskLevel {
    /// Level for a numeric score
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s < 30.0 => RiskLevel::Low,
            s if s < 50.0 => RiskLevel::Moderate,
            s if s < 70.0 => RiskLevel::High,
            _ => RiskLevel::Critical,
        }
    }

    /// Recommendation shown for this level
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::Critical => {
                "Schedule a deload week now: cut volume by 40-50% and keep intensity moderate."
            }
            RiskLevel::High => {
                "Monitor recovery closely: reduce volume or intensity and prioritise sleep."
            }
            RiskLevel::Moderate => "Training load is elevated but normal. Keep an eye on recovery.",
            RiskLevel::Low => "Training load is sustainable. Continue with the current plan.",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Moderate => write!(f, "moderate"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Critical => write!(f, "critical"),
        }
    }
}

/// Result of an overtraining assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertrainingIndicator {
    pub level: RiskLevel,

    /// Additive risk score (0-100)
    pub score: f64,

    /// One entry per triggered signal
    pub factors: Vec<String>,

    pub recommendation: String,
}

/// Training window to assess
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FatigueInput {
    /// Weekly volumes, oldest first; the last entry is the current week
    pub weekly_volumes: Vec<f64>,

    /// Mean intensity (0-10) of recent sessions
    pub recent_intensity: Option<f64>,

    /// Personal baseline intensity (0-10)
    pub average_intensity: Option<f64>,

    /// Sessions in the current week
    pub sessions_per_week: f64,
}

/// Signal thresholds and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueConfig {
    pub volume_spike_severe_ratio: f64,
    pub volume_spike_moderate_ratio: f64,
    pub volume_spike_severe_points: f64,
    pub volume_spike_moderate_points: f64,

    pub intensity_severe: f64,
    pub intensity_moderate: f64,
    pub intensity_severe_points: f64,
    pub intensity_moderate_points: f64,

    pub frequency_severe: f64,
    pub frequency_moderate: f64,
    pub frequency_severe_points: f64,
    pub frequency_moderate_points: f64,

    /// Margin above baseline that counts as an intensity jump
    pub baseline_margin: f64,
    pub baseline_points: f64,
}

impl Default for FatigueConfig {
    fn default() -> Self {
        FatigueConfig {
            volume_spike_severe_ratio: 1.5,
            volume_spike_moderate_ratio: 1.25,
            volume_spike_severe_points: 30.0,
            volume_spike_moderate_points: 15.0,
            intensity_severe: 8.5,
            intensity_moderate: 7.5,
            intensity_severe_points: 25.0,
            intensity_moderate_points: 10.0,
            frequency_severe: 6.0,
            frequency_moderate: 5.0,
            frequency_severe_points: 25.0,
            frequency_moderate_points: 15.0,
            baseline_margin: 1.5,
            baseline_points: 20.0,
        }
    }
}

/// Stateless overtraining analyzer
#[derive(Debug, Clone, Default)]
pub struct FatigueAnalyzer {
    config: FatigueConfig,
}

impl FatigueAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FatigueConfig) -> Self {
        FatigueAnalyzer { config }
    }

    pub fn config(&self) -> &FatigueConfig {
        &self.config
    }

    /// Ratio of the last week's volume to the mean of prior weeks
    ///
    /// `None` with fewer than two samples or no prior volume.
    pub fn volume_spike_ratio(weekly_volumes: &[f64]) -> Option<f64> {
        let (last, prior) = weekly_volumes.split_last()?;
        if prior.is_empty() || !last.is_finite() {
            return None;
        }
        let prior_mean = prior.iter().sum::<f64>() / prior.len() as f64;
        if !prior_mean.is_finite() || prior_mean <= 0.0 {
            return None;
        }
        Some(last / prior_mean)
    }

    pub fn assess(&self, input: &FatigueInput) -> OvertrainingIndicator {
        let cfg = &self.config;
        let mut score = 0.0;
        let mut factors = Vec::new();

        if let Some(ratio) = Self::volume_spike_ratio(&input.weekly_volumes) {
            if ratio > cfg.volume_spike_severe_ratio {
                score += cfg.volume_spike_severe_points;
                factors.push(format!(
                    "Weekly volume spiked to {:.0}% of the prior average",
                    ratio * 100.0
                ));
            } else if ratio > cfg.volume_spike_moderate_ratio {
                score += cfg.volume_spike_moderate_points;
                factors.push(format!(
                    "Weekly volume rose to {:.0}% of the prior average",
                    ratio * 100.0
                ));
            }
        }

        let recent = input.recent_intensity.filter(|v| v.is_finite());
        if let Some(intensity) = recent {
            if intensity > cfg.intensity_severe {
                score += cfg.intensity_severe_points;
                factors.push(format!("Very high mean intensity ({:.1}/10)", intensity));
            } else if intensity > cfg.intensity_moderate {
                score += cfg.intensity_moderate_points;
                factors.push(format!("High mean intensity ({:.1}/10)", intensity));
            }
        }

        let frequency = input.sessions_per_week;
        if frequency.is_finite() {
            if frequency > cfg.frequency_severe {
                score += cfg.frequency_severe_points;
                factors.push(format!("Very frequent training ({:.0} sessions/week)", frequency));
            } else if frequency > cfg.frequency_moderate {
                score += cfg.frequency_moderate_points;
                factors.push(format!("Frequent training ({:.0} sessions/week)", frequency));
            }
        }

        let baseline = input.average_intensity.filter(|v| v.is_finite());
        if let (Some(intensity), Some(baseline)) = (recent, baseline) {
            if intensity > baseline + cfg.baseline_margin {
                score += cfg.baseline_points;
                factors.push(format!(
                    "Recent intensity {:.1} is well above the usual {:.1}",
                    intensity, baseline
                ));
            }
        }

        let score: f64 = score.clamp(0.0, 100.0);
        let level = RiskLevel::from_score(score);

        debug!(score, %level, factors = factors.len(), "Overtraining assessment");

        OvertrainingIndicator {
            level,
            score,
            factors,
            recommendation: level.recommendation().to_string(),
        }
    }
}

/// Assess with the default thresholds
pub fn assess_overtraining_risk(input: &FatigueInput) -> OvertrainingIndicator {
    FatigueAnalyzer::new().assess(input)
}

impl FatigueInput {
    /// Build a window of `weeks` seven-day buckets ending on `as_of`
    ///
    /// Sessions outside the window are ignored. The recent intensity covers
    /// the last bucket; the baseline covers the whole window. `weeks` is
    /// clamped to `1..=MAX_WINDOW_WEEKS`.
    pub fn from_sessions(sessions: &[TrainingSession], as_of: NaiveDate, weeks: usize) -> Self {
        let weeks = weeks.clamp(1, MAX_WINDOW_WEEKS);
        let mut volumes = vec![0.0; weeks];
        let mut current_week_sessions = 0usize;
        let mut recent = Vec::new();
        let mut all = Vec::new();

        for session in sessions {
            let days_back = (as_of - session.date).num_days();
            if days_back < 0 {
                continue;
            }
            let bucket_from_end = (days_back / 7) as usize;
            if bucket_from_end >= weeks {
                continue;
            }
            let index = weeks - 1 - bucket_from_end;
            volumes[index] += session.volume();

            let intensities = session
                .sets
                .iter()
                .filter(|set| set.is_completed)
                .filter_map(|set| set.effective_intensity());

            if bucket_from_end == 0 {
                current_week_sessions += 1;
                for intensity in intensities {
                    recent.push(intensity);
                    all.push(intensity);
                }
            } else {
                all.extend(intensities);
            }
        }

        FatigueInput {
            weekly_volumes: volumes,
            recent_intensity: mean(&recent),
            average_intensity: mean(&all),
            sessions_per_week: current_week_sessions as f64,
        }
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SetEntry;
    use chrono::Duration;
    use proptest::prelude::*;

    fn session(id: &str, date: NaiveDate, sets: Vec<SetEntry>) -> TrainingSession {
        TrainingSession {
            id: id.to_string(),
            date,
            exercise_id: "squat".to_string(),
            strength_focus: false,
            sets,
        }
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(29.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(30.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(69.9), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Critical);
    }

    #[test]
    fn test_critical_scenario() {
        let input = FatigueInput {
            weekly_volumes: vec![1000.0, 1000.0, 1000.0, 1600.0],
            recent_intensity: Some(9.0),
            average_intensity: None,
            sessions_per_week: 7.0,
        };

        let indicator = assess_overtraining_risk(&input);
        assert_eq!(indicator.score, 80.0);
        assert_eq!(indicator.level, RiskLevel::Critical);
        assert_eq!(indicator.factors.len(), 3);
        assert!(indicator.recommendation.contains("deload"));
    }

    #[test]
    fn test_all_signals_cap_at_100() {
        let input = FatigueInput {
            weekly_volumes: vec![1000.0, 2000.0],
            recent_intensity: Some(9.5),
            average_intensity: Some(7.0),
            sessions_per_week: 8.0,
        };

        let indicator = assess_overtraining_risk(&input);
        assert_eq!(indicator.score, 100.0);
        assert_eq!(indicator.factors.len(), 4);
    }

    #[test]
    fn test_moderate_signals() {
        let input = FatigueInput {
            weekly_volumes: vec![1000.0, 1300.0],
            recent_intensity: Some(8.0),
            average_intensity: Some(7.5),
            sessions_per_week: 5.5,
        };

        let indicator = assess_overtraining_risk(&input);
        assert_eq!(indicator.score, 40.0);
        assert_eq!(indicator.level, RiskLevel::Moderate);
    }

    #[test]
    fn test_single_volume_sample_skips_spike() {
        let input = FatigueInput {
            weekly_volumes: vec![5000.0],
            recent_intensity: Some(6.0),
            average_intensity: None,
            sessions_per_week: 3.0,
        };

        let indicator = assess_overtraining_risk(&input);
        assert_eq!(indicator.score, 0.0);
        assert_eq!(indicator.level, RiskLevel::Low);
        assert!(indicator.factors.is_empty());
        assert!(indicator.recommendation.contains("sustainable"));
    }

    #[test]
    fn test_zero_prior_volume_skips_spike() {
        assert_eq!(FatigueAnalyzer::volume_spike_ratio(&[0.0, 0.0, 800.0]), None);
        assert_eq!(FatigueAnalyzer::volume_spike_ratio(&[]), None);
        assert_eq!(FatigueAnalyzer::volume_spike_ratio(&[500.0, 750.0]), Some(1.5));
    }

    #[test]
    fn test_from_sessions() {
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        let day = |offset: i64| as_of - Duration::days(offset);

        let sessions = vec![
            session("old", day(30), vec![SetEntry::completed(100.0, 5)]),
            session("w1", day(15), vec![SetEntry::completed(100.0, 5).with_rpe(6.0)]),
            session("w2", day(9), vec![SetEntry::completed(100.0, 5).with_rpe(7.0)]),
            session("w3a", day(0), vec![SetEntry::completed(100.0, 8).with_intensity(9.0)]),
            session("w3b", day(3), vec![SetEntry::completed(100.0, 8).with_rpe(9.0)]),
            session("future", day(-1), vec![SetEntry::completed(500.0, 5)]),
        ];

        let input = FatigueInput::from_sessions(&sessions, as_of, 3);
        assert_eq!(input.weekly_volumes, vec![500.0, 500.0, 1600.0]);
        assert_eq!(input.sessions_per_week, 2.0);
        assert_eq!(input.recent_intensity, Some(9.0));
        assert_eq!(input.average_intensity, Some(7.75));
    }

    #[test]
    fn test_from_sessions_clamps_window() {
        let as_of = NaiveDate::from_ymd_opt(2024, 3, 28).unwrap();
        let sessions = vec![session("w1", as_of, vec![SetEntry::completed(100.0, 5)])];

        let input = FatigueInput::from_sessions(&sessions, as_of, usize::MAX);
        assert_eq!(input.weekly_volumes.len(), MAX_WINDOW_WEEKS);
        assert_eq!(input.weekly_volumes.last(), Some(&500.0));

        let input = FatigueInput::from_sessions(&sessions, as_of, 0);
        assert_eq!(input.weekly_volumes, vec![500.0]);
    }

    proptest! {
        #[test]
        fn test_score_bounds(
            volumes in proptest::collection::vec(0.0f64..10000.0, 0..8),
            recent in proptest::option::of(0.0f64..10.0),
            baseline in proptest::option::of(0.0f64..10.0),
            sessions in 0.0f64..14.0
        ) {
            let input = FatigueInput {
                weekly_volumes: volumes,
                recent_intensity: recent,
                average_intensity: baseline,
                sessions_per_week: sessions,
            };
            let indicator = assess_overtraining_risk(&input);
            prop_assert!(indicator.score >= 0.0 && indicator.score <= 100.0);
            prop_assert_eq!(indicator.level, RiskLevel::from_score(indicator.score));
        }
    }
}
