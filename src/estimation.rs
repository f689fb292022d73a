//! One-rep-max estimation formulas
//!
//! Converts a single (weight, reps) observation into an estimated one-rep max
//! using three classical regression formulas and their average, and provides
//! the inverse relation used to prescribe loads for future sets.
//!
//! All functions are total: degenerate input (zero or negative weight, zero
//! reps, NaN) yields `0.0` instead of an error, and every result is rounded
//! to the nearest [`ROUNDING_STEP_KG`].

use serde::{Deserialize, Serialize};

/// Precision of every value produced by this module
pub const ROUNDING_STEP_KG: f64 = 0.5;

/// Reps above which a set no longer participates in 1RM estimation
pub const MAX_ESTIMATION_REPS: u32 = 10;

/// Smallest load increment suggested for progression
pub const MIN_INCREMENT_KG: f64 = 2.5;

/// Plate step used when rounding increments and decrements
pub const PLATE_STEP_KG: f64 = 2.5;

/// Brzycki's denominator `37 - reps` reaches zero at 37 reps.
const MAX_BRZYCKI_REPS: u32 = 36;

/// Exponent of the Lombardi power law
const LOMBARDI_EXPONENT: f64 = 0.10;

/// Estimation formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OneRmFormula {
    Epley,
    Brzycki,
    Lombardi,
    Average,
}

impl OneRmFormula {
    pub fn all() -> &'static [OneRmFormula] {
        &[
            OneRmFormula::Epley,
            OneRmFormula::Brzycki,
            OneRmFormula::Lombardi,
            OneRmFormula::Average,
        ]
    }

    pub fn estimate(&self, weight: f64, reps: u32) -> f64 {
        match self {
            OneRmFormula::Epley => estimate_one_rm_epley(weight, reps),
            OneRmFormula::Brzycki => estimate_one_rm_brzycki(weight, reps),
            OneRmFormula::Lombardi => estimate_one_rm_lombardi(weight, reps),
            OneRmFormula::Average => estimate_one_rm_average(weight, reps),
        }
    }
}

impl std::fmt::Display for OneRmFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OneRmFormula::Epley => write!(f, "Epley"),
            OneRmFormula::Brzycki => write!(f, "Brzycki"),
            OneRmFormula::Lombardi => write!(f, "Lombardi"),
            OneRmFormula::Average => write!(f, "Average"),
        }
    }
}

/// Every formula's estimate for one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRmEstimate {
    pub epley: f64,
    pub brzycki: f64,
    pub lombardi: f64,
    pub average: f64,
}

/// Round to the module precision; non-finite values collapse to zero.
pub fn round_to_step(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value / ROUNDING_STEP_KG).round() * ROUNDING_STEP_KG
}

fn is_valid_observation(weight: f64, reps: u32) -> bool {
    weight.is_finite() && weight > 0.0 && reps > 0
}

fn epley_raw(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    weight * (1.0 + reps as f64 / 30.0)
}

fn brzycki_raw(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    let r = reps.min(MAX_BRZYCKI_REPS) as f64;
    weight * 36.0 / (37.0 - r)
}

fn lombardi_raw(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    weight * (reps as f64).powf(LOMBARDI_EXPONENT)
}

/// Epley: `weight × (1 + reps / 30)`
pub fn estimate_one_rm_epley(weight: f64, reps: u32) -> f64 {
    if !is_valid_observation(weight, reps) {
        return 0.0;
    }
    round_to_step(epley_raw(weight, reps))
}

/// Brzycki: `weight × 36 / (37 - reps)`
///
/// Reps are clamped to 36 so the denominator never reaches zero. Callers
/// normally filter to at most [`MAX_ESTIMATION_REPS`] anyway.
pub fn estimate_one_rm_brzycki(weight: f64, reps: u32) -> f64 {
    if !is_valid_observation(weight, reps) {
        return 0.0;
    }
    round_to_step(brzycki_raw(weight, reps))
}

/// Lombardi: `weight × reps^0.10`
pub fn estimate_one_rm_lombardi(weight: f64, reps: u32) -> f64 {
    if !is_valid_observation(weight, reps) {
        return 0.0;
    }
    round_to_step(lombardi_raw(weight, reps))
}

/// Mean of the three formulas, rounded once after averaging
pub fn estimate_one_rm_average(weight: f64, reps: u32) -> f64 {
    if !is_valid_observation(weight, reps) {
        return 0.0;
    }
    let sum = epley_raw(weight, reps) + brzycki_raw(weight, reps) + lombardi_raw(weight, reps);
    round_to_step(sum / 3.0)
}

/// All formulas for a single observation
pub fn estimate_all(weight: f64, reps: u32) -> OneRmEstimate {
    OneRmEstimate {
        epley: estimate_one_rm_epley(weight, reps),
        brzycki: estimate_one_rm_brzycki(weight, reps),
        lombardi: estimate_one_rm_lombardi(weight, reps),
        average: estimate_one_rm_average(weight, reps),
    }
}

/// Canonical estimate used by the rest of the engine
///
/// Equal to [`estimate_one_rm_average`]. Returns `0.0` for non-positive
/// weight or zero reps.
pub fn estimate_one_rm(weight: f64, reps: u32) -> f64 {
    estimate_one_rm_average(weight, reps)
}

/// Load actually resisted during a set
///
/// For bodyweight movements the athlete's bodyweight is added to the external
/// `weight` (which may be negative for assisted variations). Without a known
/// bodyweight the external weight is returned unchanged.
pub fn get_effective_load(weight: f64, is_bodyweight: bool, athlete_weight_kg: Option<f64>) -> f64 {
    if !is_bodyweight {
        return weight;
    }
    match athlete_weight_kg.filter(|bw| bw.is_finite() && *bw > 0.0) {
        Some(bodyweight) => (bodyweight + weight).max(0.0),
        None => weight,
    }
}

/// Weight expected to produce `target_reps` at `intensity_percent` of max
///
/// Inverse of the Epley relation. Zero reps are treated as a single rep and
/// the result is never negative.
pub fn calculate_weight_for_reps(one_rm: f64, target_reps: u32, intensity_percent: f64) -> f64 {
    if !one_rm.is_finite() || one_rm <= 0.0 {
        return 0.0;
    }
    if !intensity_percent.is_finite() || intensity_percent <= 0.0 {
        return 0.0;
    }

    let reps = target_reps.max(1);
    let working_max = one_rm * intensity_percent / 100.0;
    let weight = if reps == 1 {
        working_max
    } else {
        working_max / (1.0 + reps as f64 / 30.0)
    };

    round_to_step(weight.max(0.0))
}

/// Next progression step for a lifter at `current_one_rm`
///
/// 2.5% of the current max rounded to the plate step, never below
/// [`MIN_INCREMENT_KG`].
pub fn get_recommended_increment(current_one_rm: f64) -> f64 {
    if !current_one_rm.is_finite() || current_one_rm <= 0.0 {
        return MIN_INCREMENT_KG;
    }
    let stepped = (current_one_rm * 0.025 / PLATE_STEP_KG).round() * PLATE_STEP_KG;
    stepped.max(MIN_INCREMENT_KG)
}

/// Predicted rep maxes for 1..=`max_reps` at full intensity
pub fn rep_max_table(one_rm: f64, max_reps: u32) -> Vec<(u32, f64)> {
    (1..=max_reps)
        .map(|reps| (reps, calculate_weight_for_reps(one_rm, reps, 100.0)))
        .collect()
}
