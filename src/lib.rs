// Library interface for LiftRS modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod error;
pub mod estimation;
pub mod fatigue;
pub mod import;
pub mod logging;
pub mod models;
pub mod progression;
pub mod records;

// Re-export commonly used types for convenience
pub use models::*;
pub use estimation::{
    calculate_weight_for_reps, estimate_all, estimate_one_rm, estimate_one_rm_average,
    estimate_one_rm_brzycki, estimate_one_rm_epley, estimate_one_rm_lombardi, get_effective_load,
    get_recommended_increment, rep_max_table, OneRmEstimate, OneRmFormula,
};
pub use records::{
    apply_recommendation, create_one_rm_record, get_one_rm_trend, record_strength_focus_session,
    update_one_rm_record,
};
pub use progression::{
    analyze_one_rm_progression, ProgressionAnalyzer, ProgressionConfig, Recommendation,
    RecommendationAction,
};
pub use fatigue::{
    assess_overtraining_risk, FatigueAnalyzer, FatigueConfig, FatigueInput, OvertrainingIndicator,
    RiskLevel,
};
pub use config::AppConfig;
pub use error::{LiftRsError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
