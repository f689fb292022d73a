//! One-rep-max record management
//!
//! Records are values: every operation here returns a new [`OneRmRecord`] and
//! leaves its input untouched, so callers can detect changes by comparison and
//! decide for themselves whether to persist.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::{OneRmHistoryEntry, OneRmRecord, OneRmSource};
use crate::progression::{Recommendation, RecommendationAction};

fn sanitize_value(exercise_id: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(exercise_id, value, "Invalid 1RM value replaced with 0");
        0.0
    }
}

/// Create a record with a single history entry, timestamped now
pub fn create_one_rm_record(
    exercise_id: &str,
    value: f64,
    source: OneRmSource,
    session_id: Option<&str>,
) -> OneRmRecord {
    create_one_rm_record_at(exercise_id, value, source, session_id, Utc::now())
}

/// Create a record with a single history entry at `now`
pub fn create_one_rm_record_at(
    exercise_id: &str,
    value: f64,
    source: OneRmSource,
    session_id: Option<&str>,
    now: DateTime<Utc>,
) -> OneRmRecord {
    let value = sanitize_value(exercise_id, value);

    OneRmRecord {
        exercise_id: exercise_id.to_string(),
        current_one_rm: Some(value),
        source,
        last_update: now,
        strength_focus_sessions: 0,
        history: vec![OneRmHistoryEntry {
            date: now,
            value,
            source,
            session_id: session_id.map(str::to_string),
        }],
    }
}

/// Append a new value to a record, timestamped now
pub fn update_one_rm_record(
    record: &OneRmRecord,
    value: f64,
    source: OneRmSource,
    session_id: Option<&str>,
) -> OneRmRecord {
    update_one_rm_record_at(record, value, source, session_id, Utc::now())
}

/// Append a new value to a record at `now`
///
/// The returned record carries exactly one more history entry than `record`,
/// and its `current_one_rm` equals the appended value.
pub fn update_one_rm_record_at(
    record: &OneRmRecord,
    value: f64,
    source: OneRmSource,
    session_id: Option<&str>,
    now: DateTime<Utc>,
) -> OneRmRecord {
    let value = sanitize_value(&record.exercise_id, value);

    let mut history = Vec::with_capacity(record.history.len() + 1);
    history.extend(record.history.iter().cloned());
    history.push(OneRmHistoryEntry {
        date: now,
        value,
        source,
        session_id: session_id.map(str::to_string),
    });

    debug!(
        exercise_id = %record.exercise_id,
        previous = ?record.current_one_rm,
        value,
        %source,
        "1RM record updated"
    );

    OneRmRecord {
        exercise_id: record.exercise_id.clone(),
        current_one_rm: Some(value),
        source,
        last_update: now,
        strength_focus_sessions: record.strength_focus_sessions,
        history,
    }
}

/// Percentage change from the first to the last history value
///
/// Zero when fewer than two entries exist or the first value is not positive.
pub fn get_one_rm_trend(record: &OneRmRecord) -> f64 {
    if record.history.len() < 2 {
        return 0.0;
    }

    let (first, last) = match (record.history.first(), record.history.last()) {
        (Some(first), Some(last)) => (first.value, last.value),
        _ => return 0.0,
    };

    if first <= 0.0 {
        return 0.0;
    }

    (last - first) / first * 100.0
}

/// Count one more strength-focus session for the record's exercise
pub fn record_strength_focus_session(record: &OneRmRecord) -> OneRmRecord {
    OneRmRecord {
        strength_focus_sessions: record.strength_focus_sessions.saturating_add(1),
        ..record.clone()
    }
}

/// Apply a confirmed recommendation, timestamped now
pub fn apply_recommendation(
    existing: Option<&OneRmRecord>,
    recommendation: &Recommendation,
) -> Option<OneRmRecord> {
    apply_recommendation_at(existing, recommendation, Utc::now())
}

/// Apply a confirmed recommendation at `now`
///
/// This is the only path from a recommendation to a record and must be
/// driven by an explicit user confirmation. Returns `None` when there is
/// nothing to apply: a zero-confidence "no data" result, a non-positive
/// suggestion, a `keep` that would not change an existing value, or a
/// relative change with no usable current value to change.
///
/// A record holding no positive value counts as missing, so `set_initial`
/// always lands as an `estimated` entry.
pub fn apply_recommendation_at(
    existing: Option<&OneRmRecord>,
    recommendation: &Recommendation,
    now: DateTime<Utc>,
) -> Option<OneRmRecord> {
    if recommendation.confidence <= 0.0 || recommendation.suggested_one_rm <= 0.0 {
        return None;
    }

    let usable = existing.filter(|record| record.current_one_rm.map_or(false, |value| value > 0.0));

    match (recommendation.action, usable) {
        (RecommendationAction::SetInitial, _) => Some(match existing {
            None => create_one_rm_record_at(
                &recommendation.exercise_id,
                recommendation.suggested_one_rm,
                OneRmSource::Estimated,
                None,
                now,
            ),
            Some(record) => update_one_rm_record_at(
                record,
                recommendation.suggested_one_rm,
                OneRmSource::Estimated,
                None,
                now,
            ),
        }),
        (_, None) => {
            debug!(
                exercise_id = %recommendation.exercise_id,
                action = %recommendation.action,
                "No current 1RM to adjust"
            );
            None
        }
        (RecommendationAction::Keep, Some(record))
            if record.current_one_rm == Some(recommendation.suggested_one_rm) =>
        {
            None
        }
        (_, Some(record)) => Some(update_one_rm_record_at(
            record,
            recommendation.suggested_one_rm,
            OneRmSource::AiSuggested,
            None,
            now,
        )),
    }
}
