use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::import::{has_extension, ImportFormat, TrainingLog};
use crate::models::{Athlete, SetEntry, TrainingSession};

/// CSV importer for set-per-row training logs with flexible column names
///
/// Required columns: `date`, `exercise_id`, `weight`, `reps`. Rows sharing a
/// session ID (or, without one, a date and exercise) form one session.
pub struct CsvSetImporter {
    column_mapping: HashMap<String, String>,
}

impl Default for CsvSetImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvSetImporter {
    pub fn new() -> Self {
        let mut column_mapping = HashMap::new();

        Self::add_mapping(&mut column_mapping, "date", &["date", "day", "session_date"]);
        Self::add_mapping(&mut column_mapping, "session_id", &["session_id", "session", "workout_id"]);
        Self::add_mapping(
            &mut column_mapping,
            "exercise_id",
            &["exercise_id", "exercise", "lift", "movement"],
        );
        Self::add_mapping(
            &mut column_mapping,
            "weight",
            &["weight", "actual_weight", "load", "weight_kg", "kg"],
        );
        Self::add_mapping(&mut column_mapping, "reps", &["reps", "actual_reps", "repetitions"]);
        Self::add_mapping(&mut column_mapping, "target_weight", &["target_weight", "planned_weight"]);
        Self::add_mapping(&mut column_mapping, "target_reps", &["target_reps", "planned_reps"]);
        Self::add_mapping(&mut column_mapping, "completed", &["completed", "is_completed", "done"]);
        Self::add_mapping(&mut column_mapping, "rpe", &["rpe"]);
        Self::add_mapping(&mut column_mapping, "intensity", &["intensity", "effort"]);
        Self::add_mapping(
            &mut column_mapping,
            "strength_focus",
            &["strength_focus", "focus", "is_strength_focus"],
        );

        Self { column_mapping }
    }

    fn add_mapping(mapping: &mut HashMap<String, String>, standard: &str, variations: &[&str]) {
        for variation in variations {
            mapping.insert(variation.to_lowercase(), standard.to_string());
        }
    }

    fn normalize_column_name(&self, name: &str) -> String {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");

        self.column_mapping
            .get(&normalized)
            .cloned()
            .unwrap_or(normalized)
    }

    fn parse_date(value: &str, row: usize) -> Result<NaiveDate> {
        let formats = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
        for format in &formats {
            if let Ok(date) = NaiveDate::parse_from_str(value.trim(), format) {
                return Ok(date);
            }
        }
        Err(invalid(row, "date", value))
    }

    fn parse_optional_f64(value: Option<&str>, row: usize, field: &str) -> Result<Option<f64>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => v
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some)
                .ok_or_else(|| invalid(row, field, v)),
        }
    }

    fn parse_optional_u32(value: Option<&str>, row: usize, field: &str) -> Result<Option<u32>> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(v) => v
                .parse::<u32>()
                .map(Some)
                .map_err(|_| invalid(row, field, v)),
        }
    }

    fn parse_bool(value: Option<&str>, default: bool, row: usize, field: &str) -> Result<bool> {
        match value.map(|v| v.trim().to_lowercase()).filter(|v| !v.is_empty()) {
            None => Ok(default),
            Some(v) => match v.as_str() {
                "true" | "yes" | "y" | "1" | "x" => Ok(true),
                "false" | "no" | "n" | "0" => Ok(false),
                _ => Err(invalid(row, field, &v)),
            },
        }
    }

    /// Parse CSV content from any reader
    pub fn import_reader<R: Read>(&self, reader: R) -> Result<TrainingLog> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let columns: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (self.normalize_column_name(name), i))
            .collect();

        for required in ["date", "exercise_id", "weight", "reps"] {
            if !columns.contains_key(required) {
                return Err(ImportError::MissingData {
                    field: required.to_string(),
                }
                .into());
            }
        }

        let mut sessions: Vec<TrainingSession> = Vec::new();
        let mut session_index: HashMap<(String, String), usize> = HashMap::new();

        for (i, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            // Header is line 1
            let row = i + 2;
            let field = |name: &str| column_value(&record, &columns, name);

            let date = Self::parse_date(field("date").unwrap_or_default(), row)?;
            let exercise_id = field("exercise_id")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| invalid(row, "exercise_id", ""))?
                .to_string();

            let set = SetEntry {
                actual_weight: Self::parse_optional_f64(field("weight"), row, "weight")?,
                target_weight: Self::parse_optional_f64(field("target_weight"), row, "target_weight")?,
                actual_reps: Self::parse_optional_u32(field("reps"), row, "reps")?,
                target_reps: Self::parse_optional_u32(field("target_reps"), row, "target_reps")?,
                is_completed: Self::parse_bool(field("completed"), true, row, "completed")?,
                rpe: Self::parse_optional_f64(field("rpe"), row, "rpe")?,
                intensity: Self::parse_optional_f64(field("intensity"), row, "intensity")?,
            };
            let strength_focus = Self::parse_bool(field("strength_focus"), false, row, "strength_focus")?;

            let session_id = field("session_id")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}-{}", date, exercise_id));

            let key = (session_id.clone(), exercise_id.clone());
            let index = match session_index.get(&key) {
                Some(index) => *index,
                None => {
                    sessions.push(TrainingSession {
                        id: session_id,
                        date,
                        exercise_id,
                        strength_focus: false,
                        sets: Vec::new(),
                    });
                    session_index.insert(key, sessions.len() - 1);
                    sessions.len() - 1
                }
            };

            let session = &mut sessions[index];
            session.strength_focus |= strength_focus;
            session.sets.push(set);
        }

        tracing::debug!(sessions = sessions.len(), "Parsed CSV training log");

        Ok(TrainingLog {
            athlete: Athlete::new("imported", "Imported athlete"),
            exercises: Vec::new(),
            sessions,
        })
    }
}

fn column_value<'a>(
    record: &'a StringRecord,
    columns: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    columns.get(name).and_then(|i| record.get(*i))
}

fn invalid(row: usize, field: &str, value: &str) -> crate::error::LiftRsError {
    ImportError::InvalidValue {
        row,
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

fn csv_error(err: csv::Error) -> crate::error::LiftRsError {
    ImportError::ParseError {
        format: "CSV".to_string(),
        reason: err.to_string(),
    }
    .into()
}

impl ImportFormat for CsvSetImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "csv")
    }

    fn import_file(&self, file_path: &Path) -> Result<TrainingLog> {
        let file = std::fs::File::open(file_path)?;
        self.import_reader(file)
    }

    fn get_format_name(&self) -> &'static str {
        "CSV"
    }
}
