use std::fs;
use std::path::Path;

use crate::error::{ImportError, Result};
use crate::import::{has_extension, ImportFormat, TrainingLog};

/// Importer for JSON training logs (`{ athlete, exercises, sessions }`)
pub struct JsonLogImporter;

impl JsonLogImporter {
    pub fn parse_str(content: &str) -> Result<TrainingLog> {
        serde_json::from_str(content).map_err(|e| {
            ImportError::ParseError {
                format: "JSON".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl ImportFormat for JsonLogImporter {
    fn can_import(&self, file_path: &Path) -> bool {
        has_extension(file_path, "json")
    }

    fn import_file(&self, file_path: &Path) -> Result<TrainingLog> {
        let content = fs::read_to_string(file_path)?;
        Self::parse_str(&content)
    }

    fn get_format_name(&self) -> &'static str {
        "JSON"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LiftRsError;

    #[test]
    fn test_parse_log() {
        let json = r#"{
            "athlete": {
                "id": "a1",
                "name": "Alex",
                "current_weight_kg": 78.5,
                "one_rm_records": {
                    "bench": {
                        "exercise_id": "bench",
                        "current_one_rm": 100.0,
                        "source": "manual",
                        "last_update": "2024-01-01T00:00:00Z",
                        "strength_focus_sessions": 2,
                        "history": [
                            {"date": "2024-01-01T00:00:00Z", "value": 100.0, "source": "manual"}
                        ]
                    }
                }
            },
            "exercises": [{"id": "dip", "name": "Dip", "is_bodyweight": true}],
            "sessions": [{
                "id": "s1",
                "date": "2024-01-08",
                "exercise_id": "bench",
                "strength_focus": true,
                "sets": [{"actual_weight": 100.0, "actual_reps": 3, "is_completed": true, "rpe": 8.5}]
            }]
        }"#;

        let log = JsonLogImporter::parse_str(json).unwrap();
        assert_eq!(log.athlete.current_weight_kg, Some(78.5));
        assert_eq!(
            log.athlete.one_rm_record("bench").and_then(|r| r.current_one_rm),
            Some(100.0)
        );
        assert!(log.exercise("dip").map(|e| e.is_bodyweight).unwrap_or(false));
        assert_eq!(log.sessions_for("bench").len(), 1);
        assert_eq!(log.sessions[0].sets[0].effective_intensity(), Some(8.5));
    }

    #[test]
    fn test_parse_error() {
        let err = JsonLogImporter::parse_str("{ not json").unwrap_err();
        assert!(matches!(err, LiftRsError::Import(ImportError::ParseError { .. })));
    }
}
