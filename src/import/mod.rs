use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ImportError, Result};
use crate::models::{Athlete, Exercise, TrainingSession};

pub mod csv;
pub mod json;

/// Trait for importing training logs from different file formats
pub trait ImportFormat {
    /// Check if this importer can handle the given file
    fn can_import(&self, file_path: &Path) -> bool;

    /// Import a training log from the file
    fn import_file(&self, file_path: &Path) -> Result<TrainingLog>;

    /// Get the format name for this importer
    fn get_format_name(&self) -> &'static str;
}

/// Everything the engine needs about one athlete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    pub athlete: Athlete,

    #[serde(default)]
    pub exercises: Vec<Exercise>,

    #[serde(default)]
    pub sessions: Vec<TrainingSession>,
}

impl TrainingLog {
    /// Exercise metadata by ID
    pub fn exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    /// Sessions for one exercise, oldest first
    pub fn sessions_for(&self, exercise_id: &str) -> Vec<&TrainingSession> {
        let mut sessions: Vec<&TrainingSession> = self
            .sessions
            .iter()
            .filter(|s| s.exercise_id == exercise_id)
            .collect();
        sessions.sort_by_key(|s| s.date);
        sessions
    }
}

/// Manager for coordinating different import formats
pub struct ImportManager {
    importers: Vec<Box<dyn ImportFormat>>,
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportManager {
    /// Create a new import manager with all available importers
    pub fn new() -> Self {
        let importers: Vec<Box<dyn ImportFormat>> = vec![
            Box::new(csv::CsvSetImporter::new()),
            Box::new(json::JsonLogImporter),
        ];

        Self { importers }
    }

    /// Import a single file, auto-detecting the format
    pub fn import_file(&self, file_path: &Path) -> Result<TrainingLog> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound {
                path: file_path.to_path_buf(),
            }
            .into());
        }

        for importer in &self.importers {
            if importer.can_import(file_path) {
                tracing::info!(
                    file = %file_path.display(),
                    format = importer.get_format_name(),
                    "Importing training log"
                );
                return importer.import_file(file_path);
            }
        }

        let format = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("unknown")
            .to_string();
        Err(ImportError::UnsupportedFormat { format }.into())
    }
}

/// Import a training log, auto-detecting the format from the extension
pub fn load_training_log(file_path: &Path) -> Result<TrainingLog> {
    ImportManager::new().import_file(file_path)
}

pub(crate) fn has_extension(file_path: &Path, extension: &str) -> bool {
    file_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}
