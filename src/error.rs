//! Error hierarchy for LiftRS
//!
//! The estimation, record, progression and fatigue modules are total and never
//! return errors. These types cover the fallible boundary around them:
//! configuration files, training log import and the command line.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for LiftRS operations
#[derive(Debug, Error)]
pub enum LiftRsError {
    /// Input rejected at the boundary
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Training log import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Training log import errors
#[derive(Debug, Error)]
pub enum ImportError {
    /// File not found at specified path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Unsupported format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Format-specific parsing error
    #[error("Parse error in {format}: {reason}")]
    ParseError { format: String, reason: String },

    /// Missing required column or field
    #[error("Missing required data: {field}")]
    MissingData { field: String },

    /// Invalid value in a row
    #[error("Invalid {field} in row {row}: {value}")]
    InvalidValue {
        row: usize,
        field: String,
        value: String,
    },
}

/// Result type alias for LiftRS operations
pub type Result<T> = std::result::Result<T, LiftRsError>;

impl LiftRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LiftRsError::Import(ImportError::FileNotFound { .. }) => ErrorSeverity::Warning,
            LiftRsError::Validation(_) => ErrorSeverity::Warning,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            LiftRsError::Import(ImportError::FileNotFound { path }) => {
                format!("Could not find training log: {}", path.display())
            }
            LiftRsError::Import(ImportError::UnsupportedFormat { format }) => {
                format!("Training logs must be CSV or JSON, got '{}'", format)
            }
            LiftRsError::Import(ImportError::InvalidValue { row, field, .. }) => {
                format!("Row {} of the training log has an invalid {}.", row, field)
            }
            LiftRsError::Validation(message) => message.clone(),
            LiftRsError::Configuration(message) => format!("Could not load config: {}", message),
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
        }
    }
}
