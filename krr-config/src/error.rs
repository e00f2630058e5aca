//! Error types for the KRR configuration system

use krr_common::{ErrorSeverity, Severity};
use std::fmt;
use thiserror::Error;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// A single rejected configuration value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Configuration field or strategy setting name
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more option values failed validation
    #[error("Invalid configuration ({} error(s)):\n{}", .0.len(), format_field_errors(.0))]
    Invalid(Vec<FieldError>),

    /// Tool defaults could not be loaded
    #[error("Failed to load tool defaults, using built-in values: {source}")]
    Defaults {
        #[source]
        source: Box<figment::Error>,
    },
}

impl ConfigError {
    /// Field errors carried by an `Invalid` error, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            ConfigError::Invalid(errors) => errors,
            ConfigError::Defaults { .. } => &[],
        }
    }

    /// Whether a given field was rejected
    pub fn has_field(&self, field: &str) -> bool {
        self.field_errors().iter().any(|e| e.field == field)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        ConfigError::Defaults {
            source: Box::new(error),
        }
    }
}

impl Severity for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ConfigError::Invalid(_) => ErrorSeverity::Error,
            ConfigError::Defaults { .. } => ErrorSeverity::Warning,
        }
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
