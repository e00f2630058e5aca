//! Error types for command synthesis and invocation

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use krr_common::{ErrorSeverity, Severity};
use krr_config::ConfigError;
use krr_strategies::StrategyError;
use std::fmt;
use thiserror::Error;

/// Errors raised while generating strategy commands at startup
///
/// All of these are defects in a strategy descriptor, never user errors.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Failed to read settings schema for strategy '{strategy}': {source}")]
    Schema {
        strategy: String,
        #[source]
        source: StrategyError,
    },

    #[error("Option '--{flag}' of strategy '{strategy}' collides with global option '{global}'")]
    FlagCollision {
        strategy: String,
        flag: String,
        global: String,
    },

    #[error("Strategy '{strategy}' declares setting '{field}' more than once")]
    DuplicateField { strategy: String, field: String },

    #[error("Strategy name '{strategy}' is reserved for a built-in command")]
    ReservedName { strategy: String },
}

impl Severity for SynthesisError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// Errors raised while turning parsed arguments into a configuration
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("Failed to read value of '{id}': {message}")]
    Extraction { id: String, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl InvocationError {
    pub fn extraction(id: impl Into<String>, error: impl std::fmt::Display) -> Self {
        InvocationError::Extraction {
            id: id.into(),
            message: error.to_string(),
        }
    }
}

impl Severity for InvocationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InvocationError::Extraction { .. } => ErrorSeverity::Error,
            InvocationError::Config(e) => e.severity(),
        }
    }
}

/// Log `error` at the level its severity calls for
pub fn log_error<E: Severity + fmt::Display>(error: &E) {
    match error.severity() {
        ErrorSeverity::Warning => tracing::warn!("{}", error),
        ErrorSeverity::Error => tracing::error!("{}", error),
        ErrorSeverity::Critical => tracing::error!("{} ({})", error, ErrorSeverity::Critical),
    }
}

/// Process exit code for a run that ended with an error of `severity`
///
/// Invalid user input ends the run normally; only critical errors fail it.
pub fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Critical => EXIT_ERROR,
        ErrorSeverity::Warning | ErrorSeverity::Error => EXIT_SUCCESS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krr_config::FieldError;

    #[test]
    fn test_synthesis_errors_are_critical() {
        let err = SynthesisError::FlagCollision {
            strategy: "peak".into(),
            flag: "formatter".into(),
            global: "format".into(),
        };
        assert!(err.is_critical());
        assert_eq!(
            err.to_string(),
            "Option '--formatter' of strategy 'peak' collides with global option 'format'"
        );
    }

    #[test]
    fn test_invocation_error_takes_config_severity() {
        let err = InvocationError::from(ConfigError::Invalid(vec![FieldError::new(
            "cpu_min_value",
            "must be >= 0, got -5",
        )]));
        assert_eq!(err.severity(), ErrorSeverity::Error);
        assert!(err.to_string().contains("cpu_min_value"));
    }

    #[test]
    fn test_exit_code_by_severity() {
        assert_eq!(exit_code(ErrorSeverity::Warning), EXIT_SUCCESS);
        assert_eq!(exit_code(ErrorSeverity::Error), EXIT_SUCCESS);
        assert_eq!(exit_code(ErrorSeverity::Critical), EXIT_ERROR);
    }

    #[test]
    fn test_reserved_name_is_critical() {
        let err = SynthesisError::ReservedName {
            strategy: "version".into(),
        };
        assert_eq!(exit_code(err.severity()), EXIT_ERROR);
        assert_eq!(
            err.to_string(),
            "Strategy name 'version' is reserved for a built-in command"
        );
    }
}
