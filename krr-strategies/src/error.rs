//! Error types for strategy descriptors

use krr_common::{ErrorSeverity, Severity};
use thiserror::Error;

/// Errors raised by a strategy descriptor
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    /// The settings schema could not be produced
    #[error("Settings schema for strategy '{strategy}' could not be read: {message}")]
    Schema { strategy: String, message: String },

    /// A settings value was rejected by the strategy
    #[error("Invalid setting '{setting}' for strategy '{strategy}': {message}")]
    InvalidSetting {
        strategy: String,
        setting: String,
        message: String,
    },
}

impl StrategyError {
    pub fn invalid_setting(
        strategy: impl Into<String>,
        setting: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        StrategyError::InvalidSetting {
            strategy: strategy.into(),
            setting: setting.into(),
            message: message.into(),
        }
    }
}

impl Severity for StrategyError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StrategyError::Schema { .. } => ErrorSeverity::Critical,
            StrategyError::InvalidSetting { .. } => ErrorSeverity::Error,
        }
    }
}
