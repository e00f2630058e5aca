//! Strategy plugin interface

use crate::error::StrategyError;
use crate::settings::SettingField;
use indexmap::IndexMap;
use serde_json::Value;

/// A pluggable recommendation strategy, as seen by the command line
///
/// Implementations describe their settings as an ordered list of typed
/// fields. The CLI turns each field into a `--<name>` option and the
/// configuration layer validates the bound values against the same list.
///
/// # Example
///
/// ```rust
/// use indexmap::IndexMap;
/// use krr_strategies::{SettingField, SettingType, Strategy, StrategyError};
/// use serde_json::Value;
///
/// struct Peak;
///
/// impl Strategy for Peak {
///     fn name(&self) -> &str {
///         "peak"
///     }
///
///     fn settings_schema(&self) -> Result<Vec<SettingField>, StrategyError> {
///         Ok(vec![SettingField::new("window", SettingType::Integer).with_default(7)])
///     }
/// }
///
/// let schema = Peak.settings_schema().unwrap();
/// assert_eq!(schema[0].name, "window");
/// assert!(Peak.validate_settings(&IndexMap::<String, Value>::new()).is_ok());
/// ```
pub trait Strategy: Send + Sync {
    /// Unique strategy name, used as the subcommand name
    fn name(&self) -> &str;

    /// Human-readable description shown in the subcommand help
    fn description(&self) -> &str {
        ""
    }

    /// Ordered settings schema
    ///
    /// Field names must be unique within a strategy. An error here is a
    /// defect in the strategy and aborts command synthesis.
    fn settings_schema(&self) -> Result<Vec<SettingField>, StrategyError>;

    /// Cross-field checks that go beyond per-field type and bounds
    ///
    /// Called with every declared setting present, after the per-field
    /// checks have passed.
    fn validate_settings(&self, _settings: &IndexMap<String, Value>) -> Result<(), StrategyError> {
        Ok(())
    }
}
