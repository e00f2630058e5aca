//! Type narrowing for strategy settings
//!
//! Maps every declared [`SettingType`] onto one of the primitive types the
//! command line can parse, and converts parsed values back into JSON for the
//! configuration layer.

use chrono::{DateTime, FixedOffset};
use clap::builder::ValueParser;
use clap::parser::MatchesError;
use clap::ArgMatches;
use krr_strategies::SettingType;
use serde_json::Value;
use std::fmt;

/// Primitive types representable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CliType {
    Integer,
    Float,
    String,
    Boolean,
    Timestamp,
    Uuid,
}

/// Narrow a declared type to a command-line primitive
///
/// Optional wrappers are stripped recursively and structured or unknown
/// types are accepted as plain text. Never fails.
///
/// ```rust
/// use krr_cli::type_narrowing::{narrow, CliType};
/// use krr_strategies::SettingType;
///
/// let nested = SettingType::optional(SettingType::optional(SettingType::Integer));
/// assert_eq!(narrow(&nested), CliType::Integer);
/// assert_eq!(narrow(&SettingType::Other("list[str]".into())), CliType::String);
/// ```
pub fn narrow(setting_type: &SettingType) -> CliType {
    match setting_type {
        SettingType::Integer => CliType::Integer,
        SettingType::Float => CliType::Float,
        SettingType::String => CliType::String,
        SettingType::Boolean => CliType::Boolean,
        SettingType::Timestamp => CliType::Timestamp,
        SettingType::Uuid => CliType::Uuid,
        SettingType::Optional(inner) => narrow(inner),
        SettingType::Other(_) => CliType::String,
    }
}

impl CliType {
    /// Placeholder shown in help output
    pub fn value_name(&self) -> &'static str {
        match self {
            CliType::Integer => "INTEGER",
            CliType::Float => "FLOAT",
            CliType::String => "TEXT",
            CliType::Boolean => "BOOLEAN",
            CliType::Timestamp => "TIMESTAMP",
            CliType::Uuid => "UUID",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CliType::Integer | CliType::Float)
    }

    /// Clap parser producing the Rust type read back by [`CliType::extract`]
    pub fn value_parser(&self) -> ValueParser {
        match self {
            CliType::Integer => clap::value_parser!(i64).into(),
            CliType::Float => ValueParser::new(parse_float),
            CliType::String => ValueParser::string(),
            CliType::Boolean => ValueParser::bool(),
            CliType::Timestamp => ValueParser::new(parse_timestamp),
            CliType::Uuid => ValueParser::new(parse_uuid),
        }
    }

    /// Read the value bound to `id` as JSON
    ///
    /// Returns `Ok(None)` when the option was neither given nor defaulted.
    pub fn extract(&self, matches: &ArgMatches, id: &str) -> Result<Option<Value>, MatchesError> {
        let value = match self {
            CliType::Integer => matches.try_get_one::<i64>(id)?.map(|v| Value::from(*v)),
            CliType::Float => matches.try_get_one::<f64>(id)?.map(|v| Value::from(*v)),
            CliType::String => matches.try_get_one::<String>(id)?.cloned().map(Value::String),
            CliType::Boolean => matches.try_get_one::<bool>(id)?.map(|v| Value::Bool(*v)),
            CliType::Timestamp => matches
                .try_get_one::<DateTime<FixedOffset>>(id)?
                .map(|v| Value::String(v.to_rfc3339())),
            CliType::Uuid => matches
                .try_get_one::<uuid::Uuid>(id)?
                .map(|v| Value::String(v.to_string())),
        };
        Ok(value)
    }
}

impl fmt::Display for CliType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value_name().to_lowercase())
    }
}

fn parse_float(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| format!("'{}' is not a number: {}", value, e))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("'{}' is not a finite number", value))
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value)
        .map_err(|e| format!("'{}' is not an RFC 3339 timestamp: {}", value, e))
}

fn parse_uuid(value: &str) -> Result<uuid::Uuid, String> {
    uuid::Uuid::parse_str(value).map_err(|e| format!("'{}' is not a UUID: {}", value, e))
}
