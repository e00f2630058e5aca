//! Typed settings schema for strategies

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Declared type of a strategy setting
///
/// The first six variants are directly representable on the command line.
/// `Optional` wraps another type whose value may be absent, and `Other`
/// names any structured type (lists, maps, nested records) that the CLI
/// accepts as plain text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Integer,
    Float,
    String,
    Boolean,
    Timestamp,
    Uuid,
    Optional(Box<SettingType>),
    Other(std::string::String),
}

impl SettingType {
    /// Wrap a type as optional
    pub fn optional(inner: SettingType) -> Self {
        SettingType::Optional(Box::new(inner))
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingType::Integer => f.write_str("integer"),
            SettingType::Float => f.write_str("float"),
            SettingType::String => f.write_str("string"),
            SettingType::Boolean => f.write_str("boolean"),
            SettingType::Timestamp => f.write_str("timestamp"),
            SettingType::Uuid => f.write_str("uuid"),
            SettingType::Optional(inner) => write!(f, "optional {}", inner),
            SettingType::Other(name) => f.write_str(name),
        }
    }
}

/// One entry of a strategy's settings schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingField {
    /// Field name, used verbatim as the `--<name>` flag
    pub name: String,

    pub setting_type: SettingType,

    /// Default value, `None` when the setting has no default
    pub default: Option<Value>,

    pub description: Option<String>,

    /// Inclusive lower bound for numeric settings
    pub minimum: Option<f64>,

    /// Inclusive upper bound for numeric settings
    pub maximum: Option<f64>,
}

impl SettingField {
    pub fn new(name: impl Into<String>, setting_type: SettingType) -> Self {
        Self {
            name: name.into(),
            setting_type,
            default: None,
            description: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    /// Description text, empty when the schema provides none
    pub fn help_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
