//! Validation of strategy-specific settings
//!
//! Values arrive keyed by field name. Each declared field is checked against
//! its [`SettingType`] and numeric bounds, unknown keys are rejected, and the
//! strategy's own hook runs last, only when every per-field check passed.

use crate::error::FieldError;
use indexmap::IndexMap;
use krr_strategies::{SettingField, SettingType, Strategy, StrategyError};
use serde_json::Value;

/// Put `values` in schema order, filling unset fields with their default or `null`
///
/// Keys not declared by the schema are kept at the end so validation can
/// report them.
pub fn complete_settings(
    schema: &[SettingField],
    mut values: IndexMap<String, Value>,
) -> IndexMap<String, Value> {
    let mut ordered = IndexMap::with_capacity(values.len().max(schema.len()));
    for field in schema {
        let value = values
            .shift_remove(&field.name)
            .unwrap_or_else(|| field.default.clone().unwrap_or(Value::Null));
        ordered.insert(field.name.clone(), value);
    }
    ordered.extend(values);
    ordered
}

/// Check `values` against `schema` and the strategy's own rules
///
/// Returns every violation found; an empty list means the settings are valid.
pub fn validate_strategy_settings(
    strategy: &dyn Strategy,
    schema: &[SettingField],
    values: &IndexMap<String, Value>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for key in values.keys() {
        if !schema.iter().any(|field| &field.name == key) {
            errors.push(FieldError::new(
                key.as_str(),
                format!("not a setting of strategy '{}'", strategy.name()),
            ));
        }
    }

    for field in schema {
        let value = values.get(&field.name).unwrap_or(&Value::Null);
        if let Err(message) = check_field(field, value) {
            errors.push(FieldError::new(field.name.as_str(), message));
        }
    }

    if errors.is_empty() {
        if let Err(e) = strategy.validate_settings(values) {
            errors.push(strategy_error_to_field(strategy.name(), e));
        }
    }

    errors
}

fn strategy_error_to_field(strategy: &str, error: StrategyError) -> FieldError {
    match error {
        StrategyError::InvalidSetting {
            setting, message, ..
        } => FieldError::new(setting, message),
        StrategyError::Schema { message, .. } => FieldError::new(strategy, message),
    }
}

fn check_field(field: &SettingField, value: &Value) -> Result<(), String> {
    // Unset fields without a default are reported as null by the command line
    if value.is_null() && field.default.is_none() {
        return Ok(());
    }
    check_type(&field.setting_type, value)?;
    check_bounds(field, value)
}

fn check_type(setting_type: &SettingType, value: &Value) -> Result<(), String> {
    let ok = match setting_type {
        SettingType::Optional(inner) => value.is_null() || check_type(inner, value).is_ok(),
        SettingType::Integer => value.is_i64() || value.is_u64(),
        SettingType::Float => value.is_number(),
        SettingType::String => value.is_string(),
        SettingType::Boolean => value.is_boolean(),
        SettingType::Timestamp => value
            .as_str()
            .is_some_and(|s| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
        SettingType::Uuid => value
            .as_str()
            .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok()),
        SettingType::Other(_) => true,
    };

    if ok {
        Ok(())
    } else {
        Err(format!("expected {}, got {}", setting_type, value))
    }
}

fn check_bounds(field: &SettingField, value: &Value) -> Result<(), String> {
    let Some(number) = value.as_f64() else {
        return Ok(());
    };
    if let Some(min) = field.minimum {
        if number < min {
            return Err(format!("must be >= {}, got {}", min, number));
        }
    }
    if let Some(max) = field.maximum {
        if number > max {
            return Err(format!("must be <= {}, got {}", max, number));
        }
    }
    Ok(())
}
