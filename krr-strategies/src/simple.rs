//! Built-in strategy descriptors
//!
//! Both strategies derive recommendations from Prometheus usage history.
//! Only their settings surface lives here.

use crate::error::StrategyError;
use crate::settings::{SettingField, SettingType};
use crate::strategy::Strategy;
use indexmap::IndexMap;
use serde_json::Value;

/// Settings shared by every history-based strategy
fn history_settings() -> Vec<SettingField> {
    vec![
        SettingField::new("history_duration", SettingType::Float)
            .with_default(24.0 * 14.0)
            .with_description("The duration of the history data to use (in hours).")
            .with_minimum(1.0),
        SettingField::new("timeframe_duration", SettingType::Float)
            .with_default(1.25)
            .with_description("The step for the history data (in minutes).")
            .with_minimum(1.0),
    ]
}

fn memory_settings() -> Vec<SettingField> {
    vec![
        SettingField::new("memory_buffer_percentage", SettingType::Float)
            .with_default(15.0)
            .with_description(
                "The percentage of added buffer to the peak memory usage for memory recommendation.",
            )
            .with_minimum(0.0),
        SettingField::new("points_required", SettingType::Integer)
            .with_default(100)
            .with_description(
                "The number of data points required to make a recommendation for a resource.",
            )
            .with_minimum(1.0),
        SettingField::new("allow_hpa", SettingType::Boolean)
            .with_default(false)
            .with_description(
                "Whether to calculate recommendations even when there is an HPA scaler defined on that resource.",
            ),
        SettingField::new("use_oomkill_data", SettingType::Boolean)
            .with_default(false)
            .with_description(
                "Whether to bump the memory when OOMKills are detected (experimental).",
            ),
        SettingField::new("oom_memory_buffer_percentage", SettingType::Float)
            .with_default(25.0)
            .with_description(
                "What percentage to increase the memory when there are OOMKill events.",
            )
            .with_minimum(0.0),
    ]
}

fn percentile(name: &str, default: f64, description: &str) -> SettingField {
    SettingField::new(name, SettingType::Float)
        .with_default(default)
        .with_description(description)
        .with_minimum(0.0)
        .with_maximum(100.0)
}

/// CPU request at a usage percentile, no CPU limit, memory at peak plus a buffer
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleStrategy;

impl Strategy for SimpleStrategy {
    fn name(&self) -> &str {
        "simple"
    }

    fn description(&self) -> &str {
        "CPU request: percentile of usage (default 95%), limit: unset. \
         Memory request and limit: max usage plus a buffer (default 15%). \
         Workloads with an HPA are skipped unless --allow_hpa is set."
    }

    fn settings_schema(&self) -> Result<Vec<SettingField>, StrategyError> {
        let mut fields = history_settings();
        fields.push(percentile(
            "cpu_percentile",
            95.0,
            "The percentile to use for the CPU recommendation.",
        ));
        fields.extend(memory_settings());
        Ok(fields)
    }
}

/// Like [`SimpleStrategy`], but also recommends a CPU limit
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleLimitStrategy;

impl Strategy for SimpleLimitStrategy {
    fn name(&self) -> &str {
        "simple-limit"
    }

    fn description(&self) -> &str {
        "CPU request and limit: percentiles of usage (default 66% and 96%). \
         Memory request and limit: max usage plus a buffer (default 15%). \
         Workloads with an HPA are skipped unless --allow_hpa is set."
    }

    fn settings_schema(&self) -> Result<Vec<SettingField>, StrategyError> {
        let mut fields = history_settings();
        fields.push(percentile(
            "cpu_request",
            66.0,
            "The percentile to use for the CPU request.",
        ));
        fields.push(percentile(
            "cpu_limit",
            96.0,
            "The percentile to use for the CPU limit.",
        ));
        fields.extend(memory_settings());
        Ok(fields)
    }

    fn validate_settings(&self, settings: &IndexMap<String, Value>) -> Result<(), StrategyError> {
        let request = settings.get("cpu_request").and_then(Value::as_f64);
        let limit = settings.get("cpu_limit").and_then(Value::as_f64);
        if let (Some(request), Some(limit)) = (request, limit) {
            if request > limit {
                return Err(StrategyError::invalid_setting(
                    self.name(),
                    "cpu_request",
                    format!("must not exceed cpu_limit ({request} > {limit})"),
                ));
            }
        }
        Ok(())
    }
}
