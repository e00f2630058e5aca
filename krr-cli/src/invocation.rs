//! Per-strategy invocation handlers
//!
//! Every generated command owns one [`InvocationHandler`], created by
//! [`InvocationHandler::for_strategy`]. The handler carries its own copy of
//! the strategy name and schema, so handlers never share state.

use crate::dispatcher::{Dispatcher, RunOutcome, Runner};
use crate::error::{log_error, InvocationError};
use crate::options::ids;
use crate::type_narrowing::narrow;
use clap::ArgMatches;
use indexmap::IndexMap;
use krr_common::{Pretty, Severity};
use krr_config::{Config, RawOptions};
use krr_strategies::{SettingField, Strategy};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Builds and runs the configuration for one strategy command
#[derive(Clone)]
pub struct InvocationHandler {
    strategy_name: String,
    strategy: Arc<dyn Strategy>,
    schema: Vec<SettingField>,
}

impl std::fmt::Debug for InvocationHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvocationHandler")
            .field("strategy_name", &self.strategy_name)
            .field("settings", &self.schema.len())
            .finish()
    }
}

impl InvocationHandler {
    /// Create the handler bound to `name`
    pub fn for_strategy(
        name: impl Into<String>,
        strategy: Arc<dyn Strategy>,
        schema: Vec<SettingField>,
    ) -> Self {
        Self {
            strategy_name: name.into(),
            strategy,
            schema,
        }
    }

    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    pub fn schema(&self) -> &[SettingField] {
        &self.schema
    }

    /// Extract every bound value and build the validated configuration
    pub fn build_config(&self, matches: &ArgMatches) -> Result<Config, InvocationError> {
        let mut raw = self.raw_options(matches)?;
        raw.other_args = self.strategy_values(matches)?;
        Ok(Config::build(raw, self.strategy.as_ref(), &self.schema)?)
    }

    /// Build the configuration and hand it to `runner`
    ///
    /// A configuration that fails validation is logged and the runner is not
    /// called.
    pub fn run(
        &self,
        matches: &ArgMatches,
        dispatcher: &Dispatcher,
        runner: &dyn Runner,
    ) -> RunOutcome {
        let config = match self.build_config(matches) {
            Ok(config) => config,
            Err(e) => {
                log_error(&e);
                return RunOutcome::Invalid(e.severity());
            }
        };

        debug!("Resolved configuration: {}", Pretty(&config));
        dispatcher.run(Arc::new(config), runner)
    }

    fn raw_options(&self, m: &ArgMatches) -> Result<RawOptions, InvocationError> {
        let defaults = RawOptions::for_strategy(self.strategy_name.as_str());

        Ok(RawOptions {
            kubeconfig: text(m, ids::KUBECONFIG)?,
            clusters: list(m, ids::CLUSTERS)?,
            all_clusters: flag(m, ids::ALL_CLUSTERS)?,
            namespaces: list(m, ids::NAMESPACES)?,
            resources: list(m, ids::RESOURCES)?,
            selector: text(m, ids::SELECTOR)?,
            prometheus_url: text(m, ids::PROMETHEUS_URL)?,
            prometheus_auth_header: text(m, ids::PROMETHEUS_AUTH_HEADER)?,
            prometheus_other_headers: list(m, ids::PROMETHEUS_OTHER_HEADERS)?,
            prometheus_ssl_enabled: flag(m, ids::PROMETHEUS_SSL_ENABLED)?,
            prometheus_cluster_label: text(m, ids::PROMETHEUS_CLUSTER_LABEL)?,
            prometheus_label: text(m, ids::PROMETHEUS_LABEL)?,
            eks_managed_prom: flag(m, ids::EKS_MANAGED_PROM)?,
            eks_managed_prom_profile_name: text(m, ids::EKS_MANAGED_PROM_PROFILE_NAME)?,
            eks_access_key: text(m, ids::EKS_ACCESS_KEY)?,
            eks_secret_key: text(m, ids::EKS_SECRET_KEY)?,
            eks_service_name: text(m, ids::EKS_SERVICE_NAME)?,
            eks_managed_prom_region: text(m, ids::EKS_MANAGED_PROM_REGION)?,
            coralogix_token: text(m, ids::CORALOGIX_TOKEN)?,
            openshift: flag(m, ids::OPENSHIFT)?,
            cpu_min_value: integer(m, ids::CPU_MIN_VALUE)?.unwrap_or(defaults.cpu_min_value),
            memory_min_value: integer(m, ids::MEMORY_MIN_VALUE)?
                .unwrap_or(defaults.memory_min_value),
            max_workers: integer(m, ids::MAX_WORKERS)?.unwrap_or(defaults.max_workers),
            format: text(m, ids::FORMAT)?.unwrap_or(defaults.format),
            show_cluster_name: flag(m, ids::SHOW_CLUSTER_NAME)?,
            verbose: flag(m, ids::VERBOSE)?,
            quiet: flag(m, ids::QUIET)?,
            log_to_stderr: flag(m, ids::LOG_TO_STDERR)?,
            width: integer(m, ids::WIDTH)?,
            file_output: text(m, ids::FILE_OUTPUT)?,
            slack_output: text(m, ids::SLACK_OUTPUT)?,
            strategy: defaults.strategy,
            other_args: IndexMap::new(),
        })
    }

    /// Strategy values keyed by field name, `null` when unset without a default
    fn strategy_values(&self, m: &ArgMatches) -> Result<IndexMap<String, Value>, InvocationError> {
        let mut values = IndexMap::with_capacity(self.schema.len());
        for field in &self.schema {
            let value = narrow(&field.setting_type)
                .extract(m, &field.name)
                .map_err(|e| InvocationError::extraction(field.name.as_str(), e))?;
            values.insert(field.name.clone(), value.unwrap_or(Value::Null));
        }
        Ok(values)
    }
}

fn flag(m: &ArgMatches, id: &str) -> Result<bool, InvocationError> {
    m.try_get_one::<bool>(id)
        .map(|v| v.copied().unwrap_or(false))
        .map_err(|e| InvocationError::extraction(id, e))
}

fn text(m: &ArgMatches, id: &str) -> Result<Option<String>, InvocationError> {
    m.try_get_one::<String>(id)
        .map(|v| v.cloned())
        .map_err(|e| InvocationError::extraction(id, e))
}

fn integer(m: &ArgMatches, id: &str) -> Result<Option<i64>, InvocationError> {
    m.try_get_one::<i64>(id)
        .map(|v| v.copied())
        .map_err(|e| InvocationError::extraction(id, e))
}

fn list(m: &ArgMatches, id: &str) -> Result<Vec<String>, InvocationError> {
    m.try_get_many::<String>(id)
        .map(|values| values.map(|v| v.cloned().collect()).unwrap_or_default())
        .map_err(|e| InvocationError::extraction(id, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{global_options, strategy_options};
    use krr_config::ToolDefaults;
    use krr_strategies::SimpleLimitStrategy;
    use serde_json::json;

    fn handler_and_command() -> (InvocationHandler, clap::Command) {
        let strategy: Arc<dyn Strategy> = Arc::new(SimpleLimitStrategy);
        let schema = strategy.settings_schema().unwrap();
        let mut command = clap::Command::new("simple-limit");
        for option in global_options(&ToolDefaults::default())
            .iter()
            .chain(strategy_options(&schema).iter())
        {
            command = command.arg(option.to_arg());
        }
        (
            InvocationHandler::for_strategy("simple-limit", strategy, schema),
            command,
        )
    }

    #[test]
    fn test_build_config_uses_own_strategy_name() {
        let (handler, command) = handler_and_command();
        let matches = command
            .try_get_matches_from(["simple-limit", "--cpu_limit", "99", "-w", "4"])
            .unwrap();

        let config = handler.build_config(&matches).unwrap();
        assert_eq!(config.strategy(), "simple-limit");
        assert_eq!(config.max_workers(), 4);
        assert_eq!(config.other_args()["cpu_limit"], json!(99.0));
        assert_eq!(config.other_args()["cpu_request"], json!(66.0));
    }

    #[test]
    fn test_build_config_reports_config_errors() {
        let (handler, command) = handler_and_command();
        let matches = command
            .try_get_matches_from(["simple-limit", "--width", "0"])
            .unwrap();

        match handler.build_config(&matches) {
            Err(InvocationError::Config(e)) => assert!(e.has_field("width")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
