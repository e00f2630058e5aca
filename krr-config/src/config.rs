//! The validated run configuration
//!
//! [`RawOptions`] is what the command line binds. [`Config::build`] normalizes
//! it and checks every rule, collecting all violations before returning, so a
//! `Config` either exists in full or not at all.

use crate::error::{ConfigError, ConfigResult, FieldError};
use crate::formatters;
use crate::selection::{ClusterSelector, ResourceKind, Selection, WILDCARD};
use crate::settings::{complete_settings, validate_strategy_settings};
use indexmap::{IndexMap, IndexSet};
use krr_strategies::{SettingField, Strategy};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Default AWS service name for managed Prometheus
pub const DEFAULT_EKS_SERVICE_NAME: &str = "aps";

/// Option values as bound from the command line, before validation
#[derive(Debug, Clone, PartialEq)]
pub struct RawOptions {
    pub strategy: String,

    pub kubeconfig: Option<String>,
    pub clusters: Vec<String>,
    pub all_clusters: bool,
    pub namespaces: Vec<String>,
    pub resources: Vec<String>,
    pub selector: Option<String>,

    pub prometheus_url: Option<String>,
    pub prometheus_auth_header: Option<String>,
    pub prometheus_other_headers: Vec<String>,
    pub prometheus_ssl_enabled: bool,
    pub prometheus_cluster_label: Option<String>,
    pub prometheus_label: Option<String>,

    pub eks_managed_prom: bool,
    pub eks_managed_prom_profile_name: Option<String>,
    pub eks_access_key: Option<String>,
    pub eks_secret_key: Option<String>,
    pub eks_service_name: Option<String>,
    pub eks_managed_prom_region: Option<String>,

    pub coralogix_token: Option<String>,
    pub openshift: bool,

    pub cpu_min_value: i64,
    pub memory_min_value: i64,
    pub max_workers: i64,

    pub format: String,
    pub show_cluster_name: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub log_to_stderr: bool,
    pub width: Option<i64>,
    pub file_output: Option<String>,
    pub slack_output: Option<String>,

    /// Strategy-specific values keyed by setting name
    pub other_args: IndexMap<String, Value>,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            strategy: String::new(),
            kubeconfig: None,
            clusters: Vec::new(),
            all_clusters: false,
            namespaces: Vec::new(),
            resources: Vec::new(),
            selector: None,
            prometheus_url: None,
            prometheus_auth_header: None,
            prometheus_other_headers: Vec::new(),
            prometheus_ssl_enabled: false,
            prometheus_cluster_label: None,
            prometheus_label: None,
            eks_managed_prom: false,
            eks_managed_prom_profile_name: None,
            eks_access_key: None,
            eks_secret_key: None,
            eks_service_name: Some(DEFAULT_EKS_SERVICE_NAME.to_string()),
            eks_managed_prom_region: None,
            coralogix_token: None,
            openshift: false,
            cpu_min_value: 10,
            memory_min_value: 100,
            max_workers: 10,
            format: formatters::DEFAULT_FORMATTER.to_string(),
            show_cluster_name: false,
            verbose: false,
            quiet: false,
            log_to_stderr: false,
            width: None,
            file_output: None,
            slack_output: None,
            other_args: IndexMap::new(),
        }
    }
}

impl RawOptions {
    /// Defaults for every global option, targeting `strategy`
    pub fn for_strategy(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            ..Self::default()
        }
    }
}

/// A credential that never appears in logs or serialized output
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

fn serialize_url<S: Serializer>(url: &Option<Url>, serializer: S) -> Result<S::Ok, S::Error> {
    match url {
        Some(url) => serializer.serialize_str(url.as_str()),
        None => serializer.serialize_none(),
    }
}

/// Validated, immutable configuration for one run
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    strategy: String,

    kubeconfig: Option<PathBuf>,
    clusters: ClusterSelector,
    namespaces: Selection<String>,
    resources: Selection<ResourceKind>,
    selector: Option<String>,

    #[serde(serialize_with = "serialize_url")]
    prometheus_url: Option<Url>,
    prometheus_auth_header: Option<Secret>,
    prometheus_other_headers: IndexMap<String, String>,
    prometheus_ssl_enabled: bool,
    prometheus_cluster_label: Option<String>,
    prometheus_label: Option<String>,

    eks_managed_prom: bool,
    eks_managed_prom_profile_name: Option<String>,
    eks_access_key: Option<Secret>,
    eks_secret_key: Option<Secret>,
    eks_service_name: Option<String>,
    eks_managed_prom_region: Option<String>,

    coralogix_token: Option<Secret>,
    openshift: bool,

    cpu_min_value: u64,
    memory_min_value: u64,
    max_workers: usize,

    format: String,
    show_cluster_name: bool,
    verbose: bool,
    quiet: bool,
    log_to_stderr: bool,
    width: Option<u32>,
    file_output: Option<PathBuf>,
    slack_output: Option<String>,

    other_args: IndexMap<String, Value>,
}

impl Config {
    /// Normalize and validate `raw` for `strategy`
    ///
    /// `schema` is the strategy's settings schema. Every violation is
    /// collected into a single [`ConfigError::Invalid`].
    pub fn build(
        raw: RawOptions,
        strategy: &dyn Strategy,
        schema: &[SettingField],
    ) -> ConfigResult<Config> {
        let mut errors = Vec::new();

        let clusters = normalize_clusters(raw.all_clusters, raw.clusters);
        let namespaces = normalize_namespaces(raw.namespaces, &mut errors);
        let resources = normalize_resources(raw.resources, &mut errors);

        let cpu_min_value = non_negative("cpu_min_value", raw.cpu_min_value, &mut errors);
        let memory_min_value = non_negative("memory_min_value", raw.memory_min_value, &mut errors);

        let max_workers = match usize::try_from(raw.max_workers) {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.push(FieldError::new(
                    "max_workers",
                    format!("must be >= 1, got {}", raw.max_workers),
                ));
                1
            }
        };

        let width = match raw.width {
            None => None,
            Some(w) => match u32::try_from(w) {
                Ok(w) if w >= 1 => Some(w),
                _ => {
                    errors.push(FieldError::new("width", format!("must be >= 1, got {}", w)));
                    None
                }
            },
        };

        if !formatters::is_registered(&raw.format) {
            errors.push(FieldError::new(
                "format",
                format!(
                    "unknown formatter '{}' (available: {})",
                    raw.format,
                    formatters::list_available().join(", ")
                ),
            ));
        }

        let prometheus_url = raw
            .prometheus_url
            .as_deref()
            .and_then(|url| parse_prometheus_url(url, &mut errors));

        let prometheus_other_headers = parse_headers(&raw.prometheus_other_headers, &mut errors);

        if raw.eks_access_key.is_some() != raw.eks_secret_key.is_some() {
            errors.push(FieldError::new(
                "eks_access_key",
                "eks_access_key and eks_secret_key must be given together",
            ));
        }

        if raw.quiet && raw.verbose {
            errors.push(FieldError::new("quiet", "cannot be combined with verbose"));
        }

        let other_args = complete_settings(schema, raw.other_args);
        errors.extend(validate_strategy_settings(strategy, schema, &other_args));

        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors));
        }

        Ok(Config {
            strategy: raw.strategy,
            kubeconfig: raw.kubeconfig.map(PathBuf::from),
            clusters,
            namespaces,
            resources,
            selector: raw.selector,
            prometheus_url,
            prometheus_auth_header: raw.prometheus_auth_header.map(Secret),
            prometheus_other_headers,
            prometheus_ssl_enabled: raw.prometheus_ssl_enabled,
            prometheus_cluster_label: raw.prometheus_cluster_label,
            prometheus_label: raw.prometheus_label,
            eks_managed_prom: raw.eks_managed_prom,
            eks_managed_prom_profile_name: raw.eks_managed_prom_profile_name,
            eks_access_key: raw.eks_access_key.map(Secret),
            eks_secret_key: raw.eks_secret_key.map(Secret),
            eks_service_name: raw.eks_service_name,
            eks_managed_prom_region: raw.eks_managed_prom_region,
            coralogix_token: raw.coralogix_token.map(Secret),
            openshift: raw.openshift,
            cpu_min_value,
            memory_min_value,
            max_workers,
            format: raw.format,
            show_cluster_name: raw.show_cluster_name,
            verbose: raw.verbose,
            quiet: raw.quiet,
            log_to_stderr: raw.log_to_stderr,
            width,
            file_output: raw.file_output.map(PathBuf::from),
            slack_output: raw.slack_output,
            other_args,
        })
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn kubeconfig(&self) -> Option<&Path> {
        self.kubeconfig.as_deref()
    }

    pub fn clusters(&self) -> &ClusterSelector {
        &self.clusters
    }

    pub fn namespaces(&self) -> &Selection<String> {
        &self.namespaces
    }

    pub fn resources(&self) -> &Selection<ResourceKind> {
        &self.resources
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn prometheus_url(&self) -> Option<&Url> {
        self.prometheus_url.as_ref()
    }

    pub fn prometheus_auth_header(&self) -> Option<&str> {
        self.prometheus_auth_header.as_ref().map(Secret::expose)
    }

    pub fn prometheus_other_headers(&self) -> &IndexMap<String, String> {
        &self.prometheus_other_headers
    }

    pub fn prometheus_ssl_enabled(&self) -> bool {
        self.prometheus_ssl_enabled
    }

    pub fn prometheus_cluster_label(&self) -> Option<&str> {
        self.prometheus_cluster_label.as_deref()
    }

    pub fn prometheus_label(&self) -> Option<&str> {
        self.prometheus_label.as_deref()
    }

    pub fn eks_managed_prom(&self) -> bool {
        self.eks_managed_prom
    }

    pub fn eks_managed_prom_profile_name(&self) -> Option<&str> {
        self.eks_managed_prom_profile_name.as_deref()
    }

    pub fn eks_access_key(&self) -> Option<&str> {
        self.eks_access_key.as_ref().map(Secret::expose)
    }

    pub fn eks_secret_key(&self) -> Option<&str> {
        self.eks_secret_key.as_ref().map(Secret::expose)
    }

    pub fn eks_service_name(&self) -> Option<&str> {
        self.eks_service_name.as_deref()
    }

    pub fn eks_managed_prom_region(&self) -> Option<&str> {
        self.eks_managed_prom_region.as_deref()
    }

    pub fn coralogix_token(&self) -> Option<&str> {
        self.coralogix_token.as_ref().map(Secret::expose)
    }

    pub fn openshift(&self) -> bool {
        self.openshift
    }

    pub fn cpu_min_value(&self) -> u64 {
        self.cpu_min_value
    }

    pub fn memory_min_value(&self) -> u64 {
        self.memory_min_value
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn show_cluster_name(&self) -> bool {
        self.show_cluster_name
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn log_to_stderr(&self) -> bool {
        self.log_to_stderr
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn file_output(&self) -> Option<&Path> {
        self.file_output.as_deref()
    }

    pub fn slack_output(&self) -> Option<&str> {
        self.slack_output.as_deref()
    }

    /// Strategy settings in schema order
    pub fn other_args(&self) -> &IndexMap<String, Value> {
        &self.other_args
    }
}

fn normalize_clusters(all_clusters: bool, clusters: Vec<String>) -> ClusterSelector {
    if all_clusters || clusters.iter().any(|c| c == WILDCARD) {
        ClusterSelector::All
    } else if clusters.is_empty() {
        ClusterSelector::Current
    } else {
        ClusterSelector::Named(clusters)
    }
}

fn normalize_namespaces(namespaces: Vec<String>, errors: &mut Vec<FieldError>) -> Selection<String> {
    if namespaces.is_empty() || namespaces.iter().any(|ns| ns == WILDCARD) {
        return Selection::All;
    }

    let mut seen = IndexSet::new();
    for ns in namespaces {
        if ns.starts_with(WILDCARD) {
            errors.push(FieldError::new(
                "namespaces",
                format!("'{}': a namespace cannot start with '*'", ns),
            ));
            continue;
        }
        seen.insert(ns.to_lowercase());
    }
    Selection::Only(seen.into_iter().collect())
}

fn normalize_resources(
    resources: Vec<String>,
    errors: &mut Vec<FieldError>,
) -> Selection<ResourceKind> {
    if resources.is_empty() || resources.iter().any(|r| r == WILDCARD) {
        return Selection::All;
    }

    let mut kinds = IndexSet::new();
    for resource in resources {
        match resource.parse::<ResourceKind>() {
            Ok(kind) => {
                kinds.insert(kind);
            }
            Err(e) => errors.push(FieldError::new("resources", e.to_string())),
        }
    }
    Selection::Only(kinds.into_iter().collect())
}

fn non_negative(field: &str, value: i64, errors: &mut Vec<FieldError>) -> u64 {
    u64::try_from(value).unwrap_or_else(|_| {
        errors.push(FieldError::new(field, format!("must be >= 0, got {}", value)));
        0
    })
}

fn parse_prometheus_url(raw: &str, errors: &mut Vec<FieldError>) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Some(url),
        Ok(url) => {
            errors.push(FieldError::new(
                "prometheus_url",
                format!("'{}': expected an http or https URL, got scheme '{}'", raw, url.scheme()),
            ));
            None
        }
        Err(e) => {
            errors.push(FieldError::new("prometheus_url", format!("'{}': {}", raw, e)));
            None
        }
    }
}

fn parse_headers(headers: &[String], errors: &mut Vec<FieldError>) -> IndexMap<String, String> {
    let mut parsed = IndexMap::new();
    for header in headers {
        match header.split_once(':') {
            Some((key, value)) if !key.trim().is_empty() => {
                parsed.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => errors.push(FieldError::new(
                "prometheus_other_headers",
                format!("'{}': expected 'key: value'", header),
            )),
        }
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use krr_strategies::SimpleStrategy;
    use serde_json::json;

    fn build(raw: RawOptions) -> ConfigResult<Config> {
        let schema = SimpleStrategy.settings_schema().unwrap();
        Config::build(raw, &SimpleStrategy, &schema)
    }

    fn raw() -> RawOptions {
        RawOptions::for_strategy("simple")
    }

    #[test]
    fn test_defaults_build() {
        let config = build(raw()).unwrap();
        assert_eq!(config.strategy(), "simple");
        assert_eq!(config.cpu_min_value(), 10);
        assert_eq!(config.memory_min_value(), 100);
        assert_eq!(config.max_workers(), 10);
        assert_eq!(config.format(), "table");
        assert_eq!(config.clusters(), &ClusterSelector::Current);
        assert_eq!(config.namespaces(), &Selection::All);
        assert_eq!(config.resources(), &Selection::All);
        assert_eq!(config.eks_service_name(), Some("aps"));
        assert_eq!(config.other_args()["history_duration"], json!(336.0));
        assert_eq!(config.file_output(), None);
    }

    #[test]
    fn test_all_clusters_wins_over_list() {
        let mut options = raw();
        options.all_clusters = true;
        options.clusters = vec!["c1".into(), "c2".into()];
        let config = build(options).unwrap();
        assert_eq!(config.clusters(), &ClusterSelector::All);
    }

    #[test]
    fn test_named_clusters_kept_in_order() {
        let mut options = raw();
        options.clusters = vec!["prod".into(), "dev".into()];
        let config = build(options).unwrap();
        assert_eq!(
            config.clusters(),
            &ClusterSelector::Named(vec!["prod".into(), "dev".into()])
        );
    }

    #[test]
    fn test_namespace_wildcard_dominates() {
        let mut options = raw();
        options.namespaces = vec!["*".into(), "foo".into()];
        assert_eq!(build(options).unwrap().namespaces(), &Selection::All);
    }

    #[test]
    fn test_namespaces_lowercased_and_deduplicated() {
        let mut options = raw();
        options.namespaces = vec!["Default".into(), "kube-system".into(), "default".into()];
        let config = build(options).unwrap();
        assert_eq!(
            config.namespaces(),
            &Selection::Only(vec!["default".to_string(), "kube-system".to_string()])
        );
    }

    #[test]
    fn test_partial_namespace_wildcard_rejected() {
        let mut options = raw();
        options.namespaces = vec!["*-system".into()];
        assert!(build(options).unwrap_err().has_field("namespaces"));
    }

    #[test]
    fn test_resources_canonicalised() {
        let mut options = raw();
        options.resources = vec!["deployment".into(), "STATEFULSET".into(), "Deployment".into()];
        let config = build(options).unwrap();
        assert_eq!(
            config.resources(),
            &Selection::Only(vec![ResourceKind::Deployment, ResourceKind::StatefulSet])
        );
    }

    #[test]
    fn test_resource_wildcard_dominates() {
        let mut options = raw();
        options.resources = vec!["*".into(), "Deployment".into()];
        assert_eq!(build(options).unwrap().resources(), &Selection::All);
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let mut options = raw();
        options.resources = vec!["Pod".into()];
        assert!(build(options).unwrap_err().has_field("resources"));
    }

    #[test]
    fn test_every_violation_is_reported() {
        let mut options = raw();
        options.cpu_min_value = -5;
        options.memory_min_value = -1;
        options.max_workers = 0;
        options.width = Some(0);
        options.format = "xml".into();
        options.quiet = true;
        options.verbose = true;

        let err = build(options).unwrap_err();
        for field in [
            "cpu_min_value",
            "memory_min_value",
            "max_workers",
            "width",
            "format",
            "quiet",
        ] {
            assert!(err.has_field(field), "missing error for {field}");
        }
        assert_eq!(err.field_errors().len(), 6);
    }

    #[test]
    fn test_prometheus_url_must_be_http() {
        let mut options = raw();
        options.prometheus_url = Some("ftp://prom:9090".into());
        assert!(build(options).unwrap_err().has_field("prometheus_url"));

        let mut options = raw();
        options.prometheus_url = Some("not a url".into());
        assert!(build(options).unwrap_err().has_field("prometheus_url"));

        let mut options = raw();
        options.prometheus_url = Some("https://prom.example.com:9090".into());
        let config = build(options).unwrap();
        assert_eq!(
            config.prometheus_url().map(Url::as_str),
            Some("https://prom.example.com:9090/")
        );
    }

    #[test]
    fn test_headers_parsed_and_trimmed() {
        let mut options = raw();
        options.prometheus_other_headers = vec!["X-Scope-OrgID: team-a  ".into()];
        let config = build(options).unwrap();
        assert_eq!(config.prometheus_other_headers()["X-Scope-OrgID"], "team-a");

        let mut options = raw();
        options.prometheus_other_headers = vec!["no-colon".into()];
        assert!(build(options).unwrap_err().has_field("prometheus_other_headers"));
    }

    #[test]
    fn test_eks_keys_required_together() {
        let mut options = raw();
        options.eks_access_key = Some("AKIA".into());
        assert!(build(options).unwrap_err().has_field("eks_access_key"));
    }

    #[test]
    fn test_strategy_settings_are_validated() {
        let mut options = raw();
        options
            .other_args
            .insert("cpu_percentile".to_string(), json!(101.0));
        assert!(build(options).unwrap_err().has_field("cpu_percentile"));
    }

    #[test]
    fn test_secrets_are_redacted() {
        let mut options = raw();
        options.prometheus_auth_header = Some("Bearer abc".into());
        options.coralogix_token = Some("cx-token".into());
        let config = build(options).unwrap();

        assert_eq!(config.prometheus_auth_header(), Some("Bearer abc"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("abc"));
        assert!(!json.contains("cx-token"));
        assert!(!format!("{:?}", config).contains("cx-token"));
    }

    #[test]
    fn test_serialized_field_order_starts_with_strategy() {
        let config = build(raw()).unwrap();
        let value = serde_json::to_value(&config).unwrap();
        let first = value.as_object().unwrap().keys().next().cloned();
        assert_eq!(first.as_deref(), Some("strategy"));
        assert_eq!(value["namespaces"], json!("*"));
    }
}
