//! Option declarations
//!
//! Options are plain data ([`OptionSpec`]) until a command is assembled.
//! The global list is the same for every strategy; the strategy list is
//! derived from the strategy's settings schema.

use crate::type_narrowing::{narrow, CliType};
use clap::{Arg, ArgAction};
use krr_config::formatters;
use krr_config::ToolDefaults;
use krr_strategies::SettingField;
use serde_json::Value;

/// Help heading for strategy options
pub const STRATEGY_SETTINGS_HEADING: &str = "Strategy Settings";

const KUBERNETES: &str = "Kubernetes Settings";
const PROMETHEUS: &str = "Prometheus Settings";
const PROMETHEUS_EKS: &str = "Prometheus EKS Settings";
const PROMETHEUS_CORALOGIX: &str = "Prometheus Coralogix Settings";
const PROMETHEUS_OPENSHIFT: &str = "Prometheus Openshift Settings";
const RECOMMENDATION: &str = "Recommendation Settings";
const THREADING: &str = "Threading Settings";
const LOGGING: &str = "Logging Settings";
const OUTPUT: &str = "Output Settings";

/// Identifiers of the global options
pub mod ids {
    pub const KUBECONFIG: &str = "kubeconfig";
    pub const CLUSTERS: &str = "clusters";
    pub const ALL_CLUSTERS: &str = "all_clusters";
    pub const NAMESPACES: &str = "namespaces";
    pub const RESOURCES: &str = "resources";
    pub const SELECTOR: &str = "selector";
    pub const PROMETHEUS_URL: &str = "prometheus_url";
    pub const PROMETHEUS_AUTH_HEADER: &str = "prometheus_auth_header";
    pub const PROMETHEUS_OTHER_HEADERS: &str = "prometheus_other_headers";
    pub const PROMETHEUS_SSL_ENABLED: &str = "prometheus_ssl_enabled";
    pub const PROMETHEUS_CLUSTER_LABEL: &str = "prometheus_cluster_label";
    pub const PROMETHEUS_LABEL: &str = "prometheus_label";
    pub const EKS_MANAGED_PROM: &str = "eks_managed_prom";
    pub const EKS_MANAGED_PROM_PROFILE_NAME: &str = "eks_managed_prom_profile_name";
    pub const EKS_ACCESS_KEY: &str = "eks_access_key";
    pub const EKS_SECRET_KEY: &str = "eks_secret_key";
    pub const EKS_SERVICE_NAME: &str = "eks_service_name";
    pub const EKS_MANAGED_PROM_REGION: &str = "eks_managed_prom_region";
    pub const CORALOGIX_TOKEN: &str = "coralogix_token";
    pub const OPENSHIFT: &str = "openshift";
    pub const CPU_MIN_VALUE: &str = "cpu_min_value";
    pub const MEMORY_MIN_VALUE: &str = "memory_min_value";
    pub const MAX_WORKERS: &str = "max_workers";
    pub const FORMAT: &str = "format";
    pub const SHOW_CLUSTER_NAME: &str = "show_cluster_name";
    pub const VERBOSE: &str = "verbose";
    pub const QUIET: &str = "quiet";
    pub const LOG_TO_STDERR: &str = "log_to_stderr";
    pub const WIDTH: &str = "width";
    pub const FILE_OUTPUT: &str = "file_output";
    pub const SLACK_OUTPUT: &str = "slack_output";
}

/// How an option consumes values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Presence means `true`
    Flag,
    /// A single value of a narrowed type
    Typed(CliType),
    /// Repeatable text value, collected in order
    List,
}

/// A single command-line option, before it becomes a clap [`Arg`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub id: String,
    /// Canonical long flag, without the leading `--`
    pub long: String,
    pub aliases: Vec<String>,
    pub short: Option<char>,
    pub value_kind: ValueKind,
    pub default: Option<String>,
    pub help: String,
    pub heading: String,
    pub hidden: bool,
}

impl OptionSpec {
    fn new(id: &str, long: &str, value_kind: ValueKind, heading: &str, help: &str) -> Self {
        Self {
            id: id.to_string(),
            long: long.to_string(),
            aliases: Vec::new(),
            short: None,
            value_kind,
            default: None,
            help: help.to_string(),
            heading: heading.to_string(),
            hidden: false,
        }
    }

    fn flag(id: &str, long: &str, heading: &str, help: &str) -> Self {
        Self::new(id, long, ValueKind::Flag, heading, help)
    }

    fn text(id: &str, long: &str, heading: &str, help: &str) -> Self {
        Self::new(id, long, ValueKind::Typed(CliType::String), heading, help)
    }

    fn list(id: &str, long: &str, heading: &str, help: &str) -> Self {
        Self::new(id, long, ValueKind::List, heading, help)
    }

    fn integer(id: &str, long: &str, heading: &str, help: &str) -> Self {
        Self::new(id, long, ValueKind::Typed(CliType::Integer), heading, help)
    }

    fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(alias.to_string());
        self
    }

    fn default_value(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Every long name this option answers to
    pub fn long_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.long.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Build the clap argument
    pub fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.id.clone())
            .long(self.long.clone())
            .help(self.help.clone())
            .help_heading(self.heading.clone())
            .hide(self.hidden);

        if !self.aliases.is_empty() {
            arg = arg.visible_aliases(self.aliases.clone());
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }

        arg = match self.value_kind {
            ValueKind::Flag => arg.action(ArgAction::SetTrue),
            ValueKind::List => arg
                .action(ArgAction::Append)
                .value_name("TEXT")
                .value_parser(CliType::String.value_parser()),
            ValueKind::Typed(CliType::Boolean) => arg
                .action(ArgAction::Set)
                .num_args(0..=1)
                .default_missing_value("true")
                .value_name(CliType::Boolean.value_name())
                .value_parser(CliType::Boolean.value_parser()),
            ValueKind::Typed(ty) => arg
                .action(ArgAction::Set)
                .value_name(ty.value_name())
                .value_parser(ty.value_parser())
                .allow_negative_numbers(ty.is_numeric()),
        };

        if let Some(default) = &self.default {
            arg = arg.default_value(default.clone());
        }
        arg
    }
}

/// Global options shared by every strategy command, in help order
pub fn global_options(defaults: &ToolDefaults) -> Vec<OptionSpec> {
    let mut prometheus_url = OptionSpec::text(
        ids::PROMETHEUS_URL,
        "prometheus-url",
        PROMETHEUS,
        "Prometheus URL. If not provided, will attempt to find it in kubernetes cluster",
    )
    .short('p');
    if let Some(url) = &defaults.prometheus_url {
        prometheus_url = prometheus_url.default_value(url);
    }

    vec![
        OptionSpec::text(
            ids::KUBECONFIG,
            "kubeconfig",
            KUBERNETES,
            "Path to kubeconfig file. If not provided, will attempt to find it.",
        )
        .short('k'),
        OptionSpec::list(
            ids::CLUSTERS,
            "context",
            KUBERNETES,
            "List of clusters to run on. By default, will run on the current cluster. Use --all-clusters to run on all clusters.",
        )
        .alias("cluster")
        .short('c'),
        OptionSpec::flag(
            ids::ALL_CLUSTERS,
            "all-clusters",
            KUBERNETES,
            "Run on all clusters. Overrides --context.",
        ),
        OptionSpec::list(
            ids::NAMESPACES,
            "namespace",
            KUBERNETES,
            "List of namespaces to run on. By default, will run on all namespaces except 'kube-system'.",
        )
        .short('n'),
        OptionSpec::list(
            ids::RESOURCES,
            "resource",
            KUBERNETES,
            "List of resources to run on (Deployment, StatefulSet, DaemonSet, Job, Rollout, StrimziPodSet). By default, will run on all resources. Case insensitive.",
        )
        .short('r'),
        OptionSpec::text(
            ids::SELECTOR,
            "selector",
            KUBERNETES,
            "Selector (label query) to filter workloads. Applied to labels on the workload (e.g. deployment) not on the individual pod! Supports '=', '==', and '!='. Matching objects must satisfy all of the specified label constraints.",
        )
        .short('s'),
        prometheus_url,
        OptionSpec::text(
            ids::PROMETHEUS_AUTH_HEADER,
            "prometheus-auth-header",
            PROMETHEUS,
            "Prometheus authentication header.",
        ),
        OptionSpec::list(
            ids::PROMETHEUS_OTHER_HEADERS,
            "prometheus-headers",
            PROMETHEUS,
            "Additional headers to add to Prometheus requests. Format as 'key: value', for example 'X-MyHeader: 123'. Trailing whitespaces will be stripped.",
        )
        .short('H'),
        OptionSpec::flag(
            ids::PROMETHEUS_SSL_ENABLED,
            "prometheus-ssl-enabled",
            PROMETHEUS,
            "Enable SSL for Prometheus requests.",
        ),
        OptionSpec::text(
            ids::PROMETHEUS_CLUSTER_LABEL,
            "prometheus-cluster-label",
            PROMETHEUS,
            "The label in prometheus for your cluster. (Only relevant for centralized prometheus)",
        )
        .short('l'),
        OptionSpec::text(
            ids::PROMETHEUS_LABEL,
            "prometheus-label",
            PROMETHEUS,
            "The label in prometheus used to differentiate clusters. (Only relevant for centralized prometheus)",
        ),
        OptionSpec::flag(
            ids::EKS_MANAGED_PROM,
            "eks-managed-prom",
            PROMETHEUS_EKS,
            "Adds additional signitures for eks prometheus connection.",
        ),
        OptionSpec::text(
            ids::EKS_MANAGED_PROM_PROFILE_NAME,
            "eks-profile-name",
            PROMETHEUS_EKS,
            "Sets the profile name for eks prometheus connection.",
        ),
        OptionSpec::text(
            ids::EKS_ACCESS_KEY,
            "eks-access-key",
            PROMETHEUS_EKS,
            "Sets the access key for eks prometheus connection.",
        ),
        OptionSpec::text(
            ids::EKS_SECRET_KEY,
            "eks-secret-key",
            PROMETHEUS_EKS,
            "Sets the secret key for eks prometheus connection.",
        ),
        OptionSpec::text(
            ids::EKS_SERVICE_NAME,
            "eks-service-name",
            PROMETHEUS_EKS,
            "Sets the service name for eks prometheus connection.",
        )
        .default_value(krr_config::config::DEFAULT_EKS_SERVICE_NAME),
        OptionSpec::text(
            ids::EKS_MANAGED_PROM_REGION,
            "eks-managed-prom-region",
            PROMETHEUS_EKS,
            "Sets the region for eks prometheus connection.",
        ),
        OptionSpec::text(
            ids::CORALOGIX_TOKEN,
            "coralogix-token",
            PROMETHEUS_CORALOGIX,
            "Adds the token needed to query Coralogix managed prometheus.",
        ),
        OptionSpec::flag(
            ids::OPENSHIFT,
            "openshift",
            PROMETHEUS_OPENSHIFT,
            "Used when running by Robusta inside an OpenShift cluster.",
        )
        .hidden(),
        OptionSpec::integer(
            ids::CPU_MIN_VALUE,
            "cpu-min",
            RECOMMENDATION,
            "Sets the minimum recommended cpu value in millicores.",
        )
        .default_value(defaults.cpu_min_value),
        OptionSpec::integer(
            ids::MEMORY_MIN_VALUE,
            "mem-min",
            RECOMMENDATION,
            "Sets the minimum recommended memory value in MB.",
        )
        .default_value(defaults.memory_min_value),
        OptionSpec::integer(
            ids::MAX_WORKERS,
            "max-workers",
            THREADING,
            "Max workers to use for async requests.",
        )
        .short('w')
        .default_value(defaults.max_workers),
        OptionSpec::text(
            ids::FORMAT,
            "formatter",
            LOGGING,
            &format!(
                "Output formatter ({})",
                formatters::list_available().join(", ")
            ),
        )
        .short('f')
        .default_value(&defaults.formatter),
        OptionSpec::flag(
            ids::SHOW_CLUSTER_NAME,
            "show-cluster-name",
            OUTPUT,
            "In table output, always show the cluster name even for a single cluster",
        ),
        OptionSpec::flag(ids::VERBOSE, "verbose", LOGGING, "Enable verbose mode").short('v'),
        OptionSpec::flag(ids::QUIET, "quiet", LOGGING, "Enable quiet mode").short('q'),
        OptionSpec::flag(
            ids::LOG_TO_STDERR,
            "logtostderr",
            LOGGING,
            "Pass logs to stderr",
        ),
        OptionSpec::integer(
            ids::WIDTH,
            "width",
            LOGGING,
            "Width of the output. Will use console width by default.",
        ),
        OptionSpec::text(
            ids::FILE_OUTPUT,
            "fileoutput",
            OUTPUT,
            "Print the output to a file",
        ),
        OptionSpec::text(
            ids::SLACK_OUTPUT,
            "slackoutput",
            OUTPUT,
            "Send to output to a slack channel, must have SLACK_BOT_TOKEN",
        ),
    ]
}

/// One option per settings field, in schema order
///
/// Field names are used verbatim as option ids and long flags.
pub fn strategy_options(schema: &[SettingField]) -> Vec<OptionSpec> {
    schema
        .iter()
        .map(|field| OptionSpec {
            id: field.name.clone(),
            long: field.name.clone(),
            aliases: Vec::new(),
            short: None,
            value_kind: ValueKind::Typed(narrow(&field.setting_type)),
            default: field.default.as_ref().and_then(render_default),
            help: field.help_text().to_string(),
            heading: STRATEGY_SETTINGS_HEADING.to_string(),
            hidden: false,
        })
        .collect()
}

/// Render a schema default the way clap expects it
fn render_default(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
