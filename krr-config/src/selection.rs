//! Target selection: clusters, namespaces and workload kinds

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Token that selects everything
pub const WILDCARD: &str = "*";

/// Which clusters a run targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterSelector {
    /// The current kubeconfig context
    Current,
    /// Every context in the kubeconfig
    All,
    /// An explicit list of contexts
    Named(Vec<String>),
}

impl Serialize for ClusterSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClusterSelector::Current => serializer.serialize_none(),
            ClusterSelector::All => serializer.serialize_str(WILDCARD),
            ClusterSelector::Named(names) => names.serialize(serializer),
        }
    }
}

/// Either everything, or an explicit list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}

impl<T: Serialize> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.serialize_str(WILDCARD),
            Selection::Only(items) => items.serialize(serializer),
        }
    }
}

/// Workload kinds that recommendations can be made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResourceKind {
    Deployment,
    StatefulSet,
    DaemonSet,
    Job,
    CronJob,
    Rollout,
    DeploymentConfig,
    StrimziPodSet,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 8] = [
        ResourceKind::Deployment,
        ResourceKind::StatefulSet,
        ResourceKind::DaemonSet,
        ResourceKind::Job,
        ResourceKind::CronJob,
        ResourceKind::Rollout,
        ResourceKind::DeploymentConfig,
        ResourceKind::StrimziPodSet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "Deployment",
            ResourceKind::StatefulSet => "StatefulSet",
            ResourceKind::DaemonSet => "DaemonSet",
            ResourceKind::Job => "Job",
            ResourceKind::CronJob => "CronJob",
            ResourceKind::Rollout => "Rollout",
            ResourceKind::DeploymentConfig => "DeploymentConfig",
            ResourceKind::StrimziPodSet => "StrimziPodSet",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown workload kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownResourceKind(pub String);

impl fmt::Display for UnknownResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = ResourceKind::ALL.iter().map(ResourceKind::as_str).collect();
        write!(
            f,
            "unknown resource kind '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    /// Case-insensitive match against the canonical kind names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownResourceKind(s.to_string()))
    }
}
