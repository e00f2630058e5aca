//! Hand-off from the synchronous command line to the async execution engine

use async_trait::async_trait;
use krr_common::ErrorSeverity;
use krr_config::Config;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, error, info};

/// The execution engine behind every strategy command
///
/// Receives the validated configuration of the current invocation. Runners
/// never see a configuration that failed validation.
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, config: Arc<Config>) -> anyhow::Result<()>;
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The runner finished successfully
    Completed,
    /// Configuration validation failed; the runner was not called
    Invalid(ErrorSeverity),
    /// The runner, or the runtime hosting it, failed
    Failed(String),
}

/// Runs a [`Runner`] to completion on a dedicated tokio runtime
#[derive(Debug, Default, Clone, Copy)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Block until the runner finishes
    ///
    /// `config.max_workers()` is the runner's concurrency limit. The runtime
    /// itself never starts more worker threads than the host can run in
    /// parallel.
    pub fn run(&self, config: Arc<Config>, runner: &dyn Runner) -> RunOutcome {
        let threads = worker_threads(config.max_workers());
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name("krr-worker")
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Failed to start async runtime: {}", e);
                return RunOutcome::Failed(e.to_string());
            }
        };

        debug!(
            strategy = config.strategy(),
            max_workers = config.max_workers(),
            threads,
            "Dispatching to runner"
        );

        match runtime.block_on(runner.run(config)) {
            Ok(()) => RunOutcome::Completed,
            Err(e) => {
                error!("Run failed: {:#}", e);
                RunOutcome::Failed(format!("{:#}", e))
            }
        }
    }
}

/// Runtime worker threads for a run limited to `max_workers`
pub fn worker_threads(max_workers: usize) -> usize {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_workers.clamp(1, available)
}

/// Reports the resolved configuration instead of computing recommendations
///
/// Output is YAML, or JSON when the json formatter is selected.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanRunner;

impl PlanRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, config: &Config) -> anyhow::Result<String> {
        let rendered = if config.format() == "json" {
            let mut json = serde_json::to_string_pretty(config)?;
            json.push('\n');
            json
        } else {
            serde_yaml_ng::to_string(config)?
        };
        Ok(rendered)
    }
}

#[async_trait]
impl Runner for PlanRunner {
    async fn run(&self, config: Arc<Config>) -> anyhow::Result<()> {
        info!(
            "Running '{}' strategy on clusters {} (namespaces: {}, resources: {})",
            config.strategy(),
            compact(config.clusters()),
            compact(config.namespaces()),
            compact(config.resources()),
        );

        let rendered = self.render(&config)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

fn compact<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
