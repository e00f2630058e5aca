//! Shared helpers for in-process CLI tests

#![allow(dead_code)]

use async_trait::async_trait;
use indexmap::IndexMap;
use krr_cli::dispatcher::Runner;
use krr_cli::App;
use krr_config::{Config, ToolDefaults};
use krr_strategies::{SettingField, Strategy, StrategyError, StrategyRegistry};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Runner that records every configuration it receives
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<Arc<Config>>>,
}

impl RecordingRunner {
    pub fn calls(&self) -> Vec<Arc<Config>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn single_call(&self) -> Arc<Config> {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one runner call");
        calls[0].clone()
    }
}

#[async_trait]
impl Runner for RecordingRunner {
    async fn run(&self, config: Arc<Config>) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(config);
        Ok(())
    }
}

/// Strategy with a fixed schema
pub struct FixedStrategy {
    pub name: &'static str,
    pub fields: Vec<SettingField>,
}

impl Strategy for FixedStrategy {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Test strategy"
    }

    fn settings_schema(&self) -> Result<Vec<SettingField>, StrategyError> {
        Ok(self.fields.clone())
    }

    fn validate_settings(&self, _settings: &IndexMap<String, Value>) -> Result<(), StrategyError> {
        Ok(())
    }
}

pub fn builtin_app() -> App {
    App::new(
        Arc::new(StrategyRegistry::with_builtin_strategies()),
        ToolDefaults::default(),
    )
}

pub fn app_with(strategies: Vec<FixedStrategy>) -> App {
    let mut registry = StrategyRegistry::new();
    for strategy in strategies {
        registry.register(strategy);
    }
    App::new(Arc::new(registry), ToolDefaults::default())
}

/// Run `args` (without the program name) and return exit code and runner
pub fn run(app: &App, args: &[&str]) -> (i32, RecordingRunner) {
    let runner = RecordingRunner::default();
    let argv = std::iter::once("krr").chain(args.iter().copied());
    let code = app.run(argv, &runner);
    (code, runner)
}
