//! KRR - Kubernetes Resource Recommender
//!
//! Usage:
//! - `krr <strategy> [options]`: resolve and run a recommendation
//! - `krr version`: print the version
//!
//! Exit codes:
//! - 0: Success (including rejected configuration, which is logged)
//! - 1: Error

use krr_cli::dispatcher::PlanRunner;
use krr_cli::App;
use krr_strategies::StrategyRegistry;
use std::sync::Arc;

fn main() {
    let registry = Arc::new(StrategyRegistry::with_builtin_strategies());
    let app = App::from_environment(registry);
    let exit_code = app.run(std::env::args_os(), &PlanRunner::new());
    std::process::exit(exit_code);
}
