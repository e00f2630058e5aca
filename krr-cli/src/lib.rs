//! # KRR CLI
//!
//! The `krr` command line. One subcommand is generated per registered
//! strategy, each accepting the global options followed by the strategy's
//! own settings:
//!
//! - [`type_narrowing`]: schema types to command-line primitives
//! - [`options`]: global and strategy option declarations
//! - [`cli_builder`]: command synthesis and dispatch lookup
//! - [`invocation`]: per-strategy configuration building
//! - [`dispatcher`]: the [`Runner`](dispatcher::Runner) hand-off
//!
//! [`App`] ties these together and is what the binary runs.

pub mod cli_builder;
pub mod dispatcher;
pub mod error;
pub mod exit_codes;
pub mod invocation;
pub mod logging;
pub mod options;
pub mod type_narrowing;

use cli_builder::{CliBuilder, DispatchTarget};
use dispatcher::{Dispatcher, RunOutcome, Runner};
use error::{exit_code, log_error};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS};
use krr_common::Severity;
use krr_config::{ConfigError, ToolDefaults};
use krr_strategies::StrategyRegistry;
use logging::LogOptions;
use std::ffi::OsString;
use std::sync::Arc;

/// A configured `krr` command line
pub struct App {
    builder: CliBuilder,
    defaults_error: Option<ConfigError>,
}

impl App {
    pub fn new(registry: Arc<StrategyRegistry>, defaults: ToolDefaults) -> Self {
        Self {
            builder: CliBuilder::new(registry, defaults),
            defaults_error: None,
        }
    }

    /// Use tool defaults from the user's `krr.toml` files and `KRR_*` variables
    ///
    /// A load failure falls back to the built-in defaults and is reported as
    /// a warning once logging is set up.
    pub fn from_environment(registry: Arc<StrategyRegistry>) -> Self {
        match ToolDefaults::load() {
            Ok(defaults) => Self::new(registry, defaults),
            Err(e) => Self {
                builder: CliBuilder::new(registry, ToolDefaults::default()),
                defaults_error: Some(e),
            },
        }
    }

    /// Parse `args` and run the selected command, returning the exit code
    pub fn run<I, T>(&self, args: I, runner: &dyn Runner) -> i32
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = match self.builder.synthesize() {
            Ok(commands) => commands,
            Err(e) => {
                logging::init(LogOptions::startup());
                log_error(&e);
                return exit_code(e.severity());
            }
        };

        let matches = match self.builder.build_cli(&commands).try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => return print_clap_error(e),
        };

        match CliBuilder::dispatch_target(&commands, &matches) {
            Some(DispatchTarget::Version) => {
                println!("{}", env!("CARGO_PKG_VERSION"));
                EXIT_SUCCESS
            }
            Some(DispatchTarget::Strategy { command, matches }) => {
                logging::init(LogOptions::from_matches(matches));
                if let Some(e) = &self.defaults_error {
                    log_error(e);
                }

                match command.handler().run(matches, &Dispatcher::new(), runner) {
                    RunOutcome::Completed => EXIT_SUCCESS,
                    RunOutcome::Invalid(severity) => exit_code(severity),
                    RunOutcome::Failed(_) => EXIT_ERROR,
                }
            }
            None => EXIT_ERROR,
        }
    }
}

/// Print a parse error or help text, returning the matching exit code
fn print_clap_error(e: clap::Error) -> i32 {
    use clap::error::ErrorKind;

    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => EXIT_SUCCESS,
        _ => EXIT_ERROR,
    }
}
