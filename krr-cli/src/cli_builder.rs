use crate::error::SynthesisError;
use crate::invocation::InvocationHandler;
use crate::options::{global_options, strategy_options, OptionSpec};
use clap::{ArgMatches, Command};
use krr_config::ToolDefaults;
use krr_strategies::StrategyRegistry;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Name of the root command
pub const BIN_NAME: &str = "krr";

/// Name of the version subcommand
pub const VERSION_COMMAND: &str = "version";

/// Help heading for strategy subcommands
pub const STRATEGIES_HEADING: &str = "Strategies";

/// Long names clap reserves on every subcommand
const RESERVED_LONGS: &[&str] = &["help"];

/// Subcommand names taken by the root command itself
const RESERVED_COMMANDS: &[&str] = &[VERSION_COMMAND, "help"];

/// A generated strategy command, built once at startup
#[derive(Debug, Clone)]
pub struct StrategyCommand {
    strategy_name: String,
    options: Vec<OptionSpec>,
    command: Command,
    handler: InvocationHandler,
}

impl StrategyCommand {
    pub fn strategy_name(&self) -> &str {
        &self.strategy_name
    }

    /// Global options first, then the strategy's own
    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn handler(&self) -> &InvocationHandler {
        &self.handler
    }
}

/// What the parsed command line asks for
#[derive(Debug)]
pub enum DispatchTarget<'a> {
    Strategy {
        command: &'a StrategyCommand,
        matches: &'a ArgMatches,
    },
    Version,
}

/// Builder for the strategy commands
///
/// One subcommand is generated per registered strategy:
///
/// ```text
/// krr
/// ├── simple          # global options + simple's settings
/// ├── simple-limit    # global options + simple-limit's settings
/// └── version
/// ```
///
/// Nothing is written by hand: each strategy's options come from its
/// settings schema, so registering a strategy is enough to expose it.
pub struct CliBuilder {
    registry: Arc<StrategyRegistry>,
    defaults: ToolDefaults,
}

impl CliBuilder {
    pub fn new(registry: Arc<StrategyRegistry>, defaults: ToolDefaults) -> Self {
        Self { registry, defaults }
    }

    /// Generate one command per strategy, in registration order
    ///
    /// Fails on the first strategy whose name is reserved, whose schema
    /// cannot be read or whose options collide with the global ones. No
    /// strategy is skipped.
    pub fn synthesize(&self) -> Result<Vec<StrategyCommand>, SynthesisError> {
        let mut commands = Vec::with_capacity(self.registry.len());

        for (name, strategy) in self.registry.iter() {
            if RESERVED_COMMANDS.contains(&name) {
                return Err(SynthesisError::ReservedName {
                    strategy: name.to_string(),
                });
            }

            let schema = strategy
                .settings_schema()
                .map_err(|source| SynthesisError::Schema {
                    strategy: name.to_string(),
                    source,
                })?;
            let strategy_specific = strategy_options(&schema);
            let handler = InvocationHandler::for_strategy(name, Arc::clone(strategy), schema);

            let mut options = global_options(&self.defaults);
            check_collisions(name, &options, &strategy_specific)?;
            options.extend(strategy_specific);

            let command = build_command(name, strategy.description(), &options);
            debug!(strategy = name, options = options.len(), "Generated command");

            commands.push(StrategyCommand {
                strategy_name: name.to_string(),
                options,
                command,
                handler,
            });
        }

        Ok(commands)
    }

    /// Assemble the root command from the generated strategy commands
    pub fn build_cli(&self, commands: &[StrategyCommand]) -> Command {
        let mut cli = Command::new(BIN_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .about("Kubernetes Resource Recommender: right-size workloads from Prometheus usage history")
            .arg_required_else_help(true)
            .subcommand_help_heading(STRATEGIES_HEADING);

        for command in commands {
            cli = cli.subcommand(command.command.clone());
        }

        cli.subcommand(Command::new(VERSION_COMMAND).about("Print the version and exit"))
    }

    /// Map parsed arguments back to the command that should handle them
    pub fn dispatch_target<'a>(
        commands: &'a [StrategyCommand],
        matches: &'a ArgMatches,
    ) -> Option<DispatchTarget<'a>> {
        let (name, sub_matches) = matches.subcommand()?;
        if name == VERSION_COMMAND {
            return Some(DispatchTarget::Version);
        }
        commands
            .iter()
            .find(|c| c.strategy_name == name)
            .map(|command| DispatchTarget::Strategy {
                command,
                matches: sub_matches,
            })
    }
}

fn build_command(name: &str, description: &str, options: &[OptionSpec]) -> Command {
    let mut about = format!("Run KRR using the `{}` strategy", name);
    if !description.is_empty() {
        about.push_str("\n\n");
        about.push_str(description);
    }

    let mut command = Command::new(name.to_string()).about(about);
    for option in options {
        command = command.arg(option.to_arg());
    }
    command
}

/// Reject strategy options that would shadow a global option
///
/// Clap panics on duplicate ids or flags, so this runs before any `Arg`
/// is built.
fn check_collisions(
    strategy: &str,
    globals: &[OptionSpec],
    strategy_specific: &[OptionSpec],
) -> Result<(), SynthesisError> {
    let mut seen = HashSet::new();

    for option in strategy_specific {
        if !seen.insert(option.id.as_str()) {
            return Err(SynthesisError::DuplicateField {
                strategy: strategy.to_string(),
                field: option.id.clone(),
            });
        }

        if RESERVED_LONGS.contains(&option.long.as_str()) {
            return Err(SynthesisError::FlagCollision {
                strategy: strategy.to_string(),
                flag: option.long.clone(),
                global: option.long.clone(),
            });
        }

        let clash = globals.iter().find(|global| {
            global.id == option.id
                || global.long_names().any(|long| long == option.long)
                || (option.short.is_some() && global.short == option.short)
        });
        if let Some(global) = clash {
            return Err(SynthesisError::FlagCollision {
                strategy: strategy.to_string(),
                flag: option.long.clone(),
                global: global.id.clone(),
            });
        }
    }

    Ok(())
}
