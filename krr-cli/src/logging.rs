//! Tracing subscriber setup

use crate::options::ids;
use clap::ArgMatches;
use is_terminal::IsTerminal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Logging flags taken from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub verbose: bool,
    pub quiet: bool,
    pub log_to_stderr: bool,
}

impl LogOptions {
    /// Options used before arguments are parsed
    pub fn startup() -> Self {
        Self {
            log_to_stderr: true,
            ..Self::default()
        }
    }

    /// Read the logging flags of a strategy command
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let flag = |id: &str| {
            matches
                .try_get_one::<bool>(id)
                .ok()
                .flatten()
                .copied()
                .unwrap_or(false)
        };
        Self {
            verbose: flag(ids::VERBOSE),
            quiet: flag(ids::QUIET),
            log_to_stderr: flag(ids::LOG_TO_STDERR),
        }
    }

    /// Default filter directive when `RUST_LOG` is unset
    pub fn level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the verbosity flags. Only the first
/// call in a process has an effect; later calls are ignored.
pub fn init(options: LogOptions) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(options.level()));

    let (writer, ansi) = if options.log_to_stderr {
        (
            BoxMakeWriter::new(std::io::stderr),
            std::io::stderr().is_terminal(),
        )
    } else {
        (
            BoxMakeWriter::new(std::io::stdout),
            std::io::stdout().is_terminal(),
        )
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(LogOptions::default().level(), "info");
        assert_eq!(
            LogOptions {
                verbose: true,
                ..Default::default()
            }
            .level(),
            "debug"
        );
        assert_eq!(
            LogOptions {
                quiet: true,
                ..Default::default()
            }
            .level(),
            "error"
        );
    }

    #[test]
    fn test_from_matches_reads_flags() {
        let matches = clap::Command::new("t")
            .arg(clap::Arg::new(ids::QUIET).short('q').action(clap::ArgAction::SetTrue))
            .arg(
                clap::Arg::new(ids::LOG_TO_STDERR)
                    .long("logtostderr")
                    .action(clap::ArgAction::SetTrue),
            )
            .try_get_matches_from(["t", "-q", "--logtostderr"])
            .unwrap();
        let options = LogOptions::from_matches(&matches);
        assert!(options.quiet);
        assert!(options.log_to_stderr);
        assert!(!options.verbose);
    }

    #[test]
    fn test_startup_logs_to_stderr() {
        assert!(LogOptions::startup().log_to_stderr);
    }
}
