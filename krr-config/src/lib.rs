//! # KRR Configuration
//!
//! Everything needed to turn bound command-line values into the single,
//! validated [`Config`] handed to the execution engine.
//!
//! - [`RawOptions`]: the unvalidated values bound from the command line
//! - [`Config::build`]: normalization plus atomic validation; either every
//!   check passes and a `Config` is returned, or a [`ConfigError`] lists
//!   every violation
//! - [`settings`]: validation of strategy-specific values against the
//!   strategy's settings schema
//! - [`formatters`]: names accepted by `--formatter`
//! - [`ToolDefaults`]: user-level defaults for a few global options, loaded
//!   with figment from `krr.toml` files and `KRR_*` environment variables
//!
//! ```rust
//! use krr_config::{Config, RawOptions};
//! use krr_strategies::{SimpleStrategy, Strategy};
//!
//! let schema = SimpleStrategy.settings_schema().unwrap();
//! let mut raw = RawOptions::for_strategy("simple");
//! raw.other_args = schema
//!     .iter()
//!     .map(|f| (f.name.clone(), f.default.clone().unwrap_or_default()))
//!     .collect();
//!
//! let config = Config::build(raw, &SimpleStrategy, &schema).unwrap();
//! assert_eq!(config.strategy(), "simple");
//! assert_eq!(config.format(), "table");
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod formatters;
pub mod selection;
pub mod settings;

pub use config::{Config, RawOptions};
pub use defaults::ToolDefaults;
pub use error::{ConfigError, ConfigResult, FieldError};
pub use selection::{ClusterSelector, ResourceKind, Selection, WILDCARD};
