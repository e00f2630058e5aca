//! # KRR Strategies
//!
//! A strategy is a named recommendation algorithm with its own typed settings.
//! This crate holds the parts of a strategy that the command line needs:
//!
//! - [`Strategy`]: the plugin interface (name, description, settings schema,
//!   settings validation hook)
//! - [`SettingField`] / [`SettingType`]: the ordered, typed settings schema
//! - [`StrategyRegistry`]: the ordered collection that drives command synthesis
//! - [`SimpleStrategy`] / [`SimpleLimitStrategy`]: the built-in descriptors
//!
//! The recommendation math itself belongs to the execution engine and is not
//! part of this crate.
//!
//! ```rust
//! use krr_strategies::StrategyRegistry;
//!
//! let registry = StrategyRegistry::with_builtin_strategies();
//! assert_eq!(registry.names(), vec!["simple", "simple-limit"]);
//! ```

pub mod error;
pub mod registry;
pub mod settings;
pub mod simple;
pub mod strategy;

pub use error::StrategyError;
pub use registry::StrategyRegistry;
pub use settings::{SettingField, SettingType};
pub use simple::{SimpleLimitStrategy, SimpleStrategy};
pub use strategy::Strategy;
