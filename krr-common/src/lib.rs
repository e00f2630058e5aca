//! # KRR Common
//!
//! Shared building blocks used by every KRR crate:
//!
//! - [`ErrorSeverity`] and the [`Severity`] trait for classifying errors
//! - [`Pretty`] for rendering structured values inside tracing statements

pub mod error;
pub mod logging;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
