//! Error classification shared across KRR crates
//!
//! Each crate defines its own `thiserror` enum. Implementing [`Severity`] on it
//! lets the binary choose a log level and an exit path without knowing the
//! concrete error type.

use std::fmt;

/// Severity levels for error classification
///
/// # Severity Levels
///
/// - **Warning**: Something looked wrong but the invocation can proceed
///   (for example an unreadable defaults file, where built-in defaults apply).
/// - **Error**: The current invocation cannot complete, typically because the
///   user supplied invalid option values. The process still exits normally.
/// - **Critical**: The tool itself is misconfigured, such as a registered
///   strategy whose settings schema cannot be turned into CLI options.
///
/// # Examples
///
/// ```rust
/// use krr_common::ErrorSeverity;
///
/// let bad_user_input = ErrorSeverity::Error;
/// let broken_strategy = ErrorSeverity::Critical;
/// assert!(broken_strategy > bad_user_input);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the process can exit cleanly
    Error,

    /// Registration-time defect, process construction must abort
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorSeverity::Warning => "warning",
            ErrorSeverity::Error => "error",
            ErrorSeverity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use krr_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     SchemaBroken,
///     BadValue,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::SchemaBroken => ErrorSeverity::Critical,
///             MyError::BadValue => ErrorSeverity::Error,
///         }
///     }
/// }
///
/// assert_eq!(MyError::SchemaBroken.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error must abort process construction
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}
