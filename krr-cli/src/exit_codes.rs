//! Process exit codes

/// Success, including a run rejected by configuration validation
pub const EXIT_SUCCESS: i32 = 0;

/// Startup failure, usage error or runner failure
pub const EXIT_ERROR: i32 = 1;
