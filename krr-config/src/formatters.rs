//! Output formatter names
//!
//! Rendering lives in the execution engine; the command line only needs the
//! set of names it can hand over.

/// Registered formatter names, in help order
pub const FORMATTERS: &[&str] = &["table", "json", "yaml", "pprint", "csv", "csv-raw", "html"];

/// Formatter used when `--formatter` is not given
pub const DEFAULT_FORMATTER: &str = "table";

/// All formatter names
pub fn list_available() -> &'static [&'static str] {
    FORMATTERS
}

/// Whether `name` is a registered formatter
pub fn is_registered(name: &str) -> bool {
    FORMATTERS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_registered() {
        assert!(is_registered(DEFAULT_FORMATTER));
    }

    #[test]
    fn test_lookup_is_exact() {
        assert!(is_registered("csv-raw"));
        assert!(!is_registered("Table"));
        assert!(!is_registered("xml"));
    }
}
