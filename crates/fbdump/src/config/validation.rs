//! Configuration validation.

use super::Config;
use crate::error::{DumpError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.source.database.trim().is_empty() {
        return Err(DumpError::Config(
            "source.database is required (set DATABASE)".into(),
        ));
    }
    if config.source.user.trim().is_empty() {
        return Err(DumpError::Config(
            "source.user is required (set USER)".into(),
        ));
    }
    if config.source.host.trim().is_empty() {
        return Err(DumpError::Config("source.host must not be empty".into()));
    }
    if config.source.port == 0 {
        return Err(DumpError::Config("source.port must be non-zero".into()));
    }
    if config.source.charset.trim().is_empty() {
        return Err(DumpError::Config("source.charset must not be empty".into()));
    }

    let excluded_everything = config
        .export
        .include_tables
        .iter()
        .all(|t| config.export.exclude_tables.iter().any(|e| e.eq_ignore_ascii_case(t)));
    if !config.export.include_tables.is_empty() && excluded_everything {
        return Err(DumpError::Config(
            "export.exclude_tables removes every table in export.include_tables".into(),
        ));
    }

    Ok(())
}
