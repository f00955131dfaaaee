//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::NullPolicy;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Source database configuration (Firebird).
    #[serde(default)]
    pub source: SourceConfig,

    /// Export behavior configuration.
    #[serde(default)]
    pub export: ExportConfig,
}

/// Source database (Firebird) configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Server host (default: "localhost").
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 3050).
    #[serde(default = "default_fb_port")]
    pub port: u16,

    /// Database path or alias on the server.
    #[serde(default)]
    pub database: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Connection character set (default: "UTF8").
    #[serde(default = "default_charset")]
    pub charset: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_fb_port(),
            database: String::new(),
            user: String::new(),
            password: String::new(),
            charset: default_charset(),
        }
    }
}

impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("charset", &self.charset)
            .finish()
    }
}

/// Export behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Emit CREATE TABLE for tables without rows (default: false).
    #[serde(default)]
    pub include_empty_tables: bool,

    /// How falsy values are coerced (default: truthiness).
    #[serde(default)]
    pub null_policy: NullPolicy,

    /// Only export these tables (case-insensitive). Empty means all.
    #[serde(default)]
    pub include_tables: Vec<String>,

    /// Never export these tables (case-insensitive).
    #[serde(default)]
    pub exclude_tables: Vec<String>,
}

impl ExportConfig {
    /// Check whether a table passes the include/exclude filters.
    pub fn wants_table(&self, name: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|t| t.eq_ignore_ascii_case(name));

        if listed(&self.exclude_tables) {
            return false;
        }
        self.include_tables.is_empty() || listed(&self.include_tables)
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_fb_port() -> u16 {
    3050
}

fn default_charset() -> String {
    "UTF8".to_string()
}
