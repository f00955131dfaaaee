//! Configuration loading and validation.
//!
//! Values come from an optional YAML file, overlaid by the process environment
//! (and a `.env` file in the working directory). Command-line overrides are
//! applied by the caller afterwards.

mod types;
mod validation;

pub use types::*;

use crate::error::{DumpError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Environment variable holding the database path or alias.
pub const ENV_DATABASE: &str = "DATABASE";
/// Environment variable holding the username.
pub const ENV_USER: &str = "USER";
/// Environment variable holding the password.
pub const ENV_PASSWORD: &str = "PASSWORD";
/// Environment variable holding the server host.
pub const ENV_HOST: &str = "HOST";
/// Environment variable holding the server port.
pub const ENV_PORT: &str = "PORT";
/// Environment variable holding the connection character set.
pub const ENV_CHARSET: &str = "CHARSET";
/// Firebird client username variable; wins over `USER`.
pub const ENV_ISC_USER: &str = "ISC_USER";
/// Firebird client password variable; wins over `PASSWORD`.
pub const ENV_ISC_PASSWORD: &str = "ISC_PASSWORD";

/// Keys where a `.env` value wins over the process environment. Login shells
/// always export `USER`, so the process value would otherwise shadow it.
const DOTENV_FIRST: [&str; 3] = [ENV_DATABASE, ENV_USER, ENV_PASSWORD];

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Only the document shape is checked here; call [`Config::validate`] once
    /// every override has been applied.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Overlay connection settings from the process environment and a `.env`
    /// file in the working directory.
    ///
    /// The process environment wins, except for `DATABASE`, `USER` and
    /// `PASSWORD` where the `.env` value is used when present.
    /// `ISC_USER`/`ISC_PASSWORD` win over both.
    pub fn with_env(self) -> Result<Self> {
        let dotenv = read_dotenv()?;
        self.with_env_from(|key| layered_lookup(key, &dotenv, |k| std::env::var(k).ok()))
    }

    /// Overlay connection settings from an arbitrary variable lookup.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(database) = lookup(ENV_DATABASE) {
            self.source.database = database;
        }
        if let Some(user) = lookup(ENV_ISC_USER).or_else(|| lookup(ENV_USER)) {
            self.source.user = user;
        }
        if let Some(password) = lookup(ENV_ISC_PASSWORD).or_else(|| lookup(ENV_PASSWORD)) {
            self.source.password = password;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.source.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.source.port = port.trim().parse().map_err(|_| {
                DumpError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port))
            })?;
        }
        if let Some(charset) = lookup(ENV_CHARSET) {
            self.source.charset = charset;
        }
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

/// Read `.env` from the working directory (or a parent) without touching the
/// process environment. A missing file is an empty set.
fn read_dotenv() -> Result<HashMap<String, String>> {
    let iter = match dotenvy::dotenv_iter() {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => return Err(DumpError::Config(format!("Failed to read .env: {}", e))),
    };
    let vars = iter
        .collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(|e| DumpError::Config(format!("Failed to parse .env: {}", e)))?;

    debug!("Loaded {} variables from .env", vars.len());
    Ok(vars)
}

/// Resolve one variable from the `.env` values and the process environment.
fn layered_lookup<F>(key: &str, dotenv: &HashMap<String, String>, process: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if DOTENV_FIRST.iter().any(|k| *k == key) {
        dotenv.get(key).cloned().or_else(|| process(key))
    } else {
        process(key).or_else(|| dotenv.get(key).cloned())
    }
}

impl SourceConfig {
    /// Human-readable connection target, safe to log.
    pub fn describe(&self) -> String {
        format!(
            "{}:{}/{} as user:{} password:[REDACTED]",
            self.host, self.port, self.database, self.user
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides_yaml() {
        let config = Config::from_yaml("source:\n  database: from_yaml.fdb\n  user: yaml_user\n")
            .unwrap()
            .with_env_from(lookup(&[(ENV_DATABASE, "/data/employee.fdb"), (ENV_PORT, "3051")]))
            .unwrap();

        assert_eq!(config.source.database, "/data/employee.fdb");
        assert_eq!(config.source.user, "yaml_user");
        assert_eq!(config.source.port, 3051);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let result = Config::default().with_env_from(lookup(&[(ENV_PORT, "fifty")]));
        assert!(matches!(result, Err(DumpError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source:").unwrap();
        writeln!(file, "  database: employee").unwrap();
        writeln!(file, "  user: SYSDBA").unwrap();
        writeln!(file, "export:").unwrap();
        writeln!(file, "  include_empty_tables: true").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.user, "SYSDBA");
        assert!(config.export.include_empty_tables);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(matches!(
            Config::from_yaml("source: [unclosed"),
            Err(DumpError::Yaml(_))
        ));
    }

    #[test]
    fn test_dotenv_credentials_win_over_shell() {
        let dotenv: HashMap<String, String> = [(ENV_USER, "SYSDBA"), (ENV_HOST, "dbhost")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let process = lookup(&[(ENV_USER, "root"), (ENV_HOST, "localhost")]);

        let config = Config::default()
            .with_env_from(|key| layered_lookup(key, &dotenv, &process))
            .unwrap();

        assert_eq!(config.source.user, "SYSDBA");
        assert_eq!(config.source.host, "localhost");
    }

    #[test]
    fn test_shell_user_used_without_dotenv() {
        let dotenv = HashMap::new();
        let process = lookup(&[(ENV_USER, "root")]);

        let config = Config::default()
            .with_env_from(|key| layered_lookup(key, &dotenv, &process))
            .unwrap();

        assert_eq!(config.source.user, "root");
    }

    #[test]
    fn test_isc_variables_win() {
        let config = Config::default()
            .with_env_from(lookup(&[
                (ENV_USER, "root"),
                (ENV_ISC_USER, "SYSDBA"),
                (ENV_PASSWORD, "secret"),
                (ENV_ISC_PASSWORD, "masterkey"),
            ]))
            .unwrap();

        assert_eq!(config.source.user, "SYSDBA");
        assert_eq!(config.source.password, "masterkey");
    }

    #[test]
    fn test_describe_hides_password() {
        let config = Config::default()
            .with_env_from(lookup(&[(ENV_PASSWORD, "masterkey"), (ENV_USER, "SYSDBA")]))
            .unwrap();
        let banner = config.source.describe();
        assert!(banner.contains("SYSDBA"));
        assert!(!banner.contains("masterkey"));
    }
}
