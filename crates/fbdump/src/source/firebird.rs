//! Firebird connection over the pure-Rust wire protocol.
//!
//! No client library is needed on the host; `rsfbclient` speaks the remote
//! protocol directly, so the server must be reachable over TCP.

use async_trait::async_trait;
use rsfbclient::prelude::*;
use rsfbclient::{charset, Charset, FbError, SimpleConnection, SqlType};
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::core::{Connection, Row, SqlValue};
use crate::error::{DumpError, Result};

/// A single Firebird attachment.
pub struct FirebirdConnection {
    conn: Option<SimpleConnection>,
    target: String,
}

/// Open a connection using the configured credentials.
pub async fn connect(config: &SourceConfig) -> Result<FirebirdConnection> {
    let target = config.describe();
    info!("Connecting to {}", target);

    let charset = resolve_charset(&config.charset)?;

    let conn: SimpleConnection = rsfbclient::builder_pure_rust()
        .host(config.host.as_str())
        .port(config.port)
        .db_name(config.database.as_str())
        .user(config.user.as_str())
        .pass(config.password.as_str())
        .charset(charset)
        .connect()
        .map_err(|e| {
            DumpError::connection(
                format!("Failed to establish database connection: {}", e),
                format!(
                    "connecting to {}; check the DATABASE, USER and PASSWORD variables",
                    target
                ),
            )
        })?
        .into();

    info!("Connected to Firebird: {}:{}/{}", config.host, config.port, config.database);

    Ok(FirebirdConnection {
        conn: Some(conn),
        target,
    })
}

/// Map a Firebird character set name to the driver's charset.
fn resolve_charset(name: &str) -> Result<Charset> {
    match name.trim().to_uppercase().as_str() {
        "UTF8" | "UTF-8" => Ok(charset::UTF_8),
        "ISO8859_1" | "LATIN1" => Ok(charset::ISO_8859_1),
        "WIN1252" => Ok(charset::WIN_1252),
        other => Err(DumpError::Config(format!(
            "unsupported charset '{}' (expected UTF8, ISO8859_1 or WIN1252)",
            other
        ))),
    }
}

/// Convert a driver value into a [`SqlValue`].
fn from_driver(value: SqlType) -> SqlValue {
    match value {
        SqlType::Null => SqlValue::Null,
        SqlType::Boolean(b) => SqlValue::Bool(b),
        SqlType::Integer(i) => SqlValue::I64(i),
        SqlType::Floating(f) => SqlValue::F64(f),
        SqlType::Text(s) => SqlValue::String(s),
        SqlType::Binary(b) => SqlValue::Bytes(b),
        SqlType::Timestamp(ts) => SqlValue::DateTime(ts),
    }
}

#[async_trait(?Send)]
impl Connection for FirebirdConnection {
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>> {
        let conn = self
            .conn
            .as_mut()
            .ok_or_else(|| DumpError::Query(format!("connection to {} is closed", self.target)))?;

        let rows: Vec<rsfbclient::Row> = conn
            .query(sql, ())
            .map_err(|e: FbError| DumpError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| row.cols.into_iter().map(|col| from_driver(col.value)).collect())
            .collect())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            debug!("Detaching from {}", self.target);
            conn.close()
                .map_err(|e| DumpError::connection(e.to_string(), "closing connection"))?;
        }
        Ok(())
    }

    fn db_type(&self) -> &str {
        "firebird"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_resolve_charset() {
        assert!(resolve_charset("utf8").is_ok());
        assert!(resolve_charset("UTF-8").is_ok());
        assert!(resolve_charset("WIN1252").is_ok());
        assert!(matches!(resolve_charset("KOI8R"), Err(DumpError::Config(_))));
    }

    #[tokio::test]
    async fn test_connect_refused_is_connection_error() {
        let config = SourceConfig {
            host: "127.0.0.1".into(),
            port: 1,
            database: "employee".into(),
            user: "SYSDBA".into(),
            password: "masterkey".into(),
            ..Default::default()
        };

        let err = match connect(&config).await {
            Ok(_) => panic!("nothing listens on port 1"),
            Err(e) => e,
        };
        assert!(matches!(err, DumpError::Connection { .. }));
        assert!(!err.to_string().contains("masterkey"));
    }

    #[test]
    fn test_from_driver() {
        assert_eq!(from_driver(SqlType::Null), SqlValue::Null);
        assert_eq!(from_driver(SqlType::Integer(5)), SqlValue::I64(5));
        assert_eq!(from_driver(SqlType::Text("x".into())), SqlValue::from("x"));

        let ts = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(from_driver(SqlType::Timestamp(ts)), SqlValue::DateTime(ts));
    }
}
