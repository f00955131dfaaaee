//! The connection seam between the exporter and the database engine.
//!
//! Everything above this trait (catalog reader, exporter) is engine-agnostic
//! and is driven by plain SQL text. The Firebird implementation lives in
//! [`crate::source::firebird`]; tests use an in-memory scripted connection.

use async_trait::async_trait;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

use crate::error::Result;

use super::value::SqlValue;

/// One result row, values in select-list order.
pub type Row = Vec<SqlValue>;

/// An open database connection.
///
/// The export runs strictly sequentially on one connection, so futures
/// returned here are not required to be `Send`.
#[async_trait(?Send)]
pub trait Connection {
    /// Run a query and return every row.
    async fn query(&mut self, sql: &str) -> Result<Vec<Row>>;

    /// Release the connection. Calling it again after a successful close is a
    /// no-op.
    fn close(&mut self) -> Result<()>;

    /// Get the database type.
    fn db_type(&self) -> &str;
}

/// Owns a [`Connection`] and guarantees it is released exactly once.
///
/// Call [`ConnectionGuard::close`] on the normal path to observe close errors;
/// on every other path (early return, `?`, panic) `Drop` releases it.
pub struct ConnectionGuard<C: Connection> {
    conn: C,
    closed: bool,
}

impl<C: Connection> ConnectionGuard<C> {
    /// Take ownership of an open connection.
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            closed: false,
        }
    }

    /// Close the connection now.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing {} connection", self.conn.db_type());
        self.conn.close()
    }
}

impl<C: Connection> Deref for ConnectionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.conn
    }
}

impl<C: Connection> DerefMut for ConnectionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.conn
    }
}

impl<C: Connection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!("Failed to close connection: {}", e);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::ScriptedConnection;
    use super::*;

    #[test]
    fn test_guard_closes_once_on_explicit_close() {
        let conn = ScriptedConnection::new();
        let closes = conn.closes.clone();

        let guard = ConnectionGuard::new(conn);
        guard.close().unwrap();

        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_guard_closes_on_drop() {
        let conn = ScriptedConnection::new();
        let closes = conn.closes.clone();

        {
            let _guard = ConnectionGuard::new(conn);
        }

        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_guard_closes_on_panic() {
        let conn = ScriptedConnection::new();
        let closes = conn.closes.clone();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = ConnectionGuard::new(conn);
            panic!("export blew up");
        }));

        assert!(result.is_err());
        assert_eq!(closes.get(), 1);
    }

    #[tokio::test]
    async fn test_guard_derefs_to_connection() {
        let conn = ScriptedConnection::new().on("RDB$DATABASE", vec![vec![SqlValue::I32(1)]]);
        let mut guard = ConnectionGuard::new(conn);

        let rows = guard.query("SELECT 1 FROM RDB$DATABASE").await.unwrap();
        assert_eq!(rows, vec![vec![SqlValue::I32(1)]]);
        assert_eq!(guard.db_type(), "scripted");
    }
}
