//! # fbdump
//!
//! Firebird schema and data export library.
//!
//! Reads the user tables of a Firebird database through its `RDB$` system
//! catalog and renders them as portable SQL text:
//!
//! - **Catalog reading** of tables and column definitions
//! - **Type mapping** from Firebird field type codes to SQL type names
//! - **Value coercion** into SQL literals (falsy values become NULL by default)
//! - **Statement building** for `CREATE TABLE` and `INSERT INTO`
//!
//! ## Example
//!
//! ```rust,no_run
//! use fbdump::{source, Config, Exporter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> fbdump::Result<()> {
//!     let config = Config::default().with_env()?;
//!     config.validate()?;
//!
//!     let conn = source::connect(&config.source).await?;
//!     let summary = Exporter::new(conn, config.export)
//!         .run(&mut std::io::stdout().lock())
//!         .await?;
//!     eprintln!("Exported {} rows", summary.rows_exported);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod source;
pub mod statement;
pub mod typemap;

// Re-exports for convenient access
pub use config::{Config, ExportConfig, SourceConfig};
pub use core::{coerce, coerce_with, ColumnDescriptor, Connection, NullPolicy, Relation, SqlValue};
pub use error::{DumpError, Result};
pub use export::{ExportSummary, Exporter};
pub use source::{connect, FirebirdConnection};
pub use statement::{build_create_table, build_insert, literal};
pub use typemap::map_type;
