//! Core types shared by the catalog reader, statement builder and exporter.
//!
//! - [`schema`]: relation and column metadata
//! - [`value`]: SQL values and literal coercion
//! - [`traits`]: the [`Connection`] seam and its scoped guard

pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use schema::{ColumnDescriptor, FieldMeta, Relation};
pub use traits::{Connection, ConnectionGuard, Row};
pub use value::{coerce, coerce_with, NullPolicy, SqlValue};
