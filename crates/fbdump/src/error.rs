//! Error types for the export library.

use thiserror::Error;

/// Exit code for configuration errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;

/// Exit code for a failed database connection.
pub const EXIT_CONNECTION_ERROR: u8 = 2;

/// Exit code for a table-level failure surfaced as fatal.
pub const EXIT_EXPORT_ERROR: u8 = 3;

/// Exit code for file and stream errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// Configuration error (missing variables, invalid YAML values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not open the database connection. Fatal for the whole run.
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// A query failed at the driver level
    #[error("Query failed: {0}")]
    Query(String),

    /// System catalog query failed (table listing or column description)
    #[error("Catalog query failed for {table}: {message}")]
    Catalog { table: String, message: String },

    /// Reading the rows of a table failed
    #[error("Dump failed for table {table}: {message}")]
    Dump { table: String, message: String },

    /// IO error (config file, output sink)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DumpError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(message: impl Into<String>, context: impl Into<String>) -> Self {
        DumpError::Connection {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a Catalog error
    pub fn catalog(table: impl Into<String>, message: impl Into<String>) -> Self {
        DumpError::Catalog {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create a Dump error
    pub fn dump(table: impl Into<String>, message: impl Into<String>) -> Self {
        DumpError::Dump {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Whether this error must stop the whole run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DumpError::Catalog { .. } | DumpError::Dump { .. })
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DumpError::Config(_) | DumpError::Yaml(_) | DumpError::Json(_) => EXIT_CONFIG_ERROR,
            DumpError::Connection { .. } => EXIT_CONNECTION_ERROR,
            DumpError::Query(_) | DumpError::Catalog { .. } | DumpError::Dump { .. } => {
                EXIT_EXPORT_ERROR
            }
            DumpError::Io(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, DumpError>;
