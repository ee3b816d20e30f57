//! Error types for the schema sync pipeline.

/// Errors that can occur while parsing or comparing schemas.
///
/// Every error is fatal to the call that produced it: no partial schema and
/// no partial diff is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// The definition text could not be matched to the expected grammar.
    #[error("parse error at byte {offset}: {message}")]
    Parse {
        /// Error message.
        message: String,
        /// Byte offset into the input where the error was detected.
        offset: usize,
    },

    /// A syntactically valid construct the structural model does not cover.
    #[error("unsupported construct at byte {offset}: {construct}")]
    Unsupported {
        /// The offending construct (e.g. "FOREIGN KEY").
        construct: String,
        /// Byte offset into the input.
        offset: usize,
    },

    /// Two tables with the same name in one schema.
    #[error("duplicate table '{0}'")]
    DuplicateTable(String),

    /// Two columns with the same name in one table.
    #[error("duplicate column '{column}' in table '{table}'")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Two keys with the same name in one table.
    #[error("duplicate key '{key}' in table '{table}'")]
    DuplicateKey {
        /// Table name.
        table: String,
        /// Key name.
        key: String,
    },

    /// More than one primary key declared for one table.
    #[error("multiple primary keys in table '{0}'")]
    MultiplePrimaryKeys(String),
}

/// Result type for schema sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
