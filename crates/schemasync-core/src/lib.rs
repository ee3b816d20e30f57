//! Compare two SQL table schemas and generate the statements that turn one
//! into the other.
//!
//! `schemasync-core` parses MySQL `CREATE TABLE` definitions into a
//! structural model, diffs two such models into an ordered set of change
//! actions, and renders the actions back into DDL statements. It never
//! connects to a database: text goes in, statements come out.
//!
//! # Architecture
//!
//! - **Schema** - passive structural model: tables, columns, keys, options
//! - **Parser** - definition text to a validated [`schema::Schema`]
//! - **Differ** - two schemas to an ordered sequence of [`actions::Action`]s
//! - **Filter** - allow-set over coarse action kinds
//! - **Dialect** - renders each action as one MySQL statement
//!
//! Renames are deliberately not detected: a renamed table or column comes
//! out as a drop of the old name plus a creation of the new one. That is
//! lossy for data, which is exactly why destructive kinds can be filtered
//! out via [`SyncOptions::allowed_actions`].
//!
//! # Example
//!
//! ```
//! use schemasync_core::prelude::*;
//!
//! let source = "CREATE TABLE `user` (`id` INT NOT NULL, PRIMARY KEY (`id`));";
//! let destination = "CREATE TABLE `user` (
//!     `id` INT NOT NULL PRIMARY KEY,
//!     `email` VARCHAR(255) NOT NULL
//! );";
//!
//! let script = sync(source, destination, &SyncOptions::default()).unwrap();
//! assert_eq!(script, "ALTER TABLE `user` ADD `email` VARCHAR(255) NOT NULL;");
//! ```

pub mod actions;
pub mod dialect;
pub mod differ;
pub mod error;
pub mod filter;
pub mod lexer;
pub mod parser;
pub mod schema;

use dialect::{Dialect, MysqlDialect, RenderOptions};
use differ::{DiffOptions, Differ};
use filter::filter_actions;
use parser::Parser;

pub use dialect::CreateGuard;
pub use error::{Result, SyncError};
pub use filter::AllowedActions;

/// Options for a [`sync`] run. All fields have defaults.
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Allow-set over coarse action kinds; defaults to all.
    pub allowed_actions: AllowedActions,
    /// Omit `AUTO_INCREMENT` from rendered column definitions.
    pub suppress_auto_increment: bool,
    /// Existence-guard policy for rendered `CREATE TABLE` statements.
    pub create_guard: CreateGuard,
    /// Do not treat an auto-increment difference alone as a column change.
    pub ignore_auto_increment_in_diff: bool,
}

/// Generates the statements that transform the `source` schema into the
/// `destination` schema, as an ordered list (one statement per entry,
/// without terminators).
///
/// # Errors
///
/// Returns a [`SyncError`] if either input fails to parse or violates a
/// model invariant. Errors are fatal: no partial result is returned.
pub fn sync_statements(
    source: &str,
    destination: &str,
    options: &SyncOptions,
) -> Result<Vec<String>> {
    let from = Parser::new(source).parse_schema()?;
    let to = Parser::new(destination).parse_schema()?;

    let differ = Differ::with_options(DiffOptions {
        ignore_auto_increment: options.ignore_auto_increment_in_diff,
    });
    let actions = filter_actions(differ.diff(&from, &to), &options.allowed_actions);

    let dialect = MysqlDialect::new();
    let render = RenderOptions {
        suppress_auto_increment: options.suppress_auto_increment,
        create_guard: options.create_guard,
    };
    Ok(actions
        .iter()
        .map(|action| dialect.statement(action, &render))
        .collect())
}

/// Like [`sync_statements`], but joins the statements into one script with
/// `;` terminators. Returns an empty string when the schemas already match.
///
/// # Errors
///
/// Same as [`sync_statements`].
pub fn sync(source: &str, destination: &str, options: &SyncOptions) -> Result<String> {
    let statements = sync_statements(source, destination, options)?;
    if statements.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{};", statements.join(";\n")))
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::actions::{Action, ActionKind};
    pub use crate::dialect::{CreateGuard, Dialect, MysqlDialect, RenderOptions};
    pub use crate::differ::{DiffOptions, Differ};
    pub use crate::error::{Result, SyncError};
    pub use crate::filter::{filter_actions, AllowedActions};
    pub use crate::parser::Parser;
    pub use crate::schema::{
        Column, ColumnType, DefaultValue, Key, KeyKind, Schema, Table, TableOption,
    };
    pub use crate::{sync, sync_statements, SyncOptions};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_identical_inputs_is_empty() {
        let sql = "CREATE TABLE t (`a` int NOT NULL);";
        assert_eq!(sync(sql, sql, &SyncOptions::default()).unwrap(), "");
        assert!(sync_statements(sql, sql, &SyncOptions::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_sync_joins_with_terminators() {
        let source = "CREATE TABLE t (`a` int NOT NULL);";
        let destination = "CREATE TABLE t (`a` int NOT NULL, `b` int NOT NULL, `c` int NOT NULL);";
        let script = sync(source, destination, &SyncOptions::default()).unwrap();
        assert_eq!(
            script,
            "ALTER TABLE `t` ADD `b` INT(11) NOT NULL;\n\
             ALTER TABLE `t` ADD `c` INT(11) NOT NULL;"
        );
    }

    #[test]
    fn test_sync_propagates_parse_errors() {
        let err = sync("CREATE TABLE t (", "CREATE TABLE t (`a` int);", &SyncOptions::default())
            .unwrap_err();
        assert!(matches!(err, SyncError::Parse { .. }));
    }
}
