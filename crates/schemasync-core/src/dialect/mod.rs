//! Statement rendering.
//!
//! A dialect turns one [`Action`] into one statement string (no trailing
//! terminator; the caller adds it). Definitions are always reconstructed
//! from the structural model, never echoed from the original text, so the
//! parser's normalization shows in the output.

mod mysql;

pub use mysql::MysqlDialect;

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::schema::{Column, Key};

/// Policy for the `IF NOT EXISTS` guard on rendered `CREATE TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CreateGuard {
    /// Use whatever the destination's original text carried.
    #[default]
    Inherit,
    /// Always emit the guard.
    ForceOn,
    /// Never emit the guard.
    ForceOff,
}

/// Rendering options.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// When set, the auto-increment property is omitted from every rendered
    /// column definition even if present in the model.
    pub suppress_auto_increment: bool,
    /// Existence-guard policy for `CREATE TABLE`.
    pub create_guard: CreateGuard,
}

/// Trait for dialect-specific statement generation.
pub trait Dialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Renders a single action as one statement.
    fn statement(&self, action: &Action, options: &RenderOptions) -> String;

    /// Renders a column definition clause.
    fn column_definition(&self, column: &Column, options: &RenderOptions) -> String;

    /// Renders a key definition clause.
    fn key_definition(&self, key: &Key) -> String;

    /// Quotes an identifier.
    fn quote_identifier(&self, name: &str) -> String;
}
