//! Schema differ.
//!
//! Compares two schemas and produces the ordered, minimal sequence of
//! [`Action`]s that transforms the first into the second. Renames are never
//! detected: a renamed table or column comes out as a removal of the old
//! name plus an addition of the new one.

use std::collections::HashSet;

use crate::actions::Action;
use crate::schema::{Column, Key, Schema, Table};

/// Options for the differ.
#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    /// When set, a difference in the auto-increment flag alone does not
    /// produce a `ModifyColumn` action.
    pub ignore_auto_increment: bool,
}

/// Compares two schemas and produces change actions.
///
/// The emitted order is deterministic:
///
/// 1. `CreateTable` for destination-only tables, in destination order;
/// 2. `DropTable` for source-only tables, in source order;
/// 3. for each shared table (destination order): column additions and
///    modifications interleaved in destination declaration order, then
///    column removals in source order, then key removals, then key
///    additions.
///
/// Column actions always precede key actions for a table, so an added key
/// never references a column that does not exist yet. A key whose kind or
/// column list changed is emitted as a removal followed by an addition;
/// there is no in-place key modification.
#[derive(Debug, Clone, Default)]
pub struct Differ {
    options: DiffOptions,
}

impl Differ {
    /// Creates a differ with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a differ with the given options.
    #[must_use]
    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Returns the actions that transform `from` into `to`.
    ///
    /// Structurally identical elements produce no action; `diff(s, s)` is
    /// always empty.
    #[must_use]
    pub fn diff(&self, from: &Schema, to: &Schema) -> Vec<Action> {
        let mut actions = Vec::new();

        let from_names: HashSet<&str> = from.table_names().collect();
        let to_names: HashSet<&str> = to.table_names().collect();

        for table in &to.tables {
            if !from_names.contains(table.name.as_str()) {
                actions.push(Action::CreateTable {
                    table: table.clone(),
                });
            }
        }

        for table in &from.tables {
            if !to_names.contains(table.name.as_str()) {
                actions.push(Action::DropTable {
                    name: table.name.clone(),
                });
            }
        }

        for to_table in &to.tables {
            if let Some(from_table) = from.get_table(&to_table.name) {
                self.diff_table(from_table, to_table, &mut actions);
            }
        }

        tracing::debug!(actions = actions.len(), "diffed schemas");
        actions
    }

    /// Emits the per-table actions for a table present on both sides.
    fn diff_table(&self, from: &Table, to: &Table, actions: &mut Vec<Action>) {
        let table = &to.name;

        // Additions and modifications, destination declaration order.
        for column in &to.columns {
            match from.get_column(&column.name) {
                None => actions.push(Action::AddColumn {
                    table: table.clone(),
                    column: column.clone(),
                }),
                Some(from_column) if !self.columns_equal(from_column, column) => {
                    actions.push(Action::ModifyColumn {
                        table: table.clone(),
                        column: column.clone(),
                    });
                }
                Some(_) => {}
            }
        }

        // Removals, source declaration order.
        for column in &from.columns {
            if to.get_column(&column.name).is_none() {
                actions.push(Action::RemoveColumn {
                    table: table.clone(),
                    column: column.name.clone(),
                });
            }
        }

        // Key removals before key additions: a changed key becomes a
        // remove-then-add pair.
        for key in &from.keys {
            let keep = to.get_key(&key.name).is_some_and(|to_key| keys_equal(key, to_key));
            if !keep {
                actions.push(Action::RemoveKey {
                    table: table.clone(),
                    key: key.name.clone(),
                });
            }
        }
        for key in &to.keys {
            let unchanged = from
                .get_key(&key.name)
                .is_some_and(|from_key| keys_equal(from_key, key));
            if !unchanged {
                actions.push(Action::AddKey {
                    table: table.clone(),
                    key: key.clone(),
                });
            }
        }
    }

    /// Structural column equality, honoring the auto-increment toggle.
    fn columns_equal(&self, a: &Column, b: &Column) -> bool {
        a.column_type == b.column_type
            && a.nullable == b.nullable
            && a.default == b.default
            && (self.options.ignore_auto_increment || a.auto_increment == b.auto_increment)
    }
}

/// Structural key equality: kind and ordered column list.
fn keys_equal(a: &Key, b: &Key) -> bool {
    a.kind == b.kind && a.columns == b.columns
}
