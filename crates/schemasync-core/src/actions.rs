//! Schema-change actions.
//!
//! The differ produces a sequence of these; the filter selects a subset and
//! the renderer turns each one into a statement. Actions own their data —
//! table, column, and key values are cloned out of the destination schema —
//! so they outlive the schemas that produced them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::schema::{Column, Key, Table};

/// One atomic schema-change instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Create a table, carrying its full definition.
    CreateTable {
        /// The destination table definition.
        table: Table,
    },

    /// Drop a table.
    DropTable {
        /// Table name.
        name: String,
    },

    /// Add a column to a table.
    AddColumn {
        /// Table name.
        table: String,
        /// The destination column definition.
        column: Column,
    },

    /// Remove a column from a table.
    RemoveColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// Change a column to its destination definition.
    ModifyColumn {
        /// Table name.
        table: String,
        /// The destination column definition.
        column: Column,
    },

    /// Add a key to a table.
    AddKey {
        /// Table name.
        table: String,
        /// The destination key definition.
        key: Key,
    },

    /// Remove a key from a table.
    RemoveKey {
        /// Table name.
        table: String,
        /// Key name.
        key: String,
    },
}

impl Action {
    /// Returns the coarse kind this action maps to for filtering.
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::CreateTable { .. } => ActionKind::Create,
            Self::DropTable { .. } => ActionKind::Drop,
            Self::AddColumn { .. } | Self::AddKey { .. } => ActionKind::Add,
            Self::ModifyColumn { .. } => ActionKind::Modify,
            Self::RemoveColumn { .. } | Self::RemoveKey { .. } => ActionKind::Remove,
        }
    }

    /// Returns the name of the table this action targets.
    #[must_use]
    pub fn table_name(&self) -> &str {
        match self {
            Self::CreateTable { table } => &table.name,
            Self::DropTable { name } => name,
            Self::AddColumn { table, .. }
            | Self::RemoveColumn { table, .. }
            | Self::ModifyColumn { table, .. }
            | Self::AddKey { table, .. }
            | Self::RemoveKey { table, .. } => table,
        }
    }

    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateTable { table } => format!("Create table '{}'", table.name),
            Self::DropTable { name } => format!("Drop table '{name}'"),
            Self::AddColumn { table, column } => {
                format!("Add column '{}' to table '{table}'", column.name)
            }
            Self::RemoveColumn { table, column } => {
                format!("Remove column '{column}' from table '{table}'")
            }
            Self::ModifyColumn { table, column } => {
                format!("Modify column '{}' in table '{table}'", column.name)
            }
            Self::AddKey { table, key } => {
                format!("Add key '{}' to table '{table}'", key.name)
            }
            Self::RemoveKey { table, key } => {
                format!("Remove key '{key}' from table '{table}'")
            }
        }
    }
}

/// The coarse action taxonomy used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// `CreateTable`.
    Create,
    /// `DropTable`.
    Drop,
    /// `AddColumn` and `AddKey`.
    Add,
    /// `ModifyColumn`.
    Modify,
    /// `RemoveColumn` and `RemoveKey`.
    Remove,
}

impl ActionKind {
    /// All kinds, in a fixed order.
    pub const ALL: [Self; 5] = [Self::Create, Self::Drop, Self::Add, Self::Modify, Self::Remove];
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "drop" => Ok(Self::Drop),
            "add" => Ok(Self::Add),
            "modify" => Ok(Self::Modify),
            "remove" => Ok(Self::Remove),
            _ => Err(format!(
                "unknown action kind '{s}' (expected create, drop, add, modify, or remove)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, KeyKind};

    #[test]
    fn test_kind_mapping() {
        let column = Column::new("a", ColumnType::new("int"));
        let key = Key::new("k", KeyKind::Index, vec!["a".to_string()]);

        assert_eq!(Action::CreateTable { table: Table::new("t") }.kind(), ActionKind::Create);
        assert_eq!(Action::DropTable { name: "t".into() }.kind(), ActionKind::Drop);
        assert_eq!(
            Action::AddColumn { table: "t".into(), column: column.clone() }.kind(),
            ActionKind::Add
        );
        assert_eq!(
            Action::AddKey { table: "t".into(), key }.kind(),
            ActionKind::Add
        );
        assert_eq!(
            Action::ModifyColumn { table: "t".into(), column }.kind(),
            ActionKind::Modify
        );
        assert_eq!(
            Action::RemoveColumn { table: "t".into(), column: "a".into() }.kind(),
            ActionKind::Remove
        );
        assert_eq!(
            Action::RemoveKey { table: "t".into(), key: "k".into() }.kind(),
            ActionKind::Remove
        );
    }

    #[test]
    fn test_kind_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ActionKind::Create).unwrap(), "\"create\"");
        assert_eq!(
            serde_json::from_str::<ActionKind>("\"remove\"").unwrap(),
            ActionKind::Remove
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("create".parse::<ActionKind>(), Ok(ActionKind::Create));
        assert_eq!("MODIFY".parse::<ActionKind>(), Ok(ActionKind::Modify));
        assert!("rename".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_description() {
        let action = Action::RemoveColumn {
            table: "user".into(),
            column: "modified".into(),
        };
        assert_eq!(action.description(), "Remove column 'modified' from table 'user'");
    }
}
