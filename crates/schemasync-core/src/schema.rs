//! Structural schema representation.
//!
//! These types describe the shape of a database schema after parsing:
//! tables, columns, keys, and opaque table options. They are built once per
//! parse and never mutated afterwards; the differ only reads them.
//!
//! Comparison is structural: all type information is normalized on
//! construction (see [`ColumnType::new`]) so that two declarations that
//! differ only in casing, spacing, or dialect-insignificant display widths
//! compare equal.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Normalized column type descriptor.
///
/// The base name is stored lowercase. Aliases are folded
/// (`integer` → `int`, `bool`/`boolean` → `tinyint(1)`) and integer types
/// without an explicit display width receive the MySQL default so that
/// `BIGINT UNSIGNED` and `bigint(20) unsigned` compare equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnType {
    /// Lowercase base type name (e.g. "varchar").
    pub base: String,
    /// Length or precision, if any.
    pub length: Option<u32>,
    /// Scale for decimal types.
    pub scale: Option<u32>,
    /// Whether the type is unsigned.
    pub unsigned: bool,
    /// Collation, if declared on the column.
    pub collation: Option<String>,
}

impl ColumnType {
    /// Creates a normalized type descriptor from a raw type name.
    #[must_use]
    pub fn new(base: impl AsRef<str>) -> Self {
        let mut base = base.as_ref().to_ascii_lowercase();
        let mut length = None;

        match base.as_str() {
            "integer" => base = "int".to_string(),
            "bool" | "boolean" => {
                base = "tinyint".to_string();
                length = Some(1);
            }
            _ => {}
        }

        let mut ty = Self {
            base,
            length,
            scale: None,
            unsigned: false,
            collation: None,
        };
        ty.fill_default_length();
        ty
    }

    /// Sets the length/precision.
    #[must_use]
    pub fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the decimal scale.
    #[must_use]
    pub fn scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Marks the type as unsigned.
    #[must_use]
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Sets the collation.
    #[must_use]
    pub fn collation(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    /// Fills in the MySQL default display width for integer types so that
    /// declarations with and without an explicit width compare equal.
    fn fill_default_length(&mut self) {
        if self.length.is_some() {
            return;
        }
        self.length = match self.base.as_str() {
            "tinyint" => Some(3),
            "smallint" => Some(6),
            "mediumint" => Some(9),
            "int" => Some(11),
            "bigint" => Some(20),
            _ => None,
        };
    }

    /// Renders the type as SQL (uppercase base name).
    #[must_use]
    pub fn to_sql(&self) -> String {
        let mut sql = self.base.to_ascii_uppercase();
        if let Some(length) = self.length {
            match self.scale {
                Some(scale) => sql.push_str(&format!("({length},{scale})")),
                None => sql.push_str(&format!("({length})")),
            }
        }
        if self.unsigned {
            sql.push_str(" UNSIGNED");
        }
        if let Some(ref collation) = self.collation {
            sql.push_str(" COLLATE ");
            sql.push_str(collation);
        }
        sql
    }
}

/// Default value for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    /// NULL default.
    Null,
    /// Integer default.
    Integer(i64),
    /// Float default.
    Float(f64),
    /// String default.
    String(String),
    /// SQL expression (e.g. "CURRENT_TIMESTAMP(6)").
    Expression(String),
}

impl DefaultValue {
    /// Returns the SQL representation of this default value.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::String(s) => format!("'{}'", s.replace('\'', "''")),
            Self::Expression(expr) => expr.clone(),
        }
    }
}

/// Schema definition for a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Normalized type descriptor.
    pub column_type: ColumnType,
    /// Whether the column allows NULL. Defaults to `false`: a column is
    /// NOT NULL unless the definition explicitly says `NULL`.
    pub nullable: bool,
    /// Default value, if declared.
    pub default: Option<DefaultValue>,
    /// Whether the column auto-increments.
    pub auto_increment: bool,
}

impl Column {
    /// Creates a new column.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
            auto_increment: false,
        }
    }

    /// Marks the column as nullable.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Marks the column as auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
}

/// Kind of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyKind {
    /// The table's primary key.
    Primary,
    /// A unique key.
    Unique,
    /// A plain (non-unique) index.
    Index,
}

/// Schema definition for a key (primary key, unique key, or plain index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Key name. A primary key carries the reserved name
    /// [`Key::PRIMARY_NAME`] instead of a user name.
    pub name: String,
    /// Key kind.
    pub kind: KeyKind,
    /// Ordered referenced column names.
    pub columns: Vec<String>,
}

impl Key {
    /// Reserved name carried by every primary key.
    pub const PRIMARY_NAME: &'static str = "PRIMARY";

    /// Creates a new named key.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: KeyKind, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            columns,
        }
    }

    /// Creates a primary key over the given columns.
    #[must_use]
    pub fn primary(columns: Vec<String>) -> Self {
        Self::new(Self::PRIMARY_NAME, KeyKind::Primary, columns)
    }

    /// Creates a unique key.
    #[must_use]
    pub fn unique(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self::new(name, KeyKind::Unique, columns)
    }

    /// Creates a plain index.
    #[must_use]
    pub fn index(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self::new(name, KeyKind::Index, columns)
    }
}

/// An opaque table option (storage engine, character set, ...).
///
/// Options are compared by name/value equality only and re-rendered verbatim
/// in `CREATE TABLE` output; they are never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOption {
    /// Uppercased option name.
    pub name: String,
    /// Raw option value.
    pub value: String,
}

impl TableOption {
    /// Creates a new table option.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Structural definition of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,
    /// Columns in declaration order. Order is preserved for rendering and
    /// used as the deterministic tie-break when diffing, never for equality.
    pub columns: Vec<Column>,
    /// Keys in declaration order.
    pub keys: Vec<Key>,
    /// Table options in declaration order.
    pub options: Vec<TableOption>,
    /// Whether the source text carried an `IF NOT EXISTS` guard.
    pub if_not_exists: bool,
}

impl Table {
    /// Creates a new empty table.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            keys: Vec::new(),
            options: Vec::new(),
            if_not_exists: false,
        }
    }

    /// Adds a column.
    #[must_use]
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a key.
    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        self.keys.push(key);
        self
    }

    /// Adds a table option.
    #[must_use]
    pub fn option(mut self, option: TableOption) -> Self {
        self.options.push(option);
        self
    }

    /// Gets a column by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Gets a key by name.
    #[must_use]
    pub fn get_key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Checks the table invariants: unique column names, unique key names,
    /// at most one primary key.
    pub fn validate(&self) -> Result<()> {
        for (i, column) in self.columns.iter().enumerate() {
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(SyncError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        for (i, key) in self.keys.iter().enumerate() {
            if self.keys[..i].iter().any(|k| k.name == key.name) {
                return Err(SyncError::DuplicateKey {
                    table: self.name.clone(),
                    key: key.name.clone(),
                });
            }
        }
        if self.keys.iter().filter(|k| k.kind == KeyKind::Primary).count() > 1 {
            return Err(SyncError::MultiplePrimaryKeys(self.name.clone()));
        }
        Ok(())
    }
}

/// A full schema: every table definition extracted from one input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Tables in declaration order.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table.
    #[must_use]
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Gets a table by name.
    #[must_use]
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Returns table names in declaration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Checks the schema invariants: unique table names, and every table's
    /// own invariants.
    pub fn validate(&self) -> Result<()> {
        for (i, table) in self.tables.iter().enumerate() {
            if self.tables[..i].iter().any(|t| t.name == table.name) {
                return Err(SyncError::DuplicateTable(table.name.clone()));
            }
            table.validate()?;
        }
        Ok(())
    }
}
