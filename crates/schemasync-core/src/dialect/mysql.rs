//! MySQL dialect.

use crate::actions::Action;
use crate::schema::{Column, Key, KeyKind, Table};

use super::{CreateGuard, Dialect, RenderOptions};

/// MySQL statement renderer.
#[derive(Debug, Clone, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Creates a new MySQL dialect.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generates a full `CREATE TABLE` statement: columns in declaration
    /// order, then keys, then table options.
    fn create_table_sql(&self, table: &Table, options: &RenderOptions) -> String {
        let guarded = match options.create_guard {
            CreateGuard::Inherit => table.if_not_exists,
            CreateGuard::ForceOn => true,
            CreateGuard::ForceOff => false,
        };

        let mut sql = String::from("CREATE TABLE ");
        if guarded {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote_identifier(&table.name));
        sql.push_str(" (\n  ");

        let mut clauses: Vec<String> = table
            .columns
            .iter()
            .map(|c| self.column_definition(c, options))
            .collect();
        clauses.extend(table.keys.iter().map(|k| self.key_definition(k)));
        sql.push_str(&clauses.join(",\n  "));
        sql.push_str("\n)");

        for option in &table.options {
            sql.push(' ');
            sql.push_str(&option.name);
            sql.push('=');
            sql.push_str(&option.value);
        }

        sql
    }

    fn drop_table_sql(&self, name: &str) -> String {
        format!("DROP TABLE {}", self.quote_identifier(name))
    }

    fn add_column_sql(&self, table: &str, column: &Column, options: &RenderOptions) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.quote_identifier(table),
            self.column_definition(column, options)
        )
    }

    fn remove_column_sql(&self, table: &str, column: &str) -> String {
        format!(
            "ALTER TABLE {} DROP {}",
            self.quote_identifier(table),
            self.quote_identifier(column)
        )
    }

    fn modify_column_sql(&self, table: &str, column: &Column, options: &RenderOptions) -> String {
        format!(
            "ALTER TABLE {} MODIFY {}",
            self.quote_identifier(table),
            self.column_definition(column, options)
        )
    }

    fn add_key_sql(&self, table: &str, key: &Key) -> String {
        format!(
            "ALTER TABLE {} ADD {}",
            self.quote_identifier(table),
            self.key_definition(key)
        )
    }

    /// Dropping the primary key uses the dedicated form; everything else is
    /// `DROP INDEX`.
    fn remove_key_sql(&self, table: &str, key: &str) -> String {
        if key == Key::PRIMARY_NAME {
            format!("ALTER TABLE {} DROP PRIMARY KEY", self.quote_identifier(table))
        } else {
            format!(
                "ALTER TABLE {} DROP INDEX {}",
                self.quote_identifier(table),
                self.quote_identifier(key)
            )
        }
    }

    fn key_columns_sql(&self, key: &Key) -> String {
        let quoted: Vec<String> = key
            .columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect();
        format!("({})", quoted.join(", "))
    }
}

impl Dialect for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn statement(&self, action: &Action, options: &RenderOptions) -> String {
        match action {
            Action::CreateTable { table } => self.create_table_sql(table, options),
            Action::DropTable { name } => self.drop_table_sql(name),
            Action::AddColumn { table, column } => self.add_column_sql(table, column, options),
            Action::RemoveColumn { table, column } => self.remove_column_sql(table, column),
            Action::ModifyColumn { table, column } => {
                self.modify_column_sql(table, column, options)
            }
            Action::AddKey { table, key } => self.add_key_sql(table, key),
            Action::RemoveKey { table, key } => self.remove_key_sql(table, key),
        }
    }

    fn column_definition(&self, column: &Column, options: &RenderOptions) -> String {
        let mut parts = vec![
            self.quote_identifier(&column.name),
            column.column_type.to_sql(),
        ];

        // Nullability is always explicit so the output re-parses to the
        // same model.
        parts.push(if column.nullable { "NULL" } else { "NOT NULL" }.to_string());

        if let Some(ref default) = column.default {
            parts.push(format!("DEFAULT {}", default.to_sql()));
        }

        if column.auto_increment && !options.suppress_auto_increment {
            parts.push("AUTO_INCREMENT".to_string());
        }

        parts.join(" ")
    }

    fn key_definition(&self, key: &Key) -> String {
        match key.kind {
            KeyKind::Primary => format!("PRIMARY KEY {}", self.key_columns_sql(key)),
            KeyKind::Unique => format!(
                "UNIQUE KEY {} {}",
                self.quote_identifier(&key.name),
                self.key_columns_sql(key)
            ),
            KeyKind::Index => format!(
                "KEY {} {}",
                self.quote_identifier(&key.name),
                self.key_columns_sql(key)
            ),
        }
    }

    fn quote_identifier(&self, name: &str) -> String {
        format!("`{}`", name.replace('`', "``"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, DefaultValue, TableOption};

    fn dialect() -> MysqlDialect {
        MysqlDialect::new()
    }

    fn defaults() -> RenderOptions {
        RenderOptions::default()
    }

    fn user_table() -> Table {
        Table::new("user")
            .column(
                Column::new("id", ColumnType::new("bigint").unsigned()).auto_increment(),
            )
            .column(Column::new("email", ColumnType::new("varchar").length(255)))
            .key(Key::primary(vec!["id".to_string()]))
            .key(Key::unique("email", vec!["email".to_string()]))
            .option(TableOption::new("ENGINE", "InnoDB"))
            .option(TableOption::new("CHARSET", "utf8mb4"))
    }

    #[test]
    fn test_create_table() {
        let action = Action::CreateTable { table: user_table() };
        assert_eq!(
            dialect().statement(&action, &defaults()),
            "CREATE TABLE `user` (\n  \
             `id` BIGINT(20) UNSIGNED NOT NULL AUTO_INCREMENT,\n  \
             `email` VARCHAR(255) NOT NULL,\n  \
             PRIMARY KEY (`id`),\n  \
             UNIQUE KEY `email` (`email`)\n\
             ) ENGINE=InnoDB CHARSET=utf8mb4"
        );
    }

    #[test]
    fn test_create_guard_policies() {
        let action = Action::CreateTable { table: user_table() };

        let forced = RenderOptions {
            create_guard: CreateGuard::ForceOn,
            ..Default::default()
        };
        assert!(dialect()
            .statement(&action, &forced)
            .starts_with("CREATE TABLE IF NOT EXISTS `user`"));

        // Inherit: the table was parsed without a guard.
        assert!(dialect()
            .statement(&action, &defaults())
            .starts_with("CREATE TABLE `user`"));

        let mut guarded_table = user_table();
        guarded_table.if_not_exists = true;
        let guarded_action = Action::CreateTable { table: guarded_table };
        assert!(dialect()
            .statement(&guarded_action, &defaults())
            .starts_with("CREATE TABLE IF NOT EXISTS `user`"));

        let off = RenderOptions {
            create_guard: CreateGuard::ForceOff,
            ..Default::default()
        };
        assert!(dialect()
            .statement(&guarded_action, &off)
            .starts_with("CREATE TABLE `user`"));
    }

    #[test]
    fn test_add_and_modify_column() {
        let column = Column::new("test", ColumnType::new("bool"));
        let add = Action::AddColumn {
            table: "user".into(),
            column: column.clone(),
        };
        assert_eq!(
            dialect().statement(&add, &defaults()),
            "ALTER TABLE `user` ADD `test` TINYINT(1) NOT NULL"
        );

        let modify = Action::ModifyColumn {
            table: "user".into(),
            column: Column::new("email", ColumnType::new("varchar").length(128)).nullable(),
        };
        assert_eq!(
            dialect().statement(&modify, &defaults()),
            "ALTER TABLE `user` MODIFY `email` VARCHAR(128) NULL"
        );
    }

    #[test]
    fn test_remove_column() {
        let action = Action::RemoveColumn {
            table: "user".into(),
            column: "modified".into(),
        };
        assert_eq!(
            dialect().statement(&action, &defaults()),
            "ALTER TABLE `user` DROP `modified`"
        );
    }

    #[test]
    fn test_key_statements() {
        let add = Action::AddKey {
            table: "user".into(),
            key: Key::unique("email", vec!["email".to_string()]),
        };
        assert_eq!(
            dialect().statement(&add, &defaults()),
            "ALTER TABLE `user` ADD UNIQUE KEY `email` (`email`)"
        );

        let add_primary = Action::AddKey {
            table: "user".into(),
            key: Key::primary(vec!["id".to_string()]),
        };
        assert_eq!(
            dialect().statement(&add_primary, &defaults()),
            "ALTER TABLE `user` ADD PRIMARY KEY (`id`)"
        );

        let remove = Action::RemoveKey {
            table: "user".into(),
            key: "email".into(),
        };
        assert_eq!(
            dialect().statement(&remove, &defaults()),
            "ALTER TABLE `user` DROP INDEX `email`"
        );

        let remove_primary = Action::RemoveKey {
            table: "user".into(),
            key: Key::PRIMARY_NAME.into(),
        };
        assert_eq!(
            dialect().statement(&remove_primary, &defaults()),
            "ALTER TABLE `user` DROP PRIMARY KEY"
        );
    }

    #[test]
    fn test_suppress_auto_increment() {
        let column = Column::new("id", ColumnType::new("bigint")).auto_increment();
        let action = Action::AddColumn {
            table: "user".into(),
            column,
        };
        let suppressed = RenderOptions {
            suppress_auto_increment: true,
            ..Default::default()
        };
        assert_eq!(
            dialect().statement(&action, &suppressed),
            "ALTER TABLE `user` ADD `id` BIGINT(20) NOT NULL"
        );
    }

    #[test]
    fn test_default_value_rendered() {
        let column = Column::new("state", ColumnType::new("varchar").length(16))
            .default(DefaultValue::String("new".to_string()));
        assert_eq!(
            dialect().column_definition(&column, &defaults()),
            "`state` VARCHAR(16) NOT NULL DEFAULT 'new'"
        );
    }
}
