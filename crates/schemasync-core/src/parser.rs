//! Parser for table-definition text.
//!
//! Recursive descent over the token stream. The only top-level statement
//! accepted is `CREATE TABLE`; anything else is a parse error. There is no
//! recovery: the first malformed statement aborts the whole parse.
//!
//! Constructs the model does not cover are handled by a fixed policy:
//! foreign keys, named constraints, check constraints, and fulltext/spatial
//! keys are rejected with [`SyncError::Unsupported`]; column comments and
//! column-level character sets are consumed and dropped (they carry no
//! structure the differ compares).

use crate::error::{Result, SyncError};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::schema::{Column, ColumnType, DefaultValue, Key, Schema, Table, TableOption};

/// Parser for table-definition text.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self { lexer, current }
    }

    /// Parses the whole input into a validated [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Parse`] for malformed input,
    /// [`SyncError::Unsupported`] for unmodeled constructs, and the
    /// invariant-violation variants for duplicate names.
    pub fn parse_schema(mut self) -> Result<Schema> {
        self.check_lex_error()?;

        let mut schema = Schema::new();
        loop {
            while self.check(&TokenKind::Semicolon) {
                self.advance()?;
            }
            if self.check(&TokenKind::Eof) {
                break;
            }
            if !self.check_keyword(Keyword::Create) {
                return Err(self.error("expected CREATE TABLE statement"));
            }
            schema.tables.push(self.parse_create_table()?);
        }

        schema.validate()?;
        tracing::debug!(tables = schema.tables.len(), "parsed schema");
        Ok(schema)
    }

    // Token plumbing ---------------------------------------------------------

    /// Advances to the next token, surfacing lexer errors.
    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token();
        self.check_lex_error()
    }

    fn check_lex_error(&self) -> Result<()> {
        if let TokenKind::Error(ref message) = self.current.kind {
            return Err(SyncError::Parse {
                message: message.clone(),
                offset: self.current.span.start,
            });
        }
        Ok(())
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current.kind == *kind
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.kind == TokenKind::Keyword(keyword)
    }

    /// Consumes the keyword if present; returns whether it was.
    fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool> {
        if self.check_keyword(keyword) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.check_keyword(keyword) {
            return self.advance();
        }
        Err(self.error(format!("expected {keyword:?}, found {:?}", self.current.kind)))
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            return self.advance();
        }
        Err(self.error(format!("expected {kind:?}, found {:?}", self.current.kind)))
    }

    fn error(&self, message: impl Into<String>) -> SyncError {
        SyncError::Parse {
            message: message.into(),
            offset: self.current.span.start,
        }
    }

    fn unsupported(&self, construct: impl Into<String>, span: Span) -> SyncError {
        SyncError::Unsupported {
            construct: construct.into(),
            offset: span.start,
        }
    }

    /// Parses an identifier (plain or backtick-quoted).
    fn parse_identifier(&mut self) -> Result<String> {
        if let TokenKind::Identifier(ref name) = self.current.kind {
            let name = name.clone();
            self.advance()?;
            return Ok(name);
        }
        Err(self.error(format!("expected identifier, found {:?}", self.current.kind)))
    }

    // Statements -------------------------------------------------------------

    /// Parses one `CREATE TABLE` statement including its terminator.
    fn parse_create_table(&mut self) -> Result<Table> {
        self.expect_keyword(Keyword::Create)?;
        self.eat_keyword(Keyword::Temporary)?;
        self.expect_keyword(Keyword::Table)?;

        let mut if_not_exists = false;
        if self.eat_keyword(Keyword::If)? {
            self.expect_keyword(Keyword::Not)?;
            self.expect_keyword(Keyword::Exists)?;
            if_not_exists = true;
        }

        let mut name = self.parse_identifier()?;
        if self.check(&TokenKind::Dot) {
            // Database-qualified name: the qualifier is stripped so schemas
            // from different databases stay comparable.
            self.advance()?;
            name = self.parse_identifier()?;
        }

        let mut table = Table::new(name);
        table.if_not_exists = if_not_exists;

        self.expect(&TokenKind::LParen)?;
        loop {
            self.parse_body_item(&mut table)?;
            if self.check(&TokenKind::Comma) {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect(&TokenKind::RParen)?;

        self.parse_table_options(&mut table)?;

        if !self.check(&TokenKind::Semicolon) {
            return Err(self.error("unterminated statement: expected ';'"));
        }
        self.advance()?;

        Ok(table)
    }

    /// Parses one comma-separated item of the table body: a column
    /// definition or a key definition.
    fn parse_body_item(&mut self, table: &mut Table) -> Result<()> {
        let span = self.current.span;
        match self.current.kind {
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance()?;
                self.expect_keyword(Keyword::Key)?;
                let columns = self.parse_key_columns()?;
                table.keys.push(Key::primary(columns));
                Ok(())
            }
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance()?;
                if !self.eat_keyword(Keyword::Key)? {
                    self.eat_keyword(Keyword::Index)?;
                }
                let name = if matches!(self.current.kind, TokenKind::Identifier(_)) {
                    Some(self.parse_identifier()?)
                } else {
                    None
                };
                let columns = self.parse_key_columns()?;
                // An unnamed unique key is named after its first column,
                // matching the server's own naming.
                let name = name.unwrap_or_else(|| columns[0].clone());
                table.keys.push(Key::unique(name, columns));
                Ok(())
            }
            TokenKind::Keyword(Keyword::Key | Keyword::Index) => {
                self.advance()?;
                let name = self.parse_identifier()?;
                let columns = self.parse_key_columns()?;
                table.keys.push(Key::index(name, columns));
                Ok(())
            }
            TokenKind::Keyword(Keyword::Constraint) => Err(self.unsupported("CONSTRAINT", span)),
            TokenKind::Keyword(Keyword::Foreign) => Err(self.unsupported("FOREIGN KEY", span)),
            TokenKind::Keyword(Keyword::Check) => Err(self.unsupported("CHECK", span)),
            TokenKind::Keyword(Keyword::Fulltext) => Err(self.unsupported("FULLTEXT KEY", span)),
            TokenKind::Keyword(Keyword::Spatial) => Err(self.unsupported("SPATIAL KEY", span)),
            TokenKind::Identifier(_) => self.parse_column_def(table),
            _ => Err(self.error(format!(
                "expected column or key definition, found {:?}",
                self.current.kind
            ))),
        }
    }

    /// Parses the parenthesized column list of a key definition.
    ///
    /// Index prefix lengths (`name(10)`) are accepted and dropped; the model
    /// keys on column names only.
    fn parse_key_columns(&mut self) -> Result<Vec<String>> {
        self.expect(&TokenKind::LParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_identifier()?);
            if self.check(&TokenKind::LParen) {
                self.advance()?;
                if !matches!(self.current.kind, TokenKind::Number(_)) {
                    return Err(self.error("expected index prefix length"));
                }
                self.advance()?;
                self.expect(&TokenKind::RParen)?;
            }
            if self.check(&TokenKind::Comma) {
                self.advance()?;
                continue;
            }
            break;
        }
        self.expect(&TokenKind::RParen)?;
        Ok(columns)
    }

    /// Parses one column definition, including inline key markers.
    fn parse_column_def(&mut self, table: &mut Table) -> Result<()> {
        let name = self.parse_identifier()?;

        let base = self.parse_identifier()?;
        let mut column_type = ColumnType::new(base);
        if self.check(&TokenKind::LParen) {
            self.advance()?;
            column_type.length = Some(self.parse_length()?);
            if self.check(&TokenKind::Comma) {
                self.advance()?;
                column_type.scale = Some(self.parse_length()?);
            }
            self.expect(&TokenKind::RParen)?;
        }

        let mut nullable = false;
        let mut default = None;
        let mut auto_increment = false;

        loop {
            let span = self.current.span;
            match self.current.kind {
                TokenKind::Keyword(Keyword::Unsigned) => {
                    column_type.unsigned = true;
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::Not) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Null)?;
                    nullable = false;
                }
                TokenKind::Keyword(Keyword::Null) => {
                    nullable = true;
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::Default) => {
                    self.advance()?;
                    default = Some(self.parse_default_value()?);
                }
                TokenKind::Keyword(Keyword::AutoIncrement) => {
                    auto_increment = true;
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::Primary) => {
                    // Inline marker, equivalent to a PRIMARY KEY clause.
                    self.advance()?;
                    self.eat_keyword(Keyword::Key)?;
                    table.keys.push(Key::primary(vec![name.clone()]));
                }
                TokenKind::Keyword(Keyword::Unique) => {
                    // Inline marker; the key is named after the column.
                    self.advance()?;
                    self.eat_keyword(Keyword::Key)?;
                    table.keys.push(Key::unique(name.clone(), vec![name.clone()]));
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance()?;
                    column_type.collation = Some(self.parse_identifier()?);
                }
                TokenKind::Keyword(Keyword::Character) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Set)?;
                    self.parse_identifier()?;
                }
                TokenKind::Keyword(Keyword::Charset) => {
                    self.advance()?;
                    self.parse_identifier()?;
                }
                TokenKind::Keyword(Keyword::Comment) => {
                    self.advance()?;
                    if !matches!(self.current.kind, TokenKind::StringLit(_)) {
                        return Err(self.error("expected string after COMMENT"));
                    }
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::References) => {
                    return Err(self.unsupported("REFERENCES", span));
                }
                TokenKind::Keyword(Keyword::Check) => {
                    return Err(self.unsupported("CHECK", span));
                }
                TokenKind::Comma | TokenKind::RParen => break,
                _ => {
                    return Err(self.error(format!(
                        "unexpected token in definition of column '{name}': {:?}",
                        self.current.kind
                    )));
                }
            }
        }

        let mut column = Column::new(name, column_type);
        column.nullable = nullable;
        column.default = default;
        column.auto_increment = auto_increment;
        table.columns.push(column);
        Ok(())
    }

    fn parse_length(&mut self) -> Result<u32> {
        if let TokenKind::Number(ref raw) = self.current.kind {
            let value = raw
                .parse::<u32>()
                .map_err(|_| self.error(format!("invalid type length '{raw}'")))?;
            self.advance()?;
            return Ok(value);
        }
        Err(self.error(format!("expected type length, found {:?}", self.current.kind)))
    }

    /// Parses the value of a `DEFAULT` clause.
    fn parse_default_value(&mut self) -> Result<DefaultValue> {
        match self.current.kind.clone() {
            TokenKind::Keyword(Keyword::Null) => {
                self.advance()?;
                Ok(DefaultValue::Null)
            }
            TokenKind::Number(raw) => {
                self.advance()?;
                if raw.contains('.') {
                    let value = raw
                        .parse::<f64>()
                        .map_err(|_| self.error(format!("invalid numeric default '{raw}'")))?;
                    Ok(DefaultValue::Float(value))
                } else {
                    let value = raw
                        .parse::<i64>()
                        .map_err(|_| self.error(format!("invalid numeric default '{raw}'")))?;
                    Ok(DefaultValue::Integer(value))
                }
            }
            TokenKind::StringLit(value) => {
                self.advance()?;
                Ok(DefaultValue::String(value))
            }
            TokenKind::Identifier(word) => {
                // Bare word: an expression default such as CURRENT_TIMESTAMP,
                // normalized to uppercase with an optional precision argument.
                self.advance()?;
                let mut expr = word.to_ascii_uppercase();
                if self.check(&TokenKind::LParen) {
                    self.advance()?;
                    if let TokenKind::Number(ref n) = self.current.kind {
                        expr.push_str(&format!("({n})"));
                        self.advance()?;
                    } else {
                        expr.push_str("()");
                    }
                    self.expect(&TokenKind::RParen)?;
                }
                Ok(DefaultValue::Expression(expr))
            }
            _ => Err(self.error(format!(
                "expected default value, found {:?}",
                self.current.kind
            ))),
        }
    }

    /// Parses the trailing table options up to the statement terminator.
    ///
    /// Recognized spellings are folded to a canonical name (`CHARACTER SET`
    /// and `DEFAULT CHARSET` both become `CHARSET`); anything else is stored
    /// verbatim under its uppercased name. The `AUTO_INCREMENT=<n>` counter
    /// is sequence state rather than structure and is always dropped.
    fn parse_table_options(&mut self, table: &mut Table) -> Result<()> {
        loop {
            match self.current.kind.clone() {
                TokenKind::Semicolon | TokenKind::Eof => break,
                TokenKind::Keyword(Keyword::Default) => {
                    // DEFAULT CHARSET / DEFAULT CHARACTER SET: prefix is noise.
                    self.advance()?;
                }
                TokenKind::Keyword(Keyword::Engine) => {
                    self.advance()?;
                    let value = self.parse_option_value()?;
                    table.options.push(TableOption::new("ENGINE", value));
                }
                TokenKind::Keyword(Keyword::Charset) => {
                    self.advance()?;
                    let value = self.parse_option_value()?;
                    table.options.push(TableOption::new("CHARSET", value));
                }
                TokenKind::Keyword(Keyword::Character) => {
                    self.advance()?;
                    self.expect_keyword(Keyword::Set)?;
                    let value = self.parse_option_value()?;
                    table.options.push(TableOption::new("CHARSET", value));
                }
                TokenKind::Keyword(Keyword::Collate) => {
                    self.advance()?;
                    let value = self.parse_option_value()?;
                    table.options.push(TableOption::new("COLLATE", value));
                }
                TokenKind::Keyword(Keyword::AutoIncrement) => {
                    self.advance()?;
                    self.parse_option_value()?;
                }
                TokenKind::Keyword(Keyword::Comment) => {
                    self.advance()?;
                    let value = self.parse_option_value()?;
                    table.options.push(TableOption::new("COMMENT", value));
                }
                TokenKind::Identifier(word) => {
                    self.advance()?;
                    let value = self.parse_option_value()?;
                    table
                        .options
                        .push(TableOption::new(word.to_ascii_uppercase(), value));
                }
                _ => {
                    return Err(self.error(format!(
                        "unexpected token in table options: {:?}",
                        self.current.kind
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parses an option value, tolerating an optional `=`. String values are
    /// stored in their SQL-rendered form so options round-trip verbatim.
    fn parse_option_value(&mut self) -> Result<String> {
        if self.check(&TokenKind::Eq) {
            self.advance()?;
        }
        match self.current.kind.clone() {
            TokenKind::Identifier(value) => {
                self.advance()?;
                Ok(value)
            }
            TokenKind::Number(value) => {
                self.advance()?;
                Ok(value)
            }
            TokenKind::StringLit(value) => {
                self.advance()?;
                Ok(format!("'{}'", value.replace('\'', "''")))
            }
            _ => Err(self.error(format!(
                "expected option value, found {:?}",
                self.current.kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::KeyKind;

    fn parse(sql: &str) -> Schema {
        Parser::new(sql).parse_schema().expect("parse failed")
    }

    #[test]
    fn test_parse_basic_table() {
        let schema = parse(
            "CREATE TABLE `test` (
              `id` int(11) NOT NULL,
              PRIMARY KEY (`id`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8;",
        );

        let table = schema.get_table("test").unwrap();
        assert_eq!(table.columns.len(), 1);
        let id = &table.columns[0];
        assert_eq!(id.column_type, ColumnType::new("int"));
        assert!(!id.nullable);
        assert_eq!(table.keys, vec![Key::primary(vec!["id".to_string()])]);
        assert_eq!(
            table.options,
            vec![
                TableOption::new("ENGINE", "InnoDB"),
                TableOption::new("CHARSET", "utf8"),
            ]
        );
    }

    #[test]
    fn test_inline_markers_become_keys() {
        let schema = parse(
            "CREATE TABLE `user` (
                `id` BIGINT UNSIGNED NOT NULL PRIMARY KEY AUTO_INCREMENT,
                `email` VARCHAR(255) NOT NULL UNIQUE
            ) CHARACTER SET utf8mb4;",
        );

        let table = schema.get_table("user").unwrap();
        assert_eq!(table.keys.len(), 2);
        assert_eq!(table.keys[0], Key::primary(vec!["id".to_string()]));
        assert_eq!(table.keys[1], Key::unique("email", vec!["email".to_string()]));
        assert_eq!(table.options, vec![TableOption::new("CHARSET", "utf8mb4")]);

        let id = table.get_column("id").unwrap();
        assert!(id.auto_increment);
        assert!(id.column_type.unsigned);
        assert_eq!(id.column_type.length, Some(20));
    }

    #[test]
    fn test_width_normalization_makes_declarations_equal() {
        let a = parse("CREATE TABLE t (`n` BIGINT UNSIGNED NOT NULL);");
        let b = parse("create table t (`n` bigint(20) unsigned not null);");
        assert_eq!(a, b);
    }

    #[test]
    fn test_nullable_requires_explicit_null() {
        let schema = parse("CREATE TABLE t (`a` int, `b` int NULL);");
        let table = schema.get_table("t").unwrap();
        assert!(!table.get_column("a").unwrap().nullable);
        assert!(table.get_column("b").unwrap().nullable);
    }

    #[test]
    fn test_defaults() {
        let schema = parse(
            "CREATE TABLE t (
                `a` int DEFAULT 0,
                `b` varchar(16) DEFAULT 'x',
                `c` datetime(6) DEFAULT CURRENT_TIMESTAMP(6),
                `d` int DEFAULT NULL
            );",
        );
        let table = schema.get_table("t").unwrap();
        assert_eq!(table.get_column("a").unwrap().default, Some(DefaultValue::Integer(0)));
        assert_eq!(
            table.get_column("b").unwrap().default,
            Some(DefaultValue::String("x".to_string()))
        );
        assert_eq!(
            table.get_column("c").unwrap().default,
            Some(DefaultValue::Expression("CURRENT_TIMESTAMP(6)".to_string()))
        );
        assert_eq!(table.get_column("d").unwrap().default, Some(DefaultValue::Null));
    }

    #[test]
    fn test_explicit_keys() {
        let schema = parse(
            "CREATE TABLE t (
                `a` int NOT NULL,
                `b` int NOT NULL,
                UNIQUE KEY `u` (`a`, `b`),
                KEY `k` (`b`)
            );",
        );
        let table = schema.get_table("t").unwrap();
        assert_eq!(table.keys[0].kind, KeyKind::Unique);
        assert_eq!(table.keys[0].columns, vec!["a", "b"]);
        assert_eq!(table.keys[1], Key::index("k", vec!["b".to_string()]));
    }

    #[test]
    fn test_if_not_exists_recorded() {
        let schema = parse("CREATE TABLE IF NOT EXISTS t (`a` int);");
        assert!(schema.get_table("t").unwrap().if_not_exists);
    }

    #[test]
    fn test_database_qualifier_stripped() {
        let schema = parse("CREATE TABLE `mydb`.`t` (`a` int);");
        assert!(schema.get_table("t").is_some());
    }

    #[test]
    fn test_unterminated_statement() {
        let err = Parser::new("CREATE TABLE t (`a` int)").parse_schema().unwrap_err();
        assert!(matches!(err, SyncError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_unknown_top_level_statement() {
        let err = Parser::new("SELECT 1;").parse_schema().unwrap_err();
        assert!(matches!(err, SyncError::Parse { .. }));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let err = Parser::new(
            "CREATE TABLE t (`a` int, FOREIGN KEY (`a`) REFERENCES other (`id`));",
        )
        .parse_schema()
        .unwrap_err();
        assert!(matches!(err, SyncError::Unsupported { .. }), "got {err:?}");
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Parser::new("CREATE TABLE t (`a` int, `a` bigint);")
            .parse_schema()
            .unwrap_err();
        assert_eq!(
            err,
            SyncError::DuplicateColumn {
                table: "t".to_string(),
                column: "a".to_string(),
            }
        );
    }

    #[test]
    fn test_column_comment_dropped() {
        let schema = parse("CREATE TABLE t (`a` int COMMENT 'counter');");
        assert_eq!(schema.get_table("t").unwrap().columns.len(), 1);
    }

    #[test]
    fn test_table_auto_increment_counter_dropped() {
        let a = parse("CREATE TABLE t (`a` int) ENGINE=InnoDB AUTO_INCREMENT=4711;");
        let b = parse("CREATE TABLE t (`a` int) ENGINE=InnoDB;");
        assert_eq!(a, b);
    }

    #[test]
    fn test_unrecognized_option_stored_verbatim() {
        let schema = parse("CREATE TABLE t (`a` int) ROW_FORMAT=DYNAMIC;");
        assert_eq!(
            schema.get_table("t").unwrap().options,
            vec![TableOption::new("ROW_FORMAT", "DYNAMIC")]
        );
    }
}
