//! Tokenizer for table-definition text.
//!
//! A single-pass scanner over the raw input. Keywords are matched
//! case-insensitively; backtick-quoted identifiers are unquoted on the way
//! in. Whitespace, `--` and `#` line comments, and `/* ... */` block
//! comments are skipped.

/// A byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Keywords recognized by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Temporary,
    Table,
    If,
    Not,
    Exists,
    Primary,
    Unique,
    Key,
    Index,
    Null,
    Default,
    AutoIncrement,
    Unsigned,
    Collate,
    Charset,
    Character,
    Set,
    Engine,
    Comment,
    Constraint,
    Foreign,
    References,
    Check,
    Fulltext,
    Spatial,
}

impl Keyword {
    /// Matches a raw word against the keyword table, case-insensitively.
    #[must_use]
    pub fn from_str(text: &str) -> Option<Self> {
        let upper = text.to_ascii_uppercase();
        Some(match upper.as_str() {
            "CREATE" => Self::Create,
            "TEMPORARY" => Self::Temporary,
            "TABLE" => Self::Table,
            "IF" => Self::If,
            "NOT" => Self::Not,
            "EXISTS" => Self::Exists,
            "PRIMARY" => Self::Primary,
            "UNIQUE" => Self::Unique,
            "KEY" => Self::Key,
            "INDEX" => Self::Index,
            "NULL" => Self::Null,
            "DEFAULT" => Self::Default,
            "AUTO_INCREMENT" => Self::AutoIncrement,
            "UNSIGNED" => Self::Unsigned,
            "COLLATE" => Self::Collate,
            "CHARSET" => Self::Charset,
            "CHARACTER" => Self::Character,
            "SET" => Self::Set,
            "ENGINE" => Self::Engine,
            "COMMENT" => Self::Comment,
            "CONSTRAINT" => Self::Constraint,
            "FOREIGN" => Self::Foreign,
            "REFERENCES" => Self::References,
            "CHECK" => Self::Check,
            "FULLTEXT" => Self::Fulltext,
            "SPATIAL" => Self::Spatial,
            _ => return None,
        })
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A recognized keyword.
    Keyword(Keyword),
    /// An identifier (unquoted word or backtick-quoted).
    Identifier(String),
    /// A numeric literal, kept as raw text.
    Number(String),
    /// A string literal, quotes stripped.
    StringLit(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Eq,
    /// `.`
    Dot,
    /// End of input.
    Eof,
    /// A lexing error (unterminated quote, unexpected character).
    Error(String),
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The source span.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// A lexer over table-definition text.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    /// Returns the current character without advancing.
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    /// Returns the character after the current one without advancing.
    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    /// Advances to the next character and returns it.
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips whitespace and comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(|c| c.is_whitespace()) {
                self.advance();
            }

            // Standard SQL line comment (-- ...)
            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // MySQL line comment (# ...)
            if self.peek() == Some('#') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            // Block comment (/* ... */)
            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    /// Creates a token spanning from `start` to the current position.
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, Span::new(self.start, self.pos))
    }

    /// Scans an identifier or keyword.
    fn scan_word(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[self.start..self.pos];
        match Keyword::from_str(text) {
            Some(keyword) => self.make_token(TokenKind::Keyword(keyword)),
            None => self.make_token(TokenKind::Identifier(text.to_string())),
        }
    }

    /// Scans a backtick-quoted identifier, stripping the quotes and
    /// unescaping doubled backticks.
    fn scan_quoted_identifier(&mut self) -> Token {
        self.advance(); // opening backtick
        let content_start = self.pos;

        loop {
            match self.peek() {
                Some('`') => {
                    if self.peek_next() == Some('`') {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return self.make_token(TokenKind::Error(
                        "unterminated quoted identifier".to_string(),
                    ));
                }
            }
        }

        let content = self.input[content_start..self.pos].replace("``", "`");
        self.advance(); // closing backtick
        self.make_token(TokenKind::Identifier(content))
    }

    /// Scans a string literal delimited by `'` or `"`.
    fn scan_string(&mut self, quote: char) -> Token {
        self.advance(); // opening quote
        let content_start = self.pos;

        loop {
            match self.peek() {
                Some(c) if c == quote => {
                    if self.peek_next() == Some(quote) {
                        self.advance();
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return self
                        .make_token(TokenKind::Error("unterminated string literal".to_string()));
                }
            }
        }

        let content = self.input[content_start..self.pos]
            .replace(&format!("{quote}{quote}"), &quote.to_string());
        self.advance(); // closing quote
        self.make_token(TokenKind::StringLit(content))
    }

    /// Scans a numeric literal (optionally signed, optionally fractional).
    fn scan_number(&mut self) -> Token {
        if self.peek() == Some('-') {
            self.advance();
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Number(text.to_string()))
    }

    /// Returns the next token.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.peek() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => {
                self.advance();
                self.make_token(TokenKind::LParen)
            }
            ')' => {
                self.advance();
                self.make_token(TokenKind::RParen)
            }
            ',' => {
                self.advance();
                self.make_token(TokenKind::Comma)
            }
            ';' => {
                self.advance();
                self.make_token(TokenKind::Semicolon)
            }
            '=' => {
                self.advance();
                self.make_token(TokenKind::Eq)
            }
            '.' => {
                self.advance();
                self.make_token(TokenKind::Dot)
            }
            '`' => self.scan_quoted_identifier(),
            '\'' | '"' => self.scan_string(c),
            '-' if self.peek_next().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(),
            _ if c.is_ascii_digit() => self.scan_number(),
            _ if c.is_alphanumeric() || c == '_' => self.scan_word(),
            _ => {
                self.advance();
                self.make_token(TokenKind::Error(format!("unexpected character '{c}'")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(input);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let eof = token.kind == TokenKind::Eof;
            out.push(token.kind);
            if eof {
                break;
            }
        }
        out
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("create TABLE Auto_Increment"),
            vec![
                TokenKind::Keyword(Keyword::Create),
                TokenKind::Keyword(Keyword::Table),
                TokenKind::Keyword(Keyword::AutoIncrement),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_quoted_identifier_stripped() {
        assert_eq!(
            kinds("`full_name`"),
            vec![TokenKind::Identifier("full_name".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_quoted_identifier_unescapes_backticks() {
        assert_eq!(
            kinds("`we``ird`"),
            vec![TokenKind::Identifier("we`ird".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn test_punctuation_and_numbers() {
        assert_eq!(
            kinds("bigint(20), x = -1.5"),
            vec![
                TokenKind::Identifier("bigint".to_string()),
                TokenKind::LParen,
                TokenKind::Number("20".to_string()),
                TokenKind::RParen,
                TokenKind::Comma,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Eq,
                TokenKind::Number("-1.5".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("a -- line\n# mysql\n/* block\nstill */ b"),
            vec![
                TokenKind::Identifier("a".to_string()),
                TokenKind::Identifier("b".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            kinds("'it''s' \"x\""),
            vec![
                TokenKind::StringLit("it's".to_string()),
                TokenKind::StringLit("x".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_unterminated_quote_is_error() {
        let mut lexer = Lexer::new("`oops");
        assert!(matches!(lexer.next_token().kind, TokenKind::Error(_)));
    }
}
