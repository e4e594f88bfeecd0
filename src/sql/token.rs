//! Fixed keywords and atoms the unparser writes.
//!
//! A token serializes to text for one [`DialectProfile`]: identifiers are
//! quoted, booleans and function names follow the product.

use super::dialect::DialectProfile;

/// SQL Token - every element the unparser writes.
///
/// Adding a new variant here will cause compile errors everywhere
/// it needs to be handled (exhaustive matching).
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // === Clause Keywords ===
    Select,
    Distinct,
    All,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    With,
    Recursive,
    As,
    On,

    // === Ordering and Pagination ===
    Desc,
    NullsFirst,
    NullsLast,
    Limit,
    Offset,
    Fetch,
    Next,
    Rows,
    Only,

    // === Expression Keywords ===
    When,
    Then,
    Else,

    // === Window Function Keywords ===
    Over,
    PartitionBy,
    Range,
    Groups,
    Between,
    And,
    Unbounded,
    Preceding,
    Following,
    CurrentRow,

    // === Punctuation ===
    Comma,
    Star,

    // === Whitespace / Formatting ===
    Space,
    Newline,

    // === Dynamic Content ===
    /// Simple identifier (table, column, alias)
    Ident(String),
    /// Qualified identifier: `schema.table`, `t.col`, `t.*`
    QualifiedIdent(Vec<String>),
    /// Row count of LIMIT, OFFSET or FETCH
    RowCount(u64),
    /// Boolean literal
    LitBool(bool),
    /// NULL literal
    LitNull,

    // === Function Names ===
    /// Function name, upper-cased and remapped for the dialect
    /// (e.g. `NVL` → `COALESCE`, `LENGTH` → `LEN` on SQL Server)
    FunctionName(String),

    // === Escape Hatch ===
    /// Trusted SQL fragment passed through without escaping.
    ///
    /// Only for static syntax built by the engine itself (format strings,
    /// dialect keywords), never for values taken from the input tree.
    Raw(String),
}

impl Token {
    /// Serialize this token for the given profile.
    pub fn serialize(&self, profile: &DialectProfile) -> String {
        match self {
            Token::Select => "SELECT".into(),
            Token::Distinct => "DISTINCT".into(),
            Token::All => "ALL".into(),
            Token::From => "FROM".into(),
            Token::Where => "WHERE".into(),
            Token::GroupBy => "GROUP BY".into(),
            Token::Having => "HAVING".into(),
            Token::OrderBy => "ORDER BY".into(),
            Token::With => "WITH".into(),
            Token::Recursive => "RECURSIVE".into(),
            Token::As => "AS".into(),
            Token::On => "ON".into(),

            Token::Desc => "DESC".into(),
            Token::NullsFirst => "NULLS FIRST".into(),
            Token::NullsLast => "NULLS LAST".into(),
            Token::Limit => "LIMIT".into(),
            Token::Offset => "OFFSET".into(),
            Token::Fetch => "FETCH".into(),
            Token::Next => "NEXT".into(),
            Token::Rows => "ROWS".into(),
            Token::Only => "ONLY".into(),

            Token::When => "WHEN".into(),
            Token::Then => "THEN".into(),
            Token::Else => "ELSE".into(),

            Token::Over => "OVER".into(),
            Token::PartitionBy => "PARTITION BY".into(),
            Token::Range => "RANGE".into(),
            Token::Groups => "GROUPS".into(),
            Token::Between => "BETWEEN".into(),
            Token::And => "AND".into(),
            Token::Unbounded => "UNBOUNDED".into(),
            Token::Preceding => "PRECEDING".into(),
            Token::Following => "FOLLOWING".into(),
            Token::CurrentRow => "CURRENT ROW".into(),

            Token::Comma => ",".into(),
            Token::Star => "*".into(),

            Token::Space => " ".into(),
            Token::Newline => "\n".into(),

            Token::Ident(name) => profile.quote_identifier(name),
            Token::QualifiedIdent(names) => names
                .iter()
                .map(|n| {
                    if n == "*" {
                        n.clone()
                    } else {
                        profile.quote_identifier(n)
                    }
                })
                .collect::<Vec<_>>()
                .join("."),
            Token::RowCount(n) => n.to_string(),
            Token::LitBool(b) => profile.format_bool(*b).into(),
            Token::LitNull => "NULL".into(),

            Token::FunctionName(name) => match profile.remap_function(name) {
                Some(remapped) => remapped.to_string(),
                None => name.to_uppercase(),
            },

            Token::Raw(s) => s.clone(),
        }
    }
}

/// A stream of tokens that can be serialized to SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Create an empty token stream.
    pub fn new() -> Self {
        Self { tokens: vec![] }
    }

    /// Push a single token.
    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Serialize all tokens to a SQL string.
    pub fn serialize(&self, profile: &DialectProfile) -> String {
        self.tokens.iter().map(|t| t.serialize(profile)).collect()
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }
    pub fn newline(&mut self) -> &mut Self {
        self.push(Token::Newline)
    }
    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;

    fn profile(dialect: Dialect) -> DialectProfile {
        DialectProfile::new(dialect, None).unwrap()
    }

    #[test]
    fn test_keyword_serialize() {
        assert_eq!(Token::Select.serialize(&profile(Dialect::DuckDb)), "SELECT");
        assert_eq!(Token::GroupBy.serialize(&profile(Dialect::TSql)), "GROUP BY");
    }

    #[test]
    fn test_ident_serialize() {
        let tok = Token::Ident("users".into());
        assert_eq!(tok.serialize(&profile(Dialect::DuckDb)), "\"users\"");
        assert_eq!(tok.serialize(&profile(Dialect::TSql)), "[users]");
        assert_eq!(tok.serialize(&profile(Dialect::MySql)), "`users`");
        assert_eq!(tok.serialize(&profile(Dialect::BigQuery)), "users");
    }

    #[test]
    fn test_qualified_ident() {
        let tok = Token::QualifiedIdent(vec!["dbo".into(), "users".into()]);
        assert_eq!(tok.serialize(&profile(Dialect::TSql)), "[dbo].[users]");

        let star = Token::QualifiedIdent(vec!["t".into(), "*".into()]);
        assert_eq!(star.serialize(&profile(Dialect::Postgres)), "\"t\".*");
    }

    #[test]
    fn test_token_stream() {
        let mut ts = TokenStream::new();
        ts.push(Token::Select)
            .space()
            .push(Token::Ident("name".into()))
            .space()
            .push(Token::From)
            .space()
            .push(Token::Ident("users".into()));

        assert_eq!(
            ts.serialize(&profile(Dialect::Postgres)),
            "SELECT \"name\" FROM \"users\""
        );
    }

    #[test]
    fn test_function_name_remap() {
        let tok = Token::FunctionName("nvl".into());
        assert_eq!(tok.serialize(&profile(Dialect::Postgres)), "COALESCE");
        assert_eq!(tok.serialize(&profile(Dialect::Oracle)), "NVL");
        assert_eq!(
            Token::FunctionName("length".into()).serialize(&profile(Dialect::TSql)),
            "LEN"
        );
    }

    #[test]
    fn test_bool_literal() {
        assert_eq!(Token::LitBool(true).serialize(&profile(Dialect::Ansi)), "TRUE");
        assert_eq!(Token::LitBool(true).serialize(&profile(Dialect::TSql)), "1");
    }
}
