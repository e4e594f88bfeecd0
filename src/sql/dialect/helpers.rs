//! Shared helper functions for SQL dialect implementations.
//!
//! This module provides reusable building blocks that dialects can compose
//! to implement the `SqlDialect` trait with minimal duplication.

use super::Version;
use crate::error::UnparseError;
use crate::sql::node::{Call, TypeName};
use crate::sql::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: ANSI, Postgres, DuckDB, Snowflake, Redshift, Oracle, Teradata
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL, Spark, BigQuery/Hive when the name is not simple
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote identifier with square brackets.
/// Used by: T-SQL (SQL Server, Azure Synapse)
pub fn quote_bracket(ident: &str) -> String {
    format!("[{}]", ident.replace(']', "]]"))
}

/// Whether an identifier can be written without quotes:
/// a letter or underscore followed by letters, digits and underscores.
pub fn is_simple_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

// =============================================================================
// String Quoting
// =============================================================================

/// Quote string with single quotes (standard SQL).
/// Used by: most dialects
pub fn quote_string_single(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Quote string with N prefix for Unicode (T-SQL).
/// Used by: T-SQL for non-ASCII strings
pub fn quote_string_unicode(s: &str) -> String {
    format!("N'{}'", s.replace('\'', "''"))
}

/// Quote string escaping `\` and `'` with a backslash.
/// Used by: MySQL, BigQuery, Hive, Spark
pub fn quote_string_backslash(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Inverse of [`quote_string_single`] / [`quote_string_unicode`].
pub fn unquote_string_single(quoted: &str) -> Option<String> {
    let quoted = quoted.strip_prefix('N').unwrap_or(quoted);
    let body = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\'' {
            // a lone quote inside the body is malformed
            if chars.next() != Some('\'') {
                return None;
            }
        }
        out.push(c);
    }
    Some(out)
}

/// Inverse of [`quote_string_backslash`].
pub fn unquote_string_backslash(quoted: &str) -> Option<String> {
    let body = quoted.strip_prefix('\'')?.strip_suffix('\'')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '\'' => {
                if chars.next() != Some('\'') {
                    return None;
                }
                out.push('\'');
            }
            c => out.push(c),
        }
    }
    Some(out)
}

// =============================================================================
// Boolean Formatting
// =============================================================================

/// Format boolean as literal TRUE/FALSE.
/// Used by: most dialects
pub fn format_bool_literal(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// Format boolean as numeric 1/0.
/// Used by: T-SQL, Oracle, Teradata
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Emit `LIMIT n` / `OFFSET m` on separate lines.
/// Used by: Postgres, DuckDB, MySQL, Snowflake, BigQuery, Spark, Redshift
///
/// `offset_only_limit` is written as the row count when only an OFFSET is
/// requested and the product cannot say OFFSET alone.
pub fn emit_limit_offset(
    limit: Option<u64>,
    offset: Option<u64>,
    offset_only_limit: Option<&str>,
) -> TokenStream {
    let mut ts = TokenStream::new();

    match (limit, offset_only_limit) {
        (Some(lim), _) => {
            ts.push(Token::Limit).space().push(Token::RowCount(lim));
        }
        (None, Some(all)) if offset.is_some() => {
            ts.push(Token::Limit).space().push(Token::Raw(all.into()));
        }
        _ => {}
    }

    if let Some(off) = offset {
        if !ts.is_empty() {
            ts.newline();
        }
        ts.push(Token::Offset).space().push(Token::RowCount(off));
    }

    ts
}

/// Emit `LIMIT m, n` (Hive).
pub fn emit_limit_comma(limit: Option<u64>, offset: Option<u64>, all_rows: &str) -> TokenStream {
    let mut ts = TokenStream::new();
    let count = match limit {
        Some(lim) => Token::RowCount(lim),
        None => Token::Raw(all_rows.into()),
    };
    match offset {
        Some(off) => {
            ts.push(Token::Limit)
                .space()
                .push(Token::RowCount(off))
                .comma()
                .space()
                .push(count);
        }
        None if limit.is_some() => {
            ts.push(Token::Limit).space().push(count);
        }
        None => {}
    }
    ts
}

/// Emit `OFFSET m ROWS` / `FETCH NEXT n ROWS ONLY` on separate lines.
/// Used by: ANSI, Oracle 12c+, T-SQL 2012+ when rows are skipped
pub fn emit_offset_fetch(limit: Option<u64>, offset: Option<u64>) -> TokenStream {
    let mut ts = TokenStream::new();

    if let Some(off) = offset {
        ts.push(Token::Offset)
            .space()
            .push(Token::RowCount(off))
            .space()
            .push(Token::Rows);
    }

    if let Some(lim) = limit {
        if !ts.is_empty() {
            ts.newline();
        }
        ts.push(Token::Fetch)
            .space()
            .push(Token::Next)
            .space()
            .push(Token::RowCount(lim))
            .space()
            .push(Token::Rows)
            .space()
            .push(Token::Only);
    }

    ts
}

// =============================================================================
// Versions and Capabilities
// =============================================================================

/// Whether `version` is at least `major.minor`. `None` means latest.
pub fn at_least(version: Option<Version>, major: u32, minor: u32) -> bool {
    match version {
        Some(v) => v >= Version::new(major, minor),
        None => true,
    }
}

/// Whether `version` is strictly before `major.minor`. `None` means latest.
pub fn before(version: Option<Version>, major: u32, minor: u32) -> bool {
    !at_least(version, major, minor)
}

/// Error for a kind a dialect claims but has no rule arm for.
pub fn unhandled(dialect: &str, call: &Call) -> UnparseError {
    UnparseError::internal(format!(
        "{dialect} claims to emulate {} but has no rule for it",
        call.op.name()
    ))
}

// =============================================================================
// Type System
// =============================================================================

/// Max precision shared by most products.
pub fn default_max_precision(ty: TypeName) -> Option<u32> {
    match ty {
        TypeName::Decimal => Some(38),
        TypeName::Char | TypeName::Binary => Some(65_536),
        TypeName::Varchar | TypeName::Varbinary => Some(65_536),
        TypeName::Time | TypeName::Timestamp => Some(9),
        _ => None,
    }
}

// =============================================================================
// Function Remapping
// =============================================================================

/// Remap functions for Postgres dialect.
pub fn remap_function_postgres(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("TO_CHAR"),
        "DATE_FORMAT" => Some("TO_CHAR"),
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for DuckDB dialect.
pub fn remap_function_duckdb(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "TO_CHAR" => Some("STRFTIME"),
        "DATE_FORMAT" => Some("STRFTIME"),
        "NVL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        "ISNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for MySQL dialect.
pub fn remap_function_mysql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("DATE_FORMAT"),
        "TO_CHAR" => Some("DATE_FORMAT"),
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        _ => None,
    }
}

/// Remap functions for T-SQL dialect.
pub fn remap_function_tsql(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "LENGTH" => Some("LEN"),
        "NOW" => Some("GETDATE"),
        "STRFTIME" => Some("FORMAT"),
        "TO_CHAR" => Some("FORMAT"),
        "DATE_FORMAT" => Some("FORMAT"),
        "NVL" => Some("ISNULL"),
        "IFNULL" => Some("ISNULL"),
        _ => None,
    }
}

/// Remap functions for Snowflake dialect.
pub fn remap_function_snowflake(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("TO_CHAR"),
        "DATE_FORMAT" => Some("TO_CHAR"),
        "IFNULL" => Some("NVL"),
        "ISNULL" => Some("NVL"),
        _ => None,
    }
}

/// Remap functions for BigQuery dialect.
pub fn remap_function_bigquery(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "STRFTIME" => Some("FORMAT_TIMESTAMP"),
        "TO_CHAR" => Some("FORMAT_TIMESTAMP"),
        "DATE_FORMAT" => Some("FORMAT_TIMESTAMP"),
        "NVL" => Some("IFNULL"),
        "ISNULL" => Some("IFNULL"),
        _ => None,
    }
}

/// Remap functions for Spark SQL and Hive.
pub fn remap_function_spark(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "TO_CHAR" => Some("DATE_FORMAT"),
        "STRFTIME" => Some("DATE_FORMAT"),
        "ISNULL" => Some("COALESCE"),
        "IFNULL" => Some("COALESCE"),
        _ => None,
    }
}

/// Remap functions for Oracle dialect.
pub fn remap_function_oracle(name: &str) -> Option<&'static str> {
    match name.to_uppercase().as_str() {
        "IFNULL" => Some("NVL"),
        "ISNULL" => Some("NVL"),
        "STRFTIME" => Some("TO_CHAR"),
        "DATE_FORMAT" => Some("TO_CHAR"),
        _ => None,
    }
}
