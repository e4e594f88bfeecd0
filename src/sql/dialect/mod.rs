//! SQL Dialect definitions and formatting rules.
//!
//! This module provides a trait-based abstraction for SQL dialect differences.
//! Each database product implements `SqlDialect` to describe its surface syntax
//! and its capabilities:
//!
//! - Identifier quoting: `"` (ANSI/PG/Oracle), `` ` `` (MySQL/Spark), `[]` (T-SQL),
//!   bare when simple (BigQuery/Hive)
//! - Null collation: where NULLs sort when ORDER BY says nothing
//! - Pagination: LIMIT/OFFSET vs OFFSET FETCH vs TOP
//! - Boolean literals: TRUE/FALSE vs 1/0
//! - Capability flags (`Feature`), some gated on the database version
//! - Which operators the product emulates, and how (`emulates`/`emulate`)
//!
//! A [`DialectProfile`] pins a product to a version and applies caller
//! overrides; it is what the unparser consults.
//!
//! # Usage
//!
//! ```ignore
//! use sqlshift::sql::dialect::{Dialect, DialectProfile, Feature};
//!
//! let profile = DialectProfile::for_name("hive", Some("2.0"))?;
//! assert!(!profile.supports(Feature::NullsOrdering));
//! ```
//!
//! # Version-gated features
//!
//! | Feature | Hive | MySQL | SQL Server | Oracle | PostgreSQL | Spark |
//! |---------|------|-------|------------|--------|------------|-------|
//! | NULLS FIRST/LAST | 2.1+ | ❌ | ❌ | ✓ | ✓ | ✓ |
//! | OFFSET | 2.0+ | ✓ | 11+ | 12+ | ✓ | 3.4+ |
//! | ROLLUP() / GROUPING SETS | ❌ | 8+ | 10+ | ✓ | 9.5+ | ✓ |
//! | WITH ROLLUP | ✓ | < 8 | ✓ | ❌ | ❌ | ✓ |
//! | INTERSECT / EXCEPT | 2.3+ | 8+ | ✓ | ✓ | ✓ | ✓ |
//! | GROUPS frame | ❌ | ❌ | ❌ | 21+ | 11+ | ❌ |
//!
//! Legend: ✓ = supported, ❌ = not supported, version = minimum required.
//! An unversioned profile means "latest": every gate is open.

mod ansi;
mod bigquery;
mod duckdb;
pub mod helpers;
mod hive;
mod mysql;
mod oracle;
mod postgres;
mod profile;
mod redshift;
mod snowflake;
mod spark;
mod teradata;
mod tsql;

pub use ansi::Ansi;
pub use bigquery::BigQuery;
pub use duckdb::DuckDb;
pub use hive::Hive;
pub use mysql::MySql;
pub use oracle::Oracle;
pub use postgres::Postgres;
pub use profile::{DialectProfile, ScaleRange, TypeSystem};
pub use redshift::Redshift;
pub use snowflake::Snowflake;
pub use spark::Spark;
pub use teradata::Teradata;
pub use tsql::TSql;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, UnparseError};
use crate::sql::emulation::RenderPlan;
use crate::sql::node::{Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

// =============================================================================
// Profile vocabulary
// =============================================================================

/// Database major/minor version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }
}

impl FromStr for Version {
    type Err = ConfigError;

    /// Parse `MAJOR` or `MAJOR.MINOR`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::InvalidVersion(s.to_string());
        let trimmed = s.trim();
        let (major, minor) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (trimmed, "0"),
        };
        let major = major.parse().map_err(|_| err())?;
        let minor = minor.parse().map_err(|_| err())?;
        Ok(Version { major, minor })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Named capability predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// `ORDER BY x NULLS FIRST|LAST`
    NullsOrdering,
    /// `(VALUES (1, 2)) AS t (a, b)` in FROM
    AliasedValues,
    /// `CAST(x AS VARCHAR(10) CHARACTER SET utf8)`
    CharacterSet,
    /// `FROM t AS a` (Oracle only allows `FROM t a`)
    TableAliasAs,
    /// `ROLLUP(...)`, `CUBE(...)`, `GROUPING SETS (...)` in GROUP BY
    GroupingFunctions,
    /// `GROUP BY a, b WITH ROLLUP`
    WithRollup,
    /// `GROUP BY a, b WITH CUBE`
    WithCube,
    /// `FLOOR(ts TO DAY)` / `CEIL(ts TO DAY)`
    FloorCeilToUnit,
    /// Skipping rows (OFFSET, or any pagination at all for OFFSET/FETCH products)
    Offset,
    /// `GROUPS BETWEEN ...` window frames
    GroupsFrame,
    /// `FULL OUTER JOIN`
    FullOuterJoin,
    /// A boolean predicate (`x IS NULL`) used as a sort key
    BooleanSortKey,
    /// `INTERSECT` and `EXCEPT`
    IntersectExcept,
    /// `IF(cond, a, b)`
    IfFunction,
}

impl Feature {
    pub const ALL: &'static [Feature] = &[
        Feature::NullsOrdering,
        Feature::AliasedValues,
        Feature::CharacterSet,
        Feature::TableAliasAs,
        Feature::GroupingFunctions,
        Feature::WithRollup,
        Feature::WithCube,
        Feature::FloorCeilToUnit,
        Feature::Offset,
        Feature::GroupsFrame,
        Feature::FullOuterJoin,
        Feature::BooleanSortKey,
        Feature::IntersectExcept,
        Feature::IfFunction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::NullsOrdering => "nulls_ordering",
            Feature::AliasedValues => "aliased_values",
            Feature::CharacterSet => "character_set",
            Feature::TableAliasAs => "table_alias_as",
            Feature::GroupingFunctions => "grouping_functions",
            Feature::WithRollup => "with_rollup",
            Feature::WithCube => "with_cube",
            Feature::FloorCeilToUnit => "floor_ceil_to_unit",
            Feature::Offset => "offset",
            Feature::GroupsFrame => "groups_frame",
            Feature::FullOuterJoin => "full_outer_join",
            Feature::BooleanSortKey => "boolean_sort_key",
            Feature::IntersectExcept => "intersect_except",
            Feature::IfFunction => "if_function",
        }
    }
}

impl FromStr for Feature {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownFeature(s.to_string()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default placement of NULLs in ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullCollation {
    /// NULLs compare greater than every value: last ascending, first descending.
    High,
    /// NULLs compare less than every value: first ascending, last descending.
    Low,
    /// NULLs first regardless of direction.
    First,
    /// NULLs last regardless of direction.
    Last,
}

impl NullCollation {
    /// Whether NULLs come first for a sort key with this direction.
    pub fn nulls_first(&self, descending: bool) -> bool {
        match self {
            NullCollation::High => descending,
            NullCollation::Low => !descending,
            NullCollation::First => true,
            NullCollation::Last => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NullCollation::High => "high",
            NullCollation::Low => "low",
            NullCollation::First => "first",
            NullCollation::Last => "last",
        }
    }
}

impl FromStr for NullCollation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(NullCollation::High),
            "low" => Ok(NullCollation::Low),
            "first" => Ok(NullCollation::First),
            "last" => Ok(NullCollation::Last),
            _ => Err(ConfigError::InvalidNullCollation(s.to_string())),
        }
    }
}

/// Casing applied to identifiers emitted without quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Casing {
    Upper,
    Lower,
    Unchanged,
}

impl Casing {
    pub fn apply(&self, ident: &str) -> String {
        match self {
            Casing::Upper => ident.to_uppercase(),
            Casing::Lower => ident.to_lowercase(),
            Casing::Unchanged => ident.to_string(),
        }
    }
}

impl FromStr for Casing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upper" | "to_upper" => Ok(Casing::Upper),
            "lower" | "to_lower" => Ok(Casing::Lower),
            "unchanged" => Ok(Casing::Unchanged),
            _ => Err(ConfigError::InvalidCasing(s.to_string())),
        }
    }
}

/// How identifiers are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// `"name"`
    Double,
    /// `` `name` ``
    Backtick,
    /// `[name]`
    Bracket,
    /// Bare when the name is a simple identifier, backticks otherwise.
    None,
}

impl QuoteStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStyle::Double => "\"",
            QuoteStyle::Backtick => "`",
            QuoteStyle::Bracket => "[",
            QuoteStyle::None => "",
        }
    }
}

impl FromStr for QuoteStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "\"" => Ok(QuoteStyle::Double),
            "`" => Ok(QuoteStyle::Backtick),
            "[" | "[]" => Ok(QuoteStyle::Bracket),
            "" | "none" => Ok(QuoteStyle::None),
            _ => Err(ConfigError::InvalidQuote(s.to_string())),
        }
    }
}

/// How string literals escape an embedded quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralEscape {
    /// `'can''t'`
    Doubling,
    /// `'can\'t'`, backslashes doubled
    Backslash,
}

/// Pagination syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `LIMIT m, n`
    LimitComma,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch,
    /// `SELECT TOP (n)`, OFFSET/FETCH when rows are skipped
    Top,
}

/// INTERVAL literal spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalStyle {
    /// `INTERVAL -'1-2' YEAR TO MONTH`
    Standard,
    /// `INTERVAL '-1-2' YEAR TO MONTH`
    SignInQuotes,
    /// `INTERVAL '-1-2' YEAR_MONTH`
    MySql,
    /// `INTERVAL -5 DAY`, `INTERVAL '-1-2' YEAR TO MONTH`
    BigQuery,
    /// `INTERVAL '-5 DAY'`; ranges unsupported
    Snowflake,
    /// No standalone interval literals.
    Unsupported,
}

/// DATE, TIME or TIMESTAMP literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemporalKind {
    Date,
    Time,
    Timestamp,
}

impl TemporalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalKind::Date => "DATE",
            TemporalKind::Time => "TIME",
            TemporalKind::Timestamp => "TIMESTAMP",
        }
    }
}

// =============================================================================
// SqlDialect
// =============================================================================

/// SQL dialect trait - describes one database product.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: fmt::Debug + Send + Sync {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Oldest version this product profile knows about.
    fn minimum_version(&self) -> Version {
        Version::new(0, 0)
    }

    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Identifier quote style.
    fn identifier_quote(&self) -> QuoteStyle {
        QuoteStyle::Double
    }

    /// Casing applied to identifiers emitted without quotes.
    fn unquoted_casing(&self) -> Casing {
        Casing::Unchanged
    }

    /// How a quote inside a string literal is escaped.
    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Doubling
    }

    /// Whether non-ASCII strings take an `N'...'` prefix (T-SQL).
    fn unicode_string_prefix(&self) -> bool {
        false
    }

    /// Format a boolean literal.
    ///
    /// - most products: `TRUE`/`FALSE`
    /// - T-SQL: `1`/`0`
    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_literal(b)
    }

    /// Format a DATE / TIME / TIMESTAMP literal.
    ///
    /// - ANSI: `DATE '2024-01-01'`
    /// - T-SQL: `CAST('2024-01-01' AS DATE)`
    fn format_temporal_literal(&self, kind: TemporalKind, value: &str) -> String {
        format!("{} {}", kind.as_str(), helpers::quote_string_single(value))
    }

    /// INTERVAL literal spelling.
    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::SignInQuotes
    }

    // =========================================================================
    // Ordering and Pagination
    // =========================================================================

    /// Where NULLs sort when ORDER BY does not say.
    fn null_collation(&self) -> NullCollation {
        NullCollation::High
    }

    /// Pagination syntax.
    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset
    }

    /// Row-limiting clause placed after SELECT for [`Pagination::Top`].
    fn top_clause(&self, n: u64) -> String {
        format!("TOP {n}")
    }

    /// Row count written as LIMIT when only an OFFSET is requested and the
    /// product cannot express OFFSET alone.
    fn limit_for_offset_only(&self) -> Option<&'static str> {
        None
    }

    // =========================================================================
    // Operators and Functions
    // =========================================================================

    /// String concatenation operator.
    ///
    /// - ANSI/PostgreSQL/Oracle: `||`
    /// - T-SQL: `+`
    fn concat_operator(&self) -> &'static str {
        "||"
    }

    /// Binding precedence of the concatenation operator when it differs
    /// from the multiplicative level it has by default.
    fn concat_precedence(&self) -> Option<u16> {
        None
    }

    /// Remap a function name for this dialect.
    ///
    /// Returns `Some(new_name)` if the function should be remapped, `None` to
    /// keep the original. The input is matched case-insensitively.
    fn remap_function(&self, name: &str) -> Option<&'static str> {
        let _ = name;
        None
    }

    /// Whether to emit RECURSIVE for recursive CTEs.
    fn emit_recursive_keyword(&self) -> bool {
        true
    }

    /// Table to select from when a query has no FROM clause (Oracle `DUAL`).
    fn dummy_table(&self) -> Option<&'static str> {
        None
    }

    // =========================================================================
    // Type System
    // =========================================================================

    /// CAST target name for a canonical type.
    fn type_name(&self, ty: TypeName) -> &'static str {
        ty.as_str()
    }

    /// Largest precision (or length) accepted for a type, `None` when unbounded.
    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        helpers::default_max_precision(ty)
    }

    /// Valid range of the scale argument of ROUND/TRUNCATE, when bounded.
    fn numeric_scale_range(&self) -> Option<ScaleRange> {
        None
    }

    // =========================================================================
    // Capabilities
    // =========================================================================

    /// Whether `feature` is available at `version` (`None` = latest).
    fn supports(&self, feature: Feature, version: Option<Version>) -> bool;

    // =========================================================================
    // Emulation
    // =========================================================================

    /// Whether this product rewrites calls of `kind`, and for which operand
    /// counts. Calls outside the returned arity are unsupported.
    fn emulates(&self, kind: OpKind, version: Option<Version>) -> Option<Arity> {
        let _ = (kind, version);
        None
    }

    /// Kinds this product cannot render at all, with the reason.
    fn rejects(&self, kind: OpKind, version: Option<Version>) -> Option<&'static str> {
        let _ = (kind, version);
        None
    }

    /// Plan a call of a kind this product claims in [`SqlDialect::emulates`].
    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        let _ = profile;
        Err(helpers::unhandled(self.name(), call))
    }
}

/// Supported database products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Dialect {
    #[default]
    Ansi,
    BigQuery,
    Hive,
    Spark,
    Snowflake,
    TSql,
    MySql,
    Postgres,
    Oracle,
    Redshift,
    Teradata,
    DuckDb,
}

impl Dialect {
    pub const ALL: &'static [Dialect] = &[
        Dialect::Ansi,
        Dialect::BigQuery,
        Dialect::Hive,
        Dialect::Spark,
        Dialect::Snowflake,
        Dialect::TSql,
        Dialect::MySql,
        Dialect::Postgres,
        Dialect::Oracle,
        Dialect::Redshift,
        Dialect::Teradata,
        Dialect::DuckDb,
    ];

    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Ansi => &Ansi,
            Dialect::BigQuery => &BigQuery,
            Dialect::Hive => &Hive,
            Dialect::Spark => &Spark,
            Dialect::Snowflake => &Snowflake,
            Dialect::TSql => &TSql,
            Dialect::MySql => &MySql,
            Dialect::Postgres => &Postgres,
            Dialect::Oracle => &Oracle,
            Dialect::Redshift => &Redshift,
            Dialect::Teradata => &Teradata,
            Dialect::DuckDb => &DuckDb,
        }
    }

    /// Look up a product by name or alias, case-insensitively.
    pub fn from_name(name: &str) -> Result<Dialect, ConfigError> {
        let dialect = match name.trim().to_lowercase().as_str() {
            "ansi" | "calcite" => Dialect::Ansi,
            "bigquery" | "big_query" => Dialect::BigQuery,
            "hive" => Dialect::Hive,
            "spark" | "databricks" => Dialect::Spark,
            "snowflake" => Dialect::Snowflake,
            "mssql" | "tsql" | "sqlserver" => Dialect::TSql,
            "mysql" => Dialect::MySql,
            "postgres" | "postgresql" => Dialect::Postgres,
            "oracle" => Dialect::Oracle,
            "redshift" => Dialect::Redshift,
            "teradata" => Dialect::Teradata,
            "duckdb" => Dialect::DuckDb,
            _ => return Err(ConfigError::UnknownProduct(name.to_string())),
        };
        Ok(dialect)
    }
}

impl FromStr for Dialect {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::from_name(s)
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn minimum_version(&self) -> Version {
        self.dialect().minimum_version()
    }

    fn identifier_quote(&self) -> QuoteStyle {
        self.dialect().identifier_quote()
    }

    fn unquoted_casing(&self) -> Casing {
        self.dialect().unquoted_casing()
    }

    fn literal_escape(&self) -> LiteralEscape {
        self.dialect().literal_escape()
    }

    fn unicode_string_prefix(&self) -> bool {
        self.dialect().unicode_string_prefix()
    }

    fn format_bool(&self, b: bool) -> &'static str {
        self.dialect().format_bool(b)
    }

    fn format_temporal_literal(&self, kind: TemporalKind, value: &str) -> String {
        self.dialect().format_temporal_literal(kind, value)
    }

    fn interval_style(&self) -> IntervalStyle {
        self.dialect().interval_style()
    }

    fn null_collation(&self) -> NullCollation {
        self.dialect().null_collation()
    }

    fn pagination(&self) -> Pagination {
        self.dialect().pagination()
    }

    fn top_clause(&self, n: u64) -> String {
        self.dialect().top_clause(n)
    }

    fn limit_for_offset_only(&self) -> Option<&'static str> {
        self.dialect().limit_for_offset_only()
    }

    fn concat_operator(&self) -> &'static str {
        self.dialect().concat_operator()
    }

    fn concat_precedence(&self) -> Option<u16> {
        self.dialect().concat_precedence()
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect().remap_function(name)
    }

    fn emit_recursive_keyword(&self) -> bool {
        self.dialect().emit_recursive_keyword()
    }

    fn dummy_table(&self) -> Option<&'static str> {
        self.dialect().dummy_table()
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        self.dialect().type_name(ty)
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        self.dialect().max_precision(ty)
    }

    fn numeric_scale_range(&self) -> Option<ScaleRange> {
        self.dialect().numeric_scale_range()
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        self.dialect().supports(feature, version)
    }

    fn emulates(&self, kind: OpKind, version: Option<Version>) -> Option<Arity> {
        self.dialect().emulates(kind, version)
    }

    fn rejects(&self, kind: OpKind, version: Option<Version>) -> Option<&'static str> {
        self.dialect().rejects(kind, version)
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        self.dialect().emulate(profile, call)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::TSql.to_string(), "mssql");
        assert_eq!(Dialect::Ansi.to_string(), "ansi");
        assert_eq!(Dialect::DuckDb.to_string(), "duckdb");
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(Dialect::from_name("SQLServer").unwrap(), Dialect::TSql);
        assert_eq!(Dialect::from_name("databricks").unwrap(), Dialect::Spark);
        assert_eq!(Dialect::from_name("PostgreSQL").unwrap(), Dialect::Postgres);
        assert_eq!(Dialect::from_name("calcite").unwrap(), Dialect::Ansi);
        assert_eq!(
            Dialect::from_name("sybase"),
            Err(ConfigError::UnknownProduct("sybase".into()))
        );
    }

    #[test]
    fn test_names_round_trip() {
        for d in Dialect::ALL {
            assert_eq!(Dialect::from_name(d.name()).unwrap(), *d);
        }
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("8".parse::<Version>().unwrap(), Version::new(8, 0));
        assert_eq!("2.1".parse::<Version>().unwrap(), Version::new(2, 1));
        assert!("x".parse::<Version>().is_err());
        assert!("1.2.3".parse::<Version>().is_err());
        assert!(Version::new(2, 1) > Version::new(2, 0));
    }

    #[test]
    fn test_null_collation() {
        assert!(NullCollation::High.nulls_first(true));
        assert!(!NullCollation::High.nulls_first(false));
        assert!(NullCollation::Low.nulls_first(false));
        assert!(NullCollation::First.nulls_first(true));
        assert!(!NullCollation::Last.nulls_first(false));
    }

    #[test]
    fn test_feature_names() {
        for f in Feature::ALL {
            assert_eq!(f.as_str().parse::<Feature>().unwrap(), *f);
        }
        assert_eq!("nulls-ordering".parse::<Feature>().unwrap(), Feature::NullsOrdering);
        assert!("time_travel".parse::<Feature>().is_err());
    }

    #[test]
    fn test_version_gates() {
        let hive = Dialect::Hive;
        assert!(!hive.supports(Feature::NullsOrdering, Some(Version::new(2, 0))));
        assert!(hive.supports(Feature::NullsOrdering, Some(Version::new(2, 1))));
        assert!(hive.supports(Feature::NullsOrdering, None));

        let mysql = Dialect::MySql;
        assert!(mysql.supports(Feature::WithRollup, Some(Version::new(5, 7))));
        assert!(!mysql.supports(Feature::GroupingFunctions, Some(Version::new(5, 7))));
        assert!(mysql.supports(Feature::GroupingFunctions, Some(Version::new(8, 0))));
        assert!(!mysql.supports(Feature::WithRollup, Some(Version::new(8, 0))));
    }

    #[test]
    fn test_quote_style_parse() {
        assert_eq!("`".parse::<QuoteStyle>().unwrap(), QuoteStyle::Backtick);
        assert_eq!("[".parse::<QuoteStyle>().unwrap(), QuoteStyle::Bracket);
        assert_eq!("none".parse::<QuoteStyle>().unwrap(), QuoteStyle::None);
        assert!("'".parse::<QuoteStyle>().is_err());
    }
}
