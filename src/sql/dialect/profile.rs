//! Dialect profiles: a product pinned to a version, plus caller overrides.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::helpers;
use super::{
    Casing, Dialect, Feature, IntervalStyle, LiteralEscape, NullCollation, Pagination,
    QuoteStyle, SqlDialect, TemporalKind, Version,
};
use crate::error::{ConfigError, UnparseError};
use crate::sql::emulation::RenderPlan;
use crate::sql::node::{Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Inclusive bounds for the scale argument of ROUND/TRUNCATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleRange {
    pub min: i64,
    pub max: i64,
}

impl ScaleRange {
    pub fn new(min: i64, max: i64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidScaleRange { min, max });
        }
        Ok(ScaleRange { min, max })
    }

    pub fn clamp(&self, n: i64) -> i64 {
        n.clamp(self.min, self.max)
    }

    pub fn contains(&self, n: i64) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

/// Type-system overrides layered over the product defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSystem {
    pub max_precision: BTreeMap<TypeName, u32>,
    pub numeric_scale_range: Option<ScaleRange>,
}

/// An immutable, versioned product profile.
///
/// Profiles are plain data and can be shared freely across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectProfile {
    dialect: Dialect,
    version: Option<Version>,
    identifier_quote: QuoteStyle,
    unquoted_casing: Casing,
    null_collation: NullCollation,
    type_system: TypeSystem,
    features: BTreeMap<Feature, bool>,
}

impl DialectProfile {
    /// Profile for `dialect` at `version` (`None` = latest).
    pub fn new(dialect: Dialect, version: Option<Version>) -> Result<Self, ConfigError> {
        let d = dialect.dialect();
        if let Some(v) = version {
            let minimum = d.minimum_version();
            if v < minimum {
                return Err(ConfigError::UnsupportedVersion {
                    product: d.name(),
                    version: v.to_string(),
                    minimum: minimum.to_string(),
                });
            }
        }
        Ok(DialectProfile {
            dialect,
            version,
            identifier_quote: d.identifier_quote(),
            unquoted_casing: d.unquoted_casing(),
            null_collation: d.null_collation(),
            type_system: TypeSystem {
                max_precision: BTreeMap::new(),
                numeric_scale_range: d.numeric_scale_range(),
            },
            features: BTreeMap::new(),
        })
    }

    /// Profile from a product name and optional `MAJOR[.MINOR]` version string.
    pub fn for_name(name: &str, version: Option<&str>) -> Result<Self, ConfigError> {
        let dialect = Dialect::from_name(name)?;
        let version = version.map(str::parse::<Version>).transpose()?;
        Self::new(dialect, version)
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    pub fn with_identifier_quote(mut self, quote: QuoteStyle) -> Self {
        self.identifier_quote = quote;
        self
    }

    pub fn with_unquoted_casing(mut self, casing: Casing) -> Self {
        self.unquoted_casing = casing;
        self
    }

    pub fn with_null_collation(mut self, collation: NullCollation) -> Self {
        self.null_collation = collation;
        self
    }

    pub fn with_max_precision(mut self, ty: TypeName, max: u32) -> Self {
        self.type_system.max_precision.insert(ty, max);
        self
    }

    pub fn with_numeric_scale_range(mut self, range: ScaleRange) -> Self {
        self.type_system.numeric_scale_range = Some(range);
        self
    }

    /// Force a capability on or off regardless of product and version.
    pub fn with_feature(mut self, feature: Feature, enabled: bool) -> Self {
        self.features.insert(feature, enabled);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn version(&self) -> Option<Version> {
        self.version
    }

    pub fn name(&self) -> &'static str {
        self.dialect.name()
    }

    pub fn identifier_quote(&self) -> QuoteStyle {
        self.identifier_quote
    }

    pub fn unquoted_casing(&self) -> Casing {
        self.unquoted_casing
    }

    pub fn null_collation(&self) -> NullCollation {
        self.null_collation
    }

    pub fn type_system(&self) -> &TypeSystem {
        &self.type_system
    }

    pub fn max_precision(&self, ty: TypeName) -> Option<u32> {
        self.type_system
            .max_precision
            .get(&ty)
            .copied()
            .or_else(|| self.dialect.max_precision(ty))
    }

    pub fn numeric_scale_range(&self) -> Option<ScaleRange> {
        self.type_system.numeric_scale_range
    }

    /// Capability query, honoring overrides before product and version rules.
    pub fn supports(&self, feature: Feature) -> bool {
        match self.features.get(&feature) {
            Some(enabled) => *enabled,
            None => self.dialect.supports(feature, self.version),
        }
    }

    // =========================================================================
    // Quoting and Literals
    // =========================================================================

    /// Quote an identifier. Casing applies only to names left unquoted.
    pub fn quote_identifier(&self, ident: &str) -> String {
        match self.identifier_quote {
            QuoteStyle::Double => helpers::quote_double(ident),
            QuoteStyle::Backtick => helpers::quote_backtick(ident),
            QuoteStyle::Bracket => helpers::quote_bracket(ident),
            QuoteStyle::None if helpers::is_simple_identifier(ident) => {
                self.unquoted_casing.apply(ident)
            }
            QuoteStyle::None => helpers::quote_backtick(ident),
        }
    }

    /// Quote a string literal.
    pub fn quote_string(&self, s: &str) -> String {
        match self.dialect.literal_escape() {
            LiteralEscape::Backslash => helpers::quote_string_backslash(s),
            LiteralEscape::Doubling if self.dialect.unicode_string_prefix() && !s.is_ascii() => {
                helpers::quote_string_unicode(s)
            }
            LiteralEscape::Doubling => helpers::quote_string_single(s),
        }
    }

    /// Inverse of [`DialectProfile::quote_string`]; `None` if malformed.
    pub fn unquote_string(&self, quoted: &str) -> Option<String> {
        match self.dialect.literal_escape() {
            LiteralEscape::Backslash => helpers::unquote_string_backslash(quoted),
            LiteralEscape::Doubling => helpers::unquote_string_single(quoted),
        }
    }

    pub fn format_bool(&self, b: bool) -> &'static str {
        self.dialect.format_bool(b)
    }

    pub fn format_temporal_literal(&self, kind: TemporalKind, value: &str) -> String {
        self.dialect.format_temporal_literal(kind, value)
    }

    pub fn interval_style(&self) -> IntervalStyle {
        self.dialect.interval_style()
    }

    pub fn remap_function(&self, name: &str) -> Option<&'static str> {
        self.dialect.remap_function(name)
    }

    pub fn type_name(&self, ty: TypeName) -> &'static str {
        self.dialect.type_name(ty)
    }

    // =========================================================================
    // Clause Syntax
    // =========================================================================

    pub fn pagination(&self) -> Pagination {
        self.dialect.pagination()
    }

    pub fn top_clause(&self, n: u64) -> String {
        self.dialect.top_clause(n)
    }

    pub fn limit_for_offset_only(&self) -> Option<&'static str> {
        self.dialect.limit_for_offset_only()
    }

    pub fn concat_operator(&self) -> &'static str {
        self.dialect.concat_operator()
    }

    pub fn concat_precedence(&self) -> Option<u16> {
        self.dialect.concat_precedence()
    }

    pub fn emit_recursive_keyword(&self) -> bool {
        self.dialect.emit_recursive_keyword()
    }

    pub fn dummy_table(&self) -> Option<&'static str> {
        self.dialect.dummy_table()
    }

    // =========================================================================
    // Emulation
    // =========================================================================

    pub fn emulates(&self, kind: OpKind) -> Option<Arity> {
        self.dialect.emulates(kind, self.version)
    }

    pub fn rejects(&self, kind: OpKind) -> Option<&'static str> {
        self.dialect.rejects(kind, self.version)
    }

    pub fn emulate<'a>(&self, call: &'a Call) -> Result<RenderPlan<'a>, UnparseError> {
        self.dialect.emulate(self, call)
    }
}

impl Default for DialectProfile {
    fn default() -> Self {
        DialectProfile {
            dialect: Dialect::Ansi,
            version: None,
            identifier_quote: QuoteStyle::Double,
            unquoted_casing: Casing::Unchanged,
            null_collation: NullCollation::High,
            type_system: TypeSystem::default(),
            features: BTreeMap::new(),
        }
    }
}
