//! DuckDB SQL dialect.
//!
//! DuckDB is PostgreSQL-compatible with extensions:
//! - ANSI identifier quoting (`"`)
//! - NULLs sort last in both directions
//! - GROUPS frames and every grouping construct

use super::helpers;
use super::postgres::{
    emulate_postgres_family, emulates_postgres_family, POSTGRES_CONCAT_PRECEDENCE,
};
use super::{DialectProfile, Feature, NullCollation, SqlDialect, Version};
use crate::error::UnparseError;
use crate::sql::emulation::RenderPlan;
use crate::sql::node::Call;
use crate::sql::operator::{Arity, OpKind};

/// DuckDB SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct DuckDb;

impl SqlDialect for DuckDb {
    fn name(&self) -> &'static str {
        "duckdb"
    }

    fn concat_precedence(&self) -> Option<u16> {
        Some(POSTGRES_CONCAT_PRECEDENCE)
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Last
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_duckdb(name)
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        !matches!(
            feature,
            Feature::CharacterSet
                | Feature::WithRollup
                | Feature::WithCube
                | Feature::FloorCeilToUnit
        )
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        emulates_postgres_family(kind)
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        emulate_postgres_family(self.name(), profile, call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::emulation::expand_order_item;
    use crate::sql::node::{col, OrderItem};

    #[test]
    fn test_nulls_last_is_default() {
        let profile = DialectProfile::for_name("duckdb", None).unwrap();
        let item = OrderItem::desc(col("a")).nulls_last();
        assert_eq!(expand_order_item(&profile, &item), vec![OrderItem::desc(col("a"))]);
        assert!(DuckDb.supports(Feature::IfFunction, None));
    }
}
