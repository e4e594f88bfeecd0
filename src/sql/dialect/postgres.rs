//! PostgreSQL dialect.
//!
//! PostgreSQL is close to the standard. Differences handled here:
//! - Unquoted names fold to lower case
//! - `DOUBLE PRECISION`, `BYTEA` and no `TINYINT`
//! - `DATE_TRUNC` for time truncation, `TRUNC` for numbers
//! - GROUPS frames from 11, grouping functions from 9.5
//!
//! Redshift and DuckDB share the emulation rules defined here.

use super::helpers;
use super::{Casing, DialectProfile, Feature, SqlDialect, Version};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::node::{self, Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// PostgreSQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn concat_precedence(&self) -> Option<u16> {
        Some(POSTGRES_CONCAT_PRECEDENCE)
    }

    fn minimum_version(&self) -> Version {
        Version::new(9, 0)
    }

    fn unquoted_casing(&self) -> Casing {
        Casing::Lower
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_postgres(name)
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        postgres_type_name(ty)
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Decimal => Some(1000),
            TypeName::Char | TypeName::Varchar => Some(10_485_760),
            TypeName::Time | TypeName::Timestamp => Some(6),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::GroupsFrame => helpers::at_least(version, 11, 0),
            Feature::GroupingFunctions => helpers::at_least(version, 9, 5),
            Feature::WithRollup
            | Feature::WithCube
            | Feature::IfFunction
            | Feature::FloorCeilToUnit
            | Feature::CharacterSet => false,
            _ => true,
        }
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

pub(super) fn postgres_type_name(ty: TypeName) -> &'static str {
    match ty {
        TypeName::TinyInt => "SMALLINT",
        TypeName::Double => "DOUBLE PRECISION",
        TypeName::Binary | TypeName::Varbinary => "BYTEA",
        other => other.as_str(),
    }
}

/// Rules shared by PostgreSQL and its descendants.
pub(super) fn emulates_postgres_family(kind: OpKind) -> Option<Arity> {
    match kind {
        OpKind::Position => Some(Arity::exact(2)),
        OpKind::Floor | OpKind::Truncate => Some(Arity::range(1, 2)),
        _ => None,
    }
}

/// `||` binds below `+` and `-` but above comparisons and LIKE.
pub(super) const POSTGRES_CONCAT_PRECEDENCE: u16 = 35;

pub(super) fn emulate_postgres_family<'a>(
    dialect: &'static str,
    profile: &DialectProfile,
    call: &'a Call,
) -> Result<RenderPlan<'a>, UnparseError> {
    match call.kind() {
        OpKind::Position => Ok(RenderPlan::Native),
        OpKind::Floor => match rules::floor_unit(call)? {
            None => Ok(RenderPlan::Native),
            Some(unit) => Ok(RenderPlan::Rewrite(rules::date_trunc(
                unit,
                rules::operand(call, 0)?,
            ))),
        },
        OpKind::Truncate => Ok(RenderPlan::Rewrite(node::func(
            "TRUNC",
            rules::scaled_operands(call, profile.numeric_scale_range()),
        ))),
        _ => Err(helpers::unhandled(dialect, call)),
    }
}
