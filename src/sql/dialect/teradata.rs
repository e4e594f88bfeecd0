//! Teradata dialect.
//!
//! - `SELECT TOP n`, no way to skip rows
//! - No boolean literals and no NULLS FIRST/LAST
//! - `CAST(x AS VARCHAR(n) CHARACTER SET UNICODE)`
//! - Oracle-style `TRUNC` and `INSTR`

use super::helpers;
use super::oracle::{instr, trunc_to_unit};
use super::{DialectProfile, Feature, NullCollation, Pagination, SqlDialect, Version};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::node::{Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Teradata Vantage.
#[derive(Debug, Clone, Copy)]
pub struct Teradata;

impl SqlDialect for Teradata {
    fn name(&self) -> &'static str {
        "teradata"
    }

    fn minimum_version(&self) -> Version {
        Version::new(14, 0)
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn pagination(&self) -> Pagination {
        Pagination::Top
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::TinyInt | TypeName::Boolean => "BYTEINT",
            TypeName::Double | TypeName::Real => "FLOAT",
            TypeName::Binary => "BYTE",
            TypeName::Varbinary => "VARBYTE",
            other => other.as_str(),
        }
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Char | TypeName::Varchar => Some(64000),
            TypeName::Time | TypeName::Timestamp => Some(6),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        match feature {
            Feature::CharacterSet
            | Feature::GroupingFunctions
            | Feature::FullOuterJoin
            | Feature::IntersectExcept
            | Feature::TableAliasAs => true,
            Feature::NullsOrdering
            | Feature::AliasedValues
            | Feature::Offset
            | Feature::BooleanSortKey
            | Feature::IfFunction
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::FloorCeilToUnit
            | Feature::GroupsFrame => false,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position => Some(Arity::range(2, 3)),
            OpKind::Floor => Some(Arity::range(1, 2)),
            _ => None,
        }
    }

    fn emulate<'a>(
        &self,
        _profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        match call.kind() {
            OpKind::Position if call.operands.len() == 2 => Ok(RenderPlan::Native),
            OpKind::Position => Ok(RenderPlan::Rewrite(instr(call))),
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(trunc_to_unit(
                    rules::operand(call, 0)?,
                    unit,
                ))),
            },
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}
