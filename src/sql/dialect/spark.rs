//! Spark SQL / Databricks dialect.
//!
//! Spark shares Hive's function library but has its own parser:
//! - Backtick identifier quoting
//! - Backslash escapes in string literals
//! - `SUBSTRING(x, start, len)` in comma form
//! - OFFSET from 3.4

use super::helpers;
use super::{
    DialectProfile, Feature, LiteralEscape, NullCollation, QuoteStyle, SqlDialect, Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::node::{self, Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Apache Spark SQL.
#[derive(Debug, Clone, Copy)]
pub struct Spark;

impl SqlDialect for Spark {
    fn name(&self) -> &'static str {
        "spark"
    }

    fn minimum_version(&self) -> Version {
        Version::new(2, 0)
    }

    fn identifier_quote(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }

    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Backslash
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_spark(name)
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::Char | TypeName::Varchar => "STRING",
            TypeName::Real => "FLOAT",
            other => other.as_str(),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::Offset => helpers::at_least(version, 3, 4),
            Feature::NullsOrdering
            | Feature::AliasedValues
            | Feature::GroupingFunctions
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::IfFunction
            | Feature::IntersectExcept
            | Feature::BooleanSortKey
            | Feature::FullOuterJoin
            | Feature::TableAliasAs => true,
            Feature::GroupsFrame | Feature::CharacterSet | Feature::FloorCeilToUnit => false,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position | OpKind::Substring => Some(Arity::range(2, 3)),
            OpKind::Trim => Some(Arity::exact(3)),
            OpKind::Floor => Some(Arity::range(1, 2)),
            OpKind::CharLength => Some(Arity::exact(1)),
            OpKind::Mod => Some(Arity::exact(2)),
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
            OpKind::Position => Ok(RenderPlan::Rewrite(node::func(
                "LOCATE",
                call.operands.clone(),
            ))),
            OpKind::Trim => Ok(RenderPlan::Rewrite(rules::trim_without_characters(
                self.name(),
                call,
            )?)),
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(rules::date_trunc(
                    unit,
                    rules::operand(call, 0)?,
                ))),
            },
            OpKind::Substring => Ok(RenderPlan::Rewrite(node::func(
                "SUBSTRING",
                call.operands.clone(),
            ))),
            OpKind::CharLength => Ok(RenderPlan::Rewrite(node::func(
                "LENGTH",
                call.operands.clone(),
            ))),
            OpKind::Mod => Ok(RenderPlan::Rewrite(node::call(
                OpKind::PercentRemainder,
                call.operands.clone(),
            ))),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}
