//! BigQuery (GoogleSQL) dialect.
//!
//! - Identifiers are bare when simple, backticked otherwise
//! - Backslash escapes in string literals
//! - NULLs sort low
//! - Bare set operators are not accepted: `UNION DISTINCT`, `INTERSECT DISTINCT`
//! - `STRPOS`, `SUBSTR`, `TIMESTAMP_TRUNC` in place of the standard forms

use super::helpers;
use super::{
    DialectProfile, Feature, IntervalStyle, LiteralEscape, NullCollation, QuoteStyle,
    SqlDialect, Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::TimeUnit;
use crate::sql::node::{self, Call, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Google BigQuery.
#[derive(Debug, Clone, Copy)]
pub struct BigQuery;

impl SqlDialect for BigQuery {
    fn name(&self) -> &'static str {
        "bigquery"
    }

    fn minimum_version(&self) -> Version {
        Version::new(1, 0)
    }

    fn identifier_quote(&self) -> QuoteStyle {
        QuoteStyle::None
    }

    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Backslash
    }

    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::BigQuery
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn limit_for_offset_only(&self) -> Option<&'static str> {
        Some("9223372036854775807")
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_bigquery(name)
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::TinyInt | TypeName::SmallInt | TypeName::Integer | TypeName::BigInt => {
                "INT64"
            }
            TypeName::Char | TypeName::Varchar => "STRING",
            TypeName::Real | TypeName::Double => "FLOAT64",
            TypeName::Decimal => "NUMERIC",
            TypeName::Boolean => "BOOL",
            TypeName::Binary | TypeName::Varbinary => "BYTES",
            other => other.as_str(),
        }
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        match feature {
            Feature::NullsOrdering
            | Feature::GroupingFunctions
            | Feature::Offset
            | Feature::FullOuterJoin
            | Feature::BooleanSortKey
            | Feature::IntersectExcept
            | Feature::IfFunction
            | Feature::TableAliasAs => true,
            Feature::AliasedValues
            | Feature::CharacterSet
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::FloorCeilToUnit
            | Feature::GroupsFrame => false,
        }
    }

    fn rejects(&self, kind: OpKind, _version: Option<Version>) -> Option<&'static str> {
        match kind {
            OpKind::IntersectAll | OpKind::ExceptAll => {
                Some("only the DISTINCT forms of INTERSECT and EXCEPT exist")
            }
            _ => None,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position => Some(Arity::exact(2)),
            OpKind::Trim => Some(Arity::exact(3)),
            OpKind::Floor | OpKind::Truncate => Some(Arity::range(1, 2)),
            OpKind::CharLength => Some(Arity::exact(1)),
            OpKind::Substring => Some(Arity::range(2, 3)),
            OpKind::Union | OpKind::Intersect | OpKind::Except => Some(Arity::exact(2)),
            _ => None,
        }
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        match call.kind() {
            OpKind::Position => {
                let [needle, haystack] = call.operands.as_slice() else {
                    return Err(helpers::unhandled(self.name(), call));
                };
                Ok(RenderPlan::emit(move |u, _, _| {
                    u.function("STRPOS", &[haystack, needle])
                }))
            }
            OpKind::Trim => {
                let (flag, chars, value) = rules::trim_operands(call)?;
                Ok(RenderPlan::Rewrite(rules::trim_by_function(flag, chars, value)))
            }
            OpKind::Floor => {
                let Some(unit) = rules::floor_unit(call)? else {
                    return Ok(RenderPlan::Native);
                };
                let value = rules::operand(call, 0)?;
                let part = match unit {
                    TimeUnit::Week => "ISOWEEK",
                    other => other.as_str(),
                };
                Ok(RenderPlan::emit(move |u, _, _| {
                    let f = u.start_function("TIMESTAMP_TRUNC");
                    u.sep()?;
                    u.node(value, 0, 0)?;
                    u.sep()?;
                    u.keyword(part);
                    u.end(f)
                }))
            }
            OpKind::CharLength => Ok(RenderPlan::Rewrite(node::func(
                "LENGTH",
                call.operands.clone(),
            ))),
            OpKind::Substring => Ok(RenderPlan::Rewrite(node::func(
                "SUBSTR",
                call.operands.clone(),
            ))),
            OpKind::Truncate => Ok(RenderPlan::Rewrite(node::func(
                "TRUNC",
                rules::scaled_operands(call, profile.numeric_scale_range()),
            ))),
            OpKind::Union => Ok(RenderPlan::emit(move |u, left, right| {
                u.set_operation(call, "UNION DISTINCT", left, right)
            })),
            OpKind::Intersect => Ok(RenderPlan::emit(move |u, left, right| {
                u.set_operation(call, "INTERSECT DISTINCT", left, right)
            })),
            OpKind::Except => Ok(RenderPlan::emit(move |u, left, right| {
                u.set_operation(call, "EXCEPT DISTINCT", left, right)
            })),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}
