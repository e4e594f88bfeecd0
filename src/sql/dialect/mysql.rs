//! MySQL dialect.
//!
//! MySQL specifics:
//! - Backtick identifier quoting
//! - Backslash escapes in string literals
//! - No NULLS FIRST/LAST, no FULL OUTER JOIN
//! - `WITH ROLLUP` before 8.0, `ROLLUP()` and INTERSECT/EXCEPT from 8.0
//! - CAST targets are a small fixed set (`SIGNED`, `CHAR`, `DATETIME` ...)
//! - `INTERVAL '-1-2' YEAR_MONTH`

use super::helpers;
use super::{
    DialectProfile, Feature, IntervalStyle, LiteralEscape, NullCollation, QuoteStyle,
    SqlDialect, Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::TimeUnit;
use crate::sql::node::{self, lit_int, lit_str, Call, Node, NodeExt, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// MySQL.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn minimum_version(&self) -> Version {
        Version::new(5, 0)
    }

    fn identifier_quote(&self) -> QuoteStyle {
        QuoteStyle::Backtick
    }

    fn literal_escape(&self) -> LiteralEscape {
        LiteralEscape::Backslash
    }

    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::MySql
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn limit_for_offset_only(&self) -> Option<&'static str> {
        Some("18446744073709551615")
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_mysql(name)
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::Boolean
            | TypeName::TinyInt
            | TypeName::SmallInt
            | TypeName::Integer
            | TypeName::BigInt => "SIGNED",
            TypeName::Char | TypeName::Varchar => "CHAR",
            TypeName::Real | TypeName::Double => "DOUBLE",
            TypeName::Timestamp => "DATETIME",
            TypeName::Binary | TypeName::Varbinary => "BINARY",
            other => other.as_str(),
        }
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Decimal => Some(65),
            TypeName::Time | TypeName::Timestamp => Some(6),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::GroupingFunctions | Feature::IntersectExcept => {
                helpers::at_least(version, 8, 0)
            }
            Feature::WithRollup => helpers::before(version, 8, 0),
            Feature::Offset
            | Feature::BooleanSortKey
            | Feature::IfFunction
            | Feature::TableAliasAs => true,
            Feature::NullsOrdering
            | Feature::AliasedValues
            | Feature::CharacterSet
            | Feature::FullOuterJoin
            | Feature::GroupsFrame
            | Feature::WithCube
            | Feature::FloorCeilToUnit => false,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position => Some(Arity::range(2, 3)),
            OpKind::Floor | OpKind::Truncate => Some(Arity::range(1, 2)),
            OpKind::Concat => Some(Arity::at_least(2)),
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
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(floor_to_unit(
                    rules::operand(call, 0)?,
                    unit,
                ))),
            },
            // `||` is logical OR unless PIPES_AS_CONCAT is set
            OpKind::Concat => Ok(RenderPlan::Rewrite(node::func(
                "CONCAT",
                call.operands.clone(),
            ))),
            OpKind::Truncate => match call.operands.as_slice() {
                [value] => Ok(RenderPlan::Rewrite(node::func(
                    "TRUNCATE",
                    vec![value.clone(), lit_int(0)],
                ))),
                _ => Ok(RenderPlan::Native),
            },
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}

fn floor_to_unit(value: &Node, unit: TimeUnit) -> Node {
    let format = |pattern: &str| node::func("DATE_FORMAT", vec![value.clone(), lit_str(pattern)]);
    match unit {
        TimeUnit::Year => format("%Y-01-01"),
        TimeUnit::Month => format("%Y-%m-01"),
        TimeUnit::Day => format("%Y-%m-%d"),
        TimeUnit::Hour => format("%Y-%m-%d %H:00:00"),
        TimeUnit::Minute => format("%Y-%m-%d %H:%i:00"),
        TimeUnit::Second => format("%Y-%m-%d %H:%i:%s"),
        TimeUnit::Week => node::func(
            "STR_TO_DATE",
            vec![
                node::func("DATE_FORMAT", vec![value.clone(), lit_str("%x%v-1")]),
                lit_str("%x%v-%w"),
            ],
        ),
        TimeUnit::Quarter => {
            let first_month = node::func("QUARTER", vec![value.clone()])
                .mul(lit_int(3))
                .sub(lit_int(2));
            node::func(
                "STR_TO_DATE",
                vec![
                    node::func(
                        "CONCAT",
                        vec![
                            node::func("YEAR", vec![value.clone()]),
                            lit_str("-"),
                            first_month,
                            lit_str("-01"),
                        ],
                    ),
                    lit_str("%Y-%c-%d"),
                ],
            )
        }
    }
}
