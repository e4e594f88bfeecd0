//! Oracle Database dialect.
//!
//! - Unquoted names fold to upper case
//! - No boolean literals, no AS before table aliases
//! - A SELECT without FROM reads from `DUAL`
//! - OFFSET/FETCH from 12c; older releases cannot paginate in SQL
//! - `MINUS` instead of `EXCEPT`
//! - `TRUNC(x, 'fmt')` for time truncation, `INSTR` for POSITION

use super::helpers;
use super::{Casing, DialectProfile, Feature, Pagination, SqlDialect, Version};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::{TimeUnit, TrimFlag};
use crate::sql::node::{self, lit_str, Call, DataTypeSpec, Node, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Oracle Database.
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl SqlDialect for Oracle {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn minimum_version(&self) -> Version {
        Version::new(10, 0)
    }

    fn unquoted_casing(&self) -> Casing {
        Casing::Upper
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn pagination(&self) -> Pagination {
        Pagination::OffsetFetch
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_oracle(name)
    }

    fn emit_recursive_keyword(&self) -> bool {
        false
    }

    fn dummy_table(&self) -> Option<&'static str> {
        Some("DUAL")
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::Varchar => "VARCHAR2",
            TypeName::Double => "BINARY_DOUBLE",
            TypeName::Real => "BINARY_FLOAT",
            TypeName::Binary | TypeName::Varbinary => "RAW",
            TypeName::TinyInt => "NUMBER(3)",
            TypeName::BigInt => "NUMBER(19)",
            TypeName::Boolean => "NUMBER(1)",
            TypeName::Decimal => "NUMBER",
            other => other.as_str(),
        }
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Varchar => Some(4000),
            TypeName::Char | TypeName::Binary | TypeName::Varbinary => Some(2000),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::Offset => helpers::at_least(version, 12, 0),
            Feature::GroupsFrame => helpers::at_least(version, 21, 0),
            Feature::NullsOrdering
            | Feature::GroupingFunctions
            | Feature::FullOuterJoin
            | Feature::IntersectExcept => true,
            Feature::TableAliasAs
            | Feature::AliasedValues
            | Feature::BooleanSortKey
            | Feature::IfFunction
            | Feature::CharacterSet
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::FloorCeilToUnit => false,
        }
    }

    fn rejects(&self, kind: OpKind, version: Option<Version>) -> Option<&'static str> {
        match kind {
            OpKind::IntersectAll | OpKind::ExceptAll if helpers::before(version, 21, 0) => {
                Some("INTERSECT ALL and MINUS ALL need Oracle 21c")
            }
            _ => None,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position | OpKind::Substring => Some(Arity::range(2, 3)),
            OpKind::Trim => Some(Arity::exact(3)),
            OpKind::Floor | OpKind::Truncate => Some(Arity::range(1, 2)),
            OpKind::CharLength => Some(Arity::exact(1)),
            OpKind::Except | OpKind::ExceptAll => Some(Arity::exact(2)),
            _ => None,
        }
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        match call.kind() {
            OpKind::Position => Ok(RenderPlan::Rewrite(instr(call))),
            OpKind::Trim => trim(call),
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(trunc_to_unit(
                    rules::operand(call, 0)?,
                    unit,
                ))),
            },
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
            OpKind::Except => Ok(RenderPlan::emit(move |u, left, right| {
                u.set_operation(call, "MINUS", left, right)
            })),
            OpKind::ExceptAll => Ok(RenderPlan::emit(move |u, left, right| {
                u.set_operation(call, "MINUS ALL", left, right)
            })),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}

/// `INSTR(haystack, needle[, start])`
pub(super) fn instr(call: &Call) -> Node {
    let mut args = call.operands.clone();
    args.swap(0, 1);
    node::func("INSTR", args)
}

/// `TRUNC(x, 'fmt')`; seconds by dropping the fractional part.
pub(super) fn trunc_to_unit(value: &Node, unit: TimeUnit) -> Node {
    match unit {
        TimeUnit::Second => node::cast(
            value.clone(),
            DataTypeSpec::new(TypeName::Timestamp).with_precision(0),
        ),
        _ => node::func(
            "TRUNC",
            vec![value.clone(), lit_str(rules::trunc_format(unit))],
        ),
    }
}

/// TRIM takes a single character; longer sets go through LTRIM/RTRIM.
fn trim(call: &Call) -> Result<RenderPlan<'_>, UnparseError> {
    let (flag, chars, value) = rules::trim_operands(call)?;
    let Some(set) = rules::string_literal(chars) else {
        return Ok(RenderPlan::Native);
    };
    if set.chars().count() <= 1 {
        return Ok(RenderPlan::Native);
    }
    let ltrim = |v: Node| node::func("LTRIM", vec![v, chars.clone()]);
    let rtrim = |v: Node| node::func("RTRIM", vec![v, chars.clone()]);
    let rewritten = match flag {
        TrimFlag::Leading => ltrim(value.clone()),
        TrimFlag::Trailing => rtrim(value.clone()),
        TrimFlag::Both => ltrim(rtrim(value.clone())),
    };
    Ok(RenderPlan::Rewrite(rewritten))
}
