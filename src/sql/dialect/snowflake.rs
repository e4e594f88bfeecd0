//! Snowflake SQL dialect.
//!
//! Snowflake features:
//! - ANSI identifier quoting (`"`), unquoted names fold to upper case
//! - ROUND/TRUNCATE scale limited to -12..=38
//! - `IFF` instead of `IF`
//! - `INTERVAL '-1 DAY'` with the unit inside the quotes
//! - A window frame without ORDER BY is not accepted, so it is dropped
//! - Adding a DAY interval is plain day arithmetic (`d + 3`)
//! - `DATEDIFF`, `TO_VARCHAR`, `TO_DATE` and `REGEXP_INSTR` for their
//!   BigQuery and MySQL spellings

use super::helpers;
use super::{
    Casing, DialectProfile, Feature, IntervalStyle, ScaleRange, SqlDialect, Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::{IntervalLiteral, Literal, TimeUnit};
use crate::sql::node::{self, lit_int, Call, Node};
use crate::sql::operator::{Arity, OpKind};

/// Snowflake SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake;

impl SqlDialect for Snowflake {
    fn name(&self) -> &'static str {
        "snowflake"
    }

    fn minimum_version(&self) -> Version {
        Version::new(1, 0)
    }

    fn unquoted_casing(&self) -> Casing {
        Casing::Upper
    }

    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::Snowflake
    }

    fn limit_for_offset_only(&self) -> Option<&'static str> {
        Some("NULL")
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_snowflake(name)
    }

    fn numeric_scale_range(&self) -> Option<ScaleRange> {
        Some(ScaleRange { min: -12, max: 38 })
    }

    fn supports(&self, feature: Feature, _version: Option<Version>) -> bool {
        match feature {
            Feature::NullsOrdering
            | Feature::GroupingFunctions
            | Feature::Offset
            | Feature::IntersectExcept
            | Feature::BooleanSortKey
            | Feature::FullOuterJoin
            | Feature::TableAliasAs => true,
            Feature::AliasedValues
            | Feature::CharacterSet
            | Feature::IfFunction
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::FloorCeilToUnit
            | Feature::GroupsFrame => false,
        }
    }

    fn rejects(&self, kind: OpKind, _version: Option<Version>) -> Option<&'static str> {
        match kind {
            OpKind::IntersectAll | OpKind::ExceptAll => {
                Some("INTERSECT ALL and EXCEPT ALL are not available")
            }
            _ => None,
        }
    }

    fn emulates(&self, kind: OpKind, _version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position | OpKind::Substring => Some(Arity::range(2, 3)),
            OpKind::Trim | OpKind::If => Some(Arity::exact(3)),
            OpKind::Floor => Some(Arity::range(1, 2)),
            OpKind::CharLength | OpKind::Log10 => Some(Arity::exact(1)),
            OpKind::Over | OpKind::Plus | OpKind::Minus => Some(Arity::exact(2)),
            OpKind::Function => Some(Arity::at_least(0)),
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
                "POSITION",
                call.operands.clone(),
            ))),
            OpKind::Trim => {
                let (flag, chars, value) = rules::trim_operands(call)?;
                Ok(RenderPlan::Rewrite(rules::trim_by_function(flag, chars, value)))
            }
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(rules::date_trunc(
                    unit,
                    rules::operand(call, 0)?,
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
            OpKind::If => Ok(RenderPlan::Rewrite(node::func("IFF", call.operands.clone()))),
            OpKind::Log10 => {
                let value = rules::operand(call, 0)?;
                // LOG(10, 1) is exactly zero
                if value.as_literal().and_then(Literal::as_integer) == Some(1) {
                    return Ok(RenderPlan::Rewrite(lit_int(0)));
                }
                Ok(RenderPlan::Rewrite(node::func(
                    "LOG",
                    vec![lit_int(10), value.clone()],
                )))
            }
            OpKind::Over => match call.operands.as_slice() {
                [function, Node::Window(spec)] if spec.order_by.is_empty() && spec.frame.is_some() => {
                    let mut unframed = spec.clone();
                    unframed.frame = None;
                    Ok(RenderPlan::Rewrite(node::call(
                        OpKind::Over,
                        vec![function.clone(), Node::Window(unframed)],
                    )))
                }
                _ => Ok(RenderPlan::Native),
            },
            OpKind::Plus | OpKind::Minus => Ok(day_arithmetic(call)),
            OpKind::Function => Ok(named_function(call)),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}

fn interval_days(interval: &IntervalLiteral) -> Option<i64> {
    if interval.qualifier.start != TimeUnit::Day {
        return None;
    }
    interval.signed_integer()
}

fn day_interval(node: &Node) -> Option<i64> {
    match node {
        Node::Literal(Literal::Interval(interval)) => interval_days(interval),
        _ => None,
    }
}

/// `d ± INTERVAL 'n' DAY` as `d ± n`, and `d ± e * INTERVAL 'n' DAY` as `d ± e * n`.
fn day_arithmetic(call: &Call) -> RenderPlan<'_> {
    let [value, amount] = call.operands.as_slice() else {
        return RenderPlan::Native;
    };
    if let Some(days) = day_interval(amount) {
        let days = if call.kind() == OpKind::Minus { -days } else { days };
        let kind = if days < 0 { OpKind::Minus } else { OpKind::Plus };
        return RenderPlan::Rewrite(node::call(kind, vec![value.clone(), lit_int(days.abs())]));
    }
    let Node::Call(product) = amount else {
        return RenderPlan::Native;
    };
    let [left, right] = product.operands.as_slice() else {
        return RenderPlan::Native;
    };
    if product.kind() != OpKind::Times {
        return RenderPlan::Native;
    }
    let (factor, days) = match (day_interval(left), day_interval(right)) {
        (_, Some(days)) => (left, days),
        (Some(days), None) => (right, days),
        (None, None) => return RenderPlan::Native,
    };
    let scaled = if days == 1 {
        factor.clone()
    } else {
        node::call(OpKind::Times, vec![factor.clone(), lit_int(days)])
    };
    RenderPlan::Rewrite(node::call(call.kind(), vec![value.clone(), scaled]))
}

fn named_function(call: &Call) -> RenderPlan<'_> {
    let args = call.operands.as_slice();
    match call.op.name().to_ascii_uppercase().as_str() {
        // DATE_DIFF(end, start, part) -> DATEDIFF(part, start, end)
        "DATE_DIFF" => {
            RenderPlan::Rewrite(node::func("DATEDIFF", args.iter().rev().cloned().collect()))
        }
        "FORMAT_DATE" => match args {
            [format, value] => RenderPlan::Rewrite(node::func(
                "TO_VARCHAR",
                vec![value.clone(), format.clone()],
            )),
            _ => RenderPlan::Native,
        },
        "STR_TO_DATE" => RenderPlan::Rewrite(node::func("TO_DATE", args.to_vec())),
        "INSTR" => RenderPlan::Rewrite(node::func("REGEXP_INSTR", args.to_vec())),
        _ => RenderPlan::Native,
    }
}
