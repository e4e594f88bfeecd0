//! Operator emulation table.
//!
//! [`resolve`] decides, for one call under one profile, whether the call is
//! rendered natively, replaced by another call tree, or emitted by a
//! dialect-specific recipe. The per-product rules live next to each product
//! in [`crate::sql::dialect`] (`SqlDialect::emulates` / `SqlDialect::emulate`);
//! this module applies them in a fixed order together with the rewrites that
//! hold for every product:
//!
//! 1. arity check against the operator definition
//! 2. generic rewrites (`CUBE(x)` → `ROLLUP(x)`, `-INTERVAL` → flipped sign)
//! 3. kinds the product rejects outright
//! 4. the product's own rule, if it claims the kind
//! 5. generic fallbacks (`IF` → `CASE`, scale clamping)
//! 6. feature requirements of the native form
//!
//! Query-level policies that are not tied to a single call (null ordering,
//! trailing `WITH ROLLUP`) are planned here too.

pub mod rules;

use std::fmt;

use tracing::trace;

use crate::error::UnparseError;
use crate::sql::dialect::{Dialect, DialectProfile, Feature};
use crate::sql::literal::Literal;
use crate::sql::node::{self, Call, Node, NodeExt, NullsOrder, OrderItem, SortDir};
use crate::sql::operator::{OpKind, Operator};
use crate::sql::unparse::Unparser;

/// Direct emission: writes the call through the unparser, given the
/// precedence bounds of the position it is written at.
pub type Recipe<'a> =
    Box<dyn FnOnce(&mut Unparser<'_>, u16, u16) -> Result<(), UnparseError> + 'a>;

/// How a call is rendered.
pub enum RenderPlan<'a> {
    /// Render with the generic syntax of the operator.
    Native,
    /// Render this tree in place of the call.
    Rewrite(Node),
    /// Hand the writer to a recipe.
    DirectEmit(Recipe<'a>),
}

impl<'a> RenderPlan<'a> {
    pub fn emit<F>(recipe: F) -> Self
    where
        F: FnOnce(&mut Unparser<'_>, u16, u16) -> Result<(), UnparseError> + 'a,
    {
        RenderPlan::DirectEmit(Box::new(recipe))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RenderPlan::Native => "native",
            RenderPlan::Rewrite(_) => "rewrite",
            RenderPlan::DirectEmit(_) => "direct",
        }
    }
}

impl fmt::Debug for RenderPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPlan::Native => f.write_str("Native"),
            RenderPlan::Rewrite(node) => f.debug_tuple("Rewrite").field(node).finish(),
            RenderPlan::DirectEmit(_) => f.write_str("DirectEmit(..)"),
        }
    }
}

/// Decide how `call` is rendered under `profile`.
pub fn resolve<'a>(
    profile: &DialectProfile,
    call: &'a Call,
) -> Result<RenderPlan<'a>, UnparseError> {
    let kind = call.kind();
    let arity = call.op.arity();
    let count = call.operands.len();
    if !arity.accepts(count) {
        return Err(UnparseError::unsupported(
            call.op.name(),
            profile.name(),
            format!("expects {arity} operands, got {count}"),
        ));
    }

    if let Some(node) = generic_rewrite(call) {
        trace!(target: "sqlshift::emulation", operator = %call.op, dialect = profile.name(), "generic rewrite");
        return Ok(RenderPlan::Rewrite(node));
    }

    if let Some(reason) = profile.rejects(kind) {
        return Err(UnparseError::unsupported(call.op.name(), profile.name(), reason));
    }

    if let Some(claimed) = profile.emulates(kind) {
        if !claimed.accepts(count) {
            return Err(UnparseError::unsupported(
                call.op.name(),
                profile.name(),
                format!("unsupported arity for emulation: {count} operands, rule takes {claimed}"),
            ));
        }
        let plan = profile.emulate(call)?;
        if !matches!(plan, RenderPlan::Native) {
            trace!(
                target: "sqlshift::emulation",
                operator = %call.op,
                dialect = profile.name(),
                plan = plan.label(),
                "dialect rule"
            );
            return Ok(plan);
        }
    }

    if let Some(node) = generic_fallback(profile, call) {
        trace!(target: "sqlshift::emulation", operator = %call.op, dialect = profile.name(), "generic fallback");
        return Ok(RenderPlan::Rewrite(node));
    }

    check_required_features(profile, call)?;
    Ok(RenderPlan::Native)
}

/// Rewrites that are valid on every product.
fn generic_rewrite(call: &Call) -> Option<Node> {
    match call.kind() {
        OpKind::Cube if call.operands.len() == 1 => {
            Some(node::call(OpKind::Rollup, call.operands.clone()))
        }
        OpKind::UnaryMinus => match call.operand(0) {
            Some(Node::Literal(Literal::Interval(interval))) => {
                Some(Node::Literal(Literal::Interval(interval.negated())))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Rewrites applied when the product has no rule of its own.
fn generic_fallback(profile: &DialectProfile, call: &Call) -> Option<Node> {
    match call.kind() {
        OpKind::If if !profile.supports(Feature::IfFunction) => {
            let [cond, then, otherwise] = call.operands.as_slice() else {
                return None;
            };
            Some(node::case_when(
                vec![(cond.clone(), then.clone())],
                Some(otherwise.clone()),
            ))
        }
        // `/INT` only parses as the canonical form
        OpKind::DivideInteger if profile.dialect() != Dialect::Ansi => Some(node::call(
            OpKind::Floor,
            vec![node::call(OpKind::Divide, call.operands.clone())],
        )),
        OpKind::Round | OpKind::Truncate => {
            let range = profile.numeric_scale_range()?;
            let [value, scale] = call.operands.as_slice() else {
                return None;
            };
            if rules::scale_in_range(scale, range) {
                return None;
            }
            // a plain function keeps the rewrite from being clamped again
            Some(Node::Call(Call::new(
                Operator::function(call.op.name().to_string()),
                vec![value.clone(), rules::clamp_scale(scale, range)],
            )))
        }
        _ => None,
    }
}

fn check_required_features(profile: &DialectProfile, call: &Call) -> Result<(), UnparseError> {
    let required = match call.kind() {
        OpKind::Rollup | OpKind::Cube | OpKind::GroupingSets => Some(Feature::GroupingFunctions),
        OpKind::Intersect | OpKind::IntersectAll | OpKind::Except | OpKind::ExceptAll => {
            Some(Feature::IntersectExcept)
        }
        OpKind::Floor | OpKind::Ceil if call.operands.len() == 2 => Some(Feature::FloorCeilToUnit),
        OpKind::If => Some(Feature::IfFunction),
        _ => None,
    };
    match required {
        Some(feature) if !profile.supports(feature) => Err(UnparseError::unsupported(
            call.op.name(),
            profile.name(),
            format!("requires {feature}"),
        )),
        _ => Ok(()),
    }
}

// =============================================================================
// Null ordering
// =============================================================================

/// Expand one ORDER BY item into the keys actually written.
///
/// The returned items carry `nulls` only where `NULLS FIRST|LAST` should be
/// printed. A synthetic key is placed before the item when the product cannot
/// say `NULLS ...` and its default placement differs from the request.
pub fn expand_order_item(profile: &DialectProfile, item: &OrderItem) -> Vec<OrderItem> {
    let Some(requested) = item.nulls else {
        return vec![item.clone()];
    };
    let descending = item.dir == SortDir::Desc;
    let nulls_first = requested == NullsOrder::First;

    if profile.null_collation().nulls_first(descending) == nulls_first {
        trace!(target: "sqlshift::emulation", dialect = profile.name(), "null ordering matches collation");
        return vec![item.without_nulls()];
    }
    if profile.supports(Feature::NullsOrdering) {
        return vec![item.clone()];
    }

    let key = if profile.supports(Feature::BooleanSortKey) {
        item.expr.clone().is_null()
    } else {
        node::case_when(
            vec![(item.expr.clone().is_null(), node::lit_int(1))],
            Some(node::lit_int(0)),
        )
    };
    let synthetic = OrderItem {
        expr: key,
        dir: if nulls_first { SortDir::Desc } else { SortDir::Asc },
        nulls: None,
    };
    trace!(
        target: "sqlshift::emulation",
        dialect = profile.name(),
        nulls_first,
        "null ordering emulated with a synthetic key"
    );
    vec![synthetic, item.without_nulls()]
}

// =============================================================================
// GROUP BY
// =============================================================================

/// How a GROUP BY clause is written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupByPlan<'a> {
    /// `GROUP BY k1, k2, ...`, each key resolved normally.
    Plain(&'a [Node]),
    /// `GROUP BY k1, k2 WITH ROLLUP` (or `WITH CUBE`).
    Trailing {
        keys: &'a [Node],
        modifier: &'static str,
    },
}

/// Choose between `ROLLUP(...)` and the trailing `WITH ROLLUP` form.
pub fn plan_group_by<'a>(profile: &DialectProfile, keys: &'a [Node]) -> GroupByPlan<'a> {
    let [Node::Call(only)] = keys else {
        return GroupByPlan::Plain(keys);
    };
    if profile.supports(Feature::GroupingFunctions) {
        return GroupByPlan::Plain(keys);
    }
    let trailing = match only.kind() {
        OpKind::Rollup if profile.supports(Feature::WithRollup) => Some("WITH ROLLUP"),
        // CUBE of one key is a ROLLUP
        OpKind::Cube if only.operands.len() == 1 && profile.supports(Feature::WithRollup) => {
            Some("WITH ROLLUP")
        }
        OpKind::Cube if profile.supports(Feature::WithCube) => Some("WITH CUBE"),
        _ => None,
    };
    match trailing {
        Some(modifier) => {
            trace!(target: "sqlshift::emulation", dialect = profile.name(), modifier, "trailing GROUP BY modifier");
            GroupByPlan::Trailing {
                keys: &only.operands,
                modifier,
            }
        }
        None => GroupByPlan::Plain(keys),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::sql::dialect::Dialect;
    use crate::sql::node::{col, cube, func, lit_str, position, rollup};

    fn profile(dialect: Dialect) -> DialectProfile {
        DialectProfile::new(dialect, None).unwrap()
    }

    fn call_of(node: &Node) -> &Call {
        node.as_call().unwrap()
    }

    #[test]
    fn test_native_when_unclaimed() {
        let node = col("a").eq(1);
        let plan = resolve(&profile(Dialect::Postgres), call_of(&node)).unwrap();
        assert!(matches!(plan, RenderPlan::Native));
    }

    #[test]
    fn test_single_cube_becomes_rollup() {
        let node = cube(vec![col("product_class_id")]);
        let plan = resolve(&profile(Dialect::Ansi), call_of(&node)).unwrap();
        match plan {
            RenderPlan::Rewrite(n) => assert_eq!(n, rollup(vec![col("product_class_id")])),
            other => panic!("expected rewrite, got {other:?}"),
        }
    }

    #[test]
    fn test_three_operand_position_on_bigquery() {
        let node = position(lit_str("A"), lit_str("ABC"), Some(node::lit_int(2)));
        let err = resolve(&profile(Dialect::BigQuery), call_of(&node)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
        assert!(err.to_string().contains("unsupported arity for emulation"));
    }

    #[test]
    fn test_wrong_arity_is_rejected() {
        let node = node::call(OpKind::Between, vec![col("a"), node::lit_int(1)]);
        let err = resolve(&profile(Dialect::Ansi), call_of(&node)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
    }

    #[test]
    fn test_if_falls_back_to_case() {
        let node = node::call(OpKind::If, vec![col("c"), node::lit_int(1), node::lit_int(0)]);
        let plan = resolve(&profile(Dialect::Postgres), call_of(&node)).unwrap();
        assert!(matches!(plan, RenderPlan::Rewrite(ref n) if n.kind() == Some(OpKind::Case)));

        let plan = resolve(&profile(Dialect::MySql), call_of(&node)).unwrap();
        assert!(matches!(plan, RenderPlan::Native));
    }

    #[test]
    fn test_integer_division_floors_outside_ansi() {
        let node = node::call(OpKind::DivideInteger, vec![col("a"), col("b")]);
        let plan = resolve(&profile(Dialect::Ansi), call_of(&node)).unwrap();
        assert!(matches!(plan, RenderPlan::Native));

        let plan = resolve(&profile(Dialect::Snowflake), call_of(&node)).unwrap();
        let expected = node::call(
            OpKind::Floor,
            vec![node::call(OpKind::Divide, vec![col("a"), col("b")])],
        );
        assert!(matches!(plan, RenderPlan::Rewrite(ref n) if *n == expected));
    }

    #[test]
    fn test_intersect_requires_feature() {
        let old = DialectProfile::for_name("mysql", Some("5.7")).unwrap();
        let node = node::call(OpKind::Intersect, vec![col("a"), col("b")]);
        let err = resolve(&old, call_of(&node)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
    }

    #[test]
    fn test_plain_functions_are_native() {
        let node = func("my_udf", vec![col("a")]);
        for d in Dialect::ALL {
            let plan = resolve(&profile(*d), call_of(&node)).unwrap();
            assert!(matches!(plan, RenderPlan::Native), "{d}");
        }
    }

    #[test]
    fn test_nulls_matching_collation_adds_nothing() {
        // Postgres sorts NULLs high: DESC already puts them first
        let item = OrderItem::desc(col("c")).nulls_first();
        let keys = expand_order_item(&profile(Dialect::Postgres), &item);
        assert_eq!(keys, vec![OrderItem::desc(col("c"))]);
    }

    #[test]
    fn test_nulls_emulated_with_is_null_key() {
        let item = OrderItem::desc(col("c")).nulls_first();
        let keys = expand_order_item(&profile(Dialect::MySql), &item);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].expr, col("c").is_null());
        assert_eq!(keys[0].dir, SortDir::Desc);
        assert_eq!(keys[1], OrderItem::desc(col("c")));
    }

    #[test]
    fn test_nulls_native_when_supported() {
        let item = OrderItem::asc(col("c")).nulls_first();
        let keys = expand_order_item(&profile(Dialect::Postgres), &item);
        assert_eq!(keys, vec![item]);
    }

    #[test]
    fn test_nulls_case_key_without_boolean_sort() {
        let item = OrderItem::asc(col("c")).nulls_first();
        let keys = expand_order_item(&profile(Dialect::TSql), &item);
        // T-SQL sorts NULLs low already
        assert_eq!(keys.len(), 1);

        let item = OrderItem::asc(col("c")).nulls_last();
        let keys = expand_order_item(&profile(Dialect::TSql), &item);
        assert_eq!(keys[0].expr.kind(), Some(OpKind::Case));
    }

    #[test]
    fn test_group_by_trailing_rollup() {
        let old = DialectProfile::for_name("mysql", Some("5.7")).unwrap();
        let keys = vec![rollup(vec![col("a"), col("b")])];
        match plan_group_by(&old, &keys) {
            GroupByPlan::Trailing { keys, modifier } => {
                assert_eq!(keys.len(), 2);
                assert_eq!(modifier, "WITH ROLLUP");
            }
            other => panic!("expected trailing form, got {other:?}"),
        }

        let new = profile(Dialect::MySql);
        assert!(matches!(plan_group_by(&new, &keys), GroupByPlan::Plain(_)));
    }

    #[test]
    fn test_group_by_trailing_cube() {
        let hive = profile(Dialect::Hive);
        let keys = vec![cube(vec![col("a"), col("b")])];
        assert!(matches!(
            plan_group_by(&hive, &keys),
            GroupByPlan::Trailing { modifier: "WITH CUBE", .. }
        ));
    }
}
