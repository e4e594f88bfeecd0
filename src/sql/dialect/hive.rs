//! Apache Hive dialect.
//!
//! Much of what newer engines take for granted arrived late in Hive, so
//! several capabilities depend on the version:
//!
//! - `NULLS FIRST/LAST` from 2.1
//! - skipping rows (`LIMIT m, n`) from 2.0
//! - INTERSECT / EXCEPT from 2.3
//!
//! Grouping extensions are written as trailing `WITH ROLLUP` / `WITH CUBE`.
//! Time truncation goes through `DATE_FORMAT` and a cast back to TIMESTAMP.

use super::helpers;
use super::{
    DialectProfile, Feature, LiteralEscape, NullCollation, Pagination, QuoteStyle, SqlDialect,
    Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::TimeUnit;
use crate::sql::node::{self, lit_int, lit_str, Call, Node, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// Apache Hive.
#[derive(Debug, Clone, Copy)]
pub struct Hive;

impl SqlDialect for Hive {
    fn name(&self) -> &'static str {
        "hive"
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

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitComma
    }

    fn limit_for_offset_only(&self) -> Option<&'static str> {
        Some("2147483647")
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_spark(name)
    }

    fn emit_recursive_keyword(&self) -> bool {
        false
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::Binary | TypeName::Varbinary => "BINARY",
            TypeName::Real => "FLOAT",
            other => other.as_str(),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::NullsOrdering => helpers::at_least(version, 2, 1),
            Feature::Offset => helpers::at_least(version, 2, 0),
            Feature::IntersectExcept => helpers::at_least(version, 2, 3),
            Feature::WithRollup
            | Feature::WithCube
            | Feature::IfFunction
            | Feature::BooleanSortKey
            | Feature::FullOuterJoin
            | Feature::TableAliasAs => true,
            Feature::AliasedValues
            | Feature::GroupingFunctions
            | Feature::CharacterSet
            | Feature::FloorCeilToUnit
            | Feature::GroupsFrame => false,
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
            OpKind::Position => match call.operands.as_slice() {
                [needle, haystack] => Ok(RenderPlan::emit(move |u, _, _| {
                    u.function("INSTR", &[haystack, needle])
                })),
                _ => Ok(RenderPlan::Rewrite(node::func("LOCATE", call.operands.clone()))),
            },
            OpKind::Trim => Ok(RenderPlan::Rewrite(rules::trim_without_characters(
                self.name(),
                call,
            )?)),
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(RenderPlan::Rewrite(floor_to_unit(
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
            OpKind::Mod => Ok(RenderPlan::Rewrite(node::call(
                OpKind::PercentRemainder,
                call.operands.clone(),
            ))),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}

/// `FLOOR(x TO unit)` through DATE_FORMAT and a cast back to TIMESTAMP.
fn floor_to_unit(value: &Node, unit: TimeUnit) -> Node {
    let truncated = match unit {
        TimeUnit::Quarter => node::func("TRUNC", vec![value.clone(), lit_str("Q")]),
        TimeUnit::Week => {
            // 1900-01-01 was a Monday
            let days_since_monday = node::func(
                "PMOD",
                vec![
                    node::func("DATEDIFF", vec![value.clone(), lit_str("1900-01-01")]),
                    lit_int(7),
                ],
            );
            node::func("DATE_SUB", vec![value.clone(), days_since_monday])
        }
        _ => {
            let pattern = match unit {
                TimeUnit::Year => "yyyy-01-01 00:00:00",
                TimeUnit::Month => "yyyy-MM-01 00:00:00",
                TimeUnit::Day => "yyyy-MM-dd 00:00:00",
                TimeUnit::Hour => "yyyy-MM-dd HH:00:00",
                TimeUnit::Minute => "yyyy-MM-dd HH:mm:00",
                _ => "yyyy-MM-dd HH:mm:ss",
            };
            node::func("DATE_FORMAT", vec![value.clone(), lit_str(pattern)])
        }
    };
    rules::cast_to(truncated, TypeName::Timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::literal::TrimFlag;
    use crate::sql::node::col;
    use crate::sql::unparse::unparse;

    fn hive(version: Option<&str>) -> DialectProfile {
        DialectProfile::for_name("hive", version).unwrap()
    }

    #[test]
    fn test_position() {
        let sql = unparse(&hive(None), &node::position(lit_str("a"), col("s"), None)).unwrap();
        assert_eq!(sql, "INSTR(s, 'a')");
        let sql = unparse(
            &hive(None),
            &node::position(lit_str("a"), col("s"), Some(lit_int(3))),
        )
        .unwrap();
        assert_eq!(sql, "LOCATE('a', s, 3)");
    }

    #[test]
    fn test_floor_day() {
        let sql = unparse(&hive(None), &node::floor_to(col("ts"), TimeUnit::Day)).unwrap();
        assert_eq!(
            sql,
            "CAST(DATE_FORMAT(ts, 'yyyy-MM-dd 00:00:00') AS TIMESTAMP)"
        );
    }

    #[test]
    fn test_floor_week() {
        let sql = unparse(&hive(None), &node::floor_to(col("ts"), TimeUnit::Week)).unwrap();
        assert_eq!(
            sql,
            "CAST(DATE_SUB(ts, PMOD(DATEDIFF(ts, '1900-01-01'), 7)) AS TIMESTAMP)"
        );
    }

    #[test]
    fn test_trim() {
        let sql = unparse(&hive(None), &node::trim(TrimFlag::Both, " ", col("s"))).unwrap();
        assert_eq!(sql, "TRIM(s)");
        let sql = unparse(&hive(None), &node::trim(TrimFlag::Leading, "a", col("s"))).unwrap();
        assert_eq!(sql, "REGEXP_REPLACE(s, '^(a)*', '')");
        assert!(unparse(&hive(None), &node::trim(TrimFlag::Both, col("c"), col("s"))).is_err());
    }

    #[test]
    fn test_mod_as_operator() {
        let sql = unparse(&hive(None), &node::call(OpKind::Mod, vec![col("a"), lit_int(2)]))
            .unwrap();
        assert_eq!(sql, "a % 2");
    }

    #[test]
    fn test_version_gates() {
        assert!(!hive(Some("1.2")).supports(Feature::Offset));
        assert!(hive(Some("2.0")).supports(Feature::Offset));
        assert!(!hive(Some("2.2")).supports(Feature::IntersectExcept));
        assert!(hive(Some("2.3")).supports(Feature::IntersectExcept));
    }
}
