//! T-SQL (SQL Server / Azure SQL) dialect.
//!
//! T-SQL has significant differences from ANSI:
//! - Square bracket identifier quoting (`[name]`)
//! - No boolean literals (`1`/`0`)
//! - TOP for simple limiting, OFFSET FETCH (2012+) to skip rows, which
//!   requires an ORDER BY
//! - N'...' prefix for Unicode strings
//! - No RECURSIVE keyword for recursive CTEs
//! - String concatenation with `+`
//! - No INTERVAL literals: date arithmetic goes through DATEADD
//! - Date truncation through CONVERT with ISO 8601 style 126

use super::helpers;
use super::{
    DialectProfile, Feature, IntervalStyle, NullCollation, Pagination, QuoteStyle, SqlDialect,
    TemporalKind, Version,
};
use crate::error::UnparseError;
use crate::sql::emulation::{rules, RenderPlan};
use crate::sql::literal::{Literal, TimeUnit, TrimFlag};
use crate::sql::node::{self, lit_int, Call, Node, TypeName};
use crate::sql::operator::{Arity, OpKind};

/// T-SQL (SQL Server) dialect.
#[derive(Debug, Clone, Copy)]
pub struct TSql;

impl SqlDialect for TSql {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn minimum_version(&self) -> Version {
        Version::new(9, 0)
    }

    fn identifier_quote(&self) -> QuoteStyle {
        QuoteStyle::Bracket
    }

    fn unicode_string_prefix(&self) -> bool {
        true
    }

    fn format_bool(&self, b: bool) -> &'static str {
        helpers::format_bool_numeric(b)
    }

    fn format_temporal_literal(&self, kind: TemporalKind, value: &str) -> String {
        let ty = match kind {
            TemporalKind::Date => "DATE",
            TemporalKind::Time => "TIME",
            TemporalKind::Timestamp => "DATETIME2",
        };
        format!("CAST({} AS {ty})", helpers::quote_string_single(value))
    }

    fn interval_style(&self) -> IntervalStyle {
        IntervalStyle::Unsupported
    }

    fn null_collation(&self) -> NullCollation {
        NullCollation::Low
    }

    fn pagination(&self) -> Pagination {
        Pagination::Top
    }

    fn top_clause(&self, n: u64) -> String {
        format!("TOP ({n})")
    }

    fn concat_operator(&self) -> &'static str {
        "+"
    }

    fn remap_function(&self, name: &str) -> Option<&'static str> {
        helpers::remap_function_tsql(name)
    }

    fn emit_recursive_keyword(&self) -> bool {
        // recursion is implied by the self-reference
        false
    }

    fn type_name(&self, ty: TypeName) -> &'static str {
        match ty {
            TypeName::Boolean => "BIT",
            TypeName::Double => "FLOAT",
            TypeName::Timestamp => "DATETIME2",
            other => other.as_str(),
        }
    }

    fn max_precision(&self, ty: TypeName) -> Option<u32> {
        match ty {
            TypeName::Char | TypeName::Varchar | TypeName::Binary | TypeName::Varbinary => {
                Some(8000)
            }
            TypeName::Time | TypeName::Timestamp => Some(7),
            other => helpers::default_max_precision(other),
        }
    }

    fn supports(&self, feature: Feature, version: Option<Version>) -> bool {
        match feature {
            Feature::GroupingFunctions => helpers::at_least(version, 10, 0),
            Feature::Offset => helpers::at_least(version, 11, 0),
            Feature::AliasedValues
            | Feature::WithRollup
            | Feature::WithCube
            | Feature::IntersectExcept
            | Feature::FullOuterJoin
            | Feature::TableAliasAs => true,
            Feature::NullsOrdering
            | Feature::BooleanSortKey
            | Feature::IfFunction
            | Feature::GroupsFrame
            | Feature::CharacterSet
            | Feature::FloorCeilToUnit => false,
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

    fn emulates(&self, kind: OpKind, version: Option<Version>) -> Option<Arity> {
        match kind {
            OpKind::Position | OpKind::Substring => Some(Arity::range(2, 3)),
            OpKind::Trim => Some(Arity::exact(3)),
            OpKind::Floor | OpKind::Round | OpKind::Truncate => Some(Arity::range(1, 2)),
            OpKind::CharLength => Some(Arity::exact(1)),
            OpKind::Mod | OpKind::Plus | OpKind::Minus => Some(Arity::exact(2)),
            OpKind::If if helpers::at_least(version, 11, 0) => Some(Arity::exact(3)),
            _ => None,
        }
    }

    fn emulate<'a>(
        &self,
        profile: &DialectProfile,
        call: &'a Call,
    ) -> Result<RenderPlan<'a>, UnparseError> {
        let ops = call.operands.as_slice();
        let range = profile.numeric_scale_range();
        match call.kind() {
            OpKind::Position => Ok(RenderPlan::Rewrite(node::func("CHARINDEX", ops.to_vec()))),
            OpKind::Trim => trim(profile, call),
            OpKind::Floor => match rules::floor_unit(call)? {
                None => Ok(RenderPlan::Native),
                Some(unit) => Ok(floor_to_unit(rules::operand(call, 0)?, unit)),
            },
            OpKind::CharLength => Ok(RenderPlan::Rewrite(node::func("LEN", ops.to_vec()))),
            OpKind::Substring => match ops {
                // LEN drops trailing blanks; a byte count covers every character
                [value, start] => Ok(RenderPlan::Rewrite(node::func(
                    "SUBSTRING",
                    vec![
                        value.clone(),
                        start.clone(),
                        node::func("DATALENGTH", vec![value.clone()]),
                    ],
                ))),
                _ => Ok(RenderPlan::Rewrite(node::func("SUBSTRING", ops.to_vec()))),
            },
            OpKind::Round => match ops {
                [value] => Ok(RenderPlan::Rewrite(node::func(
                    "ROUND",
                    vec![value.clone(), rules::scale_operand(&lit_int(0), range)],
                ))),
                _ => Ok(RenderPlan::Native),
            },
            OpKind::Truncate => {
                let value = rules::operand(call, 0)?;
                let scale = rules::scale_operand(call.operand(1).unwrap_or(&lit_int(0)), range);
                // ROUND with a non-zero third argument truncates
                Ok(RenderPlan::Rewrite(node::func(
                    "ROUND",
                    vec![value.clone(), scale, lit_int(1)],
                )))
            }
            OpKind::Mod => Ok(RenderPlan::Rewrite(node::call(
                OpKind::PercentRemainder,
                ops.to_vec(),
            ))),
            OpKind::If => Ok(RenderPlan::Rewrite(node::func("IIF", ops.to_vec()))),
            OpKind::Plus | OpKind::Minus => date_add(call),
            _ => Err(helpers::unhandled(self.name(), call)),
        }
    }
}

fn trim<'a>(profile: &DialectProfile, call: &'a Call) -> Result<RenderPlan<'a>, UnparseError> {
    let (flag, chars, value) = rules::trim_operands(call)?;
    let version = profile.version();
    let whitespace = rules::is_whitespace_literal(chars);

    match flag {
        TrimFlag::Both if helpers::at_least(version, 14, 0) => {
            if whitespace {
                return Ok(RenderPlan::Rewrite(node::func("TRIM", vec![value.clone()])));
            }
            Ok(RenderPlan::emit(move |u, _, _| {
                let f = u.start_function("TRIM");
                u.sep()?;
                u.node(chars, 0, 0)?;
                u.keyword("FROM");
                u.node(value, 0, 0)?;
                u.end(f)
            }))
        }
        TrimFlag::Both if whitespace => Ok(RenderPlan::Rewrite(node::func(
            "LTRIM",
            vec![node::func("RTRIM", vec![value.clone()])],
        ))),
        _ if whitespace => Ok(RenderPlan::Rewrite(node::func(
            rules::trim_function(flag),
            vec![value.clone()],
        ))),
        TrimFlag::Leading | TrimFlag::Trailing if helpers::at_least(version, 16, 0) => {
            Ok(RenderPlan::Rewrite(node::func(
                rules::trim_function(flag),
                vec![value.clone(), chars.clone()],
            )))
        }
        _ => Err(UnparseError::unsupported(
            call.op.name(),
            profile.name(),
            "trimming characters other than whitespace needs a newer SQL Server",
        )),
    }
}

/// `FLOOR(x TO unit)` by formatting to an ISO 8601 prefix and converting back.
fn floor_to_unit(value: &Node, unit: TimeUnit) -> RenderPlan<'_> {
    match unit {
        TimeUnit::Quarter => RenderPlan::emit(move |u, _, _| {
            let add = u.start_function("DATEADD");
            u.sep()?;
            u.keyword("qq");
            u.sep()?;
            let diff = u.start_function("DATEDIFF");
            u.sep()?;
            u.keyword("qq");
            u.sep()?;
            u.keyword("0");
            u.sep()?;
            u.node(value, 0, 0)?;
            u.end(diff)?;
            u.sep()?;
            u.keyword("0");
            u.end(add)
        }),
        TimeUnit::Week => RenderPlan::emit(move |u, _, _| {
            let outer = u.start_function("CONVERT");
            u.sep()?;
            u.keyword("DATETIME");
            u.sep()?;
            let inner = u.start_function("CONVERT");
            u.sep()?;
            u.keyword("VARCHAR(10)");
            u.sep()?;
            // day 0 is 1900-01-01, a Monday; DATEPART(weekday) would follow @@DATEFIRST
            let add = u.start_function("DATEADD");
            u.sep()?;
            u.keyword("day");
            u.sep()?;
            u.prefix("-");
            let p = u.open_paren();
            let diff = u.start_function("DATEDIFF");
            u.sep()?;
            u.keyword("day");
            u.sep()?;
            u.keyword("0");
            u.sep()?;
            u.node(value, 0, 0)?;
            u.end(diff)?;
            u.keyword("%");
            u.keyword("7");
            u.end(p)?;
            u.sep()?;
            u.node(value, 0, 0)?;
            u.end(add)?;
            u.sep()?;
            u.keyword("126");
            u.end(inner)?;
            u.end(outer)
        }),
        _ => {
            let (width, suffix) = match unit {
                TimeUnit::Year => ("VARCHAR(4)", "-01-01"),
                TimeUnit::Month => ("VARCHAR(7)", "-01"),
                TimeUnit::Day => ("VARCHAR(10)", ""),
                TimeUnit::Hour => ("VARCHAR(13)", ":00:00"),
                TimeUnit::Minute => ("VARCHAR(16)", ":00"),
                _ => ("VARCHAR(19)", ""),
            };
            RenderPlan::emit(move |u, _, _| {
                let outer = u.start_function("CONVERT");
                u.sep()?;
                u.keyword("DATETIME");
                u.sep()?;
                let inner = u.start_function("CONVERT");
                u.sep()?;
                u.keyword(width);
                u.sep()?;
                u.node(value, 0, 0)?;
                u.sep()?;
                u.keyword("126");
                u.end(inner)?;
                if !suffix.is_empty() {
                    u.keyword("+");
                    u.string_literal(suffix);
                }
                u.end(outer)
            })
        }
    }
}

/// `x + INTERVAL 'n' UNIT` as `DATEADD(UNIT, n, x)`; anything else is native.
fn date_add(call: &Call) -> Result<RenderPlan<'_>, UnparseError> {
    let [value, Node::Literal(Literal::Interval(interval))] = call.operands.as_slice() else {
        return Ok(RenderPlan::Native);
    };
    let Some(amount) = interval.signed_integer() else {
        return Ok(RenderPlan::Native);
    };
    let amount = if call.kind() == OpKind::Minus {
        -amount
    } else {
        amount
    };
    let unit = interval.qualifier.start.as_str();
    Ok(RenderPlan::emit(move |u, _, _| {
        let f = u.start_function("DATEADD");
        u.sep()?;
        u.keyword(unit);
        u.sep()?;
        u.keyword(&amount.to_string());
        u.sep()?;
        u.node(value, 0, 0)?;
        u.end(f)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::sql::literal::IntervalQualifier;
    use crate::sql::node::{col, lit_str, NodeExt};
    use crate::sql::unparse::unparse;

    fn mssql(version: Option<&str>) -> DialectProfile {
        DialectProfile::for_name("mssql", version).unwrap()
    }

    #[test]
    fn test_charindex_and_len() {
        let expr = node::position(lit_str("a"), col("s"), Some(lit_int(2)));
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "CHARINDEX('a', [s], 2)");
        let expr = node::call(OpKind::CharLength, vec![col("s")]);
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "LEN([s])");
    }

    #[test]
    fn test_trim_by_version() {
        let both = node::trim(TrimFlag::Both, " ", col("s"));
        assert_eq!(unparse(&mssql(None), &both).unwrap(), "TRIM([s])");
        assert_eq!(
            unparse(&mssql(Some("13")), &both).unwrap(),
            "LTRIM(RTRIM([s]))"
        );

        let chars = node::trim(TrimFlag::Both, "x", col("s"));
        assert_eq!(
            unparse(&mssql(Some("14")), &chars).unwrap(),
            "TRIM('x' FROM [s])"
        );
        let err = unparse(&mssql(Some("13")), &chars).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);

        let leading = node::trim(TrimFlag::Leading, "x", col("s"));
        assert_eq!(unparse(&mssql(Some("16")), &leading).unwrap(), "LTRIM([s], 'x')");
        assert!(unparse(&mssql(Some("15")), &leading).is_err());
    }

    #[test]
    fn test_floor_day_and_year() {
        let expr = node::floor_to(col("ts"), TimeUnit::Day);
        assert_eq!(
            unparse(&mssql(None), &expr).unwrap(),
            "CONVERT(DATETIME, CONVERT(VARCHAR(10), [ts], 126))"
        );
        let expr = node::floor_to(col("ts"), TimeUnit::Year);
        assert_eq!(
            unparse(&mssql(None), &expr).unwrap(),
            "CONVERT(DATETIME, CONVERT(VARCHAR(4), [ts], 126) + '-01-01')"
        );
    }

    #[test]
    fn test_floor_week_and_quarter() {
        let expr = node::floor_to(col("ts"), TimeUnit::Week);
        assert_eq!(
            unparse(&mssql(None), &expr).unwrap(),
            "CONVERT(DATETIME, CONVERT(VARCHAR(10), DATEADD(day, -(DATEDIFF(day, 0, [ts]) % 7), [ts]), 126))"
        );
        let expr = node::floor_to(col("ts"), TimeUnit::Quarter);
        assert_eq!(
            unparse(&mssql(None), &expr).unwrap(),
            "DATEADD(qq, DATEDIFF(qq, 0, [ts]), 0)"
        );
    }

    #[test]
    fn test_round_and_truncate() {
        let expr = node::round(col("x"), None);
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "ROUND([x], 0)");
        let expr = node::truncate(col("x"), Some(lit_int(2)));
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "ROUND([x], 2, 1)");
    }

    #[test]
    fn test_substring_without_length() {
        let expr = node::substring(col("s"), lit_int(3), None);
        assert_eq!(
            unparse(&mssql(None), &expr).unwrap(),
            "SUBSTRING([s], 3, DATALENGTH([s]))"
        );
    }

    #[test]
    fn test_date_arithmetic() {
        let day = node::interval("3", IntervalQualifier::single(TimeUnit::Day));
        let expr = col("d").sub(day.clone());
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "DATEADD(DAY, -3, [d])");
        let expr = col("d").add(day);
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "DATEADD(DAY, 3, [d])");
        assert_eq!(
            unparse(&mssql(None), &col("a").add(lit_int(1))).unwrap(),
            "[a] + 1"
        );
    }

    #[test]
    fn test_if_by_version() {
        let expr = node::call(OpKind::If, vec![col("a").gt(lit_int(1)), lit_int(1), lit_int(0)]);
        assert_eq!(unparse(&mssql(None), &expr).unwrap(), "IIF([a] > 1, 1, 0)");
        assert_eq!(
            unparse(&mssql(Some("10")), &expr).unwrap(),
            "CASE WHEN [a] > 1 THEN 1 ELSE 0 END"
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            unparse(&mssql(None), &node::lit_date("2024-01-31")).unwrap(),
            "CAST('2024-01-31' AS DATE)"
        );
        assert_eq!(unparse(&mssql(None), &node::lit_bool(true)).unwrap(), "1");
        assert_eq!(
            unparse(&mssql(None), &col("a").concat(col("b"))).unwrap(),
            "[a] + [b]"
        );
    }
}
