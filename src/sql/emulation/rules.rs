//! Building blocks shared by the per-product emulation rules.

use crate::error::UnparseError;
use crate::sql::dialect::ScaleRange;
use crate::sql::literal::{Literal, Symbol, TimeUnit, TrimFlag};
use crate::sql::node::{self, Call, DataTypeSpec, Node, NodeExt, TypeName};

// =============================================================================
// Operand shapes
// =============================================================================

/// The operand as a string literal.
pub fn string_literal(node: &Node) -> Option<&str> {
    match node {
        Node::Literal(Literal::String(s)) => Some(s),
        _ => None,
    }
}

/// Whether the operand is a string literal made only of whitespace.
pub fn is_whitespace_literal(node: &Node) -> bool {
    string_literal(node).is_some_and(|s| !s.is_empty() && s.chars().all(char::is_whitespace))
}

/// Operand `i` of a call, or an internal error if the tree is malformed.
pub fn operand(call: &Call, i: usize) -> Result<&Node, UnparseError> {
    call.operand(i).ok_or_else(|| {
        UnparseError::internal(format!("{} has no operand {i}", call.op.name()))
    })
}

/// TRIM operands: flag, characters, value.
pub fn trim_operands(call: &Call) -> Result<(TrimFlag, &Node, &Node), UnparseError> {
    match call.operands.as_slice() {
        [Node::Symbol(Symbol::Trim(flag)), chars, value] => Ok((*flag, chars, value)),
        _ => Err(UnparseError::internal("TRIM operands must be flag, characters, value")),
    }
}

/// Time unit of `FLOOR(x TO unit)`, `None` for plain numeric FLOOR.
pub fn floor_unit(call: &Call) -> Result<Option<TimeUnit>, UnparseError> {
    match call.operand(1) {
        None => Ok(None),
        Some(Node::Symbol(Symbol::TimeUnit(unit))) => Ok(Some(*unit)),
        Some(_) => Err(UnparseError::internal(format!(
            "second operand of {} must be a time unit",
            call.op.name()
        ))),
    }
}

// =============================================================================
// Builders
// =============================================================================

/// `LTRIM` / `RTRIM` / `TRIM` for a trim flag.
pub fn trim_function(flag: TrimFlag) -> &'static str {
    match flag {
        TrimFlag::Both => "TRIM",
        TrimFlag::Leading => "LTRIM",
        TrimFlag::Trailing => "RTRIM",
    }
}

/// `LTRIM(x[, chars])`, omitting the characters when they are whitespace.
pub fn trim_by_function(flag: TrimFlag, chars: &Node, value: &Node) -> Node {
    let mut args = vec![value.clone()];
    if !is_whitespace_literal(chars) {
        args.push(chars.clone());
    }
    node::func(trim_function(flag), args)
}

/// Anchored `REGEXP_REPLACE` pattern stripping `chars` from one or both ends.
pub fn trim_pattern(flag: TrimFlag, chars: &str) -> String {
    let escaped = regex::escape(chars);
    match flag {
        TrimFlag::Leading => format!("^({escaped})*"),
        TrimFlag::Trailing => format!("({escaped})*$"),
        TrimFlag::Both => format!("^({escaped})*|({escaped})*$"),
    }
}

/// `REGEXP_REPLACE(value, pattern, '')`
pub fn regexp_trim(flag: TrimFlag, chars: &str, value: &Node) -> Node {
    node::func(
        "REGEXP_REPLACE",
        vec![
            value.clone(),
            node::lit_str(&trim_pattern(flag, chars)),
            node::lit_str(""),
        ],
    )
}

/// TRIM on products whose LTRIM/RTRIM/TRIM take no character argument
/// (Hive, Spark): whitespace through the plain functions, any other literal
/// set through an anchored `REGEXP_REPLACE`.
pub fn trim_without_characters(dialect: &'static str, call: &Call) -> Result<Node, UnparseError> {
    let (flag, chars, value) = trim_operands(call)?;
    if is_whitespace_literal(chars) {
        return Ok(node::func(trim_function(flag), vec![value.clone()]));
    }
    match string_literal(chars) {
        Some(set) if !set.is_empty() => Ok(regexp_trim(flag, set, value)),
        _ => Err(UnparseError::unsupported(
            call.op.name(),
            dialect,
            "TRIM characters must be a non-empty string literal",
        )),
    }
}

/// `DATE_TRUNC('unit', value)`
pub fn date_trunc(unit: TimeUnit, value: &Node) -> Node {
    node::func(
        "DATE_TRUNC",
        vec![node::lit_str(unit.as_str()), value.clone()],
    )
}

/// Oracle/Teradata `TRUNC` format element for a unit.
pub fn trunc_format(unit: TimeUnit) -> &'static str {
    match unit {
        TimeUnit::Year => "YYYY",
        TimeUnit::Quarter => "Q",
        TimeUnit::Month => "MM",
        TimeUnit::Week => "IW",
        TimeUnit::Day => "DD",
        TimeUnit::Hour => "HH",
        TimeUnit::Minute => "MI",
        TimeUnit::Second => "SS",
    }
}

pub fn cast_to(value: Node, ty: TypeName) -> Node {
    node::cast(value, DataTypeSpec::new(ty))
}

/// Whether a scale operand is a literal already inside `range`.
pub fn scale_in_range(scale: &Node, range: ScaleRange) -> bool {
    match scale.as_literal().and_then(Literal::as_integer) {
        Some(n) => range.contains(n),
        None => false,
    }
}

/// Clamp a ROUND/TRUNCATE scale operand into `range`: literals directly,
/// expressions with `CASE WHEN n > max THEN max WHEN n < min THEN min ELSE n END`.
pub fn clamp_scale(scale: &Node, range: ScaleRange) -> Node {
    if let Some(n) = scale.as_literal().and_then(Literal::as_integer) {
        return node::lit_int(range.clamp(n));
    }
    node::case_when(
        vec![
            (scale.clone().gt(range.max), node::lit_int(range.max)),
            (scale.clone().lt(range.min), node::lit_int(range.min)),
        ],
        Some(scale.clone()),
    )
}

/// The scale operand as written on a product with `range`.
pub fn scale_operand(scale: &Node, range: Option<ScaleRange>) -> Node {
    match range {
        Some(range) if !scale_in_range(scale, range) => clamp_scale(scale, range),
        _ => scale.clone(),
    }
}

/// Operands of a ROUND or TRUNCATE call with the scale clamped to `range`.
pub fn scaled_operands(call: &Call, range: Option<ScaleRange>) -> Vec<Node> {
    call.operands
        .iter()
        .enumerate()
        .map(|(i, operand)| if i == 1 { scale_operand(operand, range) } else { operand.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::node::{col, lit_int, lit_str};

    #[test]
    fn test_whitespace_literal() {
        assert!(is_whitespace_literal(&lit_str(" ")));
        assert!(is_whitespace_literal(&lit_str(" \t")));
        assert!(!is_whitespace_literal(&lit_str("A")));
        assert!(!is_whitespace_literal(&lit_str("")));
        assert!(!is_whitespace_literal(&col("c")));
    }

    #[test]
    fn test_trim_pattern_escapes_metacharacters() {
        assert_eq!(trim_pattern(TrimFlag::Leading, "A"), "^(A)*");
        assert_eq!(trim_pattern(TrimFlag::Trailing, "a.b"), "(a\\.b)*$");
        assert_eq!(trim_pattern(TrimFlag::Both, "*"), "^(\\*)*|(\\*)*$");
        let pattern = regex::Regex::new(&trim_pattern(TrimFlag::Leading, "[x]+")).unwrap();
        assert_eq!(pattern.replace_all("[x]+[x]+abc", ""), "abc");
    }

    #[test]
    fn test_trim_without_characters() {
        let Node::Call(ws) = node::trim(TrimFlag::Leading, " ", col("s")) else {
            unreachable!()
        };
        assert_eq!(
            trim_without_characters("hive", &ws).unwrap(),
            node::func("LTRIM", vec![col("s")])
        );

        let Node::Call(chars) = node::trim(TrimFlag::Both, "x", col("s")) else {
            unreachable!()
        };
        assert_eq!(
            trim_without_characters("hive", &chars).unwrap(),
            regexp_trim(TrimFlag::Both, "x", &col("s"))
        );

        let Node::Call(dynamic) = node::trim(TrimFlag::Both, col("c"), col("s")) else {
            unreachable!()
        };
        assert!(trim_without_characters("hive", &dynamic).is_err());
    }

    #[test]
    fn test_clamp_literal_scale() {
        let range = ScaleRange::new(-12, 38).unwrap();
        assert_eq!(clamp_scale(&lit_int(40), range), lit_int(38));
        assert_eq!(clamp_scale(&lit_int(-13), range), lit_int(-12));
        assert!(scale_in_range(&lit_int(2), range));
        assert!(!scale_in_range(&col("n"), range));
    }

    #[test]
    fn test_clamp_expression_scale() {
        let range = ScaleRange::new(-12, 38).unwrap();
        let clamped = clamp_scale(&col("n"), range);
        let expected = node::case_when(
            vec![
                (col("n").gt(38), lit_int(38)),
                (col("n").lt(-12), lit_int(-12)),
            ],
            Some(col("n")),
        );
        assert_eq!(clamped, expected);
    }
}
