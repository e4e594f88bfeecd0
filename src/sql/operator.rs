//! Canonical operators.
//!
//! Every operator the engine knows about is a variant of [`OpKind`]. The
//! precedence pair, syntax class and arity of each kind are data returned by
//! [`OpKind::operator`], shared by all dialects. Named functions that have no
//! special handling use [`OpKind::Function`] and carry their own name.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Binding power used for calls that can never need parentheses
/// (function calls, CASE, CAST ...).
pub const ATOMIC_PRECEDENCE: u16 = 1000;

/// Closed set of canonical operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpKind {
    // Logical
    And,
    Or,
    Not,

    // Comparison and predicates
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    IsNull,
    IsNotNull,
    IsTrue,
    IsFalse,
    Like,
    NotLike,
    Between,
    NotBetween,
    In,
    NotIn,
    Exists,

    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,
    /// Integer division, `/INT` in the canonical form.
    DivideInteger,
    PercentRemainder,
    UnaryMinus,
    UnaryPlus,

    // String
    Concat,
    Position,
    Trim,
    Substring,
    CharLength,
    Upper,
    Lower,

    // Numeric
    Mod,
    Round,
    Truncate,
    Floor,
    Ceil,
    Abs,
    Log10,

    // Date/time
    Extract,

    // Conditional and conversion
    Case,
    If,
    Coalesce,
    NullIf,
    Cast,

    // Aggregates and window functions
    Count,
    Sum,
    Avg,
    Min,
    Max,
    RowNumber,
    Rank,
    DenseRank,
    Ntile,
    Lag,
    Lead,
    FirstValue,
    LastValue,
    Over,

    // GROUP BY constructs
    Rollup,
    Cube,
    GroupingSets,
    Row,

    // Set operations
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,

    /// Any other named function, rendered as `NAME(args)`.
    Function,
}

/// How an operator is laid out around its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `OP operand`
    Prefix,
    /// `operand0 OP operand1 [OP operand2 ...]`
    Infix,
    /// `operand OP`
    Postfix,
    /// `NAME(operand, ...)`
    Function,
    /// Operator-specific layout (CASE, CAST, BETWEEN, window, set operations ...).
    Special,
}

/// Accepted operand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const fn exact(n: usize) -> Self {
        Arity {
            min: n,
            max: Some(n),
        }
    }

    pub const fn range(min: usize, max: usize) -> Self {
        Arity {
            min,
            max: Some(max),
        }
    }

    pub const fn at_least(min: usize) -> Self {
        Arity { min, max: None }
    }

    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", self.min),
            Some(max) => write!(f, "{}..={}", self.min, max),
            None => write!(f, "{} or more", self.min),
        }
    }
}

/// An operator: kind, canonical name, syntax class, precedence pair and arity.
///
/// The precedence pair follows the usual binding-power scheme: a
/// left-associative operator of precedence `p` binds `2p` to the left and
/// `2p + 1` to the right.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "OperatorRepr", into = "OperatorRepr")]
pub struct Operator {
    kind: OpKind,
    name: Cow<'static, str>,
    syntax: Syntax,
    left_prec: u16,
    right_prec: u16,
    arity: Arity,
    allows_framing: bool,
}

impl Operator {
    const fn new(
        kind: OpKind,
        name: &'static str,
        syntax: Syntax,
        left_prec: u16,
        right_prec: u16,
        arity: Arity,
    ) -> Self {
        Operator {
            kind,
            name: Cow::Borrowed(name),
            syntax,
            left_prec,
            right_prec,
            arity,
            allows_framing: true,
        }
    }

    const fn infix(kind: OpKind, name: &'static str, prec: u16, arity: Arity) -> Self {
        Self::new(kind, name, Syntax::Infix, 2 * prec, 2 * prec + 1, arity)
    }

    const fn prefix(kind: OpKind, name: &'static str, prec: u16) -> Self {
        Self::new(kind, name, Syntax::Prefix, 2 * prec, 2 * prec + 1, Arity::exact(1))
    }

    const fn postfix(kind: OpKind, name: &'static str, prec: u16) -> Self {
        Self::new(kind, name, Syntax::Postfix, 2 * prec, 2 * prec + 1, Arity::exact(1))
    }

    const fn special(kind: OpKind, name: &'static str, prec: u16, arity: Arity) -> Self {
        Self::new(kind, name, Syntax::Special, 2 * prec, 2 * prec + 1, arity)
    }

    const fn atomic(kind: OpKind, name: &'static str, syntax: Syntax, arity: Arity) -> Self {
        Self::new(
            kind,
            name,
            syntax,
            ATOMIC_PRECEDENCE,
            ATOMIC_PRECEDENCE,
            arity,
        )
    }

    const fn func(kind: OpKind, name: &'static str, arity: Arity) -> Self {
        Self::atomic(kind, name, Syntax::Function, arity)
    }

    const fn no_framing(mut self) -> Self {
        self.allows_framing = false;
        self
    }

    /// A named function with no dedicated kind.
    pub fn function(name: impl Into<Cow<'static, str>>) -> Self {
        Operator {
            kind: OpKind::Function,
            name: name.into(),
            syntax: Syntax::Function,
            left_prec: ATOMIC_PRECEDENCE,
            right_prec: ATOMIC_PRECEDENCE,
            arity: Arity::at_least(0),
            allows_framing: true,
        }
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn left_prec(&self) -> u16 {
        self.left_prec
    }

    pub fn right_prec(&self) -> u16 {
        self.right_prec
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// This infix operator bound at precedence `prec` instead.
    pub fn with_infix_precedence(&self, prec: u16) -> Operator {
        Operator {
            left_prec: 2 * prec,
            right_prec: 2 * prec + 1,
            ..self.clone()
        }
    }

    /// Whether a window frame may accompany this function in an OVER clause.
    pub fn allows_framing(&self) -> bool {
        self.allows_framing
    }

    /// Whether a call of this operator must be parenthesized when printed
    /// between neighbours that bind with `left` and `right`.
    ///
    /// A keyword prefix such as NOT cannot lose its operand to the left
    /// neighbour. Symbolic prefixes still check it, so `-(-x)` never prints
    /// as the comment `--x`.
    pub fn needs_parens(&self, left: u16, right: u16) -> bool {
        let keyword_prefix = self.syntax == Syntax::Prefix
            && self.name.starts_with(|c: char| c.is_ascii_alphabetic());
        (left > self.left_prec && !keyword_prefix) || (right != 0 && self.right_prec <= right)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl OpKind {
    /// The canonical operator for this kind.
    ///
    /// For [`OpKind::Function`] this yields an operator with an empty name;
    /// use [`Operator::function`] instead.
    pub fn operator(self) -> Operator {
        use OpKind::*;
        match self {
            Or => Operator::infix(Or, "OR", 22, Arity::at_least(2)),
            And => Operator::infix(And, "AND", 24, Arity::at_least(2)),
            Not => Operator::prefix(Not, "NOT", 26),

            IsNull => Operator::postfix(IsNull, "IS NULL", 28),
            IsNotNull => Operator::postfix(IsNotNull, "IS NOT NULL", 28),
            IsTrue => Operator::postfix(IsTrue, "IS TRUE", 28),
            IsFalse => Operator::postfix(IsFalse, "IS FALSE", 28),

            Equals => Operator::infix(Equals, "=", 30, Arity::exact(2)),
            NotEquals => Operator::infix(NotEquals, "<>", 30, Arity::exact(2)),
            LessThan => Operator::infix(LessThan, "<", 30, Arity::exact(2)),
            LessThanOrEqual => Operator::infix(LessThanOrEqual, "<=", 30, Arity::exact(2)),
            GreaterThan => Operator::infix(GreaterThan, ">", 30, Arity::exact(2)),
            GreaterThanOrEqual => Operator::infix(GreaterThanOrEqual, ">=", 30, Arity::exact(2)),

            Like => Operator::special(Like, "LIKE", 32, Arity::range(2, 3)),
            NotLike => Operator::special(NotLike, "NOT LIKE", 32, Arity::range(2, 3)),
            Between => Operator::special(Between, "BETWEEN", 32, Arity::exact(3)),
            NotBetween => Operator::special(NotBetween, "NOT BETWEEN", 32, Arity::exact(3)),
            In => Operator::special(In, "IN", 32, Arity::at_least(2)),
            NotIn => Operator::special(NotIn, "NOT IN", 32, Arity::at_least(2)),
            Exists => Operator::atomic(Exists, "EXISTS", Syntax::Special, Arity::exact(1)),

            Plus => Operator::infix(Plus, "+", 40, Arity::exact(2)),
            Minus => Operator::infix(Minus, "-", 40, Arity::exact(2)),
            Times => Operator::infix(Times, "*", 60, Arity::exact(2)),
            Divide => Operator::infix(Divide, "/", 60, Arity::exact(2)),
            DivideInteger => Operator::infix(DivideInteger, "/INT", 60, Arity::exact(2)),
            PercentRemainder => Operator::infix(PercentRemainder, "%", 60, Arity::exact(2)),
            Concat => Operator::infix(Concat, "||", 60, Arity::at_least(2)),
            UnaryMinus => Operator::prefix(UnaryMinus, "-", 80),
            UnaryPlus => Operator::prefix(UnaryPlus, "+", 80),

            Position => Operator::atomic(Position, "POSITION", Syntax::Special, Arity::range(2, 3)),
            Trim => Operator::atomic(Trim, "TRIM", Syntax::Special, Arity::exact(3)),
            Substring => {
                Operator::atomic(Substring, "SUBSTRING", Syntax::Special, Arity::range(2, 3))
            }
            CharLength => Operator::func(CharLength, "CHAR_LENGTH", Arity::exact(1)),
            Upper => Operator::func(Upper, "UPPER", Arity::exact(1)),
            Lower => Operator::func(Lower, "LOWER", Arity::exact(1)),

            Mod => Operator::func(Mod, "MOD", Arity::exact(2)),
            Round => Operator::func(Round, "ROUND", Arity::range(1, 2)),
            Truncate => Operator::func(Truncate, "TRUNCATE", Arity::range(1, 2)),
            Floor => Operator::atomic(Floor, "FLOOR", Syntax::Special, Arity::range(1, 2)),
            Ceil => Operator::atomic(Ceil, "CEIL", Syntax::Special, Arity::range(1, 2)),
            Abs => Operator::func(Abs, "ABS", Arity::exact(1)),
            Log10 => Operator::func(Log10, "LOG10", Arity::exact(1)),

            Extract => Operator::atomic(Extract, "EXTRACT", Syntax::Special, Arity::exact(2)),

            Case => Operator::atomic(Case, "CASE", Syntax::Special, Arity::at_least(2)),
            If => Operator::func(If, "IF", Arity::exact(3)),
            Coalesce => Operator::func(Coalesce, "COALESCE", Arity::at_least(1)),
            NullIf => Operator::func(NullIf, "NULLIF", Arity::exact(2)),
            Cast => Operator::atomic(Cast, "CAST", Syntax::Special, Arity::exact(2)),

            Count => Operator::func(Count, "COUNT", Arity::at_least(0)),
            Sum => Operator::func(Sum, "SUM", Arity::exact(1)),
            Avg => Operator::func(Avg, "AVG", Arity::exact(1)),
            Min => Operator::func(Min, "MIN", Arity::exact(1)),
            Max => Operator::func(Max, "MAX", Arity::exact(1)),
            RowNumber => Operator::func(RowNumber, "ROW_NUMBER", Arity::exact(0)).no_framing(),
            Rank => Operator::func(Rank, "RANK", Arity::exact(0)).no_framing(),
            DenseRank => Operator::func(DenseRank, "DENSE_RANK", Arity::exact(0)).no_framing(),
            Ntile => Operator::func(Ntile, "NTILE", Arity::exact(1)).no_framing(),
            Lag => Operator::func(Lag, "LAG", Arity::range(1, 3)).no_framing(),
            Lead => Operator::func(Lead, "LEAD", Arity::range(1, 3)).no_framing(),
            FirstValue => Operator::func(FirstValue, "FIRST_VALUE", Arity::exact(1)),
            LastValue => Operator::func(LastValue, "LAST_VALUE", Arity::exact(1)),
            Over => Operator::atomic(Over, "OVER", Syntax::Special, Arity::exact(2)),

            Rollup => Operator::func(Rollup, "ROLLUP", Arity::at_least(1)),
            Cube => Operator::func(Cube, "CUBE", Arity::at_least(1)),
            GroupingSets => Operator::func(GroupingSets, "GROUPING SETS", Arity::at_least(1)),
            Row => Operator::atomic(Row, "ROW", Syntax::Special, Arity::at_least(1)),

            Union => Operator::special(Union, "UNION", 14, Arity::exact(2)),
            UnionAll => Operator::special(UnionAll, "UNION ALL", 14, Arity::exact(2)),
            Except => Operator::special(Except, "EXCEPT", 14, Arity::exact(2)),
            ExceptAll => Operator::special(ExceptAll, "EXCEPT ALL", 14, Arity::exact(2)),
            Intersect => Operator::special(Intersect, "INTERSECT", 18, Arity::exact(2)),
            IntersectAll => Operator::special(IntersectAll, "INTERSECT ALL", 18, Arity::exact(2)),

            Function => Operator::function(""),
        }
    }

    /// Whether this kind is a set operation (UNION, INTERSECT, EXCEPT and their ALL forms).
    pub fn is_set_operation(self) -> bool {
        matches!(
            self,
            OpKind::Union
                | OpKind::UnionAll
                | OpKind::Intersect
                | OpKind::IntersectAll
                | OpKind::Except
                | OpKind::ExceptAll
        )
    }

    /// Every kind, in declaration order.
    pub const ALL: &'static [OpKind] = &[
        OpKind::And,
        OpKind::Or,
        OpKind::Not,
        OpKind::Equals,
        OpKind::NotEquals,
        OpKind::LessThan,
        OpKind::LessThanOrEqual,
        OpKind::GreaterThan,
        OpKind::GreaterThanOrEqual,
        OpKind::IsNull,
        OpKind::IsNotNull,
        OpKind::IsTrue,
        OpKind::IsFalse,
        OpKind::Like,
        OpKind::NotLike,
        OpKind::Between,
        OpKind::NotBetween,
        OpKind::In,
        OpKind::NotIn,
        OpKind::Exists,
        OpKind::Plus,
        OpKind::Minus,
        OpKind::Times,
        OpKind::Divide,
        OpKind::DivideInteger,
        OpKind::PercentRemainder,
        OpKind::UnaryMinus,
        OpKind::UnaryPlus,
        OpKind::Concat,
        OpKind::Position,
        OpKind::Trim,
        OpKind::Substring,
        OpKind::CharLength,
        OpKind::Upper,
        OpKind::Lower,
        OpKind::Mod,
        OpKind::Round,
        OpKind::Truncate,
        OpKind::Floor,
        OpKind::Ceil,
        OpKind::Abs,
        OpKind::Log10,
        OpKind::Extract,
        OpKind::Case,
        OpKind::If,
        OpKind::Coalesce,
        OpKind::NullIf,
        OpKind::Cast,
        OpKind::Count,
        OpKind::Sum,
        OpKind::Avg,
        OpKind::Min,
        OpKind::Max,
        OpKind::RowNumber,
        OpKind::Rank,
        OpKind::DenseRank,
        OpKind::Ntile,
        OpKind::Lag,
        OpKind::Lead,
        OpKind::FirstValue,
        OpKind::LastValue,
        OpKind::Over,
        OpKind::Rollup,
        OpKind::Cube,
        OpKind::GroupingSets,
        OpKind::Row,
        OpKind::Union,
        OpKind::UnionAll,
        OpKind::Intersect,
        OpKind::IntersectAll,
        OpKind::Except,
        OpKind::ExceptAll,
        OpKind::Function,
    ];
}

impl From<OpKind> for Operator {
    fn from(kind: OpKind) -> Self {
        kind.operator()
    }
}

/// Wire form of an [`Operator`]: either a kind, or `{"function": "NAME"}`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum OperatorRepr {
    Kind(OpKind),
    Function { function: String },
}

impl From<Operator> for OperatorRepr {
    fn from(op: Operator) -> Self {
        match op.kind {
            OpKind::Function => OperatorRepr::Function {
                function: op.name.into_owned(),
            },
            kind => OperatorRepr::Kind(kind),
        }
    }
}

impl TryFrom<OperatorRepr> for Operator {
    type Error = String;

    fn try_from(repr: OperatorRepr) -> Result<Self, Self::Error> {
        match repr {
            OperatorRepr::Kind(OpKind::Function) => {
                Err("FUNCTION operators must be written as {\"function\": \"NAME\"}".into())
            }
            OperatorRepr::Kind(kind) => Ok(kind.operator()),
            OperatorRepr::Function { function } if function.trim().is_empty() => {
                Err("function name must not be empty".into())
            }
            OperatorRepr::Function { function } => Ok(Operator::function(function)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_kinds_listed_once() {
        let mut kinds = OpKind::ALL.to_vec();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), OpKind::ALL.len());
    }

    #[test]
    fn test_operator_kind_roundtrip() {
        for &kind in OpKind::ALL {
            assert_eq!(kind.operator().kind(), kind);
        }
    }

    #[test]
    fn test_left_associative_precedence() {
        let minus = OpKind::Minus.operator();
        assert_eq!(minus.left_prec(), 80);
        assert_eq!(minus.right_prec(), 81);
        // a - (b - c): right operand sits at binding power 81
        assert!(minus.needs_parens(81, 0));
        // (a - b) - c: left operand sits at 80
        assert!(!minus.needs_parens(0, 80));
    }

    #[test]
    fn test_tighter_binding_needs_no_parens() {
        let times = OpKind::Times.operator();
        let plus = OpKind::Plus.operator();
        // a + b * c
        assert!(!times.needs_parens(plus.right_prec(), 0));
        // (a + b) * c
        assert!(plus.needs_parens(0, times.left_prec()));
    }

    #[test]
    fn test_prefix_nesting() {
        let not = OpKind::Not.operator();
        // NOT NOT a
        assert!(!not.needs_parens(not.right_prec(), 0));
        let neg = OpKind::UnaryMinus.operator();
        // -(-a)
        assert!(neg.needs_parens(neg.right_prec(), 0));
    }

    #[test]
    fn test_functions_never_need_parens() {
        let round = OpKind::Round.operator();
        assert!(!round.needs_parens(161, 161));
        assert!(!Operator::function("MY_UDF").needs_parens(200, 200));
    }

    #[test]
    fn test_arity() {
        assert!(OpKind::Position.operator().arity().accepts(3));
        assert!(!OpKind::Position.operator().arity().accepts(4));
        assert!(OpKind::Or.operator().arity().accepts(10_000));
        assert_eq!(Arity::range(2, 3).to_string(), "2..=3");
    }

    #[test]
    fn test_framing() {
        assert!(!OpKind::Ntile.operator().allows_framing());
        assert!(!OpKind::RowNumber.operator().allows_framing());
        assert!(OpKind::Sum.operator().allows_framing());
    }

    #[test]
    fn test_serde_repr() {
        let json = serde_json::to_string(&OpKind::Plus.operator()).unwrap();
        assert_eq!(json, "\"PLUS\"");

        let op: Operator = serde_json::from_str("{\"function\": \"JSON_EXTRACT\"}").unwrap();
        assert_eq!(op.kind(), OpKind::Function);
        assert_eq!(op.name(), "JSON_EXTRACT");

        assert!(serde_json::from_str::<Operator>("\"FUNCTION\"").is_err());
    }
}
