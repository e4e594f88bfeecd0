//! Canonical call tree.
//!
//! A query expression is a tree of [`Node`]s: calls (an [`Operator`] applied
//! to ordered operands), literals, identifiers and a few structured operands
//! (window specifications, CAST targets, keyword symbols, sub-queries).
//! Trees are immutable inputs to the unparser; emulation rules build new
//! nodes rather than editing existing ones.

use serde::{Deserialize, Serialize};

use super::literal::{Decimal, IntervalLiteral, IntervalQualifier, Literal, Symbol, TimeUnit, TrimFlag};
use super::operator::{OpKind, Operator};
use super::query::Query;

// =============================================================================
// Tree
// =============================================================================

/// A node of the call tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Identifier(Identifier),
    Literal(Literal),
    Call(Call),
    Symbol(Symbol),
    /// Window specification; only valid as the second operand of OVER.
    Window(WindowSpec),
    /// Target type; only valid as the second operand of CAST.
    DataType(DataTypeSpec),
    Query(Box<Query>),
}

impl Node {
    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Node::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Kind of the root operator, if this node is a call.
    pub fn kind(&self) -> Option<OpKind> {
        self.as_call().map(|c| c.op.kind())
    }
}

/// A possibly qualified name. A last component of `*` is a star.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    pub names: Vec<String>,
}

impl Identifier {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Identifier {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_star(&self) -> bool {
        self.names.last().is_some_and(|n| n == "*")
    }
}

/// DISTINCT / ALL inside an aggregate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quantifier {
    Distinct,
    All,
}

/// An operator applied to ordered operands.
///
/// Operand layouts for special operators:
///
/// | Kind | Operands |
/// |------|----------|
/// | `CASE` | `when1, then1, when2, then2, ... [, else]` |
/// | `CAST` | `value, DataType` |
/// | `TRIM` | `Symbol(Trim), characters, value` |
/// | `POSITION` | `needle, haystack [, start]` |
/// | `SUBSTRING` | `value, start [, length]` |
/// | `FLOOR`/`CEIL` | `value [, Symbol(TimeUnit)]` |
/// | `EXTRACT` | `Symbol(TimeUnit), value` |
/// | `IN` | `value, item...` or `value, Query` |
/// | `OVER` | `aggregate call, Window` |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub op: Operator,
    #[serde(default)]
    pub operands: Vec<Node>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantifier: Option<Quantifier>,
}

impl Call {
    pub fn new(op: impl Into<Operator>, operands: Vec<Node>) -> Self {
        Call {
            op: op.into(),
            operands,
            quantifier: None,
        }
    }

    pub fn kind(&self) -> OpKind {
        self.op.kind()
    }

    pub fn operand(&self, i: usize) -> Option<&Node> {
        self.operands.get(i)
    }
}

// Deep left-nested chains would recurse once per level in the derived drop.
impl Drop for Call {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.operands);
        while let Some(node) = pending.pop() {
            if let Node::Call(mut call) = node {
                pending.append(&mut call.operands);
            }
        }
    }
}

impl From<Call> for Node {
    fn from(call: Call) -> Self {
        Node::Call(call)
    }
}

// =============================================================================
// Ordering and windows
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// Requested NULLS placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullsOrder {
    First,
    Last,
}

/// One sort key of an ORDER BY (query or window).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub expr: Node,
    #[serde(default)]
    pub dir: SortDir,
    #[serde(default)]
    pub nulls: Option<NullsOrder>,
}

impl OrderItem {
    pub fn asc(expr: impl Into<Node>) -> Self {
        OrderItem {
            expr: expr.into(),
            dir: SortDir::Asc,
            nulls: None,
        }
    }

    pub fn desc(expr: impl Into<Node>) -> Self {
        OrderItem {
            expr: expr.into(),
            dir: SortDir::Desc,
            nulls: None,
        }
    }

    pub fn nulls_first(mut self) -> Self {
        self.nulls = Some(NullsOrder::First);
        self
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls = Some(NullsOrder::Last);
        self
    }

    /// Same key without an explicit NULLS placement.
    pub fn without_nulls(&self) -> Self {
        OrderItem {
            nulls: None,
            ..self.clone()
        }
    }
}

/// `PARTITION BY ... ORDER BY ... frame`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSpec {
    #[serde(default)]
    pub partition_by: Vec<Node>,
    #[serde(default)]
    pub order_by: Vec<OrderItem>,
    #[serde(default)]
    pub frame: Option<WindowFrame>,
}

/// Window frame specification.
///
/// Examples:
/// - `ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`
/// - `RANGE BETWEEN 1 PRECEDING AND 1 FOLLOWING`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub kind: WindowFrameKind,
    pub start: WindowFrameBound,
    #[serde(default)]
    pub end: Option<WindowFrameBound>,
}

impl WindowFrame {
    /// Create a frame with just a start bound.
    pub fn new(kind: WindowFrameKind, start: WindowFrameBound) -> Self {
        Self {
            kind,
            start,
            end: None,
        }
    }

    /// Create a frame with BETWEEN start AND end.
    pub fn between(kind: WindowFrameKind, start: WindowFrameBound, end: WindowFrameBound) -> Self {
        Self {
            kind,
            start,
            end: Some(end),
        }
    }

    /// ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW
    pub fn rows_to_current() -> Self {
        Self::between(
            WindowFrameKind::Rows,
            WindowFrameBound::UnboundedPreceding,
            WindowFrameBound::CurrentRow,
        )
    }

    /// ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING (entire partition)
    pub fn rows_entire_partition() -> Self {
        Self::between(
            WindowFrameKind::Rows,
            WindowFrameBound::UnboundedPreceding,
            WindowFrameBound::UnboundedFollowing,
        )
    }

    /// Rolling window: ROWS BETWEEN (periods-1) PRECEDING AND CURRENT ROW
    pub fn rolling(periods: u32) -> Self {
        let preceding = periods.saturating_sub(1);
        Self::between(
            WindowFrameKind::Rows,
            WindowFrameBound::Preceding(u64::from(preceding)),
            WindowFrameBound::CurrentRow,
        )
    }
}

/// Frame type: ROWS, RANGE, or GROUPS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowFrameKind {
    Rows,
    Range,
    Groups,
}

/// Frame boundary specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowFrameBound {
    UnboundedPreceding,
    Preceding(u64),
    CurrentRow,
    Following(u64),
    UnboundedFollowing,
}

// =============================================================================
// Data types (CAST targets)
// =============================================================================

/// Canonical SQL type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeName {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Real,
    Double,
    Char,
    Varchar,
    Binary,
    Varbinary,
    Date,
    Time,
    Timestamp,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Boolean => "BOOLEAN",
            TypeName::TinyInt => "TINYINT",
            TypeName::SmallInt => "SMALLINT",
            TypeName::Integer => "INTEGER",
            TypeName::BigInt => "BIGINT",
            TypeName::Decimal => "DECIMAL",
            TypeName::Real => "REAL",
            TypeName::Double => "DOUBLE",
            TypeName::Char => "CHAR",
            TypeName::Varchar => "VARCHAR",
            TypeName::Binary => "BINARY",
            TypeName::Varbinary => "VARBINARY",
            TypeName::Date => "DATE",
            TypeName::Time => "TIME",
            TypeName::Timestamp => "TIMESTAMP",
        }
    }

    /// Case-insensitive lookup by SQL name (a few common synonyms accepted).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let name = match s.to_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => TypeName::Boolean,
            "TINYINT" => TypeName::TinyInt,
            "SMALLINT" => TypeName::SmallInt,
            "INTEGER" | "INT" => TypeName::Integer,
            "BIGINT" => TypeName::BigInt,
            "DECIMAL" | "NUMERIC" => TypeName::Decimal,
            "REAL" | "FLOAT" => TypeName::Real,
            "DOUBLE" => TypeName::Double,
            "CHAR" => TypeName::Char,
            "VARCHAR" => TypeName::Varchar,
            "BINARY" => TypeName::Binary,
            "VARBINARY" => TypeName::Varbinary,
            "DATE" => TypeName::Date,
            "TIME" => TypeName::Time,
            "TIMESTAMP" => TypeName::Timestamp,
            _ => return None,
        };
        Some(name)
    }
}

/// CAST target: type name with optional precision, scale and character set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeSpec {
    pub name: TypeName,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub scale: Option<u32>,
    #[serde(default)]
    pub charset: Option<String>,
}

impl DataTypeSpec {
    pub fn new(name: TypeName) -> Self {
        DataTypeSpec {
            name,
            precision: None,
            scale: None,
            charset: None,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Column reference.
pub fn col(name: &str) -> Node {
    Node::Identifier(Identifier::new([name]))
}

/// Qualified column reference: table.column
pub fn table_col(table: &str, column: &str) -> Node {
    Node::Identifier(Identifier::new([table, column]))
}

/// `*`
pub fn star() -> Node {
    Node::Identifier(Identifier::new(["*"]))
}

pub fn lit_int(n: i64) -> Node {
    Node::Literal(Literal::Integer(n))
}

pub fn lit_decimal(unscaled: i128, scale: u32) -> Node {
    Node::Literal(Literal::Decimal(Decimal::new(unscaled, scale)))
}

pub fn lit_double(f: f64) -> Node {
    Node::Literal(Literal::Double(f))
}

pub fn lit_str(s: &str) -> Node {
    Node::Literal(Literal::String(s.into()))
}

pub fn lit_bool(b: bool) -> Node {
    Node::Literal(Literal::Boolean(b))
}

pub fn lit_null() -> Node {
    Node::Literal(Literal::Null)
}

pub fn lit_date(s: &str) -> Node {
    Node::Literal(Literal::Date(s.into()))
}

pub fn lit_timestamp(s: &str) -> Node {
    Node::Literal(Literal::Timestamp(s.into()))
}

/// INTERVAL literal; a leading `-` in `value` becomes the sign.
pub fn interval(value: &str, qualifier: IntervalQualifier) -> Node {
    Node::Literal(Literal::Interval(IntervalLiteral::new(value, qualifier)))
}

/// A call of a canonical operator.
pub fn call(kind: OpKind, operands: Vec<Node>) -> Node {
    Node::Call(Call::new(kind, operands))
}

/// A named function call.
pub fn func(name: &str, args: Vec<Node>) -> Node {
    Node::Call(Call::new(Operator::function(name.to_string()), args))
}

pub fn time_unit(unit: TimeUnit) -> Node {
    Node::Symbol(Symbol::TimeUnit(unit))
}

/// Searched CASE.
pub fn case_when(whens: Vec<(Node, Node)>, otherwise: Option<Node>) -> Node {
    let mut operands = Vec::with_capacity(whens.len() * 2 + 1);
    for (when, then) in whens {
        operands.push(when);
        operands.push(then);
    }
    operands.extend(otherwise);
    call(OpKind::Case, operands)
}

pub fn cast(expr: impl Into<Node>, ty: DataTypeSpec) -> Node {
    call(OpKind::Cast, vec![expr.into(), Node::DataType(ty)])
}

/// `POSITION(needle IN haystack [FROM start])`
pub fn position(needle: impl Into<Node>, haystack: impl Into<Node>, start: Option<Node>) -> Node {
    let mut operands = vec![needle.into(), haystack.into()];
    operands.extend(start);
    call(OpKind::Position, operands)
}

/// `TRIM(flag characters FROM value)`
pub fn trim(flag: TrimFlag, characters: impl Into<Node>, value: impl Into<Node>) -> Node {
    call(
        OpKind::Trim,
        vec![Node::Symbol(Symbol::Trim(flag)), characters.into(), value.into()],
    )
}

/// `SUBSTRING(value FROM start [FOR length])`
pub fn substring(value: impl Into<Node>, start: impl Into<Node>, length: Option<Node>) -> Node {
    let mut operands = vec![value.into(), start.into()];
    operands.extend(length);
    call(OpKind::Substring, operands)
}

/// `FLOOR(value TO unit)`
pub fn floor_to(value: impl Into<Node>, unit: TimeUnit) -> Node {
    call(OpKind::Floor, vec![value.into(), time_unit(unit)])
}

/// `CEIL(value TO unit)`
pub fn ceil_to(value: impl Into<Node>, unit: TimeUnit) -> Node {
    call(OpKind::Ceil, vec![value.into(), time_unit(unit)])
}

/// `EXTRACT(unit FROM value)`
pub fn extract(unit: TimeUnit, value: impl Into<Node>) -> Node {
    call(OpKind::Extract, vec![time_unit(unit), value.into()])
}

pub fn round(value: impl Into<Node>, scale: Option<Node>) -> Node {
    let mut operands = vec![value.into()];
    operands.extend(scale);
    call(OpKind::Round, operands)
}

pub fn truncate(value: impl Into<Node>, scale: Option<Node>) -> Node {
    let mut operands = vec![value.into()];
    operands.extend(scale);
    call(OpKind::Truncate, operands)
}

pub fn exists(query: Query) -> Node {
    call(OpKind::Exists, vec![Node::Query(Box::new(query))])
}

/// N-ary OR; a single predicate is returned unchanged.
pub fn or_all(predicates: Vec<Node>) -> Node {
    variadic(OpKind::Or, predicates)
}

/// N-ary AND; a single predicate is returned unchanged.
pub fn and_all(predicates: Vec<Node>) -> Node {
    variadic(OpKind::And, predicates)
}

fn variadic(kind: OpKind, mut operands: Vec<Node>) -> Node {
    if operands.len() == 1 {
        if let Some(only) = operands.pop() {
            return only;
        }
    }
    call(kind, operands)
}

// =============================================================================
// Aggregate and window functions
// =============================================================================

pub fn count(expr: impl Into<Node>) -> Node {
    call(OpKind::Count, vec![expr.into()])
}

/// COUNT(*)
pub fn count_star() -> Node {
    call(OpKind::Count, vec![star()])
}

pub fn count_distinct(expr: impl Into<Node>) -> Node {
    let mut c = Call::new(OpKind::Count, vec![expr.into()]);
    c.quantifier = Some(Quantifier::Distinct);
    Node::Call(c)
}

pub fn sum(expr: impl Into<Node>) -> Node {
    call(OpKind::Sum, vec![expr.into()])
}

pub fn avg(expr: impl Into<Node>) -> Node {
    call(OpKind::Avg, vec![expr.into()])
}

pub fn min(expr: impl Into<Node>) -> Node {
    call(OpKind::Min, vec![expr.into()])
}

pub fn max(expr: impl Into<Node>) -> Node {
    call(OpKind::Max, vec![expr.into()])
}

pub fn row_number() -> Node {
    call(OpKind::RowNumber, vec![])
}

pub fn rank() -> Node {
    call(OpKind::Rank, vec![])
}

pub fn dense_rank() -> Node {
    call(OpKind::DenseRank, vec![])
}

pub fn ntile(n: i64) -> Node {
    call(OpKind::Ntile, vec![lit_int(n)])
}

pub fn lag(expr: impl Into<Node>, offset: i64) -> Node {
    call(OpKind::Lag, vec![expr.into(), lit_int(offset)])
}

pub fn lead(expr: impl Into<Node>, offset: i64) -> Node {
    call(OpKind::Lead, vec![expr.into(), lit_int(offset)])
}

pub fn rollup(keys: Vec<Node>) -> Node {
    call(OpKind::Rollup, keys)
}

pub fn cube(keys: Vec<Node>) -> Node {
    call(OpKind::Cube, keys)
}

pub fn grouping_sets(sets: Vec<Node>) -> Node {
    call(OpKind::GroupingSets, sets)
}

/// Parenthesized key list, e.g. a composite grouping set `(a, b)`.
pub fn row(items: Vec<Node>) -> Node {
    call(OpKind::Row, items)
}

// =============================================================================
// Window Builder
// =============================================================================

/// Builder for `function OVER (...)`.
#[derive(Debug, Clone)]
#[must_use = "WindowBuilder has no effect until build() is called"]
pub struct WindowBuilder {
    function: Node,
    spec: WindowSpec,
}

impl WindowBuilder {
    pub fn new(function: Node) -> Self {
        Self {
            function,
            spec: WindowSpec::default(),
        }
    }

    pub fn partition_by(mut self, exprs: Vec<Node>) -> Self {
        self.spec.partition_by = exprs;
        self
    }

    pub fn order_by(mut self, items: Vec<OrderItem>) -> Self {
        self.spec.order_by = items;
        self
    }

    pub fn frame(mut self, frame: WindowFrame) -> Self {
        self.spec.frame = Some(frame);
        self
    }

    pub fn build(self) -> Node {
        call(OpKind::Over, vec![self.function, Node::Window(self.spec)])
    }
}

/// Extension trait for adding an OVER clause.
pub trait WindowExt: Sized {
    fn over(self) -> WindowBuilder;
}

impl WindowExt for Node {
    fn over(self) -> WindowBuilder {
        WindowBuilder::new(self)
    }
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building call trees fluently.
pub trait NodeExt: Sized {
    fn into_node(self) -> Node;

    fn binary(self, kind: OpKind, other: impl Into<Node>) -> Node {
        call(kind, vec![self.into_node(), other.into()])
    }

    fn eq(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Equals, other)
    }

    fn ne(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::NotEquals, other)
    }

    fn gt(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::GreaterThan, other)
    }

    fn gte(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::GreaterThanOrEqual, other)
    }

    fn lt(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::LessThan, other)
    }

    fn lte(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::LessThanOrEqual, other)
    }

    fn and(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::And, other)
    }

    fn or(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Or, other)
    }

    fn not(self) -> Node {
        call(OpKind::Not, vec![self.into_node()])
    }

    fn neg(self) -> Node {
        call(OpKind::UnaryMinus, vec![self.into_node()])
    }

    fn add(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Plus, other)
    }

    fn sub(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Minus, other)
    }

    fn mul(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Times, other)
    }

    fn div(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Divide, other)
    }

    fn int_div(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::DivideInteger, other)
    }

    fn modulo(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Mod, other)
    }

    fn concat(self, other: impl Into<Node>) -> Node {
        self.binary(OpKind::Concat, other)
    }

    fn like(self, pattern: impl Into<Node>) -> Node {
        self.binary(OpKind::Like, pattern)
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_null(self) -> Node {
        call(OpKind::IsNull, vec![self.into_node()])
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_not_null(self) -> Node {
        call(OpKind::IsNotNull, vec![self.into_node()])
    }

    fn in_list(self, values: Vec<Node>) -> Node {
        let mut operands = vec![self.into_node()];
        operands.extend(values);
        call(OpKind::In, operands)
    }

    fn not_in_list(self, values: Vec<Node>) -> Node {
        let mut operands = vec![self.into_node()];
        operands.extend(values);
        call(OpKind::NotIn, operands)
    }

    fn between(self, low: impl Into<Node>, high: impl Into<Node>) -> Node {
        call(OpKind::Between, vec![self.into_node(), low.into(), high.into()])
    }

    /// Alias this expression (for SELECT list).
    fn alias(self, name: &str) -> crate::sql::query::SelectItem {
        crate::sql::query::SelectItem {
            expr: self.into_node(),
            alias: Some(name.into()),
        }
    }
}

impl NodeExt for Node {
    fn into_node(self) -> Node {
        self
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        lit_int(i64::from(n))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        lit_double(f)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Literal(Literal::String(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        lit_bool(b)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

impl From<Query> for Node {
    /// A query used as an operand (scalar sub-query, IN list, set operation input).
    fn from(query: Query) -> Self {
        Node::Query(Box::new(query))
    }
}
