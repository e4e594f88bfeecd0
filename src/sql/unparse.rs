//! Tree walker.
//!
//! [`Unparser`] walks a call tree (or a [`Query`]) and writes SQL for one
//! [`DialectProfile`] into a [`SqlWriter`]. Each call is first handed to
//! [`emulation::resolve`]; only calls that resolve to
//! [`RenderPlan::Native`] are laid out here, using the operator's syntax
//! class and precedence pair.
//!
//! Every position in the output has a pair of binding powers `(left, right)`:
//! how tightly the neighbours on each side bind. A call is parenthesized when
//! its own operator binds looser than either neighbour
//! ([`needs_parens`](super::operator::Operator::needs_parens)), and its operands are then written between
//! the call's own binding powers.

use std::borrow::Cow;

use tracing::debug;

use super::dialect::{helpers, DialectProfile, Feature, IntervalStyle, Pagination, TemporalKind};
use super::emulation::{self, expand_order_item, plan_group_by, GroupByPlan, RenderPlan};
use super::frame::{FrameId, FrameKind, SqlWriter};
use super::literal::{format_double, IntervalLiteral, Literal};
use super::node::{
    Call, DataTypeSpec, Node, NullsOrder, OrderItem, Quantifier, SortDir, WindowFrame,
    WindowFrameBound, WindowFrameKind, WindowSpec,
};
use super::operator::{OpKind, Operator, Syntax};
use super::query::{Cte, JoinType, Query, TableRef, TableSource};
use super::token::{Token, TokenStream};
use crate::error::UnparseError;

type Result<T> = std::result::Result<T, UnparseError>;

/// Render an expression or query tree as SQL for `profile`.
///
/// A [`Node::Query`] at the root is written without surrounding parentheses.
pub fn unparse(profile: &DialectProfile, node: &Node) -> Result<String> {
    debug!(
        target: "sqlshift::unparse",
        dialect = profile.name(),
        version = ?profile.version(),
        "unparse expression"
    );
    let mut u = Unparser::new(profile);
    match node {
        Node::Query(query) => u.query(query)?,
        other => u.node(other, 0, 0)?,
    }
    finish(u)
}

/// Render a query as SQL for `profile`.
pub fn unparse_query(profile: &DialectProfile, query: &Query) -> Result<String> {
    debug!(
        target: "sqlshift::unparse",
        dialect = profile.name(),
        version = ?profile.version(),
        "unparse query"
    );
    let mut u = Unparser::new(profile);
    u.query(query)?;
    finish(u)
}

fn finish(u: Unparser<'_>) -> Result<String> {
    let dialect = u.profile.name();
    let sql = u.finish()?;
    debug!(target: "sqlshift::unparse", dialect, bytes = sql.len(), "unparse done");
    Ok(sql)
}

/// Writes one tree for one profile. Created per unparse call.
pub struct Unparser<'p> {
    profile: &'p DialectProfile,
    writer: SqlWriter,
}

impl<'p> Unparser<'p> {
    pub fn new(profile: &'p DialectProfile) -> Self {
        Unparser {
            profile,
            writer: SqlWriter::new(),
        }
    }

    pub fn profile(&self) -> &'p DialectProfile {
        self.profile
    }

    /// SQL written so far; fails if a frame is still open.
    pub fn finish(self) -> Result<String> {
        self.writer.finish()
    }

    // =========================================================================
    // Writer access for emulation recipes
    // =========================================================================

    /// Write a keyword or other trusted fragment.
    pub fn keyword(&mut self, text: &str) {
        self.writer.keyword(text);
    }

    /// Write a prefix symbol that binds to what follows.
    pub fn prefix(&mut self, text: &str) {
        self.writer.prefix(text);
    }

    /// Write a string literal quoted for the profile.
    pub fn string_literal(&mut self, value: &str) {
        let quoted = self.profile.quote_string(value);
        self.writer.keyword(&quoted);
    }

    /// Open `NAME(`; the name is remapped and upper-cased for the profile.
    pub fn start_function(&mut self, name: &str) -> FrameId {
        let name = Token::FunctionName(name.to_string()).serialize(self.profile);
        self.writer.start_fun_call(&name)
    }

    /// Open an anonymous parenthesis.
    pub fn open_paren(&mut self) -> FrameId {
        self.writer.open_paren()
    }

    /// Start the next item of the innermost frame.
    pub fn sep(&mut self) -> Result<()> {
        self.writer.sep()
    }

    /// Close a frame opened by [`Unparser::start_function`] or [`Unparser::open_paren`].
    pub fn end(&mut self, frame: FrameId) -> Result<()> {
        self.writer.end_list(frame)
    }

    /// `NAME(arg, ...)`
    pub fn function(&mut self, name: &str, args: &[&Node]) -> Result<()> {
        let frame = self.start_function(name);
        for arg in args {
            self.sep()?;
            self.node(arg, 0, 0)?;
        }
        self.end(frame)
    }

    fn ident(&mut self, name: &str) {
        let text = Token::Ident(name.to_string()).serialize(self.profile);
        self.writer.keyword(&text);
    }

    fn token(&mut self, token: Token) {
        let text = token.serialize(self.profile);
        self.writer.keyword(&text);
    }

    /// Write a token stream, turning its newlines into writer newlines.
    fn tokens(&mut self, stream: &TokenStream) {
        if stream.is_empty() {
            return;
        }
        let text = stream.serialize(self.profile);
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.writer.newline();
            }
            self.writer.keyword(line);
        }
    }

    fn unsupported(&self, operator: &str, reason: impl Into<String>) -> UnparseError {
        UnparseError::unsupported(operator, self.profile.name(), reason)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Write `node` at a position whose neighbours bind with `left` and `right`.
    pub fn node(&mut self, node: &Node, left: u16, right: u16) -> Result<()> {
        match node {
            Node::Identifier(id) => {
                self.token(Token::QualifiedIdent(id.names.clone()));
                Ok(())
            }
            Node::Literal(lit) => self.literal(lit),
            Node::Call(call) => self.call(call, left, right),
            Node::Symbol(symbol) => {
                self.writer.keyword(symbol.as_str());
                Ok(())
            }
            Node::Query(query) => {
                let frame = self.writer.start_list(FrameKind::Query, "(", ")", "");
                self.query(query)?;
                self.writer.end_list(frame)
            }
            Node::Window(_) => Err(self.unsupported("OVER", "window specification outside OVER")),
            Node::DataType(_) => Err(self.unsupported("CAST", "data type outside CAST")),
        }
    }

    /// Resolve and write one call.
    pub fn call(&mut self, call: &Call, left: u16, right: u16) -> Result<()> {
        let profile = self.profile;
        match emulation::resolve(profile, call)? {
            RenderPlan::Native => self.native_call(call, left, right),
            RenderPlan::Rewrite(replacement) => self.node(&replacement, left, right),
            RenderPlan::DirectEmit(recipe) => recipe(self, left, right),
        }
    }

    /// The operator of `call` with any precedence the profile overrides.
    fn operator<'c>(&self, call: &'c Call) -> Cow<'c, Operator> {
        match (call.kind(), self.profile.concat_precedence()) {
            (OpKind::Concat, Some(prec)) => Cow::Owned(call.op.with_infix_precedence(prec)),
            _ => Cow::Borrowed(&call.op),
        }
    }

    fn native_call(&mut self, call: &Call, left: u16, right: u16) -> Result<()> {
        let op = self.operator(call);
        if op.needs_parens(left, right) {
            let frame = self.writer.open_paren();
            self.native_syntax(call, 0, 0)?;
            return self.writer.end_list(frame);
        }
        self.native_syntax(call, left, right)
    }

    fn native_syntax(&mut self, call: &Call, left: u16, right: u16) -> Result<()> {
        let op = &call.op;
        match op.syntax() {
            Syntax::Infix => self.infix(call, left, right),
            Syntax::Prefix => {
                let operand = self.operand(call, 0)?;
                match call.kind() {
                    OpKind::UnaryMinus | OpKind::UnaryPlus => self.writer.prefix(op.name()),
                    _ => self.writer.keyword(op.name()),
                }
                self.node(operand, op.right_prec(), right)
            }
            Syntax::Postfix => {
                let operand = self.operand(call, 0)?;
                self.node(operand, left, op.left_prec())?;
                self.writer.keyword(op.name());
                Ok(())
            }
            Syntax::Function => self.function_call(call),
            Syntax::Special => self.special(call, left, right),
        }
    }

    fn operand<'c>(&self, call: &'c Call, i: usize) -> Result<&'c Node> {
        call.operand(i).ok_or_else(|| {
            UnparseError::internal(format!("{} is missing operand {i}", call.op.name()))
        })
    }

    /// `a OP b OP c`. Chains of the same operator are flattened first so a
    /// long AND/OR list is written without recursing once per link.
    fn infix(&mut self, call: &Call, left: u16, right: u16) -> Result<()> {
        let op = self.operator(call);
        let text = match call.kind() {
            OpKind::Concat => self.profile.concat_operator(),
            _ => op.name(),
        };
        let operands = self.flatten_chain(call)?;
        let last = operands.len().saturating_sub(1);
        for (i, operand) in operands.iter().enumerate() {
            let l = if i == 0 { left } else { op.right_prec() };
            let r = if i == last { right } else { op.left_prec() };
            if i > 0 {
                self.writer.keyword(text);
            }
            self.node(operand, l, r)?;
        }
        Ok(())
    }

    /// Operands of `call` with nested calls of the same kind spliced in.
    ///
    /// AND and OR are associative, so nested links are spliced at any
    /// position. Other operators only splice their left-most operand.
    fn flatten_chain<'c>(&self, call: &'c Call) -> Result<Vec<&'c Node>> {
        let kind = call.kind();
        if matches!(kind, OpKind::And | OpKind::Or) {
            let mut out = Vec::with_capacity(call.operands.len());
            let mut stack: Vec<&Node> = call.operands.iter().rev().collect();
            while let Some(node) = stack.pop() {
                match self.same_link(node, kind)? {
                    Some(inner) => stack.extend(inner.operands.iter().rev()),
                    None => out.push(node),
                }
            }
            return Ok(out);
        }

        let mut reversed: Vec<&Node> = Vec::new();
        let mut current = call;
        loop {
            let (first, rest) = current
                .operands
                .split_first()
                .ok_or_else(|| UnparseError::internal(format!("{} has no operands", call.op)))?;
            reversed.extend(rest.iter().rev());
            match self.same_link(first, kind)? {
                Some(inner) => current = inner,
                None => {
                    reversed.push(first);
                    break;
                }
            }
        }
        reversed.reverse();
        Ok(reversed)
    }

    /// `node` as a call of `kind` that would itself be written natively.
    fn same_link<'c>(&self, node: &'c Node, kind: OpKind) -> Result<Option<&'c Call>> {
        let Node::Call(inner) = node else {
            return Ok(None);
        };
        if inner.kind() != kind || inner.quantifier.is_some() {
            return Ok(None);
        }
        match emulation::resolve(self.profile, inner)? {
            RenderPlan::Native => Ok(Some(inner)),
            _ => Ok(None),
        }
    }

    fn function_call(&mut self, call: &Call) -> Result<()> {
        let frame = self.start_function(call.op.name());
        if call.operands.is_empty() && call.kind() == OpKind::Count {
            self.sep()?;
            self.writer.keyword("*");
        }
        for (i, operand) in call.operands.iter().enumerate() {
            self.sep()?;
            if i == 0 {
                match call.quantifier {
                    Some(Quantifier::Distinct) => self.token(Token::Distinct),
                    Some(Quantifier::All) => self.token(Token::All),
                    None => {}
                }
            }
            self.node(operand, 0, 0)?;
        }
        self.end(frame)
    }

    fn special(&mut self, call: &Call, left: u16, right: u16) -> Result<()> {
        let op = &call.op;
        match call.kind() {
            OpKind::Like | OpKind::NotLike => {
                let escape = call.operand(2);
                self.node(self.operand(call, 0)?, left, op.left_prec())?;
                self.writer.keyword(op.name());
                let r = if escape.is_some() { op.left_prec() } else { right };
                self.node(self.operand(call, 1)?, op.right_prec(), r)?;
                if let Some(escape) = escape {
                    self.writer.keyword("ESCAPE");
                    self.node(escape, op.right_prec(), right)?;
                }
                Ok(())
            }
            OpKind::Between | OpKind::NotBetween => {
                self.node(self.operand(call, 0)?, left, op.left_prec())?;
                self.writer.keyword(op.name());
                self.node(self.operand(call, 1)?, op.right_prec(), op.left_prec())?;
                self.token(Token::And);
                self.node(self.operand(call, 2)?, op.right_prec(), right)
            }
            OpKind::In | OpKind::NotIn => {
                self.node(self.operand(call, 0)?, left, op.left_prec())?;
                self.writer.keyword(op.name());
                match &call.operands[1..] {
                    [query @ Node::Query(_)] => self.node(query, 0, 0),
                    items => {
                        let frame = self.open_paren();
                        for item in items {
                            self.sep()?;
                            self.node(item, 0, 0)?;
                        }
                        self.end(frame)
                    }
                }
            }
            OpKind::Exists => match self.operand(call, 0)? {
                query @ Node::Query(_) => {
                    self.writer.keyword(op.name());
                    self.node(query, 0, 0)
                }
                _ => Err(self.unsupported(op.name(), "operand must be a sub-query")),
            },
            OpKind::Position => {
                let frame = self.start_function(op.name());
                self.sep()?;
                self.node(self.operand(call, 0)?, 0, 0)?;
                self.writer.keyword("IN");
                self.node(self.operand(call, 1)?, 0, 0)?;
                if let Some(start) = call.operand(2) {
                    self.token(Token::From);
                    self.node(start, 0, 0)?;
                }
                self.end(frame)
            }
            OpKind::Trim => {
                let frame = self.start_function(op.name());
                self.sep()?;
                self.node(self.operand(call, 0)?, 0, 0)?;
                self.node(self.operand(call, 1)?, 0, 0)?;
                self.token(Token::From);
                self.node(self.operand(call, 2)?, 0, 0)?;
                self.end(frame)
            }
            OpKind::Substring => {
                let frame = self.start_function(op.name());
                self.sep()?;
                self.node(self.operand(call, 0)?, 0, 0)?;
                self.token(Token::From);
                self.node(self.operand(call, 1)?, 0, 0)?;
                if let Some(length) = call.operand(2) {
                    self.writer.keyword("FOR");
                    self.node(length, 0, 0)?;
                }
                self.end(frame)
            }
            OpKind::Floor | OpKind::Ceil => {
                let frame = self.start_function(op.name());
                self.sep()?;
                self.node(self.operand(call, 0)?, 0, 0)?;
                if let Some(unit) = call.operand(1) {
                    self.writer.keyword("TO");
                    self.node(unit, 0, 0)?;
                }
                self.end(frame)
            }
            OpKind::Extract => {
                let frame = self.start_function(op.name());
                self.sep()?;
                self.node(self.operand(call, 0)?, 0, 0)?;
                self.token(Token::From);
                self.node(self.operand(call, 1)?, 0, 0)?;
                self.end(frame)
            }
            OpKind::Case => self.case(call),
            OpKind::Cast => self.cast(call),
            OpKind::Over => self.over(call),
            OpKind::Row => {
                let frame = self.open_paren();
                for item in &call.operands {
                    self.sep()?;
                    self.node(item, 0, 0)?;
                }
                self.end(frame)
            }
            kind if kind.is_set_operation() => self.set_operation(call, op.name(), left, right),
            _ => Err(UnparseError::internal(format!(
                "no native syntax for special operator {op}"
            ))),
        }
    }

    /// `CASE WHEN c THEN v ... [ELSE e] END`
    fn case(&mut self, call: &Call) -> Result<()> {
        let frame = self.writer.start_list(FrameKind::Case, "CASE", "END", "");
        let mut pairs = call.operands.chunks_exact(2);
        for pair in pairs.by_ref() {
            self.token(Token::When);
            self.node(&pair[0], 0, 0)?;
            self.token(Token::Then);
            self.node(&pair[1], 0, 0)?;
        }
        if let [otherwise] = pairs.remainder() {
            self.token(Token::Else);
            self.node(otherwise, 0, 0)?;
        }
        self.writer.end_list(frame)
    }

    /// `CAST(x AS type)`
    fn cast(&mut self, call: &Call) -> Result<()> {
        let Node::DataType(ty) = self.operand(call, 1)? else {
            return Err(self.unsupported("CAST", "second operand must be a data type"));
        };
        let frame = self.start_function("CAST");
        self.sep()?;
        self.node(self.operand(call, 0)?, 0, 0)?;
        self.token(Token::As);
        let text = self.type_text(ty);
        self.writer.keyword(&text);
        self.end(frame)
    }

    fn type_text(&self, ty: &DataTypeSpec) -> String {
        let name = self.profile.type_name(ty.name);
        let mut out = name.to_string();
        if let (Some(precision), false) = (ty.precision, name.contains('(')) {
            let precision = match self.profile.max_precision(ty.name) {
                Some(max) => precision.min(max),
                None => precision,
            };
            match ty.scale {
                Some(scale) => out.push_str(&format!("({precision}, {})", scale.min(precision))),
                None => out.push_str(&format!("({precision})")),
            }
        }
        if let Some(charset) = &ty.charset {
            if self.profile.supports(Feature::CharacterSet) {
                out.push_str(" CHARACTER SET ");
                out.push_str(charset);
            }
        }
        out
    }

    /// `agg OVER (PARTITION BY ... ORDER BY ... frame)`
    fn over(&mut self, call: &Call) -> Result<()> {
        let function = self.operand(call, 0)?;
        let Node::Window(spec) = self.operand(call, 1)? else {
            return Err(self.unsupported("OVER", "second operand must be a window"));
        };
        self.node(function, 0, 0)?;
        self.token(Token::Over);
        let allows_framing = match function {
            Node::Call(agg) => agg.op.allows_framing(),
            _ => true,
        };
        self.window(spec, allows_framing)
    }

    fn window(&mut self, spec: &WindowSpec, allows_framing: bool) -> Result<()> {
        let frame = self.writer.start_list(FrameKind::Window, "(", ")", "");
        if !spec.partition_by.is_empty() {
            self.token(Token::PartitionBy);
            let list = self.writer.start_list(FrameKind::List, "", "", ",");
            for expr in &spec.partition_by {
                self.sep()?;
                self.node(expr, 0, 0)?;
            }
            self.writer.end_list(list)?;
        }
        if !spec.order_by.is_empty() {
            self.token(Token::OrderBy);
            self.order_items(&spec.order_by)?;
        }
        if let (Some(window_frame), true) = (&spec.frame, allows_framing) {
            self.window_frame(window_frame)?;
        }
        self.writer.end_list(frame)
    }

    fn window_frame(&mut self, frame: &WindowFrame) -> Result<()> {
        match frame.kind {
            WindowFrameKind::Rows => self.token(Token::Rows),
            WindowFrameKind::Range => self.token(Token::Range),
            WindowFrameKind::Groups => {
                if !self.profile.supports(Feature::GroupsFrame) {
                    return Err(self.unsupported("OVER", format!("requires {}", Feature::GroupsFrame)));
                }
                self.token(Token::Groups);
            }
        }
        match &frame.end {
            Some(end) => {
                self.token(Token::Between);
                self.frame_bound(&frame.start);
                self.token(Token::And);
                self.frame_bound(end);
            }
            None => self.frame_bound(&frame.start),
        }
        Ok(())
    }

    fn frame_bound(&mut self, bound: &WindowFrameBound) {
        match bound {
            WindowFrameBound::UnboundedPreceding => {
                self.token(Token::Unbounded);
                self.token(Token::Preceding);
            }
            WindowFrameBound::Preceding(n) => {
                self.writer.keyword(&n.to_string());
                self.token(Token::Preceding);
            }
            WindowFrameBound::CurrentRow => self.token(Token::CurrentRow),
            WindowFrameBound::Following(n) => {
                self.writer.keyword(&n.to_string());
                self.token(Token::Following);
            }
            WindowFrameBound::UnboundedFollowing => {
                self.token(Token::Unbounded);
                self.token(Token::Following);
            }
        }
    }

    /// Comma list of sort keys, with null ordering applied.
    fn order_items(&mut self, items: &[OrderItem]) -> Result<()> {
        let list = self.writer.start_list(FrameKind::List, "", "", ",");
        for item in items {
            for key in expand_order_item(self.profile, item) {
                self.sep()?;
                self.node(&key.expr, 0, 0)?;
                if key.dir == SortDir::Desc {
                    self.token(Token::Desc);
                }
                match key.nulls {
                    Some(NullsOrder::First) => self.token(Token::NullsFirst),
                    Some(NullsOrder::Last) => self.token(Token::NullsLast),
                    None => {}
                }
            }
        }
        self.writer.end_list(list)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn literal(&mut self, lit: &Literal) -> Result<()> {
        let text = match lit {
            Literal::Null => Token::LitNull.serialize(self.profile),
            Literal::Boolean(b) => Token::LitBool(*b).serialize(self.profile),
            Literal::Integer(n) => n.to_string(),
            Literal::Decimal(d) => d.to_sql(),
            Literal::Double(f) => format_double(*f)
                .ok_or_else(|| self.unsupported("DOUBLE", format!("{f} has no SQL literal")))?,
            Literal::String(s) => self.profile.quote_string(s),
            Literal::Date(v) => self.profile.format_temporal_literal(TemporalKind::Date, v),
            Literal::Time(v) => self.profile.format_temporal_literal(TemporalKind::Time, v),
            Literal::Timestamp(v) => {
                self.profile.format_temporal_literal(TemporalKind::Timestamp, v)
            }
            Literal::Interval(interval) => self.interval_text(interval)?,
        };
        self.writer.keyword(&text);
        Ok(())
    }

    fn interval_text(&self, interval: &IntervalLiteral) -> Result<String> {
        let sign = if interval.negative { "-" } else { "" };
        let qualifier = interval.qualifier;
        let quoted_signed = || self.profile.quote_string(&format!("{sign}{}", interval.value));
        let text = match self.profile.interval_style() {
            IntervalStyle::Standard => format!(
                "INTERVAL {sign}{} {}",
                self.profile.quote_string(&interval.value),
                qualifier.to_sql()
            ),
            IntervalStyle::SignInQuotes => {
                format!("INTERVAL {} {}", quoted_signed(), qualifier.to_sql())
            }
            IntervalStyle::MySql => {
                let unit = match qualifier.end {
                    Some(end) => format!("{}_{}", qualifier.start.as_str(), end.as_str()),
                    None => qualifier.start.as_str().to_string(),
                };
                format!("INTERVAL {} {unit}", quoted_signed())
            }
            IntervalStyle::BigQuery => match interval.signed_integer() {
                Some(n) => format!("INTERVAL {n} {}", qualifier.start.as_str()),
                None => format!("INTERVAL {} {}", quoted_signed(), qualifier.to_sql()),
            },
            IntervalStyle::Snowflake => {
                if qualifier.end.is_some() {
                    return Err(self.unsupported("INTERVAL", "interval ranges have no literal form"));
                }
                let body = format!("{sign}{} {}", interval.value, qualifier.start.as_str());
                format!("INTERVAL {}", self.profile.quote_string(&body))
            }
            IntervalStyle::Unsupported => {
                return Err(self.unsupported("INTERVAL", "no interval literals"));
            }
        };
        Ok(text)
    }

    // =========================================================================
    // Set operations
    // =========================================================================

    /// `left\nKEYWORD\nright`, parenthesized when the position requires it.
    pub fn set_operation(&mut self, call: &Call, keyword: &str, left: u16, right: u16) -> Result<()> {
        let op = &call.op;
        let [lhs, rhs] = call.operands.as_slice() else {
            return Err(UnparseError::internal(format!(
                "{op} takes two queries, got {}",
                call.operands.len()
            )));
        };
        let parens = op.needs_parens(left, right);
        let frame = parens.then(|| self.writer.start_list(FrameKind::Query, "(", ")", ""));
        let (left, right) = if parens { (0, 0) } else { (left, right) };

        self.set_operand(lhs, left, op.left_prec())?;
        self.writer.newline();
        self.writer.keyword(keyword);
        self.writer.newline();
        self.set_operand(rhs, op.right_prec(), right)?;

        match frame {
            Some(frame) => self.writer.end_list(frame),
            None => Ok(()),
        }
    }

    fn set_operand(&mut self, node: &Node, left: u16, right: u16) -> Result<()> {
        match node {
            Node::Query(query) if !query.has_trailing_clauses() => match &query.set_op {
                Some(inner) => self.call(inner, left, right),
                None => self.select_block(query),
            },
            other => self.node(other, left, right),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Write a whole query: WITH, body, ORDER BY and pagination.
    pub fn query(&mut self, query: &Query) -> Result<()> {
        self.with_clause(&query.with)?;
        match &query.set_op {
            Some(set_op) => {
                self.call(set_op, 0, 0)?;
                self.order_and_paginate(query, true)
            }
            None => self.select_block(query),
        }
    }

    fn with_clause(&mut self, ctes: &[Cte]) -> Result<()> {
        if ctes.is_empty() {
            return Ok(());
        }
        self.token(Token::With);
        if ctes.iter().any(|c| c.recursive) && self.profile.emit_recursive_keyword() {
            self.token(Token::Recursive);
        }
        let list = self.writer.start_list(FrameKind::List, "", "", ",");
        for cte in ctes {
            self.sep()?;
            self.ident(&cte.name);
            if let Some(columns) = &cte.columns {
                self.ident_list(columns)?;
            }
            self.token(Token::As);
            let frame = self.writer.start_list(FrameKind::Query, "(", ")", "");
            self.query(&cte.query)?;
            self.writer.end_list(frame)?;
        }
        self.writer.end_list(list)?;
        self.writer.newline();
        Ok(())
    }

    /// `SELECT ... [ORDER BY ...] [pagination]` for a query without set operation.
    fn select_block(&mut self, query: &Query) -> Result<()> {
        let top = match (self.profile.pagination(), query.limit, query.offset) {
            (Pagination::Top, Some(limit), None) => Some(limit),
            _ => None,
        };

        self.token(Token::Select);
        if query.distinct {
            self.token(Token::Distinct);
        }
        if let Some(limit) = top {
            let clause = self.profile.top_clause(limit);
            self.writer.keyword(&clause);
        }
        self.select_list(query)?;

        match &query.from {
            Some(table) => {
                self.writer.newline();
                self.token(Token::From);
                self.table_ref(table)?;
            }
            None => {
                if let Some(dummy) = self.profile.dummy_table() {
                    self.writer.newline();
                    self.token(Token::From);
                    self.writer.keyword(dummy);
                }
            }
        }

        for join in &query.joins {
            self.writer.newline();
            let keyword = match join.join_type {
                JoinType::Inner => "INNER JOIN",
                JoinType::Left => "LEFT JOIN",
                JoinType::Right => "RIGHT JOIN",
                JoinType::Full => {
                    if !self.profile.supports(Feature::FullOuterJoin) {
                        return Err(self.unsupported(
                            "FULL OUTER JOIN",
                            format!("requires {}", Feature::FullOuterJoin),
                        ));
                    }
                    "FULL OUTER JOIN"
                }
                JoinType::Cross => "CROSS JOIN",
            };
            self.writer.keyword(keyword);
            self.table_ref(&join.table)?;
            if let Some(on) = &join.on {
                self.token(Token::On);
                self.node(on, 0, 0)?;
            }
        }

        if let Some(condition) = &query.where_clause {
            self.writer.newline();
            self.token(Token::Where);
            self.node(condition, 0, 0)?;
        }

        if !query.group_by.is_empty() {
            self.writer.newline();
            self.token(Token::GroupBy);
            let (keys, modifier) = match plan_group_by(self.profile, &query.group_by) {
                GroupByPlan::Plain(keys) => (keys, None),
                GroupByPlan::Trailing { keys, modifier } => (keys, Some(modifier)),
            };
            let list = self.writer.start_list(FrameKind::List, "", "", ",");
            for key in keys {
                self.sep()?;
                self.node(key, 0, 0)?;
            }
            self.writer.end_list(list)?;
            if let Some(modifier) = modifier {
                self.writer.keyword(modifier);
            }
        }

        if let Some(condition) = &query.having {
            self.writer.newline();
            self.token(Token::Having);
            self.node(condition, 0, 0)?;
        }

        if top.is_some() {
            self.order_by(&query.order_by)
        } else {
            self.order_and_paginate(query, false)
        }
    }

    fn select_list(&mut self, query: &Query) -> Result<()> {
        if query.select.is_empty() {
            self.token(Token::Star);
            return Ok(());
        }
        let list = self.writer.start_list(FrameKind::List, "", "", ",");
        for item in &query.select {
            self.sep()?;
            self.node(&item.expr, 0, 0)?;
            if let Some(alias) = &item.alias {
                self.token(Token::As);
                self.ident(alias);
            }
        }
        self.writer.end_list(list)
    }

    fn ident_list(&mut self, names: &[String]) -> Result<()> {
        let frame = self.open_paren();
        for name in names {
            self.sep()?;
            self.ident(name);
        }
        self.end(frame)
    }

    fn table_ref(&mut self, table: &TableRef) -> Result<()> {
        match &table.source {
            TableSource::Table { schema, name } => {
                let names = schema.iter().chain(std::iter::once(name)).cloned().collect();
                self.token(Token::QualifiedIdent(names));
            }
            TableSource::Subquery(query) => {
                let frame = self.writer.start_list(FrameKind::Query, "(", ")", "");
                self.query(query)?;
                self.writer.end_list(frame)?;
            }
            TableSource::Values(rows) => return self.values(rows, table),
        }
        self.table_alias(table, true)
    }

    /// `[AS] alias [(col, ...)]`
    fn table_alias(&mut self, table: &TableRef, with_columns: bool) -> Result<()> {
        let Some(alias) = &table.alias else {
            return Ok(());
        };
        if self.profile.supports(Feature::TableAliasAs) {
            self.token(Token::As);
        }
        self.ident(alias);
        if with_columns && !table.column_aliases.is_empty() {
            self.ident_list(&table.column_aliases)?;
        }
        Ok(())
    }

    /// Literal rows in FROM: native `(VALUES ...) AS t (cols)`, or one
    /// `SELECT` per row joined with `UNION ALL` when the product cannot name
    /// the columns of a VALUES list.
    fn values(&mut self, rows: &[Vec<Node>], table: &TableRef) -> Result<()> {
        if rows.is_empty() {
            return Err(self.unsupported("VALUES", "at least one row is required"));
        }
        if self.profile.supports(Feature::AliasedValues) {
            let outer = self.writer.start_list(FrameKind::Parens, "(", ")", "");
            let list = self.writer.start_list(FrameKind::Values, "VALUES", "", ",");
            for row in rows {
                self.sep()?;
                let frame = self.open_paren();
                for value in row {
                    self.sep()?;
                    self.node(value, 0, 0)?;
                }
                self.end(frame)?;
            }
            self.writer.end_list(list)?;
            self.writer.end_list(outer)?;
            return self.table_alias(table, true);
        }

        let frame = self.writer.start_list(FrameKind::Query, "(", ")", "");
        for (i, row) in rows.iter().enumerate() {
            if i > 0 {
                self.writer.newline();
                self.writer.keyword("UNION ALL");
                self.writer.newline();
            }
            self.token(Token::Select);
            let list = self.writer.start_list(FrameKind::List, "", "", ",");
            for (j, value) in row.iter().enumerate() {
                self.sep()?;
                self.node(value, 0, 0)?;
                self.token(Token::As);
                match table.column_aliases.get(j) {
                    Some(name) => self.ident(name),
                    None => self.ident(&format!("EXPR${j}")),
                }
            }
            self.writer.end_list(list)?;
            if let Some(dummy) = self.profile.dummy_table() {
                self.writer.newline();
                self.token(Token::From);
                self.writer.keyword(dummy);
            }
        }
        self.writer.end_list(frame)?;
        self.table_alias(table, false)
    }

    fn order_by(&mut self, items: &[OrderItem]) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.writer.newline();
        self.token(Token::OrderBy);
        self.order_items(items)
    }

    /// ORDER BY and the profile's pagination form.
    fn order_and_paginate(&mut self, query: &Query, set_body: bool) -> Result<()> {
        let (limit, offset) = (query.limit, query.offset);
        if limit.is_none() && offset.is_none() {
            return self.order_by(&query.order_by);
        }
        if offset.is_some() && !self.profile.supports(Feature::Offset) {
            return Err(self.unsupported("OFFSET", format!("requires {}", Feature::Offset)));
        }

        let stream = match self.profile.pagination() {
            Pagination::LimitOffset => {
                self.order_by(&query.order_by)?;
                helpers::emit_limit_offset(limit, offset, self.profile.limit_for_offset_only())
            }
            Pagination::LimitComma => {
                let all_rows = self.profile.limit_for_offset_only();
                if limit.is_none() && all_rows.is_none() {
                    return Err(self.unsupported("OFFSET", "OFFSET needs a row limit"));
                }
                self.order_by(&query.order_by)?;
                helpers::emit_limit_comma(limit, offset, all_rows.unwrap_or_default())
            }
            Pagination::OffsetFetch => {
                if !self.profile.supports(Feature::Offset) {
                    return Err(self.unsupported("FETCH", format!("requires {}", Feature::Offset)));
                }
                self.order_by(&query.order_by)?;
                helpers::emit_offset_fetch(limit, offset)
            }
            Pagination::Top => {
                // TOP cannot follow a set operation or skip rows
                if !self.profile.supports(Feature::Offset) {
                    let what = if set_body { "TOP" } else { "OFFSET" };
                    return Err(self.unsupported(what, format!("requires {}", Feature::Offset)));
                }
                if query.order_by.is_empty() {
                    self.writer.newline();
                    self.writer.keyword("ORDER BY (SELECT NULL)");
                } else {
                    self.order_by(&query.order_by)?;
                }
                helpers::emit_offset_fetch(limit, Some(offset.unwrap_or(0)))
            }
        };
        self.paginate(stream)
    }

    fn paginate(&mut self, stream: TokenStream) -> Result<()> {
        if !stream.is_empty() {
            self.writer.newline();
            self.tokens(&stream);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Unparser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unparser")
            .field("dialect", &self.profile.name())
            .field("written", &self.writer.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::sql::dialect::Dialect;
    use crate::sql::literal::{IntervalQualifier, TimeUnit, TrimFlag};
    use crate::sql::node::{
        self, and_all, case_when, cast, col, count_distinct, count_star, cube, exists, func,
        interval, lit_decimal, lit_double, lit_int, lit_null, lit_str, or_all, rollup,
        row_number, sum, NodeExt, TypeName, WindowExt,
    };
    use crate::sql::query::{Cte, SelectItem};
    use crate::sql::test_utils::validate_sql;

    fn profile(dialect: Dialect) -> DialectProfile {
        DialectProfile::new(dialect, None).unwrap()
    }

    fn ansi(node: &Node) -> String {
        unparse(&profile(Dialect::Ansi), node).unwrap()
    }

    #[test]
    fn test_minimal_parentheses() {
        let a = || col("a");
        assert_eq!(ansi(&a().add(col("b")).mul(col("c"))), "(\"a\" + \"b\") * \"c\"");
        assert_eq!(ansi(&a().add(col("b").mul(col("c")))), "\"a\" + \"b\" * \"c\"");
        assert_eq!(ansi(&a().sub(col("b")).sub(col("c"))), "\"a\" - \"b\" - \"c\"");
        assert_eq!(ansi(&a().sub(col("b").sub(col("c")))), "\"a\" - (\"b\" - \"c\")");
        assert_eq!(
            ansi(&a().eq(1).or(col("b").eq(2)).and(col("c").eq(3))),
            "(\"a\" = 1 OR \"b\" = 2) AND \"c\" = 3"
        );
    }

    #[test]
    fn test_prefix_and_postfix() {
        assert_eq!(ansi(&col("a").eq(1).not()), "NOT \"a\" = 1");
        assert_eq!(ansi(&col("a").eq(1).not().not()), "NOT NOT \"a\" = 1");
        assert_eq!(ansi(&col("a").add(col("b")).neg()), "-(\"a\" + \"b\")");
        assert_eq!(ansi(&lit_int(-1).neg()), "- -1");
        assert_eq!(ansi(&col("a").is_null()), "\"a\" IS NULL");
        assert_eq!(
            ansi(&col("a").add(1).is_not_null().and(col("b").is_null())),
            "\"a\" + 1 IS NOT NULL AND \"b\" IS NULL"
        );
    }

    #[test]
    fn test_boolean_chains_flatten() {
        let nested = col("a").eq(1).and(col("b").eq(2).and(col("c").eq(3)));
        assert_eq!(ansi(&nested), "\"a\" = 1 AND \"b\" = 2 AND \"c\" = 3");
        let n_ary = or_all(vec![col("a").eq(1), col("b").eq(2), col("c").eq(3)]);
        assert_eq!(ansi(&n_ary), "\"a\" = 1 OR \"b\" = 2 OR \"c\" = 3");
    }

    #[test]
    fn test_deep_or_chain() {
        let mut tree = col("x").eq(0);
        for i in 1..20_000 {
            tree = tree.or(col("x").eq(i));
        }
        let sql = ansi(&tree);
        assert!(sql.starts_with("\"x\" = 0 OR \"x\" = 1 OR"));
        assert!(sql.ends_with("\"x\" = 19999"));
        assert!(!sql.contains('('));
    }

    #[test]
    fn test_deep_and_chain_n_ary() {
        let predicates = (0..10_000).map(|i| col("x").ne(i)).collect();
        let sql = ansi(&and_all(predicates));
        assert_eq!(sql.matches(" AND ").count(), 9_999);
    }

    #[test]
    fn test_special_predicates() {
        assert_eq!(
            ansi(&col("a").between(1, col("b").add(1))),
            "\"a\" BETWEEN 1 AND \"b\" + 1"
        );
        assert_eq!(
            ansi(&col("a").in_list(vec![lit_int(1), lit_int(2)])),
            "\"a\" IN (1, 2)"
        );
        assert_eq!(ansi(&col("a").like("x%")), "\"a\" LIKE 'x%'");
        let escaped = node::call(OpKind::Like, vec![col("a"), lit_str("x!%"), lit_str("!")]);
        assert_eq!(ansi(&escaped), "\"a\" LIKE 'x!%' ESCAPE '!'");
    }

    #[test]
    fn test_in_subquery_and_exists() {
        let sub = Query::new().select(vec![col("id")]).from(TableRef::new("t"));
        let expr = col("a").in_list(vec![Node::from(sub.clone())]);
        assert_eq!(ansi(&expr), "\"a\" IN (SELECT \"id\"\nFROM \"t\")");
        assert_eq!(ansi(&exists(sub)), "EXISTS (SELECT \"id\"\nFROM \"t\")");
    }

    #[test]
    fn test_standard_special_forms() {
        assert_eq!(
            ansi(&node::position(lit_str("a"), col("s"), None)),
            "POSITION('a' IN \"s\")"
        );
        assert_eq!(
            ansi(&node::trim(TrimFlag::Leading, " ", col("s"))),
            "TRIM(LEADING ' ' FROM \"s\")"
        );
        assert_eq!(
            ansi(&node::substring(col("s"), lit_int(2), Some(lit_int(3)))),
            "SUBSTRING(\"s\" FROM 2 FOR 3)"
        );
        assert_eq!(
            ansi(&node::extract(TimeUnit::Year, col("d"))),
            "EXTRACT(YEAR FROM \"d\")"
        );
        assert_eq!(
            ansi(&node::floor_to(col("ts"), TimeUnit::Month)),
            "FLOOR(\"ts\" TO MONTH)"
        );
    }

    #[test]
    fn test_case_and_cast() {
        let expr = case_when(
            vec![(col("a").gt(1), lit_str("big")), (col("a").gt(0), lit_str("small"))],
            Some(lit_null()),
        );
        assert_eq!(
            ansi(&expr),
            "CASE WHEN \"a\" > 1 THEN 'big' WHEN \"a\" > 0 THEN 'small' ELSE NULL END"
        );
        let ty = DataTypeSpec::new(TypeName::Decimal).with_precision(50).with_scale(2);
        assert_eq!(ansi(&cast(col("a"), ty)), "CAST(\"a\" AS DECIMAL(38, 2))");
        let ty = DataTypeSpec::new(TypeName::Varchar).with_precision(5).with_charset("UTF8");
        assert_eq!(
            unparse(&profile(Dialect::Postgres), &cast(col("a"), ty)).unwrap(),
            "CAST(\"a\" AS VARCHAR(5))"
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(ansi(&count_star()), "COUNT(*)");
        assert_eq!(ansi(&count_distinct(col("a"))), "COUNT(DISTINCT \"a\")");
        assert_eq!(ansi(&func("coalesce", vec![col("a"), lit_int(0)])), "COALESCE(\"a\", 0)");
        assert_eq!(
            unparse(&profile(Dialect::Postgres), &func("nvl", vec![col("a"), lit_int(0)])).unwrap(),
            "COALESCE(\"a\", 0)"
        );
    }

    #[test]
    fn test_window() {
        let expr = sum(col("x"))
            .over()
            .partition_by(vec![col("g")])
            .order_by(vec![OrderItem::desc(col("d"))])
            .frame(WindowFrame::rows_to_current())
            .build();
        assert_eq!(
            ansi(&expr),
            "SUM(\"x\") OVER (PARTITION BY \"g\" ORDER BY \"d\" DESC ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW)"
        );
    }

    #[test]
    fn test_ranking_function_drops_frame() {
        let expr = row_number()
            .over()
            .order_by(vec![OrderItem::asc(col("d"))])
            .frame(WindowFrame::rolling(3))
            .build();
        assert_eq!(ansi(&expr), "ROW_NUMBER() OVER (ORDER BY \"d\")");
    }

    #[test]
    fn test_groups_frame_gated() {
        let frame = WindowFrame::between(
            WindowFrameKind::Groups,
            WindowFrameBound::Preceding(1),
            WindowFrameBound::Following(1),
        );
        let expr = sum(col("x")).over().order_by(vec![OrderItem::asc(col("d"))]).frame(frame).build();
        let old = DialectProfile::for_name("postgres", Some("10")).unwrap();
        let err = unparse(&old, &expr).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
        let new = DialectProfile::for_name("postgres", Some("11")).unwrap();
        assert!(unparse(&new, &expr).unwrap().contains("GROUPS BETWEEN 1 PRECEDING AND 1 FOLLOWING"));
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(ansi(&lit_decimal(-123, 10)), "-1.23E-8");
        assert_eq!(ansi(&lit_decimal(1250, 2)), "12.50");
        assert_eq!(ansi(&lit_double(2.5)), "2.5");
        let err = unparse(&profile(Dialect::Ansi), &lit_double(f64::NAN)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedEmulation);
    }

    #[test]
    fn test_interval_styles() {
        let day = IntervalQualifier::single(TimeUnit::Day);
        let neg = interval("-1", day);
        let year_month = interval("1-2", IntervalQualifier::range(TimeUnit::Year, TimeUnit::Month));

        assert_eq!(ansi(&neg), "INTERVAL -'1' DAY");
        assert_eq!(ansi(&year_month), "INTERVAL '1-2' YEAR TO MONTH");
        assert_eq!(
            unparse(&profile(Dialect::MySql), &year_month).unwrap(),
            "INTERVAL '1-2' YEAR_MONTH"
        );
        assert_eq!(unparse(&profile(Dialect::BigQuery), &neg).unwrap(), "INTERVAL -1 DAY");
        assert_eq!(unparse(&profile(Dialect::Snowflake), &neg).unwrap(), "INTERVAL '-1 DAY'");
        assert!(unparse(&profile(Dialect::Snowflake), &year_month).is_err());
        assert!(unparse(&profile(Dialect::TSql), &neg).is_err());
    }

    #[test]
    fn test_negated_interval_matches_negative_literal() {
        let day = IntervalQualifier::single(TimeUnit::Day);
        let negated = interval("1", day).neg();
        let negative = interval("-1", day);
        for d in Dialect::ALL {
            let p = profile(*d);
            assert_eq!(unparse(&p, &negated).ok(), unparse(&p, &negative).ok(), "{d}");
        }
    }

    #[test]
    fn test_single_cube_renders_as_rollup() {
        let p = profile(Dialect::Postgres);
        assert_eq!(
            unparse(&p, &cube(vec![col("product_class_id")])).unwrap(),
            unparse(&p, &rollup(vec![col("product_class_id")])).unwrap()
        );
    }

    #[test]
    fn test_query_clauses() {
        let query = Query::new()
            .select(vec![SelectItem::from(col("region")), sum(col("amount")).alias("total")])
            .from(TableRef::new("sales").with_alias("s"))
            .filter(col("year").eq(2024))
            .group_by(vec![col("region")])
            .having(sum(col("amount")).gt(100))
            .order_by(vec![OrderItem::desc(col("total"))])
            .limit(10);
        let sql = unparse_query(&profile(Dialect::Postgres), &query).unwrap();
        validate_sql(&sql, Dialect::Postgres).unwrap();
        insta::assert_snapshot!(sql, @r#"
        SELECT "region", SUM("amount") AS "total"
        FROM "sales" AS "s"
        WHERE "year" = 2024
        GROUP BY "region"
        HAVING SUM("amount") > 100
        ORDER BY "total" DESC
        LIMIT 10
        "#);
    }

    #[test]
    fn test_top_pagination() {
        let query = Query::new().select(vec![col("a")]).from(TableRef::new("t")).limit(5);
        assert_eq!(
            query.to_sql(&profile(Dialect::TSql)).unwrap(),
            "SELECT TOP (5) [a]\nFROM [t]"
        );
        let skipped = query.clone().offset(10);
        assert_eq!(
            skipped.to_sql(&profile(Dialect::TSql)).unwrap(),
            "SELECT [a]\nFROM [t]\nORDER BY (SELECT NULL)\nOFFSET 10 ROWS\nFETCH NEXT 5 ROWS ONLY"
        );
        let old = DialectProfile::for_name("mssql", Some("10")).unwrap();
        assert!(skipped.to_sql(&old).is_err());
        assert_eq!(
            query.to_sql(&profile(Dialect::Teradata)).unwrap(),
            "SELECT TOP 5 \"a\"\nFROM \"t\""
        );
    }

    #[test]
    fn test_limit_forms() {
        let query = Query::new().select(vec![col("a")]).from(TableRef::new("t")).offset(3);
        assert_eq!(
            query.to_sql(&profile(Dialect::MySql)).unwrap(),
            "SELECT `a`\nFROM `t`\nLIMIT 18446744073709551615\nOFFSET 3"
        );
        assert_eq!(
            query.to_sql(&profile(Dialect::Snowflake)).unwrap(),
            "SELECT \"a\"\nFROM \"t\"\nLIMIT NULL\nOFFSET 3"
        );
        assert_eq!(
            query.clone().limit(2).to_sql(&profile(Dialect::Hive)).unwrap(),
            "SELECT a\nFROM t\nLIMIT 3, 2"
        );
        assert_eq!(
            query.to_sql(&profile(Dialect::Ansi)).unwrap(),
            "SELECT \"a\"\nFROM \"t\"\nOFFSET 3 ROWS"
        );
    }

    #[test]
    fn test_dummy_table() {
        let query = Query::new().select(vec![lit_int(1)]);
        assert_eq!(query.to_sql(&profile(Dialect::Oracle)).unwrap(), "SELECT 1\nFROM DUAL");
        assert_eq!(query.to_sql(&profile(Dialect::Postgres)).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_values_native_and_emulated() {
        let rows = vec![vec![lit_int(1), lit_str("a")], vec![lit_int(2), lit_str("b")]];
        let query = Query::new()
            .select_star()
            .from(TableRef::values(rows).with_alias("t").with_column_aliases(vec!["id", "name"]));
        assert_eq!(
            query.to_sql(&profile(Dialect::Postgres)).unwrap(),
            "SELECT *\nFROM (VALUES (1, 'a'), (2, 'b')) AS \"t\" (\"id\", \"name\")"
        );
        insta::assert_snapshot!(query.to_sql(&profile(Dialect::Teradata)).unwrap(), @r#"
        SELECT *
        FROM (SELECT 1 AS "id", 'a' AS "name"
        UNION ALL
        SELECT 2 AS "id", 'b' AS "name") AS "t"
        "#);
    }

    #[test]
    fn test_values_default_column_names() {
        let query = Query::new()
            .select_star()
            .from(TableRef::values(vec![vec![lit_int(1)]]).with_alias("t"));
        assert_eq!(
            query.to_sql(&profile(Dialect::Oracle)).unwrap(),
            "SELECT *\nFROM (SELECT 1 AS \"EXPR$0\"\nFROM DUAL) \"t\""
        );
    }

    #[test]
    fn test_set_operation_nesting() {
        let q = |t: &str| Query::new().select(vec![col("a")]).from(TableRef::new(t));
        let left_deep = q("t1").union(q("t2")).union_all(q("t3"));
        assert_eq!(
            left_deep.to_sql(&profile(Dialect::Ansi)).unwrap(),
            "SELECT \"a\"\nFROM \"t1\"\nUNION\nSELECT \"a\"\nFROM \"t2\"\nUNION ALL\nSELECT \"a\"\nFROM \"t3\""
        );
        let right_nested = q("t1").except(q("t2").union(q("t3")));
        assert_eq!(
            right_nested.to_sql(&profile(Dialect::Ansi)).unwrap(),
            "SELECT \"a\"\nFROM \"t1\"\nEXCEPT\n(SELECT \"a\"\nFROM \"t2\"\nUNION\nSELECT \"a\"\nFROM \"t3\")"
        );
        let ordered = q("t1").union(q("t2")).order_by(vec![OrderItem::asc(col("a"))]).limit(1);
        assert!(ordered
            .to_sql(&profile(Dialect::Postgres))
            .unwrap()
            .ends_with("UNION\nSELECT \"a\"\nFROM \"t2\"\nORDER BY \"a\"\nLIMIT 1"));
    }

    #[test]
    fn test_set_operand_with_limit_is_parenthesized() {
        let q = |t: &str| Query::new().select(vec![col("a")]).from(TableRef::new(t));
        let sql = q("t1").limit(1).union_all(q("t2")).to_sql(&profile(Dialect::Postgres)).unwrap();
        assert!(sql.starts_with("(SELECT \"a\"\nFROM \"t1\"\nLIMIT 1)\nUNION ALL"));
    }

    #[test]
    fn test_recursive_cte() {
        let query = Query::new()
            .with_cte(Cte::recursive("r", Query::new().select(vec![lit_int(1)])).with_columns(vec!["n"]))
            .select_star()
            .from(TableRef::new("r"));
        assert_eq!(
            query.to_sql(&profile(Dialect::Postgres)).unwrap(),
            "WITH RECURSIVE \"r\" (\"n\") AS (SELECT 1)\nSELECT *\nFROM \"r\""
        );
        assert!(query.to_sql(&profile(Dialect::TSql)).unwrap().starts_with("WITH [r] ([n]) AS"));
    }

    #[test]
    fn test_null_ordering_scenario() {
        let query = Query::new()
            .select(vec![col("c")])
            .from(TableRef::new("t"))
            .order_by(vec![OrderItem::desc(col("c")).nulls_first()]);
        assert!(query
            .to_sql(&profile(Dialect::MySql))
            .unwrap()
            .ends_with("ORDER BY `c` IS NULL DESC, `c` DESC"));
        assert!(query
            .to_sql(&profile(Dialect::Postgres))
            .unwrap()
            .ends_with("ORDER BY \"c\" DESC"));
    }

    #[test]
    fn test_group_by_trailing_rollup() {
        let query = Query::new()
            .select(vec![col("a"), col("b")])
            .from(TableRef::new("t"))
            .group_by(vec![rollup(vec![col("a"), col("b")])]);
        let old = DialectProfile::for_name("mysql", Some("5.7")).unwrap();
        assert!(query.to_sql(&old).unwrap().ends_with("GROUP BY `a`, `b` WITH ROLLUP"));
        assert!(query
            .to_sql(&profile(Dialect::Postgres))
            .unwrap()
            .ends_with("GROUP BY ROLLUP(\"a\", \"b\")"));
    }

    #[test]
    fn test_full_join_gated() {
        let query = Query::new()
            .select_star()
            .from(TableRef::new("a"))
            .full_join(TableRef::new("b"), node::table_col("a", "id").eq(node::table_col("b", "id")));
        assert!(query
            .to_sql(&profile(Dialect::Postgres))
            .unwrap()
            .contains("\nFULL OUTER JOIN \"b\" ON \"a\".\"id\" = \"b\".\"id\""));
        let no_full = profile(Dialect::Postgres).with_feature(Feature::FullOuterJoin, false);
        assert!(query.to_sql(&no_full).is_err());
    }

    #[test]
    fn test_frames_balanced_after_error() {
        let bad = func("f", vec![lit_double(f64::INFINITY)]);
        let err = unparse(&profile(Dialect::Ansi), &bad).unwrap_err();
        assert_ne!(err.category(), ErrorCategory::InternalConsistency);
    }
}
