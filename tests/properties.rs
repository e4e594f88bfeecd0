//! Property tests: rendering is deterministic, parentheses stay balanced and
//! minimal, re-parsing the output recovers the tree, and string literals
//! survive quoting on every product.

use proptest::prelude::*;
use sqlparser::ast::{BinaryOperator, Expr, UnaryOperator, Value};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};

use sqlshift::sql::literal::Literal;
use sqlshift::sql::node::{self, col, lit_int, lit_str, Node};
use sqlshift::sql::operator::OpKind;
use sqlshift::{unparse, Dialect, DialectProfile};

fn arithmetic() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        (0i64..100).prop_map(lit_int),
        prop::sample::select(vec!["a", "b", "c"]).prop_map(|name| col(name)),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        (
            prop::sample::select(vec![OpKind::Plus, OpKind::Minus, OpKind::Times, OpKind::Divide]),
            inner.clone(),
            inner,
        )
            .prop_map(|(kind, left, right)| node::call(kind, vec![left, right]))
    })
}

fn predicate() -> impl Strategy<Value = Node> {
    let comparison = (
        prop::sample::select(vec![OpKind::Equals, OpKind::LessThan, OpKind::GreaterThan]),
        arithmetic(),
        arithmetic(),
    )
        .prop_map(|(kind, left, right)| node::call(kind, vec![left, right]));
    comparison.prop_recursive(3, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| node::call(OpKind::And, vec![l, r])),
            (inner.clone(), inner.clone())
                .prop_map(|(l, r)| node::call(OpKind::Or, vec![l, r])),
            inner.prop_map(|p| node::call(OpKind::Not, vec![p])),
        ]
    })
}

/// Operator structure shared by call trees and parsed expressions. AND and
/// OR are associative, so their chains compare as flat lists.
#[derive(Debug, PartialEq)]
enum Shape {
    Binary(&'static str, Box<Shape>, Box<Shape>),
    Chain(&'static str, Vec<Shape>),
    Not(Box<Shape>),
    Number(String),
    Column(String),
}

fn join(symbol: &'static str, left: Shape, right: Shape) -> Shape {
    if !matches!(symbol, "AND" | "OR") {
        return Shape::Binary(symbol, Box::new(left), Box::new(right));
    }
    let mut items = Vec::new();
    for side in [left, right] {
        match side {
            Shape::Chain(inner, links) if inner == symbol => items.extend(links),
            other => items.push(other),
        }
    }
    Shape::Chain(symbol, items)
}

fn binary_symbol(kind: OpKind) -> &'static str {
    match kind {
        OpKind::Plus => "+",
        OpKind::Minus => "-",
        OpKind::Times => "*",
        OpKind::Divide => "/",
        OpKind::Equals => "=",
        OpKind::LessThan => "<",
        OpKind::GreaterThan => ">",
        OpKind::And => "AND",
        OpKind::Or => "OR",
        other => panic!("no shape for {other:?}"),
    }
}

fn tree_shape(node: &Node) -> Shape {
    match node {
        Node::Literal(Literal::Integer(n)) => Shape::Number(n.to_string()),
        Node::Identifier(ident) => Shape::Column(ident.names.join(".")),
        Node::Call(call) if call.kind() == OpKind::Not => Shape::Not(Box::new(tree_shape(&call.operands[0]))),
        Node::Call(call) => join(
            binary_symbol(call.kind()),
            tree_shape(&call.operands[0]),
            tree_shape(&call.operands[1]),
        ),
        other => panic!("unexpected node {other:?}"),
    }
}

fn parsed_shape(expr: &Expr) -> Shape {
    match expr {
        Expr::Nested(inner) => parsed_shape(inner),
        Expr::Value(Value::Number(n, _)) => Shape::Number(n.to_string()),
        Expr::Identifier(ident) => Shape::Column(ident.value.clone()),
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            expr,
        } => Shape::Not(Box::new(parsed_shape(expr))),
        Expr::BinaryOp { left, op, right } => {
            let symbol = match op {
                BinaryOperator::Plus => "+",
                BinaryOperator::Minus => "-",
                BinaryOperator::Multiply => "*",
                BinaryOperator::Divide => "/",
                BinaryOperator::Eq => "=",
                BinaryOperator::Lt => "<",
                BinaryOperator::Gt => ">",
                BinaryOperator::And => "AND",
                BinaryOperator::Or => "OR",
                other => panic!("unexpected operator {other:?}"),
            };
            join(symbol, parsed_shape(left), parsed_shape(right))
        }
        other => panic!("unexpected expression {other:?}"),
    }
}

fn try_parse_expr(sql: &str) -> Result<Expr, ParserError> {
    Parser::new(&GenericDialect {})
        .try_with_sql(sql)
        .and_then(|mut parser| parser.parse_expr())
}

fn parse_expr(sql: &str) -> Expr {
    try_parse_expr(sql).unwrap_or_else(|e| panic!("failed to parse {sql}: {e}"))
}

/// Byte offsets of each matching `(` `)` pair.
fn paren_pairs(sql: &str) -> Vec<(usize, usize)> {
    let mut open = Vec::new();
    let mut pairs = Vec::new();
    for (i, c) in sql.char_indices() {
        match c {
            '(' => open.push(i),
            ')' => {
                if let Some(start) = open.pop() {
                    pairs.push((start, i));
                }
            }
            _ => {}
        }
    }
    pairs
}

fn without_pair(sql: &str, (open, close): (usize, usize)) -> String {
    sql.char_indices()
        .filter(|(i, _)| *i != open && *i != close)
        .map(|(_, c)| c)
        .collect()
}

fn balanced(sql: &str) -> bool {
    let mut depth = 0i64;
    for c in sql.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            _ => {}
        }
        if depth < 0 {
            return false;
        }
    }
    depth == 0
}

fn ansi() -> DialectProfile {
    DialectProfile::new(Dialect::Ansi, None).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn rendering_is_deterministic(tree in predicate()) {
        let profile = ansi();
        let first = unparse(&profile, &tree).unwrap();
        let second = unparse(&profile, &tree).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn parentheses_are_balanced_everywhere(tree in predicate()) {
        for dialect in Dialect::ALL {
            let profile = DialectProfile::new(*dialect, None).unwrap();
            let sql = unparse(&profile, &tree).unwrap();
            prop_assert!(balanced(&sql), "{}: {}", dialect, sql);
        }
    }

    #[test]
    fn arithmetic_reparses_to_same_tree(tree in arithmetic()) {
        let sql = unparse(&ansi(), &tree).unwrap();
        prop_assert_eq!(parsed_shape(&parse_expr(&sql)), tree_shape(&tree), "{}", sql);
    }

    #[test]
    fn predicates_reparse_to_same_tree(tree in predicate()) {
        let sql = unparse(&ansi(), &tree).unwrap();
        prop_assert_eq!(parsed_shape(&parse_expr(&sql)), tree_shape(&tree), "{}", sql);
    }

    #[test]
    fn parentheses_are_minimal(tree in predicate()) {
        let sql = unparse(&ansi(), &tree).unwrap();
        let expected = tree_shape(&tree);
        for pair in paren_pairs(&sql) {
            let stripped = without_pair(&sql, pair);
            if let Ok(expr) = try_parse_expr(&stripped) {
                prop_assert_ne!(
                    parsed_shape(&expr),
                    tree_shape(&tree),
                    "parentheses at {} are redundant in {}",
                    pair.0,
                    sql
                );
            }
        }
        prop_assert_eq!(parsed_shape(&parse_expr(&sql)), expected);
    }

    #[test]
    fn string_literals_survive_quoting(s in any::<String>()) {
        for dialect in Dialect::ALL {
            let profile = DialectProfile::new(*dialect, None).unwrap();
            let sql = unparse(&profile, &lit_str(&s)).unwrap();
            prop_assert_eq!(profile.unquote_string(&sql), Some(s.clone()), "{}: {}", dialect, sql);
        }
    }
}
