//! Query builder - construct query trees with a fluent API.
//!
//! A [`Query`] is either a SELECT block or a set operation over two queries.
//! Queries are plain data; [`crate::sql::unparse`] turns them into SQL for a
//! profile.

use serde::{Deserialize, Serialize};

use super::dialect::DialectProfile;
use super::node::{star, Call, Node, NodeExt, OrderItem};
use super::operator::OpKind;
use crate::error::UnparseError;

// =============================================================================
// Select Item (expression with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct SelectItem {
    pub expr: Node,
    #[serde(default)]
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Node) -> Self {
        Self { expr, alias: None }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<Node> for SelectItem {
    fn from(expr: Node) -> Self {
        SelectItem::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// What a FROM item reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSource {
    Table {
        #[serde(default)]
        schema: Option<String>,
        name: String,
    },
    Subquery(Box<Query>),
    /// Literal rows: `VALUES (1, 'a'), (2, 'b')`
    Values(Vec<Vec<Node>>),
}

/// A FROM item with optional alias and column aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub source: TableSource,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub column_aliases: Vec<String>,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self::from_source(TableSource::Table {
            schema: None,
            name: table.into(),
        })
    }

    pub fn subquery(query: Query) -> Self {
        Self::from_source(TableSource::Subquery(Box::new(query)))
    }

    pub fn values(rows: Vec<Vec<Node>>) -> Self {
        Self::from_source(TableSource::Values(rows))
    }

    fn from_source(source: TableSource) -> Self {
        Self {
            source,
            alias: None,
            column_aliases: vec![],
        }
    }

    /// Qualify a table name with a schema. No effect on subqueries and VALUES.
    pub fn with_schema(mut self, schema: &str) -> Self {
        if let TableSource::Table { schema: s, .. } = &mut self.source {
            *s = Some(schema.into());
        }
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_column_aliases(mut self, columns: Vec<&str>) -> Self {
        self.column_aliases = columns.into_iter().map(String::from).collect();
        self
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    #[serde(default)]
    pub on: Option<Node>,
}

// =============================================================================
// CTE (Common Table Expression)
// =============================================================================

/// A Common Table Expression (WITH clause).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until used"]
pub struct Cte {
    pub name: String,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    pub query: Box<Query>,
    /// Whether this is a recursive CTE.
    #[serde(default)]
    pub recursive: bool,
}

impl Cte {
    pub fn new(name: &str, query: Query) -> Self {
        Self {
            name: name.into(),
            columns: None,
            query: Box::new(query),
            recursive: false,
        }
    }

    /// Create a recursive CTE.
    pub fn recursive(name: &str, query: Query) -> Self {
        Self {
            recursive: true,
            ..Self::new(name, query)
        }
    }

    pub fn with_columns(mut self, columns: Vec<&str>) -> Self {
        self.columns = Some(columns.into_iter().map(String::from).collect());
        self
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A SELECT query, or a set operation when `set_op` is present.
///
/// For a set operation only `with`, `order_by`, `limit` and `offset` apply
/// on top of the combined result; the SELECT fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[must_use = "Query has no effect until unparsed"]
pub struct Query {
    pub with: Vec<Cte>,
    pub select: Vec<SelectItem>,
    pub distinct: bool,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Node>,
    pub group_by: Vec<Node>,
    pub having: Option<Node>,
    pub order_by: Vec<OrderItem>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// `UNION`/`INTERSECT`/`EXCEPT` call whose two operands are queries.
    pub set_op: Option<Box<Call>>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a CTE (WITH clause).
    pub fn with_cte(mut self, cte: Cte) -> Self {
        self.with.push(cte);
        self
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectItem>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// SELECT *
    pub fn select_star(mut self) -> Self {
        self.select = vec![SelectItem::new(star())];
        self
    }

    /// Add DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the FROM item.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a JOIN.
    pub fn join(mut self, join_type: JoinType, table: TableRef, on: Node) -> Self {
        self.joins.push(Join {
            join_type,
            table,
            on: Some(on),
        });
        self
    }

    /// Add an INNER JOIN.
    pub fn inner_join(self, table: TableRef, on: Node) -> Self {
        self.join(JoinType::Inner, table, on)
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: TableRef, on: Node) -> Self {
        self.join(JoinType::Left, table, on)
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(self, table: TableRef, on: Node) -> Self {
        self.join(JoinType::Right, table, on)
    }

    /// Add a FULL OUTER JOIN.
    pub fn full_join(self, table: TableRef, on: Node) -> Self {
        self.join(JoinType::Full, table, on)
    }

    /// Add a CROSS JOIN.
    pub fn cross_join(mut self, table: TableRef) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Cross,
            table,
            on: None,
        });
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Node) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Node>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the HAVING clause.
    pub fn having(mut self, condition: Node) -> Self {
        self.having = Some(condition);
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, items: Vec<OrderItem>) -> Self {
        self.order_by = items;
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set OFFSET.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    // =========================================================================
    // Set Operations
    // =========================================================================

    fn set_operation(kind: OpKind, left: Query, right: Query) -> Query {
        Query {
            set_op: Some(Box::new(Call::new(
                kind,
                vec![Node::Query(Box::new(left)), Node::Query(Box::new(right))],
            ))),
            ..Default::default()
        }
    }

    /// Combine with another query using UNION.
    pub fn union(self, other: Query) -> Query {
        Self::set_operation(OpKind::Union, self, other)
    }

    /// Combine with another query using UNION ALL.
    pub fn union_all(self, other: Query) -> Query {
        Self::set_operation(OpKind::UnionAll, self, other)
    }

    /// Combine with another query using INTERSECT.
    pub fn intersect(self, other: Query) -> Query {
        Self::set_operation(OpKind::Intersect, self, other)
    }

    /// Combine with another query using INTERSECT ALL.
    pub fn intersect_all(self, other: Query) -> Query {
        Self::set_operation(OpKind::IntersectAll, self, other)
    }

    /// Combine with another query using EXCEPT.
    pub fn except(self, other: Query) -> Query {
        Self::set_operation(OpKind::Except, self, other)
    }

    /// Combine with another query using EXCEPT ALL.
    pub fn except_all(self, other: Query) -> Query {
        Self::set_operation(OpKind::ExceptAll, self, other)
    }

    /// Whether this query is a set operation.
    pub fn is_set_operation(&self) -> bool {
        self.set_op.is_some()
    }

    /// Whether the query carries clauses that apply after its body
    /// (ORDER BY, LIMIT, OFFSET, WITH).
    pub fn has_trailing_clauses(&self) -> bool {
        !self.order_by.is_empty()
            || self.limit.is_some()
            || self.offset.is_some()
            || !self.with.is_empty()
    }

    /// Generate SQL for a profile.
    pub fn to_sql(&self, profile: &DialectProfile) -> Result<String, UnparseError> {
        super::unparse::unparse_query(profile, self)
    }
}
