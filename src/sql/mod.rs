//! SQL rendering.
//!
//! - [`node`] - call tree: identifiers, literals, operator calls
//! - [`operator`] - operator kinds, syntax classes and binding powers
//! - [`literal`] - literal values and their exact text forms
//! - [`query`] - SELECT queries and set operations
//! - [`dialect`] - product profiles
//! - [`emulation`] - per-product rewrites of calls a product lacks
//! - [`token`] - token types serialized per profile
//! - [`frame`] - scope-tracking output writer
//! - [`unparse`] - the tree walker

pub mod dialect;
pub mod emulation;
pub mod frame;
pub mod literal;
pub mod node;
pub mod operator;
pub mod query;
pub mod token;
pub mod unparse;

#[cfg(test)]
pub mod test_utils;

pub use dialect::{Dialect, DialectProfile, Feature, SqlDialect, Version};
pub use literal::{Decimal, IntervalLiteral, IntervalQualifier, Literal, TimeUnit, TrimFlag};
pub use node::{
    Call, DataTypeSpec, Identifier, Node, NodeExt, NullsOrder, OrderItem, Quantifier, SortDir,
    TypeName, WindowExt, WindowFrame, WindowFrameBound, WindowFrameKind, WindowSpec,
};
pub use operator::{OpKind, Operator, Syntax};
pub use query::{Cte, Join, JoinType, Query, SelectItem, TableRef, TableSource};
pub use token::{Token, TokenStream};
pub use unparse::{unparse, unparse_query, Unparser};
