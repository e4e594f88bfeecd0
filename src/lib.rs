//! # sqlshift
//!
//! Renders a dialect-neutral SQL call tree as SQL text for one database
//! product and version.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            Call tree (Node / Query, serde)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [emulation::resolve]
//! ┌─────────────────────────────────────────────────────────┐
//! │   RenderPlan: Native | Rewrite(tree) | DirectEmit(fn)    │
//! │   chosen from the DialectProfile (product + version)     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [unparse::Unparser]
//! ┌─────────────────────────────────────────────────────────┐
//! │       SqlWriter frames: minimal parentheses, layout      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//!                     SQL string
//! ```
//!
//! ## Example
//!
//! ```
//! use sqlshift::prelude::*;
//!
//! let profile = DialectProfile::for_name("mssql", None).unwrap();
//! let query = Query::new()
//!     .select(vec![col("id")])
//!     .from(TableRef::new("users").with_schema("dbo"))
//!     .limit(10);
//! assert_eq!(
//!     query.to_sql(&profile).unwrap(),
//!     "SELECT TOP (10) [id]\nFROM [dbo].[users]"
//! );
//! ```

pub mod config;
pub mod error;
pub mod sql;

pub use sql::dialect;
pub use sql::node;
pub use sql::query;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::error::{ConfigError, ErrorCategory, UnparseError};
    pub use crate::sql::dialect::{Dialect, DialectProfile, Feature, Version};
    pub use crate::sql::literal::{IntervalQualifier, TimeUnit, TrimFlag};
    pub use crate::sql::node::{
        // Constructors
        avg,
        case_when,
        cast,
        col,
        count,
        count_distinct,
        count_star,
        func,
        interval,
        lit_bool,
        lit_date,
        lit_decimal,
        lit_double,
        lit_int,
        lit_null,
        lit_str,
        lit_timestamp,
        max,
        min,
        star,
        sum,
        table_col,
        // Types
        DataTypeSpec,
        Node,
        NodeExt,
        OrderItem,
        TypeName,
        WindowExt,
        WindowFrame,
    };
    pub use crate::sql::query::{Cte, JoinType, Query, SelectItem, TableRef};
    pub use crate::sql::unparse::{unparse, unparse_query};
}

pub use error::{ConfigError, ErrorCategory, UnparseError};
pub use sql::dialect::{Dialect, DialectProfile};
pub use sql::node::Node;
pub use sql::query::Query;
pub use sql::unparse::{unparse, unparse_query};
