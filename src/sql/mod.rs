//! SQL generation module.
//!
//! This module provides a type-safe SQL builder that generates multi-dialect SQL.
//! It includes:
//!
//! - [`query`] - SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect};
pub use expr::{
    col, func, lit_bool, lit_float, lit_int, lit_null, lit_str, never, star, table_col,
    table_star, BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{Join, LimitOffset, OrderByExpr, Query, SortDir, TableRef};
pub use token::{Token, TokenStream};
