//! # relq
//!
//! Compiles declarative filters over a graph of related entities into
//! paginated, deterministically ordered SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │        FilterSpec (where / orderBy / limit / offset)     │
//! │        built in code or read from JSON                   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [query assembler]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Clause compiler (recursive, joins per foreign key)     │
//! │   + alias registry, operator translator, value codec     │
//! │   + schema catalog (entity → table, columns)             │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │     Query AST → TokenStream → SQL (dialect-specific)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod codec;
pub mod compile;
pub mod compiler;
pub mod config;
pub mod filter;
pub mod schema;
pub mod sql;
pub mod value;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::codec::{CodecError, CodecResult, DefaultCodec, ValueCodec};
    pub use crate::compile::{compile, compile_with_codec, CompileOptions, CompileOutput};
    pub use crate::compiler::{CompileError, CompileResult, QueryAssembler, DEFAULT_LIMIT};
    pub use crate::config::Settings;
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::filter::{Clause, Filter, FilterSpec, Operator, OrderClause, Ordering};
    pub use crate::query::{Query, SortDir};
    pub use crate::schema::{
        Catalog, CatalogBuilder, ColumnDescriptor, ColumnKind, EntityMetadata, SchemaCatalog,
    };
    pub use crate::value::{EntityRef, Value};
}

// Also export at crate root for convenience
pub use compile::{compile, CompileOptions, CompileOutput};
pub use compiler::{CompileError, CompileResult};
pub use dialect::Dialect;
pub use filter::FilterSpec;
pub use query::Query;
