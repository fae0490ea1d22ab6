//! End-to-end compilation from a filter specification to SQL.
//!
//! ```text
//! FilterSpec → QueryAssembler → Query → SQL (dialect)
//! ```
//!
//! # Example
//!
//! ```
//! use relq::compile::{compile, CompileOptions};
//! use relq::filter::FilterSpec;
//! use relq::schema::{Catalog, ColumnDescriptor, EntityMetadata};
//! use relq::sql::Dialect;
//!
//! let author = EntityMetadata::new("Author", "author")
//!     .with_column(ColumnDescriptor::primitive("age", "age"))
//!     .unwrap();
//! let catalog = Catalog::builder().register(author).unwrap().build().unwrap();
//!
//! let spec = FilterSpec::from_json_str(r#"{"where": {"age": {"gt": 30}}}"#).unwrap();
//! let options = CompileOptions::default().with_dialect(Dialect::MySql);
//! let output = compile(&catalog, "Author", &spec, &options).unwrap();
//!
//! assert!(output.sql.contains("WHERE `a0`.`age` > 30"));
//! ```

use crate::codec::{DefaultCodec, ValueCodec};
use crate::compiler::{CompileResult, QueryAssembler, DEFAULT_LIMIT};
use crate::filter::FilterSpec;
use crate::schema::SchemaCatalog;
use crate::sql::query::Query;
use crate::sql::Dialect;

// ============================================================================
// Options
// ============================================================================

/// Options for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// SQL dialect to generate.
    pub dialect: Dialect,

    /// Row cap when a spec has no limit.
    pub default_limit: u64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl CompileOptions {
    /// Set the SQL dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// Result of compiling a filter to SQL.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// The generated SQL string.
    pub sql: String,

    /// The SQL query AST (for further manipulation if needed).
    pub query: Query,

    /// The dialect used for generation.
    pub dialect: Dialect,
}

// ============================================================================
// Compilation Functions
// ============================================================================

/// Compile a filter over `entity` to SQL using the default value codec.
pub fn compile(
    catalog: &dyn SchemaCatalog,
    entity: &str,
    spec: &FilterSpec,
    options: &CompileOptions,
) -> CompileResult<CompileOutput> {
    compile_with_codec(catalog, &DefaultCodec, entity, spec, options)
}

/// Compile a filter over `entity` to SQL, lowering values through `codec`.
pub fn compile_with_codec(
    catalog: &dyn SchemaCatalog,
    codec: &dyn ValueCodec,
    entity: &str,
    spec: &FilterSpec,
    options: &CompileOptions,
) -> CompileResult<CompileOutput> {
    let query = QueryAssembler::new(catalog)
        .with_codec(codec)
        .with_default_limit(options.default_limit)
        .assemble(entity, spec)?;

    Ok(CompileOutput {
        sql: query.to_sql(options.dialect),
        query,
        dialect: options.dialect,
    })
}
