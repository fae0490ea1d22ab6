//! Top-level query assembly.

use tracing::debug;

use super::alias::AliasRegistry;
use super::clause::ClauseCompiler;
use super::error::{CompileError, CompileResult};
use crate::codec::{DefaultCodec, FiniteLiterals, ValueCodec};
use crate::filter::FilterSpec;
use crate::schema::SchemaCatalog;
use crate::sql::expr::{table_col, table_star};
use crate::sql::query::{OrderByExpr, Query, TableRef};

/// Row cap applied when a spec gives no limit.
pub const DEFAULT_LIMIT: u64 = 10_000;

/// Builds a complete, paginated query for one entity.
///
/// Every query selects the base table's columns, ends its ordering with the
/// base primary key ascending, and carries a limit.
pub struct QueryAssembler<'a> {
    catalog: &'a dyn SchemaCatalog,
    codec: &'a dyn ValueCodec,
    default_limit: u64,
}

impl<'a> QueryAssembler<'a> {
    pub fn new(catalog: &'a dyn SchemaCatalog) -> Self {
        Self {
            catalog,
            codec: &DefaultCodec,
            default_limit: DEFAULT_LIMIT,
        }
    }

    pub fn with_codec(mut self, codec: &'a dyn ValueCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_default_limit(mut self, limit: u64) -> Self {
        self.default_limit = limit;
        self
    }

    pub fn assemble(&self, entity: &str, spec: &FilterSpec) -> CompileResult<Query> {
        let limit = row_count("limit", spec.limit.unwrap_or(self.default_limit))?;
        let offset = spec
            .offset
            .map(|n| row_count("offset", n))
            .transpose()?
            .filter(|&n| n > 0);

        let metadata = self
            .catalog
            .metadata_for(entity)
            .ok_or_else(|| CompileError::UnknownEntity(entity.into()))?;

        let mut aliases = AliasRegistry::new();
        let alias = aliases.allocate(metadata.table());

        let mut from = TableRef::new(metadata.table()).with_alias(&alias);
        if let Some(schema) = metadata.schema() {
            from = from.with_schema(schema);
        }
        let mut query = Query::new().select(vec![table_star(&alias)]).from(from);

        debug!(entity, alias = %alias, "compiling filter");

        let codec = FiniteLiterals(self.codec);
        ClauseCompiler::new(self.catalog, &codec, &mut aliases, &mut query).compile(
            metadata,
            &alias,
            Some(&spec.conditions),
            Some(&spec.order_by),
        )?;

        query.add_order(OrderByExpr::asc(table_col(&alias, metadata.primary_key())));

        query = query.limit(limit);
        if let Some(offset) = offset {
            query = query.offset(offset);
        }

        debug!(
            entity,
            joins = query.joins.len(),
            predicates = query.predicates.len(),
            order_terms = query.order_by.len(),
            "compiled filter"
        );
        Ok(query)
    }
}

/// Databases bound LIMIT and OFFSET by a signed 64-bit integer.
fn row_count(key: &'static str, value: u64) -> CompileResult<u64> {
    if value > i64::MAX as u64 {
        return Err(CompileError::PaginationOutOfRange { key, value });
    }
    Ok(value)
}
