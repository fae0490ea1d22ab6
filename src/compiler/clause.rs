//! Recursive compilation of where and order-by specifications.

use tracing::trace;

use super::alias::AliasRegistry;
use super::error::{CompileError, CompileResult, FieldContext};
use super::foreign_key::{resolve_foreign_key, ForeignKeyResolution};
use super::primitive::resolve_primitive;
use crate::codec::ValueCodec;
use crate::filter::{Filter, OrderClause, Ordering};
use crate::schema::{ColumnKind, EntityMetadata, SchemaCatalog};
use crate::sql::expr::{table_col, ExprExt};
use crate::sql::query::{Join, OrderByExpr, Query, TableRef};

/// Walks one entity's filter and ordering, adding joins, predicates and
/// order terms to the query.
pub struct ClauseCompiler<'a> {
    catalog: &'a dyn SchemaCatalog,
    codec: &'a dyn ValueCodec,
    aliases: &'a mut AliasRegistry,
    query: &'a mut Query,
}

impl<'a> ClauseCompiler<'a> {
    pub fn new(
        catalog: &'a dyn SchemaCatalog,
        codec: &'a dyn ValueCodec,
        aliases: &'a mut AliasRegistry,
        query: &'a mut Query,
    ) -> Self {
        Self {
            catalog,
            codec,
            aliases,
            query,
        }
    }

    /// Compile `conditions` and `order` for the entity bound to `alias`.
    ///
    /// Order-by fields are visited first, in caller order, so order terms
    /// keep their priority across nested entities. Remaining where fields
    /// follow in caller order.
    pub fn compile(
        &mut self,
        metadata: &EntityMetadata,
        alias: &str,
        conditions: Option<&Filter>,
        order: Option<&Ordering>,
    ) -> CompileResult<()> {
        for field in visit_order(conditions, order) {
            let ctx = FieldContext::new(metadata.name(), field);
            let descriptor = metadata.column(field).ok_or_else(|| ctx.unknown_field())?;
            let column = table_col(alias, &descriptor.column);
            let clause = conditions.and_then(|c| c.get(field));
            let order_clause = order.and_then(|o| o.get(field));

            match &descriptor.kind {
                ColumnKind::Primitive => {
                    if let Some(clause) = clause {
                        if let Some(predicate) = resolve_primitive(ctx, column.clone(), clause, self.codec)? {
                            self.query.add_predicate(predicate);
                        }
                    }
                    match order_clause {
                        Some(OrderClause::Dir(dir)) => {
                            self.query.add_order(OrderByExpr::new(column, *dir));
                        }
                        Some(OrderClause::Nested(_)) => {
                            return Err(ctx.unsupported("nested ordering only applies to foreign keys"));
                        }
                        None => {}
                    }
                }

                ColumnKind::ForeignKey { target } => {
                    let mut nested_where = None;
                    if let Some(clause) = clause {
                        match resolve_foreign_key(ctx, column.clone(), clause, self.codec)? {
                            ForeignKeyResolution::Nothing => {}
                            ForeignKeyResolution::Predicate(predicate) => {
                                self.query.add_predicate(predicate);
                            }
                            ForeignKeyResolution::Join(filter) => nested_where = Some(filter),
                        }
                    }

                    let nested_order = match order_clause {
                        Some(OrderClause::Dir(dir)) => {
                            self.query.add_order(OrderByExpr::new(column.clone(), *dir));
                            None
                        }
                        Some(OrderClause::Nested(ordering)) => Some(ordering),
                        None => None,
                    };

                    if nested_where.is_some() || nested_order.is_some() {
                        let catalog = self.catalog;
                        let related = catalog
                            .metadata_for(target)
                            .ok_or_else(|| CompileError::UnknownEntity(target.clone()))?;
                        let related_alias = self.aliases.allocate(related.table());

                        let mut table = TableRef::new(related.table()).with_alias(&related_alias);
                        if let Some(schema) = related.schema() {
                            table = table.with_schema(schema);
                        }
                        let on = column.eq(table_col(&related_alias, related.primary_key()));
                        self.query.add_join(Join::inner(table, on));
                        trace!(
                            entity = metadata.name(),
                            field,
                            target = related.name(),
                            alias = %related_alias,
                            "joined related entity"
                        );

                        self.compile(related, &related_alias, nested_where, nested_order)?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Order-by fields first, then where fields not already visited.
fn visit_order<'s>(conditions: Option<&'s Filter>, order: Option<&'s Ordering>) -> Vec<&'s str> {
    let mut fields: Vec<&str> = order.map(|o| o.fields().collect()).unwrap_or_default();
    if let Some(conditions) = conditions {
        for field in conditions.fields() {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    fields
}
