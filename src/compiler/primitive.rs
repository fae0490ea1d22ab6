//! Clause resolution for primitive columns.

use super::error::{CompileResult, FieldContext};
use super::operator::translate_operator;
use crate::codec::ValueCodec;
use crate::filter::Clause;
use crate::sql::expr::{never, Expr, ExprExt};

/// Resolve a clause on a plain value column.
///
/// Returns `None` for an explicitly undefined clause: the field is left
/// unconstrained rather than rejected.
pub fn resolve_primitive(
    ctx: FieldContext<'_>,
    column: Expr,
    clause: &Clause,
    codec: &dyn ValueCodec,
) -> CompileResult<Option<Expr>> {
    let predicate = match &*clause.normalized() {
        Clause::Absent => return Ok(None),
        Clause::Null => column.is_null(),
        Clause::List(values) => {
            if values.is_empty() {
                never()
            } else {
                let literals = codec.lower_all(values)?;
                column.in_list(literals.into_iter().map(Expr::from).collect())
            }
        }
        Clause::Value(value) => column.eq(Expr::from(codec.lower(value)?)),
        Clause::Op(op, value) => translate_operator(ctx, column, *op, value, codec)?,
        Clause::Id(_) => return Err(ctx.unsupported("the 'id' form only applies to foreign keys")),
        Clause::Nested(_) => {
            return Err(ctx.unsupported("nested filters only apply to foreign keys"))
        }
        Clause::Unrecognized(name) => {
            return Err(ctx.unsupported(format!("unrecognized operator '{}'", name)))
        }
    };
    Ok(Some(predicate))
}
