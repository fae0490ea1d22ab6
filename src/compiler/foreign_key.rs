//! Clause resolution for foreign-key columns.
//!
//! Identifiers, saved references and lists of them compare directly against
//! the key column. Only a nested filter needs the related table joined.

use super::error::{CompileResult, FieldContext};
use crate::codec::ValueCodec;
use crate::filter::{Clause, Filter, Operator};
use crate::sql::expr::{never, Expr, ExprExt};
use crate::value::Value;

/// What a foreign-key clause resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ForeignKeyResolution<'f> {
    /// No predicate (the clause was explicitly undefined).
    Nothing,
    /// A predicate on the key column; no join.
    Predicate(Expr),
    /// The related table must be joined and this filter applied to it.
    Join(&'f Filter),
}

pub fn resolve_foreign_key<'f>(
    ctx: FieldContext<'_>,
    column: Expr,
    clause: &'f Clause,
    codec: &dyn ValueCodec,
) -> CompileResult<ForeignKeyResolution<'f>> {
    use ForeignKeyResolution::*;

    let resolution = match clause {
        Clause::Nested(filter) => Join(filter),
        Clause::Absent => Nothing,
        Clause::Null => Predicate(column.is_null()),
        Clause::Value(value) | Clause::Id(value) => Predicate(match_key(column, value, codec)?),
        Clause::List(values) => Predicate(match_any_key(column, values, codec)?),
        Clause::Op(Operator::Eq | Operator::In, value) => {
            Predicate(match_key(column, value, codec)?)
        }
        Clause::Op(Operator::Ne, Value::Null) => Predicate(column.is_not_null()),
        Clause::Op(Operator::Ne, value) if is_identifier(value) => {
            Predicate(column.ne(Expr::from(codec.lower(value)?)))
        }
        Clause::Op(Operator::Ne, value) => {
            return Err(ctx.unsupported(format!(
                "'ne' on a foreign key needs an identifier, a saved reference or null, got {}",
                describe(value)
            )))
        }
        Clause::Op(op, _) => {
            return Err(ctx.unsupported(format!(
                "operator '{}' is not supported on a foreign key",
                op
            )))
        }
        Clause::Unrecognized(name) => {
            return Err(ctx.unsupported(format!("unrecognized operator '{}'", name)))
        }
    };
    Ok(resolution)
}

/// Equality against a single key, or membership if `value` is a list.
fn match_key(column: Expr, value: &Value, codec: &dyn ValueCodec) -> CompileResult<Expr> {
    match value {
        Value::Null => Ok(column.is_null()),
        Value::List(values) => match_any_key(column, values, codec),
        v if v.is_unsaved_ref() => Ok(never()),
        v => Ok(column.eq(Expr::from(codec.lower(v)?))),
    }
}

/// Membership over keys. Unsaved references can never match and are dropped.
fn match_any_key(column: Expr, values: &[Value], codec: &dyn ValueCodec) -> CompileResult<Expr> {
    let keys: Vec<Value> = values
        .iter()
        .filter(|v| !v.is_unsaved_ref())
        .cloned()
        .collect();

    if keys.is_empty() {
        return Ok(never());
    }

    let literals = codec.lower_all(&keys)?;
    Ok(column.in_list(literals.into_iter().map(Expr::from).collect()))
}

fn is_identifier(value: &Value) -> bool {
    match value {
        Value::Entity(r) => r.is_saved(),
        Value::List(_) | Value::Null => false,
        _ => true,
    }
}

fn describe(value: &Value) -> &'static str {
    if value.is_unsaved_ref() {
        "an unsaved reference"
    } else {
        value.type_name()
    }
}
