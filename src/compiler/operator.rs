//! Operator translation for primitive columns.

use super::error::{CompileResult, FieldContext};
use crate::codec::ValueCodec;
use crate::filter::Operator;
use crate::sql::expr::{BinaryOperator, Expr, ExprExt};
use crate::value::Value;

/// Translate `column <op> value` into a predicate.
///
/// A null operand is only meaningful for `eq` (IS NULL) and `ne`
/// (IS NOT NULL). `in` always yields an IN list; a scalar operand becomes a
/// one-element list. Lists are rejected for every other operator.
pub fn translate_operator(
    ctx: FieldContext<'_>,
    column: Expr,
    op: Operator,
    value: &Value,
    codec: &dyn ValueCodec,
) -> CompileResult<Expr> {
    if value.is_null() {
        return match op {
            Operator::Eq => Ok(column.is_null()),
            Operator::Ne => Ok(column.is_not_null()),
            op => Err(ctx.unsupported(format!("operator '{}' cannot take null", op))),
        };
    }

    let Some(binary) = comparison(op) else {
        let values = match value {
            Value::List(items) => codec.lower_all(items)?,
            scalar => vec![codec.lower(scalar)?],
        };
        return Ok(column.in_list(values.into_iter().map(Expr::from).collect()));
    };

    if let Value::List(_) = value {
        return Err(ctx.unsupported(format!("operator '{}' cannot take a list", op)));
    }
    Ok(column.binary(binary, Expr::from(codec.lower(value)?)))
}

/// The binary operator for a scalar comparison. `None` for `in`, which
/// compiles to a membership list instead.
fn comparison(op: Operator) -> Option<BinaryOperator> {
    match op {
        Operator::Eq => Some(BinaryOperator::Eq),
        Operator::Ne => Some(BinaryOperator::Ne),
        Operator::Gt => Some(BinaryOperator::Gt),
        Operator::Gte => Some(BinaryOperator::Gte),
        Operator::Lt => Some(BinaryOperator::Lt),
        Operator::Lte => Some(BinaryOperator::Lte),
        Operator::Like => Some(BinaryOperator::Like),
        Operator::ILike => Some(BinaryOperator::ILike),
        Operator::In => None,
    }
}
