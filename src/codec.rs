//! Lowering of domain values into SQL literals.
//!
//! The compiler never inspects how a value is stored; it hands every filter
//! operand to a [`ValueCodec`] and embeds whatever literal comes back.

use crate::sql::expr::Literal;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Cannot encode non-finite float {0}")]
    NonFinite(f64),

    #[error("Nested lists are not supported")]
    NestedList,

    #[error("Cannot encode unsaved {0} reference")]
    UnsavedReference(String),

    #[error("Cannot encode {found} as a scalar")]
    NotScalar { found: &'static str },

    #[error("{0}")]
    Custom(String),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Converts a domain value into its storage literal.
pub trait ValueCodec: Send + Sync {
    fn lower(&self, value: &Value) -> CodecResult<Literal>;

    /// Lower each element of a list.
    fn lower_all(&self, values: &[Value]) -> CodecResult<Vec<Literal>> {
        values
            .iter()
            .map(|v| match v {
                Value::List(_) => Err(CodecError::NestedList),
                other => self.lower(other),
            })
            .collect()
    }
}

impl<F> ValueCodec for F
where
    F: Fn(&Value) -> CodecResult<Literal> + Send + Sync,
{
    fn lower(&self, value: &Value) -> CodecResult<Literal> {
        self(value)
    }
}

/// Wraps a caller's codec so non-finite floats surface as [`CodecError`]
/// instead of reaching SQL rendering.
pub(crate) struct FiniteLiterals<'a>(pub &'a dyn ValueCodec);

impl ValueCodec for FiniteLiterals<'_> {
    fn lower(&self, value: &Value) -> CodecResult<Literal> {
        self.0.lower(value).and_then(finite)
    }

    fn lower_all(&self, values: &[Value]) -> CodecResult<Vec<Literal>> {
        self.0.lower_all(values)?.into_iter().map(finite).collect()
    }
}

fn finite(literal: Literal) -> CodecResult<Literal> {
    match literal {
        Literal::Float(x) if !x.is_finite() => Err(CodecError::NonFinite(x)),
        other => Ok(other),
    }
}

/// Maps scalars one to one; entity references lower to their identifier
/// as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodec;

impl ValueCodec for DefaultCodec {
    fn lower(&self, value: &Value) -> CodecResult<Literal> {
        match value {
            Value::Null => Ok(Literal::Null),
            Value::Bool(b) => Ok(Literal::Bool(*b)),
            Value::Int(n) => Ok(Literal::Int(*n)),
            Value::Float(x) if x.is_finite() => Ok(Literal::Float(*x)),
            Value::Float(x) => Err(CodecError::NonFinite(*x)),
            Value::String(s) => Ok(Literal::String(s.clone())),
            Value::Entity(r) => r
                .id
                .clone()
                .map(Literal::String)
                .ok_or_else(|| CodecError::UnsavedReference(r.entity.clone())),
            Value::List(_) => Err(CodecError::NotScalar { found: "list" }),
        }
    }
}
