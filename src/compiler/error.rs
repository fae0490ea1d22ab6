//! Compilation errors.

use crate::codec::CodecError;

pub type CompileResult<T> = Result<T, CompileError>;

/// Any of these aborts compilation; no partial query is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Unknown field '{field}' on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unsupported filter on {entity}.{field}: {reason}")]
    Unsupported {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Pagination {key} {value} exceeds the largest row count ({max})", max = i64::MAX)]
    PaginationOutOfRange { key: &'static str, value: u64 },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// The entity and field a clause is being compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldContext<'a> {
    pub entity: &'a str,
    pub field: &'a str,
}

impl<'a> FieldContext<'a> {
    pub fn new(entity: &'a str, field: &'a str) -> Self {
        Self { entity, field }
    }

    pub fn unsupported(&self, reason: impl Into<String>) -> CompileError {
        CompileError::Unsupported {
            entity: self.entity.into(),
            field: self.field.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_field(&self) -> CompileError {
        CompileError::UnknownField {
            entity: self.entity.into(),
            field: self.field.into(),
        }
    }
}
