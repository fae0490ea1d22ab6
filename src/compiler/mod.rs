//! Filter compilation.
//!
//! Compiling a [`FilterSpec`](crate::filter::FilterSpec) runs in three layers:
//!
//! - [`QueryAssembler`] opens the base table, then adds the tail ordering
//!   and pagination.
//! - [`ClauseCompiler`] walks the filter and ordering recursively, joining
//!   related tables under aliases from an [`AliasRegistry`].
//! - Leaf clauses resolve through [`resolve_foreign_key`],
//!   [`resolve_primitive`] and [`translate_operator`].
//!
//! Compilation is pure: no I/O, and all state lives in the call.

pub mod alias;
pub mod assembler;
pub mod clause;
pub mod error;
pub mod foreign_key;
pub mod operator;
pub mod primitive;

pub use alias::{abbreviate, AliasRegistry};
pub use assembler::{QueryAssembler, DEFAULT_LIMIT};
pub use clause::ClauseCompiler;
pub use error::{CompileError, CompileResult, FieldContext};
pub use foreign_key::{resolve_foreign_key, ForeignKeyResolution};
pub use operator::translate_operator;
pub use primitive::resolve_primitive;
