//! Entity-to-table mapping.
//!
//! Each entity type maps to one table and an ordered list of column
//! descriptors. The compiler only reads through [`SchemaCatalog`]; [`Catalog`]
//! is the in-memory implementation built by hand or from `relq.toml`.

pub mod catalog;
pub mod entity;

pub use catalog::{Catalog, CatalogBuilder, CatalogError, CatalogResult, SchemaCatalog};
pub use entity::{ColumnDescriptor, ColumnKind, EntityMetadata, ID_FIELD};
