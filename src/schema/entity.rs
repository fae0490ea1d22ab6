//! Per-entity table mapping.

use std::collections::HashMap;

use super::catalog::{CatalogError, CatalogResult};

/// Name of the identifier field every entity carries.
pub const ID_FIELD: &str = "id";

/// How a field is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// Plain value column.
    Primitive,
    /// Column holding the primary key of another entity.
    ForeignKey { target: String },
}

/// Maps one filter field to its storage column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub field: String,
    pub column: String,
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    pub fn primitive(field: &str, column: &str) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            kind: ColumnKind::Primitive,
        }
    }

    pub fn foreign_key(field: &str, column: &str, target: &str) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            kind: ColumnKind::ForeignKey {
                target: target.into(),
            },
        }
    }

    /// The referenced entity, if this is a foreign key.
    pub fn target(&self) -> Option<&str> {
        match &self.kind {
            ColumnKind::ForeignKey { target } => Some(target),
            ColumnKind::Primitive => None,
        }
    }
}

/// Table mapping for one entity type.
///
/// Columns keep their registration order; lookups go through a field index
/// built as columns are added.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    name: String,
    table: String,
    schema: Option<String>,
    primary_key: String,
    columns: Vec<ColumnDescriptor>,
    index: HashMap<String, usize>,
}

impl EntityMetadata {
    /// New entity mapped to `table`, with an `id` field on column `id`.
    pub fn new(name: &str, table: &str) -> Self {
        let mut metadata = Self {
            name: name.into(),
            table: table.into(),
            schema: None,
            primary_key: ID_FIELD.into(),
            columns: Vec::new(),
            index: HashMap::new(),
        };
        metadata.push(ColumnDescriptor::primitive(ID_FIELD, ID_FIELD));
        metadata
    }

    /// Change the primary key column. The `id` field follows it.
    pub fn with_primary_key(mut self, column: &str) -> Self {
        self.primary_key = column.into();
        if let Some(&i) = self.index.get(ID_FIELD) {
            self.columns[i].column = column.into();
        }
        self
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a column. Field names must be unique within the entity.
    pub fn with_column(mut self, column: ColumnDescriptor) -> CatalogResult<Self> {
        self.add_column(column)?;
        Ok(self)
    }

    pub fn add_column(&mut self, column: ColumnDescriptor) -> CatalogResult<()> {
        if self.index.contains_key(&column.field) {
            return Err(CatalogError::DuplicateField {
                entity: self.name.clone(),
                field: column.field,
            });
        }
        self.push(column);
        Ok(())
    }

    fn push(&mut self, column: ColumnDescriptor) {
        self.index.insert(column.field.clone(), self.columns.len());
        self.columns.push(column);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Look up a field by its filter name.
    pub fn column(&self, field: &str) -> Option<&ColumnDescriptor> {
        self.index.get(field).map(|&i| &self.columns[i])
    }
}
