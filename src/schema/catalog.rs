//! Entity catalog: the lookup the compiler resolves entities through.

use std::collections::HashMap;

use super::entity::EntityMetadata;

/// Errors raised while registering entities.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Duplicate field '{field}' on entity '{entity}'")]
    DuplicateField { entity: String, field: String },

    #[error("Field '{field}' on entity '{entity}' references unknown entity '{target}'")]
    UnknownTarget {
        entity: String,
        field: String,
        target: String,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Source of entity metadata.
///
/// Implementations must be shareable so independent compilations can run
/// against one catalog.
pub trait SchemaCatalog: Send + Sync {
    fn metadata_for(&self, entity: &str) -> Option<&EntityMetadata>;
}

/// In-memory catalog, immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: HashMap<String, EntityMetadata>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl SchemaCatalog for Catalog {
    fn metadata_for(&self, entity: &str) -> Option<&EntityMetadata> {
        self.entities.get(entity)
    }
}

/// Collects entities, then checks every foreign key resolves.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entities: HashMap<String, EntityMetadata>,
}

impl CatalogBuilder {
    pub fn register(mut self, metadata: EntityMetadata) -> CatalogResult<Self> {
        if self.entities.contains_key(metadata.name()) {
            return Err(CatalogError::DuplicateEntity(metadata.name().into()));
        }
        self.entities.insert(metadata.name().into(), metadata);
        Ok(self)
    }

    pub fn build(self) -> CatalogResult<Catalog> {
        for metadata in self.entities.values() {
            for column in metadata.columns() {
                if let Some(target) = column.target() {
                    if !self.entities.contains_key(target) {
                        return Err(CatalogError::UnknownTarget {
                            entity: metadata.name().into(),
                            field: column.field.clone(),
                            target: target.into(),
                        });
                    }
                }
            }
        }

        tracing::debug!(entities = self.entities.len(), "catalog built");
        Ok(Catalog {
            entities: self.entities,
        })
    }
}
