//! TOML-based configuration for relq.
//!
//! Supports a config file (relq.toml) describing query defaults and the
//! entity catalog.
//!
//! Example configuration:
//! ```toml
//! [query]
//! dialect = "postgres"
//! default_limit = 10000
//!
//! [entities.Publisher]
//! table = "publisher"
//! columns = [{ field = "name" }]
//!
//! [entities.Author]
//! table = "author"
//! schema = "library"
//! primary_key = "author_id"
//! columns = [
//!   { field = "age" },
//!   { field = "publisherFk", column = "publisher_fk", references = "Publisher" },
//! ]
//! ```
//!
//! Every entity gets an implicit `id` field on its primary key column.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::compile::CompileOptions;
use crate::compiler::DEFAULT_LIMIT;
use crate::schema::{Catalog, CatalogError, ColumnDescriptor, EntityMetadata};
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid entity catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Query compilation defaults.
    pub query: QuerySettings,

    /// Entity mappings, keyed by entity name.
    pub entities: HashMap<String, EntitySettings>,
}

/// Query compilation defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuerySettings {
    /// SQL dialect: postgres, duckdb, mysql, tsql.
    pub dialect: Dialect,

    /// Row cap when a filter has no limit.
    pub default_limit: u64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Table mapping for one entity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EntitySettings {
    pub table: String,

    #[serde(default)]
    pub schema: Option<String>,

    /// Primary key column (default `id`).
    #[serde(default)]
    pub primary_key: Option<String>,

    #[serde(default)]
    pub columns: Vec<ColumnSettings>,
}

/// One mapped field.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColumnSettings {
    pub field: String,

    /// Storage column; defaults to the field name.
    #[serde(default)]
    pub column: Option<String>,

    /// Target entity if this column is a foreign key.
    #[serde(default)]
    pub references: Option<String>,
}

impl ColumnSettings {
    fn descriptor(&self) -> ColumnDescriptor {
        let column = self.column.as_deref().unwrap_or(&self.field);
        match &self.references {
            Some(target) => ColumnDescriptor::foreign_key(&self.field, column, target),
            None => ColumnDescriptor::primitive(&self.field, column),
        }
    }
}

impl EntitySettings {
    fn metadata(&self, name: &str) -> Result<EntityMetadata, SettingsError> {
        let mut metadata = EntityMetadata::new(name, &self.table);
        if let Some(pk) = &self.primary_key {
            metadata = metadata.with_primary_key(pk);
        }
        if let Some(schema) = &self.schema {
            metadata = metadata.with_schema(schema);
        }
        for column in &self.columns {
            metadata.add_column(column.descriptor())?;
        }
        Ok(metadata)
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), entities = settings.entities.len(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `RELQ_CONFIG`
    /// 2. `./relq.toml`
    /// 3. `~/.config/relq/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("RELQ_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("relq.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("relq").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.query.default_limit == 0 {
            return Err(SettingsError::InvalidConfig(
                "query.default_limit must be greater than zero".into(),
            ));
        }
        for (name, entity) in &self.entities {
            if entity.table.trim().is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "entity '{}' has an empty table name",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Build the entity catalog described by `[entities]`.
    pub fn catalog(&self) -> Result<Catalog, SettingsError> {
        let mut builder = Catalog::builder();
        for (name, entity) in &self.entities {
            builder = builder.register(entity.metadata(name)?)?;
        }
        Ok(builder.build()?)
    }

    /// Compilation options from `[query]`.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::default()
            .with_dialect(self.query.dialect)
            .with_default_limit(self.query.default_limit)
    }
}
