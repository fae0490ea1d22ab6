//! Configuration module for relq.
//!
//! Handles query defaults and entity catalog settings.

mod settings;

pub use settings::{ColumnSettings, EntitySettings, QuerySettings, Settings, SettingsError};
