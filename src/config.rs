//! Configuration management for the schema explorer
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-explorer.toml)
//! - Environment variables (EXPLORER__*)
//!
//! ## Example config file (schema-explorer.toml):
//! ```toml
//! [data]
//! schema_path = "data/bdchm.processed.json"
//! variables_path = "data/variable-specs-S1.tsv"
//!
//! [graph]
//! slot_query_mode = "via_shared_slot"
//! include_inherited = true
//!
//! [model]
//! extra_primitives = ["jsonpointer"]
//!
//! [logging]
//! filter = "schema_explorer=debug"
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Main configuration for the explorer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Input files
    #[serde(default)]
    pub data: DataConfig,

    /// Relationship graph settings
    #[serde(default)]
    pub graph: GraphConfig,

    /// Model construction settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the schema export and variable specs live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Processed schema JSON (classes, slots, enums, types, variables)
    #[serde(default = "default_schema_path")]
    pub schema_path: PathBuf,

    /// Optional variable spec sheet (TSV)
    #[serde(default)]
    pub variables_path: Option<PathBuf>,
}

/// How slot edges are stored and walked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotQueryMode {
    /// class -> range edges
    #[default]
    Direct,
    /// class -> shared slot -> range
    ViaSharedSlot,
}

/// Relationship graph configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    #[serde(default)]
    pub slot_query_mode: SlotQueryMode,

    /// Emit slot edges for inherited slots too (tagged with their ancestor)
    #[serde(default = "default_true")]
    pub include_inherited: bool,
}

/// Model construction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Names treated as primitive ranges in addition to the built-in set
    #[serde(default)]
    pub extra_primitives: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriber env filter directive, used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_schema_path() -> PathBuf {
    PathBuf::from("data/bdchm.processed.json")
}

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            schema_path: default_schema_path(),
            variables_path: None,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            slot_query_mode: SlotQueryMode::Direct,
            include_inherited: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-explorer.toml",
            ".schema-explorer.toml",
            "config/schema-explorer.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("org", "linkml", "schema-explorer") {
            let xdg_config = config_dir.config_dir().join("schema-explorer.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // EXPLORER__GRAPH__SLOT_QUERY_MODE=via_shared_slot
        builder = builder.add_source(
            Environment::with_prefix("EXPLORER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the schema path against the current directory
    pub fn schema_path(&self) -> PathBuf {
        resolve(&self.data.schema_path)
    }

    /// Resolve the variable spec path against the current directory
    pub fn variables_path(&self) -> Option<PathBuf> {
        self.data.variables_path.as_deref().map(resolve)
    }
}

fn resolve(path: &std::path::Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    }
}
