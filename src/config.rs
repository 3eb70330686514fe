//! Designer configuration, loaded from a TOML file.
//!
//! ```toml
//! [store]
//! backend = "http"
//! base_url = "https://api.example.com/api"
//! collection = "invoice-templates"
//! token = "..."
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! ```
//!
//! A missing file is not an error: every section falls back to its default.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::persistence::http::{DEFAULT_COLLECTION, DEFAULT_TIMEOUT};
use crate::persistence::{
    FileTemplateStore, HttpTemplateStore, MemoryTemplateStore, TemplateStore,
};

/// Directory name used under the OS config and data directories.
pub const APP_DIR: &str = "invoice-designer";
const CONFIG_FILE: &str = "config.toml";

/// Default config file location: `<config dir>/invoice-designer/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Default data directory: `<local data dir>/invoice-designer`.
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_default().join(APP_DIR)
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DesignerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

/// `[store]`: which backend holds the templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    Http {
        base_url: String,
        #[serde(default = "default_collection")]
        collection: String,
        #[serde(default)]
        token: Option<String>,
        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
    File {
        /// Defaults to `<data dir>/templates`.
        #[serde(default)]
        directory: Option<PathBuf>,
    },
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::File { directory: None }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset. Defaults to `info`.
    #[serde(default)]
    pub level: Option<String>,
    /// Directory for the log file. Defaults to the data dir.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(default_data_dir)
    }
}

impl DesignerConfig {
    /// Load from `path`, or from [`default_config_path`] when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(AppError::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )))
            }
        };
        Self::from_toml(&content)
            .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self, AppError> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("invalid config: {e}")))
    }

    /// Build the configured template store.
    pub fn build_store(&self) -> Result<Arc<dyn TemplateStore>, AppError> {
        Ok(match &self.store {
            StoreConfig::Http {
                base_url,
                collection,
                token,
                timeout_secs,
            } => Arc::new(HttpTemplateStore::new(
                base_url,
                collection,
                token.clone(),
                Duration::from_secs(*timeout_secs),
            )?),
            StoreConfig::File { directory } => Arc::new(FileTemplateStore::new(
                directory
                    .clone()
                    .unwrap_or_else(|| default_data_dir().join("templates")),
            )),
            StoreConfig::Memory => Arc::new(MemoryTemplateStore::new()),
        })
    }
}
