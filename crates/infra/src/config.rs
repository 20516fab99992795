//! Configuration loading and representation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use packforge_observability::LogFormat;

use crate::store::{JsonFileStore, StoreError};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "PACKFORGE_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Service configuration, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// When set, routes are served under `/<version>/inventory`.
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Durable inventory record.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_name() -> String {
    "packforge".to_string()
}

fn default_port() -> u16 {
    44440
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("storage.json")
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: None,
            port: default_port(),
            storage_path: default_storage_path(),
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Read config from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        JsonFileStore::<Self>::new(path.as_ref()).load()
    }

    /// Config file path: `$PACKFORGE_CONFIG`, or `config.json` in the working directory.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Route prefix derived from `version`: `""` or `"/<version>"`.
    pub fn route_prefix(&self) -> String {
        match self.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => format!("/{}", v.trim_matches('/')),
            _ => String::new(),
        }
    }
}
