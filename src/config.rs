//! Configuration management for Lexin Fetcher
//!
//! This module provides TOML configuration with multi-location discovery and
//! zero-config defaults. File values are converted into the runtime
//! configuration types of the client and the download manager; command-line
//! flags are applied on top by the CLI.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{ClientConfig, ManagerConfig};
use crate::constants::{self, files, http, lexin, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client settings
    pub client: ClientConfigToml,
    /// Download session settings
    pub download: DownloadConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfigToml {
    /// TCP keep-alive timeout in seconds (None = disabled)
    pub tcp_keepalive_secs: Option<u64>,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout in seconds (None = no timeout)
    pub pool_idle_timeout_secs: Option<u64>,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
    /// Overall request timeout in seconds (None = unlimited)
    pub request_timeout_secs: Option<u64>,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            tcp_keepalive_secs: Some(30),
            tcp_nodelay: true,
            pool_idle_timeout_secs: Some(http::POOL_IDLE_TIMEOUT.as_secs()),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            request_timeout_secs: None,
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

/// TOML-friendly download configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfigToml {
    /// Root catalog URL
    pub base_url: String,
    /// Directory receiving one subdirectory per collection
    pub output_dir: PathBuf,
    /// Collections downloaded at the same time
    pub concurrency: usize,
}

impl Default for DownloadConfigToml {
    fn default() -> Self {
        Self {
            base_url: lexin::BASE_URL.to_string(),
            output_dir: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
            concurrency: workers::DEFAULT_CONCURRENCY,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when no verbosity flag is given
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> (ClientConfig, ManagerConfig) {
        (
            self.client.to_runtime_config(),
            self.download.to_runtime_config(),
        )
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the standard locations are
    /// searched and defaults are used if none of them holds a file.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path });
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default configuration file
    ///
    /// Writes to `path`, or to the user configuration directory when no path
    /// is given. An existing file is only replaced when `force` is set.
    /// Returns the path written, or `None` if a file was already present.
    pub async fn init(path: Option<PathBuf>, force: bool) -> ConfigResult<Option<PathBuf>> {
        let config_path = match path {
            Some(path) => path,
            None => Self::default_config_path()?,
        };

        if config_path.exists() && !force {
            debug!("Config file already exists: {}", config_path.display());
            return Ok(None);
        }

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|source| ConfigError::Io {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        info!("Wrote default configuration to {}", config_path.display());
        Ok(Some(config_path))
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Find configuration file in standard locations
    pub fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![
            // Project-local config
            PathBuf::from(".").join(constants::config::LOCAL_FILE_NAME),
            PathBuf::from(".").join(constants::config::FILE_NAME),
        ];
        // User config
        if let Ok(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Some(path);
            }
        }

        None
    }

    /// Get the default config file path for the current user
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir
            .join(constants::config::APP_DIR_NAME)
            .join(constants::config::FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate default configuration content with helpful comments
    fn generate_default_config_content() -> String {
        format!(
            r#"# Lexin Fetcher Configuration
# Command-line flags take precedence over values in this file.

[client]
# HTTP client settings
tcp_keepalive_secs = 30
tcp_nodelay = true
pool_idle_timeout_secs = {}
pool_max_per_host = {}
connect_timeout_secs = {}
# request_timeout_secs = 600  # Unset = no limit on large files

[download]
base_url = "{}"
output_dir = "{}"
concurrency = {}

[logging]
level = "warn"  # error, warn, info, debug, trace
"#,
            http::POOL_IDLE_TIMEOUT.as_secs(),
            http::POOL_MAX_PER_HOST,
            http::CONNECT_TIMEOUT.as_secs(),
            lexin::BASE_URL,
            files::DEFAULT_OUTPUT_DIR,
            workers::DEFAULT_CONCURRENCY,
        )
    }
}

impl ClientConfigToml {
    /// Convert to runtime ClientConfig
    pub fn to_runtime_config(&self) -> ClientConfig {
        ClientConfig {
            tcp_keepalive: self.tcp_keepalive_secs.map(Duration::from_secs),
            tcp_nodelay: self.tcp_nodelay,
            pool_idle_timeout: self.pool_idle_timeout_secs.map(Duration::from_secs),
            pool_max_per_host: self.pool_max_per_host,
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..ClientConfig::default()
        }
    }
}

impl DownloadConfigToml {
    /// Convert to runtime ManagerConfig
    pub fn to_runtime_config(&self) -> ManagerConfig {
        ManagerConfig::new(self.output_dir.clone(), self.concurrency)
    }
}
