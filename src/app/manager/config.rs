//! Configuration for the concurrent download manager

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{files, workers};
use crate::errors::{ConfigError, ConfigResult};

/// Configuration for a download session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Directory that receives one subdirectory per collection
    pub output_root: PathBuf,
    /// Maximum number of collections downloading at the same time
    pub max_concurrency: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(files::DEFAULT_OUTPUT_DIR),
            max_concurrency: workers::DEFAULT_CONCURRENCY,
        }
    }
}

impl ManagerConfig {
    /// Create a configuration for the given output root
    pub fn new(output_root: impl Into<PathBuf>, max_concurrency: usize) -> Self {
        Self {
            output_root: output_root.into(),
            max_concurrency,
        }
    }

    /// Set the output root
    pub fn with_output_root(mut self, output_root: impl AsRef<Path>) -> Self {
        self.output_root = output_root.as_ref().to_path_buf();
        self
    }

    /// Set the concurrency limit
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero concurrency limit or an
    /// empty output root
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrency".to_string(),
                value: "0".to_string(),
                reason: "At least one concurrent download is required".to_string(),
            });
        }

        if self.output_root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "output_root".to_string(),
                value: String::new(),
                reason: "Output directory cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
