//! Application constants for Lexin Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = concat!("Lexin-Fetcher/", env!("CARGO_PKG_VERSION"));

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 8;
}

/// Lexin service endpoints and document conventions
pub mod lexin {
    /// Root catalog listing one directory per language
    pub const BASE_URL: &str = "https://sprakresurser.isof.se/lexin/";

    /// Only listing entries with this extension are downloaded
    pub const TARGET_EXTENSION: &str = ".xml";

    /// Preamble declaration removed before decoding
    pub const DOCTYPE_MARKER: &str = "<!DOCTYPE";
}

/// Local output layout
pub mod files {
    /// Default output directory for downloads
    pub const DEFAULT_OUTPUT_DIR: &str = "lexin_downloads";

    /// Raw copy of the collection listing document
    pub const INDEX_FILE_NAME: &str = "index.html";

    /// Bookkeeping sidecar written after all transfers
    pub const METADATA_FILE_NAME: &str = "metadata.txt";

    /// Buffer size for streaming transfers to disk (64KB)
    pub const WRITE_BUFFER_SIZE: usize = 64 * 1024;
}

/// Concurrency configuration
pub mod workers {
    /// Default number of collections downloaded at once
    pub const DEFAULT_CONCURRENCY: usize = 3;

    /// Maximum recommended concurrent collection downloads
    pub const MAX_CONCURRENCY: usize = 16;
}

/// Configuration file discovery
pub mod config {
    /// Directory name under the user config directory
    pub const APP_DIR_NAME: &str = "lexin-fetcher";

    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "lexin-fetcher.toml";

    /// Configuration file name inside the app directory
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use files::{DEFAULT_OUTPUT_DIR, INDEX_FILE_NAME, METADATA_FILE_NAME};
pub use http::USER_AGENT;
pub use lexin::{BASE_URL as LEXIN_BASE_URL, TARGET_EXTENSION};
pub use workers::DEFAULT_CONCURRENCY;
