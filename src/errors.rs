//! Error types for Lexin Fetcher
//!
//! This module defines the error types for every component of the application.
//! Collection-level failures are captured inside `DownloadOutcome` records
//! rather than propagated, so the types here double as the payload of each
//! failed outcome.

use std::path::PathBuf;
use thiserror::Error;

/// Index document decoding errors
#[derive(Error, Debug)]
pub enum ListingError {
    /// The document body is not valid UTF-8
    #[error("Listing document is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// Structural XML decoding failed
    #[error("Failed to decode listing document: {0}")]
    Decode(#[from] quick_xml::DeError),
}

/// HTTP retrieval errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection or body read failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// URL could not be parsed
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Single file transfer errors
#[derive(Error, Debug)]
pub enum TransferError {
    /// Destination file could not be created or truncated
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request or body stream failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Writing the body to disk failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry name does not name a single file inside the collection directory
    #[error("Refusing to write entry with unsafe name: {name}")]
    UnsafeName { name: String },
}

/// Terminal failure of one collection download
///
/// Each variant aborts the remaining steps for that collection only.
/// Individual file transfer failures never appear here.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// Local output directory could not be created
    #[error("Failed to create directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing page could not be retrieved
    #[error("Failed to fetch listing {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    /// Raw listing sidecar could not be written
    #[error("Failed to save index file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Listing document could not be decoded
    #[error("Failed to parse directory contents: {0}")]
    Parse(#[from] ListingError),

    /// Bookkeeping sidecar could not be written
    #[error("Failed to write metadata file {path}: {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The download task panicked before producing an outcome
    #[error("Download task panicked: {message}")]
    Panicked { message: String },
}

impl CollectionError {
    /// Short stable name of the failure kind, used in logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            CollectionError::Directory { .. } => "directory",
            CollectionError::Fetch { .. } => "fetch",
            CollectionError::Persist { .. } => "persist",
            CollectionError::Parse(_) => "parse",
            CollectionError::Metadata { .. } => "metadata",
            CollectionError::Panicked { .. } => "panic",
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read or written
    #[error("Configuration file I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// User configuration directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,
}

/// Operator selection errors
#[derive(Error, Debug)]
pub enum SelectionError {
    /// Input could not be interpreted as a selection
    #[error("Invalid selection '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    /// A requested collection code is not in the catalog
    #[error("Unknown language code: {code}")]
    UnknownCode { code: String },

    /// The catalog offered nothing to select
    #[error("No collections available in the catalog")]
    EmptyCatalog,

    /// Terminal interaction failed
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Listing decoding error
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// HTTP retrieval error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// File transfer error
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Collection download error
    #[error(transparent)]
    Collection(#[from] CollectionError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Listing(_) => "listing",
            AppError::Fetch(_) => "fetch",
            AppError::Transfer(_) => "transfer",
            AppError::Collection(_) => "collection",
            AppError::Config(_) => "config",
            AppError::Selection(_) => "selection",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Listing result type alias
pub type ListingResult<T> = std::result::Result<T, ListingError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Transfer result type alias
pub type TransferResult<T> = std::result::Result<T, TransferError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Selection result type alias
pub type SelectionResult<T> = std::result::Result<T, SelectionError>;
