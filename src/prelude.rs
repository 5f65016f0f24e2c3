//! Prelude module for Lexin Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use lexin_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use lexin_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(LexinClient::new()?);
//!     let catalog = client.fetch_catalog(LEXIN_BASE_URL).await?;
//!
//!     let manager = DownloadManager::new(
//!         ManagerConfig::default(),
//!         Arc::new(CollectionDownloader::new(client)),
//!     )?;
//!     let mut outcomes = manager.start(catalog);
//!     while let Some(outcome) = outcomes.recv().await {
//!         println!("{}: {}", outcome.code(), outcome.success);
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    // Client
    ClientConfig,
    LexinClient,

    // Data types
    Collection,
    DownloadOutcome,
    ListingEntry,

    // Downloading and orchestration
    CollectionDownload,
    CollectionDownloader,
    DownloadManager,
    DownloadSummary,
    ManagerConfig,
    OutcomeStream,

    // Listing functions
    parse_catalog,
    parse_listing,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR, LEXIN_BASE_URL, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
