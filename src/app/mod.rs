//! Core application logic for Lexin Fetcher
//!
//! This module contains the main application components: the HTTP client,
//! index document decoding, data models, the single-collection download
//! pipeline, and the concurrent download manager.
//!
//! # Examples
//!
//! ```rust,no_run
//! use lexin_fetcher::app::{listing, LexinClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = LexinClient::new()?;
//!
//! let document = client.fetch("https://sprakresurser.isof.se/lexin/svenska/").await?;
//! for entry in listing::parse_listing(&document)? {
//!     println!("Found file: {}", entry.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod collection;
pub mod listing;
pub mod manager;
pub mod models;

// Re-export main public API
pub use client::{ClientConfig, LexinClient};
pub use collection::{CollectionDownload, CollectionDownloader, CollectionMetadata};
pub use listing::{parse_catalog, parse_listing, strip_doctype};
pub use manager::{DownloadManager, DownloadSummary, ManagerConfig, OutcomeStream};
pub use models::{Collection, DownloadOutcome, EntryKind, ListingEntry};
