//! Lexin Fetcher Library
//!
//! A Rust library for downloading the Lexin dictionary XML collections.
//! Discovers the collections offered by the catalog and downloads several of
//! them at once, reporting each collection's outcome as soon as it finishes.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
