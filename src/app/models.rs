//! Data models for Lexin Fetcher
//!
//! This module defines the core data structures used throughout the application:
//! the decoded SVN index document, the collections offered by the catalog,
//! listing entries inside a collection, and per-collection download outcomes.

use serde::{Deserialize, Serialize};

use crate::errors::CollectionError;

/// Root element of an SVN-style index document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SvnDocument {
    /// Server version string
    #[serde(rename = "@version", default)]
    pub version: String,
    /// Link to the serving software
    #[serde(rename = "@href", default)]
    pub href: String,
    /// The single index element
    pub index: SvnIndex,
}

/// The `index` element listing files and subdirectories
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SvnIndex {
    /// Repository revision
    #[serde(rename = "@rev", default)]
    pub rev: String,
    /// Repository path of this listing
    #[serde(rename = "@path", default)]
    pub path: String,
    /// Repository base name
    #[serde(rename = "@base", default)]
    pub base: String,
    /// Link to the parent directory, absent at the root
    #[serde(default)]
    pub updir: Option<SvnUpdir>,
    /// File entries
    #[serde(rename = "file", default)]
    pub files: Vec<SvnEntry>,
    /// Subdirectory entries
    #[serde(rename = "dir", default)]
    pub dirs: Vec<SvnEntry>,
}

/// Parent directory link
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SvnUpdir {
    #[serde(rename = "@href", default)]
    pub href: String,
}

/// A `file` or `dir` element
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SvnEntry {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@href")]
    pub href: String,
}

/// One remote content collection (one language of the dictionary)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Source-side directory name, e.g. "grekiska"; identity of the collection
    pub code: String,
    /// Human-readable name, e.g. "Greek"
    pub display_name: String,
    /// URL of the collection's listing page
    pub source_url: String,
    /// Short description shown in selection lists
    pub description: String,
    /// Whether the operator picked this collection
    pub selected: bool,
}

impl Collection {
    /// Build a collection from a catalog directory entry
    ///
    /// The display name comes from the language table, falling back to the
    /// capitalized code. The listing URL is the base URL with the entry's
    /// relative link appended.
    pub fn from_catalog_entry(code: &str, href: &str, base_url: &str) -> Self {
        let display_name = display_name_for(code);
        Self {
            code: code.to_string(),
            description: format!("Swedish-{} lexicon", display_name),
            display_name,
            source_url: join_href(base_url, href),
            selected: false,
        }
    }
}

/// Kind of a listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// A downloadable file
    File,
    /// A subdirectory (never traversed)
    Directory,
}

/// An entry of a collection listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    /// Local file name
    pub name: String,
    /// Link relative to the collection URL
    pub href: String,
    /// File or subdirectory
    pub kind: EntryKind,
}

impl ListingEntry {
    /// Create a file entry
    pub fn file(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a subdirectory entry
    pub fn directory(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Absolute URL of this entry below a collection URL
    pub fn url_under(&self, collection_url: &str) -> String {
        join_href(collection_url, &self.href)
    }
}

/// Result of downloading one collection
///
/// Exactly one outcome is produced per scheduled collection. A successful
/// outcome never carries an error, and the byte total only counts files that
/// were transferred completely.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The collection this outcome belongs to
    pub collection: Collection,
    /// Whether the collection finished including its metadata sidecar
    pub success: bool,
    /// Number of files transferred
    pub file_count: usize,
    /// Bytes written across transferred files
    pub total_bytes: u64,
    /// Number of file transfers that failed and were skipped
    pub files_failed: usize,
    /// Terminal failure, if any
    pub error: Option<CollectionError>,
}

impl DownloadOutcome {
    /// Successful outcome with the transfer tally
    pub fn succeeded(
        collection: Collection,
        file_count: usize,
        total_bytes: u64,
        files_failed: usize,
    ) -> Self {
        Self {
            collection,
            success: true,
            file_count,
            total_bytes,
            files_failed,
            error: None,
        }
    }

    /// Failed outcome; counts are zero because nothing is reported for a
    /// collection that did not complete
    pub fn failed(collection: Collection, error: CollectionError) -> Self {
        Self {
            collection,
            success: false,
            file_count: 0,
            total_bytes: 0,
            files_failed: 0,
            error: Some(error),
        }
    }

    /// Collection code, shorthand for reporting
    pub fn code(&self) -> &str {
        &self.collection.code
    }
}

/// Translate a collection code into an English language name
pub fn language_name(code: &str) -> Option<&'static str> {
    let name = match code {
        "albanska" => "Albanian",
        "amhariska" => "Amharic",
        "arabiska" => "Arabic",
        "azerbajdzjanska" => "Azerbaijani",
        "bosniska" => "Bosnian",
        "engelska" => "English",
        "finska" => "Finnish",
        "grekiska" => "Greek",
        "kroatiska" => "Croatian",
        "nordkurdiska" => "Northern Kurdish (Kurmanji)",
        "pashto" => "Pashto",
        "persiska" => "Persian (Farsi)",
        "ryska" => "Russian",
        "serbiska" => "Serbian",
        "somaliska" => "Somali",
        "spanska" => "Spanish",
        "svenska" => "Swedish",
        "sydkurdiska" => "Southern Kurdish (Sorani)",
        "tigrinska" => "Tigrinya",
        "turkiska" => "Turkish",
        _ => return None,
    };
    Some(name)
}

/// Display name for a code: table lookup, else the capitalized code
pub fn display_name_for(code: &str) -> String {
    language_name(code)
        .map(str::to_string)
        .unwrap_or_else(|| capitalize_words(code))
}

/// Uppercase the first letter of every whitespace-separated word
pub fn capitalize_words(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            result.push(ch);
        } else if at_word_start {
            result.extend(ch.to_uppercase());
            at_word_start = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// Append a relative link to a base URL
pub fn join_href(base: &str, href: &str) -> String {
    format!("{}{}", base, href)
}
