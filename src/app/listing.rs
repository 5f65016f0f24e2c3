//! Listing document parsing
//!
//! Both the root catalog and every collection page are served as SVN-style
//! XML indexes. The server prepends a DOCTYPE declaration that the decoder
//! must not see, so it is cut out before structural decoding.
//!
//! # Examples
//!
//! ```rust
//! use lexin_fetcher::app::listing::parse_listing;
//!
//! let doc = br#"<svn version="1.9"><index rev="1" path="/lexin/svenska" base="">
//!   <file name="a.xml" href="a.xml"/>
//!   <file name="readme.txt" href="readme.txt"/>
//! </index></svn>"#;
//!
//! let entries = parse_listing(doc).unwrap();
//! assert_eq!(entries.len(), 1);
//! assert_eq!(entries[0].name, "a.xml");
//! ```

use std::borrow::Cow;

use tracing::debug;

use crate::app::models::{Collection, ListingEntry, SvnDocument};
use crate::constants::lexin::{DOCTYPE_MARKER, TARGET_EXTENSION};
use crate::errors::ListingResult;

/// Remove a `<!DOCTYPE ...>` declaration from a document
///
/// An internal subset (`[ ... ]`) is removed together with the declaration.
/// Documents without a declaration, or with an unterminated one, are
/// returned unchanged.
pub fn strip_doctype(document: &str) -> Cow<'_, str> {
    let Some(start) = document.find(DOCTYPE_MARKER) else {
        return Cow::Borrowed(document);
    };

    let mut depth = 0usize;
    for (offset, ch) in document[start..].char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '>' if depth == 0 => {
                let end = start + offset + 1;
                let mut cleaned = String::with_capacity(document.len() - (end - start));
                cleaned.push_str(&document[..start]);
                cleaned.push_str(&document[end..]);
                return Cow::Owned(cleaned);
            }
            _ => {}
        }
    }

    Cow::Borrowed(document)
}

/// Decode an index document into its typed form
///
/// # Errors
///
/// Returns `ListingError` if the bytes are not UTF-8 or the markup does not
/// match the index structure.
pub fn decode_index(document: &[u8]) -> ListingResult<SvnDocument> {
    let text = String::from_utf8(document.to_vec())?;
    let text = text.trim_start_matches('\u{feff}');
    let cleaned = strip_doctype(text);
    let decoded: SvnDocument = quick_xml::de::from_str(&cleaned)?;

    debug!(
        "Decoded index {} (rev {}): {} files, {} dirs",
        decoded.index.path,
        decoded.index.rev,
        decoded.index.files.len(),
        decoded.index.dirs.len()
    );
    Ok(decoded)
}

/// All top-level entries of a decoded index, subdirectories first
pub fn entries(document: &SvnDocument) -> Vec<ListingEntry> {
    let dirs = document
        .index
        .dirs
        .iter()
        .map(|dir| ListingEntry::directory(&dir.name, &dir.href));
    let files = document
        .index
        .files
        .iter()
        .map(|file| ListingEntry::file(&file.name, &file.href));
    dirs.chain(files).collect()
}

/// Parse the root catalog into the collections it offers
///
/// Each subdirectory of the catalog becomes one collection whose listing
/// URL is `base_url` followed by the directory's link.
pub fn parse_catalog(document: &[u8], base_url: &str) -> ListingResult<Vec<Collection>> {
    let decoded = decode_index(document)?;
    Ok(decoded
        .index
        .dirs
        .iter()
        .map(|dir| Collection::from_catalog_entry(&dir.name, &dir.href, base_url))
        .collect())
}

/// Parse a collection listing into the files that should be downloaded
///
/// Only file entries whose link ends in `.xml` are kept; everything else is
/// dropped silently.
pub fn parse_listing(document: &[u8]) -> ListingResult<Vec<ListingEntry>> {
    let decoded = decode_index(document)?;
    let total = decoded.index.files.len();

    let matched: Vec<ListingEntry> = decoded
        .index
        .files
        .into_iter()
        .filter(|file| file.href.ends_with(TARGET_EXTENSION))
        .map(|file| ListingEntry::file(file.name, file.href))
        .collect();

    debug!(
        "Listing {}: {} of {} files match {}",
        decoded.index.path,
        matched.len(),
        total,
        TARGET_EXTENSION
    );
    Ok(matched)
}
