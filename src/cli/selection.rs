//! Collection selection
//!
//! Turns operator input into an immutable snapshot of the chosen collections.
//! Selection either comes from flags (`--all`, `--languages`) or from an
//! interactive numbered prompt that accepts `all`, `q` (or an empty line) to
//! quit, and comma-separated numbers and ranges such as `1,3,5-7`.

use std::collections::HashSet;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::app::models::Collection;
use crate::errors::{SelectionError, SelectionResult};

/// Parsed prompt input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// Every collection
    All,
    /// Leave without downloading
    Quit,
    /// Zero-based catalog positions, deduplicated, in input order
    Indices(Vec<usize>),
}

/// Parse one line of prompt input against a catalog of `count` entries
///
/// # Errors
///
/// Returns `SelectionError::InvalidInput` for tokens that are not numbers or
/// ranges within `1..=count`
pub fn parse_selection(input: &str, count: usize) -> SelectionResult<SelectionInput> {
    let trimmed = input.trim();
    let lowered = trimmed.to_lowercase();

    match lowered.as_str() {
        "" | "q" | "quit" => return Ok(SelectionInput::Quit),
        "all" | "a" => return Ok(SelectionInput::All),
        _ => {}
    }

    let invalid = |reason: String| SelectionError::InvalidInput {
        input: trimmed.to_string(),
        reason,
    };

    let mut seen = HashSet::new();
    let mut indices = Vec::new();

    for token in trimmed.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let (start, end) = match token.split_once('-') {
            Some((start, end)) => (
                parse_position(start.trim(), count).map_err(&invalid)?,
                parse_position(end.trim(), count).map_err(&invalid)?,
            ),
            None => {
                let position = parse_position(token, count).map_err(&invalid)?;
                (position, position)
            }
        };

        if start > end {
            return Err(invalid(format!("range {} is reversed", token)));
        }

        for position in start..=end {
            if seen.insert(position) {
                indices.push(position - 1);
            }
        }
    }

    if indices.is_empty() {
        return Err(invalid("no collections given".to_string()));
    }

    Ok(SelectionInput::Indices(indices))
}

fn parse_position(token: &str, count: usize) -> Result<usize, String> {
    let position = token
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a number", token))?;
    if position == 0 || position > count {
        return Err(format!("{} is outside 1-{}", position, count));
    }
    Ok(position)
}

/// Snapshot every catalog entry as selected
pub fn select_all(catalog: &[Collection]) -> Vec<Collection> {
    catalog.iter().map(mark_selected).collect()
}

/// Snapshot the catalog entries at the given zero-based positions
pub fn select_indices(catalog: &[Collection], indices: &[usize]) -> Vec<Collection> {
    indices
        .iter()
        .filter_map(|&index| catalog.get(index))
        .map(mark_selected)
        .collect()
}

/// Snapshot the catalog entries with the given codes, in the order given
///
/// # Errors
///
/// Returns `SelectionError::UnknownCode` for the first code the catalog does
/// not offer
pub fn resolve_codes(catalog: &[Collection], codes: &[String]) -> SelectionResult<Vec<Collection>> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();

    for code in codes.iter().map(|code| code.trim()).filter(|code| !code.is_empty()) {
        let collection = catalog
            .iter()
            .find(|collection| collection.code.eq_ignore_ascii_case(code))
            .ok_or_else(|| SelectionError::UnknownCode {
                code: code.to_string(),
            })?;

        if seen.insert(collection.code.as_str()) {
            selected.push(mark_selected(collection));
        }
    }

    Ok(selected)
}

fn mark_selected(collection: &Collection) -> Collection {
    Collection {
        selected: true,
        ..collection.clone()
    }
}

/// Interactive selection on the terminal
///
/// Returns `None` when the operator quits.
pub fn interactive_selection(catalog: &[Collection]) -> SelectionResult<Option<Vec<Collection>>> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    prompt_selection(catalog, &mut stdin.lock(), &mut stdout.lock())
}

/// Numbered selection prompt over arbitrary input and output
///
/// Invalid input is reported and the prompt repeats. End of input counts as
/// quitting.
pub fn prompt_selection<R: BufRead, W: Write>(
    catalog: &[Collection],
    input: &mut R,
    output: &mut W,
) -> SelectionResult<Option<Vec<Collection>>> {
    if catalog.is_empty() {
        return Err(SelectionError::EmptyCatalog);
    }

    writeln!(output)?;
    writeln!(output, "📚 Available Languages:")?;
    for (i, collection) in catalog.iter().enumerate() {
        writeln!(
            output,
            "  {:>2}. {:<28} {}",
            i + 1,
            collection.display_name,
            collection.code
        )?;
    }
    writeln!(output)?;

    loop {
        write!(
            output,
            "Select languages (e.g. 1,3,5-7), 'all', or 'q' to quit: "
        )?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            debug!("End of input during selection");
            return Ok(None);
        }

        match parse_selection(&line, catalog.len()) {
            Ok(SelectionInput::Quit) => return Ok(None),
            Ok(SelectionInput::All) => {
                writeln!(output, "✅ Selected all {} languages", catalog.len())?;
                return Ok(Some(select_all(catalog)));
            }
            Ok(SelectionInput::Indices(indices)) => {
                let selected = select_indices(catalog, &indices);
                let names: Vec<&str> = selected
                    .iter()
                    .map(|collection| collection.display_name.as_str())
                    .collect();
                writeln!(output, "✅ Selected: {}", names.join(", "))?;
                return Ok(Some(selected));
            }
            Err(e) => writeln!(output, "❌ {}", e)?,
        }
    }
}
