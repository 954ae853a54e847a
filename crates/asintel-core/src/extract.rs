//! Identifier extraction from uploaded files and pasted text.
//!
//! Pure transformation: raw text in, validated [`Batch`] out. File input
//! is comma-separated tabular text; pasted input is newline-delimited.
//! Non-conforming rows are skipped and counted, never fatal.

use std::collections::HashSet;

use asintel_types::asin::Asin;
use asintel_types::batch::{Batch, BatchSource};
use asintel_types::error::ExtractError;

/// Raw input handed to the extractor.
///
/// The boundary contract is raw text in both cases: the caller reads the
/// file, the extractor never touches the filesystem.
#[derive(Debug, Clone)]
pub enum ExtractionInput {
    /// Comma-separated tabular file contents.
    FileContents(String),
    /// Newline-delimited pasted text.
    PastedText(String),
}

/// Column labels recognized as a header row (case-insensitive).
const HEADER_LABELS: [&str; 5] = ["asin", "asins", "identifier", "identifiers", "product id"];

/// Extract a validated, deduplicated batch of identifiers.
///
/// Splits the input into candidates (lines, and cells for file input),
/// trims whitespace, discards empties, skips a leading header row,
/// validates each candidate, and collects unique identifiers in order
/// of first occurrence. Candidates that fail validation are counted
/// into the batch's rejected-row total.
///
/// Returns [`ExtractError::EmptyInput`] when no valid identifier
/// survives.
pub fn extract(input: &ExtractionInput) -> Result<Batch, ExtractError> {
    let (text, source) = match input {
        ExtractionInput::FileContents(text) => (text, BatchSource::File),
        ExtractionInput::PastedText(text) => (text, BatchSource::PastedText),
    };

    let mut identifiers: Vec<Asin> = Vec::new();
    let mut seen: HashSet<Asin> = HashSet::new();
    let mut rejected: u32 = 0;
    let mut first_row = true;

    for line in text.lines() {
        let cells: Vec<&str> = match source {
            BatchSource::File => line.split(',').map(str::trim).collect(),
            BatchSource::PastedText => vec![line.trim()],
        };

        let non_empty: Vec<&str> = cells.into_iter().filter(|c| !c.is_empty()).collect();
        if non_empty.is_empty() {
            continue;
        }

        if first_row && is_header_row(&non_empty) {
            first_row = false;
            continue;
        }
        first_row = false;

        for cell in non_empty {
            match cell.parse::<Asin>() {
                Ok(asin) => {
                    if seen.insert(asin.clone()) {
                        identifiers.push(asin);
                    }
                }
                Err(_) => rejected += 1,
            }
        }
    }

    if identifiers.is_empty() {
        return Err(ExtractError::EmptyInput);
    }

    tracing::debug!(
        count = identifiers.len(),
        rejected,
        source = %source,
        "Extracted identifier batch"
    );

    Ok(Batch::new(identifiers, source, rejected))
}

/// Whether every cell in the first row is a known column label.
fn is_header_row(cells: &[&str]) -> bool {
    cells
        .iter()
        .all(|c| HEADER_LABELS.contains(&c.to_lowercase().as_str()))
}
