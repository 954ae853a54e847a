//! Identifier batch types.
//!
//! A [`Batch`] is the output of one extraction run: a deduplicated,
//! ordered list of ASINs plus provenance and a rejected-row count.
//! Batches are immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::asin::Asin;

/// Where a batch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BatchSource {
    File,
    PastedText,
}

impl fmt::Display for BatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchSource::File => write!(f, "file"),
            BatchSource::PastedText => write!(f, "pasted-text"),
        }
    }
}

impl FromStr for BatchSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" => Ok(BatchSource::File),
            "pasted-text" => Ok(BatchSource::PastedText),
            other => Err(format!("invalid batch source: '{other}'")),
        }
    }
}

/// An ordered, deduplicated batch of product identifiers.
///
/// Identifiers appear in order of first occurrence in the input.
/// Fields are private so a batch cannot be mutated after extraction;
/// all access goes through the read-only methods below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    id: Uuid,
    identifiers: Vec<Asin>,
    source: BatchSource,
    created_at: DateTime<Utc>,
    /// Non-conforming rows skipped during extraction.
    rejected_rows: u32,
}

impl Batch {
    /// Create a batch from already-validated, already-deduplicated identifiers.
    ///
    /// Callers (the extractor) are responsible for ordering and uniqueness.
    pub fn new(identifiers: Vec<Asin>, source: BatchSource, rejected_rows: u32) -> Self {
        Self {
            id: Uuid::now_v7(),
            identifiers,
            source,
            created_at: Utc::now(),
            rejected_rows,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn identifiers(&self) -> &[Asin] {
        &self.identifiers
    }

    pub fn source(&self) -> BatchSource {
        self.source
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// How many non-conforming rows were skipped while building this batch.
    pub fn rejected_rows(&self) -> u32 {
        self.rejected_rows
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asins(codes: &[&str]) -> Vec<Asin> {
        codes.iter().map(|c| c.parse().unwrap()).collect()
    }

    #[test]
    fn test_batch_source_roundtrip() {
        for source in [BatchSource::File, BatchSource::PastedText] {
            let s = source.to_string();
            let parsed: BatchSource = s.parse().unwrap();
            assert_eq!(source, parsed);
        }
    }

    #[test]
    fn test_batch_source_serde() {
        let json = serde_json::to_string(&BatchSource::PastedText).unwrap();
        assert_eq!(json, "\"pasted-text\"");
    }

    #[test]
    fn test_batch_accessors() {
        let batch = Batch::new(asins(&["B00NLLUMOE", "B07FKGVWWP"]), BatchSource::File, 3);
        assert_eq!(batch.len(), 2);
        assert!(!batch.is_empty());
        assert_eq!(batch.source(), BatchSource::File);
        assert_eq!(batch.rejected_rows(), 3);
        assert_eq!(batch.identifiers()[0].as_str(), "B00NLLUMOE");
    }

    #[test]
    fn test_batch_serialize_identifiers_in_order() {
        let batch = Batch::new(
            asins(&["B07FKGVWWP", "B00NLLUMOE"]),
            BatchSource::PastedText,
            0,
        );
        let json = serde_json::to_string(&batch).unwrap();
        let first = json.find("B07FKGVWWP").unwrap();
        let second = json.find("B00NLLUMOE").unwrap();
        assert!(first < second);
    }
}
