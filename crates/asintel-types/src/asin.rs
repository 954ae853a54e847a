//! Validated ASIN identifier type.
//!
//! An ASIN (Amazon Standard Identification Number) is a fixed-length
//! alphanumeric product code. Candidates are normalized to uppercase on
//! parse; anything that is not exactly 10 ASCII alphanumeric characters
//! is rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use std::fmt;
use std::str::FromStr;

/// Required length of an ASIN.
pub const ASIN_LEN: usize = 10;

/// Errors from parsing an ASIN candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsinParseError {
    #[error("invalid ASIN length: expected {ASIN_LEN} characters, got {0}")]
    InvalidLength(usize),

    #[error("invalid character '{0}' in ASIN")]
    InvalidChar(char),
}

/// A validated, normalized product identifier.
///
/// Invariants: exactly 10 ASCII alphanumeric characters, stored uppercase.
/// Construction goes through [`FromStr`], so every `Asin` in the system
/// is known valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asin(String);

impl Asin {
    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Asin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Asin {
    type Err = AsinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let candidate = s.trim();
        let count = candidate.chars().count();
        if count != ASIN_LEN {
            return Err(AsinParseError::InvalidLength(count));
        }
        if let Some(bad) = candidate.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(AsinParseError::InvalidChar(bad));
        }
        Ok(Asin(candidate.to_ascii_uppercase()))
    }
}

impl TryFrom<String> for Asin {
    type Error = AsinParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Asin> for String {
    fn from(asin: Asin) -> String {
        asin.0
    }
}
