//! Retrieval request/response types.
//!
//! These types model the exchange with the external product-data
//! provider: which fields to fetch, for which marketplace, and the
//! per-identifier records that come back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::asin::Asin;
use crate::batch::Batch;

/// A product field the provider can return.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RequestedField {
    Title,
    Brand,
    Rating,
    ReviewCount,
    Price,
    SalesRank,
    MonthlySold,
    Image,
}

impl RequestedField {
    /// Every retrievable field, in display order.
    pub const ALL: [RequestedField; 8] = [
        RequestedField::Title,
        RequestedField::Brand,
        RequestedField::Rating,
        RequestedField::ReviewCount,
        RequestedField::Price,
        RequestedField::SalesRank,
        RequestedField::MonthlySold,
        RequestedField::Image,
    ];

    /// Human-readable label for tables and chat summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RequestedField::Title => "Title",
            RequestedField::Brand => "Brand",
            RequestedField::Rating => "Rating",
            RequestedField::ReviewCount => "Reviews",
            RequestedField::Price => "Price",
            RequestedField::SalesRank => "Sales Rank",
            RequestedField::MonthlySold => "Monthly Sold",
            RequestedField::Image => "Image",
        }
    }
}

impl fmt::Display for RequestedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestedField::Title => write!(f, "title"),
            RequestedField::Brand => write!(f, "brand"),
            RequestedField::Rating => write!(f, "rating"),
            RequestedField::ReviewCount => write!(f, "review_count"),
            RequestedField::Price => write!(f, "price"),
            RequestedField::SalesRank => write!(f, "sales_rank"),
            RequestedField::MonthlySold => write!(f, "monthly_sold"),
            RequestedField::Image => write!(f, "image"),
        }
    }
}

impl FromStr for RequestedField {
    type Err = String;

    /// Accepts canonical names plus the aliases users actually type
    /// in chat ("reviews", "bsr", "cost", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "title" | "name" => Ok(RequestedField::Title),
            "brand" | "manufacturer" => Ok(RequestedField::Brand),
            "rating" | "ratings" | "stars" => Ok(RequestedField::Rating),
            "review_count" | "reviews" | "review" => Ok(RequestedField::ReviewCount),
            "price" | "prices" | "cost" => Ok(RequestedField::Price),
            "sales_rank" | "rank" | "bsr" => Ok(RequestedField::SalesRank),
            "monthly_sold" | "sales" | "sold" | "units" => Ok(RequestedField::MonthlySold),
            "image" | "images" | "picture" => Ok(RequestedField::Image),
            other => Err(format!("unknown field: '{other}'")),
        }
    }
}

/// Amazon marketplace, carrying the provider's numeric domain id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Domain {
    Us,
    Gb,
    De,
    Fr,
    Jp,
    Ca,
    It,
    Es,
    In,
    Mx,
}

impl Domain {
    /// Keepa numeric domain id for this marketplace.
    pub fn provider_id(&self) -> u8 {
        match self {
            Domain::Us => 1,
            Domain::Gb => 2,
            Domain::De => 3,
            Domain::Fr => 4,
            Domain::Jp => 5,
            Domain::Ca => 6,
            Domain::It => 8,
            Domain::Es => 9,
            Domain::In => 10,
            Domain::Mx => 11,
        }
    }
}

impl Default for Domain {
    fn default() -> Self {
        Domain::Us
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Domain::Us => "US",
            Domain::Gb => "GB",
            Domain::De => "DE",
            Domain::Fr => "FR",
            Domain::Jp => "JP",
            Domain::Ca => "CA",
            Domain::It => "IT",
            Domain::Es => "ES",
            Domain::In => "IN",
            Domain::Mx => "MX",
        };
        write!(f, "{code}")
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "US" => Ok(Domain::Us),
            "GB" | "UK" => Ok(Domain::Gb),
            "DE" => Ok(Domain::De),
            "FR" => Ok(Domain::Fr),
            "JP" => Ok(Domain::Jp),
            "CA" => Ok(Domain::Ca),
            "IT" => Ok(Domain::It),
            "ES" => Ok(Domain::Es),
            "IN" => Ok(Domain::In),
            "MX" => Ok(Domain::Mx),
            other => Err(format!("unknown marketplace: '{other}'")),
        }
    }
}

/// A request for field data keyed by identifier, handed to the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub id: Uuid,
    pub batch: Batch,
    /// Deduplicated, in order of first mention.
    pub fields: Vec<RequestedField>,
    pub domain: Domain,
}

impl RetrievalRequest {
    pub fn new(batch: Batch, fields: Vec<RequestedField>, domain: Domain) -> Self {
        Self {
            id: Uuid::now_v7(),
            batch,
            fields,
            domain,
        }
    }
}

/// Field values for a single product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub asin: Asin,
    pub values: BTreeMap<RequestedField, serde_json::Value>,
}

/// Provider response: one record per identifier the provider knew about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResponse {
    pub records: Vec<ProductRecord>,
    /// Remaining provider token balance, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_left: Option<i64>,
}

/// Errors from product-data provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("authentication failed (check the provider API key)")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("provider returned no products for this batch")]
    EmptyResult,
}
