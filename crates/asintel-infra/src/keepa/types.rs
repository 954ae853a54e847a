//! Keepa wire types and conversion to domain records.
//!
//! Only the slice of the Keepa product object we actually read is
//! modeled; everything else is ignored during deserialization. Numeric
//! conventions on the wire: `-1` means "no data", prices are integer
//! cents, ratings are tenths of a star.

use serde::Deserialize;

use std::collections::BTreeMap;

use asintel_core::estimate;
use asintel_types::asin::Asin;
use asintel_types::retrieval::{ProductRecord, RequestedField};

/// Base URL for product images referenced by `imagesCSV`.
const IMAGE_BASE_URL: &str = "https://m.media-amazon.com/images/I/";

/// Indices into `stats.current` (Keepa CSV type ids).
const STAT_NEW_PRICE: usize = 1;
const STAT_SALES_RANK: usize = 3;
const STAT_RATING: usize = 16;
const STAT_REVIEW_COUNT: usize = 17;

/// Envelope of a `/product` response.
#[derive(Debug, Deserialize)]
pub struct KeepaResponse {
    #[serde(default)]
    pub products: Vec<KeepaProduct>,
    #[serde(rename = "tokensLeft")]
    pub tokens_left: Option<i64>,
    pub error: Option<KeepaApiError>,
}

/// Error object Keepa embeds in an otherwise-200 response.
#[derive(Debug, Deserialize)]
pub struct KeepaApiError {
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    pub message: Option<String>,
}

/// The slice of a Keepa product object we consume.
#[derive(Debug, Deserialize)]
pub struct KeepaProduct {
    pub asin: String,
    pub title: Option<String>,
    pub brand: Option<String>,
    #[serde(rename = "imagesCSV")]
    pub images_csv: Option<String>,
    #[serde(rename = "monthlySold")]
    pub monthly_sold: Option<i64>,
    pub stats: Option<KeepaStats>,
}

/// Aggregated statistics block (`stats=N` request parameter).
#[derive(Debug, Deserialize)]
pub struct KeepaStats {
    #[serde(default)]
    pub current: Vec<i64>,
}

impl KeepaProduct {
    /// Convert to a domain record containing only the requested fields.
    ///
    /// Fields the product has no data for are omitted from the value
    /// map. Returns `None` when the ASIN on the wire doesn't parse
    /// (the provider echoed something we never asked for).
    pub fn into_record(self, fields: &[RequestedField]) -> Option<ProductRecord> {
        let asin: Asin = match self.asin.parse() {
            Ok(asin) => asin,
            Err(err) => {
                tracing::warn!(asin = %self.asin, %err, "Skipping product with unparseable ASIN");
                return None;
            }
        };

        let mut values: BTreeMap<RequestedField, serde_json::Value> = BTreeMap::new();
        for field in fields {
            if let Some(value) = self.field_value(*field) {
                values.insert(*field, value);
            }
        }

        Some(ProductRecord { asin, values })
    }

    fn field_value(&self, field: RequestedField) -> Option<serde_json::Value> {
        match field {
            RequestedField::Title => self.title.clone().map(serde_json::Value::String),
            RequestedField::Brand => self.brand.clone().map(serde_json::Value::String),
            RequestedField::Image => self.image_url().map(serde_json::Value::String),
            RequestedField::Price => self
                .stat(STAT_NEW_PRICE)
                .map(|cents| serde_json::json!(cents as f64 / 100.0)),
            RequestedField::SalesRank => self.stat(STAT_SALES_RANK).map(|r| serde_json::json!(r)),
            RequestedField::Rating => self
                .stat(STAT_RATING)
                .map(|tenths| serde_json::json!(tenths as f64 / 10.0)),
            RequestedField::ReviewCount => {
                self.stat(STAT_REVIEW_COUNT).map(|c| serde_json::json!(c))
            }
            RequestedField::MonthlySold => {
                let floor = self.monthly_sold.filter(|&m| m >= 0)?;
                let (min, max) = estimate::monthly_sales_range(floor);
                let avg = estimate::average_monthly_sales(min, max);
                Some(serde_json::Value::String(format!(
                    "{min}-{max} units (avg {avg})"
                )))
            }
        }
    }

    /// First image from `imagesCSV`, as a full URL.
    fn image_url(&self) -> Option<String> {
        let csv = self.images_csv.as_deref()?;
        let first = csv.split(',').next()?.trim();
        if first.is_empty() {
            return None;
        }
        Some(format!("{IMAGE_BASE_URL}{first}"))
    }

    /// A `stats.current` entry, with `-1` mapped to "no data".
    fn stat(&self, index: usize) -> Option<i64> {
        let value = *self.stats.as_ref()?.current.get(index)?;
        (value >= 0).then_some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_product() -> KeepaProduct {
        serde_json::from_value(serde_json::json!({
            "asin": "B00NLLUMOE",
            "title": "Widget Pro 3000",
            "brand": "Widgetry",
            "imagesCSV": "61abcDEF._SL1500_.jpg,71xyzGHI.jpg",
            "monthlySold": 1000,
            "stats": {
                // index:       0     1   2      3  ... 16  17
                "current": [2999, 2499, -1, 15432, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, 45, 1287]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_response_envelope() {
        let response: KeepaResponse = serde_json::from_str(
            r#"{"products": [], "tokensLeft": 280, "error": {"type": "fatal", "message": "nope"}}"#,
        )
        .unwrap();
        assert!(response.products.is_empty());
        assert_eq!(response.tokens_left, Some(280));
        assert_eq!(response.error.unwrap().message.as_deref(), Some("nope"));
    }

    #[test]
    fn test_into_record_requested_fields_only() {
        let record = sample_product()
            .into_record(&[RequestedField::Title, RequestedField::Rating])
            .unwrap();
        assert_eq!(record.asin.as_str(), "B00NLLUMOE");
        assert_eq!(record.values.len(), 2);
        assert_eq!(
            record.values[&RequestedField::Title],
            serde_json::json!("Widget Pro 3000")
        );
        assert_eq!(record.values[&RequestedField::Rating], serde_json::json!(4.5));
    }

    #[test]
    fn test_price_cents_to_dollars() {
        let record = sample_product()
            .into_record(&[RequestedField::Price, RequestedField::SalesRank])
            .unwrap();
        assert_eq!(record.values[&RequestedField::Price], serde_json::json!(24.99));
        assert_eq!(
            record.values[&RequestedField::SalesRank],
            serde_json::json!(15432)
        );
    }

    #[test]
    fn test_review_count() {
        let record = sample_product()
            .into_record(&[RequestedField::ReviewCount])
            .unwrap();
        assert_eq!(
            record.values[&RequestedField::ReviewCount],
            serde_json::json!(1287)
        );
    }

    #[test]
    fn test_monthly_sold_widened_to_range() {
        let record = sample_product()
            .into_record(&[RequestedField::MonthlySold])
            .unwrap();
        assert_eq!(
            record.values[&RequestedField::MonthlySold],
            serde_json::json!("1000-2000 units (avg 1100)")
        );
    }

    #[test]
    fn test_image_url_takes_first_entry() {
        let record = sample_product().into_record(&[RequestedField::Image]).unwrap();
        assert_eq!(
            record.values[&RequestedField::Image],
            serde_json::json!("https://m.media-amazon.com/images/I/61abcDEF._SL1500_.jpg")
        );
    }

    #[test]
    fn test_missing_data_omitted() {
        let product: KeepaProduct = serde_json::from_value(serde_json::json!({
            "asin": "B00NLLUMOE",
            "monthlySold": -1,
            "stats": {"current": [-1, -1]}
        }))
        .unwrap();
        let record = product
            .into_record(&[
                RequestedField::Title,
                RequestedField::Price,
                RequestedField::MonthlySold,
            ])
            .unwrap();
        assert!(record.values.is_empty());
    }

    #[test]
    fn test_unparseable_asin_skipped() {
        let product: KeepaProduct =
            serde_json::from_value(serde_json::json!({"asin": "bogus"})).unwrap();
        assert!(product.into_record(&[RequestedField::Title]).is_none());
    }
}
