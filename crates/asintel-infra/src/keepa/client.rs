//! KeepaProvider -- concrete [`ProductProvider`] implementation for the
//! Keepa product API.
//!
//! Sends GET requests to `/product` with the identifiers comma-joined
//! and decodes the response into domain records. The API key is wrapped
//! in [`secrecy::SecretString`] and is never logged or included in
//! `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use asintel_core::provider::ProductProvider;
use asintel_types::retrieval::{
    ProviderError, RequestedField, RetrievalRequest, RetrievalResponse,
};

use super::types::KeepaResponse;

/// Number of days of aggregated statistics to request.
///
/// 30 days matches the "last month" framing of the chat summaries.
const STATS_DAYS: u32 = 30;

/// Keepa product-data provider.
///
/// Implements [`ProductProvider`] for the Keepa `/product` endpoint.
/// One HTTP request covers the whole batch: Keepa accepts up to 100
/// ASINs comma-joined per call.
pub struct KeepaProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl KeepaProvider {
    /// Create a new Keepa provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Keepa API key wrapped in SecretString
    /// * `timeout_secs` - per-request HTTP timeout
    pub fn new(api_key: SecretString, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to create reqwest client");

        Self {
            client,
            api_key,
            base_url: "https://api.keepa.com".to_string(),
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Query parameters for a retrieval request.
    ///
    /// `rating=1` is only sent when a rating-backed field was asked
    /// for; it costs extra provider tokens.
    fn query_params(&self, request: &RetrievalRequest) -> Vec<(&'static str, String)> {
        let asins = request
            .batch
            .identifiers()
            .iter()
            .map(|a| a.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let mut params = vec![
            ("key", self.api_key.expose_secret().to_string()),
            ("domain", request.domain.provider_id().to_string()),
            ("asin", asins),
            ("stats", STATS_DAYS.to_string()),
            ("history", "0".to_string()),
        ];
        if needs_rating(&request.fields) {
            params.push(("rating", "1".to_string()));
        }
        params
    }
}

/// Whether any requested field requires the rating data block.
fn needs_rating(fields: &[RequestedField]) -> bool {
    fields
        .iter()
        .any(|f| matches!(f, RequestedField::Rating | RequestedField::ReviewCount))
}

// KeepaProvider intentionally does NOT derive Debug so the API key can
// never leak through formatting.

impl ProductProvider for KeepaProvider {
    fn name(&self) -> &str {
        "keepa"
    }

    async fn fetch(
        &self,
        request: &RetrievalRequest,
    ) -> Result<RetrievalResponse, ProviderError> {
        let url = self.url("/product");
        let params = self.query_params(request);

        tracing::debug!(
            identifiers = request.batch.len(),
            domain = %request.domain,
            "Sending Keepa product request"
        );

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000);
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 402 => ProviderError::AuthenticationFailed,
                429 => ProviderError::RateLimited { retry_after_ms },
                _ => ProviderError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let keepa_resp: KeepaResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Deserialization(format!("failed to parse response: {e}")))?;

        if let Some(err) = keepa_resp.error {
            return Err(ProviderError::Provider {
                message: err
                    .message
                    .or(err.error_type)
                    .unwrap_or_else(|| "unspecified provider error".to_string()),
            });
        }

        if keepa_resp.products.is_empty() {
            return Err(ProviderError::EmptyResult);
        }

        let records = keepa_resp
            .products
            .into_iter()
            .filter_map(|p| p.into_record(&request.fields))
            .collect();

        Ok(RetrievalResponse {
            records,
            tokens_left: keepa_resp.tokens_left,
        })
    }
}
