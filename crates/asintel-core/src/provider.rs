//! ProductProvider trait definition.
//!
//! This is the port that product-data backends implement. Uses native
//! async fn in traits (RPITIT); concrete implementations live in
//! `asintel-infra` (e.g., the Keepa client).

use asintel_types::retrieval::{ProviderError, RetrievalRequest, RetrievalResponse};

/// Trait for external product-data providers.
///
/// The dispatcher only needs the request/response shape; provider
/// internals (wire format, caching, token accounting) stay behind this
/// boundary.
pub trait ProductProvider: Send + Sync {
    /// Human-readable provider name (e.g., "keepa").
    fn name(&self) -> &str;

    /// Fetch field data for every identifier in the request's batch.
    fn fetch(
        &self,
        request: &RetrievalRequest,
    ) -> impl std::future::Future<Output = Result<RetrievalResponse, ProviderError>> + Send;
}
