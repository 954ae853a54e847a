//! Keepa product-data provider.
//!
//! Implements the [`asintel_core::provider::ProductProvider`] port
//! against the Keepa `/product` HTTP API.

pub mod client;
pub mod time;
pub mod types;

pub use client::KeepaProvider;
