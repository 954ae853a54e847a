//! Shared domain types for Asintel.
//!
//! This crate contains the core domain types used across the Asintel
//! workspace: validated ASINs, identifier batches, conversation turns,
//! retrieval requests, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod asin;
pub mod batch;
pub mod chat;
pub mod config;
pub mod error;
pub mod retrieval;
