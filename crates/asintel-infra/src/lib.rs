//! Infrastructure layer for Asintel.
//!
//! Contains the implementation of the `ProductProvider` port defined in
//! `asintel-core` (the Keepa HTTP client) plus configuration loading
//! and data-directory resolution.

pub mod config;
pub mod keepa;
