//! Business logic for Asintel.
//!
//! This crate defines the identifier extractor, the append-only
//! conversation session, the command dispatcher, and the
//! `ProductProvider` port that the infrastructure layer implements.
//! It depends only on `asintel-types` -- never on `asintel-infra` or
//! any HTTP/IO crate.

pub mod dispatch;
pub mod estimate;
pub mod extract;
pub mod provider;
pub mod session;
