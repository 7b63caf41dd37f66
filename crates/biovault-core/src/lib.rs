//! Ambient building blocks shared by BioVault services.
//!
//! Tracing setup, request-id middleware, health handlers, environment
//! config helpers and serde helpers. No domain types live here.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
