//! Exa HTTP API: typed requests/responses and the `ExaApi` client seam.

pub mod client;
pub mod types;

pub use client::{ExaApi, ExaClient, ExaError};
