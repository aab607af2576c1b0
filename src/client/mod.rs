//! n8n API client and authentication.
//!
//! This module provides the [`N8nClient`] for interacting with the n8n
//! public REST API, the [`Credentials`] it authenticates with, and the
//! per-item outcome records produced by bulk operations.

mod auth;
mod n8n;
mod report;

pub use auth::Credentials;
pub use n8n::N8nClient;
pub use report::{ActivationOutcome, ActivationStatus, AuthCheck, ImportOutcome};
