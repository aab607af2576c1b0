//! n8n Workflow Manager
//!
//! A CLI tool for keeping a local directory of n8n workflow definition
//! files in sync with a remote n8n instance. Local files are the source
//! of truth; workflows are matched to remote records by name and created
//! or updated idempotently.

pub mod cli;
pub mod client;
pub mod config;
pub mod workflow;

// Re-exports for convenience
pub use client::{Credentials, N8nClient};
pub use config::Config;
pub use workflow::Workflow;
