//! Process configuration
//!
//! The environment is read exactly once, at startup, into an immutable
//! [`Config`] that gets passed into whatever needs it. Nothing deeper in
//! the crate reads ambient environment state.

use crate::client::Credentials;
use eyre::{Context, Result};
use std::path::PathBuf;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5678";
pub const DEFAULT_WORKFLOWS_DIR: &str = "workflows";

/// Immutable configuration snapshot.
///
/// Sourced from environment variables (typically via a `.env` file):
/// - `N8N_URL`: base URL of the n8n instance (default `http://localhost:5678`)
/// - `N8N_API_KEY`: API key (optional)
/// - `N8N_SESSION_COOKIE`: raw session cookie string (optional)
/// - `N8N_WORKFLOWS_DIR`: directory of workflow JSON files (default `workflows`)
#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: Url,
    pub api_key: Option<String>,
    pub session_cookie: Option<String>,
    pub workflows_dir: PathBuf,
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let url_str = std::env::var("N8N_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url =
            Url::parse(&url_str).with_context(|| format!("Invalid N8N_URL: {}", url_str))?;

        let workflows_dir = std::env::var("N8N_WORKFLOWS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORKFLOWS_DIR));

        Ok(Self {
            base_url,
            api_key: std::env::var("N8N_API_KEY").ok(),
            session_cookie: std::env::var("N8N_SESSION_COOKIE").ok(),
            workflows_dir,
        })
    }

    /// Credentials for the API client.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.api_key.clone(), self.session_cookie.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "N8N_URL",
            "N8N_API_KEY",
            "N8N_SESSION_COOKIE",
            "N8N_WORKFLOWS_DIR",
        ] {
            unsafe { std::env::remove_var(key) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5678/");
        assert_eq!(config.api_key, None);
        assert_eq!(config.session_cookie, None);
        assert_eq!(config.workflows_dir, PathBuf::from("workflows"));
        assert!(config.credentials().is_anonymous());
    }

    #[test]
    #[serial]
    fn test_reads_environment() {
        clear_env();
        unsafe {
            std::env::set_var("N8N_URL", "https://n8n.example.com");
            std::env::set_var("N8N_API_KEY", "key-123");
            std::env::set_var("N8N_WORKFLOWS_DIR", "/srv/workflows");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url.as_str(), "https://n8n.example.com/");
        assert_eq!(config.api_key.as_deref(), Some("key-123"));
        assert_eq!(config.workflows_dir, PathBuf::from("/srv/workflows"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_url_errors() {
        clear_env();
        unsafe { std::env::set_var("N8N_URL", "not a url") };

        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("Invalid N8N_URL"));

        clear_env();
    }
}
