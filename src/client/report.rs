//! Per-item outcome records for bulk operations.
//!
//! Bulk imports and activations never abort on a single failure; each
//! item's result is captured here so the operator gets a full report.

use crate::workflow::Workflow;

/// Result of the authentication probe.
///
/// Not-authenticated is data, not an error: callers must branch on
/// `authenticated` explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCheck {
    pub authenticated: bool,
    pub error: Option<String>,
}

impl AuthCheck {
    pub fn granted() -> Self {
        Self {
            authenticated: true,
            error: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            authenticated: false,
            error: Some("Not authenticated".to_string()),
        }
    }
}

/// Outcome of importing one local workflow file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    /// Local filename, relative to the workflows directory
    pub file: String,
    /// Workflow name; missing when the file could not even be parsed
    pub name: Option<String>,
    /// Server-assigned ID of the created or updated workflow
    pub id: Option<String>,
    /// Activation flag reported back by the server
    pub active: Option<bool>,
    pub error: Option<String>,
}

impl ImportOutcome {
    pub fn success(file: String, name: String, remote: &Workflow) -> Self {
        Self {
            file,
            name: Some(name),
            id: remote.id().map(str::to_string),
            active: remote.active(),
            error: None,
        }
    }

    pub fn failure(file: String, name: Option<String>, error: String) -> Self {
        Self {
            file,
            name,
            id: None,
            active: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// What happened to one remote workflow during bulk activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    Activated,
    AlreadyActive,
    Error,
}

impl std::fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activated => write!(f, "activated"),
            Self::AlreadyActive => write!(f, "already active"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Outcome of activating one remote workflow.
///
/// Workflows without an ID never appear here; they are skipped before
/// any request is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationOutcome {
    pub name: String,
    pub id: String,
    pub status: ActivationStatus,
    pub error: Option<String>,
}

impl ActivationOutcome {
    pub fn activated(name: String, id: String) -> Self {
        Self {
            name,
            id,
            status: ActivationStatus::Activated,
            error: None,
        }
    }

    pub fn already_active(name: String, id: String) -> Self {
        Self {
            name,
            id,
            status: ActivationStatus::AlreadyActive,
            error: None,
        }
    }

    pub fn failed(name: String, id: String, error: String) -> Self {
        Self {
            name,
            id,
            status: ActivationStatus::Error,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_status_labels() {
        assert_eq!(ActivationStatus::Activated.to_string(), "activated");
        assert_eq!(ActivationStatus::AlreadyActive.to_string(), "already active");
        assert_eq!(ActivationStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_auth_check_constructors() {
        assert!(AuthCheck::granted().authenticated);
        let denied = AuthCheck::denied();
        assert!(!denied.authenticated);
        assert!(denied.error.is_some());
    }

    #[test]
    fn test_import_outcome_success_flag() {
        let failure = ImportOutcome::failure("a.json".into(), None, "boom".into());
        assert!(!failure.is_success());
        assert_eq!(failure.name, None);
    }
}
