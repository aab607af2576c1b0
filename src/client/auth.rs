//! Credentials for the n8n public API.
//!
//! n8n accepts an API key (the `X-N8N-API-KEY` header) and/or a browser
//! session cookie. Unlike most APIs the two are not mutually exclusive,
//! so this is a pair of optionals rather than an enum of schemes.

/// Authentication material attached to every request.
#[derive(Clone, Default)]
pub struct Credentials {
    /// API key sent as the `X-N8N-API-KEY` header
    pub api_key: Option<String>,
    /// Raw session cookie string sent as the `Cookie` header
    pub session_cookie: Option<String>,
}

impl Credentials {
    pub fn new(api_key: Option<String>, session_cookie: Option<String>) -> Self {
        Self {
            api_key,
            session_cookie,
        }
    }

    /// True when neither credential is set. Requests still go out; the
    /// server decides whether anonymous access is allowed.
    pub fn is_anonymous(&self) -> bool {
        self.api_key.is_none() && self.session_cookie.is_none()
    }
}

impl std::fmt::Display for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.api_key, &self.session_cookie) {
            (Some(_), Some(_)) => write!(f, "ApiKey+Cookie"),
            (Some(_), None) => write!(f, "ApiKey"),
            (None, Some(_)) => write!(f, "Cookie"),
            (None, None) => write!(f, "None"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous() {
        assert!(Credentials::default().is_anonymous());
        assert!(!Credentials::new(Some("key".into()), None).is_anonymous());
        assert!(!Credentials::new(None, Some("n8n-auth=abc".into())).is_anonymous());
    }

    #[test]
    fn test_display_redacts_secrets() {
        let credentials = Credentials::new(Some("super-secret".into()), None);
        let shown = credentials.to_string();
        assert_eq!(shown, "ApiKey");
        assert!(!shown.contains("super-secret"));

        let both = Credentials::new(Some("k".into()), Some("c".into()));
        assert_eq!(both.to_string(), "ApiKey+Cookie");
    }
}
