/// A non-success HTTP response, reduced to what callers can show.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Rejection {
    pub status: u16,
    pub status_text: String,
    /// Server-supplied message: `error` field, else `message` field, else raw body.
    pub message: Option<String>,
}

impl Rejection {
    /// Build a rejection from a response body, extracting the server message.
    #[must_use]
    pub fn from_body(status: u16, status_text: impl Into<String>, body: &str) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            message: extract_server_message(body),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{} {}: {msg}", self.status, self.status_text),
            None => write!(f, "HTTP {} {}", self.status, self.status_text),
        }
    }
}

fn extract_server_message(body: &str) -> Option<String> {
    if body.is_empty() {
        return None;
    }
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };
    field("error")
        .or_else(|| field("message"))
        .or_else(|| Some(body.to_owned()))
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// 401 and the one-shot recovery did not produce a usable session.
    #[error("Authentication required")]
    AuthRequired,

    /// 422 and neither the anonymous retry nor the recovery login succeeded.
    #[error("Stale credentials rejected: {0}")]
    AuthStale(Rejection),

    #[error("{0}")]
    ServerRejected(Rejection),

    /// No response at all: the backend could not be reached.
    #[error("Unable to connect to server. Please check that the backend is running at {api_root}.")]
    Unreachable { api_root: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid JSON response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session store error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected before any network call (empty form fields and similar).
    #[error("{0}")]
    InvalidInput(String),

    #[error("Account not found. Please sign up first.")]
    AccountNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl Error {
    /// Whether this is one of the authentication-class failures.
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::AuthStale(_))
    }
}

/// What a [`Transport`](crate::transport::Transport) reports when no response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Connection refused, DNS failure, host down.
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_error_field() {
        let r = Rejection::from_body(400, "Bad Request", r#"{"error":"Name is required","message":"x"}"#);
        assert_eq!(r.message.as_deref(), Some("Name is required"));
        assert_eq!(r.to_string(), "400 Bad Request: Name is required");
    }

    #[test]
    fn falls_back_to_message_field() {
        let r = Rejection::from_body(409, "Conflict", r#"{"message":"Email already in use"}"#);
        assert_eq!(r.message.as_deref(), Some("Email already in use"));
    }

    #[test]
    fn falls_back_to_raw_body() {
        let r = Rejection::from_body(502, "Bad Gateway", "upstream down");
        assert_eq!(r.to_string(), "502 Bad Gateway: upstream down");
    }

    #[test]
    fn empty_body_has_no_message() {
        let r = Rejection::from_body(500, "Internal Server Error", "");
        assert_eq!(r.message, None);
        assert_eq!(r.to_string(), "HTTP 500 Internal Server Error");
    }

    #[test]
    fn unreachable_message_is_distinct() {
        let unreachable = Error::Unreachable {
            api_root: "http://localhost:3000/api".into(),
        };
        let rejected = Error::ServerRejected(Rejection::from_body(503, "Service Unavailable", ""));
        assert!(unreachable.to_string().starts_with("Unable to connect to server"));
        assert_ne!(unreachable.to_string(), rejected.to_string());
        assert!(!unreachable.is_auth());
    }
}
