// ── Core error types ──
//
// User-facing errors from samdash-core. Consumers never see HTTP status
// codes or JSON parse failures directly: the `From<samdash_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Not logged in -- run `samdash login` first")]
    NotAuthenticated,

    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    #[error("Session storage error: {message}")]
    Session { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    #[error("Backend returned an unexpected payload: {message}")]
    MalformedResponse { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("{message}")]
    ValidationFailed { message: String },

    #[error("Operation rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Deleted {} {entity} before {failed} failed: {reason}", .deleted.len())]
    PartialDelete {
        entity: &'static str,
        deleted: Vec<String>,
        failed: String,
        reason: String,
    },

    #[error("API error (HTTP {status}): {message}")]
    Api { message: String, status: u16 },

    // ── Export errors ────────────────────────────────────────────────
    #[error("No telemetry records to export")]
    NothingToExport,

    #[error("Export failed: {message}")]
    Export { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    /// Returns `true` if logging in again might resolve this error.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. } | Self::NotAuthenticated)
    }

    /// Returns `true` for errors caught before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. } | Self::NothingToExport)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<samdash_api::Error> for CoreError {
    fn from(err: samdash_api::Error) -> Self {
        match err {
            samdash_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            samdash_api::Error::Forbidden { message } => CoreError::Forbidden { message },
            samdash_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map_or(0, |s| s.as_u16()),
                    }
                }
            }
            samdash_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            samdash_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            samdash_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            samdash_api::Error::NotFound { message } => CoreError::NotFound {
                entity_type: "resource".into(),
                identifier: message,
            },
            samdash_api::Error::Api {
                message,
                status: Some(status),
            } => CoreError::Api { message, status },
            samdash_api::Error::Api {
                message,
                status: None,
            } => CoreError::Rejected { message },
            samdash_api::Error::MalformedPayload { message, body: _ } => {
                CoreError::MalformedResponse { message }
            }
        }
    }
}
