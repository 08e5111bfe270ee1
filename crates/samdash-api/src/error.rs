use thiserror::Error;

/// Top-level error type for the `samdash-api` crate.
///
/// Covers every failure mode of the SAM backend client: authentication,
/// transport, server-reported failures, and payloads that do not match the
/// expected schema. `samdash-core` maps these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login rejected, or the bearer token is missing/expired (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// The authenticated user lacks the credential for this operation (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Failure reported by the backend, either through a non-success HTTP
    /// status or a failed `status` flag inside the `{status, message, data}`
    /// envelope.
    #[error("API error: {message}")]
    Api { message: String, status: Option<u16> },

    // ── Data ────────────────────────────────────────────────────────
    /// The response body did not match the expected schema.
    #[error("Malformed payload: {message}")]
    MalformedPayload { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and logging in again might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
