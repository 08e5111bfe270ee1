// ── Runtime connection configuration ──
//
// These types describe *how* to reach the SAM backend. The CLI/TUI
// constructs a `ControllerConfig` (usually from a config profile) and hands
// it in; core never reads config files itself.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed backends on a private network).
    DangerAcceptInvalid,
}

/// Configuration for talking to one SAM backend.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Backend root URL (e.g. `http://10.0.0.5:8080`).
    pub url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Where the `{token, user}` session is persisted between runs.
    /// `None` keeps the session in memory only.
    pub session_path: Option<PathBuf>,
}

impl ControllerConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            session_path: None,
        }
    }
}
