//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use samdash_config::ConfigError;
use samdash_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the SAM backend at {url}")]
    #[diagnostic(
        code(samdash::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Self-signed certificate? Retry with --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(samdash::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(samdash::auth_failed),
        help("Check the username and password, then run: samdash login")
    )]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(samdash::not_logged_in),
        help("Run: samdash login [USERNAME]")
    )]
    NotLoggedIn,

    #[error("Permission denied: {message}")]
    #[diagnostic(
        code(samdash::permission_denied),
        help("Ask an administrator for a higher credential level.")
    )]
    PermissionDenied { message: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(samdash::no_credentials),
        help(
            "Store one with: samdash config set-password --profile {profile}\n\
             Or set the SAMDASH_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(samdash::not_found),
        help("Run: samdash {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(
        code(samdash::partial_delete),
        help("Rows deleted before the failure stay deleted. Fix the failing row and retry.")
    )]
    PartialDelete { message: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(samdash::rejected))]
    Rejected { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(samdash::api_error))]
    ApiError { status: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(samdash::validation))]
    Validation { field: String, reason: String },

    #[error("No telemetry records match the query")]
    #[diagnostic(
        code(samdash::nothing_to_export),
        help("Widen the filter (speed range, dates, category) and try again.")
    )]
    NothingToExport,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(samdash::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: samdash config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(samdash::no_config),
        help(
            "Create one with: samdash config init\n\
             Or pass --url.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(samdash::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(samdash::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Local failures ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(samdash::local))]
    Local { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } | Self::PartialDelete { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::NothingToExport => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::NotAuthenticated => CliError::NotLoggedIn,

            CoreError::Forbidden { message } => CliError::PermissionDenied { message },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            err @ CoreError::PartialDelete { .. } => CliError::PartialDelete {
                message: err.to_string(),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Api { message, status } => CliError::ApiError {
                status: status.to_string(),
                message,
            },

            CoreError::MalformedResponse { message } => CliError::ApiError {
                status: "malformed".into(),
                message,
            },

            CoreError::NothingToExport => CliError::NothingToExport,

            CoreError::Session { message }
            | CoreError::Export { message }
            | CoreError::Config { message }
            | CoreError::Internal(message) => CliError::Local { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
