//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use secrecy::SecretString;

use samdash_core::{
    Command, Credential, Device, EmailRecipient, EntityKind, FetchState, Location, LogEntry,
    TelemetryQuery, TelemetryRecord, User,
};

use crate::screen::ScreenId;

/// Banner severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient banner shown above the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Session ───────────────────────────────────────────────────
    Login {
        username: String,
        password: SecretString,
    },
    LoginFailed(String),
    /// A session was created or restored; carries the signed-in account.
    SessionStarted(Arc<User>),
    /// Restore finished without a usable session.
    SessionMissing,
    Logout,
    LoggedOut,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    /// Credential of the signed-in account, broadcast to every screen.
    CredentialChanged(Credential),

    // ── Data events (from the data bridge) ────────────────────────
    UsersUpdated(Arc<Vec<Arc<User>>>),
    DevicesUpdated(Arc<Vec<Arc<Device>>>),
    LocationsUpdated(Arc<Vec<Arc<Location>>>),
    EmailsUpdated(Arc<Vec<Arc<EmailRecipient>>>),
    LogsUpdated(Arc<Vec<Arc<LogEntry>>>),
    PermissionsUpdated(Arc<Vec<Arc<Device>>>),
    TelemetryUpdated(Arc<Vec<Arc<TelemetryRecord>>>),
    FetchStateChanged(EntityKind, FetchState),

    // ── Requests ──────────────────────────────────────────────────
    Refresh(EntityKind),
    LoadPermissions(i64),
    Execute(Command),
    /// A mutation (and its re-fetch) finished. `error` is set when it failed.
    CommandFinished {
        kind: EntityKind,
        error: Option<String>,
    },
    QueryTelemetry(TelemetryQuery),
    ExportTelemetry,

    // ── Help ──────────────────────────────────────────────────────
    ToggleHelp,

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
