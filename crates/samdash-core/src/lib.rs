//! Reactive data layer between `samdash-api` and UI consumers (CLI / TUI).
//!
//! This crate owns the domain model, the client-side cache, and the list
//! logic shared by every dashboard screen:
//!
//! - **[`Controller`]**: facade over one SAM backend. [`login()`](Controller::login)
//!   and [`restore_session()`](Controller::restore_session) establish a
//!   [`Session`]; [`refresh()`](Controller::refresh) re-fetches a list and
//!   [`execute()`](Controller::execute) runs a [`Command`] followed by a
//!   re-fetch. [`Controller::oneshot()`](Controller::oneshot) serves single
//!   CLI invocations.
//!
//! - **[`DataStore`]**: per-list `EntityCollection<T>` snapshots plus a
//!   [`FetchState`] (loading / error / success) for each [`EntityKind`].
//!
//! - **[`list`]**: entity-agnostic filter, sort, and pagination over a
//!   snapshot via [`ListQuery`].
//!
//! - **[`export`]**: telemetry spreadsheet export.

pub mod command;
pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod export;
pub mod list;
pub mod model;
pub mod selection;
pub mod session;
pub mod store;
pub mod stream;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::requests::*;
pub use command::{Command, CommandResult};
pub use config::{ControllerConfig, TlsVerification};
pub use controller::Controller;
pub use error::CoreError;
pub use list::{ListPage, ListQuery, Listable, SortDirection, SortKey};
pub use selection::Selection;
pub use session::{Session, SessionStore};
pub use store::{DataStore, FetchState};
pub use stream::{EntityStream, Snapshot};

pub use model::{
    CategoryFilter, Credential, Device, EmailRecipient, EntityKind, Location, LogEntry,
    SpeedCategory, TelemetryQuery, TelemetryRecord, User,
};
