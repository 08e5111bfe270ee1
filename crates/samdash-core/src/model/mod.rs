// ── Domain model ──
//
// Canonical types for every entity the dashboard manages. Wire records
// from `samdash_api` are converted into these in `crate::convert`.
// Passwords are not part of any domain type.

pub mod device;
pub mod directory;
pub mod log;
pub mod telemetry;
pub mod user;

pub use device::Device;
pub use directory::{EmailRecipient, Location};
pub use log::LogEntry;
pub use telemetry::{CategoryFilter, SpeedCategory, TelemetryQuery, TelemetryRecord};
pub use user::{Credential, User};

/// Which list a fetch-state or refresh refers to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Users,
    Devices,
    Locations,
    Emails,
    Logs,
    /// Devices granted to one selected user.
    Permissions,
    /// Devices the logged-in user may access.
    AccessibleDevices,
    Telemetry,
}
