// samdash-api: Async Rust client for the SAM speed-monitoring fleet backend

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod data;
mod devices;
mod emails;
mod locations;
mod logs;
mod permissions;
mod users;

pub use client::SamClient;
pub use devices::DeviceFields;
pub use error::Error;
pub use models::{
    Ack, CredentialLevel, DeviceRecord, EmailRecord, Envelope, EnvelopeStatus, LocationRecord,
    LogRecord, LoginData, TelemetryFilter, TelemetryRecord, UserRecord,
};
pub use transport::{TlsMode, TransportConfig};
pub use users::{NewUser, UserChanges};
