// ── Command API ──
//
// Every write operation is a `Command` variant. The controller validates
// it, routes it to the matching backend endpoint, then re-fetches the
// affected list.

pub mod requests;

use serde::Serialize;

use crate::error::CoreError;
use crate::model::EntityKind;
use crate::validate::{require_any_selection, require_field, validate_email};

pub use requests::{
    CreateDeviceRequest, RegisterUserRequest, UpdateDeviceRequest, UpdateUserRequest,
};

/// All possible write operations against the SAM backend.
#[derive(Debug, Clone)]
pub enum Command {
    // ── Users ────────────────────────────────────────────────────────
    RegisterUser(RegisterUserRequest),
    UpdateUser {
        id: i64,
        update: UpdateUserRequest,
    },
    DeleteUsers {
        ids: Vec<i64>,
    },

    // ── Devices ──────────────────────────────────────────────────────
    AddDevice(CreateDeviceRequest),
    UpdateDevice {
        id: i64,
        update: UpdateDeviceRequest,
    },
    /// The backend deletes devices by samId.
    DeleteDevices {
        sam_ids: Vec<String>,
    },

    // ── Locations ────────────────────────────────────────────────────
    CreateLocation {
        name: String,
    },
    UpdateLocation {
        id: i64,
        name: String,
    },
    DeleteLocations {
        ids: Vec<i64>,
    },

    // ── Alert recipients ─────────────────────────────────────────────
    CreateEmail {
        address: String,
    },
    UpdateEmail {
        id: i64,
        address: String,
    },
    DeleteEmails {
        ids: Vec<i64>,
    },

    // ── Permissions ──────────────────────────────────────────────────
    AssignDevices {
        user_id: i64,
        device_ids: Vec<i64>,
    },
    RevokeDevices {
        user_id: i64,
        device_ids: Vec<i64>,
    },
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommandResult {
    Ok,
    Deleted { count: usize },
}

impl Command {
    /// The list this command changes and that is re-fetched afterwards.
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::RegisterUser(_) | Self::UpdateUser { .. } | Self::DeleteUsers { .. } => {
                EntityKind::Users
            }
            Self::AddDevice(_) | Self::UpdateDevice { .. } | Self::DeleteDevices { .. } => {
                EntityKind::Devices
            }
            Self::CreateLocation { .. }
            | Self::UpdateLocation { .. }
            | Self::DeleteLocations { .. } => EntityKind::Locations,
            Self::CreateEmail { .. } | Self::UpdateEmail { .. } | Self::DeleteEmails { .. } => {
                EntityKind::Emails
            }
            Self::AssignDevices { .. } | Self::RevokeDevices { .. } => EntityKind::Permissions,
        }
    }

    /// Check preconditions before anything is sent.
    pub fn validate(&self) -> Result<(), CoreError> {
        match self {
            Self::RegisterUser(req) => req.validate(),
            Self::UpdateUser { update, .. } => update.validate(),
            Self::AddDevice(req) => req.validate(),
            Self::UpdateDevice { update, .. } => update.validate(),
            Self::CreateLocation { name } | Self::UpdateLocation { name, .. } => {
                require_field("Location", name)
            }
            Self::CreateEmail { address } | Self::UpdateEmail { address, .. } => {
                validate_email(address)
            }
            Self::DeleteUsers { ids } | Self::DeleteLocations { ids } | Self::DeleteEmails { ids } => {
                require_any_selection(ids.len())
            }
            Self::DeleteDevices { sam_ids } => require_any_selection(sam_ids.len()),
            Self::AssignDevices { device_ids, .. } | Self::RevokeDevices { device_ids, .. } => {
                require_any_selection(device_ids.len())
            }
        }
    }

    /// Message shown once the command and the follow-up re-fetch succeed.
    pub fn success_message(&self) -> String {
        match self {
            Self::RegisterUser(req) => format!("User '{}' registered", req.username.trim()),
            Self::UpdateUser { .. } => "User updated".into(),
            Self::DeleteUsers { ids } => plural(ids.len(), "user", "deleted"),
            Self::AddDevice(req) => format!("Device '{}' added", req.sam_id.trim()),
            Self::UpdateDevice { .. } => "Device updated".into(),
            Self::DeleteDevices { sam_ids } => plural(sam_ids.len(), "device", "deleted"),
            Self::CreateLocation { name } => format!("Location '{}' created", name.trim()),
            Self::UpdateLocation { name, .. } => format!("Location renamed to '{}'", name.trim()),
            Self::DeleteLocations { ids } => plural(ids.len(), "location", "deleted"),
            Self::CreateEmail { address } => format!("Recipient '{}' added", address.trim()),
            Self::UpdateEmail { .. } => "Recipient updated".into(),
            Self::DeleteEmails { ids } => plural(ids.len(), "recipient", "deleted"),
            Self::AssignDevices { device_ids, .. } => {
                plural(device_ids.len(), "device", "granted")
            }
            Self::RevokeDevices { device_ids, .. } => {
                plural(device_ids.len(), "device", "revoked")
            }
        }
    }
}

pub(crate) fn plural(count: usize, noun: &str, verb: &str) -> String {
    if count == 1 {
        format!("1 {noun} {verb}")
    } else {
        format!("{count} {noun}s {verb}")
    }
}
