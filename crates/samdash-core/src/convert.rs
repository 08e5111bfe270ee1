// ── API-to-domain type conversions ──
//
// Bridges `samdash_api` wire records into canonical `samdash_core::model`
// types. Blank optional strings are normalized to `None`.

use samdash_api::models::{
    CredentialLevel, DeviceRecord, EmailRecord, LocationRecord, LogRecord,
    TelemetryRecord as WireTelemetry, UserRecord,
};

use crate::model::{
    Credential, Device, EmailRecipient, Location, LogEntry, SpeedCategory, TelemetryRecord, User,
};

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

impl From<CredentialLevel> for Credential {
    fn from(level: CredentialLevel) -> Self {
        match level {
            CredentialLevel::Admin => Self::Admin,
            CredentialLevel::Operator => Self::Operator,
            CredentialLevel::Guest => Self::Guest,
            CredentialLevel::Superadmin => Self::Superadmin,
        }
    }
}

impl From<Credential> for CredentialLevel {
    fn from(credential: Credential) -> Self {
        match credential {
            Credential::Admin => Self::Admin,
            Credential::Operator => Self::Operator,
            Credential::Guest => Self::Guest,
            Credential::Superadmin => Self::Superadmin,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            user_id: non_blank(r.user_id),
            username: r.username,
            credential: r.credential.map(Credential::from),
        }
    }
}

impl From<DeviceRecord> for Device {
    fn from(r: DeviceRecord) -> Self {
        Self {
            id: r.id,
            device_id: non_blank(r.device_id),
            sam_id: r.sam_id,
            device_ip: non_blank(r.device_ip),
            device_username: non_blank(r.device_username),
            device_root_folder: non_blank(r.device_root_folder),
            camera_ip: non_blank(r.camera_ip),
            camera_username: non_blank(r.camera_username),
            camera_root_folder: non_blank(r.camera_root_folder),
            camera_type: non_blank(r.camera_type),
            location: non_blank(r.location),
        }
    }
}

impl From<LocationRecord> for Location {
    fn from(r: LocationRecord) -> Self {
        Self {
            id: r.id,
            name: r.location,
        }
    }
}

impl From<EmailRecord> for EmailRecipient {
    fn from(r: EmailRecord) -> Self {
        Self {
            id: r.id,
            address: r.email_name,
        }
    }
}

impl From<LogRecord> for LogEntry {
    fn from(r: LogRecord) -> Self {
        Self {
            id: r.id,
            filename: non_blank(r.filename),
            activity: non_blank(r.activity),
            speed: r.speed,
            created_at: r.created_at,
        }
    }
}

impl From<WireTelemetry> for TelemetryRecord {
    fn from(r: WireTelemetry) -> Self {
        Self {
            id: r.id,
            speed: r.speed,
            category: SpeedCategory::from_raw(r.category.as_deref()),
            sam_id: r.sam_id,
            created_at: r.created_at,
        }
    }
}

/// Convert a wire list into domain values.
pub(crate) fn convert_all<W, D: From<W>>(records: Vec<W>) -> Vec<D> {
    records.into_iter().map(D::from).collect()
}
