// SAM backend response types
//
// Every response is wrapped in the `Envelope<T>` shape. Records are
// validated here: a missing required field or an unparseable timestamp
// fails deserialization and surfaces as `Error::MalformedPayload` instead of
// being defaulted away. Passwords are accepted on request bodies only and
// never modelled on the response side.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;

// ── Response Envelope ────────────────────────────────────────────────

/// Standard SAM backend envelope.
///
/// ```json
/// { "status": true, "message": "optional", "data": ... }
/// ```
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub status: Option<EnvelopeStatus>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// The backend is inconsistent about how it encodes `status`: booleans,
/// HTTP-like numeric codes and `"success"`/`"error"` strings all occur.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeStatus {
    Flag(bool),
    Code(i64),
    Text(String),
}

impl EnvelopeStatus {
    /// Whether this status marks a successful response.
    pub fn is_ok(&self) -> bool {
        match self {
            Self::Flag(ok) => *ok,
            Self::Code(code) => (200..300).contains(code),
            Self::Text(text) => !matches!(
                text.to_ascii_lowercase().as_str(),
                "error" | "fail" | "failed" | "failure" | "false"
            ),
        }
    }
}

impl<T> Envelope<T> {
    /// Whether the envelope reports success. A missing `status` counts as
    /// success; the HTTP status has already been checked by then.
    pub fn is_ok(&self) -> bool {
        self.status.as_ref().is_none_or(EnvelopeStatus::is_ok)
    }

    /// Take the `data` payload, failing if the backend omitted it.
    pub fn into_data(self) -> Result<T, Error> {
        self.data.ok_or_else(|| Error::MalformedPayload {
            message: "response envelope has no `data` field".into(),
            body: String::new(),
        })
    }

    /// Convert a successful mutation response into an [`Ack`].
    pub fn into_ack(self) -> Ack {
        Ack {
            message: self.message,
        }
    }
}

/// Acknowledgement for mutations whose `data` is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

// ── Users ────────────────────────────────────────────────────────────

/// Access level attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialLevel {
    #[serde(alias = "admin", alias = "ADMIN")]
    Admin,
    #[serde(alias = "operator", alias = "OPERATOR")]
    Operator,
    #[serde(alias = "guest", alias = "GUEST")]
    Guest,
    #[serde(alias = "superadmin", alias = "SUPERADMIN", alias = "SuperAdmin")]
    Superadmin,
}

/// User account from `GET /api/v1/getAll/user` and `GET /api/v1/current/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub credential: Option<CredentialLevel>,
}

/// Payload of a successful `POST /api/v1/login/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<UserRecord>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// SAM unit record from `GET /api/v2/getAll/device`.
///
/// `cameraPassword` is ignored on read even if the backend echoes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    #[serde(default)]
    pub device_id: Option<String>,
    pub sam_id: String,
    #[serde(default, rename = "deviceIP")]
    pub device_ip: Option<String>,
    #[serde(default)]
    pub device_username: Option<String>,
    #[serde(default)]
    pub device_root_folder: Option<String>,
    #[serde(default, rename = "cameraIP")]
    pub camera_ip: Option<String>,
    #[serde(default)]
    pub camera_username: Option<String>,
    #[serde(default)]
    pub camera_root_folder: Option<String>,
    #[serde(default)]
    pub camera_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

// ── Locations / Emails ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    pub email_name: String,
}

// ── Logs ─────────────────────────────────────────────────────────────

/// Activity/violation log entry from `GET /api/v7/logs/get`. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

// ── Telemetry ────────────────────────────────────────────────────────

/// Speed reading from `GET /api/v3/filter/data/{samId}` or `/api/v3/all/data/{samId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryRecord {
    #[serde(deserialize_with = "numeric_id")]
    pub id: i64,
    pub speed: f64,
    #[serde(default)]
    pub category: Option<String>,
    pub sam_id: String,
    #[serde(deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Query string for `GET /api/v3/filter/data/{samId}`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

// ── Field decoders ───────────────────────────────────────────────────

/// Accept ids encoded either as JSON numbers or as numeric strings.
fn numeric_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid numeric id: {s:?}"))),
    }
}

/// Parse a backend timestamp: RFC 3339 first, then `YYYY-MM-DD HH:MM:SS` as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

fn timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw:?}")))
}

fn optional_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_variants() {
        assert!(EnvelopeStatus::Flag(true).is_ok());
        assert!(!EnvelopeStatus::Flag(false).is_ok());
        assert!(EnvelopeStatus::Code(200).is_ok());
        assert!(!EnvelopeStatus::Code(500).is_ok());
        assert!(EnvelopeStatus::Text("success".into()).is_ok());
        assert!(!EnvelopeStatus::Text("Error".into()).is_ok());
    }

    #[test]
    fn timestamps_in_both_formats() {
        let a = parse_timestamp("2024-06-15T10:30:00Z");
        let b = parse_timestamp("2024-06-15 10:30:00");
        assert!(a.is_some());
        assert_eq!(a, b);
        assert!(parse_timestamp("15/06/2024").is_none());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn ids_accept_numeric_strings() {
        let loc: LocationRecord =
            serde_json::from_str(r#"{"id": "42", "location": "Gate-A"}"#).unwrap();
        assert_eq!(loc.id, 42);

        let bad = serde_json::from_str::<LocationRecord>(r#"{"id": "x1", "location": "Gate-A"}"#);
        assert!(bad.is_err());
    }
}
