// ── SAM unit domain type ──

use serde::{Deserialize, Serialize};

use crate::list::Listable;

/// A speed-monitoring unit and its attached camera.
///
/// `sam_id` is the human-facing identifier: lists filter on it, telemetry
/// is keyed by it, and the backend deletes devices by it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub device_id: Option<String>,
    pub sam_id: String,
    pub device_ip: Option<String>,
    pub device_username: Option<String>,
    pub device_root_folder: Option<String>,
    pub camera_ip: Option<String>,
    pub camera_username: Option<String>,
    pub camera_root_folder: Option<String>,
    pub camera_type: Option<String>,
    pub location: Option<String>,
}

impl Listable for Device {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        &self.sam_id
    }
}
