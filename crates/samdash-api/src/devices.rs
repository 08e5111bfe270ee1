// SAM unit endpoints (`/api/v2/...`)
//
// Devices are deleted by samId, not by numeric id.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{Ack, DeviceRecord};

/// Body for `POST /api/v2/add/device` and `PUT /api/v2/update/device/{id}`.
///
/// On update, `None` fields are omitted and keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct DeviceFields {
    pub device_id: Option<String>,
    pub sam_id: Option<String>,
    pub device_ip: Option<String>,
    pub device_username: Option<String>,
    pub device_root_folder: Option<String>,
    pub camera_ip: Option<String>,
    pub camera_username: Option<String>,
    pub camera_password: Option<SecretString>,
    pub camera_root_folder: Option<String>,
    pub camera_type: Option<String>,
    pub location: Option<String>,
}

impl DeviceFields {
    fn to_body(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        let plain = [
            ("deviceId", &self.device_id),
            ("samId", &self.sam_id),
            ("deviceIP", &self.device_ip),
            ("deviceUsername", &self.device_username),
            ("deviceRootFolder", &self.device_root_folder),
            ("cameraIP", &self.camera_ip),
            ("cameraUsername", &self.camera_username),
            ("cameraRootFolder", &self.camera_root_folder),
            ("cameraType", &self.camera_type),
            ("location", &self.location),
        ];
        for (key, value) in plain {
            if let Some(v) = value {
                body.insert(key.into(), json!(v));
            }
        }
        if let Some(ref password) = self.camera_password {
            body.insert("cameraPassword".into(), json!(password.expose_secret()));
        }
        serde_json::Value::Object(body)
    }
}

impl SamClient {
    /// Register a new SAM unit.
    ///
    /// `POST /api/v2/add/device`
    pub async fn add_device(&self, fields: &DeviceFields) -> Result<Ack, Error> {
        let url = self.api_url("api/v2/add/device")?;
        debug!(sam_id = ?fields.sam_id, "adding device");
        let envelope = self
            .post::<serde_json::Value>(url, &fields.to_body())
            .await?;
        Ok(envelope.into_ack())
    }

    /// Update a SAM unit.
    ///
    /// `PUT /api/v2/update/device/{id}`
    pub async fn update_device(&self, id: i64, fields: &DeviceFields) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v2/update/device", &id.to_string())?;
        debug!(id, "updating device");
        let envelope = self.put::<serde_json::Value>(url, &fields.to_body()).await?;
        Ok(envelope.into_ack())
    }

    /// Remove a SAM unit.
    ///
    /// `DELETE /api/v2/delete/device/{samId}`
    pub async fn delete_device(&self, sam_id: &str) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v2/delete/device", sam_id)?;
        debug!(sam_id, "deleting device");
        let envelope = self.delete::<serde_json::Value>(url).await?;
        Ok(envelope.into_ack())
    }

    /// List all SAM units.
    ///
    /// `GET /api/v2/getAll/device`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("api/v2/getAll/device")?;
        self.get(url).await?.into_data()
    }

    /// Host system information of the backend. Shape varies by deployment.
    ///
    /// `GET /api/v2/system/info`
    pub async fn system_info(&self) -> Result<serde_json::Value, Error> {
        let url = self.api_url("api/v2/system/info")?;
        self.get(url).await?.into_data()
    }
}
