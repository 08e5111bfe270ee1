// User-device permission endpoints (`/api/v9/user-device/...`)
//
// A permission is a (user id, device id) pair keyed by the numeric record
// ids of both sides. Grants and revocations take a list of device ids so
// one request covers one user and many devices.

use serde_json::json;
use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{Ack, DeviceRecord};

impl SamClient {
    /// Grant a user access to one or more devices.
    ///
    /// `POST /api/v9/user-device/assign` with `{"userId": N, "deviceId": [..]}`
    pub async fn assign_devices(&self, user_id: i64, device_ids: &[i64]) -> Result<Ack, Error> {
        let url = self.api_url("api/v9/user-device/assign")?;
        debug!(user_id, ?device_ids, "assigning devices");
        let envelope = self
            .post::<serde_json::Value>(
                url,
                &json!({ "userId": user_id, "deviceId": device_ids }),
            )
            .await?;
        Ok(envelope.into_ack())
    }

    /// Revoke a user's access to one or more devices.
    ///
    /// `DELETE /api/v9/user-device/delete` with `{"userId": N, "deviceId": [..]}`
    pub async fn revoke_devices(&self, user_id: i64, device_ids: &[i64]) -> Result<Ack, Error> {
        let url = self.api_url("api/v9/user-device/delete")?;
        debug!(user_id, ?device_ids, "revoking devices");
        let envelope = self
            .delete_with_body::<serde_json::Value>(
                url,
                &json!({ "userId": user_id, "deviceId": device_ids }),
            )
            .await?;
        Ok(envelope.into_ack())
    }

    /// Devices a given user has been granted.
    ///
    /// `GET /api/v9/user-device/get/device/{userId}`
    pub async fn devices_for_user(&self, user_id: i64) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url_with("api/v9/user-device/get/device", &user_id.to_string())?;
        self.get(url).await?.into_data()
    }

    /// Devices the authenticated user may access.
    ///
    /// `GET /api/v9/user-device/get/accessible/device`
    pub async fn accessible_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("api/v9/user-device/get/accessible/device")?;
        self.get(url).await?.into_data()
    }
}
