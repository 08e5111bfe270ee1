// Location endpoints (`/api/v8/...`)

use serde_json::json;
use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{Ack, LocationRecord};

impl SamClient {
    /// List installation sites.
    ///
    /// `GET /api/v8/location/get`
    pub async fn list_locations(&self) -> Result<Vec<LocationRecord>, Error> {
        let url = self.api_url("api/v8/location/get")?;
        self.get(url).await?.into_data()
    }

    /// `POST /api/v8/location/create`
    pub async fn create_location(&self, name: &str) -> Result<Ack, Error> {
        let url = self.api_url("api/v8/location/create")?;
        debug!(name, "creating location");
        let envelope = self
            .post::<serde_json::Value>(url, &json!({ "location": name }))
            .await?;
        Ok(envelope.into_ack())
    }

    /// `PUT /api/v8/location/update/{id}`
    pub async fn update_location(&self, id: i64, name: &str) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v8/location/update", &id.to_string())?;
        debug!(id, name, "renaming location");
        let envelope = self
            .put::<serde_json::Value>(url, &json!({ "location": name }))
            .await?;
        Ok(envelope.into_ack())
    }

    /// `DELETE /api/v8/location/delete/{id}`
    pub async fn delete_location(&self, id: i64) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v8/location/delete", &id.to_string())?;
        debug!(id, "deleting location");
        let envelope = self.delete::<serde_json::Value>(url).await?;
        Ok(envelope.into_ack())
    }
}
