// Alert recipient endpoints (`/api/v6/...`)

use serde_json::json;
use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{Ack, EmailRecord};

impl SamClient {
    /// `GET /api/v6/emails/get`
    pub async fn list_emails(&self) -> Result<Vec<EmailRecord>, Error> {
        let url = self.api_url("api/v6/emails/get")?;
        self.get(url).await?.into_data()
    }

    /// `POST /api/v6/email/create`
    pub async fn create_email(&self, email_name: &str) -> Result<Ack, Error> {
        let url = self.api_url("api/v6/email/create")?;
        debug!(email_name, "creating email recipient");
        let envelope = self
            .post::<serde_json::Value>(url, &json!({ "emailName": email_name }))
            .await?;
        Ok(envelope.into_ack())
    }

    /// `PUT /api/v6/email/update/{id}`
    pub async fn update_email(&self, id: i64, email_name: &str) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v6/email/update", &id.to_string())?;
        debug!(id, email_name, "updating email recipient");
        let envelope = self
            .put::<serde_json::Value>(url, &json!({ "emailName": email_name }))
            .await?;
        Ok(envelope.into_ack())
    }

    /// `DELETE /api/v6/email/delete/{id}`
    pub async fn delete_email(&self, id: i64) -> Result<Ack, Error> {
        let url = self.api_url_with("api/v6/email/delete", &id.to_string())?;
        debug!(id, "deleting email recipient");
        let envelope = self.delete::<serde_json::Value>(url).await?;
        Ok(envelope.into_ack())
    }
}
