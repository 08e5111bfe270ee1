// Activity log endpoint (`/api/v7/...`). Read-only.

use crate::client::SamClient;
use crate::error::Error;
use crate::models::LogRecord;

impl SamClient {
    /// `GET /api/v7/logs/get`
    pub async fn list_logs(&self) -> Result<Vec<LogRecord>, Error> {
        let url = self.api_url("api/v7/logs/get")?;
        self.get(url).await?.into_data()
    }
}
