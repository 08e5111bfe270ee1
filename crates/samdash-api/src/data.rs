// Telemetry endpoints (`/api/v3/...`)

use tracing::debug;

use crate::client::SamClient;
use crate::error::Error;
use crate::models::{TelemetryFilter, TelemetryRecord};

impl SamClient {
    /// Speed readings for one unit, narrowed by speed range, date range and category.
    ///
    /// `GET /api/v3/filter/data/{samId}?minSpeed&maxSpeed&startDate&endDate&category`
    pub async fn filter_data(
        &self,
        sam_id: &str,
        filter: &TelemetryFilter,
    ) -> Result<Vec<TelemetryRecord>, Error> {
        let url = self.api_url_with("api/v3/filter/data", sam_id)?;
        debug!(sam_id, ?filter, "filtering telemetry");
        self.get_with_query(url, filter).await?.into_data()
    }

    /// Every speed reading recorded for one unit.
    ///
    /// `GET /api/v3/all/data/{samId}`
    pub async fn all_data(&self, sam_id: &str) -> Result<Vec<TelemetryRecord>, Error> {
        let url = self.api_url_with("api/v3/all/data", sam_id)?;
        self.get(url).await?.into_data()
    }
}
