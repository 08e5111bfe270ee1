// ── Telemetry domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::CoreError;
use crate::list::Listable;

/// Classification attached to a speed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SpeedCategory {
    #[strum(serialize = "over speed")]
    OverSpeed,
    #[strum(serialize = "normal")]
    Normal,
}

impl SpeedCategory {
    /// Parse the backend's free-text category. Anything that is not some
    /// spelling of "over speed" is a normal reading.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let normalized: String = raw
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if normalized == "overspeed" {
            Self::OverSpeed
        } else {
            Self::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub id: i64,
    pub speed: f64,
    pub category: SpeedCategory,
    pub sam_id: String,
    pub created_at: DateTime<Utc>,
}

impl TelemetryRecord {
    pub fn is_over_speed(&self) -> bool {
        self.category == SpeedCategory::OverSpeed
    }
}

impl Listable for TelemetryRecord {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        &self.sam_id
    }
}

/// Category narrowing for a telemetry query.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum CategoryFilter {
    #[default]
    #[strum(serialize = "all")]
    All,
    #[strum(serialize = "over speed", serialize = "over-speed", serialize = "overspeed")]
    OverSpeed,
}

/// Telemetry lookup for one unit: speed range, date range and category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryQuery {
    pub sam_id: String,
    pub min_speed: Option<f64>,
    pub max_speed: Option<f64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: CategoryFilter,
}

impl TelemetryQuery {
    /// Everything recorded for `sam_id`.
    pub fn all(sam_id: impl Into<String>) -> Self {
        Self {
            sam_id: sam_id.into(),
            ..Self::default()
        }
    }

    /// `true` when no narrowing is requested and the unfiltered endpoint applies.
    pub fn is_unfiltered(&self) -> bool {
        self.min_speed.is_none()
            && self.max_speed.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.category == CategoryFilter::All
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        crate::validate::require_field("SAM ID", &self.sam_id)?;
        if let (Some(min), Some(max)) = (self.min_speed, self.max_speed) {
            if min > max {
                return Err(CoreError::validation(
                    "Minimum speed must not exceed maximum speed",
                ));
            }
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(CoreError::validation("Start date must not be after end date"));
            }
        }
        Ok(())
    }

    pub(crate) fn to_filter(&self) -> samdash_api::TelemetryFilter {
        samdash_api::TelemetryFilter {
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            start_date: self.start_date.map(|d| d.format("%Y-%m-%d").to_string()),
            end_date: self.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            category: match self.category {
                CategoryFilter::All => None,
                CategoryFilter::OverSpeed => Some("over speed".into()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_spellings() {
        assert_eq!(SpeedCategory::from_raw(Some("over speed")), SpeedCategory::OverSpeed);
        assert_eq!(SpeedCategory::from_raw(Some("Over_Speed")), SpeedCategory::OverSpeed);
        assert_eq!(SpeedCategory::from_raw(Some("all")), SpeedCategory::Normal);
        assert_eq!(SpeedCategory::from_raw(None), SpeedCategory::Normal);
    }

    #[test]
    fn inverted_ranges_rejected() {
        let query = TelemetryQuery {
            min_speed: Some(90.0),
            max_speed: Some(60.0),
            ..TelemetryQuery::all("SAM-1")
        };
        assert!(query.validate().is_err());

        let query = TelemetryQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 6, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..TelemetryQuery::all("SAM-1")
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn empty_sam_id_rejected() {
        assert!(TelemetryQuery::all("  ").validate().is_err());
        assert!(TelemetryQuery::all("SAM-1").is_unfiltered());
    }
}
