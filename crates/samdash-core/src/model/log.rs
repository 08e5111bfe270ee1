// ── Activity log domain type ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::list::Listable;

/// A read-only activity or violation log line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub filename: Option<String>,
    pub activity: Option<String>,
    pub speed: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl LogEntry {
    /// Text the log list filters and sorts on: the activity, else the filename.
    pub fn summary(&self) -> &str {
        self.activity
            .as_deref()
            .or(self.filename.as_deref())
            .unwrap_or("")
    }
}

impl Listable for LogEntry {
    fn id(&self) -> i64 {
        self.id
    }

    fn display_key(&self) -> &str {
        self.summary()
    }
}
