//! Activity log viewer. Read-only for every credential.

use std::sync::Arc;

use ratatui::{layout::Constraint, widgets::Cell};

use samdash_core::{EntityKind, LogEntry};

use super::entity::EntityTable;
use crate::action::Action;

impl EntityTable for LogEntry {
    const TITLE: &'static str = "Logs";
    const KIND: EntityKind = EntityKind::Logs;
    const NOUNS: (&'static str, &'static str) = ("log entry", "log entries");

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(6)),
            ("Time", Constraint::Length(19)),
            ("Activity", Constraint::Min(24)),
            ("Speed", Constraint::Length(8)),
            ("File", Constraint::Min(16)),
        ]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.id.to_string()),
            Cell::from(
                self.created_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default(),
            ),
            Cell::from(self.activity.clone().unwrap_or_default()),
            Cell::from(self.speed.map(|s| format!("{s:.1}")).unwrap_or_default()),
            Cell::from(self.filename.clone().unwrap_or_default()),
        ]
    }

    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>> {
        match action {
            Action::LogsUpdated(logs) => Some(logs),
            _ => None,
        }
    }
}
