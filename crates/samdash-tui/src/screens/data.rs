//! Telemetry: query one unit's speed readings and export them to a workbook.

use std::sync::Arc;

use chrono::NaiveDate;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph},
};

use samdash_core::{CategoryFilter, CoreError, EntityKind, TelemetryQuery, TelemetryRecord};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{Form, FormEvent};
use crate::widgets::list_view::ListView;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_speed(form: &Form, key: &str, label: &str) -> Result<Option<f64>, CoreError> {
    form.optional(key)
        .map(|raw| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .ok_or_else(|| CoreError::validation(format!("{label} must be a number")))
        })
        .transpose()
}

fn parse_date(form: &Form, key: &str, label: &str) -> Result<Option<NaiveDate>, CoreError> {
    form.optional(key)
        .map(|raw| {
            NaiveDate::parse_from_str(&raw, DATE_FORMAT)
                .map_err(|_| CoreError::validation(format!("{label} must be YYYY-MM-DD")))
        })
        .transpose()
}

/// Build and validate a query from the filter form.
pub(crate) fn query_from_form(form: &Form) -> Result<TelemetryQuery, CoreError> {
    let over_speed = match form.value("over_speed").trim().to_ascii_lowercase().as_str() {
        "" | "n" | "no" => false,
        "y" | "yes" => true,
        other => {
            return Err(CoreError::validation(format!(
                "Over speed only must be y or n, not '{other}'"
            )));
        }
    };
    let query = TelemetryQuery {
        sam_id: form.value("sam_id").trim().to_owned(),
        min_speed: parse_speed(form, "min_speed", "Minimum speed")?,
        max_speed: parse_speed(form, "max_speed", "Maximum speed")?,
        start_date: parse_date(form, "from", "From date")?,
        end_date: parse_date(form, "to", "To date")?,
        category: if over_speed {
            CategoryFilter::OverSpeed
        } else {
            CategoryFilter::All
        },
    };
    query.validate()?;
    Ok(query)
}

fn query_form(query: &TelemetryQuery) -> Form {
    let number = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    let date = |d: Option<NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    Form::new("Telemetry filter")
        .text("sam_id", "SAM ID", &query.sam_id)
        .text("min_speed", "Min speed", &number(query.min_speed))
        .text("max_speed", "Max speed", &number(query.max_speed))
        .text("from", "From", &date(query.start_date))
        .text("to", "To", &date(query.end_date))
        .text(
            "over_speed",
            "Over speed only",
            if query.category == CategoryFilter::OverSpeed {
                "y"
            } else {
                "n"
            },
        )
        .hint("blank fields are not filtered · dates YYYY-MM-DD · Enter runs")
}

pub struct DataScreen {
    readings: ListView<TelemetryRecord>,
    /// Last submitted query, or the starting point for the next one.
    query: TelemetryQuery,
    submitted: bool,
    form: Option<Form>,
    focused: bool,
}

impl DataScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            readings: ListView::new(page_size),
            query: TelemetryQuery::default(),
            submitted: false,
            form: None,
            focused: false,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let mut form = self.form.take()?;
        match form.handle_key(key) {
            FormEvent::Cancel => None,
            FormEvent::Editing => {
                self.form = Some(form);
                None
            }
            FormEvent::Submit => match query_from_form(&form) {
                Ok(query) => {
                    self.query = query.clone();
                    self.submitted = true;
                    Some(Action::QueryTelemetry(query))
                }
                Err(e) => {
                    self.form = Some(form);
                    Some(Action::Notify(Notification::warning(e.to_string())))
                }
            },
        }
    }

    fn summary(&self) -> String {
        if !self.submitted {
            return "press f to choose a unit and filters".into();
        }
        let q = &self.query;
        let mut parts = vec![q.sam_id.clone()];
        match (q.min_speed, q.max_speed) {
            (Some(min), Some(max)) => parts.push(format!("{min}–{max}")),
            (Some(min), None) => parts.push(format!("≥ {min}")),
            (None, Some(max)) => parts.push(format!("≤ {max}")),
            (None, None) => {}
        }
        if q.start_date.is_some() || q.end_date.is_some() {
            let fmt = |d: Option<NaiveDate>| {
                d.map_or_else(|| "…".to_owned(), |d| d.format(DATE_FORMAT).to_string())
            };
            parts.push(format!("{} → {}", fmt(q.start_date), fmt(q.end_date)));
        }
        if q.category == CategoryFilter::OverSpeed {
            parts.push("over speed only".into());
        }
        parts.join(" · ")
    }
}

impl Component for DataScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.form.is_some() {
            return Ok(self.handle_form_key(key));
        }
        if self.readings.is_filtering() {
            self.readings.handle_key(key);
            return Ok(None);
        }
        match key.code {
            KeyCode::Char('f') => {
                self.form = Some(query_form(&self.query));
                Ok(None)
            }
            KeyCode::Char('x') => Ok(Some(Action::ExportTelemetry)),
            KeyCode::Char('R') if self.submitted => {
                Ok(Some(Action::QueryTelemetry(self.query.clone())))
            }
            KeyCode::Char(' ') => Ok(None),
            _ => {
                self.readings.handle_key(key);
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::TelemetryUpdated(records) => self.readings.set_records(Arc::clone(records)),
            Action::DevicesUpdated(devices) if self.query.sam_id.is_empty() => {
                if let Some(first) = devices.first() {
                    self.query.sam_id.clone_from(&first.sam_id);
                }
            }
            Action::FetchStateChanged(EntityKind::Telemetry, state) => {
                self.readings.set_loading(state.loading);
            }
            Action::Tick => self.readings.tick(),
            Action::LoggedOut => {
                self.form = None;
                self.submitted = false;
                self.query = TelemetryQuery::default();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [summary, table, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Query: ", theme::key_hint_key()),
                Span::styled(self.summary(), theme::table_row()),
            ])),
            summary,
        );

        self.readings.render(
            frame,
            table,
            "Telemetry",
            self.focused,
            &[
                ("ID", Constraint::Length(8)),
                ("SAM ID", Constraint::Length(12)),
                ("Time", Constraint::Length(19)),
                ("Speed", Constraint::Length(8)),
                ("Category", Constraint::Min(10)),
            ],
            |r| {
                let style = theme::over_speed(r.is_over_speed());
                vec![
                    Cell::from(r.id.to_string()),
                    Cell::from(r.sam_id.clone()),
                    Cell::from(r.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
                    Cell::from(Span::styled(format!("{:.1}", r.speed), style)),
                    Cell::from(Span::styled(r.category.to_string(), style)),
                ]
            },
        );

        let spans = [
            ("f ", "filter  "),
            ("x ", "export xlsx  "),
            ("R ", "re-run  "),
            ("[/] ", "page  "),
            ("s/r ", "sort"),
        ]
        .into_iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(key, theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ]
        });
        frame.render_widget(
            Paragraph::new(Line::from(
                std::iter::once(Span::raw(" ")).chain(spans).collect::<Vec<_>>(),
            )),
            hints,
        );

        if let Some(form) = &self.form {
            form.render(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.form.is_some() || self.readings.is_filtering()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Fill the form fields in order: SAM ID, min, max, from, to, over speed.
    fn form(values: [&str; 6]) -> Form {
        let mut form = query_form(&TelemetryQuery::default());
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                form.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
            }
            form.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
            for c in value.chars() {
                form.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
            }
        }
        form
    }

    #[test]
    fn blank_filters_query_everything() {
        let query = query_from_form(&form(["SAM-01", "", "", "", "", ""])).unwrap();
        assert_eq!(query, TelemetryQuery::all("SAM-01"));
        assert!(query.is_unfiltered());
    }

    #[test]
    fn full_form_maps_every_filter() {
        let query = query_from_form(&form([
            "SAM-01",
            "40",
            "120.5",
            "2024-03-01",
            "2024-03-31",
            "y",
        ]))
        .unwrap();
        assert_eq!(query.min_speed, Some(40.0));
        assert_eq!(query.max_speed, Some(120.5));
        assert_eq!(query.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(query.end_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(query.category, CategoryFilter::OverSpeed);
    }

    #[test]
    fn malformed_values_are_reported() {
        let err = query_from_form(&form(["SAM-01", "fast", "", "", "", ""])).unwrap_err();
        assert_eq!(err.to_string(), "Minimum speed must be a number");

        let err = query_from_form(&form(["SAM-01", "", "", "03/01/2024", "", ""])).unwrap_err();
        assert_eq!(err.to_string(), "From date must be YYYY-MM-DD");

        let err = query_from_form(&form(["SAM-01", "", "", "", "", "maybe"])).unwrap_err();
        assert!(err.to_string().contains("y or n"));
    }

    #[test]
    fn inverted_ranges_fail_validation() {
        let err = query_from_form(&form(["SAM-01", "90", "30", "", "", ""])).unwrap_err();
        assert_eq!(err.to_string(), "Minimum speed must not exceed maximum speed");

        let err =
            query_from_form(&form(["SAM-01", "", "", "2024-04-02", "2024-04-01", ""])).unwrap_err();
        assert_eq!(err.to_string(), "Start date must not be after end date");
    }

    #[test]
    fn missing_unit_is_required() {
        let err = query_from_form(&form(["", "", "", "", "", ""])).unwrap_err();
        assert_eq!(err.to_string(), "SAM ID is required");
    }

    #[test]
    fn submit_sends_the_query_and_remembers_it() {
        let mut screen = DataScreen::new(10);
        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::NONE))
            .unwrap();
        for c in "SAM-07".chars() {
            screen
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        match action {
            Some(Action::QueryTelemetry(q)) => assert_eq!(q.sam_id, "SAM-07"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!screen.captures_input());
        assert!(screen.summary().starts_with("SAM-07"));
    }
}
