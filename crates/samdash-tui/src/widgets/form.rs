//! Modal form: a stack of labelled text inputs with one focused at a time.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use secrecy::SecretString;
use tui_input::Input;

use crate::theme;

/// Outcome of a key press inside a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    Submit,
    Cancel,
    Editing,
}

#[derive(Debug, Clone)]
struct Field {
    key: &'static str,
    label: &'static str,
    input: Input,
    secret: bool,
}

#[derive(Debug, Clone)]
pub struct Form {
    title: String,
    fields: Vec<Field>,
    focus: usize,
    hint: Option<String>,
    saving: bool,
    error: Option<String>,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
            hint: None,
            saving: false,
            error: None,
        }
    }

    #[must_use]
    pub fn text(mut self, key: &'static str, label: &'static str, initial: &str) -> Self {
        self.fields.push(Field {
            key,
            label,
            input: Input::new(initial.to_owned()),
            secret: false,
        });
        self
    }

    /// A masked field. Always starts empty.
    #[must_use]
    pub fn secret(mut self, key: &'static str, label: &'static str) -> Self {
        self.fields.push(Field {
            key,
            label,
            input: Input::default(),
            secret: true,
        });
        self
    }

    /// A muted line shown under the fields.
    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Shows "Saving…" in place of the hint while a submit is in flight.
    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
        if saving {
            self.error = None;
        }
    }

    /// Why the last submit was rejected. Cleared by the next submit.
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.saving = false;
        self.error = Some(error.into());
    }

    /// Raw value of `key`; empty for unknown keys.
    pub fn value(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map_or("", |f| f.input.value())
    }

    /// Trimmed value of `key`, or `None` if blank.
    pub fn optional(&self, key: &str) -> Option<String> {
        let v = self.value(key).trim();
        (!v.is_empty()).then(|| v.to_owned())
    }

    /// A secret field's value, or `None` if left blank.
    pub fn secret_value(&self, key: &str) -> Option<SecretString> {
        let v = self.value(key);
        (!v.is_empty()).then(|| SecretString::from(v.to_owned()))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Esc => FormEvent::Cancel,
            KeyCode::Enter => FormEvent::Submit,
            KeyCode::Tab | KeyCode::Down => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + 1) % self.fields.len();
                }
                FormEvent::Editing
            }
            KeyCode::BackTab | KeyCode::Up => {
                if !self.fields.is_empty() {
                    self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
                }
                FormEvent::Editing
            }
            _ => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    super::input::edit(&mut field.input, key);
                }
                FormEvent::Editing
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let label_width = self
            .fields
            .iter()
            .map(|f| f.label.len())
            .max()
            .unwrap_or(0);
        let height = super::cells(self.fields.len()).saturating_add(5);
        let dialog = super::centered(area, 64, height);
        frame.render_widget(Clear, dialog);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let mut rows: Vec<Constraint> = self.fields.iter().map(|_| Constraint::Length(1)).collect();
        rows.push(Constraint::Length(1));
        rows.push(Constraint::Min(1));
        let layout = Layout::vertical(rows).split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let label = format!(" {:>label_width$} ", field.label);
            let prefix = label.chars().count();
            let value_width = usize::from(inner.width).saturating_sub(prefix + 1);
            let scroll = field.input.visual_scroll(value_width);
            let shown: String = if field.secret {
                "•".repeat(field.input.value().chars().count())
            } else {
                field.input.value().to_owned()
            };
            let shown: String = shown.chars().skip(scroll).take(value_width).collect();

            let style = if focused {
                theme::input_focused()
            } else {
                theme::input_default()
            };
            let line = Line::from(vec![
                Span::styled(
                    label,
                    if focused {
                        theme::key_hint_key()
                    } else {
                        theme::key_hint()
                    },
                ),
                Span::styled(format!("{shown:<value_width$}"), style),
            ]);
            frame.render_widget(Paragraph::new(line), layout[i]);

            if focused {
                let offset = prefix + field.input.visual_cursor().saturating_sub(scroll);
                let x = inner.x.saturating_add(super::cells(offset));
                frame.set_cursor_position((x, layout[i].y));
            }
        }

        let status = if self.saving {
            Span::styled(" Saving…", theme::key_hint_key())
        } else if let Some(error) = &self.error {
            Span::styled(format!(" ✗ {error}"), Style::default().fg(theme::RED))
        } else {
            let hint = self.hint.as_deref().unwrap_or("Tab next  Enter save  Esc cancel");
            Span::styled(format!(" {hint}"), theme::key_hint())
        };
        frame.render_widget(Paragraph::new(status), layout[self.fields.len() + 1]);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn press(form: &mut Form, code: KeyCode) -> FormEvent {
        form.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    fn location_form() -> Form {
        Form::new("Add location")
            .text("name", "Name", "")
            .secret("password", "Password")
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = location_form();
        type_str(&mut form, "Depot");
        press(&mut form, KeyCode::Tab);
        type_str(&mut form, "hunter22");

        assert_eq!(form.value("name"), "Depot");
        assert_eq!(
            form.secret_value("password").unwrap().expose_secret(),
            "hunter22"
        );
    }

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = location_form();
        press(&mut form, KeyCode::BackTab);
        type_str(&mut form, "x");
        assert_eq!(form.value("password"), "x");
        press(&mut form, KeyCode::Down);
        type_str(&mut form, "y");
        assert_eq!(form.value("name"), "y");
    }

    #[test]
    fn optional_trims_and_drops_blank_values() {
        let form = Form::new("Edit").text("a", "A", "  gate  ").text("b", "B", "   ");
        assert_eq!(form.optional("a").as_deref(), Some("gate"));
        assert_eq!(form.optional("b"), None);
        assert_eq!(form.optional("missing"), None);
    }

    #[test]
    fn enter_submits_and_esc_cancels() {
        let mut form = location_form();
        assert_eq!(press(&mut form, KeyCode::Enter), FormEvent::Submit);
        assert_eq!(press(&mut form, KeyCode::Esc), FormEvent::Cancel);
        assert_eq!(press(&mut form, KeyCode::Char('a')), FormEvent::Editing);
    }

    #[test]
    fn saving_again_clears_a_rejection() {
        let mut form = location_form();
        form.set_saving(true);
        form.set_error("name already taken");
        assert_eq!(form.error.as_deref(), Some("name already taken"));
        assert!(!form.saving);
        form.set_saving(true);
        assert_eq!(form.error, None);
    }
}
