//! Sign-in screen shown until a session exists.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};
use tui_input::Input;

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{cells, centered, input};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Checking for a saved session.
    Restoring,
    Editing,
    /// Waiting on the backend.
    Submitting,
}

pub struct LoginScreen {
    username: Input,
    password: Input,
    field: Field,
    phase: Phase,
    error: Option<String>,
    backend: String,
    throbber: ThrobberState,
}

impl LoginScreen {
    pub fn new(username: Option<String>, backend: String) -> Self {
        let field = if username.is_some() {
            Field::Password
        } else {
            Field::Username
        };
        Self {
            username: Input::new(username.unwrap_or_default()),
            password: Input::default(),
            field,
            phase: Phase::Restoring,
            error: None,
            backend,
            throbber: ThrobberState::default(),
        }
    }

    fn submit(&mut self) -> Option<Action> {
        let username = self.username.value().trim().to_owned();
        if username.is_empty() {
            self.error = Some("Username is required".into());
            self.field = Field::Username;
            return None;
        }
        if self.password.value().is_empty() {
            self.error = Some("Password is required".into());
            self.field = Field::Password;
            return None;
        }
        self.phase = Phase::Submitting;
        self.error = None;
        let password = SecretString::from(self.password.value().to_owned());
        self.password.reset();
        Some(Action::Login { username, password })
    }

    fn render_field(&self, frame: &mut Frame, area: Rect, which: Field) {
        let (label, input) = match which {
            Field::Username => ("Username", &self.username),
            Field::Password => ("Password", &self.password),
        };
        let focused = self.phase == Phase::Editing && self.field == which;
        let shown = if which == Field::Password {
            "•".repeat(input.value().chars().count())
        } else {
            input.value().to_owned()
        };
        let block = Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(
            Paragraph::new(shown).style(theme::input_default()).block(block),
            area,
        );
        if focused {
            let x = inner.x.saturating_add(cells(input.visual_cursor()));
            frame.set_cursor_position((x, inner.y));
        }
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.phase != Phase::Editing {
            return Ok(None);
        }
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::Quit)),
            KeyCode::Enter => {
                if self.field == Field::Username && self.password.value().is_empty() {
                    self.field = Field::Password;
                    return Ok(None);
                }
                return Ok(self.submit());
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.field = match self.field {
                    Field::Username => Field::Password,
                    Field::Password => Field::Username,
                };
            }
            _ => {
                let target = match self.field {
                    Field::Username => &mut self.username,
                    Field::Password => &mut self.password,
                };
                input::edit(target, key);
            }
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SessionMissing | Action::LoggedOut => {
                self.phase = Phase::Editing;
            }
            Action::LoginFailed(message) => {
                self.phase = Phase::Editing;
                self.field = Field::Password;
                self.error = Some(message.clone());
            }
            Action::SessionStarted(_) => {
                self.phase = Phase::Editing;
                self.error = None;
            }
            Action::Tick if self.phase != Phase::Editing => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let card = centered(area, 56, 14);
        let block = Block::default()
            .title(" samdash ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(card);
        frame.render_widget(block, card);

        let [backend, username, password, status, hints] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", self.backend), theme::key_hint())),
            backend,
        );
        self.render_field(frame, username, Field::Username);
        self.render_field(frame, password, Field::Password);

        match (self.phase, &self.error) {
            (Phase::Restoring | Phase::Submitting, _) => {
                let label = if self.phase == Phase::Restoring {
                    " Restoring session..."
                } else {
                    " Signing in..."
                };
                let throbber = Throbber::default()
                    .label(label)
                    .style(Style::default().fg(theme::CYAN))
                    .throbber_style(Style::default().fg(theme::ACCENT));
                frame.render_stateful_widget(throbber, status, &mut self.throbber.clone());
            }
            (Phase::Editing, Some(error)) => {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!(" ✗ {error}"),
                        Style::default().fg(theme::RED),
                    )),
                    status,
                );
            }
            (Phase::Editing, None) => {}
        }

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Tab ", theme::key_hint_key()),
                Span::styled("switch  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("sign in  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("quit", theme::key_hint()),
            ])),
            hints,
        );
    }

    fn captures_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn press(screen: &mut LoginScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn ready(username: Option<&str>) -> LoginScreen {
        let mut screen = LoginScreen::new(username.map(str::to_owned), "https://sam.test".into());
        screen.update(&Action::SessionMissing).unwrap();
        screen
    }

    #[test]
    fn keys_are_ignored_while_restoring() {
        let mut screen = LoginScreen::new(None, String::new());
        assert!(press(&mut screen, KeyCode::Char('a')).is_none());
        assert_eq!(screen.username.value(), "");
    }

    #[test]
    fn prefilled_username_focuses_password() {
        let mut screen = ready(Some("alice"));
        for c in "secret-pw".chars() {
            press(&mut screen, KeyCode::Char(c));
        }
        match press(&mut screen, KeyCode::Enter) {
            Some(Action::Login { username, password }) => {
                assert_eq!(username, "alice");
                assert_eq!(password.expose_secret(), "secret-pw");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(screen.password.value(), "");
    }

    #[test]
    fn missing_password_shows_an_error() {
        let mut screen = ready(None);
        press(&mut screen, KeyCode::Char('b'));
        press(&mut screen, KeyCode::Tab);
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert_eq!(screen.error.as_deref(), Some("Password is required"));
    }

    #[test]
    fn failed_login_returns_to_editing() {
        let mut screen = ready(Some("alice"));
        press(&mut screen, KeyCode::Char('x'));
        press(&mut screen, KeyCode::Enter);
        assert_eq!(screen.phase, Phase::Submitting);

        screen
            .update(&Action::LoginFailed("Authentication failed: bad password".into()))
            .unwrap();
        assert_eq!(screen.phase, Phase::Editing);
        assert!(screen.error.as_deref().unwrap().contains("bad password"));
    }
}
