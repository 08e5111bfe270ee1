//! Application core: event loop, session lifecycle, screen management and
//! action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use samdash_core::{Command, Controller, CoreError, Credential, EntityKind, User};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::event::{Cadence, Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::{create_screens, login::LoginScreen};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::centered;

/// How long a banner stays up unless replaced.
const BANNER_TTL: Duration = Duration::from_millis(3000);

/// Lists a screen loads when it is opened.
fn mount_kinds(screen: ScreenId) -> &'static [EntityKind] {
    match screen {
        ScreenId::Login => &[],
        ScreenId::Devices | ScreenId::Data => &[EntityKind::Devices],
        ScreenId::Locations => &[EntityKind::Locations],
        ScreenId::Emails => &[EntityKind::Emails],
        ScreenId::Logs => &[EntityKind::Logs],
        ScreenId::Users => &[EntityKind::Users],
        ScreenId::Access => &[EntityKind::Users, EntityKind::Devices],
    }
}

/// Banner for a failed request. Validation problems are warnings.
fn failure(err: &CoreError) -> Notification {
    if err.is_validation() {
        Notification::warning(err.to_string())
    } else {
        Notification::error(err.to_string())
    }
}

/// Report a failed request; an expired session sends the user back to login.
fn report(tx: &mpsc::UnboundedSender<Action>, err: &CoreError) {
    warn!(error = %err, "request failed");
    let _ = tx.send(Action::Notify(failure(err)));
    if err.is_auth() {
        let _ = tx.send(Action::Logout);
    }
}

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    /// Current active screen.
    active_screen: ScreenId,
    /// All screen components, keyed by ScreenId. Includes the login screen.
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    /// Signed-in account, if any.
    user: Option<Arc<User>>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Cancels the data bridge of the current session.
    bridge_cancel: Option<CancellationToken>,
    /// Active banner with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(controller: Controller, username: Option<String>, page_size: usize) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let mut screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(page_size).into_iter().collect();
        let backend = controller.config().url.to_string();
        screens.insert(
            ScreenId::Login,
            Box::new(LoginScreen::new(username, backend)),
        );

        Self {
            controller,
            active_screen: ScreenId::Login,
            screens,
            running: true,
            help_visible: false,
            user: None,
            action_tx,
            action_rx,
            bridge_cancel: None,
            notification: None,
        }
    }

    fn credential(&self) -> Credential {
        self.user
            .as_ref()
            .map_or(Credential::Guest, |u| u.effective_credential())
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let title = match self.controller.config().url.host_str() {
            Some(host) => format!("samdash · {host}"),
            None => "samdash".to_owned(),
        };
        let mut tui = Tui::new()?;
        tui.enter(&title)?;
        self.init_screens()?;
        self.restore_session();

        let mut events = EventReader::spawn(Cadence::default());

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        if let Some(cancel) = self.bridge_cancel.take() {
            cancel.cancel();
        }
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Global keys are handled here; everything else goes to the active
    /// screen. A screen that owns the keyboard (form, prompt, dialog) gets
    /// every key except Ctrl+C.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let credential = self.credential();
        let active = self.active_screen;
        let Some(screen) = self.screens.get_mut(&active) else {
            return Ok(None);
        };
        if screen.captures_input() {
            return screen.handle_key_event(key);
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('L')) => {
                return Ok(Some(Action::Logout));
            }
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let n = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
                if let Some(target) = n.and_then(|n| ScreenId::from_number(n, credential)) {
                    return Ok(Some(Action::SwitchScreen(target)));
                }
                return Ok(None);
            }
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::SwitchScreen(
                    active.next(credential),
                )));
            }
            (_, KeyCode::BackTab) => {
                return Ok(Some(Action::SwitchScreen(
                    active.prev(credential),
                )));
            }
            (_, KeyCode::Esc) => return Ok(Some(Action::DismissNotification)),
            _ => {}
        }

        screen.handle_key_event(key)
    }

    // ── Background requests ─────────────────────────────────────────

    fn restore_session(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.restore_session().await {
                Ok(Some(session)) => {
                    let _ = tx.send(Action::SessionStarted(Arc::new(session.user().clone())));
                }
                Ok(None) => {
                    let _ = tx.send(Action::SessionMissing);
                }
                Err(e) => {
                    warn!(error = %e, "could not restore session");
                    let _ = tx.send(Action::SessionMissing);
                }
            }
        });
    }

    fn login(&self, username: String, password: secrecy::SecretString) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.login(&username, &password).await {
                Ok(session) => {
                    info!(username = %session.user().username, "signed in");
                    let _ = tx.send(Action::SessionStarted(Arc::new(session.user().clone())));
                }
                Err(e) => {
                    warn!(error = %e, "login failed");
                    let _ = tx.send(Action::LoginFailed(e.to_string()));
                }
            }
        });
    }

    fn logout(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = controller.logout().await {
                warn!(error = %e, "logout did not complete cleanly");
            }
            let _ = tx.send(Action::LoggedOut);
        });
    }

    fn refresh(&self, kind: EntityKind) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = controller.refresh(kind).await {
                report(&tx, &e);
            }
        });
    }

    fn load_permissions(&self, user_id: i64) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = controller.refresh_permissions(user_id).await {
                report(&tx, &e);
            }
        });
    }

    /// Run a mutation. The controller re-fetches the affected list; the
    /// submitting screen keeps its modal open until `CommandFinished`.
    fn execute_command(&self, cmd: Command) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        let kind = cmd.kind();
        tokio::spawn(async move {
            let error = match controller.execute(cmd).await {
                Ok(result) => {
                    debug!(%kind, ?result, "command finished");
                    let message = controller
                        .fetch_state(kind)
                        .success
                        .unwrap_or_else(|| "Saved".into());
                    let _ = tx.send(Action::Notify(Notification::success(message)));
                    None
                }
                Err(e) => {
                    report(&tx, &e);
                    Some(e.to_string())
                }
            };
            let _ = tx.send(Action::CommandFinished { kind, error });
        });
    }

    fn query_telemetry(&self, query: samdash_core::TelemetryQuery) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match controller.query_telemetry(query).await {
                Ok(records) => {
                    let message = controller
                        .fetch_state(EntityKind::Telemetry)
                        .success
                        .unwrap_or_else(|| format!("{} rows", records.len()));
                    let _ = tx.send(Action::Notify(Notification::info(message)));
                }
                Err(e) => report(&tx, &e),
            }
        });
    }

    /// Write the loaded readings to a workbook in the working directory.
    fn export_telemetry(&self) {
        let controller = self.controller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = tokio::task::spawn_blocking(move || {
                let dir = std::env::current_dir().map_err(|e| CoreError::Export {
                    message: e.to_string(),
                })?;
                controller.export_loaded_telemetry(&dir)
            })
            .await;
            let notification = match outcome {
                Ok(Ok(path)) => {
                    info!(path = %path.display(), "telemetry exported");
                    Notification::success(format!("Exported to {}", path.display()))
                }
                Ok(Err(e)) => failure(&e),
                Err(e) => Notification::error(format!("Export task failed: {e}")),
            };
            let _ = tx.send(Action::Notify(notification));
        });
    }

    // ── Action processing ───────────────────────────────────────────

    /// Send `action` to every screen and queue their follow-ups.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        for screen in self.screens.values_mut() {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) -> Result<()> {
        if target == self.active_screen {
            return Ok(());
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        self.notification = None;
        for kind in mount_kinds(target) {
            self.action_tx.send(Action::Refresh(*kind))?;
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Render | Action::Resize(..) => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > BANNER_TTL)
                {
                    self.notification = None;
                }
                self.broadcast(action)?;
            }

            // ── Session ──────────────────────────────────────────────
            Action::Login { username, password } => {
                self.login(username.clone(), password.clone());
            }

            Action::SessionStarted(user) => {
                info!(
                    username = %user.username,
                    credential = %user.effective_credential(),
                    "session started"
                );
                self.user = Some(Arc::clone(user));

                if let Some(cancel) = self.bridge_cancel.take() {
                    cancel.cancel();
                }
                let cancel = CancellationToken::new();
                let controller = self.controller.clone();
                let tx = self.action_tx.clone();
                let bridge_cancel = cancel.clone();
                tokio::spawn(async move {
                    crate::data_bridge::spawn_data_bridge(controller, tx, bridge_cancel).await;
                });
                self.bridge_cancel = Some(cancel);

                self.broadcast(action)?;
                self.broadcast(&Action::CredentialChanged(user.effective_credential()))?;
                self.switch_to(ScreenId::Devices)?;
            }

            Action::SessionMissing | Action::LoginFailed(_) => self.broadcast(action)?,

            Action::Logout => {
                if self.user.is_some() {
                    self.logout();
                }
            }

            Action::LoggedOut => {
                if let Some(cancel) = self.bridge_cancel.take() {
                    cancel.cancel();
                }
                self.user = None;
                self.help_visible = false;
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    screen.set_focused(false);
                }
                self.active_screen = ScreenId::Login;
                self.broadcast(&Action::CredentialChanged(Credential::Guest))?;
                self.broadcast(action)?;
            }

            // ── Navigation ──────────────────────────────────────────
            Action::SwitchScreen(target) => {
                let allowed = self.user.is_some()
                    && *target != ScreenId::Login
                    && self.credential() >= target.required_credential();
                if allowed {
                    self.switch_to(*target)?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            // ── Requests ────────────────────────────────────────────
            Action::Refresh(kind) => self.refresh(*kind),
            Action::LoadPermissions(user_id) => self.load_permissions(*user_id),
            Action::Execute(cmd) => self.execute_command(cmd.clone()),
            Action::QueryTelemetry(query) => self.query_telemetry(query.clone()),
            Action::ExportTelemetry => self.export_telemetry(),

            // ── Banners ─────────────────────────────────────────────
            Action::Notify(notification) => {
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            // Data updates go to ALL screens so they stay in sync
            Action::UsersUpdated(_)
            | Action::DevicesUpdated(_)
            | Action::LocationsUpdated(_)
            | Action::EmailsUpdated(_)
            | Action::LogsUpdated(_)
            | Action::PermissionsUpdated(_)
            | Action::TelemetryUpdated(_)
            | Action::FetchStateChanged(..)
            | Action::CommandFinished { .. }
            | Action::CredentialChanged(_) => self.broadcast(action)?,
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.active_screen == ScreenId::Login {
            if let Some(screen) = self.screens.get(&ScreenId::Login) {
                screen.render(frame, area);
            }
            if let Some((ref notif, _)) = self.notification {
                Self::render_notification(frame, area, notif);
            }
            return;
        }

        let [content, tabs, status] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, content);
        }
        self.render_tab_bar(frame, tabs);
        self.render_status_bar(frame, status);

        if let Some((ref notif, _)) = self.notification {
            Self::render_notification(frame, area, notif);
        }
        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    /// Tab bar with only the screens the account may open.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let visible = ScreenId::visible_to(self.credential());
        let titles: Vec<Line> = visible
            .iter()
            .enumerate()
            .map(|(i, &id)| {
                let style = if id == self.active_screen {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {} ", i + 1, id.label()), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                visible
                    .iter()
                    .position(|&s| s == self.active_screen)
                    .unwrap_or(0),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        if let Some(user) = &self.user {
            let credential = user.effective_credential();
            spans.push(Span::styled("● ", Style::default().fg(theme::GREEN)));
            spans.push(Span::styled(user.username.clone(), theme::title_style()));
            spans.push(Span::styled(
                format!(" ({credential})"),
                theme::credential(credential),
            ));
        }
        spans.push(Span::styled(
            format!(" │ {}", self.controller.config().url),
            theme::key_hint(),
        ));
        spans.push(Span::styled(
            " │ ? help  L logout  q quit",
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = centered(area, 60, 24);
        frame.render_widget(Clear, help_area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::CYAN),
            ))
        };
        let row = |key: &'static str, label: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
                Span::styled(label, theme::key_hint()),
            ])
        };

        let help_text = vec![
            Line::from(""),
            section("Navigation"),
            row("1-7", "Jump to tab"),
            row("Tab", "Next tab"),
            row("j/k ↑/↓", "Move up/down"),
            row("g/G", "First / last row"),
            row("[ ]", "Previous / next page"),
            Line::from(""),
            section("Lists"),
            row("/", "Filter (Enter keeps, Esc clears)"),
            row("s / r", "Sort by name or id / reverse"),
            row("space", "Check row"),
            row("a e d", "Add / edit checked / delete checked"),
            row("R", "Refresh"),
            Line::from(""),
            section("Telemetry"),
            row("f", "Choose unit and filters"),
            row("x", "Export loaded readings to xlsx"),
            Line::from(""),
            section("Global"),
            row("L", "Sign out"),
            row("Esc", "Dismiss banner"),
            row("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                "                     Esc or ? to close",
                theme::key_hint(),
            )),
        ];
        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Banner in the bottom-right corner, above the status bar.
    fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
        let width = msg_len.saturating_add(6).clamp(20, 72).min(area.width);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2);
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = theme::banner(notif.level);

        frame.render_widget(Clear, toast_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(notif.message.as_str(), Style::default().fg(theme::TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn access_screen_loads_users_and_devices() {
        assert_eq!(
            mount_kinds(ScreenId::Access),
            &[EntityKind::Users, EntityKind::Devices]
        );
        assert!(mount_kinds(ScreenId::Login).is_empty());
    }

    #[test]
    fn validation_failures_are_warnings() {
        use crate::action::NotificationLevel;

        let warn = failure(&CoreError::validation("Select one row to update"));
        assert_eq!(warn.level, NotificationLevel::Warning);
        assert_eq!(failure(&CoreError::NothingToExport).level, NotificationLevel::Warning);
        assert_eq!(
            failure(&CoreError::NotAuthenticated).level,
            NotificationLevel::Error
        );
    }
}
