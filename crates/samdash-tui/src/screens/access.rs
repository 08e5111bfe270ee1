//! Device permissions: pick a user on the left, grant or revoke devices on
//! the right.

use std::collections::HashSet;
use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Cell, Paragraph},
};

use samdash_core::{Command, CoreError, Device, EntityKind, Listable, User};

use super::entity::EntityTable;
use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::confirm::Confirm;
use crate::widgets::list_view::ListView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Users,
    Devices,
}

pub struct AccessScreen {
    users: ListView<User>,
    devices: ListView<Device>,
    /// Account whose permissions are shown.
    owner: Option<Arc<User>>,
    granted: HashSet<i64>,
    pane: Pane,
    revoke: Option<(Confirm, Command)>,
    focused: bool,
}

impl AccessScreen {
    pub fn new(page_size: usize) -> Self {
        Self {
            users: ListView::new(page_size),
            devices: ListView::new(page_size),
            owner: None,
            granted: HashSet::new(),
            pane: Pane::Users,
            revoke: None,
            focused: false,
        }
    }

    fn owner_id(&self) -> Result<i64, CoreError> {
        self.owner
            .as_ref()
            .map(|u| u.id)
            .ok_or_else(|| CoreError::validation("Press Enter on a user first"))
    }

    fn grant(&self) -> Result<Action, CoreError> {
        let user_id = self.owner_id()?;
        let device_ids = self.devices.selection().at_least_one()?;
        Ok(Action::Execute(Command::AssignDevices {
            user_id,
            device_ids,
        }))
    }

    fn ask_revoke(&mut self) -> Result<(), CoreError> {
        let user_id = self.owner_id()?;
        let device_ids = self.devices.selection().at_least_one()?;
        let username = self
            .owner
            .as_ref()
            .map(|u| u.username.clone())
            .unwrap_or_default();
        let noun = if device_ids.len() == 1 {
            "1 device".to_owned()
        } else {
            format!("{} devices", device_ids.len())
        };
        self.revoke = Some((
            Confirm::new(format!("Revoke {noun} from {username}?")),
            Command::RevokeDevices {
                user_id,
                device_ids,
            },
        ));
        Ok(())
    }

    fn handle_devices_key(&mut self, key: KeyEvent) -> Option<Action> {
        let result = match key.code {
            KeyCode::Char('a') => self.grant().map(Some),
            KeyCode::Char('d') => self.ask_revoke().map(|()| None),
            _ => {
                self.devices.handle_key(key);
                Ok(None)
            }
        };
        result.unwrap_or_else(|e| Some(Action::Notify(Notification::warning(e.to_string()))))
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let pairs: &[(&str, &str)] = match self.pane {
            Pane::Users => &[
                ("h/l ", "pane  "),
                ("j/k ", "move  "),
                ("/ ", "filter  "),
                ("Enter ", "show permissions  "),
                ("R ", "refresh"),
            ],
            Pane::Devices => &[
                ("h/l ", "pane  "),
                ("space ", "select  "),
                ("a ", "grant  "),
                ("d ", "revoke  "),
                ("R ", "refresh"),
            ],
        };
        let spans: Vec<Span> = std::iter::once(Span::raw(" "))
            .chain(pairs.iter().flat_map(|(key, label)| {
                [
                    Span::styled(*key, theme::key_hint_key()),
                    Span::styled(*label, theme::key_hint()),
                ]
            }))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

impl Component for AccessScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some((confirm, cmd)) = self.revoke.take() {
            return Ok(match confirm.handle_key(key) {
                Some(true) => Some(Action::Execute(cmd)),
                Some(false) => None,
                None => {
                    self.revoke = Some((confirm, cmd));
                    None
                }
            });
        }
        if self.users.is_filtering() {
            self.users.handle_key(key);
            return Ok(None);
        }
        if self.devices.is_filtering() {
            self.devices.handle_key(key);
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('h') => {
                self.pane = Pane::Users;
                return Ok(None);
            }
            KeyCode::Char('l') => {
                self.pane = Pane::Devices;
                return Ok(None);
            }
            KeyCode::Char('R') => {
                let kind = match self.pane {
                    Pane::Users => EntityKind::Users,
                    Pane::Devices => EntityKind::Devices,
                };
                return Ok(Some(Action::Refresh(kind)));
            }
            _ => {}
        }

        Ok(match self.pane {
            Pane::Users => match key.code {
                KeyCode::Enter => self.users.current().cloned().map(|user| {
                    let id = user.id;
                    self.owner = Some(user);
                    self.granted.clear();
                    self.devices.clear_selection();
                    Action::LoadPermissions(id)
                }),
                KeyCode::Char(' ') => None,
                _ => {
                    self.users.handle_key(key);
                    None
                }
            },
            Pane::Devices => self.handle_devices_key(key),
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::UsersUpdated(users) => {
                self.users.set_records(Arc::clone(users));
                if let Some(owner) = &self.owner {
                    self.owner = users.iter().find(|u| u.id == owner.id).cloned();
                    if self.owner.is_none() {
                        self.granted.clear();
                    }
                }
            }
            Action::DevicesUpdated(devices) => self.devices.set_records(Arc::clone(devices)),
            Action::PermissionsUpdated(devices) => {
                self.granted = devices.iter().map(|d| d.id()).collect();
            }
            Action::FetchStateChanged(EntityKind::Users, state) => {
                self.users.set_loading(state.loading);
            }
            Action::FetchStateChanged(EntityKind::Devices | EntityKind::Permissions, state) => {
                self.devices.set_loading(state.loading);
            }
            Action::CommandFinished {
                kind: EntityKind::Permissions,
                error: None,
            } => self.devices.clear_selection(),
            Action::LoggedOut => {
                self.owner = None;
                self.granted.clear();
                self.revoke = None;
                self.devices.clear_selection();
            }
            Action::Tick => {
                self.users.tick();
                self.devices.tick();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [body, hints] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(body);

        self.users.render(
            frame,
            left,
            "Users",
            self.focused && self.pane == Pane::Users,
            &User::columns(),
            |u| {
                let mut cells = u.cells();
                if self.owner.as_ref().is_some_and(|o| o.id == u.id) {
                    cells[2] = Cell::from(Span::styled(
                        format!("▸ {}", u.username),
                        Style::default().fg(theme::ACCENT),
                    ));
                }
                cells
            },
        );

        let title = match &self.owner {
            Some(owner) => format!("Devices · {}", owner.username),
            None => "Devices".to_owned(),
        };
        let mut columns = vec![("Granted", Constraint::Length(8))];
        columns.extend(
            Device::columns()
                .into_iter()
                .filter(|(h, _)| matches!(*h, "ID" | "SAM ID" | "Location")),
        );
        self.devices.render(
            frame,
            right,
            &title,
            self.focused && self.pane == Pane::Devices,
            &columns,
            |d| {
                let granted = if self.granted.contains(&d.id) {
                    Span::styled("✓", Style::default().fg(theme::GREEN))
                } else {
                    Span::raw("")
                };
                vec![
                    Cell::from(granted),
                    Cell::from(d.id.to_string()),
                    Cell::from(d.sam_id.clone()),
                    Cell::from(d.location.clone().unwrap_or_default()),
                ]
            },
        );

        self.render_hints(frame, hints);

        if let Some((confirm, _)) = &self.revoke {
            confirm.render(frame, area);
        }
    }

    fn captures_input(&self) -> bool {
        self.revoke.is_some() || self.users.is_filtering() || self.devices.is_filtering()
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

    use samdash_core::Credential;

    use super::*;

    fn press(screen: &mut AccessScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn device(id: i64) -> Arc<Device> {
        Arc::new(Device {
            id,
            device_id: None,
            sam_id: format!("SAM-{id:02}"),
            device_ip: None,
            device_username: None,
            device_root_folder: None,
            camera_ip: None,
            camera_username: None,
            camera_root_folder: None,
            camera_type: None,
            location: None,
        })
    }

    fn screen() -> AccessScreen {
        let mut screen = AccessScreen::new(10);
        let users = vec![Arc::new(User {
            id: 4,
            user_id: None,
            username: "carol".into(),
            credential: Some(Credential::Guest),
        })];
        screen.update(&Action::UsersUpdated(Arc::new(users))).unwrap();
        screen
            .update(&Action::DevicesUpdated(Arc::new(vec![device(1), device(2)])))
            .unwrap();
        screen
    }

    #[test]
    fn grant_requires_a_chosen_user() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Char(' '));
        match press(&mut screen, KeyCode::Char('a')) {
            Some(Action::Notify(n)) => assert_eq!(n.message, "Press Enter on a user first"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn enter_loads_permissions_then_grant_executes() {
        let mut screen = screen();
        match press(&mut screen, KeyCode::Enter) {
            Some(Action::LoadPermissions(id)) => assert_eq!(id, 4),
            other => panic!("unexpected {other:?}"),
        }
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Char(' '));
        press(&mut screen, KeyCode::Char(' '));
        match press(&mut screen, KeyCode::Char('a')) {
            Some(Action::Execute(Command::AssignDevices {
                user_id,
                device_ids,
            })) => {
                assert_eq!(user_id, 4);
                assert_eq!(device_ids, vec![1, 2]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn revoke_asks_before_executing() {
        let mut screen = screen();
        press(&mut screen, KeyCode::Enter);
        press(&mut screen, KeyCode::Char('l'));
        press(&mut screen, KeyCode::Char(' '));
        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
        assert!(screen.captures_input());
        match press(&mut screen, KeyCode::Char('y')) {
            Some(Action::Execute(Command::RevokeDevices { device_ids, .. })) => {
                assert_eq!(device_ids, vec![1]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn permissions_update_marks_granted_devices() {
        let mut screen = screen();
        screen
            .update(&Action::PermissionsUpdated(Arc::new(vec![device(2)])))
            .unwrap();
        assert!(screen.granted.contains(&2));
        assert!(!screen.granted.contains(&1));
    }
}
