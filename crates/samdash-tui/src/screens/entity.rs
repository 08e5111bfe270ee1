//! Generic CRUD screen over one entity list.
//!
//! Users, devices, locations, alert emails and logs share the same shape:
//! a paged table, a create form, an edit form for the one checked row and
//! a confirmed bulk delete. Each entity supplies only its columns, forms
//! and the commands its forms produce.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Cell, Paragraph},
};

use samdash_core::{Command, CoreError, Credential, EntityKind, Listable};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::confirm::Confirm;
use crate::widgets::form::{Form, FormEvent};
use crate::widgets::list_view::ListView;

pub trait EntityTable: Listable + Send + Sync + Sized + 'static {
    const TITLE: &'static str;
    const KIND: EntityKind;
    /// Lowest credential allowed to create, edit or delete. `None` makes
    /// the screen read-only.
    const EDIT_CREDENTIAL: Option<Credential> = None;
    /// Singular and plural nouns for confirmation prompts.
    const NOUNS: (&'static str, &'static str);

    fn columns() -> Vec<(&'static str, Constraint)>;

    fn cells(&self) -> Vec<Cell<'static>>;

    /// The snapshot carried by `action`, if it is this entity's update.
    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>>;

    fn create_form() -> Form {
        Form::new(format!("New {}", Self::NOUNS.0))
    }

    fn edit_form(&self) -> Form {
        Form::new(format!("Edit {}", Self::NOUNS.0))
    }

    fn create_command(_form: &Form) -> Result<Command, CoreError> {
        Err(CoreError::validation(format!("{} are read-only", Self::TITLE)))
    }

    fn update_command(&self, _form: &Form) -> Result<Command, CoreError> {
        Err(CoreError::validation(format!("{} are read-only", Self::TITLE)))
    }

    fn delete_command(_rows: &[Arc<Self>]) -> Option<Command> {
        None
    }
}

enum Modal<T> {
    Create(Form),
    Edit { record: Arc<T>, form: Form },
    Delete { confirm: Confirm, rows: Vec<Arc<T>> },
}

pub struct EntityScreen<T: EntityTable> {
    list: ListView<T>,
    modal: Option<Modal<T>>,
    /// An `Execute` from the open modal has not finished yet.
    submitting: bool,
    credential: Credential,
    focused: bool,
}

impl<T: EntityTable> EntityScreen<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            list: ListView::new(page_size),
            modal: None,
            submitting: false,
            credential: Credential::Guest,
            focused: false,
        }
    }

    fn can_edit(&self) -> bool {
        T::EDIT_CREDENTIAL.is_some_and(|needed| self.credential >= needed)
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<Action> {
        if self.submitting {
            return None;
        }
        let modal = self.modal.take()?;
        match modal {
            Modal::Create(mut form) => match form.handle_key(key) {
                FormEvent::Cancel => None,
                FormEvent::Editing => {
                    self.modal = Some(Modal::Create(form));
                    None
                }
                FormEvent::Submit => {
                    let submitted = T::create_command(&form);
                    self.submit(Modal::Create(form), submitted)
                }
            },
            Modal::Edit { record, mut form } => match form.handle_key(key) {
                FormEvent::Cancel => None,
                FormEvent::Editing => {
                    self.modal = Some(Modal::Edit { record, form });
                    None
                }
                FormEvent::Submit => {
                    let submitted = record.update_command(&form);
                    self.submit(Modal::Edit { record, form }, submitted)
                }
            },
            Modal::Delete { confirm, rows } => match confirm.handle_key(key) {
                Some(true) => {
                    let cmd = T::delete_command(&rows)?;
                    self.modal = Some(Modal::Delete { confirm, rows });
                    self.submitting = true;
                    Some(Action::Execute(cmd))
                }
                Some(false) => None,
                None => {
                    self.modal = Some(Modal::Delete { confirm, rows });
                    None
                }
            },
        }
    }

    /// Validate a form's command and send it, keeping the modal open until
    /// the matching `CommandFinished` arrives.
    fn submit(
        &mut self,
        mut modal: Modal<T>,
        cmd: Result<Command, CoreError>,
    ) -> Option<Action> {
        let action = match cmd.and_then(|cmd| cmd.validate().map(|()| cmd)) {
            Ok(cmd) => {
                if let Modal::Create(form) | Modal::Edit { form, .. } = &mut modal {
                    form.set_saving(true);
                }
                self.submitting = true;
                Action::Execute(cmd)
            }
            Err(e) => warn(&e),
        };
        self.modal = Some(modal);
        Some(action)
    }

    /// Close the modal on success; on failure hand the form back with the
    /// error shown and its values intact.
    fn finish(&mut self, error: Option<&str>) {
        if !self.submitting {
            return;
        }
        self.submitting = false;
        let Some(error) = error else {
            self.modal = None;
            self.list.clear_selection();
            return;
        };
        if let Some(Modal::Create(form) | Modal::Edit { form, .. }) = &mut self.modal {
            form.set_error(error);
        }
    }

    fn open_edit(&mut self) -> Option<Action> {
        let id = match self.list.selection().single() {
            Ok(id) => id,
            Err(e) => return Some(warn(&e)),
        };
        let record = self.list.records().iter().find(|r| r.id() == id)?.clone();
        self.modal = Some(Modal::Edit {
            form: record.edit_form(),
            record,
        });
        None
    }

    fn open_delete(&mut self) -> Option<Action> {
        if let Err(e) = self.list.selection().at_least_one() {
            return Some(warn(&e));
        }
        let rows = self.list.selected_records();
        let (one, many) = T::NOUNS;
        let noun = if rows.len() == 1 {
            format!("1 {one}")
        } else {
            format!("{} {many}", rows.len())
        };
        self.modal = Some(Modal::Delete {
            confirm: Confirm::new(format!("Delete {noun}?")),
            rows,
        });
        None
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut pairs = vec![
            ("j/k ", "move  "),
            ("[/] ", "page  "),
            ("/ ", "filter  "),
            ("s/r ", "sort  "),
        ];
        if self.can_edit() {
            pairs.extend([
                ("space ", "select  "),
                ("a ", "add  "),
                ("e ", "edit  "),
                ("d ", "delete  "),
            ]);
        }
        pairs.push(("R ", "refresh"));
        let spans: Vec<Span> = std::iter::once(Span::raw(" "))
            .chain(pairs.into_iter().flat_map(|(key, label)| {
                [
                    Span::styled(key, theme::key_hint_key()),
                    Span::styled(label, theme::key_hint()),
                ]
            }))
            .collect();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn warn(err: &CoreError) -> Action {
    Action::Notify(Notification::warning(err.to_string()))
}

impl<T: EntityTable> Component for EntityScreen<T> {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.modal.is_some() {
            return Ok(self.handle_modal_key(key));
        }
        if self.list.is_filtering() {
            self.list.handle_key(key);
            return Ok(None);
        }

        let editable = self.can_edit();
        match key.code {
            KeyCode::Char('R') => return Ok(Some(Action::Refresh(T::KIND))),
            KeyCode::Char('a') if editable => {
                self.modal = Some(Modal::Create(T::create_form()));
                return Ok(None);
            }
            KeyCode::Char('e') if editable => return Ok(self.open_edit()),
            KeyCode::Char('d') if editable => return Ok(self.open_delete()),
            KeyCode::Char(' ') if !editable => return Ok(None),
            _ => {}
        }
        self.list.handle_key(key);
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Some(records) = T::records(action) {
            self.list.set_records(Arc::clone(records));
            return Ok(None);
        }
        match action {
            Action::FetchStateChanged(kind, state) if *kind == T::KIND => {
                self.list.set_loading(state.loading);
            }
            Action::CommandFinished { kind, error } if *kind == T::KIND => {
                self.finish(error.as_deref());
            }
            Action::CredentialChanged(credential) => {
                self.credential = *credential;
                if !self.can_edit() {
                    self.modal = None;
                    self.submitting = false;
                    self.list.clear_selection();
                }
            }
            Action::LoggedOut => {
                self.modal = None;
                self.submitting = false;
                self.list.clear_selection();
            }
            Action::Tick => self.list.tick(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let [table, hints] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        self.list.render(
            frame,
            table,
            T::TITLE,
            self.focused,
            &T::columns(),
            T::cells,
        );
        self.render_hints(frame, hints);

        match &self.modal {
            Some(Modal::Create(form) | Modal::Edit { form, .. }) => form.render(frame, area),
            Some(Modal::Delete { confirm, .. }) => confirm.render(frame, area),
            None => {}
        }
    }

    fn captures_input(&self) -> bool {
        self.modal.is_some() || self.list.is_filtering()
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
    use ratatui::{Terminal, backend::TestBackend};

    use samdash_core::Location;

    use super::*;

    fn press(screen: &mut EntityScreen<Location>, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    fn screen_with(names: &[&str], credential: Credential) -> EntityScreen<Location> {
        let mut screen = EntityScreen::new(10);
        screen
            .update(&Action::CredentialChanged(credential))
            .unwrap();
        let rows = names
            .iter()
            .zip(1..)
            .map(|(n, id)| {
                Arc::new(Location {
                    id,
                    name: (*n).to_owned(),
                })
            })
            .collect();
        screen
            .update(&Action::LocationsUpdated(Arc::new(rows)))
            .unwrap();
        screen
    }

    fn warning_text(action: Option<Action>) -> String {
        match action {
            Some(Action::Notify(n)) => n.message,
            other => panic!("expected a banner, got {other:?}"),
        }
    }

    #[test]
    fn edit_without_selection_warns() {
        let mut screen = screen_with(&["Depot"], Credential::Operator);
        let msg = warning_text(press(&mut screen, KeyCode::Char('e')));
        assert_eq!(msg, "Select one row to update");
        assert!(!screen.captures_input());
    }

    #[test]
    fn edit_with_two_rows_checked_warns() {
        let mut screen = screen_with(&["Depot", "Gate-A"], Credential::Operator);
        press(&mut screen, KeyCode::Char(' '));
        press(&mut screen, KeyCode::Char(' '));
        let msg = warning_text(press(&mut screen, KeyCode::Char('e')));
        assert_eq!(msg, "Select only one row to update");
    }

    #[test]
    fn delete_without_selection_warns() {
        let mut screen = screen_with(&["Depot"], Credential::Operator);
        let msg = warning_text(press(&mut screen, KeyCode::Char('d')));
        assert_eq!(msg, "Select at least one row to delete");
    }

    #[test]
    fn confirmed_delete_executes_for_checked_rows() {
        let mut screen = screen_with(&["Depot", "Gate-A"], Credential::Operator);
        press(&mut screen, KeyCode::Char(' '));
        press(&mut screen, KeyCode::Char(' '));
        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
        assert!(screen.captures_input());

        match press(&mut screen, KeyCode::Char('y')) {
            Some(Action::Execute(Command::DeleteLocations { ids })) => assert_eq!(ids, vec![1, 2]),
            other => panic!("unexpected {other:?}"),
        }

        assert!(screen.captures_input());
        assert!(press(&mut screen, KeyCode::Char('n')).is_none());
        assert!(screen.captures_input());

        screen.update(&finished(None)).unwrap();
        assert!(!screen.captures_input());
        assert!(screen.list.selection().is_empty());
    }

    #[test]
    fn blank_create_form_keeps_the_form_open() {
        let mut screen = screen_with(&[], Credential::Operator);
        press(&mut screen, KeyCode::Char('a'));
        let msg = warning_text(press(&mut screen, KeyCode::Enter));
        assert!(msg.contains("required"), "{msg}");
        assert!(screen.captures_input());
    }

    fn type_name(screen: &mut EntityScreen<Location>, name: &str) {
        for c in name.chars() {
            press(screen, KeyCode::Char(c));
        }
    }

    fn finished(error: Option<&str>) -> Action {
        Action::CommandFinished {
            kind: EntityKind::Locations,
            error: error.map(str::to_owned),
        }
    }

    #[test]
    fn create_stays_open_until_the_command_succeeds() {
        let mut screen = screen_with(&[], Credential::Operator);
        press(&mut screen, KeyCode::Char('a'));
        type_name(&mut screen, "Gate-C");
        match press(&mut screen, KeyCode::Enter) {
            Some(Action::Execute(Command::CreateLocation { name })) => assert_eq!(name, "Gate-C"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(screen.captures_input());
        assert!(press(&mut screen, KeyCode::Enter).is_none());

        screen
            .update(&Action::CommandFinished {
                kind: EntityKind::Users,
                error: None,
            })
            .unwrap();
        assert!(screen.captures_input());

        screen.update(&finished(None)).unwrap();
        assert!(!screen.captures_input());
    }

    #[test]
    fn rejected_create_keeps_what_was_typed() {
        let mut screen = screen_with(&[], Credential::Operator);
        press(&mut screen, KeyCode::Char('a'));
        type_name(&mut screen, "Gate-C");
        press(&mut screen, KeyCode::Enter);

        screen
            .update(&finished(Some("Location already exists")))
            .unwrap();
        assert!(screen.captures_input());
        match &screen.modal {
            Some(Modal::Create(form)) => assert_eq!(form.value("name"), "Gate-C"),
            _ => panic!("create form was closed"),
        }
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area())).unwrap();
        let drawn: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(drawn.contains("Location already exists"));

        type_name(&mut screen, "2");
        match press(&mut screen, KeyCode::Enter) {
            Some(Action::Execute(Command::CreateLocation { name })) => assert_eq!(name, "Gate-C2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_delete_keeps_rows_checked() {
        let mut screen = screen_with(&["Depot"], Credential::Operator);
        press(&mut screen, KeyCode::Char(' '));
        press(&mut screen, KeyCode::Char('d'));
        press(&mut screen, KeyCode::Char('y'));

        screen.update(&finished(Some("backend unavailable"))).unwrap();
        assert!(screen.captures_input());
        assert_eq!(screen.list.selection().len(), 1);
    }

    #[test]
    fn guests_cannot_open_forms() {
        let mut screen = screen_with(&["Depot"], Credential::Guest);
        assert!(press(&mut screen, KeyCode::Char('a')).is_none());
        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
        assert!(!screen.captures_input());
    }
}
