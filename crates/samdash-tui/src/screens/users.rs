//! User accounts (admins only).

use std::str::FromStr;
use std::sync::Arc;

use ratatui::{layout::Constraint, text::Span, widgets::Cell};

use samdash_core::{
    Command, CoreError, Credential, EntityKind, RegisterUserRequest, UpdateUserRequest, User,
};

use super::entity::EntityTable;
use crate::action::Action;
use crate::theme;
use crate::widgets::form::Form;

const CREDENTIAL_HINT: &str = "credential: guest | operator | admin | superadmin";

fn parse_credential(raw: &str) -> Result<Credential, CoreError> {
    Credential::from_str(raw.trim())
        .map_err(|_| CoreError::validation(format!("Unknown credential '{}'", raw.trim())))
}

impl EntityTable for User {
    const TITLE: &'static str = "Users";
    const KIND: EntityKind = EntityKind::Users;
    const EDIT_CREDENTIAL: Option<Credential> = Some(Credential::Admin);
    const NOUNS: (&'static str, &'static str) = ("user", "users");

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(6)),
            ("User ID", Constraint::Length(10)),
            ("Username", Constraint::Min(16)),
            ("Credential", Constraint::Length(12)),
        ]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        let credential = self.effective_credential();
        vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.user_id.clone().unwrap_or_default()),
            Cell::from(self.username.clone()),
            Cell::from(Span::styled(
                credential.to_string(),
                theme::credential(credential),
            )),
        ]
    }

    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>> {
        match action {
            Action::UsersUpdated(users) => Some(users),
            _ => None,
        }
    }

    fn create_form() -> Form {
        Form::new("Register user")
            .text("username", "Username", "")
            .text("user_id", "User ID", "")
            .secret("password", "Password")
            .text("credential", "Credential", "guest")
            .hint(CREDENTIAL_HINT)
    }

    fn edit_form(&self) -> Form {
        Form::new(format!("Edit {}", self.username))
            .text("username", "Username", &self.username)
            .secret("password", "New password")
            .text(
                "credential",
                "Credential",
                &self.effective_credential().to_string(),
            )
            .hint("leave the password blank to keep it")
    }

    fn create_command(form: &Form) -> Result<Command, CoreError> {
        Ok(Command::RegisterUser(RegisterUserRequest {
            user_id: form.optional("user_id"),
            username: form.value("username").trim().to_owned(),
            password: form
                .secret_value("password")
                .ok_or_else(|| CoreError::validation("Password is required"))?,
            credential: parse_credential(form.value("credential"))?,
        }))
    }

    fn update_command(&self, form: &Form) -> Result<Command, CoreError> {
        let username = form.value("username").trim();
        let credential = parse_credential(form.value("credential"))?;
        Ok(Command::UpdateUser {
            id: self.id,
            update: UpdateUserRequest {
                username: (username != self.username).then(|| username.to_owned()),
                password: form.secret_value("password"),
                credential: (credential != self.effective_credential()).then_some(credential),
            },
        })
    }

    fn delete_command(rows: &[Arc<Self>]) -> Option<Command> {
        Some(Command::DeleteUsers {
            ids: rows.iter().map(|u| u.id).collect(),
        })
    }
}
