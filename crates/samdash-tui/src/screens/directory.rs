//! Locations and alert email recipients: single-field reference data.

use std::sync::Arc;

use ratatui::{layout::Constraint, widgets::Cell};

use samdash_core::{Command, CoreError, Credential, EmailRecipient, EntityKind, Location};

use super::entity::EntityTable;
use crate::action::Action;
use crate::widgets::form::Form;

impl EntityTable for Location {
    const TITLE: &'static str = "Locations";
    const KIND: EntityKind = EntityKind::Locations;
    const EDIT_CREDENTIAL: Option<Credential> = Some(Credential::Operator);
    const NOUNS: (&'static str, &'static str) = ("location", "locations");

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![("ID", Constraint::Length(6)), ("Name", Constraint::Min(20))]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        vec![Cell::from(self.id.to_string()), Cell::from(self.name.clone())]
    }

    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>> {
        match action {
            Action::LocationsUpdated(locations) => Some(locations),
            _ => None,
        }
    }

    fn create_form() -> Form {
        Form::new("Add location").text("name", "Name", "")
    }

    fn edit_form(&self) -> Form {
        Form::new("Rename location").text("name", "Name", &self.name)
    }

    fn create_command(form: &Form) -> Result<Command, CoreError> {
        Ok(Command::CreateLocation {
            name: form.value("name").trim().to_owned(),
        })
    }

    fn update_command(&self, form: &Form) -> Result<Command, CoreError> {
        Ok(Command::UpdateLocation {
            id: self.id,
            name: form.value("name").trim().to_owned(),
        })
    }

    fn delete_command(rows: &[Arc<Self>]) -> Option<Command> {
        Some(Command::DeleteLocations {
            ids: rows.iter().map(|l| l.id).collect(),
        })
    }
}

impl EntityTable for EmailRecipient {
    const TITLE: &'static str = "Alert emails";
    const KIND: EntityKind = EntityKind::Emails;
    const EDIT_CREDENTIAL: Option<Credential> = Some(Credential::Operator);
    const NOUNS: (&'static str, &'static str) = ("recipient", "recipients");

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![("ID", Constraint::Length(6)), ("Address", Constraint::Min(24))]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.address.clone()),
        ]
    }

    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>> {
        match action {
            Action::EmailsUpdated(emails) => Some(emails),
            _ => None,
        }
    }

    fn create_form() -> Form {
        Form::new("Add recipient").text("address", "Email", "")
    }

    fn edit_form(&self) -> Form {
        Form::new("Edit recipient").text("address", "Email", &self.address)
    }

    fn create_command(form: &Form) -> Result<Command, CoreError> {
        Ok(Command::CreateEmail {
            address: form.value("address").trim().to_owned(),
        })
    }

    fn update_command(&self, form: &Form) -> Result<Command, CoreError> {
        Ok(Command::UpdateEmail {
            id: self.id,
            address: form.value("address").trim().to_owned(),
        })
    }

    fn delete_command(rows: &[Arc<Self>]) -> Option<Command> {
        Some(Command::DeleteEmails {
            ids: rows.iter().map(|e| e.id).collect(),
        })
    }
}
