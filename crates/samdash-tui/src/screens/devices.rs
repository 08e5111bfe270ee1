//! SAM units. Operators and above may edit.

use std::sync::Arc;

use ratatui::{layout::Constraint, widgets::Cell};

use samdash_core::{
    Command, CoreError, CreateDeviceRequest, Credential, Device, EntityKind, UpdateDeviceRequest,
};

use super::entity::EntityTable;
use crate::action::Action;
use crate::widgets::form::Form;

/// Optional text fields shared by the add and edit forms: (key, label).
const FIELDS: [(&str, &str); 9] = [
    ("device_id", "Device ID"),
    ("device_ip", "Device IP"),
    ("device_username", "Device user"),
    ("device_root_folder", "Device root"),
    ("camera_ip", "Camera IP"),
    ("camera_username", "Camera user"),
    ("camera_root_folder", "Camera root"),
    ("camera_type", "Camera type"),
    ("location", "Location"),
];

fn field<'a>(device: &'a Device, key: &str) -> Option<&'a str> {
    let value = match key {
        "device_id" => &device.device_id,
        "device_ip" => &device.device_ip,
        "device_username" => &device.device_username,
        "device_root_folder" => &device.device_root_folder,
        "camera_ip" => &device.camera_ip,
        "camera_username" => &device.camera_username,
        "camera_root_folder" => &device.camera_root_folder,
        "camera_type" => &device.camera_type,
        _ => &device.location,
    };
    value.as_deref()
}

fn device_form(title: String, device: Option<&Device>) -> Form {
    let mut form = Form::new(title).text(
        "sam_id",
        "SAM ID",
        device.map_or("", |d| d.sam_id.as_str()),
    );
    for (key, label) in FIELDS {
        let initial = device.and_then(|d| field(d, key)).unwrap_or("");
        form = form.text(key, label, initial);
    }
    form.secret("camera_password", "Camera password")
}

impl EntityTable for Device {
    const TITLE: &'static str = "Devices";
    const KIND: EntityKind = EntityKind::Devices;
    const EDIT_CREDENTIAL: Option<Credential> = Some(Credential::Operator);
    const NOUNS: (&'static str, &'static str) = ("device", "devices");

    fn columns() -> Vec<(&'static str, Constraint)> {
        vec![
            ("ID", Constraint::Length(6)),
            ("SAM ID", Constraint::Min(12)),
            ("Device IP", Constraint::Length(16)),
            ("Camera IP", Constraint::Length(16)),
            ("Camera", Constraint::Length(12)),
            ("Location", Constraint::Min(12)),
        ]
    }

    fn cells(&self) -> Vec<Cell<'static>> {
        vec![
            Cell::from(self.id.to_string()),
            Cell::from(self.sam_id.clone()),
            Cell::from(self.device_ip.clone().unwrap_or_default()),
            Cell::from(self.camera_ip.clone().unwrap_or_default()),
            Cell::from(self.camera_type.clone().unwrap_or_default()),
            Cell::from(self.location.clone().unwrap_or_default()),
        ]
    }

    fn records(action: &Action) -> Option<&Arc<Vec<Arc<Self>>>> {
        match action {
            Action::DevicesUpdated(devices) => Some(devices),
            _ => None,
        }
    }

    fn create_form() -> Form {
        device_form("Add device".into(), None)
    }

    fn edit_form(&self) -> Form {
        device_form(format!("Edit {}", self.sam_id), Some(self))
            .hint("leave the camera password blank to keep it")
    }

    fn create_command(form: &Form) -> Result<Command, CoreError> {
        Ok(Command::AddDevice(CreateDeviceRequest {
            sam_id: form.value("sam_id").trim().to_owned(),
            device_id: form.optional("device_id"),
            device_ip: form.optional("device_ip"),
            device_username: form.optional("device_username"),
            device_root_folder: form.optional("device_root_folder"),
            camera_ip: form.optional("camera_ip"),
            camera_username: form.optional("camera_username"),
            camera_password: form.secret_value("camera_password"),
            camera_root_folder: form.optional("camera_root_folder"),
            camera_type: form.optional("camera_type"),
            location: form.optional("location"),
        }))
    }

    fn update_command(&self, form: &Form) -> Result<Command, CoreError> {
        let changed = |key: &str| {
            let value = form.optional(key);
            (value.as_deref() != field(self, key)).then_some(value).flatten()
        };
        let sam_id = form.value("sam_id").trim();
        Ok(Command::UpdateDevice {
            id: self.id,
            update: UpdateDeviceRequest {
                sam_id: (sam_id != self.sam_id).then(|| sam_id.to_owned()),
                device_id: changed("device_id"),
                device_ip: changed("device_ip"),
                device_username: changed("device_username"),
                device_root_folder: changed("device_root_folder"),
                camera_ip: changed("camera_ip"),
                camera_username: changed("camera_username"),
                camera_password: form.secret_value("camera_password"),
                camera_root_folder: changed("camera_root_folder"),
                camera_type: changed("camera_type"),
                location: changed("location"),
            },
        })
    }

    /// The backend deletes devices by SAM ID.
    fn delete_command(rows: &[Arc<Self>]) -> Option<Command> {
        Some(Command::DeleteDevices {
            sam_ids: rows.iter().map(|d| d.sam_id.clone()).collect(),
        })
    }
}
