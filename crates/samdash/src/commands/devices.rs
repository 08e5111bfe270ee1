//! SAM unit command handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{
    Command as CoreCommand, Controller, CreateDeviceRequest, Credential, Device,
    UpdateDeviceRequest,
};

use crate::cli::{DeviceFieldArgs, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(super) struct DeviceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "SAM ID")]
    sam_id: String,
    #[tabled(rename = "Device IP")]
    device_ip: String,
    #[tabled(rename = "Camera IP")]
    camera_ip: String,
    #[tabled(rename = "Camera")]
    camera_type: String,
    #[tabled(rename = "Location")]
    location: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id,
            sam_id: d.sam_id.clone(),
            device_ip: d.device_ip.clone().unwrap_or_default(),
            camera_ip: d.camera_ip.clone().unwrap_or_default(),
            camera_type: d.camera_type.clone().unwrap_or_default(),
            location: d.location.clone().unwrap_or_default(),
        }
    }
}

fn detail(d: &Arc<Device>) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    [
        format!("ID:            {}", d.id),
        format!("SAM ID:        {}", d.sam_id),
        format!("Device ID:     {}", field(&d.device_id)),
        format!("Device IP:     {}", field(&d.device_ip)),
        format!("Device user:   {}", field(&d.device_username)),
        format!("Device root:   {}", field(&d.device_root_folder)),
        format!("Camera IP:     {}", field(&d.camera_ip)),
        format!("Camera user:   {}", field(&d.camera_username)),
        format!("Camera root:   {}", field(&d.camera_root_folder)),
        format!("Camera type:   {}", field(&d.camera_type)),
        format!("Location:      {}", field(&d.location)),
    ]
    .join("\n")
}

fn camera_password(fields: &DeviceFieldArgs) -> Result<Option<secrecy::SecretString>, CliError> {
    if fields.camera_password {
        Ok(Some(util::read_password("Camera password: ", false)?))
    } else {
        Ok(None)
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List(list) => {
            util::with_spinner(global, "Loading devices", controller.refresh_devices()).await?;
            let page = util::list_page(&controller.devices_snapshot(), &list, global);
            let out = output::render_list(
                &global.output,
                &page.items,
                |x| DeviceRow::from(x),
                |d| d.sam_id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { sam_id } => {
            util::with_spinner(global, "Loading devices", controller.refresh_devices()).await?;
            let device = controller
                .store()
                .device_by_sam_id(&sam_id)
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: sam_id,
                    list_command: "devices list".into(),
                })?;
            let out =
                output::render_single(&global.output, &device, detail, |d| d.sam_id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Add { sam_id, fields } => {
            util::require_credential(controller, Credential::Operator, "Adding devices")?;
            let camera_password = camera_password(&fields)?;
            let cmd = CoreCommand::AddDevice(CreateDeviceRequest {
                sam_id,
                device_id: fields.device_id,
                device_ip: fields.device_ip,
                device_username: fields.device_username,
                device_root_folder: fields.device_root_folder,
                camera_ip: fields.camera_ip,
                camera_username: fields.camera_username,
                camera_password,
                camera_root_folder: fields.camera_root_folder,
                camera_type: fields.camera_type,
                location: fields.location,
            });
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }

        DevicesCommand::Update { id, sam_id, fields } => {
            util::require_credential(controller, Credential::Operator, "Updating devices")?;
            let camera_password = camera_password(&fields)?;
            let cmd = CoreCommand::UpdateDevice {
                id,
                update: UpdateDeviceRequest {
                    sam_id,
                    device_id: fields.device_id,
                    device_ip: fields.device_ip,
                    device_username: fields.device_username,
                    device_root_folder: fields.device_root_folder,
                    camera_ip: fields.camera_ip,
                    camera_username: fields.camera_username,
                    camera_password,
                    camera_root_folder: fields.camera_root_folder,
                    camera_type: fields.camera_type,
                    location: fields.location,
                },
            };
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }

        DevicesCommand::Delete { sam_ids } => {
            util::require_credential(controller, Credential::Operator, "Deleting devices")?;
            let prompt = format!(
                "Delete {}?",
                util::count_noun(sam_ids.len(), "device", "devices")
            );
            if !util::confirm(&prompt, global)? {
                return Ok(());
            }
            util::run_command(controller, CoreCommand::DeleteDevices { sam_ids }, global).await?;
            Ok(())
        }

        DevicesCommand::Info => {
            let info = util::with_spinner(global, "Loading", controller.system_info()).await?;
            let out = output::render_single(
                &global.output,
                &info,
                |v| serde_json::to_string_pretty(v).unwrap_or_default(),
                ToString::to_string,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
