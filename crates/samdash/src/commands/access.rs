//! Device permission command handlers.

use samdash_core::{Command as CoreCommand, Controller, Credential};

use crate::cli::{AccessArgs, AccessCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::devices::DeviceRow;
use super::util;

pub async fn handle(
    controller: &Controller,
    args: AccessArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccessCommand::List { user_id, list } => {
            util::require_credential(controller, Credential::Admin, "Viewing permissions")?;
            util::with_spinner(
                global,
                "Loading permissions",
                controller.refresh_permissions(user_id),
            )
            .await?;
            let page = util::list_page(&controller.permissions_snapshot(), &list, global);
            let out = output::render_list(&global.output, &page.items, |x| DeviceRow::from(x), |d| {
                d.sam_id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccessCommand::Accessible(list) => {
            util::with_spinner(
                global,
                "Loading devices",
                controller.refresh_accessible_devices(),
            )
            .await?;
            let page = util::list_page(&controller.accessible_devices_snapshot(), &list, global);
            let out = output::render_list(&global.output, &page.items, |x| DeviceRow::from(x), |d| {
                d.sam_id.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AccessCommand::Grant {
            user_id,
            device_ids,
        } => {
            util::require_credential(controller, Credential::Admin, "Granting access")?;
            let cmd = CoreCommand::AssignDevices {
                user_id,
                device_ids,
            };
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }

        AccessCommand::Revoke {
            user_id,
            device_ids,
        } => {
            util::require_credential(controller, Credential::Admin, "Revoking access")?;
            let prompt = format!(
                "Revoke user {user_id}'s access to {}?",
                util::count_noun(device_ids.len(), "device", "devices")
            );
            if !util::confirm(&prompt, global)? {
                return Ok(());
            }
            let cmd = CoreCommand::RevokeDevices {
                user_id,
                device_ids,
            };
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }
    }
}
