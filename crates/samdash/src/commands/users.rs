//! User account command handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{
    Command as CoreCommand, Controller, Credential, RegisterUserRequest, UpdateUserRequest, User,
};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "User ID")]
    user_id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Credential")]
    credential: String,
}

fn row(u: &Arc<User>, color: bool) -> UserRow {
    UserRow {
        id: u.id,
        user_id: u.user_id.clone().unwrap_or_default(),
        username: u.username.clone(),
        credential: output::paint_credential(u.effective_credential(), color),
    }
}

fn detail(u: &Arc<User>) -> String {
    [
        format!("ID:         {}", u.id),
        format!("User ID:    {}", u.user_id.as_deref().unwrap_or("-")),
        format!("Username:   {}", u.username),
        format!("Credential: {}", u.effective_credential()),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_credential(controller, Credential::Admin, "Managing users")?;

    match args.command {
        UsersCommand::List(list) => {
            util::with_spinner(global, "Loading users", controller.refresh_users()).await?;
            let page = util::list_page(&controller.users_snapshot(), &list, global);
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &page.items,
                |u| row(u, color),
                |u| u.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            util::with_spinner(global, "Loading users", controller.refresh_users()).await?;
            let user = controller.store().user(id).ok_or_else(|| CliError::NotFound {
                resource_type: "user".into(),
                identifier: id.to_string(),
                list_command: "users list".into(),
            })?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Register {
            username,
            user_id,
            credential,
            password_stdin,
        } => {
            let password = util::read_password("Password for the new account: ", password_stdin)?;
            let cmd = CoreCommand::RegisterUser(RegisterUserRequest {
                user_id,
                username,
                password,
                credential: util::credential(credential),
            });
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }

        UsersCommand::Update {
            id,
            username,
            credential,
            password,
        } => {
            let password = if password {
                Some(util::read_password("New password: ", false)?)
            } else {
                None
            };
            let cmd = CoreCommand::UpdateUser {
                id,
                update: UpdateUserRequest {
                    username,
                    password,
                    credential: credential.map(util::credential),
                },
            };
            util::run_command(controller, cmd, global).await?;
            Ok(())
        }

        UsersCommand::Delete { ids } => {
            let prompt = format!("Delete {}?", util::count_noun(ids.len(), "user", "users"));
            if !util::confirm(&prompt, global)? {
                return Ok(());
            }
            util::run_command(controller, CoreCommand::DeleteUsers { ids }, global).await?;
            Ok(())
        }
    }
}
