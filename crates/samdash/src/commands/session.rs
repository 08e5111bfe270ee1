//! login / logout / whoami.

use serde::Serialize;

use samdash_core::{Controller, User};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct WhoAmI<'a> {
    #[serde(flatten)]
    user: &'a User,
    backend: String,
}

fn detail(me: &WhoAmI<'_>, color: bool) -> String {
    [
        format!("Username:   {}", me.user.username),
        format!("ID:         {}", me.user.id),
        format!(
            "User ID:    {}",
            me.user.user_id.as_deref().unwrap_or("-")
        ),
        format!(
            "Credential: {}",
            output::paint_credential(me.user.effective_credential(), color)
        ),
        format!("Backend:    {}", me.backend),
    ]
    .join("\n")
}

pub async fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);
    let profile = cfg.profiles.get(&profile_name);
    let controller = Controller::new(config::build_controller_config(global)?)?;

    let username = match args.username.or_else(|| profile.and_then(|p| p.username.clone())) {
        Some(name) => name,
        None => dialoguer::Input::<String>::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| CliError::Io(std::io::Error::other(e)))?,
    };

    let stored = profile.and_then(|p| config::resolve_password(p, &profile_name).ok());
    let password = match stored {
        Some(pw) if !args.password_stdin => pw,
        _ => util::read_password("Password: ", args.password_stdin)?,
    };

    let session = util::with_spinner(
        global,
        "Logging in",
        controller.login(&username, &password),
    )
    .await?;

    output::print_status(
        &format!(
            "✓ Logged in as {} ({})",
            session.user().username,
            session.credential()
        ),
        global.quiet,
    );
    Ok(())
}

/// Always clears the local session, even when the stored token is stale.
pub async fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let controller = Controller::new(config::build_controller_config(global)?)?;
    if let Err(e) = controller.restore_session().await {
        tracing::debug!(error = %e, "could not restore session before logout");
    }
    controller.logout().await?;
    output::print_status("✓ Logged out", global.quiet);
    Ok(())
}

pub fn whoami(controller: &Controller, global: &GlobalOpts) -> Result<(), CliError> {
    let user = controller.current_user().ok_or(CliError::NotLoggedIn)?;
    let me = WhoAmI {
        user: &user,
        backend: controller.config().url.to_string(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &me,
        |m| detail(m, color),
        |m| m.user.username.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
