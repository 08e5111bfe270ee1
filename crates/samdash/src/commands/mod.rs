//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod access;
pub mod config_cmd;
pub mod data;
pub mod devices;
pub mod emails;
pub mod locations;
pub mod logs;
pub mod session;
pub mod users;
pub mod util;

use samdash_core::Controller;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &Controller,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Whoami => session::whoami(controller, global),
        Command::Users(args) => users::handle(controller, args, global).await,
        Command::Devices(args) => devices::handle(controller, args, global).await,
        Command::Locations(args) => locations::handle(controller, args, global).await,
        Command::Emails(args) => emails::handle(controller, args, global).await,
        Command::Logs(args) => logs::handle(controller, args, global).await,
        Command::Access(args) => access::handle(controller, args, global).await,
        Command::Data(args) => data::handle(controller, args, global).await,
        // Handled before a session is restored
        Command::Login(_) | Command::Logout | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
