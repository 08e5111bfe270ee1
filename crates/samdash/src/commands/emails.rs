//! Alert recipient command handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{Command as CoreCommand, Controller, Credential, EmailRecipient};

use crate::cli::{EmailsArgs, EmailsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct EmailRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Email")]
    address: String,
}

impl From<&Arc<EmailRecipient>> for EmailRow {
    fn from(e: &Arc<EmailRecipient>) -> Self {
        Self {
            id: e.id,
            address: e.address.clone(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: EmailsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        EmailsCommand::List(list) => {
            util::with_spinner(global, "Loading recipients", controller.refresh_emails()).await?;
            let page = util::list_page(&controller.emails_snapshot(), &list, global);
            let out = output::render_list(&global.output, &page.items, |x| EmailRow::from(x), |e| {
                e.address.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        EmailsCommand::Create { address } => {
            util::require_credential(controller, Credential::Operator, "Adding recipients")?;
            util::run_command(controller, CoreCommand::CreateEmail { address }, global).await?;
            Ok(())
        }

        EmailsCommand::Update { id, address } => {
            util::require_credential(controller, Credential::Operator, "Updating recipients")?;
            util::run_command(controller, CoreCommand::UpdateEmail { id, address }, global)
                .await?;
            Ok(())
        }

        EmailsCommand::Delete { ids } => {
            util::require_credential(controller, Credential::Operator, "Deleting recipients")?;
            let prompt = format!(
                "Delete {}?",
                util::count_noun(ids.len(), "recipient", "recipients")
            );
            if !util::confirm(&prompt, global)? {
                return Ok(());
            }
            util::run_command(controller, CoreCommand::DeleteEmails { ids }, global).await?;
            Ok(())
        }
    }
}
