//! Location command handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{Command as CoreCommand, Controller, Credential, Location};

use crate::cli::{GlobalOpts, LocationsArgs, LocationsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LocationRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Location")]
    name: String,
}

impl From<&Arc<Location>> for LocationRow {
    fn from(l: &Arc<Location>) -> Self {
        Self {
            id: l.id,
            name: l.name.clone(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: LocationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LocationsCommand::List(list) => {
            util::with_spinner(global, "Loading locations", controller.refresh_locations())
                .await?;
            let page = util::list_page(&controller.locations_snapshot(), &list, global);
            let out = output::render_list(&global.output, &page.items, |x| LocationRow::from(x), |l| {
                l.name.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        LocationsCommand::Create { name } => {
            util::require_credential(controller, Credential::Operator, "Creating locations")?;
            util::run_command(controller, CoreCommand::CreateLocation { name }, global).await?;
            Ok(())
        }

        LocationsCommand::Update { id, name } => {
            util::require_credential(controller, Credential::Operator, "Renaming locations")?;
            util::run_command(controller, CoreCommand::UpdateLocation { id, name }, global)
                .await?;
            Ok(())
        }

        LocationsCommand::Delete { ids } => {
            util::require_credential(controller, Credential::Operator, "Deleting locations")?;
            let prompt = format!(
                "Delete {}?",
                util::count_noun(ids.len(), "location", "locations")
            );
            if !util::confirm(&prompt, global)? {
                return Ok(());
            }
            util::run_command(controller, CoreCommand::DeleteLocations { ids }, global).await?;
            Ok(())
        }
    }
}
