//! Activity log command handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{Controller, LogEntry};

use crate::cli::{GlobalOpts, LogsArgs, LogsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "File")]
    filename: String,
}

impl From<&Arc<LogEntry>> for LogRow {
    fn from(l: &Arc<LogEntry>) -> Self {
        Self {
            id: l.id,
            time: l
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
            activity: l.activity.clone().unwrap_or_default(),
            speed: l.speed.map(|s| format!("{s:.1}")).unwrap_or_default(),
            filename: l.filename.clone().unwrap_or_default(),
        }
    }
}

pub async fn handle(
    controller: &Controller,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        LogsCommand::List(list) => {
            util::with_spinner(global, "Loading logs", controller.refresh_logs()).await?;
            let page = util::list_page(&controller.logs_snapshot(), &list, global);
            let out = output::render_list(&global.output, &page.items, |x| LogRow::from(x), |l| {
                l.summary().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
