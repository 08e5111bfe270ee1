//! Telemetry query and export handlers.

use std::sync::Arc;

use tabled::Tabled;

use samdash_core::{CategoryFilter, Controller, TelemetryQuery, TelemetryRecord};

use crate::cli::{DataArgs, DataCommand, GlobalOpts, TelemetryArgs};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ReadingRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "SAM ID")]
    sam_id: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Over Speed")]
    over_speed: String,
}

fn row(r: &Arc<TelemetryRecord>, color: bool) -> ReadingRow {
    ReadingRow {
        id: r.id,
        sam_id: r.sam_id.clone(),
        time: r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        speed: format!("{:.1}", r.speed),
        over_speed: output::paint_over_speed(r.is_over_speed(), color),
    }
}

fn query(args: TelemetryArgs) -> TelemetryQuery {
    TelemetryQuery {
        sam_id: args.sam_id,
        min_speed: args.min_speed,
        max_speed: args.max_speed,
        start_date: args.from,
        end_date: args.to,
        category: if args.over_speed {
            CategoryFilter::OverSpeed
        } else {
            CategoryFilter::All
        },
    }
}

pub async fn handle(
    controller: &Controller,
    args: DataArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DataCommand::Query { filter, list } => {
            let records = util::with_spinner(
                global,
                "Loading readings",
                controller.query_telemetry(query(filter)),
            )
            .await?;
            let page = util::list_page(&records, &list, global);
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.output,
                &page.items,
                |r| row(r, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DataCommand::Export { filter, dir } => {
            let records = util::with_spinner(
                global,
                "Loading readings",
                controller.query_telemetry(query(filter)),
            )
            .await?;
            let path = controller.export_loaded_telemetry(&dir)?;
            output::print_status(
                &format!("✓ Exported {} readings", records.len()),
                global.quiet,
            );
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
