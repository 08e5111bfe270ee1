//! Rendering for `--output table|json|json-compact|yaml|plain`.
//!
//! Structured formats serialize the domain values themselves; `table`
//! goes through a per-command `Tabled` row (lists) or a key/value block
//! (single records); `plain` prints one identifier per line for scripts.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use samdash_core::Credential;

use crate::cli::{ColorMode, OutputFormat};

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal(),
    }
}

pub fn paint_credential(credential: Credential, color: bool) -> String {
    let label = credential.to_string();
    match (credential, color) {
        (_, false) => label,
        (Credential::Superadmin | Credential::Admin, true) => label.magenta().to_string(),
        (Credential::Operator, true) => label.cyan().to_string(),
        (Credential::Guest, true) => label.dimmed().to_string(),
    }
}

pub fn paint_over_speed(over: bool, color: bool) -> String {
    match (over, color) {
        (true, true) => "yes".red().bold().to_string(),
        (true, false) => "yes".into(),
        (false, _) => "no".into(),
    }
}

/// JSON or YAML text for the structured formats, `None` for table/plain.
/// A serializer failure is rendered in place rather than aborting output.
fn structured<T: Serialize + ?Sized>(format: &OutputFormat, data: &T) -> Option<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(data).map_err(|e| e.to_string()),
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| e.to_string()),
        OutputFormat::Table | OutputFormat::Plain => return None,
    };
    Some(text.unwrap_or_else(|e| format!("serialization failed: {e}")))
}

/// Render a page of records. `row` builds the table row, `ident` the
/// plain-format line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    row: impl Fn(&T) -> R,
    ident: impl Fn(&T) -> String,
) -> String
where
    T: Serialize,
    R: Tabled,
{
    if let Some(text) = structured(format, data) {
        return text;
    }
    match format {
        OutputFormat::Plain => data.iter().map(ident).collect::<Vec<_>>().join("\n"),
        _ => Table::new(data.iter().map(row))
            .with(Style::rounded())
            .to_string(),
    }
}

/// Render one record; `table` shows the `detail` key/value block.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail: impl Fn(&T) -> String,
    ident: impl Fn(&T) -> String,
) -> String
where
    T: Serialize + ?Sized,
{
    if let Some(text) = structured(format, data) {
        return text;
    }
    match format {
        OutputFormat::Plain => ident(data),
        _ => detail(data),
    }
}

/// Write to stdout unless `--quiet` or there is nothing to show.
pub fn print_output(output: &str, quiet: bool) {
    if !quiet && !output.is_empty() {
        let _ = writeln!(io::stdout().lock(), "{output}");
    }
}

/// Progress and confirmation lines go to stderr so stdout stays pipeable.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}
