//! Shared helpers for command handlers.

use std::future::Future;
use std::io::{self, BufRead, IsTerminal};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;

use samdash_core::{
    Command as CoreCommand, CommandResult, Controller, Credential, ListPage, ListQuery, Listable,
    SortDirection, SortKey,
};

use crate::cli::{CredentialArg, GlobalOpts, ListArgs, OutputFormat, SortArg};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Argument conversion ─────────────────────────────────────────────

pub fn credential(arg: CredentialArg) -> Credential {
    match arg {
        CredentialArg::Guest => Credential::Guest,
        CredentialArg::Operator => Credential::Operator,
        CredentialArg::Admin => Credential::Admin,
        CredentialArg::Superadmin => Credential::Superadmin,
    }
}

/// Translate list flags into a `ListQuery`. The page size falls back to
/// the configured default.
pub fn list_query(args: &ListArgs) -> ListQuery {
    let page_size = args
        .page_size
        .unwrap_or_else(|| config::load_config_or_default().defaults.page_size);
    ListQuery {
        filter: args.filter.clone().unwrap_or_default(),
        sort: args.sort.map(|s| match s {
            SortArg::Name => SortKey::Name,
            SortArg::Id => SortKey::Id,
        }),
        direction: if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        },
        page: args.page,
        page_size,
    }
}

/// Filter, sort and page a snapshot, printing the page footer for tables.
pub fn list_page<T: Listable>(
    records: &[Arc<T>],
    args: &ListArgs,
    global: &GlobalOpts,
) -> ListPage<T> {
    let page = list_query(args).apply(records);
    if matches!(global.output, OutputFormat::Table) && page.total_pages > 1 {
        output::print_status(
            &format!(
                "Page {}/{} ({} matching)",
                page.page, page.total_pages, page.matched
            ),
            global.quiet,
        );
    }
    page
}

// ── Permissions ─────────────────────────────────────────────────────

/// Refuse locally when the logged-in account's credential is below `needed`.
pub fn require_credential(
    controller: &Controller,
    needed: Credential,
    action: &str,
) -> Result<(), CliError> {
    let have = controller
        .session()
        .map_or(Credential::Guest, |s| s.credential());
    if have < needed {
        return Err(CliError::PermissionDenied {
            message: format!("{action} requires {needed} access (you are {have})"),
        });
    }
    Ok(())
}

// ── Interaction ─────────────────────────────────────────────────────

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Read a password from one line of stdin or an interactive prompt.
pub fn read_password(prompt: &str, from_stdin: bool) -> Result<SecretString, CliError> {
    let raw = if from_stdin {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_owned()
    } else {
        rpassword::prompt_password(prompt)?
    };
    Ok(SecretString::from(raw))
}

// ── Progress ────────────────────────────────────────────────────────

/// Run `fut` behind a spinner on stderr when stderr is a terminal.
pub async fn with_spinner<T, F>(global: &GlobalOpts, message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    if global.quiet || !io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let result = fut.await;
    spinner.finish_and_clear();
    result
}

/// Execute a mutation and print the controller's success message.
pub async fn run_command(
    controller: &Controller,
    cmd: CoreCommand,
    global: &GlobalOpts,
) -> Result<CommandResult, CliError> {
    let kind = cmd.kind();
    let result = with_spinner(global, "Saving", controller.execute(cmd)).await?;
    if let Some(message) = controller.fetch_state(kind).success {
        output::print_status(&format!("✓ {message}"), global.quiet);
    }
    Ok(result)
}

/// Pluralized noun for confirmation prompts.
pub fn count_noun(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}
