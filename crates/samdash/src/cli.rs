//! Clap derive structures for the `samdash` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// samdash -- kubectl-style CLI for a SAM speed-monitoring fleet
#[derive(Debug, Parser)]
#[command(
    name = "samdash",
    version,
    about = "Administer a SAM speed-monitoring fleet from the command line",
    long_about = "Manage users, SAM units, locations, alert recipients and device\n\
        permissions, browse activity logs, and query or export speed telemetry.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SAMDASH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 'u', env = "SAMDASH_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SAMDASH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SAMDASH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "SAMDASH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session for later commands
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Manage user accounts
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Manage SAM units
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Manage installation locations
    #[command(alias = "loc")]
    Locations(LocationsArgs),

    /// Manage alert email recipients
    Emails(EmailsArgs),

    /// Browse the activity log
    Logs(LogsArgs),

    /// Manage which users may access which SAM units
    Access(AccessArgs),

    /// Query and export speed telemetry
    Data(DataArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared filter, sort and pagination arguments for all list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring match on the list's name column
    #[arg(long, short = 'f')]
    pub filter: Option<String>,

    /// Sort column
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Rows per page (0 shows every row)
    #[arg(long, short = 'l')]
    pub page_size: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    /// The list's name column
    Name,
    /// Numeric record id
    Id,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CredentialArg {
    Guest,
    Operator,
    Admin,
    Superadmin,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account name (defaults to the profile's username)
    pub username: Option<String>,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List user accounts
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one user account
    Get {
        /// Numeric user id
        id: i64,
    },

    /// Register a new account (prompts for the password)
    #[command(alias = "add")]
    Register {
        /// Login name
        username: String,

        /// Business identifier (e.g. U001)
        #[arg(long)]
        user_id: Option<String>,

        /// Access level
        #[arg(long, value_enum, default_value = "guest")]
        credential: CredentialArg,

        /// Read the password from stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },

    /// Change an account's name, access level or password
    Update {
        /// Numeric user id
        id: i64,

        /// New login name
        #[arg(long)]
        username: Option<String>,

        /// New access level
        #[arg(long, value_enum)]
        credential: Option<CredentialArg>,

        /// Prompt for a new password
        #[arg(long)]
        password: bool,
    },

    /// Delete one or more accounts
    #[command(alias = "rm")]
    Delete {
        /// Numeric user ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEVICES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List SAM units
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one SAM unit
    Get {
        /// SAM ID
        sam_id: String,
    },

    /// Register a new SAM unit
    Add {
        /// SAM ID
        sam_id: String,

        #[command(flatten)]
        fields: DeviceFieldArgs,
    },

    /// Change a SAM unit's settings
    Update {
        /// Numeric device id
        id: i64,

        /// New SAM ID
        #[arg(long)]
        sam_id: Option<String>,

        #[command(flatten)]
        fields: DeviceFieldArgs,
    },

    /// Delete one or more SAM units
    #[command(alias = "rm")]
    Delete {
        /// SAM IDs
        #[arg(required = true)]
        sam_ids: Vec<String>,
    },

    /// Show backend host information
    Info,
}

/// Optional device settings shared by `add` and `update`.
#[derive(Debug, Args)]
pub struct DeviceFieldArgs {
    /// Hardware identifier
    #[arg(long)]
    pub device_id: Option<String>,

    /// Unit IP address
    #[arg(long)]
    pub device_ip: Option<String>,

    /// Unit login name
    #[arg(long)]
    pub device_username: Option<String>,

    /// Unit storage root
    #[arg(long)]
    pub device_root_folder: Option<String>,

    /// Camera IP address
    #[arg(long)]
    pub camera_ip: Option<String>,

    /// Camera login name
    #[arg(long)]
    pub camera_username: Option<String>,

    /// Prompt for the camera password
    #[arg(long)]
    pub camera_password: bool,

    /// Camera storage root
    #[arg(long)]
    pub camera_root_folder: Option<String>,

    /// Camera model
    #[arg(long)]
    pub camera_type: Option<String>,

    /// Installation location name
    #[arg(long)]
    pub location: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOCATIONS / EMAILS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LocationsArgs {
    #[command(subcommand)]
    pub command: LocationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LocationsCommand {
    /// List locations
    #[command(alias = "ls")]
    List(ListArgs),

    /// Create a location
    Create {
        /// Location name
        name: String,
    },

    /// Rename a location
    Update {
        /// Numeric location id
        id: i64,

        /// New name
        name: String,
    },

    /// Delete one or more locations
    #[command(alias = "rm")]
    Delete {
        /// Numeric location ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Debug, Args)]
pub struct EmailsArgs {
    #[command(subcommand)]
    pub command: EmailsCommand,
}

#[derive(Debug, Subcommand)]
pub enum EmailsCommand {
    /// List alert recipients
    #[command(alias = "ls")]
    List(ListArgs),

    /// Add an alert recipient
    Create {
        /// Email address
        address: String,
    },

    /// Change a recipient's address
    Update {
        /// Numeric recipient id
        id: i64,

        /// New email address
        address: String,
    },

    /// Delete one or more recipients
    #[command(alias = "rm")]
    Delete {
        /// Numeric recipient ids
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    #[command(subcommand)]
    pub command: LogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// List activity log entries
    #[command(alias = "ls")]
    List(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ACCESS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AccessArgs {
    #[command(subcommand)]
    pub command: AccessCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccessCommand {
    /// List the SAM units granted to a user
    #[command(alias = "ls")]
    List {
        /// Numeric user id
        user_id: i64,

        #[command(flatten)]
        list: ListArgs,
    },

    /// List the SAM units the logged-in account may access
    Accessible(ListArgs),

    /// Grant a user access to SAM units
    Grant {
        /// Numeric user id
        user_id: i64,

        /// Numeric device ids
        #[arg(long = "device", short = 'd', required = true, num_args = 1..)]
        device_ids: Vec<i64>,
    },

    /// Revoke a user's access to SAM units
    Revoke {
        /// Numeric user id
        user_id: i64,

        /// Numeric device ids
        #[arg(long = "device", short = 'd', required = true, num_args = 1..)]
        device_ids: Vec<i64>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DATA
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DataArgs {
    #[command(subcommand)]
    pub command: DataCommand,
}

#[derive(Debug, Subcommand)]
pub enum DataCommand {
    /// Show speed readings for one SAM unit
    Query {
        #[command(flatten)]
        filter: TelemetryArgs,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Write every matching reading to `<samId>_<date>.xlsx`
    Export {
        #[command(flatten)]
        filter: TelemetryArgs,

        /// Directory to write the spreadsheet into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

/// Telemetry filter. With no options every reading is returned.
#[derive(Debug, Args)]
pub struct TelemetryArgs {
    /// SAM ID
    pub sam_id: String,

    /// Lowest speed to include
    #[arg(long)]
    pub min_speed: Option<f64>,

    /// Highest speed to include
    #[arg(long)]
    pub max_speed: Option<f64>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Only readings categorised as over speed
    #[arg(long)]
    pub over_speed: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key (url, username, password_env, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
