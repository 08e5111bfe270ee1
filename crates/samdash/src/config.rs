//! CLI configuration: thin wrapper around `samdash_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides (--url,
//! --insecure, --timeout).

use std::time::Duration;

use samdash_core::{ControllerConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use samdash_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password,
    save_config, session_path, store_password,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Build a `ControllerConfig` from the config file, profile, and flags.
///
/// Flags win over profile values. Without a profile, `--url` alone is
/// enough; the session is still scoped to the profile name.
pub fn build_controller_config(global: &GlobalOpts) -> Result<ControllerConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut controller = match (cfg.profiles.get(&profile_name), global.url.as_deref()) {
        (Some(profile), _) => samdash_config::profile_to_controller_config(profile, &profile_name)?,
        (None, Some(url)) => {
            let mut c = ControllerConfig::new(parse_url(url)?);
            c.session_path = Some(session_path(&profile_name));
            c
        }
        (None, None) => {
            if global.profile.is_some() {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: available_profiles(&cfg),
                });
            }
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(ref url) = global.url {
        controller.url = parse_url(url)?;
    }
    if global.insecure || (cfg.defaults.insecure && controller.tls == TlsVerification::SystemDefaults)
    {
        controller.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        controller.timeout = Duration::from_secs(secs);
    } else if cfg.profiles.get(&profile_name).and_then(|p| p.timeout).is_none() {
        controller.timeout = Duration::from_secs(cfg.defaults.timeout);
    }

    Ok(controller)
}

fn parse_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
