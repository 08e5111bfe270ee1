//! `samdash config`: profile setup and editing.

use std::collections::BTreeMap;
use std::str::FromStr;

use dialoguer::{Input, Select};
use secrecy::{ExposeSecret, SecretString};

use samdash_core::validate;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const SETTABLE_KEYS: &str =
    "url, username, password_env, insecure, timeout, ca_cert, page_size, output, color";

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("must be {expected}, got '{value}'"),
    })
}

fn check_url(value: &str) -> Result<(), CliError> {
    value
        .parse::<url::Url>()
        .map(drop)
        .map_err(|_| CliError::Validation {
            field: "url".into(),
            reason: format!("invalid URL: {value}"),
        })
}

fn profile_not_found(name: String, cfg: &Config) -> CliError {
    CliError::ProfileNotFound {
        name,
        available: config::available_profiles(cfg),
    }
}

/// Apply `config set <key> <value>`. Display keys land in `[defaults]`,
/// connection keys on the named profile (created if missing).
fn apply_setting(
    cfg: &mut Config,
    profile_name: &str,
    key: &str,
    value: String,
) -> Result<(), CliError> {
    let key = key.replace('-', "_");
    match key.as_str() {
        "page_size" => cfg.defaults.page_size = parse_value(&key, &value, "a whole number")?,
        "output" => cfg.defaults.output = value,
        "color" => cfg.defaults.color = value,
        "url" | "username" | "password_env" | "insecure" | "timeout" | "ca_cert" => {
            let profile = cfg.profiles.entry(profile_name.to_owned()).or_default();
            match key.as_str() {
                "url" => {
                    check_url(&value)?;
                    profile.url = value;
                }
                "username" => profile.username = Some(value),
                "password_env" => profile.password_env = Some(value),
                "insecure" => profile.insecure = Some(parse_value(&key, &value, "true or false")?),
                "timeout" => profile.timeout = Some(parse_value(&key, &value, "seconds")?),
                _ => profile.ca_cert = Some(value.into()),
            }
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!("unknown config key '{other}'. Valid keys: {SETTABLE_KEYS}"),
            });
        }
    }
    Ok(())
}

fn prompt_password() -> Result<SecretString, CliError> {
    let secret = SecretString::from(rpassword::prompt_password("Password: ").map_err(prompt_err)?);
    validate::validate_password(&secret)?;
    Ok(secret)
}

/// Keyring by default; returns the plaintext only when the user opts to
/// keep it in the config file.
fn store_password(profile_name: &str, password: &SecretString) -> Result<Option<String>, CliError> {
    let choice = Select::new()
        .with_prompt("Keep the password where?")
        .items(&["System keyring", "Config file (plaintext)", "Nowhere, ask at login"])
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    match choice {
        0 => {
            config::store_password(profile_name, password)?;
            eprintln!("   ✓ Saved to the system keyring");
            Ok(None)
        }
        1 => Ok(Some(password.expose_secret().to_owned())),
        _ => Ok(None),
    }
}

fn init_wizard() -> Result<(), CliError> {
    let path = config::config_path();
    eprintln!("samdash setup, writing {}\n", path.display());

    let ask = |prompt: &str, default: Option<&str>| -> Result<String, CliError> {
        let mut input = Input::<String>::new().with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_owned());
        }
        input.interact_text().map_err(prompt_err)
    };

    let profile_name = ask("Profile name", Some("default"))?;
    let url = ask("Backend URL", Some("http://localhost:8080"))?;
    check_url(&url)?;
    let username = ask("Username", None)?;
    validate::require_field("Username", &username)?;
    let password = prompt_password()?;
    let password = store_password(&profile_name, &password)?;

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            url,
            username: Some(username),
            password,
            ..Profile::default()
        },
    );
    cfg.default_profile = Some(profile_name.clone());
    config::save_config(&cfg)?;

    eprintln!("\n✓ Profile '{profile_name}' saved and made the default");
    eprintln!("  Next: samdash login && samdash whoami");
    Ok(())
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init_wizard(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default().redacted();
            let text = cfg.to_toml()?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            apply_setting(&mut cfg, &profile_name, &key, value)?;
            config::save_config(&cfg)?;
            eprintln!("✓ {key} updated (profile '{profile_name}')");
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles yet. Run: samdash config init");
                return Ok(());
            }
            let active = config::active_profile_name(global, &cfg);
            let listing: BTreeMap<&str, bool> = cfg
                .profiles
                .keys()
                .map(|name| (name.as_str(), *name == active))
                .collect();
            let out = output::render_single(
                &global.output,
                &listing,
                |l| {
                    l.iter()
                        .map(|(name, on)| {
                            if *on {
                                format!("{name} *")
                            } else {
                                (*name).to_owned()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                },
                |l| l.keys().copied().collect::<Vec<_>>().join("\n"),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Now using profile '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(name, &cfg));
            }
            config::store_password(&name, &prompt_password()?)?;
            eprintln!("✓ Password for '{name}' saved to the system keyring");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn connection_keys_go_on_the_profile() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "lab", "url", "http://10.0.0.5:8080".into()).unwrap();
        apply_setting(&mut cfg, "lab", "ca-cert", "/etc/ssl/sam.pem".into()).unwrap();
        apply_setting(&mut cfg, "lab", "timeout", "12".into()).unwrap();

        let lab = &cfg.profiles["lab"];
        assert_eq!(lab.url, "http://10.0.0.5:8080");
        assert_eq!(lab.timeout, Some(12));
        assert!(lab.ca_cert.is_some());
    }

    #[test]
    fn display_keys_go_on_defaults() {
        let mut cfg = Config::default();
        apply_setting(&mut cfg, "lab", "page-size", "25".into()).unwrap();
        assert_eq!(cfg.defaults.page_size, 25);
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn bad_values_name_the_key() {
        let mut cfg = Config::default();
        let err = apply_setting(&mut cfg, "lab", "insecure", "maybe".into()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "insecure"));

        let err = apply_setting(&mut cfg, "lab", "url", "not a url".into()).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "url"));

        let err = apply_setting(&mut cfg, "lab", "site", "main".into()).unwrap_err();
        assert!(err.to_string().contains("site"));
    }
}
