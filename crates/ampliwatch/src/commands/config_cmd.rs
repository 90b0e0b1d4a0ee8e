//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for table display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "poll_interval = {}", cfg.defaults.poll_interval);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        if let Some(poll) = p.poll_interval {
            let _ = writeln!(out, "poll_interval = {poll}");
        }
    }

    out
}

/// Clone of the config with plaintext passwords masked, so the structured
/// output formats never echo a secret.
fn redacted(cfg: &Config) -> Config {
    let mut clone = cfg.clone();
    for profile in clone.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("****".to_owned());
        }
    }
    clone
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn store_in_keyring(profile_name: &str, password: &str) -> Result<(), CliError> {
    let entry =
        ampliwatch_config::keyring_entry(profile_name).map_err(|e| CliError::Validation {
            field: "keyring".into(),
            reason: format!("failed to access keyring: {e}"),
        })?;
    entry
        .set_password(password)
        .map_err(|e| CliError::Validation {
            field: "keyring".into(),
            reason: format!("failed to store password in keyring: {e}"),
        })?;
    Ok(())
}

/// Offer to store the password in the system keyring or return it for
/// plaintext config. `Some` means the caller writes it to the file.
fn prompt_keyring_storage(profile_name: &str, password: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where should the password live?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        store_in_keyring(profile_name, password)?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password.to_owned()))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => set(&key, value, global),

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: ampliwatch config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name.as_str() == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => set_password(profile, global),
    }
}

// ── Init: interactive wizard ────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("✨ ampliwatch — configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    if cfg.profiles.contains_key(&profile_name)
        && !util::confirm(
            &format!("Profile '{profile_name}' already exists. Overwrite?"),
            global.yes,
        )?
    {
        return Ok(());
    }

    let host: String = Input::new()
        .with_prompt("Router host")
        .default("amplifi.lan".into())
        .interact_text()
        .map_err(prompt_err)?;

    let pass = rpassword::prompt_password("Router password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    let password_field = prompt_keyring_storage(&profile_name, &pass)?;

    let profile = Profile {
        host,
        password: password_field,
        ..Profile::default()
    };

    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(profile_name.clone());
    }

    let path = config::save_config(&cfg)?;

    eprintln!("\n✓ Configuration written to {}", path.display());
    eprintln!("  Active profile: {profile_name}");
    eprintln!("\n  Test it: ampliwatch check");

    Ok(())
}

// ── Set <key> <value> ───────────────────────────────────────────────

fn set(key: &str, value: String, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    let profile = cfg
        .profiles
        .entry(profile_name.clone())
        .or_insert_with(Profile::default);

    match key {
        "host" => profile.host = value,
        "password" => profile.password = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "timeout" => {
            profile.timeout = Some(value.parse().map_err(|_| CliError::Validation {
                field: "timeout".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        "poll_interval" | "poll-interval" => {
            profile.poll_interval = Some(value.parse().map_err(|_| CliError::Validation {
                field: "poll_interval".into(),
                reason: "must be a number (seconds)".into(),
            })?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: host, password, \
                     password_env, timeout, poll_interval"
                ),
            });
        }
    }

    config::save_config(&cfg)?;
    eprintln!("✓ Set {key} on profile '{profile_name}'");
    Ok(())
}

// ── SetPassword ─────────────────────────────────────────────────────

fn set_password(profile: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

    if !cfg.profiles.contains_key(&profile_name) {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: config::available_profiles(&cfg),
        });
    }

    let secret = rpassword::prompt_password("Router password: ").map_err(prompt_err)?;
    if secret.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }

    store_in_keyring(&profile_name, &secret)?;
    eprintln!("✓ Password stored in system keyring for profile '{profile_name}'");
    Ok(())
}
