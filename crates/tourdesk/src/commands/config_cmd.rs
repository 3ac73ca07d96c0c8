//! `tourdesk config ...`: profile setup and inspection.

use dialoguer::{Input, Select};

use tourdesk_config::{Config, Profile, store_token};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, available_profiles};
use crate::error::CliError;
use crate::output;

const PROFILE_KEYS: &str =
    "api_url, geocoder_url, token_env, token, debounce_ms, timeout, insecure, ca_cert";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),
        ConfigCommand::Show => show(global),
        ConfigCommand::Set { key, value } => set(global, &key, value),
        ConfigCommand::Profiles => {
            list_profiles(&config::load_config_or_default());
            Ok(())
        }
        ConfigCommand::Use { name } => use_profile(name),
        ConfigCommand::SetToken { profile } => set_token(global, profile),
    }
}

fn prompt_failed(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn init() -> Result<(), CliError> {
    eprintln!("Setting up {}\n", config::config_path().display());

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_failed)?;

    let defaults = Profile::default();
    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(defaults.api_url.clone())
        .interact_text()
        .map_err(prompt_failed)?;
    let mut profile = Profile {
        api_url,
        ..defaults
    };
    profile.validate()?;

    let token =
        rpassword::prompt_password("Access token (empty for none): ").map_err(prompt_failed)?;
    if !token.is_empty() {
        let keep_in_keyring = Select::new()
            .with_prompt("Store the token in")
            .items(&["the system keyring", "config.toml (plaintext)"])
            .default(0)
            .interact()
            .map_err(prompt_failed)?
            == 0;
        if keep_in_keyring {
            store_token(&name, &token)?;
        } else {
            profile.token = Some(token);
        }
    }

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(name.clone(), profile);
    cfg.default_profile = Some(name.clone());
    let path = config::save_config(&cfg)?;

    eprintln!("✓ Wrote {} (profile '{name}')", path.display());
    eprintln!("  Try: tourdesk hotels list");
    Ok(())
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default().redacted();
    let toml = cfg.to_toml()?;
    let out = output::render_single(global.output, &cfg, |_| toml.clone(), |c| {
        c.default_profile.clone().unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn parse<T: std::str::FromStr>(key: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: key.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile. Dashes and underscores are interchangeable.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key.replace('-', "_").as_str() {
        "api_url" => profile.api_url = value,
        "geocoder_url" => profile.geocoder_url = value,
        "token_env" => profile.token_env = Some(value),
        "token" => profile.token = Some(value),
        "debounce_ms" => profile.debounce_ms = parse(key, &value, "milliseconds")?,
        "timeout" => profile.timeout = Some(parse(key, &value, "seconds")?),
        "insecure" => profile.insecure = Some(parse(key, &value, "true or false")?),
        "ca_cert" => profile.ca_cert = Some(value.into()),
        _ => {
            return Err(CliError::Validation {
                field: key.into(),
                reason: format!("unknown key; expected one of {PROFILE_KEYS}"),
            });
        }
    }
    profile.validate()?;
    Ok(())
}

fn set(global: &GlobalOpts, key: &str, value: String) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    let name = config::active_profile_name(global, &cfg);
    set_profile_key(cfg.profiles.entry(name.clone()).or_default(), key, value)?;
    config::save_config(&cfg)?;
    eprintln!("✓ {name}.{key} updated");
    Ok(())
}

fn list_profiles(cfg: &Config) {
    if cfg.profiles.is_empty() {
        eprintln!("No profiles yet. Run `tourdesk config init`.");
        return;
    }
    let current = cfg.active_profile_name(None);
    for name in cfg.profile_names() {
        if name == current {
            println!("{name} *");
        } else {
            println!("{name}");
        }
    }
}

fn use_profile(name: String) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();
    if !cfg.profiles.contains_key(&name) {
        return Err(CliError::ProfileNotFound {
            available: available_profiles(&cfg),
            name,
        });
    }
    eprintln!("✓ Now using '{name}'");
    cfg.default_profile = Some(name);
    config::save_config(&cfg)?;
    Ok(())
}

fn set_token(global: &GlobalOpts, profile: Option<String>) -> Result<(), CliError> {
    let name = profile.unwrap_or_else(|| {
        config::active_profile_name(global, &config::load_config_or_default())
    });
    let token = rpassword::prompt_password("Access token: ").map_err(prompt_failed)?;
    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "cannot be empty".into(),
        });
    }
    store_token(&name, token.trim())?;
    eprintln!("✓ Token for '{name}' saved to the system keyring");
    Ok(())
}
