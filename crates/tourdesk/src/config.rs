//! CLI configuration: a thin wrapper around `tourdesk_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --timeout) and builds the session every
//! entity command runs against.

use std::time::Duration;

use secrecy::SecretString;
use tracing::debug;

use tourdesk_config::{Config, Profile};
use tourdesk_core::{ApiClient, NominatimGeocoder, QueryCache, QueryClient, TransportConfig};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use tourdesk_config::{config_path, load_config_or_default, save_config};

/// Everything an entity command needs.
pub struct Session {
    pub client: QueryClient,
    pub geocoder: NominatimGeocoder,
    pub page_size: u32,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build a session from the config file, the active profile and CLI overrides.
///
/// A missing profile is only an error when it was asked for by name; the
/// implicit default falls back to built-in settings.
pub fn build_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(p) => p.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        None => Profile::default(),
    };

    // 1. API URL (flag > env > profile)
    let api_url = global.api_url.as_deref().unwrap_or(&profile.api_url);

    // 2. Transport, with the timeout flag on top
    let mut transport: TransportConfig = profile.transport(&cfg.defaults);
    if let Some(secs) = global.timeout {
        transport = transport.with_timeout(Duration::from_secs(secs));
    }

    // 3. Token (flag/env > profile chain); absent is fine
    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| {
            tourdesk_config::resolve_token(&profile, &profile_name).map(|(token, source)| {
                debug!(?source, "token resolved");
                token
            })
        });

    let api = ApiClient::new(api_url, &transport)
        .map_err(|e| CliError::Validation {
            field: "api_url".into(),
            reason: e.to_string(),
        })?
        .with_token(token);

    let geocoder =
        NominatimGeocoder::new(&profile.geocoder_url, &transport).map_err(|e| {
            CliError::Validation {
                field: "geocoder_url".into(),
                reason: e.to_string(),
            }
        })?;

    debug!(profile = %profile_name, api = %api.base_url(), "session ready");

    Ok(Session {
        client: QueryClient::new(api, QueryCache::new()),
        geocoder,
        page_size: cfg.defaults.page_size,
    })
}

pub fn available_profiles(cfg: &Config) -> String {
    let names = cfg.profile_names();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
