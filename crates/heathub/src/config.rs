//! CLI configuration: a thin wrapper around `heathub_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--address, --secret, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use heathub_config::{ConfigError, Defaults, Profile};
use heathub_core::HubConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use heathub_config::{Config, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `HubConfig` from the config file, active profile, and CLI flags.
///
/// With no matching profile, `--address` plus a secret from `--secret` or
/// `HEATHUB_SECRET` is enough.
pub fn build_hub_config(global: &GlobalOpts) -> Result<HubConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly named profile must exist.
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    let Some(address) = global.address.clone() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    let profile = Profile {
        address,
        ..Profile::default()
    };
    resolve_profile(&profile, &profile_name, &cfg.defaults, global)
}

/// Translate a `Profile` + global flags into a `HubConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<HubConfig, CliError> {
    // A --secret flag stands in for whatever the profile would resolve.
    let with_flag_secret;
    let profile = match global.secret {
        Some(ref secret) => {
            with_flag_secret = Profile {
                secret: Some(secret.clone()),
                secret_env: None,
                ..profile.clone()
            };
            &with_flag_secret
        }
        None => profile,
    };

    let mut config = heathub_config::profile_to_hub_config(profile, profile_name, defaults)
        .map_err(|err| match err {
            ConfigError::NoSecret { profile } => CliError::NoSecret { profile },
            other => CliError::Config(other),
        })?;

    // Flag overrides
    if let Some(ref address) = global.address {
        config.address.clone_from(address);
    }
    if let Some(ref secret) = global.secret {
        config.secret = SecretString::from(secret.clone());
    }
    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }
    Ok(config)
}
