//! CLI-side configuration resolution.
//!
//! Layers CLI flags over the profile loaded by `carewatch-config` and
//! produces the `BackendConfig` the core session consumes.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use carewatch_config::{Config, Defaults, Profile, load_config_or_default};
use carewatch_core::{AuthCredentials, BackendConfig, Role, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use carewatch_config::config_path;

/// The profile name to use: flag, then config default, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `BackendConfig` from the config file, profile, and CLI overrides.
pub fn build_backend_config(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    // If a profile exists, use it with CLI flag overrides
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // No profile found -- try to build from CLI flags / env vars alone
    let url_str = global.server.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    let auth = if let Some(ref token) = global.token {
        AuthCredentials::Token(SecretString::from(token.clone()))
    } else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    Ok(BackendConfig {
        url,
        auth,
        role: parse_role(global.role.as_deref())?,
        tenant: None,
        tls: tls_from_flag(global.insecure),
        timeout: Duration::from_secs(global.timeout.unwrap_or(30)),
        poll_interval_secs: BackendConfig::DEFAULT_POLL_INTERVAL_SECS,
    })
}

/// Resolve a profile into a `BackendConfig`, applying CLI flag overrides.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<BackendConfig, CliError> {
    let mut config =
        carewatch_config::profile_to_backend_config(profile, profile_name, defaults)?;

    if let Some(ref server) = global.server {
        config.url = server.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {server}"),
        })?;
    }

    if let Some(ref token) = global.token {
        config.auth = AuthCredentials::Token(SecretString::from(token.clone()));
    }

    if let Some(role) = parse_role(global.role.as_deref())? {
        config.role = Some(role);
    }

    if global.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }

    if let Some(timeout) = global.timeout {
        config.timeout = Duration::from_secs(timeout);
    }

    Ok(config)
}

fn parse_role(code: Option<&str>) -> Result<Option<Role>, CliError> {
    code.map(|c| {
        Role::from_str(c).map_err(|_| CliError::Validation {
            field: "role".into(),
            reason: format!("unknown role: {c}"),
        })
    })
    .transpose()
}

fn tls_from_flag(insecure: bool) -> TlsVerification {
    if insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    }
}
