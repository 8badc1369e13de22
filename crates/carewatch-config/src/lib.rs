//! Shared configuration for the CareWatch CLI.
//!
//! TOML profiles, credential resolution (keyring + env + plaintext),
//! and translation to `carewatch_core::BackendConfig`. The binary adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use carewatch_core::{AuthCredentials, BackendConfig, Role, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Alarm monitor poll cadence in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
            poll_interval: default_poll_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    BackendConfig::DEFAULT_POLL_INTERVAL_SECS
}

/// A named backend profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Backend base URL (e.g., "https://monitor.example.com").
    pub server: String,

    /// Tenant hint for multi-tenant installs.
    pub tenant: Option<String>,

    /// Pre-issued access token (plaintext — prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Account for credential login.
    pub account: Option<String>,

    /// Password for credential login (plaintext — prefer keyring).
    pub password: Option<String>,

    /// Session role override. Mandatory with token auth; with
    /// credential auth the login response wins when unset.
    pub role: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,

    /// Override the poll cadence.
    pub poll_interval: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "carewatch", "carewatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("carewatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load a Config from an explicit file path + environment.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CAREWATCH_").split("_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve an access token from the credential chain.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("carewatch", &format!("{profile_name}/token")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve account credentials (account + password).
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let account = profile
        .account
        .clone()
        .or_else(|| std::env::var("CAREWATCH_ACCOUNT").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("CAREWATCH_PASSWORD") {
        return Ok((account, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new("carewatch", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok((account, SecretString::from(pw)));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((account, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile.
///
/// A configured token (any source) wins over account credentials.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    let wants_token = profile.token.is_some() || profile.token_env.is_some();

    if wants_token {
        let token = resolve_token(profile, profile_name)?;
        return Ok(AuthCredentials::Token(token));
    }

    let (account, password) = resolve_credentials(profile, profile_name)?;
    Ok(AuthCredentials::Credentials { account, password })
}

// ── Translation to BackendConfig ────────────────────────────────────

/// Build a `BackendConfig` from a profile — no CLI flag overrides.
pub fn profile_to_backend_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<BackendConfig, ConfigError> {
    let url: url::Url = profile
        .server
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {}", profile.server),
        })?;

    let auth = resolve_auth(profile, profile_name)?;

    let role = profile
        .role
        .as_deref()
        .map(|code| {
            Role::from_str(code).map_err(|_| ConfigError::Validation {
                field: "role".into(),
                reason: format!("unknown role: {code}"),
            })
        })
        .transpose()?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(BackendConfig {
        url,
        auth,
        role,
        tenant: profile.tenant.clone(),
        tls,
        timeout,
        poll_interval_secs: profile.poll_interval.unwrap_or(defaults.poll_interval),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(server: &str) -> Profile {
        Profile {
            server: server.into(),
            token: Some("tok".into()),
            role: Some("Nurse".into()),
            ..Profile::default()
        }
    }

    #[test]
    fn default_config_has_a_default_profile_name() {
        let cfg = Config::default();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.poll_interval, 10);
    }

    #[test]
    fn profile_translates_to_backend_config() {
        let p = profile("https://monitor.example.com");
        let backend = profile_to_backend_config(&p, "default", &Defaults::default()).unwrap();

        assert_eq!(backend.url.as_str(), "https://monitor.example.com/");
        assert_eq!(backend.role, Some(Role::Nurse));
        assert_eq!(backend.poll_interval_secs, 10);
        assert_eq!(backend.tls, TlsVerification::SystemDefaults);
        assert!(matches!(backend.auth, AuthCredentials::Token(_)));
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let p = profile("not a url");
        let err = profile_to_backend_config(&p, "default", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let mut p = profile("https://monitor.example.com");
        p.role = Some("Janitor".into());
        let err = profile_to_backend_config(&p, "default", &Defaults::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "role"));
    }

    #[test]
    fn insecure_flag_switches_tls_mode() {
        let mut p = profile("https://monitor.example.com");
        p.insecure = Some(true);
        let backend = profile_to_backend_config(&p, "default", &Defaults::default()).unwrap();
        assert_eq!(backend.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn missing_credentials_name_the_profile() {
        let p = Profile {
            server: "https://monitor.example.com".into(),
            ..Profile::default()
        };
        let err = resolve_auth(&p, "ward-3").unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref profile } if profile == "ward-3"));
    }

    #[test]
    fn toml_profile_round_trips() {
        let toml_src = r#"
            default_profile = "main"

            [defaults]
            timeout = 15

            [profiles.main]
            server = "https://monitor.example.com"
            account = "nurse01"
            password = "pw"
            poll_interval = 5
        "#;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml_src).unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("main"));
        assert_eq!(cfg.defaults.timeout, 15);

        let p = cfg.profiles.get("main").unwrap();
        let backend = profile_to_backend_config(p, "main", &cfg.defaults).unwrap();
        assert_eq!(backend.poll_interval_secs, 5);
        assert!(matches!(backend.auth, AuthCredentials::Credentials { .. }));
    }
}
