// ── Runtime connection configuration ──
//
// These types describe *how* to connect to a CareWatch backend.
// They carry credential data and connection tuning, but never touch
// disk. The CLI constructs a `BackendConfig` and hands it in.

use secrecy::SecretString;
use url::Url;

use crate::model::Role;

/// How to authenticate with the backend.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Pre-issued access token. Requires `BackendConfig::role` to be set
    /// since no login round trip reports the session role.
    Token(SecretString),
    /// Account/password login; the session role comes from the login
    /// response.
    Credentials {
        account: String,
        password: SecretString,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// System CA store (strict). Default -- care backends are expected
    /// to carry real certificates.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed on-premise installs).
    DangerAcceptInvalid,
}

impl PartialEq for TlsVerification {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::SystemDefaults, Self::SystemDefaults)
            | (Self::DangerAcceptInvalid, Self::DangerAcceptInvalid) => true,
            (Self::CustomCa(a), Self::CustomCa(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TlsVerification {}

/// Configuration for connecting to a single backend.
///
/// Built by the CLI, passed to `CareSession` -- core never reads config
/// files.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend URL (e.g., `https://monitor.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// Session role override. Mandatory with `AuthCredentials::Token`;
    /// with credentials auth the login response wins when this is unset.
    pub role: Option<Role>,
    /// Tenant hint forwarded to the backend (multi-tenant installs).
    pub tenant: Option<String>,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Alarm monitor poll cadence in seconds.
    pub poll_interval_secs: u64,
}

impl BackendConfig {
    /// The default poll cadence: a low-frequency status poll whose
    /// interval comfortably exceeds one fetch-and-evaluate cycle.
    pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "https://localhost:8443"
                .parse()
                .expect("default backend URL is valid"),
            auth: AuthCredentials::Credentials {
                account: "admin".into(),
                password: SecretString::from(String::new()),
            },
            role: None,
            tenant: None,
            tls: TlsVerification::default(),
            timeout: std::time::Duration::from_secs(30),
            poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}
