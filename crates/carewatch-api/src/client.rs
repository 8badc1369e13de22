// Backend HTTP client
//
// Wraps `reqwest::Client` with CareWatch-specific URL construction,
// bearer-token injection, and response decoding. Endpoint groups
// (auth, cards, alarms) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the CareWatch backend API.
///
/// Holds the session's bearer token (set by `login()` or supplied
/// pre-issued) and applies it to every request. Responses are decoded
/// with the body preserved on failure for debugging.
pub struct CareClient {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl CareClient {
    /// Create an unauthenticated client from a `TransportConfig`.
    ///
    /// Call [`login()`](Self::login) before hitting authenticated
    /// endpoints. The `base_url` is the backend root
    /// (e.g. `https://monitor.example.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// Create a client with a pre-issued access token.
    pub fn with_token(
        base_url: Url,
        token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let client = Self::new(base_url, transport)?;
        client.set_token(token);
        Ok(client)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether the client currently holds an access token.
    pub fn has_token(&self) -> bool {
        self.token.read().is_ok_and(|t| t.is_some())
    }

    /// Replace the stored access token.
    pub(crate) fn set_token(&self, token: SecretString) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
    }

    /// The underlying HTTP client (for auth flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path relative to the base URL.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn bearer(&self) -> Result<String, Error> {
        let guard = self.token.read().map_err(|_| Error::MissingToken)?;
        let token = guard.as_ref().ok_or(Error::MissingToken)?;
        Ok(format!("Bearer {}", token.expose_secret()))
    }

    /// Send an authenticated GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Send an authenticated POST request with a JSON body and decode the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl serde::Serialize,
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, self.bearer()?)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Map the response status and decode the body, keeping the raw text
    /// around for the deserialization error path.
    pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if !status.is_success() {
            return Err(Error::Api {
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
                status: status.as_u16(),
            });
        }

        // Some mutation endpoints reply with an empty body on success.
        let effective = if body.is_empty() { "null" } else { &body };

        serde_json::from_str(effective).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }
}
