// Backend authentication
//
// Token-based login/logout. A successful login stores the access token
// on the client; subsequent requests carry it as a bearer header.

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::CareClient;
use crate::error::Error;
use crate::models::LoginResult;

impl CareClient {
    /// Authenticate with the backend using account/password.
    ///
    /// `POST /api/auth/login`
    ///
    /// On success the returned access token is stored on the client and
    /// applied to all subsequent requests. The result also carries the
    /// session role and tenant, which the caller owns from here on.
    pub async fn login(
        &self,
        account: &str,
        password: &SecretString,
    ) -> Result<LoginResult, Error> {
        let url = self.api_url("/api/auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "user_account": account,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let result: LoginResult = Self::decode(resp).await?;
        self.set_token(SecretString::from(result.access_token.clone()));

        debug!(role = result.role.as_deref().unwrap_or("<none>"), "login successful");
        Ok(result)
    }

    /// End the current session.
    ///
    /// `POST /api/auth/logout` -- best-effort; the backend invalidates
    /// the token server-side.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("/api/auth/logout")?;
        debug!("logging out at {}", url);

        let _: serde_json::Value = self.post(url, &json!({})).await?;

        debug!("logout complete");
        Ok(())
    }
}
