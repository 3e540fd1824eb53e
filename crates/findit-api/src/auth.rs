// Authentication endpoints
//
// Cookie-based session: the login and register endpoints set a session
// cookie in the client's jar; subsequent requests use it automatically.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{AuthCheck, UserEnvelope, UserRecord};

/// Deadline for the one-shot session bootstrap check. Kept short so a dead
/// server doesn't stall application start.
pub const AUTH_CHECK_DEADLINE: Duration = Duration::from_millis(5000);

impl ApiClient {
    /// Ask the server whether the current cookie still names a valid session.
    ///
    /// Used exactly once at startup. Carries its own 5-second deadline
    /// ([`AUTH_CHECK_DEADLINE`]) instead of the transport default; a
    /// timeout surfaces as [`Error::Timeout`].
    pub async fn check_auth(&self) -> Result<AuthCheck, Error> {
        let url = self.api_url("auth/check-auth")?;
        self.get_with_deadline(url, AUTH_CHECK_DEADLINE).await
    }

    /// Exchange credentials for a session cookie.
    ///
    /// On success the cookie is stored in the client's jar and the
    /// authenticated user is returned. A 401 carries the server's message
    /// (e.g. "Invalid username or password") as [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<UserRecord, Error> {
        let url = self.api_url("auth/login")?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let envelope: UserEnvelope = self.post(url, &body).await?;
        debug!(user = %envelope.user.username, "login successful");
        Ok(envelope.user)
    }

    /// Create an account. The new session is authenticated immediately --
    /// no separate login step.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<UserRecord, Error> {
        let url = self.api_url("auth/register")?;
        debug!("registering at {}", url);

        let body = json!({
            "username": username,
            "email": email,
            "password": password.expose_secret(),
        });

        let envelope: UserEnvelope = self.post(url, &body).await?;
        debug!(user = %envelope.user.username, "registration successful");
        Ok(envelope.user)
    }

    /// End the current session server-side.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.api_url("auth/logout")?;
        debug!("logging out at {}", url);

        let resp = self
            .http()
            .post(url)
            .json(&json!({}))
            .send()
            .await
            .map_err(Error::Transport)?;
        let _: serde_json::Value = Self::parse_response(resp).await?;

        debug!("logout complete");
        Ok(())
    }

    /// Fetch the account attached to the current session.
    pub async fn current_user(&self) -> Result<UserRecord, Error> {
        let url = self.api_url("auth/current-user")?;
        let envelope: UserEnvelope = self.get(url, &[]).await?;
        Ok(envelope.user)
    }
}
