// FindIt API HTTP client
//
// Wraps `reqwest::Client` with FindIt-specific URL construction, error-body
// handling, and typed payload decoding. All endpoint groups (auth, items)
// are implemented as inherent methods via separate files to keep this
// module focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiErrorBody;
use crate::transport::TransportConfig;

/// Typed HTTP client for the FindIt REST API.
///
/// Holds the session cookie in its jar after a successful login; every
/// subsequent request is credentialed automatically. Error bodies of the
/// shape `{"error": "..."}` are decoded before the caller sees them, and
/// success payloads are decoded into the typed entities of
/// [`models`](crate::models) -- a mismatched payload yields
/// [`Error::Decode`] rather than an untyped value.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). The `base_url` should
    /// be the server root (e.g. `https://findit.example.com`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Use this when you already have a client with a session cookie in
    /// its jar, or in tests against a mock server.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The underlying HTTP client (for flows that need direct access).
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL for an API path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/api/{path}")).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the response.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a GET request with a per-request deadline.
    ///
    /// Transport timeouts are mapped to [`Error::Timeout`] so callers can
    /// distinguish "server unreachable" from other failures.
    pub(crate) async fn get_with_deadline<T: DeserializeOwned>(
        &self,
        url: Url,
        deadline: Duration,
    ) -> Result<T, Error> {
        debug!("GET {} (deadline {:?})", url, deadline);
        let resp = self
            .http
            .get(url)
            .timeout(deadline)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout {
                        timeout_ms: u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    }
                } else {
                    Error::Transport(e)
                }
            })?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a JSON body and decode the response.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a POST request with a multipart form and decode the response.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        debug!("POST {} (multipart)", url);
        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a PUT request with a multipart form and decode the response.
    pub(crate) async fn put_multipart<T: DeserializeOwned>(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
    ) -> Result<T, Error> {
        debug!("PUT {} (multipart)", url);
        let resp = self
            .http
            .put(url)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Send a DELETE request and decode the response.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("DELETE {}", url);
        let resp = self.http.delete(url).send().await.map_err(Error::Transport)?;
        Self::parse_response(resp).await
    }

    /// Triage the HTTP status, decode `{"error": "..."}` failure bodies,
    /// and decode success payloads into `T`.
    ///
    /// 401 becomes [`Error::Authentication`] carrying the server message
    /// (missing session, bad credentials); every other non-success status
    /// becomes [`Error::Api`]. Absent or undecodable error bodies fall
    /// back to a generic `HTTP {status}` message.
    pub(crate) async fn parse_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| format!("HTTP {status}"));

            return Err(if status == reqwest::StatusCode::UNAUTHORIZED {
                Error::Authentication { message }
            } else {
                Error::Api {
                    message,
                    status: status.as_u16(),
                }
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            let preview = &body[..body.len().min(200)];
            Error::Decode {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}
