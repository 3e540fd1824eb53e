// ── Session store ──
//
// Single source of truth for "who is logged in". Reached by handle clone
// (dependency injection), never through a global. State changes are
// published on a `watch` channel so guards and views re-evaluate on every
// transition. The server-side session cookie is the durable store; this
// struct never persists anything locally.

use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, warn};

use findit_api::{ApiClient, UserRecord};

use crate::error::CoreError;
use crate::notify::Notifier;

/// Observable authentication state.
///
/// `loading` is true only during the initial bootstrap check or an
/// in-flight login/register/logout call.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserRecord>,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }
}

/// The session store. Cheaply cloneable; all clones share state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: Arc<ApiClient>,
    notifier: Notifier,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store in its initial state (`user` absent, `loading` true).
    ///
    /// Call [`bootstrap`](Self::bootstrap) exactly once afterwards to
    /// resolve the initial check.
    pub fn new(api: Arc<ApiClient>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(SessionState {
            user: None,
            loading: true,
            last_error: None,
        });
        Self {
            inner: Arc::new(SessionInner {
                api,
                notifier,
                state,
            }),
        }
    }

    /// The current state (cheap clone).
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// One-shot startup check of whether a valid server session already
    /// exists for our cookie jar.
    ///
    /// A timeout is the one failure worth telling the user about -- the
    /// server is unreachable and everything else is about to fail too.
    /// Any other failure just means "not logged in" and is logged only.
    /// Always ends with `loading = false`.
    pub async fn bootstrap(&self) {
        match self.inner.api.check_auth().await {
            Ok(check) if check.authenticated => {
                if let Some(user) = check.user {
                    debug!(user = %user.username, "session restored");
                    self.update(|s| s.user = Some(user));
                }
            }
            Ok(_) => {
                debug!("no existing session");
            }
            Err(e) => {
                warn!(error = %e, "authentication check failed");
                if e.is_timeout() {
                    self.inner
                        .notifier
                        .error("Unable to connect to server. Please try again later.");
                }
            }
        }
        self.update(|s| s.loading = false);
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the error is recorded in `last_error`, surfaced as a
    /// notification, and returned to the caller so the login form stays
    /// on the page. `loading` is reset on every path.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), CoreError> {
        self.update(|s| {
            s.loading = true;
            s.last_error = None;
        });

        let result = self.inner.api.login(username, password).await;
        match result {
            Ok(user) => {
                self.update(|s| {
                    s.user = Some(user);
                    s.loading = false;
                });
                self.inner.notifier.success("Successfully logged in!");
                Ok(())
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .map_or_else(|| "Login failed".to_owned(), str::to_owned);
                self.update(|s| {
                    s.last_error = Some(message.clone());
                    s.loading = false;
                });
                self.inner.notifier.error(message);
                Err(e.into())
            }
        }
    }

    /// Create an account. The returned user is already authenticated --
    /// no separate login step. Same failure contract as login.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<(), CoreError> {
        self.update(|s| {
            s.loading = true;
            s.last_error = None;
        });

        let result = self.inner.api.register(username, email, password).await;
        match result {
            Ok(user) => {
                self.update(|s| {
                    s.user = Some(user);
                    s.loading = false;
                });
                self.inner.notifier.success("Account created successfully!");
                Ok(())
            }
            Err(e) => {
                let message = e
                    .server_message()
                    .map_or_else(|| "Registration failed".to_owned(), str::to_owned);
                self.update(|s| {
                    s.last_error = Some(message.clone());
                    s.loading = false;
                });
                self.inner.notifier.error(message);
                Err(e.into())
            }
        }
    }

    /// End the session. Logout always succeeds locally: `user` is cleared
    /// whether or not the remote call worked; a remote failure only
    /// produces an error notification.
    pub async fn logout(&self) {
        self.update(|s| s.loading = true);

        match self.inner.api.logout().await {
            Ok(()) => {
                self.inner.notifier.success("Successfully logged out");
            }
            Err(e) => {
                warn!(error = %e, "logout failed");
                self.inner
                    .notifier
                    .error("Failed to logout. Please try again.");
            }
        }

        self.update(|s| {
            s.user = None;
            s.loading = false;
        });
    }

    /// Clear `last_error`. Synchronous, no side effects.
    pub fn clear_error(&self) {
        self.update(|s| s.last_error = None);
    }

    fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.inner.state.send_modify(f);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, SessionStore, Notifier) {
        let server = MockServer::start().await;
        let base_url = server.uri().parse().unwrap();
        let api = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
        let notifier = Notifier::new();
        let store = SessionStore::new(api, notifier.clone());
        (server, store, notifier)
    }

    fn user_json() -> serde_json::Value {
        json!({
            "id": 1,
            "username": "sam",
            "email": "sam@example.com",
            "is_admin": false,
            "created_at": "2024-06-15T10:30:00"
        })
    }

    #[tokio::test]
    async fn bootstrap_without_session_leaves_user_absent() {
        let (server, store, notifier) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/check-auth"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })),
            )
            .mount(&server)
            .await;

        assert!(store.state().loading);
        store.bootstrap().await;

        let state = store.state();
        assert!(state.user.is_none());
        assert!(!state.loading);
        // Non-timeout failures and anonymous results post nothing.
        assert!(notifier.snapshot().is_empty());
    }

    #[tokio::test]
    async fn bootstrap_restores_existing_session() {
        let (server, store, _notifier) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/check-auth"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "authenticated": true,
                "user": user_json()
            })))
            .mount(&server)
            .await;

        store.bootstrap().await;

        let state = store.state();
        assert_eq!(state.user.unwrap().username, "sam");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn login_success_sets_user_and_resets_loading() {
        let (server, store, notifier) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })),
            )
            .mount(&server)
            .await;

        let secret: SecretString = "hunter22".to_string().into();
        store.login("sam", &secret).await.unwrap();

        let state = store.state();
        assert!(state.is_authenticated());
        assert!(!state.loading);
        assert!(state.last_error.is_none());
        assert!(
            notifier
                .snapshot()
                .iter()
                .any(|n| n.message == "Successfully logged in!")
        );
    }

    #[tokio::test]
    async fn login_failure_records_server_message_and_reraises() {
        let (server, store, notifier) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": "Invalid username or password" })),
            )
            .mount(&server)
            .await;

        let secret: SecretString = "wrong".to_string().into();
        let result = store.login("sam", &secret).await;
        assert!(result.is_err());

        let state = store.state();
        assert!(state.user.is_none());
        assert!(!state.loading);
        assert_eq!(state.last_error.as_deref(), Some("Invalid username or password"));
        assert!(
            notifier
                .snapshot()
                .iter()
                .any(|n| n.message == "Invalid username or password")
        );
    }

    #[tokio::test]
    async fn register_success_authenticates_immediately() {
        let (server, store, _notifier) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/register"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "user": user_json() })),
            )
            .mount(&server)
            .await;

        let secret: SecretString = "hunter22".to_string().into();
        store
            .register("sam", "sam@example.com", &secret)
            .await
            .unwrap();

        assert!(store.state().is_authenticated());
    }

    #[tokio::test]
    async fn logout_clears_user_even_when_remote_call_fails() {
        let (server, store, notifier) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "user": user_json() })),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/logout"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({ "error": "Logout failed" })),
            )
            .mount(&server)
            .await;

        let secret: SecretString = "hunter22".to_string().into();
        store.login("sam", &secret).await.unwrap();
        store.logout().await;

        let state = store.state();
        assert!(state.user.is_none());
        assert!(!state.loading);
        assert!(
            notifier
                .snapshot()
                .iter()
                .any(|n| n.message == "Failed to logout. Please try again.")
        );
    }

    #[tokio::test]
    async fn clear_error_only_touches_last_error() {
        let (server, store, _notifier) = setup().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let secret: SecretString = "wrong".to_string().into();
        let _ = store.login("sam", &secret).await;
        assert!(store.state().last_error.is_some());

        store.clear_error();
        let state = store.state();
        assert!(state.last_error.is_none());
        assert!(!state.loading);
    }
}
