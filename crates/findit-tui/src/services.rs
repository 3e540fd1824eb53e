//! Shared service handles, passed to every screen by clone.
//!
//! This is the dependency-injection seam: screens and background tasks
//! receive these handles instead of reaching for globals, so tests can
//! build a `Services` around a mock server.

use std::sync::Arc;

use findit_api::ApiClient;
use findit_core::{ListingFetcher, Notifier, SessionStore};

/// Everything the screens need to do their work.
#[derive(Clone)]
pub struct Services {
    pub api: Arc<ApiClient>,
    pub session: SessionStore,
    pub notifier: Notifier,
    /// Global listing for the home screen.
    pub home_listing: ListingFetcher,
    /// Owner-scoped listing for the dashboard.
    pub mine_listing: ListingFetcher,
    /// Global listing for the admin panel.
    pub admin_listing: ListingFetcher,
}

impl Services {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let notifier = Notifier::new();
        let session = SessionStore::new(Arc::clone(&api), notifier.clone());
        Self {
            session,
            notifier,
            home_listing: ListingFetcher::new(Arc::clone(&api)),
            mine_listing: ListingFetcher::new(Arc::clone(&api)),
            admin_listing: ListingFetcher::new(Arc::clone(&api)),
            api,
        }
    }
}
