// ── Listing fetcher ──
//
// One filtered page of item listings. Each input change issues exactly one
// fetch; results are published through a `watch` channel. A generation
// counter guards the publish: a response that arrives after a newer fetch
// has started is discarded instead of clobbering fresher state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};

use findit_api::{ApiClient, FilterSpec, Item};

use crate::session::SessionState;

/// Which listing endpoint to hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnerScope {
    /// The global listing (`/api/items`).
    #[default]
    Global,
    /// The current user's own postings (`/api/items/mine`).
    Mine,
}

/// Inputs for one listing view.
#[derive(Debug, Clone, Default)]
pub struct ListingRequest {
    pub filter: FilterSpec,
    pub scope: OwnerScope,
    /// Skip the network entirely when no user is present.
    pub requires_auth: bool,
    /// Truncate the result to this many entries, preserving server order.
    pub max_items: Option<usize>,
}

/// Why a listing rendered empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// Auth-required listing with no signed-in user -- offer sign-in.
    Unauthenticated,
    /// Active filters excluded everything -- offer a filter reset.
    Filtered,
    /// Nothing exists at all -- informational only.
    NoItems,
}

/// Render state of a listing view.
#[derive(Debug, Clone)]
pub enum ListingState {
    Loading,
    Error(String),
    Empty(EmptyReason),
    Populated(Vec<Item>),
}

impl ListingState {
    pub fn items(&self) -> &[Item] {
        match self {
            Self::Populated(items) => items,
            _ => &[],
        }
    }
}

/// Fetches and publishes one listing. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct ListingFetcher {
    inner: Arc<ListingInner>,
}

struct ListingInner {
    api: Arc<ApiClient>,
    state: watch::Sender<ListingState>,
    generation: AtomicU64,
}

impl ListingFetcher {
    pub fn new(api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(ListingState::Loading);
        Self {
            inner: Arc::new(ListingInner {
                api,
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// The current state (cheap clone).
    pub fn state(&self) -> ListingState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ListingState> {
        self.inner.state.subscribe()
    }

    /// Issue exactly one fetch for `request`.
    ///
    /// If `requires_auth` is set and `session` has no user, the network is
    /// never touched and the unauthenticated empty state is published
    /// immediately. Otherwise the result maps to populated/empty/error.
    /// No automatic retry on failure.
    pub async fn fetch(&self, request: &ListingRequest, session: &SessionState) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(generation, ListingState::Loading);

        if request.requires_auth && session.user.is_none() {
            self.publish(generation, ListingState::Empty(EmptyReason::Unauthenticated));
            return;
        }

        let result = match request.scope {
            OwnerScope::Global => self.inner.api.list_items(&request.filter).await,
            OwnerScope::Mine => self.inner.api.list_my_items(&request.filter).await,
        };

        match result {
            Ok(mut items) => {
                if let Some(max) = request.max_items {
                    items.truncate(max);
                }
                debug!(count = items.len(), "listing fetched");
                let state = if items.is_empty() {
                    if request.filter.is_empty() {
                        ListingState::Empty(EmptyReason::NoItems)
                    } else {
                        ListingState::Empty(EmptyReason::Filtered)
                    }
                } else {
                    ListingState::Populated(items)
                };
                self.publish(generation, state);
            }
            Err(e) => {
                warn!(error = %e, "listing fetch failed");
                self.publish(
                    generation,
                    ListingState::Error("Failed to load items. Please try again later.".into()),
                );
            }
        }
    }

    /// The error/empty-state "reset" affordance: clear every filter field
    /// and fetch again. Deliberately not a retry of the identical request.
    pub async fn reset_and_fetch(&self, request: &mut ListingRequest, session: &SessionState) {
        request.filter.clear();
        self.fetch(request, session).await;
    }

    /// Publish `state` unless a newer fetch has started since `generation`.
    fn publish(&self, generation: u64, state: ListingState) {
        if self.inner.generation.load(Ordering::SeqCst) == generation {
            self.inner.state.send_modify(|s| *s = state);
        } else {
            debug!(generation, "discarding stale listing result");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, ListingFetcher) {
        let server = MockServer::start().await;
        let base_url = server.uri().parse().unwrap();
        let api = Arc::new(ApiClient::with_client(reqwest::Client::new(), base_url));
        (server, ListingFetcher::new(api))
    }

    fn item_json(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "uuid": "4f9f1f6a-54b2-4b07-9c3b-0f2a4d9f8b11",
            "title": format!("Item {id}"),
            "description": "Left somewhere, probably",
            "item_type": "lost",
            "date_posted": "2024-06-15T10:30:00",
            "date_occurred": "2024-06-14T18:00:00",
            "location": "Main library",
            "image_url": null,
            "is_resolved": false,
            "category": null,
            "user_id": 2
        })
    }

    fn items_body(ids: std::ops::RangeInclusive<i64>) -> serde_json::Value {
        json!({ "items": ids.map(item_json).collect::<Vec<_>>() })
    }

    fn anonymous() -> SessionState {
        SessionState::default()
    }

    #[tokio::test]
    async fn requires_auth_without_user_never_touches_the_network() {
        let (server, fetcher) = setup().await;

        // Any request at all fails the test.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(1..=3)))
            .expect(0)
            .mount(&server)
            .await;

        let request = ListingRequest {
            requires_auth: true,
            scope: OwnerScope::Mine,
            ..ListingRequest::default()
        };
        fetcher.fetch(&request, &anonymous()).await;

        assert!(matches!(
            fetcher.state(),
            ListingState::Empty(EmptyReason::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn max_items_truncates_in_server_order() {
        let (server, fetcher) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(1..=9)))
            .mount(&server)
            .await;

        let request = ListingRequest {
            max_items: Some(6),
            ..ListingRequest::default()
        };
        fetcher.fetch(&request, &anonymous()).await;

        match fetcher.state() {
            ListingState::Populated(items) => {
                let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
                assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
            }
            other => panic!("expected populated state, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_result_distinguishes_filtered_from_bare() {
        let (server, fetcher) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let mut request = ListingRequest::default();
        fetcher.fetch(&request, &anonymous()).await;
        assert!(matches!(
            fetcher.state(),
            ListingState::Empty(EmptyReason::NoItems)
        ));

        request.filter.apply_search("wallet");
        fetcher.fetch(&request, &anonymous()).await;
        assert!(matches!(
            fetcher.state(),
            ListingState::Empty(EmptyReason::Filtered)
        ));
    }

    #[tokio::test]
    async fn fetch_failure_becomes_error_state() {
        let (server, fetcher) = setup().await;

        Mock::given(method("GET"))
            .and(path("/api/items"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;

        fetcher.fetch(&ListingRequest::default(), &anonymous()).await;

        match fetcher.state() {
            ListingState::Error(message) => {
                assert_eq!(message, "Failed to load items. Please try again later.");
            }
            other => panic!("expected error state, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn reset_and_fetch_clears_filters_first() {
        let (server, fetcher) = setup().await;

        // The filtered request would 500; the reset request succeeds.
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(query_param("search", "wallet"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(1..=2)))
            .mount(&server)
            .await;

        let mut request = ListingRequest::default();
        request.filter.apply_search("wallet");
        fetcher.fetch(&request, &anonymous()).await;
        assert!(matches!(fetcher.state(), ListingState::Error(_)));

        fetcher.reset_and_fetch(&mut request, &anonymous()).await;
        assert!(request.filter.is_empty());
        assert!(matches!(fetcher.state(), ListingState::Populated(_)));
    }

    #[tokio::test]
    async fn stale_response_does_not_clobber_newer_fetch() {
        let (server, fetcher) = setup().await;

        // The slow response answers the first (stale) fetch.
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(query_param("search", "slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(items_body(1..=1))
                    .set_delay(Duration::from_millis(400)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/items"))
            .and(query_param("search", "fast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(items_body(2..=3)))
            .mount(&server)
            .await;

        let mut slow = ListingRequest::default();
        slow.filter.apply_search("slow");
        let mut fast = ListingRequest::default();
        fast.filter.apply_search("fast");

        let slow_task = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch(&slow, &SessionState::default()).await })
        };
        // Give the slow fetch a head start so its generation is older.
        tokio::time::sleep(Duration::from_millis(50)).await;
        fetcher.fetch(&fast, &anonymous()).await;
        slow_task.await.unwrap();

        match fetcher.state() {
            ListingState::Populated(items) => {
                let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
                assert_eq!(ids, vec![2, 3], "stale slow response must be discarded");
            }
            other => panic!("expected populated state, got: {other:?}"),
        }
    }
}
