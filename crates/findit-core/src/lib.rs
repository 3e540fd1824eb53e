//! `findit-core` -- session lifecycle and shared services for FindIt clients.
//!
//! Owns the client-side state the views render from:
//!
//! - [`SessionStore`] -- who is logged in, observable via `watch`;
//! - [`Notifier`] -- the fire-and-forget toast queue;
//! - [`guard`] -- route-guard evaluation for authenticated/admin views;
//! - [`ListingFetcher`] -- one filtered page of items with
//!   loading/error/empty/populated states and stale-response discard;
//! - [`forms`] -- client-side validation and item submission.
//!
//! Everything is dependency-injected: services are constructed from an
//! [`ApiClient`](findit_api::ApiClient) handle and passed down by clone,
//! so tests substitute a mock server instead of patching globals.

pub mod error;
pub mod forms;
pub mod guard;
pub mod listing;
pub mod notify;
pub mod session;

pub use error::CoreError;
pub use forms::{FieldErrors, ItemDraft, LoginForm, RegisterForm};
pub use guard::{AccessPolicy, GuardOutcome, Redirect};
pub use listing::{EmptyReason, ListingFetcher, ListingRequest, ListingState, OwnerScope};
pub use notify::{Notification, Notifier, NotifyKind};
pub use session::{SessionState, SessionStore};
