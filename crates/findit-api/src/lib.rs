//! `findit-api` -- Async Rust client for the FindIt lost-and-found REST API.
//!
//! Wraps the HTTP surface of a FindIt server: cookie-based session auth
//! (check/login/register/logout), filtered item listings, multipart item
//! create/update, and the category list. Every response passes through a
//! typed decode boundary -- callers receive the entities in [`models`] or
//! a typed [`Error`], never raw JSON.
//!
//! ```no_run
//! use findit_api::{ApiClient, FilterSpec, TransportConfig};
//!
//! # async fn example() -> Result<(), findit_api::Error> {
//! let base = "https://findit.example.com".parse()?;
//! let client = ApiClient::new(base, &TransportConfig::default())?;
//! let items = client.list_items(&FilterSpec::default()).await?;
//! # let _ = items;
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod error;
mod filter;
mod items;
mod models;
mod transport;

pub use auth::AUTH_CHECK_DEADLINE;
pub use client::ApiClient;
pub use error::Error;
pub use filter::FilterSpec;
pub use items::{ImageAttachment, ItemPayload};
pub use models::{AuthCheck, Category, Item, ItemType, UserRecord};
pub use transport::{TlsMode, TransportConfig};
