//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use findit_api::{Category, Item};
use findit_core::{ListingState, Notification, SessionState};

use crate::screen::ScreenId;

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,

    // ── Session / notifications (from the bridge) ─────────────────
    SessionChanged(SessionState),
    ToastsChanged(Arc<Vec<Notification>>),
    DismissToast(u64),

    // ── Listing state (from the bridge) ───────────────────────────
    HomeListingChanged(ListingState),
    MineListingChanged(ListingState),
    AdminListingChanged(ListingState),

    // ── Auth flows ────────────────────────────────────────────────
    /// Login/register completed; navigate to the recorded return path.
    SignedIn,
    RequestLogout,

    // ── Items ─────────────────────────────────────────────────────
    /// Navigate to the detail view and load the item.
    OpenItem(i64),
    /// Navigate to the edit form pre-filled from the item.
    OpenEditItem(i64),
    ItemLoaded(Item),
    /// The edit form's target item arrived (distinct from the detail view's
    /// load so the two screens don't consume each other's results).
    EditTargetLoaded(Item),
    ItemLoadFailed(String),
    /// Create/update succeeded; navigate to the item's detail view.
    ItemSaved(i64),
    /// Create/update failed; the form surfaces the message in its banner.
    ItemSaveFailed(String),
    ItemDeleted(i64),
    CategoriesLoaded(Arc<Vec<Category>>),
}
