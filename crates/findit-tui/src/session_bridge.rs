//! Session bridge -- connects core watch channels to TUI actions.
//!
//! Runs as a background task: kicks off the one-time session bootstrap,
//! then forwards every session, notification, and listing change as an
//! [`Action`] through the TUI's action channel.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::action::Action;
use crate::services::Services;

/// Forward core state changes into the action loop until cancelled.
pub async fn run_session_bridge(
    services: Services,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut session_rx = services.session.subscribe();
    let mut toasts_rx = services.notifier.subscribe();
    let mut home_rx = services.home_listing.subscribe();
    let mut mine_rx = services.mine_listing.subscribe();
    let mut admin_rx = services.admin_listing.subscribe();

    // Push initial snapshots so screens have state before the first change.
    let _ = action_tx.send(Action::SessionChanged(
        session_rx.borrow_and_update().clone(),
    ));
    let _ = action_tx.send(Action::ToastsChanged(toasts_rx.borrow_and_update().clone()));

    // The one-time "am I logged in" check. Runs concurrently with the
    // forwarding loop so a slow server doesn't freeze the UI.
    let bootstrap = {
        let session = services.session.clone();
        tokio::spawn(async move { session.bootstrap().await })
    };

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = session_rx.changed() => {
                let state = session_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::SessionChanged(state));
            }
            Ok(()) = toasts_rx.changed() => {
                let toasts = toasts_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::ToastsChanged(toasts));
            }
            Ok(()) = home_rx.changed() => {
                let state = home_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::HomeListingChanged(state));
            }
            Ok(()) = mine_rx.changed() => {
                let state = mine_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::MineListingChanged(state));
            }
            Ok(()) = admin_rx.changed() => {
                let state = admin_rx.borrow_and_update().clone();
                let _ = action_tx.send(Action::AdminListingChanged(state));
            }

            else => break,
        }
    }

    bootstrap.abort();
    debug!("session bridge stopped");
}
