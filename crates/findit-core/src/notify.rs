// ── Notification channel ──
//
// Process-wide queue of ephemeral, auto-dismissing messages. Producers
// fire and forget; subscribers receive the full queue snapshot on every
// change via a `watch` channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

/// Default lifetime of a posted notification.
pub const DEFAULT_TTL: Duration = Duration::from_millis(5000);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

/// A single queued notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Opaque token, unique within the current queue.
    pub id: u64,
    pub message: String,
    pub kind: NotifyKind,
    pub ttl: Duration,
}

/// Handle to the notification queue. Cheap to clone; all clones share
/// the same queue.
///
/// Must be used from within a tokio runtime -- each post spawns a timer
/// task that dismisses the notification after its ttl.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    next_id: AtomicU64,
    queue: watch::Sender<Arc<Vec<Notification>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (queue, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            inner: Arc::new(NotifierInner {
                next_id: AtomicU64::new(1),
                queue,
            }),
        }
    }

    /// Append a notification with the default ttl. Returns its token.
    pub fn post(&self, message: impl Into<String>, kind: NotifyKind) -> u64 {
        self.post_with_ttl(message, kind, DEFAULT_TTL)
    }

    /// Append a notification that self-dismisses after `ttl`.
    ///
    /// Display ordering is insertion order; duplicate messages are not
    /// coalesced.
    pub fn post_with_ttl(&self, message: impl Into<String>, kind: NotifyKind, ttl: Duration) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            ttl,
        };

        self.push(notification);

        // Timer task: dismiss after the ttl unless the user got there first.
        let notifier = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            notifier.dismiss(id);
        });

        id
    }

    /// Convenience: post a success message.
    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.post(message, NotifyKind::Success)
    }

    /// Convenience: post an error message.
    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.post(message, NotifyKind::Error)
    }

    /// Convenience: post an informational message.
    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.post(message, NotifyKind::Info)
    }

    /// Remove a notification immediately. Removing an id that already
    /// expired is a no-op, so the ttl-vs-dismiss race is harmless.
    pub fn dismiss(&self, id: u64) {
        self.inner.queue.send_modify(|queue| {
            if queue.iter().any(|n| n.id == id) {
                let kept: Vec<Notification> =
                    queue.iter().filter(|n| n.id != id).cloned().collect();
                *queue = Arc::new(kept);
            }
        });
    }

    /// The current queue (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Notification>> {
        self.inner.queue.borrow().clone()
    }

    /// Subscribe to queue changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Notification>>> {
        self.inner.queue.subscribe()
    }

    fn push(&self, notification: Notification) {
        self.inner.queue.send_modify(|queue| {
            let mut next: Vec<Notification> = queue.as_ref().clone();
            next.push(notification);
            *queue = Arc::new(next);
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn post_appends_in_insertion_order() {
        let notifier = Notifier::new();
        notifier.success("first");
        notifier.error("second");

        let queue = notifier.snapshot();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue[0].message, "first");
        assert_eq!(queue[1].message, "second");
        assert_ne!(queue[0].id, queue[1].id);
    }

    #[tokio::test]
    async fn dismiss_removes_and_is_idempotent() {
        let notifier = Notifier::new();
        let id = notifier.info("hello");
        assert_eq!(notifier.snapshot().len(), 1);

        notifier.dismiss(id);
        assert!(notifier.snapshot().is_empty());

        // Second dismissal of the same id is a no-op.
        notifier.dismiss(id);
        assert!(notifier.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn notification_expires_after_its_ttl() {
        let notifier = Notifier::new();
        notifier.post_with_ttl("ephemeral", NotifyKind::Info, Duration::from_millis(100));
        assert_eq!(notifier.snapshot().len(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        // Let the timer task run.
        tokio::task::yield_now().await;
        assert!(notifier.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn early_dismissal_beats_the_timer() {
        let notifier = Notifier::new();
        let id = notifier.post_with_ttl("ephemeral", NotifyKind::Info, Duration::from_millis(100));
        notifier.dismiss(id);
        assert!(notifier.snapshot().is_empty());

        // The timer firing later must not disturb anything.
        tokio::time::sleep(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert!(notifier.snapshot().is_empty());
    }
}
