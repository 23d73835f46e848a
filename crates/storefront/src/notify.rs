//! Toast notifications.
//!
//! Every [`Notifier::show`] call creates one toast in a container that is
//! created on first use and shared by all clones of the notifier. A toast
//! enters, stays visible for a fixed time, leaves, and is removed. Toasts
//! stack independently: there is no deduplication, no cap and no way to
//! cancel a scheduled dismissal.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use askama::Template;
use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ToastConfig;

const EVENT_CAPACITY: usize = 64;

/// Unique identity of one toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(Uuid);

impl ToastId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a toast is in its on-screen lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Appended to the container, sliding in.
    Entering,
    /// Fully on screen.
    Visible,
    /// Sliding out; removed once the exit animation finishes.
    Leaving,
}

impl ToastPhase {
    /// Modifier class used by the stylesheet.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Entering => "entering",
            Self::Visible => "visible",
            Self::Leaving => "leaving",
        }
    }
}

/// A toast currently in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    /// Optional thumbnail shown beside the message.
    pub image: Option<String>,
    pub phase: ToastPhase,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    #[must_use]
    pub fn image_src(&self) -> &str {
        self.image.as_deref().unwrap_or_default()
    }
}

/// Lifecycle notifications for front ends that draw toasts themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastEvent {
    Shown(Toast),
    PhaseChanged { id: ToastId, phase: ToastPhase },
    Removed(ToastId),
}

/// Notification container markup (`#so-notification-container`).
#[derive(Template)]
#[template(path = "partials/toasts.html")]
pub struct ToastsTemplate<'a> {
    pub toasts: &'a [Toast],
}

/// Presenter for transient toast messages.
///
/// Cheaply cloneable via `Arc`; clones share the same container.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

struct NotifierInner {
    timing: ToastConfig,
    container: OnceLock<ToastContainer>,
    events: broadcast::Sender<ToastEvent>,
}

#[derive(Default)]
struct ToastContainer {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastContainer {
    fn toasts(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.toasts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier {
    #[must_use]
    pub fn new(timing: ToastConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(NotifierInner {
                timing,
                container: OnceLock::new(),
                events,
            }),
        }
    }

    /// Show a toast and schedule its dismissal.
    ///
    /// Dismissal timers run on the current tokio runtime. Outside a runtime
    /// the toast is shown but stays until [`Notifier::dismiss`] is called.
    pub fn show(&self, message: impl Into<String>, image: Option<String>) -> ToastId {
        let toast = Toast {
            id: ToastId::new(),
            message: message.into(),
            image: image.filter(|src| !src.is_empty()),
            phase: ToastPhase::Entering,
            created_at: Utc::now(),
        };
        let id = toast.id;

        debug!(toast = %id, message = %toast.message, "Showing toast");
        self.container().toasts().push(toast.clone());
        let _ = self.inner.events.send(ToastEvent::Shown(toast));

        self.schedule(id);
        id
    }

    /// Start the exit animation early.
    ///
    /// Returns `false` if the toast is already leaving or gone.
    pub fn dismiss(&self, id: ToastId) -> bool {
        if !self.advance(id, &[ToastPhase::Entering, ToastPhase::Visible], ToastPhase::Leaving) {
            return false;
        }

        if let Ok(handle) = Handle::try_current() {
            let notifier = self.clone();
            handle.spawn(async move {
                tokio::time::sleep(notifier.inner.timing.exit_for).await;
                notifier.remove(id);
            });
        } else {
            self.remove(id);
        }
        true
    }

    /// Toasts currently in the container, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner
            .container
            .get()
            .map(|container| container.toasts().clone())
            .unwrap_or_default()
    }

    /// Whether the shared container has been created yet.
    #[must_use]
    pub fn has_container(&self) -> bool {
        self.inner.container.get().is_some()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ToastEvent> {
        self.inner.events.subscribe()
    }

    /// Render the container with its current toasts.
    ///
    /// # Errors
    ///
    /// Returns an error if the template fails to render.
    pub fn render(&self) -> askama::Result<String> {
        let toasts = self.toasts();
        ToastsTemplate { toasts: &toasts }.render()
    }

    fn container(&self) -> &ToastContainer {
        self.inner.container.get_or_init(|| {
            debug!("Creating notification container");
            ToastContainer::default()
        })
    }

    fn schedule(&self, id: ToastId) {
        let Ok(handle) = Handle::try_current() else {
            warn!(toast = %id, "No async runtime, toast will not dismiss itself");
            self.advance(id, &[ToastPhase::Entering], ToastPhase::Visible);
            return;
        };

        let notifier = self.clone();
        handle.spawn(async move {
            // Let the container paint the entering state first
            tokio::task::yield_now().await;
            notifier.advance(id, &[ToastPhase::Entering], ToastPhase::Visible);

            tokio::time::sleep(notifier.inner.timing.visible_for).await;
            if notifier.advance(id, &[ToastPhase::Visible], ToastPhase::Leaving) {
                tokio::time::sleep(notifier.inner.timing.exit_for).await;
                notifier.remove(id);
            }
        });
    }

    fn advance(&self, id: ToastId, from: &[ToastPhase], to: ToastPhase) -> bool {
        let moved = {
            let mut toasts = self.container().toasts();
            match toasts.iter_mut().find(|toast| toast.id == id) {
                Some(toast) if from.contains(&toast.phase) => {
                    toast.phase = to;
                    true
                }
                _ => false,
            }
        };

        if moved {
            let _ = self
                .inner
                .events
                .send(ToastEvent::PhaseChanged { id, phase: to });
        }
        moved
    }

    fn remove(&self, id: ToastId) {
        self.container().toasts().retain(|toast| toast.id != id);
        debug!(toast = %id, "Toast removed");
        let _ = self.inner.events.send(ToastEvent::Removed(id));
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn timing() -> ToastConfig {
        ToastConfig {
            visible_for: Duration::from_millis(4000),
            exit_for: Duration::from_millis(400),
        }
    }

    #[test]
    fn test_container_created_lazily() {
        let notifier = Notifier::new(timing());
        assert!(!notifier.has_container());
        assert!(notifier.toasts().is_empty());

        notifier.show("Hello", None);
        assert!(notifier.has_container());
        assert!(notifier.clone().has_container());
    }

    #[test]
    fn test_show_without_runtime_stays_visible() {
        let notifier = Notifier::new(timing());
        let id = notifier.show("Tee (M) added to cart!", Some("tee.jpg".to_string()));

        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].phase, ToastPhase::Visible);
        assert_eq!(toasts[0].image.as_deref(), Some("tee.jpg"));

        assert!(notifier.dismiss(id));
        assert!(notifier.toasts().is_empty());
        assert!(!notifier.dismiss(id));
    }

    #[test]
    fn test_empty_image_is_dropped() {
        let notifier = Notifier::new(timing());
        notifier.show("No picture", Some(String::new()));
        assert!(!notifier.toasts()[0].has_image());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lifecycle_runs_to_removal() {
        let notifier = Notifier::new(timing());
        let mut events = notifier.subscribe();
        let id = notifier.show("Removed Tee from cart", None);

        assert!(matches!(events.recv().await.unwrap(), ToastEvent::Shown(_)));
        assert_eq!(
            events.recv().await.unwrap(),
            ToastEvent::PhaseChanged { id, phase: ToastPhase::Visible }
        );

        tokio::time::sleep(Duration::from_millis(3999)).await;
        assert_eq!(notifier.toasts()[0].phase, ToastPhase::Visible);

        assert_eq!(
            events.recv().await.unwrap(),
            ToastEvent::PhaseChanged { id, phase: ToastPhase::Leaving }
        );
        assert_eq!(notifier.toasts().len(), 1);

        assert_eq!(events.recv().await.unwrap(), ToastEvent::Removed(id));
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_toasts_stack_independently() {
        let notifier = Notifier::new(timing());
        notifier.show("first", None);
        tokio::time::sleep(Duration::from_millis(1000)).await;
        notifier.show("second", None);
        notifier.show("second", None);
        assert_eq!(notifier.toasts().len(), 3);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let remaining: Vec<_> = notifier.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(remaining, vec!["second", "second"]);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_skips_visible_wait() {
        let notifier = Notifier::new(timing());
        let id = notifier.show("bye", None);
        tokio::task::yield_now().await;

        assert!(notifier.dismiss(id));
        assert_eq!(notifier.toasts()[0].phase, ToastPhase::Leaving);

        tokio::time::sleep(Duration::from_millis(401)).await;
        assert!(notifier.toasts().is_empty());
    }

    #[test]
    fn test_render_container() {
        let notifier = Notifier::new(timing());
        notifier.show("Tee (M) added to cart!", Some("img/tee.jpg".to_string()));
        notifier.show("Removed <Cap> from cart", None);

        let html = notifier.render().unwrap();
        assert!(html.contains("id=\"so-notification-container\""));
        assert_eq!(html.matches("class=\"so-notification ").count(), 2);
        assert!(html.contains("src=\"img/tee.jpg\""));
        assert!(html.contains("Cap"));
        assert!(!html.contains("<Cap>"));
    }
}
