//! Observer trait for upload lifecycle events.
//!
//! Inject an [`Arc<dyn UploadObserver>`] via
//! [`crate::config::ClientConfigBuilder::observer`] to drive whatever the
//! host application uses as a selection indicator, busy indicator, and
//! error region — a terminal spinner, a status bar, a log. The client
//! itself never prints anything.
//!
//! The guarantee that matters: for every submission attempt that gets past
//! local validation, `on_submission_start` and `on_submission_finished`
//! are each called exactly once, regardless of how the attempt ends.

use std::sync::Arc;

/// Called by [`crate::client::UploadClient`] as the upload lifecycle
/// progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Implementations must be `Send + Sync`.
pub trait UploadObserver: Send + Sync {
    /// A file passed MIME validation and replaced the stored selection.
    ///
    /// # Arguments
    /// * `name` — filename shown in the selection indicator
    fn on_file_selected(&self, name: &str) {
        let _ = name;
    }

    /// A submission passed local validation and is about to be sent.
    /// Disable the trigger control, show the busy indicator, and clear the
    /// error region and any result still displayed from a previous attempt.
    fn on_submission_start(&self) {}

    /// The submission attempt ended — success, HTTP error, server error,
    /// or transport failure alike. Re-enable the trigger control and hide
    /// the busy indicator.
    fn on_submission_finished(&self) {}

    /// An error became user-visible. Only one error is shown at a time;
    /// each call overwrites the previous message.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// A no-op implementation for callers that don't present any indicators.
///
/// This is the default when no observer is configured.
pub struct NoopObserver;

impl UploadObserver for NoopObserver {}

/// Convenience alias matching the type stored in
/// [`crate::config::ClientConfig`].
pub type Observer = Arc<dyn UploadObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingObserver {
        selected: Mutex<Vec<String>>,
        starts: AtomicUsize,
        finishes: AtomicUsize,
        last_error: Mutex<Option<String>>,
    }

    impl UploadObserver for TrackingObserver {
        fn on_file_selected(&self, name: &str) {
            self.selected.lock().unwrap().push(name.to_string());
        }

        fn on_submission_start(&self) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_submission_finished(&self) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_error(&self, message: &str) {
            *self.last_error.lock().unwrap() = Some(message.to_string());
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let obs = NoopObserver;
        obs.on_file_selected("scan.png");
        obs.on_submission_start();
        obs.on_submission_finished();
        obs.on_error("boom");
    }

    #[test]
    fn tracking_observer_receives_events() {
        let obs = TrackingObserver::default();
        obs.on_file_selected("a.pdf");
        obs.on_submission_start();
        obs.on_error("first");
        obs.on_error("second");
        obs.on_submission_finished();

        assert_eq!(obs.selected.lock().unwrap().as_slice(), ["a.pdf"]);
        assert_eq!(obs.starts.load(Ordering::SeqCst), 1);
        assert_eq!(obs.finishes.load(Ordering::SeqCst), 1);
        // Later errors overwrite earlier ones.
        assert_eq!(obs.last_error.lock().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn arc_dyn_observer_works() {
        let obs: Observer = Arc::new(NoopObserver);
        obs.on_submission_start();
        obs.on_submission_finished();
    }
}
