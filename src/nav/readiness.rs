//! # Readiness Gate
//!
//! A transition's visual commit waits until every target screen reports
//! itself initialized. Screens with async setup usually hold a
//! [`ReadySignal`] and return `signal.wait()` from `Screen::initialized`.
//!
//! There is no timeout. A screen that never becomes ready parks the
//! transition queue; slow waits are only logged.

use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::host::Screen;

/// Single-fire "ready" flag. Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadySignal {
    /// A signal that is not ready yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A signal that is ready from the start.
    pub fn ready() -> Self {
        let signal = Self::new();
        signal.mark_ready();
        signal
    }

    /// Flips the flag. Later calls are no-ops.
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves on the first `true`.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

/// Waits for every screen in `screens`, warning once if it takes longer
/// than `warn_after`.
pub async fn wait_all(screens: &[Arc<dyn Screen>], warn_after: Duration, label: &str) {
    let started = Instant::now();
    let all = join_all(screens.iter().map(|screen| screen.initialized()));
    tokio::pin!(all);

    tokio::select! {
        _ = &mut all => {}
        _ = tokio::time::sleep(warn_after) => {
            warn!(
                "{}: still waiting for {} screen(s) to become ready after {:?}",
                label,
                screens.len(),
                warn_after
            );
            all.await;
        }
    }

    debug!(
        "{}: {} screen(s) ready after {:?}",
        label,
        screens.len(),
        started.elapsed()
    );
}

/// Runs the gate in the background and calls `on_ready` once it opens.
pub fn spawn_gate(
    screens: Vec<Arc<dyn Screen>>,
    warn_after: Duration,
    label: String,
    on_ready: impl FnOnce() + Send + 'static,
) {
    tokio::spawn(async move {
        wait_all(&screens, warn_after, &label).await;
        on_ready();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElementId;
    use crate::test_support::{FixedScreen, SlowScreen};
    use tokio::sync::oneshot;
    use tokio_test::{assert_pending, assert_ready};

    #[test]
    fn test_signal_starts_unready() {
        let signal = ReadySignal::new();
        assert!(!signal.is_ready());
        signal.mark_ready();
        signal.mark_ready();
        assert!(signal.is_ready());
        assert!(ReadySignal::ready().is_ready());
    }

    #[test]
    fn test_wait_resolves_only_after_mark_ready() {
        let signal = ReadySignal::new();
        let mut wait = tokio_test::task::spawn(signal.wait());
        assert_pending!(wait.poll());

        signal.clone().mark_ready();
        assert!(wait.is_woken());
        assert_ready!(wait.poll());
    }

    #[tokio::test]
    async fn test_wait_all_needs_every_screen() {
        let slow = SlowScreen::new(ElementId(2));
        let signal = slow.signal.clone();
        let screens: Vec<Arc<dyn Screen>> =
            vec![Arc::new(FixedScreen::new(ElementId(1))), Arc::new(slow)];

        let mut wait = tokio_test::task::spawn(wait_all(&screens, Duration::from_secs(60), "test"));
        assert_pending!(wait.poll());

        signal.mark_ready();
        assert_ready!(wait.poll());
    }

    #[tokio::test]
    async fn test_slow_wait_keeps_waiting_past_warning() {
        let slow = SlowScreen::new(ElementId(1));
        let signal = slow.signal.clone();
        let screens: Vec<Arc<dyn Screen>> = vec![Arc::new(slow)];
        let (tx, rx) = oneshot::channel();

        spawn_gate(screens, Duration::from_millis(5), "slow".into(), move || {
            let _ = tx.send(());
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        signal.mark_ready();

        rx.await.unwrap();
    }
}
