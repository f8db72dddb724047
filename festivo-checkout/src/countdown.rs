use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::models::PaymentConfirmation;

/// Where the countdown sends the user when it fires
pub trait Navigator: Send + Sync {
    fn redirect(&self, route: &str, confirmation: &PaymentConfirmation);
}

/// Navigator that only remembers where it was told to go
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<(String, PaymentConfirmation)>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<(String, PaymentConfirmation)> {
        self.visits.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.visits.lock().map(|v| v.len()).unwrap_or(0)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &str, confirmation: &PaymentConfirmation) {
        if let Ok(mut visits) = self.visits.lock() {
            visits.push((route.to_string(), confirmation.clone()));
        }
    }
}

/// One-shot delayed redirect, ticking once a second.
///
/// Dropping the handle cancels the timer, so a torn-down screen never navigates.
pub struct RedirectCountdown {
    remaining: watch::Receiver<u32>,
    go_now: Option<oneshot::Sender<()>>,
    redirected: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl RedirectCountdown {
    /// Spawn the timer on the current tokio runtime
    pub fn start(
        seconds: u32,
        route: impl Into<String>,
        confirmation: PaymentConfirmation,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let route = route.into();
        let (tick_tx, tick_rx) = watch::channel(seconds);
        let (go_tx, mut go_rx) = oneshot::channel::<()>();
        let redirected = Arc::new(AtomicBool::new(false));
        let flag = redirected.clone();

        info!("Redirecting to {} in {} seconds", route, seconds);

        let handle = tokio::spawn(async move {
            let mut remaining = seconds;
            let mut listening = true;

            while remaining > 0 {
                tokio::select! {
                    _ = sleep(Duration::from_secs(1)) => {
                        remaining -= 1;
                        debug!("Redirect countdown: {}", remaining);
                        let _ = tick_tx.send(remaining);
                    }
                    res = &mut go_rx, if listening => {
                        if res.is_ok() {
                            info!("Redirect requested early with {} seconds left", remaining);
                            let _ = tick_tx.send(0);
                            break;
                        }
                        listening = false;
                    }
                }
            }

            flag.store(true, Ordering::SeqCst);
            navigator.redirect(&route, &confirmation);
            info!("Redirected to {}", route);
        });

        Self {
            remaining: tick_rx,
            go_now: Some(go_tx),
            redirected,
            handle,
        }
    }

    /// Seconds left before the redirect
    pub fn remaining(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Receiver that observes every tick
    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.remaining.clone()
    }

    /// Skip the rest of the countdown. A second call does nothing.
    pub fn go_now(&mut self) {
        if let Some(tx) = self.go_now.take() {
            let _ = tx.send(());
        }
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            info!("Redirect countdown cancelled");
            self.handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn has_redirected(&self) -> bool {
        self.redirected.load(Ordering::SeqCst)
    }

    /// Wait until the timer has redirected or been cancelled
    pub async fn finished(&mut self) {
        let _ = (&mut self.handle).await;
    }
}

impl Drop for RedirectCountdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl std::fmt::Debug for RedirectCountdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedirectCountdown")
            .field("remaining", &self.remaining())
            .field("redirected", &self.has_redirected())
            .finish()
    }
}
