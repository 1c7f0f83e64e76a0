//! # Debounce Timer
//!
//! A cancellable one-shot timer. Arming it aborts whatever was armed before,
//! so a burst of calls collapses into a single firing for the last value.
//!
//! Requires a tokio runtime: the timer runs as a spawned task that sleeps and
//! then hands its value to the `fire` callback.

use std::time::Duration;

use log::debug;
use tokio::task::AbortHandle;

/// Default quiet period before a search is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

pub struct Debouncer {
    delay: Duration,
    pending: Option<AbortHandle>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending timer, then arms a new one that calls
    /// `fire(value)` once `after` has elapsed.
    pub fn schedule<T, F>(&mut self, value: T, after: Duration, fire: F)
    where
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.cancel_pending();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            fire(value);
        });
        self.pending = Some(handle.abort_handle());
    }

    /// Arms the timer with the configured delay.
    pub fn schedule_default<T, F>(&mut self, value: T, fire: F)
    where
        T: Send + 'static,
        F: FnOnce(T) + Send + 'static,
    {
        self.schedule(value, self.delay, fire);
    }

    /// Aborts the pending timer. Returns `true` if one was still waiting.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("Cancelled pending debounce timer");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::default();

        for text in ["b", "br", "bra"] {
            let tx = tx.clone();
            debouncer.schedule_default(text.to_string(), move |v| {
                tx.send(v).unwrap();
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;
        let fired: Vec<String> = rx.try_iter().collect();
        assert_eq!(fired, vec!["bra".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_full_quiet_period() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        debouncer.schedule_default(1u32, move |v| tx.send(v).unwrap());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().unwrap(), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_prevents_firing() {
        let (tx, rx) = mpsc::channel();
        let mut debouncer = Debouncer::default();
        debouncer.schedule_default((), move |_| tx.send(()).unwrap());
        assert!(debouncer.cancel_pending());
        assert!(!debouncer.cancel_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
    }
}
