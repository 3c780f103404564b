//! Inter-request politeness gate

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Duration, Instant};

/// Spaces network requests a fixed interval apart.
///
/// Shared across all fetch workers, so the interval is an aggregate
/// request-rate cap for the whole run no matter how many fetches are in
/// flight. Deliberately non-adaptive: a fixed pause, not a token bucket.
#[derive(Clone)]
pub struct RequestPacer {
    interval: Duration,
    next_slot: Arc<Mutex<Option<Instant>>>,
}

impl RequestPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Claims the next request slot, sleeping until it arrives.
    ///
    /// The first caller proceeds immediately; every later caller is placed
    /// `interval` after the previously claimed slot. The lock is released
    /// before sleeping.
    pub async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }

        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(previous) => (previous + self.interval).max(now),
                None => now,
            };
            *next = Some(slot);
            slot
        };

        sleep_until(slot).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_request_is_not_delayed() {
        let pacer = RequestPacer::new(Duration::from_millis(200));
        let started = Instant::now();
        pacer.wait().await;
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn consecutive_requests_are_spaced() {
        let pacer = RequestPacer::new(Duration::from_millis(60));
        let started = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert!(started.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn zero_interval_disables_pacing() {
        let pacer = RequestPacer::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..50 {
            pacer.wait().await;
        }
        assert!(started.elapsed() < Duration::from_millis(100));
    }
}
