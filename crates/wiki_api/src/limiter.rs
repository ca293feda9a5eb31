use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Spaces outbound requests at least `min_interval` apart.
///
/// The lock is held for the whole request, so callers sharing one limiter
/// (through an `Arc`) are serialized.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait for the interval to pass, run `request`, record its completion.
    pub fn throttle<T>(&self, request: impl FnOnce() -> T) -> T {
        let mut last_call = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(last) = *last_call {
            let ready_at = last + self.min_interval;
            let now = Instant::now();
            if ready_at > now {
                let wait = ready_at - now;
                log::trace!(target: "wiki_api.request", "rate limited, sleeping {wait:?}");
                std::thread::sleep(wait);
            }
        }
        let out = request();
        *last_call = Some(Instant::now());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_call_runs_immediately() {
        let limiter = RateLimiter::new(Duration::from_secs(60));
        let start = Instant::now();
        assert_eq!(limiter.throttle(|| 7), 7);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn consecutive_calls_are_spaced() {
        let interval = Duration::from_millis(50);
        let limiter = RateLimiter::new(interval);
        limiter.throttle(|| ());
        let start = Instant::now();
        limiter.throttle(|| ());
        assert!(start.elapsed() >= interval);
    }

    #[test]
    fn shared_limiter_serializes_threads() {
        let interval = Duration::from_millis(30);
        let limiter = Arc::new(RateLimiter::new(interval));
        let start = Instant::now();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                std::thread::spawn(move || limiter.throttle(Instant::now))
            })
            .collect();
        let mut stamps: Vec<Instant> = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker thread"))
            .collect();
        stamps.sort();
        assert!(stamps[1] - stamps[0] >= interval);
        assert!(stamps[2] - stamps[1] >= interval);
        assert!(start.elapsed() >= interval * 2);
    }
}
