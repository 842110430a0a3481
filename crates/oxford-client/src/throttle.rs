use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::debug;

/// Token bucket shared by every request a client sends.
///
/// Requests wait for a token instead of being rejected; a rate of zero turns
/// throttling off.
#[derive(Debug)]
pub struct Throttle {
    rate_per_sec: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
    waits: AtomicU64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

impl Throttle {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        let burst = f64::from(burst.max(1));
        Self {
            rate_per_sec: f64::from(rate_per_sec),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
            waits: AtomicU64::new(0),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(0, 1)
    }

    /// Wait until a request may be sent.
    pub async fn acquire(&self) {
        while let Err(wait) = self.try_acquire() {
            self.waits.fetch_add(1, Ordering::Relaxed);
            debug!(wait_ms = wait.as_millis() as u64, "throttling provider request");
            sleep(wait).await;
        }
    }

    /// Number of times a caller had to wait for a token.
    pub fn waits(&self) -> u64 {
        self.waits.load(Ordering::Relaxed)
    }

    /// Take a token now, or report how long until one is available.
    fn try_acquire(&self) -> Result<(), Duration> {
        if self.rate_per_sec <= 0.0 {
            return Ok(());
        }
        let mut bucket = self.bucket.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();
        let elapsed = now
            .saturating_duration_since(bucket.last_refill)
            .as_secs_f64();
        if elapsed > 0.0 {
            bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
            bucket.last_refill = now;
        }
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64(
                (1.0 - bucket.tokens) / self.rate_per_sec,
            ))
        }
    }
}
