//! Token bucket throttle for page requests.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::config::ScraperConfig;

/// Token bucket rate limiter shared by all page fetches of one run
pub struct RateLimiter {
    bucket: Arc<Mutex<Bucket>>,
}

struct Bucket {
    tokens: f64,
    capacity: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    min_delay: Duration,
    max_delay: Duration,
}

impl Bucket {
    /// Take a token and return how long the caller should pause first.
    ///
    /// `jitter` in [0, 1] spreads the pause between the min and max delay.
    fn take(&mut self, now: Instant, jitter: f64) -> Duration {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
        self.last_refill = now;

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            let spread = self.max_delay.saturating_sub(self.min_delay);
            self.min_delay + spread.mul_f64(jitter.clamp(0.0, 1.0))
        } else {
            let wait = (1.0 - self.tokens) / self.refill_per_sec;
            self.tokens = 0.0;
            Duration::from_secs_f64(wait) + self.min_delay
        }
    }
}

impl RateLimiter {
    /// # Arguments
    /// * `requests_per_minute` - bucket capacity and refill rate
    /// * `min_delay_secs` / `max_delay_secs` - pause range between requests
    pub fn new(requests_per_minute: u32, min_delay_secs: f64, max_delay_secs: f64) -> Self {
        let capacity = requests_per_minute.max(1) as f64;
        let min_delay = Duration::from_secs_f64(min_delay_secs.max(0.0));
        let max_delay = Duration::from_secs_f64(max_delay_secs.max(min_delay_secs).max(0.0));

        Self {
            bucket: Arc::new(Mutex::new(Bucket {
                tokens: capacity,
                capacity,
                refill_per_sec: capacity / 60.0,
                last_refill: Instant::now(),
                min_delay,
                max_delay,
            })),
        }
    }

    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(
            config.requests_per_minute,
            config.min_delay_secs,
            config.max_delay_secs,
        )
    }

    /// Wait until the next request is allowed
    pub async fn acquire(&self) {
        let delay = {
            let mut bucket = self.bucket.lock().await;
            bucket.take(Instant::now(), jitter())
        };
        tokio::time::sleep(delay).await;
    }
}

/// Cheap jitter in [0, 1) from the clock's sub-second nanos
fn jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    (nanos % 1000) as f64 / 1000.0
}
