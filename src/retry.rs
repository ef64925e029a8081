use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

/// Decides whether a failure is a transient rate limit worth retrying
pub trait RetryClassify {
    fn is_rate_limited(&self) -> bool;
}

impl RetryClassify for anyhow::Error {
    fn is_rate_limited(&self) -> bool {
        if let Some(api_error) = self.downcast_ref::<crate::api::ApiError>() {
            return api_error.is_rate_limited();
        }
        self.to_string().contains("429")
    }
}

/// Retry policy with exponential backoff and jitter, applied to rate limits only
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_jitter_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 3000,
            max_jitter_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// Policy without any waiting between attempts
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            max_jitter_ms: 0,
        }
    }

    /// Backoff before the retry that follows the failed attempt `attempt` (0-based)
    pub fn backoff_delay(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(
            factor
                .saturating_mul(self.base_delay_ms)
                .saturating_add(jitter_ms.min(self.max_jitter_ms)),
        )
    }

    fn jitter_ms(&self) -> u64 {
        if self.max_jitter_ms == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..=self.max_jitter_ms)
    }

    /// Execute an operation, retrying only rate-limited failures
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: RetryClassify + std::fmt::Display,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_rate_limited() {
                        return Err(e);
                    }

                    attempt += 1;

                    if attempt >= max_attempts {
                        tracing::warn!("Rate limited after {} attempts: {}", attempt, e);
                        return Err(e);
                    }

                    let delay = self.backoff_delay(attempt - 1, self.jitter_ms());
                    tracing::warn!(
                        "Attempt {} rate limited, retrying in {}ms: {}",
                        attempt,
                        delay.as_millis(),
                        e
                    );

                    sleep(delay).await;
                }
            }
        }
    }
}
