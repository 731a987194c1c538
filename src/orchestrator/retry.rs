use rand::Rng;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Classification contract for provider errors.
///
/// Rate-limit detection is two-stage: adapters map a structured HTTP 429
/// to a dedicated error variant, and `mentions_quota` catches provider
/// payloads that only signal throttling in prose. Everything else is
/// treated as fatal and surfaced on first occurrence.
pub trait Retryable {
    fn is_rate_limited(&self) -> bool;
}

const QUOTA_TOKENS: [&str; 2] = ["quota", "limit"];

/// Case-insensitive scan of an error message for throttling vocabulary.
/// Upstream error shapes vary; this is the textual fallback behind the
/// structured status check.
pub fn mentions_quota(message: &str) -> bool {
    let lowered = message.to_lowercase();
    QUOTA_TOKENS.iter().any(|token| lowered.contains(token))
}

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E: Display + Debug> {
    #[error("Gave up after {attempts} attempts, provider quota never cleared: {last}")]
    QuotaExhausted { attempts: u32, last: E },

    #[error("{0}")]
    Fatal(E),
}

impl<E: Display + Debug> RetryError<E> {
    /// The underlying provider error, whichever way the retry loop ended.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::QuotaExhausted { last, .. } => last,
            RetryError::Fatal(e) => e,
        }
    }
}

pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
        }
    }

    /// Run `op`, retrying rate-limited failures with doubling backoff.
    ///
    /// Each invocation owns its attempt counter and delay; policies are
    /// freely shared across concurrent calls.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Retryable + Display + Debug,
    {
        let mut delay = self.initial_delay;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("Succeeded on attempt {}/{}", attempt, self.max_attempts);
                    }
                    return Ok(value);
                }
                Err(err) if !err.is_rate_limited() => return Err(RetryError::Fatal(err)),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::QuotaExhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }

                    let wait = delay + jitter(delay);
                    tracing::warn!(
                        "Rate limited (attempt {}/{}), retrying in {}ms: {}",
                        attempt,
                        self.max_attempts,
                        wait.as_millis(),
                        err
                    );
                    sleep(wait).await;
                    delay = delay.saturating_mul(2);
                }
            }
        }
    }
}

/// Up to 10% of the current delay, so concurrent callers throttled at the
/// same moment do not retry in lockstep.
fn jitter(delay: Duration) -> Duration {
    let cap = delay.as_millis() as u64 / 10;
    if cap == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=cap))
}

/// Execute an async operation with bounded exponential-backoff retry on
/// rate-limit signals. Non-retryable failures propagate immediately.
pub async fn with_retry<T, E, F, Fut>(
    op: F,
    max_attempts: u32,
    initial_delay_ms: u64,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display + Debug,
{
    RetryPolicy::new(max_attempts, initial_delay_ms).run(op).await
}
