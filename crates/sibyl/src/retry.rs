//! Bounded retry with exponential backoff.
//!
//! Applies only to transient failures (rate limits, transport errors,
//! server-side 5xx). Authentication and response-shape errors are returned
//! immediately so a bad credential never burns the retry budget.

use std::future::Future;
use std::time::Duration;

use crate::error::InsightError;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  /// Total attempts, including the first.
  pub max_attempts: u32,
  /// Delay before the first retry; doubles each retry after that.
  pub base_delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self { max_attempts: 3, base_delay: Duration::from_millis(500) }
  }
}

impl RetryPolicy {
  /// Backoff before retry number `retry` (0-based).
  pub fn delay_for(&self, retry: u32) -> Duration {
    self.base_delay.saturating_mul(1u32 << retry.min(16))
  }
}

/// Run `operation`, retrying transient failures per `policy`. A server-provided
/// retry-after hint overrides the computed backoff for that wait.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, InsightError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, InsightError>>,
{
  let mut retries = 0;

  loop {
    match operation().await {
      Ok(value) => return Ok(value),
      Err(err) if err.is_transient() && retries + 1 < policy.max_attempts => {
        let delay = match &err {
          InsightError::RateLimited { retry_after: Some(after) } => *after,
          _ => policy.delay_for(retries),
        };
        harper::warn(&format!(
          "insight request failed ({err}); retrying in {:.1}s",
          delay.as_secs_f32()
        ));
        tokio::time::sleep(delay).await;
        retries += 1;
      }
      Err(err) => return Err(err),
    }
  }
}
