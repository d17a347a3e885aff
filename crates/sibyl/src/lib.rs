//! Sibyl - LLM insight client for GrantScope.
//!
//! Talks to any OpenAI-compatible chat completions endpoint and turns the
//! failure modes that matter to callers (missing credential, auth rejection,
//! rate limiting, transport trouble, empty completions) into a typed error
//! taxonomy. Transient failures are retried with bounded exponential backoff;
//! authentication failures never are.

pub mod backend;
pub mod credentials;
pub mod error;
pub mod retry;

pub use backend::{Backend, Completion, CompletionRequest, OpenAiBackend};
pub use error::InsightError;
pub use retry::RetryPolicy;

/// High-level insight generation client: a backend plus a retry policy.
pub struct InsightClient {
  backend: Box<dyn Backend>,
  policy: RetryPolicy,
}

impl InsightClient {
  pub fn new(backend: Box<dyn Backend>) -> Self {
    Self { backend, policy: RetryPolicy::default() }
  }

  pub fn with_policy(backend: Box<dyn Backend>, policy: RetryPolicy) -> Self {
    Self { backend, policy }
  }

  /// Generate a completion, retrying transient failures per the policy.
  pub async fn generate(&self, request: &CompletionRequest) -> Result<Completion, InsightError> {
    retry::with_retry(&self.policy, || self.backend.complete(request)).await
  }
}
