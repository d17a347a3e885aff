use std::time::Duration;
use thiserror::Error;

/// Failure modes of insight generation.
///
/// Only `RateLimited`, `Network`, and server-side `Api` errors are worth
/// retrying; everything else fails fast.
#[derive(Debug, Error)]
pub enum InsightError {
  #[error("no API credential configured; insight features are disabled")]
  MissingCredential,

  #[error("invalid insight service configuration: {0}")]
  Config(String),

  #[error("the insight service rejected the credential: {0}")]
  Auth(String),

  #[error("rate limited by the insight service")]
  RateLimited { retry_after: Option<Duration> },

  #[error("network error reaching the insight service: {0}")]
  Network(String),

  #[error("insight service returned HTTP {status}: {message}")]
  Api { status: u16, message: String },

  #[error("the insight service returned an empty completion")]
  EmptyResponse,

  #[error("could not parse the insight service response: {0}")]
  Malformed(String),
}

impl InsightError {
  /// Whether a retry has any chance of succeeding.
  pub fn is_transient(&self) -> bool {
    match self {
      InsightError::RateLimited { .. } | InsightError::Network(_) => true,
      InsightError::Api { status, .. } => *status >= 500,
      _ => false,
    }
  }

  /// Whether this failure means insight features should be considered off
  /// for the rest of the session rather than just this request.
  pub fn is_credential_failure(&self) -> bool {
    matches!(self, InsightError::MissingCredential | InsightError::Auth(_))
  }
}
