use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sibyl::{Backend, Completion, CompletionRequest, InsightClient, InsightError, RetryPolicy};

/// Scripted backend: pops one canned outcome per call and counts calls.
/// Cloning shares the script so tests can assert on call counts after the
/// backend moves into the client.
#[derive(Clone)]
struct ScriptedBackend {
  state: Arc<ScriptState>,
}

struct ScriptState {
  outcomes: Mutex<Vec<Result<String, InsightError>>>,
  calls: AtomicU32,
}

impl ScriptedBackend {
  fn new(outcomes: Vec<Result<String, InsightError>>) -> Self {
    // Stored reversed so pop() yields outcomes in declaration order.
    let mut outcomes = outcomes;
    outcomes.reverse();
    Self {
      state: Arc::new(ScriptState { outcomes: Mutex::new(outcomes), calls: AtomicU32::new(0) }),
    }
  }

  fn calls(&self) -> u32 {
    self.state.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Backend for ScriptedBackend {
  fn model(&self) -> &str {
    "scripted"
  }

  async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, InsightError> {
    self.state.calls.fetch_add(1, Ordering::SeqCst);
    match self.state.outcomes.lock().unwrap().pop() {
      Some(Ok(text)) => Ok(Completion { text, model: "scripted".to_string() }),
      Some(Err(err)) => Err(err),
      None => panic!("scripted backend exhausted"),
    }
  }
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
  RetryPolicy { max_attempts, base_delay: Duration::from_millis(1) }
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
  let backend = ScriptedBackend::new(vec![
    Err(InsightError::Network("connection reset".into())),
    Err(InsightError::RateLimited { retry_after: Some(Duration::from_millis(1)) }),
    Ok("grant commentary".into()),
  ]);

  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  let completion = client.generate(&CompletionRequest::new("analyze")).await.unwrap();

  assert_eq!(completion.text, "grant commentary");
  assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn auth_failures_are_not_retried() {
  let backend = ScriptedBackend::new(vec![Err(InsightError::Auth("expired key".into()))]);

  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  let result = client.generate(&CompletionRequest::new("analyze")).await;

  assert!(matches!(result, Err(InsightError::Auth(_))));
  assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn empty_responses_are_not_retried() {
  let backend = ScriptedBackend::new(vec![Err(InsightError::EmptyResponse)]);

  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  let result = client.generate(&CompletionRequest::new("analyze")).await;

  assert!(matches!(result, Err(InsightError::EmptyResponse)));
  assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn retry_budget_is_bounded() {
  let backend = ScriptedBackend::new(vec![
    Err(InsightError::Network("timeout".into())),
    Err(InsightError::Network("timeout".into())),
    Err(InsightError::Network("timeout".into())),
  ]);

  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  let result = client.generate(&CompletionRequest::new("analyze")).await;

  assert!(matches!(result, Err(InsightError::Network(_))));
  assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn server_errors_are_retried_but_client_errors_are_not() {
  let backend = ScriptedBackend::new(vec![
    Err(InsightError::Api { status: 502, message: "bad gateway".into() }),
    Ok("recovered".into()),
  ]);
  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  assert_eq!(client.generate(&CompletionRequest::new("x")).await.unwrap().text, "recovered");
  assert_eq!(backend.calls(), 2);

  let backend = ScriptedBackend::new(vec![Err(InsightError::Api {
    status: 400,
    message: "bad request".into(),
  })]);
  let client = InsightClient::with_policy(Box::new(backend.clone()), fast_policy(3));
  let result = client.generate(&CompletionRequest::new("x")).await;
  assert!(matches!(result, Err(InsightError::Api { status: 400, .. })));
  assert_eq!(backend.calls(), 1);
}
