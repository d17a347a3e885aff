//! API credential resolution.
//!
//! Order: explicit value (CLI flag), environment, then an interactive
//! password prompt when the caller allows one. The credential is held in
//! memory only; nothing is written to disk.

use crate::error::InsightError;

/// Environment variables consulted, in order.
pub const API_KEY_VARS: &[&str] = &["GRANTSCOPE_API_KEY", "OPENAI_API_KEY"];

/// Look up a credential from the environment.
pub fn from_env() -> Option<String> {
  for var in API_KEY_VARS {
    if let Ok(value) = std::env::var(var) {
      if !value.trim().is_empty() {
        return Some(value);
      }
    }
  }
  None
}

/// Resolve a credential. `interactive` permits a terminal prompt as the
/// last resort; without it, absence is `MissingCredential`.
pub fn resolve(explicit: Option<&str>, interactive: bool) -> Result<String, InsightError> {
  if let Some(key) = explicit {
    if !key.trim().is_empty() {
      return Ok(key.to_string());
    }
  }

  if let Some(key) = from_env() {
    return Ok(key);
  }

  if interactive && console::user_attended() {
    return prompt();
  }

  Err(InsightError::MissingCredential)
}

fn prompt() -> Result<String, InsightError> {
  let entered = dialoguer::Password::new()
    .with_prompt("OpenAI API key")
    .allow_empty_password(false)
    .interact()
    .map_err(|_| InsightError::MissingCredential)?;

  if entered.trim().is_empty() {
    return Err(InsightError::MissingCredential);
  }

  harper::success("API key accepted for this session");
  Ok(entered)
}
