use serial_test::serial;
use sibyl::credentials;
use sibyl::InsightError;
use std::env;

fn clear_env() {
  for var in credentials::API_KEY_VARS {
    env::remove_var(var);
  }
}

#[test]
#[serial]
fn explicit_key_wins_over_environment() {
  clear_env();
  env::set_var("OPENAI_API_KEY", "sk-env");

  let key = credentials::resolve(Some("sk-flag"), false).unwrap();
  assert_eq!(key, "sk-flag");

  clear_env();
}

#[test]
#[serial]
fn grantscope_var_wins_over_openai_var() {
  clear_env();
  env::set_var("GRANTSCOPE_API_KEY", "sk-grantscope");
  env::set_var("OPENAI_API_KEY", "sk-openai");

  let key = credentials::resolve(None, false).unwrap();
  assert_eq!(key, "sk-grantscope");

  clear_env();
}

#[test]
#[serial]
fn blank_values_are_ignored() {
  clear_env();
  env::set_var("GRANTSCOPE_API_KEY", "   ");
  env::set_var("OPENAI_API_KEY", "sk-openai");

  let key = credentials::resolve(Some(""), false).unwrap();
  assert_eq!(key, "sk-openai");

  clear_env();
}

#[test]
#[serial]
fn missing_credential_without_prompt() {
  clear_env();

  let result = credentials::resolve(None, false);
  assert!(matches!(result, Err(InsightError::MissingCredential)));
}
