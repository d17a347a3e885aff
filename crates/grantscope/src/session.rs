//! Session context and persistence.
//!
//! One session binds one dataset path and one project theme. State lives in
//! `.grantscope/` under the working directory (override the root with
//! `GRANTSCOPE_HOME`); cached insight files live beside the session file and
//! are cleared whenever a different dataset is bound.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Environment override for the session root, used by tests.
pub const HOME_VAR: &str = "GRANTSCOPE_HOME";

const SESSION_DIR: &str = ".grantscope";
const SESSION_FILE: &str = "session.json";
const INSIGHTS_DIR: &str = "insights";

/// User-supplied framing attached to every insight request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectTheme {
  pub theme: String,
  pub objectives: Option<String>,
}

impl ProjectTheme {
  pub fn new(theme: impl Into<String>, objectives: Option<String>) -> Result<Self> {
    let theme = theme.into();
    if theme.trim().is_empty() {
      return Err(anyhow!("project theme cannot be empty"));
    }
    Ok(Self { theme: theme.trim().to_string(), objectives })
  }

  /// Single-string form for prompt assembly and cache keys.
  pub fn as_context(&self) -> String {
    match &self.objectives {
      Some(objectives) => format!("{}\nObjectives: {}", self.theme, objectives),
      None => self.theme.clone(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub dataset_path: PathBuf,
  pub theme: Option<ProjectTheme>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Session {
  pub fn new(dataset_path: PathBuf) -> Self {
    let now = Utc::now();
    Self { dataset_path, theme: None, created_at: now, updated_at: now }
  }

  pub fn touch(&mut self) {
    self.updated_at = Utc::now();
  }
}

/// Persists session state and owns the insight cache directory.
pub struct SessionStore {
  root: PathBuf,
}

impl SessionStore {
  /// Store rooted at `GRANTSCOPE_HOME` or the working directory.
  pub fn open_default() -> Result<Self> {
    let base = match std::env::var(HOME_VAR) {
      Ok(home) if !home.trim().is_empty() => PathBuf::from(home),
      _ => std::env::current_dir()?,
    };
    Self::open(&base)
  }

  pub fn open(base: &Path) -> Result<Self> {
    let root = base.join(SESSION_DIR);
    std::fs::create_dir_all(&root)?;
    Ok(Self { root })
  }

  pub fn session_file(&self) -> PathBuf {
    self.root.join(SESSION_FILE)
  }

  pub fn insights_dir(&self) -> PathBuf {
    self.root.join(INSIGHTS_DIR)
  }

  pub fn load(&self) -> Result<Option<Session>> {
    let path = self.session_file();
    if !path.exists() {
      return Ok(None);
    }
    let json = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&json)?))
  }

  /// Load the session or fail with a remediation hint.
  pub fn require(&self) -> Result<Session> {
    self
      .load()?
      .ok_or_else(|| anyhow!("no dataset is bound; run `grantscope open <data.json>` first"))
  }

  pub fn save(&self, session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(self.session_file(), json)?;
    Ok(())
  }

  /// Bind a dataset path. Binding a different path clears cached insights.
  pub fn bind_dataset(&self, dataset_path: PathBuf) -> Result<Session> {
    let session = match self.load()? {
      Some(mut existing) if existing.dataset_path == dataset_path => {
        existing.touch();
        existing
      }
      _ => {
        self.clear_insights()?;
        Session::new(dataset_path)
      }
    };
    self.save(&session)?;
    Ok(session)
  }

  pub fn clear_insights(&self) -> Result<()> {
    let dir = self.insights_dir();
    if dir.exists() {
      std::fs::remove_dir_all(&dir)?;
    }
    Ok(())
  }

  /// Remove all session state: bound dataset, theme, cached insights.
  pub fn clear(&self) -> Result<()> {
    self.clear_insights()?;
    let path = self.session_file();
    if path.exists() {
      std::fs::remove_file(path)?;
    }
    Ok(())
  }

  /// Number of cached insight files.
  pub fn cached_insights(&self) -> usize {
    let dir = self.insights_dir();
    std::fs::read_dir(dir)
      .map(|entries| {
        entries
          .filter_map(|e| e.ok())
          .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
          .count()
      })
      .unwrap_or(0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn theme_rejects_blank_text() {
    assert!(ProjectTheme::new("  ", None).is_err());
    assert!(ProjectTheme::new("food security", None).is_ok());
  }

  #[test]
  fn theme_context_includes_objectives() {
    let theme =
      ProjectTheme::new("food security", Some("expand school meal coverage".to_string())).unwrap();
    let context = theme.as_context();
    assert!(context.contains("food security"));
    assert!(context.contains("Objectives: expand school meal coverage"));
  }

  #[test]
  fn save_and_reload_round_trips() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::open(temp.path()).unwrap();

    let mut session = Session::new(PathBuf::from("data/sample.json"));
    session.theme = ProjectTheme::new("youth literacy", None).ok();
    store.save(&session).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.dataset_path, PathBuf::from("data/sample.json"));
    assert_eq!(loaded.theme.unwrap().theme, "youth literacy");
  }

  #[test]
  fn rebinding_a_new_dataset_clears_insights() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::open(temp.path()).unwrap();

    store.bind_dataset(PathBuf::from("a.json")).unwrap();
    std::fs::create_dir_all(store.insights_dir()).unwrap();
    std::fs::write(store.insights_dir().join("abc.insight.md"), "cached").unwrap();
    assert_eq!(store.cached_insights(), 1);

    // Same path keeps the cache.
    store.bind_dataset(PathBuf::from("a.json")).unwrap();
    assert_eq!(store.cached_insights(), 1);

    // Different path clears it.
    store.bind_dataset(PathBuf::from("b.json")).unwrap();
    assert_eq!(store.cached_insights(), 0);
  }

  #[test]
  fn require_explains_remediation() {
    let temp = TempDir::new().unwrap();
    let store = SessionStore::open(temp.path()).unwrap();

    let err = store.require().unwrap_err();
    assert!(err.to_string().contains("grantscope open"));
  }
}
