//! On-disk insight cache.
//!
//! One file per generated insight, named by its cache key:
//! `<key>.insight.md`, YAML frontmatter (model, fingerprint, timestamp)
//! followed by the commentary body. The key is a SHA-256 over everything
//! that shaped the generation: analysis fingerprint, theme, question, model.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize, Deserialize)]
struct FrontMatter {
  model: String,
  fingerprint: String,
  generated_at: DateTime<Utc>,
}

pub struct InsightCache {
  root: PathBuf,
}

impl InsightCache {
  pub fn new(root: PathBuf) -> Self {
    Self { root }
  }

  /// Deterministic cache key over the generation inputs.
  pub fn key(parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
      hasher.update(part.as_bytes());
      hasher.update([0u8]); // separator so ("ab","c") != ("a","bc")
    }
    format!("{:x}", hasher.finalize())
  }

  fn path_for(&self, key: &str) -> PathBuf {
    self.root.join(format!("{key}.insight.md"))
  }

  /// Cached commentary for the key, if present and well-formed.
  pub fn load(&self, key: &str) -> Result<Option<String>> {
    let path = self.path_for(key);
    if !path.exists() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let (_, body) = parse(&content)?;
    Ok(Some(body))
  }

  pub fn store(&self, key: &str, model: &str, fingerprint: &str, text: &str) -> Result<()> {
    std::fs::create_dir_all(&self.root)?;

    let frontmatter = FrontMatter {
      model: model.to_string(),
      fingerprint: fingerprint.to_string(),
      generated_at: Utc::now(),
    };
    let yaml = serde_yaml::to_string(&frontmatter)?;
    let content = format!("---\n{yaml}---\n\n{text}\n");

    std::fs::write(self.path_for(key), content)?;
    Ok(())
  }
}

fn parse(content: &str) -> Result<(FrontMatter, String)> {
  let rest = content
    .strip_prefix("---\n")
    .ok_or_else(|| anyhow!("cached insight is missing frontmatter"))?;
  let (yaml, body) = rest
    .split_once("---\n")
    .ok_or_else(|| anyhow!("cached insight frontmatter is unterminated"))?;

  let frontmatter: FrontMatter = serde_yaml::from_str(yaml)?;
  Ok((frontmatter, body.trim().to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn key_is_stable_and_separator_safe() {
    assert_eq!(InsightCache::key(&["a", "b"]), InsightCache::key(&["a", "b"]));
    assert_ne!(InsightCache::key(&["ab", "c"]), InsightCache::key(&["a", "bc"]));
    assert_ne!(InsightCache::key(&["a"]), InsightCache::key(&["a", ""]));
  }

  #[test]
  fn store_then_load_round_trips() {
    let temp = TempDir::new().unwrap();
    let cache = InsightCache::new(temp.path().join("insights"));

    let key = InsightCache::key(&["fp", "theme", "", "gpt-4o"]);
    cache.store(&key, "gpt-4o", "fp", "Funding favors education.").unwrap();

    let loaded = cache.load(&key).unwrap().unwrap();
    assert_eq!(loaded, "Funding favors education.");
  }

  #[test]
  fn missing_key_is_a_clean_miss() {
    let temp = TempDir::new().unwrap();
    let cache = InsightCache::new(temp.path().join("insights"));
    assert!(cache.load("deadbeef").unwrap().is_none());
  }

  #[test]
  fn bodies_with_rules_survive() {
    let temp = TempDir::new().unwrap();
    let cache = InsightCache::new(temp.path().join("insights"));

    let body = "First point.\n\n---\n\nSecond point.";
    cache.store("k", "gpt-4o", "fp", body).unwrap();
    assert_eq!(cache.load("k").unwrap().unwrap(), body);
  }
}
